/// Builds a [`SchemaSpec`](crate::SchemaSpec) tree declaratively.
///
/// Each node is a string literal, optionally followed by `*` (repeatable),
/// then either `= [..]` (a leaf with allowed values) or `{ .. }` (a container
/// with comma-separated children).
///
/// ```rust
/// use tagson::schema;
///
/// let spec = schema!("object" * {
///     "obj_name",
///     "field" * {
///         "name",
///         "type" = ["int", "string"],
///         "value",
///     },
/// });
/// assert_eq!(spec.children.len(), 2);
/// assert!(spec.children[1].repeatable);
/// ```
#[macro_export]
macro_rules! schema {
    // Children, accumulated left to right
    (@children [$($done:expr,)*]) => {
        vec![$($done),*]
    };

    (@children [$($done:expr,)*] $tag:literal * { $($inner:tt)* } $(, $($rest:tt)*)?) => {
        $crate::schema!(
            @children [$($done,)* $crate::schema!($tag * { $($inner)* }),] $($($rest)*)?
        )
    };

    (@children [$($done:expr,)*] $tag:literal { $($inner:tt)* } $(, $($rest:tt)*)?) => {
        $crate::schema!(@children [$($done,)* $crate::schema!($tag { $($inner)* }),] $($($rest)*)?)
    };

    (
        @children [$($done:expr,)*]
        $tag:literal * = [$($value:literal),* $(,)?] $(, $($rest:tt)*)?
    ) => {
        $crate::schema!(
            @children [$($done,)* $crate::schema!($tag * = [$($value),*]),] $($($rest)*)?
        )
    };

    (@children [$($done:expr,)*] $tag:literal = [$($value:literal),* $(,)?] $(, $($rest:tt)*)?) => {
        $crate::schema!(@children [$($done,)* $crate::schema!($tag = [$($value),*]),] $($($rest)*)?)
    };

    (@children [$($done:expr,)*] $tag:literal * $(, $($rest:tt)*)?) => {
        $crate::schema!(@children [$($done,)* $crate::schema!($tag *),] $($($rest)*)?)
    };

    (@children [$($done:expr,)*] $tag:literal $(, $($rest:tt)*)?) => {
        $crate::schema!(@children [$($done,)* $crate::schema!($tag),] $($($rest)*)?)
    };

    // Single nodes
    ($tag:literal * { $($inner:tt)* }) => {
        $crate::SchemaSpec::container($tag, $crate::schema!(@children [] $($inner)*)).repeatable()
    };

    ($tag:literal { $($inner:tt)* }) => {
        $crate::SchemaSpec::container($tag, $crate::schema!(@children [] $($inner)*))
    };

    ($tag:literal * = [$($value:literal),* $(,)?]) => {
        $crate::SchemaSpec::leaf($tag)
            .with_allowed_values([$($value),*])
            .repeatable()
    };

    ($tag:literal = [$($value:literal),* $(,)?]) => {
        $crate::SchemaSpec::leaf($tag).with_allowed_values([$($value),*])
    };

    ($tag:literal *) => {
        $crate::SchemaSpec::leaf($tag).repeatable()
    };

    ($tag:literal) => {
        $crate::SchemaSpec::leaf($tag)
    };
}

#[cfg(test)]
mod tests {
    use crate::SchemaSpec;

    #[test]
    fn test_schema_macro_leaves() {
        assert_eq!(schema!("name"), SchemaSpec::leaf("name"));
        assert_eq!(schema!("name" *), SchemaSpec::leaf("name").repeatable());
        assert_eq!(
            schema!("type" = ["int", "string"]),
            SchemaSpec::leaf("type").with_allowed_values(["int", "string"])
        );
    }

    #[test]
    fn test_schema_macro_nesting() {
        let spec = schema!("root" {
            "name",
            "field" * { "name", "value" }
        });

        assert_eq!(
            spec,
            SchemaSpec::container(
                "root",
                vec![
                    SchemaSpec::leaf("name"),
                    SchemaSpec::container(
                        "field",
                        vec![SchemaSpec::leaf("name"), SchemaSpec::leaf("value")],
                    )
                    .repeatable(),
                ],
            )
        );
    }
}
