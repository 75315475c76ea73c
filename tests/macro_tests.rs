use tagson::{schema, Error, Schema, SchemaSpec};

#[test]
fn test_schema_macro_leaf() {
    let spec = schema!("name");
    assert_eq!(spec.tag, "name");
    assert!(!spec.repeatable);
    assert!(spec.allowed_values.is_none());
    assert!(spec.children.is_empty());
}

#[test]
fn test_schema_macro_value_domain() {
    let spec = schema!("type" = ["int", "string",]);
    assert_eq!(
        spec.allowed_values,
        Some(vec!["int".to_string(), "string".to_string()])
    );

    let spec = schema!("tag" * = ["a"]);
    assert!(spec.repeatable);
}

#[test]
fn test_schema_macro_matches_bundled() {
    let spec = schema!("object" * {
        "obj_name",
        "field" * {
            "name",
            "type" = ["int", "string"],
            "value",
        },
    });
    assert_eq!(spec, Schema::bundled_spec());
}

#[test]
fn test_schema_macro_deep_nesting() {
    let spec = schema!("a" {
        "b" {
            "c" * {
                "d" *,
                "e"
            }
        },
        "f"
    });

    let schema = Schema::new(&spec).unwrap();
    assert_eq!(schema.len(), 6);

    let b = schema.child(schema.root(), "b").unwrap();
    let c = schema.child(b, "c").unwrap();
    assert!(schema.node(c).is_repeatable());
    assert_eq!(schema.node(c).parent(), Some(b));

    let d = schema.child(c, "d").unwrap();
    assert!(schema.node(d).is_leaf());
    assert!(schema.node(d).is_repeatable());
    assert_eq!(
        schema
            .leaves(schema.root())
            .into_iter()
            .map(|id| schema.tag(id))
            .collect::<Vec<_>>(),
        vec!["d", "e", "f"]
    );
}

#[test]
fn test_schema_macro_output_is_validated() {
    let spec = schema!("root" { "x", "x" });
    assert!(matches!(Schema::new(&spec), Err(Error::InvalidSchema(_))));

    let spec = schema!("root" { "bad tag" });
    assert!(Schema::new(&spec).is_err());
}

#[test]
fn test_schema_macro_serializes_like_hand_built() {
    let spec = schema!("root" { "leaf" = ["x"] });
    let built = SchemaSpec::container(
        "root",
        vec![SchemaSpec::leaf("leaf").with_allowed_values(["x"])],
    );
    assert_eq!(
        serde_json::to_string(&spec).unwrap(),
        serde_json::to_string(&built).unwrap()
    );
    assert_eq!(
        serde_json::to_string(&spec).unwrap(),
        concat!(
            r#"{"tag":"root","repeatable":false,"children":["#,
            r#"{"tag":"leaf","repeatable":false,"allowed_values":["x"]}]}"#
        )
    );
}
