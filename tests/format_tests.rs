use tagson::{to_json_string, ConvertOptions, Converter, Schema};

fn convert(input: &str) -> String {
    to_json_string(input).unwrap()
}

fn object(name: &str, fields: &[(&str, &str, &str)]) -> String {
    let mut out = format!("<object><obj_name>{name}</obj_name>");
    for (field, ty, value) in fields {
        out.push_str(&format!(
            "<field><name>{field}</name><type>{ty}</type><value>{value}</value></field>"
        ));
    }
    out.push_str("</object>\n");
    out
}

#[test]
fn test_single_string_field() {
    let json = convert(&object("A", &[("x", "string", "hello")]));
    assert_eq!(json, "{\n  \"A\": {\n    \"x\": \"hello\"\n  }\n}\n");
}

#[test]
fn test_no_trailing_separators() {
    let input = [
        object("A", &[("x", "int", "1"), ("y", "int", "2"), ("z", "string", "3")]),
        object("B", &[]),
        object("C", &[("only", "int", "9")]),
    ]
    .concat();
    let json = convert(&input);
    println!("Output:\n{}", json);

    assert_eq!(
        json,
        "{
  \"A\": {
    \"x\": 1,
    \"y\": 2,
    \"z\": \"3\"
  },
  \"B\": {
  },
  \"C\": {
    \"only\": 9
  }
}
"
    );
    assert!(!json.contains(",\n  }"));
    assert!(!json.contains(",\n}"));
}

#[test]
fn test_output_always_parses() {
    for objects in 1..5 {
        for fields in 0..4 {
            let input: String = (0..objects)
                .map(|o| {
                    let fields: Vec<(String, &str, String)> = (0..fields)
                        .map(|f| (format!("f{f}"), "int", f.to_string()))
                        .collect();
                    let borrowed: Vec<(&str, &str, &str)> = fields
                        .iter()
                        .map(|(n, t, v)| (n.as_str(), *t, v.as_str()))
                        .collect();
                    object(&format!("o{o}"), &borrowed)
                })
                .collect();
            let json = convert(&input);
            let parsed: serde_json::Value = serde_json::from_str(&json)
                .unwrap_or_else(|e| panic!("{e}\n{json}"));
            assert_eq!(parsed.as_object().unwrap().len(), objects);
        }
    }
}

#[test]
fn test_integers_are_canonical() {
    let json = convert(&object(
        "N",
        &[("zero", "int", "000"), ("big", "int", "00123456789012345678901234567890")],
    ));
    assert!(json.contains("\"zero\": 0,"));
    assert!(json.contains("\"big\": 123456789012345678901234567890\n"));
}

#[test]
fn test_values_keep_inner_spaces() {
    let json = convert(&object("S", &[("greeting", "string", " hi there ")]));
    assert!(json.contains("\"greeting\": \" hi there \""));
}

#[test]
fn test_insertion_order_is_kept() {
    let input = [object("zeta", &[]), object("alpha", &[]), object("mid", &[])].concat();
    let json = convert(&input);
    let zeta = json.find("zeta").unwrap();
    let alpha = json.find("alpha").unwrap();
    let mid = json.find("mid").unwrap();
    assert!(zeta < alpha && alpha < mid);
}

#[test]
fn test_custom_indent() {
    let converter =
        Converter::new(Schema::bundled().unwrap(), ConvertOptions::new().with_indent(4)).unwrap();
    let conversion = converter.convert_str(&object("A", &[("x", "int", "1")]));
    assert_eq!(
        converter.to_json(&conversion),
        "{\n    \"A\": {\n        \"x\": 1\n    }\n}\n"
    );
}
