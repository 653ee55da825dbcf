//! JSON-Schema-ish view of an inferred schema, for `preview --json`.
//!
//! Each field also carries its raw evidence (`x-present`, `x-nulls`) so the
//! optionality decision can be audited against the sample.
use serde_json::{json, Map, Value};
use crate::inference::{SchemaNode, TypeTag};

pub fn emit_schema(tag: &TypeTag) -> Value {
    match tag {
        TypeTag::Unknown => json!({}),
        TypeTag::Null => json!({ "type": "null" }),
        TypeTag::Bool => json!({ "type": "boolean" }),
        TypeTag::Int => json!({ "type": "integer" }),
        TypeTag::Float => json!({ "type": "number" }),
        TypeTag::String => json!({ "type": "string" }),
        TypeTag::Date => json!({ "type": "string", "format": "date-time" }),
        TypeTag::Binary => json!({ "type": "string", "contentEncoding": "base64" }),
        TypeTag::ObjectId => json!({ "type": "string", "format": "objectid" }),
        TypeTag::Array(element) => json!({ "type": "array", "items": emit_schema(element) }),
        TypeTag::Object(node) => emit_object(node),
        TypeTag::Union(members) => json!({ "oneOf": members.iter().map(emit_schema).collect::<Vec<_>>() }),
    }
}

pub fn emit_object(node: &SchemaNode) -> Value {
    let mut props = Map::new();
    let mut required = Vec::new();
    for (name, field) in &node.fields {
        let optionality = field.optionality(node.observed);
        let mut schema = emit_schema(&field.ty);
        if optionality.is_nullable() && field.ty != TypeTag::Null {
            schema = json!({ "oneOf": [schema, { "type": "null" }] });
        }
        if let Value::Object(map) = &mut schema {
            map.insert("x-present".into(), Value::from(field.present));
            map.insert("x-nulls".into(), Value::from(field.nulls));
        }
        if !optionality.is_optional() {
            required.push(Value::from(name.clone()));
        }
        props.insert(name.clone(), schema);
    }

    let mut o = json!({
        "type": "object",
        "properties": props,
        "x-observed": node.observed,
    });
    if !required.is_empty() {
        o["required"] = Value::Array(required);
    }
    o
}

#[cfg(test)]
mod tests {
    use super::*;
    use bson::doc;
    use crate::inference::infer_from_documents;

    #[test]
    fn object_report_marks_required_and_nullable() {
        let docs = [doc! { "a": 1, "b": null, "c": [1.5] }, doc! { "a": 2, "b": "x" }];
        let root = infer_from_documents(&docs);
        let schema = emit_object(&root);

        assert_eq!(schema["x-observed"], 2);
        assert_eq!(schema["required"], json!(["a", "b"]));
        assert_eq!(schema["properties"]["a"]["type"], "integer");
        assert_eq!(schema["properties"]["b"]["oneOf"][1]["type"], "null");
        assert_eq!(schema["properties"]["b"]["x-nulls"], 1);
        assert_eq!(schema["properties"]["c"]["items"]["type"], "number");
        assert_eq!(schema["properties"]["c"]["x-present"], 1);
    }

    #[test]
    fn unions_become_one_of() {
        let docs = [doc! { "v": 1 }, doc! { "v": "s" }];
        let root = infer_from_documents(&docs);
        let schema = emit_object(&root);
        assert_eq!(schema["properties"]["v"]["oneOf"].as_array().map(Vec::len), Some(2));
    }

    #[test]
    fn empty_node_has_no_required_list() {
        let schema = emit_object(&SchemaNode::default());
        assert!(schema.get("required").is_none());
        assert_eq!(schema["properties"], json!({}));
    }
}
