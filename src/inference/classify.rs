use bson::{Bson, Document};
use super::{unify, SchemaNode, TypeTag};

/// Classify one raw value. Never returns a `Union` for a scalar; arrays fold
/// their elements through `unify`, so an array's element type may be one.
pub fn classify(value: &Bson) -> TypeTag {
    match value {
        Bson::Null | Bson::Undefined => TypeTag::Null,
        Bson::Boolean(_) => TypeTag::Bool,
        Bson::Int32(_) | Bson::Int64(_) => TypeTag::Int,
        Bson::Double(_) => TypeTag::Float,
        Bson::String(_) | Bson::Symbol(_) => TypeTag::String,
        Bson::DateTime(_) => TypeTag::Date,
        Bson::Binary(_) => TypeTag::Binary,
        Bson::ObjectId(_) => TypeTag::ObjectId,
        Bson::Array(xs) => classify_array(xs),
        Bson::Document(doc) => TypeTag::Object(classify_document(doc)),
        other => {
            tracing::debug!(element_type = ?other.element_type(), "unrecognised value kind, treating as unknown");
            TypeTag::Unknown
        }
    }
}

fn classify_array(xs: &[Bson]) -> TypeTag {
    let element = xs.iter()
        .fold(TypeTag::Unknown, |acc, x| unify(&acc, &classify(x)));
    // nulls alone say nothing about the element type
    match element {
        TypeTag::Null => TypeTag::array_of(TypeTag::Unknown),
        element => TypeTag::array_of(element),
    }
}

/// A one-document node: every field present once, null counted when null.
pub fn classify_document(doc: &Document) -> SchemaNode {
    let mut node = SchemaNode::single();
    for (name, value) in doc {
        node.observe_field(name, classify(value));
    }
    node
}

#[cfg(test)]
mod tests {
    use super::*;
    use bson::{doc, oid::ObjectId, Binary, DateTime, Decimal128, Regex};
    use bson::spec::BinarySubtype;
    use crate::inference::Optionality;

    #[test]
    fn scalars_map_to_one_tag() {
        assert_eq!(classify(&Bson::String("hello".into())), TypeTag::String);
        assert_eq!(classify(&Bson::Int32(123)), TypeTag::Int);
        assert_eq!(classify(&Bson::Int64(1 << 40)), TypeTag::Int);
        assert_eq!(classify(&Bson::Double(123.45)), TypeTag::Float);
        assert_eq!(classify(&Bson::Boolean(true)), TypeTag::Bool);
        assert_eq!(classify(&Bson::DateTime(DateTime::now())), TypeTag::Date);
        assert_eq!(classify(&Bson::ObjectId(ObjectId::new())), TypeTag::ObjectId);
        assert_eq!(classify(&Bson::Null), TypeTag::Null);
        assert_eq!(
            classify(&Bson::Binary(Binary { subtype: BinarySubtype::Generic, bytes: vec![0] })),
            TypeTag::Binary,
        );
    }

    #[test]
    fn unrecognised_scalars_fall_back_to_unknown() {
        let regex = Bson::RegularExpression(Regex { pattern: "^a".into(), options: "i".into() });
        assert_eq!(classify(&regex), TypeTag::Unknown);
        assert_eq!(classify(&Bson::Decimal128(Decimal128::from_bytes([0; 16]))), TypeTag::Unknown);
        assert_eq!(classify(&Bson::MaxKey), TypeTag::Unknown);
    }

    #[test]
    fn arrays_unify_their_elements() {
        let empty = classify(&Bson::Array(vec![]));
        assert_eq!(empty, TypeTag::array_of(TypeTag::Unknown));

        let ints = classify(&bson::bson!([1, 2]));
        assert_eq!(ints, TypeTag::array_of(TypeTag::Int));

        let mixed = classify(&bson::bson!([1, "a"]));
        assert_eq!(mixed, TypeTag::array_of(TypeTag::Union(vec![TypeTag::Int, TypeTag::String])));

        let with_null = classify(&bson::bson!([null, 2.5]));
        assert_eq!(with_null, TypeTag::array_of(TypeTag::Float));

        let only_nulls = classify(&bson::bson!([null, null]));
        assert_eq!(only_nulls, TypeTag::array_of(TypeTag::Unknown));
    }

    #[test]
    fn documents_become_single_object_nodes() {
        let node = classify_document(&doc! { "full name": "Alice", "age": null, "profile": { "bio": "dev" } });
        assert_eq!(node.observed, 1);
        assert_eq!(node.fields["full name"].ty, TypeTag::String);
        assert_eq!(node.fields["age"].nulls, 1);
        assert_eq!(node.fields["age"].optionality(node.observed), Optionality::RequiredNullable);
        let TypeTag::Object(profile) = &node.fields["profile"].ty else { panic!("expected object") };
        assert_eq!(profile.fields["bio"].present, 1);
    }
}
