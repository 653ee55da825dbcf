use std::collections::HashMap;
use crate::inference::{SchemaNode, TypeTag};
use crate::ir::{Field, GeneratedType, Ty};
use crate::naming::{self, NameTable};

/// Run-scoped collection of declarations.
///
/// Nested object shapes are registered once per structural identity, so two
/// fields holding the same shape share one declaration. Declarations are kept
/// in dependency order: a nested type always precedes the types that name it.
#[derive(Debug, Default)]
pub struct Registry {
    names: NameTable,
    types: Vec<GeneratedType>,
    shapes: HashMap<Vec<Field>, String>,
    collection: String,
}

impl Registry {
    pub fn new() -> Self { Self::default() }

    /// Register the top-level type of one collection; returns its name.
    pub fn register_collection(&mut self, collection: &str, root: &SchemaNode) -> String {
        self.collection = collection.to_owned();
        let name = self.names.claim(&naming::to_pascal_case(collection));
        let fields = self.lower_fields(&name, root);
        self.push(name.clone(), root, fields);
        name
    }

    pub fn into_types(self) -> Vec<GeneratedType> { self.types }

    fn push(&mut self, name: String, schema: &SchemaNode, fields: Vec<Field>) {
        self.types.push(GeneratedType {
            name,
            collection: self.collection.clone(),
            schema: schema.clone(),
            fields,
        });
    }

    fn lower_fields(&mut self, owner: &str, node: &SchemaNode) -> Vec<Field> {
        node.fields.iter().map(|(name, stats)| Field {
            name: name.clone(),
            ty: self.lower_ty(owner, name, &stats.ty),
            optionality: stats.optionality(node.observed),
        }).collect()
    }

    fn lower_ty(&mut self, owner: &str, field: &str, tag: &TypeTag) -> Ty {
        match tag {
            TypeTag::Unknown => Ty::Unknown,
            TypeTag::Null => Ty::Null,
            TypeTag::Bool => Ty::Bool,
            TypeTag::Int => Ty::Int,
            TypeTag::Float => Ty::Float,
            TypeTag::String => Ty::String,
            TypeTag::Date => Ty::Date,
            TypeTag::Binary => Ty::Binary,
            TypeTag::ObjectId => Ty::ObjectId,
            // array elements are named after the field that holds the array
            TypeTag::Array(element) => Ty::List(Box::new(self.lower_ty(owner, field, element))),
            TypeTag::Object(node) => Ty::Named(self.register_nested(owner, field, node)),
            TypeTag::Union(members) => Ty::Union(
                members.iter().map(|m| self.lower_ty(owner, field, m)).collect()
            ),
        }
    }

    fn register_nested(&mut self, owner: &str, field: &str, node: &SchemaNode) -> String {
        let name = self.names.claim(&naming::nested_name(owner, field));
        let fields = self.lower_fields(&name, node);

        let key = shape_key(&fields);
        if let Some(existing) = self.shapes.get(&key) {
            let existing = existing.clone();
            self.names.release(&name);
            return existing;
        }
        self.shapes.insert(key, name.clone());
        self.push(name.clone(), node, fields);
        name
    }
}

/// Structural identity of a lowered object: its fields regardless of order.
fn shape_key(fields: &[Field]) -> Vec<Field> {
    let mut key = fields.to_vec();
    key.sort_by(|a, b| a.name.cmp(&b.name));
    key
}

/// Lower every collection of a run, in the given order.
pub fn lower_collections<'a, I>(collections: I) -> Vec<GeneratedType>
where
    I: IntoIterator<Item = (&'a str, &'a SchemaNode)>,
{
    let mut registry = Registry::new();
    for (collection, root) in collections {
        registry.register_collection(collection, root);
    }
    registry.into_types()
}

#[cfg(test)]
mod tests {
    use super::*;
    use bson::doc;
    use crate::inference::{infer_from_documents, Optionality};

    fn names(types: &[GeneratedType]) -> Vec<&str> {
        types.iter().map(|t| t.name.as_str()).collect()
    }

    #[test]
    fn nested_types_precede_their_parents() {
        let docs = [doc! { "profile": { "bio": "dev", "links": { "web": "a" } } }];
        let root = infer_from_documents(&docs);
        let types = lower_collections([("users", &root)]);
        assert_eq!(names(&types), ["UsersProfileLinks", "UsersProfile", "Users"]);
        assert_eq!(types[2].fields[0].ty, Ty::Named("UsersProfile".into()));
    }

    #[test]
    fn identical_shapes_share_one_declaration() {
        let docs = [doc! {
            "home": { "city": "a", "zip": 1 },
            "work": { "zip": 2, "city": "b" },
        }];
        let root = infer_from_documents(&docs);
        let types = lower_collections([("people", &root)]);
        assert_eq!(names(&types), ["PeopleHome", "People"]);
        let people = &types[1];
        assert_eq!(people.fields[0].ty, Ty::Named("PeopleHome".into()));
        assert_eq!(people.fields[1].ty, Ty::Named("PeopleHome".into()));
    }

    #[test]
    fn merged_nested_object_is_declared_once() {
        let docs = [doc! { "a": { "x": 1 } }, doc! { "a": { "x": "s" } }];
        let root = infer_from_documents(&docs);
        let types = lower_collections([("things", &root)]);
        assert_eq!(names(&types), ["ThingsA", "Things"]);
        assert_eq!(types[0].fields[0].ty, Ty::Union(vec![Ty::Int, Ty::String]));
    }

    #[test]
    fn arrays_of_objects_are_named_after_the_field() {
        let docs = [doc! { "items": [{ "sku": "a" }, { "sku": "b", "qty": 2 }] }];
        let root = infer_from_documents(&docs);
        let types = lower_collections([("orders", &root)]);
        assert_eq!(names(&types), ["OrdersItems", "Orders"]);
        assert_eq!(types[1].fields[0].ty, Ty::List(Box::new(Ty::Named("OrdersItems".into()))));
        assert_eq!(types[0].fields[1].optionality, Optionality::Optional { nullable: false });
    }

    #[test]
    fn colliding_names_are_disambiguated_across_collections() {
        let a = infer_from_documents(&[doc! { "k": 1 }]);
        let b = infer_from_documents(&[doc! { "k": "s" }]);
        let types = lower_collections([("user_profiles", &a), ("user-profiles", &b)]);
        assert_eq!(names(&types), ["UserProfiles", "UserProfiles2"]);
        assert_eq!(types[1].collection, "user-profiles");
    }

    #[test]
    fn different_shapes_at_colliding_paths_get_suffixes() {
        let docs = [doc! { "a b": { "x": 1 }, "a_b": { "y": 1 } }];
        let root = infer_from_documents(&docs);
        let types = lower_collections([("c", &root)]);
        assert_eq!(names(&types), ["CAB", "CAB2", "C"]);
    }

    #[test]
    fn empty_collection_yields_empty_declaration() {
        let root = infer_from_documents(&Vec::<bson::Document>::new());
        let types = lower_collections([("logs", &root)]);
        assert_eq!(types.len(), 1);
        assert_eq!(types[0].name, "Logs");
        assert!(types[0].fields.is_empty());
    }
}
