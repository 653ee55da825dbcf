// Resolved declarations for codegen. No bson or TypeTag trees here: nested
// objects are referenced by declaration name.

use crate::inference::{Optionality, SchemaNode};

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Ty {
    Unknown,
    Null,
    Bool,
    Int,
    Float,
    String,
    Date,
    Binary,
    ObjectId,
    List(Box<Ty>),
    Named(String),           // reference to another GeneratedType
    Union(Vec<Ty>),          // canonical member order, never nested
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Field {
    pub name: String,        // verbatim document key
    pub ty: Ty,
    pub optionality: Optionality,
}

/// A named, renderable object type.
#[derive(Debug, Clone)]
pub struct GeneratedType {
    pub name: String,
    /// Collection whose sample first produced this shape.
    pub collection: String,
    pub schema: SchemaNode,
    pub fields: Vec<Field>,  // first-observation order
}
