//! Structural type inference over sampled documents.
//!
//! Every document is classified into the closed `TypeTag` lattice at the
//! boundary and folded into a single accumulator with the join `unify`.
//!
//! Lattice laws:
//! - `unify` is associative, commutative and idempotent → sample order never
//!   changes the result.
//! - `Unknown` is the identity element.
//! - `Null` is absorbed at the type level; nullability is carried by the
//!   per-field null count of the enclosing `SchemaNode`.
//! - A `Union` holds at most one member per `Kind`, in `Kind` order.
pub mod classify;
pub mod obj;
pub mod union;

use bson::Document;

pub use classify::{classify, classify_document};
pub use obj::{FieldStats, Optionality, SchemaNode};

// ------------------------------- Lattice ---------------------------------- //

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TypeTag {
    /// Nothing observed at this position (empty array, unrecognised scalar).
    Unknown,
    Null,
    Bool,
    Int,
    Float,
    String,
    Date,
    Binary,
    ObjectId,
    Array(Box<TypeTag>),
    Object(SchemaNode),
    /// Genuinely incompatible top-level shapes. Never nested, never empty.
    Union(Vec<TypeTag>),
}

/// Compatibility class of a tag. Two tags of the same kind always unify
/// without producing a `Union`; the derived order is the canonical member
/// order inside a `Union`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Kind {
    Unknown,
    Null,
    Bool,
    Number,
    String,
    Date,
    Binary,
    ObjectId,
    Array,
    Object,
    Union,
}

impl TypeTag {
    pub fn kind(&self) -> Kind {
        match self {
            TypeTag::Unknown => Kind::Unknown,
            TypeTag::Null => Kind::Null,
            TypeTag::Bool => Kind::Bool,
            TypeTag::Int | TypeTag::Float => Kind::Number,
            TypeTag::String => Kind::String,
            TypeTag::Date => Kind::Date,
            TypeTag::Binary => Kind::Binary,
            TypeTag::ObjectId => Kind::ObjectId,
            TypeTag::Array(_) => Kind::Array,
            TypeTag::Object(_) => Kind::Object,
            TypeTag::Union(_) => Kind::Union,
        }
    }

    pub fn array_of(element: TypeTag) -> Self {
        TypeTag::Array(Box::new(element))
    }

    /// Members of a union, or the tag itself.
    pub fn members(&self) -> &[TypeTag] {
        match self {
            TypeTag::Union(members) => members,
            other => std::slice::from_ref(other),
        }
    }
}

// -------------------------------- Join (⊔) -------------------------------- //

pub fn unify(a: &TypeTag, b: &TypeTag) -> TypeTag {
    use TypeTag as T;
    match (a, b) {
        (T::Unknown, x) | (x, T::Unknown) => x.clone(),
        (T::Null, x) | (x, T::Null) => x.clone(),
        (T::Int, T::Float) | (T::Float, T::Int) => T::Float,
        (T::Array(x), T::Array(y)) => T::array_of(unify(x, y)),
        (T::Object(x), T::Object(y)) => T::Object(SchemaNode::merge(x, y)),
        (T::Union(_), _) | (_, T::Union(_)) => union::join(a, b),
        (x, y) if x == y => x.clone(),
        _ => union::join(a, b),
    }
}

// ------------------------------- Front API -------------------------------- //

/// Accumulates one collection's sample into a single root `SchemaNode`.
///
/// Owned by exactly one run; collections never share a builder.
#[derive(Debug, Default)]
pub struct SchemaBuilder {
    root: SchemaNode,
}

impl SchemaBuilder {
    pub fn new() -> Self { Self::default() }

    pub fn observe(&mut self, doc: &Document) {
        self.root.absorb(classify_document(doc));
    }

    /// Documents folded in so far.
    pub fn documents(&self) -> u64 { self.root.observed }

    pub fn finish(self) -> SchemaNode { self.root }
}

pub fn infer_from_documents<'a, I>(docs: I) -> SchemaNode
where
    I: IntoIterator<Item = &'a Document>,
{
    let mut builder = SchemaBuilder::new();
    for doc in docs {
        builder.observe(doc);
    }
    builder.finish()
}

// ------------------------------- Tests ------------------------------------ //
