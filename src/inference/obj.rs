use indexmap::IndexMap;
use super::{unify, TypeTag};

/// One object level: every field observed across the folded objects.
///
/// Fields keep first-observation order. Equality is structural: two nodes are
/// equal when they have the same fields with the same types and the same
/// optionality class, whatever the raw counts and field order are.
#[derive(Clone, Debug, Default)]
pub struct SchemaNode {
    pub fields: IndexMap<String, FieldStats>,
    /// Objects folded into this node.
    pub observed: u64,
}

#[derive(Clone, Debug)]
pub struct FieldStats {
    pub ty: TypeTag,
    /// Objects in which the field was present (null included).
    pub present: u64,
    /// Objects in which the field was present but null.
    pub nulls: u64,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Optionality {
    /// Present in every object, never null.
    Required,
    /// Present in every object, sometimes null.
    RequiredNullable,
    /// Missing from at least one object.
    Optional { nullable: bool },
}

impl Optionality {
    pub fn is_optional(self) -> bool { matches!(self, Optionality::Optional { .. }) }

    pub fn is_nullable(self) -> bool {
        matches!(self, Optionality::RequiredNullable | Optionality::Optional { nullable: true })
    }
}

impl FieldStats {
    pub fn optionality(&self, observed: u64) -> Optionality {
        let nullable = self.nulls > 0;
        if self.present < observed {
            Optionality::Optional { nullable }
        } else if nullable {
            Optionality::RequiredNullable
        } else {
            Optionality::Required
        }
    }
}

impl SchemaNode {
    /// A node describing exactly one object.
    pub fn single() -> Self {
        Self { fields: IndexMap::new(), observed: 1 }
    }

    /// Record one field of a single-object node.
    pub fn observe_field(&mut self, name: &str, ty: TypeTag) {
        let nulls = u64::from(ty == TypeTag::Null);
        match self.fields.get_mut(name) {
            // duplicate keys inside one document: keep presence at one
            Some(existing) => {
                existing.ty = unify(&existing.ty, &ty);
                existing.nulls = existing.nulls.max(nulls);
            }
            None => {
                self.fields.insert(name.to_owned(), FieldStats { ty, present: 1, nulls });
            }
        }
    }

    /// Fold `other` into `self`: shared fields are unified with counts summed,
    /// one-sided fields are carried through unchanged.
    pub fn absorb(&mut self, other: SchemaNode) {
        self.observed += other.observed;
        for (name, theirs) in other.fields {
            match self.fields.get_mut(&name) {
                Some(ours) => {
                    ours.ty = unify(&ours.ty, &theirs.ty);
                    ours.present += theirs.present;
                    ours.nulls += theirs.nulls;
                }
                None => {
                    self.fields.insert(name, theirs);
                }
            }
        }
    }

    pub fn merge(a: &Self, b: &Self) -> Self {
        let mut out = a.clone();
        out.absorb(b.clone());
        out
    }
}

impl PartialEq for SchemaNode {
    fn eq(&self, other: &Self) -> bool {
        self.fields.len() == other.fields.len()
            && self.fields.iter().all(|(name, ours)| {
                other.fields.get(name).is_some_and(|theirs| {
                    ours.ty == theirs.ty
                        && ours.optionality(self.observed) == theirs.optionality(other.observed)
                })
            })
    }
}

impl Eq for SchemaNode {}

#[cfg(test)]
mod tests {
    use super::*;

    fn optionality(node: &SchemaNode, field: &str) -> Option<Optionality> {
        node.fields.get(field).map(|f| f.optionality(node.observed))
    }

    fn node(fields: &[(&str, TypeTag)]) -> SchemaNode {
        let mut n = SchemaNode::single();
        for (name, ty) in fields {
            n.observe_field(name, ty.clone());
        }
        n
    }

    #[test]
    fn merge_sums_counts_and_carries_one_sided_fields() {
        let a = node(&[("x", TypeTag::Int), ("y", TypeTag::Null)]);
        let b = node(&[("x", TypeTag::Float), ("z", TypeTag::String)]);
        let m = SchemaNode::merge(&a, &b);

        assert_eq!(m.observed, 2);
        assert_eq!(m.fields["x"].ty, TypeTag::Float);
        assert_eq!(m.fields["x"].present, 2);
        assert_eq!(m.fields["y"].nulls, 1);
        assert_eq!(optionality(&m, "x"), Some(Optionality::Required));
        assert_eq!(optionality(&m, "y"), Some(Optionality::Optional { nullable: true }));
        assert_eq!(optionality(&m, "z"), Some(Optionality::Optional { nullable: false }));
        assert_eq!(optionality(&m, "missing"), None);
    }

    #[test]
    fn equality_ignores_counts_and_order() {
        let a = node(&[("x", TypeTag::Int), ("y", TypeTag::Bool)]);
        let b = node(&[("y", TypeTag::Bool), ("x", TypeTag::Int)]);
        assert_eq!(a, b);
        assert_eq!(SchemaNode::merge(&a, &a), a);

        let c = SchemaNode::merge(&a, &node(&[("x", TypeTag::Int)]));
        assert_ne!(a, c, "y became optional");
    }

    #[test]
    fn duplicate_keys_count_once() {
        let mut n = SchemaNode::single();
        n.observe_field("k", TypeTag::Int);
        n.observe_field("k", TypeTag::Null);
        assert_eq!(n.fields["k"].present, 1);
        assert_eq!(optionality(&n, "k"), Some(Optionality::RequiredNullable));
    }
}
