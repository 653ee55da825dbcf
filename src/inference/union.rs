use super::{unify, Kind, TypeTag};

/// Join two tags of which at least one is a union or whose kinds differ.
///
/// Each incoming member is unified into the member of the same kind when one
/// exists, otherwise inserted at its canonical position.
pub(super) fn join(a: &TypeTag, b: &TypeTag) -> TypeTag {
    let mut members: Vec<TypeTag> = Vec::new();
    for tag in a.members().iter().chain(b.members()) {
        insert(&mut members, tag);
    }
    match members.len() {
        0 => TypeTag::Unknown,
        1 => members.remove(0),
        _ => TypeTag::Union(members),
    }
}

fn insert(members: &mut Vec<TypeTag>, tag: &TypeTag) {
    let kind = tag.kind();
    if matches!(kind, Kind::Unknown | Kind::Null) {
        return;
    }
    match members.binary_search_by_key(&kind, TypeTag::kind) {
        Ok(i) => members[i] = unify(&members[i], tag),
        Err(i) => members.insert(i, tag.clone()),
    }
}
