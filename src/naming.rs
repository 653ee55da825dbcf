//! Declaration names: PascalCase from collection and field names, made
//! unique per run with a numeric suffix.
use std::collections::HashSet;
use once_cell::sync::Lazy;
use regex::Regex;
use crate::codegen::IMPORTED_NAMES;

static WORD: Lazy<Regex> = Lazy::new(|| Regex::new(r"[A-Za-z0-9]+").expect("word pattern"));

/// Python keywords a PascalCase name can collide with.
const RESERVED: &[&str] = &["False", "None", "True"];

/// Capitalise each alphanumeric word and drop everything else.
///
/// `"user_profiles"` → `"UserProfiles"`, `"full name"` → `"FullName"`,
/// `"createdAt"` → `"CreatedAt"`.
pub fn to_pascal_case(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for word in WORD.find_iter(raw) {
        let mut chars = word.as_str().chars();
        if let Some(first) = chars.next() {
            out.extend(first.to_uppercase());
            out.push_str(chars.as_str());
        }
    }
    out
}

/// Name for an object reached through `field` of the declaration `owner`.
pub fn nested_name(owner: &str, field: &str) -> String {
    let suffix = to_pascal_case(field);
    if suffix.is_empty() {
        format!("{owner}Field")
    } else {
        format!("{owner}{suffix}")
    }
}

/// Coerce a candidate into a valid identifier.
fn identifier(candidate: &str) -> String {
    let mut name = if candidate.is_empty() { "Model".to_owned() } else { candidate.to_owned() };
    if name.starts_with(|c: char| c.is_ascii_digit()) {
        name.insert(0, '_');
    }
    if RESERVED.contains(&name.as_str()) {
        name.push('_');
    }
    name
}

/// Names already handed out during one run. Starts out holding the names
/// the generated module imports.
#[derive(Debug)]
pub struct NameTable {
    taken: HashSet<String>,
}

impl Default for NameTable {
    fn default() -> Self {
        let taken = IMPORTED_NAMES.iter().map(|name| (*name).to_owned()).collect();
        Self { taken }
    }
}

impl NameTable {
    pub fn new() -> Self { Self::default() }

    /// Reserve `candidate`, or `candidate2`, `candidate3`, … if taken.
    pub fn claim(&mut self, candidate: &str) -> String {
        let base = identifier(candidate);
        let mut name = base.clone();
        let mut n = 2u32;
        while self.taken.contains(&name) {
            name = format!("{base}{n}");
            n += 1;
        }
        if name != base {
            tracing::debug!(candidate = %base, assigned = %name, "declaration name collision");
        }
        self.taken.insert(name.clone());
        name
    }

    pub fn release(&mut self, name: &str) {
        self.taken.remove(name);
    }

}
