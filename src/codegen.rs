//! Python `TypedDict` emission (functional syntax, string keys).
use std::fmt::Write as _;
use crate::inference::Optionality;
use crate::ir::{Field, GeneratedType, Ty};

pub const HEADER: &str = "# This file was auto-generated by mongo-typegen. Do not edit manually.";

const IMPORTS: &str = "\
from datetime import datetime
from typing import Any, List, Optional, TypedDict, Union

from bson.objectid import ObjectId

try:
    from typing import NotRequired
except ImportError:
    from typing_extensions import NotRequired";

/// Names bound by `IMPORTS`; a declaration must never rebind one.
pub const IMPORTED_NAMES: &[&str] = &[
    "datetime", "Any", "List", "Optional", "TypedDict", "Union", "ObjectId", "NotRequired",
];

/// Accumulates a generated Python module.
#[derive(Debug)]
pub struct Codegen {
    out: String,
}

impl Codegen {
    pub fn new() -> Self {
        let mut out = String::new();
        out.push_str(HEADER);
        out.push_str("\n\n");
        out.push_str(IMPORTS);
        out.push('\n');
        Self { out }
    }

    /// Declarations must arrive nested-before-parent.
    pub fn emit(&mut self, ty: &GeneratedType) {
        self.out.push_str("\n\n");
        self.out.push_str(&declaration(ty));
        self.out.push('\n');
    }

    pub fn into_string(self) -> String { self.out }
}

pub fn render_module(types: &[GeneratedType]) -> String {
    let mut cg = Codegen::new();
    for ty in types {
        cg.emit(ty);
    }
    cg.into_string()
}

/// `Name = TypedDict("Name", {...})`
pub fn declaration(ty: &GeneratedType) -> String {
    let name = &ty.name;
    if ty.fields.is_empty() {
        return format!("{name} = TypedDict(\"{name}\", {{}})");
    }
    let body = ty.fields.iter()
        .map(|f| format!("    {}: {}", py_str_literal(&f.name), annotation(f)))
        .collect::<Vec<_>>()
        .join(",\n");
    format!("{name} = TypedDict(\"{name}\", {{\n{body}\n}})")
}

/// Field annotation with the optionality wrappers applied.
pub fn annotation(field: &Field) -> String {
    let base = type_expr(&field.ty);
    // an always-null field is already `None`; don't wrap it in Optional
    let nullable = field.optionality.is_nullable() && field.ty != Ty::Null;
    let inner = if nullable { format!("Optional[{base}]") } else { base };
    match field.optionality {
        Optionality::Optional { .. } => format!("NotRequired[{inner}]"),
        Optionality::Required | Optionality::RequiredNullable => inner,
    }
}

pub fn type_expr(ty: &Ty) -> String {
    let scalar = match ty {
        Ty::Unknown => "Any",
        Ty::Null => "None",
        Ty::Bool => "bool",
        Ty::Int => "int",
        Ty::Float => "float",
        Ty::String => "str",
        Ty::Date => "datetime",
        Ty::Binary => "bytes",
        Ty::ObjectId => "ObjectId",
        Ty::List(item) => return format!("List[{}]", type_expr(item)),
        Ty::Named(name) => return name.clone(),
        Ty::Union(members) => {
            let members = members.iter().map(type_expr).collect::<Vec<_>>();
            return format!("Union[{}]", members.join(", "));
        }
    };
    scalar.to_owned()
}

/// Python `repr()` of a string: any key survives verbatim.
pub fn py_str_literal(s: &str) -> String {
    let quote = if s.contains('\'') && !s.contains('"') { '"' } else { '\'' };
    let mut out = String::with_capacity(s.len() + 2);
    out.push(quote);
    for c in s.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c if c == quote => {
                out.push('\\');
                out.push(c);
            }
            c if c.is_control() => {
                let _ = write!(out, "\\x{:02x}", c as u32);
            }
            c => out.push(c),
        }
    }
    out.push(quote);
    out
}
