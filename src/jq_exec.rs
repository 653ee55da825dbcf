//! jq pre-filtering of file input, so one file can yield many documents.
use jaq_core::{compile::Undefined, load, Compiler, Ctx, RcIter};
use jaq_json::Val;
use serde_json::Value;
use crate::error::SampleError;

/// Run `filter_src` against `input`; every output becomes one JSON value.
pub fn filter_documents(filter_src: &str, input: &Value) -> Result<Vec<Value>, SampleError> {
    let loader = load::Loader::new(jaq_std::defs().chain(jaq_json::defs()));
    let arena = load::Arena::default();
    let program = load::File { code: filter_src, path: () };

    let modules = loader
        .load(&arena, program)
        .map_err(parse_errors)?;
    let filter = Compiler::default()
        .with_funs(jaq_std::funs().chain(jaq_json::funs()))
        .compile(modules)
        .map_err(undefined_errors)?;

    let inputs = RcIter::new(core::iter::empty());
    let outputs = filter.run((Ctx::new([], &inputs), Val::from(input.clone())));

    let mut docs = Vec::new();
    for item in outputs {
        let val = item.map_err(|e| SampleError::Jq(format!("{e:?}")))?;
        // Val prints as JSON text
        let value = serde_json::from_str(&val.to_string())
            .map_err(|e| SampleError::Jq(format!("filter produced invalid JSON: {e}")))?;
        docs.push(value);
    }
    Ok(docs)
}

fn parse_errors(errs: Vec<(load::File<&str, ()>, load::Error<&str>)>) -> SampleError {
    let message = errs.iter()
        .map(|(file, err)| format!("parse error: {err:?} in `{}`", file.code))
        .collect::<Vec<_>>()
        .join("\n");
    SampleError::Jq(message)
}

fn undefined_errors(errs: Vec<(load::File<&str, ()>, Vec<(&str, Undefined)>)>) -> SampleError {
    let message = errs.iter()
        .flat_map(|(file, list)| {
            list.iter().map(move |(name, undef)| format!("undefined `{name}`: {undef:?} in `{}`", file.code))
        })
        .collect::<Vec<_>>()
        .join("\n");
    SampleError::Jq(message)
}
