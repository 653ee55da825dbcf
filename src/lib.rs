//! Infer Python `TypedDict` models from sampled MongoDB documents.
//!
//! Pipeline: [`sample`] → [`inference`] → [`lower`] (with [`naming`]) →
//! [`codegen`]. [`pipeline`] wires the stages together.
pub mod codegen;
pub mod config;
pub mod error;
pub mod inference;
pub mod ir;
pub mod jq_exec;
pub mod lower;
pub mod naming;
pub mod pipeline;
pub mod report;
pub mod sample;

pub use error::{Error, Result};
