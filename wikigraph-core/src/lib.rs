//! Core data model and pure transforms for the wikigraph entity pipeline
//!
//! This crate holds everything that can be computed without I/O:
//!
//! - Deserialization of raw wikibase-style entity records ([`model`])
//! - Typed value decoding and display rendering ([`value`])
//! - Claim admissibility and rank selection ([`filter`])
//! - Triple-set and table output types with their serialization ([`output`])
//!
//! Label resolution, persistence and the HTTP surface live in the
//! `wikigraph-labels`, `wikigraph-remote`, `wikigraph-api` and
//! `wikigraph-server` crates.

pub mod error;
pub mod filter;
pub mod model;
pub mod output;
pub mod value;

pub use error::RenderError;
pub use filter::{filter_claims, select_ranked};
pub use model::{Claim, ClaimMap, DataValue, EntityRecord, LangValue, Rank, Snak};
pub use output::{join_rendered, join_strings, Table, TripleSet, UNKNOWN_VALUE};
pub use value::{is_entity_ref_datatype, render, TypedValue};
