//! Entity normalization API
//!
//! Turns one fetched entity record into either an RDF-style triple
//! document or a dual-table projection. The remote collaborators
//! (entity fetch, SPARQL label query) are injected as trait objects;
//! HTTP implementations live in `wikigraph-remote`.

pub mod error;
pub mod pipeline;

pub use error::{ApiError, Result};
pub use pipeline::{EntityApi, EntityFetch, TableOutput};
