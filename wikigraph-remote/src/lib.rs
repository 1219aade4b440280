//! HTTP implementations of the remote collaborators
//!
//! Two clients against the knowledge base: entity data over its REST
//! entity endpoint and label lookups over its SPARQL query endpoint.
//! Both are single-attempt; retry policy is out of scope.

pub mod entity;
pub mod sparql;

pub use entity::HttpEntityClient;
pub use sparql::{HttpSparqlClient, DEFAULT_LABEL_QUERY};
