//! Wire contract of the edit proxy.
//!
//! Shared by the proxy service and the submission client so both sides
//! agree on field names and status bodies.

pub mod routes;
pub mod schema;

pub use routes::*;
pub use schema::*;
