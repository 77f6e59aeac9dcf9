//! Routing module
//!
//! Maps request paths onto the API's endpoints and reports which methods
//! each endpoint accepts.

mod matcher;

pub use matcher::{match_endpoint, Endpoint};
