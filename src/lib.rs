//! thoughtbook: a small social-network REST API.
//!
//! Users, their thoughts and one-directional friend lists, served over
//! HTTP/1.1 with hyper and stored through a pluggable [`store::DocumentStore`].

pub mod api;
pub mod config;
pub mod http;
pub mod logger;
pub mod model;
pub mod routing;
pub mod server;
pub mod store;
