//! HTTP protocol layer module
//!
//! Response builders and header handling shared by the API handlers and the
//! connection layer, independent of any particular endpoint.

pub mod response;

pub use response::{
    apply_common_headers, build_405_response, build_413_response, build_health_response,
    build_json_response, build_options_response,
};
