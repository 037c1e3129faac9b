//! HTTP protocol layer module
//!
//! Response builders and the CORS policy, kept apart from the dispatch logic.

pub mod cors;
pub mod response;

// Re-export commonly used types
pub use cors::apply_cors_headers;
pub use response::{
    build_500_response, build_empty_response, build_json_response, build_text_response,
};
