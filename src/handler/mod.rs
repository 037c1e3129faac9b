//! Request handler module
//!
//! Request dispatch, request dumping and the canned routes.

pub mod dispatcher;
pub mod dump;
pub mod routes;

// Re-export main entry point
pub use dispatcher::{Dispatcher, DispatcherOptions};
pub use dump::DumpSink;
