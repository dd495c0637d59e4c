//! Core types shared across confnode facilities
//!
//! - **Correlation types**: RequestId, TraceId, RequestContext carried by an edit call
//! - **Schema constants**: Canonical field keys and event names for structured logs

pub mod correlation;
pub mod schema;

pub use correlation::{RequestContext, RequestId, TraceId};
