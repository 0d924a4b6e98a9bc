//! Request middleware.
//!
//! Purpose: request lifecycle concerns that wrap every route, currently the
//! trace identifier scope and response header.

pub mod trace;

pub use trace::Trace;
