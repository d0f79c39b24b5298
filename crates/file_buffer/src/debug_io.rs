//! Structured tracing for handle and mapping operations.
//!
//! Every helper is `#[inline]` and compiles to a no-op when the `tracing`
//! feature is disabled, so call sites never need their own `cfg` gates.
//!
//! | Target          | Events                                              |
//! |-----------------|-----------------------------------------------------|
//! | `filebuf::io`   | open, close, end-of-file retry, truncate, flush     |
//! | `filebuf::map`  | mapping creation, view creation, view flush         |

mod mapping;
mod operations;

pub use mapping::{trace_map_open, trace_map_view, trace_view_flush};
pub use operations::{trace_close, trace_eof_retry, trace_flush, trace_open, trace_truncate};
