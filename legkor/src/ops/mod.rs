//! Caller-facing operations, one impl block per concern.

mod list;
mod rolling;
mod sync;
