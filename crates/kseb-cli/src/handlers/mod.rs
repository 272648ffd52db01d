//! Command handlers.
//!
//! Each module exposes an `execute` function called from `main.rs`.

pub mod ask;
pub mod check_config;
pub mod serve;
