//! Shared utilities

pub mod music;
pub mod time;
