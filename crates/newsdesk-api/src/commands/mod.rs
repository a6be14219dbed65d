//! Command handlers.

pub mod broadcast;
