//! Newsdesk Core - Foundation crate for the newsdesk content services.
//!
//! This crate provides the shared vocabulary that the storage layer, the
//! broadcast synchronization core and the request surface all depend on.
//!
//! # Modules
//!
//! - [`error`] - Central error types using thiserror
//! - [`config`] - TOML-based configuration with XDG paths and env overrides
//! - [`types`] - Content item enums (`ItemType`, `ItemState`) and the `ItemId` newtype
//!
//! # Example
//!
//! ```rust
//! use newsdesk_core::{AppConfig, ItemState, ItemType};
//!
//! let config = AppConfig::default();
//! assert_eq!(config.broadcast.genre_value, "Broadcast Script");
//!
//! assert!(ItemType::Text.is_broadcastable());
//! assert!(ItemState::Spiked.blocks_broadcast());
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]

pub mod config;
pub mod error;
pub mod types;

// Re-export commonly used types
pub use config::{AppConfig, BroadcastConfig, DatabaseConfig, LoggingConfig};
pub use error::{ConfigError, ConfigResult, NewsdeskError, Result};
pub use types::{ItemId, ItemState, ItemType};
