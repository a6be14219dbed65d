//! Newsdesk Broadcast
//!
//! Broadcast items are derived copies of a master story, tagged with the
//! broadcast genre, that follow the lifecycle of their master.
//!
//! # Components
//!
//! - **Validator**: only text or preformatted masters that are not killed,
//!   scheduled or spiked (and are not broadcast items themselves) qualify
//! - **Creator**: builds and stores the broadcast item, copying a fixed set of
//!   master fields once
//! - **Locator**: finds derived items by master id or takes package id
//! - **Synchronizer**: writes status and fills link fields after master events
//! - **Cleaner**: drops rewrite references that no longer hold
//!
//! Fan-out writes are compare-and-swap against the item version and skip
//! items a user has locked. Failures are logged per item and never returned.
//!
//! # Example
//!
//! ```ignore
//! use newsdesk_broadcast::{BroadcastService, BroadcastSettings, CreateBroadcast, SqliteStore};
//!
//! let service = BroadcastService::new(SqliteStore::new(pool), BroadcastSettings::default());
//! let broadcast = service.create(CreateBroadcast::new("master-id")).await?;
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]

pub mod cleaner;
pub mod creator;
pub mod error;
pub mod event;
pub mod genre;
pub mod locator;
pub mod service;
pub mod sqlite;
pub mod store;
pub mod sync;
pub mod validator;

#[cfg(test)]
mod testing;

pub use creator::{CreateBroadcast, COPIED_FIELDS};
pub use error::{BroadcastError, Result};
pub use event::{MasterEvent, SyncStatus};
pub use genre::{BroadcastGenre, ItemKind};
pub use service::{BroadcastService, BroadcastSettings};
pub use sqlite::SqliteStore;
pub use store::{BroadcastQuery, ContentStore, DeskLookup, VocabularyLookup};
pub use sync::SyncReport;
