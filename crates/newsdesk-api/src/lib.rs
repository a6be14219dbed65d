//! Newsdesk request surface
//!
//! Thin command layer over `newsdesk-broadcast`: the `archive_broadcast`
//! POST handler, the two workflow hooks and tracing setup. Core logic lives
//! in the `crates/` libraries.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]

pub mod commands;
pub mod error;
pub mod hateoas;
pub mod state;

pub use error::CommandError;
pub use state::AppState;

/// Endpoint name of the broadcast resource.
pub const ARCHIVE_BROADCAST_NAME: &str = "archive_broadcast";
/// Url rule of the broadcast resource.
pub const ARCHIVE_BROADCAST_URL: &str = "archive/<item_id>/broadcast";
/// Methods accepted by the broadcast resource.
pub const ARCHIVE_BROADCAST_METHODS: [&str; 1] = ["POST"];
/// Privilege required to POST to the broadcast resource.
pub const ARCHIVE_BROADCAST_PRIVILEGE: &str = ARCHIVE_BROADCAST_NAME;

/// Concrete url of the broadcast resource for `item_id`.
#[must_use]
pub fn broadcast_url(item_id: &str) -> String {
    ARCHIVE_BROADCAST_URL.replace("<item_id>", item_id)
}

/// Initialize the tracing subscriber.
///
/// `RUST_LOG` wins over `default_filter`. Returns `false` when a global
/// subscriber was already installed.
pub fn init_tracing(default_filter: &str) -> bool {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(true))
        .with(filter)
        .try_init()
        .is_ok()
}
