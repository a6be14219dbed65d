//! Hypermedia links attached to responses.

use serde::{Deserialize, Serialize};

/// Title of links to archive items.
pub const ARCHIVE_TITLE: &str = "Archive";

/// A single link.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Link {
    /// Resource title
    pub title: String,
    /// Relative href
    pub href: String,
}

/// The `_links` object of a response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Links {
    /// Link to the resource itself
    #[serde(rename = "self")]
    pub self_link: Link,
}

/// Links for the archive item `id`.
#[must_use]
pub fn archive_item_links(id: &str) -> Links {
    Links {
        self_link: Link {
            title: ARCHIVE_TITLE.to_string(),
            href: format!("archive/{id}"),
        },
    }
}
