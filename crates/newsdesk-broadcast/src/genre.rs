//! The broadcast genre and the master/broadcast split.
//!
//! Every "is this a broadcast item" decision goes through [`BroadcastGenre`].

use newsdesk_db::ContentItem;

/// An archive item seen as either a master or a broadcast item.
#[derive(Debug, Clone, Copy)]
pub enum ItemKind<'a> {
    /// A regular item that broadcast items may be derived from
    Master(&'a ContentItem),
    /// An item carrying the broadcast genre
    Broadcast(&'a ContentItem),
}

impl<'a> ItemKind<'a> {
    /// The item, if it is a master item.
    #[must_use]
    pub fn master(self) -> Option<&'a ContentItem> {
        match self {
            Self::Master(item) => Some(item),
            Self::Broadcast(_) => None,
        }
    }
}

/// The genre value that marks broadcast items.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BroadcastGenre {
    value: String,
}

impl BroadcastGenre {
    /// Create a genre marker for `value`.
    pub fn new(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
        }
    }

    /// The genre value.
    #[must_use]
    pub fn value(&self) -> &str {
        &self.value
    }

    /// Classify an item.
    #[must_use]
    pub fn classify<'a>(&self, item: &'a ContentItem) -> ItemKind<'a> {
        if item.has_genre(&self.value) {
            ItemKind::Broadcast(item)
        } else {
            ItemKind::Master(item)
        }
    }

    /// Whether the item carries this genre.
    #[must_use]
    pub fn is_broadcast(&self, item: &ContentItem) -> bool {
        matches!(self.classify(item), ItemKind::Broadcast(_))
    }
}

impl Default for BroadcastGenre {
    fn default() -> Self {
        Self::new(newsdesk_core::BroadcastConfig::default().genre_value)
    }
}
