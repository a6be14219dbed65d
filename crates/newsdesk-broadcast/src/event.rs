//! Master story lifecycle events and the status text they produce.

use newsdesk_db::StatusReason;

/// Status after a new take was created or the story reopened.
pub const NEW_TAKE_STATUS: &str = "New take created or story reopened.";
/// Status after the master story was rewritten.
pub const REWRITE_STATUS: &str = "Master story re-written.";
/// Status after the master story was updated.
pub const UPDATED_STATUS: &str = "Master Story Updated";
/// Status after the master story was published.
pub const PUBLISHED_STATUS: &str = "Master Story Published";
/// Status after the master story was corrected.
pub const CORRECTED_STATUS: &str = "Master Story Corrected";

/// Phrase identifying a rewrite status on records that predate `status_reason`.
pub const REWRITE_PHRASE: &str = "re-written";

/// A lifecycle event on a master item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MasterEvent {
    /// An item was created as a new take of the master or as its rewrite.
    Create {
        /// Takes package the new item joined
        takes_package_id: Option<String>,
        /// The rewrite item
        rewrite_id: Option<String>,
    },
    /// The master item was saved.
    Update,
    /// The master item was published.
    Publish,
    /// The master item was corrected.
    Correct,
    /// Any other workflow operation; does not change the status.
    Other(String),
}

/// Status text plus the reason recorded next to it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SyncStatus {
    /// Text written to `broadcast.status`
    pub text: &'static str,
    /// Value written to `broadcast.status_reason`
    pub reason: StatusReason,
}

impl MasterEvent {
    /// Build an event from a workflow operation name.
    ///
    /// Takes package and rewrite ids only travel with `create`; they are
    /// ignored for the other operations. Empty ids count as absent.
    #[must_use]
    pub fn parse(operation: &str, takes_package_id: Option<&str>, rewrite_id: Option<&str>) -> Self {
        match operation {
            "create" => Self::Create {
                takes_package_id: non_empty(takes_package_id),
                rewrite_id: non_empty(rewrite_id),
            },
            "update" => Self::Update,
            "publish" => Self::Publish,
            "correct" => Self::Correct,
            other => Self::Other(other.to_string()),
        }
    }

    /// The status this event writes to derived broadcast items, if any.
    ///
    /// A create event with both ids reports the new take.
    #[must_use]
    pub fn status(&self) -> Option<SyncStatus> {
        let (text, reason) = match self {
            Self::Create {
                takes_package_id: Some(_),
                ..
            } => (NEW_TAKE_STATUS, StatusReason::NewTake),
            Self::Create {
                rewrite_id: Some(_),
                ..
            } => (REWRITE_STATUS, StatusReason::Rewrite),
            Self::Create { .. } | Self::Other(_) => return None,
            Self::Update => (UPDATED_STATUS, StatusReason::MasterUpdated),
            Self::Publish => (PUBLISHED_STATUS, StatusReason::MasterPublished),
            Self::Correct => (CORRECTED_STATUS, StatusReason::MasterCorrected),
        };
        Some(SyncStatus { text, reason })
    }

    /// Takes package id carried by the event.
    #[must_use]
    pub fn takes_package_id(&self) -> Option<&str> {
        match self {
            Self::Create {
                takes_package_id, ..
            } => takes_package_id.as_deref(),
            _ => None,
        }
    }

    /// Rewrite id carried by the event.
    #[must_use]
    pub fn rewrite_id(&self) -> Option<&str> {
        match self {
            Self::Create { rewrite_id, .. } => rewrite_id.as_deref(),
            _ => None,
        }
    }
}

fn non_empty(value: Option<&str>) -> Option<String> {
    value.filter(|v| !v.is_empty()).map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        let cases = [
            (
                MasterEvent::parse("create", Some("pkg-1"), None),
                Some(NEW_TAKE_STATUS),
            ),
            (
                MasterEvent::parse("create", None, Some("m2")),
                Some(REWRITE_STATUS),
            ),
            (MasterEvent::parse("create", None, None), None),
            (MasterEvent::Update, Some(UPDATED_STATUS)),
            (MasterEvent::Publish, Some(PUBLISHED_STATUS)),
            (MasterEvent::Correct, Some(CORRECTED_STATUS)),
            (MasterEvent::parse("kill", None, None), None),
        ];

        for (event, expected) in cases {
            assert_eq!(event.status().map(|s| s.text), expected, "{event:?}");
        }
    }

    #[test]
    fn test_takes_wins_over_rewrite() {
        let event = MasterEvent::parse("create", Some("pkg-1"), Some("m2"));
        let status = event.status().expect("create with ids has a status");
        assert_eq!(status.reason, StatusReason::NewTake);
        assert_eq!(event.takes_package_id(), Some("pkg-1"));
        assert_eq!(event.rewrite_id(), Some("m2"));
    }

    #[test]
    fn test_parse_operations() {
        assert_eq!(MasterEvent::parse("update", Some("pkg"), None), MasterEvent::Update);
        assert_eq!(MasterEvent::parse("publish", None, None), MasterEvent::Publish);
        assert_eq!(MasterEvent::parse("correct", None, None), MasterEvent::Correct);
        assert_eq!(
            MasterEvent::parse("spike", None, None),
            MasterEvent::Other("spike".to_string())
        );
    }

    #[test]
    fn test_empty_ids_are_absent() {
        let event = MasterEvent::parse("create", Some(""), Some(""));
        assert_eq!(event.takes_package_id(), None);
        assert_eq!(event.rewrite_id(), None);
        assert!(event.status().is_none());
    }

    #[test]
    fn test_rewrite_status_contains_phrase() {
        assert!(REWRITE_STATUS.contains(REWRITE_PHRASE));
        for other in [NEW_TAKE_STATUS, UPDATED_STATUS, PUBLISHED_STATUS, CORRECTED_STATUS] {
            assert!(!other.contains(REWRITE_PHRASE));
        }
    }
}
