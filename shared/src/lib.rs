use serde::{Deserialize, Serialize};

/// Lifecycle state of an open document, as last reported by the storage
/// layer. The UI polls this to decide whether to allow edits, show a
/// conflict sheet, or surface a save failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DocumentState {
    /// Single authoritative on-disk version; edits flow normally
    Normal,
    /// The storage layer is temporarily rejecting edits
    EditingDisabled,
    /// Competing on-disk versions exist and need a user decision
    InConflict,
    /// The most recent save attempt failed
    SavingError,
    /// A long-running load or save is underway
    Progress,
}

/// One competing on-disk revision of a document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConflictVersionSummary {
    pub version_id: String,
    /// Human-readable name of the device the revision came from
    pub device: String,
    /// Modification timestamp (RFC 3339)
    pub modified_at: String,
}

/// Competing revisions that originated from a single device, sorted by
/// modification time ascending.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConflictGroup {
    pub device: String,
    pub versions: Vec<ConflictVersionSummary>,
}

impl ConflictGroup {
    /// Whether the UI should render this group as a drill-in summary
    /// rather than a directly selectable row.
    pub fn requires_drill_in(&self) -> bool {
        self.versions.len() > 1
    }
}

/// Everything the conflict sheet needs to render for one document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConflictPresentation {
    pub document_id: String,
    pub groups: Vec<ConflictGroup>,
}

impl ConflictPresentation {
    /// Total number of competing versions across all groups.
    pub fn version_count(&self) -> usize {
        self.groups.iter().map(|g| g.versions.len()).sum()
    }
}

/// The user's decision for a detected conflict. Resolution is never
/// automatic; one of these is always relayed from the UI.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ConflictChoice {
    /// Discard in-memory changes and reload the local on-disk copy
    Revert,
    /// Make the named competing version authoritative
    Replace { version_id: String },
}

/// Row in the document picker.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocumentSummary {
    pub document_id: String,
    pub baby_name: String,
    pub baby_emoji: String,
    /// Whether the picker row should lead with the emoji instead of the name
    pub prefers_emoji: bool,
}

impl DocumentSummary {
    /// Title the picker row shows for this document.
    pub fn display_title(&self) -> String {
        if self.prefers_emoji && !self.baby_emoji.is_empty() {
            self.baby_emoji.clone()
        } else if !self.baby_name.is_empty() {
            self.baby_name.clone()
        } else {
            self.document_id.clone()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_requires_drill_in() {
        let version = ConflictVersionSummary {
            version_id: "v-1".to_string(),
            device: "Kitchen iPad".to_string(),
            modified_at: "2024-01-15T10:30:00Z".to_string(),
        };
        let single = ConflictGroup {
            device: "Kitchen iPad".to_string(),
            versions: vec![version.clone()],
        };
        assert!(!single.requires_drill_in());

        let mut second = version.clone();
        second.version_id = "v-2".to_string();
        let multiple = ConflictGroup {
            device: "Kitchen iPad".to_string(),
            versions: vec![version, second],
        };
        assert!(multiple.requires_drill_in());
    }

    #[test]
    fn test_presentation_version_count() {
        let presentation = ConflictPresentation {
            document_id: "emma".to_string(),
            groups: vec![
                ConflictGroup {
                    device: "Phone".to_string(),
                    versions: vec![
                        ConflictVersionSummary {
                            version_id: "v-1".to_string(),
                            device: "Phone".to_string(),
                            modified_at: "2024-01-15T10:30:00Z".to_string(),
                        },
                        ConflictVersionSummary {
                            version_id: "v-2".to_string(),
                            device: "Phone".to_string(),
                            modified_at: "2024-01-15T11:00:00Z".to_string(),
                        },
                    ],
                },
                ConflictGroup {
                    device: "Tablet".to_string(),
                    versions: vec![ConflictVersionSummary {
                        version_id: "v-3".to_string(),
                        device: "Tablet".to_string(),
                        modified_at: "2024-01-15T09:00:00Z".to_string(),
                    }],
                },
            ],
        };
        assert_eq!(presentation.version_count(), 3);
    }

    #[test]
    fn test_conflict_choice_serialization() {
        let replace = ConflictChoice::Replace {
            version_id: "v-9".to_string(),
        };
        let json = serde_json::to_string(&replace).unwrap();
        let back: ConflictChoice = serde_json::from_str(&json).unwrap();
        assert_eq!(back, replace);

        let revert: ConflictChoice = serde_json::from_str("\"Revert\"").unwrap();
        assert_eq!(revert, ConflictChoice::Revert);
    }

    #[test]
    fn test_document_summary_display_title() {
        let mut summary = DocumentSummary {
            document_id: "emma".to_string(),
            baby_name: "Emma".to_string(),
            baby_emoji: "🐣".to_string(),
            prefers_emoji: true,
        };
        assert_eq!(summary.display_title(), "🐣");

        summary.prefers_emoji = false;
        assert_eq!(summary.display_title(), "Emma");

        summary.baby_name = String::new();
        assert_eq!(summary.display_title(), "emma");
    }
}
