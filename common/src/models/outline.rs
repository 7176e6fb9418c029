use serde::{Deserialize, Serialize};
use strum::{Display, EnumString, VariantNames};

use crate::constants::REVIEWERS;

/// Closed set of section-type labels offered by the outline form
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString, VariantNames,
)]
pub enum SectionType {
    #[serde(rename = "Table of Contents")]
    #[strum(serialize = "Table of Contents")]
    TableOfContents,
    #[serde(rename = "Executive Summary")]
    #[strum(serialize = "Executive Summary")]
    ExecutiveSummary,
    #[serde(rename = "Technical Approach")]
    #[strum(serialize = "Technical Approach")]
    TechnicalApproach,
    Design,
    Capabilities,
    #[serde(rename = "Focus Document")]
    #[strum(serialize = "Focus Document")]
    FocusDocument,
    Narrative,
}

/// Row status. Rows typically move Pending -> In-Progress -> Completed, but
/// any status may be set directly through the edit form.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    VariantNames,
    Default,
)]
pub enum OutlineStatus {
    #[default]
    Pending,
    #[serde(rename = "In-Progress")]
    #[strum(serialize = "In-Progress")]
    InProgress,
    Completed,
}

/// Per-column display toggles for the outline table. Session-only state,
/// never persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColumnVisibility {
    pub section_type: bool,
    pub status: bool,
    pub target: bool,
    pub limit: bool,
    pub reviewer: bool,
}

impl Default for ColumnVisibility {
    fn default() -> Self {
        // the limit column starts hidden
        Self {
            section_type: true,
            status: true,
            target: true,
            limit: false,
            reviewer: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("Invalid reviewer. Reviewers must be one of: Assim, Bini, Mami.")]
pub struct InvalidReviewer;

/// The backend accepts any reviewer string, the client holds the line
pub fn validate_reviewer(reviewer: &str) -> Result<(), InvalidReviewer> {
    if REVIEWERS.contains(&reviewer) {
        Ok(())
    } else {
        Err(InvalidReviewer)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Outline {
    pub id: String,
    pub header: String,
    pub section_type: SectionType,
    pub status: OutlineStatus,
    pub target: i64,
    pub limit: i64,
    pub reviewer: String,
    /// Assigned by the backend on some deployments; client-side ordering does
    /// not write it back
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub order: Option<i64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OutlineCreateRequest {
    pub header: String,
    pub section_type: SectionType,
    pub status: OutlineStatus,
    pub target: i64,
    pub limit: i64,
    pub reviewer: String,
}

/// Set wanted field(s) to Some to patch those parts of the outline
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OutlineUpdateRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub header: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub section_type: Option<SectionType>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<OutlineStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reviewer: Option<String>,
}

impl Outline {
    /// Merge a patch into this outline, the way the edit form applies a
    /// confirmed update locally
    pub fn apply(&mut self, patch: &OutlineUpdateRequest) {
        if let Some(header) = &patch.header {
            self.header = header.clone();
        }
        if let Some(section_type) = patch.section_type {
            self.section_type = section_type;
        }
        if let Some(status) = patch.status {
            self.status = status;
        }
        if let Some(target) = patch.target {
            self.target = target;
        }
        if let Some(limit) = patch.limit {
            self.limit = limit;
        }
        if let Some(reviewer) = &patch.reviewer {
            self.reviewer = reviewer.clone();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wire_names_round_trip() {
        let outline = Outline {
            id: "o1".to_string(),
            header: "Intro".to_string(),
            section_type: SectionType::TableOfContents,
            status: OutlineStatus::InProgress,
            target: 5,
            limit: 10,
            reviewer: "Assim".to_string(),
            order: None,
        };

        let json = serde_json::to_value(&outline).unwrap();
        assert_eq!(json["sectionType"], "Table of Contents");
        assert_eq!(json["status"], "In-Progress");
        assert!(json.get("order").is_none());

        let back: Outline = serde_json::from_value(json).unwrap();
        assert_eq!(back, outline);
    }

    #[test]
    fn status_from_label() {
        assert_eq!(
            "In-Progress".parse::<OutlineStatus>().unwrap(),
            OutlineStatus::InProgress
        );
        assert!("Paused".parse::<OutlineStatus>().is_err());
    }

    #[test]
    fn reviewer_validation() {
        assert!(validate_reviewer("Assim").is_ok());
        assert!(validate_reviewer("assim").is_err());
        assert!(validate_reviewer("").is_err());
    }

    #[test]
    fn patch_merges_only_set_fields() {
        let mut outline = Outline {
            id: "o1".to_string(),
            header: "Intro".to_string(),
            section_type: SectionType::Design,
            status: OutlineStatus::Pending,
            target: 5,
            limit: 10,
            reviewer: "Assim".to_string(),
            order: None,
        };

        outline.apply(&OutlineUpdateRequest {
            status: Some(OutlineStatus::Completed),
            reviewer: Some("Bini".to_string()),
            ..Default::default()
        });

        assert_eq!(outline.status, OutlineStatus::Completed);
        assert_eq!(outline.reviewer, "Bini");
        assert_eq!(outline.header, "Intro");
        assert_eq!(outline.target, 5);
    }
}
