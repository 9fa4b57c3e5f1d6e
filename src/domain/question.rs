//! Question domain model
//!
//! A question is never stored as a record of its own; it is derived from a
//! single line in a vault document. The status glyph at the start of the
//! line carries the whole lifecycle.

use std::fmt;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Lifecycle status of a question, encoded by its leading glyph
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum QuestionStatus {
    /// Authored but never presented (❌)
    #[default]
    Unanswered,
    /// Currently being presented; must resolve or be reverted (⏳)
    Pending,
    /// Answered, with the answer on the following line (✅)
    Answered,
    /// Explicitly skipped by the user (⏭)
    Skipped,
}

impl QuestionStatus {
    /// Returns the glyph that encodes this status in a document line
    pub fn glyph(&self) -> char {
        match self {
            QuestionStatus::Unanswered => '❌',
            QuestionStatus::Pending => '⏳',
            QuestionStatus::Answered => '✅',
            QuestionStatus::Skipped => '⏭',
        }
    }

    /// Decodes a status from its glyph
    pub fn from_glyph(c: char) -> Option<Self> {
        match c {
            '❌' => Some(QuestionStatus::Unanswered),
            '⏳' => Some(QuestionStatus::Pending),
            '✅' => Some(QuestionStatus::Answered),
            '⏭' => Some(QuestionStatus::Skipped),
            _ => None,
        }
    }

    /// Returns true if the question still awaits a first presentation
    pub fn is_open(&self) -> bool {
        matches!(self, QuestionStatus::Unanswered)
    }

    /// Returns true if a presentation is outstanding
    pub fn is_pending(&self) -> bool {
        matches!(self, QuestionStatus::Pending)
    }

    /// Returns true if the question can never be presented again
    pub fn is_terminal(&self) -> bool {
        matches!(self, QuestionStatus::Answered | QuestionStatus::Skipped)
    }

    /// Returns a display label for the status
    pub fn label(&self) -> &'static str {
        match self {
            QuestionStatus::Unanswered => "unanswered",
            QuestionStatus::Pending => "pending",
            QuestionStatus::Answered => "answered",
            QuestionStatus::Skipped => "skipped",
        }
    }
}

/// Button labels for presenting a question
///
/// Default is Yes/No; an inline `[Yes=...|No=...]` directive on the
/// question line overrides either side.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Labels {
    pub yes: String,
    pub no: String,
}

impl Default for Labels {
    fn default() -> Self {
        Self {
            yes: "Yes".to_string(),
            no: "No".to_string(),
        }
    }
}

impl Labels {
    /// Creates labels from override values, falling back to the defaults
    pub fn new(yes: impl Into<String>, no: impl Into<String>) -> Self {
        Self {
            yes: yes.into(),
            no: no.into(),
        }
    }

    /// Returns true if both labels are the defaults
    pub fn is_default(&self) -> bool {
        self.yes == "Yes" && self.no == "No"
    }
}

/// The subject a question belongs to
///
/// The profile (root) document is reserved for static profile facts and is
/// distinct from every topic file by construction, whatever the files are
/// named.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Topic {
    /// The root profile document
    Profile,
    /// A file in the topics subdirectory, named by its file stem
    Named(String),
}

impl Topic {
    /// Returns the topic name as shown to the user
    pub fn name(&self) -> &str {
        match self {
            Topic::Profile => "Profile",
            Topic::Named(name) => name,
        }
    }

    /// Returns true if this is the reserved profile topic
    pub fn is_profile(&self) -> bool {
        matches!(self, Topic::Profile)
    }
}

impl fmt::Display for Topic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A question derived from one document line during a sweep
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Question {
    /// The question text without directive or trailing metadata.
    /// Identity key for matching within its source document.
    pub clean_text: String,

    /// Current lifecycle status
    pub status: QuestionStatus,

    /// Presentation button labels
    pub labels: Labels,

    /// The recorded answer, present only when answered
    pub answer: Option<String>,

    /// Document the question line lives in
    pub source: PathBuf,

    /// Topic derived from the source document
    pub topic: Topic,

    /// Encounter order across the whole sweep; tie-break only
    pub scan_index: usize,
}

impl Question {
    /// Returns true if this question can be selected for presentation
    pub fn is_askable(&self) -> bool {
        self.status.is_open()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn glyph_roundtrip() {
        for status in [
            QuestionStatus::Unanswered,
            QuestionStatus::Pending,
            QuestionStatus::Answered,
            QuestionStatus::Skipped,
        ] {
            assert_eq!(QuestionStatus::from_glyph(status.glyph()), Some(status));
        }
    }

    #[test]
    fn unknown_glyph_is_rejected() {
        assert_eq!(QuestionStatus::from_glyph('x'), None);
        assert_eq!(QuestionStatus::from_glyph('-'), None);
    }

    #[test]
    fn status_predicates() {
        assert!(QuestionStatus::Unanswered.is_open());
        assert!(QuestionStatus::Pending.is_pending());
        assert!(QuestionStatus::Answered.is_terminal());
        assert!(QuestionStatus::Skipped.is_terminal());
        assert!(!QuestionStatus::Pending.is_terminal());
    }

    #[test]
    fn default_labels() {
        let labels = Labels::default();
        assert_eq!(labels.yes, "Yes");
        assert_eq!(labels.no, "No");
        assert!(labels.is_default());

        let custom = Labels::new("Blue", "Green");
        assert!(!custom.is_default());
    }

    #[test]
    fn profile_topic_is_distinct_from_named() {
        let profile = Topic::Profile;
        let named = Topic::Named("Profile".to_string());

        assert_ne!(profile, named);
        assert!(profile.is_profile());
        assert!(!named.is_profile());
        assert_eq!(profile.name(), named.name());
    }
}
