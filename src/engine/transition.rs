//! State transitions
//!
//! A transition is a full read-modify-write of one document: locate the
//! first line whose glyph matches the question's current status and whose
//! clean text matches, replace exactly that line, write the document back.
//! Matching never crosses documents and never touches more than one line
//! per call, even when several lines share identical text.

use anyhow::Result;
use chrono::NaiveDateTime;

use crate::domain::{
    render_answered, render_pending, render_skipped, render_unanswered, Question, QuestionStatus,
};
use crate::storage::{ActivityLog, Document, Vault};

/// Target state of a transition
#[derive(Debug, Clone, PartialEq)]
pub enum Target {
    /// Mark for presentation (two-phase protocol, first phase)
    Pending,
    /// Positive answer; `None` records the yes-label
    AnsweredYes(Option<String>),
    /// Negative answer; always records "No"
    AnsweredNo,
    /// Explicitly skipped
    Skipped,
    /// Revert an unresolved presentation back to unanswered
    Unanswered,
}

/// Outcome of a transition attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransitionResult {
    /// Exactly one line was rewritten
    Applied,
    /// No line matched the question's current status and text
    NotFound,
}

/// Performs atomic single-line state transitions against a vault
pub struct TransitionEngine<'a> {
    vault: &'a Vault,
    log: ActivityLog,
}

impl<'a> TransitionEngine<'a> {
    /// Creates an engine for the given vault
    pub fn new(vault: &'a Vault) -> Self {
        Self {
            vault,
            log: vault.activity_log(),
        }
    }

    /// Moves a question to the target state
    ///
    /// Returns `NotFound` (logged, non-fatal) when the source document no
    /// longer contains a line in the question's current state with the
    /// question's text - typically after a concurrent edit, or when the
    /// same transition already ran.
    pub fn transition(&self, question: &Question, target: Target) -> Result<TransitionResult> {
        self.transition_at(question, target, chrono::Local::now().naive_local())
    }

    /// Like [`transition`](Self::transition), with an explicit timestamp
    pub fn transition_at(
        &self,
        question: &Question,
        target: Target,
        now: NaiveDateTime,
    ) -> Result<TransitionResult> {
        let _guard = self.vault.lock()?;

        let mut doc = Document::load(&question.source)?;
        let Some(idx) = doc.find_question(question.status, &question.clean_text) else {
            self.log.record(&format!(
                "Transition target not found ({} line): {}",
                question.status.label(),
                question.clean_text
            ));
            return Ok(TransitionResult::NotFound);
        };

        doc.replace_line(idx, rendered_lines(question, &target, now));
        doc.store()?;

        self.log
            .record(&format!("{}: {}", describe(&target), question.clean_text));
        Ok(TransitionResult::Applied)
    }

    /// Reverts every Pending line in the vault back to Unanswered
    ///
    /// Crash recovery path: run by drivers at startup to close out
    /// presentations that died without resolving. Returns the number of
    /// reverted lines.
    pub fn recover(&self) -> Result<usize> {
        let _guard = self.vault.lock()?;
        let mut reverted = 0;

        for path in self.vault.documents() {
            let mut doc = match Document::load(&path) {
                Ok(doc) => doc,
                Err(e) => {
                    self.log.record(&format!(
                        "Skipping unreadable document {}: {:#}",
                        path.display(),
                        e
                    ));
                    continue;
                }
            };

            let stuck: Vec<(usize, String)> = doc
                .questions()
                .filter(|(_, q)| q.status.is_pending())
                .map(|(idx, q)| (idx, q.clean_text.clone()))
                .collect();
            if stuck.is_empty() {
                continue;
            }

            // One-for-one replacements, so collected indices stay valid
            for (idx, clean_text) in &stuck {
                doc.replace_line(*idx, [render_unanswered(clean_text)]);
            }
            doc.store()?;
            reverted += stuck.len();
        }

        if reverted > 0 {
            self.log
                .record(&format!("Recovery reverted {} pending question(s)", reverted));
        }
        Ok(reverted)
    }
}

fn rendered_lines(question: &Question, target: &Target, now: NaiveDateTime) -> Vec<String> {
    let clean = &question.clean_text;
    match target {
        Target::Pending => vec![render_pending(clean, now)],
        Target::AnsweredYes(answer) => {
            let text = answer.as_deref().unwrap_or(&question.labels.yes);
            render_answered(clean, text, now).to_vec()
        }
        Target::AnsweredNo => render_answered(clean, "No", now).to_vec(),
        Target::Skipped => vec![render_skipped(clean, now)],
        Target::Unanswered => vec![render_unanswered(clean)],
    }
}

fn describe(target: &Target) -> String {
    match target {
        Target::Pending => "Marked pending".to_string(),
        Target::AnsweredYes(Some(answer)) => format!("Answered '{}'", answer),
        Target::AnsweredYes(None) => "Answered yes".to_string(),
        Target::AnsweredNo => "Answered no".to_string(),
        Target::Skipped => "Skipped".to_string(),
        Target::Unanswered => "Reverted to unanswered".to_string(),
    }
}

/// Expected status after a successful transition, used by callers that
/// chain transitions without re-scanning
pub fn resulting_status(target: &Target) -> QuestionStatus {
    match target {
        Target::Pending => QuestionStatus::Pending,
        Target::AnsweredYes(_) | Target::AnsweredNo => QuestionStatus::Answered,
        Target::Skipped => QuestionStatus::Skipped,
        Target::Unanswered => QuestionStatus::Unanswered,
    }
}
