//! Narrative generation
//!
//! Turning a day's answers into prose is the job of an external tool; the
//! core only knows a [`Narrator`] capability. The command-backed
//! implementation invokes a configured program with the composed prompt
//! as its single argument and reads stdout. The template implementation
//! is the deterministic fallback when no tool is configured or the tool
//! fails.

use std::process::Command;

use anyhow::{bail, Context, Result};
use chrono::NaiveDate;

use crate::engine::QaPair;
use crate::storage::Vault;

/// Third-person pronoun set used in generated narratives
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pronouns {
    pub subject: &'static str,
    pub possessive: &'static str,
    pub object: &'static str,
}

impl Pronouns {
    /// The neutral default
    pub fn neutral() -> Self {
        Self {
            subject: "they",
            possessive: "their",
            object: "them",
        }
    }

    /// Derives pronouns from profile document content
    ///
    /// Looks for the recorded answer to the pronoun question; anything
    /// unrecognized stays neutral.
    pub fn from_profile(content: &str) -> Self {
        if content.contains("**Answer:** He/Him") {
            Self {
                subject: "he",
                possessive: "his",
                object: "him",
            }
        } else if content.contains("**Answer:** She/Her") {
            Self {
                subject: "she",
                possessive: "her",
                object: "her",
            }
        } else {
            Self::neutral()
        }
    }
}

/// Reads the pronoun preference from a vault's profile document
pub fn profile_pronouns(vault: &Vault) -> Pronouns {
    match std::fs::read_to_string(vault.profile_path()) {
        Ok(content) => Pronouns::from_profile(&content),
        Err(_) => Pronouns::neutral(),
    }
}

/// Capability that turns a day's answers into a narrative
pub trait Narrator {
    fn narrate(&self, date: NaiveDate, pairs: &[QaPair], pronouns: &Pronouns) -> Result<String>;
}

/// Narrator backed by an external command
///
/// The command receives the whole prompt as one argument; its stdout is
/// the narrative.
pub struct CommandNarrator {
    command: String,
}

impl CommandNarrator {
    pub fn new(command: impl Into<String>) -> Self {
        Self {
            command: command.into(),
        }
    }
}

impl Narrator for CommandNarrator {
    fn narrate(&self, date: NaiveDate, pairs: &[QaPair], pronouns: &Pronouns) -> Result<String> {
        let prompt = compose_prompt(date, pairs, pronouns);

        let output = Command::new(&self.command)
            .arg(&prompt)
            .output()
            .with_context(|| format!("Failed to run narrative command: {}", self.command))?;

        if !output.status.success() {
            bail!(
                "Narrative command exited with {}: {}",
                output.status,
                String::from_utf8_lossy(&output.stderr).trim()
            );
        }

        let narrative = String::from_utf8_lossy(&output.stdout).trim().to_string();
        if narrative.len() <= 10 {
            bail!("Narrative command returned minimal output");
        }
        Ok(narrative)
    }
}

/// Deterministic fallback narrator
pub struct TemplateNarrator;

impl Narrator for TemplateNarrator {
    fn narrate(&self, _date: NaiveDate, pairs: &[QaPair], pronouns: &Pronouns) -> Result<String> {
        if pairs.is_empty() {
            return Ok("No questions were answered today.".to_string());
        }

        Ok(format!(
            "Today {} answered {} question{}, continuing {} ongoing self-reflection.",
            pronouns.subject,
            pairs.len(),
            if pairs.len() == 1 { "" } else { "s" },
            pronouns.possessive
        ))
    }
}

/// Composes the prompt handed to the external tool
pub fn compose_prompt(date: NaiveDate, pairs: &[QaPair], pronouns: &Pronouns) -> String {
    let mut qa_text = String::new();
    for pair in pairs {
        qa_text.push_str(&format!("Q: {}\nA: {}\n\n", pair.question, pair.answer));
    }

    format!(
        "Based on these Q&A responses from {date}, write a 200-300 word personal \
narrative about this person. Write in third person using \
{subject}/{possessive}/{object} pronouns, focusing on who they are as a person, \
their current situation, challenges, values, and what makes them unique.\n\n\
{qa_text}\
Write a flowing narrative that captures their essence based on the day's \
responses. Use {subject}/{possessive}/{object} pronouns consistently.",
        date = date,
        subject = pronouns.subject,
        possessive = pronouns.possessive,
        object = pronouns.object,
        qa_text = qa_text,
    )
}
