//! Answer ledger queries
//!
//! Scans topic documents for answered blocks on a given date, feeding the
//! narrative generator. The profile document is excluded: it is reserved
//! for static profile facts, not day-to-day answers.

use chrono::NaiveDate;
use serde::Serialize;

use crate::domain::QuestionStatus;
use crate::storage::{ActivityLog, Document, Vault};

/// One answered question, as handed to the narrative generator
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct QaPair {
    pub question: String,
    pub answer: String,
}

/// Returns every (question, answer) pair answered on the given date
///
/// The `**Answer:**` line must immediately follow its question line;
/// malformed or split blocks are silently skipped. Unreadable documents
/// are logged and skipped.
pub fn answers_on(vault: &Vault, date: NaiveDate, log: &ActivityLog) -> Vec<QaPair> {
    let mut pairs = Vec::new();

    for path in vault.topic_documents() {
        let doc = match Document::load(&path) {
            Ok(doc) => doc,
            Err(e) => {
                log.record(&format!(
                    "Skipping unreadable document {}: {:#}",
                    path.display(),
                    e
                ));
                continue;
            }
        };

        for (idx, question) in doc.questions() {
            if question.status != QuestionStatus::Answered {
                continue;
            }
            let Some(answer) = doc.answer_after(idx) else {
                continue;
            };
            let Some(answered_at) = answer.answered_at() else {
                continue;
            };
            if answered_at.date() != date {
                continue;
            }

            pairs.push(QaPair {
                question: question.clean_text.clone(),
                answer: answer.text.clone(),
            });
        }
    }

    pairs
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::Config;
    use std::fs;
    use tempfile::TempDir;

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn setup() -> (TempDir, Vault) {
        let dir = TempDir::new().unwrap();
        let vault = Vault::init(dir.path(), &Config::default()).unwrap();
        (dir, vault)
    }

    #[test]
    fn finds_answers_for_the_date() {
        let (_dir, vault) = setup();
        fs::write(
            vault.topics_dir().join("Health.md"),
            "\
- ✅ Sleep well?
  **Answer:** Mostly *(answered 2025-03-01 08:10:00)*
- ✅ Morning run?
  **Answer:** Yes *(answered 2025-03-02 07:00:00)*
",
        )
        .unwrap();

        let pairs = answers_on(&vault, date("2025-03-01"), &vault.activity_log());
        assert_eq!(
            pairs,
            vec![QaPair {
                question: "Sleep well?".to_string(),
                answer: "Mostly".to_string(),
            }]
        );
    }

    #[test]
    fn empty_for_a_date_without_answers() {
        let (_dir, vault) = setup();
        fs::write(
            vault.topics_dir().join("Health.md"),
            "- ✅ Q?\n  **Answer:** A *(answered 2025-03-01 08:10:00)*\n",
        )
        .unwrap();

        assert!(answers_on(&vault, date("2024-12-25"), &vault.activity_log()).is_empty());
    }

    #[test]
    fn ignores_pending_and_skipped_lines() {
        let (_dir, vault) = setup();
        fs::write(
            vault.topics_dir().join("Health.md"),
            "\
- ⏳ Pending? *(asked 2025-03-01 08:00:00)*
- ⏭ Skipped? *(skipped 2025-03-01 08:05:00)*
",
        )
        .unwrap();

        assert!(answers_on(&vault, date("2025-03-01"), &vault.activity_log()).is_empty());
    }

    #[test]
    fn profile_document_is_excluded() {
        let (_dir, vault) = setup();
        fs::write(
            vault.profile_path(),
            "- ✅ Pronouns?\n  **Answer:** He/Him *(answered 2025-03-01 08:00:00)*\n",
        )
        .unwrap();

        assert!(answers_on(&vault, date("2025-03-01"), &vault.activity_log()).is_empty());
    }

    #[test]
    fn split_blocks_are_skipped() {
        let (_dir, vault) = setup();
        fs::write(
            vault.topics_dir().join("Health.md"),
            "\
- ✅ Split block?

  **Answer:** Lost *(answered 2025-03-01 08:10:00)*
- ✅ No timestamp?
  **Answer:** Bare
",
        )
        .unwrap();

        assert!(answers_on(&vault, date("2025-03-01"), &vault.activity_log()).is_empty());
    }

    #[test]
    fn answers_keep_document_order() {
        let (_dir, vault) = setup();
        fs::write(
            vault.topics_dir().join("Health.md"),
            "\
- ✅ First?
  **Answer:** A *(answered 2025-03-01 08:00:00)*
- ✅ Second?
  **Answer:** B *(answered 2025-03-01 09:00:00)*
",
        )
        .unwrap();

        let pairs = answers_on(&vault, date("2025-03-01"), &vault.activity_log());
        let questions: Vec<&str> = pairs.iter().map(|p| p.question.as_str()).collect();
        assert_eq!(questions, vec!["First?", "Second?"]);
    }
}
