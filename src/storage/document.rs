//! Whole-document read, patch, write
//!
//! A document is the sole unit of atomic rewrite: the whole file is read
//! into typed lines, exactly one line record is mutated, and the whole
//! file is written back (temp file + rename). Untouched lines keep their
//! raw text, so a rewrite never reflows anything it did not target.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::domain::{AnswerLine, DocLine, QuestionLine, QuestionStatus};

/// One vault document, parsed into typed lines
#[derive(Debug, Clone)]
pub struct Document {
    path: PathBuf,
    lines: Vec<DocLine>,
    had_trailing_newline: bool,
}

impl Document {
    /// Reads and classifies a document
    pub fn load(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let content = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read document: {}", path.display()))?;

        Ok(Self::from_content(path, &content))
    }

    /// Builds a document from already-read content
    pub fn from_content(path: impl Into<PathBuf>, content: &str) -> Self {
        let had_trailing_newline = content.ends_with('\n');

        let mut raw_lines: Vec<&str> = content.split('\n').collect();
        if had_trailing_newline {
            raw_lines.pop();
        }

        Self {
            path: path.into(),
            lines: raw_lines.into_iter().map(DocLine::classify).collect(),
            had_trailing_newline,
        }
    }

    /// Returns the document path
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Returns the typed lines in document order
    pub fn lines(&self) -> &[DocLine] {
        &self.lines
    }

    /// Iterates question lines with their line indices
    pub fn questions(&self) -> impl Iterator<Item = (usize, &QuestionLine)> {
        self.lines
            .iter()
            .enumerate()
            .filter_map(|(idx, line)| line.as_question().map(|q| (idx, q)))
    }

    /// Returns the answer line immediately following the given line index
    ///
    /// Answered blocks require the `**Answer:**` line directly under the
    /// question line; anything else is a malformed block.
    pub fn answer_after(&self, idx: usize) -> Option<&AnswerLine> {
        self.lines.get(idx + 1).and_then(|line| line.as_answer())
    }

    /// Finds the first question line matching a status and clean text
    ///
    /// Matching is directive-tolerant: the stored line may or may not carry
    /// a label directive, the clean text comparison is unaffected.
    pub fn find_question(&self, status: QuestionStatus, clean_text: &str) -> Option<usize> {
        self.questions()
            .find(|(_, q)| q.status == status && q.clean_text == clean_text)
            .map(|(idx, _)| idx)
    }

    /// Replaces one line with one or more rendered lines
    pub fn replace_line(&mut self, idx: usize, replacement: impl IntoIterator<Item = String>) {
        let tail = self.lines.split_off(idx + 1);
        self.lines.pop();
        self.lines
            .extend(replacement.into_iter().map(DocLine::classify));
        self.lines.extend(tail);
    }

    /// Serializes the document back to its textual form
    pub fn render(&self) -> String {
        let mut content = self
            .lines
            .iter()
            .map(|line| line.raw.as_str())
            .collect::<Vec<_>>()
            .join("\n");

        if self.had_trailing_newline {
            content.push('\n');
        }
        content
    }

    /// Writes the document back atomically (temp file + rename)
    pub fn store(&self) -> Result<()> {
        let temp_path = self.path.with_extension("md.tmp");

        fs::write(&temp_path, self.render())
            .with_context(|| format!("Failed to write temp file: {}", temp_path.display()))?;

        fs::rename(&temp_path, &self.path).with_context(|| {
            format!(
                "Failed to rename {} to {}",
                temp_path.display(),
                self.path.display()
            )
        })?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{render_answered, render_pending, render_unanswered, LineKind};
    use chrono::NaiveDate;
    use tempfile::TempDir;

    const SAMPLE: &str = "\
# Health

Notes about health.

- ❌ Do you sleep well?
- ⏳ Do you like tea? *(asked 2025-01-01 10:00:00)*
- ✅ Favorite color?
  **Answer:** Blue *(answered 2025-01-02 18:05:33)*
- a plain bullet, not a question
";

    fn write_sample(dir: &TempDir) -> std::path::PathBuf {
        let path = dir.path().join("Health.md");
        fs::write(&path, SAMPLE).unwrap();
        path
    }

    #[test]
    fn load_classifies_lines() {
        let dir = TempDir::new().unwrap();
        let doc = Document::load(write_sample(&dir)).unwrap();

        let questions: Vec<_> = doc.questions().collect();
        assert_eq!(questions.len(), 3);
        assert_eq!(questions[0].1.clean_text, "Do you sleep well?");
        assert_eq!(questions[1].1.status, QuestionStatus::Pending);
        assert_eq!(questions[2].1.status, QuestionStatus::Answered);
    }

    #[test]
    fn answer_is_attached_to_following_line_only() {
        let dir = TempDir::new().unwrap();
        let doc = Document::load(write_sample(&dir)).unwrap();

        let answered_idx = doc
            .find_question(QuestionStatus::Answered, "Favorite color?")
            .unwrap();
        assert_eq!(doc.answer_after(answered_idx).unwrap().text, "Blue");

        let open_idx = doc
            .find_question(QuestionStatus::Unanswered, "Do you sleep well?")
            .unwrap();
        assert!(doc.answer_after(open_idx).is_none());
    }

    #[test]
    fn render_roundtrips_bytes() {
        let dir = TempDir::new().unwrap();
        let doc = Document::load(write_sample(&dir)).unwrap();
        assert_eq!(doc.render(), SAMPLE);
    }

    #[test]
    fn no_trailing_newline_is_preserved() {
        let doc = Document::from_content("x.md", "- ❌ Q?");
        assert_eq!(doc.render(), "- ❌ Q?");
    }

    #[test]
    fn replace_single_line_keeps_rest_identical() {
        let dir = TempDir::new().unwrap();
        let path = write_sample(&dir);
        let mut doc = Document::load(&path).unwrap();

        let idx = doc
            .find_question(QuestionStatus::Unanswered, "Do you sleep well?")
            .unwrap();
        let when = NaiveDate::from_ymd_opt(2025, 1, 3)
            .unwrap()
            .and_hms_opt(9, 0, 0)
            .unwrap();
        doc.replace_line(idx, [render_pending("Do you sleep well?", when)]);
        doc.store().unwrap();

        let reloaded = fs::read_to_string(&path).unwrap();
        assert_eq!(
            reloaded,
            SAMPLE.replace(
                "- ❌ Do you sleep well?",
                "- ⏳ Do you sleep well? *(asked 2025-01-03 09:00:00)*"
            )
        );
    }

    #[test]
    fn replace_line_with_two_line_block() {
        let mut doc = Document::from_content("x.md", "- ❌ Q?\ntail\n");
        let when = NaiveDate::from_ymd_opt(2025, 1, 3)
            .unwrap()
            .and_hms_opt(9, 0, 0)
            .unwrap();

        doc.replace_line(0, render_answered("Q?", "Yes", when));

        assert_eq!(
            doc.render(),
            "- ✅ Q?\n  **Answer:** Yes *(answered 2025-01-03 09:00:00)*\ntail\n"
        );
        assert!(matches!(doc.lines()[1].kind, LineKind::Answer(_)));
    }

    #[test]
    fn find_question_matches_first_of_duplicates() {
        let doc = Document::from_content(
            "x.md",
            "- ❌ Same text?\nmiddle\n- ❌ Same text?\n",
        );
        assert_eq!(
            doc.find_question(QuestionStatus::Unanswered, "Same text?"),
            Some(0)
        );
    }

    #[test]
    fn find_question_is_directive_tolerant() {
        let doc = Document::from_content("x.md", "- ❌ Favorite color? [Yes=Blue|No=Green]\n");
        assert_eq!(
            doc.find_question(QuestionStatus::Unanswered, "Favorite color?"),
            Some(0)
        );
    }

    #[test]
    fn store_leaves_no_temp_file() {
        let dir = TempDir::new().unwrap();
        let path = write_sample(&dir);
        let doc = Document::load(&path).unwrap();
        doc.store().unwrap();

        assert!(!path.with_extension("md.tmp").exists());
        assert!(path.exists());
    }

    #[test]
    fn revert_drops_directive_and_timestamp() {
        let mut doc = Document::from_content(
            "x.md",
            "- ⏳ Do you like tea? *(asked 2025-01-01 10:00:00)*\n",
        );
        let idx = doc
            .find_question(QuestionStatus::Pending, "Do you like tea?")
            .unwrap();
        doc.replace_line(idx, [render_unanswered("Do you like tea?")]);

        assert_eq!(doc.render(), "- ❌ Do you like tea?\n");
    }
}
