//! Vault access
//!
//! A vault is a directory of markdown documents: one profile document at
//! the root plus a topic subdirectory, with tracker state (activity log,
//! lock file) kept under `.memoir/`.

use std::fs::{self, File, OpenOptions};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use fs2::FileExt;
use thiserror::Error;

use super::config::Config;
use super::document::Document;
use super::log::ActivityLog;
use crate::domain::{self, Question, Topic};

/// Name of the tracker state directory inside the vault
pub const STATE_DIR_NAME: &str = ".memoir";

#[derive(Debug, Error)]
pub enum VaultError {
    #[error("Not a vault directory: {0}")]
    NotADirectory(PathBuf),
}

/// A vault with its resolved paths
pub struct Vault {
    root: PathBuf,
    profile_path: PathBuf,
    topics_dir: PathBuf,
    guidance_path: Option<PathBuf>,
}

impl Vault {
    /// Opens a vault rooted at the given directory
    pub fn open(root: impl Into<PathBuf>, config: &Config) -> Result<Self> {
        let root = root.into();
        if !root.is_dir() {
            return Err(VaultError::NotADirectory(root).into());
        }

        Ok(Self {
            profile_path: root.join(&config.profile_file),
            topics_dir: root.join(&config.topics_dir),
            guidance_path: config.guidance_file.as_ref().map(|f| root.join(f)),
            root,
        })
    }

    /// Creates the vault skeleton and opens it, idempotently
    pub fn init(root: impl Into<PathBuf>, config: &Config) -> Result<Self> {
        let root = root.into();

        fs::create_dir_all(&root)
            .with_context(|| format!("Failed to create vault directory: {}", root.display()))?;

        let topics_dir = root.join(&config.topics_dir);
        fs::create_dir_all(&topics_dir).with_context(|| {
            format!("Failed to create topics directory: {}", topics_dir.display())
        })?;

        let state_dir = root.join(STATE_DIR_NAME);
        fs::create_dir_all(&state_dir).with_context(|| {
            format!("Failed to create state directory: {}", state_dir.display())
        })?;

        let gitignore = state_dir.join(".gitignore");
        if !gitignore.exists() {
            fs::write(&gitignore, "activity.log*\nvault.lock\n*.tmp\n")
                .with_context(|| format!("Failed to write {}", gitignore.display()))?;
        }

        let profile_path = root.join(&config.profile_file);
        if !profile_path.exists() {
            fs::write(&profile_path, STARTER_PROFILE)
                .with_context(|| format!("Failed to write {}", profile_path.display()))?;
        }

        Self::open(root, config)
    }

    /// Returns the vault root directory
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Returns the profile document path
    pub fn profile_path(&self) -> &Path {
        &self.profile_path
    }

    /// Returns the topics subdirectory path
    pub fn topics_dir(&self) -> &Path {
        &self.topics_dir
    }

    /// Returns the state directory path
    pub fn state_dir(&self) -> PathBuf {
        self.root.join(STATE_DIR_NAME)
    }

    /// Returns the activity log for this vault
    pub fn activity_log(&self) -> ActivityLog {
        ActivityLog::new(self.state_dir().join("activity.log"))
    }

    /// Enumerates candidate documents: the profile document first, then
    /// every markdown file directly inside the topics subdirectory, in
    /// filesystem enumeration order
    ///
    /// A missing topics directory yields just the profile document.
    pub fn documents(&self) -> Vec<PathBuf> {
        let mut paths = vec![self.profile_path.clone()];
        paths.extend(self.topic_documents());
        paths
    }

    /// Enumerates only the topic documents
    pub fn topic_documents(&self) -> Vec<PathBuf> {
        let entries = match fs::read_dir(&self.topics_dir) {
            Ok(entries) => entries,
            Err(_) => return Vec::new(),
        };

        entries
            .flatten()
            .map(|entry| entry.path())
            .filter(|path| path.extension().is_some_and(|ext| ext == "md"))
            .collect()
    }

    /// Derives the topic for a document path
    pub fn topic_for(&self, path: &Path) -> Topic {
        if path == self.profile_path {
            return Topic::Profile;
        }

        let stem = path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();
        Topic::Named(stem)
    }

    /// Returns the names of all topic documents
    pub fn topic_names(&self) -> Vec<String> {
        self.topic_documents()
            .iter()
            .map(|path| self.topic_for(path).name().to_string())
            .collect()
    }

    /// Reads the guidance document, if configured and readable
    pub fn guidance_text(&self) -> Option<String> {
        let path = self.guidance_path.as_ref()?;
        fs::read_to_string(path).ok()
    }

    /// Derives the topic priority ranking from the guidance document
    pub fn topic_ranking(&self) -> Vec<String> {
        match self.guidance_text() {
            Some(text) => domain::rank_topics(&text, &self.topic_names()),
            None => Vec::new(),
        }
    }

    /// Sweeps every document for questions, in document then line order
    ///
    /// Unreadable documents are logged and skipped; the sweep never fails.
    /// `scan_index` is assigned in encounter order across the whole sweep.
    pub fn scan(&self, log: &ActivityLog) -> Vec<Question> {
        let mut questions = Vec::new();
        let mut scan_index = 0;

        for path in self.documents() {
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

            let topic = self.topic_for(&path);
            for (idx, line) in doc.questions() {
                let answer = match line.status {
                    domain::QuestionStatus::Answered => {
                        doc.answer_after(idx).map(|a| a.text.clone())
                    }
                    _ => None,
                };
                questions.push(Question {
                    clean_text: line.clean_text.clone(),
                    status: line.status,
                    labels: line.labels.clone(),
                    answer,
                    source: path.clone(),
                    topic: topic.clone(),
                    scan_index,
                });
                scan_index += 1;
            }
        }

        questions
    }

    /// Takes the vault-wide advisory lock
    ///
    /// Serializes read-modify-write cycles between tool processes on the
    /// same machine. The lock is advisory: external editors bypass it.
    pub fn lock(&self) -> Result<VaultLock> {
        let state_dir = self.state_dir();
        fs::create_dir_all(&state_dir).with_context(|| {
            format!("Failed to create state directory: {}", state_dir.display())
        })?;

        let lock_path = state_dir.join("vault.lock");
        let file = OpenOptions::new()
            .create(true)
            .write(true)
            .open(&lock_path)
            .with_context(|| format!("Failed to open lock file: {}", lock_path.display()))?;

        file.lock_exclusive()
            .context("Failed to acquire vault lock")?;

        Ok(VaultLock { _file: file })
    }
}

/// Guard holding the vault-wide advisory lock; released on drop
pub struct VaultLock {
    _file: File,
}

const STARTER_PROFILE: &str = "\
# Profile

Static profile facts live here. Lines starting with ❌ are questions
the tracker may present.

- ❌ Which pronouns should summaries use? [Yes=He/Him|No=She/Her]
";

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::QuestionStatus;
    use tempfile::TempDir;

    fn test_vault(dir: &TempDir) -> Vault {
        Vault::init(dir.path(), &Config::default()).unwrap()
    }

    #[test]
    fn init_creates_skeleton() {
        let dir = TempDir::new().unwrap();
        let vault = test_vault(&dir);

        assert!(vault.profile_path().is_file());
        assert!(vault.topics_dir().is_dir());
        assert!(vault.state_dir().join(".gitignore").is_file());
    }

    #[test]
    fn init_is_idempotent() {
        let dir = TempDir::new().unwrap();
        test_vault(&dir);

        fs::write(dir.path().join("Profile.md"), "# Mine\n").unwrap();
        test_vault(&dir);

        // A second init must not clobber an existing profile
        let content = fs::read_to_string(dir.path().join("Profile.md")).unwrap();
        assert_eq!(content, "# Mine\n");
    }

    #[test]
    fn open_rejects_missing_directory() {
        let dir = TempDir::new().unwrap();
        let missing = dir.path().join("nope");
        assert!(Vault::open(&missing, &Config::default()).is_err());
    }

    #[test]
    fn documents_list_profile_first() {
        let dir = TempDir::new().unwrap();
        let vault = test_vault(&dir);
        fs::write(vault.topics_dir().join("Health.md"), "- ❌ Q?\n").unwrap();
        fs::write(vault.topics_dir().join("notes.txt"), "not markdown\n").unwrap();

        let docs = vault.documents();
        assert_eq!(docs[0], vault.profile_path());
        assert_eq!(docs.len(), 2);
        assert!(docs[1].ends_with("Health.md"));
    }

    #[test]
    fn missing_topics_dir_yields_profile_only() {
        let dir = TempDir::new().unwrap();
        let vault = test_vault(&dir);
        fs::remove_dir_all(vault.topics_dir()).unwrap();

        assert_eq!(vault.documents(), vec![vault.profile_path().to_path_buf()]);
    }

    #[test]
    fn topic_derivation() {
        let dir = TempDir::new().unwrap();
        let vault = test_vault(&dir);

        assert_eq!(vault.topic_for(vault.profile_path()), Topic::Profile);
        assert_eq!(
            vault.topic_for(&vault.topics_dir().join("Family Relationships.md")),
            Topic::Named("Family Relationships".to_string())
        );
    }

    #[test]
    fn scan_walks_all_documents() {
        let dir = TempDir::new().unwrap();
        let vault = test_vault(&dir);
        fs::write(
            vault.topics_dir().join("Health.md"),
            "- ❌ Sleep well?\n- ⏭ Old one? *(skipped 2025-01-01 08:00:00)*\n",
        )
        .unwrap();

        let log = vault.activity_log();
        let questions = vault.scan(&log);

        // Starter profile question plus the two topic lines
        assert_eq!(questions.len(), 3);
        assert_eq!(questions[0].topic, Topic::Profile);
        assert_eq!(questions[1].clean_text, "Sleep well?");
        assert_eq!(questions[2].status, QuestionStatus::Skipped);

        // Scan indices are global across documents
        let indices: Vec<usize> = questions.iter().map(|q| q.scan_index).collect();
        assert_eq!(indices, vec![0, 1, 2]);
    }

    #[test]
    fn scan_attaches_answers() {
        let dir = TempDir::new().unwrap();
        let vault = test_vault(&dir);
        fs::write(
            vault.topics_dir().join("Health.md"),
            "- ✅ Favorite color?\n  **Answer:** Blue *(answered 2025-01-02 18:05:33)*\n",
        )
        .unwrap();

        let questions = vault.scan(&vault.activity_log());
        let answered = questions
            .iter()
            .find(|q| q.status == QuestionStatus::Answered)
            .unwrap();
        assert_eq!(answered.answer.as_deref(), Some("Blue"));
    }

    #[test]
    fn scan_skips_unreadable_profile() {
        let dir = TempDir::new().unwrap();
        let vault = test_vault(&dir);
        fs::remove_file(vault.profile_path()).unwrap();
        fs::write(vault.topics_dir().join("Health.md"), "- ❌ Q?\n").unwrap();

        let questions = vault.scan(&vault.activity_log());
        assert_eq!(questions.len(), 1);

        // The skip is recorded, not fatal
        let log_content = fs::read_to_string(vault.activity_log().path()).unwrap();
        assert!(log_content.contains("Skipping unreadable document"));
    }

    #[test]
    fn ranking_without_guidance_is_empty() {
        let dir = TempDir::new().unwrap();
        let vault = test_vault(&dir);
        assert!(vault.topic_ranking().is_empty());
    }

    #[test]
    fn ranking_from_guidance_document() {
        let dir = TempDir::new().unwrap();
        let config = Config {
            guidance_file: Some("Focus.md".to_string()),
            ..Config::default()
        };
        let vault = Vault::init(dir.path(), &config).unwrap();

        fs::write(vault.topics_dir().join("Career.md"), "- ❌ Q?\n").unwrap();
        fs::write(vault.topics_dir().join("Health.md"), "- ❌ Q?\n").unwrap();
        fs::write(
            dir.path().join("Focus.md"),
            "Health first this month, then Career.\n",
        )
        .unwrap();

        assert_eq!(
            vault.topic_ranking(),
            vec!["Health".to_string(), "Career".to_string()]
        );
    }

    #[test]
    fn lock_can_be_taken_and_released() {
        let dir = TempDir::new().unwrap();
        let vault = test_vault(&dir);

        let guard = vault.lock().unwrap();
        drop(guard);
        let _again = vault.lock().unwrap();
    }
}
