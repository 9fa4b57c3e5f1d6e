//! Memoir CLI - A personal question/answer tracker for markdown vaults
//!
//! Memoir keeps its entire state inside free-form markdown documents.
//! Questions are ordinary lines carrying a status glyph (❌ ⏳ ✅ ⏭);
//! presenting, answering, or skipping a question rewrites exactly that
//! line. No database, no index - the documents are the source of truth.

pub mod domain;
pub mod storage;
pub mod engine;
pub mod narrative;
pub mod cli;

pub use domain::{Labels, Question, QuestionStatus, Topic};
