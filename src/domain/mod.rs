//! Domain models for Memoir
//!
//! Contains the line grammar, selection, and scoring logic without any I/O
//! concerns.

mod line;
mod priority;
mod question;
mod select;

pub use line::{
    render_answered, render_pending, render_skipped, render_unanswered, Annotation,
    AnnotationVerb, AnswerLine, DocLine, LineKind, QuestionLine, PLACEHOLDER_TEXT,
    TIMESTAMP_FORMAT,
};
pub use priority::{priority_score, rank_topics};
pub use question::{Labels, Question, QuestionStatus, Topic};
pub use select::{has_pending, next, pending, unanswered_in_order};
