//! Line grammar for question documents
//!
//! Every piece of tracker state lives on a single document line:
//!
//! ```text
//! - <glyph> <clean_text>[ [Yes=<label>|No=<label>]][ *(<verb> <YYYY-MM-DD HH:MM:SS>)*]
//! ```
//!
//! Answered questions pair the glyph line with an immediately following
//! `  **Answer:** <text> *(answered <timestamp>)*` line. Everything else in
//! a document is opaque text and must survive rewrites byte-identically,
//! which is why parsing keeps the raw line alongside its classification.

use chrono::NaiveDateTime;

use super::question::{Labels, QuestionStatus};

/// Timestamp format used in line metadata
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Placeholder text that disqualifies a line from being a real question
pub const PLACEHOLDER_TEXT: &str = "Not asked yet";

/// Prefix of the answer line that follows an answered question
const ANSWER_PREFIX: &str = "**Answer:**";

/// Verb inside a trailing `*(<verb> <timestamp>)*` annotation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnnotationVerb {
    Asked,
    Answered,
    Skipped,
}

impl AnnotationVerb {
    fn parse(s: &str) -> Option<Self> {
        match s {
            "asked" => Some(AnnotationVerb::Asked),
            "answered" => Some(AnnotationVerb::Answered),
            "skipped" => Some(AnnotationVerb::Skipped),
            _ => None,
        }
    }
}

/// Trailing `*(<verb> <timestamp>)*` metadata on a line
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Annotation {
    pub verb: AnnotationVerb,
    pub timestamp: NaiveDateTime,
}

/// A qualifying question line
#[derive(Debug, Clone, PartialEq)]
pub struct QuestionLine {
    pub status: QuestionStatus,
    pub clean_text: String,
    pub labels: Labels,
    pub annotation: Option<Annotation>,
}

/// An `**Answer:**` continuation line
#[derive(Debug, Clone, PartialEq)]
pub struct AnswerLine {
    pub text: String,
    pub annotation: Option<Annotation>,
}

impl AnswerLine {
    /// Returns the answered-at timestamp, if the annotation carries one
    pub fn answered_at(&self) -> Option<NaiveDateTime> {
        self.annotation
            .filter(|a| a.verb == AnnotationVerb::Answered)
            .map(|a| a.timestamp)
    }
}

/// Classification of one raw document line
#[derive(Debug, Clone, PartialEq)]
pub enum LineKind {
    Question(QuestionLine),
    Answer(AnswerLine),
    Text,
}

/// One document line: the raw text plus what the tracker makes of it
#[derive(Debug, Clone, PartialEq)]
pub struct DocLine {
    pub raw: String,
    pub kind: LineKind,
}

impl DocLine {
    /// Classifies a raw line
    pub fn classify(raw: impl Into<String>) -> Self {
        let raw = raw.into();
        let kind = classify_kind(&raw);
        Self { raw, kind }
    }

    /// Returns the question line, if this is one
    pub fn as_question(&self) -> Option<&QuestionLine> {
        match &self.kind {
            LineKind::Question(q) => Some(q),
            _ => None,
        }
    }

    /// Returns the answer line, if this is one
    pub fn as_answer(&self) -> Option<&AnswerLine> {
        match &self.kind {
            LineKind::Answer(a) => Some(a),
            _ => None,
        }
    }
}

fn classify_kind(raw: &str) -> LineKind {
    let trimmed = raw.trim();

    if let Some(question) = parse_question(trimmed) {
        return LineKind::Question(question);
    }
    if let Some(answer) = parse_answer(trimmed) {
        return LineKind::Answer(answer);
    }
    LineKind::Text
}

/// Parses a trimmed line as a question line
///
/// The list marker is optional on input; serialization always emits it.
/// Lines whose clean text is empty or the placeholder are not questions.
fn parse_question(trimmed: &str) -> Option<QuestionLine> {
    let rest = trimmed.strip_prefix("- ").unwrap_or(trimmed);

    let glyph = rest.chars().next()?;
    let status = QuestionStatus::from_glyph(glyph)?;

    let after_glyph = rest[glyph.len_utf8()..].strip_prefix(' ')?;
    let remainder = after_glyph.trim();
    if remainder.is_empty() {
        return None;
    }

    let (body, annotation) = split_annotation(remainder);
    let (clean_text, labels) = split_directive(body);

    if clean_text.is_empty() || clean_text == PLACEHOLDER_TEXT {
        return None;
    }

    Some(QuestionLine {
        status,
        clean_text,
        labels,
        annotation,
    })
}

/// Parses a trimmed line as an `**Answer:**` continuation line
fn parse_answer(trimmed: &str) -> Option<AnswerLine> {
    let rest = trimmed.strip_prefix(ANSWER_PREFIX)?;
    let remainder = rest.trim();

    let (text, annotation) = split_annotation(remainder);
    if text.is_empty() {
        return None;
    }

    Some(AnswerLine {
        text: text.to_string(),
        annotation,
    })
}

/// Splits a trailing `*(<verb> <timestamp>)*` annotation off the text
///
/// Anything that does not match the exact annotation shape stays part of
/// the text.
fn split_annotation(text: &str) -> (String, Option<Annotation>) {
    let unannotated = || (text.to_string(), None);

    if !text.ends_with(")*") {
        return unannotated();
    }
    let Some(open) = text.rfind("*(") else {
        return unannotated();
    };

    let inner = &text[open + 2..text.len() - 2];
    let Some((verb_str, ts_str)) = inner.split_once(' ') else {
        return unannotated();
    };
    let Some(verb) = AnnotationVerb::parse(verb_str) else {
        return unannotated();
    };
    let Ok(timestamp) = NaiveDateTime::parse_from_str(ts_str, TIMESTAMP_FORMAT) else {
        return unannotated();
    };

    let body = text[..open].trim_end().to_string();
    (body, Some(Annotation { verb, timestamp }))
}

/// Extracts an optional `[Yes=...|No=...]` directive from the question body
///
/// The rightmost `[` must precede the rightmost `]`; otherwise the brackets
/// are treated as ordinary text (malformed directive fallback). The clean
/// text never includes the brackets.
fn split_directive(body: String) -> (String, Labels) {
    let (Some(open), Some(close)) = (body.rfind('['), body.rfind(']')) else {
        return (body, Labels::default());
    };
    if open >= close {
        return (body, Labels::default());
    }

    let mut labels = Labels::default();
    for field in body[open + 1..close].split('|') {
        let field = field.trim();
        if let Some(value) = field.strip_prefix("Yes=") {
            labels.yes = value.trim().to_string();
        } else if let Some(value) = field.strip_prefix("No=") {
            labels.no = value.trim().to_string();
        }
    }

    let clean = body[..open].trim_end().to_string();
    (clean, labels)
}

fn format_timestamp(ts: NaiveDateTime) -> String {
    ts.format(TIMESTAMP_FORMAT).to_string()
}

/// Renders an unanswered question line (also the revert target)
pub fn render_unanswered(clean_text: &str) -> String {
    format!("- {} {}", QuestionStatus::Unanswered.glyph(), clean_text)
}

/// Renders a pending question line
pub fn render_pending(clean_text: &str, ts: NaiveDateTime) -> String {
    format!(
        "- {} {} *(asked {})*",
        QuestionStatus::Pending.glyph(),
        clean_text,
        format_timestamp(ts)
    )
}

/// Renders a skipped question line
pub fn render_skipped(clean_text: &str, ts: NaiveDateTime) -> String {
    format!(
        "- {} {} *(skipped {})*",
        QuestionStatus::Skipped.glyph(),
        clean_text,
        format_timestamp(ts)
    )
}

/// Renders an answered question as its two-line block
pub fn render_answered(clean_text: &str, answer: &str, ts: NaiveDateTime) -> [String; 2] {
    [
        format!("- {} {}", QuestionStatus::Answered.glyph(), clean_text),
        format!(
            "  {} {} *(answered {})*",
            ANSWER_PREFIX,
            answer,
            format_timestamp(ts)
        ),
    ]
}
