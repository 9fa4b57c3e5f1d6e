//! Next-question selection
//!
//! Selection runs over the questions gathered by a full vault sweep, in
//! encounter order. A Pending question always pre-empts fresh selection:
//! it marks a presentation that was started and never resolved, and must
//! be closed out before a new one begins.

use std::cmp::Reverse;

use super::priority::priority_score;
use super::question::Question;

/// Returns the question the presenter should show next
///
/// Pending questions win outright, in sweep order. Otherwise the
/// unanswered question with the highest priority score is chosen, with
/// encounter order breaking ties (oldest declared first).
pub fn next<'a>(questions: &'a [Question], ranking: &[String]) -> Option<&'a Question> {
    if let Some(pending) = pending(questions) {
        return Some(pending);
    }

    unanswered_in_order(questions, ranking).into_iter().next()
}

/// Returns the outstanding Pending question, if any
pub fn pending(questions: &[Question]) -> Option<&Question> {
    questions.iter().find(|q| q.status.is_pending())
}

/// Returns true if a presentation is outstanding
///
/// Schedulers use this to suppress issuing new prompts while one is open.
pub fn has_pending(questions: &[Question]) -> bool {
    pending(questions).is_some()
}

/// Returns every unanswered question in selection order
pub fn unanswered_in_order<'a>(
    questions: &'a [Question],
    ranking: &[String],
) -> Vec<&'a Question> {
    let mut open: Vec<&Question> = questions.iter().filter(|q| q.is_askable()).collect();
    open.sort_by_key(|q| (Reverse(priority_score(&q.topic, ranking)), q.scan_index));
    open
}
