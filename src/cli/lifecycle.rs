//! Question lifecycle commands
//!
//! The two-phase presentation protocol as seen from the CLI: `ask` marks a
//! question pending before the presenter shows it; `answer`, `skip`, and
//! `revert` resolve it. `recover` closes out presentations that died.

use anyhow::{bail, Result};

use super::output::Output;
use crate::domain::{self, Question};
use crate::engine::{resulting_status, Target, TransitionEngine, TransitionResult};
use crate::storage::Vault;

/// Shows the question that would be presented next, without writing
pub fn next(vault: &Vault, output: &Output) -> Result<()> {
    let questions = vault.scan(&vault.activity_log());
    let ranking = vault.topic_ranking();
    output.verbose_ctx("next", &format!("{} questions in sweep", questions.len()));

    match domain::next(&questions, &ranking) {
        Some(question) => print_question(output, question),
        None => output.success("All caught up - no unanswered questions."),
    }
    Ok(())
}

/// Selects the next question and marks it pending
///
/// An outstanding pending question is returned as-is: it pre-empts fresh
/// selection until it is resolved or reverted.
pub fn ask(vault: &Vault, output: &Output) -> Result<()> {
    let questions = vault.scan(&vault.activity_log());

    if let Some(outstanding) = domain::pending(&questions) {
        output.verbose_ctx("ask", "returning outstanding pending question");
        print_question(output, outstanding);
        return Ok(());
    }

    let ranking = vault.topic_ranking();
    let Some(question) = domain::next(&questions, &ranking) else {
        output.success("All caught up - no unanswered questions.");
        return Ok(());
    };

    let engine = TransitionEngine::new(vault);
    match engine.transition(question, Target::Pending)? {
        TransitionResult::Applied => {
            let mut presented = question.clone();
            presented.status = resulting_status(&Target::Pending);
            print_question(output, &presented);
        }
        TransitionResult::NotFound => {
            output.failure(&format!(
                "Question line not found, the document may have changed: {}",
                question.clean_text
            ));
        }
    }
    Ok(())
}

/// Resolves a question with an answer
pub fn answer(
    vault: &Vault,
    output: &Output,
    question: Option<&str>,
    yes: bool,
    no: bool,
    text: Option<String>,
) -> Result<()> {
    let target = if no {
        if yes || text.is_some() {
            bail!("--no conflicts with --yes and --text");
        }
        Target::AnsweredNo
    } else if yes || text.is_some() {
        Target::AnsweredYes(text)
    } else {
        bail!("Pass --yes, --no, or --text to record an answer");
    };

    apply(vault, output, question, target, false)
}

/// Skips a question permanently
pub fn skip(vault: &Vault, output: &Output, question: Option<&str>) -> Result<()> {
    apply(vault, output, question, Target::Skipped, false)
}

/// Reverts a pending question back to unanswered
pub fn revert(vault: &Vault, output: &Output, question: Option<&str>) -> Result<()> {
    apply(vault, output, question, Target::Unanswered, true)
}

/// Reverts every pending question in the vault
pub fn recover(vault: &Vault, output: &Output) -> Result<()> {
    let engine = TransitionEngine::new(vault);
    let reverted = engine.recover()?;

    if output.is_json() {
        output.data(&serde_json::json!({ "reverted": reverted }));
    } else {
        output.success(&format!("Reverted {} pending question(s)", reverted));
    }
    Ok(())
}

/// Shows the outstanding pending question, if any
pub fn pending(vault: &Vault, output: &Output) -> Result<()> {
    let questions = vault.scan(&vault.activity_log());
    let outstanding = domain::pending(&questions);

    if output.is_json() {
        output.data(&serde_json::json!({
            "pending": outstanding.is_some(),
            "question": outstanding,
        }));
    } else {
        match outstanding {
            Some(question) => print_question(output, question),
            None => output.success("No pending question."),
        }
    }
    Ok(())
}

/// Lists upcoming unanswered questions in selection order
pub fn list(vault: &Vault, output: &Output, limit: usize) -> Result<()> {
    let questions = vault.scan(&vault.activity_log());
    let ranking = vault.topic_ranking();
    let upcoming: Vec<&Question> = domain::unanswered_in_order(&questions, &ranking)
        .into_iter()
        .take(limit)
        .collect();

    if output.is_json() {
        output.data(&upcoming);
        return Ok(());
    }

    if upcoming.is_empty() {
        output.success("All caught up - no unanswered questions.");
        return Ok(());
    }

    println!("{:<24} QUESTION", "TOPIC");
    println!("{}", "-".repeat(70));
    for question in upcoming {
        println!("{:<24} {}", question.topic.name(), question.clean_text);
    }
    Ok(())
}

/// Resolves the target question and applies one transition
fn apply(
    vault: &Vault,
    output: &Output,
    question: Option<&str>,
    target: Target,
    pending_only: bool,
) -> Result<()> {
    let questions = vault.scan(&vault.activity_log());
    let subject = resolve_target(&questions, question, pending_only)?;

    let verb = match &target {
        Target::Pending => "Marked pending",
        Target::AnsweredYes(_) | Target::AnsweredNo => "Answered",
        Target::Skipped => "Skipped",
        Target::Unanswered => "Reverted",
    };

    let engine = TransitionEngine::new(vault);
    match engine.transition(subject, target)? {
        TransitionResult::Applied => {
            output.success(&format!("{}: {}", verb, subject.clean_text));
        }
        TransitionResult::NotFound => {
            output.failure(&format!(
                "Question line not found, the document may have changed: {}",
                subject.clean_text
            ));
        }
    }
    Ok(())
}

/// Picks the question a resolution refers to
///
/// With explicit text, a pending match wins over an unanswered one (the
/// presenter normally resolves what it just showed). Without text, the
/// outstanding pending question is the only sensible subject.
fn resolve_target<'a>(
    questions: &'a [Question],
    text: Option<&str>,
    pending_only: bool,
) -> Result<&'a Question> {
    match text {
        Some(text) => questions
            .iter()
            .find(|q| q.status.is_pending() && q.clean_text == text)
            .or_else(|| {
                if pending_only {
                    None
                } else {
                    questions
                        .iter()
                        .find(|q| q.status.is_open() && q.clean_text == text)
                }
            })
            .ok_or_else(|| anyhow::anyhow!("No open question matching: {}", text)),
        None => domain::pending(questions)
            .ok_or_else(|| anyhow::anyhow!("No pending question to resolve")),
    }
}

/// Prints one question for presenters
fn print_question(output: &Output, question: &Question) {
    if output.is_json() {
        output.data(question);
        return;
    }

    println!("{}", question.clean_text);
    println!(
        "  topic: {}   buttons: {} / {}   status: {}",
        question.topic.name(),
        question.labels.yes,
        question.labels.no,
        question.status.label()
    );
}
