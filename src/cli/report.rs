//! Reporting commands: answered-question queries and vault status

use anyhow::Result;
use chrono::{Local, NaiveDate};

use super::output::Output;
use crate::domain::QuestionStatus;
use crate::engine::{answers_on, QaPair};
use crate::storage::Vault;

/// Shows answered questions for a date
///
/// Without an explicit date, today is queried first and yesterday is used
/// as a fallback when today has no answers yet - the common case for a
/// summary job running shortly after midnight.
pub fn answers(
    vault: &Vault,
    output: &Output,
    date: Option<NaiveDate>,
    count: bool,
) -> Result<()> {
    let log = vault.activity_log();

    let (effective_date, pairs) = match date {
        Some(date) => (date, answers_on(vault, date, &log)),
        None => {
            let today = Local::now().date_naive();
            let pairs = answers_on(vault, today, &log);
            if pairs.is_empty() {
                let yesterday = today.pred_opt().unwrap_or(today);
                output.verbose_ctx("answers", "no answers today, trying yesterday");
                (yesterday, answers_on(vault, yesterday, &log))
            } else {
                (today, pairs)
            }
        }
    };

    if count {
        if output.is_json() {
            output.data(&serde_json::json!({
                "date": effective_date.to_string(),
                "count": pairs.len(),
            }));
        } else {
            println!("{}", pairs.len());
        }
        return Ok(());
    }

    if output.is_json() {
        output.data(&serde_json::json!({
            "date": effective_date.to_string(),
            "answers": pairs,
        }));
        return Ok(());
    }

    if pairs.is_empty() {
        output.success(&format!("No answers recorded on {}", effective_date));
        return Ok(());
    }

    println!("Answers from {}:", effective_date);
    output.blank();
    for QaPair { question, answer } in &pairs {
        println!("Q: {}", question);
        println!("A: {}", answer);
        output.blank();
    }
    Ok(())
}

/// Shows per-topic question counts
pub fn status(vault: &Vault, output: &Output) -> Result<()> {
    let questions = vault.scan(&vault.activity_log());

    // Aggregate in first-seen topic order
    let mut rows: Vec<(String, [usize; 4])> = Vec::new();
    for question in &questions {
        let name = question.topic.name();
        let row = match rows.iter().position(|(topic, _)| topic == name) {
            Some(i) => i,
            None => {
                rows.push((name.to_string(), [0; 4]));
                rows.len() - 1
            }
        };
        let col = match question.status {
            QuestionStatus::Unanswered => 0,
            QuestionStatus::Pending => 1,
            QuestionStatus::Answered => 2,
            QuestionStatus::Skipped => 3,
        };
        rows[row].1[col] += 1;
    }

    if output.is_json() {
        let items: Vec<_> = rows
            .iter()
            .map(|(topic, [unanswered, pending, answered, skipped])| {
                serde_json::json!({
                    "topic": topic,
                    "unanswered": unanswered,
                    "pending": pending,
                    "answered": answered,
                    "skipped": skipped,
                })
            })
            .collect();
        output.data(&items);
        return Ok(());
    }

    if rows.is_empty() {
        output.success("No questions found in the vault.");
        return Ok(());
    }

    println!(
        "{:<24} {:>10} {:>8} {:>9} {:>8}",
        "TOPIC", "UNANSWERED", "PENDING", "ANSWERED", "SKIPPED"
    );
    println!("{}", "-".repeat(64));
    for (topic, [unanswered, pending, answered, skipped]) in &rows {
        println!(
            "{:<24} {:>10} {:>8} {:>9} {:>8}",
            topic, unanswered, pending, answered, skipped
        );
    }

    output.blank();
    println!("{} question(s) total", questions.len());
    Ok(())
}
