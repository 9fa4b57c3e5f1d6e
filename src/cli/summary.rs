//! Daily portrait generation
//!
//! Collects the day's answers, asks the configured narrator for prose,
//! and writes a dated portrait document into the vault root.

use std::fs;

use anyhow::{Context, Result};
use chrono::{Days, Local, NaiveDate};

use super::output::Output;
use crate::engine::{answers_on, QaPair};
use crate::narrative::{
    profile_pronouns, CommandNarrator, Narrator, Pronouns, TemplateNarrator,
};
use crate::storage::{ActivityLog, Config, Vault};

/// Builds and writes (or prints) the portrait for a date
pub fn run(
    vault: &Vault,
    output: &Output,
    config: &Config,
    date: Option<NaiveDate>,
    stdout: bool,
) -> Result<()> {
    let date = date.unwrap_or_else(|| Local::now().date_naive());
    let log = vault.activity_log();

    let pairs = answers_on(vault, date, &log);
    let pronouns = profile_pronouns(vault);
    output.verbose_ctx(
        "summary",
        &format!("{} answered question(s) on {}", pairs.len(), date),
    );

    let narrative = generate(config, date, &pairs, &pronouns, &log)?;
    let portrait = compose_portrait(date, &narrative, pairs.len());

    if stdout {
        println!("{}", portrait);
        return Ok(());
    }

    let path = vault.root().join(format!("{}.md", date));
    let temp_path = path.with_extension("md.tmp");
    fs::write(&temp_path, &portrait)
        .with_context(|| format!("Failed to write temp file: {}", temp_path.display()))?;
    fs::rename(&temp_path, &path)
        .with_context(|| format!("Failed to write portrait: {}", path.display()))?;

    log.record(&format!("Daily portrait written: {}", path.display()));
    if output.is_json() {
        output.data(&serde_json::json!({
            "date": date.to_string(),
            "path": path.display().to_string(),
            "answers": pairs.len(),
        }));
    } else {
        output.success(&format!("Wrote {}", path.display()));
    }
    Ok(())
}

/// Runs the configured narrator, falling back to the template on failure
fn generate(
    config: &Config,
    date: NaiveDate,
    pairs: &[QaPair],
    pronouns: &Pronouns,
    log: &ActivityLog,
) -> Result<String> {
    if let Some(command) = &config.narrative.command {
        match CommandNarrator::new(command).narrate(date, pairs, pronouns) {
            Ok(narrative) => return Ok(narrative),
            Err(e) => log.record(&format!(
                "Narrative command failed, using fallback: {:#}",
                e
            )),
        }
    }

    TemplateNarrator.narrate(date, pairs, pronouns)
}

/// Renders the portrait document
fn compose_portrait(date: NaiveDate, narrative: &str, answer_count: usize) -> String {
    let prev = date.checked_sub_days(Days::new(1)).unwrap_or(date);
    let next = date.checked_add_days(Days::new(1)).unwrap_or(date);

    format!(
        "\
# Daily Portrait - {long_date}

*A personal narrative based on the day's answered questions*

---

{narrative}

---

**Questions explored:** {answer_count}

[[{prev}]] | [[{next}]]

#daily #portrait #{year} #{month}
",
        long_date = date.format("%B %-d, %Y"),
        narrative = narrative,
        answer_count = answer_count,
        prev = prev,
        next = next,
        year = date.format("%Y"),
        month = date.format("%B").to_string().to_lowercase(),
    )
}
