//! Operator prompts and the end-of-run summary
//!
//! The prompts only collect input; every decision made on the answers lives in
//! plain functions so it can be tested without a terminal.

use crate::types::RunSummary;
use crate::{Error, Result};
use dialoguer::{Input, Password};
use std::fmt::Write as _;

/// Exit code when the operator is not running as root
pub const EXIT_NOT_ROOT: i32 = 1;
/// Exit code when the two database names differ
pub const EXIT_DATABASE_MISMATCH: i32 = 2;

/// Answers needed to open the datastore
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    /// Password of the datastore user
    pub password: String,
    /// Database to update
    pub database: String,
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("password", &"<redacted>")
            .field("database", &self.database)
            .finish()
    }
}

/// Result of the start-up prompts
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PromptOutcome {
    /// Go ahead with these credentials
    Proceed(Credentials),
    /// The operator did not confirm running as root
    NotRoot,
    /// The database name was not entered the same way twice
    DatabaseMismatch,
}

impl PromptOutcome {
    /// Process exit code for outcomes that stop the program
    pub fn exit_code(&self) -> Option<i32> {
        match self {
            PromptOutcome::Proceed(_) => None,
            PromptOutcome::NotRoot => Some(EXIT_NOT_ROOT),
            PromptOutcome::DatabaseMismatch => Some(EXIT_DATABASE_MISMATCH),
        }
    }
}

/// Whether a y/n answer means yes
pub fn is_affirmative(answer: &str) -> bool {
    matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes")
}

/// Combine the prompt answers into an outcome
pub fn evaluate_answers(
    root_answer: Option<&str>,
    password: String,
    database: &str,
    database_again: &str,
) -> PromptOutcome {
    if root_answer.is_some_and(|answer| !is_affirmative(answer)) {
        return PromptOutcome::NotRoot;
    }
    if database != database_again {
        return PromptOutcome::DatabaseMismatch;
    }
    PromptOutcome::Proceed(Credentials {
        password,
        database: database.to_string(),
    })
}

/// Ask the start-up questions on the terminal.
///
/// The root question is skipped when `assume_root` is set. Messages for the
/// stopping outcomes are printed here.
pub fn prompt_credentials(user: &str, assume_root: bool) -> Result<PromptOutcome> {
    let root_answer = if assume_root {
        None
    } else {
        let answer: String = Input::new()
            .with_prompt("Are you logged in as root user? (y/n)")
            .interact_text()
            .map_err(prompt_error)?;
        if !is_affirmative(&answer) {
            println!(
                "You need to switch to the root user before running this program (or run it with `sudo`)"
            );
            return Ok(PromptOutcome::NotRoot);
        }
        Some(answer)
    };

    let password = Password::new()
        .with_prompt(format!("Please type in the password for MySQL \"{user}\" user"))
        .allow_empty_password(true)
        .interact()
        .map_err(prompt_error)?;
    let database: String = Input::new()
        .with_prompt("Please type in the name of the database needs updating")
        .interact_text()
        .map_err(prompt_error)?;
    let database_again: String = Input::new()
        .with_prompt("Please re-type the name of the database to confirm")
        .interact_text()
        .map_err(prompt_error)?;

    let outcome = evaluate_answers(root_answer.as_deref(), password, &database, &database_again);
    if outcome == PromptOutcome::DatabaseMismatch {
        println!("Database names do NOT match!");
    }
    Ok(outcome)
}

fn prompt_error(e: dialoguer::Error) -> Error {
    Error::Other(format!("failed to read operator input: {e}"))
}

/// Final report printed after a run
pub fn render_summary(summary: &RunSummary, debug: bool) -> String {
    let mut out = String::new();

    let _ = writeln!(out, "\nMolecules with missing SDS:");
    if summary.missing.is_empty() {
        let _ = writeln!(out, "  (none)");
    }
    for cas_nr in &summary.missing {
        let _ = writeln!(out, "  {cas_nr}");
    }

    if !summary.failed_updates.is_empty() {
        let _ = writeln!(out, "\nMolecules whose update failed:");
        for (cas_nr, reason) in &summary.failed_updates {
            let _ = writeln!(out, "  {cas_nr}: {reason}");
        }
    }

    let _ = writeln!(out, "\nSummary:");
    let _ = writeln!(out, "\t{} SDS files are missing.", summary.missing.len());
    let _ = writeln!(out, "\t{} SDS files updated!", summary.updated);

    if !debug {
        let _ = writeln!(
            out,
            "\n\n(Optional): you can turn on debug mode (more error printing during SDS search) using the following command:"
        );
        let _ = writeln!(out, "oe-find-sds --debug");
    }

    out
}
