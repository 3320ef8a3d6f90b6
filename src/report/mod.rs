//! Console reporting of detected changes.
//!
//! The bundled [`ConsoleReporter`] is the default action executor and fetch
//! error handler: it prints one colored line per change, with an optional
//! highlight pass that flags records mentioning configured terms. Output
//! goes through [`crate::utils::emit`] so it renders correctly while the
//! key listener holds the terminal in raw mode.

use std::fmt::Display;

use anyhow::{Context, Result};
use chrono::Local;
use colored::Colorize;
use regex::{Regex, RegexBuilder};

use crate::models::{Change, ChangeSet, Record};
use crate::monitor::{ActionExecutor, FetchError, FetchErrorHandler};
use crate::utils::emit;

/// Flags record text containing any of a configured set of terms.
///
/// Terms match as whole words, case-insensitively. An empty term list
/// produces a highlighter that never matches.
pub struct Highlighter {
    pattern: Option<Regex>,
}

impl Highlighter {
    pub fn new(terms: &[String]) -> Result<Self> {
        let terms: Vec<&str> = terms
            .iter()
            .map(|t| t.trim())
            .filter(|t| !t.is_empty())
            .collect();
        if terms.is_empty() {
            return Ok(Self { pattern: None });
        }

        let escaped: Vec<String> = terms.iter().map(|t| regex::escape(t)).collect();
        let pattern = RegexBuilder::new(&format!(r"\b(?:{})\b", escaped.join("|")))
            .case_insensitive(true)
            .build()
            .context("failed to compile highlight pattern")?;
        Ok(Self {
            pattern: Some(pattern),
        })
    }

    pub fn matches(&self, text: &str) -> bool {
        self.pattern.as_ref().is_some_and(|p| p.is_match(text))
    }
}

/// Prints change sets and fetch failures for one watched domain.
pub struct ConsoleReporter {
    watch: String,
    highlighter: Highlighter,
}

impl ConsoleReporter {
    pub fn new(watch: impl Into<String>, highlight_terms: &[String]) -> Result<Self> {
        Ok(Self {
            watch: watch.into(),
            highlighter: Highlighter::new(highlight_terms)?,
        })
    }

    fn render_change<T: Record + Display>(&self, change: &Change<T>) -> String {
        let (sigil, body) = match change {
            Change::Created(record) => ("+".green(), record.to_string()),
            Change::Deleted(record) => ("-".red(), record.to_string()),
            Change::Updated { after, .. } => ("~".yellow(), after.to_string()),
        };
        let mark = if self.highlighter.matches(&body) {
            format!("{} ", "!".red().bold())
        } else {
            String::new()
        };
        format!("  {sigil} {mark}{} {body}", change.label().dimmed())
    }
}

impl<T: Record + Display> ActionExecutor<T> for ConsoleReporter {
    fn execute(&mut self, changes: &ChangeSet<T>) {
        let stamp = Local::now().format("%Y-%m-%d %H:%M:%S");
        emit(format!(
            "{} {} {}",
            format!("[{stamp}]").dimmed(),
            self.watch.bold(),
            format!(
                "{} change{}",
                changes.len(),
                if changes.len() == 1 { "" } else { "s" }
            ),
        ));
        for change in changes.values() {
            emit(self.render_change(change));
        }
    }
}

impl FetchErrorHandler for ConsoleReporter {
    fn handle(&mut self, error: &FetchError) {
        emit(format!(
            "{} {}: {}",
            self.watch.bold(),
            "fetch failed".red(),
            error.message(),
        ));
    }
}
