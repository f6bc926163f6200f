//! Operator prompts
//!
//! The session only talks to a [`Prompter`]. [`TermPrompter`] renders real
//! prompts with dialoguer; [`ScriptedPrompter`] replays canned answers and is
//! what the tests drive the lifecycle with.

use anyhow::{Context, Result};
use dialoguer::theme::ColorfulTheme;
use dialoguer::{Confirm, Input, Select};
use std::collections::VecDeque;

/// Source of operator decisions.
pub trait Prompter {
    /// Pick one of `choices`, returning its index
    fn select(&mut self, message: &str, choices: &[String]) -> Result<usize>;

    /// Yes/no question
    fn confirm(&mut self, message: &str) -> Result<bool>;

    /// Free text answer
    fn input(&mut self, message: &str) -> Result<String>;
}

/// Interactive prompts on the controlling terminal.
pub struct TermPrompter {
    theme: ColorfulTheme,
}

impl TermPrompter {
    pub fn new() -> Self {
        Self {
            theme: ColorfulTheme::default(),
        }
    }
}

impl Default for TermPrompter {
    fn default() -> Self {
        Self::new()
    }
}

impl Prompter for TermPrompter {
    fn select(&mut self, message: &str, choices: &[String]) -> Result<usize> {
        Select::with_theme(&self.theme)
            .with_prompt(message)
            .items(choices)
            .default(0)
            .interact()
            .context("Failed to read selection")
    }

    fn confirm(&mut self, message: &str) -> Result<bool> {
        Confirm::with_theme(&self.theme)
            .with_prompt(message)
            .default(false)
            .interact()
            .context("Failed to read confirmation")
    }

    fn input(&mut self, message: &str) -> Result<String> {
        Input::<String>::with_theme(&self.theme)
            .with_prompt(message)
            .allow_empty(true)
            .interact_text()
            .context("Failed to read input")
    }
}

/// One canned answer for [`ScriptedPrompter`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Answer {
    /// Select the choice with this exact label
    Pick(String),
    Confirm(bool),
    Text(String),
}

/// Replays a fixed list of answers in order.
///
/// Running out of answers, or hitting an answer of the wrong kind, is an
/// error rather than a hang, so a scripted run always terminates.
#[derive(Debug, Default)]
pub struct ScriptedPrompter {
    answers: VecDeque<Answer>,
    /// Every select prompt seen, with the choices that were offered
    pub offered: Vec<(String, Vec<String>)>,
}

impl ScriptedPrompter {
    pub fn new(answers: impl IntoIterator<Item = Answer>) -> Self {
        Self {
            answers: answers.into_iter().collect(),
            offered: Vec::new(),
        }
    }

    /// Answers not consumed yet
    pub fn remaining(&self) -> usize {
        self.answers.len()
    }

    fn next(&mut self, message: &str) -> Result<Answer> {
        self.answers
            .pop_front()
            .with_context(|| format!("No scripted answer left for prompt: {}", message))
    }
}

impl Prompter for ScriptedPrompter {
    fn select(&mut self, message: &str, choices: &[String]) -> Result<usize> {
        self.offered.push((message.to_string(), choices.to_vec()));
        match self.next(message)? {
            Answer::Pick(label) => choices.iter().position(|c| *c == label).with_context(|| {
                format!("'{}' is not among the choices for: {}", label, message)
            }),
            other => anyhow::bail!("Expected a selection for '{}', got {:?}", message, other),
        }
    }

    fn confirm(&mut self, message: &str) -> Result<bool> {
        match self.next(message)? {
            Answer::Confirm(yes) => Ok(yes),
            other => anyhow::bail!("Expected a confirmation for '{}', got {:?}", message, other),
        }
    }

    fn input(&mut self, message: &str) -> Result<String> {
        match self.next(message)? {
            Answer::Text(text) => Ok(text),
            other => anyhow::bail!("Expected text for '{}', got {:?}", message, other),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn choices(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_scripted_select_by_label() {
        let mut p = ScriptedPrompter::new([Answer::Pick("Module".into())]);
        let idx = p.select("What?", &choices(&["Block", "Module", "Cancel"])).unwrap();
        assert_eq!(idx, 1);
        assert_eq!(p.offered[0].1, choices(&["Block", "Module", "Cancel"]));
        assert_eq!(p.remaining(), 0);
    }

    #[test]
    fn test_scripted_unknown_label_is_error() {
        let mut p = ScriptedPrompter::new([Answer::Pick("Reinstall".into())]);
        assert!(p.select("Action?", &choices(&["Uninstall", "Cancel"])).is_err());
    }

    #[test]
    fn test_scripted_exhausted_is_error() {
        let mut p = ScriptedPrompter::default();
        assert!(p.confirm("Sure?").is_err());
    }

    #[test]
    fn test_scripted_kind_mismatch_is_error() {
        let mut p = ScriptedPrompter::new([Answer::Text("x".into())]);
        assert!(p.confirm("Sure?").is_err());
    }
}
