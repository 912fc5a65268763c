//! Interactive acquisition of missing settings
//!
//! Generic over any `BufRead` / `Write` pair; the binary hands it locked stdin and
//! stdout, tests hand it in-memory buffers.

use super::cli_convert::{parse_count, parse_mode};
use crate::error::PiError;
use crate::partition::SchedulingMode;
use crate::Result;
use anyhow::Context;
use std::io::{BufRead, Write};

/// Line-oriented prompter
pub struct Prompter<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> Prompter<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    /// Consume the prompter and return its output sink
    pub fn into_output(self) -> W {
        self.output
    }

    /// Print a question and read one trimmed line
    ///
    /// Returns `None` at end of input.
    pub fn ask(&mut self, question: &str) -> Result<Option<String>> {
        write!(self.output, "{}: ", question).context("Failed to write prompt")?;
        self.output.flush().context("Failed to flush prompt")?;

        let mut line = String::new();
        let read = self
            .input
            .read_line(&mut line)
            .context("Failed to read from standard input")?;
        if read == 0 {
            return Ok(None);
        }
        Ok(Some(line.trim().to_string()))
    }

    /// Ask for a non-negative integer
    ///
    /// An empty answer (or end of input) takes `default`; without a default it is a parse
    /// error.
    pub fn ask_count(
        &mut self,
        field: &'static str,
        question: &str,
        default: Option<u64>,
    ) -> Result<u64> {
        let question = match default {
            Some(value) => format!("{} [default: {}]", question, value),
            None => question.to_string(),
        };

        match (self.ask(&question)?, default) {
            (Some(answer), _) if !answer.is_empty() => Ok(parse_count(field, &answer)?),
            (_, Some(value)) => Ok(value),
            (answer, None) => Err(PiError::InputParse {
                field,
                input: answer.unwrap_or_default(),
            }
            .into()),
        }
    }

    /// Ask for an optional override; an empty answer keeps `None`
    pub fn ask_optional_count(
        &mut self,
        field: &'static str,
        question: &str,
        default: u64,
    ) -> Result<Option<u64>> {
        let question = format!("{} [default: {}]", question, default);
        match self.ask(&question)? {
            Some(answer) if !answer.is_empty() => Ok(Some(parse_count(field, &answer)?)),
            _ => Ok(None),
        }
    }

    /// Ask for the scheduling mode
    pub fn ask_mode(&mut self, default: SchedulingMode) -> Result<SchedulingMode> {
        let question = format!("Scheduling mode (static/dynamic) [default: {}]", default);
        match self.ask(&question)? {
            Some(answer) if !answer.is_empty() => Ok(parse_mode(&answer)?),
            _ => Ok(default),
        }
    }
}
