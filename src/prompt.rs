//! Operator prompts.

use anyhow::Result;
use std::io::{self, BufRead, Write};

/// Asks the operator a yes/no question.
pub trait Prompter {
    fn confirm(&self, question: &str) -> Result<bool>;
}

/// Confirm prompt on stdin (y/N). Answers no when stdin is not a terminal.
pub struct StdinPrompter;

impl Prompter for StdinPrompter {
    fn confirm(&self, question: &str) -> Result<bool> {
        if !atty::is(atty::Stream::Stdin) {
            tracing::debug!("stdin is not a terminal, answering no to: {question}");
            return Ok(false);
        }

        print!("{question} [y/N]: ");
        io::stdout().flush()?;

        let mut input = String::new();
        io::stdin().lock().read_line(&mut input)?;
        Ok(parse_answer(&input))
    }
}

/// Fixed answer, for non-interactive runs.
pub struct FixedAnswer(pub bool);

impl Prompter for FixedAnswer {
    fn confirm(&self, _question: &str) -> Result<bool> {
        Ok(self.0)
    }
}

/// `y`/`yes` in any case is affirmative; anything else, including empty, is not.
pub fn parse_answer(input: &str) -> bool {
    let trimmed = input.trim().to_lowercase();
    trimmed == "y" || trimmed == "yes"
}
