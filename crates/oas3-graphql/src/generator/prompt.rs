//! Decision oracles consulted while composing `allOf` members and picking operations.

use std::{fmt, io};

use inquire::{Confirm, InquireError, Select};

use super::{errors::GeneratorError, recording::Recording};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Answer {
  Yes,
  No,
  Select,
}

impl Answer {
  pub fn from_char(c: char) -> Option<Self> {
    match c.to_ascii_lowercase() {
      'y' => Some(Self::Yes),
      'n' => Some(Self::No),
      's' => Some(Self::Select),
      _ => None,
    }
  }

  pub const fn as_char(self) -> char {
    match self {
      Self::Yes => 'y',
      Self::No => 'n',
      Self::Select => 's',
    }
  }
}

impl From<bool> for Answer {
  fn from(value: bool) -> Self {
    if value { Self::Yes } else { Self::No }
  }
}

pub trait Prompt {
  fn yes_no(&mut self, question: &str) -> Result<bool, GeneratorError>;

  /// Ternary decision; `Select` asks for a per-item follow-up.
  fn yes_no_select(&mut self, question: &str) -> Result<Answer, GeneratorError>;

  /// Answers captured so far, for oracles that record.
  fn recording(&self) -> Option<&Recording> {
    None
  }
}

/// Asks the operator on the terminal. `inquire` draws on stderr, so output on stdout stays clean.
#[derive(Debug, Default)]
pub struct ConsolePrompt;

/// A ternary option as offered in the selection list.
#[derive(Debug, Clone, Copy)]
struct Choice(Answer);

impl fmt::Display for Choice {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self.0 {
      Answer::Yes => write!(f, "y  add all"),
      Answer::No => write!(f, "n  add none"),
      Answer::Select => write!(f, "s  choose each one"),
    }
  }
}

impl Prompt for ConsolePrompt {
  fn yes_no(&mut self, question: &str) -> Result<bool, GeneratorError> {
    Confirm::new(question)
      .with_default(true)
      .prompt()
      .map_err(prompt_error)
  }

  fn yes_no_select(&mut self, question: &str) -> Result<Answer, GeneratorError> {
    let choices = vec![Choice(Answer::Yes), Choice(Answer::No), Choice(Answer::Select)];
    Select::new(question, choices)
      .with_help_message("↑↓ to move, enter to answer")
      .prompt()
      .map(|choice| choice.0)
      .map_err(prompt_error)
  }
}

fn prompt_error(err: InquireError) -> GeneratorError {
  match err {
    InquireError::OperationCanceled | InquireError::OperationInterrupted => GeneratorError::PromptClosed,
    InquireError::IO(source) => GeneratorError::PromptInput(source),
    other => GeneratorError::PromptInput(io::Error::other(other.to_string())),
  }
}

/// Forwards to an inner oracle and keeps every answer in decision order.
pub struct RecorderPrompt<P> {
  inner: P,
  recording: Recording,
}

impl<P: Prompt> RecorderPrompt<P> {
  pub fn new(inner: P) -> Self {
    Self {
      inner,
      recording: Recording::new(),
    }
  }
}

impl<P: Prompt> Prompt for RecorderPrompt<P> {
  fn yes_no(&mut self, question: &str) -> Result<bool, GeneratorError> {
    let answer = self.inner.yes_no(question)?;
    self.recording.push(Answer::from(answer));
    Ok(answer)
  }

  fn yes_no_select(&mut self, question: &str) -> Result<Answer, GeneratorError> {
    let answer = self.inner.yes_no_select(question)?;
    self.recording.push(answer);
    Ok(answer)
  }

  fn recording(&self) -> Option<&Recording> {
    Some(&self.recording)
  }
}

/// Replays a recording strictly in order.
pub struct PlayerPrompt {
  recording: Recording,
  cursor: usize,
}

impl PlayerPrompt {
  pub fn new(recording: Recording) -> Self {
    Self { recording, cursor: 0 }
  }

  fn next(&mut self, question: &str) -> Result<Answer, GeneratorError> {
    let answer = self
      .recording
      .answers()
      .get(self.cursor)
      .copied()
      .ok_or(GeneratorError::RecordingExhausted {
        position: self.cursor + 1,
      })?;
    self.cursor += 1;
    tracing::debug!(question, answer = %answer.as_char(), "replayed decision");
    Ok(answer)
  }

  pub fn remaining(&self) -> usize {
    self.recording.len().saturating_sub(self.cursor)
  }
}

impl Prompt for PlayerPrompt {
  fn yes_no(&mut self, question: &str) -> Result<bool, GeneratorError> {
    match self.next(question)? {
      Answer::Yes => Ok(true),
      Answer::No => Ok(false),
      Answer::Select => Err(GeneratorError::RecordingMismatch {
        position: self.cursor,
        answer: Answer::Select.as_char(),
      }),
    }
  }

  fn yes_no_select(&mut self, question: &str) -> Result<Answer, GeneratorError> {
    self.next(question)
  }
}

/// Accepts every decision without interaction.
#[derive(Debug, Default)]
pub struct YesPrompt;

impl Prompt for YesPrompt {
  fn yes_no(&mut self, _question: &str) -> Result<bool, GeneratorError> {
    Ok(true)
  }

  fn yes_no_select(&mut self, _question: &str) -> Result<Answer, GeneratorError> {
    Ok(Answer::Yes)
  }
}

/// The oracle strategy active for one run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputMode {
  Prompt,
  Record,
  Skip,
  Replay(Recording),
}

impl InputMode {
  pub fn into_prompt(self) -> Box<dyn Prompt> {
    match self {
      Self::Prompt => Box::new(ConsolePrompt),
      Self::Record => Box::new(RecorderPrompt::new(ConsolePrompt)),
      Self::Skip => Box::new(YesPrompt),
      Self::Replay(recording) => Box::new(PlayerPrompt::new(recording)),
    }
  }

  pub const fn is_record(&self) -> bool {
    matches!(self, Self::Record)
  }
}
