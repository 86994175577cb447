use std::{fmt, str::FromStr};

use super::{errors::GeneratorError, prompt::Answer};

/// An ordered list of oracle answers, one per line as `y`, `n` or `s`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Recording {
  answers: Vec<Answer>,
}

impl Recording {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn push(&mut self, answer: Answer) {
    self.answers.push(answer);
  }

  pub fn answers(&self) -> &[Answer] {
    &self.answers
  }

  pub fn len(&self) -> usize {
    self.answers.len()
  }
}

impl FromIterator<Answer> for Recording {
  fn from_iter<T: IntoIterator<Item = Answer>>(iter: T) -> Self {
    Self {
      answers: iter.into_iter().collect(),
    }
  }
}

/// Only the leading character of each line is significant; blank lines are skipped.
impl FromStr for Recording {
  type Err = GeneratorError;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    let mut answers = vec![];
    for (index, line) in s.lines().enumerate() {
      let line = line.trim();
      let Some(first) = line.chars().next() else {
        continue;
      };
      let answer = Answer::from_char(first).ok_or_else(|| GeneratorError::InvalidRecording {
        line: index + 1,
        content: line.to_string(),
      })?;
      answers.push(answer);
    }

    if answers.is_empty() {
      return Err(GeneratorError::EmptyRecording);
    }

    Ok(Self { answers })
  }
}

impl fmt::Display for Recording {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    for answer in &self.answers {
      writeln!(f, "{}", answer.as_char())?;
    }
    Ok(())
  }
}
