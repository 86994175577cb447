use std::{io, path::PathBuf};

/// Fatal conditions raised while building or emitting the type graph.
///
/// None of these are retried: each one aborts the run and is reported to the operator.
#[derive(Debug, thiserror::Error)]
pub enum GeneratorError {
  #[error("unresolved reference '{reference}'")]
  MalformedReference { reference: String },

  #[error("unsupported schema kind at {node}: {detail}")]
  UnsupportedSchemaShape { node: String, detail: String },

  #[error("invalid declaration at {location}: {message}")]
  InvalidDocument { location: String, message: String },

  #[error("recording exhausted: no answer left for decision #{position}")]
  RecordingExhausted { position: usize },

  #[error("recording is empty")]
  EmptyRecording,

  #[error("invalid recording line {line}: '{content}' (expected a line starting with 'y', 'n' or 's')")]
  InvalidRecording { line: usize, content: String },

  #[error("recording answer #{position} is '{answer}' but the decision only accepts 'y' or 'n'")]
  RecordingMismatch { position: usize, answer: char },

  #[error("{node} was queried before it was visited")]
  NotVisited { node: String },

  #[error("failed to read prompt answer")]
  PromptInput(#[source] io::Error),

  #[error("prompt input closed before an answer was given")]
  PromptClosed,

  #[error("could not overwrite destination file '{}'", path.display())]
  OutputConflict {
    path: PathBuf,
    #[source]
    source: io::Error,
  },

  #[error(transparent)]
  Format(#[from] std::fmt::Error),
}
