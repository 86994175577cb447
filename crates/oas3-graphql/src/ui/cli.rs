use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

use super::colors::{ColorMode, Colors, ThemeMode};

#[derive(Parser, Debug)]
#[command(name = "oas3-graphql")]
#[command(author, version, about = "OpenAPI and Swagger to GraphQL generator", styles = Colors::clap_styles())]
pub struct Cli {
  #[command(subcommand)]
  pub command: Commands,

  /// Control color output
  #[arg(long, value_enum, default_value = "auto", global = true)]
  pub color: ColorMode,

  /// Terminal theme (dark or light background)
  #[arg(long, value_enum, default_value = "auto", global = true)]
  pub theme: ThemeMode,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
  /// List information from an OpenAPI or Swagger document
  List {
    #[command(subcommand)]
    list_command: ListCommands,
  },
  /// Generate GraphQL SDL or query selection sets
  Generate(GenerateCommand),
}

#[derive(Args, Debug)]
pub struct GenerateCommand {
  /// Path to the OpenAPI or Swagger document (JSON or YAML)
  #[arg(value_name = "FILE", required_unless_present = "input_flag", conflicts_with = "input_flag")]
  pub input: Option<PathBuf>,

  /// Path to the OpenAPI or Swagger document, as a flag
  #[arg(short = 'i', long = "input", value_name = "FILE", id = "input_flag")]
  pub input_flag: Option<PathBuf>,

  /// Where the generated GraphQL is written (stdout when omitted)
  #[arg(short, long, value_name = "FILE")]
  pub output: Option<PathBuf>,

  /// Generation mode
  #[arg(short, long, value_enum, default_value = "types")]
  pub mode: GenerateMode,

  /// How composition and path decisions are answered
  #[arg(long, value_enum, default_value = "prompt")]
  pub input_type: InputType,

  /// Replay decisions from a recording file (overrides --input-type)
  #[arg(short, long, value_name = "FILE")]
  pub recording: Option<PathBuf>,

  /// Where record mode saves its answers (stderr when omitted)
  #[arg(long, value_name = "FILE")]
  pub save_recording: Option<PathBuf>,

  /// Enable verbose output with detailed progress information
  #[arg(short, long, default_value_t = false)]
  pub verbose: bool,

  /// Suppress non-essential output (errors only)
  #[arg(short, long, default_value_t = false)]
  pub quiet: bool,
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum GenerateMode {
  /// GraphQL SDL type definitions and a Query root
  Types,
  /// One query selection set per accepted GET operation
  Select,
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum InputType {
  /// Ask on the terminal
  Prompt,
  /// Ask on the terminal and keep every answer
  Record,
  /// Answer yes to everything
  Skip,
}

#[derive(Subcommand, Debug)]
pub enum ListCommands {
  /// List the operations defined in the document
  Operations {
    /// Path to the OpenAPI or Swagger document
    #[arg(short, long, value_name = "FILE")]
    input: PathBuf,
  },
}

#[cfg(test)]
mod tests {
  use clap::CommandFactory;

  use super::*;

  fn generate(args: &[&str]) -> GenerateCommand {
    let cli = Cli::try_parse_from(args).unwrap();
    let Commands::Generate(command) = cli.command else {
      panic!("expected the generate command");
    };
    command
  }

  #[test]
  fn test_cli_definition_is_consistent() {
    Cli::command().debug_assert();
  }

  #[test]
  fn test_generate_defaults() {
    let command = generate(&["oas3-graphql", "generate", "openapi.json"]);
    assert_eq!(command.input, Some(PathBuf::from("openapi.json")));
    assert_eq!(command.mode, GenerateMode::Types);
    assert_eq!(command.input_type, InputType::Prompt);
    assert!(command.output.is_none());
    assert!(command.recording.is_none());
  }

  #[test]
  fn test_generate_flags() {
    let command = generate(&[
      "oas3-graphql",
      "generate",
      "-i",
      "openapi.yaml",
      "-m",
      "select",
      "--input-type",
      "record",
      "--save-recording",
      "answers.txt",
      "-o",
      "queries.graphql",
    ]);
    assert_eq!(command.input_flag, Some(PathBuf::from("openapi.yaml")));
    assert_eq!(command.mode, GenerateMode::Select);
    assert_eq!(command.input_type, InputType::Record);
    assert_eq!(command.save_recording, Some(PathBuf::from("answers.txt")));
    assert_eq!(command.output, Some(PathBuf::from("queries.graphql")));
  }

  #[test]
  fn test_generate_requires_an_input() {
    assert!(Cli::try_parse_from(["oas3-graphql", "generate"]).is_err());
  }
}
