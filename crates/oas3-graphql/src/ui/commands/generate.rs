use std::path::{Path, PathBuf};

use anyhow::Context as _;
use chrono::{Local, Timelike};
use crossterm::style::Stylize;
use tokio::io::AsyncWriteExt;

use crate::{
  generator::{
    metrics::GenerationStats,
    orchestrator::{GeneratedOutput, Orchestrator},
    prompt::InputMode,
    recording::Recording,
  },
  ui::{Colors, GenerateCommand, GenerateMode, InputType},
  utils::{output::replace_file, spec::SpecLoader},
};

fn format_timestamp() -> String {
  let now = Local::now();
  format!("[{:02}:{:02}:{:02}]", now.hour(), now.minute(), now.second())
}

#[derive(Debug, Clone)]
pub struct GenerateConfig {
  pub mode: GenerateMode,
  pub input: PathBuf,
  pub output: Option<PathBuf>,
  pub input_mode: InputMode,
  pub save_recording: Option<PathBuf>,
  pub verbose: bool,
  pub quiet: bool,
}

impl GenerateConfig {
  /// Validates the command once, before anything is generated.
  pub fn from_command(command: GenerateCommand) -> anyhow::Result<Self> {
    let GenerateCommand {
      input,
      input_flag,
      output,
      mode,
      input_type,
      recording,
      save_recording,
      verbose,
      quiet,
    } = command;

    let Some(input) = input.or(input_flag) else {
      anyhow::bail!("An input document (FILE or -i) is required");
    };

    let input_mode = match recording {
      Some(path) => InputMode::Replay(read_recording(&path)?),
      None => match input_type {
        InputType::Prompt => InputMode::Prompt,
        InputType::Record => InputMode::Record,
        InputType::Skip => InputMode::Skip,
      },
    };

    if save_recording.is_some() && !input_mode.is_record() {
      anyhow::bail!("--save-recording requires --input-type record");
    }

    Ok(Self {
      mode,
      input,
      output,
      input_mode,
      save_recording,
      verbose,
      quiet,
    })
  }

  async fn load_orchestrator(&self) -> anyhow::Result<Orchestrator> {
    let root = SpecLoader::open(&self.input).await?.parse()?;
    Ok(Orchestrator::new(root, self.input.display().to_string())?)
  }

  async fn write_output(&self, code: &str) -> anyhow::Result<()> {
    match &self.output {
      Some(path) => replace_file(path, code).await,
      None => {
        let mut stdout = tokio::io::stdout();
        stdout.write_all(code.as_bytes()).await?;
        stdout.flush().await?;
        Ok(())
      }
    }
  }

  async fn write_recording(&self, recording: &Recording) -> anyhow::Result<()> {
    let contents = recording.to_string();
    match &self.save_recording {
      Some(path) => replace_file(path, &contents).await,
      None => {
        let mut stderr = tokio::io::stderr();
        stderr.write_all(contents.as_bytes()).await?;
        stderr.flush().await?;
        Ok(())
      }
    }
  }
}

fn read_recording(path: &Path) -> anyhow::Result<Recording> {
  let contents =
    std::fs::read_to_string(path).with_context(|| format!("Failed to read recording {}", path.display()))?;
  contents
    .parse()
    .with_context(|| format!("Invalid recording {}", path.display()))
}

struct GenerateLogger<'a> {
  config: &'a GenerateConfig,
  colors: &'a Colors,
}

impl<'a> GenerateLogger<'a> {
  fn new(config: &'a GenerateConfig, colors: &'a Colors) -> Self {
    Self { config, colors }
  }

  fn info(&self, message: &str) {
    if !self.config.quiet {
      eprintln!("{} {message}", format_timestamp().with(self.colors.timestamp()));
    }
  }

  fn stat(&self, label: &str, value: String) {
    if !self.config.quiet {
      eprintln!(
        "            {:<25} {}",
        label.with(self.colors.label()),
        value.with(self.colors.value())
      );
    }
  }

  fn log_loading(&self) {
    self.info(
      &format!("Loading document from: {}", self.config.input.display())
        .with(self.colors.primary())
        .to_string(),
    );
  }

  fn log_generating(&self) {
    let message = match self.config.mode {
      GenerateMode::Types => "Generating GraphQL types...",
      GenerateMode::Select => "Generating GraphQL selection sets...",
    };
    self.info(&message.with(self.colors.primary()).to_string());
  }

  fn print_statistics(&self, stats: &GenerationStats) {
    if self.config.quiet {
      return;
    }

    if self.config.mode == GenerateMode::Types {
      self.stat("Types generated:", stats.types_generated.to_string());
    }
    self.stat("Operations converted:", stats.operations_converted.to_string());
    self.stat("References cached:", stats.cached_refs.to_string());
    if stats.decisions > 0 {
      self.stat("Decisions taken:", stats.decisions.to_string());
    }
    if !stats.warnings.is_empty() {
      self.stat("Warnings:", stats.warnings.len().to_string());
    }
    self.print_warnings(stats);
  }

  fn print_warnings(&self, stats: &GenerationStats) {
    let mut printed_header = false;
    for warning in &stats.warnings {
      if !(warning.is_skipped_item() || self.config.verbose) {
        continue;
      }

      if !printed_header {
        eprintln!();
        printed_header = true;
      }

      let label = if warning.is_skipped_item() { "Skipped:" } else { "Warning:" };
      eprintln!(
        "{} {}",
        label.with(self.colors.accent()),
        warning.to_string().with(self.colors.primary())
      );
    }
  }

  fn log_writing(&self) {
    let target = self
      .config
      .output
      .as_ref()
      .map_or_else(|| "stdout".to_string(), |path| path.display().to_string());
    self.info(&format!("Writing to: {target}").with(self.colors.primary()).to_string());
  }

  fn log_success(&self) {
    if !self.config.quiet {
      let message = match self.config.mode {
        GenerateMode::Types => "Successfully generated GraphQL types",
        GenerateMode::Select => "Successfully generated GraphQL selection sets",
      };
      eprintln!();
      eprintln!(
        "{} {}",
        format_timestamp().with(self.colors.timestamp()),
        message.with(self.colors.success())
      );
    }
  }
}

pub async fn generate_code(config: GenerateConfig, colors: &Colors) -> anyhow::Result<()> {
  let logger = GenerateLogger::new(&config, colors);

  logger.log_loading();
  let orchestrator = config.load_orchestrator().await?;

  logger.log_generating();
  let mut prompt = config.input_mode.clone().into_prompt();
  let GeneratedOutput { code, stats } = match config.mode {
    GenerateMode::Types => orchestrator.generate_types(prompt.as_mut())?,
    GenerateMode::Select => orchestrator.generate_selections(prompt.as_mut())?,
  };
  logger.print_statistics(&stats);

  logger.log_writing();
  config.write_output(&code).await?;

  if config.input_mode.is_record()
    && let Some(recording) = prompt.recording()
  {
    config.write_recording(recording).await?;
  }

  logger.log_success();
  Ok(())
}
