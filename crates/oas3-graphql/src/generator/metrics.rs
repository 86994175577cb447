use strum::Display;

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct GenerationStats {
  pub types_generated: usize,
  pub operations_converted: usize,
  pub cached_refs: usize,
  pub decisions: usize,
  pub warnings: Vec<GenerationWarning>,
}

impl GenerationStats {
  pub fn record_type(&mut self) {
    self.types_generated += 1;
  }

  pub fn record_operation(&mut self) {
    self.operations_converted += 1;
  }

  pub fn record_cached_refs(&mut self, count: usize) {
    self.cached_refs += count;
  }

  pub fn record_decisions(&mut self, count: usize) {
    self.decisions += count;
  }

  pub fn record_warnings(&mut self, warnings: impl IntoIterator<Item = GenerationWarning>) {
    self.warnings.extend(warnings);
  }
}

#[derive(Debug, Clone, PartialEq, Eq, Display)]
pub enum GenerationWarning {
  #[strum(to_string = "Possible recursion, skipped selection of {node}")]
  RecursionSkipped { node: String },
  #[strum(to_string = "Dropped unsupported {kind} default value of '{field}'")]
  DefaultDropped { field: String, kind: String },
  #[strum(to_string = "Skipped operation '{method} {path}': {reason}")]
  OperationSkipped {
    method: String,
    path: String,
    reason: String,
  },
  #[strum(to_string = "Cache already holds a different node for '{name}', keeping the first one")]
  DuplicateCacheEntry { name: String },
  #[strum(to_string = "Type '{name}' is defined by more than one schema, keeping the first definition")]
  TypeNameCollision { name: String },
}

impl GenerationWarning {
  pub fn is_skipped_item(&self) -> bool {
    matches!(self, Self::OperationSkipped { .. } | Self::RecursionSkipped { .. })
  }
}
