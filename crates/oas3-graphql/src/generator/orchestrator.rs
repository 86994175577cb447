//! Orchestration for the OpenAPI to GraphQL pipeline.
//!
//! One [`Context`] is shared by every root of a run, so the name cache, the recursion
//! guards and the collected warnings span all schemas and operations.
//!
//! ## Usage
//!
//! ```no_run
//! # fn example(value: serde_json::Value) -> anyhow::Result<()> {
//! let orchestrator = Orchestrator::new(value, "openapi.json")?;
//! let output = orchestrator.generate_types(&mut YesPrompt)?;
//!
//! println!("Generated {} types with {} warnings", output.stats.types_generated, output.stats.warnings.len());
//! # Ok(())
//! # }
//! ```

use std::fmt::Write;

use indexmap::{IndexMap, IndexSet};
use serde_json::Value;

use super::{
  context::Context,
  document::{Document, OperationDecl},
  errors::GeneratorError,
  factory,
  graph::NodeId,
  metrics::{GenerationStats, GenerationWarning},
  prompt::Prompt,
  sdl::SdlEmitter,
  select::select,
  visit::visit,
};
use crate::naming::{operation_name, to_type_name};

pub struct Orchestrator {
  document: Document,
  source: String,
}

#[derive(Debug)]
pub struct GeneratedOutput {
  pub code: String,
  pub stats: GenerationStats,
}

impl Orchestrator {
  /// Extracts schemas and operations from a parsed document. `source` only appears in the output header.
  pub fn new(root: Value, source: impl Into<String>) -> Result<Self, GeneratorError> {
    Ok(Self {
      document: Document::from_value(root)?,
      source: source.into(),
    })
  }

  /// GraphQL SDL for every named schema plus a `Query` root built from the GET operations.
  pub fn generate_types(&self, prompt: &mut dyn Prompt) -> Result<GeneratedOutput, GeneratorError> {
    let mut ctx = Context::new(&self.document);
    let mut roots = vec![];

    for (reference, _) in self.document.schemas() {
      tracing::debug!(reference, "visiting schema");
      let root = factory::root_reference(&mut ctx, reference);
      visit(&mut ctx, prompt, root)?;
      roots.push(root);
    }

    let mut fields: IndexMap<String, NodeId> = IndexMap::new();
    for operation in self.queries() {
      let Some((name, field)) = operation_field(&mut ctx, operation, &fields) else {
        continue;
      };
      tracing::debug!(path = %operation.path, field = %name, "visiting operation");
      visit(&mut ctx, prompt, field)?;
      fields.insert(name, field);
    }

    let mut definitions = IndexSet::new();
    for &root in roots.iter().chain(fields.values()) {
      definitions.extend(ctx.graph().dependencies(root)?);
    }

    let mut stats = GenerationStats::default();
    let mut emitter = SdlEmitter::new();
    emitter.header(&self.source, self.document.info())?;
    for id in definitions {
      if emitter.generate(ctx.graph(), id)? {
        stats.record_type();
      }
    }

    let fields: Vec<NodeId> = fields.into_values().collect();
    emitter.query(ctx.graph(), &fields)?;
    stats.operations_converted = fields.len();

    let (code, warnings) = emitter.finish();
    Ok(GeneratedOutput {
      code,
      stats: finish_stats(stats, &mut ctx, warnings),
    })
  }

  /// Interactive selection sets: one `query` per accepted GET operation.
  pub fn generate_selections(&self, prompt: &mut dyn Prompt) -> Result<GeneratedOutput, GeneratorError> {
    let mut ctx = Context::new(&self.document);
    let query_root = factory::query_root(&mut ctx);
    let mut fields: IndexMap<String, NodeId> = IndexMap::new();
    let mut stats = GenerationStats::default();
    let mut code = String::new();

    for operation in self.queries() {
      ctx.record_decision();
      if !prompt.yes_no(&format!("Visit path GET {}?", operation.path))? {
        continue;
      }

      let Some((name, field)) = operation_field(&mut ctx, operation, &fields) else {
        continue;
      };
      visit(&mut ctx, prompt, field)?;

      writeln!(code, "# GET {}", operation.path)?;
      writeln!(code, "query {} {{", to_type_name(&name))?;
      ctx.enter(query_root);
      let result = select(&mut ctx, &mut code, field);
      ctx.leave();
      result?;
      writeln!(code, "}}")?;
      writeln!(code)?;

      stats.record_operation();
      fields.insert(name, field);
    }

    Ok(GeneratedOutput {
      code,
      stats: finish_stats(stats, &mut ctx, vec![]),
    })
  }

  fn queries(&self) -> impl Iterator<Item = &OperationDecl> {
    self.document.operations().iter().filter(|operation| operation.is_query())
  }
}

/// Builds the root field for an operation, or records why it was skipped.
fn operation_field<'a>(
  ctx: &mut Context<'a>,
  operation: &'a OperationDecl,
  taken: &IndexMap<String, NodeId>,
) -> Option<(String, NodeId)> {
  let skip = |reason: &str| GenerationWarning::OperationSkipped {
    method: operation.method.to_uppercase(),
    path: operation.path.clone(),
    reason: reason.to_string(),
  };

  let Some(response) = operation.response.as_ref() else {
    ctx.warn(skip("no JSON success response"));
    return None;
  };

  let name = operation_name(operation.operation_id.as_deref(), &operation.method, &operation.path);
  if taken.contains_key(&name) {
    ctx.warn(skip(&format!("field '{name}' is already defined")));
    return None;
  }

  let field = factory::operation_field(ctx, name.clone(), operation, response);
  Some((name, field))
}

fn finish_stats(mut stats: GenerationStats, ctx: &mut Context<'_>, warnings: Vec<GenerationWarning>) -> GenerationStats {
  stats.record_cached_refs(ctx.cached());
  stats.record_decisions(ctx.decisions());
  stats.record_warnings(ctx.take_warnings());
  stats.record_warnings(warnings);
  stats
}
