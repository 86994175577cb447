use std::{collections::HashMap, fmt::Write};

use itertools::Itertools;

use super::{
  document::DocumentInfo,
  errors::GeneratorError,
  graph::{CompositionKind, DefaultValue, Graph, NodeId, NodeKind},
  metrics::GenerationWarning,
};
use crate::naming::to_field_name;

/// Accumulates GraphQL type definitions, writing each type name at most once.
#[derive(Debug, Default)]
pub(crate) struct SdlEmitter {
  out: String,
  emitted: HashMap<String, NodeId>,
  warnings: Vec<GenerationWarning>,
}

impl SdlEmitter {
  pub(crate) fn new() -> Self {
    Self::default()
  }

  pub(crate) fn header(&mut self, source: &str, info: &DocumentInfo) -> Result<(), GeneratorError> {
    writeln!(self.out, "# Generated by oas3-graphql from {source}")?;
    if !info.title.is_empty() {
      writeln!(self.out, "# {} {}", info.title, info.version)?;
    }
    writeln!(self.out)?;
    Ok(())
  }

  /// Emits the definition for a visited node. `oneOf` shapes delegate to their retained variant.
  /// Returns true when a new definition was written.
  pub(crate) fn generate(&mut self, graph: &Graph<'_>, id: NodeId) -> Result<bool, GeneratorError> {
    let node = graph.node(id);
    match &node.kind {
      NodeKind::Object
      | NodeKind::Composed {
        kind: CompositionKind::AllOf,
        ..
      } => self.definition(graph, id),
      NodeKind::Composed {
        kind: CompositionKind::OneOf,
        ..
      }
      | NodeKind::Union { .. } => match node.children.first() {
        Some(&variant) => self.generate(graph, variant),
        None => Ok(false),
      },
      NodeKind::PropertyRef { ref_type: Some(target), .. } => self.generate(graph, *target),
      _ => Ok(false),
    }
  }

  fn definition(&mut self, graph: &Graph<'_>, id: NodeId) -> Result<bool, GeneratorError> {
    let node = graph.node(id);
    if node.props.is_empty() {
      return Ok(false);
    }
    let Some(name) = node.simple_name() else {
      return Ok(false);
    };

    match self.emitted.get(&name) {
      Some(&existing) if existing == id => return Ok(false),
      Some(_) => {
        self.warnings.push(GenerationWarning::TypeNameCollision { name });
        return Ok(false);
      }
      None => {}
    }

    writeln!(self.out, "type {name} {{")?;
    for &prop in node.props.values() {
      if let Some(signature) = field_signature(graph, prop) {
        writeln!(self.out, "  {signature}")?;
      }
    }
    writeln!(self.out, "}}")?;
    writeln!(self.out)?;

    self.emitted.insert(name, id);
    Ok(true)
  }

  /// Writes the `Query` root with one field per converted operation.
  pub(crate) fn query(&mut self, graph: &Graph<'_>, fields: &[NodeId]) -> Result<(), GeneratorError> {
    if fields.is_empty() {
      return Ok(());
    }

    writeln!(self.out, "type Query {{")?;
    for &field in fields {
      if let Some(signature) = field_signature(graph, field) {
        writeln!(self.out, "  {signature}")?;
      }
    }
    writeln!(self.out, "}}")?;
    Ok(())
  }

  pub(crate) fn finish(self) -> (String, Vec<GenerationWarning>) {
    (self.out, self.warnings)
  }
}

/// `field(args): Type! = default` for a member node. `None` for type-position nodes.
pub(crate) fn field_signature(graph: &Graph<'_>, id: NodeId) -> Option<String> {
  let node = graph.node(id);
  let member = node.kind.member()?;
  let field = member.field.as_deref()?;

  let mut signature = to_field_name(field);

  if let NodeKind::Property { arguments, .. } = &node.kind
    && !arguments.is_empty()
  {
    let arguments = arguments
      .iter()
      .filter_map(|&argument| argument_signature(graph, argument))
      .join(", ");
    signature.push('(');
    signature.push_str(&arguments);
    signature.push(')');
  }

  signature.push_str(": ");
  signature.push_str(&graph.type_name(id));
  push_modifiers(&mut signature, member.required, member.default.as_ref());
  Some(signature)
}

/// Arguments are input positions, so compound types are passed as opaque `JSON`.
fn argument_signature(graph: &Graph<'_>, id: NodeId) -> Option<String> {
  let member = graph.node(id).kind.member()?;
  let field = member.field.as_deref()?;

  let type_name = if graph.needs_brackets(id) {
    "JSON".to_string()
  } else {
    graph.type_name(id)
  };

  let mut signature = format!("{}: {type_name}", to_field_name(field));
  push_modifiers(&mut signature, member.required, member.default.as_ref());
  Some(signature)
}

fn push_modifiers(signature: &mut String, required: bool, default: Option<&DefaultValue>) {
  if required {
    signature.push('!');
  }
  if let Some(default) = default {
    signature.push_str(" = ");
    signature.push_str(&default.render());
  }
}
