//! Selection-set emission over a visited graph.
//!
//! Object and `allOf` shapes with fields are pushed on the context stack while their fields are written,
//! so the stack depth doubles as the indentation width and as the recursion guard.

use std::fmt::Write;

use super::{
  context::Context,
  errors::GeneratorError,
  graph::{Graph, NodeId, NodeKind},
  metrics::GenerationWarning,
};
use crate::naming::select_field_name;

pub(crate) fn select(ctx: &mut Context<'_>, out: &mut String, id: NodeId) -> Result<(), GeneratorError> {
  let is_field = ctx.node(id).kind.member().is_some_and(|member| member.field.is_some());
  if is_field {
    select_field(ctx, out, id)
  } else {
    select_shape(ctx, out, id)
  }
}

fn select_field(ctx: &mut Context<'_>, out: &mut String, id: NodeId) -> Result<(), GeneratorError> {
  ensure_visited(ctx.graph(), id)?;

  let node = ctx.node(id);
  let Some(field) = node.kind.member().and_then(|member| member.field.as_deref()) else {
    return Ok(());
  };
  if matches!(node.kind, NodeKind::Parameter { .. }) {
    return Ok(());
  }

  let label = select_field_name(field);
  let indent = " ".repeat(ctx.depth());

  // `oneOf` collapses are resolved first so the guard sees the variant actually selected.
  let graph = ctx.graph();
  let Some(shape) = graph.shape(id).filter(|&shape| graph.has_fields(shape)) else {
    writeln!(out, "{indent}{label}")?;
    return Ok(());
  };

  if ctx.is_on_stack(shape) {
    skip_recursion(ctx, shape);
    return Ok(());
  }

  writeln!(out, "{indent}{label} {{")?;
  select_shape(ctx, out, shape)?;
  writeln!(out, "{indent}}}")?;
  Ok(())
}

fn select_shape(ctx: &mut Context<'_>, out: &mut String, id: NodeId) -> Result<(), GeneratorError> {
  let Some(shape) = ctx.graph().shape(id) else {
    return Ok(());
  };
  ensure_visited(ctx.graph(), shape)?;

  if !ctx.graph().has_fields(shape) {
    return Ok(());
  }
  if ctx.is_on_stack(shape) {
    skip_recursion(ctx, shape);
    return Ok(());
  }

  let fields: Vec<NodeId> = ctx.node(shape).props.values().copied().collect();
  ctx.enter(shape);
  let result = fields.into_iter().try_for_each(|field| select_field(ctx, out, field));
  ctx.leave();
  result
}

fn skip_recursion(ctx: &mut Context<'_>, shape: NodeId) {
  let node = ctx
    .node(shape)
    .simple_name()
    .unwrap_or_else(|| ctx.graph().describe(shape));
  tracing::debug!(node = %node, "possible recursion, skipping selection");
  ctx.warn(GenerationWarning::RecursionSkipped { node });
}

fn ensure_visited(graph: &Graph<'_>, id: NodeId) -> Result<(), GeneratorError> {
  if graph.node(id).visited {
    Ok(())
  } else {
    Err(GeneratorError::NotVisited {
      node: graph.describe(id),
    })
  }
}
