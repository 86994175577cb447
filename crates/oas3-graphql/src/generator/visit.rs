//! Graph construction: a recursive descent that builds children on demand, resolves
//! `$ref`s through the name cache and runs the `allOf`/`oneOf` composition decisions.

use std::fmt::Write;

use indexmap::IndexMap;

use super::{
  context::Context,
  document::{EMPTY_SCHEMA, SchemaDecl},
  errors::GeneratorError,
  factory,
  graph::{CompositionKind, Graph, NodeId, NodeKind},
  prompt::{Answer, Prompt},
};
use crate::naming::to_type_name;

/// What a node needs during its visit, detached from the graph borrow.
enum Step<'a> {
  Leaf,
  Object(Vec<NodeId>),
  Array(&'a SchemaDecl),
  Member {
    schema: &'a SchemaDecl,
    arguments: Vec<NodeId>,
  },
  Reference(String),
  AllOf(&'a SchemaDecl),
  OneOf(&'a SchemaDecl),
  Union(&'a [SchemaDecl]),
}

impl<'a> Step<'a> {
  fn of(kind: &NodeKind<'a>, props: &IndexMap<String, NodeId>) -> Self {
    match kind {
      NodeKind::Scalar(_) => Self::Leaf,
      NodeKind::Object => Self::Object(props.values().copied().collect()),
      NodeKind::Array { schema, .. } => {
        let schema: &'a SchemaDecl = *schema;
        Self::Array(schema.items.as_deref().unwrap_or(&*EMPTY_SCHEMA))
      }
      NodeKind::Property { member, arguments, .. } => Self::Member {
        schema: member.schema,
        arguments: arguments.clone(),
      },
      NodeKind::Parameter { member, .. } => Self::Member {
        schema: member.schema,
        arguments: vec![],
      },
      NodeKind::PropertyRef { reference, .. } => Self::Reference(reference.clone()),
      NodeKind::Composed {
        schema,
        kind: CompositionKind::AllOf,
      } => Self::AllOf(*schema),
      NodeKind::Composed {
        schema,
        kind: CompositionKind::OneOf,
      } => Self::OneOf(*schema),
      NodeKind::Union { members } => Self::Union(*members),
    }
  }
}

/// Visits `id` once. The node sits on the context stack while its subtree is built and is
/// only marked visited when that succeeds.
pub(crate) fn visit<'a>(ctx: &mut Context<'a>, prompt: &mut dyn Prompt, id: NodeId) -> Result<(), GeneratorError> {
  if ctx.node(id).visited || ctx.is_on_stack(id) {
    return Ok(());
  }

  tracing::trace!(node = %ctx.graph().describe(id), depth = ctx.depth(), "visit");
  let step = Step::of(&ctx.node(id).kind, &ctx.node(id).props);

  ctx.enter(id);
  let result = run(ctx, prompt, id, step);
  ctx.leave();
  result?;

  ctx.node_mut(id).visited = true;
  Ok(())
}

fn run<'a>(ctx: &mut Context<'a>, prompt: &mut dyn Prompt, id: NodeId, step: Step<'a>) -> Result<(), GeneratorError> {
  match step {
    Step::Leaf => Ok(()),
    Step::Object(props) => {
      for prop in props {
        visit(ctx, prompt, prop)?;
      }
      Ok(())
    }
    Step::Array(items) => {
      let child = factory::from_schema(ctx, Some(id), items)?;
      let name = ctx.node(id).simple_name().map(|name| format!("{name}Item"));
      adopt(ctx, id, child, name);
      visit(ctx, prompt, child)
    }
    Step::Member { schema, arguments } => {
      let value = factory::from_schema(ctx, Some(id), schema)?;
      let name = member_type_name(ctx.graph(), id);
      adopt(ctx, id, value, name);
      visit(ctx, prompt, value)?;
      for argument in arguments {
        visit(ctx, prompt, argument)?;
      }
      Ok(())
    }
    Step::Reference(reference) => resolve_reference(ctx, prompt, id, &reference),
    Step::AllOf(schema) => compose_all_of(ctx, prompt, id, schema),
    Step::OneOf(schema) => {
      let union = factory::union(ctx, id, &schema.one_of);
      let name = ctx.node(id).name.clone();
      adopt(ctx, id, union, name);
      visit(ctx, prompt, union)?;
      store_named(ctx, id);
      Ok(())
    }
    Step::Union(members) => {
      if members.is_empty() {
        return Err(GeneratorError::UnsupportedSchemaShape {
          node: ctx.graph().describe(id),
          detail: "oneOf without members".to_string(),
        });
      }

      let name = ctx.node(id).name.clone();
      for (index, member) in members.iter().enumerate() {
        let child = factory::from_schema(ctx, Some(id), member)?;
        name_part(ctx, child, name.clone());
        if index == 0 {
          ctx.node_mut(id).attach(child);
        }
        visit(ctx, prompt, child)?;
      }
      Ok(())
    }
  }
}

/// On a cache miss the referenced node is built, named after the ref and stored *before*
/// its own visit, so references back into it resolve to the same node.
fn resolve_reference<'a>(
  ctx: &mut Context<'a>,
  prompt: &mut dyn Prompt,
  id: NodeId,
  reference: &str,
) -> Result<(), GeneratorError> {
  if let Some(target) = ctx.get(reference) {
    tracing::trace!(reference, "cache hit");
    ctx.node_mut(id).set_target(target);
    return Ok(());
  }

  let schema = ctx.lookup_ref(reference)?;
  let target = factory::from_schema(ctx, Some(id), schema)?;
  ctx.node_mut(target).name = Some(reference.to_string());
  ctx.store(reference, target);

  let node = ctx.node_mut(id);
  node.set_target(target);
  node.attach(target);

  visit(ctx, prompt, target)
}

fn compose_all_of<'a>(
  ctx: &mut Context<'a>,
  prompt: &mut dyn Prompt,
  id: NodeId,
  schema: &'a SchemaDecl,
) -> Result<(), GeneratorError> {
  let name = ctx.node(id).name.clone();
  let mut members = Vec::with_capacity(schema.all_of.len());
  for declaration in &schema.all_of {
    let member = factory::from_schema(ctx, Some(id), declaration)?;
    name_part(ctx, member, name.clone());
    visit(ctx, prompt, member)?;
    members.push(member);
  }

  let candidates = collect_candidates(ctx.graph(), &members);
  let selected = if ctx.in_compose_context(id) {
    candidates
  } else {
    decide_inclusion(ctx, prompt, id, candidates)?
  };

  let node = ctx.node_mut(id);
  for (field, prop) in selected {
    node.props.insert(field, prop);
    node.attach(prop);
  }

  store_named(ctx, id);
  Ok(())
}

/// Merges the property mappings of all `allOf` members in order; a later member wins a
/// name collision but the field keeps its first-seen position.
pub(crate) fn collect_candidates(graph: &Graph<'_>, members: &[NodeId]) -> IndexMap<String, NodeId> {
  let mut candidates = IndexMap::new();
  for &member in members {
    candidates.extend(graph.member_props(member));
  }
  candidates
}

/// Asks the oracle which candidates to keep: all, none, or a per-field subset.
pub(crate) fn decide_inclusion(
  ctx: &mut Context<'_>,
  prompt: &mut dyn Prompt,
  id: NodeId,
  candidates: IndexMap<String, NodeId>,
) -> Result<IndexMap<String, NodeId>, GeneratorError> {
  if candidates.is_empty() {
    return Ok(candidates);
  }

  let label = ctx
    .node(id)
    .simple_name()
    .unwrap_or_else(|| ctx.graph().describe(id));

  let mut question = format!("Add all properties from {label}?");
  for (field, &prop) in &candidates {
    write!(question, "\n - {}", candidate_label(ctx.graph(), field, prop))?;
  }

  ctx.record_decision();
  match prompt.yes_no_select(&question)? {
    Answer::Yes => Ok(candidates),
    Answer::No => Ok(IndexMap::new()),
    Answer::Select => {
      let mut selected = IndexMap::new();
      for (field, prop) in candidates {
        let question = format!("Add field '{}'?", candidate_label(ctx.graph(), &field, prop));
        ctx.record_decision();
        if prompt.yes_no(&question)? {
          selected.insert(field, prop);
        }
      }
      Ok(selected)
    }
  }
}

/// `field: Type`, as shown to the operator.
fn candidate_label(graph: &Graph<'_>, field: &str, prop: NodeId) -> String {
  format!("{field}: {}", graph.type_name(prop))
}

fn store_named(ctx: &mut Context<'_>, id: NodeId) {
  if let Some(name) = ctx.node(id).name.clone() {
    ctx.store(&name, id);
  }
}

/// Links a freshly built child as the node's resolved type and owned child.
fn adopt(ctx: &mut Context<'_>, id: NodeId, child: NodeId, name: Option<String>) {
  name_inline(ctx, child, name);
  let node = ctx.node_mut(id);
  node.set_target(child);
  node.attach(child);
}

/// Anonymous inline shapes inherit a name from their position so they can be emitted.
fn name_inline(ctx: &mut Context<'_>, id: NodeId, name: Option<String>) {
  let node = ctx.node_mut(id);
  if node.name.is_none() && !matches!(node.kind, NodeKind::PropertyRef { .. } | NodeKind::Scalar(_)) {
    node.name = name;
  }
}

/// Inline parts of a composition share its name. Nested compositions stay anonymous: they
/// would otherwise claim the enclosing name in the cache.
fn name_part(ctx: &mut Context<'_>, id: NodeId, name: Option<String>) {
  if !matches!(ctx.node(id).kind, NodeKind::Composed { .. }) {
    name_inline(ctx, id, name);
  }
}

/// `<Owner><Field>` for the inline type of an object member or operation field.
fn member_type_name(graph: &Graph<'_>, id: NodeId) -> Option<String> {
  let node = graph.node(id);
  let field = node.kind.member()?.field.as_deref()?;
  let owner = node
    .parent
    .and_then(|parent| graph.node(parent).simple_name())
    .unwrap_or_default();
  Some(format!("{owner}{}", to_type_name(field)))
}
