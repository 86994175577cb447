//! Arena-backed node graph built during the visit.
//!
//! Nodes are addressed by [`NodeId`]. Parent links, cached `$ref` targets and merged
//! `allOf` properties are plain ids, so cyclic schemas never form ownership cycles.

use std::collections::HashSet;

use indexmap::{IndexMap, IndexSet};
use itertools::Itertools;
use serde_json::{Number, Value};
use strum::Display;

use super::{document::SchemaDecl, errors::GeneratorError};
use crate::naming::{ref_name, to_type_name};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub(crate) struct NodeId(usize);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Scalar {
  String,
  Int,
  Float,
  Boolean,
  Json,
}

impl Scalar {
  pub(crate) fn from_type(schema_type: &str) -> Option<Self> {
    match schema_type {
      "string" => Some(Self::String),
      "integer" => Some(Self::Int),
      "number" => Some(Self::Float),
      "boolean" => Some(Self::Boolean),
      _ => None,
    }
  }

  pub(crate) const fn graphql_name(self) -> &'static str {
    match self {
      Self::String => "String",
      Self::Int => "Int",
      Self::Float => "Float",
      Self::Boolean => "Boolean",
      Self::Json => "JSON",
    }
  }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub(crate) enum CompositionKind {
  #[strum(to_string = "all-of")]
  AllOf,
  #[strum(to_string = "one-of")]
  OneOf,
}

/// A default value that can be rendered in SDL. Other JSON kinds are dropped.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum DefaultValue {
  Number(Number),
  String(String),
}

impl DefaultValue {
  pub(crate) fn from_value(value: &Value) -> Option<Self> {
    match value {
      Value::Number(number) => Some(Self::Number(number.clone())),
      Value::String(text) => Some(Self::String(text.clone())),
      _ => None,
    }
  }

  pub(crate) fn render(&self) -> String {
    match self {
      Self::Number(number) => number.to_string(),
      Self::String(text) => format!("\"{}\"", text.replace('\\', "\\\\").replace('"', "\\\"")),
    }
  }
}

/// Shared data of named, typed members: object properties and operation parameters.
#[derive(Debug, Clone)]
pub(crate) struct Member<'a> {
  /// The member name; `None` for a `$ref` standing in type position.
  pub(crate) field: Option<String>,
  pub(crate) schema: &'a SchemaDecl,
  pub(crate) required: bool,
  pub(crate) default: Option<DefaultValue>,
}

#[derive(Debug, Clone)]
pub(crate) enum NodeKind<'a> {
  Scalar(Scalar),
  Object,
  Array {
    schema: &'a SchemaDecl,
    items: Option<NodeId>,
  },
  Union {
    members: &'a [SchemaDecl],
  },
  Composed {
    schema: &'a SchemaDecl,
    kind: CompositionKind,
  },
  Property {
    member: Member<'a>,
    value: Option<NodeId>,
    arguments: Vec<NodeId>,
  },
  PropertyRef {
    member: Member<'a>,
    reference: String,
    ref_type: Option<NodeId>,
  },
  Parameter {
    member: Member<'a>,
    value: Option<NodeId>,
  },
}

impl NodeKind<'_> {
  pub(crate) const fn label(&self) -> &'static str {
    match self {
      Self::Scalar(_) => "scalar",
      Self::Object => "object",
      Self::Array { .. } => "array",
      Self::Union { .. } => "union",
      Self::Composed {
        kind: CompositionKind::AllOf,
        ..
      } => "all-of",
      Self::Composed {
        kind: CompositionKind::OneOf,
        ..
      } => "one-of",
      Self::Property { .. } => "property",
      Self::PropertyRef { .. } => "property-ref",
      Self::Parameter { .. } => "parameter",
    }
  }

  pub(crate) const fn member(&self) -> Option<&Member<'_>> {
    match self {
      Self::Property { member, .. } | Self::PropertyRef { member, .. } | Self::Parameter { member, .. } => {
        Some(member)
      }
      _ => None,
    }
  }
}

#[derive(Debug, Clone)]
pub(crate) struct Node<'a> {
  pub(crate) name: Option<String>,
  pub(crate) parent: Option<NodeId>,
  pub(crate) children: Vec<NodeId>,
  pub(crate) props: IndexMap<String, NodeId>,
  pub(crate) visited: bool,
  pub(crate) kind: NodeKind<'a>,
}

impl<'a> Node<'a> {
  fn new(parent: Option<NodeId>, kind: NodeKind<'a>) -> Self {
    Self {
      name: None,
      parent,
      children: vec![],
      props: IndexMap::new(),
      visited: false,
      kind,
    }
  }

  pub(crate) fn attach(&mut self, child: NodeId) {
    if !self.children.contains(&child) {
      self.children.push(child);
    }
  }

  /// The GraphQL type name derived from the raw name (`#/components/schemas/Pet` -> `Pet`).
  pub(crate) fn simple_name(&self) -> Option<String> {
    self.name.as_deref().map(|name| to_type_name(ref_name(name)))
  }

  /// The resolved type of a member or wrapper node.
  pub(crate) const fn target(&self) -> Option<NodeId> {
    match &self.kind {
      NodeKind::Property { value, .. } | NodeKind::Parameter { value, .. } => *value,
      NodeKind::PropertyRef { ref_type, .. } => *ref_type,
      NodeKind::Array { items, .. } => *items,
      _ => None,
    }
  }

  pub(crate) fn set_target(&mut self, target: NodeId) {
    match &mut self.kind {
      NodeKind::Property { value, .. } | NodeKind::Parameter { value, .. } => *value = Some(target),
      NodeKind::PropertyRef { ref_type, .. } => *ref_type = Some(target),
      NodeKind::Array { items, .. } => *items = Some(target),
      _ => {}
    }
  }
}

#[derive(Debug, Default)]
pub(crate) struct Graph<'a> {
  nodes: Vec<Node<'a>>,
}

impl<'a> Graph<'a> {
  pub(crate) fn add(&mut self, parent: Option<NodeId>, kind: NodeKind<'a>) -> NodeId {
    let id = NodeId(self.nodes.len());
    self.nodes.push(Node::new(parent, kind));
    id
  }

  pub(crate) fn node(&self, id: NodeId) -> &Node<'a> {
    &self.nodes[id.0]
  }

  pub(crate) fn node_mut(&mut self, id: NodeId) -> &mut Node<'a> {
    &mut self.nodes[id.0]
  }

  #[cfg(test)]
  pub(crate) fn len(&self) -> usize {
    self.nodes.len()
  }

  /// Human-readable label used in diagnostics.
  pub(crate) fn describe(&self, id: NodeId) -> String {
    let node = self.node(id);
    let name = match (&node.kind, &node.name) {
      (NodeKind::PropertyRef { reference, .. }, None) => Some(reference.as_str()),
      (_, name) => name.as_deref(),
    };
    match name {
      Some(name) => format!("{} '{name}'", node.kind.label()),
      None => format!("inline {}", node.kind.label()),
    }
  }

  /// Structural identity used for de-duplication. Only defined once the node is visited.
  pub(crate) fn identity(&self, id: NodeId) -> Result<String, GeneratorError> {
    let node = self.node(id);
    if !node.visited {
      return Err(GeneratorError::NotVisited {
        node: self.describe(id),
      });
    }

    let identity = match &node.kind {
      NodeKind::Scalar(scalar) => format!("scalar://{}", scalar.graphql_name()),
      NodeKind::Object => match &node.name {
        Some(name) => format!("obj://{name}"),
        None => format!("obj://[{}]", node.props.keys().join(",")),
      },
      NodeKind::Array { items, .. } => format!("array://{}", self.optional_identity(*items)?),
      NodeKind::Union { .. } => format!("union://{}", self.joined_identity(&node.children, " | ")?),
      NodeKind::Composed { kind, .. } => format!("comp:{kind}://{}", self.joined_identity(&node.children, " + ")?),
      NodeKind::Property { member, value, .. } => format!(
        "prop:{}://{}",
        member.field.as_deref().unwrap_or_default(),
        self.optional_identity(*value)?
      ),
      NodeKind::PropertyRef { reference, .. } => format!("prop:ref:{reference}"),
      NodeKind::Parameter { member, value } => format!(
        "param:{}://{}",
        member.field.as_deref().unwrap_or_default(),
        self.optional_identity(*value)?
      ),
    };

    Ok(identity)
  }

  fn optional_identity(&self, id: Option<NodeId>) -> Result<String, GeneratorError> {
    id.map(|id| self.identity(id)).transpose().map(Option::unwrap_or_default)
  }

  fn joined_identity(&self, ids: &[NodeId], separator: &str) -> Result<String, GeneratorError> {
    Ok(ids.iter().map(|&id| self.identity(id)).collect::<Result<Vec<_>, _>>()?.join(separator))
  }

  /// The GraphQL type reference for a node, as written after a field's colon.
  ///
  /// `oneOf` shapes collapse to their retained variant and arrays render in list form. Shapes
  /// without fields have no definition and fall back to `JSON`.
  pub(crate) fn type_name(&self, id: NodeId) -> String {
    self.type_name_guarded(id, &mut vec![])
  }

  fn type_name_guarded(&self, id: NodeId, seen: &mut Vec<NodeId>) -> String {
    let node = self.node(id);
    let fallback = || node.simple_name().unwrap_or_else(|| Scalar::Json.graphql_name().to_string());
    if seen.contains(&id) {
      // A `oneOf` never gets a definition of its own, so a cycle through one is opaque.
      return match node.kind {
        NodeKind::Union { .. }
        | NodeKind::Composed {
          kind: CompositionKind::OneOf,
          ..
        } => Scalar::Json.graphql_name().to_string(),
        _ => fallback(),
      };
    }
    seen.push(id);

    match &node.kind {
      NodeKind::Scalar(scalar) => scalar.graphql_name().to_string(),
      NodeKind::Object
      | NodeKind::Composed {
        kind: CompositionKind::AllOf,
        ..
      } if node.props.is_empty() => Scalar::Json.graphql_name().to_string(),
      NodeKind::Object
      | NodeKind::Composed {
        kind: CompositionKind::AllOf,
        ..
      } => fallback(),
      NodeKind::Composed {
        kind: CompositionKind::OneOf,
        ..
      }
      | NodeKind::Union { .. } => match node.children.first() {
        Some(&variant) => self.type_name_guarded(variant, seen),
        None => fallback(),
      },
      NodeKind::Array { items, .. } => match items {
        Some(items) => format!("[{}]", self.type_name_guarded(*items, seen)),
        None => format!("[{}]", Scalar::Json.graphql_name()),
      },
      NodeKind::PropertyRef {
        reference, ref_type, ..
      } => match ref_type {
        Some(target) => self.type_name_guarded(*target, seen),
        None => to_type_name(ref_name(reference)),
      },
      NodeKind::Property { value, .. } | NodeKind::Parameter { value, .. } => match value {
        Some(value) => self.type_name_guarded(*value, seen),
        None => Scalar::Json.graphql_name().to_string(),
      },
    }
  }

  /// The full property mapping a node contributes to an enclosing `allOf`.
  pub(crate) fn member_props(&self, id: NodeId) -> IndexMap<String, NodeId> {
    let mut seen = vec![];
    let mut current = id;
    loop {
      if seen.contains(&current) {
        return IndexMap::new();
      }
      seen.push(current);

      let node = self.node(current);
      match &node.kind {
        NodeKind::PropertyRef {
          ref_type: Some(target), ..
        } => current = *target,
        NodeKind::Object
        | NodeKind::Composed {
          kind: CompositionKind::AllOf,
          ..
        } => return node.props.clone(),
        _ => return IndexMap::new(),
      }
    }
  }

  /// Follows members, refs, arrays and collapsed `oneOf`s to the shape a field selects from.
  /// `None` when the chain only leads back into itself.
  pub(crate) fn shape(&self, id: NodeId) -> Option<NodeId> {
    let mut seen = vec![];
    let mut current = id;
    loop {
      if seen.contains(&current) {
        return None;
      }
      seen.push(current);

      let node = self.node(current);
      current = match node.kind {
        NodeKind::Composed {
          kind: CompositionKind::OneOf,
          ..
        }
        | NodeKind::Union { .. } => *node.children.first()?,
        NodeKind::Array { .. } | NodeKind::PropertyRef { .. } | NodeKind::Property { .. } | NodeKind::Parameter { .. } => {
          node.target()?
        }
        _ => return Some(current),
      };
    }
  }

  /// Objects and merged `allOf`s with at least one field. Everything else renders as a leaf.
  pub(crate) fn has_fields(&self, id: NodeId) -> bool {
    let node = self.node(id);
    let fielded = matches!(
      node.kind,
      NodeKind::Object
        | NodeKind::Composed {
          kind: CompositionKind::AllOf,
          ..
        }
    );
    fielded && !node.props.is_empty()
  }

  /// True when selecting a field of this type needs a `{ ... }` block.
  pub(crate) fn needs_brackets(&self, id: NodeId) -> bool {
    self.shape(id).is_some_and(|shape| self.has_fields(shape))
  }

  /// Compound named types reachable from `id` that need their own SDL definition, in first-seen order.
  pub(crate) fn dependencies(&self, id: NodeId) -> Result<IndexSet<NodeId>, GeneratorError> {
    let mut seen = HashSet::new();
    let mut definitions = IndexSet::new();
    self.collect_dependencies(id, &mut seen, &mut definitions)?;
    Ok(definitions)
  }

  fn collect_dependencies(
    &self,
    id: NodeId,
    seen: &mut HashSet<NodeId>,
    definitions: &mut IndexSet<NodeId>,
  ) -> Result<(), GeneratorError> {
    if !seen.insert(id) {
      return Ok(());
    }

    let node = self.node(id);
    if !node.visited {
      return Err(GeneratorError::NotVisited {
        node: self.describe(id),
      });
    }

    match &node.kind {
      NodeKind::Scalar(_) => {}
      NodeKind::Object
      | NodeKind::Composed {
        kind: CompositionKind::AllOf,
        ..
      } => {
        definitions.insert(id);
        for &prop in node.props.values() {
          self.collect_dependencies(prop, seen, definitions)?;
        }
      }
      NodeKind::Composed {
        kind: CompositionKind::OneOf,
        ..
      }
      | NodeKind::Union { .. } => {
        if let Some(&variant) = node.children.first() {
          self.collect_dependencies(variant, seen, definitions)?;
        }
      }
      NodeKind::Array { .. } | NodeKind::Property { .. } | NodeKind::PropertyRef { .. } | NodeKind::Parameter { .. } => {
        if let Some(target) = node.target() {
          self.collect_dependencies(target, seen, definitions)?;
        }
      }
    }

    Ok(())
  }
}
