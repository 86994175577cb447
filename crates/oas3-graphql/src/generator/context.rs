use indexmap::IndexMap;

use super::{
  document::{Document, SchemaDecl},
  errors::GeneratorError,
  graph::{Graph, Node, NodeId, NodeKind},
  metrics::GenerationWarning,
};

/// Mutable state threaded through one generation run.
///
/// Holds the node arena, the visitation stack used for recursion guards and selection
/// indentation, and the insert-once name cache that breaks `$ref` cycles.
#[derive(Debug)]
pub(crate) struct Context<'a> {
  document: &'a Document,
  graph: Graph<'a>,
  stack: Vec<NodeId>,
  store: IndexMap<String, NodeId>,
  compose_depth: usize,
  decisions: usize,
  warnings: Vec<GenerationWarning>,
}

impl<'a> Context<'a> {
  pub(crate) fn new(document: &'a Document) -> Self {
    Self {
      document,
      graph: Graph::default(),
      stack: vec![],
      store: IndexMap::new(),
      compose_depth: 0,
      decisions: 0,
      warnings: vec![],
    }
  }

  pub(crate) fn document(&self) -> &'a Document {
    self.document
  }

  pub(crate) fn graph(&self) -> &Graph<'a> {
    &self.graph
  }

  pub(crate) fn node(&self, id: NodeId) -> &Node<'a> {
    self.graph.node(id)
  }

  pub(crate) fn node_mut(&mut self, id: NodeId) -> &mut Node<'a> {
    self.graph.node_mut(id)
  }

  pub(crate) fn add_node(&mut self, parent: Option<NodeId>, kind: NodeKind<'a>) -> NodeId {
    self.graph.add(parent, kind)
  }

  pub(crate) fn enter(&mut self, id: NodeId) {
    if matches!(self.node(id).kind, NodeKind::Composed { .. }) {
      self.compose_depth += 1;
    }
    self.stack.push(id);
  }

  pub(crate) fn leave(&mut self) {
    if let Some(id) = self.stack.pop()
      && matches!(self.node(id).kind, NodeKind::Composed { .. })
    {
      self.compose_depth -= 1;
    }
  }

  pub(crate) fn stack(&self) -> &[NodeId] {
    &self.stack
  }

  pub(crate) fn depth(&self) -> usize {
    self.stack.len()
  }

  pub(crate) fn is_on_stack(&self, id: NodeId) -> bool {
    self.stack.contains(&id)
  }

  /// Caches `id` under `name`. The first writer wins: returns false when the name was
  /// already taken, warning if it was taken by a different node.
  pub(crate) fn store(&mut self, name: &str, id: NodeId) -> bool {
    match self.store.get(name) {
      Some(&existing) => {
        if existing != id {
          tracing::debug!(name, "cache already populated, keeping first node");
          self.warn(GenerationWarning::DuplicateCacheEntry { name: name.to_string() });
        }
        false
      }
      None => {
        tracing::trace!(name, node = ?id, "cache store");
        self.store.insert(name.to_string(), id);
        true
      }
    }
  }

  pub(crate) fn get(&self, name: &str) -> Option<NodeId> {
    self.store.get(name).copied()
  }

  pub(crate) fn cached(&self) -> usize {
    self.store.len()
  }

  pub(crate) fn lookup_ref(&self, reference: &str) -> Result<&'a SchemaDecl, GeneratorError> {
    self.document.resolve_ref(reference)
  }

  /// True while an enclosing `allOf`/`oneOf` other than `id` itself is being expanded.
  pub(crate) fn in_compose_context(&self, id: NodeId) -> bool {
    let own = usize::from(self.is_on_stack(id) && matches!(self.node(id).kind, NodeKind::Composed { .. }));
    self.compose_depth > own
  }

  pub(crate) fn record_decision(&mut self) {
    self.decisions += 1;
  }

  pub(crate) fn decisions(&self) -> usize {
    self.decisions
  }

  pub(crate) fn warn(&mut self, warning: GenerationWarning) {
    self.warnings.push(warning);
  }

  pub(crate) fn warnings(&self) -> &[GenerationWarning] {
    &self.warnings
  }

  pub(crate) fn take_warnings(&mut self) -> Vec<GenerationWarning> {
    std::mem::take(&mut self.warnings)
  }
}
