use serde_json::{Value, json};

use crate::generator::{
  context::Context,
  document::Document,
  factory,
  graph::NodeId,
  orchestrator::Orchestrator,
  errors::GeneratorError,
  prompt::{Answer, PlayerPrompt, Prompt},
  recording::Recording,
  visit::visit,
};

const PETSTORE: &str = include_str!("../../../fixtures/petstore.json");

pub(super) fn petstore() -> Value {
  serde_json::from_str(PETSTORE).expect("petstore fixture should parse")
}

/// A minimal OpenAPI document holding only `components.schemas`.
pub(super) fn with_schemas(schemas: Value) -> Value {
  json!({
    "openapi": "3.0.3",
    "info": { "title": "Test", "version": "0.0.1" },
    "components": { "schemas": schemas }
  })
}

pub(super) fn document(root: Value) -> Document {
  Document::from_value(root).expect("document should load")
}

pub(super) fn orchestrator(root: Value) -> Orchestrator {
  Orchestrator::new(root, "test.json").expect("orchestrator should load")
}

pub(super) fn scripted(answers: &str) -> PlayerPrompt {
  PlayerPrompt::new(answers.parse::<Recording>().expect("recording should parse"))
}

/// A document with one `GET <path>` operation answering with `response`.
pub(super) fn with_query(schemas: Value, path: &str, operation_id: &str, response: Value) -> Value {
  let mut root = with_schemas(schemas);
  root["paths"] = json!({ path: { "get": {
    "operationId": operation_id,
    "responses": { "200": { "content": { "application/json": { "schema": response } } } }
  } } });
  root
}

/// Replays scripted answers and keeps every question asked.
pub(super) struct Transcript {
  player: PlayerPrompt,
  pub(super) questions: Vec<String>,
}

impl Transcript {
  pub(super) fn new(answers: &str) -> Self {
    Self {
      player: scripted(answers),
      questions: vec![],
    }
  }
}

impl Prompt for Transcript {
  fn yes_no(&mut self, question: &str) -> Result<bool, GeneratorError> {
    self.questions.push(question.to_string());
    self.player.yes_no(question)
  }

  fn yes_no_select(&mut self, question: &str) -> Result<Answer, GeneratorError> {
    self.questions.push(question.to_string());
    self.player.yes_no_select(question)
  }
}

/// Visits a component schema through a root reference and returns the referenced node.
pub(super) fn visit_schema(ctx: &mut Context<'_>, prompt: &mut dyn Prompt, name: &str) -> NodeId {
  let root = factory::root_reference(ctx, &format!("#/components/schemas/{name}"));
  visit(ctx, prompt, root).expect("visit should succeed");
  ctx.node(root).target().expect("root reference should resolve")
}

pub(super) fn prop_names(ctx: &Context<'_>, id: NodeId) -> Vec<String> {
  ctx.node(id).props.keys().cloned().collect()
}

pub(super) fn assert_contains(code: &str, expected: &str, context: &str) {
  assert!(code.contains(expected), "missing {context}: expected '{expected}' in:\n{code}");
}
