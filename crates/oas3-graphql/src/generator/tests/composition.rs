use serde_json::json;

use super::support::{Transcript, document, petstore, prop_names, scripted, visit_schema, with_schemas};
use crate::generator::{
  context::Context,
  errors::GeneratorError,
  factory,
  graph::NodeKind,
  prompt::YesPrompt,
  visit::{collect_candidates, visit},
};

#[test]
fn test_all_of_auto_yes_merges_in_first_seen_order() {
  let doc = document(petstore());
  let mut ctx = Context::new(&doc);
  let cat = visit_schema(&mut ctx, &mut YesPrompt, "Cat");

  assert_eq!(prop_names(&ctx, cat), ["name", "id", "tag", "owner", "color"]);

  // The later member's `name` replaces Pet's, keeping Pet's position.
  let name = ctx.node(ctx.node(cat).props["name"]).kind.member().unwrap();
  assert!(name.schema.description.is_some());
  assert!(!name.required);

  assert_eq!(ctx.decisions(), 1);
  assert_eq!(ctx.get("#/components/schemas/Cat"), Some(cat));
  assert_eq!(ctx.node(cat).children.len(), ctx.node(cat).props.len());
}

#[test]
fn test_all_of_subset_asks_per_field() {
  let doc = document(petstore());
  let mut ctx = Context::new(&doc);
  let mut prompt = scripted("s\ny\nn\ny\nn\ny\n");
  let cat = visit_schema(&mut ctx, &mut prompt, "Cat");

  assert_eq!(prop_names(&ctx, cat), ["name", "tag", "color"]);
  assert_eq!(ctx.decisions(), 6);
  assert_eq!(prompt.remaining(), 0);
}

#[test]
fn test_all_of_no_merges_nothing() {
  let doc = document(petstore());
  let mut ctx = Context::new(&doc);
  let cat = visit_schema(&mut ctx, &mut scripted("n"), "Cat");

  assert!(ctx.node(cat).props.is_empty());
  assert_eq!(ctx.graph().type_name(cat), "JSON");
  assert!(ctx.graph().identity(cat).unwrap().starts_with("comp:all-of://"));
}

#[test]
fn test_all_of_merge_is_repeatable() {
  let run = || {
    let doc = document(petstore());
    let mut ctx = Context::new(&doc);
    let cat = visit_schema(&mut ctx, &mut scripted("s\nn\ny\ny\nn\ny\n"), "Cat");
    prop_names(&ctx, cat)
  };

  assert_eq!(run(), run());
  assert_eq!(run(), ["id", "tag", "color"]);
}

#[test]
fn test_nested_all_of_is_merged_without_prompting() {
  let doc = document(with_schemas(json!({
    "Base": { "type": "object", "properties": { "id": { "type": "integer" } } },
    "Kitten": {
      "allOf": [
        { "allOf": [{ "$ref": "#/components/schemas/Base" }, { "properties": { "color": { "type": "string" } } }] },
        { "properties": { "age": { "type": "integer" } } }
      ]
    }
  })));
  let mut ctx = Context::new(&doc);

  // A second prompt would exhaust the single recorded answer.
  let kitten = visit_schema(&mut ctx, &mut scripted("y"), "Kitten");

  assert_eq!(prop_names(&ctx, kitten), ["id", "color", "age"]);
  assert_eq!(ctx.decisions(), 1);
}

#[test]
fn test_exhausted_recording_aborts_composition() {
  let doc = document(petstore());
  let mut ctx = Context::new(&doc);
  let root = factory::root_reference(&mut ctx, "#/components/schemas/Cat");

  let err = visit(&mut ctx, &mut scripted("s\ny\n"), root).unwrap_err();
  assert!(matches!(err, GeneratorError::RecordingExhausted { position: 3 }));
}

#[test]
fn test_candidates_collect_without_prompting() {
  let doc = document(petstore());
  let mut ctx = Context::new(&doc);
  let pet = visit_schema(&mut ctx, &mut YesPrompt, "Pet");
  let owner = visit_schema(&mut ctx, &mut YesPrompt, "Owner");

  let candidates = collect_candidates(ctx.graph(), &[pet, owner]);
  let names: Vec<&str> = candidates.keys().map(String::as_str).collect();
  assert_eq!(names, ["name", "id", "tag", "owner", "pets"]);
  assert_eq!(candidates["name"], ctx.node(owner).props["name"]);
  assert_eq!(ctx.decisions(), 0);
}

#[test]
fn test_one_of_keeps_a_single_variant() {
  let doc = document(petstore());
  let mut ctx = Context::new(&doc);
  let shape = visit_schema(&mut ctx, &mut YesPrompt, "Shape");

  assert!(matches!(ctx.node(shape).kind, NodeKind::Composed { .. }));
  let union = ctx.node(shape).children[0];
  assert!(matches!(ctx.node(union).kind, NodeKind::Union { .. }));
  assert_eq!(ctx.node(union).children.len(), 1);

  // Every variant is visited, so both refs are cached, but only the first is kept.
  let circle = ctx.get("#/components/schemas/Circle").unwrap();
  assert!(ctx.get("#/components/schemas/Square").is_some());
  assert_eq!(ctx.graph().type_name(shape), "Circle");
  assert_eq!(ctx.graph().dependencies(shape).unwrap().into_iter().collect::<Vec<_>>(), [circle]);
  assert_eq!(ctx.decisions(), 0);
}

#[test]
fn test_prompts_list_candidates_with_their_types() {
  let doc = document(petstore());
  let mut ctx = Context::new(&doc);
  let mut prompt = Transcript::new("s\ny\nn\ny\nn\ny\n");
  visit_schema(&mut ctx, &mut prompt, "Cat");

  assert_eq!(
    prompt.questions[0],
    "Add all properties from Cat?\n - name: String\n - id: Int\n - tag: String\n - owner: Owner\n - color: String"
  );
  assert_eq!(prompt.questions[1], "Add field 'name: String'?");
  assert_eq!(prompt.questions[4], "Add field 'owner: Owner'?");
  assert_eq!(prompt.questions.len(), 6);
}
