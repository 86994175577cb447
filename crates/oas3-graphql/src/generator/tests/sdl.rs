use serde_json::json;

use super::support::{assert_contains, orchestrator, petstore, scripted, with_query, with_schemas};
use crate::generator::{metrics::GenerationWarning, prompt::YesPrompt};

#[test]
fn test_required_and_numeric_default() {
  let output = orchestrator(with_schemas(json!({
    "Pet": {
      "type": "object",
      "required": ["name"],
      "properties": {
        "name": { "type": "string" },
        "id": { "type": "integer", "default": 0 }
      }
    }
  })))
  .generate_types(&mut YesPrompt)
  .unwrap();

  assert_contains(&output.code, "type Pet {\n  name: String!\n  id: Int = 0\n}\n", "Pet definition");
  assert_eq!(output.stats.types_generated, 1);
}

#[test]
fn test_string_and_unsupported_defaults() {
  let output = orchestrator(with_schemas(json!({
    "Filter": {
      "type": "object",
      "properties": {
        "status": { "type": "string", "default": "available" },
        "ratio": { "type": "number", "default": 0.5 },
        "strict": { "type": "boolean", "default": false },
        "tags": { "type": "array", "items": { "type": "string" }, "default": [] }
      }
    }
  })))
  .generate_types(&mut YesPrompt)
  .unwrap();

  assert_contains(&output.code, "  status: String = \"available\"\n", "quoted string default");
  assert_contains(&output.code, "  ratio: Float = 0.5\n", "numeric default");
  assert_contains(&output.code, "  strict: Boolean\n", "dropped boolean default");
  assert_contains(&output.code, "  tags: [String]\n", "dropped array default");

  let dropped = output
    .stats
    .warnings
    .iter()
    .filter(|warning| matches!(warning, GenerationWarning::DefaultDropped { .. }))
    .count();
  assert_eq!(dropped, 2);
}

#[test]
fn test_petstore_definitions_in_dependency_order() {
  let output = orchestrator(petstore()).generate_types(&mut YesPrompt).unwrap();
  let code = &output.code;

  assert!(code.starts_with("# Generated by oas3-graphql from test.json\n# Petstore 1.0.0\n\n"));
  assert_contains(
    code,
    "type Pet {\n  name: String!\n  id: Int = 0\n  tag: String\n  owner: Owner\n}\n\ntype Owner {\n  name: String\n  pets: [Pet]\n}\n",
    "Pet and Owner",
  );
  assert_contains(
    code,
    "type Cat {\n  name: String\n  id: Int = 0\n  tag: String\n  owner: Owner\n  color: String\n}\n",
    "merged Cat",
  );
  assert_contains(code, "type Node {\n  value: String\n  children: [Node]\n}\n", "self-referencing Node");
  assert_contains(code, "type Circle {\n  radius: Float\n}\n", "retained oneOf variant");
  assert!(!code.contains("union "));
  assert!(!code.contains("type Shape"));

  assert_eq!(output.stats.types_generated, 6);
  assert_eq!(output.stats.cached_refs, 7);
  assert_eq!(output.stats.decisions, 1);
}

#[test]
fn test_query_root_from_get_operations() {
  let output = orchestrator(petstore()).generate_types(&mut YesPrompt).unwrap();

  assert!(output.code.ends_with(
    "type Query {\n  listPets(limit: Int = 20): [Pet]\n  getPetsByPetId(petId: String!): Pet\n  listCats: [Cat]\n  getShape: Circle\n}\n"
  ));
  assert_eq!(output.stats.operations_converted, 4);
  assert!(output.stats.warnings.contains(&GenerationWarning::OperationSkipped {
    method: "GET".to_string(),
    path: "/health".to_string(),
    reason: "no JSON success response".to_string(),
  }));
}

#[test]
fn test_declined_all_of_emits_no_definition() {
  let output = orchestrator(petstore()).generate_types(&mut scripted("n")).unwrap();

  assert!(!output.code.contains("type Cat"));
  assert_contains(&output.code, "  listCats: [JSON]\n", "opaque Cat");
}

#[test]
fn test_colliding_type_names_keep_first_definition() {
  let output = orchestrator(with_schemas(json!({
    "pet_store": { "type": "object", "properties": { "name": { "type": "string" } } },
    "PetStore": { "type": "object", "properties": { "id": { "type": "integer" } } }
  })))
  .generate_types(&mut YesPrompt)
  .unwrap();

  assert_contains(&output.code, "type PetStore {\n  name: String\n}\n", "first definition");
  assert!(!output.code.contains("id: Int"));
  assert!(
    output
      .stats
      .warnings
      .contains(&GenerationWarning::TypeNameCollision { name: "PetStore".to_string() })
  );
}

#[test]
fn test_illegal_field_names_are_rewritten() {
  let output = orchestrator(with_schemas(json!({
    "Person": {
      "type": "object",
      "properties": {
        "first-name": { "type": "string" },
        "@type": { "type": "string" }
      }
    }
  })))
  .generate_types(&mut YesPrompt)
  .unwrap();

  assert_contains(&output.code, "type Person {\n  firstName: String\n  type: String\n}\n", "rewritten fields");
}

#[test]
fn test_self_referencing_one_of_is_opaque() {
  let output = orchestrator(with_query(
    json!({
      "A": { "oneOf": [{ "$ref": "#/components/schemas/A" }, { "$ref": "#/components/schemas/B" }] },
      "B": { "type": "object", "properties": { "id": { "type": "integer" } } }
    }),
    "/a",
    "getA",
    json!({ "$ref": "#/components/schemas/A" }),
  ))
  .generate_types(&mut YesPrompt)
  .unwrap();

  assert!(output.code.ends_with("type Query {\n  getA: JSON\n}\n"));
  assert!(!output.code.contains("type A"));
  assert_contains(&output.code, "type B {\n  id: Int\n}\n", "cached variant");
}

#[test]
fn test_cycle_through_one_of_names_the_retained_variant() {
  let output = orchestrator(with_query(
    json!({
      "A": { "oneOf": [{ "$ref": "#/components/schemas/G" }, { "$ref": "#/components/schemas/B" }] },
      "G": {
        "type": "object",
        "properties": {
          "kids": { "type": "array", "items": { "$ref": "#/components/schemas/A" } },
          "n": { "type": "string" }
        }
      },
      "B": { "type": "object", "properties": { "id": { "type": "integer" } } }
    }),
    "/a",
    "getA",
    json!({ "$ref": "#/components/schemas/A" }),
  ))
  .generate_types(&mut YesPrompt)
  .unwrap();

  assert_contains(&output.code, "type G {\n  kids: [G]\n  n: String\n}\n", "G definition");
  assert!(output.code.ends_with("type Query {\n  getA: G\n}\n"));
}

#[test]
fn test_object_without_properties_is_json() {
  let output = orchestrator(with_schemas(json!({
    "Event": {
      "type": "object",
      "properties": {
        "meta": { "type": "object" },
        "name": { "type": "string" }
      }
    }
  })))
  .generate_types(&mut YesPrompt)
  .unwrap();

  assert_contains(&output.code, "type Event {\n  meta: JSON\n  name: String\n}\n", "opaque meta");
  assert!(!output.code.contains("type EventMeta"));
}
