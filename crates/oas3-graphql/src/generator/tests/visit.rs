use serde_json::json;

use super::support::{document, petstore, prop_names, visit_schema, with_schemas};
use crate::generator::{
  context::Context,
  errors::GeneratorError,
  factory,
  graph::NodeKind,
  prompt::YesPrompt,
  visit::visit,
};

#[test]
fn test_self_reference_terminates() {
  let doc = document(with_schemas(json!({
    "Node": {
      "type": "object",
      "properties": {
        "value": { "type": "string" },
        "next": { "$ref": "#/components/schemas/Node" },
        "children": { "type": "array", "items": { "$ref": "#/components/schemas/Node" } }
      }
    }
  })));
  let mut ctx = Context::new(&doc);
  let node = visit_schema(&mut ctx, &mut YesPrompt, "Node");

  assert_eq!(ctx.cached(), 1);
  assert_eq!(ctx.get("#/components/schemas/Node"), Some(node));

  let next = ctx.node(node).props["next"];
  assert_eq!(ctx.node(next).target(), Some(node));

  let children = ctx.node(ctx.node(node).props["children"]).target().unwrap();
  assert!(matches!(ctx.node(children).kind, NodeKind::Array { .. }));
  let items = ctx.node(children).target().unwrap();
  assert_eq!(ctx.node(items).target(), Some(node));
  assert!(ctx.node(node).visited);
  assert!(ctx.stack().is_empty());
}

#[test]
fn test_mutual_references_share_cached_nodes() {
  let doc = document(petstore());
  let mut ctx = Context::new(&doc);
  let pet = visit_schema(&mut ctx, &mut YesPrompt, "Pet");
  let nodes_after_pet = ctx.graph().len();

  let owner = visit_schema(&mut ctx, &mut YesPrompt, "Owner");
  assert_eq!(ctx.node(ctx.node(pet).props["owner"]).target(), Some(owner));

  let pets = ctx.node(ctx.node(owner).props["pets"]).target().unwrap();
  let items = ctx.node(pets).target().unwrap();
  assert_eq!(ctx.node(items).target(), Some(pet));

  // Owner was built while visiting Pet; the second root only adds its own reference node.
  assert_eq!(ctx.graph().len(), nodes_after_pet + 1);
  assert_eq!(ctx.cached(), 2);
}

#[test]
fn test_shared_references_resolve_to_same_identity() {
  let doc = document(with_schemas(json!({
    "Tag": { "type": "object", "properties": { "label": { "type": "string" } } },
    "Post": {
      "type": "object",
      "properties": {
        "primary": { "$ref": "#/components/schemas/Tag" },
        "secondary": { "$ref": "#/components/schemas/Tag" }
      }
    }
  })));
  let mut ctx = Context::new(&doc);
  let post = visit_schema(&mut ctx, &mut YesPrompt, "Post");

  let primary = ctx.node(ctx.node(post).props["primary"]).target().unwrap();
  let secondary = ctx.node(ctx.node(post).props["secondary"]).target().unwrap();
  assert_eq!(primary, secondary);
  assert_eq!(
    ctx.graph().identity(primary).unwrap(),
    "obj://#/components/schemas/Tag"
  );
  assert_eq!(prop_names(&ctx, primary), ["label"]);
}

#[test]
fn test_visit_is_idempotent() {
  let doc = document(petstore());
  let mut ctx = Context::new(&doc);
  let root = factory::root_reference(&mut ctx, "#/components/schemas/Pet");
  visit(&mut ctx, &mut YesPrompt, root).unwrap();
  let nodes = ctx.graph().len();

  visit(&mut ctx, &mut YesPrompt, root).unwrap();
  assert_eq!(ctx.graph().len(), nodes);
}

#[test]
fn test_unresolved_reference_is_fatal() {
  let doc = document(with_schemas(json!({
    "Post": { "type": "object", "properties": { "author": { "$ref": "#/components/schemas/Missing" } } }
  })));
  let mut ctx = Context::new(&doc);
  let root = factory::root_reference(&mut ctx, "#/components/schemas/Post");

  let err = visit(&mut ctx, &mut YesPrompt, root).unwrap_err();
  assert!(
    matches!(err, GeneratorError::MalformedReference { ref reference } if reference == "#/components/schemas/Missing")
  );
  assert!(!ctx.node(root).visited);
  assert!(ctx.stack().is_empty());
}

#[test]
fn test_queries_before_visit_fail_fast() {
  let doc = document(petstore());
  let mut ctx = Context::new(&doc);
  let root = factory::root_reference(&mut ctx, "#/components/schemas/Pet");

  assert!(matches!(ctx.graph().identity(root), Err(GeneratorError::NotVisited { .. })));
  assert!(matches!(ctx.graph().dependencies(root), Err(GeneratorError::NotVisited { .. })));

  visit(&mut ctx, &mut YesPrompt, root).unwrap();
  assert_eq!(ctx.graph().identity(root).unwrap(), "prop:ref:#/components/schemas/Pet");
}

#[test]
fn test_inline_shapes_are_named_after_their_position() {
  let doc = document(with_schemas(json!({
    "Order": {
      "type": "object",
      "properties": {
        "shipping_address": { "type": "object", "properties": { "city": { "type": "string" } } },
        "lines": { "type": "array", "items": { "type": "object", "properties": { "sku": { "type": "string" } } } }
      }
    }
  })));
  let mut ctx = Context::new(&doc);
  let order = visit_schema(&mut ctx, &mut YesPrompt, "Order");

  let address = ctx.node(ctx.node(order).props["shipping_address"]).target().unwrap();
  assert_eq!(ctx.node(address).simple_name().as_deref(), Some("OrderShippingAddress"));

  let lines = ctx.node(ctx.node(order).props["lines"]).target().unwrap();
  let line = ctx.node(lines).target().unwrap();
  assert_eq!(ctx.graph().type_name(lines), "[OrderLinesItem]");
  assert_eq!(ctx.node(line).simple_name().as_deref(), Some("OrderLinesItem"));
}
