//! Classifies raw schema declarations into graph nodes.

use serde_json::Value;

use super::{
  context::Context,
  document::{EMPTY_SCHEMA, OperationDecl, ParameterDecl, SchemaDecl},
  errors::GeneratorError,
  graph::{CompositionKind, DefaultValue, Member, NodeId, NodeKind, Scalar},
  metrics::GenerationWarning,
};

/// Builds the node for a schema declaration. Children are created lazily during `visit`,
/// except object properties which are declared up front.
pub(crate) fn from_schema<'a>(
  ctx: &mut Context<'a>,
  parent: Option<NodeId>,
  schema: &'a SchemaDecl,
) -> Result<NodeId, GeneratorError> {
  if let Some(reference) = &schema.reference {
    let member = Member {
      field: None,
      schema,
      required: false,
      default: None,
    };
    return Ok(ctx.add_node(
      parent,
      NodeKind::PropertyRef {
        member,
        reference: reference.clone(),
        ref_type: None,
      },
    ));
  }

  if !schema.all_of.is_empty() {
    return Ok(ctx.add_node(
      parent,
      NodeKind::Composed {
        schema,
        kind: CompositionKind::AllOf,
      },
    ));
  }

  if !schema.one_of.is_empty() {
    return Ok(ctx.add_node(
      parent,
      NodeKind::Composed {
        schema,
        kind: CompositionKind::OneOf,
      },
    ));
  }

  if !schema.any_of.is_empty() || schema.not.is_some() {
    let keyword = if schema.any_of.is_empty() { "not" } else { "anyOf" };
    return Err(unsupported(ctx, parent, format!("'{keyword}' composition is not supported")));
  }

  match schema.single_type() {
    Some("array") => Ok(ctx.add_node(parent, NodeKind::Array { schema, items: None })),
    Some("object") => object(ctx, parent, schema),
    _ if !schema.properties.is_empty() => object(ctx, parent, schema),
    Some(schema_type) => match Scalar::from_type(schema_type) {
      Some(scalar) => Ok(ctx.add_node(parent, NodeKind::Scalar(scalar))),
      None => Err(unsupported(ctx, parent, format!("unknown type '{schema_type}'"))),
    },
    None if schema.schema_type.is_none() && schema.is_string_enum() => {
      Ok(ctx.add_node(parent, NodeKind::Scalar(Scalar::String)))
    }
    None => Ok(ctx.add_node(parent, NodeKind::Scalar(Scalar::Json))),
  }
}

fn object<'a>(ctx: &mut Context<'a>, parent: Option<NodeId>, schema: &'a SchemaDecl) -> Result<NodeId, GeneratorError> {
  let id = ctx.add_node(parent, NodeKind::Object);
  for (name, declaration) in &schema.properties {
    let prop = property(ctx, id, name, declaration, schema.is_required(name));
    let node = ctx.node_mut(id);
    node.props.insert(name.clone(), prop);
    node.attach(prop);
  }
  Ok(id)
}

/// A named object member: a `PropertyRef` when the declaration is a `$ref`, a `Property` otherwise.
pub(crate) fn property<'a>(
  ctx: &mut Context<'a>,
  parent: NodeId,
  name: &str,
  schema: &'a SchemaDecl,
  required: bool,
) -> NodeId {
  let member = Member {
    field: Some(name.to_string()),
    schema,
    required,
    default: member_default(ctx, name, schema),
  };

  let kind = match &schema.reference {
    Some(reference) => NodeKind::PropertyRef {
      member,
      reference: reference.clone(),
      ref_type: None,
    },
    None => NodeKind::Property {
      member,
      value: None,
      arguments: vec![],
    },
  };

  ctx.add_node(Some(parent), kind)
}

pub(crate) fn parameter<'a>(ctx: &mut Context<'a>, parent: NodeId, param: &'a ParameterDecl) -> NodeId {
  let member = Member {
    field: Some(param.name.clone()),
    schema: &param.schema,
    required: param.required,
    default: member_default(ctx, &param.name, &param.schema),
  };
  ctx.add_node(Some(parent), NodeKind::Parameter { member, value: None })
}

pub(crate) fn union<'a>(ctx: &mut Context<'a>, parent: NodeId, members: &'a [SchemaDecl]) -> NodeId {
  ctx.add_node(Some(parent), NodeKind::Union { members })
}

/// The `Query` root. Only pushed on the stack during selection so operation fields indent one level.
pub(crate) fn query_root(ctx: &mut Context<'_>) -> NodeId {
  let id = ctx.add_node(None, NodeKind::Object);
  ctx.node_mut(id).name = Some("Query".to_string());
  id
}

/// A type-position reference to a named schema, used to visit document-level schemas.
pub(crate) fn root_reference(ctx: &mut Context<'_>, reference: &str) -> NodeId {
  let member = Member {
    field: None,
    schema: &*EMPTY_SCHEMA,
    required: false,
    default: None,
  };
  ctx.add_node(
    None,
    NodeKind::PropertyRef {
      member,
      reference: reference.to_string(),
      ref_type: None,
    },
  )
}

/// The root field an operation contributes to `Query`: the success response as its type,
/// the effective parameter list as its arguments.
pub(crate) fn operation_field<'a>(
  ctx: &mut Context<'a>,
  name: String,
  operation: &'a OperationDecl,
  response: &'a SchemaDecl,
) -> NodeId {
  let member = Member {
    field: Some(name),
    schema: response,
    required: false,
    default: None,
  };
  let id = ctx.add_node(
    None,
    NodeKind::Property {
      member,
      value: None,
      arguments: vec![],
    },
  );

  let document = ctx.document();
  let arguments: Vec<NodeId> = document
    .parameters(operation)
    .iter()
    .map(|param| parameter(ctx, id, param))
    .collect();

  let node = ctx.node_mut(id);
  for &argument in &arguments {
    node.attach(argument);
  }
  if let NodeKind::Property { arguments: slot, .. } = &mut node.kind {
    *slot = arguments;
  }

  id
}

fn member_default(ctx: &mut Context<'_>, field: &str, schema: &SchemaDecl) -> Option<DefaultValue> {
  let value = schema.default.as_ref()?;
  let default = DefaultValue::from_value(value);
  if default.is_none() {
    tracing::debug!(field, "dropping unsupported default value");
    ctx.warn(GenerationWarning::DefaultDropped {
      field: field.to_string(),
      kind: value_kind(value).to_string(),
    });
  }
  default
}

const fn value_kind(value: &Value) -> &'static str {
  match value {
    Value::Null => "null",
    Value::Bool(_) => "boolean",
    Value::Number(_) => "number",
    Value::String(_) => "string",
    Value::Array(_) => "array",
    Value::Object(_) => "object",
  }
}

fn unsupported(ctx: &Context<'_>, parent: Option<NodeId>, detail: String) -> GeneratorError {
  let node = parent.map_or_else(|| "document root".to_string(), |id| ctx.graph().describe(id));
  GeneratorError::UnsupportedSchemaShape { node, detail }
}
