//! Raw, order-preserving view of an OpenAPI or Swagger document.
//!
//! The traversal engine only needs a handful of declaration fields and the ability to
//! resolve local `$ref`s, so the document is kept as an ordered `serde_json::Value` and
//! the schema/operation tables are extracted once at load time. Property order matters
//! for the generated output and is preserved through `indexmap`.

use std::{fmt, sync::LazyLock};

use indexmap::IndexMap;
use serde::{Deserialize, Deserializer};
use serde_json::Value;

use super::errors::GeneratorError;

const COMPONENT_SCHEMAS: [(&str, &str); 2] = [
  ("/components/schemas", "#/components/schemas/"),
  ("/definitions", "#/definitions/"),
];

const HTTP_METHODS: [&str; 8] = ["get", "put", "post", "delete", "options", "head", "patch", "trace"];

const SUCCESS_STATUSES: [&str; 4] = ["200", "201", "2XX", "default"];

const JSON_MEDIA_TYPE: &str = "application/json";

pub(crate) static EMPTY_SCHEMA: LazyLock<SchemaDecl> = LazyLock::new(SchemaDecl::default);

/// The `type` keyword, either a single name or an OpenAPI 3.1 type list.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub(crate) enum TypeDecl {
  Single(String),
  Multiple(Vec<String>),
}

impl fmt::Display for TypeDecl {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      Self::Single(name) => f.write_str(name),
      Self::Multiple(names) => write!(f, "[{}]", names.join(", ")),
    }
  }
}

/// A raw schema declaration as written in the document.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub(crate) struct SchemaDecl {
  #[serde(rename = "$ref")]
  pub(crate) reference: Option<String>,
  #[serde(rename = "type")]
  pub(crate) schema_type: Option<TypeDecl>,
  pub(crate) format: Option<String>,
  pub(crate) title: Option<String>,
  pub(crate) description: Option<String>,
  pub(crate) properties: IndexMap<String, SchemaDecl>,
  #[serde(deserialize_with = "lenient_names")]
  pub(crate) required: Vec<String>,
  pub(crate) items: Option<Box<SchemaDecl>>,
  pub(crate) all_of: Vec<SchemaDecl>,
  pub(crate) one_of: Vec<SchemaDecl>,
  pub(crate) any_of: Vec<SchemaDecl>,
  pub(crate) not: Option<Box<SchemaDecl>>,
  pub(crate) default: Option<Value>,
  #[serde(rename = "enum")]
  pub(crate) enum_values: Vec<Value>,
}

impl SchemaDecl {
  /// Returns the single declared type, reducing a `[T, "null"]` list to `T`.
  pub(crate) fn single_type(&self) -> Option<&str> {
    match self.schema_type.as_ref()? {
      TypeDecl::Single(name) => Some(name.as_str()),
      TypeDecl::Multiple(names) => {
        let mut non_null = names.iter().filter(|name| name.as_str() != "null");
        match (non_null.next(), non_null.next()) {
          (Some(name), None) => Some(name.as_str()),
          _ => None,
        }
      }
    }
  }

  pub(crate) fn is_required(&self, property: &str) -> bool {
    self.required.iter().any(|name| name == property)
  }

  /// Returns true when an untyped schema only enumerates string values.
  pub(crate) fn is_string_enum(&self) -> bool {
    !self.enum_values.is_empty() && self.enum_values.iter().all(Value::is_string)
  }
}

/// `required` is a name list on schemas, but some documents put a boolean there.
fn lenient_names<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<String>, D::Error> {
  Ok(match Value::deserialize(deserializer)? {
    Value::Array(values) => values
      .into_iter()
      .filter_map(|value| value.as_str().map(ToString::to_string))
      .collect(),
    _ => vec![],
  })
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) struct ParameterDecl {
  pub(crate) name: String,
  pub(crate) location: String,
  pub(crate) required: bool,
  pub(crate) schema: SchemaDecl,
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) struct OperationDecl {
  pub(crate) path: String,
  pub(crate) method: String,
  pub(crate) operation_id: Option<String>,
  pub(crate) summary: Option<String>,
  pub(crate) parameters: Vec<ParameterDecl>,
  pub(crate) response: Option<SchemaDecl>,
}

impl OperationDecl {
  pub(crate) fn is_query(&self) -> bool {
    self.method == "get"
  }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub(crate) struct DocumentInfo {
  pub(crate) title: String,
  pub(crate) version: String,
}

/// A loaded document: named schemas keyed by their local `$ref`, and operations in document order.
#[derive(Debug)]
pub(crate) struct Document {
  info: DocumentInfo,
  schemas: IndexMap<String, SchemaDecl>,
  operations: Vec<OperationDecl>,
}

impl Document {
  pub(crate) fn from_value(root: Value) -> Result<Self, GeneratorError> {
    let info = DocumentInfo {
      title: string_at(&root, "/info/title").unwrap_or_default(),
      version: string_at(&root, "/info/version").unwrap_or_default(),
    };

    let mut schemas = IndexMap::new();
    for (pointer, prefix) in COMPONENT_SCHEMAS {
      let Some(declarations) = root.pointer(pointer).and_then(Value::as_object) else {
        continue;
      };
      for (name, declaration) in declarations {
        let reference = format!("{prefix}{name}");
        let schema = parse_schema(declaration, &reference)?;
        schemas.insert(reference, schema);
      }
    }

    let operations = collect_operations(&root)?;

    Ok(Self {
      info,
      schemas,
      operations,
    })
  }

  pub(crate) fn info(&self) -> &DocumentInfo {
    &self.info
  }

  /// Resolves a local `$ref` to its registered declaration.
  pub(crate) fn resolve_ref(&self, reference: &str) -> Result<&SchemaDecl, GeneratorError> {
    self
      .schemas
      .get(reference)
      .ok_or_else(|| GeneratorError::MalformedReference {
        reference: reference.to_string(),
      })
  }

  pub(crate) fn schemas(&self) -> impl Iterator<Item = (&str, &SchemaDecl)> {
    self.schemas.iter().map(|(reference, schema)| (reference.as_str(), schema))
  }

  pub(crate) fn operations(&self) -> &[OperationDecl] {
    &self.operations
  }

  /// Returns the effective parameter list of an operation.
  pub(crate) fn parameters<'d>(&self, operation: &'d OperationDecl) -> &'d [ParameterDecl] {
    &operation.parameters
  }
}

fn string_at(root: &Value, pointer: &str) -> Option<String> {
  root.pointer(pointer).and_then(Value::as_str).map(ToString::to_string)
}

fn parse_schema(value: &Value, location: &str) -> Result<SchemaDecl, GeneratorError> {
  SchemaDecl::deserialize(value).map_err(|error| GeneratorError::InvalidDocument {
    location: location.to_string(),
    message: error.to_string(),
  })
}

/// Follows a `$ref` object through the raw document, returning the value itself otherwise.
fn follow<'v>(root: &'v Value, value: &'v Value) -> Result<&'v Value, GeneratorError> {
  let Some(reference) = value.get("$ref").and_then(Value::as_str) else {
    return Ok(value);
  };

  reference
    .strip_prefix('#')
    .and_then(|pointer| root.pointer(pointer))
    .ok_or_else(|| GeneratorError::MalformedReference {
      reference: reference.to_string(),
    })
}

fn collect_operations(root: &Value) -> Result<Vec<OperationDecl>, GeneratorError> {
  let Some(paths) = root.get("paths").and_then(Value::as_object) else {
    return Ok(vec![]);
  };

  let mut operations = vec![];
  for (path, item) in paths {
    let item = follow(root, item)?;
    let Some(item) = item.as_object() else {
      continue;
    };

    let shared = item.get("parameters").and_then(Value::as_array);

    for (method, operation) in item {
      if !HTTP_METHODS.contains(&method.as_str()) {
        continue;
      }

      let location = format!("{} {path}", method.to_uppercase());
      operations.push(OperationDecl {
        path: path.clone(),
        method: method.clone(),
        operation_id: operation.get("operationId").and_then(Value::as_str).map(String::from),
        summary: operation.get("summary").and_then(Value::as_str).map(String::from),
        parameters: collect_parameters(root, shared, operation, &location)?,
        response: success_schema(root, operation, &location)?,
      });
    }
  }

  Ok(operations)
}

/// Path-level parameters come first; an operation-level parameter replaces one with the same `(in, name)`.
fn collect_parameters(
  root: &Value,
  shared: Option<&Vec<Value>>,
  operation: &Value,
  location: &str,
) -> Result<Vec<ParameterDecl>, GeneratorError> {
  let own = operation.get("parameters").and_then(Value::as_array);
  let mut params: Vec<ParameterDecl> = vec![];

  for raw in shared.into_iter().flatten().chain(own.into_iter().flatten()) {
    let param = parse_parameter(root, follow(root, raw)?, location)?;
    params.retain(|p| p.location != param.location || p.name != param.name);
    params.push(param);
  }

  Ok(params)
}

fn parse_parameter(root: &Value, raw: &Value, location: &str) -> Result<ParameterDecl, GeneratorError> {
  let name = raw
    .get("name")
    .and_then(Value::as_str)
    .ok_or_else(|| GeneratorError::InvalidDocument {
      location: location.to_string(),
      message: "parameter without a name".to_string(),
    })?;
  let param_location = format!("{location} parameter '{name}'");

  // Swagger 2.0 parameters carry their type information inline.
  let mut schema = match raw.get("schema") {
    Some(schema) => parse_schema(follow(root, schema)?, &param_location)?,
    None => parse_schema(raw, &param_location)?,
  };
  if schema.default.is_none() {
    schema.default = raw.get("default").cloned();
  }

  Ok(ParameterDecl {
    name: name.to_string(),
    location: raw.get("in").and_then(Value::as_str).unwrap_or("query").to_string(),
    required: raw.get("required").and_then(Value::as_bool).unwrap_or(false),
    schema,
  })
}

fn success_schema(root: &Value, operation: &Value, location: &str) -> Result<Option<SchemaDecl>, GeneratorError> {
  let Some(responses) = operation.get("responses").and_then(Value::as_object) else {
    return Ok(None);
  };

  for status in SUCCESS_STATUSES {
    let Some(response) = responses.get(status) else {
      continue;
    };
    if let Some(schema) = response_schema(follow(root, response)?) {
      return parse_schema(schema, &format!("{location} response {status}")).map(Some);
    }
  }

  Ok(None)
}

fn response_schema(response: &Value) -> Option<&Value> {
  match response.get("content").and_then(Value::as_object) {
    Some(content) => content
      .get(JSON_MEDIA_TYPE)
      .or_else(|| {
        content
          .iter()
          .find_map(|(media_type, media)| media_type.contains("json").then_some(media))
      })
      .and_then(|media| media.get("schema")),
    None => response.get("schema"),
  }
}
