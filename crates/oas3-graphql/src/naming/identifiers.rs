use std::{collections::HashSet, sync::LazyLock};

use any_ascii::any_ascii;
use inflections::Inflect;
use itertools::Itertools;
use regex::Regex;

/// Built-in scalar and root operation type names a schema must not shadow.
static RESERVED_TYPE_NAMES: LazyLock<HashSet<&str>> = LazyLock::new(|| {
  ["String", "Int", "Float", "Boolean", "ID", "Query", "Mutation", "Subscription"]
    .into_iter()
    .collect()
});

static INVALID_CHARS_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[^A-Za-z0-9_]+").unwrap());
static MULTI_UNDERSCORE_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"_+").unwrap());
static GRAPHQL_NAME_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^[_A-Za-z][_0-9A-Za-z]*$").unwrap());

/// Transliterates to ASCII, replaces invalid characters with underscores, collapses
/// consecutive underscores, and trims leading or trailing underscores.
pub(crate) fn sanitize(input: &str) -> String {
  if input.is_empty() {
    return String::new();
  }

  let ascii = any_ascii(input);
  let replaced = INVALID_CHARS_RE.replace_all(&ascii, "_");
  let collapsed = MULTI_UNDERSCORE_RE.replace_all(&replaced, "_");

  collapsed.trim_matches('_').to_string()
}

/// Returns the last segment of a `$ref` (`#/components/schemas/Pet` -> `Pet`).
pub(crate) fn ref_name(reference: &str) -> &str {
  reference.rsplit_once('/').map_or(reference, |(_, name)| name)
}

/// Converts a raw schema name into a GraphQL type name (`PascalCase`).
///
/// # Rules:
/// 1. Mixed-case input without separators keeps its capitalisation.
/// 2. Anything else is sanitized and converted to `PascalCase`.
/// 3. A leading digit is prefixed with `T`; an empty result becomes `Unnamed`.
/// 4. Names of built-in scalars and root types get a `Type` suffix.
pub(crate) fn to_type_name(name: &str) -> String {
  let has_separators = name.contains(['-', '_', '.', ' ']);
  let has_upper = name.chars().any(|c| c.is_ascii_uppercase());
  let has_lower = name.chars().any(|c| c.is_ascii_lowercase());

  let mut ident = if !has_separators && has_upper && has_lower {
    let cleaned: String = any_ascii(name).chars().filter(char::is_ascii_alphanumeric).collect();
    let mut chars = cleaned.chars();
    match chars.next() {
      Some(first) => first.to_ascii_uppercase().to_string() + chars.as_str(),
      None => String::new(),
    }
  } else {
    sanitize(name).to_pascal_case()
  };

  if ident.is_empty() {
    return "Unnamed".to_string();
  }

  if ident.starts_with(|c: char| c.is_ascii_digit()) {
    ident.insert(0, 'T');
  }

  if RESERVED_TYPE_NAMES.contains(ident.as_str()) {
    ident.push_str("Type");
  }

  ident
}

/// Converts a raw property or parameter name into a GraphQL field name.
///
/// Names that are already legal are kept verbatim; everything else becomes `camelCase`.
pub(crate) fn to_field_name(name: &str) -> String {
  if GRAPHQL_NAME_RE.is_match(name) && !name.starts_with("__") {
    return name.to_string();
  }

  let mut ident = sanitize(name).to_camel_case();

  if ident.is_empty() {
    return "_".to_string();
  }

  if ident.starts_with(|c: char| c.is_ascii_digit()) {
    ident.insert(0, '_');
  }

  ident
}

/// Renders a field for a selection set, aliasing names that are not legal GraphQL names.
pub(crate) fn select_field_name(name: &str) -> String {
  let field = to_field_name(name);
  if field == name {
    field
  } else {
    format!("{field}: \"{}\"", name.replace('"', "\\\""))
  }
}

/// Names the root field of an operation from its `operationId`, or from its method and path.
pub(crate) fn operation_name(operation_id: Option<&str>, method: &str, path: &str) -> String {
  if let Some(operation_id) = operation_id.filter(|id| !id.is_empty()) {
    return to_field_name(operation_id);
  }

  let segments = path.split('/').filter(|s| !s.is_empty()).map(|segment| {
    match segment.strip_prefix('{').and_then(|s| s.strip_suffix('}')) {
      Some(param) => format!("by_{}", sanitize(param).to_snake_case()),
      None => sanitize(segment).to_snake_case(),
    }
  });

  let raw = std::iter::once(method.to_lowercase()).chain(segments).join("_");
  let mut ident = raw.to_camel_case();

  if ident.starts_with(|c: char| c.is_ascii_digit()) {
    ident.insert(0, '_');
  }

  ident
}
