use std::path::Path;

use comfy_table::{Attribute, Cell, CellAlignment, ContentArrangement, Row, Table};

use crate::{
  generator::document::Document,
  naming::operation_name,
  ui::{Colors, colors::comfy, term_width},
  utils::spec::SpecLoader,
};

#[derive(Debug, PartialEq, Eq)]
struct OperationRow {
  name: String,
  method: String,
  path: String,
  summary: String,
}

/// One row per operation, in document order.
fn operation_rows(document: &Document) -> Vec<OperationRow> {
  document
    .operations()
    .iter()
    .map(|operation| OperationRow {
      name: operation_name(operation.operation_id.as_deref(), &operation.method, &operation.path),
      method: operation.method.to_uppercase(),
      path: operation.path.clone(),
      summary: operation.summary.clone().unwrap_or_default(),
    })
    .collect()
}

pub async fn list_operations(input: &Path, colors: &Colors) -> anyhow::Result<()> {
  let root = SpecLoader::open(input).await?.parse()?;
  let document = Document::from_value(root)?;

  let mut table = Table::new();
  table
    .load_preset("  ── ──            ")
    .set_content_arrangement(ContentArrangement::Dynamic)
    .set_width(term_width());

  let mut row = Row::new();
  row.add_cell(Cell::new("OPERATION").fg(comfy(colors.label())));
  row.add_cell(Cell::new("METHOD").fg(comfy(colors.label())));
  row.add_cell(Cell::new("PATH").fg(comfy(colors.label())));
  row.add_cell(Cell::new("SUMMARY").fg(comfy(colors.label())));
  table.set_header(row);

  for OperationRow {
    name,
    method,
    path,
    summary,
  } in operation_rows(&document)
  {
    let mut row = Row::new();
    row.add_cell(
      Cell::new(name)
        .fg(comfy(colors.value()))
        .add_attribute(Attribute::Bold),
    );
    row.add_cell(
      Cell::new(method)
        .fg(comfy(colors.accent()))
        .set_alignment(CellAlignment::Right),
    );
    row.add_cell(Cell::new(path).fg(comfy(colors.primary())));
    row.add_cell(Cell::new(summary));
    table.add_row(row);
  }

  println!("{table}");

  Ok(())
}
