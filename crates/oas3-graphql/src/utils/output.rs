use std::{io, path::Path};

use crate::generator::errors::GeneratorError;

/// Writes `contents` to `path`, replacing whatever is there.
///
/// An existing destination is deleted first; when that fails the write is abandoned with
/// [`GeneratorError::OutputConflict`]. Missing parent directories are created.
pub async fn replace_file(path: &Path, contents: &str) -> anyhow::Result<()> {
  match tokio::fs::remove_file(path).await {
    Ok(()) => tracing::debug!(path = %path.display(), "removed previous output"),
    Err(err) if err.kind() == io::ErrorKind::NotFound => {}
    Err(source) => {
      return Err(
        GeneratorError::OutputConflict {
          path: path.to_path_buf(),
          source,
        }
        .into(),
      );
    }
  }

  if let Some(parent) = path.parent()
    && !parent.as_os_str().is_empty()
  {
    tokio::fs::create_dir_all(parent).await?;
  }
  tokio::fs::write(path, contents).await?;
  Ok(())
}

#[cfg(test)]
mod tests {
  use super::*;

  #[tokio::test]
  async fn test_existing_file_is_replaced() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("schema.graphql");
    std::fs::write(&path, "type Old {\n  id: Int\n}\n").unwrap();

    replace_file(&path, "type New {\n  name: String\n}\n").await.unwrap();

    assert_eq!(std::fs::read_to_string(&path).unwrap(), "type New {\n  name: String\n}\n");
  }

  #[tokio::test]
  async fn test_missing_parents_are_created() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("out/graphql/schema.graphql");

    replace_file(&path, "type Query {\n}\n").await.unwrap();

    assert_eq!(std::fs::read_to_string(&path).unwrap(), "type Query {\n}\n");
  }

  #[tokio::test]
  async fn test_undeletable_destination_is_a_conflict() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("taken");
    std::fs::create_dir(&path).unwrap();

    let err = replace_file(&path, "type Query {\n}\n").await.unwrap_err();

    let conflict = err.downcast_ref::<GeneratorError>().unwrap();
    assert!(matches!(conflict, GeneratorError::OutputConflict { path: conflicted, .. } if conflicted == &path));
    assert!(path.is_dir());
  }
}
