use std::{ffi::OsStr, path::Path};

use anyhow::Context as _;
use fmmap::tokio::{AsyncMmapFile, AsyncMmapFileExt};
use serde_json::Value;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SpecFormat {
  #[default]
  Json,
  Yaml,
}

impl SpecFormat {
  #[must_use]
  pub fn from_extension(ext: &str) -> Self {
    match ext {
      "yaml" | "yml" => Self::Yaml,
      _ => Self::Json,
    }
  }
}

pub struct SpecLoader {
  file: AsyncMmapFile,
  format: SpecFormat,
}

impl SpecLoader {
  pub async fn open(path: &Path) -> anyhow::Result<Self> {
    let format = path
      .extension()
      .and_then(OsStr::to_str)
      .map_or(SpecFormat::default(), SpecFormat::from_extension);

    let file = AsyncMmapFile::open(path)
      .await
      .with_context(|| format!("failed to open {}", path.display()))?;

    Ok(Self { file, format })
  }

  pub const fn format(&self) -> SpecFormat {
    self.format
  }

  /// Parses the document into an order-preserving raw view.
  ///
  /// OpenAPI 3 documents are also checked against the typed `oas3` model. That model follows
  /// 3.1 and rejects some valid 3.0 constructs, so a mismatch is only a warning.
  pub fn parse(&self) -> anyhow::Result<Value> {
    let root = match self.format {
      SpecFormat::Json => serde_json::from_slice::<Value>(self.file.as_slice())?,
      SpecFormat::Yaml => {
        // Through the YAML model first: response codes are often unquoted integer keys.
        let yaml = serde_yaml::from_slice::<serde_yaml::Value>(self.file.as_slice())?;
        serde_json::to_value(yaml)?
      }
    };

    if !root.is_object() {
      anyhow::bail!("document root must be an object");
    }

    if root.get("openapi").is_some()
      && let Err(err) = serde_json::from_value::<oas3::Spec>(root.clone())
    {
      tracing::warn!(error = %err, "document does not match the OpenAPI 3.1 model, continuing with the raw view");
    }

    Ok(root)
  }
}
