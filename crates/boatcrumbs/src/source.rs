use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use async_trait::async_trait;
use boatcrumbs_core::range::DateRange;
use boatcrumbs_core::RawFix;
use tracing::{info, warn};

/// Supplies fixes within a range, ordered by `shifted_timestamp`.
#[async_trait]
pub trait FixSource: Send + Sync {
    async fn fetch(&self, range: &DateRange) -> Result<Vec<RawFix>>;
}

/// Fix dump loaded once from a JSON array or CSV file.
#[derive(Debug, Clone)]
pub struct FileFixSource {
    path: PathBuf,
    fixes: Vec<RawFix>,
}

impl FileFixSource {
    pub async fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let content = tokio::fs::read_to_string(&path)
            .await
            .with_context(|| format!("failed to read fix dump {}", path.display()))?;
        let fixes = parse_fixes(&path, &content)?;
        Ok(Self::from_fixes(path, fixes))
    }

    pub fn from_fixes(path: PathBuf, mut fixes: Vec<RawFix>) -> Self {
        fixes.sort_by_key(|fix| fix.shifted_timestamp);
        info!(path = %path.display(), fixes = fixes.len(), "Loaded fix dump");
        Self { path, fixes }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn all(&self) -> &[RawFix] {
        &self.fixes
    }
}

#[async_trait]
impl FixSource for FileFixSource {
    async fn fetch(&self, range: &DateRange) -> Result<Vec<RawFix>> {
        let start = self
            .fixes
            .partition_point(|fix| fix.shifted_timestamp < range.from_ts);
        let end = self
            .fixes
            .partition_point(|fix| fix.shifted_timestamp <= range.to_ts);
        Ok(self.fixes[start..end.max(start)].to_vec())
    }
}

/// Parses a fix dump; the format follows the file extension (`.csv` or JSON).
pub fn parse_fixes(path: &Path, content: &str) -> Result<Vec<RawFix>> {
    let is_csv = path
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("csv"));

    if is_csv {
        parse_csv(content)
    } else {
        serde_json::from_str(content)
            .with_context(|| format!("invalid JSON fix dump {}", path.display()))
    }
}

fn parse_csv(content: &str) -> Result<Vec<RawFix>> {
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(content.as_bytes());

    let mut fixes = Vec::new();
    for (line, record) in reader.deserialize::<RawFix>().enumerate() {
        match record {
            Ok(fix) => fixes.push(fix),
            Err(err) => {
                warn!(line = line + 2, error = %err, "Rejecting CSV fix dump");
                bail!("CSV data row {} invalid: {err}", line + 2);
            }
        }
    }
    Ok(fixes)
}
