// Chart documents: one JSON object per chart, handed to whatever draws it.
//
// A document is `{ id, kind, title, theme, data }`. Documents are a pure
// function of config + CSV input; only the export manifest carries a
// timestamp.

use std::path::{Path, PathBuf};

use anyhow::Context;
use atlas_core::config::Theme;
use atlas_football::schema::SCHEMA_VERSION;
use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{debug, info};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ChartKind {
    Bar,
    Heatmap,
    Radar,
    Violin,
}

#[derive(Debug, Serialize)]
pub struct ChartDocument<'a, T: Serialize> {
    pub id: &'a str,
    pub kind: ChartKind,
    pub title: &'a str,
    pub theme: &'a Theme,
    pub data: &'a T,
}

impl<T: Serialize> ChartDocument<'_, T> {
    pub fn to_json(&self) -> anyhow::Result<String> {
        serde_json::to_string_pretty(self)
            .with_context(|| format!("failed to serialize chart `{}`", self.id))
    }
}

// ---------------------------------------------------------------------------
// Export
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ManifestEntry {
    pub id: String,
    pub kind: ChartKind,
    pub title: String,
    pub file: String,
}

#[derive(Debug, Serialize)]
struct Manifest<'a> {
    generated_at: DateTime<Utc>,
    schema_version: u32,
    charts: &'a [ManifestEntry],
}

/// Writes `<id>.json` per chart into one directory, then `manifest.json`.
pub struct Exporter {
    out_dir: PathBuf,
    entries: Vec<ManifestEntry>,
}

impl Exporter {
    pub fn new(out_dir: &Path) -> anyhow::Result<Self> {
        std::fs::create_dir_all(out_dir)
            .with_context(|| format!("failed to create output directory {}", out_dir.display()))?;
        Ok(Exporter {
            out_dir: out_dir.to_path_buf(),
            entries: Vec::new(),
        })
    }

    pub fn write<T: Serialize>(&mut self, doc: &ChartDocument<'_, T>) -> anyhow::Result<PathBuf> {
        let file = format!("{}.json", doc.id);
        let path = self.out_dir.join(&file);
        std::fs::write(&path, doc.to_json()?)
            .with_context(|| format!("failed to write {}", path.display()))?;
        debug!("wrote {}", path.display());

        self.entries.push(ManifestEntry {
            id: doc.id.to_string(),
            kind: doc.kind,
            title: doc.title.to_string(),
            file,
        });
        Ok(path)
    }

    #[cfg(test)]
    fn entries(&self) -> &[ManifestEntry] {
        &self.entries
    }

    /// Write the manifest and return its path.
    pub fn finish(self) -> anyhow::Result<PathBuf> {
        let manifest = Manifest {
            generated_at: Utc::now(),
            schema_version: SCHEMA_VERSION,
            charts: &self.entries,
        };
        let path = self.out_dir.join("manifest.json");
        let json = serde_json::to_string_pretty(&manifest).context("failed to serialize manifest")?;
        std::fs::write(&path, json).with_context(|| format!("failed to write {}", path.display()))?;
        info!(
            "exported {} charts to {}",
            self.entries.len(),
            self.out_dir.display()
        );
        Ok(path)
    }
}
