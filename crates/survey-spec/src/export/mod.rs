//! Renders a generated schema into its external artifacts.
//!
//! The tabular rows are hand-imported into the hosted form tool while the
//! backup document is the system of record, so every field the two share
//! (id, type, prompt, required flag) is taken from the same record.

pub mod backup;
pub mod summary;
pub mod tabular;

use std::{
    fmt, fs,
    path::{Path, PathBuf},
};

use log::{info, warn};

use crate::error::ExportError;
use crate::spec::schema::Schema;

pub use backup::{BackupDocument, backup_json_schema, parse_backup, render_backup};
pub use summary::render_summary;
pub use tabular::{OPTION_DELIMITER, TABULAR_HEADER, TabularRow, render_tabular, tabular_rows};

pub const TABULAR_FILE: &str = "form_b_questions.csv";
pub const BACKUP_FILE: &str = "form_b_structure.json";
pub const SUMMARY_FILE: &str = "generation_summary.txt";

/// Leads the tabular file so spreadsheet imports detect UTF-8.
pub const UTF8_BOM: char = '\u{feff}';

/// All three renderings of one schema.
#[derive(Debug, Clone)]
pub struct ExportBundle {
    pub rows: Vec<TabularRow>,
    pub backup: BackupDocument,
    pub summary: String,
}

/// Render `schema` into tabular rows, backup document and summary text.
pub fn export(schema: &Schema) -> Result<ExportBundle, ExportError> {
    Ok(ExportBundle {
        rows: tabular_rows(schema)?,
        backup: BackupDocument::from_schema(schema)?,
        summary: render_summary(schema)?,
    })
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArtifactKind {
    Tabular,
    Backup,
    Summary,
}

impl ArtifactKind {
    pub fn file_name(&self) -> &'static str {
        match self {
            ArtifactKind::Tabular => TABULAR_FILE,
            ArtifactKind::Backup => BACKUP_FILE,
            ArtifactKind::Summary => SUMMARY_FILE,
        }
    }
}

impl fmt::Display for ArtifactKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            ArtifactKind::Tabular => "tabular export",
            ArtifactKind::Backup => "backup document",
            ArtifactKind::Summary => "summary report",
        };
        f.write_str(label)
    }
}

/// Result of writing one artifact.
#[derive(Debug)]
pub struct ArtifactOutcome {
    pub kind: ArtifactKind,
    pub path: PathBuf,
    pub result: Result<(), ExportError>,
}

/// Per-artifact outcomes of [`write_all`]. Partial success is a valid end state.
#[derive(Debug)]
pub struct ExportReport {
    pub artifacts: Vec<ArtifactOutcome>,
}

impl ExportReport {
    pub fn is_complete(&self) -> bool {
        self.artifacts.iter().all(|artifact| artifact.result.is_ok())
    }

    pub fn written(&self) -> impl Iterator<Item = &ArtifactOutcome> {
        self.artifacts.iter().filter(|artifact| artifact.result.is_ok())
    }

    pub fn failures(&self) -> impl Iterator<Item = &ArtifactOutcome> {
        self.artifacts.iter().filter(|artifact| artifact.result.is_err())
    }
}

pub fn write_tabular(path: &Path, rows: &[TabularRow]) -> Result<(), ExportError> {
    let mut contents = String::from(UTF8_BOM);
    contents.push_str(&render_tabular(rows)?);
    write_text(path, &contents)
}

pub fn write_backup(path: &Path, document: &BackupDocument) -> Result<(), ExportError> {
    write_text(path, &render_backup(document)?)
}

pub fn write_summary(path: &Path, summary: &str) -> Result<(), ExportError> {
    write_text(path, summary)
}

/// Write every artifact into `dir`. Each is attempted independently; nothing is rolled back.
pub fn write_all(dir: &Path, bundle: &ExportBundle) -> ExportReport {
    let artifacts = [ArtifactKind::Tabular, ArtifactKind::Backup, ArtifactKind::Summary]
        .into_iter()
        .map(|kind| {
            let path = dir.join(kind.file_name());
            let result = match kind {
                ArtifactKind::Tabular => write_tabular(&path, &bundle.rows),
                ArtifactKind::Backup => write_backup(&path, &bundle.backup),
                ArtifactKind::Summary => write_summary(&path, &bundle.summary),
            };
            match &result {
                Ok(()) => info!("wrote {} to {}", kind, path.display()),
                Err(err) => warn!("failed to write {}: {}", kind, err),
            }
            ArtifactOutcome { kind, path, result }
        })
        .collect();
    ExportReport { artifacts }
}

fn write_text(path: &Path, contents: &str) -> Result<(), ExportError> {
    fs::write(path, contents).map_err(|source| ExportError::Io {
        path: path.to_path_buf(),
        source,
    })
}
