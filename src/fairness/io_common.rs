use log::{info, warn};
use snafu::ResultExt;
use std::fs;
use std::path::{Path, PathBuf};

use duty_roster::DutyDocument;

use crate::fairness::{io_pdf, io_text, DfError, DfResult, EmptyInputSnafu, OpeningFolderSnafu};

/// The text-extraction providers.
#[derive(Eq, PartialEq, Debug, Clone, Copy)]
pub enum InputProvider {
    Pdf,
    /// Text already extracted from the documents, one .txt file per document.
    Text,
}

impl InputProvider {
    pub fn from_name(name: &str) -> DfResult<InputProvider> {
        match name {
            "pdf" => Ok(InputProvider::Pdf),
            "text" | "txt" => Ok(InputProvider::Text),
            x => snafu::whatever!("Provider not implemented {:?}", x),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            InputProvider::Pdf => "pdf",
            InputProvider::Text => "text",
        }
    }

    pub fn extension(&self) -> &'static str {
        match self {
            InputProvider::Pdf => "pdf",
            InputProvider::Text => "txt",
        }
    }

    fn read_text(&self, path: &Path) -> DfResult<String> {
        match self {
            InputProvider::Pdf => io_pdf::read_pdf_text(path),
            InputProvider::Text => io_text::read_text(path),
        }
    }
}

pub fn simplify_file_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| path.display().to_string())
}

/// The documents of a folder for the given provider, sorted by file name.
///
/// Fails if there is none.
pub fn list_documents(folder: &Path, provider: InputProvider) -> DfResult<Vec<PathBuf>> {
    let path = folder.display().to_string();
    let entries = fs::read_dir(folder).context(OpeningFolderSnafu { path: path.clone() })?;
    let mut res: Vec<PathBuf> = Vec::new();
    for entry in entries {
        let p = entry.context(OpeningFolderSnafu { path: path.clone() })?.path();
        let matches_ext = p
            .extension()
            .map(|e| e.to_string_lossy().eq_ignore_ascii_case(provider.extension()))
            .unwrap_or(false);
        if matches_ext && p.is_file() {
            res.push(p);
        }
    }
    if res.is_empty() {
        return EmptyInputSnafu {
            path,
            extension: provider.extension(),
        }
        .fail();
    }
    res.sort_by_key(|p| simplify_file_name(p));
    Ok(res)
}

/// The outcome of reading a set of documents: the documents that could be
/// read, in input order, and the failures.
#[derive(Debug)]
pub struct DocumentBatch {
    pub documents: Vec<DutyDocument>,
    pub failures: Vec<DfError>,
}

impl DocumentBatch {
    /// Applies the failure policy. Without `skip_unreadable`, the first failure
    /// fails the whole batch.
    pub fn into_documents(self, skip_unreadable: bool) -> DfResult<Vec<DutyDocument>> {
        if !skip_unreadable {
            if let Some(e) = self.failures.into_iter().next() {
                return Err(e);
            }
        } else {
            for e in self.failures.iter() {
                warn!("Skipping unreadable document: {}", e);
            }
        }
        Ok(self.documents)
    }
}

pub fn read_documents(paths: &[PathBuf], provider: InputProvider) -> DocumentBatch {
    let mut batch = DocumentBatch {
        documents: Vec::new(),
        failures: Vec::new(),
    };
    for p in paths.iter() {
        info!("Attempting to read document {:?}", p.display().to_string());
        match provider.read_text(p) {
            Ok(text) => batch.documents.push(DutyDocument {
                name: simplify_file_name(p),
                text,
            }),
            Err(e) => batch.failures.push(e),
        }
    }
    batch
}
