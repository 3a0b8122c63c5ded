//! Subcommand implementations
//!
//! Each command writes to the given sink so it can be tested without a
//! process.

use crate::Session;
use anyhow::Context as _;
use nbg_notebook::{CellFilter, CellKind, NotebookDocument};
use serde::Serialize;
use std::io::Write;
use std::path::PathBuf;

/// Which cells `sources` prints
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selection {
    /// Only code cells
    pub code: bool,
    /// Only documentation cells
    pub docs: bool,
    /// Only cells carrying this tag
    pub tag: Option<String>,
}

impl Selection {
    fn filter(&self) -> CellFilter {
        let filter = if self.code {
            CellFilter::kind(CellKind::Code)
        } else if self.docs {
            CellFilter::kind(CellKind::Documentation)
        } else {
            CellFilter::all()
        };
        match &self.tag {
            Some(tag) => filter.with_tag(tag.as_str()),
            None => filter,
        }
    }
}

/// Print selected sources, one blank line between cells
pub fn sources(
    doc: &dyn NotebookDocument,
    selection: &Selection,
    out: &mut dyn Write,
) -> anyhow::Result<()> {
    for (i, source) in doc.sources_where(selection.filter()).enumerate() {
        if i > 0 {
            writeln!(out)?;
        }
        writeln!(out, "{source}")?;
    }
    Ok(())
}

/// Summary printed by `info`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Summary<'a> {
    /// Format tag
    pub notebook_type: &'a str,
    /// Kernel language
    pub language: Option<&'a str>,
    /// Language version
    pub language_version: Option<&'a str>,
    /// Number of cells
    pub cells: usize,
    /// Number of code cells
    pub code_cells: usize,
    /// Number of documentation cells
    pub doc_cells: usize,
}

impl<'a> Summary<'a> {
    /// Summarize a document
    #[must_use]
    pub fn of(doc: &'a dyn NotebookDocument) -> Self {
        let (language, language_version) = doc.language_version();
        let mut summary = Self {
            notebook_type: doc.notebook_type(),
            language,
            language_version,
            cells: 0,
            code_cells: 0,
            doc_cells: 0,
        };
        for cell in doc.cells() {
            summary.cells += 1;
            match cell.kind {
                CellKind::Code => summary.code_cells += 1,
                CellKind::Documentation => summary.doc_cells += 1,
                CellKind::Other => {}
            }
        }
        summary
    }
}

/// Print type, language and cell counts
pub fn info(doc: &dyn NotebookDocument, json: bool, out: &mut dyn Write) -> anyhow::Result<()> {
    let summary = Summary::of(doc);
    if json {
        serde_json::to_writer_pretty(&mut *out, &summary)?;
        writeln!(out)?;
        return Ok(());
    }

    writeln!(out, "type:     {}", summary.notebook_type)?;
    writeln!(out, "language: {}", summary.language.unwrap_or("unknown"))?;
    writeln!(out, "version:  {}", summary.language_version.unwrap_or("unknown"))?;
    writeln!(
        out,
        "cells:    {} ({} code, {} documentation)",
        summary.cells, summary.code_cells, summary.doc_cells
    )?;
    Ok(())
}

/// Print `valid` or one violation per line; returns whether the document is valid
pub fn validate(doc: &dyn NotebookDocument, out: &mut dyn Write) -> anyhow::Result<bool> {
    match doc.validate() {
        Ok(()) => {
            writeln!(out, "valid")?;
            Ok(true)
        }
        Err(err) => {
            for violation in err.violations() {
                writeln!(out, "{violation}")?;
            }
            Ok(false)
        }
    }
}

/// Clean and write canonical text to `output`, or to `out` when unset
pub fn clean(
    doc: &mut dyn NotebookDocument,
    output: Option<&PathBuf>,
    out: &mut dyn Write,
) -> anyhow::Result<()> {
    let content = doc.clean().content()?;
    match output {
        Some(path) => {
            std::fs::write(path, &content)
                .with_context(|| format!("cannot write {}", path.display()))?;
            tracing::info!("Wrote cleaned notebook to {}", path.display());
        }
        None => writeln!(out, "{content}")?,
    }
    Ok(())
}

/// Print the cache path of a notebook
pub fn path(session: &Session, uuid: &str, out: &mut dyn Write) -> anyhow::Result<()> {
    let path = session
        .resolver()
        .cache_path(uuid, session.notebook_type())?;
    writeln!(out, "{}", path.display())?;
    Ok(())
}
