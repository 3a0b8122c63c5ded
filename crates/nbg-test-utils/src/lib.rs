//! Testing utilities for nbgallery workspace
//!
//! Notebook fixtures, fake gallery records and throwaway cache directories.

#![allow(missing_docs)]

use nbg_config::GalleryConfig;
use nbg_notebook::formats::JupyterNotebook;
use nbg_notebook::{default_formats, NotebookRecord, NotebookResolver, DEFAULT_NOTEBOOK_TYPE};
use serde_json::{json, Map, Value};
use std::path::{Path, PathBuf};
use tempfile::TempDir;
use uuid::Uuid;

/// Builds Jupyter notebook text cell by cell
#[derive(Debug, Clone)]
pub struct NotebookBuilder {
    cells: Vec<Value>,
    metadata: Map<String, Value>,
    nbformat_minor: u64,
}

impl Default for NotebookBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl NotebookBuilder {
    pub fn new() -> Self {
        Self {
            cells: Vec::new(),
            metadata: Map::new(),
            nbformat_minor: 4,
        }
    }

    /// Notebook with a Python 3 kernelspec and language_info
    pub fn python() -> Self {
        Self::new()
            .metadata(
                "kernelspec",
                json!({"display_name": "Python 3", "language": "python", "name": "python3"}),
            )
            .metadata("language_info", json!({"name": "python", "version": "3.8.5"}))
    }

    pub fn minor(mut self, nbformat_minor: u64) -> Self {
        self.nbformat_minor = nbformat_minor;
        self
    }

    pub fn metadata(mut self, key: &str, value: Value) -> Self {
        self.metadata.insert(key.to_string(), value);
        self
    }

    pub fn code(self, source: &str) -> Self {
        self.cell(json!({
            "cell_type": "code",
            "execution_count": null,
            "metadata": {},
            "outputs": [],
            "source": source,
        }))
    }

    /// Code cell with an execution count and one stdout stream output
    pub fn executed_code(self, source: &str, count: u64, stdout: &str) -> Self {
        self.cell(json!({
            "cell_type": "code",
            "execution_count": count,
            "metadata": {"collapsed": false, "scrolled": true},
            "outputs": [{"output_type": "stream", "name": "stdout", "text": stdout}],
            "source": source,
        }))
    }

    pub fn markdown(self, source: &str) -> Self {
        self.cell(json!({"cell_type": "markdown", "metadata": {}, "source": source}))
    }

    pub fn raw(self, source: &str) -> Self {
        self.cell(json!({"cell_type": "raw", "metadata": {}, "source": source}))
    }

    pub fn cell(mut self, cell: Value) -> Self {
        self.cells.push(cell);
        self
    }

    /// Tag the most recently added cell
    pub fn tagged(mut self, tags: &[&str]) -> Self {
        let cell = self.cells.last_mut().expect("tagged() needs a cell to tag");
        cell["metadata"]["tags"] = json!(tags);
        self
    }

    pub fn to_value(&self) -> Value {
        json!({
            "cells": self.cells,
            "metadata": self.metadata,
            "nbformat": 4,
            "nbformat_minor": self.nbformat_minor,
        })
    }

    pub fn build(&self) -> String {
        serde_json::to_string_pretty(&self.to_value()).unwrap()
    }

    pub fn parse(&self) -> JupyterNotebook {
        JupyterNotebook::parse(&self.build()).unwrap()
    }
}

/// Gallery record with only a UUID
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TestRecord {
    pub uuid: String,
}

impl TestRecord {
    pub fn new(uuid: &str) -> Self {
        Self {
            uuid: uuid.to_string(),
        }
    }

    pub fn random() -> Self {
        Self {
            uuid: Uuid::new_v4().to_string(),
        }
    }
}

impl NotebookRecord for TestRecord {
    fn uuid(&self) -> &str {
        &self.uuid
    }
}

/// Notebook cache directory removed on drop
#[derive(Debug)]
pub struct TempCache {
    dir: TempDir,
}

impl TempCache {
    pub fn new() -> Self {
        Self {
            dir: TempDir::new().unwrap(),
        }
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    pub fn config(&self) -> GalleryConfig {
        GalleryConfig::new().with_cache_dir(self.path())
    }

    pub fn resolver(&self) -> NotebookResolver {
        NotebookResolver::new(Some(self.path().to_path_buf()))
    }

    /// Write a cached document, returning its path
    pub fn write(&self, uuid: &str, notebook_type: &str, text: &str) -> PathBuf {
        let extension = default_formats().type_to_extension(notebook_type).unwrap();
        let path = self.path().join(format!("{uuid}.{extension}"));
        std::fs::write(&path, text).unwrap();
        path
    }

    /// Cache a Jupyter notebook under a fresh record
    pub fn insert(&self, text: &str) -> TestRecord {
        let record = TestRecord::random();
        self.write(&record.uuid, DEFAULT_NOTEBOOK_TYPE, text);
        record
    }
}

impl Default for TempCache {
    fn default() -> Self {
        Self::new()
    }
}

pub fn two_cell_notebook() -> NotebookBuilder {
    NotebookBuilder::python()
        .executed_code("print(1)", 1, "1\n")
        .markdown("# Title")
}
