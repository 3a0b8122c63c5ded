//! Inspecting, validating and cleaning documents through the format-independent
//! interface.

use nbg_notebook::formats::JupyterNotebook;
use nbg_notebook::{CellFilter, CellKind, NotebookDocument, NotebookResolver};
use nbg_test_utils::{two_cell_notebook, NotebookBuilder, TempCache};
use pretty_assertions::assert_eq;
use serde_json::{json, Value};

fn resolve(text: &str) -> Box<dyn NotebookDocument> {
    NotebookResolver::default().from_string(text, "jupyter").unwrap()
}

fn cell_field(doc: &dyn NotebookDocument, index: usize, field: &str) -> Value {
    let jupyter = doc.as_any().downcast_ref::<JupyterNotebook>().unwrap();
    jupyter.jupyter_cells()[index]
        .extra
        .get(field)
        .cloned()
        .unwrap_or(Value::Null)
}

#[test]
fn two_cell_scenario() {
    let cache = TempCache::new();
    let record = cache.insert(&two_cell_notebook().build());
    let mut doc = cache.resolver().from_record(&record).unwrap();

    assert_eq!(doc.code_sources().collect::<Vec<_>>(), vec!["print(1)"]);
    assert_eq!(doc.doc_sources().collect::<Vec<_>>(), vec!["# Title"]);
    assert_eq!(doc.language_version(), (Some("python"), Some("3.8.5")));
    assert!(doc.validate().is_ok());

    let cleaned = doc.clean().content().unwrap();
    let reparsed = resolve(&cleaned);

    assert_eq!(cell_field(reparsed.as_ref(), 0, "outputs"), json!([]));
    assert_eq!(cell_field(reparsed.as_ref(), 0, "execution_count"), Value::Null);
    assert_eq!(
        reparsed.sources().collect::<Vec<_>>(),
        vec!["print(1)", "# Title"]
    );
    assert!(reparsed.validate().is_ok());
}

#[test]
fn clean_keeps_raw_text() {
    let text = two_cell_notebook().build();
    let mut doc = resolve(&text);
    doc.clean();
    assert_eq!(doc.raw_text(), text);
    assert_ne!(doc.content().unwrap(), text);
}

#[test]
fn clean_strips_volatile_metadata() {
    let text = two_cell_notebook()
        .metadata("widgets", json!({"state": {}}))
        .build();
    let mut doc = resolve(&text);
    doc.clean();

    assert!(doc.metadata().get("widgets").is_none());
    assert!(doc.metadata().get("kernelspec").is_some());
    let first = doc.cells().next().unwrap();
    assert!(first.metadata.get("collapsed").is_none());
    assert!(first.metadata.get("scrolled").is_none());
}

#[test]
fn clean_honors_keep_output_tag() {
    let text = NotebookBuilder::python()
        .executed_code("plot()", 3, "figure\n")
        .tagged(&["keep_output"])
        .executed_code("x", 4, "x\n")
        .build();
    let mut doc = resolve(&text);
    doc.clean();

    let kept = cell_field(doc.as_ref(), 0, "outputs");
    assert_eq!(kept.as_array().map(Vec::len), Some(1));
    assert_eq!(cell_field(doc.as_ref(), 0, "execution_count"), Value::Null);
    assert_eq!(cell_field(doc.as_ref(), 1, "outputs"), json!([]));
}

#[test]
fn clean_twice_is_same_as_once() {
    let mut doc = resolve(&two_cell_notebook().build());
    let once = doc.clean().content().unwrap();
    let twice = doc.clean().content().unwrap();
    assert_eq!(once, twice);
}

#[test]
fn partition_by_kind() {
    let doc = resolve(
        &NotebookBuilder::new()
            .code("a")
            .markdown("b")
            .raw("c")
            .code("d")
            .build(),
    );

    assert_eq!(doc.code_sources().collect::<Vec<_>>(), vec!["a", "d"]);
    assert_eq!(doc.doc_sources().collect::<Vec<_>>(), vec!["b"]);
    let other: Vec<_> = doc
        .sources_where(CellFilter::kind(CellKind::Other))
        .collect();
    assert_eq!(other, vec!["c"]);
    assert_eq!(
        doc.cells().map(|c| c.index).collect::<Vec<_>>(),
        vec![0, 1, 2, 3]
    );
}

#[test]
fn tag_filter() {
    let doc = resolve(
        &NotebookBuilder::new()
            .code("import pandas")
            .tagged(&["setup"])
            .code("df.head()")
            .markdown("notes")
            .tagged(&["setup"])
            .build(),
    );

    let setup: Vec<_> = doc
        .sources_where(CellFilter::all().with_tag("setup"))
        .collect();
    assert_eq!(setup, vec!["import pandas", "notes"]);

    let setup_code: Vec<_> = doc
        .sources_where(CellFilter::kind(CellKind::Code).with_tag("setup"))
        .collect();
    assert_eq!(setup_code, vec!["import pandas"]);

    assert_eq!(doc.sources_where(CellFilter::all().with_tag("Setup")).count(), 0);
}

#[test]
fn iterating_twice_gives_same_cells() {
    let doc = resolve(&two_cell_notebook().build());
    let first: Vec<_> = doc.sources().collect();
    let second: Vec<_> = doc.sources().collect();
    assert_eq!(first, second);
}

#[test]
fn empty_notebook() {
    let doc = resolve(&NotebookBuilder::new().build());
    assert_eq!(doc.cells().count(), 0);
    assert_eq!(doc.language_version(), (None, None));
    assert!(doc.validate().is_ok());
}

#[test]
fn language_from_kernelspec_only() {
    let doc = resolve(
        &NotebookBuilder::new()
            .metadata(
                "kernelspec",
                json!({"display_name": "R", "language": "R", "name": "ir"}),
            )
            .build(),
    );
    assert_eq!(doc.language_version(), (Some("R"), None));
    assert_eq!(doc.language(), Some("R"));
}

#[test]
fn validation_reports_every_problem() {
    let text = NotebookBuilder::new()
        .cell(json!({"cell_type": "code", "metadata": {}, "source": "x"}))
        .cell(json!({"cell_type": "heading", "metadata": {}, "source": "y"}))
        .build();
    let doc = resolve(&text);
    let err = doc.validate().unwrap_err();

    let locations: Vec<_> = err
        .violations()
        .iter()
        .map(|v| v.location.as_str())
        .collect();
    assert_eq!(
        locations,
        vec![
            "cells[0].execution_count",
            "cells[0].outputs",
            "cells[1].cell_type",
        ]
    );
    // validate never modifies the document
    assert_eq!(doc.sources().collect::<Vec<_>>(), vec!["x", "y"]);
}

#[test]
fn content_round_trips_unicode() {
    let doc = resolve(&NotebookBuilder::new().markdown("naïve café ☕").build());
    let content = doc.content().unwrap();
    assert!(content.contains("naïve café ☕"));
    assert_eq!(resolve(&content).content().unwrap(), content);
}
