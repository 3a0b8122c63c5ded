//! Property tests over generated notebooks.

use nbg_notebook::{CellFilter, CellKind, NotebookDocument, NotebookResolver};
use nbg_test_utils::NotebookBuilder;
use proptest::prelude::*;

#[derive(Debug, Clone)]
enum GenCell {
    Code { source: String, executed: bool },
    Markdown(String),
    Raw(String),
}

fn source_strategy() -> impl Strategy<Value = String> {
    prop_oneof![
        Just(String::new()),
        "[a-z =()\n]{1,40}",
        "[\\PC\n]{0,20}",
    ]
}

fn cell_strategy() -> impl Strategy<Value = GenCell> {
    prop_oneof![
        (source_strategy(), any::<bool>())
            .prop_map(|(source, executed)| GenCell::Code { source, executed }),
        source_strategy().prop_map(GenCell::Markdown),
        source_strategy().prop_map(GenCell::Raw),
    ]
}

fn build(cells: &[GenCell]) -> String {
    cells
        .iter()
        .enumerate()
        .fold(NotebookBuilder::python(), |nb, (i, cell)| match cell {
            GenCell::Code {
                source,
                executed: true,
            } => nb.executed_code(source, i as u64 + 1, "out\n"),
            GenCell::Code { source, .. } => nb.code(source),
            GenCell::Markdown(source) => nb.markdown(source),
            GenCell::Raw(source) => nb.raw(source),
        })
        .build()
}

fn source_of(cell: &GenCell) -> &str {
    match cell {
        GenCell::Code { source, .. } | GenCell::Markdown(source) | GenCell::Raw(source) => source,
    }
}

fn resolve(text: &str) -> Box<dyn NotebookDocument> {
    NotebookResolver::default().from_string(text, "jupyter").unwrap()
}

proptest! {
    #[test]
    fn prop_content_is_fixed_point(cells in proptest::collection::vec(cell_strategy(), 0..8)) {
        let first = resolve(&build(&cells)).content().unwrap();
        let second = resolve(&first).content().unwrap();
        prop_assert_eq!(first, second);
    }

    #[test]
    fn prop_clean_is_idempotent(cells in proptest::collection::vec(cell_strategy(), 0..8)) {
        let mut doc = resolve(&build(&cells));
        let once = doc.clean().content().unwrap();
        let mut reparsed = resolve(&once);
        let twice = reparsed.clean().content().unwrap();
        prop_assert_eq!(once, twice);
    }

    #[test]
    fn prop_sources_preserve_order(cells in proptest::collection::vec(cell_strategy(), 0..8)) {
        let mut doc = resolve(&build(&cells));
        let expected: Vec<&str> = cells.iter().map(source_of).collect();

        prop_assert_eq!(doc.sources().collect::<Vec<_>>(), expected.clone());
        prop_assert_eq!(doc.cells().map(|c| c.source).collect::<Vec<_>>(), expected.clone());
        doc.clean();
        prop_assert_eq!(doc.sources().collect::<Vec<_>>(), expected);
    }

    #[test]
    fn prop_kinds_partition_cells(cells in proptest::collection::vec(cell_strategy(), 0..8)) {
        let doc = resolve(&build(&cells));
        let code = doc.code_sources().count();
        let docs = doc.doc_sources().count();
        let other = doc.sources_where(CellFilter::kind(CellKind::Other)).count();

        prop_assert_eq!(code + docs + other, cells.len());
        let expected_code = cells.iter().filter(|c| matches!(c, GenCell::Code { .. })).count();
        prop_assert_eq!(code, expected_code);
    }

    #[test]
    fn prop_cleaned_documents_validate(cells in proptest::collection::vec(cell_strategy(), 0..8)) {
        let mut doc = resolve(&build(&cells));
        doc.clean();
        prop_assert!(doc.validate().is_ok());
    }
}
