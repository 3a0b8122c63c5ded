//! Resolution of records, UUIDs, files and text into documents.
//!
//! These tests go through the file system: a throwaway cache directory is
//! populated and read back the way the gallery's cache would be.

use nbg_config::ConfigError;
use nbg_notebook::formats::JupyterNotebook;
use nbg_notebook::{
    CellKind, NotebookError, NotebookResolver, NotebookSource, UnsupportedFormatError,
};
use nbg_test_utils::{two_cell_notebook, NotebookBuilder, TempCache, TestRecord};
use pretty_assertions::assert_eq;
use std::path::PathBuf;

#[test]
fn cache_path_layout() {
    let resolver = NotebookResolver::new(Some(PathBuf::from("/cache")));
    assert_eq!(
        resolver.cache_path("abc-123", "jupyter").unwrap(),
        PathBuf::from("/cache/abc-123.ipynb")
    );
}

#[test]
fn record_resolves_from_cache() {
    let cache = TempCache::new();
    let record = cache.insert(&two_cell_notebook().build());

    let doc = cache.resolver().from_record(&record).unwrap();
    assert_eq!(doc.notebook_type(), "jupyter");
    assert_eq!(doc.sources().collect::<Vec<_>>(), vec!["print(1)", "# Title"]);
}

#[test]
fn uuid_resolves_from_cache() {
    let cache = TempCache::new();
    cache.write("abc-123", "jupyter", &NotebookBuilder::new().raw("r").build());

    let doc = cache.resolver().from_uuid("abc-123", "jupyter").unwrap();
    let kinds: Vec<_> = doc.cells().map(|c| c.kind).collect();
    assert_eq!(kinds, vec![CellKind::Other]);
}

#[test]
fn resolver_from_config() {
    let cache = TempCache::new();
    let record = cache.insert(&NotebookBuilder::python().code("x = 1").build());

    let resolver = NotebookResolver::from_config(&cache.config());
    let doc = resolver.resolve(&NotebookSource::record(&record)).unwrap();
    assert_eq!(doc.language(), Some("python"));
}

#[test]
fn missing_cache_dir_fails_before_io() {
    let resolver = NotebookResolver::new(None);
    let err = resolver.from_record(&TestRecord::new("abc-123")).unwrap_err();
    assert!(matches!(err, NotebookError::Config(ConfigError::MissingCacheDir)));
    assert!(err
        .to_string()
        .ends_with("notebook_cache_dir must be set in config"));
}

#[test]
fn uncached_record_is_io_error() {
    let cache = TempCache::new();
    let record = TestRecord::random();
    let err = cache.resolver().from_record(&record).unwrap_err();

    match err {
        NotebookError::Io { path, .. } => {
            assert_eq!(path, cache.path().join(format!("{}.ipynb", record.uuid)));
        }
        other => panic!("expected io error, got {other:?}"),
    }
}

#[test]
fn unknown_type_for_uuid() {
    let cache = TempCache::new();
    let err = cache.resolver().from_uuid("abc-123", "rmarkdown").unwrap_err();
    assert!(matches!(
        err,
        NotebookError::UnsupportedFormat(UnsupportedFormatError::UnknownType(ref t)) if t == "rmarkdown"
    ));
}

#[test]
fn file_type_inferred_from_extension() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("analysis.ipynb");
    std::fs::write(&path, two_cell_notebook().build()).unwrap();

    let doc = NotebookResolver::default().from_file(&path, None).unwrap();
    assert_eq!(doc.code_sources().collect::<Vec<_>>(), vec!["print(1)"]);
}

#[test]
fn file_type_given_explicitly() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("analysis.json");
    std::fs::write(&path, two_cell_notebook().build()).unwrap();

    let resolver = NotebookResolver::default();
    let doc = resolver.from_file(&path, Some("jupyter")).unwrap();
    assert_eq!(doc.cells().count(), 2);

    let err = resolver.from_file(&path, None).unwrap_err();
    assert!(matches!(
        err,
        NotebookError::UnsupportedFormat(UnsupportedFormatError::UnknownExtension(ref e)) if e == "json"
    ));
}

#[test]
fn unknown_extension() {
    let err = NotebookResolver::default()
        .from_file("foo.xyz", None)
        .unwrap_err();
    assert!(matches!(
        err,
        NotebookError::UnsupportedFormat(UnsupportedFormatError::UnknownExtension(ref e)) if e == "xyz"
    ));
}

#[test]
fn extension_match_is_case_sensitive() {
    let err = NotebookResolver::default()
        .from_file("foo.IPYNB", None)
        .unwrap_err();
    assert!(matches!(err, NotebookError::UnsupportedFormat(_)));
}

#[test]
fn malformed_cache_file_is_parse_error() {
    let cache = TempCache::new();
    cache.write("broken", "jupyter", "{\"cells\": ");
    let err = cache.resolver().from_uuid("broken", "jupyter").unwrap_err();
    assert!(matches!(err, NotebookError::Parse(_)));
}

#[test]
fn downcast_to_jupyter() {
    let doc = NotebookResolver::default()
        .from_string(&two_cell_notebook().build(), "jupyter")
        .unwrap();
    let jupyter = doc.as_any().downcast_ref::<JupyterNotebook>().unwrap();
    assert_eq!(jupyter.version(), (4, 4));
    assert_eq!(jupyter.jupyter_cells()[0].execution_count(), Some(1));
}
