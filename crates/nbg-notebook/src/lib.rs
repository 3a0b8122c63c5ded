//! nbgallery notebook documents
//!
//! Read access to the notebooks a gallery keeps in its cache directory,
//! independent of the format each one is stored in.
//!
//! # Core Operations
//!
//! - **Resolve**: turn a record, UUID, file or text into a `NotebookDocument`
//! - **Inspect**: iterate cells and sources, read metadata and language
//! - **Validate**: check a document against its format's schema
//! - **Clean**: strip outputs and volatile metadata, then write `content()`
//!
//! # Architecture
//!
//! ```text
//! NotebookRecord / UUID → CacheLocator → File → FormatRegistry → NotebookDocument
//!                                                     ↑
//!                                              JupyterFormat (.ipynb)
//! ```
//!
//! # Example
//!
//! ```rust,ignore
//! use nbg_notebook::NotebookResolver;
//!
//! let resolver = NotebookResolver::new(Some("/var/cache/nbgallery".into()));
//! let mut doc = resolver.from_uuid("abc-123", "jupyter")?;
//!
//! for source in doc.code_sources() {
//!     println!("{source}");
//! }
//!
//! let cleaned = doc.clean().content()?;
//! ```

#![warn(missing_docs)]
#![warn(unreachable_pub)]

// Core modules
pub mod document;
pub mod error;
pub mod formats;
pub mod locator;
pub mod resolver;

// Re-exports for convenience
pub use document::{Cell, CellFilter, CellKind, NotebookDocument};
pub use error::{
    NotebookError, NotebookResult, ParseError, RegistryError, SerializeError,
    UnsupportedFormatError, ValidationError, Violation,
};
pub use formats::{default_formats, FormatRegistry, NotebookFormat, DEFAULT_NOTEBOOK_TYPE};
pub use locator::CacheLocator;
pub use resolver::{NotebookRecord, NotebookResolver, NotebookSource};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Prelude module for common imports
pub mod prelude {
    //! Common imports for working with gallery notebooks
    pub use crate::document::{Cell, CellFilter, CellKind, NotebookDocument};
    pub use crate::error::{NotebookError, NotebookResult};
    pub use crate::formats::{FormatRegistry, JupyterNotebook, NotebookFormat};
    pub use crate::resolver::{NotebookRecord, NotebookResolver, NotebookSource};
    pub use nbg_config::GalleryConfig;
}
