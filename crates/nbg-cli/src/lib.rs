//! `nbg` - command-line access to nbgallery notebooks
//!
//! Resolves a notebook by file path or cache UUID and prints its sources,
//! a summary, validation results or a cleaned copy.

#![warn(missing_docs)]
#![warn(unreachable_pub)]

pub mod cli;
pub mod commands;
pub mod logging;

use anyhow::{bail, Context as _};
use clap::ArgMatches;
use nbg_config::{ConfigError, GalleryConfig};
use nbg_notebook::{NotebookDocument, NotebookResolver, NotebookResult, DEFAULT_NOTEBOOK_TYPE};
use std::fmt;
use std::io::Write;
use std::path::{Path, PathBuf};

/// Exit status for configuration problems
pub const EXIT_CONFIG: i32 = 2;

/// Exit status for every other failure
pub const EXIT_FAILURE: i32 = 1;

/// What a TARGET argument names
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Target {
    /// Notebook file
    File(PathBuf),
    /// Cached notebook UUID
    Uuid(String),
}

impl Target {
    /// A path if it names an existing file, otherwise a UUID
    #[must_use]
    pub fn parse(arg: &str) -> Self {
        let path = Path::new(arg);
        if path.is_file() {
            Self::File(path.to_path_buf())
        } else {
            Self::Uuid(arg.to_string())
        }
    }
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::File(path) => write!(f, "{}", path.display()),
            Self::Uuid(uuid) => write!(f, "notebook {uuid}"),
        }
    }
}

/// Resolver plus the options every subcommand shares
#[derive(Debug, Clone)]
pub struct Session {
    resolver: NotebookResolver,
    notebook_type: Option<String>,
}

impl Session {
    /// Build from global options
    ///
    /// `cache_dir` overrides the config file's cache directory.
    ///
    /// # Errors
    /// `ConfigError` if the config file can't be loaded
    pub fn new(
        config: Option<&Path>,
        cache_dir: Option<PathBuf>,
        notebook_type: Option<String>,
    ) -> Result<Self, ConfigError> {
        let mut gallery = match config {
            Some(path) => GalleryConfig::load(path)?,
            None => GalleryConfig::new(),
        };
        if let Some(dir) = cache_dir {
            gallery = gallery.with_cache_dir(dir);
        }
        Ok(Self {
            resolver: NotebookResolver::from_config(&gallery),
            notebook_type,
        })
    }

    /// Resolver in use
    #[must_use]
    pub fn resolver(&self) -> &NotebookResolver {
        &self.resolver
    }

    /// Type tag for UUID lookups
    #[must_use]
    pub fn notebook_type(&self) -> &str {
        self.notebook_type.as_deref().unwrap_or(DEFAULT_NOTEBOOK_TYPE)
    }

    /// Resolve a target
    pub fn open(&self, target: &Target) -> NotebookResult<Box<dyn NotebookDocument>> {
        match target {
            Target::File(path) => self.resolver.from_file(path, self.notebook_type.as_deref()),
            Target::Uuid(uuid) => self.resolver.from_uuid(uuid, self.notebook_type()),
        }
    }
}

/// Run the parsed command, writing results to `out`
///
/// Returns the process exit status.
pub fn run(matches: &ArgMatches, out: &mut dyn Write) -> anyhow::Result<i32> {
    let session = Session::new(
        matches.get_one::<PathBuf>("config").map(PathBuf::as_path),
        matches.get_one::<PathBuf>("cache-dir").cloned(),
        matches.get_one::<String>("type").cloned(),
    )?;

    let Some((name, args)) = matches.subcommand() else {
        bail!("no subcommand given");
    };
    tracing::debug!("Running nbg {}", name);

    if name == "path" {
        let uuid = required(args, "uuid")?;
        commands::path(&session, uuid, out)?;
        return Ok(0);
    }

    let target = Target::parse(required(args, "target")?);
    let mut doc = session
        .open(&target)
        .with_context(|| format!("cannot open {target}"))?;

    match name {
        "sources" => {
            let selection = commands::Selection {
                code: args.get_flag("code"),
                docs: args.get_flag("docs"),
                tag: args.get_one::<String>("tag").cloned(),
            };
            commands::sources(doc.as_ref(), &selection, out)?;
        }
        "info" => commands::info(doc.as_ref(), args.get_flag("json"), out)?,
        "validate" => {
            if !commands::validate(doc.as_ref(), out)? {
                return Ok(EXIT_FAILURE);
            }
        }
        "clean" => {
            commands::clean(doc.as_mut(), args.get_one::<PathBuf>("output"), out)?;
        }
        other => bail!("unknown subcommand '{other}'"),
    }
    Ok(0)
}

fn required<'a>(args: &'a ArgMatches, id: &str) -> anyhow::Result<&'a str> {
    args.get_one::<String>(id)
        .map(String::as_str)
        .with_context(|| format!("missing argument {id}"))
}

/// Exit status for a failed run
#[must_use]
pub fn exit_code(err: &anyhow::Error) -> i32 {
    if err.chain().any(|cause| cause.is::<ConfigError>()) {
        EXIT_CONFIG
    } else {
        EXIT_FAILURE
    }
}
