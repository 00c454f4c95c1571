//! Best-effort bulk loading of MIB module directories.
//!
//! A directory tree is walked recursively and every file with a module extension
//! (`.mib` or `.txt` by default, case-insensitive) is fed to the
//! [`ModuleParser`]. Loading never fails as a whole: a walk error or an
//! unreadable file is logged, counted in [`LoadSummary::failed`], and skipped.
//!
//! # File order
//!
//! Files are processed in directory enumeration order, which depends on the
//! platform and filesystem. Because registration is first-wins, two modules
//! that define the same name differently can resolve differently from one run
//! to the next. This is deliberate; callers that need a canonical result should
//! load conflicting modules one at a time with [`ModuleLoader::load_file`].

use std::ffi::OsStr;
use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use crate::error::{Error, Result};
use crate::parser::{ModuleParser, ParseReport, ParserConfig};
use crate::registry::OidRegistry;

/// Default module file extensions.
pub const DEFAULT_EXTENSIONS: &[&str] = &["mib", "txt"];

/// Totals for one directory load.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoadSummary {
    /// Files parsed successfully (including ones that registered nothing).
    pub files: usize,
    /// Files or directory entries that could not be read.
    pub failed: usize,
    /// New registry entries across all files.
    pub registered: usize,
}

/// Walks directories and loads module files into a registry.
#[derive(Debug, Clone)]
pub struct ModuleLoader {
    parser: ModuleParser,
    extensions: Vec<String>,
    follow_links: bool,
}

impl ModuleLoader {
    /// Create a loader with default extensions and parser settings.
    pub fn new() -> Self {
        Self {
            parser: ModuleParser::new(),
            extensions: DEFAULT_EXTENSIONS.iter().map(|e| e.to_string()).collect(),
            follow_links: false,
        }
    }

    /// Replace the accepted file extensions (without the leading dot).
    pub fn extensions<I, S>(mut self, extensions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.extensions = extensions
            .into_iter()
            .map(|e| e.into().to_ascii_lowercase())
            .collect();
        self
    }

    /// Follow symbolic links while walking.
    pub fn follow_links(mut self, follow: bool) -> Self {
        self.follow_links = follow;
        self
    }

    /// Set the parser configuration.
    pub fn parser_config(mut self, config: ParserConfig) -> Self {
        self.parser = ModuleParser::with_config(config);
        self
    }

    /// Get the parser used for each file.
    pub fn parser(&self) -> &ModuleParser {
        &self.parser
    }

    /// Check whether a path has one of the accepted extensions.
    pub fn accepts(&self, path: &Path) -> bool {
        path.extension()
            .and_then(OsStr::to_str)
            .map(|ext| {
                let ext = ext.to_ascii_lowercase();
                self.extensions.iter().any(|e| *e == ext)
            })
            .unwrap_or(false)
    }

    /// Collect module files under `dir` in enumeration order.
    ///
    /// Entries that cannot be read are reported as errors alongside the paths.
    pub fn discover(&self, dir: &Path) -> Vec<Result<PathBuf>> {
        WalkDir::new(dir)
            .follow_links(self.follow_links)
            .into_iter()
            .filter_map(|entry| match entry {
                Ok(entry) if entry.file_type().is_file() && self.accepts(entry.path()) => {
                    Some(Ok(entry.into_path()))
                }
                Ok(_) => None,
                Err(e) => Some(Err(Error::walk(e))),
            })
            .collect()
    }

    /// Parse one module file into the registry.
    pub fn load_file(&self, path: &Path, registry: &mut OidRegistry) -> Result<ParseReport> {
        self.parser.parse_file(path, registry)
    }

    /// Load every module file under `dir`.
    ///
    /// Never fails; per-file problems are logged and counted.
    pub fn load_modules(&self, dir: &Path, registry: &mut OidRegistry) -> LoadSummary {
        let mut summary = LoadSummary::default();

        tracing::debug!(mib.dir = %dir.display(), "loading module directory");

        for found in self.discover(dir) {
            let result = found.and_then(|path| {
                let report = self.load_file(&path, registry);
                if let Ok(report) = &report {
                    tracing::debug!(
                        mib.path = %path.display(),
                        mib.registered = report.registered,
                        "loaded module file"
                    );
                }
                report
            });

            match result {
                Ok(report) => {
                    summary.files += 1;
                    summary.registered += report.registered;
                }
                Err(e) => {
                    tracing::warn!(error = %e, "skipping module file");
                    summary.failed += 1;
                }
            }
        }

        tracing::debug!(
            mib.dir = %dir.display(),
            mib.files = summary.files,
            mib.failed = summary.failed,
            mib.registered = summary.registered,
            "module directory loaded"
        );

        summary
    }
}

impl Default for ModuleLoader {
    fn default() -> Self {
        Self::new()
    }
}

/// Load every module file under `dir` with default settings.
pub fn load_modules(dir: impl AsRef<Path>, registry: &mut OidRegistry) -> LoadSummary {
    ModuleLoader::new().load_modules(dir.as_ref(), registry)
}
