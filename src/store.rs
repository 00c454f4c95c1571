//! Thread-safe facade over the registry.
//!
//! [`MibStore`] is what an application holds on to: it owns one
//! [`OidRegistry`] behind a read-write lock and exposes module loading, name
//! resolution and tree construction.
//!
//! Loads take the write lock for their whole duration, so concurrent readers see
//! either the registry before a load or after it, never a partially loaded
//! module. Resolution and tree building only take the read lock and run
//! concurrently with each other.
//!
//! # Example
//!
//! ```rust
//! use snmp_mibmap::MibStore;
//!
//! let store = MibStore::new();
//! store.load_module_text("acmeMIB OBJECT IDENTIFIER ::= { enterprises 9999 }");
//!
//! assert_eq!(store.resolve_oid("acmeMIB"), "1.3.6.1.4.1.9999");
//! assert_eq!(store.resolve_name("1.3.6.1.4.1.9999.1.2"), "acmeMIB.1.2");
//! ```

use std::path::Path;

use parking_lot::RwLock;

use crate::error::Result;
use crate::loader::{LoadSummary, ModuleLoader};
use crate::parser::ParseReport;
use crate::registry::OidRegistry;
use crate::tree::{TreeBuilder, TreeNode};

/// Shared registry with serialized loads and concurrent reads.
#[derive(Debug, Default)]
pub struct MibStore {
    registry: RwLock<OidRegistry>,
    loader: ModuleLoader,
}

impl MibStore {
    /// Create a store with a bootstrapped registry and default loader.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store around an existing registry and loader.
    pub fn with_loader(registry: OidRegistry, loader: ModuleLoader) -> Self {
        Self {
            registry: RwLock::new(registry),
            loader,
        }
    }

    /// Load every module file under `dir`.
    ///
    /// Never fails; see [`ModuleLoader::load_modules`].
    pub fn load_modules(&self, dir: impl AsRef<Path>) -> LoadSummary {
        let mut registry = self.registry.write();
        self.loader.load_modules(dir.as_ref(), &mut registry)
    }

    /// Load a single module file.
    pub fn load_file(&self, path: impl AsRef<Path>) -> Result<ParseReport> {
        let mut registry = self.registry.write();
        self.loader.load_file(path.as_ref(), &mut registry)
    }

    /// Parse module text that did not come from a file.
    pub fn load_module_text(&self, text: &str) -> ParseReport {
        let mut registry = self.registry.write();
        self.loader.parser().parse(text, &mut registry)
    }

    /// Register a single pair; see [`OidRegistry::register`].
    pub fn register(&self, oid: impl Into<String>, name: impl Into<String>) -> bool {
        self.registry.write().register(oid, name)
    }

    /// Resolve an OID to its best-known name.
    pub fn resolve_name(&self, oid: &str) -> String {
        self.registry.read().resolve_name(oid)
    }

    /// Resolve a name to its OID.
    pub fn resolve_oid(&self, name: &str) -> String {
        self.registry.read().resolve_oid(name)
    }

    /// Build the presentation tree with an empty custom tables branch.
    pub fn build_tree(&self) -> TreeNode {
        self.build_tree_with(&TreeBuilder::new())
    }

    /// Build the presentation tree with a configured builder.
    pub fn build_tree_with(&self, builder: &TreeBuilder) -> TreeNode {
        builder.build(&self.registry.read())
    }

    /// Number of registered pairs.
    pub fn len(&self) -> usize {
        self.registry.read().len()
    }

    /// Check if the registry has no entries.
    pub fn is_empty(&self) -> bool {
        self.registry.read().is_empty()
    }

    /// Clone the current registry contents.
    pub fn snapshot(&self) -> OidRegistry {
        self.registry.read().clone()
    }
}
