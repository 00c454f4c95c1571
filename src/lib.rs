//! # snmp-mibmap
//!
//! Name resolution for SNMP object identifiers.
//!
//! This crate maps dotted OIDs to the symbolic names declared in MIB modules and
//! back, and presents the known OID space as a browsable tree:
//!
//! - [`OidRegistry`] - bidirectional `oid <-> name` store with longest-prefix
//!   resolution (`1.3.6.1.2.1.2.2.1.2.5` -> `ifDescr.5`)
//! - [`ModuleParser`] - scans module text for OID declarations and registers
//!   them, resolving forward references with a bounded fixpoint
//! - [`ModuleLoader`] - recursive, failure-tolerant loading of module directories
//! - [`TreeBuilder`] - rebuilds a sorted presentation tree from the registry
//! - [`MibStore`] - the above behind a read-write lock for shared use
//!
//! It does not talk to devices; pair it with an SNMP client to label the OIDs in
//! the variable bindings it returns.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use snmp_mibmap::MibStore;
//!
//! let store = MibStore::new();
//! let summary = store.load_modules("/usr/share/snmp/mibs");
//! println!("loaded {} files, {} names", summary.files, summary.registered);
//!
//! println!("{}", store.resolve_name("1.3.6.1.2.1.2.2.1.2.5")); // ifDescr.5
//! println!("{}", store.resolve_oid("sysUpTime"));              // 1.3.6.1.2.1.1.3
//!
//! let tree = store.build_tree();
//! for branch in &tree.children {
//!     println!("{} ({} nodes)", branch.name, branch.node_count());
//! }
//! ```
//!
//! # Error Handling
//!
//! Loading is best effort. Unrecognised text, unresolvable parents and duplicate
//! definitions are silently ignored, and unreadable files are logged with
//! `tracing` and skipped. [`Error`] is only returned by single-file and
//! validation APIs such as [`ModuleLoader::load_file`] and [`oid::parse_arcs`].
//!
//! # Feature Flags
//!
//! | Feature | Description |
//! |---------|-------------|
//! | `serde` | Derive `Serialize` for [`TreeNode`] and [`NodeKind`] |

#![cfg_attr(docsrs, feature(doc_cfg))]

pub mod error;
pub mod loader;
pub mod oid;
pub mod parser;
pub mod prelude;
pub mod registry;
pub mod store;
pub mod tree;

pub use error::{Error, OidErrorKind, Result};
pub use loader::{LoadSummary, ModuleLoader, load_modules};
pub use parser::{Declaration, DeclarationKind, ModuleParser, ParseReport, ParserConfig};
pub use registry::OidRegistry;
pub use store::MibStore;
pub use tree::{NodeKind, TreeBuilder, TreeNode, build_tree};
