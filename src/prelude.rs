//! Prelude module for convenient imports.
//!
//! # Usage
//!
//! ```rust
//! use snmp_mibmap::prelude::*;
//! ```
//!
//! This imports:
//! - The shared facade: [`MibStore`]
//! - Components: [`OidRegistry`], [`ModuleParser`], [`ModuleLoader`], [`TreeBuilder`]
//! - Tree types: [`TreeNode`], [`NodeKind`]
//! - Error handling: [`Error`], [`Result`]

pub use crate::error::{Error, Result};
pub use crate::loader::ModuleLoader;
pub use crate::parser::ModuleParser;
pub use crate::registry::OidRegistry;
pub use crate::store::MibStore;
pub use crate::tree::{NodeKind, TreeBuilder, TreeNode};
