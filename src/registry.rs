//! Bidirectional OID <-> name registry.
//!
//! The registry is the single source of truth for every other component: the
//! module parser writes into it, and name resolution and tree construction read
//! from it.
//!
//! # Registration policy
//!
//! Registration is insert-if-absent on both sides. The first pair to claim an OID
//! or a name keeps it; any later pair that collides on either side is discarded
//! without error. Collisions are routine while the parser iterates over a module,
//! so [`OidRegistry::register`] only reports whether anything was inserted.
//!
//! # Example
//!
//! ```rust
//! use snmp_mibmap::OidRegistry;
//!
//! let mut registry = OidRegistry::new();
//! registry.register("1.3.6.1.2.1.2.2.1.2", "ifDescr");
//!
//! assert_eq!(registry.resolve_name("1.3.6.1.2.1.1.3.0"), "sysUpTime.0");
//! assert_eq!(registry.resolve_name("1.3.6.1.2.1.2.2.1.2.5"), "ifDescr.5");
//! assert_eq!(registry.resolve_oid("ifDescr"), "1.3.6.1.2.1.2.2.1.2");
//! assert_eq!(registry.resolve_name("9.9.9.9"), "9.9.9.9");
//! ```

use std::collections::HashMap;

use crate::oid;

/// Entries every registry starts with.
static BOOTSTRAP: &[(&str, &str)] = &[
    // Canonical roots
    (oid::INTERNET, "internet"),
    (oid::MGMT, "mgmt"),
    (oid::MIB_2, "mib-2"),
    (oid::PRIVATE, "private"),
    (oid::ENTERPRISES, "enterprises"),
    // SNMPv2-MIB::system
    (oid::SYSTEM, "system"),
    ("1.3.6.1.2.1.1.1", "sysDescr"),
    ("1.3.6.1.2.1.1.2", "sysObjectID"),
    ("1.3.6.1.2.1.1.3", "sysUpTime"),
    ("1.3.6.1.2.1.1.4", "sysContact"),
    ("1.3.6.1.2.1.1.5", "sysName"),
    ("1.3.6.1.2.1.1.6", "sysLocation"),
    ("1.3.6.1.2.1.1.7", "sysServices"),
];

/// Bidirectional store of `oid <-> name` pairs.
#[derive(Debug, Clone)]
pub struct OidRegistry {
    /// oid -> name
    names: HashMap<String, String>,
    /// name -> oid
    oids: HashMap<String, String>,
}

impl OidRegistry {
    /// Create a registry seeded with the standard roots and system group.
    pub fn new() -> Self {
        let mut registry = Self::empty();
        for (oid, name) in BOOTSTRAP {
            registry.register(*oid, *name);
        }
        registry
    }

    /// Create a registry with no entries at all.
    pub fn empty() -> Self {
        Self {
            names: HashMap::new(),
            oids: HashMap::new(),
        }
    }

    /// Register a pair if neither the OID nor the name is known yet.
    ///
    /// Returns `true` if the pair was inserted.
    pub fn register(&mut self, oid: impl Into<String>, name: impl Into<String>) -> bool {
        let oid = oid.into();
        let name = name.into();
        if self.names.contains_key(&oid) || self.oids.contains_key(&name) {
            return false;
        }
        tracing::trace!(mib.oid = %oid, mib.name = %name, "registered");
        self.names.insert(oid.clone(), name.clone());
        self.oids.insert(name, oid);
        true
    }

    /// Resolve an OID to the best-known symbolic name.
    ///
    /// Tries, in order: an exact match, a registered stem plus a `.0` instance
    /// suffix, and the deepest registered ancestor with the unmatched arcs
    /// appended. Unknown OIDs are returned unchanged.
    pub fn resolve_name(&self, oid: &str) -> String {
        if let Some(name) = self.names.get(oid) {
            return name.clone();
        }

        if let Some(name) = oid.strip_suffix(".0").and_then(|stem| self.names.get(stem)) {
            return format!("{}.0", name);
        }

        // Ancestors come deepest first, so the first hit is the longest match.
        for (ancestor, suffix) in oid::ancestors(oid) {
            if let Some(name) = self.names.get(ancestor) {
                return format!("{}{}", name, suffix);
            }
        }

        oid.to_string()
    }

    /// Resolve a name to its OID, or return the name unchanged if unknown.
    pub fn resolve_oid(&self, name: &str) -> String {
        self.oids
            .get(name)
            .cloned()
            .unwrap_or_else(|| name.to_string())
    }

    /// Exact OID lookup.
    pub fn lookup_name(&self, oid: &str) -> Option<&str> {
        self.names.get(oid).map(String::as_str)
    }

    /// Exact name lookup.
    pub fn lookup_oid(&self, name: &str) -> Option<&str> {
        self.oids.get(name).map(String::as_str)
    }

    /// Check whether an OID is registered.
    pub fn contains_oid(&self, oid: &str) -> bool {
        self.names.contains_key(oid)
    }

    /// Check whether a name is registered.
    pub fn contains_name(&self, name: &str) -> bool {
        self.oids.contains_key(name)
    }

    /// Number of registered pairs.
    pub fn len(&self) -> usize {
        self.names.len()
    }

    /// Check if the registry has no entries.
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Iterate over all `(oid, name)` pairs in unspecified order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.names.iter().map(|(o, n)| (o.as_str(), n.as_str()))
    }
}

impl Default for OidRegistry {
    fn default() -> Self {
        Self::new()
    }
}
