//! Dotted-decimal OID helpers.
//!
//! OIDs are kept in their canonical string form (`1.3.6.1.2.1.1.3`) throughout
//! the crate. These helpers provide the few structural operations the registry,
//! parser and tree builder need, all of which respect arc boundaries: `1.3.6.1.2`
//! is an ancestor of `1.3.6.1.2.1` but not of `1.3.6.1.20`.

use crate::error::{Error, OidErrorKind, Result};

/// `iso.org.dod.internet`
pub const INTERNET: &str = "1.3.6.1";
/// `internet.mgmt`, root of the standard management subtree.
pub const MGMT: &str = "1.3.6.1.2";
/// `mgmt.mib-2`
pub const MIB_2: &str = "1.3.6.1.2.1";
/// `mib-2.system`
pub const SYSTEM: &str = "1.3.6.1.2.1.1";
/// `internet.private`
pub const PRIVATE: &str = "1.3.6.1.4";
/// `private.enterprises`, root of the vendor subtree.
pub const ENTERPRISES: &str = "1.3.6.1.4.1";

/// Parse a dotted OID into its arcs.
///
/// Rejects empty input, empty arcs (`1..3`, trailing dots) and anything that is
/// not a `u32`.
pub fn parse_arcs(s: &str) -> Result<Vec<u32>> {
    if s.is_empty() {
        return Err(Error::invalid_oid(OidErrorKind::Empty));
    }
    s.split('.')
        .map(|arc| {
            if arc.is_empty() || !arc.bytes().all(|b| b.is_ascii_digit()) {
                return Err(Error::invalid_oid_with_input(OidErrorKind::InvalidArc, s));
            }
            arc.parse::<u32>()
                .map_err(|_| Error::invalid_oid_with_input(OidErrorKind::InvalidArc, s))
        })
        .collect()
}

/// Append one arc to a parent OID.
pub fn child(parent: &str, arc: u32) -> String {
    let mut out = String::with_capacity(parent.len() + 11);
    out.push_str(parent);
    out.push('.');
    out.push_str(&arc.to_string());
    out
}

/// Check if `prefix` equals `oid` or is an ancestor of it on an arc boundary.
pub fn is_prefix_of(prefix: &str, oid: &str) -> bool {
    match oid.strip_prefix(prefix) {
        Some(rest) => rest.is_empty() || rest.starts_with('.'),
        None => false,
    }
}

/// Return the arcs of `oid` below `prefix`, without the leading dot.
///
/// Returns `None` unless `oid` lies strictly below `prefix`.
pub fn relative_to<'a>(oid: &'a str, prefix: &str) -> Option<&'a str> {
    oid.strip_prefix(prefix)?
        .strip_prefix('.')
        .filter(|rest| !rest.is_empty())
}

/// Iterate over the proper ancestors of `oid`, deepest first.
///
/// `1.3.6` yields `1.3` then `1`. Each item is paired with the remaining suffix,
/// including its leading dot.
pub fn ancestors(oid: &str) -> impl Iterator<Item = (&str, &str)> {
    oid.rmatch_indices('.').map(move |(idx, _)| (&oid[..idx], &oid[idx..]))
}
