//! MIB module scanner and fixpoint registration.
//!
//! The parser does not build a full ASN.1 syntax tree. It recognises the handful
//! of declaration shapes that assign a position in the OID tree, reduces each to
//! `(name, parent, last_id)`, and registers them into an [`OidRegistry`]:
//!
//! ```text
//! name OBJECT IDENTIFIER ::= { parent 3 }
//! name MODULE-IDENTITY   ... ::= { parent 3 }
//! name OBJECT-TYPE       ... ::= { parent 3 }
//! name OBJECT-IDENTITY   ... ::= { parent 3 }
//! name NOTIFICATION-TYPE ... ::= { parent 3 }
//! ```
//!
//! Anything else in the text is invisible to the parser, including the contents
//! of quoted strings: a `DESCRIPTION` that mentions `NOTIFICATION-TYPE` is prose,
//! not a declaration.
//!
//! # Names
//!
//! Declared names and parents must be ASN.1 value references: a lowercase
//! letter followed by letters, digits or hyphens. Vendor modules that declare
//! uppercase-initial names (`Foo OBJECT IDENTIFIER ::= { enterprises 5 }`) do
//! not conform to this, and those declarations are skipped.
//!
//! # Forward references
//!
//! Modules routinely declare children before their parents. Instead of sorting
//! declarations by dependency, registration runs as a bounded fixpoint: every
//! pass walks all declarations and registers the ones whose parent is now known,
//! stopping after a pass that makes no progress or after
//! [`ParserConfig::max_passes`] passes. Declarations whose parent never resolves
//! are left out without error.

use std::borrow::Cow;
use std::collections::HashSet;
use std::path::Path;

use once_cell::sync::Lazy;
use regex::Regex;

use crate::error::{Error, Result};
use crate::oid;
use crate::registry::OidRegistry;

/// Default cap on fixpoint passes per module.
pub const DEFAULT_MAX_PASSES: usize = 10;

// Names and parents are value references: a lowercase letter, then letters,
// digits or hyphens. Keywords such as IMPORTS or SYNTAX never match.
static ALIAS_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?:^|\s)([a-z][A-Za-z0-9-]*)\s+OBJECT\s+IDENTIFIER\s*::=\s*\{\s*([a-z][A-Za-z0-9-]*)\s+(\d+)\s*\}",
    )
    .unwrap()
});

static MACRO_HEADER_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?:^|\s)([a-z][A-Za-z0-9-]*)\s+(MODULE-IDENTITY|OBJECT-TYPE|OBJECT-IDENTITY|NOTIFICATION-TYPE)\b",
    )
    .unwrap()
});

static ASSIGNMENT_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^::=\s*\{\s*([a-z][A-Za-z0-9-]*)\s+(\d+)\s*\}").unwrap());

static MODULE_NAME_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"([A-Z][A-Za-z0-9-]*)\s+DEFINITIONS\s*::=\s*BEGIN").unwrap());

/// The declaration shape a [`Declaration`] was extracted from.
///
/// Variants are listed in scan order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum DeclarationKind {
    /// `OBJECT IDENTIFIER ::= { parent n }`
    ObjectIdentifier,
    /// `MODULE-IDENTITY`
    ModuleIdentity,
    /// `OBJECT-TYPE`
    ObjectType,
    /// `OBJECT-IDENTITY`
    ObjectIdentity,
    /// `NOTIFICATION-TYPE`
    NotificationType,
}

impl DeclarationKind {
    fn from_keyword(keyword: &str) -> Option<Self> {
        match keyword {
            "MODULE-IDENTITY" => Some(Self::ModuleIdentity),
            "OBJECT-TYPE" => Some(Self::ObjectType),
            "OBJECT-IDENTITY" => Some(Self::ObjectIdentity),
            "NOTIFICATION-TYPE" => Some(Self::NotificationType),
            _ => None,
        }
    }
}

impl std::fmt::Display for DeclarationKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::ObjectIdentifier => write!(f, "OBJECT IDENTIFIER"),
            Self::ModuleIdentity => write!(f, "MODULE-IDENTITY"),
            Self::ObjectType => write!(f, "OBJECT-TYPE"),
            Self::ObjectIdentity => write!(f, "OBJECT-IDENTITY"),
            Self::NotificationType => write!(f, "NOTIFICATION-TYPE"),
        }
    }
}

/// One OID position assignment found in module text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Declaration {
    pub kind: DeclarationKind,
    /// Name being defined.
    pub name: String,
    /// Name of the parent node.
    pub parent: String,
    /// Arc appended to the parent's OID.
    pub last_id: u32,
}

/// Parser configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParserConfig {
    /// Maximum number of fixpoint passes per module.
    pub max_passes: usize,
}

impl Default for ParserConfig {
    fn default() -> Self {
        Self {
            max_passes: DEFAULT_MAX_PASSES,
        }
    }
}

/// Outcome of parsing one module.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParseReport {
    /// Module name from the `DEFINITIONS ::= BEGIN` header, if present.
    pub module: Option<String>,
    /// Number of declarations recognised in the text.
    pub declarations: usize,
    /// Number of new registry entries.
    pub registered: usize,
    /// Number of fixpoint passes run, including the final no-progress pass.
    pub passes: usize,
    /// Names declared in the text that are still not registered.
    ///
    /// Either the parent never resolved or the computed OID was already taken.
    pub unregistered: Vec<String>,
}

/// Extracts OID declarations from module text and registers them.
#[derive(Debug, Clone, Default)]
pub struct ModuleParser {
    config: ParserConfig,
}

impl ModuleParser {
    /// Create a parser with the default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a parser with an explicit configuration.
    pub fn with_config(config: ParserConfig) -> Self {
        Self { config }
    }

    /// Set the maximum number of fixpoint passes.
    pub fn max_passes(mut self, passes: usize) -> Self {
        self.config.max_passes = passes;
        self
    }

    /// Get the parser configuration.
    pub fn config(&self) -> &ParserConfig {
        &self.config
    }

    /// Parse module text and register every resolvable declaration.
    pub fn parse(&self, text: &str, registry: &mut OidRegistry) -> ParseReport {
        let text = strip_comments(text);
        let declarations = scan_declarations(&text);

        let mut report = ParseReport {
            module: module_name(&text).map(str::to_string),
            declarations: declarations.len(),
            ..Default::default()
        };

        for pass in 1..=self.config.max_passes {
            let registered = register_pass(&declarations, registry);
            report.passes = pass;
            report.registered += registered;

            tracing::trace!(
                mib.pass = pass,
                mib.registered = registered,
                "fixpoint pass complete"
            );

            if registered == 0 {
                break;
            }
        }

        let mut seen = HashSet::new();
        report.unregistered = declarations
            .iter()
            .filter(|d| !registry.contains_name(&d.name))
            .filter(|d| seen.insert(d.name.as_str()))
            .map(|d| d.name.clone())
            .collect();

        tracing::debug!(
            mib.module = report.module.as_deref().unwrap_or("<unnamed>"),
            mib.declarations = report.declarations,
            mib.registered = report.registered,
            mib.passes = report.passes,
            mib.unregistered = report.unregistered.len(),
            "parsed module"
        );

        report
    }

    /// Read a module file and parse it.
    ///
    /// The file is decoded lossily; MIB files in the wild are often Latin-1.
    pub fn parse_file(&self, path: &Path, registry: &mut OidRegistry) -> Result<ParseReport> {
        let bytes = std::fs::read(path).map_err(|e| Error::io(path, e))?;
        let text = String::from_utf8_lossy(&bytes);
        Ok(self.parse(&text, registry))
    }
}

/// Run one registration pass, returning the number of new entries.
fn register_pass(declarations: &[Declaration], registry: &mut OidRegistry) -> usize {
    let mut registered = 0;

    for decl in declarations {
        if registry.contains_name(&decl.name) {
            continue;
        }

        let child_oid = match registry.lookup_oid(&decl.parent) {
            Some(parent_oid) => oid::child(parent_oid, decl.last_id),
            // enterprises may be missing from a registry built without bootstrap
            None if decl.parent == "enterprises" => oid::child(oid::ENTERPRISES, decl.last_id),
            None => continue,
        };

        if registry.register(child_oid, decl.name.as_str()) {
            registered += 1;
        }
    }

    registered
}

/// Extract every recognised declaration, in scan order.
///
/// Aliases come first, then each macro form in [`DeclarationKind`] order, each
/// group in textual order. Comments must already be stripped. Quoted strings
/// are skipped.
pub fn scan_declarations(text: &str) -> Vec<Declaration> {
    let masked = mask_strings(text);
    let text = masked.as_ref();
    let mut declarations = Vec::new();
    // Start offsets of every declaration; a macro's assignment must appear
    // before the next one begins.
    let mut boundaries = Vec::new();

    for caps in ALIAS_RE.captures_iter(text) {
        boundaries.push(caps.get(1).map_or(0, |m| m.start()));
        if let Ok(last_id) = caps[3].parse::<u32>() {
            declarations.push(Declaration {
                kind: DeclarationKind::ObjectIdentifier,
                name: caps[1].to_string(),
                parent: caps[2].to_string(),
                last_id,
            });
        }
    }

    let headers: Vec<_> = MACRO_HEADER_RE
        .captures_iter(text)
        .filter_map(|caps| {
            let name = caps.get(1)?;
            let keyword = caps.get(2)?;
            let kind = DeclarationKind::from_keyword(keyword.as_str())?;
            Some((kind, name.start(), name.as_str(), keyword.end()))
        })
        .collect();

    boundaries.extend(headers.iter().map(|(_, start, _, _)| *start));
    boundaries.sort_unstable();

    let mut macros = Vec::new();
    for (kind, _, name, body_start) in headers {
        let body_end = boundaries
            .iter()
            .copied()
            .find(|&b| b >= body_start)
            .unwrap_or(text.len());
        let body = &text[body_start..body_end];

        let Some(assign_at) = body.find("::=") else {
            continue;
        };
        let Some(caps) = ASSIGNMENT_RE.captures(&body[assign_at..]) else {
            continue;
        };
        let Ok(last_id) = caps[2].parse() else {
            continue;
        };

        macros.push(Declaration {
            kind,
            name: name.to_string(),
            parent: caps[1].to_string(),
            last_id,
        });
    }

    // Stable: textual order is kept within each kind.
    macros.sort_by_key(|d| d.kind);
    declarations.extend(macros);
    declarations
}

/// Module name from the `NAME DEFINITIONS ::= BEGIN` header.
fn module_name(text: &str) -> Option<&str> {
    MODULE_NAME_RE
        .captures(text)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
}

/// Blank out the contents of quoted strings, keeping byte offsets.
///
/// An unterminated string runs to the end of the text.
fn mask_strings(text: &str) -> Cow<'_, str> {
    if !text.contains('"') {
        return Cow::Borrowed(text);
    }

    let mut out = String::with_capacity(text.len());
    let mut in_string = false;
    for ch in text.chars() {
        if ch == '"' {
            in_string = !in_string;
            out.push(ch);
        } else if in_string && ch != '\n' {
            out.extend(std::iter::repeat_n(' ', ch.len_utf8()));
        } else {
            out.push(ch);
        }
    }
    Cow::Owned(out)
}

/// Remove ASN.1 comments.
///
/// A comment runs from `--` to the next `--` or the end of the line. `--` inside
/// a quoted string does not start a comment. Each comment is replaced by a single
/// space so neighbouring tokens stay separated.
pub fn strip_comments(text: &str) -> Cow<'_, str> {
    if !text.contains("--") {
        return Cow::Borrowed(text);
    }

    let bytes = text.as_bytes();
    let mut out = String::with_capacity(text.len());
    let mut in_string = false;
    let mut kept_from = 0;
    let mut i = 0;

    while i < bytes.len() {
        match bytes[i] {
            b'"' => {
                in_string = !in_string;
                i += 1;
            }
            b'-' if !in_string && bytes.get(i + 1) == Some(&b'-') => {
                out.push_str(&text[kept_from..i]);
                out.push(' ');
                i += 2;
                loop {
                    if i >= bytes.len() || bytes[i] == b'\n' {
                        break;
                    }
                    if bytes[i] == b'-' && bytes.get(i + 1) == Some(&b'-') {
                        i += 2;
                        break;
                    }
                    i += 1;
                }
                kept_from = i;
            }
            _ => i += 1,
        }
    }

    out.push_str(&text[kept_from..]);
    Cow::Owned(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    const ACME_MIB: &str = r#"
ACME-MIB DEFINITIONS ::= BEGIN

IMPORTS
    MODULE-IDENTITY, OBJECT-TYPE, Integer32, enterprises
        FROM SNMPv2-SMI;

acmeMIB MODULE-IDENTITY
    LAST-UPDATED "202401010000Z"
    ORGANIZATION "Acme"
    CONTACT-INFO "ops@acme.example"
    DESCRIPTION  "Acme widgets -- not a comment"
    ::= { enterprises 9999 }

acmeObjects OBJECT IDENTIFIER ::= { acmeMIB 1 }

acmeWidgetCount OBJECT-TYPE
    SYNTAX      Integer32
    MAX-ACCESS  read-only
    STATUS      current
    DESCRIPTION "Number of widgets."
    ::= { acmeObjects 1 }

END
"#;

    #[test]
    fn test_scan_declarations() {
        let decls = scan_declarations(ACME_MIB);
        let got: Vec<_> = decls
            .iter()
            .map(|d| (d.kind, d.name.as_str(), d.parent.as_str(), d.last_id))
            .collect();

        assert_eq!(
            got,
            vec![
                (DeclarationKind::ObjectIdentifier, "acmeObjects", "acmeMIB", 1),
                (DeclarationKind::ModuleIdentity, "acmeMIB", "enterprises", 9999),
                (DeclarationKind::ObjectType, "acmeWidgetCount", "acmeObjects", 1),
            ]
        );
    }

    #[test]
    fn test_parse_registers_module() {
        let mut registry = OidRegistry::new();
        let report = ModuleParser::new().parse(ACME_MIB, &mut registry);

        assert_eq!(report.module.as_deref(), Some("ACME-MIB"));
        assert_eq!(report.declarations, 3);
        assert_eq!(report.registered, 3);
        assert!(report.unregistered.is_empty());

        assert_eq!(registry.resolve_oid("acmeMIB"), "1.3.6.1.4.1.9999");
        assert_eq!(registry.resolve_oid("acmeObjects"), "1.3.6.1.4.1.9999.1");
        assert_eq!(registry.resolve_oid("acmeWidgetCount"), "1.3.6.1.4.1.9999.1.1");
        assert_eq!(
            registry.resolve_name("1.3.6.1.4.1.9999.1.1.0"),
            "acmeWidgetCount.0"
        );
    }

    #[test]
    fn test_forward_reference() {
        let text = "child OBJECT IDENTIFIER ::= { parent 1 }\n\
                    parent OBJECT IDENTIFIER ::= { enterprises 9999 }\n";
        let mut registry = OidRegistry::new();
        let report = ModuleParser::new().max_passes(2).parse(text, &mut registry);

        assert_eq!(registry.resolve_oid("parent"), "1.3.6.1.4.1.9999");
        assert_eq!(registry.resolve_oid("child"), "1.3.6.1.4.1.9999.1");
        assert_eq!(report.registered, 2);
        assert_eq!(report.passes, 2);
    }

    #[test]
    fn test_chained_forward_references() {
        let text = "grandchild OBJECT IDENTIFIER ::= { child 7 }\n\
                    child OBJECT IDENTIFIER ::= { parent 3 }\n\
                    parent OBJECT IDENTIFIER ::= { enterprises 42 }\n";
        let mut registry = OidRegistry::new();
        let report = ModuleParser::new().parse(text, &mut registry);

        assert_eq!(registry.resolve_oid("grandchild"), "1.3.6.1.4.1.42.3.7");
        // Three productive passes plus one that finds nothing left to do
        assert_eq!(report.passes, 4);
        assert_eq!(report.registered, 3);
    }

    #[test]
    fn test_pass_cap_leaves_deep_chain_unresolved() {
        let text = "c OBJECT IDENTIFIER ::= { b 1 }\n\
                    b OBJECT IDENTIFIER ::= { a 1 }\n\
                    a OBJECT IDENTIFIER ::= { enterprises 1 }\n";
        let mut registry = OidRegistry::new();
        let report = ModuleParser::new().max_passes(2).parse(text, &mut registry);

        assert!(registry.contains_name("a"));
        assert!(registry.contains_name("b"));
        assert!(!registry.contains_name("c"));
        assert_eq!(report.unregistered, vec!["c".to_string()]);
    }

    #[test]
    fn test_unresolvable_parent_is_silent() {
        let text = "orphan OBJECT IDENTIFIER ::= { nowhere 1 }";
        let mut registry = OidRegistry::new();
        let before = registry.len();
        let report = ModuleParser::new().parse(text, &mut registry);

        assert_eq!(registry.len(), before);
        assert_eq!(report.passes, 1);
        assert_eq!(report.unregistered, vec!["orphan".to_string()]);
        assert_eq!(registry.resolve_oid("orphan"), "orphan");
    }

    #[test]
    fn test_enterprises_special_case_on_empty_registry() {
        let text = "acme OBJECT IDENTIFIER ::= { enterprises 9999 }";
        let mut registry = OidRegistry::empty();
        ModuleParser::new().parse(text, &mut registry);

        assert_eq!(registry.resolve_oid("acme"), "1.3.6.1.4.1.9999");
        assert!(!registry.contains_name("enterprises"));
    }

    #[test]
    fn test_already_registered_name_is_skipped() {
        let mut registry = OidRegistry::new();
        registry.register("1.3.6.1.4.1.1", "acme");

        let report =
            ModuleParser::new().parse("acme OBJECT IDENTIFIER ::= { enterprises 2 }", &mut registry);

        assert_eq!(report.registered, 0);
        assert_eq!(registry.resolve_oid("acme"), "1.3.6.1.4.1.1");
    }

    #[test]
    fn test_unrecognised_text_registers_nothing() {
        let mut registry = OidRegistry::new();
        let before = registry.len();
        let report = ModuleParser::new().parse(
            "this is { not a module } ::= at all\n\u{0}\u{7f} OBJECT-TYPE ::=",
            &mut registry,
        );

        assert_eq!(report.declarations, 0);
        assert_eq!(report.registered, 0);
        assert_eq!(registry.len(), before);
    }

    #[test]
    fn test_uppercase_names_are_not_declarations() {
        let text = "IMPORTS OBJECT-TYPE FROM SNMPv2-SMI;\n\
                    Foo OBJECT IDENTIFIER ::= { enterprises 5 }\n";
        assert!(scan_declarations(text).is_empty());
    }

    #[test]
    fn test_macro_without_assignment_does_not_borrow_next() {
        let text = "broken OBJECT-TYPE\n    SYNTAX Integer32\n\n\
                    good OBJECT-TYPE\n    SYNTAX Integer32\n    ::= { enterprises 3 }\n";
        let decls = scan_declarations(text);

        assert_eq!(decls.len(), 1);
        assert_eq!(decls[0].name, "good");
        assert_eq!(decls[0].last_id, 3);
    }

    #[test]
    fn test_multi_component_value_is_ignored() {
        let text = "internet2 OBJECT IDENTIFIER ::= { iso 3 6 1 }";
        assert!(scan_declarations(text).is_empty());
    }

    #[test]
    fn test_object_identity_and_notification_type() {
        let text = "acmeTraps OBJECT-IDENTITY\n    STATUS current\n    ::= { enterprises 9 }\n\
                    acmeLinkDown NOTIFICATION-TYPE\n    OBJECTS { ifIndex }\n    ::= { acmeTraps 1 }\n";
        let mut registry = OidRegistry::new();
        ModuleParser::new().parse(text, &mut registry);

        assert_eq!(registry.resolve_oid("acmeTraps"), "1.3.6.1.4.1.9");
        assert_eq!(registry.resolve_oid("acmeLinkDown"), "1.3.6.1.4.1.9.1");
    }

    #[test]
    fn test_commented_declarations_are_invisible() {
        let text = "-- hidden OBJECT IDENTIFIER ::= { enterprises 1 }\n\
                    shown OBJECT IDENTIFIER ::= { enterprises 2 } -- trailing\n";
        let decls = scan_declarations(&strip_comments(text));

        assert_eq!(decls.len(), 1);
        assert_eq!(decls[0].name, "shown");
    }

    #[test]
    fn test_macro_keyword_in_description_is_prose() {
        let text = r#"
fooStatus OBJECT-TYPE
    SYNTAX      Integer32
    MAX-ACCESS  read-only
    STATUS      current
    DESCRIPTION "Sent in the corresponding NOTIFICATION-TYPE."
    ::= { enterprises 9999 }
"#;
        let mut registry = OidRegistry::new();
        let report = ModuleParser::new().parse(text, &mut registry);

        assert_eq!(report.declarations, 1);
        assert_eq!(registry.resolve_oid("fooStatus"), "1.3.6.1.4.1.9999");
        assert!(!registry.contains_name("corresponding"));
    }

    #[test]
    fn test_alias_inside_string_is_ignored() {
        let text = r#"
acmeNote OBJECT-IDENTITY
    STATUS      current
    DESCRIPTION "Legacy agents used
                 old OBJECT IDENTIFIER ::= { enterprises 1 } here."
    ::= { enterprises 2 }
"#;
        let decls = scan_declarations(text);

        assert_eq!(decls.len(), 1);
        assert_eq!(decls[0].name, "acmeNote");
        assert_eq!(decls[0].parent, "enterprises");
        assert_eq!(decls[0].last_id, 2);
    }

    #[test]
    fn test_non_ascii_string_keeps_offsets() {
        let text = "caf OBJECT-TYPE\n    DESCRIPTION \"caf\u{e9} \u{fc}ber\"\n    ::= { enterprises 7 }\n\
                    next OBJECT IDENTIFIER ::= { caf 1 }\n";
        let mut registry = OidRegistry::new();
        ModuleParser::new().parse(text, &mut registry);

        assert_eq!(registry.resolve_oid("caf"), "1.3.6.1.4.1.7");
        assert_eq!(registry.resolve_oid("next"), "1.3.6.1.4.1.7.1");
    }

    #[test]
    fn test_unregistered_lists_each_name_once() {
        let text = "orphan OBJECT IDENTIFIER ::= { nowhere 1 }\n\
                    other OBJECT IDENTIFIER ::= { nowhere 2 }\n\
                    orphan OBJECT-TYPE\n    SYNTAX Integer32\n    ::= { nowhere 3 }\n";
        let mut registry = OidRegistry::new();
        let report = ModuleParser::new().parse(text, &mut registry);

        assert_eq!(report.declarations, 3);
        assert_eq!(
            report.unregistered,
            vec!["orphan".to_string(), "other".to_string()]
        );
    }

    #[test]
    fn test_strip_comments() {
        assert_eq!(strip_comments("a -- b\nc"), "a  \nc");
        assert_eq!(strip_comments("a -- b -- c"), "a   c");
        assert_eq!(strip_comments("\"x -- y\" z"), "\"x -- y\" z");
        assert!(matches!(strip_comments("no comments"), Cow::Borrowed(_)));
    }

    #[test]
    fn test_parse_file_missing() {
        let mut registry = OidRegistry::new();
        let err = ModuleParser::new()
            .parse_file(Path::new("/nonexistent/NO-SUCH-MIB.txt"), &mut registry)
            .unwrap_err();
        assert!(matches!(err, Error::Io { .. }));
    }

    #[test]
    fn test_zero_passes_registers_nothing() {
        let mut registry = OidRegistry::new();
        let report = ModuleParser::new()
            .max_passes(0)
            .parse("x OBJECT IDENTIFIER ::= { enterprises 1 }", &mut registry);

        assert_eq!(report.passes, 0);
        assert!(!registry.contains_name("x"));
    }
}
