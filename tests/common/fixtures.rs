//! Common test fixtures: module texts and on-disk module directories.

use std::fs;
use std::path::Path;

use tempfile::TempDir;

// =============================================================================
// Module texts
// =============================================================================

/// Vendor module with a forward reference (objects declared before the identity).
pub const ACME_MIB: &str = r#"
ACME-MIB DEFINITIONS ::= BEGIN

IMPORTS
    MODULE-IDENTITY, OBJECT-TYPE, NOTIFICATION-TYPE, Integer32, enterprises
        FROM SNMPv2-SMI;

-- Objects come first on purpose
acmeObjects      OBJECT IDENTIFIER ::= { acmeMIB 1 }
acmeNotifications OBJECT IDENTIFIER ::= { acmeMIB 2 }

acmeMIB MODULE-IDENTITY
    LAST-UPDATED "202401010000Z"
    ORGANIZATION "Acme Corp"
    CONTACT-INFO "noc@acme.example"
    DESCRIPTION  "Widgets."
    ::= { enterprises 9999 }

acmeWidgetCount OBJECT-TYPE
    SYNTAX      Integer32
    MAX-ACCESS  read-only
    STATUS      current
    DESCRIPTION "Number of widgets."
    ::= { acmeObjects 1 }

acmeWidgetTable OBJECT-TYPE
    SYNTAX      SEQUENCE OF AcmeWidgetEntry
    MAX-ACCESS  not-accessible
    STATUS      current
    DESCRIPTION "Widget table."
    ::= { acmeObjects 2 }

acmeWidgetJammed NOTIFICATION-TYPE
    OBJECTS     { acmeWidgetCount }
    STATUS      current
    DESCRIPTION "A widget jammed."
    ::= { acmeNotifications 1 }

END
"#;

/// Subset of IF-MIB hanging off the bootstrap `mib-2` node.
pub const IF_MIB: &str = r#"
IF-MIB DEFINITIONS ::= BEGIN

interfaces OBJECT IDENTIFIER ::= { mib-2 2 }

ifNumber OBJECT-TYPE
    SYNTAX      Integer32
    MAX-ACCESS  read-only
    STATUS      current
    DESCRIPTION "The number of network interfaces."
    ::= { interfaces 1 }

ifTable OBJECT-TYPE
    SYNTAX      SEQUENCE OF IfEntry
    MAX-ACCESS  not-accessible
    STATUS      current
    DESCRIPTION "A list of interface entries."
    ::= { interfaces 2 }

ifEntry OBJECT-TYPE
    SYNTAX      IfEntry
    MAX-ACCESS  not-accessible
    STATUS      current
    DESCRIPTION "An interface entry."
    INDEX       { ifIndex }
    ::= { ifTable 1 }

ifIndex OBJECT-TYPE
    SYNTAX      InterfaceIndex
    MAX-ACCESS  read-only
    STATUS      current
    DESCRIPTION "Unique interface index."
    ::= { ifEntry 1 }

ifDescr OBJECT-TYPE
    SYNTAX      DisplayString (SIZE (0..255))
    MAX-ACCESS  read-only
    STATUS      current
    DESCRIPTION "Interface description."
    ::= { ifEntry 2 }

END
"#;

/// Text with no recognisable declarations.
pub const GARBAGE: &str = "<<<not a mib>>>\n::= { }\nOBJECT-TYPE OBJECT IDENTIFIER\n";

// =============================================================================
// Directory helpers
// =============================================================================

/// Write `(relative path, contents)` pairs under a fresh temp dir.
pub fn module_dir(files: &[(&str, &str)]) -> TempDir {
    let dir = tempfile::tempdir().unwrap();
    for (rel, contents) in files {
        write_file(dir.path(), rel, contents.as_bytes());
    }
    dir
}

/// Write a file, creating parent directories.
pub fn write_file(root: &Path, rel: &str, contents: &[u8]) {
    let path = root.join(rel);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(path, contents).unwrap();
}

/// Install a tracing subscriber honouring `RUST_LOG`; safe to call repeatedly.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}
