#![no_main]

use libfuzzer_sys::fuzz_target;

use snmp_mibmap::{OidRegistry, oid};

fuzz_target!(|data: &[u8]| {
    let Ok(s) = std::str::from_utf8(data) else {
        return;
    };

    let registry = OidRegistry::new();
    let _ = registry.resolve_name(s);
    let _ = registry.resolve_oid(s);
    let _ = oid::parse_arcs(s);
});
