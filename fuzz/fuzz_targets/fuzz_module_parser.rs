#![no_main]

use libfuzzer_sys::fuzz_target;

use snmp_mibmap::{ModuleParser, OidRegistry, build_tree};

fuzz_target!(|data: &[u8]| {
    // Module files are decoded lossily, so every input is reachable
    let text = String::from_utf8_lossy(data);

    let mut registry = OidRegistry::new();
    let report = ModuleParser::new().parse(&text, &mut registry);
    assert!(report.passes <= 10);

    // Whatever was registered must be buildable into a tree
    let _ = build_tree(&registry);
});
