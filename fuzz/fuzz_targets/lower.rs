#![no_main]

use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if let Ok(s) = std::str::from_utf8(data) {
        // Lowering and facade emission must never panic, and a rendered contract must lower back to itself.
        if let Ok(contracts) = dynbind::parse_contracts(s) {
            for contract in &contracts {
                let rendered = contract.to_string();
                let reparsed = dynbind::parse_contracts(&rendered).expect("rendered contract should parse");
                assert_eq!(reparsed, vec![contract.clone()], "{rendered}");
                let _ = dynbind::backend::emit_facade(contract);
            }
        }
    }
});
