#![no_main]

use classtype::CheckConfig;
use classtype::frontend::load_declarations;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if let Ok(s) = std::str::from_utf8(data) {
        // Loading must fail with an error, never a panic; checks never fail at all
        if let Ok(decls) = load_declarations(s) {
            let _ = decls.run_checks(&CheckConfig::default());
        }
    }
});
