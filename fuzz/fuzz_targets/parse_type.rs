#![no_main]

use classtype::frontend::{BuiltinsOnly, parse_type};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    // Convert bytes to UTF-8 string (ignore invalid UTF-8)
    if let Ok(s) = std::str::from_utf8(data) {
        if let Ok(ty) = parse_type(s, &BuiltinsOnly) {
            // Whatever parses must render back to something that parses to the same type
            let rendered = ty.to_string();
            let reparsed = parse_type(&rendered, &BuiltinsOnly).expect("rendered type must parse");
            assert_eq!(reparsed, ty);
        }
    }
});
