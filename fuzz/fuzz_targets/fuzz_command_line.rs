#![no_main]

use bstviz::repl::parse_line;
use bstviz_core::parse_key;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let Ok(text) = std::str::from_utf8(data) else {
        return;
    };
    // Neither parser may panic; a parsed key must round-trip.
    if let Ok(key) = parse_key(text) {
        assert_eq!(parse_key(&key.to_string()), Ok(key));
    }
    let _ = parse_line(text);
});
