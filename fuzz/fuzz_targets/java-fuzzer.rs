#![no_main]

use aidl_ir_grammar::parse_java;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let Ok(text) = std::str::from_utf8(data) else { return };
    let _ = parse_java("fuzz.java", text);
});
