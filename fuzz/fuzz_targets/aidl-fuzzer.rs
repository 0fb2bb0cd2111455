#![no_main]

use aidl_ir_grammar::parse_aidl;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let Ok(text) = std::str::from_utf8(data) else { return };
    let _ = parse_aidl("fuzz.aidl", text);
});
