#![no_main]

use std::sync::OnceLock;

use aidl_ir_decoder::decode_incoming;
use aidl_ir_loader::Loader;
use libfuzzer_sys::fuzz_target;

/// A fixed compiled binder interface to decode arbitrary bytes against, the
/// same shape the decoder crate's own tests use (`readInt`/`readString`/
/// `readStrongBinder` cover the three alignment-sensitive verb families).
fn loader() -> &'static Loader {
    static LOADER: OnceLock<Loader> = OnceLock::new();
    LOADER.get_or_init(|| {
        let dir = std::env::temp_dir().join("aidl-ir-fuzz-decoder");
        std::fs::create_dir_all(&dir).expect("create fuzz scratch dir");
        std::fs::write(
            dir.join("I.json"),
            r#"{"qname":"I","type":"BINDER","methods":[{"name":"f","tc":1,"oneway":true,"retval":null,
               "arguments":[
                 {"name":"a","call":"readInt","direction":0},
                 {"name":"b","call":"readString","direction":0},
                 {"name":"c","call":"readStrongBinder","direction":0}
               ]}]}"#,
        )
        .expect("write fuzz unit");
        Loader::new(vec![dir])
    })
}

fuzz_target!(|data: &[u8]| {
    for android_version in [9, 10, 11] {
        let _ = decode_incoming(data, loader(), 1, android_version);
    }
});
