#![no_main]

use decorable::{stringify, stringify_error};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if let Ok(value) = serde_json::from_slice::<serde_json::Value>(data) {
        let rendered = stringify(&value);
        assert!(serde_json::from_str::<serde_json::Value>(&rendered).is_ok());
    }
    let text = String::from_utf8_lossy(data);
    let _ = stringify(&*text);
    let _ = stringify_error(&std::io::Error::other(text.into_owned()));
});
