#![no_main]

use decorable::InstrumentConfig;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if let Ok(yaml) = std::str::from_utf8(data) {
        if let Ok(config) = InstrumentConfig::from_yaml(yaml) {
            let _ = config.monitor_options("Calculator", "add");
        }
    }
});
