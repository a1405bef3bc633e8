#![no_main]

use libfuzzer_sys::fuzz_target;
use platform_errors::{Locale, MessageArg, MessagePattern};

fuzz_target!(|data: &[u8]| {
    let Ok(text) = std::str::from_utf8(data) else {
        return;
    };

    // Parsing must reject or accept, never panic; accepted patterns must format.
    if let Ok(pattern) = MessagePattern::parse(text) {
        let args = [
            MessageArg::from("text"),
            MessageArg::from(-42i64),
            MessageArg::from(3.25f64),
            MessageArg::from(u64::MAX),
        ];
        let _ = pattern.format(&args, &Locale::US);
        let _ = pattern.format(&args, &Locale::GERMANY);
        let _ = pattern.format(&[], &Locale::ROOT);
    }
});
