#![no_main]

use libfuzzer_sys::fuzz_target;
use platform_errors::{ErrorCode, Locale, PlatformError, StaticCatalog};

fuzz_target!(|data: &[u8]| {
    if data.is_empty() {
        return;
    }

    let code = ErrorCode::ALL[data[0] as usize % ErrorCode::ALL.len()];
    let text = String::from_utf8_lossy(&data[1..]);
    let mut parts = text.splitn(2, '\n');
    let template = parts.next().unwrap_or_default();
    let argument = parts.next().unwrap_or_default();

    // Arbitrary templates and arguments must always resolve to some text.
    let catalog = StaticCatalog::new().with_entry(Locale::ROOT, code.name(), template);
    let err = PlatformError::with_args(code, [argument]).with_arg(argument.len());
    let _ = err.message_in(&catalog, &Locale::US);
    let _ = err.to_string();
    let _ = err.record().to_string();
});
