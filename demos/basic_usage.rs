use platform_errors::{
    ErrorCode, Locale, MessageResolver, PlatformError, Result, StaticCatalog, ensure_code,
};
use std::io;

fn open_serial_port(path: &str, baud: u32) -> Result<()> {
    ensure_code!(baud > 0, ErrorCode::SerialPortInvalidConfiguration, path);

    let failure = io::Error::new(io::ErrorKind::NotFound, "no such device");
    Err(PlatformError::with_cause(ErrorCode::SerialPortNotExisting, failure, [path]))
}

fn main() -> std::result::Result<(), Box<dyn std::error::Error>> {
    let resolver = MessageResolver::new(StaticCatalog::builtin()?)
        .with_display_locale(Locale::GERMANY);

    println!("--- Basic Usage Example ---\n");

    if let Err(err) = open_serial_port("/dev/ttyUSB0", 115_200) {
        // Stable identifier for programmatic handling.
        println!("1. Code:        {:?}", err.code());

        // Canonical locale, for APIs and log aggregation.
        println!("2. Message:     {}", resolver.message(&err));

        // Display locale, for the operator in front of the screen.
        println!("3. Localized:   {}", resolver.display(&err));

        // Without any catalog.
        println!("4. Display:     {err}");

        // Bounded single-line record with the cause chain.
        println!("5. Record:      {}", err.record());
    }

    let timeout = PlatformError::with_args(ErrorCode::TimedOut, [30_000]);
    for locale in [Locale::US, Locale::GERMANY, Locale::ITALY] {
        println!("   {locale}: {}", resolver.message_in(&timeout, &locale));
    }

    Ok(())
}
