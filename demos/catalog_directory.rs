use platform_errors::{CatalogConfig, ErrorCode, Locale, PlatformError};
use std::fs;

fn main() -> std::result::Result<(), Box<dyn std::error::Error>> {
    let dir = std::env::temp_dir().join("platform_errors_demo");
    fs::create_dir_all(&dir)?;
    fs::write(
        dir.join("gateway.toml"),
        "PORT_IN_USE = \"Port {0} is already in use\"\n\
         DEPLOYMENT_INSTALL_FAILED = \"Could not install {0} {1}\"\n",
    )?;
    fs::write(
        dir.join("gateway_fr.toml"),
        "PORT_IN_USE = \"Le port {0} est déjà utilisé\"\n",
    )?;

    let config = CatalogConfig::from_toml_str(&format!(
        "base_name = \"gateway\"\ndirectory = {:?}\ncache = true\ndisplay_locale = \"fr_FR\"\n",
        dir.display().to_string()
    ))?;
    let resolver = config.build_resolver()?;

    println!("--- Directory Catalog Example ---\n");

    let busy = PlatformError::with_args(ErrorCode::PortInUse, ["/dev/ttyS0"]);
    println!("canonical: {}", resolver.message(&busy));
    println!("localized: {}", resolver.localized_message(&busy));

    let failed = PlatformError::with_args(ErrorCode::DeploymentInstallFailed, ["modem-manager", "1.4.2"]);
    println!("fallback:  {}", resolver.message_in(&failed, &Locale::FRANCE));

    // No entry anywhere: the generic template still names the code.
    let missing = PlatformError::new(ErrorCode::GpioException);
    println!("generic:   {}", resolver.message(&missing));

    fs::remove_dir_all(&dir)?;
    Ok(())
}
