use anyhow::{Context, Result};
use medcheck_core::config::CheckerConfig;
use medcheck_infrastructure::ConfigService;

pub fn show(config: &CheckerConfig) -> Result<()> {
    let rendered = toml::to_string_pretty(config).context("Failed to render configuration")?;
    print!("{rendered}");
    Ok(())
}

pub fn path(service: &ConfigService) -> Result<()> {
    let path = service
        .config_path()
        .context("Failed to resolve config path")?;
    println!("{}", path.display());
    Ok(())
}
