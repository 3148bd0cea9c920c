// ABOUTME: CLI config command - print the effective configuration

use super::OutputFormat;
use crate::config::AppConfig;
use anyhow::Result;

/// Execute the config command
pub fn execute(format: OutputFormat) -> Result<()> {
    let config = AppConfig::load()?;
    println!("{}", render(&config, format)?);
    Ok(())
}

/// The configuration as TOML, or JSON when requested
pub fn render(config: &AppConfig, format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(config)?),
        OutputFormat::Text => config.to_toml(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_json_has_role() {
        let out = render(&AppConfig::default(), OutputFormat::Json).unwrap();
        let value: serde_json::Value = serde_json::from_str(&out).unwrap();
        assert_eq!(value["role"], "hybrid");
    }

    #[test]
    fn test_render_text_is_toml() {
        let out = render(&AppConfig::default(), OutputFormat::Text).unwrap();
        assert!(out.contains("role = \"hybrid\""));
        assert!(out.contains("[tour]"));
    }
}
