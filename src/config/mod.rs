pub mod locale;
pub mod toml_config;

pub use toml_config::TomlConfig;

#[cfg(feature = "cli")]
use crate::utils::error::Result;
#[cfg(feature = "cli")]
use clap::Parser;

#[cfg(feature = "cli")]
#[derive(Debug, Clone, Parser)]
#[command(name = "cheap-flights")]
#[command(about = "Telegram bot that finds the cheapest round-trip fares between two cities")]
pub struct CliConfig {
    #[arg(long, help = "Path to a TOML configuration file")]
    pub config: Option<String>,

    #[arg(long, env = "API_TOKEN", hide_env_values = true)]
    pub bot_token: Option<String>,

    #[arg(long, help = "Maximum number of fare options per reply")]
    pub max_results: Option<usize>,

    #[arg(long, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, help = "Emit logs as JSON")]
    pub log_json: bool,
}

#[cfg(feature = "cli")]
impl CliConfig {
    /// 載入 TOML（若有指定），再以命令列參數覆寫
    pub fn resolve(&self) -> Result<TomlConfig> {
        let mut config = match &self.config {
            Some(path) => TomlConfig::from_file(path)?,
            None => TomlConfig::default(),
        };

        if let Some(token) = &self.bot_token {
            config.telegram.token = token.clone();
        }
        if let Some(max_results) = self.max_results {
            config.bot.max_results = max_results;
        }

        Ok(config)
    }
}

#[cfg(all(test, feature = "cli"))]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_cli_overrides_file() {
        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file
            .write_all(b"[bot]\nmax_results = 9\n\n[telegram]\ntoken = \"from-file\"\n")
            .unwrap();

        let cli = CliConfig {
            config: Some(temp_file.path().to_string_lossy().to_string()),
            bot_token: Some("from-cli".to_string()),
            max_results: Some(2),
            verbose: false,
            log_json: false,
        };

        let config = cli.resolve().unwrap();
        assert_eq!(config.bot.max_results, 2);
        assert_eq!(config.telegram.token, "from-cli");
    }

    #[test]
    fn test_cli_without_file_uses_defaults() {
        let cli = CliConfig::parse_from(["cheap-flights", "--bot-token", "abc"]);
        let config = cli.resolve().unwrap();
        assert_eq!(config.bot.max_results, 5);
        assert_eq!(config.telegram.token, "abc");
    }
}
