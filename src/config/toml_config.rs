use crate::config::locale::{LocaleBundle, Locales};
use crate::domain::ports::ConfigProvider;
use crate::utils::error::{FlightsError, Result};
use crate::utils::validation::{self, Validate};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TomlConfig {
    pub bot: BotConfig,
    pub endpoints: EndpointsConfig,
    pub telegram: TelegramConfig,
    pub locales: HashMap<String, LocaleBundle>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BotConfig {
    pub max_results: usize,
    pub default_language: String,
    pub languages: Vec<String>,
    pub translate_cities: bool,
    pub target_language: String,
    pub waiting_message: String,
}

impl Default for BotConfig {
    fn default() -> Self {
        Self {
            max_results: 5,
            default_language: "en".to_string(),
            languages: vec!["en".to_string(), "ru".to_string()],
            translate_cities: true,
            target_language: "ru".to_string(),
            waiting_message: "https://media.giphy.com/media/tXL4FHPSnVJ0A/giphy.gif".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EndpointsConfig {
    pub airport_suggest: String,
    pub fare_calendar: String,
    pub currency_rate: String,
    pub currency_pair: String,
    pub knowledge_base: String,
    pub link_prefix: String,
    pub default_link: String,
}

impl Default for EndpointsConfig {
    fn default() -> Self {
        Self {
            airport_suggest: "https://www.travelpayouts.com/widgets_suggest_params".to_string(),
            fare_calendar: "http://min-prices.aviasales.ru/calendar_preload".to_string(),
            currency_rate: "http://free.currencyconverterapi.com/api/v5/convert".to_string(),
            currency_pair: "RUB_EUR".to_string(),
            knowledge_base: "https://query.wikidata.org/sparql".to_string(),
            link_prefix: "aviasales.ru/search/".to_string(),
            default_link: "aviasales.ru".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TelegramConfig {
    pub token: String,
    pub api_base: String,
    pub poll_timeout_secs: u64,
}

impl Default for TelegramConfig {
    fn default() -> Self {
        Self {
            token: String::new(),
            api_base: "https://api.telegram.org".to_string(),
            poll_timeout_secs: 10,
        }
    }
}

impl TomlConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path)?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| FlightsError::ConfigError {
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// 替換環境變數 (例如 ${API_TOKEN})
    fn substitute_env_vars(content: &str) -> Result<String> {
        use regex::Regex;
        let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| FlightsError::ConfigError {
            message: format!("env placeholder pattern: {}", e),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }

    /// 驗證配置的合理性
    pub fn validate_config(&self) -> Result<()> {
        validation::validate_url("endpoints.airport_suggest", &self.endpoints.airport_suggest)?;
        validation::validate_url("endpoints.fare_calendar", &self.endpoints.fare_calendar)?;
        validation::validate_url("endpoints.currency_rate", &self.endpoints.currency_rate)?;
        validation::validate_url("endpoints.knowledge_base", &self.endpoints.knowledge_base)?;
        validation::validate_non_empty_string("endpoints.currency_pair", &self.endpoints.currency_pair)?;
        validation::validate_non_empty_string("endpoints.default_link", &self.endpoints.default_link)?;

        validation::validate_positive_number("bot.max_results", self.bot.max_results, 1)?;
        validation::validate_language_tag("bot.default_language", &self.bot.default_language)?;
        validation::validate_language_tag("bot.target_language", &self.bot.target_language)?;

        if self.bot.languages.is_empty() {
            return Err(FlightsError::MissingConfigError {
                field: "bot.languages".to_string(),
            });
        }

        let locales = self.locales();
        for tag in &self.bot.languages {
            validation::validate_language_tag("bot.languages", tag)?;
            if !locales.contains(tag) {
                return Err(FlightsError::InvalidConfigValueError {
                    field: "bot.languages".to_string(),
                    value: tag.clone(),
                    reason: "No locale bundle for this language".to_string(),
                });
            }
        }

        if !self.bot.languages.contains(&self.bot.default_language) {
            return Err(FlightsError::InvalidConfigValueError {
                field: "bot.default_language".to_string(),
                value: self.bot.default_language.clone(),
                reason: format!(
                    "Default language must be one of: {}",
                    self.bot.languages.join(", ")
                ),
            });
        }

        Ok(())
    }

    pub fn validate_telegram(&self) -> Result<()> {
        if self.telegram.token.is_empty() || self.telegram.token.starts_with("${") {
            return Err(FlightsError::MissingConfigError {
                field: "telegram.token".to_string(),
            });
        }
        validation::validate_url("telegram.api_base", &self.telegram.api_base)
    }
}

impl ConfigProvider for TomlConfig {
    fn airport_suggest_endpoint(&self) -> &str {
        &self.endpoints.airport_suggest
    }

    fn fare_calendar_endpoint(&self) -> &str {
        &self.endpoints.fare_calendar
    }

    fn currency_rate_endpoint(&self) -> &str {
        &self.endpoints.currency_rate
    }

    fn currency_pair(&self) -> &str {
        &self.endpoints.currency_pair
    }

    fn knowledge_base_endpoint(&self) -> &str {
        &self.endpoints.knowledge_base
    }

    fn link_prefix(&self) -> &str {
        &self.endpoints.link_prefix
    }

    fn default_link(&self) -> &str {
        &self.endpoints.default_link
    }

    fn max_results(&self) -> usize {
        self.bot.max_results
    }

    fn languages(&self) -> &[String] {
        &self.bot.languages
    }

    fn default_language(&self) -> &str {
        &self.bot.default_language
    }

    fn target_language(&self) -> &str {
        &self.bot.target_language
    }

    fn translate_cities(&self) -> bool {
        self.bot.translate_cities
    }

    fn waiting_message(&self) -> &str {
        &self.bot.waiting_message
    }

    /// 內建語系加上設定檔中的覆寫
    fn locales(&self) -> Locales {
        let mut bundles = Locales::builtin();
        for (tag, bundle) in &self.locales {
            bundles.insert(tag.clone(), bundle.clone());
        }
        Locales::new(bundles, self.bot.default_language.clone())
    }
}

impl Validate for TomlConfig {
    fn validate(&self) -> Result<()> {
        self.validate_config()
    }
}
