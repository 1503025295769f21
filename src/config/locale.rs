use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// 單一語言的回覆模板，啟動時載入後唯讀
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct LocaleBundle {
    pub help: String,
    pub help_instructions: String,
    pub parse_error: String,
    pub airport_data_error: String,
    pub request_error: String,
    /// 服務回應無法解析
    pub response_error: String,
    /// 查無機場屬於資訊性回覆，不帶 🔴
    pub airports_not_found: String,
    pub nothing_found: String,
    /// `{total}` 與 `{max}` 會被替換
    pub results: String,
    pub details: String,
    /// Monday first.
    pub weekdays: Vec<String>,
}

impl LocaleBundle {
    pub fn english() -> Self {
        Self {
            help: "Greetings from the elderly cheap tickets bot.".to_string(),
            help_instructions: "To start a search send a message like \"Kiev Tallinn\" or \"From Kiev to Tallinn\"".to_string(),
            parse_error: "🔴 could not understand the message".to_string(),
            airport_data_error: "🔴 could not retrieve source and destination points".to_string(),
            request_error: "🔴 an error occurred while sending the request".to_string(),
            response_error: "🔴 could not read the service response".to_string(),
            airports_not_found: "No airports found for these cities".to_string(),
            nothing_found: "Nothing found".to_string(),
            results: "Total results: {total}, showing up to {max} best:".to_string(),
            details: "details".to_string(),
            weekdays: ["monday", "tuesday", "wednesday", "thursday", "friday", "saturday", "sunday"]
                .iter()
                .map(|d| d.to_string())
                .collect(),
        }
    }

    pub fn russian() -> Self {
        Self {
            help: "Вас приветствует пожилой бот для поиска дешевых билетов.".to_string(),
            help_instructions: "Чтобы начать поиск отправьте пожилое сообщение в виде \"Киев Таллин\" или \"Из Киева в Таллин\"".to_string(),
            parse_error: "🔴 не смог разобрать сообщение".to_string(),
            airport_data_error: "🔴 не смог получить данные об аэропортах".to_string(),
            request_error: "🔴 произошла ошибка при отправке запроса".to_string(),
            response_error: "🔴 не смог разобрать ответ сервиса".to_string(),
            airports_not_found: "Не нашел аэропортов для этих городов".to_string(),
            nothing_found: "Ничего не нашел".to_string(),
            results: "Всего результатов: {total}, покажу до {max} лучших:".to_string(),
            details: "подробнее".to_string(),
            weekdays: [
                "понедельник",
                "вторник",
                "среда",
                "четверг",
                "пятница",
                "суббота",
                "воскресенье",
            ]
            .iter()
            .map(|d| d.to_string())
            .collect(),
        }
    }

    pub fn help_text(&self) -> String {
        format!("{} {}", self.help, self.help_instructions)
    }

    pub fn results_text(&self, total: usize, max: usize) -> String {
        self.results
            .replace("{total}", &total.to_string())
            .replace("{max}", &max.to_string())
    }

    /// 0 = Monday. Falls back to `None` when the bundle lists fewer than seven days.
    pub fn weekday_name(&self, days_from_monday: u32) -> Option<&str> {
        self.weekdays.get(days_from_monday as usize).map(String::as_str)
    }
}

/// Language tag → bundle, with a fallback tag for unknown languages.
#[derive(Debug, Clone)]
pub struct Locales {
    bundles: HashMap<String, LocaleBundle>,
    fallback: String,
}

impl Locales {
    pub fn new(bundles: HashMap<String, LocaleBundle>, fallback: impl Into<String>) -> Self {
        Self {
            bundles,
            fallback: fallback.into(),
        }
    }

    pub fn builtin() -> HashMap<String, LocaleBundle> {
        HashMap::from([
            ("en".to_string(), LocaleBundle::english()),
            ("ru".to_string(), LocaleBundle::russian()),
        ])
    }

    pub fn fallback(&self) -> &LocaleBundle {
        self.get(&self.fallback)
    }

    pub fn contains(&self, tag: &str) -> bool {
        self.bundles.contains_key(tag)
    }

    pub fn get(&self, tag: &str) -> &LocaleBundle {
        self.bundles
            .get(tag)
            .or_else(|| self.bundles.get(&self.fallback))
            .or_else(|| self.bundles.values().next())
            .unwrap_or_else(|| default_bundle())
    }
}

impl Default for Locales {
    fn default() -> Self {
        Self::new(Self::builtin(), "en")
    }
}

fn default_bundle() -> &'static LocaleBundle {
    static DEFAULT: std::sync::OnceLock<LocaleBundle> = std::sync::OnceLock::new();
    DEFAULT.get_or_init(LocaleBundle::english)
}
