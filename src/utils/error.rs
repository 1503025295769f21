use thiserror::Error;

#[derive(Error, Debug)]
pub enum FlightsError {
    #[error("API request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Unexpected response from {url}: HTTP {status}")]
    HttpStatus { url: String, status: u16 },

    #[error("Malformed JSON response: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Malformed CSV response: {0}")]
    Csv(#[from] csv::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Airports were not resolved, origin: '{origin}', destination: '{destination}'")]
    AirportsNotResolved { origin: String, destination: String },

    #[error("Translation not found for '{city}'")]
    TranslationNotFound { city: String },

    #[error("Wrong date format: {date}")]
    InvalidDate { date: String },

    #[error("Chat channel error: {message}")]
    Channel { message: String },

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Invalid value '{value}' for {field}: {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Missing required configuration: {field}")]
    MissingConfigError { field: String },
}

/// 錯誤分類，對應回覆給使用者的不同訊息
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// DNS / 連線 / 逾時 / 非 2xx 狀態
    Transport,
    /// 回應內容無法解析
    Parse,
    /// 查無結果，屬於資訊性訊息而非錯誤
    NotFound,
    /// 可降級處理的子步驟失敗
    Degraded,
    Config,
    Channel,
}

impl FlightsError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            FlightsError::Transport(_) | FlightsError::HttpStatus { .. } => {
                ErrorCategory::Transport
            }
            FlightsError::Parse(_) | FlightsError::Csv(_) => ErrorCategory::Parse,
            FlightsError::AirportsNotResolved { .. } | FlightsError::TranslationNotFound { .. } => {
                ErrorCategory::NotFound
            }
            FlightsError::InvalidDate { .. } => ErrorCategory::Degraded,
            FlightsError::Channel { .. } => ErrorCategory::Channel,
            FlightsError::Io(_)
            | FlightsError::ConfigError { .. }
            | FlightsError::InvalidConfigValueError { .. }
            | FlightsError::MissingConfigError { .. } => ErrorCategory::Config,
        }
    }

    pub fn is_not_found(&self) -> bool {
        self.category() == ErrorCategory::NotFound
    }
}

pub type Result<T> = std::result::Result<T, FlightsError>;
