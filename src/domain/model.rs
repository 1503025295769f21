use serde::{Deserialize, Deserializer, Serialize};

/// 機場代碼與顯示名稱
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeoPoint {
    #[serde(rename = "iata", default)]
    pub code: String,
    #[serde(rename = "name", default)]
    pub display_name: String,
}

/// Fare calendar entry, price in the source (minor) currency.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FareOption {
    /// 缺少或為 null 時視為 0
    #[serde(rename = "value", default, deserialize_with = "zero_if_null")]
    pub price: f64,
    #[serde(default)]
    pub depart_date: String,
    #[serde(default)]
    pub return_date: String,
    #[serde(rename = "number_of_changes", default)]
    pub change_count: u32,
    #[serde(rename = "gate", default)]
    pub source_site: String,
    #[serde(rename = "distance", default)]
    pub distance_km: i64,
}

fn zero_if_null<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f64, D::Error> {
    Ok(Option::<f64>::deserialize(deserializer)?.unwrap_or_default())
}

/// 深層連結；建構失敗時改用預設網域並標記為降級結果
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeepLink {
    Exact(String),
    Fallback(String),
}

impl DeepLink {
    pub fn as_str(&self) -> &str {
        match self {
            DeepLink::Exact(link) | DeepLink::Fallback(link) => link,
        }
    }

    pub fn is_degraded(&self) -> bool {
        matches!(self, DeepLink::Fallback(_))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct RankedResult {
    pub option: FareOption,
    pub deep_link: DeepLink,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InboundEvent {
    Text(String),
    /// 有使用者加入對話
    UserJoined,
}

/// 由聊天通道收到的訊息
#[derive(Debug, Clone)]
pub struct IncomingMessage {
    pub chat_id: i64,
    pub sender_name: Option<String>,
    pub event: InboundEvent,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutgoingMessage {
    pub chat_id: i64,
    pub text: String,
    pub link_preview: bool,
}

impl OutgoingMessage {
    /// 一般回覆，不展開連結預覽
    pub fn text(chat_id: i64, text: impl Into<String>) -> Self {
        Self {
            chat_id,
            text: text.into(),
            link_preview: false,
        }
    }
}
