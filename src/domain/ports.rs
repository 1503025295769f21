use crate::config::locale::Locales;
use crate::domain::model::{FareOption, GeoPoint, IncomingMessage, OutgoingMessage};
use crate::utils::error::Result;
use async_trait::async_trait;
use chrono::NaiveDate;

/// Free text to an (origin, destination) airport pair.
#[async_trait]
pub trait AirportLookup: Send + Sync {
    async fn resolve(&self, text: &str) -> Result<(GeoPoint, GeoPoint)>;
}

/// Raw fare entries for a route, in response order.
#[async_trait]
pub trait FareSource: Send + Sync {
    async fn fares(
        &self,
        origin: &GeoPoint,
        destination: &GeoPoint,
        depart_date: NaiveDate,
    ) -> Result<Vec<FareOption>>;
}

#[async_trait]
pub trait RateSource: Send + Sync {
    /// Target-currency units per source-currency unit. Fetched fresh on every call.
    async fn rate(&self) -> Result<f64>;

    fn source_symbol(&self) -> &str;

    fn target_symbol(&self) -> &str;
}

pub trait LanguageDetector: Send + Sync {
    /// Always returns a whitelisted tag or the default one.
    fn detect(&self, text: &str) -> String;
}

/// 知識庫查詢，回傳原始 CSV 內容
#[async_trait]
pub trait KnowledgeBaseClient: Send + Sync {
    async fn select_csv(&self, query: &str) -> Result<String>;
}

#[async_trait]
pub trait Channel: Send + Sync {
    fn name(&self) -> &str;

    /// Start receiving. Messages arrive on the returned receiver until the channel stops.
    async fn start(&self) -> Result<tokio::sync::mpsc::Receiver<IncomingMessage>>;

    /// Returns the id the channel assigned to the sent message.
    async fn send(&self, message: OutgoingMessage) -> Result<i64>;

    async fn delete(&self, chat_id: i64, message_id: i64) -> Result<()>;
}

pub trait ConfigProvider: Send + Sync {
    fn airport_suggest_endpoint(&self) -> &str;
    fn fare_calendar_endpoint(&self) -> &str;
    fn currency_rate_endpoint(&self) -> &str;
    fn currency_pair(&self) -> &str;
    fn knowledge_base_endpoint(&self) -> &str;
    fn link_prefix(&self) -> &str;
    fn default_link(&self) -> &str;
    fn max_results(&self) -> usize;
    fn languages(&self) -> &[String];
    fn default_language(&self) -> &str;
    fn target_language(&self) -> &str;
    fn translate_cities(&self) -> bool;
    /// Sent before formatting and deleted afterwards. Empty disables it.
    fn waiting_message(&self) -> &str;
    fn locales(&self) -> Locales;
}

#[async_trait]
impl<T: FareSource + ?Sized> FareSource for Box<T> {
    async fn fares(
        &self,
        origin: &GeoPoint,
        destination: &GeoPoint,
        depart_date: NaiveDate,
    ) -> Result<Vec<FareOption>> {
        (**self).fares(origin, destination, depart_date).await
    }
}

#[async_trait]
impl<T: KnowledgeBaseClient + ?Sized> KnowledgeBaseClient for Box<T> {
    async fn select_csv(&self, query: &str) -> Result<String> {
        (**self).select_csv(query).await
    }
}
