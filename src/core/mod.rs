pub mod aggregator;
pub mod bot;
pub mod deep_link;
pub mod formatter;
pub mod translator;

pub use crate::domain::model::{DeepLink, FareOption, GeoPoint, RankedResult};
pub use crate::domain::ports::{
    AirportLookup, Channel, ConfigProvider, FareSource, KnowledgeBaseClient, LanguageDetector,
    RateSource,
};
pub use crate::utils::error::Result;
