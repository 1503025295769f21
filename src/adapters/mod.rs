// Adapters layer: concrete implementations for the external services (http apis, chat transport, detection).

pub mod currency;
pub mod detect;
pub mod fares;
pub mod geocode;
pub mod http;
pub mod telegram;
pub mod wikidata;
