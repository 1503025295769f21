pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliConfig;

pub use config::locale::{LocaleBundle, Locales};
pub use config::TomlConfig;
pub use crate::core::{bot::FlightBot, formatter::ResultFormatter};
pub use utils::error::{ErrorCategory, FlightsError, Result};
