use crate::config::locale::LocaleBundle;
use crate::domain::model::RankedResult;
use crate::domain::ports::RateSource;
use chrono::{Datelike, NaiveDate};

pub struct ResultFormatter {
    max_results: usize,
}

impl ResultFormatter {
    pub fn new(max_results: usize) -> Self {
        Self { max_results }
    }

    pub fn max_results(&self) -> usize {
        self.max_results
    }

    /// 每個結果一段文字，段落之間空一行；輸入為空時回傳空字串
    pub async fn render(
        &self,
        results: &[RankedResult],
        bundle: &LocaleBundle,
        rates: &dyn RateSource,
    ) -> String {
        let mut blocks = Vec::with_capacity(results.len().min(self.max_results));

        for result in results.iter().take(self.max_results) {
            let option = &result.option;
            let price = price_text(option.price, rates).await;

            blocks.push(
                [
                    price,
                    format!("🛫 {}", date_with_weekday(&option.depart_date, bundle)),
                    format!("🛬 {}", date_with_weekday(&option.return_date, bundle)),
                    format!("🔄 {}", option.change_count),
                    format!("🔎 {}", option.source_site),
                    format!("{}: {}", bundle.details, result.deep_link.as_str()),
                ]
                .join("\n"),
            );
        }

        blocks.join("\n\n")
    }
}

/// Converted when a nonzero rate is available, otherwise the source-currency price.
async fn price_text(price: f64, rates: &dyn RateSource) -> String {
    match rates.rate().await {
        Ok(rate) if rate != 0.0 => format!("💶 {:.2} {}", price * rate, rates.target_symbol()),
        Ok(_) => {
            tracing::warn!("currency rate is zero, showing source price");
            format!("💶 {} {}", price, rates.source_symbol())
        }
        Err(e) => {
            tracing::warn!("failed to get currency rate: {}", e);
            format!("💶 {} {}", price, rates.source_symbol())
        }
    }
}

fn date_with_weekday(date: &str, bundle: &LocaleBundle) -> String {
    let weekday = NaiveDate::parse_from_str(date, "%Y-%m-%d")
        .ok()
        .and_then(|d| bundle.weekday_name(d.weekday().num_days_from_monday()));

    match weekday {
        Some(day) => format!("{date} {day}"),
        None => {
            tracing::debug!("no weekday for '{}'", date);
            date.to_string()
        }
    }
}
