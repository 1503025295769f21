use crate::core::deep_link;
use crate::domain::model::{DeepLink, FareOption, GeoPoint, RankedResult};
use crate::domain::ports::FareSource;
use crate::utils::error::Result;
use chrono::{Local, NaiveDate};

pub struct PriceAggregator<F: FareSource> {
    source: F,
    link_prefix: String,
    default_link: String,
}

impl<F: FareSource> PriceAggregator<F> {
    pub fn new(source: F, link_prefix: impl Into<String>, default_link: impl Into<String>) -> Self {
        Self {
            source,
            link_prefix: link_prefix.into(),
            default_link: default_link.into(),
        }
    }

    /// Cheapest options departing from today.
    pub async fn best_prices(
        &self,
        origin: &GeoPoint,
        destination: &GeoPoint,
    ) -> Result<Vec<RankedResult>> {
        self.best_prices_from(origin, destination, Local::now().date_naive())
            .await
    }

    pub async fn best_prices_from(
        &self,
        origin: &GeoPoint,
        destination: &GeoPoint,
        depart_date: NaiveDate,
    ) -> Result<Vec<RankedResult>> {
        let options = self.source.fares(origin, destination, depart_date).await?;
        Ok(self.rank(origin, destination, options))
    }

    /// 依價格由低到高排序（穩定排序），並為每筆結果建立連結
    pub fn rank(
        &self,
        origin: &GeoPoint,
        destination: &GeoPoint,
        mut options: Vec<FareOption>,
    ) -> Vec<RankedResult> {
        options.sort_by(|a, b| a.price.total_cmp(&b.price));

        options
            .into_iter()
            .map(|option| {
                let deep_link = match deep_link::build(&self.link_prefix, origin, destination, &option) {
                    Ok(link) => DeepLink::Exact(link),
                    Err(e) => {
                        tracing::warn!("failed to get link: {}", e);
                        DeepLink::Fallback(self.default_link.clone())
                    }
                };
                RankedResult { option, deep_link }
            })
            .collect()
    }
}
