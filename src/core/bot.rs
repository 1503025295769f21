use crate::adapters::currency::CurrencyConverter;
use crate::adapters::detect::WhatlangDetector;
use crate::adapters::fares::FareCalendarClient;
use crate::adapters::geocode::AirportResolver;
use crate::adapters::wikidata::WikidataClient;
use crate::config::locale::Locales;
use crate::core::aggregator::PriceAggregator;
use crate::core::formatter::ResultFormatter;
use crate::core::translator::CityTranslator;
use crate::domain::model::{InboundEvent, IncomingMessage, OutgoingMessage};
use crate::domain::ports::{
    AirportLookup, Channel, ConfigProvider, FareSource, KnowledgeBaseClient, LanguageDetector,
    RateSource,
};
use crate::utils::error::{ErrorCategory, Result};
use async_trait::async_trait;
use reqwest::Client;
use std::sync::Arc;
use tracing::{debug, error, info, warn};

const CITY_SEPARATORS: &[&str] = &["->", "→", "—", " - ", ","];

/// 無分隔符時，一個城市名稱最多由幾個詞組成
const MAX_CITY_WORDS: usize = 3;

type Translator = CityTranslator<Box<dyn KnowledgeBaseClient>>;

/// 訊息分派：指令回覆說明文字，其餘文字走查詢流程
pub struct FlightBot {
    airports: Box<dyn AirportLookup>,
    prices: PriceAggregator<Box<dyn FareSource>>,
    rates: Box<dyn RateSource>,
    detector: Box<dyn LanguageDetector>,
    translator: Option<Translator>,
    formatter: ResultFormatter,
    locales: Locales,
    waiting_message: Option<String>,
}

impl FlightBot {
    pub fn new(
        airports: Box<dyn AirportLookup>,
        prices: PriceAggregator<Box<dyn FareSource>>,
        rates: Box<dyn RateSource>,
        detector: Box<dyn LanguageDetector>,
        locales: Locales,
        max_results: usize,
    ) -> Self {
        Self {
            airports,
            prices,
            rates,
            detector,
            translator: None,
            formatter: ResultFormatter::new(max_results),
            locales,
            waiting_message: None,
        }
    }

    pub fn with_translator(mut self, translator: Translator) -> Self {
        self.translator = Some(translator);
        self
    }

    /// Shown while results are formatted, then deleted. Empty text disables it.
    pub fn with_waiting_message(mut self, text: impl Into<String>) -> Self {
        let text = text.into();
        self.waiting_message = (!text.is_empty()).then_some(text);
        self
    }

    pub fn from_config<C: ConfigProvider>(config: &C, client: Client) -> Result<Self> {
        let detector = WhatlangDetector::new(config.languages(), config.default_language())?;
        let fares: Box<dyn FareSource> = Box::new(FareCalendarClient::new(
            client.clone(),
            config.fare_calendar_endpoint(),
        ));

        let bot = Self::new(
            Box::new(AirportResolver::new(
                client.clone(),
                config.airport_suggest_endpoint(),
            )),
            PriceAggregator::new(fares, config.link_prefix(), config.default_link()),
            Box::new(CurrencyConverter::new(
                client.clone(),
                config.currency_rate_endpoint(),
                config.currency_pair(),
            )),
            Box::new(detector),
            config.locales(),
            config.max_results(),
        )
        .with_waiting_message(config.waiting_message());

        if !config.translate_cities() {
            return Ok(bot);
        }

        let knowledge_base: Box<dyn KnowledgeBaseClient> =
            Box::new(WikidataClient::new(client, config.knowledge_base_endpoint()));
        Ok(bot.with_translator(CityTranslator::new(
            knowledge_base,
            config.target_language(),
        )))
    }

    /// Replies for one text message, in sending order. Never empty.
    pub async fn handle(&self, text: &str) -> Vec<String> {
        let mut replies = Vec::new();
        self.process(text, &mut replies).await;
        replies
    }

    /// Answers one inbound event on `channel`, wrapping formatting in the waiting message.
    pub async fn respond(&self, channel: &dyn Channel, incoming: &IncomingMessage) {
        let mut replies = ChatReplies {
            channel,
            chat_id: incoming.chat_id,
            wait_message: None,
        };

        match &incoming.event {
            InboundEvent::UserJoined => {
                debug!("user joined chat {}", incoming.chat_id);
                replies.say(self.locales.fallback().help_text()).await;
            }
            InboundEvent::Text(text) => self.process(text, &mut replies).await,
        }
    }

    async fn process(&self, text: &str, out: &mut dyn Replies) {
        let text = text.trim();

        if let Some(command) = text.strip_prefix('/') {
            let name = command.split(['@', ' ']).next().unwrap_or_default();
            debug!("command /{}", name);
            out.say(self.locales.fallback().help_text()).await;
            return;
        }

        if text.is_empty() {
            out.say(self.locales.fallback().parse_error.clone()).await;
            return;
        }

        let lang = self.detector.detect(text);
        let bundle = self.locales.get(&lang);
        debug!("detected language '{}'", lang);

        let query = self.translate_query(&lang, text).await;

        let (origin, destination) = match self.airports.resolve(&query).await {
            Ok(points) => points,
            Err(e) => {
                let message = match e.category() {
                    ErrorCategory::NotFound => {
                        info!("no airports for '{}': {}", query, e);
                        &bundle.airports_not_found
                    }
                    ErrorCategory::Parse => {
                        error!("unreadable airport data: {}", e);
                        &bundle.response_error
                    }
                    _ => {
                        error!("failed to get src and dst: {}", e);
                        &bundle.airport_data_error
                    }
                };
                out.say(message.clone()).await;
                return;
            }
        };

        out.say(format!(
            "{} ➡️ {}",
            origin.display_name, destination.display_name
        ))
        .await;

        let results = match self.prices.best_prices(&origin, &destination).await {
            Ok(results) => results,
            Err(e) => {
                let message = match e.category() {
                    ErrorCategory::NotFound => &bundle.nothing_found,
                    ErrorCategory::Parse => {
                        error!("unreadable fare calendar: {}", e);
                        &bundle.response_error
                    }
                    _ => {
                        error!("failed to get best prices: {}", e);
                        &bundle.request_error
                    }
                };
                out.say(message.clone()).await;
                return;
            }
        };

        if results.is_empty() {
            out.say(bundle.nothing_found.clone()).await;
            return;
        }

        let degraded = results.iter().filter(|r| r.deep_link.is_degraded()).count();
        info!(
            "{} -> {}: {} options ({} with default link)",
            origin.code,
            destination.code,
            results.len(),
            degraded
        );

        out.say(bundle.results_text(results.len(), self.formatter.max_results()))
            .await;

        if let Some(waiting) = &self.waiting_message {
            out.waiting(waiting).await;
        }
        let rendered = self
            .formatter
            .render(&results, bundle, self.rates.as_ref())
            .await;
        out.done_waiting().await;

        out.say(rendered).await;
    }

    /// 來源語言與知識庫目標語言不同時翻譯城市名稱。查無結果的部分保留原文，
    /// 知識庫本身失敗則整段使用原文
    async fn translate_query(&self, lang: &str, text: &str) -> String {
        let Some(translator) = &self.translator else {
            return text.to_string();
        };
        if translator.target_language() == lang {
            return text.to_string();
        }

        let translated = match split_on_separator(text) {
            Some(parts) => translate_parts(translator, lang, &parts).await,
            None => translate_words(translator, lang, text).await,
        };

        match translated {
            Ok(cities) => cities.join(" "),
            Err(e) => {
                warn!("city translation failed, using original text: {}", e);
                text.to_string()
            }
        }
    }

    /// Feeds every message from `channel` through [`FlightBot::respond`], one task per message.
    pub async fn run(self: Arc<Self>, channel: Arc<dyn Channel>) -> Result<()> {
        let mut rx = channel.start().await?;
        info!("Listening for messages on {}", channel.name());

        while let Some(incoming) = rx.recv().await {
            let bot = Arc::clone(&self);
            let channel = Arc::clone(&channel);

            tokio::spawn(async move {
                debug!(
                    "message from {} in chat {}",
                    incoming.sender_name.as_deref().unwrap_or("unknown"),
                    incoming.chat_id
                );
                bot.respond(channel.as_ref(), &incoming).await;
            });
        }

        info!("{} channel closed", channel.name());
        Ok(())
    }
}

/// 回覆的去處：測試與 [`FlightBot::handle`] 收集成清單，執行時直接送往聊天通道
#[async_trait]
trait Replies: Send {
    async fn say(&mut self, text: String);

    async fn waiting(&mut self, _text: &str) {}

    async fn done_waiting(&mut self) {}
}

#[async_trait]
impl Replies for Vec<String> {
    async fn say(&mut self, text: String) {
        self.push(text);
    }
}

struct ChatReplies<'a> {
    channel: &'a dyn Channel,
    chat_id: i64,
    wait_message: Option<i64>,
}

#[async_trait]
impl<'a> Replies for ChatReplies<'a> {
    async fn say(&mut self, text: String) {
        if text.is_empty() {
            return;
        }
        if let Err(e) = self.channel.send(OutgoingMessage::text(self.chat_id, text)).await {
            error!("failed to send message: {}", e);
        }
    }

    async fn waiting(&mut self, text: &str) {
        let message = OutgoingMessage {
            chat_id: self.chat_id,
            text: text.to_string(),
            link_preview: true,
        };
        match self.channel.send(message).await {
            Ok(id) => self.wait_message = Some(id),
            Err(e) => error!("failed to send wait message: {}", e),
        }
    }

    async fn done_waiting(&mut self) {
        let Some(id) = self.wait_message.take() else {
            return;
        };
        if let Err(e) = self.channel.delete(self.chat_id, id).await {
            error!("failed to delete wait message: {}", e);
        }
    }
}

/// Not-found is `Ok(None)`; any other failure is returned.
async fn lookup(translator: &Translator, lang: &str, city: &str) -> Result<Option<String>> {
    match translator.translate(lang, city).await {
        Ok(name) => Ok(Some(name)),
        Err(e) if e.is_not_found() => {
            debug!("{}", e);
            Ok(None)
        }
        Err(e) => Err(e),
    }
}

async fn translate_parts(translator: &Translator, lang: &str, parts: &[&str]) -> Result<Vec<String>> {
    let mut translated = Vec::with_capacity(parts.len());
    for part in parts {
        let name = lookup(translator, lang, part).await?;
        translated.push(name.unwrap_or_else(|| part.to_string()));
    }
    Ok(translated)
}

/// 沒有分隔符時從左到右先試最長的詞組："new york london" → "New York London"、"New York"、"London"
async fn translate_words(translator: &Translator, lang: &str, text: &str) -> Result<Vec<String>> {
    let words: Vec<&str> = text.split_whitespace().collect();
    let mut translated = Vec::new();
    let mut start = 0;

    while start < words.len() {
        let longest = MAX_CITY_WORDS.min(words.len() - start);
        let mut matched = None;

        for len in (1..=longest).rev() {
            let group = words[start..start + len].join(" ");
            if let Some(name) = lookup(translator, lang, &group).await? {
                matched = Some((name, len));
                break;
            }
        }

        match matched {
            Some((name, len)) => {
                translated.push(name);
                start += len;
            }
            None => {
                translated.push(words[start].to_string());
                start += 1;
            }
        }
    }
    Ok(translated)
}

/// Parts split on the first explicit separator, `None` when there is none.
fn split_on_separator(text: &str) -> Option<Vec<&str>> {
    let sep = CITY_SEPARATORS.iter().find(|sep| text.contains(**sep))?;
    Some(
        text.split(*sep)
            .map(str::trim)
            .filter(|part| !part.is_empty())
            .collect(),
    )
}
