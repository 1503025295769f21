use crate::domain::ports::KnowledgeBaseClient;
use crate::utils::error::{FlightsError, Result};

/// City names translated through the knowledge base. Every call queries it again.
pub struct CityTranslator<K: KnowledgeBaseClient> {
    client: K,
    target_language: String,
}

impl<K: KnowledgeBaseClient> CityTranslator<K> {
    pub fn new(client: K, target_language: impl Into<String>) -> Self {
        Self {
            client,
            target_language: target_language.into(),
        }
    }

    pub fn target_language(&self) -> &str {
        &self.target_language
    }

    /// 以來源語言的名稱查詢對應 target 語言維基百科文章的標籤
    pub async fn translate(&self, source_language: &str, city: &str) -> Result<String> {
        let query = self.query(source_language, city);
        let csv_body = self.client.select_csv(&query).await?;

        match first_label(&csv_body)? {
            Some(label) => {
                tracing::debug!("Translated '{}' ({}) -> '{}'", city, source_language, label);
                Ok(label)
            }
            None => Err(FlightsError::TranslationNotFound {
                city: city.to_string(),
            }),
        }
    }

    pub fn query(&self, source_language: &str, city: &str) -> String {
        let label = escape_literal(&title_case(city.trim()));
        let source = source_language.to_lowercase();
        let target = &self.target_language;

        format!(
            r#"
SELECT DISTINCT ?itemLabel
WHERE {{
  ?item ?label "{label}"@{source} .
  ?article schema:about ?item .
  ?article schema:inLanguage "{target}" .
  ?article schema:isPartOf <https://{target}.wikipedia.org/> .
  SERVICE wikibase:label {{ bd:serviceParam wikibase:language "{target}". }}
}}
LIMIT 1
"#
        )
    }
}

/// Single-column CSV: header row, then at most one value row.
fn first_label(csv_body: &str) -> Result<Option<String>> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(csv_body.as_bytes());

    for record in reader.records() {
        let record = record?;
        if let Some(value) = record.get(0).map(str::trim).filter(|v| !v.is_empty()) {
            return Ok(Some(value.to_string()));
        }
    }
    Ok(None)
}

/// "rostov-on-don" / "ROSTOV-ON-DON" → "Rostov-On-Don"
fn title_case(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut at_word_start = true;
    for ch in s.chars() {
        if at_word_start {
            out.extend(ch.to_uppercase());
        } else {
            out.extend(ch.to_lowercase());
        }
        at_word_start = ch.is_whitespace() || ch == '-';
    }
    out
}

fn escape_literal(s: &str) -> String {
    s.replace('\\', "\\\\").replace('"', "\\\"")
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::collections::HashMap;
    use std::sync::Mutex;

    /// 依查詢中的英文標籤回傳固定的 CSV
    struct CannedKnowledgeBase {
        answers: HashMap<&'static str, &'static str>,
        queries: Mutex<Vec<String>>,
    }

    impl CannedKnowledgeBase {
        fn new() -> Self {
            Self {
                answers: HashMap::from([
                    ("\"New York\"@en", "itemLabel\r\nНью-Йорк\r\n"),
                    ("\"Kiev\"@en", "itemLabel\r\nКиев\r\n"),
                ]),
                queries: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl KnowledgeBaseClient for CannedKnowledgeBase {
        async fn select_csv(&self, query: &str) -> Result<String> {
            self.queries.lock().unwrap().push(query.to_string());
            let body = self
                .answers
                .iter()
                .find(|(needle, _)| query.contains(*needle))
                .map(|(_, csv)| csv.to_string())
                .unwrap_or_else(|| "itemLabel\r\n".to_string());
            Ok(body)
        }
    }

    #[tokio::test]
    async fn test_translate_known_cities() {
        let translator = CityTranslator::new(CannedKnowledgeBase::new(), "ru");

        for (src, expected) in [("new york", "Нью-Йорк"), ("kiev", "Киев"), ("KIEV", "Киев")] {
            let actual = translator.translate("en", src).await.unwrap();
            assert_eq!(actual.to_lowercase(), expected.to_lowercase());
        }
    }

    #[tokio::test]
    async fn test_translate_not_found() {
        let translator = CityTranslator::new(CannedKnowledgeBase::new(), "ru");
        let err = translator.translate("en", "shoshosho").await.unwrap_err();

        assert!(matches!(err, FlightsError::TranslationNotFound { ref city } if city == "shoshosho"));
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn test_translate_requeries_every_time() {
        let translator = CityTranslator::new(CannedKnowledgeBase::new(), "ru");
        translator.translate("en", "kiev").await.unwrap();
        translator.translate("en", "kiev").await.unwrap();
        assert_eq!(translator.client.queries.lock().unwrap().len(), 2);
    }

    #[test]
    fn test_query_shape() {
        let translator = CityTranslator::new(CannedKnowledgeBase::new(), "ru");
        let query = translator.query("EN", "rostov-on-don");

        assert!(query.contains("\"Rostov-On-Don\"@en"));
        assert!(query.contains("schema:inLanguage \"ru\""));
        assert!(query.contains("<https://ru.wikipedia.org/>"));
        assert!(query.contains("LIMIT 1"));
    }

    #[test]
    fn test_query_escapes_quotes() {
        let translator = CityTranslator::new(CannedKnowledgeBase::new(), "ru");
        let query = translator.query("en", "a\"b");
        assert!(query.contains("\"A\\\"b\"@en"));
    }

    #[test]
    fn test_first_label() {
        assert_eq!(first_label("itemLabel\r\nКиев\r\n").unwrap().as_deref(), Some("Киев"));
        assert_eq!(first_label("itemLabel\nНью-Йорк\n").unwrap().as_deref(), Some("Нью-Йорк"));
        assert_eq!(first_label("itemLabel\r\n").unwrap(), None);
        assert_eq!(first_label("").unwrap(), None);
        assert_eq!(
            first_label("itemLabel\r\n\"Ростов-на-Дону\"\r\n").unwrap().as_deref(),
            Some("Ростов-на-Дону")
        );
    }
}
