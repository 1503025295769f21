use crate::domain::ports::LanguageDetector;
use crate::utils::error::{FlightsError, Result};
use whatlang::{Detector, Lang};

/// Statistical detection restricted to an allowlist of two-letter tags.
pub struct WhatlangDetector {
    detector: Detector,
    default_tag: String,
}

impl WhatlangDetector {
    pub fn new(tags: &[String], default_tag: impl Into<String>) -> Result<Self> {
        let allowlist = tags
            .iter()
            .map(|tag| {
                lang_for_tag(tag).ok_or_else(|| FlightsError::InvalidConfigValueError {
                    field: "bot.languages".to_string(),
                    value: tag.clone(),
                    reason: "Language detection does not support this tag".to_string(),
                })
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Self {
            detector: Detector::with_allowlist(allowlist),
            default_tag: default_tag.into(),
        })
    }
}

impl LanguageDetector for WhatlangDetector {
    fn detect(&self, text: &str) -> String {
        match self.detector.detect(text).and_then(|info| tag_for_lang(info.lang())) {
            Some(tag) => tag.to_string(),
            None => {
                tracing::debug!("No language match, using '{}'", self.default_tag);
                self.default_tag.clone()
            }
        }
    }
}

const TAGS: &[(&str, Lang)] = &[
    ("en", Lang::Eng),
    ("ru", Lang::Rus),
    ("uk", Lang::Ukr),
    ("de", Lang::Deu),
    ("fr", Lang::Fra),
    ("es", Lang::Spa),
    ("it", Lang::Ita),
    ("pt", Lang::Por),
    ("pl", Lang::Pol),
];

fn lang_for_tag(tag: &str) -> Option<Lang> {
    TAGS.iter().find(|(t, _)| *t == tag).map(|(_, lang)| *lang)
}

fn tag_for_lang(lang: Lang) -> Option<&'static str> {
    TAGS.iter().find(|(_, l)| *l == lang).map(|(tag, _)| *tag)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn detector() -> WhatlangDetector {
        WhatlangDetector::new(&["en".to_string(), "ru".to_string()], "en").unwrap()
    }

    #[test]
    fn test_detects_whitelisted_languages() {
        let detector = detector();
        assert_eq!(detector.detect("Из Киева в Таллин, пожалуйста"), "ru");
        assert_eq!(detector.detect("From Kiev to Tallinn, please"), "en");
    }

    #[test]
    fn test_always_returns_whitelisted_tag() {
        let detector = detector();
        for text in ["Von Berlin nach Paris bitte", "12345", "?!", "東京 大阪"] {
            let tag = detector.detect(text);
            assert!(tag == "en" || tag == "ru", "unexpected tag {tag} for {text}");
        }
    }

    #[test]
    fn test_custom_allowlist_never_leaks_other_tags() {
        let detector =
            WhatlangDetector::new(&["uk".to_string(), "de".to_string()], "de").unwrap();
        assert_eq!(detector.detect("Ich fahre morgen von Berlin nach München"), "de");
        assert_eq!(detector.detect("Привіт, я їду з Києва до Львова через тиждень"), "uk");

        // ru 與 en 不在清單內
        for text in ["Из Москвы в Санкт-Петербург", "From London to Paris", "12345"] {
            let tag = detector.detect(text);
            assert!(tag == "uk" || tag == "de", "unexpected tag {tag} for {text}");
        }
    }

    #[test]
    fn test_unsupported_tag_rejected() {
        assert!(WhatlangDetector::new(&["xx".to_string()], "en").is_err());
    }
}
