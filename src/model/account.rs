use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Rotating hero titles used when the backend provides none.
pub const DEFAULT_TYPEWRITER_WORDS: [&str; 4] = [
    "Software Engineer",
    "Michigan Wolverine",
    "Problem Solver",
    "Builder",
];

/// Portrait shown in the about section when the backend provides none.
pub const DEFAULT_PORTRAIT: &str = "./photo1.jpeg";

/// Owner identity and social links shown in the hero section.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AccountSettings {
    pub name: Option<String>,
    pub email: Option<String>,
    pub linkedin: Option<String>,
    pub github: Option<String>,
    /// Comma-separated list, e.g. `"Engineer, Builder"`.
    pub typewriter_words: Option<String>,
}

impl AccountSettings {
    /// Hero titles, trimmed, falling back to [`DEFAULT_TYPEWRITER_WORDS`].
    pub fn typewriter_words(&self) -> Vec<String> {
        match self.typewriter_words.as_deref() {
            Some(words) if !words.is_empty() => {
                words.split(',').map(|word| word.trim().to_string()).collect()
            }
            _ => DEFAULT_TYPEWRITER_WORDS.iter().map(|w| w.to_string()).collect(),
        }
    }

    pub fn mailto(&self) -> Option<String> {
        self.email.as_ref().map(|email| format!("mailto:{email}"))
    }
}

/// The about-me blurb.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AboutMe {
    pub text: Option<String>,
    pub logo: Option<String>,
}

impl AboutMe {
    pub fn portrait(&self) -> &str {
        self.logo.as_deref().unwrap_or(DEFAULT_PORTRAIT)
    }
}

/// The backend serves singletons as one-element arrays. Takes the first
/// element, or `None` for an empty array.
pub fn first_or_none<T: DeserializeOwned>(raw: Value) -> Result<Option<T>, String> {
    let items: Vec<Value> = serde_json::from_value(raw).map_err(|e| e.to_string())?;
    items
        .into_iter()
        .next()
        .map(|first| serde_json::from_value(first).map_err(|e| e.to_string()))
        .transpose()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_typewriter_words_are_split_and_trimmed() {
        let settings = AccountSettings {
            typewriter_words: Some("Engineer ,  Builder,Gamer".into()),
            ..Default::default()
        };
        assert_eq!(settings.typewriter_words(), vec!["Engineer", "Builder", "Gamer"]);
    }

    #[test]
    fn test_typewriter_words_default_when_missing_or_empty() {
        let missing = AccountSettings::default();
        let empty = AccountSettings {
            typewriter_words: Some(String::new()),
            ..Default::default()
        };
        assert_eq!(missing.typewriter_words(), DEFAULT_TYPEWRITER_WORDS);
        assert_eq!(empty.typewriter_words(), DEFAULT_TYPEWRITER_WORDS);
    }

    #[test]
    fn test_first_or_none_takes_first_element() {
        let raw = json!([
            { "name": "Ada", "typewriterWords": "Engineer" },
            { "name": "Second" }
        ]);
        let settings: Option<AccountSettings> = first_or_none(raw).unwrap();
        let settings = settings.unwrap();
        assert_eq!(settings.name.as_deref(), Some("Ada"));
        assert_eq!(settings.typewriter_words.as_deref(), Some("Engineer"));
    }

    #[test]
    fn test_first_or_none_on_empty_array() {
        let about: Option<AboutMe> = first_or_none(json!([])).unwrap();
        assert_eq!(about, None);
    }

    #[test]
    fn test_first_or_none_rejects_objects() {
        assert!(first_or_none::<AboutMe>(json!({ "text": "hi" })).is_err());
    }

    #[test]
    fn test_portrait_fallback() {
        assert_eq!(AboutMe::default().portrait(), DEFAULT_PORTRAIT);
    }
}
