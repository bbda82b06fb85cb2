use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Locale {
    De,
    En,
}

/// Locale used whenever a text has no entry for the requested one.
pub const FALLBACK_LOCALE: Locale = Locale::De;

pub const ALL_LOCALES: [Locale; 2] = [Locale::De, Locale::En];

impl Locale {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::De => "de",
            Self::En => "en",
        }
    }

    /// Accepts bare language codes as well as region-tagged ones (`de-DE`, `en_US`).
    pub fn parse(raw: &str) -> Result<Self, String> {
        let normalized = raw.trim().to_ascii_lowercase();
        let language = normalized
            .split(['-', '_'])
            .next()
            .unwrap_or_default();
        match language {
            "de" => Ok(Self::De),
            "en" => Ok(Self::En),
            _ => Err("locale must be one of: de, en".to_string()),
        }
    }
}

impl Default for Locale {
    fn default() -> Self {
        FALLBACK_LOCALE
    }
}

impl std::fmt::Display for Locale {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl<'de> Deserialize<'de> for Locale {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        Self::parse(&raw).map_err(|err| D::Error::custom(format!("invalid locale `{raw}`: {err}")))
    }
}

/// Display text keyed by locale.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LocalizedText(BTreeMap<Locale, String>);

impl LocalizedText {
    pub fn new(de: impl Into<String>, en: impl Into<String>) -> Self {
        Self(BTreeMap::from_iter([
            (Locale::De, de.into()),
            (Locale::En, en.into()),
        ]))
    }

    pub fn single(locale: Locale, text: impl Into<String>) -> Self {
        Self(BTreeMap::from_iter([(locale, text.into())]))
    }

    pub fn get(&self, locale: Locale) -> Option<&str> {
        self.0
            .get(&locale)
            .map(String::as_str)
            .filter(|text| !text.trim().is_empty())
    }

    /// Requested locale, then [`FALLBACK_LOCALE`], then any entry, then "".
    pub fn resolve(&self, locale: Locale) -> &str {
        self.get(locale)
            .or_else(|| self.get(FALLBACK_LOCALE))
            .or_else(|| self.0.values().map(String::as_str).find(|t| !t.trim().is_empty()))
            .unwrap_or_default()
    }

    pub fn is_empty(&self) -> bool {
        self.0.values().all(|text| text.trim().is_empty())
    }
}
