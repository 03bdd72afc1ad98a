use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// The closed set of locales every menu is rendered in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Locale {
    Az,
    Ru,
    En,
}

impl Locale {
    pub const ALL: [Locale; 3] = [Locale::Az, Locale::Ru, Locale::En];

    pub fn code(self) -> &'static str {
        match self {
            Locale::Az => "az",
            Locale::Ru => "ru",
            Locale::En => "en",
        }
    }
}

impl fmt::Display for Locale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for Locale {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "az" => Ok(Locale::Az),
            "ru" => Ok(Locale::Ru),
            "en" => Ok(Locale::En),
            other => Err(format!("unsupported locale '{other}' (expected az, ru or en)")),
        }
    }
}

/// Display text of a node in every supported locale.
///
/// One field per locale, so a label missing a translation cannot be built
/// or deserialized.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Labels {
    pub az: String,
    pub ru: String,
    pub en: String,
}

impl Labels {
    pub fn new(az: impl Into<String>, ru: impl Into<String>, en: impl Into<String>) -> Self {
        Self {
            az: az.into(),
            ru: ru.into(),
            en: en.into(),
        }
    }

    pub fn get(&self, locale: Locale) -> &str {
        match locale {
            Locale::Az => &self.az,
            Locale::Ru => &self.ru,
            Locale::En => &self.en,
        }
    }
}

// ---------------------------------------------------------------------------
// Fixed engine strings
// ---------------------------------------------------------------------------

/// Strings the engine itself emits, independent of any catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phrase {
    /// Footer of a non-root menu.
    Back,
    /// Footer of the root menu.
    Exit,
    /// Footer under an action or input result.
    ResultFooter,
    InvalidChoice,
    SessionEnded,
    ServiceError,
    SessionExpired,
}

impl Phrase {
    pub fn text(self, locale: Locale) -> &'static str {
        use Locale::*;
        use Phrase::*;
        match (self, locale) {
            (Back | ResultFooter, Az) => "0 - Geri",
            (Back | ResultFooter, Ru) => "0 - Назад",
            (Back | ResultFooter, En) => "0 - Back",

            (Exit, Az) => "0 - Çıxış",
            (Exit, Ru) => "0 - Выход",
            (Exit, En) => "0 - Exit",

            (InvalidChoice, Az) => "Yanlış seçim!",
            (InvalidChoice, Ru) => "Неверный выбор!",
            (InvalidChoice, En) => "Invalid choice!",

            (SessionEnded, Az) => "Sessiya bitdi",
            (SessionEnded, Ru) => "Сессия завершена",
            (SessionEnded, En) => "Session ended",

            (ServiceError, Az) => "Xidmət müvəqqəti əlçatan deyil. Sonra yenidən cəhd edin.",
            (ServiceError, Ru) => "Сервис временно недоступен. Попробуйте позже.",
            (ServiceError, En) => "Service temporarily unavailable. Please try again later.",

            (SessionExpired, Az) => "Sessiyanın vaxtı bitdi. Kodu yenidən yığın.",
            (SessionExpired, Ru) => "Время сессии истекло. Наберите код снова.",
            (SessionExpired, En) => "Session expired. Please dial again.",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_locale_codes() {
        assert_eq!("AZ".parse::<Locale>().unwrap(), Locale::Az);
        assert_eq!(" ru ".parse::<Locale>().unwrap(), Locale::Ru);
        assert!("de".parse::<Locale>().is_err());
    }

    #[test]
    fn labels_require_every_locale() {
        let ok: Labels =
            serde_json::from_str(r#"{"az": "Balans", "ru": "Баланс", "en": "Balance"}"#).unwrap();
        assert_eq!(ok.get(Locale::Ru), "Баланс");

        let missing = serde_json::from_str::<Labels>(r#"{"az": "Balans", "en": "Balance"}"#);
        assert!(missing.is_err());
    }

    #[test]
    fn every_phrase_is_translated() {
        let phrases = [
            Phrase::Back,
            Phrase::Exit,
            Phrase::ResultFooter,
            Phrase::InvalidChoice,
            Phrase::SessionEnded,
            Phrase::ServiceError,
            Phrase::SessionExpired,
        ];
        for phrase in phrases {
            for locale in Locale::ALL {
                assert!(!phrase.text(locale).is_empty());
            }
        }
        assert!(Phrase::Exit.text(Locale::Az).starts_with("0 - "));
    }
}
