//! Target languages accepted by the translation service

use shared::models::Language;
use shared::store::TranslationError;

pub const SUPPORTED_LANGUAGES: &[Language] = &[
    Language { code: "BG", name: "Bulgarian" },
    Language { code: "CS", name: "Czech" },
    Language { code: "DA", name: "Danish" },
    Language { code: "DE", name: "German" },
    Language { code: "EL", name: "Greek" },
    Language { code: "EN", name: "English" },
    Language { code: "ES", name: "Spanish" },
    Language { code: "ET", name: "Estonian" },
    Language { code: "FI", name: "Finnish" },
    Language { code: "FR", name: "French" },
    Language { code: "HU", name: "Hungarian" },
    Language { code: "ID", name: "Indonesian" },
    Language { code: "IT", name: "Italian" },
    Language { code: "JA", name: "Japanese" },
    Language { code: "KO", name: "Korean" },
    Language { code: "LT", name: "Lithuanian" },
    Language { code: "LV", name: "Latvian" },
    Language { code: "NB", name: "Norwegian" },
    Language { code: "NL", name: "Dutch" },
    Language { code: "PL", name: "Polish" },
    Language { code: "PT", name: "Portuguese" },
    Language { code: "RO", name: "Romanian" },
    Language { code: "RU", name: "Russian" },
    Language { code: "SK", name: "Slovak" },
    Language { code: "SL", name: "Slovenian" },
    Language { code: "SV", name: "Swedish" },
    Language { code: "TR", name: "Turkish" },
    Language { code: "UK", name: "Ukrainian" },
    Language { code: "ZH", name: "Chinese" },
];

/// Normalize a language code to upper case and check it is supported
pub fn validate_language(code: &str) -> Result<&'static Language, TranslationError> {
    let upper = code.trim().to_ascii_uppercase();
    SUPPORTED_LANGUAGES
        .iter()
        .find(|l| l.code == upper)
        .ok_or(TranslationError::UnsupportedLanguage(upper))
}
