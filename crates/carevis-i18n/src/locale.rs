//! Embedded message resources and locale resolution.

use carevis_common::{CarevisError, Result};
use unic_langid::{langid, LanguageIdentifier};

/// Locale used when the requested one has no resource.
pub const FALLBACK_LOCALE: &str = "en-US";

const RESOURCES: &[(&str, &str)] = &[("en-US", include_str!("../locales/en-US/main.ftl"))];

/// The fallback locale as a language identifier.
pub fn fallback_locale() -> LanguageIdentifier {
    langid!("en-US")
}

/// Codes of the locales with an embedded resource.
pub fn available_locales() -> impl Iterator<Item = &'static str> {
    RESOURCES.iter().map(|(code, _)| *code)
}

/// Parses a locale code such as `en-US`.
pub fn parse_locale(code: &str) -> Result<LanguageIdentifier> {
    code.parse().map_err(|error| {
        CarevisError::localization_with_locale(format!("invalid locale code: {error}"), code)
    })
}

/// Embedded resource for `locale`.
///
/// An exact match wins; otherwise the first resource of the same language
/// is used, so `en` and `en-GB` both resolve to `en-US`.
pub(crate) fn embedded_resource(
    locale: &LanguageIdentifier,
) -> Option<(LanguageIdentifier, &'static str)> {
    let parsed = || {
        RESOURCES.iter().filter_map(|(code, source)| {
            code.parse::<LanguageIdentifier>()
                .ok()
                .map(|id| (id, *source))
        })
    };

    parsed()
        .find(|(id, _)| id == locale)
        .or_else(|| parsed().find(|(id, _)| id.language == locale.language))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fallback_is_embedded() {
        assert!(available_locales().any(|code| code == FALLBACK_LOCALE));
        assert_eq!(fallback_locale().to_string(), FALLBACK_LOCALE);
    }

    #[test]
    fn test_parse_locale() {
        assert_eq!(parse_locale("en-US").unwrap(), fallback_locale());
        assert!(matches!(
            parse_locale("not a locale!"),
            Err(CarevisError::Localization { locale: Some(_), .. })
        ));
    }

    #[test]
    fn test_embedded_resource_matches_language() {
        let (id, source) = embedded_resource(&langid!("en-GB")).unwrap();
        assert_eq!(id, fallback_locale());
        assert!(source.contains("notice-no-data"));

        assert!(embedded_resource(&langid!("en")).is_some());
        assert!(embedded_resource(&langid!("ar-LB")).is_none());
    }
}
