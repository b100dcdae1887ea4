//! A single-locale Fluent bundle.

use carevis_common::{CarevisError, Result};
use fluent_bundle::{FluentArgs, FluentBundle, FluentResource, FluentValue};
use std::fmt;
use tracing::{debug, warn};
use unic_langid::LanguageIdentifier;

/// Messages of one locale.
pub struct MessageBundle {
    locale: LanguageIdentifier,
    bundle: FluentBundle<FluentResource>,
}

impl fmt::Debug for MessageBundle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MessageBundle")
            .field("locale", &self.locale.to_string())
            .finish_non_exhaustive()
    }
}

impl MessageBundle {
    /// Parses Fluent `source` into a bundle for `locale`.
    pub fn from_source(locale: LanguageIdentifier, source: &str) -> Result<Self> {
        let code = locale.to_string();
        let resource = FluentResource::try_new(source.to_string()).map_err(|(_, errors)| {
            CarevisError::localization_with_locale(
                format!("failed to parse messages: {errors:?}"),
                code.as_str(),
            )
        })?;

        let mut bundle = FluentBundle::new(vec![locale.clone()]);
        // Plain output, no Unicode isolation marks around arguments
        bundle.set_use_isolating(false);
        bundle.add_resource(resource).map_err(|errors| {
            CarevisError::localization_with_locale(
                format!("duplicate messages: {errors:?}"),
                code.as_str(),
            )
        })?;

        debug!(locale = %code, "Loaded message bundle");
        Ok(Self { locale, bundle })
    }

    /// Locale of the bundle.
    pub const fn locale(&self) -> &LanguageIdentifier {
        &self.locale
    }

    /// Whether the bundle has a message with a value for `id`.
    pub fn has_message(&self, id: &str) -> bool {
        self.bundle
            .get_message(id)
            .is_some_and(|message| message.value().is_some())
    }

    /// Formats message `id`, or `None` if the bundle lacks it.
    ///
    /// Formatting errors such as a missing argument are logged; Fluent
    /// leaves a placeholder in the output for them.
    pub fn format(&self, id: &str, args: Option<&FluentArgs<'_>>) -> Option<String> {
        let pattern = self.bundle.get_message(id)?.value()?;
        let mut errors = Vec::new();
        let text = self.bundle.format_pattern(pattern, args, &mut errors);
        if !errors.is_empty() {
            warn!(message = id, ?errors, "Formatting errors in message");
        }
        Some(text.into_owned())
    }
}

/// Builds Fluent arguments from key-value pairs.
pub fn fluent_args<'a>(args: &[(&'a str, FluentValue<'a>)]) -> FluentArgs<'a> {
    let mut fluent_args = FluentArgs::new();
    for (key, value) in args {
        fluent_args.set(*key, value.clone());
    }
    fluent_args
}

#[cfg(test)]
mod tests {
    use super::*;
    use unic_langid::langid;

    const SOURCE: &str = "greeting = Hello { $name }\nplain = Plain text\n";

    #[test]
    fn test_format_with_args() {
        let bundle = MessageBundle::from_source(langid!("en-US"), SOURCE).unwrap();
        let args = fluent_args(&[("name", "Tyre".into())]);

        assert_eq!(bundle.format("greeting", Some(&args)).as_deref(), Some("Hello Tyre"));
        assert_eq!(bundle.format("plain", None).as_deref(), Some("Plain text"));
        assert!(bundle.format("absent", None).is_none());
    }

    #[test]
    fn test_missing_argument_still_formats() {
        let bundle = MessageBundle::from_source(langid!("en-US"), SOURCE).unwrap();
        let text = bundle.format("greeting", None).unwrap();
        assert!(text.starts_with("Hello "));
    }

    #[test]
    fn test_has_message() {
        let bundle = MessageBundle::from_source(langid!("en-US"), SOURCE).unwrap();
        assert!(bundle.has_message("plain"));
        assert!(!bundle.has_message("absent"));
    }

    #[test]
    fn test_invalid_source_is_rejected() {
        let result = MessageBundle::from_source(langid!("en-US"), "= no identifier");
        assert!(matches!(result, Err(CarevisError::Localization { .. })));
    }

    #[test]
    fn test_duplicate_messages_are_rejected() {
        let result = MessageBundle::from_source(langid!("en-US"), "a = one\na = two\n");
        assert!(result.is_err());
    }
}
