//! Message lookup with `en-US` fallback.

use crate::bundle::MessageBundle;
use crate::locale::{embedded_resource, fallback_locale, parse_locale};
use carevis_common::{CarevisError, Result};
use fluent_bundle::FluentArgs;
use tracing::{info, warn};
use unic_langid::LanguageIdentifier;

/// Resolves message ids to localized text.
#[derive(Debug)]
pub struct Localizer {
    primary: MessageBundle,
    fallback: Option<MessageBundle>,
}

impl Localizer {
    /// Creates a localizer for `locale`.
    ///
    /// An unparseable locale, or one without embedded messages, falls back
    /// to `en-US` with a warning.
    pub fn new(locale: &str) -> Result<Self> {
        let requested = parse_locale(locale).unwrap_or_else(|error| {
            warn!(locale, %error, "Unparseable locale, using en-US");
            fallback_locale()
        });

        let english = || -> Result<MessageBundle> {
            let (id, source) = embedded_resource(&fallback_locale())
                .ok_or_else(|| CarevisError::localization("en-US messages are missing"))?;
            MessageBundle::from_source(id, source)
        };

        let Some((resolved, source)) = embedded_resource(&requested) else {
            warn!(locale = %requested, "No messages for locale, using en-US");
            return Ok(Self {
                primary: english()?,
                fallback: None,
            });
        };

        let fallback = if resolved == fallback_locale() {
            None
        } else {
            Some(english()?)
        };
        let primary = MessageBundle::from_source(resolved, source)?;
        info!(locale = %primary.locale(), "Localizer ready");

        Ok(Self { primary, fallback })
    }

    /// Locale messages are resolved in first.
    pub const fn locale(&self) -> &LanguageIdentifier {
        self.primary.locale()
    }

    /// Whether `id` resolves in either bundle.
    pub fn has_message(&self, id: &str) -> bool {
        self.primary.has_message(id)
            || self
                .fallback
                .as_ref()
                .is_some_and(|bundle| bundle.has_message(id))
    }

    /// Text of message `id`.
    pub fn text(&self, id: &str) -> String {
        self.resolve(id, None)
    }

    /// Text of message `id` formatted with `args`.
    pub fn text_with(&self, id: &str, args: &FluentArgs<'_>) -> String {
        self.resolve(id, Some(args))
    }

    fn resolve(&self, id: &str, args: Option<&FluentArgs<'_>>) -> String {
        if let Some(text) = self.primary.format(id, args) {
            return text;
        }
        if let Some(fallback) = &self.fallback {
            if let Some(text) = fallback.format(id, args) {
                warn!(
                    message = id,
                    locale = %self.primary.locale(),
                    "Message missing, using en-US"
                );
                return text;
            }
        }
        warn!(message = id, "Unknown message id");
        id.to_string()
    }
}
