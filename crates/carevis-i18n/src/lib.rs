//! # Carevis I18n
//!
//! Localization of the dashboard's menu labels, chart text, and notices
//! using the Fluent localization system.
//!
//! Message resources are embedded at compile time. A [`Localizer`] resolves
//! a message in the requested locale first and in `en-US` second.
//!
//! ```rust
//! use carevis_i18n::{fluent_args, Localizer};
//!
//! # fn example() -> carevis_common::Result<()> {
//! let localizer = Localizer::new("en-US")?;
//! let title = localizer.text_with("title-family-services", &fluent_args(&[
//!     ("limit", 5u32.into()),
//!     ("family", 3u32.into()),
//! ]));
//! assert_eq!(title, "Top 5 Services for Family 3");
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![allow(clippy::module_name_repetitions)]

pub mod bundle;
pub mod locale;
pub mod localizer;

pub use bundle::{fluent_args, MessageBundle};
pub use locale::{available_locales, fallback_locale, parse_locale, FALLBACK_LOCALE};
pub use localizer::Localizer;

// Re-export the Fluent argument types used by callers
pub use fluent_bundle::{FluentArgs, FluentValue};
