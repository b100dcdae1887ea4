//! Integration tests for carevis-i18n crate.
//!
//! These tests check that the embedded messages cover everything the
//! dashboard asks for.

use carevis_common::test_utils::init_test_logging;
use carevis_i18n::{fluent_args, Localizer};

const DASHBOARD_MESSAGES: &[&str] = &[
    "app-title",
    "menu-prompt",
    "menu-service-by-sex",
    "menu-average-age",
    "menu-age-distribution",
    "menu-clinic-map",
    "menu-family-services",
    "menu-seasonal-services",
    "select-service",
    "select-nationality",
    "select-family",
    "options-services",
    "options-nationalities",
    "options-family-range",
    "title-service-by-sex",
    "title-average-age",
    "title-age-distribution",
    "title-clinic-map",
    "title-family-services",
    "title-seasonal-services",
    "axis-count",
    "axis-service",
    "axis-average-age",
    "axis-age",
    "axis-longitude",
    "axis-latitude",
    "season-winter",
    "season-spring",
    "season-summer",
    "season-fall",
    "season-unknown",
    "notice-no-data",
    "notice-no-family-data",
    "notice-written",
];

#[test]
fn test_all_dashboard_messages_exist() {
    init_test_logging();
    let localizer = Localizer::new("en-US").unwrap();

    for id in DASHBOARD_MESSAGES {
        assert!(localizer.has_message(id), "message '{id}' is missing");
    }
}

#[test]
fn test_numeric_arguments() {
    let localizer = Localizer::new("en-US").unwrap();

    let args = fluent_args(&[("limit", 5usize.into()), ("family", 3u32.into())]);
    assert_eq!(
        localizer.text_with("title-family-services", &args),
        "Top 5 Services for Family 3"
    );

    let args = fluent_args(&[("limit", 5usize.into())]);
    assert_eq!(
        localizer.text_with("menu-clinic-map", &args),
        "Top 5 Services in South Lebanon (Map)"
    );

    let args = fluent_args(&[("min", 0u32.into()), ("max", 10u32.into())]);
    assert_eq!(
        localizer.text_with("options-family-range", &args),
        "Family numbers 0 to 10"
    );
}

#[test]
fn test_language_only_locale_resolves() {
    let localizer = Localizer::new("en").unwrap();
    assert_eq!(localizer.locale().to_string(), "en-US");
    assert_eq!(localizer.text("menu-prompt"), "Choose a Visualization");
}
