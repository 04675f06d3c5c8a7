//! Watermark text from a capture timestamp.

use chrono::{Locale, NaiveDateTime};

/// Day, full month name, year, 24-hour time: `17 May 2023, 14:30`.
const WATERMARK_PATTERN: &str = "%d %B %Y, %H:%M";

const LOCALE_VARS: [&str; 3] = ["LC_ALL", "LC_TIME", "LANG"];

/// Turns a capture timestamp into display text.
///
/// The rest of the pipeline only sees this trait, so the locale backend can
/// be swapped freely.
pub trait DateFormatter {
    fn format(&self, timestamp: &NaiveDateTime) -> String;
}

/// Formats with chrono's built-in locale tables.
#[derive(Debug, Clone, Copy)]
pub struct LocaleFormatter {
    locale: Locale,
}

impl LocaleFormatter {
    pub fn new(locale: Locale) -> Self {
        Self { locale }
    }

    /// Pick the locale from `LC_ALL`, `LC_TIME` or `LANG`, in that order.
    ///
    /// Unknown locales fall back to POSIX (English month names) with a warning.
    pub fn from_env() -> Self {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// [`from_env`](Self::from_env) with a custom variable lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let name = LOCALE_VARS
            .iter()
            .filter_map(|var| lookup(*var))
            .find(|value| !value.is_empty())
            .unwrap_or_default();

        match resolve_locale(&name) {
            Some(locale) => {
                log::debug!("Using locale {locale:?} for dates");
                Self::new(locale)
            }
            None => {
                log::warn!("Could not set locale '{name}'. Defaulting to system standard.");
                Self::new(Locale::POSIX)
            }
        }
    }

    pub fn locale(&self) -> Locale {
        self.locale
    }
}

impl Default for LocaleFormatter {
    fn default() -> Self {
        Self::new(Locale::POSIX)
    }
}

impl DateFormatter for LocaleFormatter {
    fn format(&self, timestamp: &NaiveDateTime) -> String {
        // Taken as-is: the UTC wrapper applies no offset.
        timestamp
            .and_utc()
            .format_localized(WATERMARK_PATTERN, self.locale)
            .to_string()
    }
}

/// Watermark text for an optional timestamp. Empty means "do not watermark".
pub fn format_capture_time(
    formatter: &dyn DateFormatter,
    timestamp: Option<&NaiveDateTime>,
) -> String {
    timestamp.map(|ts| formatter.format(ts)).unwrap_or_default()
}

/// Map a POSIX locale string (`de_DE.UTF-8@euro`) to a chrono locale.
fn resolve_locale(name: &str) -> Option<Locale> {
    let base = name.split(['.', '@']).next().unwrap_or_default();
    match base {
        "" | "C" | "POSIX" => Some(Locale::POSIX),
        other => Locale::try_from(other).ok(),
    }
}
