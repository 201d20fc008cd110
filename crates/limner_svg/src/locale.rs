//! Host locale detection

use std::env;

/// Language used when the host locale is unset or `C`/`POSIX`
pub const FALLBACK_LANGUAGE: &str = "en";

/// Environment variables consulted in priority order
const LOCALE_VARS: [&str; 3] = ["LC_ALL", "LC_MESSAGES", "LANG"];

/// The host locale as a BCP-47 language tag, e.g. `de-AT`
pub fn host_language_tag() -> String {
    LOCALE_VARS
        .iter()
        .filter_map(|var| env::var(var).ok())
        .find(|value| !value.is_empty())
        .and_then(|value| posix_to_bcp47(&value))
        .unwrap_or_else(|| FALLBACK_LANGUAGE.to_string())
}

/// Convert a POSIX locale (`ll_CC.codeset@modifier`) to a BCP-47 tag
///
/// Returns `None` for `C`, `POSIX`, and anything without a plausible
/// language subtag.
pub fn posix_to_bcp47(locale: &str) -> Option<String> {
    let base = locale.split(|c| c == '.' || c == '@').next()?;
    if base.is_empty() || base == "C" || base == "POSIX" {
        return None;
    }

    let mut parts = base.split(|c| c == '_' || c == '-');
    let language = parts.next()?.to_ascii_lowercase();
    if !(2..=3).contains(&language.len()) || !language.chars().all(|c| c.is_ascii_alphabetic()) {
        return None;
    }

    match parts.next() {
        Some(region) if !region.is_empty() => {
            Some(format!("{}-{}", language, region.to_ascii_uppercase()))
        }
        _ => Some(language),
    }
}
