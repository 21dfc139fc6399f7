// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Alexander Minges

//! Turn free-form text (email subjects) into filesystem-safe file stems.

/// Fallback stem when nothing usable survives sanitizing.
pub const FALLBACK_STEM: &str = "email";
/// Longest stem we produce, in bytes (ASCII after transliteration).
const MAX_STEM_LEN: usize = 80;

/// Produce a filesystem-safe file stem from arbitrary text.
///
/// # Steps
/// - Transliterate Unicode to ASCII with `deunicode` (e.g., "Café" → "Cafe").
/// - Keep ASCII alphanumerics, `-` and `_`; everything else becomes `_`.
/// - Collapse `_` runs, trim leading/trailing `_`, and cap the length.
/// - Suffix Windows device names (`CON`, `LPT1`, ...) with `_`.
///
/// Dots are not kept: callers append their own extension.
pub fn sanitize_component(value: &str) -> String {
    let transliterated = deunicode::deunicode(value);
    let mut out = String::with_capacity(transliterated.len().min(MAX_STEM_LEN));

    for ch in transliterated.chars() {
        let mapped = if ch.is_ascii_alphanumeric() || ch == '-' || ch == '_' {
            ch
        } else {
            '_'
        };
        if mapped == '_' && (out.is_empty() || out.ends_with('_')) {
            continue;
        }
        out.push(mapped);
        if out.len() >= MAX_STEM_LEN {
            break;
        }
    }

    let trimmed = out.trim_end_matches('_');
    if trimmed.is_empty() {
        return FALLBACK_STEM.to_string();
    }

    if is_reserved_device_name(trimmed) {
        format!("{trimmed}_")
    } else {
        trimmed.to_string()
    }
}

fn is_reserved_device_name(stem: &str) -> bool {
    let upper = stem.to_ascii_uppercase();
    if matches!(upper.as_str(), "CON" | "PRN" | "AUX" | "NUL") {
        return true;
    }
    let bytes = upper.as_bytes();
    bytes.len() == 4
        && (upper.starts_with("COM") || upper.starts_with("LPT"))
        && matches!(bytes[3], b'1'..=b'9')
}

#[cfg(test)]
mod tests {
    use super::sanitize_component;

    #[test]
    fn transliterates_and_collapses_separators() {
        assert_eq!(
            sanitize_component("Ångström: Your code is 1234!"),
            "Angstrom_Your_code_is_1234"
        );
    }

    #[test]
    fn strips_leading_and_trailing_separators() {
        assert_eq!(sanitize_component("  [Netflix] sign-in  "), "Netflix_sign-in");
    }

    #[test]
    fn caps_length() {
        let long = "a".repeat(200);
        assert_eq!(sanitize_component(&long).len(), 80);
    }

    #[test]
    fn reserved_names_get_suffix() {
        assert_eq!(sanitize_component("con"), "con_");
        assert_eq!(sanitize_component("LPT3"), "LPT3_");
        assert_eq!(sanitize_component("LPT0"), "LPT0");
    }

    #[test]
    fn falls_back_for_symbol_only_text() {
        assert_eq!(sanitize_component("!!! ..."), "email");
        assert_eq!(sanitize_component(""), "email");
    }
}
