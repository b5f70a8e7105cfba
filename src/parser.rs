use regex::Regex;
use std::collections::BTreeMap;
use std::sync::OnceLock;

use crate::models::{Amount, Currency, CurrencyValue, Feature};

fn number_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\d+(?:\.\d+)*").unwrap())
}

fn currency_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"USD|ARS|\$").unwrap())
}

fn feature_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(?i)(\d+(?:\.\d+)?)\s?(m2\.?|m²\.?|amb\.?|dorm\.?|baños?\.?|coch\.?)").unwrap()
    })
}

fn phone_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r#""mainPhone":"(\d+)""#).unwrap())
}

/// Strips newline and tab characters, then trims surrounding whitespace.
pub fn normalize_text(raw: &str) -> String {
    raw.replace(['\n', '\r', '\t'], "").trim().to_string()
}

/// Parses a free-text price like `"330.000 USD"` into an amount plus a
/// currency token. The first numeric token and the first currency token in
/// the text win independently. When no numeric token exists the original
/// text is kept as [`Amount::Raw`] with no currency, so the caller can tell
/// a degraded parse from a real number.
pub fn parse_currency(raw: &str) -> CurrencyValue {
    let Some(number) = number_regex().find(raw) else {
        return CurrencyValue {
            amount: Amount::Raw(raw.to_string()),
            currency: None,
        };
    };

    let amount = match number.as_str().replace('.', "").parse::<i64>() {
        Ok(value) => Amount::Parsed(value),
        Err(_) => {
            return CurrencyValue {
                amount: Amount::Raw(raw.to_string()),
                currency: None,
            };
        }
    };

    let currency = currency_regex().find(raw).map(|token| match token.as_str() {
        "USD" => Currency::Usd,
        "ARS" => Currency::Ars,
        _ => Currency::Sign,
    });

    CurrencyValue { amount, currency }
}

/// Parses a feature blurb like `"215 m² tot. 5 amb. 4 dorm. 2 baños 1 coch."`
/// into canonical features. When the same unit shows up twice the later
/// match overwrites the earlier one. No match yields an empty map.
pub fn parse_features(raw: &str) -> BTreeMap<Feature, String> {
    let mut features = BTreeMap::new();
    for captures in feature_regex().captures_iter(raw) {
        let number = captures[1].to_string();
        let unit = captures[2].to_lowercase();
        let unit = unit.trim_end_matches('.');
        let feature = if unit == "m2" || unit == "m²" {
            Feature::Area
        } else if unit.starts_with("amb") {
            Feature::Rooms
        } else if unit.starts_with("dorm") {
            Feature::Bedrooms
        } else if unit.starts_with("bañ") {
            Feature::Bathrooms
        } else if unit.starts_with("coch") {
            Feature::Parking
        } else {
            continue;
        };
        features.insert(feature, number);
    }
    features
}

/// Finds the first `"mainPhone":"<digits>"` marker in raw markup.
pub fn parse_phone(html: &str) -> Option<String> {
    phone_regex()
        .captures(html)
        .map(|captures| captures[1].to_string())
}

/// First integer-looking token in a heading like `"1.250 resultados"`,
/// thousands separators stripped. `None` when the text has no number.
pub fn parse_count(text: &str) -> Option<u32> {
    let token = number_regex().find(text)?;
    token.as_str().replace('.', "").parse().ok()
}
