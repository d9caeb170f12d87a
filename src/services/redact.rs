use once_cell::sync::Lazy;
use regex::Regex;

static CARD_NUMBER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\b\d{4}[-\s]?\d{4}[-\s]?\d{4}[-\s]?\d{4}\b").expect("invalid card regex"));

static EMAIL: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\b[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,}\b").expect("invalid email regex"));

static API_KEY: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\b(api[_-]?key|apikey|token)[\s:=]+[\w-]+").expect("invalid api key regex"));

/// Masks card numbers, email addresses and API keys before user text is logged.
pub fn redact(text: &str) -> String {
    let text = CARD_NUMBER.replace_all(text, "[REDACTED]");
    let text = EMAIL.replace_all(&text, "[REDACTED]");
    API_KEY.replace_all(&text, "[REDACTED]").into_owned()
}
