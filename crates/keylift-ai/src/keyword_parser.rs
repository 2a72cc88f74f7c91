use keylift_core::{KeywordCandidate, KeywordLevel};
use serde::Deserialize;
use std::collections::HashSet;

/// Generic superlatives that carry no search intent on their own. A
/// candidate made of nothing but these (plus the bare business type) is
/// dropped.
const LOW_SIGNAL_MODIFIERS: &[&str] = &[
    "추천",
    "베스트",
    "인기",
    "유명",
    "유명한",
    "최고",
    "best",
    "핫플",
    "잘하는곳",
];

/// Outcome of parsing a model response. Unusable output is a signal for the
/// caller to take the template fallback path, not an error to propagate.
#[derive(Debug, Clone)]
pub enum ParseOutcome {
    Parsed(Vec<KeywordCandidate>),
    Unusable(String),
}

impl ParseOutcome {
    pub fn candidates(self) -> Option<Vec<KeywordCandidate>> {
        match self {
            ParseOutcome::Parsed(candidates) => Some(candidates),
            ParseOutcome::Unusable(_) => None,
        }
    }
}

#[derive(Debug, Deserialize)]
struct RawCandidate {
    #[serde(default)]
    keyword: String,
    #[serde(default)]
    level: Option<u8>,
    #[serde(default)]
    reason: Option<String>,
}

/// Parse free-form model output into keyword candidates.
///
/// Tolerates markdown code fences around the JSON array and missing or
/// out-of-range levels (inferred from word count). Deduplicates by exact
/// text and filters low-signal candidates.
pub fn parse_candidates(content: &str, business_type: &str) -> ParseOutcome {
    let body = strip_code_fences(content);

    let raw: Vec<RawCandidate> = match serde_json::from_str(body.trim()) {
        Ok(raw) => raw,
        Err(e) => return ParseOutcome::Unusable(format!("response is not a JSON array: {}", e)),
    };

    let mut seen: HashSet<String> = HashSet::new();
    let mut candidates = Vec::with_capacity(raw.len());

    for item in raw {
        let text = item.keyword.trim().to_string();
        if text.is_empty() || !seen.insert(text.clone()) {
            continue;
        }
        if is_low_signal(&text, business_type) {
            tracing::debug!(keyword = %text, "dropping low-signal candidate");
            continue;
        }

        let level = item
            .level
            .and_then(|l| KeywordLevel::try_from(l).ok())
            .unwrap_or_else(|| {
                KeywordLevel::infer_from_word_count(text.split_whitespace().count())
            });

        candidates.push(KeywordCandidate {
            text,
            level,
            reason: item.reason.unwrap_or_default(),
        });
    }

    if candidates.is_empty() {
        ParseOutcome::Unusable("response contained no usable keywords".to_string())
    } else {
        ParseOutcome::Parsed(candidates)
    }
}

/// A keyword is low-signal when every token is either the bare business
/// type or a generic superlative — nothing locates or differentiates it.
fn is_low_signal(text: &str, business_type: &str) -> bool {
    text.split_whitespace().all(|token| {
        token == business_type
            || LOW_SIGNAL_MODIFIERS
                .iter()
                .any(|m| token.eq_ignore_ascii_case(m))
    })
}

fn strip_code_fences(content: &str) -> &str {
    if let Some(rest) = content.split("```json").nth(1) {
        rest.split("```").next().unwrap_or(rest)
    } else if let Some(rest) = content.split("```").nth(1) {
        rest
    } else {
        content
    }
}
