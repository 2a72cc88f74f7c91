use crate::category::CategoryStore;
use keylift_ai::{
    build_keyword_prompt, modifier_examples, parse_candidates, LLMProvider, ParseOutcome,
    SYSTEM_PROMPT,
};
use keylift_core::{CategoryTemplate, KeywordCandidate, KeywordLevel};
use std::collections::HashSet;
use std::sync::Arc;

const GENERIC_MODIFIERS: &[&str] = &[
    "추천",
    "잘하는곳",
    "가격",
    "후기",
    "위치",
    "영업시간",
    "전화번호",
];
const PURPOSES: &[&str] = &["근처", "예약", "상담", "방문"];
const QUALITIES: &[&str] = &["좋은", "유명한", "저렴한", "괜찮은"];

/// Per-level candidate quotas for the fallback paths, longtail-heavy like
/// the model prompt asks for: 15/10/5/3/2.
const LONGTAIL_COUNT: usize = 15;
const NICHE_COUNT: usize = 10;
const MEDIUM_COUNT: usize = 5;
const COMPETITIVE_COUNT: usize = 3;

fn pick<'a>(values: &'a [String], index: usize) -> &'a str {
    &values[index % values.len()]
}

fn pick_static(values: &[&'static str], index: usize) -> &'static str {
    values[index % values.len()]
}

/// Keyword generator: language model first, template substitution as the
/// fallback. The fallback is fully deterministic so repeated analyses of
/// the same business agree with each other.
pub struct KeywordGenerator {
    provider: Option<Arc<dyn LLMProvider>>,
    store: Arc<CategoryStore>,
}

impl KeywordGenerator {
    pub fn new(provider: Option<Arc<dyn LLMProvider>>, store: Arc<CategoryStore>) -> Self {
        Self { provider, store }
    }

    pub async fn generate(
        &self,
        business_type: &str,
        location: &str,
        specialty: &[String],
    ) -> Vec<KeywordCandidate> {
        let template = self.store.get(business_type);

        if let Some(provider) = &self.provider {
            let examples = template
                .as_ref()
                .map(|t| modifier_examples(&t.modifiers))
                .unwrap_or_default();
            let prompt = build_keyword_prompt(business_type, location, specialty, &examples);

            match provider.generate_with_system(SYSTEM_PROMPT, &prompt).await {
                Ok(response) => match parse_candidates(&response.content, business_type) {
                    ParseOutcome::Parsed(candidates) => {
                        tracing::info!(
                            count = candidates.len(),
                            provider = provider.provider_name(),
                            "keywords generated by model"
                        );
                        return candidates;
                    }
                    ParseOutcome::Unusable(reason) => {
                        tracing::warn!(%reason, "model output unusable, taking template fallback");
                    }
                },
                Err(e) => {
                    tracing::warn!(error = %e, "model call failed, taking template fallback");
                }
            }
        }

        let candidates = match &template {
            Some(template) => Self::template_candidates(template, location, specialty),
            None => Self::generic_candidates(business_type, location, specialty),
        };
        dedup(candidates)
    }

    /// Pattern-based candidates for a known category. Modifier values are
    /// cycled by index, never sampled, so output is stable across calls.
    fn template_candidates(
        template: &CategoryTemplate,
        location: &str,
        specialty: &[String],
    ) -> Vec<KeywordCandidate> {
        let mut out = Vec::new();
        let spec = specialty.first().map(String::as_str);
        let mod_types: Vec<&String> = template.modifiers.keys().collect();
        let location_parts: Vec<&str> = location.split_whitespace().collect();

        // Level 5: longtail patterns with substituted modifier slots.
        for i in 0..LONGTAIL_COUNT {
            let text = if !template.longtail_patterns.is_empty() && !mod_types.is_empty() {
                let pattern =
                    &template.longtail_patterns[i % template.longtail_patterns.len()];
                let mut keyword = pattern.replace("{지역}", location);
                for (mod_type, values) in &template.modifiers {
                    let placeholder = format!("{{{}}}", mod_type);
                    if !values.is_empty() && keyword.contains(&placeholder) {
                        keyword = keyword.replace(&placeholder, pick(values, i));
                    }
                }
                if let Some(spec) = spec {
                    keyword = keyword.replacen(location, &format!("{} {}", location, spec), 1);
                }
                keyword
            } else {
                let base = pick(&template.base_keywords, i);
                match spec {
                    Some(spec) => format!("{} {} {} 추천", location, spec, base),
                    None => format!("{} {} 추천 베스트", location, base),
                }
            };
            let reason = match spec {
                Some(spec) => format!("'{}' 특징 반영 롱테일", spec),
                None => "롱테일 키워드".to_string(),
            };
            out.push(candidate(text, KeywordLevel::Longtail, reason));
        }

        // Level 4: one modifier value joined with a base keyword.
        for i in 0..NICHE_COUNT {
            let base = pick(&template.base_keywords, i);
            let (text, reason) = match (spec, mod_types.is_empty()) {
                (Some(spec), false) => {
                    let mod_type = mod_types[i % mod_types.len()];
                    let values = &template.modifiers[mod_type.as_str()];
                    (
                        format!("{} {} {} {}", location, spec, pick(values, i), base),
                        format!("'{}' + {}", spec, mod_type),
                    )
                }
                (Some(spec), true) => (
                    format!("{} {} {}", location, spec, base),
                    format!("'{}' 특징 니치 키워드", spec),
                ),
                (None, false) if mod_types.len() >= 2 => {
                    let first = mod_types[i % mod_types.len()];
                    let second = mod_types[(i + 1) % mod_types.len()];
                    let v1 = pick(&template.modifiers[first.as_str()], i);
                    let v2 = pick(&template.modifiers[second.as_str()], i);
                    (
                        format!("{} {} {} {}", location, v1, v2, base),
                        format!("{}+{} 조합", first, second),
                    )
                }
                _ => (format!("{} {} 추천", location, base), "니치 키워드".to_string()),
            };
            out.push(candidate(text, KeywordLevel::Niche, reason));
        }

        // Level 3: location + specialty/modifier + base.
        let medium_suffixes = ["", "추천", "가격", "후기", "예약"];
        for i in 0..MEDIUM_COUNT {
            let base = pick(&template.base_keywords, i);
            let (text, reason) = match spec {
                Some(spec) => {
                    let suffix = medium_suffixes[i % medium_suffixes.len()];
                    let text = if suffix.is_empty() {
                        format!("{} {} {}", location, spec, base)
                    } else {
                        format!("{} {} {} {}", location, spec, base, suffix)
                    };
                    (text, format!("지역 + '{}' + 업종", spec))
                }
                None => {
                    if mod_types.is_empty() {
                        (format!("{} {}", location, base), "중간 키워드".to_string())
                    } else {
                        let mod_type = mod_types[i % mod_types.len()];
                        let values = &template.modifiers[mod_type.as_str()];
                        (
                            format!("{} {} {}", location, pick(values, i), base),
                            format!("{} 반영", mod_type),
                        )
                    }
                }
            };
            out.push(candidate(text, KeywordLevel::Medium, reason));
        }

        // Level 2: widest area component of the location.
        for i in 0..COMPETITIVE_COUNT {
            let base = pick(&template.base_keywords, i);
            let (text, reason) = if location_parts.len() >= 2 {
                (
                    format!("{} {}", location_parts[0], base),
                    "광역 경쟁 키워드".to_string(),
                )
            } else {
                (format!("{} {}", location, base), "경쟁 키워드".to_string())
            };
            out.push(candidate(text, KeywordLevel::Competitive, reason));
        }

        // Level 1: head terms; the bare category survives deduplication
        // even when the wide-area variant collides with a level-2 entry.
        if location_parts.len() >= 2 {
            out.push(candidate(
                format!("{} {}", location_parts[0], template.name),
                KeywordLevel::Top,
                "광역 초경쟁 키워드".to_string(),
            ));
        }
        out.push(candidate(
            template.name.clone(),
            KeywordLevel::Top,
            "최상위 키워드".to_string(),
        ));

        out
    }

    /// Candidates for a business type the store does not know: generic
    /// modifiers instead of category vocabulary, same level quotas.
    fn generic_candidates(
        business_type: &str,
        location: &str,
        specialty: &[String],
    ) -> Vec<KeywordCandidate> {
        let mut out = Vec::new();
        let spec = specialty.first().map(String::as_str);
        let location_parts: Vec<&str> = location.split_whitespace().collect();

        for i in 0..LONGTAIL_COUNT {
            let text = match spec {
                Some(spec) => {
                    if i < 5 {
                        format!(
                            "{} {} {} {}",
                            location,
                            spec,
                            pick_static(QUALITIES, i),
                            business_type
                        )
                    } else if i < 10 {
                        format!(
                            "{} {} {} {}",
                            location,
                            spec,
                            business_type,
                            pick_static(PURPOSES, i)
                        )
                    } else {
                        format!(
                            "{} {} {} {}",
                            location,
                            spec,
                            business_type,
                            pick_static(GENERIC_MODIFIERS, i)
                        )
                    }
                }
                None => {
                    if i < 5 {
                        format!(
                            "{} {} {} {}",
                            location,
                            pick_static(QUALITIES, i),
                            business_type,
                            pick_static(GENERIC_MODIFIERS, i)
                        )
                    } else if i < 10 {
                        format!(
                            "{} {} {} {}",
                            location,
                            business_type,
                            pick_static(PURPOSES, i),
                            pick_static(GENERIC_MODIFIERS, i)
                        )
                    } else {
                        format!(
                            "{} {} {} {}",
                            location,
                            business_type,
                            pick_static(GENERIC_MODIFIERS, i),
                            pick_static(QUALITIES, i)
                        )
                    }
                }
            };
            out.push(candidate(text, KeywordLevel::Longtail, "롱테일 키워드".into()));
        }

        for i in 0..NICHE_COUNT {
            let text = match spec {
                Some(spec) if i < 7 => format!(
                    "{} {} {} {}",
                    location,
                    spec,
                    business_type,
                    pick_static(GENERIC_MODIFIERS, i)
                ),
                Some(spec) => format!(
                    "{} {} {} {}",
                    location,
                    spec,
                    pick_static(QUALITIES, i),
                    business_type
                ),
                None if i < 7 => format!(
                    "{} {} {}",
                    location,
                    business_type,
                    pick_static(GENERIC_MODIFIERS, i)
                ),
                None => format!(
                    "{} {} {}",
                    location,
                    pick_static(QUALITIES, i),
                    business_type
                ),
            };
            out.push(candidate(text, KeywordLevel::Niche, "니치 키워드".into()));
        }

        let medium_suffixes = ["", "추천", "가격", "후기", "예약"];
        for suffix in medium_suffixes.iter().take(MEDIUM_COUNT) {
            let core = match spec {
                Some(spec) => format!("{} {} {}", location, spec, business_type),
                None => format!("{} {}", location, business_type),
            };
            let text = if suffix.is_empty() {
                core
            } else {
                format!("{} {}", core, suffix)
            };
            out.push(candidate(text, KeywordLevel::Medium, "중간 키워드".into()));
        }

        if location_parts.len() >= 2 {
            for suffix in ["", "추천", "잘하는곳"] {
                let text = if suffix.is_empty() {
                    format!("{} {}", location_parts[0], business_type)
                } else {
                    format!("{} {} {}", location_parts[0], business_type, suffix)
                };
                out.push(candidate(text, KeywordLevel::Competitive, "광역 경쟁 키워드".into()));
            }
        } else {
            for suffix in ["유명한", "인기", "베스트"] {
                out.push(candidate(
                    format!("{} {} {}", location, business_type, suffix),
                    KeywordLevel::Competitive,
                    "경쟁 키워드".into(),
                ));
            }
        }

        if location_parts.len() >= 2 {
            out.push(candidate(
                format!("{} {}", location_parts[0], business_type),
                KeywordLevel::Top,
                "광역 초경쟁 키워드".into(),
            ));
        }
        out.push(candidate(
            business_type.to_string(),
            KeywordLevel::Top,
            "최상위 키워드".into(),
        ));

        out
    }
}

fn candidate(text: String, level: KeywordLevel, reason: String) -> KeywordCandidate {
    KeywordCandidate { text, level, reason }
}

/// Exact-text deduplication preserving first occurrence.
fn dedup(candidates: Vec<KeywordCandidate>) -> Vec<KeywordCandidate> {
    let mut seen = HashSet::new();
    candidates
        .into_iter()
        .filter(|c| seen.insert(c.text.clone()))
        .collect()
}
