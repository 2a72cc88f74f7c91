use std::collections::BTreeMap;
use std::fmt::Write;

/// System instruction for keyword generation calls.
pub const SYSTEM_PROMPT: &str =
    "You are a local search optimization expert. Always respond in Korean with valid JSON.";

/// Render a sample of the category's modifier vocabulary for the prompt.
/// At most three modifier groups with five values each; more than that
/// dilutes the examples without improving output.
pub fn modifier_examples(modifiers: &BTreeMap<String, Vec<String>>) -> String {
    if modifiers.is_empty() {
        return String::new();
    }

    let mut out = String::from("\n업종별 실제 검색 패턴:\n");
    for (mod_type, values) in modifiers.iter().take(3) {
        let sample: Vec<&str> = values.iter().take(5).map(String::as_str).collect();
        let _ = writeln!(out, "- {}: {}", mod_type, sample.join(", "));
    }
    out
}

/// Build the keyword-generation prompt: business context, per-level quotas,
/// and positive/negative examples so the model returns natural search
/// phrases instead of bare keyword piles.
pub fn build_keyword_prompt(
    business_type: &str,
    location: &str,
    specialty: &[String],
    modifier_examples: &str,
) -> String {
    let specialty_block = if specialty.is_empty() {
        "특징이 제공되지 않았습니다. 업종의 일반적인 차별화 요소를 반영하세요.".to_string()
    } else {
        let joined = specialty.join(", ");
        format!(
            "핵심 차별화 요소 (필수): {joined}\n\
             모든 키워드는 이 특징 중 1개 이상을 포함하거나 해당 검색 의도를 반영해야 합니다.\n\
             예: \"{location} {first} {business_type}\" (O) / \"{location} {business_type}\" (X, 특징 누락)\n\
             특징에 없는 다른 전문분야는 절대 사용하지 마세요.",
            joined = joined,
            location = location,
            first = &specialty[0],
            business_type = business_type,
        )
    };

    format!(
        r#"당신은 네이버 플레이스 로컬 검색 최적화 전문가입니다.
입력은 업종, 지역, 특징 3가지뿐입니다. 실제 모바일 검색에서 쓰일 자연스러운 한국어 키워드 35개를 생성하세요.

업종: {business_type}
지역: {location}
{specialty_block}
{modifier_examples}

생성 예시:
[좋은 예 - Level 5 롱테일]
"강남역 10번출구 근처에서 브런치 먹기 좋은 조용한 카페" → 구체적 위치 + 조사 + 목적 + 분위기
[나쁜 예]
"강남역 브런치 카페 추천 베스트 맛집" → 조사 없는 키워드 나열, 부자연스러움

[좋은 예 - Level 2 vs Level 1 차별화]
Level 2: "부산 돼지갈비" (광역 지역 포함)
Level 1: "돼지갈비 맛집" (지역 제거, 전국 단위) — Level 2의 확장형 금지

규칙:
- 지역을 광역/구·동/상권/역세권으로 자연스럽게 분해·축약해 활용하세요.
- 가격, 좌석, 주차, 영업시간, 예약, 포장, 동행 등 검색 의도를 고르게 반영하세요.
- 한국어 조사("에서", "의", "로", "에")를 전체 키워드의 40% 이상에 사용하세요.
- 동의어를 활용하세요 (맛집 → 맛있는 곳, 잘하는 곳 / 추천 → 좋은, 괜찮은).
- 동일한 접두/접미 패턴을 2회 이상 반복하지 마세요.

5단계 난이도별 분배:
- Level 5 (롱테일, 가장 쉬움) 15개: 구체적 검색어 3-7단어, 목적/상황/대상 조합
- Level 4 (니치) 10개: 2-5단어, 랜드마크·역·시간대 활용
- Level 3 (중간) 5개: 2-4단어, 지역 + 특징 + 업종, 조사 필수
- Level 2 (경쟁) 3개: 광역 지역 + 업종/특징
- Level 1 (최상위, 가장 어려움) 2개: 지역 제거 또는 최소화, Level 2와 완전히 다른 키워드

JSON 배열로만 응답하세요:
[
  {{"keyword": "정확한 키워드", "level": 5, "reason": "구체적인 선정 이유"}},
  ...
]

총 35개의 키워드를 생성해주세요."#
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prompt_embeds_business_context() {
        let prompt = build_keyword_prompt("카페", "서울 강남구", &["브런치 전문".into()], "");
        assert!(prompt.contains("카페"));
        assert!(prompt.contains("서울 강남구"));
        assert!(prompt.contains("브런치 전문"));
        assert!(prompt.contains("Level 5"));
    }

    #[test]
    fn prompt_without_specialty_keeps_generic_instruction() {
        let prompt = build_keyword_prompt("카페", "서울 강남구", &[], "");
        assert!(prompt.contains("특징이 제공되지 않았습니다"));
    }

    #[test]
    fn modifier_examples_are_capped() {
        let mut modifiers = BTreeMap::new();
        for i in 0..5 {
            modifiers.insert(
                format!("group{}", i),
                (0..10).map(|j| format!("mod{}", j)).collect(),
            );
        }
        let rendered = modifier_examples(&modifiers);
        assert_eq!(rendered.matches("- ").count(), 3);
        assert!(!rendered.contains("mod6"));
    }

    #[test]
    fn empty_modifiers_render_nothing() {
        assert!(modifier_examples(&BTreeMap::new()).is_empty());
    }
}
