use once_cell::sync::Lazy;
use serde::Serialize;
use std::collections::BTreeMap;

/// A profile-optimization guide section. Content is static Korean markdown
/// rendered by the frontend.
#[derive(Debug, Clone, Serialize)]
pub struct Guide {
    pub section: &'static str,
    pub title: &'static str,
    pub content: &'static str,
    pub priority: &'static str,
}

pub static OPTIMIZATION_GUIDES: Lazy<BTreeMap<&'static str, Guide>> = Lazy::new(|| {
    let guides = [
        Guide {
            section: "business_name",
            title: "업체명 최적화",
            priority: "high",
            content: r#"### 원칙
- 공식 상호명 사용 (사업자등록증)
- 브랜드 일관성 유지
- 검색 가능성 고려

### 금지사항
- 키워드 나열
- 과도한 특수문자
- 허위 정보"#,
        },
        Guide {
            section: "category",
            title: "카테고리 선택",
            priority: "high",
            content: r#"### 선택 전략
1. 주업종 정확히 선택
2. 부업종 2-3개 추가
3. 경쟁사 카테고리 분석"#,
        },
        Guide {
            section: "description",
            title: "업체 소개글 작성",
            priority: "high",
            content: r#"### 작성 공식
[첫 문장] 핵심 차별화 포인트 (20자)
[2-3문장] 주요 메뉴/서비스 (50-80자)
[마지막] 위치/접근성 정보 (30-50자)

### 작성 원칙
- 간결성: 100-200자
- 키워드 2-3개 자연스럽게 포함"#,
        },
        Guide {
            section: "photos",
            title: "사진 등록 전략",
            priority: "medium",
            content: r#"### 필수 사진 (우선순위)
1. 대표 사진 (1장) - 고해상도
2. 메뉴/제품 (5-10장)
3. 내부 인테리어 (3-5장)
4. 외관 (2-3장)"#,
        },
        Guide {
            section: "hours",
            title: "영업시간 및 정보",
            priority: "medium",
            content: r#"### 정확한 정보 입력
- 요일별 영업시간
- 브레이크타임
- 정기휴무
- 임시휴무 즉시 업데이트"#,
        },
        Guide {
            section: "menu",
            title: "메뉴/가격 정보",
            priority: "high",
            content: r#"### 메뉴 등록 원칙
1. 대표메뉴 우선 (베스트 5개)
2. 정확한 가격
3. 메뉴 설명 (재료, 특징)
4. 사진 첨부 (각 메뉴당 1장)"#,
        },
        Guide {
            section: "reviews",
            title: "리뷰 관리",
            priority: "high",
            content: r#"### 리뷰 수집 전략
- 서비스 품질로 자연스럽게 유도
- QR코드 영수증 삽입
- 금전적 보상 금지 (위법)

### 리뷰 응답
- 긍정 리뷰: 24시간 내 응답
- 부정 리뷰: 12시간 내 응답"#,
        },
        Guide {
            section: "seo",
            title: "검색 최적화",
            priority: "medium",
            content: r#"### 검색 노출 요소
1. 관련성: 키워드 최적화
2. 거리: 정확한 위치
3. 인기도: 리뷰 수/평점
4. 최신성: 주 1회 업데이트
5. 완성도: 프로필 100% 작성"#,
        },
    ];

    guides.into_iter().map(|g| (g.section, g)).collect()
});
