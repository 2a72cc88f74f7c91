use keylift_core::{
    CategoryTemplate, KeywordLevel, KeywordStatsSource, PopulationSource, SearchVolume,
    VolumeSource,
};
use std::sync::Arc;

/// Share of a region's baseline search demand a keyword at a given level
/// captures. A head term soaks up half the category demand; a longtail
/// phrase a sliver of it.
pub fn volume_multiplier(level: KeywordLevel) -> f64 {
    match level {
        KeywordLevel::Longtail => 0.02,
        KeywordLevel::Niche => 0.05,
        KeywordLevel::Medium => 0.15,
        KeywordLevel::Competitive => 0.30,
        KeywordLevel::Top => 0.50,
    }
}

/// Terminal tier: coarse monthly volume from keyword length alone. Pure
/// computation, cannot fail, so the estimator always has an answer.
fn length_heuristic(keyword: &str) -> u64 {
    match keyword.split_whitespace().count() {
        0 | 1 => 40_000,
        2 => 12_000,
        3 => 4_000,
        4 => 1_200,
        _ => 400,
    }
}

/// Monthly-search-volume estimator. Tiers are tried in strict order and any
/// external failure advances the chain; nothing here returns an error to
/// the caller.
pub struct VolumeEstimator {
    stats: Arc<dyn KeywordStatsSource>,
    population: Arc<dyn PopulationSource>,
}

impl VolumeEstimator {
    pub fn new(stats: Arc<dyn KeywordStatsSource>, population: Arc<dyn PopulationSource>) -> Self {
        Self { stats, population }
    }

    pub async fn estimate(
        &self,
        keyword: &str,
        level: KeywordLevel,
        template: Option<&CategoryTemplate>,
        location: &str,
    ) -> SearchVolume {
        // Tier 1: live statistics feed.
        if self.stats.is_configured() {
            match self.stats.keyword_stats(&[keyword.to_string()]).await {
                Ok(rows) => {
                    if let Some(row) = rows.into_iter().next() {
                        tracing::debug!(keyword, total = row.monthly_total(), "volume from api");
                        return SearchVolume {
                            total: row.monthly_total(),
                            pc: row.monthly_pc_searches,
                            mobile: row.monthly_mobile_searches,
                            source: VolumeSource::Api,
                        };
                    }
                    tracing::debug!(keyword, "statistics feed returned no rows");
                }
                Err(e) => {
                    tracing::debug!(keyword, error = %e, "statistics feed unavailable");
                }
            }
        }

        // Tier 2: population model.
        if let Some(template) = template {
            if let Some(population) = self.population.population(location).await {
                let base = population as f64 * template.usage_rate * template.search_rate;
                let total = (base * volume_multiplier(level)).round() as u64;
                tracing::debug!(keyword, total, "volume from population model");
                return SearchVolume::estimated(total);
            }
        }

        // Tier 3: keyword length.
        SearchVolume::estimated(length_heuristic(keyword))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use keylift_core::{KeywordStats, KeyliftError, Result};
    use std::collections::BTreeMap;

    struct StatsStub {
        configured: bool,
        rows: Result<Vec<KeywordStats>>,
    }

    impl StatsStub {
        fn failing() -> Self {
            Self {
                configured: true,
                rows: Err(KeyliftError::Source("simulated outage".into())),
            }
        }

        fn unconfigured() -> Self {
            Self {
                configured: false,
                rows: Ok(Vec::new()),
            }
        }

        fn with_row(pc: u64, mobile: u64) -> Self {
            Self {
                configured: true,
                rows: Ok(vec![KeywordStats {
                    keyword: "강남 카페".into(),
                    monthly_pc_searches: pc,
                    monthly_mobile_searches: mobile,
                    competition_tier: None,
                    avg_cpc: 0,
                }]),
            }
        }
    }

    #[async_trait]
    impl KeywordStatsSource for StatsStub {
        async fn keyword_stats(&self, _keywords: &[String]) -> Result<Vec<KeywordStats>> {
            match &self.rows {
                Ok(rows) => Ok(rows.clone()),
                Err(_) => Err(KeyliftError::Source("simulated outage".into())),
            }
        }

        fn is_configured(&self) -> bool {
            self.configured
        }
    }

    struct PopulationStub(Option<u64>);

    #[async_trait]
    impl PopulationSource for PopulationStub {
        async fn population(&self, _location: &str) -> Option<u64> {
            self.0
        }
    }

    fn cafe_template() -> CategoryTemplate {
        CategoryTemplate {
            name: "카페".into(),
            aliases: vec![],
            usage_rate: 0.8,
            search_rate: 0.4,
            conversion_rate: 0.1,
            base_keywords: vec!["카페".into()],
            modifiers: BTreeMap::new(),
            longtail_patterns: vec![],
            strategies: BTreeMap::new(),
            goals: BTreeMap::new(),
        }
    }

    #[tokio::test]
    async fn api_rows_win_and_tag_the_source() {
        let estimator = VolumeEstimator::new(
            Arc::new(StatsStub::with_row(1200, 3400)),
            Arc::new(PopulationStub(Some(500_000))),
        );
        let volume = estimator
            .estimate("강남 카페", KeywordLevel::Competitive, Some(&cafe_template()), "서울 강남구")
            .await;
        assert_eq!(volume.total, 4600);
        assert_eq!(volume.pc, 1200);
        assert_eq!(volume.mobile, 3400);
        assert_eq!(volume.source, VolumeSource::Api);
    }

    #[tokio::test]
    async fn failed_api_falls_back_to_population_model() {
        let estimator = VolumeEstimator::new(
            Arc::new(StatsStub::failing()),
            Arc::new(PopulationStub(Some(500_000))),
        );
        let volume = estimator
            .estimate(
                "강남역 브런치 먹기 좋은 카페",
                KeywordLevel::Longtail,
                Some(&cafe_template()),
                "서울 강남구",
            )
            .await;
        // 500_000 × 0.8 × 0.4 × 0.02
        assert_eq!(volume.total, 3200);
        assert_eq!(volume.source, VolumeSource::Estimated);
    }

    #[tokio::test]
    async fn missing_population_falls_back_to_length_heuristic() {
        let estimator = VolumeEstimator::new(
            Arc::new(StatsStub::unconfigured()),
            Arc::new(PopulationStub(None)),
        );
        let short = estimator
            .estimate("카페", KeywordLevel::Top, Some(&cafe_template()), "달나라")
            .await;
        let long = estimator
            .estimate(
                "달나라 공부하기 좋은 조용한 카페 추천",
                KeywordLevel::Longtail,
                Some(&cafe_template()),
                "달나라",
            )
            .await;
        assert_eq!(short.total, 40_000);
        assert_eq!(long.total, 400);
        assert!(short.total > long.total);
        assert_eq!(short.source, VolumeSource::Estimated);
    }

    #[tokio::test]
    async fn missing_template_skips_population_tier() {
        let estimator = VolumeEstimator::new(
            Arc::new(StatsStub::unconfigured()),
            Arc::new(PopulationStub(Some(500_000))),
        );
        let volume = estimator
            .estimate("강남 수족관", KeywordLevel::Competitive, None, "서울 강남구")
            .await;
        assert_eq!(volume.total, 12_000);
        assert_eq!(volume.source, VolumeSource::Estimated);
    }

    #[test]
    fn multipliers_shrink_with_specificity() {
        assert!(volume_multiplier(KeywordLevel::Longtail) < volume_multiplier(KeywordLevel::Top));
        for level in KeywordLevel::DESCENDING {
            assert!((0.0..=1.0).contains(&volume_multiplier(level)));
        }
    }
}
