use crate::category::CategoryStore;
use crate::competition::{difficulty_score, CompetitionAnalyzer};
use crate::generator::KeywordGenerator;
use crate::planner::{estimated_daily_traffic, rank_target, StrategyPlanner};
use crate::volume::VolumeEstimator;
use keylift_ai::LLMProvider;
use keylift_core::{
    AnalysisRequest, AnalysisResult, BusinessProfile, KeywordLevel, KeywordMetrics,
    KeywordStatsSource, KeyliftError, ListingCountSource, PopulationSource, Result,
};
use std::collections::BTreeMap;
use std::sync::Arc;

/// Request orchestrator: generate → per-keyword volume + competition →
/// metrics → roadmap. External-source failures degrade precision (tagged
/// per metric), never the request; only invalid input is an error.
pub struct AnalysisEngine {
    store: Arc<CategoryStore>,
    generator: KeywordGenerator,
    volume: VolumeEstimator,
    competition: CompetitionAnalyzer,
    planner: StrategyPlanner,
}

impl AnalysisEngine {
    pub fn new(
        store: Arc<CategoryStore>,
        provider: Option<Arc<dyn LLMProvider>>,
        stats: Arc<dyn KeywordStatsSource>,
        listings: Arc<dyn ListingCountSource>,
        population: Arc<dyn PopulationSource>,
    ) -> Self {
        Self {
            generator: KeywordGenerator::new(provider, store.clone()),
            volume: VolumeEstimator::new(stats.clone(), population),
            competition: CompetitionAnalyzer::new(listings, stats),
            planner: StrategyPlanner::new(store.clone()),
            store,
        }
    }

    pub fn store(&self) -> &Arc<CategoryStore> {
        &self.store
    }

    pub async fn analyze(&self, request: &AnalysisRequest) -> Result<AnalysisResult> {
        let business_type = request.business_type.trim();
        let location = request.location.trim();
        if business_type.is_empty() {
            return Err(KeyliftError::InvalidInput(
                "business_type is required".into(),
            ));
        }
        if location.is_empty() {
            return Err(KeyliftError::InvalidInput("location is required".into()));
        }

        let specialty: Vec<String> = request
            .specialty
            .iter()
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let template = self.store.get(business_type);

        let candidates = self
            .generator
            .generate(business_type, location, &specialty)
            .await;
        tracing::info!(
            business_type,
            location,
            candidates = candidates.len(),
            "analysis started"
        );

        let mut keywords_by_level: BTreeMap<String, Vec<KeywordMetrics>> = KeywordLevel::DESCENDING
            .into_iter()
            .map(|level| (level.group_key(), Vec::new()))
            .collect();

        for candidate in &candidates {
            let volume = self
                .volume
                .estimate(&candidate.text, candidate.level, template.as_deref(), location)
                .await;
            let signals = self.competition.analyze(&candidate.text).await;
            let difficulty = difficulty_score(signals.score, candidate.level, volume.total);
            let (target, timeline, _) = rank_target(candidate.level);

            let metrics = KeywordMetrics {
                keyword: candidate.text.clone(),
                level: candidate.level,
                level_name: candidate.level.display_name().to_string(),
                estimated_monthly_searches: volume.total,
                monthly_pc_searches: volume.pc,
                monthly_mobile_searches: volume.mobile,
                competition_score: signals.score,
                listing_count: signals.listing_count,
                difficulty_score: difficulty,
                recommended_rank_target: target.to_string(),
                estimated_timeline: timeline.to_string(),
                estimated_daily_traffic: estimated_daily_traffic(volume.total, candidate.level),
                confidence: volume.source,
            };

            keywords_by_level
                .entry(candidate.level.group_key())
                .or_default()
                .push(metrics);
        }

        // Roadmap sees metrics in level order, easiest first, matching the
        // grouping handed back to the client.
        let all_metrics: Vec<KeywordMetrics> = KeywordLevel::DESCENDING
            .into_iter()
            .flat_map(|level| {
                keywords_by_level
                    .get(&level.group_key())
                    .cloned()
                    .unwrap_or_default()
            })
            .collect();

        let (roadmap, summary) = self.planner.plan(
            &all_metrics,
            request.current_daily_visitors,
            request.target_daily_visitors,
            template.as_deref(),
        );

        Ok(AnalysisResult {
            business: BusinessProfile {
                business_type: business_type.to_string(),
                location: location.to_string(),
                specialty,
            },
            total_keywords: all_metrics.len(),
            keywords_by_level,
            roadmap,
            summary,
        })
    }
}
