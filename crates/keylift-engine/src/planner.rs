use crate::category::CategoryStore;
use keylift_core::{
    CategoryTemplate, KeywordLevel, KeywordMetrics, StrategyPhase, VisitorSummary,
};
use std::sync::Arc;

/// Rank target, expected timeline and click-through rate at that rank,
/// per level.
pub fn rank_target(level: KeywordLevel) -> (&'static str, &'static str, f64) {
    match level {
        KeywordLevel::Longtail => ("Top 1-3", "1-2주", 0.25),
        KeywordLevel::Niche => ("Top 5", "1개월", 0.15),
        KeywordLevel::Medium => ("Top 10", "2-3개월", 0.10),
        KeywordLevel::Competitive => ("Top 20", "6개월", 0.05),
        KeywordLevel::Top => ("노출 목표", "장기", 0.02),
    }
}

/// Daily visitors a keyword is expected to bring at its target rank:
/// monthly searches × click-through rate at that rank ÷ 30.
pub fn estimated_daily_traffic(monthly_searches: u64, level: KeywordLevel) -> u64 {
    let (_, _, ctr) = rank_target(level);
    (monthly_searches as f64 * ctr / 30.0).round() as u64
}

fn phase_band(level: KeywordLevel) -> (&'static str, &'static str) {
    match level {
        KeywordLevel::Longtail => ("롱테일 킬러", "1-2주"),
        KeywordLevel::Niche => ("니치 공략", "3-8주"),
        KeywordLevel::Medium => ("중위권 진입", "3-6개월"),
        KeywordLevel::Competitive => ("상위권 도전", "6개월 이상"),
        KeywordLevel::Top => ("최상위 도전", "12개월 이상"),
    }
}

fn difficulty_label(mean_difficulty: f64) -> &'static str {
    if mean_difficulty < 30.0 {
        "쉬움"
    } else if mean_difficulty < 60.0 {
        "보통"
    } else {
        "어려움"
    }
}

/// Roadmap planner. Always emits exactly four phases covering levels 5
/// through 2, easiest first; level-1 keywords stay visible in the grouped
/// metrics but are aspirational and contribute no phase traffic.
pub struct StrategyPlanner {
    store: Arc<CategoryStore>,
}

impl StrategyPlanner {
    const PHASE_LEVELS: [KeywordLevel; 4] = [
        KeywordLevel::Longtail,
        KeywordLevel::Niche,
        KeywordLevel::Medium,
        KeywordLevel::Competitive,
    ];

    pub fn new(store: Arc<CategoryStore>) -> Self {
        Self { store }
    }

    pub fn plan(
        &self,
        metrics: &[KeywordMetrics],
        current_daily_visitors: u64,
        target_daily_visitors: u64,
        template: Option<&CategoryTemplate>,
    ) -> (Vec<StrategyPhase>, VisitorSummary) {
        let gap = target_daily_visitors as i64 - current_daily_visitors as i64;

        let mut phases = Vec::with_capacity(Self::PHASE_LEVELS.len());
        let mut cumulative = 0u64;

        for (index, level) in Self::PHASE_LEVELS.into_iter().enumerate() {
            let members: Vec<&KeywordMetrics> =
                metrics.iter().filter(|m| m.level == level).collect();

            let expected: u64 = members.iter().map(|m| m.estimated_daily_traffic).sum();
            cumulative += expected;

            let mean_difficulty = if members.is_empty() {
                0.0
            } else {
                members.iter().map(|m| f64::from(m.difficulty_score)).sum::<f64>()
                    / members.len() as f64
            };

            let (name, duration) = phase_band(level);

            phases.push(StrategyPhase {
                phase: index as u32 + 1,
                name: name.to_string(),
                duration: duration.to_string(),
                target_level: level,
                target_level_name: level.display_name().to_string(),
                target_keywords: members.iter().map(|m| m.keyword.clone()).collect(),
                priority_keywords: Self::priority_keywords(&members),
                strategies: self.phase_strategies(template, level),
                goals: self.phase_goals(template, level),
                expected_daily_visitors: expected,
                cumulative_visitors: cumulative,
                difficulty_label: difficulty_label(mean_difficulty).to_string(),
            });
        }

        let summary = VisitorSummary {
            current_daily_visitors,
            target_daily_visitors,
            gap,
            total_expected_traffic: cumulative,
            achievement_rate: round_to_tenth(cumulative as f64 / gap.max(1) as f64 * 100.0),
            total_phases: phases.len(),
        };

        (phases, summary)
    }

    /// Up to five keywords with the best traffic-for-effort ratio. Stable
    /// sort keeps insertion order on ties, so identical input yields
    /// identical output.
    fn priority_keywords(members: &[&KeywordMetrics]) -> Vec<String> {
        let mut scored: Vec<(&&KeywordMetrics, f64)> = members
            .iter()
            .map(|m| {
                let roi =
                    m.estimated_daily_traffic as f64 / f64::from(m.difficulty_score.max(1));
                (m, roi)
            })
            .collect();
        scored.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));
        scored
            .into_iter()
            .take(5)
            .map(|(m, _)| m.keyword.clone())
            .collect()
    }

    fn phase_strategies(
        &self,
        template: Option<&CategoryTemplate>,
        level: KeywordLevel,
    ) -> Vec<String> {
        template
            .and_then(|t| t.strategies.get(&level.group_key()).cloned())
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| self.store.generic_strategies(level))
    }

    fn phase_goals(&self, template: Option<&CategoryTemplate>, level: KeywordLevel) -> Vec<String> {
        template
            .and_then(|t| t.goals.get(&level.group_key()).cloned())
            .filter(|g| !g.is_empty())
            .unwrap_or_else(|| self.store.generic_goals(level))
    }
}

fn round_to_tenth(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use keylift_core::VolumeSource;

    fn metric(keyword: &str, level: KeywordLevel, traffic: u64, difficulty: u8) -> KeywordMetrics {
        KeywordMetrics {
            keyword: keyword.to_string(),
            level,
            level_name: level.display_name().to_string(),
            estimated_monthly_searches: traffic * 30,
            monthly_pc_searches: 0,
            monthly_mobile_searches: 0,
            competition_score: 40,
            listing_count: 0,
            difficulty_score: difficulty,
            recommended_rank_target: rank_target(level).0.to_string(),
            estimated_timeline: rank_target(level).1.to_string(),
            estimated_daily_traffic: traffic,
            confidence: VolumeSource::Estimated,
        }
    }

    fn planner() -> StrategyPlanner {
        StrategyPlanner::new(Arc::new(crate::CategoryStore::embedded().unwrap()))
    }

    fn sample_metrics() -> Vec<KeywordMetrics> {
        vec![
            metric("서울 강남구 브런치 먹기 좋은 카페", KeywordLevel::Longtail, 8, 20),
            metric("서울 강남구 조용한 카페", KeywordLevel::Longtail, 5, 25),
            metric("강남 브런치 카페", KeywordLevel::Niche, 12, 45),
            metric("강남 감성 카페", KeywordLevel::Medium, 20, 55),
            metric("서울 카페", KeywordLevel::Competitive, 30, 75),
            metric("카페", KeywordLevel::Top, 50, 95),
        ]
    }

    #[test]
    fn emits_exactly_four_phases_ordered_easiest_first() {
        let (phases, _) = planner().plan(&sample_metrics(), 50, 200, None);
        assert_eq!(phases.len(), 4);
        let levels: Vec<u8> = phases.iter().map(|p| p.target_level.as_u8()).collect();
        assert_eq!(levels, vec![5, 4, 3, 2]);
        let numbers: Vec<u32> = phases.iter().map(|p| p.phase).collect();
        assert_eq!(numbers, vec![1, 2, 3, 4]);
    }

    #[test]
    fn level_one_keywords_contribute_no_phase_traffic() {
        let (phases, summary) = planner().plan(&sample_metrics(), 50, 200, None);
        let phase_total: u64 = phases.iter().map(|p| p.expected_daily_visitors).sum();
        // 8+5 + 12 + 20 + 30, the level-1 keyword's 50 is excluded
        assert_eq!(phase_total, 75);
        assert_eq!(summary.total_expected_traffic, 75);
    }

    #[test]
    fn cumulative_visitors_accumulate_across_phases() {
        let (phases, _) = planner().plan(&sample_metrics(), 50, 200, None);
        assert_eq!(phases[0].cumulative_visitors, 13);
        assert_eq!(phases[1].cumulative_visitors, 25);
        assert_eq!(phases[2].cumulative_visitors, 45);
        assert_eq!(phases[3].cumulative_visitors, 75);
    }

    #[test]
    fn summary_reports_gap_and_achievement_rate() {
        let (_, summary) = planner().plan(&sample_metrics(), 50, 200, None);
        assert_eq!(summary.gap, 150);
        assert_eq!(summary.achievement_rate, 50.0);
        assert_eq!(summary.total_phases, 4);
    }

    #[test]
    fn empty_level_still_gets_a_phase() {
        let metrics = vec![metric("서울 강남구 조용한 카페", KeywordLevel::Longtail, 5, 25)];
        let (phases, _) = planner().plan(&metrics, 0, 100, None);
        assert_eq!(phases.len(), 4);
        assert!(phases[1].target_keywords.is_empty());
        assert_eq!(phases[1].expected_daily_visitors, 0);
    }

    #[test]
    fn plan_is_deterministic() {
        let planner = planner();
        let metrics = sample_metrics();
        let (first, first_summary) = planner.plan(&metrics, 50, 200, None);
        let (second, second_summary) = planner.plan(&metrics, 50, 200, None);
        assert_eq!(first, second);
        assert_eq!(first_summary, second_summary);
    }

    #[test]
    fn priority_keywords_rank_by_traffic_per_difficulty() {
        let metrics = vec![
            metric("낮은 효율", KeywordLevel::Longtail, 2, 40),
            metric("높은 효율", KeywordLevel::Longtail, 10, 10),
            metric("중간 효율", KeywordLevel::Longtail, 5, 20),
        ];
        let (phases, _) = planner().plan(&metrics, 0, 100, None);
        assert_eq!(
            phases[0].priority_keywords,
            vec!["높은 효율", "중간 효율", "낮은 효율"]
        );
    }

    #[test]
    fn strategies_fall_back_to_generic_templates() {
        let (phases, _) = planner().plan(&sample_metrics(), 50, 200, None);
        for phase in &phases {
            assert!(!phase.strategies.is_empty());
            assert!(!phase.goals.is_empty());
        }
    }

    #[test]
    fn zero_or_negative_gap_does_not_divide_by_zero() {
        let (_, summary) = planner().plan(&sample_metrics(), 200, 200, None);
        assert_eq!(summary.gap, 0);
        assert!(summary.achievement_rate.is_finite());

        let (_, shrinking) = planner().plan(&sample_metrics(), 300, 200, None);
        assert_eq!(shrinking.gap, -100);
        assert!(shrinking.achievement_rate.is_finite());
    }

    #[test]
    fn daily_traffic_derivation_matches_ctr_table() {
        // 3200 monthly at level 5: 3200 × 0.25 / 30 ≈ 26.7 → 27
        assert_eq!(estimated_daily_traffic(3200, KeywordLevel::Longtail), 27);
        assert_eq!(estimated_daily_traffic(0, KeywordLevel::Top), 0);
    }
}
