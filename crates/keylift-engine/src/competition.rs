use keylift_core::{
    CompetitionTier, KeywordLevel, KeywordStatsSource, ListingCountSource,
};
use std::sync::Arc;

/// Competition read-out for one keyword. `score` is always in [0, 100]
/// whatever combination of signals was available.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompetitionSignals {
    pub score: u8,
    pub listing_count: u64,
    pub tier: Option<CompetitionTier>,
    pub avg_cpc: Option<u64>,
}

/// Ad-market signal: qualitative tier anchors the score, average CPC nudges
/// it upward (expensive clicks mean advertisers fight over the term).
fn ad_signal_score(tier: CompetitionTier, avg_cpc: u64) -> f64 {
    let base = match tier {
        CompetitionTier::High => 80.0,
        CompetitionTier::Medium => 50.0,
        CompetitionTier::Low => 20.0,
    };
    let cpc_nudge = (avg_cpc as f64 / 1000.0).min(15.0);
    (base + cpc_nudge).min(100.0)
}

/// Local signal: listing counts span orders of magnitude, so rescale
/// logarithmically. One million competing listings saturates the scale.
fn listing_signal_score(count: u64) -> f64 {
    ((count as f64 + 1.0).log10() / 6.0 * 100.0).clamp(0.0, 100.0)
}

/// Terminal fallback: fewer words means a broader, more contested term.
fn length_fallback_score(keyword: &str) -> f64 {
    match keyword.split_whitespace().count() {
        0 | 1 => 90.0,
        2 => 70.0,
        3 => 50.0,
        4 => 30.0,
        _ => 15.0,
    }
}

/// Difficulty blends how contested the term is with how broad it is and how
/// much volume is at stake: competition 60%, level 30%, volume 10%.
pub fn difficulty_score(competition: u8, level: KeywordLevel, monthly_searches: u64) -> u8 {
    let level_score = 100.0 - f64::from(level.as_u8()) * 20.0;
    let volume_score = ((monthly_searches as f64 / 10_000.0) * 100.0).min(100.0);
    let difficulty =
        f64::from(competition) * 0.6 + level_score * 0.3 + volume_score * 0.1;
    difficulty.clamp(0.0, 100.0).round() as u8
}

/// Competition analyzer over two independent external signals with a pure
/// fallback. Signal failures are logged and treated as absent.
pub struct CompetitionAnalyzer {
    listings: Arc<dyn ListingCountSource>,
    stats: Arc<dyn KeywordStatsSource>,
}

impl CompetitionAnalyzer {
    pub fn new(listings: Arc<dyn ListingCountSource>, stats: Arc<dyn KeywordStatsSource>) -> Self {
        Self { listings, stats }
    }

    pub async fn analyze(&self, keyword: &str) -> CompetitionSignals {
        let listing_count = if self.listings.is_configured() {
            match self.listings.listing_count(keyword).await {
                Ok(count) => Some(count),
                Err(e) => {
                    tracing::debug!(keyword, error = %e, "listing count unavailable");
                    None
                }
            }
        } else {
            None
        };

        let ad_row = if self.stats.is_configured() {
            match self.stats.keyword_stats(&[keyword.to_string()]).await {
                Ok(rows) => rows.into_iter().next(),
                Err(e) => {
                    tracing::debug!(keyword, error = %e, "ad competition unavailable");
                    None
                }
            }
        } else {
            None
        };

        let tier = ad_row.as_ref().and_then(|row| row.competition_tier);
        let avg_cpc = ad_row.as_ref().map(|row| row.avg_cpc);

        let ad_score = tier.map(|t| ad_signal_score(t, avg_cpc.unwrap_or(0)));
        let listing_score = listing_count.map(listing_signal_score);

        // Ad data reflects advertiser demand directly, so it outweighs the
        // listing count when both are present.
        let score = match (ad_score, listing_score) {
            (Some(ad), Some(local)) => ad * 0.6 + local * 0.4,
            (Some(ad), None) => ad,
            (None, Some(local)) => local,
            (None, None) => length_fallback_score(keyword),
        };

        CompetitionSignals {
            score: score.clamp(0.0, 100.0).round() as u8,
            listing_count: listing_count.unwrap_or(0),
            tier,
            avg_cpc,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use keylift_core::{KeywordStats, KeyliftError, Result};

    struct ListingStub {
        configured: bool,
        count: Option<u64>,
    }

    #[async_trait]
    impl ListingCountSource for ListingStub {
        async fn listing_count(&self, _keyword: &str) -> Result<u64> {
            self.count
                .ok_or_else(|| KeyliftError::Source("simulated outage".into()))
        }

        fn is_configured(&self) -> bool {
            self.configured
        }
    }

    struct AdStub {
        configured: bool,
        tier: Option<CompetitionTier>,
        avg_cpc: u64,
    }

    #[async_trait]
    impl KeywordStatsSource for AdStub {
        async fn keyword_stats(&self, keywords: &[String]) -> Result<Vec<KeywordStats>> {
            Ok(vec![KeywordStats {
                keyword: keywords.first().cloned().unwrap_or_default(),
                monthly_pc_searches: 0,
                monthly_mobile_searches: 0,
                competition_tier: self.tier,
                avg_cpc: self.avg_cpc,
            }])
        }

        fn is_configured(&self) -> bool {
            self.configured
        }
    }

    fn analyzer(listings: ListingStub, ads: AdStub) -> CompetitionAnalyzer {
        CompetitionAnalyzer::new(Arc::new(listings), Arc::new(ads))
    }

    #[tokio::test]
    async fn blends_both_signals_with_ad_weight_dominant() {
        let analyzer = analyzer(
            ListingStub { configured: true, count: Some(9_999) },
            AdStub { configured: true, tier: Some(CompetitionTier::High), avg_cpc: 2_000 },
        );
        let signals = analyzer.analyze("강남 카페").await;
        // ad = 80 + 2 = 82, local = log10(10000)/6*100 ≈ 66.7 → 0.6·82 + 0.4·66.7 ≈ 76
        assert_eq!(signals.score, 76);
        assert_eq!(signals.tier, Some(CompetitionTier::High));
        assert_eq!(signals.listing_count, 9_999);
    }

    #[tokio::test]
    async fn score_stays_in_range_for_every_signal_combination() {
        let combos: Vec<(bool, Option<u64>, bool, Option<CompetitionTier>)> = vec![
            (true, Some(0), true, Some(CompetitionTier::High)),
            (true, Some(u64::MAX / 2), true, Some(CompetitionTier::Low)),
            (true, None, true, None),
            (true, Some(500), false, None),
            (false, None, true, Some(CompetitionTier::Medium)),
            (false, None, false, None),
        ];
        for (listing_conf, count, ad_conf, tier) in combos {
            let analyzer = analyzer(
                ListingStub { configured: listing_conf, count },
                AdStub { configured: ad_conf, tier, avg_cpc: 100_000 },
            );
            let signals = analyzer.analyze("강남 맛집").await;
            assert!(signals.score <= 100);
        }
    }

    #[tokio::test]
    async fn no_signals_uses_length_fallback() {
        let no_signal = analyzer(
            ListingStub { configured: false, count: None },
            AdStub { configured: false, tier: None, avg_cpc: 0 },
        );
        assert_eq!(no_signal.analyze("맛집").await.score, 90);
        assert_eq!(
            no_signal
                .analyze("강남역 근처 데이트 하기좋은 조용한 맛집")
                .await
                .score,
            15
        );
    }

    #[tokio::test]
    async fn repeated_analysis_is_idempotent() {
        let analyzer = analyzer(
            ListingStub { configured: true, count: Some(4_821) },
            AdStub { configured: true, tier: Some(CompetitionTier::Medium), avg_cpc: 850 },
        );
        let first = analyzer.analyze("강남역 브런치 카페").await;
        let second = analyzer.analyze("강남역 브런치 카페").await;
        assert_eq!(first, second);
    }

    #[test]
    fn cpc_nudge_is_capped() {
        assert_eq!(ad_signal_score(CompetitionTier::High, 0), 80.0);
        assert_eq!(ad_signal_score(CompetitionTier::High, 1_000_000), 95.0);
        assert_eq!(ad_signal_score(CompetitionTier::Low, 500), 20.5);
    }

    #[test]
    fn listing_scale_is_logarithmic_and_clamped() {
        assert_eq!(listing_signal_score(0), 0.0);
        assert!(listing_signal_score(999) < listing_signal_score(99_999));
        assert_eq!(listing_signal_score(u64::MAX), 100.0);
    }

    #[test]
    fn difficulty_is_clamped_and_tracks_competition() {
        let easy = difficulty_score(10, KeywordLevel::Longtail, 100);
        let hard = difficulty_score(95, KeywordLevel::Top, 1_000_000);
        assert!(easy < hard);
        assert!(hard <= 100);
        // competition 95·0.6 + level 80·0.3 + volume 100·0.1 = 91
        assert_eq!(hard, 91);
    }
}
