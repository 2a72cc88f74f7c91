use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Difficulty tier of a keyword. Level 5 is the most specific longtail
/// phrase (easiest to rank for), level 1 the broadest head term.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum KeywordLevel {
    Longtail,
    Niche,
    Medium,
    Competitive,
    Top,
}

impl KeywordLevel {
    /// All levels in roadmap order, easiest first.
    pub const DESCENDING: [KeywordLevel; 5] = [
        KeywordLevel::Longtail,
        KeywordLevel::Niche,
        KeywordLevel::Medium,
        KeywordLevel::Competitive,
        KeywordLevel::Top,
    ];

    pub fn as_u8(self) -> u8 {
        match self {
            KeywordLevel::Longtail => 5,
            KeywordLevel::Niche => 4,
            KeywordLevel::Medium => 3,
            KeywordLevel::Competitive => 2,
            KeywordLevel::Top => 1,
        }
    }

    /// Korean display name used in API payloads.
    pub fn display_name(self) -> &'static str {
        match self {
            KeywordLevel::Longtail => "롱테일 (가장 쉬움)",
            KeywordLevel::Niche => "니치",
            KeywordLevel::Medium => "중간",
            KeywordLevel::Competitive => "경쟁",
            KeywordLevel::Top => "최상위 (가장 어려움)",
        }
    }

    /// Grouping key used in response payloads, e.g. "level_5".
    pub fn group_key(self) -> String {
        format!("level_{}", self.as_u8())
    }

    /// Coarse level inferred from how specific a keyword looks. Used when a
    /// model response carries no usable level.
    pub fn infer_from_word_count(words: usize) -> Self {
        match words {
            0..=1 => KeywordLevel::Top,
            2 => KeywordLevel::Competitive,
            3 => KeywordLevel::Medium,
            4 => KeywordLevel::Niche,
            _ => KeywordLevel::Longtail,
        }
    }
}

impl From<KeywordLevel> for u8 {
    fn from(level: KeywordLevel) -> u8 {
        level.as_u8()
    }
}

impl TryFrom<u8> for KeywordLevel {
    type Error = String;

    fn try_from(value: u8) -> std::result::Result<Self, Self::Error> {
        match value {
            5 => Ok(KeywordLevel::Longtail),
            4 => Ok(KeywordLevel::Niche),
            3 => Ok(KeywordLevel::Medium),
            2 => Ok(KeywordLevel::Competitive),
            1 => Ok(KeywordLevel::Top),
            other => Err(format!("keyword level must be 1..=5, got {}", other)),
        }
    }
}

impl fmt::Display for KeywordLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_u8())
    }
}

/// A generated keyword before any volume/competition analysis.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeywordCandidate {
    pub text: String,
    pub level: KeywordLevel,
    /// Why this keyword was suggested, in the user's language.
    pub reason: String,
}

/// Provenance of a volume figure: live statistics API or a local estimate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VolumeSource {
    Api,
    Estimated,
}

impl fmt::Display for VolumeSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VolumeSource::Api => write!(f, "api"),
            VolumeSource::Estimated => write!(f, "estimated"),
        }
    }
}

/// Monthly search volume for one keyword, split by device class.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchVolume {
    pub total: u64,
    pub pc: u64,
    pub mobile: u64,
    pub source: VolumeSource,
}

impl SearchVolume {
    pub fn estimated(total: u64) -> Self {
        // Observed device split on local queries: roughly 30% PC, 70% mobile.
        Self {
            total,
            pc: (total as f64 * 0.3) as u64,
            mobile: (total as f64 * 0.7) as u64,
            source: VolumeSource::Estimated,
        }
    }
}

/// Qualitative ad-market competition tier reported by the statistics API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CompetitionTier {
    High,
    Medium,
    Low,
}

/// One row of the keyword statistics feed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeywordStats {
    pub keyword: String,
    pub monthly_pc_searches: u64,
    pub monthly_mobile_searches: u64,
    pub competition_tier: Option<CompetitionTier>,
    /// Average cost-per-click in won; 0 when the feed omits it.
    pub avg_cpc: u64,
}

impl KeywordStats {
    pub fn monthly_total(&self) -> u64 {
        self.monthly_pc_searches + self.monthly_mobile_searches
    }
}

/// Fully analyzed keyword. Derived once per candidate, never mutated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeywordMetrics {
    pub keyword: String,
    pub level: KeywordLevel,
    pub level_name: String,
    pub estimated_monthly_searches: u64,
    pub monthly_pc_searches: u64,
    pub monthly_mobile_searches: u64,
    /// 0..=100, higher means more contested.
    pub competition_score: u8,
    /// Competing listings found in local search.
    pub listing_count: u64,
    /// 0..=100, blend of competition, level and volume.
    pub difficulty_score: u8,
    pub recommended_rank_target: String,
    pub estimated_timeline: String,
    pub estimated_daily_traffic: u64,
    pub confidence: VolumeSource,
}

/// One step of the rollout roadmap.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StrategyPhase {
    pub phase: u32,
    pub name: String,
    pub duration: String,
    pub target_level: KeywordLevel,
    pub target_level_name: String,
    pub target_keywords: Vec<String>,
    /// Best traffic-for-effort keywords of this phase, at most five.
    pub priority_keywords: Vec<String>,
    pub strategies: Vec<String>,
    pub goals: Vec<String>,
    pub expected_daily_visitors: u64,
    pub cumulative_visitors: u64,
    pub difficulty_label: String,
}

/// Visitor-gap summary attached to every analysis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VisitorSummary {
    pub current_daily_visitors: u64,
    pub target_daily_visitors: u64,
    pub gap: i64,
    pub total_expected_traffic: u64,
    /// Percent of the gap the roadmap is expected to close. Informational;
    /// the planner never forces the target to be reachable.
    pub achievement_rate: f64,
    pub total_phases: usize,
}

/// Echo of the analyzed business.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BusinessProfile {
    pub business_type: String,
    pub location: String,
    pub specialty: Vec<String>,
}

/// Input for one analysis run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalysisRequest {
    pub business_type: String,
    pub location: String,
    #[serde(default)]
    pub specialty: Vec<String>,
    #[serde(default)]
    pub current_daily_visitors: u64,
    #[serde(default = "default_target_visitors")]
    pub target_daily_visitors: u64,
}

fn default_target_visitors() -> u64 {
    100
}

/// Aggregate response of one analysis run. Created fresh per request,
/// nothing is persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisResult {
    pub business: BusinessProfile,
    pub total_keywords: usize,
    pub keywords_by_level: BTreeMap<String, Vec<KeywordMetrics>>,
    pub roadmap: Vec<StrategyPhase>,
    pub summary: VisitorSummary,
}

/// Immutable per-business-type template driving estimation and fallback
/// keyword generation. Loaded once at startup.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryTemplate {
    pub name: String,
    #[serde(default)]
    pub aliases: Vec<String>,
    /// Share of residents that use this kind of business at all.
    pub usage_rate: f64,
    /// Share of users that search before visiting.
    pub search_rate: f64,
    /// Share of searchers that convert into a visit.
    pub conversion_rate: f64,
    pub base_keywords: Vec<String>,
    pub modifiers: BTreeMap<String, Vec<String>>,
    pub longtail_patterns: Vec<String>,
    #[serde(default)]
    pub strategies: BTreeMap<String, Vec<String>>,
    #[serde(default)]
    pub goals: BTreeMap<String, Vec<String>>,
}

impl CategoryTemplate {
    /// Rates are probabilities; templates violating that are rejected at
    /// load time rather than producing nonsense volumes later.
    pub fn validate(&self) -> crate::Result<()> {
        for (field, value) in [
            ("usage_rate", self.usage_rate),
            ("search_rate", self.search_rate),
            ("conversion_rate", self.conversion_rate),
        ] {
            if !(0.0..=1.0).contains(&value) {
                return Err(crate::KeyliftError::Config(format!(
                    "category '{}': {} must be within [0, 1], got {}",
                    self.name, field, value
                )));
            }
        }
        if self.base_keywords.is_empty() {
            return Err(crate::KeyliftError::Config(format!(
                "category '{}' has no base keywords",
                self.name
            )));
        }
        Ok(())
    }
}
