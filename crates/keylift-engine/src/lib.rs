pub mod category;
pub mod competition;
pub mod engine;
pub mod generator;
pub mod planner;
pub mod volume;

pub use category::CategoryStore;
pub use competition::{difficulty_score, CompetitionAnalyzer, CompetitionSignals};
pub use engine::AnalysisEngine;
pub use generator::KeywordGenerator;
pub use planner::{estimated_daily_traffic, rank_target, StrategyPlanner};
pub use volume::{volume_multiplier, VolumeEstimator};
