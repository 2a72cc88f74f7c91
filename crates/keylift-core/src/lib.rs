pub mod config;
pub mod error;
pub mod traits;
pub mod types;

pub use config::{
    CategorySettings, ListingSearchSettings, LlmSettings, LoggingSettings, PopulationSettings,
    SearchAdsSettings, ServerSettings, Settings,
};
pub use error::*;
pub use traits::*;
pub use types::*;
