use keylift_ai::{LLMProvider, LlmProviderFactory};
use keylift_core::{Result, Settings};
use keylift_engine::{AnalysisEngine, CategoryStore};
use keylift_sources::{LocalSearchClient, PopulationDirectory, SearchAdsClient};
use std::path::Path;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub engine: Arc<AnalysisEngine>,
    pub settings: Arc<Settings>,
}

impl AppState {
    pub fn new(settings: Settings) -> Result<Self> {
        let store = match &settings.categories.dir {
            Some(dir) => Arc::new(CategoryStore::load(Path::new(dir))?),
            None => Arc::new(CategoryStore::embedded()?),
        };

        let provider: Option<Arc<dyn LLMProvider>> =
            match LlmProviderFactory::create_from_settings(&settings.llm) {
                Ok(provider) => {
                    tracing::info!(
                        provider = provider.provider_name(),
                        model = provider.model_name(),
                        "LLM keyword generation enabled"
                    );
                    Some(provider)
                }
                Err(e) => {
                    tracing::warn!(error = %e, "LLM unavailable, template fallback only");
                    None
                }
            };

        let stats = Arc::new(SearchAdsClient::new(&settings.search_ads)?);
        let listings = Arc::new(LocalSearchClient::new(&settings.listing_search)?);
        let population = Arc::new(PopulationDirectory::new(&settings.population));

        let engine = Arc::new(AnalysisEngine::new(
            store, provider, stats, listings, population,
        ));

        Ok(Self {
            engine,
            settings: Arc::new(settings),
        })
    }
}
