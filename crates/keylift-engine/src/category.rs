use keylift_core::{CategoryTemplate, KeywordLevel, KeyliftError, Result};
use serde::Deserialize;
use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::path::Path;
use std::sync::Arc;

/// Category templates compiled into the binary. A configured directory
/// overrides these; an empty deployment still knows the standard set.
const EMBEDDED_TEMPLATES: &[&str] = &[
    include_str!("../../../config/categories/restaurant.json"),
    include_str!("../../../config/categories/cafe.json"),
    include_str!("../../../config/categories/salon.json"),
    include_str!("../../../config/categories/hospital.json"),
    include_str!("../../../config/categories/academy.json"),
    include_str!("../../../config/categories/gym.json"),
];

const EMBEDDED_GENERIC_STRATEGIES: &str =
    include_str!("../../../config/categories/_generic_strategies.json");

#[derive(Debug, Default, Deserialize)]
struct GenericStrategyFile {
    #[serde(default)]
    strategies: BTreeMap<String, Vec<String>>,
    #[serde(default)]
    goals: BTreeMap<String, Vec<String>>,
}

/// Read-only store of business-type templates. Loaded once at startup and
/// shared by reference; nothing invalidates it during process lifetime.
pub struct CategoryStore {
    templates: HashMap<String, Arc<CategoryTemplate>>,
    aliases: HashMap<String, String>,
    generic: GenericStrategyFile,
}

impl CategoryStore {
    /// Store built solely from the templates compiled into the binary.
    pub fn embedded() -> Result<Self> {
        let mut store = Self {
            templates: HashMap::new(),
            aliases: HashMap::new(),
            generic: serde_json::from_str(EMBEDDED_GENERIC_STRATEGIES)?,
        };
        for raw in EMBEDDED_TEMPLATES {
            let template: CategoryTemplate = serde_json::from_str(raw)?;
            store.insert(template)?;
        }
        Ok(store)
    }

    /// Store loaded from a directory of `*.json` template files. Files whose
    /// name starts with `_` hold shared data (generic strategies), not
    /// templates.
    pub fn load(dir: &Path) -> Result<Self> {
        let mut store = Self {
            templates: HashMap::new(),
            aliases: HashMap::new(),
            generic: GenericStrategyFile::default(),
        };

        let generic_path = dir.join("_generic_strategies.json");
        store.generic = if generic_path.exists() {
            serde_json::from_str(&fs::read_to_string(&generic_path)?)?
        } else {
            serde_json::from_str(EMBEDDED_GENERIC_STRATEGIES)?
        };

        for entry in fs::read_dir(dir)? {
            let path = entry?.path();
            let file_name = path
                .file_name()
                .and_then(|n| n.to_str())
                .unwrap_or_default();
            if path.extension().and_then(|e| e.to_str()) != Some("json")
                || file_name.starts_with('_')
            {
                continue;
            }
            let template: CategoryTemplate = serde_json::from_str(&fs::read_to_string(&path)?)
                .map_err(|e| {
                    KeyliftError::Config(format!("invalid category file {:?}: {}", path, e))
                })?;
            store.insert(template)?;
        }

        if store.templates.is_empty() {
            return Err(KeyliftError::Config(format!(
                "no category templates found in {:?}",
                dir
            )));
        }
        Ok(store)
    }

    fn insert(&mut self, template: CategoryTemplate) -> Result<()> {
        template.validate()?;
        let name = template.name.clone();
        for alias in &template.aliases {
            self.aliases.insert(alias.clone(), name.clone());
        }
        self.templates.insert(name, Arc::new(template));
        Ok(())
    }

    /// Resolve a user-supplied business type to its canonical name.
    pub fn canonical_name(&self, business_type: &str) -> Option<&str> {
        let trimmed = business_type.trim();
        if self.templates.contains_key(trimmed) {
            return self.templates.get_key_value(trimmed).map(|(k, _)| k.as_str());
        }
        self.aliases.get(trimmed).map(String::as_str)
    }

    pub fn get(&self, business_type: &str) -> Option<Arc<CategoryTemplate>> {
        let canonical = self.canonical_name(business_type)?;
        self.templates.get(canonical).cloned()
    }

    /// Canonical category names, sorted for stable API output.
    pub fn list(&self) -> Vec<String> {
        let mut names: Vec<String> = self.templates.keys().cloned().collect();
        names.sort();
        names
    }

    /// Shared rollout strategies for a level, used when a template carries
    /// none of its own.
    pub fn generic_strategies(&self, level: KeywordLevel) -> Vec<String> {
        self.generic
            .strategies
            .get(&level.group_key())
            .cloned()
            .unwrap_or_else(|| {
                vec![
                    format!("Level {} 키워드 최적화", level.as_u8()),
                    "검색 노출 향상 전략".to_string(),
                    "리뷰 및 평점 관리".to_string(),
                ]
            })
    }

    pub fn generic_goals(&self, level: KeywordLevel) -> Vec<String> {
        self.generic
            .goals
            .get(&level.group_key())
            .cloned()
            .unwrap_or_else(|| {
                vec![
                    format!("Level {} 키워드 상위 노출", level.as_u8()),
                    "지속적 트래픽 증가".to_string(),
                ]
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn embedded_store_knows_standard_categories() {
        let store = CategoryStore::embedded().unwrap();
        assert_eq!(
            store.list(),
            vec!["미용실", "병원", "음식점", "카페", "학원", "헬스장"]
        );
    }

    #[test]
    fn aliases_resolve_to_canonical_template() {
        let store = CategoryStore::embedded().unwrap();
        assert_eq!(store.canonical_name("커피숍"), Some("카페"));
        assert_eq!(store.canonical_name("식당"), Some("음식점"));
        let direct = store.get("카페").unwrap();
        let via_alias = store.get("커피숍").unwrap();
        assert_eq!(direct.name, via_alias.name);
    }

    #[test]
    fn unknown_category_is_none() {
        let store = CategoryStore::embedded().unwrap();
        assert!(store.get("수족관").is_none());
    }

    #[test]
    fn generic_strategies_cover_every_level() {
        let store = CategoryStore::embedded().unwrap();
        for level in KeywordLevel::DESCENDING {
            assert!(!store.generic_strategies(level).is_empty());
            assert!(!store.generic_goals(level).is_empty());
        }
    }

    #[test]
    fn loading_from_directory_matches_embedded() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join("cafe.json"),
            include_str!("../../../config/categories/cafe.json"),
        )
        .unwrap();
        let store = CategoryStore::load(dir.path()).unwrap();
        assert_eq!(store.list(), vec!["카페"]);
        // Generic strategies fall back to the embedded file.
        assert!(!store.generic_strategies(KeywordLevel::Longtail).is_empty());
    }

    #[test]
    fn empty_directory_is_a_config_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(CategoryStore::load(dir.path()).is_err());
    }

    #[test]
    fn rates_are_probabilities() {
        let store = CategoryStore::embedded().unwrap();
        for name in store.list() {
            let template = store.get(&name).unwrap();
            assert!((0.0..=1.0).contains(&template.usage_rate));
            assert!((0.0..=1.0).contains(&template.search_rate));
            assert!((0.0..=1.0).contains(&template.conversion_rate));
        }
    }
}
