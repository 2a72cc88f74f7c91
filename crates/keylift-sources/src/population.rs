use async_trait::async_trait;
use keylift_core::{PopulationSettings, PopulationSource};
use once_cell::sync::Lazy;
use reqwest::Client;
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use std::collections::HashMap;
use std::time::Duration;

/// Resident population of major administrative districts, 2024 figures.
/// Consulted before any remote lookup; demographics move slowly enough
/// that a compiled-in table answers most requests instantly.
static DISTRICT_POPULATION: Lazy<HashMap<&'static str, u64>> = Lazy::new(|| {
    HashMap::from([
        // 서울특별시
        ("서울 강남구", 560_000),
        ("서울 서초구", 420_000),
        ("서울 송파구", 660_000),
        ("서울 강동구", 450_000),
        ("서울 강서구", 580_000),
        ("서울 양천구", 470_000),
        ("서울 영등포구", 390_000),
        ("서울 구로구", 420_000),
        ("서울 금천구", 240_000),
        ("서울 관악구", 510_000),
        ("서울 동작구", 400_000),
        ("서울 마포구", 380_000),
        ("서울 서대문구", 320_000),
        ("서울 은평구", 490_000),
        ("서울 노원구", 550_000),
        ("서울 도봉구", 340_000),
        ("서울 강북구", 320_000),
        ("서울 성북구", 460_000),
        ("서울 중랑구", 410_000),
        ("서울 동대문구", 360_000),
        ("서울 광진구", 360_000),
        ("서울 성동구", 310_000),
        ("서울 용산구", 240_000),
        ("서울 중구", 130_000),
        ("서울 종로구", 160_000),
        // 부산광역시
        ("부산 해운대구", 410_000),
        ("부산 부산진구", 380_000),
        ("부산 북구", 300_000),
        ("부산 사하구", 330_000),
        ("부산 동래구", 270_000),
        ("부산 남구", 280_000),
        ("부산 연제구", 210_000),
        ("부산 수영구", 180_000),
        ("부산 금정구", 250_000),
        ("부산 중구", 45_000),
        ("부산 기장군", 180_000),
        // 대구광역시
        ("대구 수성구", 420_000),
        ("대구 달서구", 580_000),
        ("대구 북구", 440_000),
        ("대구 동구", 340_000),
        // 인천광역시
        ("인천 남동구", 520_000),
        ("인천 부평구", 510_000),
        ("인천 서구", 550_000),
        ("인천 연수구", 340_000),
        ("인천 미추홀구", 410_000),
        // 광주·대전·울산·세종
        ("광주 북구", 450_000),
        ("광주 서구", 310_000),
        ("광주 광산구", 390_000),
        ("대전 유성구", 350_000),
        ("대전 서구", 480_000),
        ("울산 남구", 340_000),
        ("세종", 380_000),
        // 경기도 주요 시
        ("경기 수원시", 1_200_000),
        ("경기 성남시", 950_000),
        ("경기 고양시", 1_050_000),
        ("경기 용인시", 1_080_000),
        ("경기 부천시", 820_000),
        ("경기 안산시", 660_000),
        ("경기 안양시", 550_000),
        ("경기 남양주시", 720_000),
        ("경기 화성시", 950_000),
        ("경기 평택시", 580_000),
        ("경기 김포시", 520_000),
        ("경기 하남시", 300_000),
        // 광역시 외 주요 도시
        ("강원 춘천시", 280_000),
        ("강원 원주시", 360_000),
        ("강원 강릉시", 210_000),
        ("충북 청주시", 850_000),
        ("충남 천안시", 680_000),
        ("전북 전주시", 660_000),
        ("전남 여수시", 280_000),
        ("전남 순천시", 280_000),
        ("경북 포항시", 500_000),
        ("경북 구미시", 410_000),
        ("경남 창원시", 1_040_000),
        ("경남 김해시", 560_000),
        ("경남 진주시", 340_000),
        ("제주 제주시", 490_000),
        ("제주 서귀포시", 190_000),
    ])
});

/// Region population lookup: embedded table first, then an optional remote
/// demographics endpoint. Unknown regions resolve to `None` so the volume
/// estimator can fall through to its keyword-length tier.
pub struct PopulationDirectory {
    remote: Option<RemoteLookup>,
}

struct RemoteLookup {
    base_url: String,
    api_key: Option<SecretString>,
    client: Client,
}

impl PopulationDirectory {
    pub fn new(settings: &PopulationSettings) -> Self {
        let remote = settings.base_url.as_ref().and_then(|base_url| {
            Client::builder()
                .timeout(Duration::from_secs(settings.timeout_secs))
                .build()
                .ok()
                .map(|client| RemoteLookup {
                    base_url: base_url.clone(),
                    api_key: settings.api_key.clone(),
                    client,
                })
        });

        Self { remote }
    }

    /// Table-only directory, used in tests and offline deployments.
    pub fn embedded() -> Self {
        Self { remote: None }
    }

    fn from_table(location: &str) -> Option<u64> {
        let normalized = location.trim();
        DISTRICT_POPULATION.get(normalized).copied()
    }

    async fn from_remote(&self, location: &str) -> Option<u64> {
        let remote = self.remote.as_ref()?;

        let mut request = remote
            .client
            .get(&remote.base_url)
            .query(&[("region", location)]);
        if let Some(key) = &remote.api_key {
            request = request.query(&[("serviceKey", key.expose_secret())]);
        }

        let response = match request.send().await {
            Ok(response) if response.status().is_success() => response,
            Ok(response) => {
                tracing::warn!(status = %response.status(), "population lookup failed");
                return None;
            }
            Err(e) => {
                tracing::warn!(error = %e, "population lookup failed");
                return None;
            }
        };

        match response.json::<PopulationResponse>().await {
            Ok(body) => body.population,
            Err(e) => {
                tracing::warn!(error = %e, "malformed population body");
                None
            }
        }
    }
}

#[async_trait]
impl PopulationSource for PopulationDirectory {
    async fn population(&self, location: &str) -> Option<u64> {
        if let Some(population) = Self::from_table(location) {
            return Some(population);
        }
        self.from_remote(location).await
    }
}

#[derive(Debug, Deserialize)]
struct PopulationResponse {
    #[serde(default)]
    population: Option<u64>,
}
