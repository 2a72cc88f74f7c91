use async_trait::async_trait;
use base64::{engine::general_purpose, Engine as _};
use hmac::{Hmac, Mac};
use keylift_core::{
    CompetitionTier, KeywordStats, KeywordStatsSource, KeyliftError, Result, SearchAdsSettings,
};
use reqwest::Client;
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Deserializer};
use sha2::Sha256;
use std::time::Duration;

type HmacSha256 = Hmac<Sha256>;

const KEYWORD_TOOL_URI: &str = "/keywordstool";

/// Client for the signed keyword-statistics API: monthly search counts,
/// ad-competition tier and average CPC per keyword.
pub struct SearchAdsClient {
    base_url: String,
    customer_id: Option<String>,
    api_key: Option<String>,
    secret_key: Option<SecretString>,
    max_batch: usize,
    client: Client,
}

impl SearchAdsClient {
    pub fn new(settings: &SearchAdsSettings) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(settings.timeout_secs))
            .build()
            .map_err(|e| KeyliftError::Source(format!("failed to create HTTP client: {}", e)))?;

        Ok(Self {
            base_url: settings.base_url.trim_end_matches('/').to_string(),
            customer_id: settings.customer_id.clone(),
            api_key: settings.api_key.clone(),
            secret_key: settings.secret_key.clone(),
            max_batch: settings.max_batch,
            client,
        })
    }

    /// Request signature: base64(HMAC-SHA256("{timestamp}.{method}.{uri}")).
    fn sign(secret_key: &str, timestamp: &str, method: &str, uri: &str) -> String {
        let message = format!("{}.{}.{}", timestamp, method, uri);
        let mut mac = HmacSha256::new_from_slice(secret_key.as_bytes())
            .expect("HMAC accepts keys of any length");
        mac.update(message.as_bytes());
        general_purpose::STANDARD.encode(mac.finalize().into_bytes())
    }

    fn signed_headers(&self, method: &str, uri: &str) -> Option<[(&'static str, String); 4]> {
        let api_key = self.api_key.as_ref()?;
        let customer_id = self.customer_id.as_ref()?;
        let secret_key = self.secret_key.as_ref()?;

        let timestamp = chrono::Utc::now().timestamp_millis().to_string();
        let signature = Self::sign(secret_key.expose_secret(), &timestamp, method, uri);

        Some([
            ("X-Timestamp", timestamp),
            ("X-API-KEY", api_key.clone()),
            ("X-Customer", customer_id.clone()),
            ("X-Signature", signature),
        ])
    }
}

#[async_trait]
impl KeywordStatsSource for SearchAdsClient {
    async fn keyword_stats(&self, keywords: &[String]) -> Result<Vec<KeywordStats>> {
        let headers = self
            .signed_headers("GET", KEYWORD_TOOL_URI)
            .ok_or_else(|| KeyliftError::Source("keyword statistics credentials not configured".into()))?;

        // Hint keywords are capped by the service; the estimator only ever
        // sends one keyword at a time, but batched callers get truncation
        // instead of a rejected request.
        let batch: Vec<&str> = keywords
            .iter()
            .take(self.max_batch)
            .map(String::as_str)
            .collect();
        if batch.is_empty() {
            return Ok(Vec::new());
        }

        let mut request = self
            .client
            .get(format!("{}{}", self.base_url, KEYWORD_TOOL_URI))
            .query(&[("hintKeywords", batch.join(",")), ("showDetail", "1".into())]);
        for (name, value) in headers {
            request = request.header(name, value);
        }

        let response = request
            .send()
            .await
            .map_err(|e| KeyliftError::Source(format!("keyword statistics request failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            return Err(KeyliftError::Source(format!(
                "keyword statistics request returned {}",
                status
            )));
        }

        let body: KeywordToolResponse = response
            .json()
            .await
            .map_err(|e| KeyliftError::Source(format!("malformed keyword statistics body: {}", e)))?;

        tracing::debug!(rows = body.keyword_list.len(), "keyword statistics response");

        Ok(body.keyword_list.into_iter().map(KeywordStats::from).collect())
    }

    fn is_configured(&self) -> bool {
        self.api_key.is_some() && self.secret_key.is_some() && self.customer_id.is_some()
    }
}

// Wire types

#[derive(Debug, Deserialize)]
struct KeywordToolResponse {
    #[serde(rename = "keywordList", default)]
    keyword_list: Vec<KeywordRow>,
}

#[derive(Debug, Deserialize)]
struct KeywordRow {
    #[serde(rename = "relKeyword", default)]
    rel_keyword: String,
    #[serde(rename = "monthlyPcQcCnt", default, deserialize_with = "lenient_count")]
    monthly_pc: u64,
    #[serde(rename = "monthlyMobileQcCnt", default, deserialize_with = "lenient_count")]
    monthly_mobile: u64,
    #[serde(rename = "compIdx", default)]
    comp_idx: Option<String>,
    #[serde(rename = "plAvgDepth", default, deserialize_with = "lenient_count")]
    avg_cpc: u64,
}

impl From<KeywordRow> for KeywordStats {
    fn from(row: KeywordRow) -> Self {
        KeywordStats {
            keyword: row.rel_keyword,
            monthly_pc_searches: row.monthly_pc,
            monthly_mobile_searches: row.monthly_mobile,
            competition_tier: row.comp_idx.as_deref().and_then(parse_tier),
            avg_cpc: row.avg_cpc,
        }
    }
}

fn parse_tier(raw: &str) -> Option<CompetitionTier> {
    match raw.trim() {
        "높음" | "high" | "HIGH" => Some(CompetitionTier::High),
        "중간" | "medium" | "MEDIUM" => Some(CompetitionTier::Medium),
        "낮음" | "low" | "LOW" => Some(CompetitionTier::Low),
        _ => None,
    }
}

/// Count fields arrive as numbers or opaque strings like "< 10" for
/// low-volume keywords. Anything non-numeric reads as zero.
fn lenient_count<'de, D>(deserializer: D) -> std::result::Result<u64, D::Error>
where
    D: Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(match value {
        serde_json::Value::Number(n) => n.as_f64().map(|f| f.max(0.0) as u64).unwrap_or(0),
        serde_json::Value::String(s) => s.trim().parse::<u64>().unwrap_or(0),
        _ => 0,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn signature_is_deterministic_for_fixed_inputs() {
        let a = SearchAdsClient::sign("secret", "1700000000000", "GET", KEYWORD_TOOL_URI);
        let b = SearchAdsClient::sign("secret", "1700000000000", "GET", KEYWORD_TOOL_URI);
        assert_eq!(a, b);

        let c = SearchAdsClient::sign("secret", "1700000000001", "GET", KEYWORD_TOOL_URI);
        assert_ne!(a, c);
    }

    #[test]
    fn row_parses_numeric_and_string_counts() {
        let raw = r#"{
            "keywordList": [
                {"relKeyword": "강남 카페", "monthlyPcQcCnt": 1200, "monthlyMobileQcCnt": "3400", "compIdx": "높음", "plAvgDepth": 850},
                {"relKeyword": "조용한 카페", "monthlyPcQcCnt": "< 10", "monthlyMobileQcCnt": "< 10", "compIdx": "낮음"}
            ]
        }"#;
        let body: KeywordToolResponse = serde_json::from_str(raw).unwrap();
        let stats: Vec<KeywordStats> = body.keyword_list.into_iter().map(KeywordStats::from).collect();

        assert_eq!(stats[0].monthly_pc_searches, 1200);
        assert_eq!(stats[0].monthly_mobile_searches, 3400);
        assert_eq!(stats[0].competition_tier, Some(CompetitionTier::High));
        assert_eq!(stats[0].avg_cpc, 850);

        assert_eq!(stats[1].monthly_pc_searches, 0);
        assert_eq!(stats[1].monthly_mobile_searches, 0);
        assert_eq!(stats[1].competition_tier, Some(CompetitionTier::Low));
    }

    #[test]
    fn unknown_tier_reads_as_none() {
        assert_eq!(parse_tier("보통"), None);
        assert_eq!(parse_tier("중간"), Some(CompetitionTier::Medium));
    }

    #[test]
    fn unconfigured_client_reports_it() {
        let client = SearchAdsClient::new(&SearchAdsSettings::default()).unwrap();
        assert!(!client.is_configured());
    }
}
