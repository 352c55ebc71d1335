//! `/statistics` endpoints
//!
//! Dashboard figures are loosely shaped maps; they are handed back as JSON.

use crate::Gateway;
use crate::request::ApiRequest;
use newsrag_core::Result;
use serde_json::Value;
use std::sync::Arc;

#[derive(Debug, Clone)]
pub struct StatisticsApi {
    gateway: Arc<Gateway>,
}

impl StatisticsApi {
    pub fn new(gateway: Arc<Gateway>) -> Self {
        Self { gateway }
    }

    pub async fn overview(&self) -> Result<Value> {
        self.gateway
            .send_value(ApiRequest::get("/statistics/overview"))
            .await
    }

    pub async fn detailed(&self) -> Result<Value> {
        self.gateway
            .send_value(ApiRequest::get("/statistics/detailed"))
            .await
    }

    /// Ten most frequent keywords with their counts
    pub async fn keywords_top10(&self) -> Result<Vec<Value>> {
        self.gateway
            .send(ApiRequest::get("/statistics/keywords-top10"))
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::test_support::gateway_expecting;
    use reqwest::Method;
    use serde_json::json;

    #[tokio::test]
    async fn test_overview_returned_unchanged() {
        let data = json!({"totalEntries": 120, "todayQueries": 8, "sources": {"rss": 3}});
        let (gateway, _) = gateway_expecting(
            |req| req.method == Method::GET && req.path == "/statistics/overview",
            data.clone(),
        );

        assert_eq!(StatisticsApi::new(gateway).overview().await.unwrap(), data);
    }

    #[tokio::test]
    async fn test_detailed() {
        let (gateway, _) = gateway_expecting(
            |req| req.path == "/statistics/detailed",
            json!({"byContentType": {"article": 10}}),
        );

        let data = StatisticsApi::new(gateway).detailed().await.unwrap();
        assert_eq!(data["byContentType"]["article"], 10);
    }

    #[tokio::test]
    async fn test_keywords_top10() {
        let (gateway, _) = gateway_expecting(
            |req| req.path == "/statistics/keywords-top10",
            json!([{"keyword": "AI", "count": 42}, {"keyword": "芯片", "count": 17}]),
        );

        let keywords = StatisticsApi::new(gateway).keywords_top10().await.unwrap();
        assert_eq!(keywords.len(), 2);
        assert_eq!(keywords[0]["keyword"], "AI");
    }
}
