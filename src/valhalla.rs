//! Valhalla HTTP adapter for turn-by-turn routes.

use tracing::debug;

use crate::error::Result;
use crate::request::RouteRequest;
use crate::traits::RouteProvider;

#[derive(Debug, Clone)]
pub struct ValhallaConfig {
    pub base_url: String,
    pub api_key: Option<String>,
    pub timeout_secs: u64,
}

impl Default for ValhallaConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8002".to_string(),
            api_key: None,
            timeout_secs: 10,
        }
    }
}

#[derive(Debug, Clone)]
pub struct ValhallaClient {
    config: ValhallaConfig,
    client: reqwest::blocking::Client,
}

impl ValhallaClient {
    pub fn new(config: ValhallaConfig) -> std::result::Result<Self, reqwest::Error> {
        let client = reqwest::blocking::Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self { config, client })
    }

    pub fn config(&self) -> &ValhallaConfig {
        &self.config
    }

    pub fn route_url(&self) -> String {
        format!("{}/route", self.config.base_url.trim_end_matches('/'))
    }

    /// Query string pairs: the request as `json`, plus `api_key` when set.
    pub fn query_params(&self, request: &RouteRequest) -> Result<Vec<(&'static str, String)>> {
        let mut params = vec![("json", request.to_json()?)];
        if let Some(key) = &self.config.api_key {
            params.push(("api_key", key.clone()));
        }
        Ok(params)
    }
}

impl RouteProvider for ValhallaClient {
    fn fetch_route(&self, request: &RouteRequest) -> Result<String> {
        let url = self.route_url();
        let params = self.query_params(request)?;
        debug!(url = %url, locations = request.locations.len(), "requesting route");

        let body = self
            .client
            .get(url)
            .query(&params)
            .send()
            .and_then(|resp| resp.error_for_status())
            .and_then(|resp| resp.text())?;

        debug!(bytes = body.len(), "route response received");
        Ok(body)
    }
}
