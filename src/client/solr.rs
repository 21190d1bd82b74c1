use super::result::{solr_error, PingResponse};
use super::{SearchClient, SelectQuery, SelectResult, UpdateQuery, UpdateResult};
use crate::config::SolrConfig;
use crate::{Error, Result};
use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;
use reqwest::{Client, Response};
use std::time::Instant;
use tracing::{debug, info, warn};
use url::Url;

/// reqwest-backed Solr client.
///
/// Endpoints are resolved relative to the configured base URL, so with a
/// base of `http://localhost:8983/solr` the endpoint `posts` selects from
/// `http://localhost:8983/solr/posts/select`.
#[derive(Debug, Clone)]
pub struct SolrClient {
    http_client: Client,
    base_url: Url,
}

impl SolrClient {
    /// Create a client from connection settings
    pub fn new(config: &SolrConfig) -> Result<Self> {
        let mut base_url = Url::parse(&config.base_url)?;
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }

        let http_client = Client::builder()
            .timeout(config.timeout())
            .connect_timeout(config.connect_timeout())
            .user_agent(&config.user_agent)
            .gzip(true)
            .build()?;

        info!("Initialized Solr client for {}", base_url);

        Ok(Self {
            http_client,
            base_url,
        })
    }

    #[must_use]
    pub const fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn handler_url(&self, endpoint: &str, handler: &str) -> Result<Url> {
        let endpoint = endpoint.trim_matches('/');
        if endpoint.is_empty() {
            return Err(Error::invalid_input("endpoint", "endpoint cannot be empty"));
        }
        Ok(self.base_url.join(&format!("{endpoint}/{handler}"))?)
    }

    /// Read the body, turning non-2xx responses into [`Error::Solr`]
    async fn read_body(response: Response) -> Result<String> {
        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            let error = solr_error(status.as_u16(), &body);
            warn!("Solr request failed: {}", error);
            return Err(error);
        }

        Ok(body)
    }
}

#[async_trait]
impl SearchClient for SolrClient {
    async fn update(&self, endpoint: &str, query: &UpdateQuery) -> Result<UpdateResult> {
        let url = self.handler_url(endpoint, "update")?;
        let body = query.to_json()?;
        let start_time = Instant::now();

        debug!("Solr update to {} with {} commands", url, query.len());

        let response = self
            .http_client
            .post(url)
            .query(&[("wt", "json")])
            .header(CONTENT_TYPE, "application/json")
            .body(body)
            .send()
            .await?;

        let result = UpdateResult::from_json(&Self::read_body(response).await?)?;
        debug!(
            "Solr update on {} finished in {:?} (QTime {}ms)",
            endpoint,
            start_time.elapsed(),
            result.query_time_ms
        );
        Ok(result)
    }

    async fn select(&self, endpoint: &str, query: &SelectQuery) -> Result<SelectResult> {
        let url = self.handler_url(endpoint, "select")?;
        let start_time = Instant::now();

        debug!("Solr select on {}: q={}", url, query.query());

        let response = self
            .http_client
            .get(url)
            .query(&query.to_params())
            .send()
            .await?;

        let result = SelectResult::from_json(&Self::read_body(response).await?)?;
        debug!(
            "Solr select on {} returned {}/{} documents in {:?}",
            endpoint,
            result.documents.len(),
            result.num_found,
            start_time.elapsed()
        );
        Ok(result)
    }

    async fn ping(&self, endpoint: &str) -> Result<bool> {
        let url = self.handler_url(endpoint, "admin/ping")?;
        debug!("Pinging Solr endpoint {}", url);

        let response = self
            .http_client
            .get(url)
            .query(&[("wt", "json")])
            .send()
            .await?;

        let body = Self::read_body(response).await?;
        let ping: PingResponse = serde_json::from_str(&body)?;
        Ok(ping.status.eq_ignore_ascii_case("ok"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_handler_url_joins_endpoint() {
        let client =
            SolrClient::new(&SolrConfig::with_base_url("http://localhost:8983/solr")).unwrap();
        assert_eq!(client.base_url().as_str(), "http://localhost:8983/solr/");
        assert_eq!(
            client.handler_url("posts", "select").unwrap().as_str(),
            "http://localhost:8983/solr/posts/select"
        );
        assert_eq!(
            client.handler_url("/posts/", "admin/ping").unwrap().as_str(),
            "http://localhost:8983/solr/posts/admin/ping"
        );
    }

    #[test]
    fn test_handler_url_rejects_empty_endpoint() {
        let client = SolrClient::new(&SolrConfig::default()).unwrap();
        assert!(matches!(
            client.handler_url("/", "update"),
            Err(Error::InvalidInput { .. })
        ));
    }

    #[test]
    fn test_invalid_base_url() {
        assert!(matches!(
            SolrClient::new(&SolrConfig::with_base_url("not a url")),
            Err(Error::Url(_))
        ));
    }
}
