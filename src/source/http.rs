use crate::errors::FetchError;
use crate::models::{ Granularity, PerformancePoint };
use super::PerformanceSource;
use async_trait::async_trait;
use log::{ debug, warn };
use reqwest::Client;

/// HTTP client for the portfolio performance API
///
/// Expects `GET {base_url}/portfolio/performance?range=<granularity>`
/// with an optional `assets=<comma-joined symbols>` filter, answering
/// a JSON array of `{date, cost, value, returns}` records.
pub struct HttpPerformanceSource {
    client: Client,
    base_url: String,
}

impl HttpPerformanceSource {
    pub fn new(client: Client, base_url: &str) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    fn endpoint(&self, granularity: Granularity, symbols: Option<&[String]>) -> String {
        let mut url = format!(
            "{}/portfolio/performance?range={}",
            self.base_url,
            granularity.as_str()
        );
        if let Some(symbols) = symbols {
            url.push_str("&assets=");
            url.push_str(&symbols.join(","));
        }
        url
    }
}

#[async_trait]
impl PerformanceSource for HttpPerformanceSource {
    async fn fetch_performance(
        &self,
        granularity: Granularity,
        symbols: Option<&[String]>
    ) -> Result<Vec<PerformancePoint>, FetchError> {
        let url = self.endpoint(granularity, symbols);
        debug!("Requesting performance series: {}", url);

        let response = self.client
            .get(&url)
            .send().await
            .map_err(|e| FetchError::Connection {
                endpoint: url.clone(),
                reason: e.to_string(),
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.ok().filter(|b| !b.is_empty());
            warn!("Performance API returned HTTP {} for {}", status.as_u16(), url);
            return Err(FetchError::HttpStatus {
                endpoint: url,
                status: status.as_u16(),
                body,
            });
        }

        let series = response
            .json::<Vec<PerformancePoint>>().await
            .map_err(|e| FetchError::Decode {
                endpoint: url.clone(),
                reason: e.to_string(),
            })?;

        debug!("Received {} performance points from {}", series.len(), url);
        Ok(series)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoint_includes_asset_filter() {
        let source = HttpPerformanceSource::new(Client::new(), "https://api.example.com/");
        let symbols = vec!["BTC".to_string(), "ETH".to_string()];

        assert_eq!(
            source.endpoint(Granularity::OneYear, Some(&symbols)),
            "https://api.example.com/portfolio/performance?range=1Y&assets=BTC,ETH"
        );
        assert_eq!(
            source.endpoint(Granularity::All, None),
            "https://api.example.com/portfolio/performance?range=ALL"
        );
    }
}
