//! Live exchange rates from open.er-api.com.

use std::{collections::HashMap, time::Duration};

use engine::{
    Currency,
    fx::{BASE_CURRENCY, RateError, RateSource, Rates},
};
use reqwest::Client;
use serde::Deserialize;

pub const DEFAULT_RATES_URL: &str = "https://open.er-api.com/v6/latest/USD";

/// Upper bound on a single rate request, connection included.
pub const DEFAULT_RATES_TIMEOUT: Duration = Duration::from_secs(5);

#[derive(Debug, Deserialize)]
struct LatestRates {
    result: String,
    /// Units of each currency per one unit of the quoted base (USD).
    rates: HashMap<String, f64>,
}

/// [`RateSource`] backed by the open.er-api.com "latest" endpoint.
#[derive(Clone, Debug)]
pub struct OpenErApi {
    client: Client,
    url: String,
    timeout: Duration,
}

impl OpenErApi {
    pub fn new(client: Client, url: impl Into<String>) -> Self {
        Self {
            client,
            url: url.into(),
            timeout: DEFAULT_RATES_TIMEOUT,
        }
    }

    pub fn with_url(url: impl Into<String>) -> Self {
        Self::new(Client::new(), url)
    }

    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

impl Default for OpenErApi {
    fn default() -> Self {
        Self::with_url(DEFAULT_RATES_URL)
    }
}

impl RateSource for OpenErApi {
    async fn fetch(&self) -> Result<Rates, RateError> {
        let response = self
            .client
            .get(&self.url)
            .timeout(self.timeout)
            .send()
            .await
            .and_then(|resp| resp.error_for_status())
            .map_err(|err| RateError::Unavailable(err.to_string()))?;
        let payload: LatestRates = response
            .json()
            .await
            .map_err(|err| RateError::Malformed(err.to_string()))?;
        if payload.result != "success" {
            return Err(RateError::Unavailable(format!(
                "rate api answered {}",
                payload.result
            )));
        }
        rebase(&payload.rates)
    }
}

/// Turn "units per USD" into "base units per one unit".
fn rebase(per_usd: &HashMap<String, f64>) -> Result<Rates, RateError> {
    let base_per_usd = per_usd
        .get(BASE_CURRENCY.code())
        .copied()
        .filter(|rate| *rate > 0.0)
        .ok_or_else(|| RateError::Malformed(format!("missing {BASE_CURRENCY} rate")))?;

    let rates = Currency::ALL
        .iter()
        .filter_map(|currency| {
            let per_usd = per_usd.get(currency.code()).copied()?;
            (per_usd > 0.0).then(|| (*currency, base_per_usd / per_usd))
        })
        .collect();
    Ok(rates)
}

#[cfg(test)]
mod tests {
    use super::*;
    use engine::fx::{RateCache, RateOrigin};
    use tokio::net::TcpListener;

    #[test]
    fn rebases_usd_quotes_to_idr() {
        let per_usd = HashMap::from([
            ("USD".to_string(), 1.0),
            ("IDR".to_string(), 16_000.0),
            ("EUR".to_string(), 0.8),
            ("XYZ".to_string(), 3.0),
        ]);
        let rates = rebase(&per_usd).unwrap();
        assert_eq!(rates.get(&Currency::Idr), Some(&1.0));
        assert_eq!(rates.get(&Currency::Usd), Some(&16_000.0));
        assert_eq!(rates.get(&Currency::Eur), Some(&20_000.0));
        assert_eq!(rates.len(), 3);
    }

    #[test]
    fn missing_base_rate_is_malformed() {
        let per_usd = HashMap::from([("USD".to_string(), 1.0)]);
        assert!(matches!(rebase(&per_usd), Err(RateError::Malformed(_))));
    }

    #[tokio::test]
    async fn stalled_api_falls_back_after_timeout() {
        // Accepts the connection and never answers.
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let holder = tokio::spawn(async move {
            let (socket, _) = listener.accept().await.unwrap();
            tokio::time::sleep(Duration::from_secs(60)).await;
            drop(socket);
        });

        let source = OpenErApi::with_url(format!("http://{addr}/v6/latest/USD"))
            .with_timeout(Duration::from_millis(200));
        let cache = RateCache::new(source);
        let snapshot = tokio::time::timeout(Duration::from_secs(5), cache.rates())
            .await
            .unwrap();

        assert_eq!(snapshot.origin, RateOrigin::Fallback);
        assert_eq!(snapshot.rates.get(&Currency::Usd), Some(&16_000.0));
        holder.abort();
    }
}
