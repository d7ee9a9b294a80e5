//! Currency conversion into the base currency.
//!
//! Rates are expressed as base units (IDR) per one major unit of the foreign
//! currency. A [`RateCache`] keeps the last fetched table for a TTL and falls
//! back to [`fallback_rates`] whenever its [`RateSource`] fails.

use std::{
    collections::HashMap,
    future::Future,
    sync::{PoisonError, RwLock},
    time::{Duration, Instant},
};

use chrono::{DateTime, Utc};
use serde::Serialize;
use thiserror::Error;

use crate::{Currency, EngineError, ResultEngine};

/// The currency every stored amount is normalized to.
pub const BASE_CURRENCY: Currency = Currency::Idr;

/// How long a fetched table stays fresh.
pub const DEFAULT_TTL: Duration = Duration::from_secs(60 * 60);

pub type Rates = HashMap<Currency, f64>;

#[derive(Debug, Error)]
pub enum RateError {
    #[error("rate source unavailable: {0}")]
    Unavailable(String),
    #[error("malformed rate payload: {0}")]
    Malformed(String),
}

/// Somewhere live rates come from.
pub trait RateSource: Send + Sync {
    fn fetch(&self) -> impl Future<Output = Result<Rates, RateError>> + Send;
}

/// Static table used when no live rates are available.
pub fn fallback_rates() -> Rates {
    HashMap::from([
        (Currency::Idr, 1.0),
        (Currency::Usd, 16_000.0),
        (Currency::Eur, 17_500.0),
        (Currency::Sgd, 12_000.0),
        (Currency::Myr, 3_600.0),
        (Currency::Jpy, 105.0),
        (Currency::Gbp, 20_000.0),
        (Currency::Aud, 10_500.0),
        (Currency::Cny, 2_200.0),
        (Currency::Krw, 12.0),
    ])
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RateOrigin {
    Live,
    Fallback,
}

#[derive(Clone, Debug, PartialEq)]
pub struct RateSnapshot {
    pub rates: Rates,
    pub origin: RateOrigin,
    pub fetched_at: DateTime<Utc>,
}

/// Result of converting a foreign amount.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Conversion {
    /// Converted amount in base minor units.
    pub amount_minor: i64,
    pub original_amount_minor: i64,
    pub currency: Currency,
    pub rate: f64,
}

/// Convert `amount_minor` of `currency` into base minor units using `rates`.
pub fn convert(amount_minor: i64, currency: Currency, rates: &Rates) -> ResultEngine<Conversion> {
    if currency == BASE_CURRENCY {
        return Ok(Conversion {
            amount_minor,
            original_amount_minor: amount_minor,
            currency,
            rate: 1.0,
        });
    }
    let rate = rates
        .get(&currency)
        .copied()
        .filter(|rate| rate.is_finite() && *rate > 0.0)
        .ok_or_else(|| EngineError::InvalidInput(format!("no exchange rate for {currency}")))?;

    let major = amount_minor as f64 / 10f64.powi(i32::from(currency.minor_units()));
    let base_minor = (major * rate * 10f64.powi(i32::from(BASE_CURRENCY.minor_units()))).round();
    if !base_minor.is_finite() || base_minor.abs() >= i64::MAX as f64 {
        return Err(EngineError::InvalidAmount(
            "converted amount out of range".to_string(),
        ));
    }

    Ok(Conversion {
        amount_minor: base_minor as i64,
        original_amount_minor: amount_minor,
        currency,
        rate,
    })
}

struct CachedRates {
    snapshot: RateSnapshot,
    stored_at: Instant,
}

/// Process-wide rate table with a TTL.
pub struct RateCache<S> {
    source: S,
    ttl: Duration,
    state: RwLock<Option<CachedRates>>,
}

impl<S: RateSource> RateCache<S> {
    pub fn new(source: S) -> Self {
        Self {
            source,
            ttl: DEFAULT_TTL,
            state: RwLock::new(None),
        }
    }

    #[must_use]
    pub fn with_ttl(mut self, ttl: Duration) -> Self {
        self.ttl = ttl;
        self
    }

    /// Current rates, refreshed from the source once the TTL has elapsed.
    ///
    /// A failed fetch stores the fallback table, so the source is retried
    /// only after another TTL.
    pub async fn rates(&self) -> RateSnapshot {
        if let Some(snapshot) = self.fresh() {
            return snapshot;
        }

        let snapshot = match self.source.fetch().await {
            Ok(mut rates) => {
                rates.insert(BASE_CURRENCY, 1.0);
                RateSnapshot {
                    rates,
                    origin: RateOrigin::Live,
                    fetched_at: Utc::now(),
                }
            }
            Err(err) => {
                tracing::warn!("using fallback exchange rates: {err}");
                RateSnapshot {
                    rates: fallback_rates(),
                    origin: RateOrigin::Fallback,
                    fetched_at: Utc::now(),
                }
            }
        };

        let mut state = self.state.write().unwrap_or_else(PoisonError::into_inner);
        *state = Some(CachedRates {
            snapshot: snapshot.clone(),
            stored_at: Instant::now(),
        });
        snapshot
    }

    /// Convert with the current rates.
    pub async fn convert(&self, amount_minor: i64, currency: Currency) -> ResultEngine<Conversion> {
        let snapshot = self.rates().await;
        convert(amount_minor, currency, &snapshot.rates)
    }

    fn fresh(&self) -> Option<RateSnapshot> {
        let state = self.state.read().unwrap_or_else(PoisonError::into_inner);
        state
            .as_ref()
            .filter(|cached| cached.stored_at.elapsed() < self.ttl)
            .map(|cached| cached.snapshot.clone())
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;

    struct Counting {
        calls: AtomicUsize,
        fail: bool,
    }

    impl Counting {
        fn new(fail: bool) -> Self {
            Self {
                calls: AtomicUsize::new(0),
                fail,
            }
        }
    }

    impl RateSource for Counting {
        async fn fetch(&self) -> Result<Rates, RateError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.fail {
                return Err(RateError::Unavailable("connection refused".to_string()));
            }
            Ok(HashMap::from([(Currency::Usd, 15_500.0)]))
        }
    }

    #[test]
    fn converts_cents_to_rupiah() {
        let rates = fallback_rates();
        // 12.50 USD
        let conversion = convert(1250, Currency::Usd, &rates).unwrap();
        assert_eq!(conversion.amount_minor, 200_000);
        assert_eq!(conversion.original_amount_minor, 1250);
        assert_eq!(conversion.rate, 16_000.0);
    }

    #[test]
    fn base_currency_is_identity() {
        let conversion = convert(42_000, Currency::Idr, &HashMap::new()).unwrap();
        assert_eq!(conversion.amount_minor, 42_000);
        assert_eq!(conversion.rate, 1.0);
    }

    #[test]
    fn missing_rate_is_invalid_input() {
        let err = convert(100, Currency::Krw, &HashMap::new()).unwrap_err();
        assert_eq!(
            err,
            EngineError::InvalidInput("no exchange rate for KRW".to_string())
        );
    }

    #[tokio::test]
    async fn caches_until_ttl_expires() {
        let cache = RateCache::new(Counting::new(false));
        let first = cache.rates().await;
        let second = cache.rates().await;
        assert_eq!(first.origin, RateOrigin::Live);
        assert_eq!(second.rates.get(&Currency::Usd), Some(&15_500.0));
        assert_eq!(second.rates.get(&Currency::Idr), Some(&1.0));
        assert_eq!(cache.source.calls.load(Ordering::SeqCst), 1);

        let cache = RateCache::new(Counting::new(false)).with_ttl(Duration::ZERO);
        cache.rates().await;
        cache.rates().await;
        assert_eq!(cache.source.calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn falls_back_when_source_fails() {
        let cache = RateCache::new(Counting::new(true));
        let snapshot = cache.rates().await;
        assert_eq!(snapshot.origin, RateOrigin::Fallback);
        assert_eq!(snapshot.rates, fallback_rates());

        let conversion = cache.convert(100, Currency::Eur).await.unwrap();
        assert_eq!(conversion.amount_minor, 17_500);
    }
}
