use serde::{Deserialize, Serialize};

use crate::EngineError;

/// ISO currency code accepted on transaction input.
///
/// Every stored amount is normalized to the base currency (`IDR`); the other
/// codes only appear as conversion metadata on a transaction.
///
/// ## Minor units
///
/// The engine stores monetary values as an `i64` number of **minor units**.
/// `minor_units()` returns how many decimal digits are used when converting
/// between major units (human input, e.g. `10.50 USD`) and minor units
/// (stored integers, e.g. `1050`).
///
/// Example: IDR has 0 minor units, so `15000 IDR` ⇄ `15000`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Currency {
    #[default]
    Idr,
    Usd,
    Eur,
    Sgd,
    Myr,
    Jpy,
    Gbp,
    Aud,
    Cny,
    Krw,
}

impl Currency {
    pub const ALL: [Currency; 10] = [
        Currency::Idr,
        Currency::Usd,
        Currency::Eur,
        Currency::Sgd,
        Currency::Myr,
        Currency::Jpy,
        Currency::Gbp,
        Currency::Aud,
        Currency::Cny,
        Currency::Krw,
    ];

    /// Canonical currency code.
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Currency::Idr => "IDR",
            Currency::Usd => "USD",
            Currency::Eur => "EUR",
            Currency::Sgd => "SGD",
            Currency::Myr => "MYR",
            Currency::Jpy => "JPY",
            Currency::Gbp => "GBP",
            Currency::Aud => "AUD",
            Currency::Cny => "CNY",
            Currency::Krw => "KRW",
        }
    }

    /// Number of fraction digits used when formatting/parsing amounts.
    #[must_use]
    pub const fn minor_units(self) -> u8 {
        match self {
            Currency::Idr | Currency::Jpy | Currency::Krw => 0,
            _ => 2,
        }
    }
}

impl core::fmt::Display for Currency {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.code())
    }
}

impl TryFrom<&str> for Currency {
    type Error = EngineError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let code = value.trim().to_ascii_uppercase();
        Currency::ALL
            .into_iter()
            .find(|currency| currency.code() == code)
            .ok_or_else(|| EngineError::InvalidInput(format!("unsupported currency: {code}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_codes_case_insensitively() {
        assert_eq!(Currency::try_from(" usd ").unwrap(), Currency::Usd);
        assert_eq!(Currency::try_from("IDR").unwrap(), Currency::Idr);
        assert_eq!(
            Currency::try_from("xyz").unwrap_err(),
            EngineError::InvalidInput("unsupported currency: XYZ".to_string())
        );
    }

    #[test]
    fn minor_units_follow_iso() {
        assert_eq!(Currency::Idr.minor_units(), 0);
        assert_eq!(Currency::Jpy.minor_units(), 0);
        assert_eq!(Currency::Eur.minor_units(), 2);
    }
}
