//! Internal helpers for input validation and model conversion.
//!
//! These utilities are **not** part of the public API. They centralize
//! validation and mapping logic so the engine enforces consistent invariants.

use unicode_normalization::{UnicodeNormalization, char::is_combining_mark};
use uuid::Uuid;

use crate::{EngineError, ResultEngine};

/// Category names that mark the transfer category.
const TRANSFER_NAMES: [&str; 3] = ["transfer", "transfer in", "transfer out"];

pub(crate) fn parse_uuid(value: &str, label: &str) -> ResultEngine<Uuid> {
    Uuid::parse_str(value).map_err(|_| EngineError::InvalidInput(format!("invalid {label} id")))
}

pub(crate) fn normalize_required_name(value: &str, label: &str) -> ResultEngine<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(EngineError::InvalidInput(format!(
            "{label} name must not be empty"
        )));
    }
    Ok(trimmed.to_string())
}

pub(crate) fn normalize_optional_text(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(ToString::to_string)
}

/// Comparison key for names: NFKD, combining marks dropped, lowercased, inner
/// whitespace collapsed.
pub(crate) fn name_key(value: &str) -> String {
    let folded: String = value
        .nfkd()
        .filter(|c| !is_combining_mark(*c))
        .collect::<String>()
        .to_lowercase();
    folded.split_whitespace().collect::<Vec<_>>().join(" ")
}

pub(crate) fn is_transfer_name(value: &str) -> bool {
    let key = name_key(value);
    TRANSFER_NAMES.contains(&key.as_str())
}

pub(crate) fn require_positive(amount_minor: i64, label: &str) -> ResultEngine<i64> {
    if amount_minor <= 0 {
        return Err(EngineError::InvalidAmount(format!("{label} must be > 0")));
    }
    Ok(amount_minor)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn name_key_folds_accents_and_spacing() {
        assert_eq!(name_key("  Café   Bar "), "cafe bar");
        assert_eq!(name_key("TRANSFER  In"), "transfer in");
    }

    #[test]
    fn transfer_names_are_detected() {
        assert!(is_transfer_name("Transfer"));
        assert!(is_transfer_name("transfer out"));
        assert!(!is_transfer_name("Transport"));
    }

    #[test]
    fn required_name_rejects_blank() {
        assert_eq!(
            normalize_required_name("   ", "wallet").unwrap_err(),
            EngineError::InvalidInput("wallet name must not be empty".to_string())
        );
        assert_eq!(normalize_required_name(" Cash ", "wallet").unwrap(), "Cash");
    }
}
