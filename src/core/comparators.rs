use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde_json::Value;
use std::collections::BTreeMap;

use crate::models::PriceTolerance;

/// Characteristic value as compared: string form, lower-cased
fn value_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.to_lowercase(),
        // Catalog text for a missing value
        Value::Null => "none".to_string(),
        other => other.to_string().to_lowercase(),
    }
}

/// Compare two characteristic maps (0-1)
///
/// Half key overlap (Jaccard over keys), half agreement of values on the
/// shared keys. Missing or empty maps give no signal.
pub fn characteristics_similarity(
    a: Option<&BTreeMap<String, Value>>,
    b: Option<&BTreeMap<String, Value>>,
) -> f64 {
    let (Some(a), Some(b)) = (a, b) else {
        return 0.0;
    };
    if a.is_empty() || b.is_empty() {
        return 0.0;
    }

    let common: Vec<&String> = a.keys().filter(|k| b.contains_key(*k)).collect();
    let all_keys = a.len() + b.len() - common.len();
    let key_sim = common.len() as f64 / all_keys as f64;

    let val_sim = if common.is_empty() {
        0.0
    } else {
        let equal = common
            .iter()
            .filter(|k| value_text(&a[**k]) == value_text(&b[**k]))
            .count();
        equal as f64 / common.len() as f64
    };

    0.5 * key_sim + 0.5 * val_sim
}

/// Exact location match, ignoring case and surrounding whitespace
pub fn location_similarity(a: Option<&str>, b: Option<&str>) -> f64 {
    match (a, b) {
        (Some(a), Some(b)) if !a.is_empty() && !b.is_empty() => {
            if a.trim().to_lowercase() == b.trim().to_lowercase() {
                1.0
            } else {
                0.0
            }
        }
        _ => 0.0,
    }
}

/// Compare two prices (0-1)
///
/// Prices within the tolerance allowance score 1.0; otherwise the score is
/// the ratio of the lower to the higher price. Missing or non-positive
/// prices give no signal.
pub fn price_similarity(a: Option<Decimal>, b: Option<Decimal>, tolerance: &PriceTolerance) -> f64 {
    let (Some(a), Some(b)) = (a, b) else {
        return 0.0;
    };
    if a <= Decimal::ZERO || b <= Decimal::ZERO {
        return 0.0;
    }

    let high = a.max(b);
    let low = a.min(b);
    let delta = high - low;

    let mut allow = Decimal::ZERO;
    if let Some(absolute) = tolerance.absolute {
        allow = allow.max(absolute);
    }
    if let Some(percent) = tolerance.percent {
        // Percentage of the higher price
        let share = (percent / Decimal::ONE_HUNDRED)
            .checked_mul(high)
            .unwrap_or(Decimal::MAX);
        allow = allow.max(share);
    }

    if allow > Decimal::ZERO && delta <= allow {
        return 1.0;
    }

    (low / high).to_f64().unwrap_or(0.0)
}
