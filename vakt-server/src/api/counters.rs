//! Peripheral named counters (page visits and the like)

use crate::kv::counter_key;
use crate::state::AppState;
use crate::{Error, Result};
use axum::extract::{Path, State};
use axum::Json;
use serde::Serialize;
use tracing::warn;

#[derive(Debug, Serialize)]
pub struct CounterResponse {
    pub name: String,
    pub value: i64,
}

fn validate_name(name: &str) -> Result<()> {
    let valid = !name.is_empty()
        && name.len() <= 64
        && name
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-');
    if valid {
        Ok(())
    } else {
        Err(Error::InvalidInput(format!("invalid counter name: {}", name)))
    }
}

/// GET /api/counter/:name
///
/// Current value; an unset counter reads 0, and a store failure degrades
/// to 0 rather than erroring.
pub async fn get_counter(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> Result<Json<CounterResponse>> {
    validate_name(&name)?;

    let value = match state.kv.get(&counter_key(&name)).await {
        Ok(Some(value)) => value.as_i64().unwrap_or(0),
        Ok(None) => 0,
        Err(e) => {
            warn!("store read failed for counter {} ({}); serving 0", name, e);
            0
        }
    };

    Ok(Json(CounterResponse { name, value }))
}

/// POST /api/counter/:name
///
/// Atomic increment, returns the new value.
pub async fn increment_counter(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> Result<Json<CounterResponse>> {
    validate_name(&name)?;

    let value = state.kv.incr(&counter_key(&name)).await?;
    Ok(Json(CounterResponse { name, value }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counter_name_validation() {
        assert!(validate_name("visits").is_ok());
        assert!(validate_name("front-page-2026").is_ok());
        assert!(validate_name("").is_err());
        assert!(validate_name("Visits").is_err());
        assert!(validate_name("a b").is_err());
        assert!(validate_name(&"x".repeat(65)).is_err());
    }
}
