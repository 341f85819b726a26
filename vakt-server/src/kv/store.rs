//! REST client for the hosted key-value store
//!
//! Speaks the Upstash-style single-command protocol: one command per
//! request (`/get/{key}`, `/set/{key}`, `/incr/{key}`, ...), bearer-token
//! auth, every response wrapped in a `{"result": ...}` envelope. Values
//! are stored as strings; this client always writes JSON text and parses
//! it back on read.
//!
//! No transactions, no compare-and-set: concurrent writers to the same
//! key race and the last `set` wins.

use crate::{Error, Result};
use serde_json::Value;
use std::time::Duration;
use tracing::debug;
use vakt_common::config::KvConfig;

const USER_AGENT: &str = concat!("vakt/", env!("CARGO_PKG_VERSION"));
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Key-value store handle; cheap to clone
#[derive(Clone)]
pub struct KvStore {
    http: reqwest::Client,
    base_url: String,
    token: String,
}

impl KvStore {
    pub fn new(config: &KvConfig) -> Result<Self> {
        let http = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| Error::Store(e.to_string()))?;

        Ok(KvStore {
            http,
            base_url: config.url.trim_end_matches('/').to_string(),
            token: config.token.clone(),
        })
    }

    /// `get(key) -> JSON | null`
    pub async fn get(&self, key: &str) -> Result<Option<Value>> {
        let result = self.command(&format!("get/{}", key), None).await?;
        Ok(parse_stored(result))
    }

    /// Wholesale replace of the value under `key`
    pub async fn set(&self, key: &str, value: &Value) -> Result<()> {
        let body = serde_json::to_string(value).map_err(|e| Error::Store(e.to_string()))?;
        self.command(&format!("set/{}", key), Some(body)).await?;
        Ok(())
    }

    /// Atomic increment, returns the new value
    pub async fn incr(&self, key: &str) -> Result<i64> {
        let result = self.command(&format!("incr/{}", key), None).await?;
        result
            .as_i64()
            .ok_or_else(|| Error::Store(format!("incr returned non-integer for {}", key)))
    }

    /// Push to the head of a list, returns the new length
    pub async fn lpush(&self, key: &str, value: &Value) -> Result<u64> {
        let body = serde_json::to_string(value).map_err(|e| Error::Store(e.to_string()))?;
        let result = self.command(&format!("lpush/{}", key), Some(body)).await?;
        result
            .as_u64()
            .ok_or_else(|| Error::Store(format!("lpush returned non-integer for {}", key)))
    }

    /// Pop from the tail of a list
    pub async fn rpop(&self, key: &str) -> Result<Option<Value>> {
        let result = self.command(&format!("rpop/{}", key), None).await?;
        Ok(parse_stored(result))
    }

    /// Inclusive list range
    pub async fn lrange(&self, key: &str, start: i64, stop: i64) -> Result<Vec<Value>> {
        let result = self
            .command(&format!("lrange/{}/{}/{}", key, start, stop), None)
            .await?;
        let items = result
            .as_array()
            .ok_or_else(|| Error::Store(format!("lrange returned non-array for {}", key)))?;
        Ok(items.iter().cloned().filter_map(parse_stored).collect())
    }

    /// Issue one store command and unwrap the result envelope
    async fn command(&self, path: &str, body: Option<String>) -> Result<Value> {
        let url = format!("{}/{}", self.base_url, path);
        debug!(url = %url, "KV command");

        let request = match body {
            Some(body) => self.http.post(&url).body(body),
            None => self.http.get(&url),
        };

        let response = request
            .bearer_auth(&self.token)
            .send()
            .await
            .map_err(|e| Error::Store(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            return Err(Error::Store(format!("store returned {}: {}", status, text)));
        }

        let envelope: Value = response
            .json()
            .await
            .map_err(|e| Error::Store(format!("malformed store response: {}", e)))?;

        match envelope {
            Value::Object(mut map) => map
                .remove("result")
                .ok_or_else(|| Error::Store("store response missing result".to_string())),
            other => Err(Error::Store(format!("unexpected store response: {}", other))),
        }
    }
}

/// Decode a stored value from the result envelope.
///
/// Stored values come back as strings holding the JSON text this client
/// wrote; anything unparsable is passed through as a plain string value.
fn parse_stored(result: Value) -> Option<Value> {
    match result {
        Value::Null => None,
        Value::String(text) => {
            Some(serde_json::from_str(&text).unwrap_or(Value::String(text)))
        }
        other => Some(other),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_stored_null_is_none() {
        assert_eq!(parse_stored(Value::Null), None);
    }

    #[test]
    fn test_parse_stored_json_text() {
        let parsed = parse_stored(json!("[{\"id\":\"b1\"}]")).unwrap();
        assert_eq!(parsed, json!([{"id": "b1"}]));
    }

    #[test]
    fn test_parse_stored_plain_string_passthrough() {
        let parsed = parse_stored(json!("not json at all")).unwrap();
        assert_eq!(parsed, json!("not json at all"));
    }

    #[test]
    fn test_parse_stored_native_number() {
        // incr results arrive as native integers, not strings
        assert_eq!(parse_stored(json!(42)).unwrap(), json!(42));
    }
}
