//! Viewer link parsing
//!
//! A viewer link carries its state in one of three ways, tried in order:
//! a `json_url` query parameter naming a stored payload, a `#!{...}`
//! fragment holding the JSON inline, or plain query parameters that are
//! themselves the state.

use indexmap::IndexMap;
use serde_json::{Map, Value};
use url::Url;

use crate::error::{GlancerError, Result};

/// Query parameter that names a stored state payload.
pub const JSON_URL_PARAM: &str = "json_url";

/// Query parameters in link order; repeated keys keep every value.
pub type QueryParams = IndexMap<String, Vec<String>>;

/// What `decode` accepts: a link, or query parameters parsed elsewhere.
#[derive(Debug, Clone, PartialEq)]
pub enum ViewerInput {
    Url(String),
    Query(QueryParams),
}

impl From<&str> for ViewerInput {
    fn from(url: &str) -> Self {
        ViewerInput::Url(url.to_string())
    }
}

impl From<String> for ViewerInput {
    fn from(url: String) -> Self {
        ViewerInput::Url(url)
    }
}

impl From<&String> for ViewerInput {
    fn from(url: &String) -> Self {
        ViewerInput::Url(url.clone())
    }
}

impl From<QueryParams> for ViewerInput {
    fn from(params: QueryParams) -> Self {
        ViewerInput::Query(params)
    }
}

/// How a given input resolves to a state payload.
#[derive(Debug, Clone, PartialEq)]
pub enum DecodeMode {
    /// Fetch the payload from the state store.
    Remote { json_url: String },
    /// The state JSON is embedded in the link fragment.
    Inline(Value),
    /// No stored or embedded state; the query parameters stand in for it.
    BareQuery(QueryParams),
}

impl ViewerInput {
    /// Work out where the state for this input lives.
    pub fn decode_mode(&self) -> Result<DecodeMode> {
        match self {
            ViewerInput::Query(params) => Ok(DecodeMode::from_params(params.clone())),
            ViewerInput::Url(raw) => {
                let url = Url::parse(raw.trim()).map_err(|e| GlancerError::InvalidUrl {
                    input: raw.clone(),
                    reason: e.to_string(),
                })?;

                let params = query_params(&url);
                if params.contains_key(JSON_URL_PARAM) {
                    return Ok(DecodeMode::from_params(params));
                }
                if let Some(state) = fragment_state(raw, &url)? {
                    return Ok(DecodeMode::Inline(state));
                }
                Ok(DecodeMode::BareQuery(params))
            }
        }
    }
}

impl DecodeMode {
    fn from_params(params: QueryParams) -> Self {
        match params.get(JSON_URL_PARAM).and_then(|v| v.first()) {
            Some(json_url) => DecodeMode::Remote {
                json_url: json_url.clone(),
            },
            None => DecodeMode::BareQuery(params),
        }
    }
}

/// Build the degenerate state for bare-query mode.
///
/// Values that parse as JSON are kept as JSON, others as strings; a key
/// given more than once becomes an array.
pub fn bare_query_state(params: &QueryParams) -> Value {
    let object: Map<String, Value> = params
        .iter()
        .map(|(key, values)| {
            let value = match values.as_slice() {
                [single] => query_value(single),
                many => Value::Array(many.iter().map(|v| query_value(v)).collect()),
            };
            (key.clone(), value)
        })
        .collect();
    Value::Object(object)
}

fn query_value(raw: &str) -> Value {
    serde_json::from_str(raw).unwrap_or_else(|_| Value::String(raw.to_string()))
}

fn query_params(url: &Url) -> QueryParams {
    let mut params = QueryParams::new();
    for (key, value) in url.query_pairs() {
        params
            .entry(key.into_owned())
            .or_default()
            .push(value.into_owned());
    }
    params
}

fn fragment_state(raw: &str, url: &Url) -> Result<Option<Value>> {
    let fragment = match url.fragment().and_then(|f| f.strip_prefix('!')) {
        Some(f) if !f.is_empty() => f,
        _ => return Ok(None),
    };

    let decoded = urlencoding::decode(fragment).map_err(|e| GlancerError::InvalidUrl {
        input: raw.to_string(),
        reason: format!("fragment is not valid UTF-8: {}", e),
    })?;
    let state = serde_json::from_str(&decoded).map_err(|e| GlancerError::InvalidUrl {
        input: raw.to_string(),
        reason: format!("fragment is not JSON: {}", e),
    })?;
    Ok(Some(state))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn test_json_url_is_remote() {
        let input = ViewerInput::from("https://ngl.flywire.ai/?json_url=https://store/x123");
        assert_eq!(
            input.decode_mode().unwrap(),
            DecodeMode::Remote {
                json_url: "https://store/x123".to_string()
            }
        );
    }

    #[test]
    fn test_percent_encoded_json_url() {
        let input = ViewerInput::from(
            "https://ngl.flywire.ai/?json_url=https%3A%2F%2Fstore%2Fnglstate%2F42",
        );
        assert_eq!(
            input.decode_mode().unwrap(),
            DecodeMode::Remote {
                json_url: "https://store/nglstate/42".to_string()
            }
        );
    }

    #[test]
    fn test_parsed_query_is_accepted() {
        let mut params = QueryParams::new();
        params.insert(JSON_URL_PARAM.to_string(), vec!["https://store/1".to_string()]);
        let mode = ViewerInput::from(params).decode_mode().unwrap();
        assert!(matches!(mode, DecodeMode::Remote { .. }));
    }

    #[test]
    fn test_plain_query_is_bare_mode() {
        let input = ViewerInput::from("https://ngl.flywire.ai/?layout=xy&blank=");
        match input.decode_mode().unwrap() {
            DecodeMode::BareQuery(params) => {
                assert_eq!(params["layout"], vec!["xy".to_string()]);
                assert_eq!(params["blank"], vec![String::new()]);
            }
            other => panic!("expected bare query, got {:?}", other),
        }
    }

    #[test]
    fn test_fragment_state_is_inline() {
        let state = json!({"layers": [], "layout": "3d"});
        let encoded = urlencoding::encode(&state.to_string()).into_owned();
        let input = ViewerInput::from(format!("https://ngl.flywire.ai/#!{}", encoded));

        assert_eq!(input.decode_mode().unwrap(), DecodeMode::Inline(state));
    }

    #[test]
    fn test_bad_fragment_is_invalid_url() {
        let input = ViewerInput::from("https://ngl.flywire.ai/#!not-json");
        let err = input.decode_mode().unwrap_err();
        assert_eq!(err.error_code(), "INVALID_URL");
    }

    #[test]
    fn test_unparsable_url() {
        let err = ViewerInput::from("not a url").decode_mode().unwrap_err();
        assert_eq!(err.error_code(), "INVALID_URL");
    }

    #[test]
    fn test_bare_query_state_values() {
        let mut params = QueryParams::new();
        params.insert("layers".to_string(), vec!["[]".to_string()]);
        params.insert("title".to_string(), vec!["my view".to_string()]);
        params.insert("tag".to_string(), vec!["a".to_string(), "b".to_string()]);

        assert_eq!(
            bare_query_state(&params),
            json!({"layers": [], "title": "my view", "tag": ["a", "b"]})
        );
    }
}
