/*
 * Responsibility
 * - 1 回の呼び出しで扱う入力 (Event / InvocationContext) と結果 (ActiveFeatureSet) の型
 * - HTTP/axum には依存しない
 */
use std::collections::{BTreeSet, HashMap};

use serde::{Deserialize, Serialize};

pub const AUTHORIZATION_HEADER: &str = "Authorization";

/// Inbound request as the resolver sees it.
///
/// `headers` may be absent entirely (or `null`), or present without an `Authorization` key.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Event {
    #[serde(default)]
    pub headers: Option<HashMap<String, String>>,
}

impl Event {
    pub fn with_authorization(value: impl Into<String>) -> Self {
        let mut headers = HashMap::new();
        headers.insert(AUTHORIZATION_HEADER.to_string(), value.into());
        Self {
            headers: Some(headers),
        }
    }

    /// Raw `Authorization` value. Keys are matched exactly.
    pub fn authorization(&self) -> Option<&str> {
        self.headers
            .as_ref()?
            .get(AUTHORIZATION_HEADER)
            .map(String::as_str)
    }
}

/// Per-invocation metadata used to correlate errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvocationContext {
    pub request_id: String,
}

impl InvocationContext {
    pub fn new(request_id: impl Into<String>) -> Self {
        Self {
            request_id: request_id.into(),
        }
    }
}

/// Non-empty user id resolved from a bearer token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserId(String);

impl UserId {
    /// `None` for an empty value; an empty string is not a user.
    pub fn parse(raw: String) -> Option<Self> {
        if raw.is_empty() { None } else { Some(Self(raw)) }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Key of the per-user flag set.
    pub fn features_key(&self) -> String {
        format!("features:user:{}", self.0)
    }
}

/// Feature flags active for one caller. Order carries no meaning.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ActiveFeatureSet {
    active_features: BTreeSet<String>,
}

impl ActiveFeatureSet {
    pub fn len(&self) -> usize {
        self.active_features.len()
    }
}

impl<S: Into<String>> FromIterator<S> for ActiveFeatureSet {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self {
            active_features: iter.into_iter().map(Into::into).collect(),
        }
    }
}
