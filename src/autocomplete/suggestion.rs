use std::fmt;

use serde::{Deserialize, Serialize};

use crate::foundation::error::{FramesmithError, FramesmithResult};

/// Token grouping the queries of one search session for the suggestion provider.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct SessionToken(uuid::Uuid);

impl SessionToken {
    /// Fresh random token.
    pub fn new() -> Self {
        Self(uuid::Uuid::new_v4())
    }

    /// Replace the token with a fresh one, starting a new search session.
    pub fn reset(&mut self) {
        *self = Self::new();
    }
}

impl Default for SessionToken {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for SessionToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Administrative breakdown of a predicted address.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Compound {
    /// Province or city.
    pub province: Option<String>,
    /// District.
    pub district: Option<String>,
    /// Commune or ward.
    pub commune: Option<String>,
}

/// One suggested address.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Prediction {
    /// Full address text shown in the suggestion list.
    pub description: String,
    /// Structured parts, when the provider has them.
    #[serde(default)]
    pub compound: Option<Compound>,
}

/// Provider reply. Only `status == "OK"` replies carry usable predictions.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SuggestionResponse {
    /// Provider status string.
    pub status: String,
    /// Suggested addresses.
    #[serde(default)]
    pub predictions: Vec<Prediction>,
}

impl SuggestionResponse {
    /// Parse a provider JSON body.
    pub fn from_json(body: &str) -> FramesmithResult<Self> {
        serde_json::from_str(body)
            .map_err(|e| FramesmithError::serde(format!("parse suggestion response: {e}")))
    }

    /// Whether the provider reported success.
    pub fn is_ok(&self) -> bool {
        self.status == "OK"
    }
}

/// Opaque geocoding suggestion source.
pub trait SuggestionProvider {
    /// Suggestions for `query` within the session identified by `token`.
    fn suggest(&self, query: &str, token: SessionToken) -> FramesmithResult<SuggestionResponse>;
}
