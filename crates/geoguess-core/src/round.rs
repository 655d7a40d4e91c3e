//! Round domain model and the round source contract.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::Result;

/// The country a round is about.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Country {
    /// Display name, e.g. "Côte d'Ivoire".
    pub name: String,
    /// ISO 3166-1 alpha-2 code, e.g. "CI".
    pub code: String,
}

impl Country {
    pub fn new(name: impl Into<String>, code: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            code: code.into(),
        }
    }
}

/// One guess-the-location unit of gameplay.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoundPayload {
    /// Identifier assigned by the round source.
    pub id: String,
    /// The expected answer.
    pub country: Country,
    /// Street-level or panorama image to show, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    /// Optional hint text.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hint: Option<String>,
}

impl RoundPayload {
    pub fn new(id: impl Into<String>, country: Country) -> Self {
        Self {
            id: id.into(),
            country,
            image_url: None,
            hint: None,
        }
    }

    pub fn with_image_url(mut self, url: impl Into<String>) -> Self {
        self.image_url = Some(url.into());
        self
    }
}

/// Source of round data (remote API, bundled catalog, ...).
///
/// `Ok(None)` and `Err(_)` are treated identically by callers: no round.
#[async_trait]
pub trait RoundSource: Send + Sync {
    /// Fetches one round, avoiding the country codes listed in `exclude`
    /// where the source is able to.
    async fn fetch_round(&self, exclude: &[String]) -> Result<Option<RoundPayload>>;
}
