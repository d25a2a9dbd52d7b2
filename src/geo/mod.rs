//! Region boundary documents for the choropleth map
//!
//! The boundary document is a GeoJSON `FeatureCollection` whose features
//! carry a region code (by default `properties.sigla`) matching the
//! `customer_state` column. It is loaded once at startup and shared
//! read-only with every request.

use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashSet;
use std::path::PathBuf;
use std::time::Duration;
use tracing::{debug, info};

use crate::error::{Error, Result};

pub const DEFAULT_BOUNDARIES_URL: &str = "https://raw.githubusercontent.com/codeforamerica/click_that_hood/master/public/data/brazil-states.geojson";

pub const DEFAULT_FEATURE_ID_KEY: &str = "properties.sigla";

/// Where to obtain the boundary document
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BoundarySource {
    Url(String),
    File(PathBuf),
}

impl std::fmt::Display for BoundarySource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BoundarySource::Url(url) => write!(f, "{url}"),
            BoundarySource::File(path) => write!(f, "{}", path.display()),
        }
    }
}

/// A parsed GeoJSON feature collection keyed by region code
#[derive(Debug, Clone)]
pub struct BoundaryDocument {
    geojson: Value,
    feature_id_key: String,
}

impl BoundaryDocument {
    /// Fetch or read the document. No retries: a failure here is a startup
    /// failure.
    pub async fn load(source: &BoundarySource, feature_id_key: &str) -> Result<Self> {
        let geojson = match source {
            BoundarySource::Url(url) => fetch_json(url).await?,
            BoundarySource::File(path) => {
                let content = tokio::fs::read_to_string(path).await?;
                serde_json::from_str(&content)?
            }
        };

        let document = Self::from_value(geojson, feature_id_key)?;
        info!(
            "Loaded {} boundary features from {}",
            document.features().len(),
            source
        );
        Ok(document)
    }

    /// Wrap an already parsed document, checking it is a feature collection
    pub fn from_value(geojson: Value, feature_id_key: &str) -> Result<Self> {
        match geojson.get("type").and_then(Value::as_str) {
            Some("FeatureCollection") => {}
            Some(other) => {
                return Err(Error::Boundary(format!(
                    "expected a FeatureCollection, found {other}"
                )))
            }
            None => return Err(Error::Boundary("missing GeoJSON type".to_string())),
        }

        if !geojson.get("features").is_some_and(Value::is_array) {
            return Err(Error::Boundary("features must be an array".to_string()));
        }

        if feature_id_key.is_empty() {
            return Err(Error::Boundary("feature id key is empty".to_string()));
        }

        Ok(Self {
            geojson,
            feature_id_key: feature_id_key.to_string(),
        })
    }

    pub fn geojson(&self) -> &Value {
        &self.geojson
    }

    pub fn feature_id_key(&self) -> &str {
        &self.feature_id_key
    }

    pub fn features(&self) -> &[Value] {
        self.geojson
            .get("features")
            .and_then(Value::as_array)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Region code of a feature, following the dotted feature id key
    pub fn feature_id<'a>(&self, feature: &'a Value) -> Option<&'a str> {
        self.feature_id_key
            .split('.')
            .try_fold(feature, |node, key| node.get(key))
            .and_then(Value::as_str)
    }

    /// Region codes of every feature that has one, in document order
    pub fn region_codes(&self) -> Vec<String> {
        self.features()
            .iter()
            .filter_map(|feature| self.feature_id(feature))
            .map(str::to_string)
            .collect()
    }

    /// Codes from `codes` that no feature in the document matches
    pub fn unmatched<'a, I>(&self, codes: I) -> Vec<String>
    where
        I: IntoIterator<Item = &'a str>,
    {
        let known: HashSet<String> = self.region_codes().into_iter().collect();
        let mut missing: Vec<String> = codes
            .into_iter()
            .filter(|code| !known.contains(*code))
            .map(str::to_string)
            .collect();
        missing.sort();
        missing.dedup();
        missing
    }
}

async fn fetch_json(url: &str) -> Result<Value> {
    let client = Client::builder()
        .timeout(Duration::from_secs(30))
        .build()?;

    debug!("Fetching boundary document from {}", url);
    let response = client.get(url).send().await?.error_for_status()?;
    Ok(response.json::<Value>().await?)
}
