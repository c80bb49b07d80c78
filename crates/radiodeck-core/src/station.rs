use serde::{Deserialize, Serialize};

/// One station record as returned by the radio-browser API.
///
/// Only `name`, `favicon` and `url_resolved` drive behaviour. The remaining
/// fields are carried as-is for the detail line and never validated.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct Station {
    #[serde(default)]
    pub name: String,
    /// Favicon URL. The API sends `""`, `null` or sometimes the literal
    /// string `"null"` when a station has none.
    #[serde(default)]
    pub favicon: Option<String>,
    /// Playable stream URL (playlists already resolved by the directory).
    #[serde(default)]
    pub url_resolved: String,

    #[serde(default)]
    pub stationuuid: Option<String>,
    /// Comma-separated tag list, as the API sends it.
    #[serde(default)]
    pub tags: Option<String>,
    #[serde(default)]
    pub country: Option<String>,
    #[serde(default)]
    pub countrycode: Option<String>,
    #[serde(default)]
    pub language: Option<String>,
    #[serde(default)]
    pub codec: Option<String>,
    #[serde(default)]
    pub bitrate: Option<u32>,
    #[serde(default)]
    pub votes: Option<i64>,
    #[serde(default)]
    pub clickcount: Option<i64>,
    #[serde(default)]
    pub homepage: Option<String>,
}

impl Station {
    /// The favicon, unless it is missing, blank or the literal `"null"`.
    pub fn usable_favicon(&self) -> Option<&str> {
        match self.favicon.as_deref().map(str::trim) {
            Some("") | Some("null") | None => None,
            Some(url) => Some(url),
        }
    }

    /// Tags split on commas, trimmed, empties dropped.
    pub fn tag_list(&self) -> Vec<&str> {
        self.tags
            .as_deref()
            .unwrap_or_default()
            .split(',')
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .collect()
    }

    /// Short "codec · bitrate · country" summary; empty parts are skipped.
    pub fn summary(&self) -> String {
        let mut parts: Vec<String> = Vec::new();
        if let Some(codec) = self.codec.as_deref().filter(|c| !c.is_empty()) {
            parts.push(codec.to_string());
        }
        if let Some(kbps) = self.bitrate.filter(|b| *b > 0) {
            parts.push(format!("{} kbps", kbps));
        }
        if let Some(country) = self.country.as_deref().filter(|c| !c.is_empty()) {
            parts.push(country.to_string());
        }
        parts.join(" · ")
    }
}

/// Decode a JSON array of station records.
pub fn parse_stations(body: &[u8]) -> Result<Vec<Station>, serde_json::Error> {
    serde_json::from_slice(body)
}
