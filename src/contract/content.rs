//! Outbound CMS-derived payloads.

use serde::{Deserialize, Serialize};

/// `GET /health` body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthResponse {
    pub ok: bool,
}

/// `GET /content/hero` body. Any string is a valid title, the empty one
/// included.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HeroBannerContent {
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// `GET /content/home` body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HomeContent {
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hero_title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hero_subtitle: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_home_serializes_camel_case_and_skips_missing() {
        let home = HomeContent {
            title: "Home".into(),
            hero_title: Some("Hero".into()),
            hero_subtitle: None,
        };
        assert_eq!(
            serde_json::to_value(&home).unwrap(),
            json!({ "title": "Home", "heroTitle": "Hero" })
        );
    }

    #[test]
    fn test_hero_without_description() {
        let hero = HeroBannerContent {
            title: "Hero".into(),
            description: None,
        };
        assert_eq!(serde_json::to_value(&hero).unwrap(), json!({ "title": "Hero" }));
    }
}
