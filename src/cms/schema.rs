//! Upstream CMS response shapes.
//!
//! The hero query answers under `homepageByPath` while the home query answers
//! under `homePageByPath`. Both spellings come from the CMS models and are kept
//! as-is until the upstream schema says otherwise.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::contract::{ContractError, HeroBannerContent, HomeContent, Violation};

/// GraphQL document for the home page content fragment.
pub const HOME_PAGE_QUERY: &str = r#"
query HomePageByPath($path: String!) {
  homePageByPath(_path: $path) {
    item {
      title
      heroTitle
      heroSubtitle
    }
  }
}
"#;

/// Body of the GraphQL POST.
#[derive(Debug, Serialize)]
pub struct GraphqlRequest<'a> {
    pub query: &'static str,
    pub variables: HomePageVariables<'a>,
}

#[derive(Debug, Serialize)]
pub struct HomePageVariables<'a> {
    pub path: &'a str,
}

impl<'a> GraphqlRequest<'a> {
    pub fn home_page(path: &'a str) -> Self {
        Self {
            query: HOME_PAGE_QUERY,
            variables: HomePageVariables { path },
        }
    }
}

#[derive(Debug, Deserialize)]
struct Item<T> {
    item: T,
}

#[derive(Debug, Deserialize)]
struct HeroEnvelope {
    data: HeroData,
}

#[derive(Debug, Deserialize)]
struct HeroData {
    #[serde(rename = "homepageByPath")]
    homepage_by_path: Item<HeroItem>,
}

#[derive(Debug, Deserialize)]
struct HeroItem {
    title: String,
    #[serde(default)]
    description: Option<String>,
}

#[derive(Debug, Deserialize)]
struct HomeEnvelope {
    data: HomeData,
}

#[derive(Debug, Deserialize)]
struct HomeData {
    #[serde(rename = "homePageByPath")]
    home_page_by_path: Item<HomeItem>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct HomeItem {
    title: String,
    #[serde(default)]
    hero_title: Option<String>,
    #[serde(default)]
    hero_subtitle: Option<String>,
}

#[derive(Debug, Deserialize)]
struct GraphqlErrors {
    errors: Vec<GraphqlErrorEntry>,
}

#[derive(Debug, Deserialize)]
struct GraphqlErrorEntry {
    message: String,
}

/// Parse a hero banner query response.
pub fn parse_hero(body: Value) -> Result<HeroBannerContent, ContractError> {
    let envelope: HeroEnvelope = parse("hero banner response", body)?;
    let item = envelope.data.homepage_by_path.item;
    Ok(HeroBannerContent {
        title: item.title,
        description: item.description,
    })
}

/// Parse a home page query response (either access mode).
pub fn parse_home(body: Value) -> Result<HomeContent, ContractError> {
    let envelope: HomeEnvelope = parse("home page response", body)?;
    let item = envelope.data.home_page_by_path.item;
    Ok(HomeContent {
        title: item.title,
        hero_title: item.hero_title,
        hero_subtitle: item.hero_subtitle,
    })
}

fn parse<T: DeserializeOwned>(subject: &'static str, body: Value) -> Result<T, ContractError> {
    // GraphQL reports failures in-band with a 200 status.
    let graphql_errors = serde_json::from_value::<GraphqlErrors>(body.clone())
        .ok()
        .filter(|e| !e.errors.is_empty());

    serde_json::from_value::<T>(body).map_err(|e| {
        let mut violations = vec![Violation::new("$", e.to_string())];
        if let Some(reported) = graphql_errors {
            for entry in reported.errors {
                violations.push(Violation::new("errors", entry.message));
            }
        }
        ContractError {
            subject,
            violations,
        }
    })
}
