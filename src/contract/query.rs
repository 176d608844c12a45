//! Per-route query parameter contracts.
//!
//! Parsing never touches the network: a request whose query is rejected here
//! is answered with 400 before any upstream is contacted.

use std::collections::HashMap;
use std::num::NonZeroU32;

use thiserror::Error;
use url::{form_urlencoded, Url};

use crate::contract::{join, Violation};

/// Revalidation interval used when the caller does not supply one.
pub const DEFAULT_REVALIDATE_SECONDS: u32 = 60;

/// Cache revalidation interval in whole seconds. Always at least 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RevalidateSeconds(NonZeroU32);

impl RevalidateSeconds {
    pub fn new(seconds: u32) -> Option<Self> {
        NonZeroU32::new(seconds).map(Self)
    }

    pub fn get(self) -> u32 {
        self.0.get()
    }
}

impl Default for RevalidateSeconds {
    fn default() -> Self {
        Self(NonZeroU32::new(DEFAULT_REVALIDATE_SECONDS).unwrap_or(NonZeroU32::MIN))
    }
}

/// The query string broke its route's contract.
#[derive(Debug, Error)]
#[error("{}", join(.0))]
pub struct QueryError(pub Vec<Violation>);

/// Parameters accepted by `/content/hero` and `/content/products`.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ContentQuery {
    pub revalidate: RevalidateSeconds,
    pub endpoint: Option<Url>,
}

/// Parameters accepted by `/content/home`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HomeQuery {
    pub path: String,
    pub revalidate: RevalidateSeconds,
    pub endpoint: Option<Url>,
}

impl ContentQuery {
    pub fn parse(raw: Option<&str>) -> Result<Self, QueryError> {
        let mut params = RawParams::parse(raw);
        let revalidate = params.revalidate();
        let endpoint = params.endpoint();
        params.finish()?;

        Ok(Self {
            revalidate: revalidate.unwrap_or_default(),
            endpoint,
        })
    }
}

impl HomeQuery {
    pub fn parse(raw: Option<&str>) -> Result<Self, QueryError> {
        let mut params = RawParams::parse(raw);
        let path = params.path();
        let revalidate = params.revalidate();
        let endpoint = params.endpoint();
        params.finish()?;

        Ok(Self {
            path: path.unwrap_or_default(),
            revalidate: revalidate.unwrap_or_default(),
            endpoint,
        })
    }
}

/// Decoded query pairs plus the violations found while reading them.
struct RawParams {
    values: HashMap<String, Vec<String>>,
    violations: Vec<Violation>,
}

impl RawParams {
    fn parse(raw: Option<&str>) -> Self {
        let mut values: HashMap<String, Vec<String>> = HashMap::new();
        for (key, value) in form_urlencoded::parse(raw.unwrap_or_default().as_bytes()) {
            values.entry(key.into_owned()).or_default().push(value.into_owned());
        }
        Self {
            values,
            violations: Vec::new(),
        }
    }

    /// Single value for `name`; repeated keys are a violation.
    fn single(&mut self, name: &'static str) -> Option<String> {
        let mut values = self.values.remove(name)?;
        if values.len() > 1 {
            self.violations.push(Violation::new(name, "must be given at most once"));
            return None;
        }
        values.pop()
    }

    fn revalidate(&mut self) -> Option<RevalidateSeconds> {
        let raw = self.single("revalidateSeconds")?;
        if raw.is_empty() {
            return None;
        }
        let parsed = raw
            .parse::<u32>()
            .ok()
            .and_then(RevalidateSeconds::new);
        if parsed.is_none() {
            self.violations.push(Violation::new(
                "revalidateSeconds",
                format!("must be a positive integer, got '{}'", raw),
            ));
        }
        parsed
    }

    fn endpoint(&mut self) -> Option<Url> {
        let raw = self.single("endpoint")?;
        match Url::parse(&raw) {
            Ok(url) if matches!(url.scheme(), "http" | "https") => Some(url),
            _ => {
                self.violations.push(Violation::new(
                    "endpoint",
                    "must be an absolute http(s) URL",
                ));
                None
            }
        }
    }

    fn path(&mut self) -> Option<String> {
        match self.single("path") {
            Some(path) if !path.is_empty() => Some(path),
            Some(_) => {
                self.violations.push(Violation::new("path", "must not be empty"));
                None
            }
            None => {
                if !self.violations.iter().any(|v| v.field == "path") {
                    self.violations.push(Violation::new("path", "is required"));
                }
                None
            }
        }
    }

    fn finish(self) -> Result<(), QueryError> {
        if self.violations.is_empty() {
            Ok(())
        } else {
            Err(QueryError(self.violations))
        }
    }
}
