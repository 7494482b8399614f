//! Search request parameters and their validation.

use serde::Deserialize;
use validator::Validate;

use crate::{Error, Result};

pub const DEFAULT_LIMIT: u32 = 20;
pub const MIN_LIMIT: i64 = 1;
pub const MAX_LIMIT: i64 = 100;

/// Query string of `GET /search`, as received.
///
/// Everything is a string here so that malformed numbers surface as our own
/// validation errors rather than extractor rejections.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SearchParams {
    pub q: Option<String>,
    pub limit: Option<String>,
    #[serde(rename = "type")]
    pub feature: Option<String>,
    pub bucket: Option<String>,
    pub gen: Option<String>,
}

/// A validated search request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchRequest {
    /// `q` exactly as supplied, echoed back in the response.
    pub query: Option<String>,
    pub limit: u32,
    pub feature: Option<String>,
    pub bucket: Option<String>,
    pub generation: Option<i32>,
}

#[derive(Debug, Validate)]
struct LimitCheck {
    #[validate(range(min = 1, max = 100, message = "limit must be between 1 and 100"))]
    limit: i64,
}

impl SearchRequest {
    pub fn from_params(params: SearchParams) -> Result<Self> {
        let limit = match non_empty(params.limit.as_deref()) {
            None => DEFAULT_LIMIT,
            Some(raw) => parse_limit(raw)?,
        };

        let generation = non_empty(params.gen.as_deref())
            .map(|raw| {
                raw.parse::<i32>().map_err(|_| {
                    Error::Validation(format!("gen must be an integer, got '{raw}'"))
                })
            })
            .transpose()?;

        check_text("q", params.q.as_deref())?;
        check_text("type", params.feature.as_deref())?;
        check_text("bucket", params.bucket.as_deref())?;

        Ok(Self {
            query: params.q,
            limit,
            feature: non_empty(params.feature.as_deref()).map(str::to_string),
            bucket: non_empty(params.bucket.as_deref()).map(str::to_string),
            generation,
        })
    }

    /// Free-text query, or `None` when the request should match everything.
    pub fn text(&self) -> Option<&str> {
        non_empty(self.query.as_deref())
    }
}

fn parse_limit(raw: &str) -> Result<u32> {
    let limit: i64 = raw
        .parse()
        .map_err(|_| Error::Validation(format!("limit must be an integer, got '{raw}'")))?;

    LimitCheck { limit }.validate().map_err(|e| {
        Error::Validation(format!(
            "limit must be between {MIN_LIMIT} and {MAX_LIMIT}, got {limit} ({e})"
        ))
    })?;

    u32::try_from(limit).map_err(|_| Error::Validation(format!("limit out of range: {limit}")))
}

/// Postgres text values can't hold NUL.
fn check_text(name: &str, value: Option<&str>) -> Result<()> {
    match value {
        Some(v) if v.contains('\0') => Err(Error::Validation(format!(
            "{name} must not contain NUL characters"
        ))),
        _ => Ok(()),
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params(pairs: &[(&str, &str)]) -> SearchParams {
        let mut p = SearchParams::default();
        for (k, v) in pairs {
            let v = Some(v.to_string());
            match *k {
                "q" => p.q = v,
                "limit" => p.limit = v,
                "type" => p.feature = v,
                "bucket" => p.bucket = v,
                "gen" => p.gen = v,
                other => panic!("unknown param {other}"),
            }
        }
        p
    }

    #[test]
    fn defaults_when_nothing_supplied() {
        let req = SearchRequest::from_params(SearchParams::default()).unwrap();
        assert_eq!(req.limit, DEFAULT_LIMIT);
        assert_eq!(req.query, None);
        assert_eq!(req.text(), None);
        assert_eq!(req.feature, None);
        assert_eq!(req.bucket, None);
        assert_eq!(req.generation, None);
    }

    #[test]
    fn limit_bounds() {
        assert_eq!(
            SearchRequest::from_params(params(&[("limit", "1")]))
                .unwrap()
                .limit,
            1
        );
        assert_eq!(
            SearchRequest::from_params(params(&[("limit", "100")]))
                .unwrap()
                .limit,
            100
        );
        for bad in ["0", "101", "-5", "abc", "2.5", "99999999999999999999"] {
            let err = SearchRequest::from_params(params(&[("limit", bad)])).unwrap_err();
            assert!(matches!(err, Error::Validation(_)), "limit={bad}");
        }
    }

    #[test]
    fn generation_must_be_integer() {
        let req = SearchRequest::from_params(params(&[("gen", "9")])).unwrap();
        assert_eq!(req.generation, Some(9));

        let req = SearchRequest::from_params(params(&[("gen", "0")])).unwrap();
        assert_eq!(req.generation, Some(0));

        let err = SearchRequest::from_params(params(&[("gen", "one")])).unwrap_err();
        assert!(matches!(err, Error::Validation(_)));
    }

    #[test]
    fn blank_values_are_treated_as_absent() {
        let req = SearchRequest::from_params(params(&[
            ("q", "  "),
            ("type", ""),
            ("bucket", ""),
            ("gen", ""),
            ("limit", ""),
        ]))
        .unwrap();
        assert_eq!(req.text(), None);
        assert_eq!(req.query.as_deref(), Some("  "));
        assert_eq!(req.feature, None);
        assert_eq!(req.bucket, None);
        assert_eq!(req.generation, None);
        assert_eq!(req.limit, DEFAULT_LIMIT);
    }

    #[test]
    fn text_is_trimmed() {
        let req = SearchRequest::from_params(params(&[("q", " pika ")])).unwrap();
        assert_eq!(req.text(), Some("pika"));
        assert_eq!(req.query.as_deref(), Some(" pika "));
    }

    #[test]
    fn nul_characters_are_rejected() {
        for key in ["q", "type", "bucket"] {
            let err = SearchRequest::from_params(params(&[(key, "a\0b")])).unwrap_err();
            assert!(matches!(err, Error::Validation(_)), "{key}");
            assert!(err.to_string().contains(key), "{key}: {err}");
        }
    }
}
