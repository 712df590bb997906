//! Request extractors.

use crate::contract::{Principal, RequestContext};
use axum::{
    extract::{FromRequestParts, Query},
    http::{header, request::Parts, HeaderMap},
};
use serde::Deserialize;
use std::convert::Infallible;

/// Cookie holding the editing language of the admin session
pub const LANGUAGE_COOKIE: &str = "page_language";

/// Admin request context built from the authenticated principal and request parameters.
///
/// The principal comes from request extensions (set by the auth middleware); requests
/// without one run as an anonymous principal that holds no capability.
#[derive(Debug, Clone)]
pub struct AdminContext(pub RequestContext);

/// Query parameters shared by every admin view
#[derive(Debug, Default, Deserialize)]
struct AdminQuery {
    language: Option<String>,
    template: Option<String>,
}

impl<S> FromRequestParts<S> for AdminContext
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let principal = parts
            .extensions
            .get::<Principal>()
            .cloned()
            .unwrap_or_default();
        let query = Query::<AdminQuery>::try_from_uri(&parts.uri)
            .map(|Query(query)| query)
            .unwrap_or_default();

        Ok(Self(RequestContext {
            principal,
            query_language: query.language.filter(|v| !v.is_empty()),
            session_language: cookie(&parts.headers, LANGUAGE_COOKIE),
            template: query.template.filter(|v| !v.is_empty()),
        }))
    }
}

fn cookie(headers: &HeaderMap, name: &str) -> Option<String> {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(key, _)| *key == name)
        .map(|(_, value)| value.trim().to_string())
        .filter(|value| !value.is_empty())
}
