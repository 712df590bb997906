//! Editing language resolution

use crate::config::Config;

/// Active editing language: query parameter, then session, then official language
///
/// A candidate is only accepted when it is a configured language.
pub fn resolve_language(
    config: &Config,
    query_language: Option<&str>,
    session_language: Option<&str>,
) -> String {
    [query_language, session_language]
        .into_iter()
        .flatten()
        .map(str::trim)
        .find(|candidate| config.is_language(candidate))
        .map(str::to_string)
        .unwrap_or_else(|| config.official_language.clone())
}
