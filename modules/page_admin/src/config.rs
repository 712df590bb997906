//! Configuration for the page admin module

use crate::domain::placeholders::SlotKind;
use figment::{
    providers::{Env, Format, Yaml},
    Figment,
};
use serde::Deserialize;
use std::collections::HashSet;
use std::path::{Path, PathBuf};

/// Environment prefix for overrides, e.g. `PAGE_ADMIN__OFFICIAL_LANGUAGE=fr`
pub const ENV_PREFIX: &str = "PAGE_ADMIN__";

/// Page admin configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Languages pages can be edited in
    #[serde(default = "default_languages")]
    pub languages: Vec<LanguageConfig>,

    /// Official language, also the fallback language
    #[serde(default = "default_official_language")]
    pub official_language: String,

    /// Template used when neither the page nor its ancestors set one
    #[serde(default = "default_template")]
    pub default_template: String,

    /// Selectable templates
    #[serde(default)]
    pub templates: Vec<TemplateConfig>,

    /// Directories searched for template sources
    #[serde(default)]
    pub template_dirs: Vec<PathBuf>,

    /// Show the publication start date field
    #[serde(default = "default_true")]
    pub show_start_date: bool,

    /// Show the publication end date field
    #[serde(default = "default_true")]
    pub show_end_date: bool,

    /// Multi-site deployment
    #[serde(default)]
    pub use_site_id: bool,

    /// Hide the site selector and pin new pages to `site_id`
    #[serde(default)]
    pub hide_sites: bool,

    /// Current site
    #[serde(default = "default_site_id")]
    pub site_id: i64,

    /// Known sites
    #[serde(default)]
    pub sites: Vec<SiteConfig>,

    /// URL-delegation registry entries pages may delegate to
    #[serde(default)]
    pub delegation_registry: Vec<String>,

    /// Require slugs to be unique among siblings
    #[serde(default)]
    pub unique_slug_required: bool,

    /// Enable the tags field
    #[serde(default = "default_true")]
    pub tagging: bool,

    /// Seed empty translations from the official language in the change form
    #[serde(default)]
    pub default_content_fallback: bool,
}

#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct LanguageConfig {
    pub code: String,
    pub name: String,
}

#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct SiteConfig {
    pub id: i64,
    pub domain: String,
}

/// A selectable page template
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct TemplateConfig {
    /// Template identifier, usually its path
    pub id: String,
    /// Human readable name
    pub name: String,
    /// Explicit placeholder declarations
    #[serde(default)]
    pub placeholders: Vec<PlaceholderConfig>,
    /// Scan this template source for placeholder tags
    #[serde(default)]
    pub source: Option<String>,
}

#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct PlaceholderConfig {
    pub name: String,
    #[serde(default)]
    pub kind: SlotKind,
    /// Stored once under the official language
    #[serde(default)]
    pub untranslated: bool,
    #[serde(default)]
    pub label: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            languages: default_languages(),
            official_language: default_official_language(),
            default_template: default_template(),
            templates: Vec::new(),
            template_dirs: Vec::new(),
            show_start_date: true,
            show_end_date: true,
            use_site_id: false,
            hide_sites: false,
            site_id: default_site_id(),
            sites: Vec::new(),
            delegation_registry: Vec::new(),
            unique_slug_required: false,
            tagging: true,
            default_content_fallback: false,
        }
    }
}

impl Config {
    /// Load from an optional YAML file, then apply environment overrides
    pub fn load(path: Option<&Path>) -> anyhow::Result<Self> {
        let mut figment = Figment::new();
        if let Some(path) = path {
            figment = figment.merge(Yaml::file(path));
        }
        let config: Config = figment
            .merge(Env::prefixed(ENV_PREFIX).split("__"))
            .extract()?;
        config.validate()?;
        Ok(config)
    }

    /// Reject configurations the admin cannot work with
    pub fn validate(&self) -> anyhow::Result<()> {
        if !self.is_language(&self.official_language) {
            anyhow::bail!(
                "official language '{}' is not one of the configured languages",
                self.official_language
            );
        }
        let mut seen = HashSet::new();
        for template in &self.templates {
            if !seen.insert(template.id.as_str()) {
                anyhow::bail!("template '{}' is declared twice", template.id);
            }
        }
        Ok(())
    }

    pub fn is_language(&self, code: &str) -> bool {
        self.languages.iter().any(|l| l.code == code)
    }

    pub fn language_codes(&self) -> Vec<String> {
        self.languages.iter().map(|l| l.code.clone()).collect()
    }

    /// Default template or one of the configured templates
    pub fn is_template(&self, id: &str) -> bool {
        id == self.default_template || self.templates.iter().any(|t| t.id == id)
    }

    pub fn is_site(&self, id: i64) -> bool {
        id == self.site_id || self.sites.iter().any(|s| s.id == id)
    }
}

fn default_languages() -> Vec<LanguageConfig> {
    vec![LanguageConfig {
        code: default_official_language(),
        name: "English".to_string(),
    }]
}

fn default_official_language() -> String {
    "en-us".to_string()
}

fn default_template() -> String {
    "pages/default.html".to_string()
}

fn default_site_id() -> i64 {
    1
}

fn default_true() -> bool {
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = Config::default();
        assert!(config.validate().is_ok());
        assert!(config.is_template("pages/default.html"));
        assert!(config.is_language("en-us"));
    }

    #[test]
    fn test_official_language_must_be_configured() {
        let config = Config {
            official_language: "de".to_string(),
            ..Config::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_duplicate_templates_rejected() {
        let template = TemplateConfig {
            id: "pages/a.html".to_string(),
            name: "A".to_string(),
            placeholders: Vec::new(),
            source: None,
        };
        let config = Config {
            templates: vec![template.clone(), template],
            ..Config::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_load_from_yaml_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("page_admin.yaml");
        std::fs::write(
            &path,
            r#"
languages:
  - { code: en, name: English }
  - { code: fr, name: French }
official_language: en
use_site_id: true
templates:
  - id: pages/article.html
    name: Article
    placeholders:
      - { name: body, kind: rich_text }
      - { name: image, kind: file, untranslated: true }
"#,
        )
        .unwrap();

        let config = Config::load(Some(&path)).unwrap();
        assert_eq!(config.languages.len(), 2);
        assert_eq!(config.official_language, "en");
        assert!(config.use_site_id);
        assert_eq!(config.templates[0].placeholders[0].kind, SlotKind::RichText);
        assert!(config.templates[0].placeholders[1].untranslated);
        assert!(config.show_start_date);
    }
}
