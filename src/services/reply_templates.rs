// File Path: src/services/reply_templates.rs

//! # Reply Templates
//!
//! Per-language header labels used to render a matched condition. Adding a
//! language means adding a `ReplyTemplate` (built in or via the `templates`
//! section of the config file).

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::services::knowledge_store::FALLBACK_LANG;

/// Labels and joiner for one language. Missing fields in a configured
/// template take the English value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReplyTemplate {
    pub icon: String,
    pub info_label: String,
    pub symptoms_label: String,
    pub prevention_label: String,
    pub treatment_label: String,
    pub emergency_label: String,
    pub list_separator: String,
}

impl ReplyTemplate {
    pub fn english() -> Self {
        Self {
            icon: "🦠".to_string(),
            info_label: "info".to_string(),
            symptoms_label: "Symptoms".to_string(),
            prevention_label: "Prevention".to_string(),
            treatment_label: "Treatment".to_string(),
            emergency_label: "Emergency".to_string(),
            list_separator: ", ".to_string(),
        }
    }

    pub fn hindi() -> Self {
        Self {
            icon: "🦠".to_string(),
            info_label: "जानकारी".to_string(),
            symptoms_label: "लक्षण".to_string(),
            prevention_label: "बचाव".to_string(),
            treatment_label: "इलाज".to_string(),
            emergency_label: "आपातकाल".to_string(),
            list_separator: ", ".to_string(),
        }
    }

    /// Renders the five-line reply for an already resolved condition.
    pub fn render(
        &self,
        title: &str,
        symptoms: &[String],
        prevention: &[String],
        treatment: &str,
        emergency: &str,
    ) -> String {
        let heading = format!("{} {} {}:", self.icon, title, self.info_label);
        format!(
            "{}\n{}: {}\n{}: {}\n{}: {}\n{}: {}",
            heading.trim_start(),
            self.symptoms_label,
            symptoms.join(self.list_separator.as_str()),
            self.prevention_label,
            prevention.join(self.list_separator.as_str()),
            self.treatment_label,
            treatment,
            self.emergency_label,
            emergency,
        )
    }
}

impl Default for ReplyTemplate {
    fn default() -> Self {
        Self::english()
    }
}

/// Language code to template lookup with an English default.
#[derive(Debug, Clone)]
pub struct TemplateCatalog {
    templates: HashMap<String, ReplyTemplate>,
    fallback: ReplyTemplate,
}

impl TemplateCatalog {
    pub fn builtin() -> Self {
        let mut templates = HashMap::new();
        templates.insert(FALLBACK_LANG.to_string(), ReplyTemplate::english());
        templates.insert("hi".to_string(), ReplyTemplate::hindi());
        Self {
            templates,
            fallback: ReplyTemplate::english(),
        }
    }

    /// Built-in templates plus `overrides`; an override for a built-in
    /// language replaces it.
    pub fn with_overrides(overrides: HashMap<String, ReplyTemplate>) -> Self {
        let mut catalog = Self::builtin();
        for (lang, template) in overrides {
            if lang == FALLBACK_LANG {
                catalog.fallback = template.clone();
            }
            catalog.templates.insert(lang, template);
        }
        catalog
    }

    pub fn select(&self, lang: &str) -> &ReplyTemplate {
        self.templates.get(lang).unwrap_or(&self.fallback)
    }

    /// Configured language codes, sorted.
    pub fn languages(&self) -> Vec<&str> {
        let mut langs: Vec<&str> = self.templates.keys().map(String::as_str).collect();
        langs.sort_unstable();
        langs
    }
}

impl Default for TemplateCatalog {
    fn default() -> Self {
        Self::builtin()
    }
}
