use std::collections::HashSet;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::ConfigError;

/// A category label and the substrings that trigger it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryRule {
    pub label: String,
    pub triggers: Vec<String>,
}

impl CategoryRule {
    #[must_use]
    pub fn new(label: &str, triggers: &[&str]) -> Self {
        Self {
            label: label.to_string(),
            triggers: triggers.iter().map(|t| (*t).to_string()).collect(),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct CategoriesFile {
    pub categories: Vec<CategoryRule>,
}

/// The built-in marketing taxonomy, in tie-breaking order.
#[must_use]
pub fn default_categories() -> Vec<CategoryRule> {
    vec![
        CategoryRule::new(
            "Social Media Marketing",
            &[
                "social media",
                "instagram",
                "tiktok",
                "facebook",
                "twitter",
                "linkedin",
                "influencer",
            ],
        ),
        CategoryRule::new(
            "Content Marketing",
            &[
                "content",
                "blog",
                "video",
                "podcast",
                "storytelling",
                "copywriting",
            ],
        ),
        CategoryRule::new(
            "SEO & SEM",
            &[
                "seo",
                "sem",
                "search engine",
                "google",
                "keywords",
                "backlinks",
                "ranking",
            ],
        ),
        CategoryRule::new(
            "Email Marketing",
            &["email", "newsletter", "automation", "drip campaign"],
        ),
        CategoryRule::new(
            "Analytics & Data",
            &[
                "analytics", "data", "metrics", "KPI", "ROI", "tracking", "insights",
            ],
        ),
        CategoryRule::new(
            "Emerging Tech",
            &[
                "AI",
                "chatbot",
                "automation",
                "machine learning",
                "AR",
                "VR",
                "metaverse",
            ],
        ),
    ]
}

/// Load and validate a category taxonomy from a YAML file.
///
/// The file has a single `categories` list; declaration order is kept and
/// decides ties during categorization.
///
/// # Errors
///
/// Returns `ConfigError` if the file cannot be read, parsed, or fails validation.
pub fn load_categories(path: &Path) -> Result<Vec<CategoryRule>, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::CategoriesFileIo {
        path: path.display().to_string(),
        source: e,
    })?;

    parse_categories(&content)
}

fn parse_categories(content: &str) -> Result<Vec<CategoryRule>, ConfigError> {
    let file: CategoriesFile = serde_yaml::from_str(content)?;
    validate_categories(&file.categories)?;
    Ok(file.categories)
}

fn validate_categories(categories: &[CategoryRule]) -> Result<(), ConfigError> {
    if categories.is_empty() {
        return Err(ConfigError::Validation(
            "at least one category is required".to_string(),
        ));
    }

    let mut seen_labels = HashSet::new();
    for rule in categories {
        if rule.label.trim().is_empty() {
            return Err(ConfigError::Validation(
                "category label must be non-empty".to_string(),
            ));
        }

        if !seen_labels.insert(rule.label.to_lowercase()) {
            return Err(ConfigError::Validation(format!(
                "duplicate category label: '{}'",
                rule.label
            )));
        }

        if rule.triggers.is_empty() {
            return Err(ConfigError::Validation(format!(
                "category '{}' has no triggers",
                rule.label
            )));
        }

        // A blank trigger is a substring of every keyword.
        if rule.triggers.iter().any(|t| t.trim().is_empty()) {
            return Err(ConfigError::Validation(format!(
                "category '{}' has an empty trigger",
                rule.label
            )));
        }
    }

    Ok(())
}
