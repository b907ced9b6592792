//! Constitution data types.
//!
//! A constitution is a versioned catalogue of weighted rules grouped into
//! categories. It is plain data: loading and validation live in
//! `core::constitution`.

use serde::{Deserialize, Serialize};

/// A single weighted check within a category
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Rule {
    /// Rule identifier (unique within its category)
    pub id: String,

    /// Human-readable description of what the rule checks
    pub description: String,

    /// Category-local weight in (0, 1]
    pub weight: f64,

    /// Whether the rule needs supporting documentation to pass
    pub required: bool,
}

/// A named, ordered group of rules
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Category {
    pub name: String,
    pub rules: Vec<Rule>,
}

/// A versioned rule catalogue
///
/// Categories keep catalogue order so that serialization (and therefore the
/// attestation hash) is stable across loads.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Constitution {
    /// Version identifier pinned by every evaluation
    pub version: String,

    /// Rule categories in catalogue order
    pub categories: Vec<Category>,

    /// Known fraud indicator descriptions
    #[serde(default)]
    pub fraud_indicators: Vec<String>,
}

impl Constitution {
    /// Rules of a category, or an empty slice if the category is unknown
    pub fn get(&self, category: &str) -> &[Rule] {
        self.category(category)
            .map(|c| c.rules.as_slice())
            .unwrap_or(&[])
    }

    /// Look up a category by name
    pub fn category(&self, name: &str) -> Option<&Category> {
        self.categories.iter().find(|c| c.name == name)
    }

    /// Whether a category with this name exists
    pub fn has_category(&self, name: &str) -> bool {
        self.category(name).is_some()
    }

    /// All category names in catalogue order
    pub fn all_categories(&self) -> Vec<&str> {
        self.categories.iter().map(|c| c.name.as_str()).collect()
    }

    /// Total number of rules across all categories
    pub fn rule_count(&self) -> usize {
        self.categories.iter().map(|c| c.rules.len()).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Constitution {
        Constitution {
            version: "test".to_string(),
            categories: vec![
                Category {
                    name: "alpha".to_string(),
                    rules: vec![Rule {
                        id: "A_001".to_string(),
                        description: "first".to_string(),
                        weight: 0.5,
                        required: true,
                    }],
                },
                Category {
                    name: "beta".to_string(),
                    rules: vec![],
                },
            ],
            fraud_indicators: vec![],
        }
    }

    #[test]
    fn test_get_known_and_unknown_category() {
        let constitution = sample();
        assert_eq!(constitution.get("alpha").len(), 1);
        assert!(constitution.get("beta").is_empty());
        assert!(constitution.get("gamma").is_empty());
    }

    #[test]
    fn test_categories_keep_catalogue_order() {
        let constitution = sample();
        assert_eq!(constitution.all_categories(), vec!["alpha", "beta"]);
        assert_eq!(constitution.rule_count(), 1);
    }
}
