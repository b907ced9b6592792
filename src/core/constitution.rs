//! Constitution store: loading and validation of rule catalogues.
//!
//! The catalogue ships inside the binary. It is parsed once at start-up and
//! shared read-only; there is no way to change rules at runtime.

use std::collections::HashSet;
use std::path::Path;

use crate::domain::Constitution;
use crate::error::ConstitutionError;

/// The rule catalogue compiled into the binary
pub const EMBEDDED_CONSTITUTION: &str = include_str!("../../constitutions/v1.0.yaml");

/// Category scored by default
pub const DEFAULT_CATEGORY: &str = "completeness";

/// Load the embedded constitution
pub fn load() -> Result<Constitution, ConstitutionError> {
    from_yaml(EMBEDDED_CONSTITUTION)
}

/// Parse and validate a constitution from YAML
pub fn from_yaml(content: &str) -> Result<Constitution, ConstitutionError> {
    let constitution: Constitution = serde_yaml::from_str(content)?;
    validate(&constitution)?;
    Ok(constitution)
}

/// Load a constitution from a YAML file
pub fn from_file(path: &Path) -> anyhow::Result<Constitution> {
    use anyhow::Context;

    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read constitution file: {}", path.display()))?;

    from_yaml(&content)
        .with_context(|| format!("Invalid constitution file: {}", path.display()))
}

/// Validate a constitution definition
pub fn validate(constitution: &Constitution) -> Result<(), ConstitutionError> {
    if constitution.version.trim().is_empty() {
        return Err(ConstitutionError::EmptyVersion);
    }

    if constitution.categories.is_empty() {
        return Err(ConstitutionError::NoCategories);
    }

    let mut category_names = HashSet::new();

    for category in &constitution.categories {
        if category.name.trim().is_empty() {
            return Err(ConstitutionError::EmptyCategoryName);
        }
        if !category_names.insert(category.name.as_str()) {
            return Err(ConstitutionError::DuplicateCategory(category.name.clone()));
        }

        let mut rule_ids = HashSet::new();

        for (index, rule) in category.rules.iter().enumerate() {
            if rule.id.trim().is_empty() {
                return Err(ConstitutionError::EmptyRuleId {
                    category: category.name.clone(),
                    index,
                });
            }

            if !rule_ids.insert(rule.id.as_str()) {
                return Err(ConstitutionError::DuplicateRuleId {
                    category: category.name.clone(),
                    rule_id: rule.id.clone(),
                });
            }

            // NaN fails both comparisons
            if !(rule.weight > 0.0 && rule.weight <= 1.0) {
                return Err(ConstitutionError::WeightOutOfRange {
                    category: category.name.clone(),
                    rule_id: rule.id.clone(),
                    weight: rule.weight,
                });
            }
        }
    }

    Ok(())
}
