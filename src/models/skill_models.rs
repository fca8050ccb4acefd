//! Skill and Category types.
//!
//! Skills reference categories by name on write; the read shape
//! denormalizes the resolved category's id and color for display.
//! `parent` is accepted as a bare id on write and exposed as
//! `parent_id` on read.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Wire and row representation of a category.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, PartialEq)]
pub struct Category {
    pub id: i64,
    pub name: String,
    pub color: String,
}

pub const DEFAULT_CATEGORY_COLOR: &str = "#4a5568";

fn default_color() -> String {
    DEFAULT_CATEGORY_COLOR.to_string()
}

/// Create/replace payload for a category.
#[derive(Debug, Clone, Deserialize)]
pub struct CategoryInput {
    pub name: String,
    #[serde(default = "default_color")]
    pub color: String,
}

/// Read shape of a skill, joined with its category.
#[derive(Debug, Clone, Serialize, FromRow, PartialEq)]
pub struct SkillView {
    pub id: i64,
    pub name: String,
    pub category: String,
    pub category_id: i64,
    pub category_color: String,
    pub level: i32,
    pub description: String,
    pub user_comment: String,
    pub parent_id: Option<i64>,
}

/// Create/replace payload for a skill. `category` is a category name,
/// `parent` a bare skill id.
#[derive(Debug, Clone, Deserialize)]
pub struct SkillInput {
    pub name: String,
    pub category: String,
    pub level: i32,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub user_comment: String,
    #[serde(default)]
    pub parent: Option<i64>,
}

/// Fully validated, shaped skill data handed to the repository. The
/// category name has been resolved to an id and all bounds checked by
/// the time one of these exists.
#[derive(Debug, Clone, PartialEq)]
pub struct SkillRecord {
    pub name: String,
    pub category_id: i64,
    pub level: i32,
    pub description: String,
    pub user_comment: String,
    pub parent_id: Option<i64>,
}

impl SkillRecord {
    /// Current stored values of a skill, as a starting point for a
    /// partial update.
    pub fn from_view(view: &SkillView) -> Self {
        SkillRecord {
            name: view.name.clone(),
            category_id: view.category_id,
            level: view.level,
            description: view.description.clone(),
            user_comment: view.user_comment.clone(),
            parent_id: view.parent_id,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn category_input_defaults_color() {
        let input: CategoryInput = serde_json::from_str(r#"{"name":"Backend"}"#).unwrap();
        assert_eq!(input.color, "#4a5568");
    }

    #[test]
    fn skill_input_accepts_bare_parent_id() {
        let input: SkillInput =
            serde_json::from_str(r#"{"name":"Django","category":"Backend","level":3,"parent":1}"#)
                .unwrap();
        assert_eq!(input.parent, Some(1));
        assert_eq!(input.description, "");
    }
}
