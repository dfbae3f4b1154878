//! Materials library types: articles and exercises grouped by category.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Number of characters shown in a material excerpt.
const EXCERPT_LEN: usize = 150;

/// A library material (article, exercise, ...) authored by a psychologist.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Material {
    pub id: i64,
    pub title: String,
    pub content: String,
    /// Free-form kind tag: "article", "exercise", ...
    pub kind: String,
    pub image_url: Option<String>,
    pub is_published: bool,
    pub author_id: Option<i64>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub categories: Vec<Category>,
}

impl Material {
    /// Short content preview for list views.
    pub fn excerpt(&self) -> String {
        if self.content.chars().count() <= EXCERPT_LEN {
            return self.content.clone();
        }
        let cut: String = self.content.chars().take(EXCERPT_LEN).collect();
        format!("{cut}...")
    }
}

/// A material category.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Category {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
    pub slug: String,
    pub is_active: bool,
}

/// Data required to create a material.
#[derive(Debug, Clone, Deserialize)]
pub struct NewMaterial {
    pub title: String,
    pub content: String,
    pub kind: String,
    pub image_url: Option<String>,
    #[serde(default)]
    pub category_ids: Vec<i64>,
}

/// Data required to create a category. The slug is derived from the name.
#[derive(Debug, Clone, Deserialize)]
pub struct NewCategory {
    pub name: String,
    pub description: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn material(content: &str) -> Material {
        Material {
            id: 1,
            title: "Breathing basics".to_string(),
            content: content.to_string(),
            kind: "exercise".to_string(),
            image_url: None,
            is_published: true,
            author_id: Some(2),
            created_at: Utc::now(),
            updated_at: Utc::now(),
            categories: Vec::new(),
        }
    }

    #[test]
    fn test_excerpt_short_content_unchanged() {
        let m = material("short text");
        assert_eq!(m.excerpt(), "short text");
    }

    #[test]
    fn test_excerpt_long_content_truncated() {
        let m = material(&"x".repeat(500));
        let excerpt = m.excerpt();
        assert_eq!(excerpt.chars().count(), 153);
        assert!(excerpt.ends_with("..."));
    }
}
