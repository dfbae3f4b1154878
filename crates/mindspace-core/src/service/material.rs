//! Materials library service.
//!
//! Reading is open to any authenticated user; publishing materials and
//! categories is restricted to psychologists.

use mindspace_types::error::{MaterialError, RepositoryError};
use mindspace_types::material::{Category, Material, NewCategory, NewMaterial};
use mindspace_types::user::{User, UserRole};
use tracing::info;

use crate::repository::MaterialRepository;

/// Orchestrates the materials library.
pub struct MaterialService<M: MaterialRepository> {
    material_repo: M,
}

impl<M: MaterialRepository> MaterialService<M> {
    pub fn new(material_repo: M) -> Self {
        Self { material_repo }
    }

    pub async fn list(&self, category_id: Option<i64>) -> Result<Vec<Material>, MaterialError> {
        Ok(self.material_repo.list(category_id).await?)
    }

    pub async fn get(&self, id: i64) -> Result<Material, MaterialError> {
        self.material_repo
            .get(id)
            .await?
            .ok_or(MaterialError::NotFound)
    }

    /// Publish a material. Psychologists only.
    pub async fn create(
        &self,
        author: &User,
        material: &NewMaterial,
    ) -> Result<Material, MaterialError> {
        if author.role != UserRole::Psychologist {
            return Err(MaterialError::Forbidden);
        }

        let material = self.material_repo.create(author.id, material).await?;
        info!(material_id = material.id, author_id = author.id, "Material published");
        Ok(material)
    }

    pub async fn list_categories(&self) -> Result<Vec<Category>, MaterialError> {
        Ok(self.material_repo.list_categories().await?)
    }

    /// Create a category. Psychologists only; the slug is derived from the
    /// name.
    pub async fn create_category(
        &self,
        author: &User,
        category: &NewCategory,
    ) -> Result<Category, MaterialError> {
        if author.role != UserRole::Psychologist {
            return Err(MaterialError::Forbidden);
        }

        let slug = slugify(&category.name);
        self.material_repo
            .create_category(category, &slug)
            .await
            .map_err(|e| match e {
                RepositoryError::Conflict(_) => {
                    MaterialError::CategoryConflict(category.name.clone())
                }
                other => other.into(),
            })
    }
}

/// Lowercase ASCII slug: alphanumerics kept, runs of anything else become a
/// single hyphen.
fn slugify(name: &str) -> String {
    let mut slug = String::with_capacity(name.len());
    let mut last_was_hyphen = true;
    for c in name.chars() {
        if c.is_ascii_alphanumeric() {
            slug.push(c.to_ascii_lowercase());
            last_was_hyphen = false;
        } else if !last_was_hyphen {
            slug.push('-');
            last_was_hyphen = true;
        }
    }
    while slug.ends_with('-') {
        slug.pop();
    }
    slug
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slugify_basic() {
        assert_eq!(slugify("Anxiety Management"), "anxiety-management");
    }

    #[test]
    fn test_slugify_collapses_punctuation() {
        assert_eq!(slugify("Sleep -- & rest!"), "sleep-rest");
    }

    #[test]
    fn test_slugify_trims_edges() {
        assert_eq!(slugify("  spaced  "), "spaced");
    }
}
