//! MaterialRepository trait definition.

use mindspace_types::error::RepositoryError;
use mindspace_types::material::{Category, Material, NewCategory, NewMaterial};

/// Repository trait for the materials library.
pub trait MaterialRepository: Send + Sync {
    /// List published materials, optionally filtered by category.
    fn list(
        &self,
        category_id: Option<i64>,
    ) -> impl std::future::Future<Output = Result<Vec<Material>, RepositoryError>> + Send;

    /// Get a material by id, categories included.
    fn get(
        &self,
        id: i64,
    ) -> impl std::future::Future<Output = Result<Option<Material>, RepositoryError>> + Send;

    /// Create a material and link it to the given categories.
    fn create(
        &self,
        author_id: i64,
        material: &NewMaterial,
    ) -> impl std::future::Future<Output = Result<Material, RepositoryError>> + Send;

    /// List all categories.
    fn list_categories(
        &self,
    ) -> impl std::future::Future<Output = Result<Vec<Category>, RepositoryError>> + Send;

    /// Create a category. Fails with `Conflict` on duplicate name or slug.
    fn create_category(
        &self,
        category: &NewCategory,
        slug: &str,
    ) -> impl std::future::Future<Output = Result<Category, RepositoryError>> + Send;
}
