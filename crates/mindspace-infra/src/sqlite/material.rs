//! SQLite material repository implementation.
//!
//! Materials carry their categories, loaded per material through the
//! `material_categories` join table.

use chrono::Utc;
use mindspace_core::repository::MaterialRepository;
use mindspace_types::error::RepositoryError;
use mindspace_types::material::{Category, Material, NewCategory, NewMaterial};
use sqlx::Row;

use super::pool::DatabasePool;
use super::{format_datetime, map_sqlx_error, parse_datetime};

/// SQLite-backed implementation of `MaterialRepository`.
pub struct SqliteMaterialRepository {
    pool: DatabasePool,
}

impl SqliteMaterialRepository {
    /// Create a new repository backed by the given database pool.
    pub fn new(pool: DatabasePool) -> Self {
        Self { pool }
    }

    async fn load_categories(&self, material_id: i64) -> Result<Vec<Category>, RepositoryError> {
        let rows = sqlx::query(
            r#"SELECT c.* FROM categories c
               JOIN material_categories mc ON mc.category_id = c.id
               WHERE mc.material_id = ?
               ORDER BY c.name"#,
        )
        .bind(material_id)
        .fetch_all(&self.pool.reader)
        .await
        .map_err(map_sqlx_error)?;

        let mut categories = Vec::with_capacity(rows.len());
        for row in &rows {
            categories.push(category_from_row(row)?);
        }
        Ok(categories)
    }
}

/// Internal row type for mapping SQLite rows to domain Material.
struct MaterialRow {
    id: i64,
    title: String,
    content: String,
    kind: String,
    image_url: Option<String>,
    is_published: i64,
    author_id: Option<i64>,
    created_at: String,
    updated_at: String,
}

impl MaterialRow {
    fn from_row(row: &sqlx::sqlite::SqliteRow) -> Result<Self, sqlx::Error> {
        Ok(Self {
            id: row.try_get("id")?,
            title: row.try_get("title")?,
            content: row.try_get("content")?,
            kind: row.try_get("kind")?,
            image_url: row.try_get("image_url")?,
            is_published: row.try_get("is_published")?,
            author_id: row.try_get("author_id")?,
            created_at: row.try_get("created_at")?,
            updated_at: row.try_get("updated_at")?,
        })
    }

    fn into_material(self, categories: Vec<Category>) -> Result<Material, RepositoryError> {
        Ok(Material {
            id: self.id,
            title: self.title,
            content: self.content,
            kind: self.kind,
            image_url: self.image_url,
            is_published: self.is_published != 0,
            author_id: self.author_id,
            created_at: parse_datetime(&self.created_at)?,
            updated_at: parse_datetime(&self.updated_at)?,
            categories,
        })
    }
}

fn category_from_row(row: &sqlx::sqlite::SqliteRow) -> Result<Category, RepositoryError> {
    let is_active: i64 = row
        .try_get("is_active")
        .map_err(|e| RepositoryError::Query(e.to_string()))?;
    Ok(Category {
        id: row
            .try_get("id")
            .map_err(|e| RepositoryError::Query(e.to_string()))?,
        name: row
            .try_get("name")
            .map_err(|e| RepositoryError::Query(e.to_string()))?,
        description: row
            .try_get("description")
            .map_err(|e| RepositoryError::Query(e.to_string()))?,
        slug: row
            .try_get("slug")
            .map_err(|e| RepositoryError::Query(e.to_string()))?,
        is_active: is_active != 0,
    })
}

impl MaterialRepository for SqliteMaterialRepository {
    async fn list(&self, category_id: Option<i64>) -> Result<Vec<Material>, RepositoryError> {
        let rows = match category_id {
            Some(category_id) => {
                sqlx::query(
                    r#"SELECT m.* FROM materials m
                       JOIN material_categories mc ON mc.material_id = m.id
                       WHERE m.is_published = 1 AND mc.category_id = ?
                       ORDER BY m.created_at DESC, m.id DESC"#,
                )
                .bind(category_id)
                .fetch_all(&self.pool.reader)
                .await
            }
            None => {
                sqlx::query(
                    "SELECT * FROM materials WHERE is_published = 1 ORDER BY created_at DESC, id DESC",
                )
                .fetch_all(&self.pool.reader)
                .await
            }
        }
        .map_err(map_sqlx_error)?;

        let mut materials = Vec::with_capacity(rows.len());
        for row in &rows {
            let material_row =
                MaterialRow::from_row(row).map_err(|e| RepositoryError::Query(e.to_string()))?;
            let categories = self.load_categories(material_row.id).await?;
            materials.push(material_row.into_material(categories)?);
        }
        Ok(materials)
    }

    async fn get(&self, id: i64) -> Result<Option<Material>, RepositoryError> {
        let row = sqlx::query("SELECT * FROM materials WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool.reader)
            .await
            .map_err(map_sqlx_error)?;

        match row {
            Some(row) => {
                let material_row =
                    MaterialRow::from_row(&row).map_err(|e| RepositoryError::Query(e.to_string()))?;
                let categories = self.load_categories(material_row.id).await?;
                Ok(Some(material_row.into_material(categories)?))
            }
            None => Ok(None),
        }
    }

    async fn create(
        &self,
        author_id: i64,
        material: &NewMaterial,
    ) -> Result<Material, RepositoryError> {
        let now = Utc::now();
        let result = sqlx::query(
            r#"INSERT INTO materials
               (title, content, kind, image_url, is_published, author_id, created_at, updated_at)
               VALUES (?, ?, ?, ?, 1, ?, ?, ?)"#,
        )
        .bind(&material.title)
        .bind(&material.content)
        .bind(&material.kind)
        .bind(&material.image_url)
        .bind(author_id)
        .bind(format_datetime(&now))
        .bind(format_datetime(&now))
        .execute(&self.pool.writer)
        .await
        .map_err(map_sqlx_error)?;

        let id = result.last_insert_rowid();
        for category_id in &material.category_ids {
            sqlx::query("INSERT INTO material_categories (material_id, category_id) VALUES (?, ?)")
                .bind(id)
                .bind(category_id)
                .execute(&self.pool.writer)
                .await
                .map_err(map_sqlx_error)?;
        }

        let categories = self.load_categories(id).await?;
        Ok(Material {
            id,
            title: material.title.clone(),
            content: material.content.clone(),
            kind: material.kind.clone(),
            image_url: material.image_url.clone(),
            is_published: true,
            author_id: Some(author_id),
            created_at: now,
            updated_at: now,
            categories,
        })
    }

    async fn list_categories(&self) -> Result<Vec<Category>, RepositoryError> {
        let rows = sqlx::query("SELECT * FROM categories WHERE is_active = 1 ORDER BY name")
            .fetch_all(&self.pool.reader)
            .await
            .map_err(map_sqlx_error)?;

        let mut categories = Vec::with_capacity(rows.len());
        for row in &rows {
            categories.push(category_from_row(row)?);
        }
        Ok(categories)
    }

    async fn create_category(
        &self,
        category: &NewCategory,
        slug: &str,
    ) -> Result<Category, RepositoryError> {
        let result = sqlx::query(
            "INSERT INTO categories (name, description, slug, is_active) VALUES (?, ?, ?, 1)",
        )
        .bind(&category.name)
        .bind(&category.description)
        .bind(slug)
        .execute(&self.pool.writer)
        .await
        .map_err(map_sqlx_error)?;

        Ok(Category {
            id: result.last_insert_rowid(),
            name: category.name.clone(),
            description: category.description.clone(),
            slug: slug.to_string(),
            is_active: true,
        })
    }
}
