//! Category service implementation.

use crate::dto::{CategoryResponse, CreateCategoryRequest, UpdateCategoryRequest};
use async_trait::async_trait;
use fintrack_core::{
    rules, Category, CategoryId, FintrackError, FintrackResult, Service, UserId, ValidateExt,
};
use fintrack_repository::CategoryRepository;
use std::sync::Arc;
use tracing::{debug, info};

/// Category service trait.
#[async_trait]
pub trait CategoryService: Service {
    /// Lists all of a user's categories.
    async fn list_categories(&self, user_id: UserId) -> FintrackResult<Vec<CategoryResponse>>;

    /// Gets a category by ID.
    async fn get_category(
        &self,
        user_id: UserId,
        id: CategoryId,
    ) -> FintrackResult<CategoryResponse>;

    /// Creates a new category.
    async fn create_category(
        &self,
        user_id: UserId,
        request: CreateCategoryRequest,
    ) -> FintrackResult<CategoryResponse>;

    /// Updates an existing category.
    async fn update_category(
        &self,
        user_id: UserId,
        id: CategoryId,
        request: UpdateCategoryRequest,
    ) -> FintrackResult<CategoryResponse>;

    /// Deletes a category.
    async fn delete_category(&self, user_id: UserId, id: CategoryId) -> FintrackResult<()>;
}

/// Category service implementation.
pub struct CategoryServiceImpl<R: CategoryRepository> {
    category_repository: Arc<R>,
}

impl<R: CategoryRepository> CategoryServiceImpl<R> {
    /// Creates a new category service.
    pub fn new(category_repository: Arc<R>) -> Self {
        Self {
            category_repository,
        }
    }
}

fn validate_color(color: &str) -> FintrackResult<()> {
    rules::valid_hex_color(color)
        .map_err(|_| FintrackError::Validation("Color must be in #RRGGBB format".to_string()))
}

#[async_trait]
impl<R: CategoryRepository + 'static> CategoryService for CategoryServiceImpl<R> {
    async fn list_categories(&self, user_id: UserId) -> FintrackResult<Vec<CategoryResponse>> {
        debug!("Listing categories for user: {}", user_id);

        let categories = self.category_repository.find_all(user_id).await?;
        Ok(categories.into_iter().map(CategoryResponse::from).collect())
    }

    async fn get_category(
        &self,
        user_id: UserId,
        id: CategoryId,
    ) -> FintrackResult<CategoryResponse> {
        let category = self
            .category_repository
            .find_by_id(user_id, id)
            .await?
            .ok_or_else(|| FintrackError::not_found("Category", id))?;

        Ok(CategoryResponse::from(category))
    }

    async fn create_category(
        &self,
        user_id: UserId,
        request: CreateCategoryRequest,
    ) -> FintrackResult<CategoryResponse> {
        debug!("Creating category '{}' for user: {}", request.name, user_id);

        request.validate_request()?;

        if let Some(color) = &request.color {
            validate_color(color)?;
        }

        if self
            .category_repository
            .exists_by_name(user_id, &request.name)
            .await?
        {
            return Err(FintrackError::Conflict(format!(
                "Category '{}' already exists",
                request.name
            )));
        }

        let category = Category::new(user_id, request.name, request.color, request.icon);
        let saved = self.category_repository.save(&category).await?;

        info!("Category created: {}", saved.id);
        Ok(CategoryResponse::from(saved))
    }

    async fn update_category(
        &self,
        user_id: UserId,
        id: CategoryId,
        request: UpdateCategoryRequest,
    ) -> FintrackResult<CategoryResponse> {
        debug!("Updating category: {}", id);

        request.validate_request()?;

        let mut category = self
            .category_repository
            .find_by_id(user_id, id)
            .await?
            .ok_or_else(|| FintrackError::not_found("Category", id))?;

        if let Some(name) = request.name {
            // Renames must not collide with another category; changing only
            // the letter case of the current name is fine.
            if !category.name.eq_ignore_ascii_case(&name)
                && self
                    .category_repository
                    .exists_by_name(user_id, &name)
                    .await?
            {
                return Err(FintrackError::Conflict(format!(
                    "Category '{}' already exists",
                    name
                )));
            }
            category.name = name;
        }

        if let Some(color) = request.color {
            validate_color(&color)?;
            category.color = color;
        }

        if let Some(icon) = request.icon {
            category.icon = icon;
        }

        let updated = self.category_repository.update(&category).await?;

        info!("Category updated: {}", id);
        Ok(CategoryResponse::from(updated))
    }

    async fn delete_category(&self, user_id: UserId, id: CategoryId) -> FintrackResult<()> {
        debug!("Deleting category: {}", id);

        let deleted = self.category_repository.delete(user_id, id).await?;
        if !deleted {
            return Err(FintrackError::not_found("Category", id));
        }

        info!("Category deleted: {}", id);
        Ok(())
    }
}

impl<R: CategoryRepository + 'static> Service for CategoryServiceImpl<R> {}

impl<R: CategoryRepository> std::fmt::Debug for CategoryServiceImpl<R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CategoryServiceImpl").finish_non_exhaustive()
    }
}
