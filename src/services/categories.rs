use crate::domain::category::Category;
use crate::forms::categories::{CreateCategoryForm, UpdateCategoryForm};
use crate::repository::{CategoryReader, CategoryWriter};
use crate::services::{ServiceError, ServiceResult};

/// Fetches all categories ordered by name.
pub fn list_categories<R>(repo: &R) -> ServiceResult<Vec<Category>>
where
    R: CategoryReader + ?Sized,
{
    repo.list_categories().map_err(ServiceError::from)
}

/// Fetches a single category by id.
pub fn get_category<R>(repo: &R, category_id: i32) -> ServiceResult<Category>
where
    R: CategoryReader + ?Sized,
{
    repo.get_category_by_id(category_id)
        .map_err(ServiceError::from)?
        .ok_or(ServiceError::NotFound)
}

/// Creates a new category.
pub fn create_category<R>(repo: &R, form: CreateCategoryForm) -> ServiceResult<Category>
where
    R: CategoryWriter + ?Sized,
{
    let new_category = form
        .into_new_category()
        .map_err(|err| ServiceError::InvalidInput(err.to_string()))?;

    repo.create_category(&new_category)
        .map_err(ServiceError::from)
}

/// Renames an existing category.
pub fn update_category<R>(
    repo: &R,
    category_id: i32,
    form: UpdateCategoryForm,
) -> ServiceResult<Category>
where
    R: CategoryWriter + ?Sized,
{
    let updates = form
        .into_update_category()
        .map_err(|err| ServiceError::InvalidInput(err.to_string()))?;

    repo.update_category(category_id, &updates)
        .map_err(ServiceError::from)
}

/// Deletes a category; products referencing it fall back to no category.
pub fn delete_category<R>(repo: &R, category_id: i32) -> ServiceResult<()>
where
    R: CategoryWriter + ?Sized,
{
    repo.delete_category(category_id)
        .map_err(ServiceError::from)
}
