use crate::domain::tag::Tag;
use crate::forms::tags::{CreateTagForm, UpdateTagForm};
use crate::repository::{TagReader, TagWriter};
use crate::services::{ServiceError, ServiceResult};

/// Fetches all tags ordered by name.
pub fn list_tags<R>(repo: &R) -> ServiceResult<Vec<Tag>>
where
    R: TagReader + ?Sized,
{
    repo.list_tags().map_err(ServiceError::from)
}

/// Fetches a single tag by id.
pub fn get_tag<R>(repo: &R, tag_id: i32) -> ServiceResult<Tag>
where
    R: TagReader + ?Sized,
{
    repo.get_tag_by_id(tag_id)
        .map_err(ServiceError::from)?
        .ok_or(ServiceError::NotFound)
}

/// Creates a new tag.
pub fn create_tag<R>(repo: &R, form: CreateTagForm) -> ServiceResult<Tag>
where
    R: TagWriter + ?Sized,
{
    let new_tag = form
        .into_new_tag()
        .map_err(|err| ServiceError::InvalidInput(err.to_string()))?;

    repo.create_tag(&new_tag).map_err(ServiceError::from)
}

/// Renames an existing tag.
pub fn update_tag<R>(repo: &R, tag_id: i32, form: UpdateTagForm) -> ServiceResult<Tag>
where
    R: TagWriter + ?Sized,
{
    let updates = form
        .into_update_tag()
        .map_err(|err| ServiceError::InvalidInput(err.to_string()))?;

    repo.update_tag(tag_id, &updates).map_err(ServiceError::from)
}

/// Deletes a tag; its join rows are removed by the database cascade.
pub fn delete_tag<R>(repo: &R, tag_id: i32) -> ServiceResult<()>
where
    R: TagWriter + ?Sized,
{
    repo.delete_tag(tag_id).map_err(ServiceError::from)
}
