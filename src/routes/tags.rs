use actix_web::{HttpResponse, Responder, delete, get, post, put, web};

use crate::forms::tags::{CreateTagForm, UpdateTagForm};
use crate::repository::DieselRepository;
use crate::routes::ErrorBody;
use crate::services::{ServiceError, tags};

#[get("/tags")]
/// Return all tags.
pub async fn list_tags(repo: web::Data<DieselRepository>) -> impl Responder {
    match tags::list_tags(repo.get_ref()) {
        Ok(items) => HttpResponse::Ok().json(items),
        Err(err) => {
            log::error!("Failed to list tags: {err}");
            HttpResponse::InternalServerError().json(ErrorBody::internal())
        }
    }
}

#[get("/tags/{tag_id}")]
/// Return a single tag.
pub async fn get_tag(path: web::Path<i32>, repo: web::Data<DieselRepository>) -> impl Responder {
    let tag_id = path.into_inner();

    match tags::get_tag(repo.get_ref(), tag_id) {
        Ok(tag) => HttpResponse::Ok().json(tag),
        Err(ServiceError::NotFound) => {
            HttpResponse::NotFound().json(ErrorBody::new("Tag not found"))
        }
        Err(err) => {
            log::error!("Failed to fetch tag {tag_id}: {err}");
            HttpResponse::InternalServerError().json(ErrorBody::internal())
        }
    }
}

#[post("/tags")]
/// Create a tag.
pub async fn create_tag(
    form: web::Json<CreateTagForm>,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    match tags::create_tag(repo.get_ref(), form.into_inner()) {
        Ok(tag) => HttpResponse::Created().json(tag),
        Err(ServiceError::InvalidInput(message)) => {
            HttpResponse::BadRequest().json(ErrorBody::new(message))
        }
        Err(err) => {
            log::error!("Failed to create tag: {err}");
            HttpResponse::InternalServerError().json(ErrorBody::internal())
        }
    }
}

#[put("/tags/{tag_id}")]
/// Rename a tag.
pub async fn update_tag(
    path: web::Path<i32>,
    form: web::Json<UpdateTagForm>,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    let tag_id = path.into_inner();

    match tags::update_tag(repo.get_ref(), tag_id, form.into_inner()) {
        Ok(tag) => HttpResponse::Ok().json(tag),
        Err(ServiceError::NotFound) => {
            HttpResponse::NotFound().json(ErrorBody::new("Tag not found"))
        }
        Err(ServiceError::InvalidInput(message)) => {
            HttpResponse::BadRequest().json(ErrorBody::new(message))
        }
        Err(err) => {
            log::error!("Failed to update tag {tag_id}: {err}");
            HttpResponse::InternalServerError().json(ErrorBody::internal())
        }
    }
}

#[delete("/tags/{tag_id}")]
/// Delete a tag; its join rows are removed by the database cascade.
pub async fn delete_tag(path: web::Path<i32>, repo: web::Data<DieselRepository>) -> impl Responder {
    let tag_id = path.into_inner();

    match tags::delete_tag(repo.get_ref(), tag_id) {
        Ok(()) => HttpResponse::NoContent().finish(),
        Err(ServiceError::NotFound) => {
            HttpResponse::NotFound().json(ErrorBody::new("Tag not found"))
        }
        Err(err) => {
            log::error!("Failed to delete tag {tag_id}: {err}");
            HttpResponse::InternalServerError().json(ErrorBody::internal())
        }
    }
}
