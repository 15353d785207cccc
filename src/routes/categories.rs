use actix_web::{HttpResponse, Responder, delete, get, post, put, web};

use crate::forms::categories::{CreateCategoryForm, UpdateCategoryForm};
use crate::repository::DieselRepository;
use crate::routes::ErrorBody;
use crate::services::{ServiceError, categories};

#[get("/categories")]
/// Return all categories.
pub async fn list_categories(repo: web::Data<DieselRepository>) -> impl Responder {
    match categories::list_categories(repo.get_ref()) {
        Ok(items) => HttpResponse::Ok().json(items),
        Err(err) => {
            log::error!("Failed to list categories: {err}");
            HttpResponse::InternalServerError().json(ErrorBody::internal())
        }
    }
}

#[get("/categories/{category_id}")]
/// Return a single category.
pub async fn get_category(
    path: web::Path<i32>,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    let category_id = path.into_inner();

    match categories::get_category(repo.get_ref(), category_id) {
        Ok(category) => HttpResponse::Ok().json(category),
        Err(ServiceError::NotFound) => {
            HttpResponse::NotFound().json(ErrorBody::new("Category not found"))
        }
        Err(err) => {
            log::error!("Failed to fetch category {category_id}: {err}");
            HttpResponse::InternalServerError().json(ErrorBody::internal())
        }
    }
}

#[post("/categories")]
/// Create a category.
pub async fn create_category(
    form: web::Json<CreateCategoryForm>,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    match categories::create_category(repo.get_ref(), form.into_inner()) {
        Ok(category) => HttpResponse::Created().json(category),
        Err(ServiceError::InvalidInput(message)) => {
            HttpResponse::BadRequest().json(ErrorBody::new(message))
        }
        Err(err) => {
            log::error!("Failed to create category: {err}");
            HttpResponse::InternalServerError().json(ErrorBody::internal())
        }
    }
}

#[put("/categories/{category_id}")]
/// Rename a category.
pub async fn update_category(
    path: web::Path<i32>,
    form: web::Json<UpdateCategoryForm>,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    let category_id = path.into_inner();

    match categories::update_category(repo.get_ref(), category_id, form.into_inner()) {
        Ok(category) => HttpResponse::Ok().json(category),
        Err(ServiceError::NotFound) => {
            HttpResponse::NotFound().json(ErrorBody::new("Category not found"))
        }
        Err(ServiceError::InvalidInput(message)) => {
            HttpResponse::BadRequest().json(ErrorBody::new(message))
        }
        Err(err) => {
            log::error!("Failed to update category {category_id}: {err}");
            HttpResponse::InternalServerError().json(ErrorBody::internal())
        }
    }
}

#[delete("/categories/{category_id}")]
/// Delete a category; products referencing it fall back to no category.
pub async fn delete_category(
    path: web::Path<i32>,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    let category_id = path.into_inner();

    match categories::delete_category(repo.get_ref(), category_id) {
        Ok(()) => HttpResponse::NoContent().finish(),
        Err(ServiceError::NotFound) => {
            HttpResponse::NotFound().json(ErrorBody::new("Category not found"))
        }
        Err(err) => {
            log::error!("Failed to delete category {category_id}: {err}");
            HttpResponse::InternalServerError().json(ErrorBody::internal())
        }
    }
}
