use actix_web::{HttpResponse, Responder, delete, get, post, put, web};

use crate::forms::products::{CreateProductForm, UpdateProductForm};
use crate::repository::DieselRepository;
use crate::routes::ErrorBody;
use crate::services::{ServiceError, products};

#[get("/products")]
/// Return all products with their category and tags eager-loaded.
pub async fn list_products(repo: web::Data<DieselRepository>) -> impl Responder {
    match products::list_products(repo.get_ref()) {
        Ok(items) => HttpResponse::Ok().json(items),
        Err(err) => {
            log::error!("Failed to list products: {err}");
            HttpResponse::InternalServerError().json(ErrorBody::internal())
        }
    }
}

#[get("/products/{product_id}")]
/// Return a single product with its category and tags eager-loaded.
pub async fn get_product(
    path: web::Path<i32>,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    let product_id = path.into_inner();

    match products::get_product(repo.get_ref(), product_id) {
        Ok(product) => HttpResponse::Ok().json(product),
        Err(ServiceError::NotFound) => {
            HttpResponse::NotFound().json(ErrorBody::new("Product not found"))
        }
        Err(err) => {
            log::error!("Failed to fetch product {product_id}: {err}");
            HttpResponse::InternalServerError().json(ErrorBody::internal())
        }
    }
}

#[post("/products")]
/// Create a product and attach the supplied tag ids.
pub async fn create_product(
    form: web::Json<CreateProductForm>,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    match products::create_product(repo.get_ref(), form.into_inner()) {
        Ok(product) => HttpResponse::Created().json(product),
        Err(ServiceError::InvalidInput(message)) => {
            HttpResponse::BadRequest().json(ErrorBody::new(message))
        }
        Err(ServiceError::NotFound) => {
            HttpResponse::NotFound().json(ErrorBody::new("Product not found"))
        }
        Err(err) => {
            log::error!("Failed to create product: {err}");
            HttpResponse::InternalServerError().json(ErrorBody::internal())
        }
    }
}

#[put("/products/{product_id}")]
/// Patch a product's attributes and, when `tagIds` is present, replace its
/// tag set so it equals exactly the supplied ids.
pub async fn update_product(
    path: web::Path<i32>,
    form: web::Json<UpdateProductForm>,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    let product_id = path.into_inner();

    match products::update_product(repo.get_ref(), product_id, form.into_inner()) {
        Ok(product) => HttpResponse::Ok().json(product),
        Err(ServiceError::NotFound) => {
            HttpResponse::NotFound().json(ErrorBody::new("Product not found"))
        }
        Err(ServiceError::InvalidInput(message)) => {
            HttpResponse::BadRequest().json(ErrorBody::new(message))
        }
        Err(err) => {
            log::error!("Failed to update product {product_id}: {err}");
            HttpResponse::InternalServerError().json(ErrorBody::internal())
        }
    }
}

#[delete("/products/{product_id}")]
/// Delete a product; its join rows are removed by the database cascade.
pub async fn delete_product(
    path: web::Path<i32>,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    let product_id = path.into_inner();

    match products::delete_product(repo.get_ref(), product_id) {
        Ok(()) => HttpResponse::NoContent().finish(),
        Err(ServiceError::NotFound) => {
            HttpResponse::NotFound().json(ErrorBody::new("Product not found"))
        }
        Err(err) => {
            log::error!("Failed to delete product {product_id}: {err}");
            HttpResponse::InternalServerError().json(ErrorBody::internal())
        }
    }
}
