use actix_web::HttpResponse;
use serde::Serialize;

pub mod categories;
pub mod products;
pub mod tags;

/// JSON error body returned for every failed request.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    error: String,
}

impl ErrorBody {
    /// Build an error body with a client-safe message.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            error: message.into(),
        }
    }

    /// Generic body used when internal detail must not leak to the caller.
    pub fn internal() -> Self {
        Self::new("Internal Server Error")
    }
}

/// Fallback for any path the API does not serve.
pub async fn wrong_route() -> HttpResponse {
    HttpResponse::Ok()
        .content_type("text/html; charset=utf-8")
        .body("<h1>Wrong Route!</h1>")
}
