//! # ab-api Handlers
//!
//! This module coordinates the flow between HTTP requests and the
//! lifecycle service: body decoding, identity hand-off, and mapping of the
//! error taxonomy onto status codes.

use std::fmt;

use actix_web::http::StatusCode;
use actix_web::{web, HttpRequest, HttpResponse, ResponseError};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use ab_core::error::AppError;
use ab_core::models::{AdvertEdit, NewAdvert, UserFilter};
use ab_core::service::AdvertService;

use crate::middleware::caller_uuid;

/// State shared across all Actix-web workers.
pub struct AppState {
    pub adverts: AdvertService,
}

/// Transport-facing wrapper carrying the taxonomy onto HTTP.
#[derive(Debug)]
pub struct ApiError(pub AppError);

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl From<AppError> for ApiError {
    fn from(err: AppError) -> Self {
        Self(err)
    }
}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        match self.0 {
            AppError::Unauthenticated(_) => StatusCode::UNAUTHORIZED,
            AppError::PermissionDenied(_) => StatusCode::FORBIDDEN,
            AppError::Unavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            AppError::FailedPrecondition(_) => StatusCode::CONFLICT,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code())
            .json(serde_json::json!({ "error": self.0.to_string() }))
    }
}

#[derive(Debug, Deserialize)]
pub struct CreateAdvertRequest {
    pub title: Option<String>,
    pub text_content: String,
    #[serde(default)]
    pub user_filter: UserFilter,
    pub expires_at: DateTime<Utc>,
}

#[derive(Debug, Serialize)]
pub struct CreateAdvertResponse {
    pub id: i64,
}

#[derive(Debug, Deserialize)]
pub struct EditAdvertRequest {
    pub title: Option<String>,
    pub text_content: String,
    #[serde(default)]
    pub user_filter: UserFilter,
}

/// POST /adverts
pub async fn create_advert(
    data: web::Data<AppState>,
    req: HttpRequest,
    body: web::Json<CreateAdvertRequest>,
) -> Result<HttpResponse, ApiError> {
    let caller = caller_uuid(&req);
    let body = body.into_inner();

    let id = data
        .adverts
        .create_advert(
            caller.as_deref(),
            NewAdvert {
                title: body.title,
                text_content: body.text_content,
                user_filter: body.user_filter,
                expires_at: body.expires_at,
            },
        )
        .await?;

    Ok(HttpResponse::Created().json(CreateAdvertResponse { id }))
}

/// GET /adverts — the caller's own adverts.
pub async fn list_adverts(
    data: web::Data<AppState>,
    req: HttpRequest,
) -> Result<HttpResponse, ApiError> {
    let caller = caller_uuid(&req);
    let adverts = data.adverts.list_adverts(caller.as_deref()).await?;

    Ok(HttpResponse::Ok().json(adverts))
}

/// POST /adverts/{id}/cancel
pub async fn cancel_advert(
    data: web::Data<AppState>,
    path: web::Path<i64>,
) -> Result<HttpResponse, ApiError> {
    data.adverts.cancel_advert(path.into_inner()).await?;
    Ok(HttpResponse::NoContent().finish())
}

/// POST /adverts/{id}/restore
pub async fn restore_advert(
    data: web::Data<AppState>,
    path: web::Path<i64>,
) -> Result<HttpResponse, ApiError> {
    data.adverts.restore_advert(path.into_inner()).await?;
    Ok(HttpResponse::NoContent().finish())
}

/// PUT /adverts/{id}
pub async fn edit_advert(
    data: web::Data<AppState>,
    req: HttpRequest,
    path: web::Path<i64>,
    body: web::Json<EditAdvertRequest>,
) -> Result<HttpResponse, ApiError> {
    let caller = caller_uuid(&req);
    let body = body.into_inner();

    data.adverts
        .edit_advert(
            caller.as_deref(),
            path.into_inner(),
            AdvertEdit {
                title: body.title,
                text_content: body.text_content,
                user_filter: body.user_filter,
            },
        )
        .await?;

    Ok(HttpResponse::NoContent().finish())
}
