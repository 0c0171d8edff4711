//! Request extractors

use axum::extract::FromRequest;

use crate::AppError;

/// `axum::Json` whose rejections (missing field, wrong type, bad syntax,
/// wrong content type) become a 400 `AppError` with a JSON body
#[derive(Debug, FromRequest)]
#[from_request(via(axum::Json), rejection(AppError))]
pub struct JsonBody<T>(pub T);
