//! Request extractors whose rejections render as the `{"error": ...}` body
//! with status 400, like every other client error.

use axum::extract::{FromRequest, FromRequestParts};

use crate::error::Error;

#[derive(Debug, FromRequest)]
#[from_request(via(axum::Json), rejection(Error))]
pub struct ApiJson<T>(pub T);

#[derive(Debug, FromRequestParts)]
#[from_request(via(axum::extract::Query), rejection(Error))]
pub struct ApiQuery<T>(pub T);
