//! One-off classification handler

use axum::{extract::Request, Json};
use serde::Deserialize;

use cardwise_core::{classify, Category};

use super::require_json;
use crate::AppError;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClassifyRequest {
    #[serde(default, alias = "category", alias = "raw_category")]
    pub raw_category: Option<String>,
    #[serde(default)]
    pub merchant: String,
}

/// POST /api/classify - Canonical category for a raw category and merchant
pub async fn classify_category(request: Request) -> Result<Json<Category>, AppError> {
    let req: ClassifyRequest = require_json(request).await?;
    Ok(Json(classify(req.raw_category.as_deref(), &req.merchant)))
}
