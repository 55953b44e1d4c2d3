//! Template syntax endpoint.

use axum::Json;
use serde::{Deserialize, Serialize};

use crate::template;

#[derive(Debug, Deserialize)]
pub struct ValidateTemplateRequest {
    pub text: String,
}

#[derive(Debug, Serialize)]
pub struct ValidateTemplateResponse {
    pub valid: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// Variables referenced by the template, in order of first use
    pub variables: Vec<String>,
}

/// POST /api/v1/templates/validate - Check template syntax
pub async fn validate_template(
    Json(request): Json<ValidateTemplateRequest>,
) -> Json<ValidateTemplateResponse> {
    let response = match template::parse(&request.text) {
        Ok(parsed) => ValidateTemplateResponse {
            valid: true,
            error: None,
            variables: parsed.variables().into_iter().map(str::to_string).collect(),
        },
        Err(e) => ValidateTemplateResponse {
            valid: false,
            error: Some(e.to_string()),
            variables: Vec::new(),
        },
    };

    Json(response)
}
