//! Response bodies for the translation service.
//!
//! # Design Decisions
//! - 200 with the mapping when a stage handled the request
//! - 404 with `declined: true` when every stage declined

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

use crate::http::translate::Resolution;
use crate::vhost::RootSource;

/// JSON body for a handled request.
#[derive(Debug, Clone, Serialize)]
pub struct TranslationBody {
    pub scope: String,
    pub stage: &'static str,
    pub filename: Option<String>,
    pub document_root: Option<String>,
    pub context_prefix: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<RootSource>,
}

/// JSON body for a declined request.
#[derive(Debug, Clone, Serialize)]
pub struct DeclinedBody {
    pub scope: String,
    pub declined: bool,
}

impl IntoResponse for Resolution {
    fn into_response(self) -> Response {
        match self.stage {
            Some(stage) => (
                StatusCode::OK,
                Json(TranslationBody {
                    scope: self.scope,
                    stage,
                    filename: self.request.filename,
                    document_root: self.request.document_root,
                    context_prefix: self.request.context_prefix,
                    source: self.request.root_source,
                }),
            )
                .into_response(),
            None => (
                StatusCode::NOT_FOUND,
                Json(DeclinedBody {
                    scope: self.scope,
                    declined: true,
                }),
            )
                .into_response(),
        }
    }
}
