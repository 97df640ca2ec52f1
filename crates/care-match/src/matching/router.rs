use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::post,
    Router,
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::warn;

use super::directory::DoctorDirectory;
use super::domain::PatientRecord;
use super::report::RecommendationReport;
use super::service::{RecommendationError, RecommendationService};

/// Body accepted by the recommendation endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecommendationRequest {
    pub patient: PatientRecord,
    #[serde(default)]
    pub top_n: Option<usize>,
}

/// Router builder exposing the recommendation endpoint.
pub fn recommendation_router<D>(service: Arc<RecommendationService<D>>) -> Router
where
    D: DoctorDirectory + 'static,
{
    Router::new()
        .route("/api/v1/recommendations", post(recommend_handler::<D>))
        .with_state(service)
}

pub(crate) async fn recommend_handler<D>(
    State(service): State<Arc<RecommendationService<D>>>,
    axum::Json(request): axum::Json<RecommendationRequest>,
) -> Response
where
    D: DoctorDirectory + 'static,
{
    match service.recommend(request.patient, request.top_n) {
        Ok(outcome) => {
            let report = RecommendationReport::from_outcome(&outcome);
            (StatusCode::OK, axum::Json(report)).into_response()
        }
        Err(error @ (RecommendationError::InvalidPatient(_) | RecommendationError::Ranking(_))) => {
            let payload = json!({
                "error": error.to_string(),
            });
            (StatusCode::UNPROCESSABLE_ENTITY, axum::Json(payload)).into_response()
        }
        Err(RecommendationError::Directory(error)) => {
            warn!(%error, "doctor directory unavailable");
            let payload = json!({
                "error": error.to_string(),
            });
            (StatusCode::SERVICE_UNAVAILABLE, axum::Json(payload)).into_response()
        }
    }
}
