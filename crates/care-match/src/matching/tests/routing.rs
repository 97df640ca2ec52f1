use std::sync::Arc;

use axum::extract::State;
use axum::http::StatusCode;
use serde_json::json;
use tower::ServiceExt;

use super::common::*;
use crate::matching::evaluation::ScoringConfig;
use crate::matching::router::{recommend_handler, recommendation_router, RecommendationRequest};
use crate::matching::service::RecommendationService;

#[tokio::test]
async fn recommend_route_returns_ranked_report() {
    let service = Arc::new(service_with(vec![
        doctor_record("D1", 750.0, 9.4),
        doctor_record("D2", 650.0, 9.4),
    ]));
    let router = recommendation_router(service);

    let request = RecommendationRequest {
        patient: patient_record(),
        top_n: None,
    };
    let response = router
        .oneshot(
            axum::http::Request::post("/api/v1/recommendations")
                .header(axum::http::header::CONTENT_TYPE, "application/json")
                .body(axum::body::Body::from(
                    serde_json::to_vec(&request).unwrap(),
                ))
                .unwrap(),
        )
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::OK);
    let payload = read_json_body(response).await;
    let recommendations = payload["recommendations"]
        .as_array()
        .expect("recommendations array");
    assert_eq!(recommendations.len(), 2);
    assert_eq!(recommendations[0]["doctor_id"], "D2");
    assert_eq!(recommendations[0]["breakdown"]["final_score"], json!(99.4));
    assert_eq!(payload["candidates_supplied"], 2);
    assert!(payload.get("empty_reason").is_none());
}

#[tokio::test]
async fn recommend_route_reports_empty_directory() {
    let router = recommendation_router(Arc::new(service_with(Vec::new())));

    let response = router
        .oneshot(
            axum::http::Request::post("/api/v1/recommendations")
                .header(axum::http::header::CONTENT_TYPE, "application/json")
                .body(axum::body::Body::from(
                    json!({ "patient": patient_record(), "top_n": 2 }).to_string(),
                ))
                .unwrap(),
        )
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::OK);
    let payload = read_json_body(response).await;
    assert_eq!(payload["empty_reason"], "no_candidates_supplied");
}

#[tokio::test]
async fn recommend_handler_rejects_invalid_patient() {
    let service = Arc::new(service_with(vec![doctor_record("D1", 650.0, 9.4)]));
    let mut patient = patient_record();
    patient.consultation_mode = Some("carrier pigeon".to_string());

    let response = recommend_handler(
        State(service),
        axum::Json(RecommendationRequest {
            patient,
            top_n: None,
        }),
    )
    .await;

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let payload = read_json_body(response).await;
    assert!(payload["error"]
        .as_str()
        .expect("error message")
        .contains("carrier pigeon"));
}

#[tokio::test]
async fn recommend_handler_maps_directory_outage_to_service_unavailable() {
    let service = Arc::new(
        RecommendationService::new(Arc::new(UnavailableDirectory), ScoringConfig::default())
            .expect("valid config"),
    );

    let response = recommend_handler(
        State(service),
        axum::Json(RecommendationRequest {
            patient: patient_record(),
            top_n: None,
        }),
    )
    .await;

    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
}
