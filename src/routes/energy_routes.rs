use axum::{
    http::HeaderValue,
    routing::{get, post},
    Router,
};
use tower_http::cors::{Any, CorsLayer};

use crate::controllers::energy_controller::{
    best_location, generated_energy, generated_energy_daily, health,
};
use crate::shared_state::AppState;

/// Build the `/api/*` sub-router.
pub fn energy_routes(state: AppState) -> Router {
    Router::new()
        .route("/generated-energy",       post(generated_energy))
        .route("/generated-energy/daily", post(generated_energy_daily))
        .route("/best-location",          post(best_location))
        .route("/health",                 get(health))
        .with_state(state)
}

/// Any origin when `allowed` is empty; unparseable origins are skipped.
pub fn cors_layer(allowed: &[String]) -> CorsLayer {
    let layer = CorsLayer::new().allow_methods(Any).allow_headers(Any);
    if allowed.is_empty() {
        return layer.allow_origin(Any);
    }
    let origins: Vec<HeaderValue> = allowed
        .iter()
        .filter_map(|o| match o.parse::<HeaderValue>() {
            Ok(v) => Some(v),
            Err(_) => {
                tracing::warn!(origin = %o, "ignoring invalid CORS origin");
                None
            }
        })
        .collect();
    layer.allow_origin(origins)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use serde_json::{json, Value};
    use tower::util::ServiceExt;

    use chrono::NaiveDateTime;

    use super::*;
    use crate::error::EnergyError;
    use crate::models::energy::Location;
    use crate::services::power_curve::RatedBandPolicy;
    use crate::services::wind_predictor::{ConstantPredictor, WindSpeedPredictor};

    fn state(predictor: Arc<dyn WindSpeedPredictor>) -> AppState {
        AppState {
            predictor,
            rated_band: RatedBandPolicy::Constant,
            max_days: 366,
            max_candidates: 3,
        }
    }

    fn app(wind_speed: f64) -> Router {
        energy_routes(state(Arc::new(ConstantPredictor(wind_speed))))
    }

    #[derive(Debug)]
    struct BrokenModel;

    impl WindSpeedPredictor for BrokenModel {
        fn predict(&self, _location: &Location, _at: NaiveDateTime) -> Result<f64, EnergyError> {
            Err(EnergyError::Prediction("tree 7 node 12: feature index 40 out of range".into()))
        }
        fn name(&self) -> &'static str {
            "broken"
        }
    }

    fn turbine_json() -> Value {
        json!({ "cut_in": 3, "rated": 12, "cut_out": 25, "rated_power": 2000 })
    }

    fn with(mut base: Value, extra: Value) -> Value {
        let obj = base.as_object_mut().unwrap();
        for (k, v) in extra.as_object().unwrap() {
            obj.insert(k.clone(), v.clone());
        }
        base
    }

    async fn post_json(app: Router, uri: &str, payload: Value) -> (StatusCode, Value) {
        let req = Request::builder()
            .method("POST")
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(payload.to_string()))
            .unwrap();
        let resp = app.oneshot(req).await.unwrap();
        let status = resp.status();
        let body = axum::body::to_bytes(resp.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&body).unwrap())
    }

    #[tokio::test]
    async fn range_report_shape_and_totals() {
        let payload = with(
            turbine_json(),
            json!({
                "latitude": 45.76, "longitude": -64.24,
                "start_date": "2024-01-01", "end_date": "2024-01-03"
            }),
        );
        let (status, json) = post_json(app(15.0), "/generated-energy", payload).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["num_days"], 3);
        assert_eq!(json["total_energy_MWh"], 144.0);
        let days = json["daily_energies"].as_array().unwrap();
        assert_eq!(days.len(), 3);
        assert_eq!(days[0]["date"], "2024-01-01");
        assert_eq!(days[2]["date"], "2024-01-03");
        assert_eq!(days[0]["daily_total_energy_MWh"], 48.0);
        let hours = days[0]["hourly_energies"].as_array().unwrap();
        assert_eq!(hours.len(), 24);
        assert_eq!(hours[0]["hour"], "00:00");
        assert_eq!(hours[23]["hour"], "23:00");
        assert_eq!(hours[5]["predicted_wind_speed_m_s"], 15.0);
        assert_eq!(hours[5]["hourly_energy_MWh"], 2.0);
    }

    #[tokio::test]
    async fn calm_range_is_zero() {
        let payload = with(
            turbine_json(),
            json!({
                "latitude": 45.76, "longitude": -64.24,
                "start_date": "2024-06-01", "end_date": "2024-06-02"
            }),
        );
        let (status, json) = post_json(app(1.0), "/generated-energy", payload).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["total_energy_MWh"], 0.0);
        assert_eq!(json["num_days"], 2);
    }

    #[tokio::test]
    async fn missing_fields_return_400() {
        let payload = with(turbine_json(), json!({ "latitude": 45.76 }));
        let (status, json) = post_json(app(10.0), "/generated-energy", payload).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json["error"], "missing_fields");
        let message = json["message"].as_str().unwrap();
        assert!(message.contains("longitude") && message.contains("end_date"));
    }

    #[tokio::test]
    async fn malformed_date_returns_400() {
        let payload = with(
            turbine_json(),
            json!({
                "latitude": 45.76, "longitude": -64.24,
                "start_date": "2024-13-40", "end_date": "2024-12-31"
            }),
        );
        let (status, json) = post_json(app(10.0), "/generated-energy", payload).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json["error"], "invalid_date_format");
        assert!(json.get("daily_energies").is_none());
    }

    #[tokio::test]
    async fn reversed_range_returns_400() {
        let payload = with(
            turbine_json(),
            json!({
                "latitude": 45.76, "longitude": -64.24,
                "start_date": "2024-01-10", "end_date": "2024-01-01"
            }),
        );
        let (status, json) = post_json(app(10.0), "/generated-energy", payload).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json["error"], "invalid_date_range");
    }

    #[tokio::test]
    async fn invalid_turbine_returns_400() {
        let payload = json!({
            "cut_in": 12, "rated": 3, "cut_out": 25, "rated_power": 2000,
            "latitude": 45.76, "longitude": -64.24,
            "start_date": "2024-01-01", "end_date": "2024-01-01"
        });
        let (status, json) = post_json(app(10.0), "/generated-energy", payload).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json["error"], "invalid_turbine");
    }

    #[tokio::test]
    async fn wrong_json_type_returns_400() {
        let payload = with(turbine_json(), json!({ "latitude": "north" }));
        let (status, json) = post_json(app(10.0), "/generated-energy", payload).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json["error"], "invalid_request");
    }

    #[tokio::test]
    async fn daily_variant() {
        let payload = with(
            turbine_json(),
            json!({ "latitude": 45.76, "longitude": -64.24, "days": 5 }),
        );
        let (status, json) = post_json(app(15.0), "/generated-energy/daily", payload).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["num_days"], 5);
        assert_eq!(json["total_energy_MWh"], 240.0);
        let days = json["daily_energies"].as_array().unwrap();
        assert_eq!(days.len(), 5);
        assert_eq!(days[0]["daily_energy_MWh"], 48.0);
        assert_eq!(days[0]["predicted_wind_speed_m_s"], 15.0);
        assert!(days[0].get("hourly_energies").is_none());
    }

    #[tokio::test]
    async fn daily_variant_requires_days() {
        let payload = with(turbine_json(), json!({ "latitude": 45.76, "longitude": -64.24 }));
        let (status, json) = post_json(app(15.0), "/generated-energy/daily", payload).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json["error"], "missing_fields");
    }

    #[tokio::test]
    async fn best_location_ranks_candidates() {
        let payload = with(
            turbine_json(),
            json!({
                "start_date": "2024-01-01", "end_date": "2024-01-02",
                "candidates": [
                    { "name": "Halifax", "latitude": 44.65, "longitude": -63.57 },
                    { "latitude": 45.76, "longitude": -64.24 }
                ]
            }),
        );
        let (status, json) = post_json(app(15.0), "/best-location", payload).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["num_days"], 2);
        assert_eq!(json["ranking"].as_array().unwrap().len(), 2);
        // equal energy keeps request order
        assert_eq!(json["best"]["name"], "Halifax");
        assert_eq!(json["best"]["total_energy_MWh"], 96.0);
    }

    #[tokio::test]
    async fn too_many_candidates_return_400() {
        let candidates: Vec<Value> = (0..4i32)
            .map(|i| json!({ "latitude": 45.0, "longitude": -64.0 + f64::from(i) }))
            .collect();
        let payload = with(
            turbine_json(),
            json!({
                "start_date": "2024-01-01", "end_date": "2024-12-31",
                "candidates": candidates
            }),
        );
        let (status, json) = post_json(app(15.0), "/best-location", payload).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json["error"], "invalid_date_range");
        assert!(json["message"].as_str().unwrap().contains("at most 3"));
    }

    #[tokio::test]
    async fn prediction_failure_returns_500_without_details() {
        let payload = with(
            turbine_json(),
            json!({
                "latitude": 45.76, "longitude": -64.24,
                "start_date": "2024-01-01", "end_date": "2024-01-02"
            }),
        );
        let broken = energy_routes(state(Arc::new(BrokenModel)));
        let (status, json) = post_json(broken, "/generated-energy", payload).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(json["error"], "prediction_failed");
        assert_eq!(json["message"], "wind speed prediction failed");
        assert!(json.get("daily_energies").is_none());
    }

    #[tokio::test]
    async fn daily_prediction_failure_returns_500() {
        let payload = with(
            turbine_json(),
            json!({ "latitude": 45.76, "longitude": -64.24, "days": 3 }),
        );
        let broken = energy_routes(state(Arc::new(BrokenModel)));
        let (status, json) = post_json(broken, "/generated-energy/daily", payload).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(json["error"], "prediction_failed");
    }

    #[tokio::test]
    async fn health_reports_configuration() {
        let req = Request::builder().uri("/health").body(Body::empty()).unwrap();
        let resp = app(10.0).oneshot(req).await.unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        let body = axum::body::to_bytes(resp.into_body(), usize::MAX).await.unwrap();
        let json: Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["status"], "ok");
        assert_eq!(json["predictor"], "constant");
        assert_eq!(json["rated_band"], "constant");
    }

    async fn allow_origin(layer: CorsLayer, origin: &str) -> Option<String> {
        let req = Request::builder()
            .uri("/health")
            .header("origin", origin)
            .body(Body::empty())
            .unwrap();
        let resp = app(10.0).layer(layer).oneshot(req).await.unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        resp.headers()
            .get("access-control-allow-origin")
            .map(|v| v.to_str().unwrap().to_string())
    }

    #[tokio::test]
    async fn cors_any_origin_when_unconfigured() {
        let allowed = allow_origin(cors_layer(&[]), "http://example.org").await;
        assert_eq!(allowed.as_deref(), Some("*"));
    }

    #[tokio::test]
    async fn cors_restricts_to_listed_origins() {
        let origins = ["http://localhost:5173".to_string(), "bad\norigin".to_string()];

        let allowed = allow_origin(cors_layer(&origins), "http://localhost:5173").await;
        assert_eq!(allowed.as_deref(), Some("http://localhost:5173"));

        let denied = allow_origin(cors_layer(&origins), "http://evil.example").await;
        assert_eq!(denied, None);
    }
}
