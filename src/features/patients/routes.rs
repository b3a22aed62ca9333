use std::sync::Arc;

use axum::{
    routing::{get, put},
    Router,
};

use crate::features::patients::handlers;
use crate::features::patients::services::PatientService;

pub fn routes(service: Arc<PatientService>) -> Router {
    Router::new()
        .route(
            "/api/patients",
            get(handlers::list_patients).post(handlers::create_patient),
        )
        .route(
            "/api/patients/{id}",
            put(handlers::update_patient).delete(handlers::delete_patient),
        )
        .with_state(service)
}
