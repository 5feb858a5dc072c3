//! Patient record HTTP handlers.
//!
//! Endpoints:
//! - POST /patient/record                  - Store a patient measurement or note
//! - GET  /doctor/patient/{patient_id}/bp  - Blood-pressure history for clinicians

use axum::Json;
use axum::extract::{Path, State};
use serde::Serialize;
use uuid::Uuid;

use doula_types::record::{BloodPressureReading, NewPatientRecord};

use crate::http::error::AppError;
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct RecordAdded {
    pub status: &'static str,
    pub id: Uuid,
}

#[derive(Debug, Serialize)]
pub struct BloodPressureHistory {
    pub patient_id: String,
    pub records: Vec<BloodPressureReading>,
}

/// POST /patient/record
pub async fn add_record(
    State(state): State<AppState>,
    Json(record): Json<NewPatientRecord>,
) -> Result<Json<RecordAdded>, AppError> {
    let stored = state.record_service.add_record(&record).await?;
    Ok(Json(RecordAdded {
        status: "record added",
        id: stored.id,
    }))
}

/// GET /doctor/patient/{patient_id}/bp
pub async fn blood_pressure(
    State(state): State<AppState>,
    Path(patient_id): Path<String>,
) -> Result<Json<BloodPressureHistory>, AppError> {
    let records = state
        .record_service
        .blood_pressure_history(&patient_id)
        .await?;
    Ok(Json(BloodPressureHistory {
        patient_id,
        records,
    }))
}
