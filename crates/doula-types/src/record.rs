//! Patient record types for Doula.
//!
//! Typed measurements logged during a pregnancy (blood pressure, weight,
//! free-form notes). Each record belongs to a patient id and carries a
//! server-assigned timestamp.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use std::fmt;
use std::str::FromStr;

use crate::error::RecordError;

/// Kind of measurement a record holds.
///
/// Maps to the CHECK constraint in the SQLite schema:
/// `CHECK (kind IN ('blood_pressure', 'weight', 'note'))`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecordKind {
    BloodPressure,
    Weight,
    Note,
}

impl fmt::Display for RecordKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RecordKind::BloodPressure => write!(f, "blood_pressure"),
            RecordKind::Weight => write!(f, "weight"),
            RecordKind::Note => write!(f, "note"),
        }
    }
}

impl FromStr for RecordKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "blood_pressure" => Ok(RecordKind::BloodPressure),
            "weight" => Ok(RecordKind::Weight),
            "note" => Ok(RecordKind::Note),
            other => Err(format!("invalid record kind: '{other}'")),
        }
    }
}

/// A stored patient record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PatientRecord {
    pub id: Uuid,
    pub patient_id: String,
    pub kind: RecordKind,
    /// Gestational week the measurement was taken in.
    pub week: Option<u32>,
    pub systolic: Option<u32>,
    pub diastolic: Option<u32>,
    pub weight_kg: Option<f64>,
    pub note: Option<String>,
    pub recorded_at: DateTime<Utc>,
}

/// A record submitted by a client, before the server assigns id and timestamp.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewPatientRecord {
    pub patient_id: String,
    pub kind: RecordKind,
    #[serde(default)]
    pub week: Option<u32>,
    #[serde(default)]
    pub systolic: Option<u32>,
    #[serde(default)]
    pub diastolic: Option<u32>,
    #[serde(default)]
    pub weight_kg: Option<f64>,
    #[serde(default)]
    pub note: Option<String>,
}

impl NewPatientRecord {
    /// Check that the fields required by `kind` are present and sane.
    pub fn validate(&self) -> Result<(), RecordError> {
        if self.patient_id.trim().is_empty() {
            return Err(RecordError::Validation("patient_id must not be empty".into()));
        }

        match self.kind {
            RecordKind::BloodPressure => match (self.systolic, self.diastolic) {
                (Some(sys), Some(dia)) if sys > 0 && dia > 0 => {
                    if sys <= dia {
                        return Err(RecordError::Validation(format!(
                            "systolic ({sys}) must be greater than diastolic ({dia})"
                        )));
                    }
                }
                _ => {
                    return Err(RecordError::Validation(
                        "blood_pressure records need positive systolic and diastolic values"
                            .into(),
                    ));
                }
            },
            RecordKind::Weight => match self.weight_kg {
                Some(kg) if kg > 0.0 => {}
                _ => {
                    return Err(RecordError::Validation(
                        "weight records need a positive weight_kg".into(),
                    ));
                }
            },
            RecordKind::Note => {
                if self.note.as_deref().is_none_or(|n| n.trim().is_empty()) {
                    return Err(RecordError::Validation(
                        "note records need non-empty note text".into(),
                    ));
                }
            }
        }

        Ok(())
    }
}

/// One row of a patient's blood-pressure history, as shown to clinicians.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BloodPressureReading {
    pub week: Option<u32>,
    pub systolic: Option<u32>,
    pub diastolic: Option<u32>,
    pub ts: DateTime<Utc>,
}

impl From<&PatientRecord> for BloodPressureReading {
    fn from(record: &PatientRecord) -> Self {
        Self {
            week: record.week,
            systolic: record.systolic,
            diastolic: record.diastolic,
            ts: record.recorded_at,
        }
    }
}
