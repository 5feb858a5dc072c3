//! Record service: validated writes and clinician-facing reads.

use doula_types::error::RecordError;
use doula_types::record::{BloodPressureReading, NewPatientRecord, PatientRecord, RecordKind};
use tracing::info;

use crate::record::repository::PatientRecordRepository;

/// Validates patient records before storage and shapes read results.
pub struct RecordService<R: PatientRecordRepository> {
    repo: R,
}

impl<R: PatientRecordRepository> RecordService<R> {
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Validate and store a record.
    pub async fn add_record(&self, record: &NewPatientRecord) -> Result<PatientRecord, RecordError> {
        record.validate()?;
        let stored = self.repo.add_record(record).await?;
        info!(
            patient_id = %stored.patient_id,
            kind = %stored.kind,
            record_id = %stored.id,
            "Patient record added"
        );
        Ok(stored)
    }

    /// A patient's blood-pressure readings, oldest first.
    pub async fn blood_pressure_history(
        &self,
        patient_id: &str,
    ) -> Result<Vec<BloodPressureReading>, RecordError> {
        if patient_id.trim().is_empty() {
            return Err(RecordError::Validation("patient_id must not be empty".into()));
        }
        let records = self
            .repo
            .list_records(patient_id, RecordKind::BloodPressure)
            .await?;
        Ok(records.iter().map(BloodPressureReading::from).collect())
    }
}
