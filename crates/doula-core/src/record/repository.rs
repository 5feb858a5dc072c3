//! PatientRecordRepository trait definition.
//!
//! Follows the same RPITIT pattern as TurnStore.

use doula_types::error::RepositoryError;
use doula_types::record::{NewPatientRecord, PatientRecord, RecordKind};

/// Repository trait for patient record persistence.
///
/// Implementations live in doula-infra (e.g., `SqlitePatientRecordRepository`).
pub trait PatientRecordRepository: Send + Sync {
    /// Store a record; the repository assigns id and timestamp.
    fn add_record(
        &self,
        record: &NewPatientRecord,
    ) -> impl std::future::Future<Output = Result<PatientRecord, RepositoryError>> + Send;

    /// List a patient's records of one kind, ordered by recorded_at ASC.
    fn list_records(
        &self,
        patient_id: &str,
        kind: RecordKind,
    ) -> impl std::future::Future<Output = Result<Vec<PatientRecord>, RepositoryError>> + Send;
}
