//! SQLite patient record repository implementation.

use chrono::Utc;
use doula_core::record::repository::PatientRecordRepository;
use doula_types::error::RepositoryError;
use doula_types::record::{NewPatientRecord, PatientRecord, RecordKind};
use sqlx::Row;
use uuid::Uuid;

use super::pool::DatabasePool;
use super::{format_datetime, parse_datetime};

/// SQLite-backed implementation of `PatientRecordRepository`.
pub struct SqlitePatientRecordRepository {
    pool: DatabasePool,
}

impl SqlitePatientRecordRepository {
    pub fn new(pool: DatabasePool) -> Self {
        Self { pool }
    }
}

struct RecordRow {
    id: String,
    patient_id: String,
    kind: String,
    week: Option<i64>,
    systolic: Option<i64>,
    diastolic: Option<i64>,
    weight_kg: Option<f64>,
    note: Option<String>,
    recorded_at: String,
}

impl RecordRow {
    fn from_row(row: &sqlx::sqlite::SqliteRow) -> Result<Self, sqlx::Error> {
        Ok(Self {
            id: row.try_get("id")?,
            patient_id: row.try_get("patient_id")?,
            kind: row.try_get("kind")?,
            week: row.try_get("week")?,
            systolic: row.try_get("systolic")?,
            diastolic: row.try_get("diastolic")?,
            weight_kg: row.try_get("weight_kg")?,
            note: row.try_get("note")?,
            recorded_at: row.try_get("recorded_at")?,
        })
    }

    fn into_record(self) -> Result<PatientRecord, RepositoryError> {
        let id = self
            .id
            .parse::<Uuid>()
            .map_err(|e| RepositoryError::Query(format!("invalid UUID: {e}")))?;
        let kind: RecordKind = self.kind.parse().map_err(RepositoryError::Query)?;

        Ok(PatientRecord {
            id,
            patient_id: self.patient_id,
            kind,
            week: to_u32(self.week),
            systolic: to_u32(self.systolic),
            diastolic: to_u32(self.diastolic),
            weight_kg: self.weight_kg,
            note: self.note,
            recorded_at: parse_datetime(&self.recorded_at)?,
        })
    }
}

fn to_u32(value: Option<i64>) -> Option<u32> {
    value.and_then(|v| u32::try_from(v).ok())
}

impl PatientRecordRepository for SqlitePatientRecordRepository {
    async fn add_record(&self, record: &NewPatientRecord) -> Result<PatientRecord, RepositoryError> {
        let id = Uuid::now_v7();
        let recorded_at = parse_datetime(&format_datetime(&Utc::now()))?;

        sqlx::query(
            r#"INSERT INTO patient_records (id, patient_id, kind, week, systolic, diastolic, weight_kg, note, recorded_at)
               VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)"#,
        )
        .bind(id.to_string())
        .bind(&record.patient_id)
        .bind(record.kind.to_string())
        .bind(record.week)
        .bind(record.systolic)
        .bind(record.diastolic)
        .bind(record.weight_kg)
        .bind(&record.note)
        .bind(format_datetime(&recorded_at))
        .execute(&self.pool.writer)
        .await
        .map_err(|e| RepositoryError::Query(e.to_string()))?;

        Ok(PatientRecord {
            id,
            patient_id: record.patient_id.clone(),
            kind: record.kind,
            week: record.week,
            systolic: record.systolic,
            diastolic: record.diastolic,
            weight_kg: record.weight_kg,
            note: record.note.clone(),
            recorded_at,
        })
    }

    async fn list_records(
        &self,
        patient_id: &str,
        kind: RecordKind,
    ) -> Result<Vec<PatientRecord>, RepositoryError> {
        let rows = sqlx::query(
            "SELECT * FROM patient_records WHERE patient_id = ? AND kind = ? ORDER BY recorded_at ASC, id ASC",
        )
        .bind(patient_id)
        .bind(kind.to_string())
        .fetch_all(&self.pool.reader)
        .await
        .map_err(|e| RepositoryError::Query(e.to_string()))?;

        rows.iter()
            .map(|r| {
                RecordRow::from_row(r)
                    .map_err(|e| RepositoryError::Query(e.to_string()))?
                    .into_record()
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn test_pool() -> DatabasePool {
        let dir = tempfile::tempdir().unwrap();
        let db_path = dir.path().join("test.db");
        let url = format!("sqlite://{}?mode=rwc", db_path.display());
        let pool = DatabasePool::new(&url).await.unwrap();
        std::mem::forget(dir);
        pool
    }

    fn bp(patient_id: &str, week: u32, systolic: u32, diastolic: u32) -> NewPatientRecord {
        NewPatientRecord {
            patient_id: patient_id.to_string(),
            kind: RecordKind::BloodPressure,
            week: Some(week),
            systolic: Some(systolic),
            diastolic: Some(diastolic),
            weight_kg: None,
            note: None,
        }
    }

    #[tokio::test]
    async fn test_add_and_list_blood_pressure() {
        let repo = SqlitePatientRecordRepository::new(test_pool().await);
        let first = repo.add_record(&bp("p1", 20, 118, 76)).await.unwrap();
        repo.add_record(&bp("p1", 24, 126, 82)).await.unwrap();

        let records = repo
            .list_records("p1", RecordKind::BloodPressure)
            .await
            .unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0], first);
        assert_eq!(records[1].week, Some(24));
        assert_eq!(records[1].diastolic, Some(82));
    }

    #[tokio::test]
    async fn test_list_filters_by_patient_and_kind() {
        let repo = SqlitePatientRecordRepository::new(test_pool().await);
        repo.add_record(&bp("p1", 20, 118, 76)).await.unwrap();
        repo.add_record(&bp("p2", 20, 130, 85)).await.unwrap();
        repo.add_record(&NewPatientRecord {
            patient_id: "p1".to_string(),
            kind: RecordKind::Note,
            week: Some(21),
            systolic: None,
            diastolic: None,
            weight_kg: None,
            note: Some("mild headache".to_string()),
        })
        .await
        .unwrap();

        let bp_records = repo
            .list_records("p1", RecordKind::BloodPressure)
            .await
            .unwrap();
        assert_eq!(bp_records.len(), 1);

        let notes = repo.list_records("p1", RecordKind::Note).await.unwrap();
        assert_eq!(notes[0].note.as_deref(), Some("mild headache"));

        assert!(repo
            .list_records("nobody", RecordKind::BloodPressure)
            .await
            .unwrap()
            .is_empty());
    }
}
