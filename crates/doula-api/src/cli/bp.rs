//! Blood-pressure history for a patient.

use anyhow::Result;
use comfy_table::{Cell, CellAlignment, Color, ContentArrangement, Table, presets};
use console::style;

use doula_core::record::service::RecordService;
use doula_infra::sqlite::pool::DatabasePool;
use doula_infra::sqlite::record::SqlitePatientRecordRepository;

/// Print a patient's blood-pressure readings, oldest first.
///
/// # Examples
///
/// ```bash
/// doula bp patient-7
/// doula bp patient-7 --json
/// ```
pub async fn show(pool: &DatabasePool, patient_id: &str, json: bool) -> Result<()> {
    let service = RecordService::new(SqlitePatientRecordRepository::new(pool.clone()));
    let records = service.blood_pressure_history(patient_id).await?;

    if json {
        let body = serde_json::json!({
            "patient_id": patient_id,
            "records": records,
        });
        println!("{}", serde_json::to_string_pretty(&body)?);
        return Ok(());
    }

    if records.is_empty() {
        println!();
        println!("  {} No records found", style("i").blue().bold());
        println!();
        return Ok(());
    }

    let mut table = Table::new();
    table.load_preset(presets::UTF8_FULL_CONDENSED);
    table.set_content_arrangement(ContentArrangement::Dynamic);

    table.set_header(vec![
        Cell::new("Week").fg(Color::White),
        Cell::new("Systolic").fg(Color::White),
        Cell::new("Diastolic").fg(Color::White),
        Cell::new("Recorded").fg(Color::White),
    ]);

    let fmt = |v: Option<u32>| v.map_or_else(|| "-".to_string(), |v| v.to_string());
    for reading in &records {
        table.add_row(vec![
            Cell::new(fmt(reading.week)).set_alignment(CellAlignment::Right),
            Cell::new(fmt(reading.systolic)).set_alignment(CellAlignment::Right),
            Cell::new(fmt(reading.diastolic)).set_alignment(CellAlignment::Right),
            Cell::new(reading.ts.format("%Y-%m-%d %H:%M").to_string()),
        ]);
    }

    println!();
    println!(
        "  Blood pressure for {}",
        style(patient_id).cyan().bold()
    );
    println!("{table}");
    println!();
    Ok(())
}
