//! Report payload - the data a printable analysis report is laid out from

use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use super::analysis::Analysis;
use sleeprisk_core::registry::Severity;

pub const REPORT_TITLE: &str = "SLEEP ANALYSIS MEDICAL REPORT";
pub const DISCLAIMER: &str = "DISCLAIMER: This report is generated by an automated system. \
     Please consult a healthcare provider for professional medical advice.";

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ReportRow {
    pub metric: &'static str,
    pub value: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct ReportData {
    pub report_id: Uuid,
    pub title: &'static str,
    pub patient_email: String,
    pub date: DateTime<Utc>,
    pub rows: Vec<ReportRow>,
    pub diagnosis: String,
    pub severity: Severity,
    pub color: String,
    pub disclaimer: &'static str,
}

fn row(metric: &'static str, value: impl Into<String>) -> ReportRow {
    ReportRow {
        metric,
        value: value.into(),
    }
}

impl From<&Analysis> for ReportData {
    fn from(analysis: &Analysis) -> Self {
        let disorder = analysis.disorder();
        let rows = vec![
            row("Age", analysis.age.to_string()),
            row("Gender", analysis.gender.clone().unwrap_or_default()),
            row("Occupation", analysis.occupation.clone().unwrap_or_default()),
            row("Sleep Duration", format!("{} hrs", analysis.sleep_duration)),
            row("Stress Level", analysis.stress.to_string()),
            row("Heart Rate", format!("{} bpm", analysis.heart_rate)),
            row("Blood Pressure", analysis.blood_pressure.clone()),
            row("Tea/Coffee", analysis.tea_coffee.clone()),
            row("BMI", analysis.bmi.clone()),
            row("Snoring", analysis.snoring.clone()),
            row("Work Hours", format!("{} hrs", analysis.work_hours)),
        ];

        ReportData {
            report_id: analysis.id,
            title: REPORT_TITLE,
            patient_email: analysis.email.clone(),
            date: analysis.created_at,
            rows,
            diagnosis: disorder.text.to_string(),
            severity: disorder.severity,
            color: disorder.color.to_string(),
            disclaimer: DISCLAIMER,
        }
    }
}
