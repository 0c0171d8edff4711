//! Analysis model - one persisted classification

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::types::Json;
use sqlx::{FromRow, QueryBuilder, Sqlite, SqlitePool};
use uuid::Uuid;

use sleeprisk_core::features::{BmiInput, IntakeInput, RawInput};
use sleeprisk_core::registry::{lookup_signed, DisorderRecord, Severity};

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Analysis {
    pub id: Uuid,
    #[serde(skip_serializing)]
    pub user_id: Uuid,
    pub email: String,
    pub phone: Option<String>,
    pub gender: Option<String>,
    pub occupation: Option<String>,

    // Inputs as submitted
    pub sleep_duration: f64,
    pub stress: i64,
    pub age: i64,
    pub blood_pressure: String,
    pub heart_rate: i64,
    pub tea_coffee: String,
    pub bmi: String,
    pub snoring: String,
    pub work_hours: f64,

    /// Canonical raw feature vector that was classified
    #[sqlx(json)]
    pub features: Vec<f64>,

    // Result
    pub class_index: i64,
    pub diagnosis: String,
    pub full_diagnosis: String,
    pub severity: String,
    pub color: String,
    pub model_id: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Analysis request body: the raw form fields plus optional context
#[derive(Debug, Clone, Deserialize)]
pub struct AnalysisRequest {
    #[serde(flatten)]
    pub input: RawInput,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub gender: Option<String>,
    #[serde(default)]
    pub occupation: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct AnalysisResponse {
    pub id: Uuid,
    pub class_index: usize,
    pub diagnosis: &'static str,
    pub full_text: &'static str,
    pub severity: Severity,
    pub color: &'static str,
    pub probabilities: Vec<f64>,
    pub timestamp: DateTime<Utc>,
}

/// Everything needed to persist one analysis
#[derive(Debug, Clone)]
pub struct NewAnalysis<'a> {
    pub user_id: Uuid,
    pub email: &'a str,
    pub request: &'a AnalysisRequest,
    pub features: &'a [f64],
    pub class_index: usize,
    pub disorder: &'static DisorderRecord,
    pub model_id: Option<&'a str>,
}

#[derive(Debug, Deserialize, Default)]
pub struct ReportFilter {
    /// low|normal|moderate|high|critical, or "all"
    pub severity: Option<String>,
    /// Case-insensitive substring of the patient email
    pub email: Option<String>,
}

#[derive(Debug, Clone, Serialize, FromRow, PartialEq, Eq)]
pub struct AnalysisStats {
    pub total: i64,
    pub critical: i64,
    pub high_risk: i64,
    pub moderate: i64,
    pub normal: i64,
    pub unique_patients: i64,
}

fn intake_text(value: &IntakeInput) -> String {
    match value {
        IntakeInput::Count(count) => count.to_string(),
        IntakeInput::Answer(answer) => answer.clone(),
    }
}

fn bmi_text(value: &BmiInput) -> String {
    match value {
        BmiInput::Value(bmi) => bmi.to_string(),
        BmiInput::Category(category) => category.clone(),
    }
}

impl Analysis {
    /// Display record for the stored class index
    pub fn disorder(&self) -> &'static DisorderRecord {
        lookup_signed(self.class_index)
    }

    pub async fn record(pool: &SqlitePool, data: NewAnalysis<'_>) -> Result<Self, sqlx::Error> {
        let input = &data.request.input;

        sqlx::query_as::<_, Analysis>(
            r#"
            INSERT INTO analyses (
                id, user_id, email, phone, gender, occupation,
                sleep_duration, stress, age, blood_pressure, heart_rate,
                tea_coffee, bmi, snoring, work_hours, features,
                class_index, diagnosis, full_diagnosis, severity, color, model_id, created_at
            )
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(data.user_id)
        .bind(data.email)
        .bind(&data.request.phone)
        .bind(&data.request.gender)
        .bind(&data.request.occupation)
        .bind(input.sleep_duration)
        .bind(input.stress)
        .bind(input.age)
        .bind(input.blood_pressure.trim())
        .bind(input.heart_rate)
        .bind(intake_text(&input.tea_coffee))
        .bind(bmi_text(&input.bmi))
        .bind(input.snoring.trim())
        .bind(input.work_hours)
        .bind(Json(data.features))
        .bind(data.class_index as i64)
        .bind(data.disorder.name)
        .bind(data.disorder.text)
        .bind(data.disorder.severity.as_str())
        .bind(data.disorder.color)
        .bind(data.model_id)
        .bind(Utc::now())
        .fetch_one(pool)
        .await
    }

    /// A user's analyses, oldest first
    pub async fn history(pool: &SqlitePool, user_id: Uuid) -> Result<Vec<Self>, sqlx::Error> {
        sqlx::query_as::<_, Analysis>("SELECT * FROM analyses WHERE user_id = ? ORDER BY rowid ASC")
            .bind(user_id)
            .fetch_all(pool)
            .await
    }

    pub async fn find_by_id(pool: &SqlitePool, id: Uuid) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, Analysis>("SELECT * FROM analyses WHERE id = ?")
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Only returns the analysis if it belongs to `user_id`
    pub async fn find_for_user(
        pool: &SqlitePool,
        id: Uuid,
        user_id: Uuid,
    ) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, Analysis>("SELECT * FROM analyses WHERE id = ? AND user_id = ?")
            .bind(id)
            .bind(user_id)
            .fetch_optional(pool)
            .await
    }

    /// All analyses matching the filters, newest first
    pub async fn filtered(
        pool: &SqlitePool,
        severity: Option<Severity>,
        email: Option<&str>,
    ) -> Result<Vec<Self>, sqlx::Error> {
        let mut query: QueryBuilder<Sqlite> = QueryBuilder::new("SELECT * FROM analyses WHERE 1 = 1");

        if let Some(severity) = severity {
            query.push(" AND severity = ").push_bind(severity.as_str());
        }
        if let Some(email) = email.filter(|e| !e.is_empty()) {
            query
                .push(" AND instr(lower(email), lower(")
                .push_bind(email.to_string())
                .push(")) > 0");
        }
        query.push(" ORDER BY rowid DESC");

        query.build_query_as::<Analysis>().fetch_all(pool).await
    }

    /// High and Critical analyses, newest first
    pub async fn urgent(pool: &SqlitePool) -> Result<Vec<Self>, sqlx::Error> {
        sqlx::query_as::<_, Analysis>(
            "SELECT * FROM analyses WHERE severity IN (?, ?) ORDER BY rowid DESC",
        )
        .bind(Severity::High.as_str())
        .bind(Severity::Critical.as_str())
        .fetch_all(pool)
        .await
    }

    pub async fn stats(pool: &SqlitePool) -> Result<AnalysisStats, sqlx::Error> {
        sqlx::query_as::<_, AnalysisStats>(
            r#"
            SELECT
                COUNT(*) AS total,
                COALESCE(SUM(CASE WHEN severity = 'critical' THEN 1 ELSE 0 END), 0) AS critical,
                COALESCE(SUM(CASE WHEN severity = 'high' THEN 1 ELSE 0 END), 0) AS high_risk,
                COALESCE(SUM(CASE WHEN severity = 'moderate' THEN 1 ELSE 0 END), 0) AS moderate,
                COALESCE(SUM(CASE WHEN severity = 'low' THEN 1 ELSE 0 END), 0) AS normal,
                COUNT(DISTINCT email) AS unique_patients
            FROM analyses
            "#,
        )
        .fetch_one(pool)
        .await
    }
}
