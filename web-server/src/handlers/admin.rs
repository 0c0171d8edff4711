//! Admin handlers - cross-user report views

use axum::{
    extract::{Path, Query, State},
    Json,
};
use uuid::Uuid;

use sleeprisk_core::Severity;

use crate::middleware::auth::{require_admin, UserContext};
use crate::models::{Analysis, AnalysisStats, ReportFilter};
use crate::{AppError, AppResult, AppState};

fn parse_severity(value: Option<&str>) -> AppResult<Option<Severity>> {
    match value.map(str::trim) {
        None | Some("") | Some("all") => Ok(None),
        Some(raw) => Severity::parse(raw)
            .map(Some)
            .ok_or_else(|| AppError::ValidationError(format!("Unknown severity '{}'", raw))),
    }
}

/// All reports, newest first, optionally filtered by severity and email
pub async fn reports(
    State(state): State<AppState>,
    user: UserContext,
    Query(filter): Query<ReportFilter>,
) -> AppResult<Json<Vec<Analysis>>> {
    require_admin(&user)?;

    let severity = parse_severity(filter.severity.as_deref())?;
    let email = filter.email.as_deref().map(str::trim);
    let reports = Analysis::filtered(&state.pool, severity, email).await?;

    Ok(Json(reports))
}

pub async fn report(
    State(state): State<AppState>,
    user: UserContext,
    Path(id): Path<Uuid>,
) -> AppResult<Json<Analysis>> {
    require_admin(&user)?;

    Analysis::find_by_id(&state.pool, id)
        .await?
        .map(Json)
        .ok_or_else(|| AppError::NotFound("Report not found".to_string()))
}

/// High and Critical cases, newest first
pub async fn urgent(
    State(state): State<AppState>,
    user: UserContext,
) -> AppResult<Json<Vec<Analysis>>> {
    require_admin(&user)?;
    Ok(Json(Analysis::urgent(&state.pool).await?))
}

pub async fn stats(
    State(state): State<AppState>,
    user: UserContext,
) -> AppResult<Json<AnalysisStats>> {
    require_admin(&user)?;
    Ok(Json(Analysis::stats(&state.pool).await?))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_severity_filter() {
        assert_eq!(parse_severity(None).unwrap(), None);
        assert_eq!(parse_severity(Some("all")).unwrap(), None);
        assert_eq!(parse_severity(Some("")).unwrap(), None);
        assert_eq!(parse_severity(Some("critical")).unwrap(), Some(Severity::Critical));
        assert_eq!(parse_severity(Some("normal")).unwrap(), Some(Severity::Low));
        assert!(parse_severity(Some("extreme")).is_err());
    }
}
