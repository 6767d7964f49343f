//! SQLx implementation of the scan repository

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::types::Json;
use sqlx::{PgPool, Postgres, QueryBuilder};
use std::sync::Arc;
use uuid::Uuid;

use bearded_core::domain::ids::{ScanId, SessionId};
use bearded_core::domain::scan::{
    Dates, IScanRepository, Scan, ScanConf, ScanError, ScanFilter, ScanPage, ScanStatus, Session,
};

const SCAN_COLUMNS: &str = "id, status, owner_id, project_id, target_id, plan_id, conf, sessions, created_at, updated_at";

#[derive(Debug, sqlx::FromRow)]
struct ScanRow {
    id: Uuid,
    status: String,
    owner_id: Uuid,
    project_id: Uuid,
    target_id: Uuid,
    plan_id: Uuid,
    conf: Json<ScanConf>,
    sessions: Json<Vec<Session>>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<ScanRow> for Scan {
    type Error = ScanError;

    fn try_from(row: ScanRow) -> Result<Self, Self::Error> {
        let status = ScanStatus::parse(&row.status).ok_or_else(|| {
            tracing::error!(scan_id = %row.id, status = %row.status, "Stored scan has unknown status");
            ScanError::InternalError {
                message: format!("scan {} has unknown status '{}'", row.id, row.status),
            }
        })?;

        Ok(Scan {
            id: row.id.into(),
            status,
            owner: row.owner_id.into(),
            project: row.project_id.into(),
            target: row.target_id.into(),
            plan: row.plan_id.into(),
            conf: row.conf.0,
            sessions: row.sessions.0,
            dates: Dates {
                created: row.created_at,
                updated: row.updated_at,
            },
        })
    }
}

fn database_error(context: &'static str) -> impl FnOnce(sqlx::Error) -> ScanError {
    move |e| {
        tracing::error!("Database error {}: {}", context, e);
        ScanError::DatabaseError {
            message: e.to_string(),
        }
    }
}

fn push_filter(builder: &mut QueryBuilder<'_, Postgres>, filter: &ScanFilter) {
    builder.push(" WHERE TRUE");
    if let Some(project) = filter.project {
        builder.push(" AND project_id = ").push_bind(project.as_uuid());
    }
    if let Some(target) = filter.target {
        builder.push(" AND target_id = ").push_bind(target.as_uuid());
    }
    if let Some(plan) = filter.plan {
        builder.push(" AND plan_id = ").push_bind(plan.as_uuid());
    }
    if let Some(status) = filter.status {
        builder.push(" AND status = ").push_bind(status.as_str());
    }
}

/// SQLx implementation of the scan repository
///
/// Sessions are stored as a JSONB document on the scan row, so creating and
/// deleting a scan touches exactly one row.
pub struct SqlxScanRepository {
    pool: Arc<PgPool>,
}

impl SqlxScanRepository {
    pub fn new(pool: Arc<PgPool>) -> Self {
        Self { pool }
    }

    async fn lock_scan(
        tx: &mut sqlx::Transaction<'_, Postgres>,
        id: &ScanId,
    ) -> Result<Scan, ScanError> {
        let row = sqlx::query_as::<_, ScanRow>(&format!(
            "SELECT {} FROM scans WHERE id = $1 FOR UPDATE",
            SCAN_COLUMNS
        ))
        .bind(id.as_uuid())
        .fetch_optional(&mut **tx)
        .await
        .map_err(database_error("locking scan"))?;

        row.ok_or_else(|| ScanError::NotFound { id: id.to_string() })?
            .try_into()
    }
}

#[async_trait]
impl IScanRepository for SqlxScanRepository {
    async fn create(&self, scan: &Scan) -> Result<(), ScanError> {
        sqlx::query(
            r#"
            INSERT INTO scans (id, status, owner_id, project_id, target_id, plan_id, conf, sessions, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            "#,
        )
        .bind(scan.id.as_uuid())
        .bind(scan.status.as_str())
        .bind(scan.owner.as_uuid())
        .bind(scan.project.as_uuid())
        .bind(scan.target.as_uuid())
        .bind(scan.plan.as_uuid())
        .bind(Json(&scan.conf))
        .bind(Json(&scan.sessions))
        .bind(scan.dates.created)
        .bind(scan.dates.updated)
        .execute(&*self.pool)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(db) = &e {
                if db.is_unique_violation() {
                    return ScanError::Duplicate {
                        id: scan.id.to_string(),
                    };
                }
            }
            database_error("creating scan")(e)
        })?;

        Ok(())
    }

    async fn find_by_id(&self, id: &ScanId) -> Result<Option<Scan>, ScanError> {
        let row = sqlx::query_as::<_, ScanRow>(&format!(
            "SELECT {} FROM scans WHERE id = $1",
            SCAN_COLUMNS
        ))
        .bind(id.as_uuid())
        .fetch_optional(&*self.pool)
        .await
        .map_err(database_error("finding scan"))?;

        row.map(Scan::try_from).transpose()
    }

    async fn filter_by(&self, filter: &ScanFilter) -> Result<ScanPage, ScanError> {
        let mut count_query = QueryBuilder::<Postgres>::new("SELECT COUNT(*) FROM scans");
        push_filter(&mut count_query, filter);
        let count: i64 = count_query
            .build_query_scalar::<i64>()
            .fetch_one(&*self.pool)
            .await
            .map_err(database_error("counting scans"))?;

        let mut page_query = QueryBuilder::<Postgres>::new(format!("SELECT {} FROM scans", SCAN_COLUMNS));
        push_filter(&mut page_query, filter);
        page_query
            .push(" ORDER BY created_at DESC, id ASC OFFSET ")
            .push_bind(i64::try_from(filter.skip).unwrap_or(i64::MAX))
            .push(" LIMIT ")
            .push_bind(filter.effective_limit() as i64);

        let rows = page_query
            .build_query_as::<ScanRow>()
            .fetch_all(&*self.pool)
            .await
            .map_err(database_error("listing scans"))?;

        let results = rows
            .into_iter()
            .map(Scan::try_from)
            .collect::<Result<Vec<_>, _>>()?;

        Ok(ScanPage {
            results,
            count: count.max(0) as u64,
        })
    }

    async fn delete(&self, id: &ScanId) -> Result<bool, ScanError> {
        let result = sqlx::query("DELETE FROM scans WHERE id = $1")
            .bind(id.as_uuid())
            .execute(&*self.pool)
            .await
            .map_err(database_error("deleting scan"))?;

        Ok(result.rows_affected() > 0)
    }

    async fn transition_scan(
        &self,
        id: &ScanId,
        to: ScanStatus,
        at: DateTime<Utc>,
    ) -> Result<Scan, ScanError> {
        // Rolled back on drop if any step below returns early
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(database_error("starting transaction"))?;

        let mut scan = Self::lock_scan(&mut tx, id).await?;
        scan.transition(to, at)?;

        sqlx::query("UPDATE scans SET status = $2, updated_at = $3 WHERE id = $1")
            .bind(id.as_uuid())
            .bind(scan.status.as_str())
            .bind(scan.dates.updated)
            .execute(&mut *tx)
            .await
            .map_err(database_error("updating scan status"))?;

        tx.commit()
            .await
            .map_err(database_error("committing scan transition"))?;

        Ok(scan)
    }

    async fn transition_session(
        &self,
        id: &ScanId,
        session_id: &SessionId,
        to: ScanStatus,
        at: DateTime<Utc>,
    ) -> Result<Scan, ScanError> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(database_error("starting transaction"))?;

        let mut scan = Self::lock_scan(&mut tx, id).await?;
        scan.session_mut(session_id)
            .ok_or_else(|| ScanError::SessionNotFound {
                scan_id: id.to_string(),
                session_id: session_id.to_string(),
            })?
            .transition(to, at)?;

        sqlx::query("UPDATE scans SET sessions = $2 WHERE id = $1")
            .bind(id.as_uuid())
            .bind(Json(&scan.sessions))
            .execute(&mut *tx)
            .await
            .map_err(database_error("updating session status"))?;

        tx.commit()
            .await
            .map_err(database_error("committing session transition"))?;

        Ok(scan)
    }
}
