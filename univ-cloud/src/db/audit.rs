//! Audit log operations

use sqlx::PgPool;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Write an audit log entry
pub async fn log(
    pool: &PgPool,
    educator_id: &str,
    action: &str,
    detail: Option<&serde_json::Value>,
    actor: Option<&str>,
    now: i64,
) -> Result<(), BoxError> {
    sqlx::query(
        "INSERT INTO audit_logs (educator_id, action, detail, actor, created_at) VALUES ($1, $2, $3, $4, $5)"
    )
    .bind(educator_id)
    .bind(action)
    .bind(detail)
    .bind(actor)
    .bind(now)
    .execute(pool)
    .await?;
    Ok(())
}
