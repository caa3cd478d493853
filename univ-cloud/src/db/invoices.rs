use sqlx::PgPool;

/// Gateway invoice/payment entity, recorded for audit.
///
/// Keyed by the gateway id (already prefixed `inv_` / `pay_`), so redelivery
/// of the same event merges instead of duplicating. Only `status`/`event`
/// are refreshed on conflict; the raw payload from the first delivery wins.
pub struct UpsertInvoice<'a> {
    pub id: &'a str,
    pub educator_id: &'a str,
    pub amount: Option<i64>,
    pub currency: Option<&'a str>,
    pub status: Option<&'a str>,
    /// Originating webhook event name
    pub event: &'a str,
    /// Raw entity payload as received
    pub payload: &'a serde_json::Value,
    pub now: i64,
}

pub async fn upsert(pool: &PgPool, inv: &UpsertInvoice<'_>) -> Result<(), sqlx::Error> {
    sqlx::query(
        "INSERT INTO billing_invoices (id, educator_id, amount, currency, status, event, payload, created_at)
         VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
         ON CONFLICT (id) DO UPDATE SET
            status = COALESCE($5, billing_invoices.status),
            event = $6",
    )
    .bind(inv.id)
    .bind(inv.educator_id)
    .bind(inv.amount)
    .bind(inv.currency)
    .bind(inv.status)
    .bind(inv.event)
    .bind(inv.payload)
    .bind(inv.now)
    .execute(pool)
    .await?;
    Ok(())
}
