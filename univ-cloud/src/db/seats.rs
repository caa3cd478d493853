use sqlx::PgPool;

/// Outcome of a seat assignment attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeatAssignment {
    /// Seat written to active
    Assigned,
    /// Seat was already active; nothing written
    AlreadyActive,
    /// Educator has no subscription record
    NoSubscription,
    /// Subscription does not currently grant access
    NotUsable,
    /// Purchased seat count is zero
    LimitZero,
    /// Student is not in this educator's roster
    StudentNotFound,
    /// All purchased seats are in use
    LimitReached,
}

/// Subscription-level gate, checked before any roster or seat reads.
///
/// `sub` is (status, quantity, start_at) as stored; `None` means no
/// subscription record exists. Returns `None` when assignment may proceed.
fn subscription_gate(
    sub: Option<(&str, i32, Option<i64>)>,
    now: i64,
) -> Option<SeatAssignment> {
    let Some((status, quantity, start_at)) = sub else {
        return Some(SeatAssignment::NoSubscription);
    };
    if !shared::billing::is_usable(status, start_at, now) {
        return Some(SeatAssignment::NotUsable);
    }
    if quantity <= 0 {
        return Some(SeatAssignment::LimitZero);
    }
    None
}

fn capacity_reached(used: i64, quantity: i32) -> bool {
    used >= quantity as i64
}

/// Assign one paid seat to a student, capacity-checked.
///
/// Runs in a single transaction holding a `FOR UPDATE` lock on the
/// educator's subscription row, which serializes concurrent assignments per
/// educator: the active-seat count cannot race past `quantity`.
pub async fn assign(
    pool: &PgPool,
    educator_id: &str,
    student_id: &str,
    assigned_by: &str,
    now: i64,
) -> Result<SeatAssignment, sqlx::Error> {
    let mut tx = pool.begin().await?;

    let sub: Option<(String, i32, Option<i64>)> = sqlx::query_as(
        "SELECT status, quantity, start_at FROM subscriptions WHERE educator_id = $1 FOR UPDATE",
    )
    .bind(educator_id)
    .fetch_optional(&mut *tx)
    .await?;

    if let Some(outcome) =
        subscription_gate(sub.as_ref().map(|(s, q, a)| (s.as_str(), *q, *a)), now)
    {
        return Ok(outcome);
    }
    let quantity = sub.map(|(_, q, _)| q).unwrap_or(0);

    let student: Option<(String,)> =
        sqlx::query_as("SELECT id FROM students WHERE id = $1 AND educator_id = $2")
            .bind(student_id)
            .bind(educator_id)
            .fetch_optional(&mut *tx)
            .await?;
    if student.is_none() {
        return Ok(SeatAssignment::StudentNotFound);
    }

    let seat: Option<(String,)> = sqlx::query_as(
        "SELECT status FROM billing_seats WHERE educator_id = $1 AND student_id = $2",
    )
    .bind(educator_id)
    .bind(student_id)
    .fetch_optional(&mut *tx)
    .await?;
    if seat.as_ref().is_some_and(|(s,)| s == "active") {
        // Idempotent re-assignment; nothing written, nothing re-counted
        return Ok(SeatAssignment::AlreadyActive);
    }

    let (used,): (i64,) = sqlx::query_as(
        "SELECT COUNT(*) FROM billing_seats WHERE educator_id = $1 AND status = 'active'",
    )
    .bind(educator_id)
    .fetch_one(&mut *tx)
    .await?;
    if capacity_reached(used, quantity) {
        return Ok(SeatAssignment::LimitReached);
    }

    sqlx::query(
        "INSERT INTO billing_seats (educator_id, student_id, status, assigned_at, assigned_by)
            VALUES ($1, $2, 'active', $3, $4)
            ON CONFLICT (educator_id, student_id)
            DO UPDATE SET status = 'active', assigned_at = $3, assigned_by = $4, revoked_at = NULL",
    )
    .bind(educator_id)
    .bind(student_id)
    .bind(now)
    .bind(assigned_by)
    .execute(&mut *tx)
    .await?;

    tx.commit().await?;
    Ok(SeatAssignment::Assigned)
}

/// Release a seat (frees capacity); returns false if no active seat existed
pub async fn revoke(
    pool: &PgPool,
    educator_id: &str,
    student_id: &str,
    now: i64,
) -> Result<bool, sqlx::Error> {
    let result = sqlx::query(
        "UPDATE billing_seats SET status = 'revoked', revoked_at = $1
            WHERE educator_id = $2 AND student_id = $3 AND status = 'active'",
    )
    .bind(now)
    .bind(educator_id)
    .bind(student_id)
    .execute(pool)
    .await?;
    Ok(result.rows_affected() > 0)
}

/// Count the educator's active seats
pub async fn count_active(pool: &PgPool, educator_id: &str) -> Result<i64, sqlx::Error> {
    let row: (i64,) = sqlx::query_as(
        "SELECT COUNT(*) FROM billing_seats WHERE educator_id = $1 AND status = 'active'",
    )
    .bind(educator_id)
    .fetch_one(pool)
    .await?;
    Ok(row.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gate_rejects_missing_subscription() {
        assert_eq!(
            subscription_gate(None, 0),
            Some(SeatAssignment::NoSubscription)
        );
    }

    #[test]
    fn test_gate_rejects_unusable_statuses() {
        for status in ["halted", "cancelled", "expired", "pending"] {
            assert_eq!(
                subscription_gate(Some((status, 5, None)), 0),
                Some(SeatAssignment::NotUsable),
                "{status}"
            );
        }
        // lapsed trial: created with start_at in the past
        assert_eq!(
            subscription_gate(Some(("created", 5, Some(1_000))), 2_000),
            Some(SeatAssignment::NotUsable)
        );
    }

    #[test]
    fn test_gate_rejects_zero_quantity() {
        assert_eq!(
            subscription_gate(Some(("active", 0, None)), 0),
            Some(SeatAssignment::LimitZero)
        );
        // usability is checked before quantity
        assert_eq!(
            subscription_gate(Some(("cancelled", 0, None)), 0),
            Some(SeatAssignment::NotUsable)
        );
    }

    #[test]
    fn test_gate_passes_usable_subscription() {
        assert_eq!(subscription_gate(Some(("active", 5, None)), 0), None);
        assert_eq!(subscription_gate(Some(("authenticated", 1, None)), 0), None);
        // running trial
        assert_eq!(
            subscription_gate(Some(("created", 5, Some(2_000))), 1_000),
            None
        );
    }

    #[test]
    fn test_capacity_cap() {
        // quantity = 2, two seats in use: third assignment must be rejected
        assert!(capacity_reached(2, 2));
        assert!(capacity_reached(3, 2));
        assert!(!capacity_reached(1, 2));
        assert!(!capacity_reached(0, 1));
    }
}
