use sqlx::PgPool;

/// Roster entry with the student's current seat status joined in
#[derive(sqlx::FromRow, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StudentWithSeat {
    pub id: String,
    pub name: String,
    pub email: Option<String>,
    pub created_at: i64,
    /// `active` / `revoked`, or NULL when no seat was ever assigned
    pub seat_status: Option<String>,
}

pub async fn create(
    pool: &PgPool,
    id: &str,
    educator_id: &str,
    name: &str,
    email: Option<&str>,
    now: i64,
) -> Result<(), sqlx::Error> {
    sqlx::query(
        "INSERT INTO students (id, educator_id, name, email, created_at)
         VALUES ($1, $2, $3, $4, $5)",
    )
    .bind(id)
    .bind(educator_id)
    .bind(name)
    .bind(email)
    .bind(now)
    .execute(pool)
    .await?;
    Ok(())
}

pub async fn list_with_seats(
    pool: &PgPool,
    educator_id: &str,
) -> Result<Vec<StudentWithSeat>, sqlx::Error> {
    sqlx::query_as::<_, StudentWithSeat>(
        "SELECT s.id, s.name, s.email, s.created_at, b.status AS seat_status
            FROM students s
            LEFT JOIN billing_seats b
                ON b.educator_id = s.educator_id AND b.student_id = s.id
            WHERE s.educator_id = $1
            ORDER BY s.created_at",
    )
    .bind(educator_id)
    .fetch_all(pool)
    .await
}
