use sqlx::PgPool;

#[derive(sqlx::FromRow)]
#[allow(dead_code)]
pub struct Educator {
    pub id: String,
    pub slug: String,
    pub name: String,
    pub email: String,
    pub hashed_password: String,
    pub role: String,
    pub status: String,
    pub created_at: i64,
}

pub async fn create(
    pool: &PgPool,
    id: &str,
    slug: &str,
    name: &str,
    email: &str,
    hashed_password: &str,
    now: i64,
) -> Result<(), sqlx::Error> {
    sqlx::query(
        "INSERT INTO educators (id, slug, name, email, hashed_password, role, status, created_at)
         VALUES ($1, $2, $3, $4, $5, 'EDUCATOR', 'active', $6)",
    )
    .bind(id)
    .bind(slug)
    .bind(name)
    .bind(email)
    .bind(hashed_password)
    .bind(now)
    .execute(pool)
    .await?;
    Ok(())
}

pub async fn find_by_email(pool: &PgPool, email: &str) -> Result<Option<Educator>, sqlx::Error> {
    sqlx::query_as("SELECT * FROM educators WHERE email = $1")
        .bind(email)
        .fetch_optional(pool)
        .await
}

pub async fn find_by_slug(pool: &PgPool, slug: &str) -> Result<Option<Educator>, sqlx::Error> {
    sqlx::query_as("SELECT * FROM educators WHERE slug = $1")
        .bind(slug)
        .fetch_optional(pool)
        .await
}
