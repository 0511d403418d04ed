//! Members repository for database operations

use sqlx::{Pool, Sqlite};

use crate::{
    error::AppResult,
    models::member::{Member, NewMember},
};

#[derive(Clone)]
pub struct MembersRepository {
    pool: Pool<Sqlite>,
}

impl MembersRepository {
    pub fn new(pool: Pool<Sqlite>) -> Self {
        Self { pool }
    }

    pub async fn create(&self, member: &NewMember) -> AppResult<Member> {
        let member = sqlx::query_as::<_, Member>(
            r#"
            INSERT INTO members (name, email, phone)
            VALUES (?, ?, ?)
            RETURNING id, name, email, phone
            "#,
        )
        .bind(&member.name)
        .bind(&member.email)
        .bind(&member.phone)
        .fetch_one(&self.pool)
        .await?;
        Ok(member)
    }

    /// Get member by ID
    pub async fn find_by_id(&self, id: i64) -> AppResult<Option<Member>> {
        let member = sqlx::query_as::<_, Member>(
            "SELECT id, name, email, phone FROM members WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(member)
    }

    pub async fn list(&self) -> AppResult<Vec<Member>> {
        let members = sqlx::query_as::<_, Member>(
            "SELECT id, name, email, phone FROM members ORDER BY id",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(members)
    }

    pub async fn count(&self) -> AppResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM members")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }
}
