//! User repository
//!
//! Users are always served together with their prescriptions; list and
//! get use a single LEFT JOIN query and fold the rows.

use chrono::{DateTime, Utc};
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Row};
use uuid::Uuid;

use super::DbError;
use crate::models::{NewPrescription, Prescription, Sex, User, ValidUser};

pub struct UserRepo<'a> {
    pool: &'a PgPool,
}

const SELECT_WITH_PRESCRIPTIONS: &str = r#"
    SELECT
        u.id, u.name, u.email, u.phno, u.age, u.sex, u.address,
        u.medical_concern, u.is_completed, u.created_at,
        p.id AS p_id, p.tablets, p.dosage, p.duration, p.date
    FROM users u
    LEFT JOIN prescriptions p ON p.user_id = u.id
"#;

impl<'a> UserRepo<'a> {
    pub fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Insert a validated user. Prescriptions start empty.
    pub async fn create(&self, user: ValidUser) -> Result<User, DbError> {
        let row = sqlx::query(
            r#"
            INSERT INTO users (name, email, phno, age, sex, address, medical_concern)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING id, created_at
            "#,
        )
        .bind(&user.name)
        .bind(&user.email)
        .bind(&user.phno)
        .bind(&user.age)
        .bind(user.sex.as_str())
        .bind(&user.address)
        .bind(&user.medical_concern)
        .fetch_one(self.pool)
        .await?;

        Ok(User {
            id: row.get("id"),
            name: user.name,
            email: user.email,
            phno: user.phno,
            age: user.age,
            sex: user.sex,
            address: user.address,
            medical_concern: user.medical_concern,
            is_completed: false,
            created_at: row.get("created_at"),
            prescriptions: Vec::new(),
        })
    }

    /// All users with their prescriptions, oldest user first.
    pub async fn list(&self) -> Result<Vec<User>, DbError> {
        let rows = sqlx::query(&format!(
            "{} ORDER BY u.created_at ASC, u.id ASC, p.date ASC",
            SELECT_WITH_PRESCRIPTIONS
        ))
        .fetch_all(self.pool)
        .await?;

        Ok(fold_users(rows)?)
    }

    /// One user with prescriptions.
    pub async fn get(&self, id: Uuid) -> Result<User, DbError> {
        let rows = sqlx::query(&format!(
            "{} WHERE u.id = $1 ORDER BY p.date ASC",
            SELECT_WITH_PRESCRIPTIONS
        ))
        .bind(id)
        .fetch_all(self.pool)
        .await?;

        fold_users(rows)?
            .into_iter()
            .next()
            .ok_or_else(|| DbError::NotFound {
                resource: "user",
                id: id.to_string(),
            })
    }

    /// Append prescriptions in one multi-row INSERT, defaulting missing
    /// dates to the current time, and return the updated user.
    pub async fn append_prescriptions(
        &self,
        id: Uuid,
        items: &[NewPrescription],
    ) -> Result<User, DbError> {
        let exists = sqlx::query("SELECT 1 FROM users WHERE id = $1")
            .bind(id)
            .fetch_optional(self.pool)
            .await?;
        if exists.is_none() {
            return Err(DbError::NotFound {
                resource: "user",
                id: id.to_string(),
            });
        }

        if !items.is_empty() {
            let now = Utc::now();
            let tablets: Vec<&str> = items.iter().map(|p| p.tablets.as_str()).collect();
            let dosages: Vec<&str> = items.iter().map(|p| p.dosage.as_str()).collect();
            let durations: Vec<&str> = items.iter().map(|p| p.duration.as_str()).collect();
            let dates: Vec<DateTime<Utc>> =
                items.iter().map(|p| p.date.unwrap_or(now)).collect();

            sqlx::query(
                r#"
                INSERT INTO prescriptions (user_id, tablets, dosage, duration, date)
                SELECT $1, t.tablets, t.dosage, t.duration, t.date
                FROM UNNEST($2::text[], $3::text[], $4::text[], $5::timestamptz[])
                    AS t(tablets, dosage, duration, date)
                "#,
            )
            .bind(id)
            .bind(&tablets)
            .bind(&dosages)
            .bind(&durations)
            .bind(&dates)
            .execute(self.pool)
            .await?;
        }

        self.get(id).await
    }

    /// Mark treatment as completed.
    pub async fn mark_completed(&self, id: Uuid) -> Result<(), DbError> {
        let result = sqlx::query("UPDATE users SET is_completed = TRUE WHERE id = $1")
            .bind(id)
            .execute(self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::NotFound {
                resource: "user",
                id: id.to_string(),
            });
        }
        Ok(())
    }

    /// Delete a user; prescriptions go with them (ON DELETE CASCADE).
    pub async fn delete(&self, id: Uuid) -> Result<(), DbError> {
        let result = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id)
            .execute(self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::NotFound {
                resource: "user",
                id: id.to_string(),
            });
        }
        Ok(())
    }
}

/// Fold JOIN rows (one per user-prescription pair, prescription columns
/// NULL for users without any) into users. Rows must be ordered so each
/// user's rows are contiguous.
fn fold_users(rows: Vec<PgRow>) -> Result<Vec<User>, sqlx::Error> {
    let mut users: Vec<User> = Vec::new();

    for row in rows {
        let id: Uuid = row.get("id");

        if users.last().map(|u| u.id) != Some(id) {
            let sex: String = row.get("sex");
            users.push(User {
                id,
                name: row.get("name"),
                email: row.get("email"),
                phno: row.get("phno"),
                age: row.get("age"),
                sex: decode_sex(&sex)?,
                address: row.get("address"),
                medical_concern: row.get("medical_concern"),
                is_completed: row.get("is_completed"),
                created_at: row.get("created_at"),
                prescriptions: Vec::new(),
            });
        }

        if let Some(p_id) = row.get::<Option<Uuid>, _>("p_id") {
            let user = users.last_mut().expect("user pushed above");
            user.prescriptions.push(Prescription {
                id: p_id,
                user_id: id,
                tablets: row.get("tablets"),
                dosage: row.get("dosage"),
                duration: row.get("duration"),
                date: row.get("date"),
            });
        }
    }

    Ok(users)
}

fn decode_sex(value: &str) -> Result<Sex, sqlx::Error> {
    value
        .parse::<Sex>()
        .map_err(|e| sqlx::Error::Decode(Box::new(e)))
}
