//! Prescription repository
//!
//! Deletes are scoped by the owning user: a prescription id alone is
//! never enough, the row must belong to the user named in the path.

use sqlx::{PgPool, Row};
use uuid::Uuid;

use super::DbError;
use crate::models::Prescription;

pub struct PrescriptionRepo<'a> {
    pool: &'a PgPool,
}

impl<'a> PrescriptionRepo<'a> {
    pub fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Delete one prescription owned by `user_id`, returning the
    /// deleted row. Missing or foreign rows are NotFound.
    pub async fn delete_scoped(
        &self,
        user_id: Uuid,
        prescription_id: Uuid,
    ) -> Result<Prescription, DbError> {
        self.delete_from("prescriptions", "prescription", user_id, prescription_id)
            .await
    }

    /// Same, against the parallel `new_prescriptions` table.
    pub async fn delete_new_scoped(
        &self,
        user_id: Uuid,
        prescription_id: Uuid,
    ) -> Result<Prescription, DbError> {
        self.delete_from(
            "new_prescriptions",
            "new prescription",
            user_id,
            prescription_id,
        )
        .await
    }

    async fn delete_from(
        &self,
        table: &str,
        resource: &'static str,
        user_id: Uuid,
        prescription_id: Uuid,
    ) -> Result<Prescription, DbError> {
        // Both tables share the prescription column set.
        let query = format!(
            r#"
            DELETE FROM {}
            WHERE id = $1 AND user_id = $2
            RETURNING id, user_id, tablets, dosage, duration, date
            "#,
            table
        );

        let row = sqlx::query(&query)
            .bind(prescription_id)
            .bind(user_id)
            .fetch_optional(self.pool)
            .await?
            .ok_or_else(|| DbError::NotFound {
                resource,
                id: prescription_id.to_string(),
            })?;

        Ok(Prescription {
            id: row.get("id"),
            user_id: row.get("user_id"),
            tablets: row.get("tablets"),
            dosage: row.get("dosage"),
            duration: row.get("duration"),
            date: row.get("date"),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::repos::UserRepo;
    use crate::models::{NewPrescription, Sex, ValidUser};

    async fn pool() -> PgPool {
        let url = std::env::var("DATABASE_URL").expect("DATABASE_URL required");
        let pool = crate::db::create_pool(&url).await.expect("pool");
        crate::db::migrations::run(&pool).await.expect("migrations");
        pool
    }

    fn valid_user() -> ValidUser {
        ValidUser {
            name: "Ada Lovelace".to_string(),
            age: "36".to_string(),
            email: "ada@example.com".to_string(),
            phno: "0123456789".to_string(),
            address: "12 Analytical Lane".to_string(),
            sex: Sex::Female,
            medical_concern: Vec::new(),
        }
    }

    #[tokio::test]
    #[ignore = "requires database"]
    async fn scoped_delete_removes_own_row() {
        let pool = pool().await;
        let users = UserRepo::new(&pool);
        let user = users.create(valid_user()).await.expect("create");
        let user = users
            .append_prescriptions(
                user.id,
                &[NewPrescription {
                    tablets: "A".to_string(),
                    dosage: "1".to_string(),
                    duration: "5d".to_string(),
                    date: None,
                }],
            )
            .await
            .expect("append");

        let p_id = user.prescriptions[0].id;
        let deleted = PrescriptionRepo::new(&pool)
            .delete_scoped(user.id, p_id)
            .await
            .expect("delete");
        assert_eq!(deleted.id, p_id);

        let after = users.get(user.id).await.expect("get");
        assert!(after.prescriptions.is_empty());

        users.delete(user.id).await.expect("cleanup");
    }

    #[tokio::test]
    #[ignore = "requires database"]
    async fn mismatched_owner_is_not_found_and_row_survives() {
        let pool = pool().await;
        let users = UserRepo::new(&pool);
        let user = users.create(valid_user()).await.expect("create");
        let user = users
            .append_prescriptions(
                user.id,
                &[NewPrescription {
                    tablets: "A".to_string(),
                    dosage: "1".to_string(),
                    duration: "5d".to_string(),
                    date: None,
                }],
            )
            .await
            .expect("append");

        let p_id = user.prescriptions[0].id;
        let err = PrescriptionRepo::new(&pool)
            .delete_scoped(Uuid::new_v4(), p_id)
            .await
            .unwrap_err();
        assert!(matches!(err, DbError::NotFound { .. }));

        // Row must survive a mismatched delete
        let after = users.get(user.id).await.expect("get");
        assert_eq!(after.prescriptions.len(), 1);

        users.delete(user.id).await.expect("cleanup");
    }
}
