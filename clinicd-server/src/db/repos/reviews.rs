//! Review repository

use sqlx::{PgPool, Row};
use uuid::Uuid;

use super::DbError;
use crate::models::{Review, ValidReview};

/// Only reviews strictly above this rating appear in the public listing.
const LISTING_RATING_FLOOR: i32 = 3;

pub struct ReviewRepo<'a> {
    pool: &'a PgPool,
}

impl<'a> ReviewRepo<'a> {
    pub fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Insert a validated review; `created_at` is server-assigned.
    pub async fn create(&self, review: ValidReview) -> Result<Review, DbError> {
        let row = sqlx::query(
            r#"
            INSERT INTO reviews (name, email, rating, comment)
            VALUES ($1, $2, $3, $4)
            RETURNING id, created_at
            "#,
        )
        .bind(&review.name)
        .bind(&review.email)
        .bind(review.rating)
        .bind(&review.comment)
        .fetch_one(self.pool)
        .await?;

        Ok(Review {
            id: row.get("id"),
            name: review.name,
            email: review.email,
            rating: review.rating,
            comment: review.comment,
            created_at: row.get("created_at"),
        })
    }

    /// High-rated reviews, newest first.
    pub async fn list_high_rated(&self) -> Result<Vec<Review>, DbError> {
        let rows = sqlx::query(
            r#"
            SELECT id, name, email, rating, comment, created_at
            FROM reviews
            WHERE rating > $1
            ORDER BY created_at DESC
            "#,
        )
        .bind(LISTING_RATING_FLOOR)
        .fetch_all(self.pool)
        .await?;

        Ok(rows
            .into_iter()
            .map(|row| Review {
                id: row.get::<Uuid, _>("id"),
                name: row.get("name"),
                email: row.get("email"),
                rating: row.get("rating"),
                comment: row.get("comment"),
                created_at: row.get("created_at"),
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::NewReview;

    async fn pool() -> PgPool {
        let url = std::env::var("DATABASE_URL").expect("DATABASE_URL required");
        let pool = crate::db::create_pool(&url).await.expect("pool");
        crate::db::migrations::run(&pool).await.expect("migrations");
        pool
    }

    fn valid_review(rating: i32, comment: &str) -> ValidReview {
        NewReview {
            name: "Grace".to_string(),
            email: "grace@example.com".to_string(),
            rating,
            comment: comment.to_string(),
        }
        .validate()
        .expect("valid payload")
    }

    #[tokio::test]
    #[ignore = "requires database"]
    async fn listing_filters_low_ratings_newest_first() {
        let pool = pool().await;
        let repo = ReviewRepo::new(&pool);

        // Insert ratings [5, 2, 4, 3] in that order; only 5 and 4 may
        // appear, and 4 (inserted later) must come first.
        let marker = Uuid::new_v4().to_string();
        let mut ids = Vec::new();
        for rating in [5, 2, 4, 3] {
            let r = repo
                .create(valid_review(rating, &format!("review {}", marker)))
                .await
                .expect("create");
            ids.push(r.id);
        }

        let listed: Vec<Review> = repo
            .list_high_rated()
            .await
            .expect("list")
            .into_iter()
            .filter(|r| r.comment.contains(&marker))
            .collect();

        assert_eq!(listed.len(), 2);
        assert_eq!(listed[0].rating, 4);
        assert_eq!(listed[1].rating, 5);

        for id in ids {
            sqlx::query("DELETE FROM reviews WHERE id = $1")
                .bind(id)
                .execute(&pool)
                .await
                .expect("cleanup");
        }
    }
}
