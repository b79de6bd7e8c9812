use crate::error::{Error, Result};
use crate::models::flashcard::{Flashcard, FlashcardDraft, FlashcardTopic};
use sqlx::PgPool;
use uuid::Uuid;

const FLASHCARD_COLUMNS: &str = "id, user_id, topic, question, answer, created_at, \
     last_reviewed, review_count, difficulty_level";

#[derive(Clone)]
pub struct FlashcardService {
    pool: PgPool,
}

impl FlashcardService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Stores a generated batch under one topic, in a single transaction.
    pub async fn save_flashcards(
        &self,
        user_id: &str,
        topic: &str,
        cards: &[FlashcardDraft],
    ) -> Result<Vec<Flashcard>> {
        let mut tx = self.pool.begin().await?;
        let mut saved = Vec::with_capacity(cards.len());

        for card in cards {
            let row = sqlx::query_as::<_, Flashcard>(&format!(
                r#"
                INSERT INTO flashcards (user_id, topic, question, answer, review_count, difficulty_level)
                VALUES ($1, $2, $3, $4, 0, 1)
                RETURNING {}
                "#,
                FLASHCARD_COLUMNS
            ))
            .bind(user_id)
            .bind(topic)
            .bind(&card.front)
            .bind(&card.back)
            .fetch_one(&mut *tx)
            .await?;
            saved.push(row);
        }

        tx.commit().await?;
        tracing::info!(user_id, topic, count = saved.len(), "Flashcards saved");
        Ok(saved)
    }

    pub async fn list(&self, user_id: &str, topic: Option<&str>) -> Result<Vec<Flashcard>> {
        let cards = sqlx::query_as::<_, Flashcard>(&format!(
            r#"
            SELECT {}
            FROM flashcards
            WHERE user_id = $1 AND ($2::TEXT IS NULL OR topic = $2)
            ORDER BY created_at DESC
            "#,
            FLASHCARD_COLUMNS
        ))
        .bind(user_id)
        .bind(topic)
        .fetch_all(&self.pool)
        .await?;

        Ok(cards)
    }

    pub async fn topics(&self, user_id: &str) -> Result<Vec<FlashcardTopic>> {
        let topics = sqlx::query_as::<_, FlashcardTopic>(
            r#"
            SELECT topic, COUNT(*) AS card_count
            FROM flashcards
            WHERE user_id = $1
            GROUP BY topic
            ORDER BY MAX(created_at) DESC
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(topics)
    }

    pub async fn review(&self, user_id: &str, id: Uuid, difficulty_level: i32) -> Result<Flashcard> {
        let card = sqlx::query_as::<_, Flashcard>(&format!(
            r#"
            UPDATE flashcards
            SET review_count = review_count + 1,
                last_reviewed = NOW(),
                difficulty_level = $3
            WHERE id = $1 AND user_id = $2
            RETURNING {}
            "#,
            FLASHCARD_COLUMNS
        ))
        .bind(id)
        .bind(user_id)
        .bind(difficulty_level)
        .fetch_optional(&self.pool)
        .await?;

        card.ok_or_else(|| Error::NotFound("Flashcard not found".into()))
    }

    pub async fn delete(&self, user_id: &str, id: Uuid) -> Result<()> {
        let result = sqlx::query("DELETE FROM flashcards WHERE id = $1 AND user_id = $2")
            .bind(id)
            .bind(user_id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(Error::NotFound("Flashcard not found".into()));
        }
        Ok(())
    }
}
