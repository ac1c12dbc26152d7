use anyhow::Context;
use sqlx::{PgPool, Postgres, Transaction};

use crate::foods::repo_types::Food;

impl Food {
    /// All foods, ordered by id.
    pub async fn find_all(db: &PgPool) -> anyhow::Result<Vec<Food>> {
        let foods = sqlx::query_as::<_, Food>(
            r#"
            SELECT food_id, food_name, calo_amount
              FROM foods
             ORDER BY food_id
            "#,
        )
        .fetch_all(db)
        .await
        .context("list foods")?;
        Ok(foods)
    }

    /// Looks a food up inside an open transaction.
    pub async fn find_by_id_tx(
        tx: &mut Transaction<'_, Postgres>,
        food_id: i64,
    ) -> anyhow::Result<Option<Food>> {
        let food = sqlx::query_as::<_, Food>(
            r#"
            SELECT food_id, food_name, calo_amount
              FROM foods
             WHERE food_id = $1
            "#,
        )
        .bind(food_id)
        .fetch_optional(&mut **tx)
        .await
        .context("find food by id")?;
        Ok(food)
    }
}
