use anyhow::Context;
use sqlx::{PgPool, Postgres, QueryBuilder, Transaction};

use crate::{
    foods::Food,
    meals::repo_types::{Meal, MealRecord, MealRow, NewMeal},
    pagination::{Page, Paging},
};

const SELECT_MEAL: &str = "SELECT m.meal_id, m.meal_name, m.user_id, m.meal_at, \
     f.food_id, f.food_name, f.calo_amount \
     FROM meals m INNER JOIN foods f ON f.food_id = m.food_id";

const COUNT_MEAL: &str =
    "SELECT COUNT(*) FROM meals m INNER JOIN foods f ON f.food_id = m.food_id";

const SNAPSHOT_READ: &str = "SET TRANSACTION ISOLATION LEVEL REPEATABLE READ, READ ONLY";

/// `%name%`, with LIKE wildcards in `name` matched literally.
pub(crate) fn like_pattern(name: &str) -> String {
    let mut out = String::with_capacity(name.len() + 2);
    out.push('%');
    for c in name.chars() {
        if matches!(c, '\\' | '%' | '_') {
            out.push('\\');
        }
        out.push(c);
    }
    out.push('%');
    out
}

fn push_name_filter(qb: &mut QueryBuilder<'_, Postgres>, name: Option<&str>) {
    if let Some(name) = name.filter(|n| !n.is_empty()) {
        qb.push(" WHERE m.meal_name LIKE ").push_bind(like_pattern(name));
    }
}

pub(crate) fn select_query<'a>(name: Option<&str>, paging: Option<Paging>) -> QueryBuilder<'a, Postgres> {
    let mut qb = QueryBuilder::new(SELECT_MEAL);
    push_name_filter(&mut qb, name);
    qb.push(" ORDER BY m.meal_id");
    if let Some(p) = paging {
        qb.push(" LIMIT ")
            .push_bind(p.limit())
            .push(" OFFSET ")
            .push_bind(p.offset());
    }
    qb
}

pub(crate) fn count_query<'a>(name: Option<&str>) -> QueryBuilder<'a, Postgres> {
    let mut qb = QueryBuilder::new(COUNT_MEAL);
    push_name_filter(&mut qb, name);
    qb
}

impl Meal {
    pub async fn find_by_id(db: &PgPool, meal_id: i64) -> anyhow::Result<Option<Meal>> {
        let row = sqlx::query_as::<_, MealRow>(&format!("{SELECT_MEAL} WHERE m.meal_id = $1"))
            .bind(meal_id)
            .fetch_optional(db)
            .await
            .context("find meal by id")?;
        Ok(row.map(Meal::from))
    }

    /// Meals whose name contains `name` (all meals when `None` or empty).
    /// `totalElements` of the page counts every match, not just this window.
    pub async fn find_page(
        db: &PgPool,
        name: Option<&str>,
        paging: Option<Paging>,
    ) -> anyhow::Result<Page<Meal>> {
        // Rows and count come from one snapshot.
        let mut tx = db.begin().await.context("begin tx")?;
        sqlx::query(SNAPSHOT_READ)
            .execute(&mut *tx)
            .await
            .context("set read snapshot")?;

        let rows = select_query(name, paging)
            .build_query_as::<MealRow>()
            .fetch_all(&mut *tx)
            .await
            .context("list meals")?;

        let total = match paging {
            Some(_) => {
                let (count,) = count_query(name)
                    .build_query_as::<(i64,)>()
                    .fetch_one(&mut *tx)
                    .await
                    .context("count meals")?;
                count
            }
            None => rows.len() as i64,
        };
        tx.commit().await.context("commit tx")?;

        let content = rows.into_iter().map(Meal::from).collect();
        Ok(Page::new(content, paging, total))
    }

    pub async fn create_tx(
        tx: &mut Transaction<'_, Postgres>,
        new_meal: &NewMeal,
        food: Food,
    ) -> anyhow::Result<Meal> {
        let record = sqlx::query_as::<_, MealRecord>(
            r#"
            INSERT INTO meals (meal_name, user_id, food_id, meal_at)
            VALUES ($1, $2, $3, $4)
            RETURNING meal_id, meal_name, user_id, food_id, meal_at
            "#,
        )
        .bind(&new_meal.meal_name)
        .bind(new_meal.user_id)
        .bind(new_meal.food_id)
        .bind(new_meal.meal_at)
        .fetch_one(&mut **tx)
        .await
        .context("insert meal")?;
        Ok(record.with_food(food))
    }

    /// Returns `None` if no meal has this id.
    pub async fn update_tx(
        tx: &mut Transaction<'_, Postgres>,
        meal_id: i64,
        new_meal: &NewMeal,
        food: Food,
    ) -> anyhow::Result<Option<Meal>> {
        let record = sqlx::query_as::<_, MealRecord>(
            r#"
            UPDATE meals
               SET meal_name = $2, user_id = $3, food_id = $4, meal_at = $5
             WHERE meal_id = $1
            RETURNING meal_id, meal_name, user_id, food_id, meal_at
            "#,
        )
        .bind(meal_id)
        .bind(&new_meal.meal_name)
        .bind(new_meal.user_id)
        .bind(new_meal.food_id)
        .bind(new_meal.meal_at)
        .fetch_optional(&mut **tx)
        .await
        .context("update meal")?;
        Ok(record.map(|r| r.with_food(food)))
    }

    /// Deletes a meal and returns it as it was.
    pub async fn delete(db: &PgPool, meal_id: i64) -> anyhow::Result<Option<Meal>> {
        let row = sqlx::query_as::<_, MealRow>(
            r#"
            DELETE FROM meals m
             USING foods f
             WHERE m.meal_id = $1 AND f.food_id = m.food_id
            RETURNING m.meal_id, m.meal_name, m.user_id, m.meal_at,
                      f.food_id, f.food_name, f.calo_amount
            "#,
        )
        .bind(meal_id)
        .fetch_optional(db)
        .await
        .context("delete meal")?;
        Ok(row.map(Meal::from))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn like_pattern_wraps_and_escapes() {
        assert_eq!(like_pattern("soup"), "%soup%");
        assert_eq!(like_pattern("50%_off"), "%50\\%\\_off%");
        assert_eq!(like_pattern("a\\b"), "%a\\\\b%");
    }

    #[test]
    fn select_without_filter_or_paging() {
        let qb = select_query(None, None);
        let sql = qb.sql();
        assert!(sql.starts_with(SELECT_MEAL));
        assert!(!sql.contains("WHERE"));
        assert!(!sql.contains("LIMIT"));
        assert!(sql.ends_with("ORDER BY m.meal_id"));
    }

    #[test]
    fn empty_query_means_no_filter() {
        assert!(!select_query(Some(""), None).sql().contains("WHERE"));
        assert!(!count_query(Some("")).sql().contains("WHERE"));
    }

    #[test]
    fn select_with_filter_and_paging_binds_in_order() {
        let qb = select_query(Some("soup"), Some(Paging { page: 2, size: 10 }));
        assert!(qb
            .sql()
            .ends_with(" WHERE m.meal_name LIKE $1 ORDER BY m.meal_id LIMIT $2 OFFSET $3"));
    }

    #[test]
    fn select_with_paging_only() {
        let qb = select_query(None, Some(Paging { page: 0, size: 5 }));
        assert!(qb.sql().ends_with(" ORDER BY m.meal_id LIMIT $1 OFFSET $2"));
    }

    #[test]
    fn count_shares_the_filter() {
        let qb = count_query(Some("soup"));
        assert_eq!(
            qb.sql(),
            format!("{COUNT_MEAL} WHERE m.meal_name LIKE $1")
        );
    }
}
