use serde::Serialize;
use sqlx::FromRow;
use time::OffsetDateTime;

use crate::foods::Food;

/// Meal as returned to clients, with its food attached.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Meal {
    #[serde(rename = "id")]
    pub meal_id: i64,
    pub meal_name: String,
    pub user_id: i64,
    pub food_id: i64,
    #[serde(with = "time::serde::rfc3339")]
    pub meal_at: OffsetDateTime,
    pub food: Food,
}

/// Flat row of the meals/foods join.
#[derive(Debug, FromRow)]
pub struct MealRow {
    pub meal_id: i64,
    pub meal_name: String,
    pub user_id: i64,
    pub meal_at: OffsetDateTime,
    pub food_id: i64,
    pub food_name: String,
    pub calo_amount: f64,
}

impl From<MealRow> for Meal {
    fn from(r: MealRow) -> Self {
        Self {
            meal_id: r.meal_id,
            meal_name: r.meal_name,
            user_id: r.user_id,
            food_id: r.food_id,
            meal_at: r.meal_at,
            food: Food {
                food_id: r.food_id,
                food_name: r.food_name,
                calo_amount: r.calo_amount,
            },
        }
    }
}

/// Columns of the `meals` table alone, as returned by INSERT/UPDATE.
#[derive(Debug, FromRow)]
pub struct MealRecord {
    pub meal_id: i64,
    pub meal_name: String,
    pub user_id: i64,
    pub food_id: i64,
    pub meal_at: OffsetDateTime,
}

impl MealRecord {
    pub fn with_food(self, food: Food) -> Meal {
        Meal {
            meal_id: self.meal_id,
            meal_name: self.meal_name,
            user_id: self.user_id,
            food_id: self.food_id,
            meal_at: self.meal_at,
            food,
        }
    }
}

/// Validated input for inserting or updating a meal.
#[derive(Debug, Clone, PartialEq)]
pub struct NewMeal {
    pub meal_name: String,
    pub user_id: i64,
    pub food_id: i64,
    pub meal_at: OffsetDateTime,
}
