use serde::Deserialize;
use time::OffsetDateTime;

use crate::{error::FieldErrors, meals::repo_types::NewMeal};

pub const MSG_MEAL_NAME: &str = "Please enter the name with 3 to 50 characters.";
pub const MSG_REQUIRED: &str = "This field is required.";

const MEAL_NAME_MIN: usize = 3;
const MEAL_NAME_MAX: usize = 50;

/// Request body for creating or updating a meal.
#[derive(Debug, Default, Deserialize)]
pub struct MealDto {
    pub meal_name: Option<String>,
    pub user_id: Option<i64>,
    pub food_id: Option<i64>,
    #[serde(default, with = "time::serde::rfc3339::option")]
    pub meal_at: Option<OffsetDateTime>,
}

impl MealDto {
    /// Checks every field and returns either the validated meal or one
    /// message per offending field.
    pub fn validate(self) -> Result<NewMeal, FieldErrors> {
        let mut errors = FieldErrors::new();

        let meal_name = self.meal_name.map(|n| n.trim().to_string());
        let name_ok = meal_name
            .as_deref()
            .map(|n| (MEAL_NAME_MIN..=MEAL_NAME_MAX).contains(&n.chars().count()))
            .unwrap_or(false);
        if !name_ok {
            errors.insert("meal_name".into(), MSG_MEAL_NAME.into());
        }
        if self.user_id.is_none() {
            errors.insert("user_id".into(), MSG_REQUIRED.into());
        }
        if self.food_id.is_none() {
            errors.insert("food_id".into(), MSG_REQUIRED.into());
        }
        if self.meal_at.is_none() {
            errors.insert("meal_at".into(), MSG_REQUIRED.into());
        }

        match (meal_name, self.user_id, self.food_id, self.meal_at) {
            (Some(meal_name), Some(user_id), Some(food_id), Some(meal_at)) if errors.is_empty() => {
                Ok(NewMeal {
                    meal_name,
                    user_id,
                    food_id,
                    meal_at,
                })
            }
            _ => Err(errors),
        }
    }
}

/// Query string of `GET /Meals`. Kept as raw strings: non-numeric paging
/// values switch pagination off instead of rejecting the request.
#[derive(Debug, Default, Deserialize)]
pub struct MealListQuery {
    pub query: Option<String>,
    pub page: Option<String>,
    pub size: Option<String>,
}
