use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Food reference data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Food {
    #[serde(rename = "id")]
    pub food_id: i64,
    pub food_name: String,
    pub calo_amount: f64,
}
