use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateEventCommand {
    pub owner_id: i64,
    pub name: String,
    pub description: String,
    pub date: NaiveDate,
    pub location: String,
}
