use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Event {
    pub id: i64,
    pub owner_id: i64,
    pub name: String,
    pub description: String,
    /// Calendar date, serialized as `YYYY-MM-DD`.
    pub date: NaiveDate,
    pub location: String,
}
