use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Replaces every mutable field of an event; the owner never changes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateEventCommand {
    pub name: String,
    pub description: String,
    pub date: NaiveDate,
    pub location: String,
}
