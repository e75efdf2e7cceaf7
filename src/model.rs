//! Write payloads and the acknowledgement returned for them.

use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize};

/// Body of `POST /employees`. Every key must be present; `phone_number` and
/// `manager_id` may be `null`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NewEmployee {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    #[serde(deserialize_with = "present")]
    pub phone_number: Option<String>,
    pub hire_date: NaiveDate,
    pub job_id: String,
    pub salary: f64,
    #[serde(deserialize_with = "present")]
    pub manager_id: Option<i64>,
    pub department_id: i64,
}

/// Body of `POST /bookings`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NewBooking {
    pub passenger_id: i64,
    pub schedule_id: i64,
    pub seats_booked: i64,
    pub total_amount: f64,
}

/// Nullable but required: with `deserialize_with` serde reports an absent key
/// as a missing field instead of defaulting it to `None`.
fn present<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer)
}

/// Fixed acknowledgement returned by successful writes.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Message {
    pub message: String,
}

impl Message {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}
