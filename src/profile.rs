use chrono::{Duration, NaiveDate};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

pub const LAST_WEIGHT_DATE_KEY: &str = "last_weight_date_int";

/// The `profile` object returned by `profile.get`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserProfile {
    fields: Map<String, Value>,
}

impl UserProfile {
    pub fn new(fields: Map<String, Value>) -> Self {
        UserProfile { fields }
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.fields.get(key)
    }

    pub fn fields(&self) -> &Map<String, Value> {
        &self.fields
    }

    /// Day of the last weigh-in, counted in days since 1970-01-01.
    ///
    /// The platform sends integers as strings; plain numbers are accepted too.
    pub fn last_weight_date_int(&self) -> Option<i64> {
        match self.get(LAST_WEIGHT_DATE_KEY)? {
            Value::String(s) => s.trim().parse().ok(),
            Value::Number(n) => n.as_i64(),
            _ => None,
        }
    }

    pub fn last_weight_date(&self) -> Option<NaiveDate> {
        let days = self.last_weight_date_int()?;
        NaiveDate::from_ymd_opt(1970, 1, 1)?.checked_add_signed(Duration::try_days(days)?)
    }
}

impl From<Map<String, Value>> for UserProfile {
    fn from(fields: Map<String, Value>) -> Self {
        UserProfile::new(fields)
    }
}
