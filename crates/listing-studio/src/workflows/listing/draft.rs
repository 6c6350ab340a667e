use super::catalog::CategoryId;
use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AddressField {
    Street,
    City,
    State,
    Zip,
}

/// Free-text postal address as typed (or located) on the details step.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddressDraft {
    pub street: String,
    pub city: String,
    pub state: String,
    pub zip: String,
}

impl AddressDraft {
    pub fn field(&self, field: AddressField) -> &str {
        match field {
            AddressField::Street => &self.street,
            AddressField::City => &self.city,
            AddressField::State => &self.state,
            AddressField::Zip => &self.zip,
        }
    }

    pub fn set(&mut self, field: AddressField, value: impl Into<String>) {
        let value = value.into();
        match field {
            AddressField::Street => self.street = value,
            AddressField::City => self.city = value,
            AddressField::State => self.state = value,
            AddressField::Zip => self.zip = value,
        }
    }

    pub fn is_blank(&self) -> bool {
        [&self.street, &self.city, &self.state, &self.zip]
            .iter()
            .all(|value| value.trim().is_empty())
    }
}

/// Snapshot of everything collected so far, handed to validation and submission.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListingDraft {
    pub title: String,
    pub description: String,
    pub categories: Vec<CategoryId>,
    pub subcategories: Vec<String>,
    pub address: AddressDraft,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub start_time: Option<NaiveTime>,
    pub end_time: Option<NaiveTime>,
}
