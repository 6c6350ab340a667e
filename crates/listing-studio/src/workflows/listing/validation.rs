use super::draft::ListingDraft;
use serde::Serialize;
use std::fmt;

/// Fields checked before publishing, in reporting order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DraftField {
    Address,
    StreetAddress,
    City,
    State,
    ZipCode,
    StartDate,
    EndDate,
    StartTime,
    EndTime,
}

impl DraftField {
    pub const fn ordered() -> [Self; 9] {
        [
            Self::Address,
            Self::StreetAddress,
            Self::City,
            Self::State,
            Self::ZipCode,
            Self::StartDate,
            Self::EndDate,
            Self::StartTime,
            Self::EndTime,
        ]
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Address => "Address",
            Self::StreetAddress => "Street Address",
            Self::City => "City",
            Self::State => "State",
            Self::ZipCode => "ZIP Code",
            Self::StartDate => "Start Date",
            Self::EndDate => "End Date",
            Self::StartTime => "Start Time",
            Self::EndTime => "End Time",
        }
    }

    fn is_missing(self, draft: &ListingDraft) -> bool {
        let address = &draft.address;
        match self {
            // Overlaps the four subfield checks; reported only when all of them are blank.
            Self::Address => address.is_blank(),
            Self::StreetAddress => blank(&address.street),
            Self::City => blank(&address.city),
            Self::State => blank(&address.state),
            Self::ZipCode => blank(&address.zip),
            Self::StartDate => draft.start_date.is_none(),
            Self::EndDate => draft.end_date.is_none(),
            Self::StartTime => draft.start_time.is_none(),
            Self::EndTime => draft.end_time.is_none(),
        }
    }
}

fn blank(value: &str) -> bool {
    value.trim().is_empty()
}

pub fn missing_fields(draft: &ListingDraft) -> Vec<DraftField> {
    DraftField::ordered()
        .into_iter()
        .filter(|field| field.is_missing(draft))
        .collect()
}

/// Human-readable labels of every missing field; empty means the draft may be published.
pub fn validate(draft: &ListingDraft) -> Vec<&'static str> {
    missing_fields(draft)
        .into_iter()
        .map(DraftField::label)
        .collect()
}

/// All missing fields reported together in one message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MissingFields(pub Vec<DraftField>);

impl MissingFields {
    pub fn labels(&self) -> Vec<&'static str> {
        self.0.iter().map(|field| field.label()).collect()
    }
}

impl fmt::Display for MissingFields {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Please fill in the following fields: {}",
            self.labels().join(", ")
        )
    }
}

impl std::error::Error for MissingFields {}
