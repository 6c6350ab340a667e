use chrono::{NaiveDate, NaiveTime, Timelike};
use serde::Serialize;

/// Longest availability window, in days counting both ends.
pub const MAX_RANGE_DAYS: i64 = 366;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AvailabilityError {
    #[error("End date cannot be before start date ({start}).")]
    EndDateBeforeStart { start: NaiveDate, tapped: NaiveDate },
    #[error("Availability cannot span more than {} days (starting {start}).", MAX_RANGE_DAYS)]
    RangeTooLong { start: NaiveDate, tapped: NaiveDate },
    #[error("End time cannot be before start time ({start}).")]
    EndTimeBeforeStart {
        start: NaiveTime,
        requested: NaiveTime,
    },
    #[error("no time picker is open")]
    NoPickerOpen,
}

/// Calendar range selection driven by day taps.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum DateRangeSelection {
    #[default]
    NoRangeSelected,
    StartPicked {
        start: NaiveDate,
    },
    RangeComplete {
        start: NaiveDate,
        end: NaiveDate,
    },
}

/// How a calendar cell should be drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DayMarking {
    Unmarked,
    Start,
    InRange,
    End,
}

impl DateRangeSelection {
    /// A tap with a complete range (or none) restarts selection at `day`.
    pub fn tap(self, day: NaiveDate) -> Result<Self, AvailabilityError> {
        match self {
            Self::NoRangeSelected | Self::RangeComplete { .. } => Ok(Self::StartPicked { start: day }),
            Self::StartPicked { start } if day >= start => {
                if span_days(start, day) > MAX_RANGE_DAYS {
                    return Err(AvailabilityError::RangeTooLong { start, tapped: day });
                }
                Ok(Self::RangeComplete { start, end: day })
            }
            Self::StartPicked { start } => Err(AvailabilityError::EndDateBeforeStart {
                start,
                tapped: day,
            }),
        }
    }

    pub fn start_date(&self) -> Option<NaiveDate> {
        match self {
            Self::NoRangeSelected => None,
            Self::StartPicked { start } | Self::RangeComplete { start, .. } => Some(*start),
        }
    }

    pub fn end_date(&self) -> Option<NaiveDate> {
        match self {
            Self::RangeComplete { end, .. } => Some(*end),
            _ => None,
        }
    }

    pub fn is_complete(&self) -> bool {
        matches!(self, Self::RangeComplete { .. })
    }

    pub fn contains(&self, day: NaiveDate) -> bool {
        match self {
            Self::RangeComplete { start, end } => *start <= day && day <= *end,
            _ => false,
        }
    }

    /// Number of marked days, both ends included; zero until the range is complete.
    pub fn day_count(&self) -> i64 {
        match self {
            Self::RangeComplete { start, end } => span_days(*start, *end),
            _ => 0,
        }
    }

    /// Inclusive list of in-range days; empty until the range is complete.
    pub fn days_in_range(&self) -> Vec<NaiveDate> {
        match self {
            Self::RangeComplete { start, end } => start
                .iter_days()
                .take_while(|day| day <= end)
                .collect(),
            _ => Vec::new(),
        }
    }

    pub fn marking(&self, day: NaiveDate) -> DayMarking {
        match *self {
            Self::NoRangeSelected => DayMarking::Unmarked,
            Self::StartPicked { start } if start == day => DayMarking::Start,
            Self::StartPicked { .. } => DayMarking::Unmarked,
            Self::RangeComplete { start, .. } if start == day => DayMarking::Start,
            Self::RangeComplete { end, .. } if end == day => DayMarking::End,
            Self::RangeComplete { start, end } if start < day && day < end => DayMarking::InRange,
            Self::RangeComplete { .. } => DayMarking::Unmarked,
        }
    }
}

fn span_days(start: NaiveDate, end: NaiveDate) -> i64 {
    end.signed_duration_since(start).num_days() + 1
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TimeField {
    Start,
    End,
}

impl TimeField {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Start => "Start Time",
            Self::End => "End Time",
        }
    }
}

/// Start/end time of day at minute precision.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TimeRange {
    start: NaiveTime,
    end: NaiveTime,
}

impl TimeRange {
    /// Both ends default to the moment the details step opened.
    pub fn opened_at(now: NaiveTime) -> Self {
        let now = truncate_to_minute(now);
        Self {
            start: now,
            end: now,
        }
    }

    pub fn start(&self) -> NaiveTime {
        self.start
    }

    pub fn end(&self) -> NaiveTime {
        self.end
    }

    pub fn set_start(&mut self, time: NaiveTime) {
        self.start = truncate_to_minute(time);
    }

    pub fn set_end(&mut self, time: NaiveTime) -> Result<(), AvailabilityError> {
        let time = truncate_to_minute(time);
        if time < self.start {
            return Err(AvailabilityError::EndTimeBeforeStart {
                start: self.start,
                requested: time,
            });
        }
        self.end = time;
        Ok(())
    }
}

fn truncate_to_minute(time: NaiveTime) -> NaiveTime {
    time.with_second(0)
        .and_then(|time| time.with_nanosecond(0))
        .unwrap_or(time)
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AvailabilityPicker {
    range: DateRangeSelection,
    times: TimeRange,
    open_picker: Option<TimeField>,
}

impl AvailabilityPicker {
    pub fn new(now: NaiveTime) -> Self {
        Self {
            range: DateRangeSelection::NoRangeSelected,
            times: TimeRange::opened_at(now),
            open_picker: None,
        }
    }

    pub fn range(&self) -> DateRangeSelection {
        self.range
    }

    pub fn times(&self) -> TimeRange {
        self.times
    }

    pub fn open_picker(&self) -> Option<TimeField> {
        self.open_picker
    }

    pub fn tap_day(&mut self, day: NaiveDate) -> Result<DateRangeSelection, AvailabilityError> {
        self.range = self.range.tap(day)?;
        Ok(self.range)
    }

    pub fn set_start_time(&mut self, time: NaiveTime) {
        self.times.set_start(time);
    }

    pub fn set_end_time(&mut self, time: NaiveTime) -> Result<(), AvailabilityError> {
        self.times.set_end(time)
    }

    /// Only one dialog is shown at a time; opening another replaces it.
    pub fn open_time_picker(&mut self, field: TimeField) {
        self.open_picker = Some(field);
    }

    pub fn dismiss_time_picker(&mut self) {
        self.open_picker = None;
    }

    /// Applies the picked value to the open field and closes the dialog either way.
    pub fn confirm_time(&mut self, time: NaiveTime) -> Result<TimeField, AvailabilityError> {
        let field = self
            .open_picker
            .take()
            .ok_or(AvailabilityError::NoPickerOpen)?;

        match field {
            TimeField::Start => self.set_start_time(time),
            TimeField::End => self.set_end_time(time)?,
        }
        Ok(field)
    }

    pub fn marking(&self, day: NaiveDate) -> DayMarking {
        self.range.marking(day)
    }
}
