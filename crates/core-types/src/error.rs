use chrono::NaiveDate;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum CoreError {
    #[error("Price records must be strictly increasing by date: {current} follows {previous}")]
    UnorderedDates {
        previous: NaiveDate,
        current: NaiveDate,
    },

    #[error("Non-finite {field} on {date}")]
    NonFinite { date: NaiveDate, field: &'static str },

    #[error("Negative {field} on {date}: {value}")]
    Negative {
        date: NaiveDate,
        field: &'static str,
        value: f64,
    },
}
