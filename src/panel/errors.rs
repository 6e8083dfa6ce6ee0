//! panel::errors — validation failures for date-indexed panels.
use chrono::NaiveDate;
use thiserror::Error;

pub type PanelResult<T> = Result<T, PanelError>;

/// Errors raised while constructing or slicing a [`Panel`](crate::panel::Panel).
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PanelError {
    #[error("Panel must contain at least one row and one column")]
    EmptyPanel,

    #[error("Panel shape mismatch: {rows} dates and {cols} names, values are {found:?}")]
    ShapeMismatch { rows: usize, cols: usize, found: (usize, usize) },

    #[error("Duplicate column name '{name}'")]
    DuplicateColumn { name: String },

    #[error("Unknown column '{name}'")]
    UnknownColumn { name: String },

    #[error("Dates must be strictly increasing: {previous} is followed by {next} at row {row}")]
    NonIncreasingDates { row: usize, previous: NaiveDate, next: NaiveDate },

    #[error("Non-finite value {value} at row {row}, column '{column}'")]
    NonFiniteValue { row: usize, column: String, value: f64 },

    #[error("Split row {row} out of range for a panel of {n_rows} rows")]
    SplitOutOfRange { row: usize, n_rows: usize },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    // Purpose
    // -------
    // Date-order errors show both dates and the row.
    //
    // Given
    // -----
    // - `NonIncreasingDates` at row 4 with equal dates.
    //
    // Expect
    // ------
    // - The ISO date and "row 4" appear in the message.
    fn non_increasing_dates_message_names_row_and_dates() {
        let d = NaiveDate::from_ymd_opt(2020, 3, 1).expect("valid date");
        let msg = PanelError::NonIncreasingDates { row: 4, previous: d, next: d }.to_string();
        assert!(msg.contains("2020-03-01") && msg.contains("row 4"), "Got: {msg}");
    }
}
