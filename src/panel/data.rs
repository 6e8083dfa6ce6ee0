//! Date-indexed wide panels.
//!
//! Purpose
//! -------
//! Hold the cleaned, wide-format input of the model: one row per date, one
//! column per observed series, all values finite `f64`. Construction is the
//! single validation point; everything downstream relies on the invariants.
//!
//! Invariants & assumptions
//! ------------------------
//! - At least one row and one column.
//! - Dates strictly increasing (no duplicates).
//! - Column names unique.
//! - Every value finite. Dropping non-numeric columns and rows with missing
//!   values is the caller's job; this type only rejects what slipped through.
//!
//! Conventions
//! -----------
//! - `values` is `T × N` (rows = dates, columns = series).
//! - [`Panel::split_at`] returns borrowed [`PanelView`]s; no data is copied.
use chrono::NaiveDate;
use ndarray::{Array2, ArrayView1, ArrayView2, Axis, s};
use serde::Serialize;
use std::collections::HashSet;

use crate::panel::errors::{PanelError, PanelResult};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Panel {
    dates: Vec<NaiveDate>,
    columns: Vec<String>,
    values: Array2<f64>,
}

impl Panel {
    /// Validate and wrap a panel.
    ///
    /// # Errors
    /// - [`PanelError::EmptyPanel`] if there are no rows or no columns.
    /// - [`PanelError::ShapeMismatch`] if `values` is not `dates × columns`.
    /// - [`PanelError::DuplicateColumn`] on a repeated name.
    /// - [`PanelError::NonIncreasingDates`] at the first out-of-order date.
    /// - [`PanelError::NonFiniteValue`] at the first `NaN`/`±∞`.
    pub fn new(
        dates: Vec<NaiveDate>, columns: Vec<String>, values: Array2<f64>,
    ) -> PanelResult<Self> {
        if dates.is_empty() || columns.is_empty() {
            return Err(PanelError::EmptyPanel);
        }
        if values.dim() != (dates.len(), columns.len()) {
            return Err(PanelError::ShapeMismatch {
                rows: dates.len(),
                cols: columns.len(),
                found: values.dim(),
            });
        }
        let mut seen = HashSet::with_capacity(columns.len());
        for name in &columns {
            if !seen.insert(name.as_str()) {
                return Err(PanelError::DuplicateColumn { name: name.clone() });
            }
        }
        for (row, pair) in dates.windows(2).enumerate() {
            if pair[1] <= pair[0] {
                return Err(PanelError::NonIncreasingDates {
                    row: row + 1,
                    previous: pair[0],
                    next: pair[1],
                });
            }
        }
        if let Some(((row, col), &value)) = values.indexed_iter().find(|(_, v)| !v.is_finite()) {
            return Err(PanelError::NonFiniteValue { row, column: columns[col].clone(), value });
        }
        Ok(Self { dates, columns, values })
    }

    pub fn dates(&self) -> &[NaiveDate] {
        &self.dates
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn values(&self) -> ArrayView2<'_, f64> {
        self.values.view()
    }

    pub fn n_rows(&self) -> usize {
        self.dates.len()
    }

    pub fn n_cols(&self) -> usize {
        self.columns.len()
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    /// One series by name.
    ///
    /// # Errors
    /// - [`PanelError::UnknownColumn`] if `name` is absent.
    pub fn column(&self, name: &str) -> PanelResult<ArrayView1<'_, f64>> {
        let idx = self
            .column_index(name)
            .ok_or_else(|| PanelError::UnknownColumn { name: name.to_string() })?;
        Ok(self.values.column(idx))
    }

    /// New panel with the named columns, in the requested order.
    ///
    /// # Errors
    /// - [`PanelError::UnknownColumn`] for an absent name.
    /// - [`PanelError::DuplicateColumn`] if a name is requested twice.
    pub fn select(&self, names: &[&str]) -> PanelResult<Panel> {
        let indices = names
            .iter()
            .map(|name| {
                self.column_index(name)
                    .ok_or_else(|| PanelError::UnknownColumn { name: name.to_string() })
            })
            .collect::<PanelResult<Vec<_>>>()?;
        let values = self.values.select(Axis(1), &indices);
        let columns = names.iter().map(|n| n.to_string()).collect();
        Panel::new(self.dates.clone(), columns, values)
    }

    /// Borrow the whole panel as a view.
    pub fn view(&self) -> PanelView<'_> {
        PanelView { dates: &self.dates, columns: &self.columns, values: self.values.view() }
    }

    /// Partition into `[0, row)` and `[row, T)`. Either side may be empty.
    ///
    /// # Errors
    /// - [`PanelError::SplitOutOfRange`] if `row > T`.
    pub fn split_at(&self, row: usize) -> PanelResult<(PanelView<'_>, PanelView<'_>)> {
        let n_rows = self.n_rows();
        if row > n_rows {
            return Err(PanelError::SplitOutOfRange { row, n_rows });
        }
        let head = PanelView {
            dates: &self.dates[..row],
            columns: &self.columns,
            values: self.values.slice(s![..row, ..]),
        };
        let tail = PanelView {
            dates: &self.dates[row..],
            columns: &self.columns,
            values: self.values.slice(s![row.., ..]),
        };
        Ok((head, tail))
    }
}

/// Borrowed window over a [`Panel`]'s rows.
#[derive(Debug, Clone, Copy)]
pub struct PanelView<'a> {
    dates: &'a [NaiveDate],
    columns: &'a [String],
    values: ArrayView2<'a, f64>,
}

impl<'a> PanelView<'a> {
    pub fn dates(&self) -> &'a [NaiveDate] {
        self.dates
    }

    pub fn columns(&self) -> &'a [String] {
        self.columns
    }

    pub fn values(&self) -> ArrayView2<'a, f64> {
        self.values
    }

    pub fn n_rows(&self) -> usize {
        self.dates.len()
    }

    pub fn first_date(&self) -> Option<NaiveDate> {
        self.dates.first().copied()
    }

    pub fn last_date(&self) -> Option<NaiveDate> {
        self.dates.last().copied()
    }
}
