//! panel — validated, date-indexed wide panels and their row views.
//!
//! The panel is the input boundary of the crate: callers hand over cleaned
//! numeric data, [`Panel::new`] checks the invariants the estimator relies
//! on, and [`PanelView`] provides the borrowed train/test windows used by
//! out-of-sample evaluation.

pub mod data;
pub mod errors;

pub use self::data::{Panel, PanelView};
pub use self::errors::{PanelError, PanelResult};
