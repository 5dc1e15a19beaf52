//! Subject grade records
//!
//! This crate turns published grade statistics into in-memory subject
//! records and estimates the scaled-mark distribution behind them:
//!
//! - **Literal parsing**: a data-only grammar for mappings stored as text
//! - **Normalization**: raw boundary and distribution data to ordered maps
//! - **Subject statistics**: midpoint-based scaled-mark mean, standard
//!   deviation and z-scores, computed once per record
//! - **Loading**: rows from a record source to records keyed by subject id
//!
//! # Example
//!
//! ```rust
//! use grade_subject::{subjects_from_rows, SubjectRow};
//!
//! let rows = vec![SubjectRow::from((
//!     11i64,
//!     "Business Management",
//!     "HL",
//!     "{'1': (0, 14), '2': (15, 26), '3': (27, 37), '4': (38, 49), \
//!       '5': (50, 56), '6': (57, 67), '7': (68, 100)}",
//!     "{'1': 0.002, '2': 0.021, '3': 0.073, '4': 0.212, \
//!       '5': 0.201, '6': 0.308, '7': 0.183}",
//! ))];
//!
//! let subjects = subjects_from_rows(rows).unwrap();
//! let subject = &subjects[&11];
//! println!("mean {:.2}, sd {:.2}", subject.scaled_mean(), subject.scaled_standard_deviation());
//! ```

pub mod literal;
pub mod loader;
pub mod normalize;
pub mod subject;

pub use grade_core::{Error, Result};
pub use literal::{parse_literal, Literal};
pub use loader::{subjects_from_rows, SubjectRow};
pub use normalize::{
    bounds_to_literal, distribution_to_literal, normalize_bounds, normalize_distribution,
    Boundaries, Distribution, RawData,
};
pub use subject::{numeric_grade, SubjectRecord};
