//! Core library for the inspection-tools command line application.
//!
//! Inspectors submit independent spreadsheet exports covering the same ten
//! facility categories. The library reads each file, validates its rows,
//! merges the counters into one canonical summary and regenerates the
//! formatted report workbook. IO adapters live under [`io`], data
//! representations inside [`model`], row checks in [`validate`], the merge in
//! [`aggregate`], the report structure in [`layout`], and batch orchestration
//! under [`pipeline`].

pub mod aggregate;
pub mod config;
pub mod error;
pub mod io;
pub mod layout;
pub mod model;
pub mod pipeline;
pub mod validate;

pub use error::{Result, ToolError};
