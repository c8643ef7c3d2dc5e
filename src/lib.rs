//! # chronorm - Chromatography Trace Normalization
//!
//! `chronorm` ingests time-series detector traces from instrument
//! spreadsheet exports, slices them to requested retention-time windows and
//! produces normalized derived curves, written back out as a workbook with
//! embedded line charts.
//!
//! ## Normalization modes
//!
//! - **Height normalization**: per file, per channel. Min-shift the curve
//!   to a zero baseline, then scale its peak to 1. Files are independent.
//! - **Kinetic normalization**: across a whole file set. Every curve is
//!   first scaled so its integrated area matches the largest area seen for
//!   its detector anywhere in the set, then scaled by the largest peak the
//!   area-normalized curves reach. Curves from different files become
//!   directly comparable against one shared reference.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use chronorm::pipeline::process;
//! use chronorm::range::TimeRange;
//! use chronorm::reader::load_trace_file;
//! use chronorm::results::Mode;
//!
//! let mut files = vec![
//!     load_trace_file("run_01.xlsx".as_ref())?,
//!     load_trace_file("run_02.xlsx".as_ref())?,
//! ];
//! let ranges = vec![TimeRange::new(0.0, 28.0)?];
//!
//! let store = process(&mut files, &ranges, Mode::Both)?;
//! println!("{} kinetic curves", store.kinetic().len());
//! # Ok::<(), anyhow::Error>(())
//! ```
//!
//! ## Architecture
//!
//! The library is organized into the following modules:
//!
//! - [`trace`]: the loaded-file data model (time series, channels, raw points)
//! - [`range`]: validated closed time intervals
//! - [`extract`]: window extraction by value-equality index resolution
//! - [`normalize`]: min-shift, unit-max scaling and trapezoidal area
//! - [`kinetics`]: the cross-file two-pass kinetic normalization
//! - [`results`]: result records and the cross-file result store
//! - [`pipeline`]: range x file x mode orchestration
//! - [`reader`]: workbook/CSV ingest (I/O boundary)
//! - [`export`]: workbook output with embedded charts (I/O boundary)
//!
//! The numeric core performs no I/O; reading and writing workbooks live
//! entirely in [`reader`] and [`export`].

pub mod export;
pub mod extract;
pub mod kinetics;
pub mod normalize;
pub mod pipeline;
pub mod range;
pub mod reader;
pub mod results;
pub mod trace;

/// Re-export commonly used types for convenience
pub mod prelude {
    pub use crate::export::{export_workbook, ExportError, ExportStats};
    pub use crate::extract::{extract_by_indices, extract_window, ExtractError, Window};
    pub use crate::kinetics::{kinetic_normalize, KineticError};
    pub use crate::normalize::{
        height_normalize, scale_to_unit_max, shift_min_to_zero, trapezoid_area, NormalizeError,
    };
    pub use crate::pipeline::{process, ProcessError};
    pub use crate::range::{RangeError, TimeRange};
    pub use crate::reader::{load_trace_file, FileSummary, ReadError};
    pub use crate::results::{HeightResult, KineticResult, Mode, ResultStore};
    pub use crate::trace::{Channel, TraceError, TraceFile};
}
