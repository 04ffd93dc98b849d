//! # xydata - one data model for many x-y data file formats
//!
//! `xydata` reads the output files of powder diffractometers and
//! spectrometers (vendor binaries as well as text dialects) into a single
//! in-memory representation, whatever layout the file uses on disk.
//!
//! ## Key Features
//!
//! - **Format registry**: a fixed, ordered table of supported formats, each
//!   with a name, a list of extensions, a detector and a parser.
//!
//! - **Format guessing**: the file extension narrows the candidates, the
//!   detectors of the candidates decide; the first one to accept wins.
//!
//! - **Uniform data model**: a [`DataSet`] holds [`Block`]s, a block holds
//!   [`Column`]s. Columns are either explicit values or an arithmetic
//!   sequence (`start + n * step`).
//!
//! - **Cache**: [`Cache`] keeps recently loaded datasets and re-reads a file
//!   only if it was modified since.
//!
//! - **Transparent gzip**: `scan.uxd.gz` is read as a `uxd` file (feature
//!   `gzip`, on by default).
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use xydata::load_file;
//!
//! // guess the format from the extension and the file content
//! let dataset = load_file("scan.uxd", None, &[])?;
//!
//! for block in dataset.blocks() {
//!     let x = block.column(0)?;
//!     let y = block.column(1)?;
//!     for n in 0..block.point_count().unwrap_or(0) {
//!         println!("{} {}", x.value(n)?, y.value(n)?);
//!     }
//! }
//! # Ok::<(), xydata::Error>(())
//! ```
//!
//! Repeated loads of the same file go through a [`Cache`]:
//!
//! ```rust,no_run
//! use xydata::Cache;
//!
//! let mut cache = Cache::new();
//! let first = cache.get("scan.raw", Some("bruker_raw"), &[])?;
//! let again = cache.get("scan.raw", Some("bruker_raw"), &[])?;
//! assert!(std::rc::Rc::ptr_eq(&first, &again));
//! # Ok::<(), xydata::Error>(())
//! ```
//!
//! ## Architecture
//!
//! - [`registry`]: format descriptors, the built-in table and format guessing
//! - [`formats`]: one parser per supported format
//! - [`model`]: dataset, block, column and meta-data types
//! - [`decode`]: little-endian binary readers and text tokenizers
//! - [`load`]: open, guess, parse
//! - [`cache`]: dataset cache with staleness detection
//! - [`export`]: plain-text writer used by `xyconv`
//!
//! ## Supported Formats
//!
//! | name | description | extensions |
//! |------|-------------|------------|
//! | `cpi` | Sietronics Sieray CPI | cpi |
//! | `uxd` | Siemens/Bruker Diffrac-AT UXD | uxd |
//! | `rigaku_dat` | Rigaku dat | dat |
//! | `bruker_raw` | Siemens/Bruker Diffrac-AT RAW v1/v2/v3 | raw |
//! | `philips_udf` | Philips UDF | udf |
//! | `spe` | Princeton Instruments WinSpec SPE | spe |
//! | `philips_rd` | Philips RD raw scan V3/V5 | rd, sd |
//! | `canberra_mca` | Canberra MCA | mca |
//! | `xfit_xdd` | XFIT/Koalariet XDD | xdd |
//! | `riet7` | RIET7/ILL_D1A5/PSI_DMC DAT | dat |
//! | `dbws` | DBWS data file | dbw, rit, neu |
//! | `text` | ascii plain text | txt, dat, asc, csv, prn |

#![deny(missing_docs)]
#![deny(rustdoc::missing_crate_level_docs)]

pub mod cache;
pub mod decode;
pub mod error;
pub mod export;
pub mod formats;
pub mod load;
pub mod model;
pub mod registry;

pub use cache::Cache;
pub use error::{Error, FormatError, Result, RunTimeError};
pub use export::{export_plain_text, write_plain_text, ExportOptions};
pub use load::{load_file, load_stream};
pub use model::{Block, Column, ColumnData, DataSet, MetaData, StepColumn, VectorColumn};
pub use registry::{
    find_by_name, format_at, format_count, formats, guess_format, DataSource, FormatInfo,
    GuessFailure, Registry,
};

/// Re-export commonly used types for convenience
pub mod prelude {
    pub use crate::cache::Cache;
    pub use crate::error::{Error, FormatError, Result, RunTimeError};
    pub use crate::export::ExportOptions;
    pub use crate::load::{load_file, load_stream};
    pub use crate::model::{Block, Column, DataSet, MetaData, StepColumn, VectorColumn};
    pub use crate::registry::{guess_format, FormatInfo, Registry};
}
