//! Format registry
//!
//! Every supported format is described by one static [`FormatInfo`]. A
//! [`Registry`] is an ordered table of them; the order decides which format
//! wins when several share an extension and more than one detector accepts a
//! file.
//!
//! ## Built-in order
//!
//! | # | name | extensions |
//! |---|------|------------|
//! | 0 | `cpi` | cpi |
//! | 1 | `uxd` | uxd |
//! | 2 | `rigaku_dat` | dat |
//! | 3 | `bruker_raw` | raw |
//! | 4 | `philips_udf` | udf |
//! | 5 | `spe` | spe |
//! | 6 | `philips_rd` | rd, sd |
//! | 7 | `canberra_mca` | mca |
//! | 8 | `xfit_xdd` | xdd |
//! | 9 | `riet7` | dat |
//! | 10 | `dbws` | dbw, rit, neu |
//! | 11 | `text` | txt, dat, asc, csv, prn |
//!
//! Specific formats come before generic ones: a `.dat` file is offered to
//! `rigaku_dat`, then `riet7`, and only then to the plain `text` reader.

mod detect;

pub use detect::{detection_extension, guess_format, GuessFailure};

use std::fmt;
use std::io::{BufRead, Seek};

use crate::error::{Result, RunTimeError};
use crate::formats as builtin;
use crate::model::DataSet;

/// Byte stream a format reads from: buffered and seekable.
///
/// Implemented for every `BufRead + Seek` type, e.g. `BufReader<File>` or
/// `Cursor<Vec<u8>>`.
pub trait DataSource: BufRead + Seek {}

impl<T: BufRead + Seek + ?Sized> DataSource for T {}

/// Detector predicate: does the stream, read from its current position, look
/// like this format? Must not panic on arbitrary input.
pub type DetectFn = fn(&mut dyn DataSource) -> bool;

/// Fill routine: populate an empty dataset from the stream or fail with a
/// format error.
pub type FillFn = fn(&mut DataSet, &mut dyn DataSource) -> Result<()>;

/// Static description of one supported file format.
pub struct FormatInfo {
    /// Short machine key, e.g. `"uxd"`
    pub name: &'static str,
    /// Human readable description
    pub description: &'static str,
    /// Lower-case extensions without the dot. Empty: never matched by
    /// extension, only by name.
    pub extensions: &'static [&'static str],
    /// Binary (`true`) or text (`false`) format
    pub binary: bool,
    /// Files may contain more than one block
    pub multiblock: bool,
    /// Detector predicate
    pub detect: DetectFn,
    /// Fill routine
    pub fill: FillFn,
}

impl FormatInfo {
    /// True if `ext` (without the dot, any case) belongs to this format.
    pub fn has_extension(&self, ext: &str) -> bool {
        let ext = ext.to_lowercase();
        self.extensions.iter().any(|e| *e == ext)
    }

    /// Run the detector predicate on `src`.
    pub fn check(&self, src: &mut dyn DataSource) -> bool {
        (self.detect)(src)
    }

    /// Empty dataset produced by this format.
    pub fn create(&'static self) -> DataSet {
        DataSet::new(self)
    }

    /// Run the fill routine on `dataset`.
    pub fn fill(&self, dataset: &mut DataSet, src: &mut dyn DataSource) -> Result<()> {
        (self.fill)(dataset, src)
    }
}

impl fmt::Debug for FormatInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FormatInfo")
            .field("name", &self.name)
            .field("extensions", &self.extensions)
            .field("binary", &self.binary)
            .field("multiblock", &self.multiblock)
            .finish_non_exhaustive()
    }
}

impl PartialEq for FormatInfo {
    fn eq(&self, other: &Self) -> bool {
        std::ptr::eq(self, other)
    }
}

static BUILTIN: [&FormatInfo; 12] = [
    &builtin::cpi::FORMAT,
    &builtin::uxd::FORMAT,
    &builtin::rigaku_dat::FORMAT,
    &builtin::bruker_raw::FORMAT,
    &builtin::philips_udf::FORMAT,
    &builtin::winspec_spe::FORMAT,
    &builtin::philips_raw::FORMAT,
    &builtin::canberra_mca::FORMAT,
    &builtin::xfit_xdd::FORMAT,
    &builtin::riet7::FORMAT,
    &builtin::dbws::FORMAT,
    &builtin::text::FORMAT,
];

/// Ordered table of formats used for lookup, detection and loading.
#[derive(Debug, Clone, Copy)]
pub struct Registry {
    formats: &'static [&'static FormatInfo],
}

impl Registry {
    /// Registry over a custom table.
    pub const fn new(formats: &'static [&'static FormatInfo]) -> Self {
        Self { formats }
    }

    /// Registry of every format built into this crate, in the order
    /// documented at module level.
    pub fn builtin() -> Self {
        Self::new(&BUILTIN)
    }

    /// All formats in registry order.
    pub fn formats(&self) -> &'static [&'static FormatInfo] {
        self.formats
    }

    /// Number of formats.
    pub fn len(&self) -> usize {
        self.formats.len()
    }

    /// True if the table is empty.
    pub fn is_empty(&self) -> bool {
        self.formats.is_empty()
    }

    /// Format at position `i`.
    pub fn format_at(&self, i: usize) -> Result<&'static FormatInfo> {
        self.formats.get(i).copied().ok_or_else(|| {
            RunTimeError::IndexOutOfRange {
                what: "format",
                index: i,
            }
            .into()
        })
    }

    /// Format called `name` (exact match).
    pub fn find_by_name(&self, name: &str) -> Option<&'static FormatInfo> {
        self.formats.iter().copied().find(|fi| fi.name == name)
    }

    /// Like [`find_by_name`](Self::find_by_name), failing with
    /// [`RunTimeError::UnknownFormat`].
    pub fn resolve(&self, name: &str) -> Result<&'static FormatInfo> {
        self.find_by_name(name)
            .ok_or_else(|| RunTimeError::UnknownFormat(name.to_string()).into())
    }

    /// Formats claiming extension `ext`, in registry order.
    pub fn candidates(&self, ext: &str) -> Vec<&'static FormatInfo> {
        self.formats
            .iter()
            .copied()
            .filter(|fi| fi.has_extension(ext))
            .collect()
    }
}

impl Default for Registry {
    fn default() -> Self {
        Self::builtin()
    }
}

/// Built-in formats in registry order.
pub fn formats() -> &'static [&'static FormatInfo] {
    Registry::builtin().formats()
}

/// Number of built-in formats.
pub fn format_count() -> usize {
    Registry::builtin().len()
}

/// Built-in format at position `i`.
pub fn format_at(i: usize) -> Result<&'static FormatInfo> {
    Registry::builtin().format_at(i)
}

/// Built-in format called `name`.
pub fn find_by_name(name: &str) -> Option<&'static FormatInfo> {
    Registry::builtin().find_by_name(name)
}
