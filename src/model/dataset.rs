//! The result of reading one file

use super::block::Block;
use super::metadata::MetaData;
use crate::error::{FormatError, Result, RunTimeError};
use crate::registry::FormatInfo;

/// Parsed content of one file: ordered blocks plus file-level meta-data.
///
/// Created empty by [`FormatInfo::create`] and populated by the format's fill
/// routine. The producing format is kept for provenance.
#[derive(Debug, Clone)]
pub struct DataSet {
    format: &'static FormatInfo,
    /// Load options the dataset was read with
    pub options: Vec<String>,
    /// File-level annotations
    pub meta: MetaData,
    blocks: Vec<Block>,
}

impl DataSet {
    /// Empty dataset produced by `format`.
    pub fn new(format: &'static FormatInfo) -> Self {
        Self {
            format,
            options: Vec::new(),
            meta: MetaData::new(),
            blocks: Vec::new(),
        }
    }

    /// Format that produced this dataset.
    pub fn format(&self) -> &'static FormatInfo {
        self.format
    }

    /// True if the dataset was loaded with option `name`.
    pub fn has_option(&self, name: &str) -> bool {
        self.options.iter().any(|o| o == name)
    }

    /// Number of blocks.
    pub fn block_count(&self) -> usize {
        self.blocks.len()
    }

    /// Block `n`, counted from 0.
    pub fn block(&self, n: usize) -> Result<&Block> {
        self.blocks.get(n).ok_or_else(|| {
            RunTimeError::IndexOutOfRange {
                what: "block",
                index: n,
            }
            .into()
        })
    }

    /// All blocks in order.
    pub fn blocks(&self) -> &[Block] {
        &self.blocks
    }

    /// Append a block.
    pub fn push_block(&mut self, block: Block) {
        self.blocks.push(block);
    }

    /// Drop all blocks and meta-data. Options and format are kept.
    pub fn clear(&mut self) {
        self.blocks.clear();
        self.meta.clear();
    }

    /// Fail with a format error naming this dataset's format unless `cond`
    /// holds.
    pub fn format_assert(&self, cond: bool, comment: &str) -> Result<()> {
        if cond {
            Ok(())
        } else {
            Err(FormatError::unexpected(self.format.name, comment).into())
        }
    }
}
