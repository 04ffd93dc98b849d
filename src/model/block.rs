//! Blocks: tables of columns with their own meta-data

use super::column::{Column, StepColumn};
use super::metadata::MetaData;
use crate::error::{Result, RunTimeError};

/// One table of columns inside a [`DataSet`](super::DataSet), such as a
/// single scan range.
#[derive(Debug, Clone, Default)]
pub struct Block {
    /// Block title, empty if the file does not name it
    pub name: String,
    /// Block-level annotations
    pub meta: MetaData,
    columns: Vec<Column>,
}

impl Block {
    /// Empty, unnamed block.
    pub fn new() -> Self {
        Self::default()
    }

    /// Empty block with a title.
    pub fn with_name(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Point index pseudo-column `0, 1, 2, ...`, unlimited.
    pub fn index_column() -> Column {
        Column::step(StepColumn::new(0.0, 1.0)).named("index")
    }

    /// Number of real columns.
    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    /// Column `n`, counted from 0.
    pub fn column(&self, n: usize) -> Result<&Column> {
        self.columns.get(n).ok_or_else(|| {
            RunTimeError::IndexOutOfRange {
                what: "column",
                index: n,
            }
            .into()
        })
    }

    /// All columns in order.
    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    /// Append a column.
    pub fn add_column(&mut self, column: Column) {
        self.columns.push(column);
    }

    /// Insert a column in front of the others.
    pub fn prepend_column(&mut self, column: Column) {
        self.columns.insert(0, column);
    }

    /// Number of points of the shortest bounded column.
    ///
    /// `None` if the block has no bounded column.
    pub fn point_count(&self) -> Option<usize> {
        self.columns.iter().filter_map(Column::point_count).min()
    }

    /// Move columns whose length differs from the first column's into new
    /// blocks, one block per distinct length.
    ///
    /// The first element of the result is `self` with the columns that kept
    /// their place. New blocks are named `<name>_<length>` and carry a copy of
    /// the block meta-data.
    pub fn split_on_column_length(mut self) -> Vec<Block> {
        let Some(first) = self.columns.first() else {
            return vec![self];
        };
        let expected = first.point_count();

        let mut extra: Vec<Block> = Vec::new();
        let mut kept = Vec::with_capacity(self.columns.len());
        for column in std::mem::take(&mut self.columns) {
            let len = column.point_count();
            if len == expected {
                kept.push(column);
                continue;
            }
            match extra.iter_mut().find(|b| b.point_count() == len) {
                Some(block) => block.add_column(column),
                None => {
                    let suffix = len.map_or_else(|| "unlimited".to_string(), |n| n.to_string());
                    let mut block = Block::with_name(format!("{}_{}", self.name, suffix));
                    block.meta = self.meta.clone();
                    block.add_column(column);
                    extra.push(block);
                }
            }
        }
        self.columns = kept;

        let mut result = Vec::with_capacity(extra.len() + 1);
        result.push(self);
        result.extend(extra);
        result
    }
}
