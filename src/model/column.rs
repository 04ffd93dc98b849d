//! Columns: fixed-step generators and explicit value vectors

use std::cell::Cell;

use crate::error::{Result, RunTimeError};

/// Arithmetic progression `start + step * n`.
///
/// A column without `count` is unlimited; its length is taken from the other
/// columns of the block whenever one is needed.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StepColumn {
    /// Value of point 0
    pub start: f64,
    /// Distance between consecutive points
    pub step: f64,
    /// Number of points, `None` for unlimited
    pub count: Option<usize>,
}

impl StepColumn {
    /// Unlimited progression.
    pub fn new(start: f64, step: f64) -> Self {
        Self {
            start,
            step,
            count: None,
        }
    }

    /// Progression of exactly `count` points.
    pub fn with_count(start: f64, step: f64, count: usize) -> Self {
        Self {
            start,
            step,
            count: Some(count),
        }
    }

    /// Number of points, `None` if unlimited.
    pub fn point_count(&self) -> Option<usize> {
        self.count
    }

    /// Value of point `n`.
    pub fn value(&self, n: usize) -> Result<f64> {
        match self.count {
            Some(count) if n >= count => Err(RunTimeError::IndexOutOfRange {
                what: "point",
                index: n,
            }
            .into()),
            _ => Ok(self.start + self.step * n as f64),
        }
    }

    /// Smallest value; `point_count` is used when the column is unlimited.
    pub fn min(&self, point_count: Option<usize>) -> Result<f64> {
        let last = self.last_value(point_count)?;
        Ok(self.start.min(last))
    }

    /// Largest value; `point_count` is used when the column is unlimited.
    pub fn max(&self, point_count: Option<usize>) -> Result<f64> {
        let last = self.last_value(point_count)?;
        Ok(self.start.max(last))
    }

    fn last_value(&self, point_count: Option<usize>) -> Result<f64> {
        let n = self
            .count
            .or(point_count)
            .ok_or(RunTimeError::UnboundedColumn)?;
        if n == 0 {
            return Err(RunTimeError::EmptyColumn.into());
        }
        Ok(self.start + self.step * (n - 1) as f64)
    }
}

#[derive(Debug, Clone, Copy)]
struct Extrema {
    len: usize,
    min: f64,
    max: f64,
}

/// Explicit list of values, filled while a file is parsed.
///
/// Minimum and maximum are computed on first request and reused until the
/// length of the column changes.
#[derive(Debug, Clone, Default)]
pub struct VectorColumn {
    values: Vec<f64>,
    extrema: Cell<Option<Extrema>>,
}

impl VectorColumn {
    /// Empty column.
    pub fn new() -> Self {
        Self::default()
    }

    /// Empty column with room for `capacity` values.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            values: Vec::with_capacity(capacity),
            extrema: Cell::new(None),
        }
    }

    /// Append one value.
    pub fn push(&mut self, value: f64) {
        self.values.push(value);
    }

    /// All values in order.
    pub fn values(&self) -> &[f64] {
        &self.values
    }

    /// Number of values.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// True if the column holds no values.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Value of point `n`.
    pub fn value(&self, n: usize) -> Result<f64> {
        self.values.get(n).copied().ok_or_else(|| {
            RunTimeError::IndexOutOfRange {
                what: "point",
                index: n,
            }
            .into()
        })
    }

    /// Smallest value.
    pub fn min(&self) -> Result<f64> {
        Ok(self.extrema()?.min)
    }

    /// Largest value.
    pub fn max(&self) -> Result<f64> {
        Ok(self.extrema()?.max)
    }

    fn extrema(&self) -> Result<Extrema> {
        if self.values.is_empty() {
            return Err(RunTimeError::EmptyColumn.into());
        }
        if let Some(cached) = self.extrema.get() {
            if cached.len == self.values.len() {
                return Ok(cached);
            }
        }
        let (min, max) = self
            .values
            .iter()
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &v| {
                (lo.min(v), hi.max(v))
            });
        let computed = Extrema {
            len: self.values.len(),
            min,
            max,
        };
        self.extrema.set(Some(computed));
        Ok(computed)
    }
}

impl From<Vec<f64>> for VectorColumn {
    fn from(values: Vec<f64>) -> Self {
        Self {
            values,
            extrema: Cell::new(None),
        }
    }
}

impl Extend<f64> for VectorColumn {
    fn extend<I: IntoIterator<Item = f64>>(&mut self, iter: I) {
        self.values.extend(iter);
    }
}

impl FromIterator<f64> for VectorColumn {
    fn from_iter<I: IntoIterator<Item = f64>>(iter: I) -> Self {
        Self::from(iter.into_iter().collect::<Vec<_>>())
    }
}

/// Storage of a [`Column`].
#[derive(Debug, Clone)]
pub enum ColumnData {
    /// Closed-form progression
    Step(StepColumn),
    /// Explicit values
    Vector(VectorColumn),
}

/// One named sequence of numbers inside a block.
#[derive(Debug, Clone)]
pub struct Column {
    /// Column title, empty if the file does not name it
    pub name: String,
    /// Values
    pub data: ColumnData,
}

impl Column {
    /// Unnamed step column.
    pub fn step(step: StepColumn) -> Self {
        Self {
            name: String::new(),
            data: ColumnData::Step(step),
        }
    }

    /// Unnamed vector column.
    pub fn vector(values: impl Into<VectorColumn>) -> Self {
        Self {
            name: String::new(),
            data: ColumnData::Vector(values.into()),
        }
    }

    /// Set the column title.
    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Number of points, `None` for an unlimited step column.
    pub fn point_count(&self) -> Option<usize> {
        match &self.data {
            ColumnData::Step(s) => s.point_count(),
            ColumnData::Vector(v) => Some(v.len()),
        }
    }

    /// Value of point `n`.
    pub fn value(&self, n: usize) -> Result<f64> {
        match &self.data {
            ColumnData::Step(s) => s.value(n),
            ColumnData::Vector(v) => v.value(n),
        }
    }

    /// Fixed distance between points, if the column has one.
    pub fn step_size(&self) -> Option<f64> {
        match &self.data {
            ColumnData::Step(s) => Some(s.step),
            ColumnData::Vector(_) => None,
        }
    }

    /// Smallest value. `point_count` bounds an unlimited step column.
    pub fn min(&self, point_count: Option<usize>) -> Result<f64> {
        match &self.data {
            ColumnData::Step(s) => s.min(point_count),
            ColumnData::Vector(v) => v.min(),
        }
    }

    /// Largest value. `point_count` bounds an unlimited step column.
    pub fn max(&self, point_count: Option<usize>) -> Result<f64> {
        match &self.data {
            ColumnData::Step(s) => s.max(point_count),
            ColumnData::Vector(v) => v.max(),
        }
    }
}
