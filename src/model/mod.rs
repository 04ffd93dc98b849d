//! In-memory data model filled by every format parser
//!
//! ```text
//! DataSet ── meta: MetaData
//!    └── Block* ── name, meta: MetaData
//!           └── Column* ── name, Step(start, step, count?) | Vector(values)
//! ```
//!
//! A dataset owns its blocks and a block owns its columns, so a parse that
//! fails halfway drops everything it built.

mod block;
mod column;
mod dataset;
mod metadata;

pub use block::Block;
pub use column::{Column, ColumnData, StepColumn, VectorColumn};
pub use dataset::DataSet;
pub use metadata::MetaData;
