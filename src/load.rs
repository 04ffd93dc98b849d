//! Load pipeline: open, resolve the format, fill a dataset
//!
//! ```text
//! load_file(path, format?, options)
//!   ├── open_source(path)          RunTimeError::Open
//!   ├── format given?  resolve()   RunTimeError::UnknownFormat
//!   │   otherwise      identify()  RunTimeError::NotDetermined
//!   ├── rewind
//!   └── load_stream(src, format)   FormatError from the parser
//! ```
//!
//! A dataset is only returned when its fill routine succeeded; on error the
//! partially filled dataset is dropped.

use std::fs::File;
use std::io::{BufReader, Seek, SeekFrom};
use std::path::Path;

use log::{debug, warn};

use crate::error::{Result, RunTimeError};
use crate::model::DataSet;
use crate::registry::{DataSource, FormatInfo, Registry};

/// Open `path` for reading.
///
/// Files ending in `.gz` are decompressed into memory when the `gzip`
/// feature is enabled.
pub(crate) fn open_source(path: &Path) -> Result<Box<dyn DataSource>> {
    let file = File::open(path).map_err(|source| RunTimeError::Open {
        path: path.to_path_buf(),
        source,
    })?;

    #[cfg(feature = "gzip")]
    {
        let is_gz = path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("gz"));
        if is_gz {
            return inflate(file);
        }
    }

    Ok(Box::new(BufReader::new(file)))
}

#[cfg(feature = "gzip")]
fn inflate(file: File) -> Result<Box<dyn DataSource>> {
    use std::io::{Cursor, Read};

    use crate::error::FormatError;

    let mut decoder = flate2::read::GzDecoder::new(BufReader::new(file));
    let mut bytes = Vec::new();
    decoder
        .read_to_end(&mut bytes)
        .map_err(|e| FormatError::Decompression(e.to_string()))?;
    debug!("decompressed {} bytes", bytes.len());
    Ok(Box::new(Cursor::new(bytes)))
}

/// Fill a new dataset of `format` from `src`, read from its current position.
pub fn load_stream(
    src: &mut dyn DataSource,
    format: &'static FormatInfo,
    options: &[String],
) -> Result<DataSet> {
    let mut dataset = format.create();
    dataset.options = options.to_vec();
    format.fill(&mut dataset, src)?;
    if dataset.block_count() == 0 {
        warn!("{} parser produced a dataset without blocks", format.name);
    }
    Ok(dataset)
}

impl Registry {
    /// Read the file at `path`.
    ///
    /// `format_name` forces a format; when it is `None` or empty the format
    /// is guessed from the extension and content.
    pub fn load_file(
        &self,
        path: impl AsRef<Path>,
        format_name: Option<&str>,
        options: &[String],
    ) -> Result<DataSet> {
        let path = path.as_ref();
        let mut src = open_source(path)?;

        let format = match format_name.filter(|name| !name.is_empty()) {
            Some(name) => self.resolve(name)?,
            None => self.identify(path, &mut *src).map_err(|reason| {
                RunTimeError::NotDetermined {
                    path: path.to_path_buf(),
                    reason,
                }
            })?,
        };
        debug!("loading {} as {}", path.display(), format.name);

        src.seek(SeekFrom::Start(0))?;
        load_stream(&mut *src, format, options)
    }

    /// Read an already opened stream as the format called `format_name`.
    pub fn load_named_stream(
        &self,
        src: &mut dyn DataSource,
        format_name: &str,
        options: &[String],
    ) -> Result<DataSet> {
        let format = self.resolve(format_name)?;
        load_stream(src, format, options)
    }
}

/// Read the file at `path` using the built-in formats.
///
/// See [`Registry::load_file`].
pub fn load_file(
    path: impl AsRef<Path>,
    format_name: Option<&str>,
    options: &[String],
) -> Result<DataSet> {
    Registry::builtin().load_file(path, format_name, options)
}
