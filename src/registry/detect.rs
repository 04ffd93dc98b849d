//! Format detection by extension and content

use std::io::SeekFrom;
use std::path::Path;

use log::debug;

use super::{DataSource, FormatInfo, Registry};
use crate::error::{Result, RunTimeError};
use crate::load::open_source;

/// Why a file's format could not be guessed.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GuessFailure {
    /// The file name has no extension
    #[error("file name has no extension")]
    NoExtension,

    /// No registered format uses the extension
    #[error("no format uses extension '{0}'")]
    UnknownExtension(String),

    /// Formats use the extension but none accepted the content
    #[error("content not recognised by any '{extension}' format (tried {})", .candidates.join(", "))]
    NotConfirmed {
        /// Extension of the file
        extension: String,
        /// Formats whose detector rejected the file, in the order tried
        candidates: Vec<&'static str>,
    },
}

/// Lower-cased extension used to pick candidate formats.
///
/// For `name.ext.gz` this is `ext`, since compressed files are detected by
/// their content after decompression.
pub fn detection_extension(path: &Path) -> Option<String> {
    let ext = path.extension()?.to_string_lossy().to_lowercase();
    if ext != "gz" {
        return Some(ext);
    }
    let stem = Path::new(path.file_stem()?);
    stem.extension()
        .map(|inner| inner.to_string_lossy().to_lowercase())
}

impl Registry {
    /// Choose the format of `src`, whose file name is `path`.
    ///
    /// Candidates are the formats claiming the extension of `path`, tried in
    /// registry order with the stream rewound before each detector. The first
    /// detector that accepts wins, even if a later one would accept as well.
    pub fn identify(
        &self,
        path: &Path,
        src: &mut dyn DataSource,
    ) -> Result<&'static FormatInfo, GuessFailure> {
        let extension = detection_extension(path).ok_or(GuessFailure::NoExtension)?;
        let candidates = self.candidates(&extension);
        if candidates.is_empty() {
            debug!("no format registered for extension '{}'", extension);
            return Err(GuessFailure::UnknownExtension(extension));
        }

        debug!(
            "candidates for '{}': {:?}",
            extension,
            candidates.iter().map(|fi| fi.name).collect::<Vec<_>>()
        );
        for &fi in &candidates {
            if src.seek(SeekFrom::Start(0)).is_err() {
                break;
            }
            if fi.check(src) {
                debug!("{} detected as {}", path.display(), fi.name);
                return Ok(fi);
            }
            debug!("{} rejected {}", fi.name, path.display());
        }

        Err(GuessFailure::NotConfirmed {
            extension,
            candidates: candidates.iter().map(|fi| fi.name).collect(),
        })
    }

    /// Open `path` and guess its format; `None` if it cannot be determined.
    ///
    /// Failing to open the file is an error.
    pub fn guess_format(&self, path: impl AsRef<Path>) -> Result<Option<&'static FormatInfo>> {
        let path = path.as_ref();
        let mut src = open_source(path)?;
        Ok(self.identify(path, &mut *src).ok())
    }

    /// Open `path` and guess its format, failing with
    /// [`RunTimeError::NotDetermined`].
    pub fn guess(&self, path: impl AsRef<Path>) -> Result<&'static FormatInfo> {
        let path = path.as_ref();
        let mut src = open_source(path)?;
        self.identify(path, &mut *src).map_err(|reason| {
            RunTimeError::NotDetermined {
                path: path.to_path_buf(),
                reason,
            }
            .into()
        })
    }
}

/// Guess the format of `path` among the built-in formats.
pub fn guess_format(path: impl AsRef<Path>) -> Result<Option<&'static FormatInfo>> {
    Registry::builtin().guess_format(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::DataSet;
    use std::io::{BufRead, Cursor};

    fn starts_with(src: &mut dyn DataSource, prefix: &[u8]) -> bool {
        src.fill_buf().map(|b| b.starts_with(prefix)).unwrap_or(false)
    }

    fn starts_with_a(src: &mut dyn DataSource) -> bool {
        starts_with(src, b"A")
    }

    fn accept_all(_: &mut dyn DataSource) -> bool {
        true
    }

    fn no_fill(_: &mut DataSet, _: &mut dyn DataSource) -> crate::Result<()> {
        Ok(())
    }

    static ALPHA: FormatInfo = FormatInfo {
        name: "alpha",
        description: "starts with A",
        extensions: &["dat"],
        binary: false,
        multiblock: false,
        detect: starts_with_a,
        fill: no_fill,
    };

    static ANY: FormatInfo = FormatInfo {
        name: "any",
        description: "accepts everything",
        extensions: &["dat", "xy"],
        binary: false,
        multiblock: false,
        detect: accept_all,
        fill: no_fill,
    };

    static HIDDEN: FormatInfo = FormatInfo {
        name: "hidden",
        description: "name-only",
        extensions: &[],
        binary: true,
        multiblock: false,
        detect: accept_all,
        fill: no_fill,
    };

    static TABLE: [&FormatInfo; 3] = [&ALPHA, &ANY, &HIDDEN];

    fn registry() -> Registry {
        Registry::new(&TABLE)
    }

    #[test]
    fn test_first_accepting_candidate_wins() {
        let mut src = Cursor::new(b"A file".to_vec());
        let fi = registry().identify(Path::new("x.dat"), &mut src).unwrap();
        assert_eq!(fi.name, "alpha");
    }

    #[test]
    fn test_later_candidate_after_rejection() {
        let mut src = Cursor::new(b"B file".to_vec());
        let fi = registry().identify(Path::new("x.DAT"), &mut src).unwrap();
        assert_eq!(fi.name, "any");
    }

    #[test]
    fn test_stream_rewound_between_candidates() {
        let mut src = Cursor::new(b"A file".to_vec());
        src.set_position(3);
        let fi = registry().identify(Path::new("x.dat"), &mut src).unwrap();
        assert_eq!(fi.name, "alpha");
    }

    #[test]
    fn test_failures_are_distinguishable() {
        let mut src = Cursor::new(Vec::new());
        assert_eq!(
            registry().identify(Path::new("noext"), &mut src),
            Err(GuessFailure::NoExtension)
        );
        assert_eq!(
            registry().identify(Path::new("a.raw"), &mut src),
            Err(GuessFailure::UnknownExtension("raw".to_string()))
        );
    }

    #[test]
    fn test_not_confirmed_lists_candidates() {
        static ONLY_ALPHA: [&FormatInfo; 1] = [&ALPHA];
        let mut src = Cursor::new(b"xyz".to_vec());
        let err = Registry::new(&ONLY_ALPHA)
            .identify(Path::new("a.dat"), &mut src)
            .unwrap_err();
        assert_eq!(
            err,
            GuessFailure::NotConfirmed {
                extension: "dat".to_string(),
                candidates: vec!["alpha"],
            }
        );
        assert!(err.to_string().contains("alpha"));
    }

    #[test]
    fn test_empty_extension_list_never_matches() {
        let names: Vec<_> = registry()
            .candidates("")
            .iter()
            .map(|fi| fi.name)
            .collect();
        assert!(names.is_empty());
        assert!(registry().find_by_name("hidden").is_some());
    }

    #[test]
    fn test_detection_extension() {
        assert_eq!(detection_extension(Path::new("a/b.UXD")), Some("uxd".into()));
        assert_eq!(detection_extension(Path::new("scan.raw.gz")), Some("raw".into()));
        assert_eq!(detection_extension(Path::new("scan.gz")), None);
        assert_eq!(detection_extension(Path::new("README")), None);
        assert_eq!(detection_extension(Path::new(".hidden")), None);
    }
}
