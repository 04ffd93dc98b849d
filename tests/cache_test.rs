//! Cache behaviour observed through a registry whose parser counts its calls.

use std::cell::Cell;
use std::fs::{self, File};
use std::io::Read;
use std::path::Path;
use std::rc::Rc;
use std::time::{Duration, SystemTime};

use tempfile::tempdir;
use xydata::{Block, Cache, Column, DataSet, DataSource, FormatError, FormatInfo, Registry, Result};

thread_local! {
    static PARSES: Cell<usize> = const { Cell::new(0) };
}

fn parses() -> usize {
    PARSES.with(Cell::get)
}

fn accept_all(_: &mut dyn DataSource) -> bool {
    true
}

/// One column with the byte values of the file; empty files are invalid.
fn counting_fill(ds: &mut DataSet, src: &mut dyn DataSource) -> Result<()> {
    PARSES.with(|n| n.set(n.get() + 1));
    let mut bytes = Vec::new();
    src.read_to_end(&mut bytes)?;
    if bytes.is_empty() {
        return Err(FormatError::unexpected("counting", "empty file").into());
    }
    let mut block = Block::new();
    block.add_column(Column::vector(
        bytes.iter().map(|&b| f64::from(b)).collect::<Vec<_>>(),
    ));
    ds.push_block(block);
    Ok(())
}

static COUNTING: FormatInfo = FormatInfo {
    name: "counting",
    description: "test format counting parser calls",
    extensions: &["cnt"],
    binary: true,
    multiblock: false,
    detect: accept_all,
    fill: counting_fill,
};

static FORMATS: [&FormatInfo; 1] = [&COUNTING];

fn cache() -> Cache {
    Cache::with_registry(Registry::new(&FORMATS))
}

fn write_with_mtime(path: &Path, content: &[u8], mtime: SystemTime) {
    fs::write(path, content).unwrap();
    File::options()
        .write(true)
        .open(path)
        .unwrap()
        .set_modified(mtime)
        .unwrap();
}

fn an_hour_ago() -> SystemTime {
    SystemTime::now() - Duration::from_secs(3600)
}

#[test]
fn test_repeated_get_parses_once() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("a.cnt");
    write_with_mtime(&path, b"abc", an_hour_ago());

    let mut cache = cache();
    cache.set_capacity(2);
    let before = parses();
    let first = cache.get(&path, None, &[]).unwrap();
    let second = cache.get(&path, Some("counting"), &[]).unwrap();
    let third = cache.get(&path, None, &[]).unwrap();

    // a forced format is a different key from a guessed one
    assert_eq!(parses() - before, 2);
    assert!(Rc::ptr_eq(&first, &third));
    assert!(!Rc::ptr_eq(&first, &second));
}

#[test]
fn test_modified_file_is_reparsed() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("a.cnt");
    write_with_mtime(&path, b"abc", an_hour_ago());

    let mut cache = cache();
    let before = parses();
    let old = cache.get(&path, None, &[]).unwrap();
    assert_eq!(old.block(0).unwrap().point_count(), Some(3));

    write_with_mtime(&path, b"abcdef", SystemTime::now() + Duration::from_secs(3600));
    let new = cache.get(&path, None, &[]).unwrap();
    assert_eq!(parses() - before, 2);
    assert!(!Rc::ptr_eq(&old, &new));
    assert_eq!(new.block(0).unwrap().point_count(), Some(6));
    assert_eq!(cache.len(), 1);

    // the old dataset stays valid for whoever holds it
    assert_eq!(old.block(0).unwrap().point_count(), Some(3));
}

#[test]
fn test_capacity_evicts_oldest_first() {
    let dir = tempdir().unwrap();
    let paths: Vec<_> = (0..3)
        .map(|i| {
            let path = dir.path().join(format!("{}.cnt", i));
            write_with_mtime(&path, b"x", an_hour_ago());
            path
        })
        .collect();

    let mut cache = cache();
    cache.set_capacity(2);
    let before = parses();
    for path in &paths {
        cache.get(path, None, &[]).unwrap();
    }
    assert_eq!(cache.len(), 2);
    assert_eq!(parses() - before, 3);

    // 1 and 2 are cached, 0 was evicted
    cache.get(&paths[2], None, &[]).unwrap();
    cache.get(&paths[1], None, &[]).unwrap();
    assert_eq!(parses() - before, 3);
    cache.get(&paths[0], None, &[]).unwrap();
    assert_eq!(parses() - before, 4);
}

#[test]
fn test_failed_parse_is_retried() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("empty.cnt");
    write_with_mtime(&path, b"", an_hour_ago());

    let mut cache = cache();
    let before = parses();
    assert!(cache.get(&path, None, &[]).unwrap_err().is_format_error());
    assert!(cache.get(&path, None, &[]).is_err());
    assert_eq!(parses() - before, 2);
    assert!(cache.is_empty());
}

#[test]
fn test_missing_file_is_not_cached() {
    let dir = tempdir().unwrap();
    let mut cache = cache();
    let before = parses();
    assert!(cache.get(dir.path().join("none.cnt"), None, &[]).is_err());
    assert_eq!(parses(), before);
    assert!(cache.is_empty());
}
