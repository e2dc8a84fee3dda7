use std::fs;
use std::path::{Path, PathBuf};

use dupe_finder::{Depth, SearchConfig, SuffixFilter, Walker, find_duplicates};
use tempfile::tempdir;

fn write(path: &Path, content: &[u8]) {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(path, content).unwrap();
}

fn canonical(path: &Path) -> PathBuf {
    fs::canonicalize(path).unwrap()
}

fn with_depth(levels: u32) -> SearchConfig {
    SearchConfig {
        max_depth: Depth::Limited(levels),
        ..Default::default()
    }
}

#[test]
fn test_one_duplicate_across_subdirectory() {
    let dir = tempdir().unwrap();
    let root = dir.path();
    write(&root.join("a.bin"), b"X");
    write(&root.join("sub/b.bin"), b"X");
    write(&root.join("sub/c.bin"), b"Y");

    let report = find_duplicates(&[root.to_path_buf()], SearchConfig::default(), None).unwrap();

    assert_eq!(report.files_scanned, 2);
    assert_eq!(report.duplicates.len(), 1);
    // Root files are registered before any subdirectory is walked.
    assert_eq!(report.duplicates[0].original, canonical(&root.join("a.bin")));
    assert_eq!(report.duplicates[0].duplicate, canonical(&root.join("sub/b.bin")));
    assert_eq!(report.errors, 0);
}

#[test]
fn test_empty_root() {
    let dir = tempdir().unwrap();
    let report =
        find_duplicates(&[dir.path().to_path_buf()], SearchConfig::default(), None).unwrap();

    assert_eq!(report.files_scanned, 0);
    assert!(report.duplicates.is_empty());
    assert_eq!(report.errors, 0);
    assert_eq!(report.directories_scanned, 1);
}

#[test]
fn test_k_identical_files_yield_k_minus_one_records() {
    let dir = tempdir().unwrap();
    let root = dir.path();
    for name in ["1.dat", "2.dat", "3.dat", "4.dat"] {
        write(&root.join(name), b"same");
    }
    write(&root.join("5.dat"), b"different");

    let report = find_duplicates(&[root.to_path_buf()], SearchConfig::default(), None).unwrap();

    assert_eq!(report.files_scanned, 2);
    assert_eq!(report.duplicates.len(), 3);
    let first = canonical(&root.join("1.dat"));
    for (record, name) in report.duplicates.iter().zip(["2.dat", "3.dat", "4.dat"]) {
        assert_eq!(record.original, first);
        assert_eq!(record.duplicate, canonical(&root.join(name)));
    }
}

#[test]
fn test_every_pair_is_byte_identical() {
    let dir = tempdir().unwrap();
    let root = dir.path();
    write(&root.join("a/1"), b"alpha");
    write(&root.join("a/2"), b"beta");
    write(&root.join("b/1"), b"alpha");
    write(&root.join("b/c/2"), b"beta");
    write(&root.join("b/c/3"), b"gamma");
    write(&root.join("empty1"), b"");
    write(&root.join("b/empty2"), b"");

    let report = find_duplicates(&[root.to_path_buf()], SearchConfig::default(), None).unwrap();

    assert_eq!(report.duplicates.len(), 3);
    for record in &report.duplicates {
        assert_ne!(record.duplicate, record.original);
        assert_eq!(
            fs::read(&record.duplicate).unwrap(),
            fs::read(&record.original).unwrap()
        );
    }
}

#[test]
fn test_depth_zero_only_examines_root_files() {
    let dir = tempdir().unwrap();
    let root = dir.path();
    write(&root.join("top"), b"X");
    write(&root.join("sub/nested"), b"X");

    let report = find_duplicates(&[root.to_path_buf()], with_depth(0), None).unwrap();

    assert_eq!(report.files_scanned, 1);
    assert!(report.duplicates.is_empty());
    assert_eq!(report.directories_scanned, 1);
}

#[test]
fn test_depth_limit_stops_listing_below_it() {
    let dir = tempdir().unwrap();
    let root = dir.path();
    write(&root.join("l0"), b"0");
    write(&root.join("d1/l1"), b"1");
    write(&root.join("d1/d2/l2"), b"2");
    write(&root.join("d1/d2/d3/l3"), b"3");

    let mut walker = Walker::new(SearchConfig::default()).unwrap();
    walker.walk(root, Depth::Limited(2));

    let report = walker.into_report();
    assert_eq!(report.files_scanned, 3);
    assert_eq!(report.directories_scanned, 3);
}

#[test]
fn test_suffix_filter_is_exact() {
    let dir = tempdir().unwrap();
    let root = dir.path();
    write(&root.join("a.txt"), b"X");
    write(&root.join("a.txtx"), b"X");
    write(&root.join("b.md"), b"X");

    let config = SearchConfig {
        suffix: Some(SuffixFilter::new(".txt").unwrap()),
        ..Default::default()
    };
    let report = find_duplicates(&[root.to_path_buf()], config, None).unwrap();

    assert_eq!(report.files_scanned, 1);
    assert!(report.duplicates.is_empty());
}

#[test]
fn test_repeated_root_is_processed_once() {
    let dir = tempdir().unwrap();
    let root = dir.path();
    write(&root.join("a"), b"X");
    write(&root.join("sub/b"), b"Y");

    let roots = vec![
        root.to_path_buf(),
        root.join("sub"),
        root.join("sub").join(".."),
        root.to_path_buf(),
    ];
    let report = find_duplicates(&roots, SearchConfig::default(), None).unwrap();

    assert_eq!(report.files_scanned, 2);
    assert!(report.duplicates.is_empty());
    assert_eq!(report.directories_scanned, 2);
    assert_eq!(report.revisits_skipped, 3);
}

#[test]
fn test_duplicates_across_roots() {
    let first = tempdir().unwrap();
    let second = tempdir().unwrap();
    write(&first.path().join("song.mp3"), b"tune");
    write(&second.path().join("copy.mp3"), b"tune");

    let report = find_duplicates(
        &[first.path().to_path_buf(), second.path().to_path_buf()],
        SearchConfig::default(),
        None,
    )
    .unwrap();

    assert_eq!(report.duplicates.len(), 1);
    assert_eq!(report.duplicates[0].original, canonical(&first.path().join("song.mp3")));
    assert_eq!(report.duplicates[0].duplicate, canonical(&second.path().join("copy.mp3")));
}

#[test]
fn test_non_directory_roots_are_skipped() {
    let dir = tempdir().unwrap();
    let file = dir.path().join("plain");
    write(&file, b"X");

    let report = find_duplicates(
        &[file, dir.path().join("missing")],
        SearchConfig::default(),
        None,
    )
    .unwrap();

    assert_eq!(report.files_scanned, 0);
    assert_eq!(report.directories_scanned, 0);
    assert_eq!(report.errors, 0);
}

#[test]
fn test_repeated_runs_are_identical() {
    let dir = tempdir().unwrap();
    let root = dir.path();
    for i in 0..5 {
        write(&root.join(format!("d{i}/x")), b"shared");
        write(&root.join(format!("d{i}/y{i}")), format!("unique {i}").as_bytes());
        write(&root.join(format!("d{i}/e/z")), b"shared too");
    }

    let first = find_duplicates(&[root.to_path_buf()], SearchConfig::default(), None).unwrap();
    let second = find_duplicates(&[root.to_path_buf()], SearchConfig::default(), None).unwrap();

    assert_eq!(first.duplicates.len(), 8);
    assert_eq!(first, second);
}

#[test]
fn test_parallel_hashing_matches_sequential() {
    let dir = tempdir().unwrap();
    let root = dir.path();
    for i in 0..40 {
        write(&root.join(format!("f{i:02}")), format!("{}", i % 7).as_bytes());
        write(&root.join(format!("sub/g{i:02}")), format!("{}", i % 5).as_bytes());
    }

    let sequential =
        find_duplicates(&[root.to_path_buf()], SearchConfig::default(), None).unwrap();
    let parallel = find_duplicates(
        &[root.to_path_buf()],
        SearchConfig {
            threads: 4,
            ..Default::default()
        },
        None,
    )
    .unwrap();

    assert_eq!(sequential, parallel);
    assert_eq!(sequential.files_scanned, 7);
}

#[test]
fn test_sha256_finds_the_same_duplicates() {
    let dir = tempdir().unwrap();
    let root = dir.path();
    write(&root.join("a"), b"X");
    write(&root.join("b/c"), b"X");
    write(&root.join("b/d"), b"Z");

    let blake3 = find_duplicates(&[root.to_path_buf()], SearchConfig::default(), None).unwrap();
    let sha256 = find_duplicates(
        &[root.to_path_buf()],
        SearchConfig {
            hash: dupe_finder::HashAlgorithm::Sha256,
            ..Default::default()
        },
        None,
    )
    .unwrap();

    assert_eq!(blake3.duplicates, sha256.duplicates);
}

#[cfg(unix)]
#[test]
fn test_symlinks_are_not_followed() {
    let dir = tempdir().unwrap();
    let root = dir.path();
    write(&root.join("real/file"), b"X");
    std::os::unix::fs::symlink(root.join("real"), root.join("link")).unwrap();
    std::os::unix::fs::symlink(root.join("real/file"), root.join("file-link")).unwrap();
    std::os::unix::fs::symlink(root, root.join("real/loop")).unwrap();

    let report = find_duplicates(&[root.to_path_buf()], SearchConfig::default(), None).unwrap();

    assert_eq!(report.files_scanned, 1);
    assert!(report.duplicates.is_empty());
    assert_eq!(report.directories_scanned, 2);
}
