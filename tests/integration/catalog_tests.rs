use dirdupes::catalog::{CatalogBuilder, CatalogConfig, CatalogError};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::atomic::AtomicBool;
use std::sync::Arc;
use tempfile::tempdir;

fn write(path: &Path, content: &[u8]) {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(path, content).unwrap();
}

fn names(entries: &[dirdupes::catalog::CatalogEntry]) -> Vec<String> {
    let mut names: Vec<String> = entries.iter().map(|e| e.file_name.clone()).collect();
    names.sort();
    names
}

#[test]
fn test_catalog_two_roots() {
    let dir1 = tempdir().unwrap();
    let dir2 = tempdir().unwrap();
    write(&dir1.path().join("a.txt"), b"one");
    write(&dir2.path().join("a.txt"), b"two");
    write(&dir2.path().join("nested/b.txt"), b"three");

    let catalog = CatalogBuilder::new(CatalogConfig::default())
        .build(&[dir1.path().to_path_buf(), dir2.path().to_path_buf()])
        .unwrap();

    assert_eq!(catalog.entries.len(), 3);
    assert_eq!(catalog.roots.len(), 2);
    assert!(catalog.skipped.is_empty());
    // Sizes are not collected unless needed
    assert!(catalog.entries.iter().all(|e| e.size.is_none()));
}

#[test]
fn test_nested_roots_are_not_cataloged_twice() {
    let dir = tempdir().unwrap();
    write(&dir.path().join("a.txt"), b"x");
    write(&dir.path().join("sub/b.txt"), b"y");

    let catalog = CatalogBuilder::new(CatalogConfig::default())
        .build(&[dir.path().to_path_buf(), dir.path().join("sub"), dir.path().to_path_buf()])
        .unwrap();

    assert_eq!(catalog.roots.len(), 1);
    assert_eq!(catalog.entries.len(), 2);
}

#[test]
fn test_missing_root_is_skipped() {
    let dir = tempdir().unwrap();
    write(&dir.path().join("a.txt"), b"x");

    let catalog = CatalogBuilder::new(CatalogConfig::default())
        .build(&[dir.path().to_path_buf(), dir.path().join("missing")])
        .unwrap();

    assert_eq!(catalog.entries.len(), 1);
    assert_eq!(catalog.skipped.len(), 1);
}

#[test]
fn test_no_readable_roots_is_fatal() {
    let dir = tempdir().unwrap();
    let file = dir.path().join("file.txt");
    write(&file, b"x");

    let result = CatalogBuilder::new(CatalogConfig::default())
        .build(&[dir.path().join("missing"), file]);

    assert!(matches!(result, Err(CatalogError::NoReadableRoots)));
}

#[test]
fn test_filters_combined() {
    let dir = tempdir().unwrap();
    write(&dir.path().join("keep.jpg"), &[0u8; 100]);
    write(&dir.path().join("KEEP2.JPG"), &[0u8; 100]);
    write(&dir.path().join("tiny.jpg"), &[0u8; 3]);
    write(&dir.path().join("notes.txt"), &[0u8; 100]);
    write(&dir.path().join("thumbs.jpg"), &[0u8; 100]);
    write(&dir.path().join("cache/c.jpg"), &[0u8; 100]);
    write(&dir.path().join("skip/d.jpg"), &[0u8; 100]);

    let config = CatalogConfig {
        exclude_folders: vec![dir.path().join("skip")],
        exclude_filenames: vec!["thumbs.*".to_string()],
        exclude_folder_names: vec!["Cache".to_string()],
        extensions: vec!["jpg".to_string()],
        check_size: false,
        minimum_size: Some(10),
    };

    let catalog = CatalogBuilder::new(config)
        .build(&[dir.path().to_path_buf()])
        .unwrap();

    assert_eq!(names(&catalog.entries), vec!["keep.jpg", "keep2.jpg"]);
    assert!(catalog.entries.iter().all(|e| e.size == Some(100)));
}

#[test]
fn test_root_under_excluded_prefix_is_dropped() {
    let dir = tempdir().unwrap();
    write(&dir.path().join("a/x.txt"), b"x");
    write(&dir.path().join("b/x.txt"), b"x");

    let config = CatalogConfig {
        exclude_folders: vec![dir.path().join("a")],
        ..Default::default()
    };
    let catalog = CatalogBuilder::new(config)
        .build(&[dir.path().join("a"), dir.path().join("b")])
        .unwrap();

    assert_eq!(catalog.roots, vec![std::path::absolute(dir.path().join("b")).unwrap()]);
    assert_eq!(catalog.entries.len(), 1);
}

#[test]
fn test_relative_excluded_prefix_is_pruned() {
    // Relative paths resolve against the working directory
    let dir = tempfile::Builder::new()
        .prefix("dirdupes-relative")
        .tempdir_in(".")
        .unwrap();
    write(&dir.path().join("keep/a.txt"), b"a");
    write(&dir.path().join("skipme/a.txt"), b"a");
    let relative = PathBuf::from(dir.path().file_name().unwrap());

    let config = CatalogConfig {
        exclude_folders: vec![relative.join("skipme")],
        ..Default::default()
    };
    let catalog = CatalogBuilder::new(config).build(&[relative]).unwrap();

    assert_eq!(catalog.entries.len(), 1);
    assert!(catalog.entries[0].path.ends_with("keep/a.txt"));
}

#[test]
fn test_entries_keep_on_disk_case() {
    let dir = tempdir().unwrap();
    write(&dir.path().join("Photos/IMG_001.JPG"), b"x");

    let catalog = CatalogBuilder::new(CatalogConfig::default())
        .build(&[dir.path().to_path_buf()])
        .unwrap();

    let entry = &catalog.entries[0];
    assert_eq!(entry.file_name, "img_001.jpg");
    assert!(entry.directory.ends_with("/photos"));
    assert!(entry.path.ends_with(PathBuf::from("Photos").join("IMG_001.JPG")));
    assert!(entry.path.exists());
}

#[test]
fn test_shutdown_flag_interrupts() {
    let dir = tempdir().unwrap();
    write(&dir.path().join("a.txt"), b"x");

    let result = CatalogBuilder::new(CatalogConfig::default())
        .with_shutdown_flag(Arc::new(AtomicBool::new(true)))
        .build(&[dir.path().to_path_buf()]);

    assert!(matches!(result, Err(CatalogError::Interrupted)));
}
