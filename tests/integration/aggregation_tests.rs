use dirdupes::catalog::{CatalogBuilder, CatalogConfig, CatalogEntry};
use dirdupes::duplicates::{aggregate, MatchMode};
use std::fs;
use std::path::Path;
use tempfile::tempdir;

fn entry(name: &str, dir: &str) -> CatalogEntry {
    CatalogEntry::new(name, dir, None)
}

fn sized(name: &str, size: u64, dir: &str) -> CatalogEntry {
    CatalogEntry::new(name, dir, Some(size))
}

#[test]
fn test_basic_scenario() {
    let aggregation = aggregate(
        vec![entry("a.txt", "/x"), entry("a.txt", "/y"), entry("b.txt", "/x")],
        MatchMode::NameOnly,
    );

    assert_eq!(aggregation.groups().len(), 1);
    let group = &aggregation.groups()[0];
    assert_eq!(group.key.file_name, "a.txt");
    assert_eq!(group.directories().collect::<Vec<_>>(), vec!["/x", "/y"]);

    assert_eq!(aggregation.dupe_count("/x"), 1);
    assert_eq!(aggregation.dupe_count("/y"), 1);
    assert_eq!(aggregation.common_files("/x", "/y"), vec!["a.txt"]);
    assert_eq!(aggregation.common_files("/y", "/x"), vec!["a.txt"]);
}

#[test]
fn test_size_aware_different_sizes_do_not_group() {
    let aggregation = aggregate(
        vec![sized("a.txt", 100, "/x"), sized("a.txt", 200, "/y")],
        MatchMode::NameAndSize,
    );

    assert!(aggregation.is_empty());
    assert!(aggregation.ranked_directories().is_empty());
}

#[test]
fn test_size_aware_splits_same_name() {
    let aggregation = aggregate(
        vec![
            sized("a.txt", 100, "/x"),
            sized("a.txt", 100, "/y"),
            sized("a.txt", 200, "/y"),
            sized("a.txt", 200, "/z"),
        ],
        MatchMode::NameAndSize,
    );

    assert_eq!(aggregation.groups().len(), 2);
    assert_eq!(aggregation.dupe_count("/y"), 2);
    assert_eq!(aggregation.shared_count("/x", "/y"), 1);
    assert_eq!(aggregation.shared_count("/y", "/z"), 1);
    assert_eq!(aggregation.shared_count("/x", "/z"), 0);
}

#[test]
fn test_case_differences_collapse() {
    let aggregation = aggregate(
        vec![entry("Report.PDF", "/Docs"), entry("report.pdf", "/backup/docs")],
        MatchMode::NameOnly,
    );

    assert_eq!(aggregation.groups().len(), 1);
    assert_eq!(aggregation.shared_count("/docs", "/backup/docs"), 1);
}

#[test]
fn test_ranking_order() {
    let aggregation = aggregate(
        vec![
            entry("a", "/b"),
            entry("a", "/a"),
            entry("b", "/a"),
            entry("b", "/c"),
            entry("c", "/a"),
            entry("c", "/c"),
        ],
        MatchMode::NameOnly,
    );

    let ranked = aggregation.ranked_directories();
    assert_eq!(ranked[0], ("/a", 3));
    assert_eq!(ranked[1], ("/c", 2));
    assert_eq!(ranked[2], ("/b", 1));

    let partners = aggregation.ranked_partners("/a");
    assert_eq!(partners, vec![("/c", 2), ("/b", 1)]);
}

fn touch(path: &Path) {
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, b"x").unwrap();
}

#[test]
fn test_catalog_to_aggregation() {
    let dir = tempdir().unwrap();
    touch(&dir.path().join("Photos/IMG_1.jpg"));
    touch(&dir.path().join("Photos/IMG_2.jpg"));
    touch(&dir.path().join("Backup/img_1.JPG"));
    touch(&dir.path().join("Backup/IMG_2.jpg"));
    touch(&dir.path().join("Backup/only_here.jpg"));

    let catalog = CatalogBuilder::new(CatalogConfig::default())
        .build(&[dir.path().to_path_buf()])
        .unwrap();
    let aggregation = aggregate(catalog.entries, MatchMode::NameOnly);

    assert_eq!(aggregation.groups().len(), 2);
    assert_eq!(aggregation.stats().directories, 2);
    assert_eq!(aggregation.stats().directory_pairs, 1);

    let (first, _) = aggregation.ranked_directories()[0];
    let (second, shared) = aggregation.ranked_partners(first)[0];
    assert_eq!(shared, 2);

    // On-disk case is kept for deletion
    let mut backup_paths = aggregation.shared_paths(first, second, backup_side(first, second));
    backup_paths.sort();
    assert_eq!(backup_paths.len(), 2);
    assert!(backup_paths[0].ends_with("Backup/IMG_2.jpg"));
    assert!(backup_paths[1].ends_with("Backup/img_1.JPG"));
    assert!(backup_paths.iter().all(|p| p.exists()));
}

fn backup_side<'a>(a: &'a str, b: &'a str) -> &'a str {
    if a.ends_with("/backup") {
        a
    } else {
        b
    }
}
