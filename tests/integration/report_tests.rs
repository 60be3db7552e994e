use dirdupes::catalog::CatalogEntry;
use dirdupes::duplicates::{aggregate, MatchMode};
use dirdupes::output::{TextReport, SEPARATOR_WIDTH};
use std::fs;
use tempfile::tempdir;

#[test]
fn test_report_file_layout() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("file_duplicates.txt");
    let aggregation = aggregate(
        vec![
            CatalogEntry::new("a.txt", "/x", None),
            CatalogEntry::new("a.txt", "/y", None),
            CatalogEntry::new("a.txt", "/z", None),
            CatalogEntry::new("b.txt", "/x", None),
            CatalogEntry::new("b.txt", "/y", None),
            CatalogEntry::new("c.txt", "/z", None),
        ],
        MatchMode::NameOnly,
    );

    TextReport::new(&aggregation).write_file(&path).unwrap();
    let content = fs::read_to_string(&path).unwrap();
    let lines: Vec<&str> = content.lines().collect();

    assert_eq!(lines[0], "a.txt\t/x\t/y\t/z");
    assert_eq!(lines[1], "b.txt\t/x\t/y");
    assert_eq!(lines[2], "#".repeat(SEPARATOR_WIDTH));
    assert_eq!(
        &lines[3..],
        &[
            "/x\t2",
            "\t/y\t2",
            "\t/z\t1",
            "/y\t2",
            "\t/x\t2",
            "\t/z\t1",
            "/z\t1",
            "\t/x\t1",
            "\t/y\t1",
        ]
    );
}

#[test]
fn test_report_replaces_previous_file() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("report.txt");
    fs::write(&path, "stale content that is much longer than the new report\n".repeat(10)).unwrap();

    let aggregation = aggregate(Vec::new(), MatchMode::NameOnly);
    TextReport::new(&aggregation).write_file(&path).unwrap();

    assert_eq!(
        fs::read_to_string(&path).unwrap(),
        format!("{}\n", "#".repeat(SEPARATOR_WIDTH))
    );
}

#[test]
fn test_report_size_aware_lines() {
    let aggregation = aggregate(
        vec![
            CatalogEntry::new("a.txt", "/x", Some(10)),
            CatalogEntry::new("a.txt", "/y", Some(10)),
            CatalogEntry::new("a.txt", "/z", Some(20)),
            CatalogEntry::new("a.txt", "/w", Some(20)),
        ],
        MatchMode::NameAndSize,
    );

    let text = TextReport::new(&aggregation).to_string().unwrap();
    let mut lines = text.lines();

    assert_eq!(lines.next(), Some("a.txt\t10\t/x\t/y"));
    assert_eq!(lines.next(), Some("a.txt\t20\t/z\t/w"));
}
