use dirdupes::actions::{DeleteError, TrashBackend};
use dirdupes::catalog::{CatalogBuilder, CatalogConfig, CatalogEntry};
use dirdupes::duplicates::{aggregate, Aggregation, MatchMode};
use dirdupes::review::{
    ConsolePrompter, FileBrowser, ReviewConfig, ReviewDriver, ReviewState, Side,
};
use std::fs;
use std::io::{self, Cursor};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tempfile::{tempdir, TempDir};

struct NoBrowser;

impl FileBrowser for NoBrowser {
    fn open(&self, _dir: &Path) -> io::Result<()> {
        Ok(())
    }
}

/// Removes files for real so outcomes are visible on disk.
#[derive(Default)]
struct RemovingTrash {
    calls: Mutex<Vec<PathBuf>>,
}

impl TrashBackend for RemovingTrash {
    fn move_to_trash(&self, path: &Path) -> Result<(), DeleteError> {
        self.calls.lock().unwrap().push(path.to_path_buf());
        fs::remove_file(path).map_err(|_| DeleteError::NotFound(path.to_path_buf()))
    }
}

fn scripted(answers: &str) -> ConsolePrompter<Cursor<Vec<u8>>, Vec<u8>> {
    ConsolePrompter::new(Cursor::new(answers.as_bytes().to_vec()), Vec::new())
}

fn review_config(dir: &TempDir) -> ReviewConfig {
    ReviewConfig {
        log_path: dir.path().join("deletion_log.log"),
        stagger: Duration::ZERO,
        worker_wait: Duration::from_secs(30),
    }
}

fn sixty_shared() -> Aggregation {
    let entries = (0..60)
        .flat_map(|n| {
            let name = format!("photo_{n:02}.jpg");
            [
                CatalogEntry::new(&name, "/x", None),
                CatalogEntry::new(&name, "/y", None),
            ]
        })
        .collect();
    aggregate(entries, MatchMode::NameOnly)
}

#[test]
fn test_sixty_shared_files_capped_and_declined() {
    yansi::disable();
    let tmp = tempdir().unwrap();
    let aggregation = sixty_shared();
    let trash = Arc::new(RemovingTrash::default());
    let mut output = Vec::new();

    // Decline inspection, decline deletion
    let summary = ReviewDriver::new(
        &aggregation,
        scripted("n\nn\n"),
        NoBrowser,
        &mut output,
        trash.clone(),
    )
    .with_config(review_config(&tmp))
    .run();

    let shown = String::from_utf8(output).unwrap();
    assert!(shown.contains("60 files in common:"));
    assert!(shown.contains("photo_49.jpg"));
    assert!(!shown.contains("photo_50.jpg"));
    assert!(shown.contains("+10 more files"));

    assert_eq!(summary.dispatched_jobs, 0);
    assert_eq!(summary.count(ReviewState::Declined), 1);
    assert_eq!(summary.count(ReviewState::Skipped), 1);
    assert!(trash.calls.lock().unwrap().is_empty());
    assert!(!tmp.path().join("deletion_log.log").exists());
}

#[test]
fn test_confirmed_job_uses_full_uncapped_list() {
    let tmp = tempdir().unwrap();
    let aggregation = sixty_shared();
    let trash = Arc::new(RemovingTrash::default());

    let summary = ReviewDriver::new(
        &aggregation,
        scripted("n\ny\n1\n"),
        NoBrowser,
        Vec::new(),
        trash.clone(),
    )
    .with_config(review_config(&tmp))
    .run();

    assert_eq!(summary.dispatched_jobs, 1);
    assert_eq!(summary.pairs[0].target, Some(Side::First));
    assert_eq!(trash.calls.lock().unwrap().len(), 60);

    // Files under /x do not exist, so every attempt is logged as an error
    let log = fs::read_to_string(tmp.path().join("deletion_log.log")).unwrap();
    assert_eq!(log.lines().count(), 60);
    assert!(log
        .lines()
        .all(|l| l.contains(": Error while trying to delete /x/photo_")));
}

#[test]
fn test_each_unordered_pair_visited_once() {
    let tmp = tempdir().unwrap();
    let aggregation = aggregate(
        vec![
            CatalogEntry::new("a", "/p", None),
            CatalogEntry::new("a", "/q", None),
            CatalogEntry::new("a", "/r", None),
            CatalogEntry::new("b", "/p", None),
            CatalogEntry::new("b", "/q", None),
        ],
        MatchMode::NameOnly,
    );

    // Three unordered pairs, two questions each
    let summary = ReviewDriver::new(
        &aggregation,
        scripted("n\nn\nn\nn\nn\nn\n"),
        NoBrowser,
        Vec::new(),
        Arc::new(RemovingTrash::default()),
    )
    .with_config(review_config(&tmp))
    .run();

    let presented: Vec<(String, String)> = summary
        .pairs
        .iter()
        .filter(|p| p.state() != ReviewState::Skipped)
        .map(|p| {
            let mut pair = [p.first.clone(), p.second.clone()];
            pair.sort();
            (pair[0].clone(), pair[1].clone())
        })
        .collect();

    assert_eq!(presented.len(), 3);
    assert_eq!(summary.count(ReviewState::Skipped), 3);
    assert!(!summary.interrupted);

    // Highest overlap first
    assert_eq!(presented[0], ("/p".to_string(), "/q".to_string()));
}

#[test]
fn test_end_to_end_delete_from_real_tree() {
    let tmp = tempdir().unwrap();
    let photos = tmp.path().join("Photos");
    let backup = tmp.path().join("Backup");
    fs::create_dir_all(&photos).unwrap();
    fs::create_dir_all(&backup).unwrap();
    for name in ["one.jpg", "two.jpg"] {
        fs::write(photos.join(name), b"original").unwrap();
        fs::write(backup.join(name), b"copy").unwrap();
    }
    fs::write(backup.join("unique.jpg"), b"keep").unwrap();

    let catalog = CatalogBuilder::new(CatalogConfig::default())
        .build(&[photos.clone(), backup.clone()])
        .unwrap();
    let aggregation = aggregate(catalog.entries, MatchMode::NameOnly);

    // Ties sort by folded name, so the backup folder is side 1
    let summary = ReviewDriver::new(
        &aggregation,
        scripted("n\ny\n1\n"),
        NoBrowser,
        Vec::new(),
        Arc::new(RemovingTrash::default()),
    )
    .with_config(review_config(&tmp))
    .run();

    assert_eq!(summary.dispatched_jobs, 1);
    assert!(!backup.join("one.jpg").exists());
    assert!(!backup.join("two.jpg").exists());
    assert!(backup.join("unique.jpg").exists());
    assert!(photos.join("one.jpg").exists());
    assert!(photos.join("two.jpg").exists());

    let log = fs::read_to_string(tmp.path().join("deletion_log.log")).unwrap();
    assert_eq!(log.lines().filter(|l| l.contains(": Deleted ")).count(), 2);
}

#[test]
fn test_invalid_target_aborts_without_deleting() {
    let tmp = tempdir().unwrap();
    let aggregation = sixty_shared();
    let trash = Arc::new(RemovingTrash::default());

    let summary = ReviewDriver::new(
        &aggregation,
        scripted("n\nyes\nboth\n"),
        NoBrowser,
        Vec::new(),
        trash.clone(),
    )
    .with_config(review_config(&tmp))
    .run();

    assert_eq!(summary.count(ReviewState::Aborted), 1);
    assert_eq!(summary.dispatched_jobs, 0);
    assert!(trash.calls.lock().unwrap().is_empty());
}
