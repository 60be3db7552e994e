use clap::Parser;
use dirdupes::cli::Cli;
use dirdupes::error::ExitCode;
use dirdupes::output::SEPARATOR_WIDTH;
use std::fs;
use tempfile::tempdir;

fn cli(args: &[&str]) -> Cli {
    let mut argv = vec!["dirdupes", "--quiet"];
    argv.extend_from_slice(args);
    Cli::try_parse_from(argv).unwrap()
}

#[test]
fn test_run_writes_report() {
    let dir = tempdir().unwrap();
    let a = dir.path().join("a");
    let b = dir.path().join("b");
    fs::create_dir_all(&a).unwrap();
    fs::create_dir_all(&b).unwrap();
    fs::write(a.join("same.txt"), b"1").unwrap();
    fs::write(b.join("same.txt"), b"22").unwrap();
    fs::write(b.join("other.txt"), b"3").unwrap();
    let report = dir.path().join("report.txt");

    let code = dirdupes::run_app(cli(&[
        "--folders",
        a.to_str().unwrap(),
        b.to_str().unwrap(),
        "-o",
        report.to_str().unwrap(),
    ]))
    .unwrap();

    assert_eq!(code, ExitCode::Success);
    let content = fs::read_to_string(&report).unwrap();
    assert!(content.starts_with("same.txt\t"));
    assert!(content.contains(&"#".repeat(SEPARATOR_WIDTH)));
    assert!(!content.contains("other.txt"));
}

#[test]
fn test_run_check_size_finds_nothing() {
    let dir = tempdir().unwrap();
    let a = dir.path().join("a");
    let b = dir.path().join("b");
    fs::create_dir_all(&a).unwrap();
    fs::create_dir_all(&b).unwrap();
    fs::write(a.join("same.txt"), b"1").unwrap();
    fs::write(b.join("same.txt"), b"22").unwrap();
    let report = dir.path().join("report.txt");

    let code = dirdupes::run_app(cli(&[
        "--folders",
        a.to_str().unwrap(),
        b.to_str().unwrap(),
        "--check-size",
        "-o",
        report.to_str().unwrap(),
    ]))
    .unwrap();

    assert_eq!(code, ExitCode::NoDuplicates);
    assert_eq!(
        fs::read_to_string(&report).unwrap(),
        format!("{}\n", "#".repeat(SEPARATOR_WIDTH))
    );
}

#[test]
fn test_run_with_missing_folder_is_partial() {
    let dir = tempdir().unwrap();
    let a = dir.path().join("a");
    let b = dir.path().join("b");
    fs::create_dir_all(&a).unwrap();
    fs::create_dir_all(&b).unwrap();
    fs::write(a.join("x.txt"), b"1").unwrap();
    fs::write(b.join("x.txt"), b"1").unwrap();
    let missing = dir.path().join("missing");
    let report = dir.path().join("report.txt");

    let code = dirdupes::run_app(cli(&[
        "--folders",
        a.to_str().unwrap(),
        b.to_str().unwrap(),
        missing.to_str().unwrap(),
        "-o",
        report.to_str().unwrap(),
    ]))
    .unwrap();

    assert_eq!(code, ExitCode::PartialSuccess);
}

#[test]
fn test_run_without_readable_folders_fails() {
    let dir = tempdir().unwrap();
    let missing = dir.path().join("missing");
    let report = dir.path().join("report.txt");

    let err = dirdupes::run_app(cli(&[
        "--folders",
        missing.to_str().unwrap(),
        "-o",
        report.to_str().unwrap(),
    ]))
    .unwrap_err();

    assert_eq!(ExitCode::for_error(&err), ExitCode::GeneralError);
    assert!(format!("{err:#}").contains("No readable folders"));
    assert!(!report.exists());
}

#[test]
fn test_run_reads_config_file() {
    let dir = tempdir().unwrap();
    let a = dir.path().join("a");
    let b = dir.path().join("b");
    fs::create_dir_all(&a).unwrap();
    fs::create_dir_all(&b).unwrap();
    fs::write(a.join("x.JPG"), b"1").unwrap();
    fs::write(b.join("x.jpg"), b"1").unwrap();
    fs::write(a.join("y.txt"), b"1").unwrap();
    fs::write(b.join("y.txt"), b"1").unwrap();
    let report = dir.path().join("report.txt");
    let config = dir.path().join("dirdupes.toml");
    fs::write(
        &config,
        format!(
            "folders = [{:?}, {:?}]\nextensions = [\".JPG\"]\noutput_path = {:?}\n",
            a.to_str().unwrap(),
            b.to_str().unwrap(),
            report.to_str().unwrap()
        ),
    )
    .unwrap();

    let code = dirdupes::run_app(cli(&["--config", config.to_str().unwrap()])).unwrap();

    assert_eq!(code, ExitCode::Success);
    let content = fs::read_to_string(&report).unwrap();
    assert!(content.starts_with("x.jpg\t"));
    assert!(!content.contains("y.txt"));
}

#[test]
fn test_run_without_folders_fails() {
    let err = dirdupes::run_app(cli(&[])).unwrap_err();
    assert!(format!("{err:#}").contains("no folders to search"));
}
