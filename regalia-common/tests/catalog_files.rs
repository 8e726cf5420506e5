//! Translation catalogs assembled from several files on disk

use std::fs;

use regalia_common::{Catalog, ErrorSeverity, Severity, Translator};
use tempfile::TempDir;
use test_log::test;

fn write(dir: &TempDir, name: &str, content: &str) -> std::path::PathBuf {
    let path = dir.path().join(name);
    fs::write(&path, content).unwrap();
    path
}

#[test]
fn test_later_files_override_earlier_keys() {
    let dir = TempDir::new().unwrap();
    let base = write(
        &dir,
        "en.yml",
        "en:\n  link:\n    edit: Edit\n    delete: Delete\n  list:\n    empty: No entries\n",
    );
    let custom = write(&dir, "custom.yml", "en:\n  link:\n    edit: Change\n");

    let mut catalog = Catalog::new("en");
    assert_eq!(catalog.load_file(&base).unwrap(), 3);
    assert_eq!(catalog.load_file(&custom).unwrap(), 1);

    assert_eq!(catalog.lookup("link.edit").as_deref(), Some("Change"));
    assert_eq!(catalog.lookup("link.delete").as_deref(), Some("Delete"));
    assert_eq!(catalog.lookup("list.empty").as_deref(), Some("No entries"));
}

#[test]
fn test_regional_locale_falls_back_per_key() {
    let dir = TempDir::new().unwrap();
    let files = [
        write(&dir, "en.yml", "en:\n  link:\n    edit: Edit\n    show: Show\n"),
        write(&dir, "de.yml", "de:\n  link:\n    edit: Bearbeiten\n"),
        write(&dir, "de-CH.yml", "de-CH:\n  link:\n    show: Aazeige\n"),
    ];

    let mut catalog = Catalog::new("en").with_locale("de-CH");
    for file in &files {
        catalog.load_file(file).unwrap();
    }

    assert_eq!(catalog.locale(), "de-CH");
    assert_eq!(catalog.lookup("link.show").as_deref(), Some("Aazeige"));
    assert_eq!(catalog.lookup("link.edit").as_deref(), Some("Bearbeiten"));
    assert_eq!(catalog.lookup("link.copy"), None);
}

#[test]
fn test_missing_files_warn_and_broken_files_are_critical() {
    let dir = TempDir::new().unwrap();
    let mut catalog = Catalog::new("en");

    let missing = catalog.load_file(dir.path().join("missing.yml")).unwrap_err();
    assert_eq!(missing.severity(), ErrorSeverity::Warning);

    let broken = write(&dir, "broken.yml", "en: [unclosed\n");
    let err = catalog.load_file(&broken).unwrap_err();
    assert_eq!(err.severity(), ErrorSeverity::Critical);
    assert!(!err.is_argument());
}
