/*!
 * Tests for file and folder utilities
 */

use std::path::{Path, PathBuf};
use anyhow::Result;
use ttml2srt::file_utils::FileManager;
use crate::common;

/// Test output path generation swaps the extension
#[test]
fn test_generateOutputPath_withTtmlInput_shouldSwapExtension() {
    let output =
        FileManager::generate_output_path("episode.01.ttml", "/subs", "srt");
    assert_eq!(output, PathBuf::from("/subs/episode.01.srt"));
}

/// Test TTML extension detection is case-insensitive
#[test]
fn test_hasTtmlExtension_withVariousCases_shouldMatchKnownExtensions() {
    assert!(FileManager::has_ttml_extension(Path::new("a.ttml")));
    assert!(FileManager::has_ttml_extension(Path::new("a.TTML")));
    assert!(FileManager::has_ttml_extension(Path::new("a.xml")));
    assert!(FileManager::has_ttml_extension(Path::new("a.dfxp")));
    assert!(!FileManager::has_ttml_extension(Path::new("a.srt")));
    assert!(!FileManager::has_ttml_extension(Path::new("ttml")));
}

/// Test content sniffing for TTML documents
#[test]
fn test_looksLikeTtml_withTtContent_shouldDetectDocument() {
    assert!(FileManager::looks_like_ttml("<tt xmlns=\"x\"></tt>"));
    assert!(FileManager::looks_like_ttml("<tt:tt xmlns:tt=\"x\"></tt:tt>"));
    assert!(!FileManager::looks_like_ttml("<html></html>"));
}

/// Test directory scanning finds nested TTML files
#[test]
fn test_findTtmlFiles_withNestedDirs_shouldFindAllDocuments() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let base = temp_dir.path().to_path_buf();

    common::create_test_ttml(&base, "one.ttml")?;
    common::create_test_file(&base, "ignore.srt", "1\n")?;

    let nested = base.join("nested");
    FileManager::ensure_dir(&nested)?;
    common::create_test_ttml(&nested, "two.xml")?;

    let found = FileManager::find_ttml_files(&base)?;
    assert_eq!(found.len(), 2);
    assert!(found.iter().any(|p| p.ends_with("one.ttml")));
    assert!(found.iter().any(|p| p.ends_with("two.xml")));
    Ok(())
}

/// Test existence checks distinguish files and directories
#[test]
fn test_existenceChecks_withFileAndDir_shouldDistinguish() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let base = temp_dir.path().to_path_buf();
    let file = common::create_test_ttml(&base, "a.ttml")?;

    assert!(FileManager::file_exists(&file));
    assert!(!FileManager::file_exists(&base));
    assert!(FileManager::dir_exists(&base));
    assert!(!FileManager::dir_exists(&file));
    Ok(())
}

/// Test ensure_dir creates missing parents
#[test]
fn test_ensureDir_withMissingParents_shouldCreateAll() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let deep = temp_dir.path().join("a/b/c");

    FileManager::ensure_dir(&deep)?;
    assert!(FileManager::dir_exists(&deep));

    // Re-running against an existing directory is a no-op
    FileManager::ensure_dir(&deep)?;
    Ok(())
}

/// Test reading a missing file reports the path
#[test]
fn test_readToString_withMissingFile_shouldFailWithPath() {
    let result = FileManager::read_to_string("/no/such/file.ttml");
    assert!(result.is_err());
    let message = format!("{:#}", result.unwrap_err());
    assert!(message.contains("file.ttml"));
}
