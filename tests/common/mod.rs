//! Test fixture utilities for integration tests.

// Each test binary uses a different subset of these helpers
#![allow(dead_code)]

pub mod harness;

use std::path::{Path, PathBuf};

/// Returns the path to the fixtures directory.
pub fn fixtures_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
}

/// Returns the source directory of a fixture site by name.
pub fn fixture_site(name: &str) -> PathBuf {
    fixtures_dir().join(name).join("src")
}

/// Copies a fixture site's source tree into `dest/src` so exports never
/// write into the repository.
///
/// # Panics
///
/// Panics if any file cannot be copied.
pub fn copy_fixture_site(name: &str, dest: &Path) -> PathBuf {
    let src = fixture_site(name);
    let target = dest.join("src");
    copy_dir(&src, &target);
    target
}

fn copy_dir(from: &Path, to: &Path) {
    std::fs::create_dir_all(to)
        .unwrap_or_else(|e| panic!("Failed to create {}: {}", to.display(), e));
    let entries = std::fs::read_dir(from)
        .unwrap_or_else(|e| panic!("Failed to read fixture {}: {}", from.display(), e));
    for entry in entries {
        let entry = entry.expect("Failed to read fixture entry");
        let path = entry.path();
        let target = to.join(entry.file_name());
        if path.is_dir() {
            copy_dir(&path, &target);
        } else {
            std::fs::copy(&path, &target)
                .unwrap_or_else(|e| panic!("Failed to copy {}: {}", path.display(), e));
        }
    }
}
