//! Architectural Enforcement Integration Tests
//!
//! This package contains tests that enforce architectural principles:
//! - The core crate never depends on a UI framework
//! - No blocking sleep() calls in production code
//! - No unwrap() in production code of the core
//!
//! These tests are designed to catch violations early in the development cycle.

use std::fs;
use std::path::{Path, PathBuf};

use walkdir::WalkDir;

/// Root of the workspace
pub fn workspace_root() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("..")
        .join("..")
}

/// A line that broke a rule
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Violation {
    /// File, relative to the workspace root
    pub file: PathBuf,
    /// 1-based line number
    pub line: usize,
    /// Offending text
    pub text: String,
}

/// Production source of every `.rs` file under `dir`
///
/// Everything from the first `#[cfg(test)]` on is dropped, as are comment
/// lines, so test modules and docs may mention what production code may not.
pub fn production_lines(dir: &Path) -> Vec<(PathBuf, usize, String)> {
    let root = workspace_root();
    WalkDir::new(dir)
        .into_iter()
        .filter_map(Result::ok)
        .filter(|e| e.file_type().is_file())
        .filter(|e| e.path().extension().is_some_and(|ext| ext == "rs"))
        .flat_map(|entry| {
            let path = entry.path().to_path_buf();
            let relative = path.strip_prefix(&root).unwrap_or(&path).to_path_buf();
            let source = fs::read_to_string(&path).unwrap_or_default();
            source
                .lines()
                .take_while(|line| !line.trim_start().starts_with("#[cfg(test)]"))
                .enumerate()
                .filter(|(_, line)| !line.trim_start().starts_with("//"))
                .map(|(i, line)| (relative.clone(), i + 1, line.to_string()))
                .collect::<Vec<_>>()
        })
        .collect()
}

/// Lines under `dir` containing any of `needles`
pub fn find_violations(dir: &Path, needles: &[&str]) -> Vec<Violation> {
    production_lines(dir)
        .into_iter()
        .filter(|(_, _, text)| needles.iter().any(|n| text.contains(n)))
        .map(|(file, line, text)| Violation {
            file,
            line,
            text: text.trim().to_string(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn core_src() -> PathBuf {
        workspace_root().join("conductor").join("core").join("src")
    }

    fn tui_src() -> PathBuf {
        workspace_root().join("tui").join("src")
    }

    #[test]
    fn core_sources_are_found() {
        let lines = production_lines(&core_src());
        assert!(
            lines.iter().any(|(file, _, _)| file.ends_with("conductor.rs")),
            "walker did not find the core sources"
        );
    }

    #[test]
    fn core_has_no_ui_dependencies() {
        let violations = find_violations(
            &core_src(),
            &["ratatui::", "use ratatui", "crossterm::", "use crossterm", "image::"],
        );
        assert!(violations.is_empty(), "UI imports in core: {violations:#?}");

        let manifest = fs::read_to_string(workspace_root().join("conductor/core/Cargo.toml"))
            .unwrap_or_default();
        for forbidden in ["ratatui", "crossterm", "image"] {
            assert!(
                !manifest
                    .lines()
                    .any(|l| l.trim_start().starts_with(forbidden)),
                "core manifest depends on {forbidden}"
            );
        }
    }

    #[test]
    fn no_blocking_sleep_in_production() {
        for dir in [core_src(), tui_src()] {
            let violations = find_violations(&dir, &["std::thread::sleep", "thread::sleep("]);
            assert!(violations.is_empty(), "blocking sleep: {violations:#?}");
        }
    }

    #[test]
    fn no_unwrap_in_core_production() {
        let violations = find_violations(&core_src(), &[".unwrap()"]);
        assert!(violations.is_empty(), "unwrap in core: {violations:#?}");
    }

    #[test]
    fn needles_in_comments_are_ignored() {
        let dir = std::env::temp_dir().join(format!("arch-enforce-{}", std::process::id()));
        fs::create_dir_all(&dir).expect("create temp dir");
        fs::write(
            dir.join("sample.rs"),
            "// uses ratatui:: in docs only\nfn f() {}\n#[cfg(test)]\nmod tests { use ratatui::x; }\n",
        )
        .expect("write sample");

        let violations = find_violations(&dir, &["ratatui::"]);
        let _ = fs::remove_dir_all(&dir);
        assert!(violations.is_empty());
    }
}
