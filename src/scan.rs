//! Directory traversal feeding the classifier and the aggregate.

use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};

use glob::Pattern;
use log::{debug, warn};

use crate::aggregate::Aggregate;
use crate::classify::{classify, read_lines, FileStats};
use crate::error::{ScanError, SkipReason};
use crate::language::{resolve_path, LanguageSyntax};
use crate::metrics::PerformanceMetrics;

/// Directory names never descended into unless the caller replaces the set.
pub const DEFAULT_EXCLUDED_DIRS: [&str; 4] = ["venv", ".git", "__pycache__", "node_modules"];

#[derive(Debug, Clone)]
pub struct ScanConfig {
    pub root: PathBuf,
    /// Directory names (not paths) skipped below the root.
    pub excluded_dirs: BTreeSet<String>,
    pub max_entries: usize,
    pub max_depth: usize,
    pub non_recursive: bool,
    pub filespec: Option<String>,
    pub verbose: bool,
}

impl ScanConfig {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        ScanConfig {
            root: root.into(),
            excluded_dirs: DEFAULT_EXCLUDED_DIRS.iter().map(|d| d.to_string()).collect(),
            max_entries: 1_000_000,
            max_depth: 100,
            non_recursive: false,
            filespec: None,
            verbose: false,
        }
    }

    pub fn exclude<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.excluded_dirs.extend(names.into_iter().map(Into::into));
        self
    }

    fn is_excluded(&self, dir: &Path) -> bool {
        dir.file_name()
            .and_then(|name| name.to_str())
            .map(|name| self.excluded_dirs.contains(name))
            .unwrap_or(false)
    }
}

#[derive(Debug, Default)]
pub struct ScanOutcome {
    pub aggregate: Aggregate,
    /// Supported files that could not be read or decoded.
    pub unreadable_files: usize,
    /// Directory, entry and metadata failures plus depth-limit hits.
    pub traversal_errors: usize,
}

impl ScanOutcome {
    pub fn warning_count(&self) -> usize {
        self.unreadable_files + self.traversal_errors
    }
}

/// Read, resolve and classify one file.
pub fn analyze_file(path: &Path) -> Result<(&'static LanguageSyntax, FileStats), SkipReason> {
    let syntax = resolve_path(path).ok_or_else(|| SkipReason::UnsupportedExtension {
        path: path.to_path_buf(),
    })?;
    let lines = read_lines(path)?;
    Ok((syntax, classify(&lines, syntax)))
}

fn filespec_matches(pattern: &Pattern, root_path: &Path, file_path: &Path) -> bool {
    if file_path
        .file_name()
        .and_then(|name| name.to_str())
        .map(|name| pattern.matches(name))
        .unwrap_or(false)
    {
        return true;
    }

    let relative = match file_path.strip_prefix(root_path) {
        Ok(rel) => rel,
        Err(_) => return false,
    };

    match relative.to_str() {
        Some(s) => pattern.matches(&s.replace('\\', "/")),
        None => false,
    }
}

struct Scanner<'a> {
    config: &'a ScanConfig,
    root: PathBuf,
    filespec: Option<Pattern>,
    metrics: &'a mut PerformanceMetrics,
    outcome: ScanOutcome,
    entries_count: usize,
}

impl Scanner<'_> {
    fn process_file(&mut self, file_path: &Path) -> Result<(), ScanError> {
        if let Some(pattern) = &self.filespec {
            if !filespec_matches(pattern, &self.root, file_path) {
                return Ok(());
            }
        }

        self.entries_count += 1;
        if self.entries_count > self.config.max_entries {
            return Err(ScanError::TooManyEntries(self.config.max_entries));
        }

        match analyze_file(file_path) {
            Ok((syntax, stats)) => {
                self.metrics.update(stats.total);
                self.outcome.aggregate.fold(syntax.name, stats);
                if self.config.verbose {
                    println!("File: {} ({})", file_path.display(), syntax.name);
                    println!("  Total lines: {}", stats.total);
                    println!("  Empty lines: {}", stats.empty);
                    println!("  Comment lines: {}", stats.comment);
                    println!("  Code lines: {}", stats.code);
                    println!();
                }
            }
            Err(reason) => {
                self.metrics.record_skip(&reason);
                if reason.is_failure() {
                    self.outcome.unreadable_files += 1;
                }
                debug!("skipping {reason}");
            }
        }
        Ok(())
    }

    fn scan_dir(&mut self, path: &Path, current_depth: usize) -> Result<(), ScanError> {
        if current_depth > self.config.max_depth {
            warn!(
                "Maximum directory depth ({}) reached at {}",
                self.config.max_depth,
                path.display()
            );
            self.outcome.traversal_errors += 1;
            return Ok(());
        }

        let read_dir = match fs::read_dir(path) {
            Ok(iter) => iter,
            Err(err) => {
                warn!("Error reading directory {}: {}", path.display(), err);
                self.outcome.traversal_errors += 1;
                return Ok(());
            }
        };

        // Sorted so that verbose output and entry limits are deterministic.
        let mut entries = Vec::new();
        for entry_result in read_dir {
            match entry_result {
                Ok(entry) => entries.push(entry),
                Err(err) => {
                    warn!("Error reading entry in {}: {}", path.display(), err);
                    self.outcome.traversal_errors += 1;
                }
            }
        }
        entries.sort_by_key(|entry| entry.file_name());

        for entry in entries {
            let entry_path = entry.path();
            let file_type = match entry.file_type() {
                Ok(ft) => ft,
                Err(err) => {
                    warn!("Error reading type for {}: {}", entry_path.display(), err);
                    self.outcome.traversal_errors += 1;
                    continue;
                }
            };

            if file_type.is_dir() {
                if self.config.non_recursive || self.config.is_excluded(&entry_path) {
                    continue;
                }
                self.scan_dir(&entry_path, current_depth + 1)?;
            } else if file_type.is_file() {
                self.process_file(&entry_path)?;
            } else if file_type.is_symlink() {
                // Linked files are counted; linked directories are not followed.
                if fs::metadata(&entry_path).map(|m| m.is_file()).unwrap_or(false) {
                    self.process_file(&entry_path)?;
                }
            }
        }
        Ok(())
    }
}

/// Walk `config.root` and fold every supported file into an aggregate.
///
/// Per-file failures are counted and skipped. Only a missing root, a bad
/// filespec or exceeding `max_entries` end the scan with an error.
pub fn scan(config: &ScanConfig, metrics: &mut PerformanceMetrics) -> Result<ScanOutcome, ScanError> {
    let filespec = match config.filespec.as_deref() {
        Some(spec) => Some(Pattern::new(spec).map_err(|source| ScanError::InvalidFilespec {
            spec: spec.to_string(),
            source,
        })?),
        None => None,
    };

    let metadata = fs::metadata(&config.root).map_err(|err| {
        if err.kind() == std::io::ErrorKind::NotFound {
            ScanError::PathNotFound(config.root.clone())
        } else {
            ScanError::Io(err)
        }
    })?;

    let root = fs::canonicalize(&config.root).unwrap_or_else(|_| config.root.clone());
    let mut scanner = Scanner {
        config,
        root: root.clone(),
        filespec,
        metrics,
        outcome: ScanOutcome::default(),
        entries_count: 0,
    };

    if metadata.is_file() {
        scanner.process_file(&root)?;
    } else if metadata.is_dir() {
        scanner.scan_dir(&root, 0)?;
    }
    Ok(scanner.outcome)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;
    use tempfile::TempDir;

    fn write_file(path: &Path, contents: &[u8]) {
        if let Some(dir) = path.parent() {
            fs::create_dir_all(dir).expect("create parent dirs");
        }
        fs::write(path, contents).expect("write test file");
    }

    fn quiet_metrics() -> PerformanceMetrics {
        PerformanceMetrics::with_writer(Box::new(io::sink()), false)
    }

    fn run(config: &ScanConfig) -> ScanOutcome {
        scan(config, &mut quiet_metrics()).expect("scan succeeds")
    }

    #[test]
    fn test_scan_counts_supported_files_per_language() {
        let temp_dir = TempDir::new().expect("temp dir");
        let root = temp_dir.path();
        write_file(&root.join("a.py"), b"# hi\n\nx=1\n");
        write_file(&root.join("pkg/b.py"), b"import os\n");
        write_file(&root.join("src/main.c"), b"/* a\nb */\nint main;\n");
        write_file(&root.join("README.md"), b"# title\n");

        let outcome = run(&ScanConfig::new(root));
        let python = outcome.aggregate.get("Python").expect("python row");
        assert_eq!(python.files, 2);
        assert_eq!(python.total, 4);
        assert_eq!(python.code, 2);
        let c = outcome.aggregate.get("C/C++").expect("c row");
        assert_eq!((c.files, c.comment, c.code), (1, 2, 1));
        assert_eq!(outcome.aggregate.iter().count(), 2);
        assert_eq!(outcome.warning_count(), 0);
    }

    #[test]
    fn test_default_exclusions_are_skipped() {
        let temp_dir = TempDir::new().expect("temp dir");
        let root = temp_dir.path();
        write_file(&root.join("keep.js"), b"let a;\n");
        for dir in DEFAULT_EXCLUDED_DIRS {
            write_file(&root.join(dir).join("skip.js"), b"let b;\n");
        }
        write_file(&root.join("nested/node_modules/deep.js"), b"let c;\n");

        let outcome = run(&ScanConfig::new(root));
        let js = outcome.aggregate.get("JavaScript").expect("js row");
        assert_eq!(js.files, 1);
        assert_eq!(js.code, 1);
    }

    #[test]
    fn test_extra_exclusions_extend_defaults() {
        let temp_dir = TempDir::new().expect("temp dir");
        let root = temp_dir.path();
        write_file(&root.join("a.java"), b"class A {}\n");
        write_file(&root.join("generated/b.java"), b"class B {}\n");
        write_file(&root.join(".git/c.java"), b"class C {}\n");

        let outcome = run(&ScanConfig::new(root).exclude(["generated"]));
        assert_eq!(outcome.aggregate.get("Java").map(|s| s.files), Some(1));
    }

    #[test]
    fn test_root_named_like_exclusion_is_still_scanned() {
        let temp_dir = TempDir::new().expect("temp dir");
        let root = temp_dir.path().join("venv");
        write_file(&root.join("tool.py"), b"print(1)\n");

        let outcome = run(&ScanConfig::new(&root));
        assert_eq!(outcome.aggregate.get("Python").map(|s| s.files), Some(1));
    }

    #[test]
    fn test_unsupported_and_undecodable_files_contribute_nothing() {
        let temp_dir = TempDir::new().expect("temp dir");
        let root = temp_dir.path();
        write_file(&root.join("notes.txt"), b"plain\n");
        write_file(&root.join("bad.ts"), b"let a = 1;\n\xff\xfe\n");
        write_file(&root.join("good.ts"), b"// ok\n");

        let mut metrics = quiet_metrics();
        let outcome = scan(&ScanConfig::new(root), &mut metrics).expect("scan succeeds");
        assert_eq!((metrics.files_unsupported, metrics.files_unreadable), (1, 1));
        let ts = outcome.aggregate.get("TypeScript").expect("ts row");
        assert_eq!((ts.files, ts.total, ts.comment), (1, 1, 1));
        assert_eq!(outcome.unreadable_files, 1);
        assert!(outcome.aggregate.iter().all(|(name, _)| name == "TypeScript"));
    }

    #[test]
    fn test_non_recursive_only_reads_root() {
        let temp_dir = TempDir::new().expect("temp dir");
        let root = temp_dir.path();
        write_file(&root.join("top.sol"), b"contract A {}\n");
        write_file(&root.join("sub/inner.sol"), b"contract B {}\n");

        let mut config = ScanConfig::new(root);
        config.non_recursive = true;
        let outcome = run(&config);
        assert_eq!(outcome.aggregate.get("Solidity").map(|s| s.files), Some(1));
    }

    #[test]
    fn test_max_depth_counts_a_warning() {
        let temp_dir = TempDir::new().expect("temp dir");
        let root = temp_dir.path();
        write_file(&root.join("a.py"), b"x\n");
        write_file(&root.join("one/two/deep.py"), b"y\n");

        let mut config = ScanConfig::new(root);
        config.max_depth = 1;
        let outcome = run(&config);
        assert_eq!(outcome.aggregate.get("Python").map(|s| s.files), Some(1));
        assert_eq!(outcome.traversal_errors, 1);
    }

    #[test]
    fn test_filespec_matches_name_or_relative_path() {
        let temp_dir = TempDir::new().expect("temp dir");
        let root = temp_dir.path();
        write_file(&root.join("a.py"), b"x\n");
        write_file(&root.join("b.js"), b"y\n");
        write_file(&root.join("lib/c.js"), b"z\n");

        let mut config = ScanConfig::new(root);
        config.filespec = Some("*.js".to_string());
        let outcome = run(&config);
        assert!(outcome.aggregate.get("Python").is_none());
        assert_eq!(outcome.aggregate.get("JavaScript").map(|s| s.files), Some(2));

        config.filespec = Some("lib/*".to_string());
        let outcome = run(&config);
        assert_eq!(outcome.aggregate.get("JavaScript").map(|s| s.files), Some(1));
    }

    #[test]
    fn test_invalid_filespec_is_an_error() {
        let temp_dir = TempDir::new().expect("temp dir");
        let mut config = ScanConfig::new(temp_dir.path());
        config.filespec = Some("[".to_string());
        let err = scan(&config, &mut quiet_metrics()).expect_err("bad glob");
        assert!(matches!(err, ScanError::InvalidFilespec { .. }));
    }

    #[test]
    fn test_missing_root_is_an_error() {
        let temp_dir = TempDir::new().expect("temp dir");
        let config = ScanConfig::new(temp_dir.path().join("nope"));
        let err = scan(&config, &mut quiet_metrics()).expect_err("missing root");
        assert!(matches!(err, ScanError::PathNotFound(_)));
    }

    #[test]
    fn test_max_entries_aborts_scan() {
        let temp_dir = TempDir::new().expect("temp dir");
        let root = temp_dir.path();
        for name in ["a.py", "b.py", "c.py"] {
            write_file(&root.join(name), b"x\n");
        }
        let mut config = ScanConfig::new(root);
        config.max_entries = 2;
        let err = scan(&config, &mut quiet_metrics()).expect_err("limit exceeded");
        assert!(matches!(err, ScanError::TooManyEntries(2)));
    }

    #[test]
    fn test_single_file_root() {
        let temp_dir = TempDir::new().expect("temp dir");
        let file = temp_dir.path().join("App.vue");
        write_file(&file, b"<template>\n<div/>\n</template>\n");

        let mut metrics = quiet_metrics();
        let outcome = scan(&ScanConfig::new(&file), &mut metrics).expect("scan");
        let vue = outcome.aggregate.get("Vue").expect("vue row");
        assert_eq!((vue.files, vue.total, vue.code), (1, 3, 1));
        assert_eq!(metrics.files_processed, 1);
        assert_eq!(metrics.lines_processed, 3);
    }

    #[test]
    fn test_analyze_file_reports_unsupported() {
        let temp_dir = TempDir::new().expect("temp dir");
        let file = temp_dir.path().join("main.rs");
        write_file(&file, b"fn main() {}\n");
        let err = analyze_file(&file).expect_err("rust is not registered");
        assert!(!err.is_failure());
    }
}
