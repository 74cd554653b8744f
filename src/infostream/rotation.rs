//! Rotated log file discovery.

use std::path::{Path, PathBuf};

/// Find `base`, `base.1`, `base.2`, ... and return them oldest first.
///
/// Rotation keeps the current log at `base` and moves older ones to ever
/// higher suffixes, so the highest existing suffix is the oldest file.
/// Discovery stops at the first missing suffix. `base` is always included.
pub fn find_log_files<P: AsRef<Path>>(base: P) -> Vec<PathBuf> {
    let base = base.as_ref();
    let mut files = vec![base.to_path_buf()];

    for suffix in 1.. {
        let mut name = base.as_os_str().to_os_string();
        name.push(format!(".{suffix}"));
        let candidate = PathBuf::from(name);
        if !candidate.is_file() {
            break;
        }
        files.push(candidate);
    }

    files.reverse();
    files
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_rotated_files_oldest_first() {
        let dir = TempDir::new().unwrap();
        let base = dir.path().join("infostream.log");
        for name in ["infostream.log", "infostream.log.1", "infostream.log.2"] {
            fs::write(dir.path().join(name), "").unwrap();
        }

        let files = find_log_files(&base);
        assert_eq!(
            files,
            vec![
                dir.path().join("infostream.log.2"),
                dir.path().join("infostream.log.1"),
                base,
            ]
        );
    }

    #[test]
    fn test_gap_stops_discovery() {
        let dir = TempDir::new().unwrap();
        let base = dir.path().join("log");
        fs::write(&base, "").unwrap();
        fs::write(dir.path().join("log.2"), "").unwrap();

        assert_eq!(find_log_files(&base), vec![base]);
    }

    #[test]
    fn test_missing_base_is_still_listed() {
        let dir = TempDir::new().unwrap();
        let base = dir.path().join("absent");
        assert_eq!(find_log_files(&base), vec![base]);
    }
}
