//! Display recent log entries.

use anyhow::anyhow;
use bandscope::logging::get_log_dir;
use std::fs;
use std::path::{Path, PathBuf};

const DEFAULT_LINES: usize = 50;

/// Shows the last `lines` entries of the most recent log file.
///
/// # Errors
/// - If the log directory cannot be determined or read
/// - If the log file cannot be read
pub fn handle_logs(lines: Option<usize>) -> Result<(), anyhow::Error> {
    let log_dir = get_log_dir()?;
    let Some(log_file) = find_latest_log(&log_dir)? else {
        println!("No log files found in: {}", log_dir.display());
        return Ok(());
    };

    let content = fs::read_to_string(&log_file)
        .map_err(|e| anyhow!("Failed to read log file: {e}"))?;

    let tail = tail_lines(&content, lines.unwrap_or(DEFAULT_LINES));
    println!("Log file: {}", log_file.display());
    println!();
    for line in tail {
        println!("{line}");
    }

    Ok(())
}

/// The last `count` lines of `content`.
fn tail_lines(content: &str, count: usize) -> Vec<&str> {
    let lines: Vec<&str> = content.lines().collect();
    let start = lines.len().saturating_sub(count);
    lines[start..].to_vec()
}

/// Finds the most recently modified bandscope log file.
fn find_latest_log(log_dir: &Path) -> Result<Option<PathBuf>, anyhow::Error> {
    let entries =
        fs::read_dir(log_dir).map_err(|e| anyhow!("Failed to read log directory: {e}"))?;

    let latest = entries
        .filter_map(|entry| {
            let path = entry.ok()?.path();
            let is_log = path
                .file_name()
                .and_then(|n| n.to_str())
                .is_some_and(|n| n.starts_with("bandscope.log"));
            if !is_log {
                return None;
            }
            let modified = fs::metadata(&path).ok()?.modified().ok()?;
            Some((path, modified))
        })
        .max_by_key(|(_, modified)| *modified)
        .map(|(path, _)| path);

    Ok(latest)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tail_lines() {
        let content = "a\nb\nc\nd";
        assert_eq!(tail_lines(content, 2), vec!["c", "d"]);
        assert_eq!(tail_lines(content, 10), vec!["a", "b", "c", "d"]);
        assert!(tail_lines("", 5).is_empty());
    }

    #[test]
    fn test_find_latest_log_ignores_other_files() {
        let dir = std::env::temp_dir().join(format!("bandscope_logcmd_{}", std::process::id()));
        fs::create_dir_all(&dir).unwrap();
        assert_eq!(find_latest_log(&dir).unwrap(), None);

        fs::write(dir.join("unrelated.txt"), "x").unwrap();
        fs::write(dir.join("bandscope.log.2026-10-19"), "entry").unwrap();
        let latest = find_latest_log(&dir).unwrap().unwrap();
        assert!(latest.ends_with("bandscope.log.2026-10-19"));

        fs::remove_dir_all(dir).ok();
    }
}
