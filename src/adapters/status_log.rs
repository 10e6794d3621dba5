use crate::domain::ports::StatusLog;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::PathBuf;
use std::sync::Mutex;

#[derive(Debug, Clone, Default)]
pub struct TracingStatusLog;

impl StatusLog for TracingStatusLog {
    fn record(&self, line: &str) {
        tracing::info!("{}", line);
    }
}

/// Appends `YYYY-MM-DD HH:MM:SS <line>` to a file and forwards the line to
/// tracing. Write failures are logged and otherwise ignored.
#[derive(Debug)]
pub struct FileStatusLog {
    path: PathBuf,
    write_lock: Mutex<()>,
}

impl FileStatusLog {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: Mutex::new(()),
        }
    }

    fn append(&self, line: &str) -> std::io::Result<()> {
        let _guard = self.write_lock.lock().unwrap_or_else(|e| e.into_inner());
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;
        let timestamp = chrono::Local::now().format("%Y-%m-%d %H:%M:%S");
        writeln!(file, "{} {}", timestamp, line)
    }
}

impl StatusLog for FileStatusLog {
    fn record(&self, line: &str) {
        tracing::info!("{}", line);
        if let Err(e) = self.append(line) {
            tracing::warn!("Could not append to {}: {}", self.path.display(), e);
        }
    }
}

/// Either sink, chosen at startup.
#[derive(Debug)]
pub enum AnyStatusLog {
    Tracing(TracingStatusLog),
    File(FileStatusLog),
}

impl AnyStatusLog {
    pub fn from_path(path: Option<PathBuf>) -> Self {
        match path {
            Some(path) => AnyStatusLog::File(FileStatusLog::new(path)),
            None => AnyStatusLog::Tracing(TracingStatusLog),
        }
    }
}

impl StatusLog for AnyStatusLog {
    fn record(&self, line: &str) {
        match self {
            AnyStatusLog::Tracing(log) => log.record(line),
            AnyStatusLog::File(log) => log.record(line),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_file_log_appends_timestamped_lines() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("portal-autologin.log");
        let log = FileStatusLog::new(path.clone());

        log.record("[*] Internet already working. No login needed.");
        log.record("[+] Logged in successfully!");

        let content = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].ends_with(" [*] Internet already working. No login needed."));
        // "YYYY-MM-DD HH:MM:SS " prefix
        assert_eq!(lines[1].find(" [+]"), Some(19));
    }

    #[test]
    fn test_unwritable_path_does_not_panic() {
        let temp_dir = TempDir::new().unwrap();
        let log = FileStatusLog::new(temp_dir.path().join("missing-dir").join("x.log"));
        log.record("still fine");
    }

    #[test]
    fn test_any_status_log_selects_sink() {
        assert!(matches!(AnyStatusLog::from_path(None), AnyStatusLog::Tracing(_)));
        assert!(matches!(
            AnyStatusLog::from_path(Some(PathBuf::from("a.log"))),
            AnyStatusLog::File(_)
        ));
    }
}
