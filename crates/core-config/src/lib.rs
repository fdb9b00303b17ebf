//! Configuration loading and parsing.
//!
//! Parses `minivim.toml` (or an override path supplied by the binary). Every
//! table and key is optional; unknown fields are ignored so the file can grow
//! without breaking older builds.
//!
//! ```toml
//! [view]
//! line_numbers = true
//!
//! [scroll]
//! lines = 1
//!
//! [log]
//! filter = "info"
//! ```
//!
//! A missing file yields defaults. A malformed file also yields defaults and
//! records the parse failure on the returned `Config`; the binary reports it
//! with `log_deferred` once logging is up, since the config is read before the
//! subscriber exists. Configuration problems never stop the viewer from opening.

use anyhow::Result;
use serde::Deserialize;
use std::{fs, path::PathBuf};
use tracing::{info, warn};

pub const CONFIG_FILE_NAME: &str = "minivim.toml";

#[derive(Debug, Deserialize, Clone)]
pub struct ViewConfig {
    #[serde(default = "ViewConfig::default_line_numbers")]
    pub line_numbers: bool,
}

impl Default for ViewConfig {
    fn default() -> Self {
        Self {
            line_numbers: Self::default_line_numbers(),
        }
    }
}

impl ViewConfig {
    const fn default_line_numbers() -> bool {
        true
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct ScrollConfig {
    /// Lines moved per scroll key press.
    #[serde(default = "ScrollConfig::default_lines")]
    pub lines: u16,
}

impl Default for ScrollConfig {
    fn default() -> Self {
        Self {
            lines: Self::default_lines(),
        }
    }
}

impl ScrollConfig {
    const fn default_lines() -> u16 {
        1
    }
}

#[derive(Debug, Deserialize, Default, Clone)]
pub struct LogConfig {
    /// `EnvFilter` directive used when `RUST_LOG` is unset.
    #[serde(default)]
    pub filter: Option<String>,
}

#[derive(Debug, Deserialize, Default, Clone)]
pub struct ConfigFile {
    #[serde(default)]
    pub view: ViewConfig,
    #[serde(default)]
    pub scroll: ScrollConfig,
    #[serde(default)]
    pub log: LogConfig,
}

/// A config file that existed but did not parse.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseFailure {
    pub path: PathBuf,
    pub message: String,
}

#[derive(Debug, Clone, Default)]
pub struct Config {
    pub raw: Option<String>, // original file string (optional)
    pub file: ConfigFile,    // parsed (or default) data
    pub parse_failure: Option<ParseFailure>,
}

/// Best-effort config path: `./minivim.toml` first, then the platform config dir.
pub fn discover() -> PathBuf {
    let local = PathBuf::from(CONFIG_FILE_NAME);
    if local.exists() {
        return local;
    }
    if let Some(dir) = dirs::config_dir() {
        return dir.join("minivim").join(CONFIG_FILE_NAME);
    }
    local
}

pub fn load_from(path: Option<PathBuf>) -> Result<Config> {
    let path = path.unwrap_or_else(discover);
    let Ok(content) = fs::read_to_string(&path) else {
        return Ok(Config::default());
    };
    match toml::from_str::<ConfigFile>(&content) {
        Ok(file) => {
            info!(target: "config", path = %path.display(), "config_loaded");
            Ok(Config {
                raw: Some(content),
                file,
                parse_failure: None,
            })
        }
        Err(e) => Ok(Config {
            parse_failure: Some(ParseFailure {
                path,
                message: e.to_string(),
            }),
            ..Config::default()
        }),
    }
}

/// Scroll step clamped into `[1, body_rows]`.
pub fn clamp_scroll_lines(raw: u16, body_rows: u16) -> u16 {
    let max = body_rows.max(1);
    let clamped = raw.clamp(1, max);
    if clamped != raw {
        info!(
            target: "config",
            raw,
            clamped,
            body_rows,
            "scroll_lines_clamped"
        );
    }
    clamped
}

impl Config {
    /// Emit diagnostics collected while loading, before logging existed.
    pub fn log_deferred(&self) {
        if let Some(failure) = &self.parse_failure {
            warn!(
                target: "config",
                path = %failure.path.display(),
                error = %failure.message,
                "config_parse_failed"
            );
        }
    }

    /// Configured scroll step, before clamping to the terminal height.
    pub fn scroll_lines(&self) -> u16 {
        self.file.scroll.lines
    }

    pub fn line_numbers(&self) -> bool {
        self.file.view.line_numbers
    }

    pub fn log_filter(&self) -> Option<&str> {
        self.file.log.filter.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use std::path::PathBuf;
    use std::sync::{Arc, Mutex, MutexGuard};
    use tracing::Level;
    use tracing::subscriber::with_default;
    use tracing_subscriber::fmt::MakeWriter;

    #[derive(Clone)]
    struct BufferWriter {
        inner: Arc<Mutex<Vec<u8>>>,
    }

    impl BufferWriter {
        fn new() -> (Self, Arc<Mutex<Vec<u8>>>) {
            let buf = Arc::new(Mutex::new(Vec::new()));
            (Self { inner: buf.clone() }, buf)
        }
    }

    struct LockedWriter<'a> {
        guard: MutexGuard<'a, Vec<u8>>,
    }

    impl<'a> Write for LockedWriter<'a> {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.guard.extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    impl<'a> MakeWriter<'a> for BufferWriter {
        type Writer = LockedWriter<'a>;

        fn make_writer(&'a self) -> Self::Writer {
            LockedWriter {
                guard: self.inner.lock().expect("log buffer poisoned"),
            }
        }
    }

    fn capture<F: FnOnce()>(f: F) -> String {
        let (writer, buffer) = BufferWriter::new();
        let subscriber = tracing_subscriber::fmt()
            .with_max_level(Level::INFO)
            .with_target(true)
            .with_ansi(false)
            .without_time()
            .with_writer(writer)
            .finish();
        with_default(subscriber, f);
        let bytes = buffer.lock().unwrap().clone();
        String::from_utf8(bytes).unwrap()
    }

    #[test]
    fn default_config_when_missing_file() {
        let cfg = load_from(Some(PathBuf::from("__nonexistent_hopefully__.toml"))).unwrap();
        assert!(cfg.raw.is_none());
        assert!(cfg.parse_failure.is_none());
        assert!(cfg.line_numbers());
        assert_eq!(cfg.file.scroll.lines, 1);
        assert_eq!(cfg.log_filter(), None);
    }

    #[test]
    fn parses_all_tables() {
        let tmp = tempfile::NamedTempFile::new().unwrap();
        std::fs::write(
            tmp.path(),
            "[view]\nline_numbers = false\n[scroll]\nlines = 3\n[log]\nfilter = \"debug\"\n",
        )
        .unwrap();
        let cfg = load_from(Some(tmp.path().to_path_buf())).unwrap();
        assert!(cfg.raw.is_some());
        assert!(!cfg.line_numbers());
        assert_eq!(cfg.file.scroll.lines, 3);
        assert_eq!(cfg.log_filter(), Some("debug"));
    }

    #[test]
    fn partial_file_keeps_other_defaults() {
        let tmp = tempfile::NamedTempFile::new().unwrap();
        std::fs::write(tmp.path(), "[scroll]\nlines = 2\nunknown = 7\n").unwrap();
        let cfg = load_from(Some(tmp.path().to_path_buf())).unwrap();
        assert!(cfg.line_numbers());
        assert_eq!(cfg.file.scroll.lines, 2);
    }

    #[test]
    fn malformed_file_falls_back_and_warns() {
        let tmp = tempfile::NamedTempFile::new().unwrap();
        std::fs::write(tmp.path(), "[view\nline_numbers = ").unwrap();
        let mut loaded = None;
        // Nothing is logged at load time; the failure is carried on the config.
        let load_output = capture(|| {
            loaded = Some(load_from(Some(tmp.path().to_path_buf())).unwrap());
        });
        assert!(load_output.is_empty());
        let cfg = loaded.unwrap();
        assert!(cfg.raw.is_none());
        assert!(cfg.line_numbers());
        let failure = cfg.parse_failure.clone().unwrap();
        assert_eq!(failure.path, tmp.path());
        assert!(!failure.message.is_empty());

        let log_output = capture(|| cfg.log_deferred());
        assert!(log_output.contains("WARN config:"));
        assert!(log_output.contains("config_parse_failed"));
    }

    #[test]
    fn scroll_lines_clamped_into_body_rows() {
        let tmp = tempfile::NamedTempFile::new().unwrap();
        std::fs::write(tmp.path(), "[scroll]\nlines = 50\n").unwrap();
        let cfg = load_from(Some(tmp.path().to_path_buf())).unwrap();
        assert_eq!(cfg.scroll_lines(), 50);
        assert_eq!(clamp_scroll_lines(cfg.scroll_lines(), 10), 10);
        assert_eq!(clamp_scroll_lines(cfg.scroll_lines(), 80), 50);
    }

    #[test]
    fn zero_scroll_lines_become_one() {
        let tmp = tempfile::NamedTempFile::new().unwrap();
        std::fs::write(tmp.path(), "[scroll]\nlines = 0\n").unwrap();
        let cfg = load_from(Some(tmp.path().to_path_buf())).unwrap();
        assert_eq!(clamp_scroll_lines(cfg.scroll_lines(), 20), 1);
    }

    #[test]
    fn clamp_logging_uses_config_target() {
        let mut eff = 0;
        let log_output = capture(|| {
            eff = clamp_scroll_lines(8, 5);
        });
        assert_eq!(eff, 5);
        assert!(log_output.contains("INFO config:"));
        assert!(log_output.contains("scroll_lines_clamped"));
    }
}
