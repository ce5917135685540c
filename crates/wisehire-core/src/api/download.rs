use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use regex::Regex;
use reqwest::header::{HeaderMap, CONTENT_DISPOSITION, CONTENT_TYPE};

/// A binary response: headers plus the raw body.
#[derive(Debug, Clone)]
pub struct Download {
    pub headers: HeaderMap,
    pub body: Vec<u8>,
}

impl Download {
    /// Filename announced by the `Content-Disposition` header, if any.
    pub fn filename(&self) -> Option<String> {
        self.headers
            .get(CONTENT_DISPOSITION)
            .and_then(|v| v.to_str().ok())
            .and_then(filename_from_disposition)
    }

    pub fn content_type(&self) -> Option<&str> {
        self.headers.get(CONTENT_TYPE).and_then(|v| v.to_str().ok())
    }

    /// Write the body into `dir` under the announced filename, or `fallback`.
    ///
    /// Only the final path component of the announced name is used, so a
    /// hostile header cannot escape `dir`.
    pub fn save_to(&self, dir: &Path, fallback: &str) -> std::io::Result<PathBuf> {
        let name = self
            .filename()
            .and_then(|name| {
                Path::new(&name)
                    .file_name()
                    .map(|n| n.to_string_lossy().into_owned())
            })
            .unwrap_or_else(|| fallback.to_string());
        std::fs::create_dir_all(dir)?;
        let path = dir.join(name);
        std::fs::write(&path, &self.body)?;
        Ok(path)
    }
}

fn disposition_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r#"(?i)filename[^;=\n]*=\s*(?:"([^"]*)"|'([^']*)'|([^;\n]*))"#).unwrap()
    })
}

/// Extract the `filename=` parameter (quoted or unquoted) from a
/// `Content-Disposition` value.
pub fn filename_from_disposition(value: &str) -> Option<String> {
    let captures = disposition_pattern().captures(value)?;
    let raw = captures
        .get(1)
        .or_else(|| captures.get(2))
        .or_else(|| captures.get(3))?
        .as_str();
    let name: String = raw.trim().chars().filter(|c| *c != '"' && *c != '\'').collect();
    if name.is_empty() {
        None
    } else {
        Some(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::header::HeaderValue;

    #[test]
    fn test_filename_quoted_and_unquoted() {
        assert_eq!(
            filename_from_disposition(r#"attachment; filename="weekly_activity_2024-03-05.pdf""#).as_deref(),
            Some("weekly_activity_2024-03-05.pdf")
        );
        assert_eq!(
            filename_from_disposition("attachment; filename=report.pdf").as_deref(),
            Some("report.pdf")
        );
        assert_eq!(
            filename_from_disposition("attachment; filename=report.pdf; size=120").as_deref(),
            Some("report.pdf")
        );
        assert_eq!(
            filename_from_disposition("attachment; filename='monthly.pdf'").as_deref(),
            Some("monthly.pdf")
        );
    }

    #[test]
    fn test_filename_missing() {
        assert_eq!(filename_from_disposition("attachment"), None);
        assert_eq!(filename_from_disposition(r#"attachment; filename="""#), None);
    }

    #[test]
    fn test_save_uses_announced_name_without_directories() {
        let dir = tempfile::tempdir().unwrap();
        let mut headers = HeaderMap::new();
        headers.insert(
            CONTENT_DISPOSITION,
            HeaderValue::from_static(r#"attachment; filename="../../etc/report.pdf""#),
        );
        let download = Download {
            headers,
            body: b"%PDF-1.4".to_vec(),
        };

        let path = download.save_to(dir.path(), "fallback.pdf").unwrap();
        assert_eq!(path, dir.path().join("report.pdf"));
        assert_eq!(std::fs::read(&path).unwrap(), b"%PDF-1.4");
    }

    #[test]
    fn test_save_falls_back_without_header() {
        let dir = tempfile::tempdir().unwrap();
        let download = Download {
            headers: HeaderMap::new(),
            body: vec![1, 2, 3],
        };
        let path = download.save_to(dir.path(), "report_3_weekly_activity.pdf").unwrap();
        assert_eq!(path, dir.path().join("report_3_weekly_activity.pdf"));
    }
}
