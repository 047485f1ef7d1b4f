use std::path::{Path, PathBuf};

use super::schema::RESERVED_LINES;
use super::unquote;
use crate::libs::error::Error;

/// One `key=value` assignment, with its 1-based line number.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigEntry {
    pub line: usize,
    pub key: String,
    pub value: String,
}

/// A parsed pbalign config file.
///
/// Comments (`#...`), blank lines and reserved argument names are dropped; every other line
/// must be exactly one `key=value`. Keys lose their leading dashes, values lose one layer of
/// surrounding quotes. Keys are not checked against the schema here.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigFile {
    path: PathBuf,
    entries: Vec<ConfigEntry>,
}

impl ConfigFile {
    pub fn load(path: impl AsRef<Path>) -> Result<Self, Error> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|e| Error::ConfigParse {
            path: path.to_path_buf(),
            reason: format!("could not open config file: {}", e),
        })?;
        Self::parse(path, &text)
    }

    /// Parses config text; `path` is only used in diagnostics.
    pub fn parse(path: impl AsRef<Path>, text: &str) -> Result<Self, Error> {
        let path = path.as_ref();
        let mut entries = vec![];

        for (idx, raw) in text.lines().enumerate() {
            let line = raw.trim();
            if line.is_empty() || line.starts_with('#') || RESERVED_LINES.contains(&line) {
                continue;
            }

            let mut parts = line.split('=');
            let (k, v) = match (parts.next(), parts.next(), parts.next()) {
                (Some(k), Some(v), None) => (k, v),
                _ => {
                    return Err(Error::config(
                        path,
                        idx + 1,
                        format!("could not find a single '=' when parsing `{}`", line),
                    ))
                }
            };

            let key = k.trim().trim_start_matches('-').trim();
            if key.is_empty() {
                return Err(Error::config(path, idx + 1, format!("empty key in `{}`", line)));
            }

            entries.push(ConfigEntry {
                line: idx + 1,
                key: key.to_string(),
                value: unquote(v.trim()).to_string(),
            });
        }

        Ok(Self {
            path: path.to_path_buf(),
            entries,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn entries(&self) -> &[ConfigEntry] {
        &self.entries
    }

    /// The value of the last assignment to `key`.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries
            .iter()
            .rev()
            .find(|e| e.key == key)
            .map(|e| e.value.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn skips_comments_blanks_and_reserved() {
        let text = r###"
# a comment
--verbose
-vv
    --keepTmpFiles
--maxHits = 20
minAccuracy=80
"###;
        let cfg = ConfigFile::parse("test.config", text).unwrap();
        assert_eq!(cfg.entries().len(), 2);
        assert_eq!(cfg.entries()[0].key, "maxHits");
        assert_eq!(cfg.entries()[0].value, "20");
        assert_eq!(cfg.entries()[0].line, 6);
        assert_eq!(cfg.get("minAccuracy"), Some("80"));
    }

    #[test]
    fn strips_one_layer_of_quotes() {
        let cfg = ConfigFile::parse(
            "test.config",
            "algorithmOptions = '\"-z 3\"'\ntmpDir=\"/tmp/pb\"\n",
        )
        .unwrap();
        assert_eq!(cfg.get("algorithmOptions"), Some("\"-z 3\""));
        assert_eq!(cfg.get("tmpDir"), Some("/tmp/pb"));
    }

    #[test]
    fn missing_equals_is_fatal() {
        let err = ConfigFile::parse("bad.config", "maxHits=10\nminLength 50\n").unwrap_err();
        match err {
            Error::ConfigParse { reason, .. } => {
                assert!(reason.starts_with("line 2:"), "{}", reason);
                assert!(reason.contains("minLength 50"));
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn two_equals_is_fatal() {
        let err = ConfigFile::parse("bad.config", "algorithmOptions=-bestn=1\n").unwrap_err();
        assert!(matches!(err, Error::ConfigParse { .. }));
    }

    #[test]
    fn unreadable_file() {
        let err = ConfigFile::load("tests/pbalign/does-not-exist.config").unwrap_err();
        assert!(err.to_string().contains("could not open config file"));
    }

    #[test]
    fn last_assignment_wins() {
        let cfg = ConfigFile::parse("test.config", "nproc=4\nnproc=12\n").unwrap();
        assert_eq!(cfg.get("nproc"), Some("12"));
    }
}
