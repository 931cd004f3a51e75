//! Offline coverage audit of the overlay consumers.
//!
//! Overlays consume the backing file independently; nothing in the live
//! write path knows which of them actually reference which keys. This module
//! answers that question after the fact: given the consumer documents, it
//! reports per consumer whether the shared file is loaded at all and which
//! schema keys appear, plus a per-key count across all consumers — the keys
//! with a count of zero are the dead weight in the controller.
//!
//! The audit is diagnostic only. It never mutates anything and it runs
//! entirely off the live write path.

use std::fmt;
use std::path::Path;

use regex::Regex;
use walkdir::WalkDir;

use crate::error::SyncError;
use crate::schema::SCHEMA;
use crate::store::{SETTINGS_DIR, SETTINGS_FILE};

/// Directory the consumer documents live in, relative to the install root.
pub const CONSUMER_DIR: &str = "Overlays";

/// Findings for one consumer document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConsumerReport {
    pub name: String,
    /// Whether the document references the shared settings file at all.
    pub loads_settings: bool,
    /// Schema keys mentioned in the document, in schema order.
    pub keys: Vec<&'static str>,
}

/// Full audit output: one entry per consumer, schema-ordered coverage counts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuditReport {
    pub consumers: Vec<ConsumerReport>,
}

impl AuditReport {
    /// Per-key count of consumers referencing the key, in schema order.
    pub fn coverage(&self) -> Vec<(&'static str, usize)> {
        SCHEMA
            .iter()
            .map(|spec| {
                let count = self
                    .consumers
                    .iter()
                    .filter(|c| c.keys.contains(&spec.name))
                    .count();
                (spec.name, count)
            })
            .collect()
    }
}

impl fmt::Display for AuditReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "=== Overlay Settings Audit ===")?;
        for consumer in &self.consumers {
            writeln!(f, "{}", consumer.name)?;
            writeln!(
                f,
                "  loads settings.js: {}",
                if consumer.loads_settings { "YES" } else { "NO" }
            )?;
            writeln!(f, "  controlled keys referenced: {}", consumer.keys.len())?;
            if consumer.keys.is_empty() {
                writeln!(f, "  keys: (none)")?;
            } else {
                writeln!(f, "  keys: {}", consumer.keys.join(", "))?;
            }
            writeln!(f)?;
        }
        writeln!(
            f,
            "=== Controller Key Coverage (count of overlays referencing key) ==="
        )?;
        for (key, count) in self.coverage() {
            writeln!(f, "{key}: {count}")?;
        }
        Ok(())
    }
}

/// Whether `text` references the shared settings file.
///
/// Consumers address the file relative to their own location, so both the
/// same-directory and one-level-up relative forms count.
fn references_settings(text: &str) -> bool {
    let same_dir = format!("{SETTINGS_DIR}/{SETTINGS_FILE}");
    let one_up = format!("../{SETTINGS_DIR}/{SETTINGS_FILE}");
    text.contains(same_dir.as_str()) || text.contains(one_up.as_str())
}

/// Audit a set of `(name, text)` consumer documents against the schema.
///
/// Key references are word-boundary matches on the raw key name, not the
/// namespaced assignment form — consumers read keys through whatever access
/// idiom their scripts use.
pub fn audit(consumers: &[(String, String)]) -> AuditReport {
    let key_patterns: Vec<(usize, Regex)> = SCHEMA
        .iter()
        .enumerate()
        .map(|(idx, spec)| {
            let pattern = format!(r"\b{}\b", regex::escape(spec.name));
            (idx, Regex::new(&pattern).expect("key pattern is valid"))
        })
        .collect();

    let consumers = consumers
        .iter()
        .map(|(name, text)| {
            let keys: Vec<&'static str> = key_patterns
                .iter()
                .filter(|(_, re)| re.is_match(text))
                .map(|(idx, _)| SCHEMA[*idx].name)
                .collect();
            ConsumerReport {
                name: name.clone(),
                loads_settings: references_settings(text),
                keys,
            }
        })
        .collect();

    AuditReport { consumers }
}

/// Collect the consumer documents under `dir`: every `.html` file, sorted by
/// file name. A missing directory yields an empty set, not an error.
pub fn scan_consumers(dir: &Path) -> Result<Vec<(String, String)>, SyncError> {
    if !dir.is_dir() {
        return Ok(Vec::new());
    }

    let mut docs = Vec::new();
    for entry in WalkDir::new(dir).min_depth(1).max_depth(1) {
        let entry = entry.map_err(|e| SyncError::Scan {
            dir: dir.to_path_buf(),
            source: e,
        })?;
        let path = entry.path();
        if path.extension().is_none_or(|ext| ext != "html") {
            continue;
        }
        let name = entry.file_name().to_string_lossy().into_owned();
        // Consumers are hand-edited HTML and not always valid UTF-8; the
        // path and key tokens we search for are ASCII, so lossy decoding
        // never loses a match.
        let bytes = std::fs::read(path).map_err(|e| SyncError::Read {
            path: path.to_path_buf(),
            source: e,
        })?;
        docs.push((name, String::from_utf8_lossy(&bytes).into_owned()));
    }

    docs.sort_by(|a, b| a.0.cmp(&b.0));
    Ok(docs)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn doc(name: &str, text: &str) -> (String, String) {
        (name.to_string(), text.to_string())
    }

    #[test]
    fn detects_settings_reference_same_dir() {
        let report = audit(&[doc("a.html", r#"<script src="Settings/settings.js">"#)]);
        assert!(report.consumers[0].loads_settings);
    }

    #[test]
    fn detects_settings_reference_one_level_up() {
        let report = audit(&[doc("a.html", r#"<script src="../Settings/settings.js">"#)]);
        assert!(report.consumers[0].loads_settings);
    }

    #[test]
    fn no_settings_reference() {
        let report = audit(&[doc("a.html", "<html><body>static</body></html>")]);
        assert!(!report.consumers[0].loads_settings);
    }

    #[test]
    fn key_reference_requires_word_boundary() {
        let report = audit(&[doc(
            "a.html",
            "uses MY_GLOSSY_INTENSITY_EXTENDED but not the real key",
        )]);
        assert!(report.consumers[0].keys.is_empty());

        let report = audit(&[doc("b.html", "const g = window.GLOSSY_INTENSITY;")]);
        assert_eq!(report.consumers[0].keys, vec!["GLOSSY_INTENSITY"]);
    }

    #[test]
    fn key_found_in_non_assignment_idiom() {
        // Consumers may read via destructuring or bracket access.
        let report = audit(&[doc("a.html", r#"const hue = window["GLOBAL_HUE_OFFSET"];"#)]);
        assert_eq!(report.consumers[0].keys, vec!["GLOBAL_HUE_OFFSET"]);
    }

    #[test]
    fn spec_coverage_example() {
        // The canonical acceptance case: a consumer with the settings path
        // and one key token is reported on both axes.
        let report = audit(&[
            doc(
                "glossy.html",
                "src=\"Settings/settings.js\" ... GLOSSY_INTENSITY ...",
            ),
            doc("plain.html", "nothing relevant"),
        ]);

        let glossy = &report.consumers[0];
        assert!(glossy.loads_settings);
        assert!(glossy.keys.contains(&"GLOSSY_INTENSITY"));

        let coverage = report.coverage();
        let (_, count) = coverage
            .iter()
            .find(|(key, _)| *key == "GLOSSY_INTENSITY")
            .unwrap();
        assert_eq!(*count, 1);
    }

    #[test]
    fn coverage_counts_across_consumers() {
        let report = audit(&[
            doc("a.html", "GLOW_KICK_DOCK GLOBAL_HUE_OFFSET"),
            doc("b.html", "GLOBAL_HUE_OFFSET"),
            doc("c.html", "unrelated"),
        ]);
        let coverage = report.coverage();
        let count_of = |key: &str| {
            coverage
                .iter()
                .find(|(k, _)| *k == key)
                .map(|(_, c)| *c)
                .unwrap()
        };
        assert_eq!(count_of("GLOBAL_HUE_OFFSET"), 2);
        assert_eq!(count_of("GLOW_KICK_DOCK"), 1);
        assert_eq!(count_of("STAR_SPEED"), 0);
    }

    #[test]
    fn keys_reported_in_schema_order() {
        let report = audit(&[doc(
            "a.html",
            "STAR_SPEED then GLOBAL_HUE_OFFSET out of order",
        )]);
        assert_eq!(
            report.consumers[0].keys,
            vec!["GLOBAL_HUE_OFFSET", "STAR_SPEED"]
        );
    }

    #[test]
    fn display_renders_both_sections() {
        let report = audit(&[doc(
            "dock.html",
            "Settings/settings.js GLOW_KICK_DOCK",
        )]);
        let rendered = report.to_string();
        assert!(rendered.contains("=== Overlay Settings Audit ==="));
        assert!(rendered.contains("dock.html"));
        assert!(rendered.contains("loads settings.js: YES"));
        assert!(rendered.contains("keys: GLOW_KICK_DOCK"));
        assert!(rendered.contains("=== Controller Key Coverage"));
        assert!(rendered.contains("GLOW_KICK_DOCK: 1"));
    }

    #[test]
    fn display_empty_keys_shows_none() {
        let report = audit(&[doc("a.html", "nothing")]);
        assert!(report.to_string().contains("keys: (none)"));
    }

    #[test]
    fn scan_collects_html_sorted() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("b.html"), "bee").unwrap();
        fs::write(dir.path().join("a.html"), "ay").unwrap();
        fs::write(dir.path().join("notes.txt"), "skip me").unwrap();

        let docs = scan_consumers(dir.path()).unwrap();
        let names: Vec<&str> = docs.iter().map(|(n, _)| n.as_str()).collect();
        assert_eq!(names, vec!["a.html", "b.html"]);
    }

    #[test]
    fn scan_missing_directory_is_empty() {
        let dir = TempDir::new().unwrap();
        let docs = scan_consumers(&dir.path().join("nope")).unwrap();
        assert!(docs.is_empty());
    }

    #[test]
    fn scan_tolerates_non_utf8_consumer() {
        let dir = TempDir::new().unwrap();
        fs::write(
            dir.path().join("good.html"),
            "src=\"Settings/settings.js\" GLOSSY_INTENSITY",
        )
        .unwrap();
        // Latin-1 e-acute, invalid as UTF-8. The key token around it must
        // still be found.
        fs::write(
            dir.path().join("bad.html"),
            b"caf\xe9 GLOBAL_HUE_OFFSET".as_slice(),
        )
        .unwrap();

        let docs = scan_consumers(dir.path()).unwrap();
        let names: Vec<&str> = docs.iter().map(|(n, _)| n.as_str()).collect();
        assert_eq!(names, vec!["bad.html", "good.html"]);

        let report = audit(&docs);
        assert_eq!(report.consumers[0].keys, vec!["GLOBAL_HUE_OFFSET"]);
        assert!(report.consumers[1].loads_settings);
    }

    #[test]
    fn scan_ignores_subdirectories() {
        let dir = TempDir::new().unwrap();
        fs::create_dir(dir.path().join("nested")).unwrap();
        fs::write(dir.path().join("nested").join("deep.html"), "x").unwrap();
        fs::write(dir.path().join("top.html"), "y").unwrap();

        let docs = scan_consumers(dir.path()).unwrap();
        assert_eq!(docs.len(), 1);
        assert_eq!(docs[0].0, "top.html");
    }
}
