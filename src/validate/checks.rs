use std::collections::{BTreeSet, HashSet};
use std::fmt;
use std::path::Path;

use crate::model::library::REQUIRED_COLLECTIONS;
use crate::serialize::xml::{XmlElement, parse};

/// More nested `<video>` descendants than this under one video is a known crash pattern.
pub const MAX_NESTED_VIDEOS: usize = 10;
/// Deeper chains of `<video>` inside `<video>` than this are a known crash pattern.
pub const MAX_VIDEO_DEPTH: usize = 2;

/// External well-formedness check run against a written file.
pub trait WellFormednessChecker {
    /// `Ok(())` when the file parses as XML, otherwise a readable error.
    fn check(&self, path: &Path) -> Result<(), String>;
}

impl<F> WellFormednessChecker for F
where
    F: Fn(&Path) -> Result<(), String>,
{
    fn check(&self, path: &Path) -> Result<(), String> {
        self(path)
    }
}

/// Built-in checker backed by the `quick-xml` reader.
#[derive(Clone, Copy, Debug, Default)]
pub struct QuickXmlChecker;

impl WellFormednessChecker for QuickXmlChecker {
    fn check(&self, path: &Path) -> Result<(), String> {
        let xml = std::fs::read_to_string(path)
            .map_err(|e| format!("read '{}': {e}", path.display()))?;
        parse(&xml).map(|_| ())
    }
}

/// One failed post-write check.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ValidationIssue {
    /// The file does not parse, or its root is not `<fcpxml>`.
    Malformed(String),
    /// `ref`/`format` values with no declaration, in first-seen order.
    MissingReferences(Vec<String>),
    /// Resource ids declared more than once.
    DuplicateIds(Vec<String>),
    /// Required smart collections absent from the library.
    MissingCollections(Vec<String>),
    /// A top-level `<video>` whose nested videos exceed the crash limits.
    ExcessiveNesting {
        /// `ref` of the offending video.
        video: String,
        /// Number of `<video>` descendants.
        descendants: usize,
        /// Longest chain of `<video>` below it.
        depth: usize,
    },
}

impl fmt::Display for ValidationIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Malformed(msg) => write!(f, "malformed XML: {msg}"),
            Self::MissingReferences(ids) => write!(f, "missing references: {}", ids.join(", ")),
            Self::DuplicateIds(ids) => write!(f, "duplicate ids: {}", ids.join(", ")),
            Self::MissingCollections(names) => {
                write!(f, "missing smart collections: {}", names.join(", "))
            }
            Self::ExcessiveNesting {
                video,
                descendants,
                depth,
            } => write!(
                f,
                "video '{video}' nests {descendants} videos {depth} levels deep \
                 (limits {MAX_NESTED_VIDEOS} videos, {MAX_VIDEO_DEPTH} levels)"
            ),
        }
    }
}

/// Outcome of validating one file. The file is never modified.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ValidationReport {
    /// Every failed check.
    pub issues: Vec<ValidationIssue>,
}

impl ValidationReport {
    /// Whether every check passed.
    pub fn is_ok(&self) -> bool {
        self.issues.is_empty()
    }

    /// Human-readable summary of the failures.
    pub fn reason(&self) -> String {
        if self.is_ok() {
            return "all checks passed".to_owned();
        }
        self.issues
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join("; ")
    }

    fn malformed(msg: impl Into<String>) -> Self {
        Self {
            issues: vec![ValidationIssue::Malformed(msg.into())],
        }
    }
}

/// Validate the file at `path`: `checker` first, then the semantic checks.
#[tracing::instrument(skip(checker))]
pub fn validate_file(path: &Path, checker: &dyn WellFormednessChecker) -> ValidationReport {
    let report = match checker.check(path) {
        Err(msg) => ValidationReport::malformed(msg),
        Ok(()) => match std::fs::read_to_string(path) {
            Ok(xml) => validate_xml(&xml),
            Err(e) => ValidationReport::malformed(format!("read '{}': {e}", path.display())),
        },
    };
    for issue in &report.issues {
        tracing::warn!(%issue, "fcpxml check failed");
    }
    report
}

/// Parse `xml` and run the semantic checks.
pub fn validate_xml(xml: &str) -> ValidationReport {
    match parse(xml) {
        Ok(root) => check_tree(&root),
        Err(msg) => ValidationReport::malformed(msg),
    }
}

/// Run reference, duplicate, collection and nesting checks over a parsed tree.
pub fn check_tree(root: &XmlElement) -> ValidationReport {
    if root.name != "fcpxml" {
        return ValidationReport::malformed(format!(
            "root element is <{}>, expected <fcpxml>",
            root.name
        ));
    }

    let mut issues = Vec::new();
    let declared: Vec<&str> = root
        .first_child("resources")
        .into_iter()
        .flat_map(|r| r.children.iter())
        .filter_map(|c| c.get("id"))
        .collect();

    let missing = missing_references(root, &declared);
    if !missing.is_empty() {
        issues.push(ValidationIssue::MissingReferences(missing));
    }

    let dups = duplicates(&declared);
    if !dups.is_empty() {
        issues.push(ValidationIssue::DuplicateIds(dups));
    }

    let present: HashSet<&str> = root
        .first_child("library")
        .into_iter()
        .flat_map(|l| l.children_named("smart-collection"))
        .filter_map(|c| c.get("name"))
        .collect();
    let absent: Vec<String> = REQUIRED_COLLECTIONS
        .iter()
        .filter(|n| !present.contains(*n))
        .map(|n| (*n).to_owned())
        .collect();
    if !absent.is_empty() {
        issues.push(ValidationIssue::MissingCollections(absent));
    }

    check_nesting(root, &mut issues);
    ValidationReport { issues }
}

fn missing_references(root: &XmlElement, declared: &[&str]) -> Vec<String> {
    let resources: HashSet<&str> = declared.iter().copied().collect();
    let mut styles = HashSet::new();
    root.walk(&mut |el| {
        if el.name == "text-style-def" {
            if let Some(id) = el.get("id") {
                styles.insert(id);
            }
        }
    });

    let mut seen = HashSet::new();
    let mut missing = Vec::new();
    root.walk(&mut |el| {
        for (key, value) in &el.attrs {
            let known = match key.as_str() {
                "ref" if el.name == "text-style" => styles.contains(value.as_str()),
                "ref" | "format" => resources.contains(value.as_str()),
                _ => continue,
            };
            if !known && seen.insert(value.as_str()) {
                missing.push(value.clone());
            }
        }
    });
    missing
}

fn duplicates(ids: &[&str]) -> Vec<String> {
    let mut seen = HashSet::new();
    let dups: BTreeSet<&str> = ids.iter().copied().filter(|id| !seen.insert(*id)).collect();
    dups.into_iter().map(str::to_owned).collect()
}

/// Flag outermost videos only; their nested videos are covered by the counts.
fn check_nesting(el: &XmlElement, issues: &mut Vec<ValidationIssue>) {
    if el.name != "video" {
        for c in &el.children {
            check_nesting(c, issues);
        }
        return;
    }
    let (descendants, depth) = video_stats(el);
    if descendants > MAX_NESTED_VIDEOS || depth > MAX_VIDEO_DEPTH {
        issues.push(ValidationIssue::ExcessiveNesting {
            video: el.get("ref").unwrap_or("?").to_owned(),
            descendants,
            depth,
        });
    }
}

/// `(video descendants, longest video chain)` below `el`.
fn video_stats(el: &XmlElement) -> (usize, usize) {
    el.children.iter().fold((0, 0), |(count, depth), c| {
        let (n, d) = video_stats(c);
        if c.name == "video" {
            (count + n + 1, depth.max(d + 1))
        } else {
            (count + n, depth.max(d))
        }
    })
}

#[cfg(test)]
#[path = "../../tests/unit/validate/checks.rs"]
mod tests;
