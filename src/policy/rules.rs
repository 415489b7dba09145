//! Protected route table.
//!
//! # Responsibilities
//! - Compile the ordered set of protected path rules at startup
//! - Classify a request path against the table
//!
//! # Design Decisions
//! - Rules are tagged so denials can be attributed to a surface
//! - Table is immutable after construction (shared via Arc, no locks)
//! - Only the path component is inspected, never query or body
//! - Paths are normalized before matching: empty and `.` segments are
//!   dropped, `..` removes the previous segment, trailing slashes go away
//! - Matching is case-sensitive
//! - Both the raw and the percent-decoded path are checked, so `%2F` cannot
//!   hide an item path from the classifier

use std::borrow::Cow;
use std::fmt;

use regex::Regex;

/// Administrative surface a protected rule belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProtectedSurface {
    /// `/api/collections` (create collection).
    CollectionRoot,
    /// `/api/collections/{id}` (update or delete one collection).
    CollectionItem,
    /// `/api/collections/{import,export,truncate}/...`.
    CollectionBulk,
    /// `/api/settings`.
    Settings,
    /// `/api/admins/...`.
    Admins,
    /// `/api/logs/...`.
    Logs,
}

impl ProtectedSurface {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProtectedSurface::CollectionRoot => "collection_root",
            ProtectedSurface::CollectionItem => "collection_item",
            ProtectedSurface::CollectionBulk => "collection_bulk",
            ProtectedSurface::Settings => "settings",
            ProtectedSurface::Admins => "admins",
            ProtectedSurface::Logs => "logs",
        }
    }
}

impl fmt::Display for ProtectedSurface {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Built-in rules, in evaluation order. Patterns apply to a normalized path.
pub const BUILTIN_RULES: &[(ProtectedSurface, &str)] = &[
    (ProtectedSurface::CollectionRoot, r"^/api/collections$"),
    (ProtectedSurface::CollectionItem, r"^/api/collections/[^/]+$"),
    (ProtectedSurface::CollectionBulk, r"^/api/collections/(import|export|truncate)(/|$)"),
    (ProtectedSurface::Settings, r"^/api/settings$"),
    (ProtectedSurface::Admins, r"^/api/admins(/|$)"),
    (ProtectedSurface::Logs, r"^/api/logs(/|$)"),
];

/// A single compiled rule.
#[derive(Debug, Clone)]
pub struct ProtectedRoute {
    surface: ProtectedSurface,
    pattern: Regex,
}

impl ProtectedRoute {
    pub fn surface(&self) -> ProtectedSurface {
        self.surface
    }

    pub fn pattern(&self) -> &str {
        self.pattern.as_str()
    }

    fn matches(&self, path: &str) -> bool {
        self.pattern.is_match(path)
    }
}

/// Ordered, immutable table of protected routes.
#[derive(Debug, Clone)]
pub struct ProtectedRoutes {
    rules: Vec<ProtectedRoute>,
}

impl ProtectedRoutes {
    /// Compile the built-in administrative surfaces.
    pub fn builtin() -> Result<Self, regex::Error> {
        Self::compile(BUILTIN_RULES)
    }

    /// Compile an arbitrary ordered rule list.
    pub fn compile(rules: &[(ProtectedSurface, &str)]) -> Result<Self, regex::Error> {
        let rules = rules
            .iter()
            .map(|(surface, pattern)| {
                Ok(ProtectedRoute {
                    surface: *surface,
                    pattern: Regex::new(pattern)?,
                })
            })
            .collect::<Result<Vec<_>, regex::Error>>()?;
        Ok(Self { rules })
    }

    /// Return the surface of the first rule matching `path`, if any.
    pub fn classify(&self, path: &str) -> Option<ProtectedSurface> {
        path_forms(path)
            .iter()
            .find_map(|form| self.first_match(form))
    }

    /// Whether `path` targets any protected surface.
    pub fn is_protected(&self, path: &str) -> bool {
        self.classify(path).is_some()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ProtectedRoute> {
        self.rules.iter()
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    fn first_match(&self, path: &str) -> Option<ProtectedSurface> {
        self.rules
            .iter()
            .find(|rule| rule.matches(path))
            .map(|rule| rule.surface)
    }
}

/// Normalized forms of `path` a rule is matched against: the raw path and,
/// when it carries escapes, the percent-decoded path.
pub(crate) fn path_forms(path: &str) -> Vec<String> {
    let raw = normalize(path);
    // Undecodable input (invalid UTF-8 escapes) is judged on the raw form only.
    if let Ok(Cow::Owned(decoded)) = urlencoding::decode(path) {
        let decoded = normalize(&decoded);
        if decoded != raw {
            return vec![raw, decoded];
        }
    }
    vec![raw]
}

/// Collapse empty and `.` segments, resolve `..`, drop trailing slashes.
fn normalize(path: &str) -> String {
    let mut segments: Vec<&str> = Vec::new();
    for segment in path.split('/') {
        match segment {
            "" | "." => {}
            ".." => {
                segments.pop();
            }
            segment => segments.push(segment),
        }
    }
    format!("/{}", segments.join("/"))
}
