use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::ModelError;

/// A dotted Java/AIDL-style qualified name, e.g. `android.os.IInterface` or
/// `com.example.Outer.Inner`.
///
/// Trailing `*` denotes a package wildcard (`com.example.*`); callers that
/// need to tell the two apart should check [`QName::is_wildcard`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct QName(String);

impl QName {
    pub fn new(raw: impl Into<String>) -> Result<QName, ModelError> {
        let raw = raw.into();
        if raw.is_empty() {
            return Err(ModelError::EmptyQName);
        }
        Ok(QName(raw))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_wildcard(&self) -> bool {
        self.0.ends_with(".*") || self.0 == "*"
    }

    /// Split into segments on `.`.
    pub fn segments(&self) -> impl Iterator<Item = &str> {
        self.0.split('.')
    }

    /// The last segment (simple class/package name), or the wildcard `*`.
    pub fn simple_name(&self) -> &str {
        self.0.rsplit('.').next().unwrap_or(&self.0)
    }

    /// Everything before the last segment, if any.
    pub fn package(&self) -> Option<&str> {
        self.0.rsplit_once('.').map(|(pkg, _)| pkg)
    }

    /// Append a segment, producing `self.segment`.
    pub fn join(&self, segment: &str) -> QName {
        QName(format!("{}.{}", self.0, segment))
    }

    /// Number of leading segments whose first character is uppercase.
    ///
    /// Used by the loader to tell a class-qualified name (`pkg.Outer.Inner`)
    /// apart from a plain package name (`pkg.sub`).
    pub fn leading_uppercase_segments(&self) -> usize {
        self.segments()
            .filter(|s| s.chars().next().is_some_and(|c| c.is_uppercase()))
            .count()
    }
}

impl fmt::Display for QName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for QName {
    type Error = ModelError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        QName::new(value)
    }
}

impl TryFrom<&str> for QName {
    type Error = ModelError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        QName::new(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_package_and_simple_name() {
        let q = QName::new("android.os.IInterface").unwrap();
        assert_eq!(q.simple_name(), "IInterface");
        assert_eq!(q.package(), Some("android.os"));
    }

    #[test]
    fn detects_wildcard() {
        let q = QName::new("com.example.*").unwrap();
        assert!(q.is_wildcard());
        assert_eq!(q.simple_name(), "*");
    }

    #[test]
    fn counts_leading_uppercase_segments() {
        let q = QName::new("com.example.Outer.Inner").unwrap();
        assert_eq!(q.leading_uppercase_segments(), 2);
    }

    #[test]
    fn rejects_empty() {
        assert!(matches!(QName::new(""), Err(ModelError::EmptyQName)));
    }
}
