//! Dotted locations inside a configuration tree.

use std::fmt;

/// Ordered field-name segments locating a value inside a configuration
/// object. Used for error attribution only.
///
/// Each segment renders with a leading `.`, so the root keypath renders as
/// the empty string and the root field `name` renders as `.name`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct Keypath {
    segments: Vec<String>,
}

impl Keypath {
    /// The keypath of the configuration root.
    pub const fn root() -> Self {
        Self {
            segments: Vec::new(),
        }
    }

    /// Keypath of the field `name` beneath this one.
    #[must_use]
    pub fn child(&self, name: &str) -> Self {
        let mut segments = Vec::with_capacity(self.segments.len() + 1);
        segments.extend(self.segments.iter().cloned());
        segments.push(name.to_string());
        Self { segments }
    }

    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    pub fn is_root(&self) -> bool {
        self.segments.is_empty()
    }
}

impl fmt::Display for Keypath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for segment in &self.segments {
            write!(f, ".{segment}")?;
        }
        Ok(())
    }
}

impl<S: Into<String>> FromIterator<S> for Keypath {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self {
            segments: iter.into_iter().map(Into::into).collect(),
        }
    }
}
