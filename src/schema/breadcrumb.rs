use std::fmt;

/// A path into a nested value, identifying where validation is occurring.
///
/// Appending returns a new breadcrumb and leaves the original untouched, so
/// diverging composition branches (oneOf/anyOf) validate against the same
/// starting point without leaking segments into each other.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Breadcrumb {
    segments: Vec<Segment>,
}

/// One step of a breadcrumb: an object key or an array index
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    Key(String),
    Index(usize),
}

impl Breadcrumb {
    /// The root of a value
    pub fn root() -> Self {
        Self::default()
    }

    /// A breadcrumb rooted at a named property (used by parameter
    /// validators so mismatches name the parameter)
    pub fn property(name: impl Into<String>) -> Self {
        Self {
            segments: vec![Segment::Key(name.into())],
        }
    }

    /// A new breadcrumb extended by an object key
    #[must_use]
    pub fn key(&self, name: &str) -> Self {
        let mut segments = self.segments.clone();
        segments.push(Segment::Key(name.to_string()));
        Self { segments }
    }

    /// A new breadcrumb extended by an array index
    #[must_use]
    pub fn index(&self, index: usize) -> Self {
        let mut segments = self.segments.clone();
        segments.push(Segment::Index(index));
        Self { segments }
    }

    pub fn is_root(&self) -> bool {
        self.segments.is_empty()
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }
}

impl fmt::Display for Breadcrumb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, segment) in self.segments.iter().enumerate() {
            if i > 0 {
                write!(f, ".")?;
            }
            match segment {
                Segment::Key(key) => write!(f, "{key}")?,
                Segment::Index(index) => write!(f, "{index}")?,
            }
        }
        Ok(())
    }
}
