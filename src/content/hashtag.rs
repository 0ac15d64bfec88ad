use std::fmt;
use std::fmt::{Display, Formatter};

/// A hashtag keyed by its name with the surrounding `#` characters removed.
/// Ordering and equality are plain byte comparisons, so `Rust` and `rust` differ.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Hashtag(String);

impl Hashtag {
    pub fn new(raw: &str) -> Self {
        Hashtag(raw.trim_matches('#').to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for Hashtag {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
