//! Key path locating a node inside a spec tree.
//!
//! Example: `{ "b": { "c": ... } }`  =>  KeyPath(vec!["b", "c"]), displayed as `b.c`.
//!
//! Stored as a Vec<String> with derived ordering so it can key BTreeMap/Set.
//!
//! Display quotes segments that are empty or contain `.` or `"` (`a."b.c"`), so
//! a key `"b.c"` never prints like the nested path b -> c. `KeyPath::parse`
//! only splits on dots and does not read quoted segments back.

use std::fmt;

#[derive(Debug, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct KeyPath(pub Vec<String>);

impl KeyPath {
    pub fn root() -> Self {
        Self(Vec::new())
    }

    pub fn new(keys: Vec<String>) -> Self {
        Self(keys)
    }

    /// Split a dotted path. Empty segments are dropped, so `""` is the root.
    /// Keys containing `.` or empty keys cannot be expressed here; build those
    /// paths with [`KeyPath::child`].
    pub fn parse(dotted: &str) -> Self {
        Self(
            dotted
                .split('.')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_string)
                .collect(),
        )
    }

    pub fn child(&self, key: &str) -> Self {
        let mut keys = self.0.clone();
        keys.push(key.to_string());
        Self(keys)
    }

    pub fn is_root(&self) -> bool {
        self.0.is_empty()
    }

    pub fn segments(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }
}

impl fmt::Display for KeyPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_root() {
            return f.write_str("<root>");
        }
        for (i, key) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(".")?;
            }
            if key.is_empty() || key.contains(['.', '"']) {
                write!(f, "{key:?}")?;
            } else {
                f.write_str(key)?;
            }
        }
        Ok(())
    }
}
