use indexmap::IndexMap;
use std::fmt;

use super::Value;

/// Which layer supplied an option's current value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Source {
    Unset,
    Default,
    ConfigFile,
    CommandLine,
}

impl fmt::Display for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Source::Unset => "unset",
            Source::Default => "default",
            Source::ConfigFile => "config",
            Source::CommandLine => "cli",
        };
        write!(f, "{}", name)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Entry {
    pub value: Option<Value>,
    pub source: Source,
}

/// An ordered, immutable mapping from option name to value.
///
/// Updates return a new set; the resolution passes never share a mutable namespace.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct OptionSet {
    entries: IndexMap<String, Entry>,
}

impl OptionSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a copy with `name` set to `value`, recording where it came from.
    pub fn with(&self, name: &str, value: Option<Value>, source: Source) -> Self {
        let mut entries = self.entries.clone();
        let source = if value.is_none() { Source::Unset } else { source };
        entries.insert(name.to_string(), Entry { value, source });
        Self { entries }
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    pub fn entry(&self, name: &str) -> Option<&Entry> {
        self.entries.get(name)
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.entries.get(name).and_then(|e| e.value.as_ref())
    }

    pub fn source(&self, name: &str) -> Option<Source> {
        self.entries.get(name).map(|e| e.source)
    }

    pub fn get_bool(&self, name: &str) -> Option<bool> {
        self.get(name).and_then(Value::as_bool)
    }

    pub fn get_int(&self, name: &str) -> Option<i64> {
        self.get(name).and_then(Value::as_int)
    }

    pub fn get_float(&self, name: &str) -> Option<f64> {
        self.get(name).and_then(Value::as_float)
    }

    pub fn get_str(&self, name: &str) -> Option<&str> {
        self.get(name).and_then(Value::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Entry)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Renders the set as `name<TAB>value<TAB>source` lines; unset values print as `None`.
    pub fn to_tsv(&self) -> String {
        let mut out = String::new();
        for (name, entry) in self.iter() {
            let value = match &entry.value {
                Some(v) => v.to_string(),
                None => "None".to_string(),
            };
            out += &format!("{}\t{}\t{}\n", name, value, entry.source);
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn with_returns_a_new_set() {
        let base = OptionSet::new().with("nproc", Some(Value::Int(8)), Source::Default);
        let next = base.with("nproc", Some(Value::Int(16)), Source::CommandLine);

        assert_eq!(base.get_int("nproc"), Some(8));
        assert_eq!(next.get_int("nproc"), Some(16));
        assert_eq!(next.source("nproc"), Some(Source::CommandLine));
    }

    #[test]
    fn absent_value_is_unset() {
        let set = OptionSet::new().with("scoreCutoff", None, Source::Default);
        assert!(set.contains("scoreCutoff"));
        assert_eq!(set.get("scoreCutoff"), None);
        assert_eq!(set.source("scoreCutoff"), Some(Source::Unset));
        assert_eq!(set.to_tsv(), "scoreCutoff\tNone\tunset\n");
    }

    #[test]
    fn insertion_order_is_kept() {
        let set = OptionSet::new()
            .with("b", Some(Value::Bool(true)), Source::Default)
            .with("a", Some(Value::Str("x".into())), Source::ConfigFile)
            .with("b", Some(Value::Bool(false)), Source::CommandLine);
        let names: Vec<_> = set.iter().map(|(k, _)| k).collect();
        assert_eq!(names, vec!["b", "a"]);
    }
}
