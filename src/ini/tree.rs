//! INI expression tree.
//!
//! A [`Section`] maps names to [`Node`]s, each either a nested section or a
//! [`Property`]. A property is the ordered list of [`KeyValue`] entries that
//! share one key; it holds more than one entry only under
//! [`DuplicateDirective::Merge`].

use super::syntax::DuplicateDirective;
use super::IniSyntax;
use crate::{Atom, Error, Expression, Result, Value};
use indexmap::IndexMap;
use serde::ser::{SerializeMap, SerializeSeq};
use serde::{Serialize, Serializer};

/// Comment lines attached to a node.
#[derive(Clone, Debug, PartialEq, Eq, Default)]
pub struct Comments {
    /// Full-line comments directly above the node.
    pub preceding: Vec<String>,
    /// Comment trailing the node's own line.
    pub inline: Option<String>,
}

impl Comments {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.preceding.is_empty() && self.inline.is_none()
    }

    fn absorb(&mut self, other: Comments) {
        self.preceding.extend(other.preceding);
        if self.inline.is_none() {
            self.inline = other.inline;
        }
    }
}

/// A single `key = value` line.
#[derive(Clone, Debug, PartialEq, Eq, Default)]
pub struct KeyValue {
    pub comments: Comments,
    pub key: String,
    pub value: String,
}

impl KeyValue {
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        KeyValue {
            comments: Comments::default(),
            key: key.into(),
            value: value.into(),
        }
    }
}

/// Every value recorded for one key, in document order.
#[derive(Clone, Debug, PartialEq, Eq, Default)]
pub struct Property {
    entries: Vec<KeyValue>,
}

impl Property {
    #[must_use]
    pub fn new(entry: KeyValue) -> Self {
        Property {
            entries: vec![entry],
        }
    }

    /// Adds another entry for the same key according to `directive`.
    pub fn add(&mut self, entry: KeyValue, directive: DuplicateDirective) -> Result<()> {
        match directive {
            DuplicateDirective::Merge => self.entries.push(entry),
            DuplicateDirective::Overwrite => {
                tracing::debug!(key = %entry.key, "overwriting property");
                self.entries = vec![entry];
            }
            DuplicateDirective::Discard => {
                tracing::debug!(key = %entry.key, "discarding duplicate property");
            }
            DuplicateDirective::Throw => {
                return Err(Error::duplicate("property", &entry.key));
            }
        }
        Ok(())
    }

    fn merge(&mut self, other: Property, directive: DuplicateDirective) -> Result<()> {
        for entry in other.entries {
            self.add(entry, directive)?;
        }
        Ok(())
    }

    #[must_use]
    pub fn entries(&self) -> &[KeyValue] {
        &self.entries
    }

    /// The first recorded value.
    #[must_use]
    pub fn value(&self) -> Option<&str> {
        self.entries.first().map(|kv| kv.value.as_str())
    }

    pub fn values(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|kv| kv.value.as_str())
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl From<KeyValue> for Property {
    fn from(entry: KeyValue) -> Self {
        Property::new(entry)
    }
}

/// A child of a section.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Node {
    Section(Section),
    Property(Property),
}

impl Node {
    fn kind(&self) -> &'static str {
        match self {
            Node::Section(_) => "section",
            Node::Property(_) => "property",
        }
    }

    #[must_use]
    pub fn as_section(&self) -> Option<&Section> {
        match self {
            Node::Section(section) => Some(section),
            Node::Property(_) => None,
        }
    }

    #[must_use]
    pub fn as_property(&self) -> Option<&Property> {
        match self {
            Node::Property(property) => Some(property),
            Node::Section(_) => None,
        }
    }
}

/// The duplicate directives applied while building a tree.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
pub struct Duplicates {
    pub sections: DuplicateDirective,
    pub properties: DuplicateDirective,
}

impl Duplicates {
    fn for_node(&self, node: &Node) -> DuplicateDirective {
        match node {
            Node::Section(_) => self.sections,
            Node::Property(_) => self.properties,
        }
    }
}

/// A named collection of sections and properties.
///
/// Equality compares content only; whether a section was opened by its own
/// header or as a parent of a nested one does not matter.
#[derive(Clone, Debug, Eq, Default)]
pub struct Section {
    children: IndexMap<String, Node>,
    pub comments: Comments,
    /// Comments left over after the section's last entry at end of input.
    pub trailing: Vec<String>,
    implicit: bool,
}

impl PartialEq for Section {
    fn eq(&self, other: &Self) -> bool {
        self.children == other.children
            && self.comments == other.comments
            && self.trailing == other.trailing
    }
}

impl Section {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn opened() -> Self {
        Section {
            implicit: true,
            ..Self::default()
        }
    }

    /// `true` while the section exists only as the parent of a nested header.
    #[must_use]
    pub fn is_implicit(&self) -> bool {
        self.implicit
    }

    /// Adds `node` at `path`, creating intermediate sections as needed.
    ///
    /// Only the last path segment is subject to `duplicates`; intermediate
    /// segments are opened, not redefined.
    pub fn add(&mut self, path: &[String], node: Node, duplicates: Duplicates) -> Result<()> {
        match path.split_first() {
            None => match node {
                Node::Section(section) => self.merge(section, duplicates),
                Node::Property(_) => Err(Error::custom("a property needs a name")),
            },
            Some((name, [])) => self.insert(name, node, duplicates),
            Some((name, rest)) => {
                let child = self
                    .children
                    .entry(name.clone())
                    .or_insert_with(|| Node::Section(Section::opened()));
                match child {
                    Node::Section(section) => section.add(rest, node, duplicates),
                    Node::Property(_) => Err(Error::custom(format!(
                        "'{}' is a property and cannot contain '{}'",
                        name,
                        rest.join(".")
                    ))),
                }
            }
        }
    }

    /// Adds a property named after `entry.key`.
    pub fn add_property(&mut self, entry: KeyValue, duplicates: Duplicates) -> Result<()> {
        let name = entry.key.clone();
        self.insert(&name, Node::Property(Property::new(entry)), duplicates)
    }

    fn insert(&mut self, name: &str, node: Node, duplicates: Duplicates) -> Result<()> {
        let directive = duplicates.for_node(&node);
        let Some(existing) = self.children.get_mut(name) else {
            self.children.insert(name.to_string(), node);
            return Ok(());
        };
        match (existing, node) {
            (Node::Property(existing), Node::Property(incoming)) => {
                existing.merge(incoming, directive)
            }
            (Node::Section(existing), Node::Section(incoming)) if existing.implicit => {
                tracing::debug!(section = name, "defining implicitly opened section");
                existing.implicit = false;
                existing.merge(incoming, duplicates)
            }
            (Node::Section(existing), Node::Section(incoming)) => match directive {
                DuplicateDirective::Merge => existing.merge(incoming, duplicates),
                DuplicateDirective::Overwrite => {
                    tracing::debug!(section = name, "overwriting section");
                    *existing = incoming;
                    Ok(())
                }
                DuplicateDirective::Discard => {
                    tracing::debug!(section = name, "discarding duplicate section");
                    Ok(())
                }
                DuplicateDirective::Throw => Err(Error::duplicate("section", name)),
            },
            (existing, incoming) => match directive {
                DuplicateDirective::Overwrite => {
                    *existing = incoming;
                    Ok(())
                }
                DuplicateDirective::Discard => Ok(()),
                DuplicateDirective::Merge => Err(Error::custom(format!(
                    "cannot merge {} '{}' into a {}",
                    incoming.kind(),
                    name,
                    existing.kind()
                ))),
                DuplicateDirective::Throw => Err(Error::duplicate(incoming.kind(), name)),
            },
        }
    }

    fn merge(&mut self, other: Section, duplicates: Duplicates) -> Result<()> {
        self.comments.absorb(other.comments);
        self.trailing.extend(other.trailing);
        for (name, node) in other.children {
            self.insert(&name, node, duplicates)?;
        }
        Ok(())
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Node> {
        self.children.get(name)
    }

    #[must_use]
    pub fn section(&self, name: &str) -> Option<&Section> {
        self.get(name).and_then(Node::as_section)
    }

    #[must_use]
    pub fn property(&self, name: &str) -> Option<&Property> {
        self.get(name).and_then(Node::as_property)
    }

    /// Follows `path` through nested sections.
    #[must_use]
    pub fn get_path(&self, path: &[&str]) -> Option<&Node> {
        let (last, parents) = path.split_last()?;
        let mut current = self;
        for name in parents {
            current = current.section(name)?;
        }
        current.get(last)
    }

    /// First value of the property at `path`.
    #[must_use]
    pub fn get_value(&self, path: &[&str]) -> Option<&str> {
        self.get_path(path)?.as_property()?.value()
    }

    pub fn iter(&self) -> indexmap::map::Iter<'_, String, Node> {
        self.children.iter()
    }

    pub fn sections(&self) -> impl Iterator<Item = (&String, &Section)> {
        self.children
            .iter()
            .filter_map(|(name, node)| node.as_section().map(|s| (name, s)))
    }

    pub fn properties(&self) -> impl Iterator<Item = (&String, &Property)> {
        self.children
            .iter()
            .filter_map(|(name, node)| node.as_property().map(|p| (name, p)))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.children.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }
}

impl Serialize for Section {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut map = serializer.serialize_map(Some(self.children.len()))?;
        for (name, node) in &self.children {
            map.serialize_entry(name, node)?;
        }
        map.end()
    }
}

impl Serialize for Node {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            Node::Section(section) => section.serialize(serializer),
            Node::Property(property) => property.serialize(serializer),
        }
    }
}

impl Serialize for Property {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self.entries.as_slice() {
            [single] => serializer.serialize_str(&single.value),
            entries => {
                let mut seq = serializer.serialize_seq(Some(entries.len()))?;
                for entry in entries {
                    seq.serialize_element(&entry.value)?;
                }
                seq.end()
            }
        }
    }
}

impl TryFrom<&Value> for Section {
    type Error = Error;

    /// Maps nested maps to sections, lists to multi-valued properties and
    /// atoms to single-valued properties.
    fn try_from(value: &Value) -> Result<Self> {
        let Value::Map(map) = value else {
            return Err(Error::custom(format!(
                "only maps can become sections, found {}",
                value
            )));
        };
        let mut section = Section::new();
        for (name, child) in map.iter() {
            let node = match child {
                Value::Map(_) => Node::Section(Section::try_from(child)?),
                Value::List(items) => {
                    let mut entries = Vec::with_capacity(items.len());
                    for item in items {
                        let Value::Atom(atom) = item else {
                            return Err(Error::custom(format!(
                                "'{}' holds a nested collection, which INI cannot represent",
                                name
                            )));
                        };
                        entries.push(KeyValue::new(name.clone(), atom_text(atom)));
                    }
                    Node::Property(Property { entries })
                }
                Value::Atom(atom) => Node::Property(Property::new(KeyValue::new(
                    name.clone(),
                    atom_text(atom),
                ))),
            };
            section.children.insert(name.clone(), node);
        }
        Ok(section)
    }
}

fn atom_text(atom: &Atom) -> String {
    match atom {
        Atom::Null => String::new(),
        other => other.to_string(),
    }
}

/// An expression produced by the INI commands.
#[derive(Clone, Debug, PartialEq)]
pub enum IniExpr {
    /// A line that contributes nothing (blank line, full-line comment).
    Empty,
    /// A bare run of text: a key without assignment.
    Text(String),
    KeyValue(KeyValue),
    /// A section and the path it attaches at; the whole document is the
    /// section at the empty path.
    Section { path: Vec<String>, section: Section },
}

impl IniExpr {
    #[must_use]
    pub fn document(section: Section) -> Self {
        IniExpr::Section {
            path: Vec::new(),
            section,
        }
    }
}

impl Expression<IniSyntax> for IniExpr {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value;

    fn path(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    fn with(sections: DuplicateDirective, properties: DuplicateDirective) -> Duplicates {
        Duplicates {
            sections,
            properties,
        }
    }

    #[test]
    fn test_add_creates_intermediate_sections() {
        let mut root = Section::new();
        let mut leaf = Section::new();
        leaf.add_property(KeyValue::new("b", "2"), Duplicates::default())
            .unwrap();
        root.add(&path(&["a", "x", "y"]), Node::Section(leaf), Duplicates::default())
            .unwrap();
        assert_eq!(root.get_value(&["a", "x", "y", "b"]), Some("2"));
    }

    #[test]
    fn test_property_directives() {
        let cases = [
            (DuplicateDirective::Merge, vec!["a", "b"]),
            (DuplicateDirective::Overwrite, vec!["b"]),
            (DuplicateDirective::Discard, vec!["a"]),
        ];
        for (directive, expected) in cases {
            let mut root = Section::new();
            let dup = with(DuplicateDirective::Merge, directive);
            root.add_property(KeyValue::new("key", "a"), dup).unwrap();
            root.add_property(KeyValue::new("key", "b"), dup).unwrap();
            let values: Vec<_> = root.property("key").unwrap().values().collect();
            assert_eq!(values, expected, "{:?}", directive);
        }

        let mut root = Section::new();
        let dup = with(DuplicateDirective::Merge, DuplicateDirective::Throw);
        root.add_property(KeyValue::new("key", "a"), dup).unwrap();
        let err = root.add_property(KeyValue::new("key", "b"), dup).unwrap_err();
        assert!(matches!(err, Error::Duplicate { .. }));
    }

    #[test]
    fn test_section_merge_is_recursive() {
        let dup = Duplicates::default();
        let mut root = Section::new();

        let mut first = Section::new();
        first.add_property(KeyValue::new("a", "1"), dup).unwrap();
        root.add(&path(&["s"]), Node::Section(first), dup).unwrap();

        let mut second = Section::new();
        second.add_property(KeyValue::new("a", "2"), dup).unwrap();
        second.add_property(KeyValue::new("b", "3"), dup).unwrap();
        root.add(&path(&["s"]), Node::Section(second), dup).unwrap();

        let section = root.section("s").unwrap();
        assert_eq!(section.property("a").unwrap().len(), 2);
        assert_eq!(section.get_value(&["b"]), Some("3"));
    }

    #[test]
    fn test_kind_collision() {
        let mut root = Section::new();
        let dup = Duplicates::default();
        root.add_property(KeyValue::new("s", "1"), dup).unwrap();
        let err = root
            .add(&path(&["s"]), Node::Section(Section::new()), dup)
            .unwrap_err();
        assert!(matches!(err, Error::Custom(_)));
        assert!(err.to_string().contains("cannot merge section 's' into a property"));

        let throw = with(DuplicateDirective::Throw, DuplicateDirective::Throw);
        let err = root
            .add(&path(&["s"]), Node::Section(Section::new()), throw)
            .unwrap_err();
        assert_eq!(err.to_string(), "Duplicate section 's'");

        let overwrite = with(DuplicateDirective::Overwrite, DuplicateDirective::Overwrite);
        root.add(&path(&["s"]), Node::Section(Section::new()), overwrite)
            .unwrap();
        assert!(root.section("s").is_some());
    }

    #[test]
    fn test_parent_header_after_nested_header() {
        let throw = with(DuplicateDirective::Throw, DuplicateDirective::Throw);
        let mut root = Section::new();
        root.add(&path(&["a", "b"]), Node::Section(Section::new()), throw)
            .unwrap();
        assert!(root.section("a").unwrap().is_implicit());

        let mut parent = Section::new();
        parent.add_property(KeyValue::new("y", "2"), throw).unwrap();
        root.add(&path(&["a"]), Node::Section(parent), throw).unwrap();
        let a = root.section("a").unwrap();
        assert!(!a.is_implicit());
        assert_eq!(a.get_value(&["y"]), Some("2"));
        assert!(a.section("b").is_some());

        let err = root
            .add(&path(&["a"]), Node::Section(Section::new()), throw)
            .unwrap_err();
        assert!(matches!(err, Error::Duplicate { .. }));
    }

    #[test]
    fn test_property_blocks_path() {
        let mut root = Section::new();
        root.add_property(KeyValue::new("a", "1"), Duplicates::default())
            .unwrap();
        assert!(root
            .add(&path(&["a", "b"]), Node::Section(Section::new()), Duplicates::default())
            .is_err());
    }

    #[test]
    fn test_from_value() {
        let doc = value!({
            "top": "x",
            "server": { "port": 8080, "hosts": ["a", "b"] }
        });
        let root = Section::try_from(&doc).unwrap();
        assert_eq!(root.get_value(&["top"]), Some("x"));
        assert_eq!(root.get_value(&["server", "port"]), Some("8080"));
        let hosts: Vec<_> = root
            .get_path(&["server", "hosts"])
            .and_then(Node::as_property)
            .unwrap()
            .values()
            .collect();
        assert_eq!(hosts, vec!["a", "b"]);

        assert!(Section::try_from(&value!([1, 2])).is_err());
        assert!(Section::try_from(&value!({ "a": [[1]] })).is_err());
    }
}
