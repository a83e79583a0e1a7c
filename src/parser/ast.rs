// AST definitions for parsed data type descriptors

use serde::ser::{Serialize, SerializeMap, Serializer};
use std::collections::BTreeSet;
use std::fmt;

/// Source location information for error reporting
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SourceLocation {
    pub line: usize,
    pub column: usize,
    pub offset: usize, // byte offset into the source text
}

impl SourceLocation {
    pub fn new(line: usize, column: usize, offset: usize) -> Self {
        Self {
            line,
            column,
            offset,
        }
    }
}

/// Reserved container keywords
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Container {
    Struct,
    Array,
    Range,
    Record,
}

/// How a container owns its children
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContainerShape {
    /// Ordered, comma separated field declarations (`STRUCT`, `RECORD`)
    Fields,
    /// Exactly one unnamed element type (`ARRAY`, `RANGE`)
    Element,
}

impl Container {
    pub const ALL: [Container; 4] = [
        Container::Struct,
        Container::Array,
        Container::Range,
        Container::Record,
    ];

    /// Look up a lexeme in the reserved word table. Matching is exact and
    /// case-sensitive.
    pub fn from_keyword(word: &str) -> Option<Self> {
        match word {
            "STRUCT" => Some(Container::Struct),
            "ARRAY" => Some(Container::Array),
            "RANGE" => Some(Container::Range),
            "RECORD" => Some(Container::Record),
            _ => None,
        }
    }

    pub fn keyword(self) -> &'static str {
        match self {
            Container::Struct => "STRUCT",
            Container::Array => "ARRAY",
            Container::Range => "RANGE",
            Container::Record => "RECORD",
        }
    }

    pub fn shape(self) -> ContainerShape {
        match self {
            Container::Struct | Container::Record => ContainerShape::Fields,
            Container::Array | Container::Range => ContainerShape::Element,
        }
    }
}

impl fmt::Display for Container {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.keyword())
    }
}

/// Post-type annotations.
///
/// Each modifier is spelled as a fixed two-word sequence in the source text;
/// see [`Modifier::keywords`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Modifier {
    NotNull,
    PrimaryKey,
}

impl Modifier {
    pub const ALL: [Modifier; 2] = [Modifier::NotNull, Modifier::PrimaryKey];

    /// The (leading, trailing) identifier pair spelling this modifier.
    pub fn keywords(self) -> (&'static str, &'static str) {
        match self {
            Modifier::NotNull => ("NOT", "NULL"),
            Modifier::PrimaryKey => ("PRIMARY", "KEY"),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Modifier::NotNull => "NOT NULL",
            Modifier::PrimaryKey => "PRIMARY KEY",
        }
    }
}

impl fmt::Display for Modifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for Modifier {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

/// What a node describes: a leaf scalar or one of the two container shapes
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TypeKind {
    Scalar {
        type_name: String,
        size: Option<u64>,
    },
    Struct {
        container: Container,
        fields: Vec<TypeNode>,
    },
    Array {
        container: Container,
        element: Box<TypeNode>,
    },
}

/// A single node of the parsed type tree.
///
/// Equality is structural: two nodes compare equal when their names, kinds
/// and modifiers match, regardless of where in the source they were found.
#[derive(Debug, Clone)]
pub struct TypeNode {
    pub name: Option<String>,
    pub kind: TypeKind,
    pub modifiers: BTreeSet<Modifier>,
    pub location: SourceLocation,
}

impl PartialEq for TypeNode {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
            && self.kind == other.kind
            && self.modifiers == other.modifiers
    }
}

impl Eq for TypeNode {}

impl TypeNode {
    pub fn scalar(type_name: impl Into<String>) -> Self {
        Self::from_kind(TypeKind::Scalar {
            type_name: type_name.into(),
            size: None,
        })
    }

    pub fn structure(container: Container, fields: Vec<TypeNode>) -> Self {
        Self::from_kind(TypeKind::Struct { container, fields })
    }

    pub fn array(container: Container, element: TypeNode) -> Self {
        Self::from_kind(TypeKind::Array {
            container,
            element: Box::new(element),
        })
    }

    fn from_kind(kind: TypeKind) -> Self {
        TypeNode {
            name: None,
            kind,
            modifiers: BTreeSet::new(),
            location: SourceLocation::default(),
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Attach a size. Ignored on containers, which never carry one.
    pub fn with_size(mut self, n: u64) -> Self {
        if let TypeKind::Scalar { size, .. } = &mut self.kind {
            *size = Some(n);
        }
        self
    }

    pub fn with_modifier(mut self, modifier: Modifier) -> Self {
        self.modifiers.insert(modifier);
        self
    }

    pub fn at(mut self, location: SourceLocation) -> Self {
        self.location = location;
        self
    }

    /// Scalar type name, or the container keyword for containers
    pub fn type_name(&self) -> &str {
        match &self.kind {
            TypeKind::Scalar { type_name, .. } => type_name,
            TypeKind::Struct { container, .. } | TypeKind::Array { container, .. } => {
                container.keyword()
            }
        }
    }

    pub fn size(&self) -> Option<u64> {
        match &self.kind {
            TypeKind::Scalar { size, .. } => *size,
            _ => None,
        }
    }

    pub fn container(&self) -> Option<Container> {
        match &self.kind {
            TypeKind::Scalar { .. } => None,
            TypeKind::Struct { container, .. } | TypeKind::Array { container, .. } => {
                Some(*container)
            }
        }
    }

    pub fn children(&self) -> &[TypeNode] {
        match &self.kind {
            TypeKind::Scalar { .. } => &[],
            TypeKind::Struct { fields, .. } => fields,
            TypeKind::Array { element, .. } => std::slice::from_ref(element.as_ref()),
        }
    }

    pub fn is_container(&self) -> bool {
        !matches!(self.kind, TypeKind::Scalar { .. })
    }

    pub fn has_modifier(&self, modifier: Modifier) -> bool {
        self.modifiers.contains(&modifier)
    }

    pub fn is_not_null(&self) -> bool {
        self.has_modifier(Modifier::NotNull)
    }
}

// Absent and empty attributes are left out of the encoding entirely.
impl Serialize for TypeNode {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(None)?;
        if let Some(name) = &self.name {
            map.serialize_entry("Name", name)?;
        }
        map.serialize_entry("DataType", self.type_name())?;
        if let Some(size) = self.size() {
            map.serialize_entry("Size", &size)?;
        }
        let children = self.children();
        if !children.is_empty() {
            map.serialize_entry("Children", children)?;
        }
        if !self.modifiers.is_empty() {
            map.serialize_entry("Modifiers", &self.modifiers)?;
        }
        map.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_container_keywords() {
        for container in Container::ALL {
            assert_eq!(Container::from_keyword(container.keyword()), Some(container));
        }
        assert_eq!(Container::from_keyword("struct"), None);
        assert_eq!(Container::from_keyword("INT64"), None);
        assert_eq!(Container::Record.shape(), ContainerShape::Fields);
        assert_eq!(Container::Range.shape(), ContainerShape::Element);
    }

    #[test]
    fn test_accessors() {
        let node = TypeNode::array(
            Container::Array,
            TypeNode::scalar("STRING").with_size(10),
        )
        .with_name("tags");

        assert_eq!(node.type_name(), "ARRAY");
        assert_eq!(node.size(), None);
        assert!(node.is_container());
        assert_eq!(node.children().len(), 1);
        assert_eq!(node.children()[0].size(), Some(10));
        assert!(!node.children()[0].is_container());
    }

    #[test]
    fn test_size_never_attaches_to_containers() {
        let node = TypeNode::structure(Container::Struct, vec![TypeNode::scalar("INT")])
            .with_size(4);
        assert_eq!(node.size(), None);
    }

    #[test]
    fn test_equality_ignores_location() {
        let a = TypeNode::scalar("INT").at(SourceLocation::new(1, 1, 0));
        let b = TypeNode::scalar("INT").at(SourceLocation::new(3, 7, 42));
        assert_eq!(a, b);
        assert_ne!(a, TypeNode::scalar("INT").with_modifier(Modifier::NotNull));
    }

    #[test]
    fn test_json_omits_empty_attributes() {
        let node = TypeNode::structure(
            Container::Struct,
            vec![
                TypeNode::scalar("INT").with_name("id"),
                TypeNode::scalar("STRING")
                    .with_name("name")
                    .with_size(0)
                    .with_modifier(Modifier::NotNull),
            ],
        );

        let value = serde_json::to_value(&node).unwrap();
        assert_eq!(
            value,
            json!({
                "DataType": "STRUCT",
                "Children": [
                    { "Name": "id", "DataType": "INT" },
                    {
                        "Name": "name",
                        "DataType": "STRING",
                        "Size": 0,
                        "Modifiers": ["NOT NULL"]
                    }
                ]
            })
        );
    }
}
