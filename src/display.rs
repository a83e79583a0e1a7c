//! Rendering helpers for parsed type trees
//!
//! - [`to_json`]: pretty JSON, one object per top-level declaration
//! - [`flatten`] / [`render_paths`]: one line per field, addressed by its
//!   dotted path

use crate::parser::ast::{TypeKind, TypeNode};

/// Width of the path column in [`render_paths`]
pub const PATH_COLUMN_WIDTH: usize = 30;

/// A single row of the flattened listing
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathEntry {
    pub path: String,
    pub type_name: String,
}

pub fn to_json(nodes: &[TypeNode]) -> serde_json::Result<String> {
    serde_json::to_string_pretty(nodes)
}

/// Flatten the tree into dotted paths.
///
/// Named containers get a row of their own; unnamed containers only pass
/// their children through. Every scalar gets a row, addressed by the names
/// of its enclosing declarations. An array element is addressed by the
/// array's path with a `[]` suffix, so `tags ARRAY<STRING>` lists `tags`
/// and `tags[]`.
pub fn flatten(nodes: &[TypeNode]) -> Vec<PathEntry> {
    let mut entries = Vec::new();
    let mut path = Vec::new();
    flatten_into(nodes, &mut path, &mut entries);
    entries
}

fn flatten_into(nodes: &[TypeNode], path: &mut Vec<String>, out: &mut Vec<PathEntry>) {
    for node in nodes {
        let named = match node.name.as_deref() {
            Some(name) => {
                path.push(name.to_string());
                true
            }
            None => false,
        };

        if !node.is_container() || named {
            out.push(PathEntry {
                path: path.join("."),
                type_name: node.type_name().to_string(),
            });
        }

        match &node.kind {
            TypeKind::Array { element, .. } => {
                let last = path.pop();
                path.push(format!("{}[]", last.as_deref().unwrap_or("")));
                flatten_into(std::slice::from_ref(element.as_ref()), path, out);
                path.pop();
                path.extend(last);
            }
            _ => flatten_into(node.children(), path, out),
        }

        if named {
            path.pop();
        }
    }
}

pub fn render_paths(nodes: &[TypeNode]) -> String {
    let mut out = String::new();
    for entry in flatten(nodes) {
        out.push_str(&format!(
            "{:<width$} {}\n",
            entry.path,
            entry.type_name,
            width = PATH_COLUMN_WIDTH
        ));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse::parse;

    fn paths(source: &str) -> Vec<(String, String)> {
        flatten(&parse(source).unwrap())
            .into_iter()
            .map(|e| (e.path, e.type_name))
            .collect()
    }

    #[test]
    fn test_flatten_nested() {
        let rows = paths(
            "STRUCT<id STRING NOT NULL, items ARRAY<STRUCT<sku STRING, qty INT64>>, tags ARRAY<STRING>>",
        );

        let expected: Vec<(String, String)> = [
            ("id", "STRING"),
            ("items", "ARRAY"),
            ("items[].sku", "STRING"),
            ("items[].qty", "INT64"),
            ("tags", "ARRAY"),
            ("tags[]", "STRING"),
        ]
        .iter()
        .map(|(p, t)| (p.to_string(), t.to_string()))
        .collect();

        assert_eq!(rows, expected);
    }

    #[test]
    fn test_flatten_array_elements_have_distinct_paths() {
        let rows = paths("STRUCT<matrix ARRAY<ARRAY<INT64>>, span RANGE<DATE>>");

        assert_eq!(
            rows,
            vec![
                ("matrix".to_string(), "ARRAY".to_string()),
                ("matrix[][]".to_string(), "INT64".to_string()),
                ("span".to_string(), "RANGE".to_string()),
                ("span[]".to_string(), "DATE".to_string()),
            ]
        );

        let unique: std::collections::BTreeSet<&String> = rows.iter().map(|(p, _)| p).collect();
        assert_eq!(unique.len(), rows.len());
    }

    #[test]
    fn test_flatten_top_level_array() {
        assert_eq!(paths("ARRAY<INT64>"), vec![("[]".to_string(), "INT64".to_string())]);
    }

    #[test]
    fn test_flatten_unnamed_scalar() {
        assert_eq!(paths("INT64"), vec![(String::new(), "INT64".to_string())]);
    }

    #[test]
    fn test_render_paths_pads_column() {
        let rendered = render_paths(&parse("STRUCT<a INT>").unwrap());
        assert_eq!(rendered, format!("a{} INT\n", " ".repeat(PATH_COLUMN_WIDTH - 1)));
    }

    #[test]
    fn test_to_json() {
        let json = to_json(&parse("STRING(10) NOT NULL").unwrap()).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();

        assert_eq!(
            value,
            serde_json::json!([
                { "DataType": "STRING", "Size": 10, "Modifiers": ["NOT NULL"] }
            ])
        );
    }
}
