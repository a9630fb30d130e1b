// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Property bags, flattening and attribute selection
//!
//! The host reports object attributes as arbitrarily nested JSON. The overlay
//! only ever needs a handful of leaf values (assembly mark, IFC GUID), so a bag
//! is flattened into a lookup by full dotted path *and* by bare leaf key, and a
//! priority list of candidate keys is matched against it.

use crate::PropertyError;
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Maximum nesting depth accepted by [`flatten`]
pub const MAX_FLATTEN_DEPTH: usize = 128;

/// Candidate keys for the assembly mark, in priority order
pub const ASSEMBLY_KEYS: &[&str] = &[
    "Kooste märk (BLOCK)",
    "Assembly",
    "ASSEMBLY",
    "Tekla_Assembly.AssemblyCast_unit_mark",
];

/// Candidate keys for an IFC GUID stored as a plain attribute
pub const IFC_GUID_KEYS: &[&str] = &["GUID_IFC", "IFC GUID", "GlobalId", "GUID"];

/// Attribute bag of exactly one object, as reported by the host
#[derive(Clone, Debug, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PropertyBag(pub Value);

impl PropertyBag {
    pub fn new(value: Value) -> Self {
        PropertyBag(value)
    }

    pub fn empty() -> Self {
        PropertyBag(Value::Object(Map::new()))
    }

    pub fn as_value(&self) -> &Value {
        &self.0
    }

    /// Build a nested bag from top-level attributes and named property sets
    ///
    /// Each set becomes an object under its own name, so a property `Mark` in
    /// set `Tekla_Assembly` is reachable as `Tekla_Assembly.Mark`.
    pub fn from_property_sets(attributes: Map<String, Value>, sets: &[PropertySet]) -> Self {
        let mut root = attributes;
        for set in sets {
            let entry = root
                .entry(set.name.clone())
                .or_insert_with(|| Value::Object(Map::new()));
            if !entry.is_object() {
                *entry = Value::Object(Map::new());
            }
            if let Value::Object(props) = entry {
                for prop in &set.properties {
                    props.insert(prop.name.clone(), Value::String(prop.value.clone()));
                }
            }
        }
        PropertyBag(Value::Object(root))
    }

    /// Lift a Workspace-style `properties: [{name, properties: [{name, value}]}]`
    /// list into named objects
    ///
    /// Bags without such a list are returned unchanged.
    pub fn normalize_property_sets(self) -> Self {
        let Value::Object(mut root) = self.0 else {
            return self;
        };
        let sets = match root.get("properties") {
            Some(Value::Array(items)) => items
                .iter()
                .map(PropertySet::from_json)
                .collect::<Option<Vec<_>>>(),
            _ => None,
        };
        match sets {
            Some(sets) => {
                root.remove("properties");
                PropertyBag::from_property_sets(root, &sets)
            }
            None => PropertyBag(Value::Object(root)),
        }
    }
}

impl From<Value> for PropertyBag {
    fn from(value: Value) -> Self {
        PropertyBag(value)
    }
}

/// A single named property value
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Property {
    pub name: String,
    /// Value as formatted string
    pub value: String,
}

impl Property {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}

/// A named group of properties (e.g. "Tekla_Assembly")
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PropertySet {
    pub name: String,
    pub properties: Vec<Property>,
}

impl PropertySet {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            properties: Vec::new(),
        }
    }

    pub fn add(&mut self, property: Property) {
        self.properties.push(property);
    }

    pub fn get(&self, name: &str) -> Option<&Property> {
        self.properties.iter().find(|p| p.name == name)
    }

    /// Read `{name, properties: [{name, value}]}`; `None` for other shapes
    pub fn from_json(value: &Value) -> Option<Self> {
        let name = value.get("name")?.as_str()?;
        let items = value.get("properties")?.as_array()?;
        let mut set = PropertySet::new(name);
        for item in items {
            let prop_name = item.get("name")?.as_str()?;
            let prop_value = item.get("value").map(stringify).unwrap_or_default();
            set.add(Property::new(prop_name, prop_value));
        }
        Some(set)
    }
}

/// Flattened view over a [`PropertyBag`]
///
/// Each leaf is stored under its full dotted path and its bare key. When two
/// paths share a bare key, the later leaf in traversal order overwrites the
/// earlier one. This is a known ambiguity, not a priority rule; query the
/// dotted path when it matters.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct FlatBag {
    values: FxHashMap<String, String>,
    /// Keys in first-insertion order
    order: Vec<String>,
}

impl FlatBag {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        let key = key.into();
        if !self.values.contains_key(&key) {
            self.order.push(key.clone());
        }
        self.values.insert(key, value.into());
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Entries in first-insertion order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.order
            .iter()
            .map(|k| (k.as_str(), self.values[k].as_str()))
    }

    /// Copy keyed by lowercase key; colliding keys resolve to the later one
    fn lowercased(&self) -> FxHashMap<String, &str> {
        let mut lower = FxHashMap::default();
        for (key, value) in self.iter() {
            lower.insert(key.to_lowercase(), value);
        }
        lower
    }
}

/// Flatten a property bag into dotted-path and bare-key lookups
///
/// Objects are walked depth-first in insertion order and arrays as objects
/// keyed by index. Scalars are stringified, `null` becomes `""`. A bag that is
/// not an object or array flattens to nothing.
///
/// # Errors
///
/// [`PropertyError::DepthExceeded`] when nesting goes beyond
/// [`MAX_FLATTEN_DEPTH`].
pub fn flatten(bag: &PropertyBag) -> Result<FlatBag, PropertyError> {
    let mut out = FlatBag::new();
    walk(&bag.0, "", 0, &mut out)?;
    Ok(out)
}

fn walk(value: &Value, prefix: &str, depth: usize, out: &mut FlatBag) -> Result<(), PropertyError> {
    if depth > MAX_FLATTEN_DEPTH {
        return Err(PropertyError::DepthExceeded {
            limit: MAX_FLATTEN_DEPTH,
            path: prefix.to_string(),
        });
    }
    match value {
        Value::Object(map) => {
            for (key, child) in map {
                visit(key, child, prefix, depth, out)?;
            }
        }
        Value::Array(items) => {
            for (index, child) in items.iter().enumerate() {
                visit(&index.to_string(), child, prefix, depth, out)?;
            }
        }
        _ => {}
    }
    Ok(())
}

fn visit(
    key: &str,
    child: &Value,
    prefix: &str,
    depth: usize,
    out: &mut FlatBag,
) -> Result<(), PropertyError> {
    let path = if prefix.is_empty() {
        key.to_string()
    } else {
        format!("{prefix}.{key}")
    };
    if child.is_object() || child.is_array() {
        walk(child, &path, depth + 1, out)
    } else {
        let text = stringify(child);
        out.insert(path, text.clone());
        out.insert(key, text);
        Ok(())
    }
}

/// Render a scalar the way the host displays it
pub fn stringify(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::Bool(b) => b.to_string(),
        Value::String(s) => s.clone(),
        Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                i.to_string()
            } else if let Some(u) = n.as_u64() {
                u.to_string()
            } else {
                let f = n.as_f64().unwrap_or_default();
                if f.fract() == 0.0 && f.abs() < 1e21 {
                    format!("{f:.0}")
                } else {
                    f.to_string()
                }
            }
        }
        Value::Array(_) | Value::Object(_) => value.to_string(),
    }
}

/// Pick the first candidate whose value is non-blank
///
/// Exact key matches are tried first; only if none hit is the scan repeated
/// case-insensitively. Returns the trimmed value, or `None` when the attribute
/// is unknown.
pub fn select_first<S: AsRef<str>>(flat: &FlatBag, candidates: &[S]) -> Option<String> {
    let exact = candidates
        .iter()
        .filter_map(|key| flat.get(key.as_ref()))
        .map(str::trim)
        .find(|value| !value.is_empty());
    if let Some(value) = exact {
        return Some(value.to_string());
    }

    let lower = flat.lowercased();
    candidates
        .iter()
        .filter_map(|key| lower.get(&key.as_ref().to_lowercase()).copied())
        .map(str::trim)
        .find(|value| !value.is_empty())
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn flat(value: Value) -> FlatBag {
        flatten(&PropertyBag::new(value)).unwrap()
    }

    #[test]
    fn test_flatten_keeps_paths_and_bare_keys() {
        let bag = flat(json!({"A": 1, "nest": {"B": "x"}}));

        assert_eq!(bag.get("A"), Some("1"));
        assert_eq!(bag.get("nest.B"), Some("x"));
        assert_eq!(bag.get("B"), Some("x"));
        assert_eq!(bag.len(), 3);
    }

    #[test]
    fn test_flatten_every_leaf_twice() {
        let bag = flat(json!({
            "product": {"name": "Beam", "meta": {"weight": 12.5, "ok": true}},
            "empty": null
        }));

        for (path, leaf) in [
            ("product.name", "name"),
            ("product.meta.weight", "weight"),
            ("product.meta.ok", "ok"),
            ("empty", "empty"),
        ] {
            assert_eq!(bag.get(path), bag.get(leaf), "leaf {leaf}");
            assert!(bag.get(path).is_some(), "path {path}");
        }
        assert_eq!(bag.get("weight"), Some("12.5"));
        assert_eq!(bag.get("ok"), Some("true"));
        assert_eq!(bag.get("empty"), Some(""));
        // Intermediate objects are not leaves
        assert_eq!(bag.get("product"), None);
        assert_eq!(bag.get("meta"), None);
    }

    #[test]
    fn test_flatten_duplicate_bare_key_last_write_wins() {
        let bag = flat(json!({"first": {"Mark": "A"}, "second": {"Mark": "B"}}));

        assert_eq!(bag.get("first.Mark"), Some("A"));
        assert_eq!(bag.get("second.Mark"), Some("B"));
        assert_eq!(bag.get("Mark"), Some("B"));
    }

    #[test]
    fn test_flatten_arrays_by_index() {
        let bag = flat(json!({"tags": ["a", "b"]}));

        assert_eq!(bag.get("tags.0"), Some("a"));
        assert_eq!(bag.get("tags.1"), Some("b"));
        assert_eq!(bag.get("1"), Some("b"));
    }

    #[test]
    fn test_flatten_non_object_is_empty() {
        assert!(flat(json!("scalar")).is_empty());
        assert!(flat(json!(42)).is_empty());
        assert!(flat(Value::Null).is_empty());
        assert!(flat(json!({})).is_empty());
    }

    #[test]
    fn test_flatten_integral_float_has_no_fraction() {
        let bag = flat(json!({"len": 3000.0, "neg": -2}));
        assert_eq!(bag.get("len"), Some("3000"));
        assert_eq!(bag.get("neg"), Some("-2"));
    }

    #[test]
    fn test_flatten_rejects_runaway_nesting() {
        let mut value = json!("leaf");
        for _ in 0..(MAX_FLATTEN_DEPTH + 2) {
            value = json!({ "n": value });
        }

        let err = flatten(&PropertyBag::new(value)).unwrap_err();
        assert!(matches!(err, PropertyError::DepthExceeded { limit, .. } if limit == MAX_FLATTEN_DEPTH));
    }

    #[test]
    fn test_select_first_skips_blank() {
        let bag = flat(json!({"a": "", "mark": "M1"}));
        assert_eq!(select_first(&bag, &["mark", "a"]).as_deref(), Some("M1"));
        assert_eq!(select_first(&bag, &["a", "mark"]).as_deref(), Some("M1"));
    }

    #[test]
    fn test_select_first_case_insensitive() {
        let bag = flat(json!({"MARK": "M"}));
        assert_eq!(select_first(&bag, &["mark"]).as_deref(), Some("M"));
    }

    #[test]
    fn test_select_first_prefers_exact_over_case_folded() {
        let bag = flat(json!({"assembly": "lower", "ASSEMBLY": "upper"}));
        assert_eq!(select_first(&bag, &["ASSEMBLY"]).as_deref(), Some("upper"));
    }

    #[test]
    fn test_select_first_trims_and_rejects_whitespace() {
        let bag = flat(json!({"Assembly": "   ", "GUID": "  3cUkl32yn9qRSPvBJVyWYp "}));
        assert_eq!(select_first(&bag, ASSEMBLY_KEYS), None);
        assert_eq!(
            select_first(&bag, IFC_GUID_KEYS).as_deref(),
            Some("3cUkl32yn9qRSPvBJVyWYp")
        );
    }

    #[test]
    fn test_select_first_absent() {
        let bag = flat(json!({"x": "1"}));
        assert_eq!(select_first(&bag, &["mark"]), None);
        assert_eq!(select_first::<&str>(&bag, &[]), None);
    }

    #[test]
    fn test_normalize_workspace_property_sets() {
        let bag = PropertyBag::new(json!({
            "id": 7,
            "class": "IfcBeam",
            "properties": [
                {"name": "Tekla_Assembly", "properties": [
                    {"name": "AssemblyCast_unit_mark", "value": "B-12"},
                    {"name": "Weight", "value": 41.5}
                ]},
                {"name": "Pset_BeamCommon", "properties": [
                    {"name": "LoadBearing", "value": true}
                ]}
            ]
        }))
        .normalize_property_sets();

        let bag = flatten(&bag).unwrap();
        assert_eq!(bag.get("class"), Some("IfcBeam"));
        assert_eq!(bag.get("Weight"), Some("41.5"));
        assert_eq!(bag.get("Pset_BeamCommon.LoadBearing"), Some("true"));
        assert_eq!(select_first(&bag, ASSEMBLY_KEYS).as_deref(), Some("B-12"));
    }

    #[test]
    fn test_normalize_leaves_other_shapes_alone() {
        let value = json!({"properties": ["not", "sets"]});
        let bag = PropertyBag::new(value.clone()).normalize_property_sets();
        assert_eq!(bag.as_value(), &value);
    }

    #[test]
    fn test_property_set_lookup() {
        let mut set = PropertySet::new("Tekla_Assembly");
        set.add(Property::new("AssemblyCast_unit_mark", "C-3"));

        assert_eq!(set.get("AssemblyCast_unit_mark").map(|p| p.value.as_str()), Some("C-3"));
        assert!(set.get("missing").is_none());
    }
}
