//! Structural JSON shapes and the merge algebra used for inference.

use indexmap::IndexMap;
use serde::Serialize;
use serde_json::{Map, Value, json};

/// Structural schema of one or more JSON values.
///
/// Shapes are immutable: inference derives one shape per observed value
/// with [`JsonShape::of`] and folds them together with [`JsonShape::merge`].
/// `Unknown` is the fold identity and also describes positions where no
/// value was ever observed (e.g. elements of an always-empty array).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JsonShape {
    /// No values observed.
    Unknown,
    Null,
    Bool,
    Number,
    String,
    /// Array with the merged shape of every observed element.
    Array(Box<JsonShape>),
    /// Object with per-key shapes, in first-seen key order.
    Object(IndexMap<String, JsonShape>),
    /// Canonical union: flattened, one member per kind, fixed kind order,
    /// never fewer than two members.
    Union(Vec<JsonShape>),
}

impl JsonShape {
    /// Derives the shape of a single JSON value.
    pub fn of(value: &Value) -> JsonShape {
        match value {
            Value::Null => JsonShape::Null,
            Value::Bool(_) => JsonShape::Bool,
            Value::Number(_) => JsonShape::Number,
            Value::String(_) => JsonShape::String,
            Value::Array(items) => {
                let element = items
                    .iter()
                    .map(JsonShape::of)
                    .fold(JsonShape::Unknown, JsonShape::merge);
                JsonShape::Array(Box::new(element))
            }
            Value::Object(fields) => JsonShape::Object(
                fields
                    .iter()
                    .map(|(key, value)| (key.clone(), JsonShape::of(value)))
                    .collect(),
            ),
        }
    }

    /// Merges two shapes into the smallest shape describing both.
    ///
    /// Commutative, associative and idempotent, with `Unknown` as the
    /// identity. Matching kinds merge structurally (array elements and
    /// object properties recurse); differing kinds form a canonical
    /// union. Object merge is permissive: the key sets union, and a key
    /// missing on one side keeps the other side's shape unchanged.
    pub fn merge(self, other: JsonShape) -> JsonShape {
        match (self, other) {
            (JsonShape::Unknown, shape) | (shape, JsonShape::Unknown) => shape,
            (JsonShape::Null, JsonShape::Null) => JsonShape::Null,
            (JsonShape::Bool, JsonShape::Bool) => JsonShape::Bool,
            (JsonShape::Number, JsonShape::Number) => JsonShape::Number,
            (JsonShape::String, JsonShape::String) => JsonShape::String,
            (JsonShape::Array(left), JsonShape::Array(right)) => {
                JsonShape::Array(Box::new(left.merge(*right)))
            }
            (JsonShape::Object(left), JsonShape::Object(right)) => {
                JsonShape::Object(merge_properties(left, right))
            }
            (left, right) => {
                let mut union = UnionBuilder::default();
                union.add(left);
                union.add(right);
                union.build()
            }
        }
    }

    /// Top-level kind names present in this shape.
    pub fn kinds(&self) -> Vec<&'static str> {
        match self {
            JsonShape::Unknown => Vec::new(),
            JsonShape::Union(members) => members.iter().map(JsonShape::kind_name).collect(),
            other => vec![other.kind_name()],
        }
    }

    fn kind_name(&self) -> &'static str {
        match self {
            JsonShape::Unknown => "unknown",
            JsonShape::Null => "null",
            JsonShape::Bool => "boolean",
            JsonShape::Number => "number",
            JsonShape::String => "string",
            JsonShape::Array(_) => "array",
            JsonShape::Object(_) => "object",
            JsonShape::Union(_) => "union",
        }
    }

    /// Renders the shape as a JSON-Schema-like value.
    ///
    /// Scalars become `{"type": <kind>}`; arrays add `items` (omitted
    /// while unknown); objects add `properties`; unions list their kinds
    /// under `type` and pull up `items`/`properties` from their array and
    /// object members. `Unknown` renders as `{}`.
    pub fn to_schema_value(&self) -> Value {
        match self {
            JsonShape::Unknown => Value::Object(Map::new()),
            JsonShape::Null | JsonShape::Bool | JsonShape::Number | JsonShape::String => {
                json!({ "type": self.kind_name() })
            }
            JsonShape::Array(items) => {
                let mut schema = Map::new();
                schema.insert("type".to_string(), json!("array"));
                if **items != JsonShape::Unknown {
                    schema.insert("items".to_string(), items.to_schema_value());
                }
                Value::Object(schema)
            }
            JsonShape::Object(properties) => {
                let mut schema = Map::new();
                schema.insert("type".to_string(), json!("object"));
                schema.insert("properties".to_string(), properties_value(properties));
                Value::Object(schema)
            }
            JsonShape::Union(members) => {
                let kinds: Vec<Value> = members
                    .iter()
                    .map(|member| json!(member.kind_name()))
                    .collect();
                let mut schema = Map::new();
                schema.insert("type".to_string(), Value::Array(kinds));
                for member in members {
                    match member {
                        JsonShape::Array(items) if **items != JsonShape::Unknown => {
                            schema.insert("items".to_string(), items.to_schema_value());
                        }
                        JsonShape::Object(properties) => {
                            schema.insert("properties".to_string(), properties_value(properties));
                        }
                        _ => {}
                    }
                }
                Value::Object(schema)
            }
        }
    }
}

impl Serialize for JsonShape {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        self.to_schema_value().serialize(serializer)
    }
}

fn properties_value(properties: &IndexMap<String, JsonShape>) -> Value {
    let mut rendered = Map::new();
    for (key, shape) in properties {
        rendered.insert(key.clone(), shape.to_schema_value());
    }
    Value::Object(rendered)
}

fn merge_properties(
    mut left: IndexMap<String, JsonShape>,
    right: IndexMap<String, JsonShape>,
) -> IndexMap<String, JsonShape> {
    for (key, shape) in right {
        match left.get_mut(&key) {
            Some(existing) => {
                let current = std::mem::replace(existing, JsonShape::Unknown);
                *existing = current.merge(shape);
            }
            None => {
                left.insert(key, shape);
            }
        }
    }
    left
}

/// Accumulates shapes into a canonical union: duplicate scalars collapse,
/// nested unions flatten, and all array/object members merge structurally
/// so at most one of each survives.
#[derive(Default)]
struct UnionBuilder {
    has_null: bool,
    has_bool: bool,
    has_number: bool,
    has_string: bool,
    array_items: Option<JsonShape>,
    object_properties: Option<IndexMap<String, JsonShape>>,
}

impl UnionBuilder {
    fn add(&mut self, shape: JsonShape) {
        match shape {
            JsonShape::Unknown => {}
            JsonShape::Null => self.has_null = true,
            JsonShape::Bool => self.has_bool = true,
            JsonShape::Number => self.has_number = true,
            JsonShape::String => self.has_string = true,
            JsonShape::Array(items) => {
                self.array_items = Some(match self.array_items.take() {
                    Some(existing) => existing.merge(*items),
                    None => *items,
                });
            }
            JsonShape::Object(properties) => {
                self.object_properties = Some(match self.object_properties.take() {
                    Some(existing) => merge_properties(existing, properties),
                    None => properties,
                });
            }
            JsonShape::Union(members) => {
                for member in members {
                    self.add(member);
                }
            }
        }
    }

    fn build(self) -> JsonShape {
        let mut members = Vec::new();
        if self.has_null {
            members.push(JsonShape::Null);
        }
        if self.has_bool {
            members.push(JsonShape::Bool);
        }
        if self.has_number {
            members.push(JsonShape::Number);
        }
        if self.has_string {
            members.push(JsonShape::String);
        }
        if let Some(items) = self.array_items {
            members.push(JsonShape::Array(Box::new(items)));
        }
        if let Some(properties) = self.object_properties {
            members.push(JsonShape::Object(properties));
        }
        match members.len() {
            0 => JsonShape::Unknown,
            1 => members.remove(0),
            _ => JsonShape::Union(members),
        }
    }
}
