//! Key Resolution Module
//!
//! Maps the three item query shapes onto canonical cache keys.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

// == Item Filter ==
/// A structured item search, serialized as a JSON object.
///
/// Equality and index lookups go through [`ItemFilter::canonical`], so two
/// filters with the same keys and values match regardless of insertion order.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ItemFilter(Map<String, Value>);

impl ItemFilter {
    pub fn new() -> Self {
        Self(Map::new())
    }

    /// Adds or replaces a filter criterion.
    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.0.insert(key.into(), value.into());
        self
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    // == Canonical ==
    /// Stable stringification: object keys sorted at every depth, compact JSON.
    pub fn canonical(&self) -> String {
        canonicalize(&Value::Object(self.0.clone())).to_string()
    }
}

impl PartialEq for ItemFilter {
    fn eq(&self, other: &Self) -> bool {
        self.canonical() == other.canonical()
    }
}

impl Eq for ItemFilter {}

impl From<Map<String, Value>> for ItemFilter {
    fn from(map: Map<String, Value>) -> Self {
        Self(map)
    }
}

/// Rebuilds a value with object keys inserted in sorted order.
///
/// Insertion order is also output order when serde_json preserves order,
/// so the result is sorted under either map representation.
fn canonicalize(value: &Value) -> Value {
    match value {
        Value::Object(map) => {
            let mut entries: Vec<(&String, &Value)> = map.iter().collect();
            entries.sort_by(|a, b| a.0.cmp(b.0));
            let sorted = entries
                .into_iter()
                .map(|(k, v)| (k.clone(), canonicalize(v)))
                .collect::<Map<String, Value>>();
            Value::Object(sorted)
        }
        Value::Array(items) => Value::Array(items.iter().map(canonicalize).collect()),
        other => other.clone(),
    }
}

// == Item Key ==
/// The three ways a caller can ask for items.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ItemKey {
    /// Explicit item IDs; the IDs are their own key
    ById(Vec<String>),
    /// Items owned by a user
    ByOwner(String),
    /// Items matching a search
    ByFilter(ItemFilter),
}

impl ItemKey {
    pub fn by_ids<I, S>(ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        ItemKey::ById(ids.into_iter().map(Into::into).collect())
    }

    pub fn by_owner(user_id: impl Into<String>) -> Self {
        ItemKey::ByOwner(user_id.into())
    }

    pub fn by_filter(filter: ItemFilter) -> Self {
        ItemKey::ByFilter(filter)
    }

    // == Flight Key ==
    /// Canonical string naming this query, used to collapse identical
    /// concurrent fetches. ID lists are encoded as a JSON array so IDs
    /// containing separators cannot collide.
    pub fn flight_key(&self) -> String {
        match self {
            ItemKey::ById(ids) => format!("ids:{}", Value::from(ids.as_slice())),
            ItemKey::ByOwner(user_id) => format!("owner:{user_id}"),
            ItemKey::ByFilter(filter) => format!("filter:{}", filter.canonical()),
        }
    }
}
