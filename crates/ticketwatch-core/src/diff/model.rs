//! Change detection output types.
//!
//! Field maps use `BTreeMap` for deterministic serialization.

use serde::de::Error as _;
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;
use std::collections::BTreeMap;
use ticketwatch_core_types::schema::{CHANGE_FIRST_RECEIVED, FIRST_RECEIVED_MESSAGE};

/// Old/new values for one changed field.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ChangeEntry {
    /// Value in the stored snapshot (null when the field was absent)
    pub old: Value,
    /// Value in the delivered payload
    pub new: Value,
}

/// Fields that changed between two observations of a ticket.
///
/// Serializes as a JSON object: field name → `{old, new}`, or the single
/// `first_received` marker entry for a first observation.
#[derive(Debug, Clone, PartialEq)]
pub enum ChangeSet {
    /// No snapshot existed for the ticket
    FirstObservation,
    /// Per-field changes; empty when nothing meaningful changed
    Fields(BTreeMap<String, ChangeEntry>),
}

impl ChangeSet {
    /// An empty field change set
    pub fn empty() -> Self {
        ChangeSet::Fields(BTreeMap::new())
    }

    pub fn is_first_observation(&self) -> bool {
        matches!(self, ChangeSet::FirstObservation)
    }

    /// True when no change is reported
    pub fn is_empty(&self) -> bool {
        match self {
            ChangeSet::FirstObservation => false,
            ChangeSet::Fields(fields) => fields.is_empty(),
        }
    }

    /// Number of entries; the first-observation marker counts as one
    pub fn len(&self) -> usize {
        match self {
            ChangeSet::FirstObservation => 1,
            ChangeSet::Fields(fields) => fields.len(),
        }
    }

    /// Change entry for a field, if that field changed
    pub fn get(&self, field: &str) -> Option<&ChangeEntry> {
        match self {
            ChangeSet::FirstObservation => None,
            ChangeSet::Fields(fields) => fields.get(field),
        }
    }

    /// Changed fields in name order (none for a first observation)
    pub fn fields(&self) -> impl Iterator<Item = (&str, &ChangeEntry)> {
        let fields = match self {
            ChangeSet::FirstObservation => None,
            ChangeSet::Fields(fields) => Some(fields),
        };
        fields
            .into_iter()
            .flat_map(|f| f.iter().map(|(k, v)| (k.as_str(), v)))
    }
}

impl Default for ChangeSet {
    fn default() -> Self {
        Self::empty()
    }
}

impl Serialize for ChangeSet {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            ChangeSet::FirstObservation => {
                let mut map = serializer.serialize_map(Some(1))?;
                map.serialize_entry(CHANGE_FIRST_RECEIVED, FIRST_RECEIVED_MESSAGE)?;
                map.end()
            }
            ChangeSet::Fields(fields) => fields.serialize(serializer),
        }
    }
}

impl<'de> Deserialize<'de> for ChangeSet {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = BTreeMap::<String, Value>::deserialize(deserializer)?;
        if raw.len() == 1 {
            if let Some(Value::String(marker)) = raw.get(CHANGE_FIRST_RECEIVED) {
                if marker == FIRST_RECEIVED_MESSAGE {
                    return Ok(ChangeSet::FirstObservation);
                }
            }
        }
        raw.into_iter()
            .map(|(field, entry)| {
                serde_json::from_value::<ChangeEntry>(entry)
                    .map(|entry| (field, entry))
                    .map_err(D::Error::custom)
            })
            .collect::<Result<BTreeMap<_, _>, _>>()
            .map(ChangeSet::Fields)
    }
}

/// Result of comparing a stored snapshot with a new payload.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Comparison {
    /// True iff `changes` is non-empty
    pub changed: bool,
    pub changes: ChangeSet,
}

impl Comparison {
    pub fn first_observation() -> Self {
        Self {
            changed: true,
            changes: ChangeSet::FirstObservation,
        }
    }

    pub fn from_fields(fields: BTreeMap<String, ChangeEntry>) -> Self {
        Self {
            changed: !fields.is_empty(),
            changes: ChangeSet::Fields(fields),
        }
    }
}
