//! Data-type tags and type identifiers
//!
//! Every registered entity type stores its data in exactly one store-native
//! structure. `DataType` names that structure and selects the accessor family
//! the type gains on registration.
//!
//! | Tag | Family | Store structure | Absent reads as |
//! |-----|--------|-----------------|-----------------|
//! | `string` | StringValue | string | `None` |
//! | `counter` / `value` | Counter | string (integer) | `0` |
//! | `integer` | IntegerValue | string (integer) | `None` |
//! | `float` | FloatValue | string (float) | `None` |
//! | `timestamp` | Timestamp | string (ISO-8601) | `None` |
//! | `list` | List | list | `[]` |
//! | `set` | Set | set | `[]` |
//! | `sorted_set` | SortedSet | ordered set | `[]` |
//! | `hash` | Hash | hash | `{}` |

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::Error;

/// Store data type declared by a schema
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DataType {
    /// Plain string scalar
    String,
    /// Atomic integer counter; absence reads as zero
    Counter,
    /// Float scalar
    Float,
    /// Integer scalar; absence reads as none
    Integer,
    /// Append-only list
    List,
    /// Score-ordered set (descending by default)
    SortedSet,
    /// Unordered set
    Set,
    /// Field/value hash
    Hash,
    /// UTC timestamp stored as ISO-8601
    Timestamp,
}

impl DataType {
    /// All data types (for iteration)
    pub const ALL: [DataType; 9] = [
        DataType::String,
        DataType::Counter,
        DataType::Float,
        DataType::Integer,
        DataType::List,
        DataType::SortedSet,
        DataType::Set,
        DataType::Hash,
        DataType::Timestamp,
    ];

    /// Short identifier (for configuration and diagnostics)
    pub const fn id(&self) -> &'static str {
        match self {
            DataType::String => "string",
            DataType::Counter => "counter",
            DataType::Float => "float",
            DataType::Integer => "integer",
            DataType::List => "list",
            DataType::SortedSet => "sorted_set",
            DataType::Set => "set",
            DataType::Hash => "hash",
            DataType::Timestamp => "timestamp",
        }
    }

    /// Parse from short identifier
    ///
    /// `value` is accepted as an alias of `counter`.
    pub fn from_id(id: &str) -> Option<Self> {
        match id {
            "string" => Some(DataType::String),
            "counter" | "value" => Some(DataType::Counter),
            "float" => Some(DataType::Float),
            "integer" => Some(DataType::Integer),
            "list" => Some(DataType::List),
            "sorted_set" => Some(DataType::SortedSet),
            "set" => Some(DataType::Set),
            "hash" => Some(DataType::Hash),
            "timestamp" => Some(DataType::Timestamp),
            _ => None,
        }
    }

    /// Whether the type is stored as a plain string key
    pub const fn is_scalar(&self) -> bool {
        matches!(
            self,
            DataType::String
                | DataType::Counter
                | DataType::Float
                | DataType::Integer
                | DataType::Timestamp
        )
    }
}

impl fmt::Display for DataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.id())
    }
}

impl FromStr for DataType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        DataType::from_id(s).ok_or_else(|| Error::UnknownType(s.to_string()))
    }
}

/// Handle of an entity type inside a type arena
///
/// Ids are issued sequentially by the arena that defines the type and are
/// only meaningful to that arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TypeId(usize);

impl TypeId {
    /// Wrap a raw arena index
    pub const fn from_index(index: usize) -> Self {
        TypeId(index)
    }

    /// Raw arena index
    pub const fn index(&self) -> usize {
        self.0
    }
}

impl fmt::Display for TypeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "type#{}", self.0)
    }
}
