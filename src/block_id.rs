//! Block identifier resolution
//!
//! A block is addressed on the RPC surface either by its level (height) or by
//! its hash. Both are turned into the same kind of path segment here.

use crate::error::IdentifierError;
use serde_json::Value;
use std::fmt;

/// A reference to one block: its level or its hash.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum BlockId {
    Level(i64),
    Hash(String),
}

impl BlockId {
    /// Path segment used after `/chains/main/blocks/`.
    pub fn path_segment(&self) -> String {
        match self {
            BlockId::Level(level) => level.to_string(),
            BlockId::Hash(hash) => hash.clone(),
        }
    }
}

impl fmt::Display for BlockId {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            BlockId::Level(level) => write!(f, "{}", level),
            BlockId::Hash(hash) => f.write_str(hash),
        }
    }
}

/// Conversion into a [`BlockId`].
///
/// Implemented for the integer types (levels), for text (hashes) and for
/// dynamically typed JSON values. Floats and booleans deliberately have no
/// implementation.
pub trait IntoBlockId {
    fn into_block_id(self) -> Result<BlockId, IdentifierError>;
}

impl IntoBlockId for BlockId {
    fn into_block_id(self) -> Result<BlockId, IdentifierError> {
        Ok(self)
    }
}

impl IntoBlockId for &BlockId {
    fn into_block_id(self) -> Result<BlockId, IdentifierError> {
        Ok(self.clone())
    }
}

macro_rules! level_from_signed {
    ($($t:ty),*) => {
        $(impl IntoBlockId for $t {
            fn into_block_id(self) -> Result<BlockId, IdentifierError> {
                Ok(BlockId::Level(i64::from(self)))
            }
        })*
    };
}

macro_rules! level_from_unsigned {
    ($($t:ty),*) => {
        $(impl IntoBlockId for $t {
            fn into_block_id(self) -> Result<BlockId, IdentifierError> {
                i64::try_from(self)
                    .map(BlockId::Level)
                    .map_err(|_| IdentifierError::LevelOutOfRange(self as u64))
            }
        })*
    };
}

level_from_signed!(i8, i16, i32, i64, u8, u16, u32);
level_from_unsigned!(u64, usize);

impl IntoBlockId for &str {
    fn into_block_id(self) -> Result<BlockId, IdentifierError> {
        Ok(BlockId::Hash(self.to_string()))
    }
}

impl IntoBlockId for String {
    fn into_block_id(self) -> Result<BlockId, IdentifierError> {
        Ok(BlockId::Hash(self))
    }
}

impl IntoBlockId for &String {
    fn into_block_id(self) -> Result<BlockId, IdentifierError> {
        Ok(BlockId::Hash(self.clone()))
    }
}

impl IntoBlockId for &Value {
    fn into_block_id(self) -> Result<BlockId, IdentifierError> {
        match self {
            Value::String(hash) => Ok(BlockId::Hash(hash.clone())),
            Value::Number(n) => {
                if let Some(level) = n.as_i64() {
                    Ok(BlockId::Level(level))
                } else if let Some(level) = n.as_u64() {
                    Err(IdentifierError::LevelOutOfRange(level))
                } else {
                    Err(IdentifierError::UnsupportedKind("floating-point number"))
                }
            }
            Value::Bool(_) => Err(IdentifierError::UnsupportedKind("boolean")),
            Value::Null => Err(IdentifierError::UnsupportedKind("null")),
            Value::Array(_) => Err(IdentifierError::UnsupportedKind("array")),
            Value::Object(_) => Err(IdentifierError::UnsupportedKind("object")),
        }
    }
}

impl IntoBlockId for Value {
    fn into_block_id(self) -> Result<BlockId, IdentifierError> {
        match self {
            Value::String(hash) => Ok(BlockId::Hash(hash)),
            other => (&other).into_block_id(),
        }
    }
}

/// Resolve a block reference into its path segment.
pub fn resolve<I: IntoBlockId>(id: I) -> Result<String, IdentifierError> {
    id.into_block_id().map(|id| id.path_segment())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_integer_levels_are_rendered_verbatim() {
        assert_eq!(resolve(0).unwrap(), "0");
        assert_eq!(resolve(458_752i64).unwrap(), "458752");
        assert_eq!(resolve(7u32).unwrap(), "7");
        assert_eq!(resolve(1_000_000u64).unwrap(), "1000000");
        assert_eq!(resolve(12usize).unwrap(), "12");
        assert_eq!(resolve(5u8).unwrap(), "5");
        assert_eq!(resolve(300u16).unwrap(), "300");
        assert_eq!(resolve(-3i8).unwrap(), "-3");
        assert_eq!(resolve(i16::MAX).unwrap(), "32767");
        // Negative levels are passed through; the node decides what they mean.
        assert_eq!(resolve(-1).unwrap(), "-1");
    }

    #[test]
    fn test_hashes_are_not_transformed() {
        let hash = "BLz6yCE4BUL4ppo1zsEWdK9FRCt15WAY7ECQcuK9RtWg4xeEVL7";
        assert_eq!(resolve(hash).unwrap(), hash);
        assert_eq!(resolve(hash.to_string()).unwrap(), hash);
        assert_eq!(resolve("head~2").unwrap(), "head~2");
    }

    #[test]
    fn test_dynamic_values() {
        assert_eq!(resolve(json!(42)).unwrap(), "42");
        assert_eq!(resolve(&json!("BKabc")).unwrap(), "BKabc");
        assert_eq!(
            json!("BKabc").into_block_id().unwrap(),
            BlockId::Hash("BKabc".to_string())
        );
    }

    #[test]
    fn test_unsupported_kinds_are_rejected() {
        let cases = [
            (json!(true), "boolean"),
            (json!(1.5), "floating-point number"),
            (json!(null), "null"),
            (json!([1]), "array"),
            (json!({"level": 1}), "object"),
        ];
        for (value, kind) in cases {
            assert_eq!(
                resolve(&value),
                Err(IdentifierError::UnsupportedKind(kind)),
                "value {} was not rejected",
                value
            );
        }
    }

    #[test]
    fn test_unsigned_overflow_is_rejected() {
        assert_eq!(
            resolve(u64::MAX),
            Err(IdentifierError::LevelOutOfRange(u64::MAX))
        );
        assert_eq!(
            resolve(json!(u64::MAX)),
            Err(IdentifierError::LevelOutOfRange(u64::MAX))
        );
    }
}
