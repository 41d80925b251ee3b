use serde::{Deserialize, Deserializer, Serialize};

use super::id_macro::impl_id;

/// Opaque snippet identifier assigned by the remote source.
///
/// Remote payloads have carried both string and integer ids over time, so
/// deserialization accepts either and normalizes to a string.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct SnippetId(String);

impl_id!(SnippetId);

impl<'de> Deserialize<'de> for SnippetId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum RawId {
            Text(String),
            Integer(i64),
        }

        Ok(match RawId::deserialize(deserializer)? {
            RawId::Text(s) => SnippetId(s),
            RawId::Integer(n) => SnippetId(n.to_string()),
        })
    }
}
