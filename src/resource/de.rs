//! Serde helpers for lenient API payloads

use serde::{Deserialize, Deserializer};

/// Decode `null` as the type's default value
pub(crate) fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Decode a string or a bool into a string. `null` becomes empty.
pub(crate) fn string_or_bool<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Flag {
        Text(String),
        Bool(bool),
    }

    Ok(match Option::<Flag>::deserialize(deserializer)? {
        Some(Flag::Text(text)) => text,
        Some(Flag::Bool(flag)) => flag.to_string(),
        None => String::new(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Default, Deserialize)]
    #[serde(default)]
    struct Record {
        #[serde(deserialize_with = "null_as_default")]
        count: u64,
        #[serde(deserialize_with = "null_as_default")]
        enabled: bool,
        #[serde(deserialize_with = "string_or_bool")]
        flag: String,
    }

    #[test]
    fn test_null_numbers_and_bools_take_defaults() {
        let record: Record =
            serde_json::from_str(r#"{"count":null,"enabled":null,"flag":null}"#).unwrap();
        assert_eq!(record.count, 0);
        assert!(!record.enabled);
        assert!(record.flag.is_empty());
    }

    #[test]
    fn test_string_or_bool() {
        let record: Record = serde_json::from_str(r#"{"flag":false}"#).unwrap();
        assert_eq!(record.flag, "false");
        let record: Record = serde_json::from_str(r#"{"flag":"true"}"#).unwrap();
        assert_eq!(record.flag, "true");
        assert!(serde_json::from_str::<Record>(r#"{"flag":3}"#).is_err());
    }
}
