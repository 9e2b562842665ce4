//! Record id generation.
//!
//! Generated ids have the shape `{epoch-millis}_{6 base36 chars}`; caller ids
//! are kept verbatim.

use chrono::{DateTime, Utc};
use rand::Rng;
use serde::{Deserialize, Deserializer};
use serde_json::Value;

const BASE36_ALPHABET: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";
const RANDOM_SUFFIX_LEN: usize = 6;

/// Generates a fresh id stamped with `now`.
pub fn generate_record_id(now: DateTime<Utc>) -> String {
    generate_record_id_with(&mut rand::thread_rng(), now)
}

/// Same as [`generate_record_id`] with a caller-provided RNG.
pub fn generate_record_id_with(rng: &mut impl Rng, now: DateTime<Utc>) -> String {
    let suffix: String = (0..RANDOM_SUFFIX_LEN)
        .map(|_| char::from(BASE36_ALPHABET[rng.gen_range(0..BASE36_ALPHABET.len())]))
        .collect();
    format!("{}_{suffix}", now.timestamp_millis())
}

/// Keeps a non-blank caller id, otherwise generates one.
pub(crate) fn keep_or_generate(id: Option<&str>, now: DateTime<Utc>) -> String {
    match id {
        Some(id) if !id.trim().is_empty() => id.to_string(),
        _ => generate_record_id(now),
    }
}

/// `deserialize_with` helper for input ids: strings are kept, numbers are
/// rendered as text, anything else reads as absent.
pub(crate) fn deserialize_loose_id<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<Option<String>, D::Error> {
    Ok(match Option::<Value>::deserialize(deserializer)? {
        Some(Value::String(text)) => Some(text),
        Some(Value::Number(number)) => Some(number.to_string()),
        _ => None,
    })
}
