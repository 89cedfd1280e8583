use serde::{Deserialize, Deserializer, Serialize};
use serde::de::Error as _;
use serde_json::Value;

/// Per-minute streaming payment.
pub const ACTION_STREAM: i64 = 1;
/// Manual boost or boostagram. The only action that gets rendered.
pub const ACTION_BOOST: i64 = 2;

/// A boost as returned by the `/boosts` endpoint.
///
/// The backend is loose about types: indices and amounts show up either as
/// JSON numbers or as strings, and any text field may be missing or null.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Default)]
pub struct BoostEvent {
    #[serde(default, deserialize_with = "de_index")]
    pub index: String,

    #[serde(default, deserialize_with = "de_integer")]
    pub action: i64,

    #[serde(default, deserialize_with = "de_text")]
    pub message: String,

    #[serde(default, deserialize_with = "de_optional_integer")]
    pub value_msat: Option<i64>,

    #[serde(default, deserialize_with = "de_optional_integer")]
    pub value_msat_total: Option<i64>,

    #[serde(default, deserialize_with = "de_text")]
    pub sender: String,

    #[serde(default, deserialize_with = "de_text")]
    pub app: String,

    #[serde(default, deserialize_with = "de_text")]
    pub podcast: String,

    #[serde(default, deserialize_with = "de_text")]
    pub episode: String,

    #[serde(default, deserialize_with = "de_integer")]
    pub time: i64,
}

impl BoostEvent {
    pub fn is_boost(&self) -> bool {
        self.action == ACTION_BOOST
    }

    /// Amount in sats. A missing or zero total falls back to `value_msat`.
    pub fn sats(&self) -> i64 {
        let total = self.value_msat_total.map(|msat| msat / 1000).unwrap_or(0);

        if total != 0 {
            return total;
        }

        self.value_msat.map(|msat| msat / 1000).unwrap_or(0)
    }
}

fn de_index<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    match Value::deserialize(deserializer)? {
        Value::String(s) => Ok(s),
        Value::Number(num) => Ok(num.to_string()),
        Value::Null => Ok(String::new()),
        other => Err(D::Error::custom(format!("invalid boost index: {}", other))),
    }
}

fn de_text<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    match Value::deserialize(deserializer)? {
        Value::String(s) => Ok(s),
        Value::Null => Ok(String::new()),
        other => Ok(other.to_string()),
    }
}

fn de_optional_integer<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<i64>, D::Error> {
    match Value::deserialize(deserializer)? {
        Value::String(s) => {
            let s = s.trim();
            if s.is_empty() {
                return Ok(None);
            }
            s.parse()
                .map(Some)
                .map_err(|_| D::Error::custom(format!("invalid integer: {}", s)))
        }
        Value::Number(num) => match num.as_i64() {
            Some(n) => Ok(Some(n)),
            None => num
                .as_f64()
                .map(|f| Some(f.trunc() as i64))
                .ok_or_else(|| D::Error::custom(format!("invalid integer: {}", num))),
        },
        Value::Null => Ok(None),
        other => Err(D::Error::custom(format!("invalid integer: {}", other))),
    }
}

fn de_integer<'de, D: Deserializer<'de>>(deserializer: D) -> Result<i64, D::Error> {
    Ok(de_optional_integer(deserializer)?.unwrap_or(0))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parses_full_boost() {
        let json = r#"{
            "index": "10",
            "action": 2,
            "message": "great show",
            "value_msat": 20000,
            "value_msat_total": 21000,
            "sender": "alice",
            "app": "Fountain",
            "podcast": "Podcasting 2.0",
            "episode": "Episode 150",
            "time": 1700000000,
            "tlv": "{}"
        }"#;

        let boost: BoostEvent = serde_json::from_str(json).unwrap();

        assert_eq!(boost.index, "10");
        assert!(boost.is_boost());
        assert_eq!(boost.message, "great show");
        assert_eq!(boost.sender, "alice");
        assert_eq!(boost.app, "Fountain");
        assert_eq!(boost.time, 1700000000);
        assert_eq!(boost.sats(), 21);
    }

    #[test]
    fn test_numeric_index_is_normalized_to_text() {
        let boost: BoostEvent = serde_json::from_str(r#"{"index": 42, "action": 2}"#).unwrap();
        assert_eq!(boost.index, "42");
    }

    #[test]
    fn test_missing_fields_default_to_empty() {
        let boost: BoostEvent = serde_json::from_str(r#"{"index": "7", "message": null}"#).unwrap();

        assert_eq!(boost.message, "");
        assert_eq!(boost.sender, "");
        assert_eq!(boost.action, 0);
        assert!(!boost.is_boost());
        assert_eq!(boost.value_msat_total, None);
    }

    #[test]
    fn test_amount_uses_total() {
        let boost = BoostEvent { value_msat_total: Some(5000), ..Default::default() };
        assert_eq!(boost.sats(), 5);
    }

    #[test]
    fn test_amount_falls_back_to_value_msat() {
        let boost = BoostEvent { value_msat: Some(3000), ..Default::default() };
        assert_eq!(boost.sats(), 3);

        let zero_total = BoostEvent { value_msat: Some(3000), value_msat_total: Some(0), ..Default::default() };
        assert_eq!(zero_total.sats(), 3);
    }

    #[test]
    fn test_amount_truncates_and_defaults_to_zero() {
        let boost = BoostEvent { value_msat_total: Some(1999), ..Default::default() };
        assert_eq!(boost.sats(), 1);

        assert_eq!(BoostEvent::default().sats(), 0);
    }

    #[test]
    fn test_string_amounts() {
        let boost: BoostEvent =
            serde_json::from_str(r#"{"index": "1", "value_msat": "4000", "value_msat_total": ""}"#).unwrap();

        assert_eq!(boost.value_msat, Some(4000));
        assert_eq!(boost.value_msat_total, None);
        assert_eq!(boost.sats(), 4);
    }

    #[test]
    fn test_rejects_garbage_amount() {
        let result = serde_json::from_str::<BoostEvent>(r#"{"index": "1", "value_msat": "lots"}"#);
        assert!(result.is_err());
    }
}
