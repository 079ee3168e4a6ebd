//! Tri-state field patch for partial updates.
//!
//! A partial update has to distinguish three inputs per field: the field was
//! absent from the request (leave the stored value alone), the field was an
//! explicit JSON `null` (clear the stored value), or the field carried a
//! value (overwrite). `Option<T>` collapses the first two, so update inputs
//! use this enum instead.

use serde::{Deserialize, Deserializer, Serialize, Serializer};

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Patch<T> {
    /// Field absent from the request; keep the stored value.
    #[default]
    Keep,
    /// Field explicitly `null`; clear the stored value.
    Clear,
    /// Field carried a value; overwrite the stored value.
    Set(T),
}

impl<T> Patch<T> {
    pub fn is_keep(&self) -> bool {
        matches!(self, Patch::Keep)
    }

    /// Apply the patch to a stored slot.
    pub fn apply(self, slot: &mut Option<T>) {
        match self {
            Patch::Keep => {}
            Patch::Clear => *slot = None,
            Patch::Set(v) => *slot = Some(v),
        }
    }
}

// Deserializes the *present* cases: `null` -> Clear, value -> Set. The Keep
// case comes from `#[serde(default)]` on the containing struct field, which
// is why every Patch field must carry that attribute.
impl<'de, T> Deserialize<'de> for Patch<T>
where
    T: Deserialize<'de>,
{
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        Ok(match Option::<T>::deserialize(deserializer)? {
            Some(v) => Patch::Set(v),
            None => Patch::Clear,
        })
    }
}

// Keep serializes as `null` too, so senders must pair this with
// `#[serde(skip_serializing_if = "Patch::is_keep")]`.
impl<T> Serialize for Patch<T>
where
    T: Serialize,
{
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            Patch::Keep | Patch::Clear => serializer.serialize_none(),
            Patch::Set(v) => v.serialize(serializer),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Deserialize, Serialize, Default)]
    struct Probe {
        #[serde(default, skip_serializing_if = "Patch::is_keep")]
        note: Patch<String>,
        #[serde(default, skip_serializing_if = "Patch::is_keep")]
        count: Patch<i64>,
    }

    #[test]
    fn missing_field_deserializes_to_keep() {
        let p: Probe = serde_json::from_str("{}").unwrap();
        assert_eq!(p.note, Patch::Keep);
        assert_eq!(p.count, Patch::Keep);
    }

    #[test]
    fn null_field_deserializes_to_clear() {
        let p: Probe = serde_json::from_str(r#"{"note": null}"#).unwrap();
        assert_eq!(p.note, Patch::Clear);
        assert_eq!(p.count, Patch::Keep);
    }

    #[test]
    fn value_field_deserializes_to_set() {
        let p: Probe = serde_json::from_str(r#"{"note": "hi", "count": 7}"#).unwrap();
        assert_eq!(p.note, Patch::Set("hi".to_string()));
        assert_eq!(p.count, Patch::Set(7));
    }

    #[test]
    fn apply_keep_leaves_slot_untouched() {
        let mut slot = Some("original".to_string());
        Patch::<String>::Keep.apply(&mut slot);
        assert_eq!(slot.as_deref(), Some("original"));
    }

    #[test]
    fn apply_clear_empties_slot() {
        let mut slot = Some("original".to_string());
        Patch::<String>::Clear.apply(&mut slot);
        assert_eq!(slot, None);
    }

    #[test]
    fn apply_set_overwrites_slot() {
        let mut slot: Option<String> = None;
        Patch::Set("new".to_string()).apply(&mut slot);
        assert_eq!(slot.as_deref(), Some("new"));
    }

    #[test]
    fn keep_is_skipped_on_serialize() {
        let p = Probe {
            note: Patch::Clear,
            count: Patch::Keep,
        };
        let json = serde_json::to_value(&p).unwrap();
        assert!(json.as_object().unwrap().contains_key("note"));
        assert!(json["note"].is_null());
        assert!(!json.as_object().unwrap().contains_key("count"));
    }
}
