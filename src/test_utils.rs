//! Shared helpers for module test suites.

/// Serde round-trip assertions.
pub mod serde {
    use std::fmt::Debug;

    use ::serde::de::DeserializeOwned;
    use ::serde::Serialize;

    /// Serialize through serde_json and back, requiring structural
    /// equality.
    pub fn assert_round_trip_eq<T>(value: &T)
    where
        T: Serialize + DeserializeOwned + PartialEq + Debug,
    {
        let encoded = serde_json::to_string(value).expect("round-trip serialization failed");
        let decoded: T = serde_json::from_str(&encoded).expect("round-trip deserialization failed");
        assert_eq!(decoded, *value, "round-trip changed the value");
    }
}
