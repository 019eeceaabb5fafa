use serde::{self, Deserializer};

struct Visitor;

impl serde::de::Visitor<'_> for Visitor {
    type Value = f64;

    fn expecting(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("a finite number or a string containing one")
    }

    #[allow(clippy::cast_precision_loss, reason = "ratings are small integers")]
    fn visit_u64<E>(self, v: u64) -> Result<f64, E>
    where
        E: serde::de::Error,
    {
        Ok(v as f64)
    }

    #[allow(clippy::cast_precision_loss, reason = "ratings are small integers")]
    fn visit_i64<E>(self, v: i64) -> Result<f64, E>
    where
        E: serde::de::Error,
    {
        Ok(v as f64)
    }

    fn visit_f64<E>(self, v: f64) -> Result<f64, E>
    where
        E: serde::de::Error,
    {
        if v.is_finite() {
            Ok(v)
        } else {
            Err(E::custom(format!("`{v}` is not a finite number")))
        }
    }

    fn visit_str<E>(self, v: &str) -> Result<f64, E>
    where
        E: serde::de::Error,
    {
        let number = v.trim().parse::<f64>().map_err(E::custom)?;
        serde::de::Visitor::visit_f64(self, number)
    }
}

/// `numeric` columns can come back from PostgREST as either JSON numbers or strings.
pub fn f64_from_number_or_string<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    deserializer.deserialize_any(Visitor)
}

/// Same as [`f64_from_number_or_string`], but `null` maps to `None`.
pub fn option_f64_from_number_or_string<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    struct OptionVisitor;

    impl<'de> serde::de::Visitor<'de> for OptionVisitor {
        type Value = Option<f64>;

        fn expecting(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            f.write_str("null, a finite number or a string containing one")
        }

        fn visit_none<E>(self) -> Result<Self::Value, E>
        where
            E: serde::de::Error,
        {
            Ok(None)
        }

        fn visit_unit<E>(self) -> Result<Self::Value, E>
        where
            E: serde::de::Error,
        {
            Ok(None)
        }

        fn visit_some<D>(self, deserializer: D) -> Result<Self::Value, D::Error>
        where
            D: Deserializer<'de>,
        {
            f64_from_number_or_string(deserializer).map(Some)
        }
    }

    deserializer.deserialize_option(OptionVisitor)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Deserialize)]
    struct Row {
        #[serde(deserialize_with = "f64_from_number_or_string")]
        rating: f64,
    }

    #[derive(Deserialize)]
    struct MaybeRow {
        #[serde(deserialize_with = "option_f64_from_number_or_string")]
        average: Option<f64>,
    }

    #[test]
    fn should_accept_integers_floats_and_strings() {
        for (json, expected) in [
            (r#"{"rating":4}"#, 4.0),
            (r#"{"rating":-1}"#, -1.0),
            (r#"{"rating":3.5}"#, 3.5),
            (r#"{"rating":"4.2500"}"#, 4.25),
        ] {
            let row: Row = serde_json::from_str(json).unwrap();
            assert!((row.rating - expected).abs() < f64::EPSILON, "{json}");
        }
    }

    #[test]
    fn should_reject_null_and_garbage() {
        assert!(serde_json::from_str::<Row>(r#"{"rating":null}"#).is_err());
        assert!(serde_json::from_str::<Row>(r#"{"rating":"five"}"#).is_err());
        assert!(serde_json::from_str::<Row>(r#"{"rating":"NaN"}"#).is_err());
    }

    #[test]
    fn should_map_null_to_none() {
        let row: MaybeRow = serde_json::from_str(r#"{"average":null}"#).unwrap();
        assert_eq!(None, row.average);

        let row: MaybeRow = serde_json::from_str(r#"{"average":"4.0000000000000000"}"#).unwrap();
        assert_eq!(Some(4.0), row.average);
    }
}
