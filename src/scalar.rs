//! Leaf values: the type converter and the scalar accessor.
//!
//! [`ScalarValue`] is the converter keyed by target type. Its provided methods
//! go through serde, so any `Serialize + Deserialize` type becomes a scalar
//! with an empty impl:
//!
//! ```ignore
//! #[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
//! #[serde(rename_all = "lowercase")]
//! enum Mode { #[default] Fast, Slow }
//!
//! impl ScalarValue for Mode {}
//! ```

use std::path::PathBuf;

use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::accessor::{PropertyAccessor, PropertyKind};
use crate::error::{ConversionError, SettingsError};

/// Conversion between a Rust value, its default literal and its document node.
///
/// The zero value used when a property declares no default is
/// `Default::default()`.
pub trait ScalarValue:
    Clone + PartialEq + Default + Serialize + DeserializeOwned + Send + Sync + 'static
{
    /// Whether the type can hold "no value".
    const NULLABLE: bool = false;

    /// Parse a default literal.
    ///
    /// The literal is first offered to the type's deserializer as a string.
    /// That covers strings, chars, paths, enums by variant name (`"fast"`),
    /// dates and times in ISO 8601 (`"2000-01-01"`, `"12:30:00"`,
    /// `"2000-01-01T12:30:00Z"`) and decimals (`"42.1234"`).
    ///
    /// Failing that, the trimmed literal is read as a JSON token: integers
    /// (`-12`, no leading `+`), floats (`1.5`, `1e3`) and lowercase `true` /
    /// `false`. Parsing never depends on the locale.
    fn parse_literal(literal: &str) -> Result<Self, ConversionError> {
        if let Ok(value) = serde_json::from_value(Value::String(literal.to_string())) {
            return Ok(value);
        }
        serde_json::from_str(literal.trim()).map_err(ConversionError::new)
    }

    fn from_node(node: &Value) -> Result<Self, ConversionError> {
        Self::deserialize(node).map_err(ConversionError::new)
    }

    fn to_node(&self) -> Result<Value, ConversionError> {
        serde_json::to_value(self).map_err(ConversionError::new)
    }

    /// Whether two values count as the same setting. `==` unless overridden.
    fn equivalent(&self, other: &Self) -> bool {
        self == other
    }
}

impl<V: ScalarValue> ScalarValue for Option<V> {
    const NULLABLE: bool = true;

    fn parse_literal(literal: &str) -> Result<Self, ConversionError> {
        if literal == "null" {
            return Ok(None);
        }
        V::parse_literal(literal).map(Some)
    }

    fn from_node(node: &Value) -> Result<Self, ConversionError> {
        if node.is_null() {
            return Ok(None);
        }
        V::from_node(node).map(Some)
    }

    fn to_node(&self) -> Result<Value, ConversionError> {
        match self {
            Some(value) => value.to_node(),
            None => Ok(Value::Null),
        }
    }

    fn equivalent(&self, other: &Self) -> bool {
        match (self, other) {
            (Some(a), Some(b)) => a.equivalent(b),
            (None, None) => true,
            _ => false,
        }
    }
}

macro_rules! serde_scalars {
    ($($ty:ty),* $(,)?) => {
        $(impl ScalarValue for $ty {})*
    };
}

serde_scalars!(
    bool, char, String, PathBuf, i8, i16, i32, i64, isize, u8, u16, u32, u64, usize,
);

// NaN equals itself, and non-finite values have no JSON form.
macro_rules! float_scalars {
    ($($ty:ty),*) => {
        $(impl ScalarValue for $ty {
            fn to_node(&self) -> Result<Value, ConversionError> {
                if !self.is_finite() {
                    return Err(ConversionError::new(format!(
                        "{} cannot be written to a document",
                        self
                    )));
                }
                serde_json::to_value(self).map_err(ConversionError::new)
            }

            fn equivalent(&self, other: &Self) -> bool {
                self == other || (self.is_nan() && other.is_nan())
            }
        })*
    };
}

float_scalars!(f32, f64);

serde_scalars!(
    chrono::NaiveDate,
    chrono::NaiveTime,
    chrono::NaiveDateTime,
    chrono::DateTime<chrono::Utc>,
);

#[cfg(feature = "decimal")]
serde_scalars!(rust_decimal::Decimal);

/// Accessor for a leaf property.
pub struct ScalarAccessor<T, V> {
    name: String,
    get: fn(&T) -> &V,
    get_mut: fn(&mut T) -> &mut V,
    default: V,
}

impl<T, V: ScalarValue> ScalarAccessor<T, V> {
    /// Build the accessor, parsing `default` once.
    pub fn new(
        name: impl Into<String>,
        get: fn(&T) -> &V,
        get_mut: fn(&mut T) -> &mut V,
        default: Option<&str>,
    ) -> Result<Self, ConversionError> {
        let default = match default {
            Some(literal) => V::parse_literal(literal)?,
            None => V::default(),
        };
        Ok(Self {
            name: name.into(),
            get,
            get_mut,
            default,
        })
    }
}

impl<T, V: ScalarValue> PropertyAccessor<T> for ScalarAccessor<T, V> {
    fn name(&self) -> &str {
        &self.name
    }

    fn kind(&self) -> PropertyKind {
        if V::NULLABLE {
            PropertyKind::NullableScalar
        } else {
            PropertyKind::Scalar
        }
    }

    fn initialize_value(&self, instance: &mut T) {
        *(self.get_mut)(instance) = self.default.clone();
    }

    fn copy(&self, from: &T, to: &mut T) {
        (self.get_mut)(to).clone_from((self.get)(from));
    }

    fn reset_value(&self, instance: &mut T) {
        (self.get_mut)(instance).clone_from(&self.default);
    }

    fn compare_values(&self, x: &T, y: &T) -> bool {
        (self.get)(x).equivalent((self.get)(y))
    }

    fn from_document(&self, instance: &mut T, node: &Value) -> Result<(), SettingsError> {
        let value = V::from_node(node).map_err(|e| e.at(&self.name))?;
        *(self.get_mut)(instance) = value;
        Ok(())
    }

    fn update_document(&self, instance: &T, node: &mut Value) -> Result<(), SettingsError> {
        *node = (self.get)(instance).to_node().map_err(|e| e.at(&self.name))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::test::Mode;
    use chrono::NaiveDate;
    use serde_json::json;

    #[test]
    fn literal_integer() {
        assert_eq!(i32::parse_literal("42").unwrap(), 42);
        assert_eq!(u16::parse_literal(" 8080 ").unwrap(), 8080);
    }

    #[test]
    fn literal_integer_out_of_range() {
        assert!(u8::parse_literal("300").is_err());
    }

    #[test]
    fn literal_bool_and_float() {
        assert!(bool::parse_literal("true").unwrap());
        assert_eq!(f64::parse_literal("1.5").unwrap(), 1.5);
    }

    #[test]
    fn literal_string_is_taken_verbatim() {
        assert_eq!(String::parse_literal("Hello").unwrap(), "Hello");
        assert_eq!(String::parse_literal("42").unwrap(), "42");
    }

    #[test]
    fn literal_date() {
        assert_eq!(
            NaiveDate::parse_literal("2000-01-01").unwrap(),
            NaiveDate::from_ymd_opt(2000, 1, 1).unwrap()
        );
        assert!(NaiveDate::parse_literal("2000-13-01").is_err());
    }

    #[test]
    fn literal_enum() {
        assert_eq!(Mode::parse_literal("slow").unwrap(), Mode::Slow);
        assert!(Mode::parse_literal("medium").is_err());
    }

    #[test]
    fn nullable_null_literal_skips_converter() {
        assert_eq!(Option::<u8>::parse_literal("null").unwrap(), None);
        assert_eq!(Option::<String>::parse_literal("null").unwrap(), None);
        assert_eq!(Option::<u8>::parse_literal("12").unwrap(), Some(12));
    }

    #[cfg(feature = "decimal")]
    #[test]
    fn literal_decimal() {
        use rust_decimal::Decimal;
        assert_eq!(
            Decimal::parse_literal("42.1234").unwrap(),
            Decimal::new(421234, 4)
        );
    }

    #[test]
    fn from_node_rejects_mismatched_shape() {
        assert!(i32::from_node(&json!("seven")).is_err());
        assert!(i32::from_node(&json!({"a": 1})).is_err());
        assert!(String::from_node(&json!(7)).is_err());
    }

    #[test]
    fn nullable_from_node() {
        assert_eq!(Option::<i32>::from_node(&json!(null)).unwrap(), None);
        assert_eq!(Option::<i32>::from_node(&json!(3)).unwrap(), Some(3));
    }

    #[test]
    fn to_node_formats() {
        assert_eq!(Mode::Slow.to_node().unwrap(), json!("slow"));
        assert_eq!(None::<i32>.to_node().unwrap(), json!(null));
        assert_eq!(
            NaiveDate::from_ymd_opt(2000, 1, 1).unwrap().to_node().unwrap(),
            json!("2000-01-01")
        );
    }

    #[test]
    fn nan_is_equivalent_to_itself() {
        assert!(f64::NAN.equivalent(&f64::NAN));
        assert!(f32::NAN.equivalent(&f32::NAN));
        assert!(Some(f64::NAN).equivalent(&Some(f64::NAN)));
        assert!(0.0f64.equivalent(&-0.0));
        assert!(!f64::NAN.equivalent(&1.0));
        assert!(!Some(f64::NAN).equivalent(&None));
    }

    #[test]
    fn non_finite_floats_are_not_written() {
        assert!(f64::NAN.to_node().is_err());
        assert!(f32::INFINITY.to_node().is_err());
        assert!(Some(f64::NEG_INFINITY).to_node().is_err());
        assert_eq!(1.5f64.to_node().unwrap(), json!(1.5));
    }

    #[test]
    fn literal_grammar_edges() {
        assert!(i32::parse_literal("+5").is_err());
        assert!(bool::parse_literal("True").is_err());
        assert_eq!(f64::parse_literal("1e3").unwrap(), 1000.0);
        assert_eq!(i64::parse_literal("-12").unwrap(), -12);
    }

    // -- Accessor behaviour on a bare struct ----------------------------------

    #[derive(Debug, Default)]
    struct Holder {
        greeting: String,
        limit: Option<u32>,
    }

    fn greeting() -> ScalarAccessor<Holder, String> {
        ScalarAccessor::<Holder, String>::new(
            "Greeting",
            |h| &h.greeting,
            |h| &mut h.greeting,
            Some("Hello"),
        )
        .unwrap()
    }

    fn limit() -> ScalarAccessor<Holder, Option<u32>> {
        ScalarAccessor::<Holder, Option<u32>>::new("Limit", |h| &h.limit, |h| &mut h.limit, None)
            .unwrap()
    }

    #[test]
    fn accessor_kinds() {
        assert_eq!(greeting().kind(), PropertyKind::Scalar);
        assert_eq!(limit().kind(), PropertyKind::NullableScalar);
    }

    #[test]
    fn initialize_and_reset_apply_default() {
        let acc = greeting();
        let mut h = Holder::default();
        acc.initialize_value(&mut h);
        assert_eq!(h.greeting, "Hello");
        h.greeting = "Hi".into();
        acc.reset_value(&mut h);
        assert_eq!(h.greeting, "Hello");
    }

    #[test]
    fn compare_is_nullable_aware() {
        let acc = limit();
        let mut a = Holder::default();
        let mut b = Holder::default();
        assert!(acc.compare_values(&a, &b));
        a.limit = Some(1);
        assert!(!acc.compare_values(&a, &b));
        b.limit = Some(1);
        assert!(acc.compare_values(&a, &b));
    }

    #[test]
    fn copy_assigns() {
        let acc = greeting();
        let from = Holder {
            greeting: "Hola".into(),
            ..Default::default()
        };
        let mut to = Holder::default();
        acc.copy(&from, &mut to);
        assert_eq!(to.greeting, "Hola");
    }

    #[test]
    fn from_document_reports_path() {
        let acc = limit();
        let mut h = Holder::default();
        let err = acc.from_document(&mut h, &json!("many")).unwrap_err();
        match err {
            SettingsError::Conversion { path, .. } => assert_eq!(path, "Limit"),
            other => panic!("Expected Conversion, got {other:?}"),
        }
        assert_eq!(h.limit, None);
    }

    #[test]
    fn update_document_overwrites_node() {
        let acc = limit();
        let h = Holder {
            limit: Some(9),
            ..Default::default()
        };
        let mut node = json!({"stale": true});
        acc.update_document(&h, &mut node).unwrap();
        assert_eq!(node, json!(9));
    }

    #[test]
    fn invalid_default_is_rejected() {
        let result = ScalarAccessor::<Holder, Option<u32>>::new(
            "Limit",
            |h| &h.limit,
            |h| &mut h.limit,
            Some("lots"),
        );
        assert!(result.is_err());
    }
}
