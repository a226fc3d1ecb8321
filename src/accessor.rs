//! The per-property strategy contract.
//!
//! A [`Descriptor`](crate::Descriptor) holds one boxed [`PropertyAccessor`]
//! per declared property. Accessors carry no instance data: everything they
//! touch lives in the settings values passed to them.

use std::fmt;

use serde_json::Value;

use crate::error::SettingsError;

/// The declared shape of a property's value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PropertyKind {
    /// A leaf value converted through [`ScalarValue`](crate::ScalarValue).
    Scalar,
    /// A leaf value that may be absent (`Option<_>`).
    NullableScalar,
    /// A value that is itself a settings type.
    Nested,
    /// An ordered collection of settings values.
    Collection,
}

impl PropertyKind {
    pub fn is_scalar(self) -> bool {
        matches!(self, PropertyKind::Scalar | PropertyKind::NullableScalar)
    }
}

impl fmt::Display for PropertyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            PropertyKind::Scalar => "scalar",
            PropertyKind::NullableScalar => "nullable scalar",
            PropertyKind::Nested => "nested settings",
            PropertyKind::Collection => "settings collection",
        };
        f.write_str(name)
    }
}

/// Initialize, copy, reset, compare and (de)serialize one property of `T`.
pub trait PropertyAccessor<T>: Send + Sync {
    /// The name used for this property in documents.
    fn name(&self) -> &str;

    fn kind(&self) -> PropertyKind;

    /// Establish the default value on a newly constructed instance.
    ///
    /// Runs exactly once per instance, before the instance is handed out.
    fn initialize_value(&self, instance: &mut T);

    /// Write `to`'s value for this property from `from`'s value, deeply.
    fn copy(&self, from: &T, to: &mut T);

    /// Restore the value a fresh instance would have.
    fn reset_value(&self, instance: &mut T);

    /// Whether both instances hold equivalent values for this property.
    fn compare_values(&self, x: &T, y: &T) -> bool;

    /// Read `node` into this property.
    ///
    /// The caller only invokes this when the document mentions the property;
    /// absent properties keep their current value.
    fn from_document(&self, instance: &mut T, node: &Value) -> Result<(), SettingsError>;

    /// Merge this property's current value into `node`.
    ///
    /// `node` is the existing child for this property, or `null` if the
    /// document had none. Existing structure is updated in place so unknown
    /// keys and key order survive.
    fn update_document(&self, instance: &T, node: &mut Value) -> Result<(), SettingsError>;
}

impl<T> fmt::Debug for dyn PropertyAccessor<T> + '_ {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PropertyAccessor")
            .field("name", &self.name())
            .field("kind", &self.kind())
            .finish()
    }
}
