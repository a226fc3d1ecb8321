use std::sync::Arc;

use serde_json::Value;

use crate::descriptor::{Descriptor, Properties};
use crate::error::SettingsError;
use crate::registry;

/// A struct whose properties are managed through a [`Descriptor`].
///
/// Implementors supply two things: placeholder storage ([`blank`]) and the
/// ordered property list ([`declare`]). Every other method is provided and
/// runs on the type's cached descriptor. The [`settings!`](crate::settings!)
/// macro writes both for you.
///
/// # Panics
///
/// The provided methods panic if the declaration is invalid (bad default
/// literal, duplicate document name, cyclic nesting). Those are programming
/// errors; use [`registry::descriptor`] to check a declaration without
/// panicking.
///
/// [`blank`]: Settings::blank
/// [`declare`]: Settings::declare
pub trait Settings: Sized + 'static {
    /// Storage to initialize. Every value is overwritten by its property's
    /// initializer before the instance is handed out, so any cheap value
    /// will do (`Default::default()` for scalars and collections,
    /// `N::blank()` for nested settings).
    fn blank() -> Self;

    /// List the properties, in document order.
    fn declare(properties: &mut Properties<Self>);

    fn descriptor() -> Arc<Descriptor<Self>> {
        match registry::descriptor::<Self>() {
            Ok(descriptor) => descriptor,
            Err(e) => panic!("{e}"),
        }
    }

    /// A new instance with every property at its default.
    fn create() -> Self {
        Self::descriptor().create()
    }

    /// A deep copy: nested settings and collection elements are copied, not
    /// shared.
    fn create_copy(&self) -> Self {
        Self::descriptor().create_copy(self)
    }

    /// Overwrite every property with `source`'s value, deeply, in place.
    fn copy_from(&mut self, source: &Self) {
        Self::descriptor().copy(source, self)
    }

    /// Put every property back to the value a fresh instance has.
    fn reset_values(&mut self) {
        Self::descriptor().reset(self)
    }

    /// Structural equality over every declared property.
    fn is_equivalent_to(&self, other: &Self) -> bool {
        Self::descriptor().is_equivalent(self, other)
    }

    /// Overlay an object node. Properties the node omits are left alone.
    fn read_document(&mut self, node: &Value) -> Result<(), SettingsError> {
        Self::descriptor().read_document(self, node)
    }

    /// Serialize into `existing` (merging, order preserving) or into a fresh
    /// object node.
    fn write_document(&self, existing: Option<Value>) -> Result<Value, SettingsError> {
        match existing {
            Some(mut node) => {
                self.update_document(&mut node)?;
                Ok(node)
            }
            None => self.to_document(),
        }
    }

    fn update_document(&self, node: &mut Value) -> Result<(), SettingsError> {
        Self::descriptor().update_document(self, node)
    }

    fn to_document(&self) -> Result<Value, SettingsError> {
        Self::descriptor().to_document(self)
    }
}
