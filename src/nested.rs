use std::sync::Arc;

use serde_json::Value;

use crate::accessor::{PropertyAccessor, PropertyKind};
use crate::descriptor::Descriptor;
use crate::error::SettingsError;
use crate::settings::Settings;

/// Accessor for a property whose value is itself a settings type.
///
/// Every operation delegates to the nested type's descriptor, resolved when
/// the owning descriptor is built.
pub struct NestedAccessor<T, N: Settings> {
    name: String,
    get: fn(&T) -> &N,
    get_mut: fn(&mut T) -> &mut N,
    nested: Arc<Descriptor<N>>,
}

impl<T, N: Settings> NestedAccessor<T, N> {
    pub fn new(
        name: impl Into<String>,
        get: fn(&T) -> &N,
        get_mut: fn(&mut T) -> &mut N,
        nested: Arc<Descriptor<N>>,
    ) -> Self {
        Self {
            name: name.into(),
            get,
            get_mut,
            nested,
        }
    }
}

impl<T, N: Settings> PropertyAccessor<T> for NestedAccessor<T, N> {
    fn name(&self) -> &str {
        &self.name
    }

    fn kind(&self) -> PropertyKind {
        PropertyKind::Nested
    }

    fn initialize_value(&self, instance: &mut T) {
        *(self.get_mut)(instance) = self.nested.create();
    }

    fn copy(&self, from: &T, to: &mut T) {
        self.nested.copy((self.get)(from), (self.get_mut)(to));
    }

    fn reset_value(&self, instance: &mut T) {
        self.nested.reset((self.get_mut)(instance));
    }

    fn compare_values(&self, x: &T, y: &T) -> bool {
        self.nested.is_equivalent((self.get)(x), (self.get)(y))
    }

    fn from_document(&self, instance: &mut T, node: &Value) -> Result<(), SettingsError> {
        self.nested
            .read_document((self.get_mut)(instance), node)
            .map_err(|e| e.within(&self.name))
    }

    fn update_document(&self, instance: &T, node: &mut Value) -> Result<(), SettingsError> {
        self.nested
            .update_document((self.get)(instance), node)
            .map_err(|e| e.within(&self.name))
    }
}
