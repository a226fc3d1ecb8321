//! Ordered collections of settings values.
//!
//! Collections have no stable key per element, so documents are reconciled
//! positionally: element `i` corresponds to array entry `i`.

use std::collections::VecDeque;
use std::sync::{Arc, OnceLock};

use serde_json::Value;

use crate::accessor::{PropertyAccessor, PropertyKind};
use crate::descriptor::Descriptor;
use crate::document;
use crate::error::SettingsError;
use crate::settings::Settings;

/// An ordered, resizable container of settings values.
///
/// `Vec<N>` is the default choice; `VecDeque<N>` is supported as well. A new
/// collection is made with `Default`.
pub trait SettingsCollection: Default + 'static {
    type Item: Settings;

    type Iter<'a>: Iterator<Item = &'a Self::Item>
    where
        Self: 'a;

    type IterMut<'a>: Iterator<Item = &'a mut Self::Item>
    where
        Self: 'a;

    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn clear(&mut self);

    fn push(&mut self, item: Self::Item);

    /// Drop trailing elements so at most `len` remain.
    fn truncate(&mut self, len: usize);

    fn iter(&self) -> Self::Iter<'_>;

    fn iter_mut(&mut self) -> Self::IterMut<'_>;
}

impl<N: Settings> SettingsCollection for Vec<N> {
    type Item = N;
    type Iter<'a> = std::slice::Iter<'a, N>;
    type IterMut<'a> = std::slice::IterMut<'a, N>;

    fn len(&self) -> usize {
        Vec::len(self)
    }

    fn clear(&mut self) {
        Vec::clear(self)
    }

    fn push(&mut self, item: N) {
        Vec::push(self, item)
    }

    fn truncate(&mut self, len: usize) {
        Vec::truncate(self, len)
    }

    fn iter(&self) -> Self::Iter<'_> {
        self.as_slice().iter()
    }

    fn iter_mut(&mut self) -> Self::IterMut<'_> {
        self.as_mut_slice().iter_mut()
    }
}

impl<N: Settings> SettingsCollection for VecDeque<N> {
    type Item = N;
    type Iter<'a> = std::collections::vec_deque::Iter<'a, N>;
    type IterMut<'a> = std::collections::vec_deque::IterMut<'a, N>;

    fn len(&self) -> usize {
        VecDeque::len(self)
    }

    fn clear(&mut self) {
        VecDeque::clear(self)
    }

    fn push(&mut self, item: N) {
        self.push_back(item)
    }

    fn truncate(&mut self, len: usize) {
        VecDeque::truncate(self, len)
    }

    fn iter(&self) -> Self::Iter<'_> {
        VecDeque::iter(self)
    }

    fn iter_mut(&mut self) -> Self::IterMut<'_> {
        VecDeque::iter_mut(self)
    }
}

/// Accessor for an ordered collection of settings values.
///
/// The collection value is created once by `initialize_value`; every other
/// operation mutates it in place.
///
/// The element descriptor is normally supplied when the owner is built. An
/// element type that leads back to the owner is looked up on first use
/// instead, which lets a settings type hold a collection of itself.
pub struct CollectionAccessor<T, C: SettingsCollection> {
    name: String,
    get: fn(&T) -> &C,
    get_mut: fn(&mut T) -> &mut C,
    items: OnceLock<Arc<Descriptor<C::Item>>>,
}

impl<T, C: SettingsCollection> CollectionAccessor<T, C> {
    pub fn new(name: impl Into<String>, get: fn(&T) -> &C, get_mut: fn(&mut T) -> &mut C) -> Self {
        Self {
            name: name.into(),
            get,
            get_mut,
            items: OnceLock::new(),
        }
    }

    /// Use an already built element descriptor.
    pub(crate) fn resolve_items(&self, items: Arc<Descriptor<C::Item>>) {
        let _ = self.items.set(items);
    }

    fn items(&self) -> &Descriptor<C::Item> {
        self.items.get_or_init(<C::Item as Settings>::descriptor)
    }
}

impl<T, C: SettingsCollection> PropertyAccessor<T> for CollectionAccessor<T, C> {
    fn name(&self) -> &str {
        &self.name
    }

    fn kind(&self) -> PropertyKind {
        PropertyKind::Collection
    }

    fn initialize_value(&self, instance: &mut T) {
        *(self.get_mut)(instance) = C::default();
    }

    fn copy(&self, from: &T, to: &mut T) {
        let items = self.items();
        let dest = (self.get_mut)(to);
        dest.clear();
        for item in (self.get)(from).iter() {
            dest.push(items.create_copy(item));
        }
    }

    fn reset_value(&self, instance: &mut T) {
        (self.get_mut)(instance).clear();
    }

    fn compare_values(&self, x: &T, y: &T) -> bool {
        let (vx, vy) = ((self.get)(x), (self.get)(y));
        if vx.len() != vy.len() {
            return false;
        }
        let items = self.items();
        vx.iter().zip(vy.iter()).all(|(a, b)| items.is_equivalent(a, b))
    }

    fn from_document(&self, instance: &mut T, node: &Value) -> Result<(), SettingsError> {
        let array = document::expect_array(node).map_err(|e| e.within(&self.name))?;
        let items = self.items();
        let dest = (self.get_mut)(instance);

        dest.truncate(array.len());
        while dest.len() < array.len() {
            dest.push(items.create());
        }

        for (index, (item, element)) in dest.iter_mut().zip(array).enumerate() {
            items
                .read_document(item, element)
                .map_err(|e| e.within(&format!("[{index}]")).within(&self.name))?;
        }
        Ok(())
    }

    fn update_document(&self, instance: &T, node: &mut Value) -> Result<(), SettingsError> {
        let items = self.items();
        let source = (self.get)(instance);
        let array = document::ensure_array(node);

        array.truncate(source.len());
        let overlap = array.len();

        for (index, (item, element)) in source.iter().zip(array.iter_mut()).enumerate() {
            items
                .update_document(item, element)
                .map_err(|e| e.within(&format!("[{index}]")).within(&self.name))?;
        }
        for (index, item) in source.iter().enumerate().skip(overlap) {
            let element = items
                .to_document(item)
                .map_err(|e| e.within(&format!("[{index}]")).within(&self.name))?;
            array.push(element);
        }
        Ok(())
    }
}
