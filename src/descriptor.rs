//! Per-type property declarations and the descriptor built from them.
//!
//! A settings type lists its properties once, in [`Settings::declare`]:
//!
//! ```ignore
//! fn declare(p: &mut Properties<Self>) {
//!     p.scalar("greeting", |s| &s.greeting, |s| &mut s.greeting)
//!         .rename("Greeting")
//!         .default("Hello");
//!     p.nested("database", |s| &s.database, |s| &mut s.database);
//!     p.collection("mirrors", |s| &s.mirrors, |s| &mut s.mirrors);
//! }
//! ```
//!
//! Declaration order is the iteration order of every operation and the key
//! order of freshly written documents. The registry turns the declarations
//! into a [`Descriptor`], which is what the operations actually run on.

use std::any::TypeId;
use std::collections::HashSet;
use std::fmt;

use serde_json::{Map, Value};

use crate::accessor::{PropertyAccessor, PropertyKind};
use crate::collection::{CollectionAccessor, SettingsCollection};
use crate::document;
use crate::error::{ConfigurationError, ConversionError, SettingsError};
use crate::nested::NestedAccessor;
use crate::registry;
use crate::scalar::{ScalarAccessor, ScalarValue};
use crate::settings::Settings;

type BoxedAccessor<T> = Box<dyn PropertyAccessor<T>>;
type ScalarFactory<T> =
    Box<dyn FnOnce(String, Option<&str>) -> Result<BoxedAccessor<T>, ConversionError>>;
type SettingsFactory<T> =
    Box<dyn FnOnce(String) -> Result<BoxedAccessor<T>, ConfigurationError>>;

enum Factory<T> {
    Scalar(ScalarFactory<T>),
    Settings(SettingsFactory<T>),
}

/// A settings type reachable through a nested or collection property.
#[derive(Clone, Copy)]
pub(crate) struct Link {
    /// Collections may hold their owner; nested properties may not.
    pub(crate) via_collection: bool,
    pub(crate) check_acyclic:
        fn(&mut Vec<(TypeId, &'static str)>) -> Result<(), ConfigurationError>,
    pub(crate) reaches: fn(TypeId, &mut HashSet<TypeId>) -> bool,
}

impl Link {
    fn to<N: Settings>(via_collection: bool) -> Self {
        Link {
            via_collection,
            check_acyclic: registry::check_acyclic::<N>,
            reaches: registry::reaches::<N>,
        }
    }
}

/// One declared property, before its accessor is built.
pub struct PropertyDecl<T> {
    field: &'static str,
    rename: Option<&'static str>,
    default: Option<&'static str>,
    kind: PropertyKind,
    link: Option<Link>,
    factory: Factory<T>,
}

impl<T> PropertyDecl<T> {
    /// Use `name` in documents instead of the declared field name.
    pub fn rename(&mut self, name: &'static str) -> &mut Self {
        self.rename = Some(name);
        self
    }

    /// Default literal, parsed by the value type's
    /// [`ScalarValue::parse_literal`]. Only valid on scalar properties.
    pub fn default(&mut self, literal: &'static str) -> &mut Self {
        self.default = Some(literal);
        self
    }

    pub fn document_name(&self) -> &'static str {
        self.rename.unwrap_or(self.field)
    }
}

/// The ordered property declarations of one settings type.
pub struct Properties<T> {
    decls: Vec<PropertyDecl<T>>,
}

impl<T: 'static> Properties<T> {
    fn new() -> Self {
        Self { decls: Vec::new() }
    }

    /// Declare a leaf property. `Option<_>` values are nullable.
    pub fn scalar<V: ScalarValue>(
        &mut self,
        field: &'static str,
        get: fn(&T) -> &V,
        get_mut: fn(&mut T) -> &mut V,
    ) -> &mut PropertyDecl<T> {
        let kind = if V::NULLABLE {
            PropertyKind::NullableScalar
        } else {
            PropertyKind::Scalar
        };
        self.push(PropertyDecl {
            field,
            rename: None,
            default: None,
            kind,
            link: None,
            factory: Factory::Scalar(Box::new(
                move |name: String,
                      default: Option<&str>|
                      -> Result<BoxedAccessor<T>, ConversionError> {
                    let accessor = ScalarAccessor::new(name, get, get_mut, default)?;
                    Ok(Box::new(accessor))
                },
            )),
        })
    }

    /// Declare a property holding another settings type.
    pub fn nested<N: Settings>(
        &mut self,
        field: &'static str,
        get: fn(&T) -> &N,
        get_mut: fn(&mut T) -> &mut N,
    ) -> &mut PropertyDecl<T> {
        self.push(PropertyDecl {
            field,
            rename: None,
            default: None,
            kind: PropertyKind::Nested,
            link: Some(Link::to::<N>(false)),
            factory: Factory::Settings(Box::new(
                move |name: String| -> Result<BoxedAccessor<T>, ConfigurationError> {
                    let nested = registry::descriptor::<N>()?;
                    Ok(Box::new(NestedAccessor::new(name, get, get_mut, nested)))
                },
            )),
        })
    }

    /// Declare an ordered collection of settings values.
    pub fn collection<C: SettingsCollection>(
        &mut self,
        field: &'static str,
        get: fn(&T) -> &C,
        get_mut: fn(&mut T) -> &mut C,
    ) -> &mut PropertyDecl<T> {
        self.push(PropertyDecl {
            field,
            rename: None,
            default: None,
            kind: PropertyKind::Collection,
            link: Some(Link::to::<C::Item>(true)),
            factory: Factory::Settings(Box::new(
                move |name: String| -> Result<BoxedAccessor<T>, ConfigurationError> {
                    let accessor = CollectionAccessor::<T, C>::new(name, get, get_mut);
                    // An element type that can lead back here is still being
                    // built further up, so it is resolved on first use instead.
                    if !registry::reaches::<C::Item>(TypeId::of::<T>(), &mut HashSet::new()) {
                        accessor.resolve_items(registry::descriptor::<C::Item>()?);
                    }
                    Ok(Box::new(accessor))
                },
            )),
        })
    }

    fn push(&mut self, decl: PropertyDecl<T>) -> &mut PropertyDecl<T> {
        let index = self.decls.len();
        self.decls.push(decl);
        &mut self.decls[index]
    }
}

impl<T: Settings> Properties<T> {
    /// Run `T::declare` into a fresh declaration list.
    pub(crate) fn declared() -> Self {
        let mut properties = Self::new();
        T::declare(&mut properties);
        properties
    }

    pub(crate) fn links(&self) -> impl Iterator<Item = Link> + '_ {
        self.decls.iter().filter_map(|d| d.link)
    }

    /// Build every accessor, in declaration order.
    pub(crate) fn build(
        self,
        type_name: &'static str,
    ) -> Result<Descriptor<T>, ConfigurationError> {
        let mut seen = HashSet::new();
        let mut properties = Vec::with_capacity(self.decls.len());

        for decl in self.decls {
            let name = decl.document_name();
            if !seen.insert(name) {
                return Err(ConfigurationError::DuplicateName {
                    type_name,
                    name: name.to_string(),
                });
            }

            if decl.default.is_some() && !decl.kind.is_scalar() {
                return Err(ConfigurationError::DefaultOnNonScalar {
                    type_name,
                    property: name.to_string(),
                    kind: match decl.kind {
                        PropertyKind::Collection => "collection",
                        _ => "nested",
                    },
                });
            }

            let accessor = match decl.factory {
                Factory::Scalar(factory) => factory(name.to_string(), decl.default).map_err(|e| {
                    ConfigurationError::InvalidDefault {
                        type_name,
                        property: name.to_string(),
                        reason: e.to_string(),
                    }
                })?,
                Factory::Settings(factory) => factory(name.to_string())?,
            };
            properties.push(accessor);
        }

        Ok(Descriptor {
            type_name,
            properties,
            blank: T::blank,
        })
    }
}

/// The ordered accessors of one settings type.
///
/// Built once per type by the [registry](crate::registry) and shared by all
/// instances. Every operation walks the accessors in declaration order.
pub struct Descriptor<T> {
    type_name: &'static str,
    properties: Vec<BoxedAccessor<T>>,
    blank: fn() -> T,
}

impl<T> Descriptor<T> {
    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    pub fn properties(&self) -> impl ExactSizeIterator<Item = &dyn PropertyAccessor<T>> + '_ {
        self.properties.iter().map(|p| p.as_ref())
    }

    /// Look up a property by its document name.
    pub fn property(&self, name: &str) -> Option<&dyn PropertyAccessor<T>> {
        self.properties().find(|p| p.name() == name)
    }

    /// A new instance with every property at its default.
    pub fn create(&self) -> T {
        let mut instance = (self.blank)();
        for property in &self.properties {
            property.initialize_value(&mut instance);
        }
        instance
    }

    pub fn create_copy(&self, source: &T) -> T {
        let mut copy = self.create();
        self.copy(source, &mut copy);
        copy
    }

    pub fn copy(&self, from: &T, to: &mut T) {
        for property in &self.properties {
            property.copy(from, to);
        }
    }

    pub fn reset(&self, instance: &mut T) {
        for property in &self.properties {
            property.reset_value(instance);
        }
    }

    pub fn is_equivalent(&self, x: &T, y: &T) -> bool {
        self.properties.iter().all(|p| p.compare_values(x, y))
    }

    /// Overlay an object node onto `instance`.
    ///
    /// Properties the node does not mention keep their values; members that
    /// match no property are ignored. On error, properties read before the
    /// failing one keep their new values.
    pub fn read_document(&self, instance: &mut T, node: &Value) -> Result<(), SettingsError> {
        let object = document::expect_object(node)?;
        for property in &self.properties {
            if let Some(child) = object.get(property.name()) {
                property.from_document(instance, child)?;
            }
        }
        Ok(())
    }

    /// Merge `instance` into an existing node.
    ///
    /// Existing members are updated where they stand, members for properties
    /// the node lacked are appended in declaration order, and members that
    /// match no property are left untouched. A non-object node is replaced by
    /// an empty object first.
    pub fn update_document(&self, instance: &T, node: &mut Value) -> Result<(), SettingsError> {
        let object = document::ensure_object(node);
        for property in &self.properties {
            let child = object.entry(property.name()).or_insert(Value::Null);
            property.update_document(instance, child)?;
        }
        tracing::trace!(
            settings = self.type_name,
            members = object.len(),
            "merged settings into document"
        );
        Ok(())
    }

    /// A fresh object node with members in declaration order.
    pub fn to_document(&self, instance: &T) -> Result<Value, SettingsError> {
        let mut node = Value::Object(Map::new());
        self.update_document(instance, &mut node)?;
        Ok(node)
    }
}

impl<T> fmt::Debug for Descriptor<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Descriptor")
            .field("type_name", &self.type_name)
            .field("properties", &self.properties)
            .finish()
    }
}
