//! Declarative settings objects for Rust applications. Declare a struct's
//! properties once, and get defaults, reset, deep copy, equivalence and
//! order-preserving JSON documents for free.
//!
//! ```ignore
//! settingskit::settings! {
//!     pub struct Greeter {
//!         pub scalar greeting as "Greeting": String = "Hello",
//!         pub scalar count as "Count": i32,
//!         pub scalar when as "When": chrono::NaiveDate = "2000-01-01",
//!     }
//! }
//!
//! let mut greeter = Greeter::create();
//! greeter.read_document(&serde_json::json!({"Count": 7}))?;
//! let document = greeter.write_document(None)?;
//! ```
//!
//! # Design: the declaration is the source of truth
//!
//! A settings type lists its properties in [`Settings::declare`], by hand or
//! through the [`settings!`] macro. That list is turned, once per type, into a
//! [`Descriptor`]: an ordered set of [`PropertyAccessor`]s, one per property.
//! Every operation walks the accessors in declaration order and lets each one
//! handle its own value.
//!
//! There are three kinds of property:
//!
//! - **scalar**: a leaf value converted through [`ScalarValue`]. Numbers,
//!   strings, booleans, paths, `chrono` dates and times, `rust_decimal`
//!   decimals and any serde enum you mark with `impl ScalarValue for MyEnum {}`.
//!   `Option<_>` scalars are nullable. A scalar may carry a default literal,
//!   parsed once when the descriptor is built.
//! - **nested**: a value that is itself a settings type. It is constructed
//!   eagerly and every operation delegates to the nested descriptor.
//! - **collection**: an ordered `Vec` (or `VecDeque`) of settings values.
//!   The collection is created once and afterwards modified in place.
//!
//! Unsupported property types don't compile.
//!
//! # Documents
//!
//! Documents are `serde_json::Value` trees with key order preserved.
//!
//! - **Reading** overlays a document onto an existing instance. Properties
//!   the document doesn't mention keep their values; members that match no
//!   property are ignored.
//! - **Writing** into an existing document merges: known members are updated
//!   in place, missing ones are appended in declaration order, and members
//!   that match no property stay where they are. Hand-edited files keep their
//!   layout across a load/save cycle.
//! - Collections are matched by position. Surplus entries are dropped and new
//!   elements appended.
//!
//! A value of the wrong shape (a string where a number is expected, an array
//! where an object is expected) is an error carrying the document path, e.g.
//! `servers[1].port`. Nothing is coerced or rolled back.
//!
//! # Errors
//!
//! [`ConfigurationError`]s are mistakes in a declaration: an unparseable
//! default, two properties with the same document name, a default on a
//! non-scalar property, or nested types that contain themselves. They are
//! found the first time a type is used and cached, so every use reports the
//! same error. The [`Settings`] methods panic on them; use
//! [`registry::descriptor`] to check a declaration without panicking.
//!
//! Everything else is a [`SettingsError`]. See the [`error`] module.
//!
//! # Files
//!
//! The [`persist`] module loads and saves JSON and (with the `toml` feature,
//! on by default) TOML files, merging into what is already on disk.

pub mod accessor;
pub mod collection;
pub mod descriptor;
pub mod document;
pub mod error;
pub mod nested;
pub mod persist;
pub mod registry;
pub mod scalar;
pub mod settings;

mod macros;

#[cfg(test)]
mod fixtures;

pub use accessor::{PropertyAccessor, PropertyKind};
pub use collection::{CollectionAccessor, SettingsCollection};
pub use descriptor::{Descriptor, Properties, PropertyDecl};
pub use error::{ConfigurationError, ConversionError, SettingsError};
pub use nested::NestedAccessor;
pub use scalar::{ScalarAccessor, ScalarValue};
pub use settings::Settings;
