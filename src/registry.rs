//! Process-wide cache of settings descriptors.
//!
//! Each settings type gets one slot, keyed by `TypeId`. The map lock is only
//! held long enough to fetch the slot; the build itself runs inside the slot's
//! `OnceLock`, so concurrent first use of a type builds it exactly once and
//! every caller sees the same descriptor. A failed build is cached as well and
//! reported identically on every later use.
//!
//! Before a type is built its nested properties are walked for cycles, so
//! nested builds always happen in an acyclic order and never wait on a slot
//! that is waiting on them.
//!
//! Collection element types are built together with their owner, so a bad
//! element declaration fails the owner too. The one exception is an element
//! type that can lead back to the owner (`Tree { children: Vec<Tree> }`): it
//! is resolved on first use, since building it eagerly would wait on the
//! owner's own slot.

use std::any::{Any, TypeId};
use std::collections::{HashMap, HashSet};
use std::sync::{Arc, LazyLock, OnceLock};

use parking_lot::Mutex;

use crate::descriptor::{Descriptor, Properties};
use crate::error::ConfigurationError;
use crate::settings::Settings;

type Built = Result<Arc<dyn Any + Send + Sync>, ConfigurationError>;
type Slot = Arc<OnceLock<Built>>;

static REGISTRY: LazyLock<Mutex<HashMap<TypeId, Slot>>> = LazyLock::new(Default::default);

/// The descriptor for `T`, building it on first use.
pub fn descriptor<T: Settings>() -> Result<Arc<Descriptor<T>>, ConfigurationError> {
    let slot = Arc::clone(REGISTRY.lock().entry(TypeId::of::<T>()).or_default());

    let built = slot.get_or_init(|| {
        build::<T>().map(|descriptor| Arc::new(descriptor) as Arc<dyn Any + Send + Sync>)
    });

    match built {
        Ok(any) => Ok(Arc::clone(any)
            .downcast::<Descriptor<T>>()
            .unwrap_or_else(|_| unreachable!("registry slot holds another type's descriptor"))),
        Err(e) => Err(e.clone()),
    }
}

fn build<T: Settings>() -> Result<Descriptor<T>, ConfigurationError> {
    let type_name = short_type_name::<T>();
    let result = check_acyclic::<T>(&mut Vec::new())
        .and_then(|()| Properties::<T>::declared().build(type_name));

    match &result {
        Ok(descriptor) => tracing::debug!(
            settings = type_name,
            properties = descriptor.properties().len(),
            "built settings descriptor"
        ),
        Err(e) => tracing::warn!(settings = type_name, error = %e, "invalid settings declaration"),
    }
    result
}

/// Walk `T`'s nested properties depth first, failing if a type contains
/// itself.
///
/// Collections are not followed: an empty collection is a valid default, so a
/// type may hold a collection of itself.
pub(crate) fn check_acyclic<T: Settings>(
    path: &mut Vec<(TypeId, &'static str)>,
) -> Result<(), ConfigurationError> {
    let id = TypeId::of::<T>();
    let name = short_type_name::<T>();

    if let Some(start) = path.iter().position(|(seen, _)| *seen == id) {
        let mut cycle: Vec<&'static str> = path[start..].iter().map(|(_, n)| *n).collect();
        cycle.push(name);
        return Err(ConfigurationError::Cycle { path: cycle });
    }

    path.push((id, name));
    for link in Properties::<T>::declared().links() {
        if !link.via_collection {
            (link.check_acyclic)(path)?;
        }
    }
    path.pop();
    Ok(())
}

/// Whether `target` can be reached from `T` through nested or collection
/// properties, `T` itself included.
pub(crate) fn reaches<T: Settings>(target: TypeId, seen: &mut HashSet<TypeId>) -> bool {
    let id = TypeId::of::<T>();
    if id == target {
        return true;
    }
    if !seen.insert(id) {
        return false;
    }
    Properties::<T>::declared()
        .links()
        .any(|link| (link.reaches)(target, seen))
}

/// `T`'s name without its module path. Generic arguments keep their full
/// paths.
pub fn short_type_name<T: ?Sized>() -> &'static str {
    let full = std::any::type_name::<T>();
    let base = match full.find('<') {
        Some(generic) => &full[..generic],
        None => full,
    };
    match base.rfind("::") {
        Some(sep) => &full[sep + 2..],
        None => full,
    }
}
