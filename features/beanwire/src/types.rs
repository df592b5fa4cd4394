use std::{
    any::{Any, TypeId},
    sync::Arc,
};

/// All errors must be shareable between threads
pub type DynError = Box<dyn std::error::Error + Send + Sync>;

/// Cloneable form of [DynError], kept inside errors which must be Clone
pub type SharedError = Arc<dyn std::error::Error + Send + Sync>;

/// Type erased bean, as held by the registry
pub type AnyBean = Arc<dyn Any + Send + Sync + 'static>;

/// A container may be read from any thread once built,
/// so anything managed by it needs to be Send + Sync + 'static
pub trait Injectable: Send + Sync + 'static {}
impl<T: Send + Sync + 'static> Injectable for T {}

/// Instance of a managed type
#[derive(Clone)]
pub struct Instance {
    pub info: TypeInfo,
    pub instance: AnyBean,
}

impl Instance {
    pub(crate) fn new<ExistingInstance: Injectable>(instance: ExistingInstance) -> Self {
        Instance {
            info: TypeInfo::of::<ExistingInstance>(),
            instance: Arc::new(instance),
        }
    }

    pub fn downcast<T: Injectable>(&self) -> Result<Arc<T>, &'static str> {
        match Arc::downcast::<T>(self.instance.clone()) {
            Ok(downcasted) => Ok(downcasted),
            Err(_) => Err(self.info.type_name),
        }
    }

    /// True if both handles point at the same allocation
    pub fn same_bean(&self, other: &Instance) -> bool {
        std::ptr::eq(
            Arc::as_ptr(&self.instance) as *const (),
            Arc::as_ptr(&other.instance) as *const (),
        )
    }
}

impl std::fmt::Debug for Instance {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("Instance").field(&self.info.type_name).finish()
    }
}

/// Type Name and Type Id
#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq)]
pub struct TypeInfo {
    pub type_name: &'static str,
    pub type_id: TypeId,
}
impl std::fmt::Display for TypeInfo {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.type_name)
    }
}
impl TypeInfo {
    pub fn of<T: 'static + ?Sized>() -> TypeInfo {
        TypeInfo {
            type_name: std::any::type_name::<T>(),
            type_id: TypeId::of::<T>(),
        }
    }

    /// Type name without module paths, e.g. `UserService` for `app::users::UserService`
    ///
    /// Every path inside the name is shortened, `(app::A, &app::B)` becomes `(A, &B)`.
    pub fn short_name(&self) -> String {
        let mut segments = self.type_name.split("::").peekable();
        let mut short = String::with_capacity(self.type_name.len());
        while let Some(segment) = segments.next() {
            if segments.peek().is_none() {
                short.push_str(segment);
                break;
            }
            // Followed by `::`, so the trailing identifier is a module and gets dropped
            let module_start = segment
                .rfind(|c: char| !(c.is_alphanumeric() || c == '_'))
                .map_or(0, |pos| pos + 1);
            short.push_str(&segment[..module_start]);
        }
        short
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Marker;

    #[test]
    fn type_info_identifies_type() {
        assert_eq!(TypeInfo::of::<Marker>(), TypeInfo::of::<Marker>());
        assert_ne!(TypeInfo::of::<Marker>(), TypeInfo::of::<String>());
        assert_eq!(TypeInfo::of::<Marker>().short_name(), "Marker");
    }

    #[test]
    fn short_name_strips_nested_paths() {
        assert_eq!(TypeInfo::of::<Vec<Marker>>().short_name(), "Vec<Marker>");
        assert_eq!(TypeInfo::of::<(Marker, String)>().short_name(), "(Marker, String)");
        assert_eq!(TypeInfo::of::<&'static Marker>().short_name(), "&Marker");
        assert_eq!(TypeInfo::of::<u32>().short_name(), "u32");
    }

    #[test]
    fn instance_downcast_and_identity() {
        let instance = Instance::new(42_u32);
        assert_eq!(*instance.downcast::<u32>().unwrap(), 42);
        assert_eq!(instance.downcast::<u64>().unwrap_err(), "u32");

        let copy = instance.clone();
        assert!(instance.same_bean(&copy));
        assert!(!instance.same_bean(&Instance::new(42_u32)));
    }
}
