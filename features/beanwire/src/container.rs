use std::{any::type_name, fmt::Debug, sync::Arc};

use crate::{
    builder::ContainerBuilder,
    class::ClassIdentity,
    errors::{ConstructionError, RequireError},
    registry::Registry,
    types::{Instance, TypeInfo},
    wiring::WiringGraph,
};

/// Container holding all constructed and wired beans
///
/// Immutable once built, cloning only clones the handle.
/// Lookups need no locking and may happen from any thread.
#[derive(Clone)]
pub struct Container(Arc<ContainerInner>);
struct ContainerInner {
    registry: Registry,
    graph: WiringGraph,
}
impl Debug for Container {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut map = f.debug_struct("Container");
        for bean in self.0.registry.beans() {
            let owner = bean.class.info();
            let fields: Vec<String> = self
                .0
                .graph
                .fields_of(owner)
                .map(|field| match field.provider {
                    Some(provider) => format!("{} <- {}", field.field, provider.short_name()),
                    None => format!("{} <- <unset>", field.field),
                })
                .collect();
            map.field(owner.type_name, &fields);
        }
        map.finish()
    }
}

impl Container {
    /// Builds a container managing exactly the given classes
    ///
    /// Fails without producing anything if any class can not be constructed.
    pub fn new(classes: impl IntoIterator<Item = ClassIdentity>) -> Result<Self, ConstructionError> {
        ContainerBuilder::new().add_identities(classes).build()
    }

    pub fn builder() -> ContainerBuilder {
        ContainerBuilder::new()
    }

    pub(crate) fn from_parts(registry: Registry, graph: WiringGraph) -> Self {
        Self(Arc::new(ContainerInner { registry, graph }))
    }

    /// Returns a bean usable as `T`, or `None` if there is none
    ///
    /// `T` is either the bean's own type or a capability its class declares,
    /// e.g. `container.get_bean::<dyn PaymentGateway>()`.
    pub fn get_bean<T: ?Sized + Send + Sync + 'static>(&self) -> Option<Arc<T>> {
        let resolved = self.0.registry.resolve(TypeInfo::of::<T>(), None)?;
        match resolved.value.downcast::<Arc<T>>() {
            Ok(bean) => Some(*bean),
            Err(_) => {
                tracing::error!(
                    "Bean '{}' resolved for '{}' has an unexpected type",
                    resolved.provider,
                    type_name::<T>()
                );
                None
            }
        }
    }

    /// Attempts to get the requested type, treating a miss as an error
    pub fn require<T: ?Sized + Send + Sync + 'static>(&self) -> Result<Arc<T>, RequireError> {
        self.get_bean::<T>()
            .ok_or(RequireError::TypeMissing(type_name::<T>()))
    }

    /// Type erased lookup of the bean satisfying `target`
    pub fn get_instance(&self, target: TypeInfo) -> Option<Instance> {
        let resolved = self.0.registry.resolve(target, None)?;
        Some(self.0.registry.beans()[resolved.index].instance.clone())
    }

    pub fn contains<T: ?Sized + 'static>(&self) -> bool {
        let target = TypeInfo::of::<T>();
        self.0
            .registry
            .beans()
            .iter()
            .any(|bean| bean.class.is_compatible_with(target))
    }

    /// Registered classes, in registration order
    pub fn classes(&self) -> impl Iterator<Item = TypeInfo> + '_ {
        self.0.registry.beans().iter().map(|bean| bean.class.info())
    }

    pub fn len(&self) -> usize {
        self.0.registry.beans().len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.registry.beans().is_empty()
    }

    pub fn wiring(&self) -> &WiringGraph {
        &self.0.graph
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{class::ClassDefinition, inject::Inject};

    trait Clock: Send + Sync {
        fn now(&self) -> u64;
    }

    #[derive(Default)]
    struct FixedClock;
    impl Clock for FixedClock {
        fn now(&self) -> u64 {
            42
        }
    }

    #[derive(Default)]
    struct Scheduler {
        clock: Inject<dyn Clock>,
    }

    fn container() -> Container {
        Container::new([
            ClassDefinition::<Scheduler>::new()
                .default_constructor()
                .field("clock", |scheduler| &scheduler.clock)
                .build(),
            ClassDefinition::<FixedClock>::new()
                .default_constructor()
                .provides::<dyn Clock>(|bean| bean as Arc<dyn Clock>)
                .build(),
        ])
        .unwrap()
    }

    #[test]
    fn lookup_by_type_and_capability() {
        let container = container();
        assert_eq!(container.len(), 2);
        assert!(container.contains::<dyn Clock>());
        assert!(container.contains::<Scheduler>());

        assert_eq!(container.get_bean::<dyn Clock>().unwrap().now(), 42);
        let scheduler = container.require::<Scheduler>().unwrap();
        assert_eq!(scheduler.clock.require().unwrap().now(), 42);
    }

    #[test]
    fn require_reports_missing_type() {
        let container = container();
        assert!(!container.contains::<String>());
        assert_eq!(
            container.require::<String>().unwrap_err(),
            RequireError::TypeMissing(type_name::<String>())
        );
    }

    #[test]
    fn erased_lookup_returns_providing_bean() {
        let container = container();
        let instance = container
            .get_instance(TypeInfo::of::<dyn Clock>())
            .unwrap();
        assert_eq!(instance.info, TypeInfo::of::<FixedClock>());

        let by_own_type = container
            .get_instance(TypeInfo::of::<FixedClock>())
            .unwrap();
        assert!(instance.same_bean(&by_own_type));
        assert!(container.get_instance(TypeInfo::of::<String>()).is_none());
    }

    #[test]
    fn classes_keep_registration_order() {
        let classes: Vec<_> = container().classes().collect();
        assert_eq!(
            classes,
            vec![TypeInfo::of::<Scheduler>(), TypeInfo::of::<FixedClock>()]
        );
    }

    #[test]
    fn debug_lists_beans_and_fields() {
        let debug = format!("{:?}", container());
        assert!(debug.contains("clock <- FixedClock"));
    }
}
