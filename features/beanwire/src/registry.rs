use crate::{
    class::{ClassIdentity, ErasedRef},
    types::{Instance, TypeInfo},
};

/// A constructed instance together with the class that produced it
pub(crate) struct Bean {
    pub(crate) class: ClassIdentity,
    pub(crate) instance: Instance,
}

/// A bean upcast to the type it was resolved for
pub(crate) struct Resolved {
    /// Index of the providing bean in the registry
    pub(crate) index: usize,
    pub(crate) provider: TypeInfo,
    /// `Arc<Target>` inside
    pub(crate) value: ErasedRef,
}

/// All beans of a container, in registration order
///
/// Never changes after the container has been built.
pub(crate) struct Registry {
    beans: Vec<Bean>,
}

impl Registry {
    pub(crate) fn new(beans: Vec<Bean>) -> Self {
        Self { beans }
    }

    pub(crate) fn beans(&self) -> &[Bean] {
        &self.beans
    }

    /// Finds a bean usable as `target`, skipping the bean at `exclude`
    ///
    /// A bean qualifies if its class is `target` or declares `target` as capability.
    /// If several qualify the first registered one is used.
    pub(crate) fn resolve(&self, target: TypeInfo, exclude: Option<usize>) -> Option<Resolved> {
        let mut candidates = self
            .beans
            .iter()
            .enumerate()
            .filter(|(index, _)| Some(*index) != exclude)
            .filter_map(|(index, bean)| {
                bean.class
                    .capability(target)
                    .map(|capability| (index, bean, capability))
            });

        let (index, bean, capability) = candidates.next()?;

        let others = candidates.count();
        if others > 0 {
            tracing::debug!(
                "'{}' is satisfied by {} beans - using '{}'",
                target,
                others + 1,
                bean.class.info()
            );
        }

        let Some(value) = capability.upcast(&bean.instance.instance) else {
            // Capabilities are built from the same class as the bean, this can't mismatch
            tracing::error!(
                "Bean '{}' could not be upcast to '{}'",
                bean.instance.info,
                target
            );
            return None;
        };

        Some(Resolved {
            index,
            provider: bean.class.info(),
            value,
        })
    }
}
