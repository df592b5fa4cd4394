use crate::{
    builder::ContainerBuilder,
    class::{Assignment, ClassIdentity},
    container::Container,
    errors::ConstructionError,
    registry::{Bean, Registry},
    wiring::{WiredField, WiringGraph},
};

/// Initiates the Container
///
/// Building happens in two strict phases:
/// 1. Instantiation - every registered class is constructed
/// 2. Wiring - every injectable field is filled from the now complete registry
///
/// Nothing is observable from outside until both phases finished.
pub(crate) struct ContainerInitiator {
    beans: Vec<Bean>,
}

impl ContainerInitiator {
    pub(crate) fn new() -> Self {
        Self { beans: Vec::new() }
    }

    pub(crate) fn initiate(mut self, blueprint: ContainerBuilder) -> Result<Container, ConstructionError> {
        let ContainerBuilder { registered_classes } = blueprint;

        tracing::debug!(
            "Initializing container with {} classes",
            registered_classes.len()
        );

        if let Err(e) = self.instantiate_all(registered_classes) {
            // Beans built so far are dropped with self
            tracing::error!("Container construction aborted: {e}");
            return Err(e);
        }

        let registry = Registry::new(self.beans);
        let graph = wire(&registry);

        tracing::debug!(
            "Container ready - {} beans, {} of {} fields wired",
            registry.beans().len(),
            graph.fields().iter().filter(|field| field.is_resolved()).count(),
            graph.fields().len()
        );

        Ok(Container::from_parts(registry, graph))
    }

    /// Phase A - construct every class, abort on the first failure
    fn instantiate_all(
        &mut self,
        classes: Vec<ClassIdentity>,
    ) -> Result<(), ConstructionError> {
        let class_count = classes.len();
        for class in classes {
            let instance = class.instantiate()?;
            tracing::debug!(
                "Constructed instance of {} [{} of {class_count}]",
                instance.info.type_name,
                self.beans.len() + 1
            );
            self.beans.push(Bean { class, instance });
        }

        Ok(())
    }
}

/// Phase B - fill every declared field from the registry
///
/// Only field contents change, the set of beans stays as it is.
fn wire(registry: &Registry) -> WiringGraph {
    let mut graph = WiringGraph::new();

    for (index, bean) in registry.beans().iter().enumerate() {
        let owner = bean.class.info();

        for field in bean.class.field_descriptors() {
            // A bean is never injected into itself
            let provider = match registry.resolve(field.field_type, Some(index)) {
                Some(resolved) => match field.assign(&bean.instance.instance, resolved.value) {
                    Assignment::Filled => {
                        tracing::debug!(
                            "Wired {}.{} <- {}",
                            owner.type_name,
                            field.name,
                            resolved.provider.type_name
                        );
                        Some(resolved.provider)
                    }
                    // Another descriptor shares the slot, resolution for it picked the same bean
                    Assignment::AlreadyFilled => {
                        tracing::debug!(
                            "{}.{} shares its slot with another field - already wired with {}",
                            owner.type_name,
                            field.name,
                            resolved.provider.type_name
                        );
                        Some(resolved.provider)
                    }
                    Assignment::Mismatch => {
                        tracing::error!(
                            "Field {}.{} does not accept {} - leaving it unset",
                            owner.type_name,
                            field.name,
                            resolved.provider.type_name
                        );
                        None
                    }
                },
                None => {
                    tracing::debug!(
                        "No bean satisfies {}.{} of type {} - leaving it unset",
                        owner.type_name,
                        field.name,
                        field.field_type.type_name
                    );
                    None
                }
            };

            graph.record(WiredField {
                owner,
                field: field.name,
                field_type: field.field_type,
                provider,
            });
        }
    }

    graph
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{class::ClassDefinition, inject::Inject, types::TypeInfo};

    #[derive(Default)]
    struct Mailer;

    #[derive(Default)]
    struct Newsletter {
        mailer: Inject<Mailer>,
    }

    fn build(newsletter: ClassDefinition<Newsletter>) -> Container {
        ContainerBuilder::new()
            .add_identity(newsletter.default_constructor().build())
            .add_identity(ClassDefinition::<Mailer>::new().default_constructor().build())
            .build()
            .unwrap()
    }

    #[test_log::test]
    fn fields_sharing_a_slot_are_both_reported_wired() {
        let container = build(
            ClassDefinition::<Newsletter>::new()
                .field("mailer", |newsletter| &newsletter.mailer)
                .field("sender", |newsletter| &newsletter.mailer),
        );

        let newsletter = container.get_bean::<Newsletter>().unwrap();
        assert!(newsletter.mailer.is_wired());

        let providers: Vec<_> = container
            .wiring()
            .fields_of(TypeInfo::of::<Newsletter>())
            .map(|field| (field.field, field.provider))
            .collect();
        assert_eq!(
            providers,
            vec![
                ("mailer", Some(TypeInfo::of::<Mailer>())),
                ("sender", Some(TypeInfo::of::<Mailer>())),
            ]
        );
        assert!(container.wiring().check_complete().is_ok());
    }

    #[test_log::test]
    fn wiring_records_every_field_once() {
        let container = build(
            ClassDefinition::<Newsletter>::new().field("mailer", |newsletter| &newsletter.mailer),
        );

        assert_eq!(container.wiring().fields().len(), 1);
        assert_eq!(
            container
                .wiring()
                .dependents_of(TypeInfo::of::<Mailer>())
                .count(),
            1
        );
    }
}
