use crate::{
    class::{ClassIdentity, Component},
    container::Container,
    errors::ConstructionError,
    initiator::ContainerInitiator,
};

/// Collects the classes a [Container] manages
///
/// Each type is registered at most once, registering it again keeps the first identity.
pub struct ContainerBuilder {
    /// Registered classes, in registration order
    pub(crate) registered_classes: Vec<ClassIdentity>,
}
impl Default for ContainerBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl ContainerBuilder {
    pub fn new() -> Self {
        ContainerBuilder {
            registered_classes: Vec::new(),
        }
    }
}
impl ContainerBuilder {
    pub fn add_class<T: Component>(self) -> Self {
        self.add_identity(ClassIdentity::of::<T>())
    }

    pub fn add_identity(mut self, class: ClassIdentity) -> Self {
        if self.registered_classes.contains(&class) {
            tracing::warn!(
                "'{}' has already been registered - ignoring",
                class.info()
            );
            return self;
        }

        self.registered_classes.push(class);
        self
    }

    pub fn add_identities(self, classes: impl IntoIterator<Item = ClassIdentity>) -> Self {
        classes.into_iter().fold(self, Self::add_identity)
    }

    /// Number of distinct registered classes
    pub fn len(&self) -> usize {
        self.registered_classes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.registered_classes.is_empty()
    }

    /// Instantiates and wires all registered classes
    pub fn build(self) -> Result<Container, ConstructionError> {
        ContainerInitiator::new().initiate(self)
    }
}
