use std::{
    any::Any,
    fmt::Debug,
    hash::{Hash, Hasher},
    marker::PhantomData,
    panic::{self, AssertUnwindSafe},
    sync::Arc,
};

use crate::{
    errors::{ConstructionError, ConstructorPanicked},
    inject::Inject,
    types::{AnyBean, DynError, Injectable, Instance, SharedError, TypeInfo},
};

/// A bean upcast to one of its capabilities, always an `Arc<Capability>` inside
pub(crate) type ErasedRef = Box<dyn Any + Send + Sync>;

type Constructor = Box<dyn Fn() -> Result<Instance, DynError> + Send + Sync>;
type Upcast = Box<dyn Fn(&AnyBean) -> Option<ErasedRef> + Send + Sync>;
type Assign = Box<dyn Fn(&AnyBean, ErasedRef) -> Assignment + Send + Sync>;

/// A type which knows how to describe itself to the container
///
/// ```rust
/// use beanwire::{ClassDefinition, Component, Inject};
///
/// #[derive(Default)]
/// struct UserRepository;
///
/// #[derive(Default)]
/// struct UserService {
///     repository: Inject<UserRepository>,
/// }
///
/// impl Component for UserService {
///     fn definition() -> ClassDefinition<Self> {
///         ClassDefinition::<Self>::new()
///             .default_constructor()
///             .field("repository", |service| &service.repository)
///     }
/// }
/// ```
pub trait Component: Injectable + Sized {
    fn definition() -> ClassDefinition<Self>;
}

/// Builder describing how to construct and wire a `T`
pub struct ClassDefinition<T: Injectable> {
    constructor: Option<Constructor>,
    fields: Vec<FieldDescriptor>,
    capabilities: Vec<Capability>,
    _marker: PhantomData<fn() -> T>,
}

impl<T: Injectable> Default for ClassDefinition<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Injectable> ClassDefinition<T> {
    /// A definition without constructor or fields, providing only `T` itself
    pub fn new() -> Self {
        let mut definition = ClassDefinition {
            constructor: None,
            fields: Vec::new(),
            capabilities: Vec::new(),
            _marker: PhantomData,
        };
        definition.capabilities.push(Capability::new::<T, T>(identity));
        definition
    }

    /// Sets the no-argument constructor
    pub fn constructor(self, constructor: impl Fn() -> T + Send + Sync + 'static) -> Self {
        self.try_constructor(move || Ok::<_, DynError>(constructor()))
    }

    /// Sets a no-argument constructor which may fail
    pub fn try_constructor<E: Into<DynError>>(
        mut self,
        constructor: impl Fn() -> Result<T, E> + Send + Sync + 'static,
    ) -> Self {
        self.constructor = Some(Box::new(move || {
            constructor().map(Instance::new).map_err(Into::into)
        }));
        self
    }

    /// Declares an injectable field of type `D`
    ///
    /// `accessor` returns the slot within the bean, the container fills it while wiring.
    pub fn field<D: ?Sized + Send + Sync + 'static>(
        mut self,
        name: &'static str,
        accessor: fn(&T) -> &Inject<D>,
    ) -> Self {
        if self.fields.iter().any(|field| field.name == name) {
            tracing::warn!(
                "'{}' declared field '{}' twice - ignoring the second",
                std::any::type_name::<T>(),
                name
            );
            return self;
        }
        self.fields.push(FieldDescriptor::new(name, accessor));
        self
    }

    /// Declares that `T` can be used wherever an `I` is required
    ///
    /// `upcast` is usually `|bean| bean`, coercing `Arc<T>` into `Arc<dyn Trait>`.
    ///
    /// Matching is by exact type: `dyn Trait + Send + Sync` and `dyn Trait` are different
    /// types, a capability declared as one never satisfies an `Inject` of the other.
    pub fn provides<I: ?Sized + Send + Sync + 'static>(
        mut self,
        upcast: fn(Arc<T>) -> Arc<I>,
    ) -> Self {
        let capability = Capability::new::<T, I>(upcast);
        if self.capabilities.iter().any(|c| c.info == capability.info) {
            tracing::warn!(
                "'{}' declared capability '{}' twice - ignoring the second",
                std::any::type_name::<T>(),
                capability.info
            );
            return self;
        }
        self.capabilities.push(capability);
        self
    }

    pub fn build(self) -> ClassIdentity {
        ClassIdentity {
            info: TypeInfo::of::<T>(),
            constructor: self.constructor,
            fields: self.fields,
            capabilities: self.capabilities,
        }
    }
}

impl<T: Injectable + Default> ClassDefinition<T> {
    /// Uses `T::default` as the no-argument constructor
    pub fn default_constructor(self) -> Self {
        self.constructor(T::default)
    }
}

fn identity<T: ?Sized>(bean: Arc<T>) -> Arc<T> {
    bean
}

/// A type the container can be asked to build
///
/// Holds the constructor, the injectable fields and the capabilities of a type,
/// with all of it type erased so classes of different types can live in one set.
pub struct ClassIdentity {
    info: TypeInfo,
    constructor: Option<Constructor>,
    fields: Vec<FieldDescriptor>,
    capabilities: Vec<Capability>,
}

impl ClassIdentity {
    /// The class identity of a [Component]
    pub fn of<T: Component>() -> Self {
        T::definition().build()
    }

    pub fn info(&self) -> TypeInfo {
        self.info
    }

    pub fn has_constructor(&self) -> bool {
        self.constructor.is_some()
    }

    /// Declared injectable fields, as name and type
    pub fn fields(&self) -> impl Iterator<Item = (&'static str, TypeInfo)> + '_ {
        self.fields.iter().map(|field| (field.name, field.field_type))
    }

    /// The type itself followed by every declared capability
    pub fn capabilities(&self) -> impl Iterator<Item = TypeInfo> + '_ {
        self.capabilities.iter().map(|capability| capability.info)
    }

    /// True if a bean of this class can be used where `target` is required
    pub fn is_compatible_with(&self, target: TypeInfo) -> bool {
        self.capability(target).is_some()
    }

    pub(crate) fn capability(&self, target: TypeInfo) -> Option<&Capability> {
        self.capabilities
            .iter()
            .find(|capability| capability.info.type_id == target.type_id)
    }

    pub(crate) fn field_descriptors(&self) -> &[FieldDescriptor] {
        &self.fields
    }

    /// Runs the no-argument constructor
    ///
    /// Panics inside the constructor are caught and reported like errors.
    pub(crate) fn instantiate(&self) -> Result<Instance, ConstructionError> {
        let Some(constructor) = &self.constructor else {
            return Err(ConstructionError::NoAccessibleConstructor { class: self.info });
        };

        let error: SharedError = match panic::catch_unwind(AssertUnwindSafe(constructor)) {
            Ok(Ok(instance)) => return Ok(instance),
            Ok(Err(error)) => error.into(),
            Err(payload) => Arc::new(ConstructorPanicked::from_payload(payload)) as SharedError,
        };

        Err(ConstructionError::ConstructorFailed {
            class: self.info,
            error,
        })
    }
}

impl PartialEq for ClassIdentity {
    fn eq(&self, other: &Self) -> bool {
        self.info.type_id == other.info.type_id
    }
}
impl Eq for ClassIdentity {}
impl Hash for ClassIdentity {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.info.type_id.hash(state);
    }
}

impl Debug for ClassIdentity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClassIdentity")
            .field("type", &self.info.type_name)
            .field("constructor", &self.has_constructor())
            .field("fields", &self.fields().collect::<Vec<_>>())
            .field(
                "capabilities",
                &self
                    .capabilities()
                    .map(|info| info.type_name)
                    .collect::<Vec<_>>(),
            )
            .finish()
    }
}

/// Something a bean can be used as - its own type or one of its traits
pub(crate) struct Capability {
    pub(crate) info: TypeInfo,
    upcast: Upcast,
}

impl Capability {
    fn new<T: Injectable, I: ?Sized + Send + Sync + 'static>(
        upcast: fn(Arc<T>) -> Arc<I>,
    ) -> Self {
        Capability {
            info: TypeInfo::of::<I>(),
            upcast: Box::new(move |bean: &AnyBean| {
                let concrete = bean.clone().downcast::<T>().ok()?;
                Some(Box::new(upcast(concrete)) as ErasedRef)
            }),
        }
    }

    /// Upcasts `bean`, returns `None` if `bean` is not of the declaring class
    pub(crate) fn upcast(&self, bean: &AnyBean) -> Option<ErasedRef> {
        (self.upcast)(bean)
    }
}

/// Name, declared type and setter of one injectable field
pub(crate) struct FieldDescriptor {
    pub(crate) name: &'static str,
    pub(crate) field_type: TypeInfo,
    assign: Assign,
}

impl FieldDescriptor {
    fn new<T: Injectable, D: ?Sized + Send + Sync + 'static>(
        name: &'static str,
        accessor: fn(&T) -> &Inject<D>,
    ) -> Self {
        FieldDescriptor {
            name,
            field_type: TypeInfo::of::<D>(),
            assign: Box::new(move |owner: &AnyBean, value: ErasedRef| {
                let Some(owner) = (**owner).downcast_ref::<T>() else {
                    return Assignment::Mismatch;
                };
                let Ok(value) = value.downcast::<Arc<D>>() else {
                    return Assignment::Mismatch;
                };
                match accessor(owner).fill(&value) {
                    true => Assignment::Filled,
                    false => Assignment::AlreadyFilled,
                }
            }),
        }
    }

    /// Writes `value` into the field of `owner`
    pub(crate) fn assign(&self, owner: &AnyBean, value: ErasedRef) -> Assignment {
        (self.assign)(owner, value)
    }
}

/// Result of writing a bean into a field
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Assignment {
    /// The slot was empty and now holds the bean
    Filled,
    /// The slot was already filled through another descriptor pointing at it
    AlreadyFilled,
    /// Owner or value did not match the descriptor's types
    Mismatch,
}
