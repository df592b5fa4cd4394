use std::{
    any::type_name,
    fmt::Debug,
    sync::{Arc, OnceLock, Weak},
};

use crate::errors::RequireError;

/// Injectable field of a bean
///
/// Starts out empty and is filled by the container while wiring, if some other bean
/// satisfies `T`. Once the container is built the slot never changes again.
///
/// The slot only holds a weak reference, the container owns the beans. After the
/// container and every handle to the wired bean are dropped, [Inject::get] returns
/// `None` and [Inject::require] returns [RequireError::BeanDropped].
///
/// `T` may be a concrete type or a trait object:
/// ```rust
/// use beanwire::Inject;
///
/// trait PaymentGateway: Send + Sync {}
///
/// #[derive(Default)]
/// struct OrderService {
///     gateway: Inject<dyn PaymentGateway>,
/// }
///
/// let service = OrderService::default();
/// assert!(service.gateway.get().is_none());
/// ```
pub struct Inject<T: ?Sized> {
    slot: OnceLock<Weak<T>>,
}

impl<T: ?Sized> Inject<T> {
    /// An empty, unwired slot
    pub const fn new() -> Self {
        Self {
            slot: OnceLock::new(),
        }
    }

    /// The wired bean, or `None` if nothing satisfied the field or the bean is gone
    pub fn get(&self) -> Option<Arc<T>> {
        self.slot.get().and_then(Weak::upgrade)
    }

    /// The wired bean, or an error naming the missing type
    pub fn require(&self) -> Result<Arc<T>, RequireError> {
        let Some(bean) = self.slot.get() else {
            return Err(RequireError::TypeMissing(type_name::<T>()));
        };
        bean.upgrade()
            .ok_or(RequireError::BeanDropped(type_name::<T>()))
    }

    /// True if wiring filled the slot, even if the bean has been dropped since
    pub fn is_wired(&self) -> bool {
        self.slot.get().is_some()
    }

    /// Fills the slot, returns false if it already held a bean
    pub(crate) fn fill(&self, bean: &Arc<T>) -> bool {
        self.slot.set(Arc::downgrade(bean)).is_ok()
    }
}

impl<T: ?Sized> Default for Inject<T> {
    fn default() -> Self {
        Self::new()
    }
}

// Does not require T: Debug, trait objects usually are not
impl<T: ?Sized> Debug for Inject<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = match self.slot.get() {
            None => "unset",
            Some(bean) if bean.strong_count() == 0 => "dropped",
            Some(_) => "wired",
        };
        f.debug_tuple("Inject")
            .field(&type_name::<T>())
            .field(&state)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    trait Greeter: Send + Sync {
        fn greet(&self) -> String;
    }
    struct English;
    impl Greeter for English {
        fn greet(&self) -> String {
            "hello".to_string()
        }
    }

    #[test]
    fn empty_slot_reports_missing_type() {
        let slot = Inject::<dyn Greeter>::new();
        assert!(!slot.is_wired());
        assert!(slot.get().is_none());
        assert!(matches!(slot.require(), Err(RequireError::TypeMissing(name)) if name.contains("Greeter")));
    }

    #[test]
    fn slot_is_filled_once() {
        let english: Arc<dyn Greeter> = Arc::new(English);
        let slot = Inject::<dyn Greeter>::new();
        assert!(slot.fill(&english));
        assert!(!slot.fill(&english));

        assert_eq!(slot.require().unwrap().greet(), "hello");
        assert!(Arc::ptr_eq(&slot.get().unwrap(), &english));
    }

    #[test]
    fn slot_does_not_keep_bean_alive() {
        let english: Arc<dyn Greeter> = Arc::new(English);
        let slot = Inject::<dyn Greeter>::new();
        slot.fill(&english);
        drop(english);

        assert!(slot.is_wired());
        assert!(slot.get().is_none());
        assert!(matches!(slot.require(), Err(RequireError::BeanDropped(_))));
    }

    #[test]
    fn debug_shows_state() {
        let slot = Inject::<u32>::default();
        assert_eq!(format!("{slot:?}"), "Inject(\"u32\", \"unset\")");

        let bean = Arc::new(1);
        slot.fill(&bean);
        assert_eq!(format!("{slot:?}"), "Inject(\"u32\", \"wired\")");

        drop(bean);
        assert_eq!(format!("{slot:?}"), "Inject(\"u32\", \"dropped\")");
    }
}
