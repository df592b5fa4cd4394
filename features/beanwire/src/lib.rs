//! Beanwire is a small dependency injection container.
//!
//! It is handed a set of classes, constructs exactly one bean of each and then
//! wires the beans together by filling their [Inject] fields with whichever other
//! bean matches the field's type. Afterwards beans can be looked up by type.
//!
//! Building happens in two strict phases:
//! 1. Instantiation: every class's no-argument constructor is called
//! 2. Wiring: every declared field is filled from the complete set of beans
//!
//! Either both phases succeed and a ready [Container] is returned, or nothing is.
//!
//! # Examples
//!
//! ```rust
//! use beanwire::{ClassDefinition, ClassIdentity, Component, Container, Inject};
//!
//! #[derive(Default)]
//! struct UserRepository;
//!
//! #[derive(Default)]
//! struct UserService {
//!     repository: Inject<UserRepository>,
//! }
//!
//! impl Component for UserRepository {
//!     fn definition() -> ClassDefinition<Self> {
//!         ClassDefinition::<Self>::new().default_constructor()
//!     }
//! }
//!
//! impl Component for UserService {
//!     fn definition() -> ClassDefinition<Self> {
//!         ClassDefinition::<Self>::new()
//!             .default_constructor()
//!             .field("repository", |service| &service.repository)
//!     }
//! }
//!
//! let container = Container::new([
//!     ClassIdentity::of::<UserService>(),
//!     ClassIdentity::of::<UserRepository>(),
//! ])
//! .unwrap();
//!
//! let service = container.get_bean::<UserService>().unwrap();
//! let repository = container.get_bean::<UserRepository>().unwrap();
//! assert!(std::sync::Arc::ptr_eq(&service.repository.get().unwrap(), &repository));
//! ```
//!
//! Beanwire consists of the following components:
//!
//! 1. Class - describing how a type is constructed, its fields and its capabilities
//! 2. Inject - the field slots filled while wiring
//! 3. Builder - collecting the classes of a container
//! 4. Container - the built beans and type based lookup
//! 5. Wiring - the record of what was injected where

pub mod builder;
pub mod class;
pub mod container;
pub mod errors;
pub mod inject;
pub mod types;
pub mod wiring;

mod initiator;
mod registry;

pub use builder::ContainerBuilder;
pub use class::{ClassDefinition, ClassIdentity, Component};
pub use container::Container;
pub use errors::{ConstructionError, ConstructorPanicked, RequireError, UnresolvedFields};
pub use inject::Inject;
pub use types::{DynError, Injectable, Instance, TypeInfo};
pub use wiring::{WiredField, WiringGraph};
