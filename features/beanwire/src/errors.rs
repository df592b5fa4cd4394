use std::any::Any;

use thiserror::Error;

use crate::{
    types::{SharedError, TypeInfo},
    wiring::WiredField,
};

/// Errors while building a container
///
/// Construction is all or nothing, any of these means no container was produced.
#[derive(Error, Debug, Clone)]
pub enum ConstructionError {
    /// The class was registered without a no-argument constructor
    #[error("'{class}' has no accessible no-argument constructor")]
    NoAccessibleConstructor { class: TypeInfo },

    /// The constructor returned an error or panicked
    #[error("Constructor of '{class}' failed - error: {error}")]
    ConstructorFailed {
        class: TypeInfo,
        #[source]
        error: SharedError,
    },
}

impl ConstructionError {
    /// The class which caused the construction to fail
    pub fn class(&self) -> TypeInfo {
        match self {
            ConstructionError::NoAccessibleConstructor { class }
            | ConstructionError::ConstructorFailed { class, .. } => *class,
        }
    }
}

/// Errors when trying to require a certain type
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RequireError {
    /// No bean satisfies the required type
    #[error("The required type '{0}' is not known.")]
    TypeMissing(&'static str),
    /// The field was wired, but the container owning the bean is gone
    #[error("The bean wired for '{0}' has been dropped with its container.")]
    BeanDropped(&'static str),
}

/// A constructor panicked, carries the panic message if it had one
#[derive(Error, Debug, Clone)]
#[error("Constructor panicked: {message}")]
pub struct ConstructorPanicked {
    pub message: String,
}
impl ConstructorPanicked {
    pub(crate) fn from_payload(payload: Box<dyn Any + Send>) -> Self {
        let message = match payload.downcast::<String>() {
            Ok(message) => *message,
            Err(payload) => match payload.downcast::<&'static str>() {
                Ok(message) => (*message).to_string(),
                Err(_) => "<non-string panic payload>".to_string(),
            },
        };
        Self { message }
    }
}

/// Fields which no bean in the container could satisfy
#[derive(Error, Debug, Clone)]
pub struct UnresolvedFields {
    pub fields: Vec<WiredField>,
}
impl std::fmt::Display for UnresolvedFields {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut display = Vec::new();
        display.push("One or more fields could not be wired:".to_string());
        for field in &self.fields {
            display.push(format!(
                "- '{}.{}' needs '{}' but it is missing",
                field.owner, field.field, field.field_type
            ));
        }
        f.write_str(&display.join("\n"))
    }
}
