use crate::{errors::UnresolvedFields, types::TypeInfo};

/// Outcome of wiring one field
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WiredField {
    /// The bean declaring the field
    pub owner: TypeInfo,
    /// Field name as declared in the class definition
    pub field: &'static str,
    /// Declared type of the field
    pub field_type: TypeInfo,
    /// The bean assigned to the field, `None` if nothing satisfied it
    pub provider: Option<TypeInfo>,
}

impl WiredField {
    pub fn is_resolved(&self) -> bool {
        self.provider.is_some()
    }
}

/// Graph of the wired container
/// Records which bean was injected into which field, enables visualization of the container
#[derive(Debug, Clone, Default)]
pub struct WiringGraph {
    fields: Vec<WiredField>,
}

impl WiringGraph {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn record(&mut self, field: WiredField) {
        self.fields.push(field);
    }

    /// Every declared field of every bean
    pub fn fields(&self) -> &[WiredField] {
        &self.fields
    }

    /// Fields declared by `owner`
    pub fn fields_of(&self, owner: TypeInfo) -> impl Iterator<Item = &WiredField> + '_ {
        self.fields.iter().filter(move |field| field.owner == owner)
    }

    /// Fields `provider` was injected into
    pub fn dependents_of(&self, provider: TypeInfo) -> impl Iterator<Item = &WiredField> + '_ {
        self.fields
            .iter()
            .filter(move |field| field.provider == Some(provider))
    }

    /// Fields no bean could satisfy
    pub fn unresolved(&self) -> impl Iterator<Item = &WiredField> + '_ {
        self.fields.iter().filter(|field| !field.is_resolved())
    }

    /// Validate the graph
    ///
    /// Unset fields are fine for the container itself, this is for callers
    /// who expect every field to be wired. Returns a list of all unset fields.
    pub fn check_complete(&self) -> Result<(), UnresolvedFields> {
        let fields: Vec<_> = self.unresolved().cloned().collect();
        if !fields.is_empty() {
            return Err(UnresolvedFields { fields });
        }

        Ok(())
    }
}

impl std::fmt::Display for WiringGraph {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut display = Vec::new();
        for field in &self.fields {
            let provider = match field.provider {
                Some(provider) => provider.short_name(),
                None => "<unset>".to_string(),
            };
            display.push(format!(
                "{}.{}: {} <- {}",
                field.owner.short_name(),
                field.field,
                field.field_type.short_name(),
                provider
            ));
        }
        f.write_str(&display.join("\n"))
    }
}
