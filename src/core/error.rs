use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MapError {
    #[error("No map configured from '{source_type}' to '{target_type}'")]
    MissingMap {
        source_type: &'static str,
        target_type: &'static str,
    },

    #[error("No equality comparison configured from '{source_type}' to '{target_type}'")]
    MissingEquivalence {
        source_type: &'static str,
        target_type: &'static str,
    },

    #[error("Invalid mapper configuration: {0}")]
    InvalidConfiguration(String),

    #[error("Conversion error on field '{field}': {message}")]
    Conversion { field: String, message: String },

    #[error("No '{0}' entity matches the given source item")]
    EntityNotFound(&'static str),
}

impl MapError {
    pub fn missing_map<S: ?Sized, T: ?Sized>() -> Self {
        Self::MissingMap {
            source_type: std::any::type_name::<S>(),
            target_type: std::any::type_name::<T>(),
        }
    }

    pub fn missing_equivalence<S: ?Sized, T: ?Sized>() -> Self {
        Self::MissingEquivalence {
            source_type: std::any::type_name::<S>(),
            target_type: std::any::type_name::<T>(),
        }
    }

    /// Shorthand for field copy closures that fail to convert a value.
    pub fn conversion(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Conversion {
            field: field.into(),
            message: message.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, MapError>;
