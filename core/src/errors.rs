use thiserror::Error;

/// Problems found while validating a catalog
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CatalogError {
    #[error("catalog has no categories")]
    Empty,

    #[error("category #{index} has an empty name")]
    UnnamedCategory { index: usize },

    #[error("category name '{0}' is reserved for the fallback reply")]
    ReservedCategory(String),

    #[error("category '{0}' is declared more than once")]
    DuplicateCategory(String),

    #[error("category '{0}' has no entries")]
    NoEntries(String),

    #[error("entry #{index} in category '{category}' has an empty phrase")]
    EmptyPhrase { category: String, index: usize },

    #[error("entry '{phrase}' in category '{category}' has an empty response")]
    EmptyResponse { category: String, phrase: String },

    #[error("quick action #{index} is missing a label or query")]
    IncompleteQuickAction { index: usize },

    #[error("fallback response is empty")]
    EmptyFallback,
}

/// Campus assistant errors
#[derive(Error, Debug)]
pub enum CampusError {
    #[error("Configuration Error: {0}")]
    Config(String),

    #[error("Catalog Error: {0}")]
    Catalog(#[from] CatalogError),

    #[error(transparent)]
    TomlParse(#[from] toml::de::Error),

    #[error(transparent)]
    TomlSerialize(#[from] toml::ser::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Result type for campus assistant operations
pub type CampusResult<T> = Result<T, CampusError>;
