//! Error types for the menu engine.
//!
//! - `CatalogError`: a catalog definition violates a load-time invariant
//! - `ResolveError`: a path no longer matches the catalog
//! - `EngineError`: a fatal failure inside one session transition

/// Catalog construction errors.
#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("root node '{0}' must be a menu")]
    RootNotMenu(String),

    #[error("menu '{0}' has no children")]
    EmptyMenu(String),

    #[error("duplicate node id '{0}'")]
    DuplicateId(String),

    #[error("node '{0}' has an empty option code")]
    EmptyOptionCode(String),

    #[error("duplicate option code '{code}' in menu '{menu}'")]
    DuplicateOptionCode { menu: String, code: String },

    #[error("option code '0' of node '{0}' is reserved for back navigation")]
    ReservedOptionCode(String),

    #[error("node '{node}' references unknown handler '{handler}'")]
    UnknownHandler { node: String, handler: String },

    #[error("malformed catalog definition: {0}")]
    Malformed(#[from] serde_json::Error),
}

/// Path resolution errors.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ResolveError {
    #[error("no child '{segment}' under '{parent}'")]
    NotFound { parent: String, segment: String },

    #[error("node '{0}' is not a menu")]
    NotAMenu(String),
}

/// Failures that end a session.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    #[error("session path is inconsistent with the catalog: {0}")]
    Resolve(#[from] ResolveError),

    #[error("input item '{item}' is no longer a child of menu '{menu}'")]
    InputItemMissing { menu: String, item: String },

    #[error("handler of '{node}' failed: {source}")]
    Handler {
        node: String,
        #[source]
        source: anyhow::Error,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn errors_name_the_offending_node() {
        let err = CatalogError::DuplicateOptionCode {
            menu: "root".into(),
            code: "1".into(),
        };
        assert_eq!(err.to_string(), "duplicate option code '1' in menu 'root'");

        let err = EngineError::from(ResolveError::NotAMenu("balance".into()));
        assert!(err.to_string().contains("'balance' is not a menu"));
    }
}
