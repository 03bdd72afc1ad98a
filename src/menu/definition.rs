//! Declarative catalog definitions.
//!
//! A catalog can be described as JSON, with leaves naming their handler.
//! Names are bound through a [`HandlerRegistry`] at load time:
//!
//! ```json
//! {
//!   "id": "root", "label": {"az": "...", "ru": "...", "en": "Main"},
//!   "kind": "menu",
//!   "children": [
//!     {"id": "balance", "option": "1", "label": {...}, "kind": "action", "handler": "balance"}
//!   ]
//! }
//! ```

use std::collections::HashMap;

use serde::Deserialize;

use crate::error::CatalogError;
use crate::locale::Labels;
use crate::menu::catalog::MenuCatalog;
use crate::menu::node::{Handler, MenuNode};

/// Named handlers available to declarative catalogs.
#[derive(Clone, Default)]
pub struct HandlerRegistry {
    handlers: HashMap<String, Handler>,
}

impl HandlerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, name: impl Into<String>, handler: Handler) -> &mut Self {
        self.handlers.insert(name.into(), handler);
        self
    }

    pub fn get(&self, name: &str) -> Option<&Handler> {
        self.handlers.get(name)
    }

    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.handlers.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }
}

#[derive(Debug, Deserialize)]
struct NodeDef {
    id: String,
    /// Absent only on the root.
    #[serde(default)]
    option: String,
    label: Labels,
    #[serde(flatten)]
    kind: KindDef,
}

#[derive(Debug, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
enum KindDef {
    Menu { children: Vec<NodeDef> },
    Action { handler: String },
    Input { handler: String },
}

impl NodeDef {
    fn build(self, registry: &HandlerRegistry) -> Result<MenuNode, CatalogError> {
        let NodeDef {
            id,
            option,
            label,
            kind,
        } = self;
        let bind = |name: String| {
            registry
                .get(&name)
                .cloned()
                .ok_or_else(|| CatalogError::UnknownHandler {
                    node: id.clone(),
                    handler: name,
                })
        };
        match kind {
            KindDef::Menu { children } => {
                let children = children
                    .into_iter()
                    .map(|child| child.build(registry))
                    .collect::<Result<Vec<_>, _>>()?;
                Ok(MenuNode::menu(id, option, label, children))
            }
            KindDef::Action { handler } => {
                let handler = bind(handler)?;
                Ok(MenuNode::action(id, option, label, handler))
            }
            KindDef::Input { handler } => {
                let handler = bind(handler)?;
                Ok(MenuNode::input(id, option, label, handler))
            }
        }
    }
}

impl MenuCatalog {
    /// Parse a JSON catalog definition, bind its handlers and validate it.
    pub fn from_json(text: &str, registry: &HandlerRegistry) -> Result<Self, CatalogError> {
        let def: NodeDef = serde_json::from_str(text)?;
        MenuCatalog::new(def.build(registry)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::menu::node::handler;

    fn registry() -> HandlerRegistry {
        let mut registry = HandlerRegistry::new();
        registry
            .register("balance", handler(|_| async { Ok("Balance: 25.50".to_string()) }))
            .register("topup", handler(|_| async { Ok("Enter amount:".to_string()) }));
        registry
    }

    const CATALOG: &str = r#"{
        "id": "root",
        "label": {"az": "Əsas menyu", "ru": "Главное меню", "en": "Main menu"},
        "kind": "menu",
        "children": [
            {
                "id": "services", "option": "1",
                "label": {"az": "Xidmətlər", "ru": "Услуги", "en": "Services"},
                "kind": "menu",
                "children": [
                    {"id": "balance", "option": "1",
                     "label": {"az": "Balans", "ru": "Баланс", "en": "Balance"},
                     "kind": "action", "handler": "balance"},
                    {"id": "topup", "option": "2",
                     "label": {"az": "Artır", "ru": "Пополнить", "en": "Top up"},
                     "kind": "input", "handler": "topup"}
                ]
            }
        ]
    }"#;

    #[test]
    fn loads_and_binds_handlers() {
        let catalog = MenuCatalog::from_json(CATALOG, &registry()).unwrap();
        assert_eq!(catalog.node_count(), 4);
        let topup = catalog.resolve(&["services", "topup"]).unwrap();
        assert!(matches!(topup.kind, crate::menu::NodeKind::Input(_)));
        assert_eq!(topup.option_code, "2");
    }

    #[test]
    fn unknown_handler_is_rejected() {
        let err = MenuCatalog::from_json(CATALOG, &HandlerRegistry::new()).unwrap_err();
        assert!(matches!(
            err,
            CatalogError::UnknownHandler { node, handler } if node == "balance" && handler == "balance"
        ));
    }

    #[test]
    fn malformed_json_is_rejected() {
        let err = MenuCatalog::from_json(r#"{"id": "root", "kind": "menu"}"#, &registry());
        assert!(matches!(err, Err(CatalogError::Malformed(_))));
    }

    #[test]
    fn registry_lists_names_sorted() {
        assert_eq!(registry().names(), vec!["balance", "topup"]);
    }
}
