//! The static menu tree: nodes, handlers and the validated catalog.

pub mod catalog;
pub mod definition;
pub mod node;

pub use catalog::MenuCatalog;
pub use definition::HandlerRegistry;
pub use node::{handler, Handler, MenuHandler, MenuNode, NodeKind};
