//! Interactive short-code (USSD-style) menu sessions.
//!
//! A caller dials a code, gets the root menu, and answers with option codes.
//! The [`MenuEngine`] walks a validated [`MenuCatalog`], runs leaf handlers,
//! captures free-text input for input nodes, and renders every screen in one
//! of a fixed set of locales.

pub mod demo;
pub mod engine;
pub mod error;
pub mod locale;
pub mod menu;
pub mod render;
pub mod session;

pub use engine::{EngineConfig, MenuEngine, Response, BACK_TOKEN};
pub use error::{CatalogError, EngineError, ResolveError};
pub use locale::{Labels, Locale};
pub use menu::{handler, Handler, HandlerRegistry, MenuCatalog, MenuHandler, MenuNode, NodeKind};
pub use session::{AwaitingInput, SessionState};
