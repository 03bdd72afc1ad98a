use std::fmt;
use std::future::Future;
use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;

use crate::locale::{Labels, Locale};

/// Leaf capability of an `Action` or `Input` node.
///
/// Called with `None` to run an action or to produce an input prompt, and
/// with `Some(text)` to consume the text captured for an input node. Business
/// conditions (bad number, insufficient funds) are answered with text; an
/// `Err` ends the session.
#[async_trait]
pub trait MenuHandler: Send + Sync {
    async fn call(&self, arg: Option<&str>) -> Result<String>;
}

/// Shared handler value stored on a node.
pub type Handler = Arc<dyn MenuHandler>;

struct FnHandler<F>(F);

#[async_trait]
impl<F, Fut> MenuHandler for FnHandler<F>
where
    F: Fn(Option<String>) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<String>> + Send + 'static,
{
    async fn call(&self, arg: Option<&str>) -> Result<String> {
        (self.0)(arg.map(str::to_owned)).await
    }
}

/// Wrap an async closure as a [`Handler`].
pub fn handler<F, Fut>(f: F) -> Handler
where
    F: Fn(Option<String>) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<String>> + Send + 'static,
{
    Arc::new(FnHandler(f))
}

/// A single entry in the menu tree.
#[derive(Debug, Clone)]
pub struct MenuNode {
    /// Globally unique id; paths are sequences of these.
    pub id: String,
    /// Token typed to select this node from its parent menu.
    pub option_code: String,
    pub label: Labels,
    pub kind: NodeKind,
}

/// What selecting a node does. Each variant carries only its own fields.
#[derive(Clone)]
pub enum NodeKind {
    /// Descends into an ordered list of children.
    Menu(Vec<MenuNode>),
    /// Runs once and returns text, staying on the current menu.
    Action(Handler),
    /// Prompts, then consumes the next submitted text.
    Input(Handler),
}

impl fmt::Debug for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NodeKind::Menu(children) => f.debug_tuple("Menu").field(children).finish(),
            NodeKind::Action(_) => f.write_str("Action(..)"),
            NodeKind::Input(_) => f.write_str("Input(..)"),
        }
    }
}

impl MenuNode {
    pub fn menu(
        id: impl Into<String>,
        option_code: impl Into<String>,
        label: Labels,
        children: Vec<MenuNode>,
    ) -> Self {
        Self {
            id: id.into(),
            option_code: option_code.into(),
            label,
            kind: NodeKind::Menu(children),
        }
    }

    pub fn action(
        id: impl Into<String>,
        option_code: impl Into<String>,
        label: Labels,
        handler: Handler,
    ) -> Self {
        Self {
            id: id.into(),
            option_code: option_code.into(),
            label,
            kind: NodeKind::Action(handler),
        }
    }

    pub fn input(
        id: impl Into<String>,
        option_code: impl Into<String>,
        label: Labels,
        handler: Handler,
    ) -> Self {
        Self {
            id: id.into(),
            option_code: option_code.into(),
            label,
            kind: NodeKind::Input(handler),
        }
    }

    pub fn label(&self, locale: Locale) -> &str {
        self.label.get(locale)
    }

    /// Children of a menu node; `None` for leaves.
    pub fn children(&self) -> Option<&[MenuNode]> {
        match &self.kind {
            NodeKind::Menu(children) => Some(children),
            _ => None,
        }
    }

    /// First child whose option code equals `code` exactly.
    pub fn find_option(&self, code: &str) -> Option<&MenuNode> {
        self.children()?.iter().find(|c| c.option_code == code)
    }

    pub fn find_child(&self, id: &str) -> Option<&MenuNode> {
        self.children()?.iter().find(|c| c.id == id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn labels(en: &str) -> Labels {
        Labels::new(en, en, en)
    }

    #[tokio::test]
    async fn closure_handler_receives_argument() {
        let echo = handler(|arg: Option<String>| async move {
            Ok(match arg {
                Some(text) => format!("got {text}"),
                None => "prompt".to_string(),
            })
        });
        assert_eq!(echo.call(None).await.unwrap(), "prompt");
        assert_eq!(echo.call(Some("42")).await.unwrap(), "got 42");
    }

    #[test]
    fn option_lookup_uses_exact_match() {
        let noop = handler(|_| async { Ok(String::new()) });
        let menu = MenuNode::menu(
            "root",
            "",
            labels("Root"),
            vec![
                MenuNode::action("a", "1", labels("A"), noop.clone()),
                MenuNode::action("b", "12", labels("B"), noop),
            ],
        );
        assert_eq!(menu.find_option("12").unwrap().id, "b");
        assert!(menu.find_option(" 1").is_none());
        assert_eq!(menu.find_child("a").unwrap().option_code, "1");
        assert!(menu.find_option("1").unwrap().children().is_none());
    }
}
