use std::collections::HashSet;

use crate::error::{CatalogError, ResolveError};
use crate::menu::node::{MenuNode, NodeKind};

/// The immutable menu tree. Built and validated once, then shared read-only
/// by every session.
#[derive(Debug, Clone)]
pub struct MenuCatalog {
    root: MenuNode,
}

impl MenuCatalog {
    /// Validate `root` and wrap it as a catalog.
    ///
    /// Rejects a non-menu root, empty menus, duplicate ids anywhere in the
    /// tree, and empty, duplicate or reserved (`"0"`) option codes within a
    /// menu. Children are owned values, so the tree cannot contain a cycle.
    pub fn new(root: MenuNode) -> Result<Self, CatalogError> {
        if root.children().is_none() {
            return Err(CatalogError::RootNotMenu(root.id));
        }
        let mut ids = HashSet::new();
        validate(&root, &mut ids)?;
        Ok(Self { root })
    }

    pub fn root(&self) -> &MenuNode {
        &self.root
    }

    /// Walk from the root following `path` ids through each menu's children.
    pub fn resolve<S: AsRef<str>>(&self, path: &[S]) -> Result<&MenuNode, ResolveError> {
        let mut node = &self.root;
        for segment in path {
            let segment = segment.as_ref();
            if node.children().is_none() {
                return Err(ResolveError::NotAMenu(node.id.clone()));
            }
            node = node
                .find_child(segment)
                .ok_or_else(|| ResolveError::NotFound {
                    parent: node.id.clone(),
                    segment: segment.to_string(),
                })?;
        }
        Ok(node)
    }

    /// Like [`resolve`](Self::resolve), but the node reached must be a menu.
    pub fn resolve_menu<S: AsRef<str>>(&self, path: &[S]) -> Result<&MenuNode, ResolveError> {
        let node = self.resolve(path)?;
        match node.kind {
            NodeKind::Menu(_) => Ok(node),
            _ => Err(ResolveError::NotAMenu(node.id.clone())),
        }
    }

    /// Total number of nodes, root included.
    pub fn node_count(&self) -> usize {
        count(&self.root)
    }

    /// Number of menu levels on the deepest branch (the root alone is 1).
    pub fn depth(&self) -> usize {
        menu_depth(&self.root)
    }
}

fn validate(node: &MenuNode, ids: &mut HashSet<String>) -> Result<(), CatalogError> {
    if !ids.insert(node.id.clone()) {
        return Err(CatalogError::DuplicateId(node.id.clone()));
    }
    let Some(children) = node.children() else {
        return Ok(());
    };
    if children.is_empty() {
        return Err(CatalogError::EmptyMenu(node.id.clone()));
    }

    let mut codes = HashSet::new();
    for child in children {
        if child.option_code.is_empty() {
            return Err(CatalogError::EmptyOptionCode(child.id.clone()));
        }
        if child.option_code == "0" {
            return Err(CatalogError::ReservedOptionCode(child.id.clone()));
        }
        if !codes.insert(child.option_code.as_str()) {
            return Err(CatalogError::DuplicateOptionCode {
                menu: node.id.clone(),
                code: child.option_code.clone(),
            });
        }
        validate(child, ids)?;
    }
    Ok(())
}

fn count(node: &MenuNode) -> usize {
    1 + node
        .children()
        .map(|children| children.iter().map(count).sum())
        .unwrap_or(0)
}

fn menu_depth(node: &MenuNode) -> usize {
    match node.children() {
        Some(children) => 1 + children.iter().map(menu_depth).max().unwrap_or(0),
        None => 0,
    }
}
