use std::collections::BTreeMap;

use serde_json::Value;

use crate::descriptor::{NodeType, RouteDescriptor};
use crate::menu::{self, MenuNode};
use crate::order::sort_siblings;

/// The aggregated, validated set of descriptors.
///
/// Built once by [`RegistryLoader`](crate::RegistryLoader) and never mutated
/// afterwards, so it can be shared across threads behind an `Arc`.
///
/// The tree is derived from routes: the parent of a descriptor is the
/// registered folder whose route is the longest proper segment prefix of its
/// own route (`/ota` is the parent of `/ota/sign`). Descriptors without such
/// a folder are roots.
#[derive(Debug, Clone)]
pub struct Registry {
    /// Load order.
    descriptors: Vec<RouteDescriptor>,
    /// Normalized route → position in `descriptors`.
    index: BTreeMap<String, usize>,
    parents: Vec<Option<usize>>,
}

impl Registry {
    /// Caller guarantees every descriptor passed validation and that
    /// normalized routes are unique.
    pub(crate) fn from_validated(descriptors: Vec<RouteDescriptor>) -> Self {
        let index: BTreeMap<String, usize> = descriptors
            .iter()
            .enumerate()
            .map(|(i, d)| (normalize(&d.route).to_string(), i))
            .collect();

        let parents = descriptors
            .iter()
            .map(|d| find_parent(&d.route, &descriptors, &index))
            .collect();

        Self { descriptors, index, parents }
    }

    pub fn len(&self) -> usize {
        self.descriptors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.descriptors.is_empty()
    }

    /// All descriptors in load order.
    pub fn iter(&self) -> impl Iterator<Item = &RouteDescriptor> {
        self.descriptors.iter()
    }

    /// Look up a descriptor by route. Trailing slashes, query strings and
    /// fragments are ignored.
    pub fn get(&self, route: &str) -> Option<&RouteDescriptor> {
        self.index
            .get(normalize(route))
            .map(|&i| &self.descriptors[i])
    }

    pub fn contains(&self, route: &str) -> bool {
        self.get(route).is_some()
    }

    /// Parent folder of `route`, if it has one.
    pub fn parent(&self, route: &str) -> Option<&RouteDescriptor> {
        let i = *self.index.get(normalize(route))?;
        self.parents[i].map(|p| &self.descriptors[p])
    }

    /// Top-level descriptors, sorted.
    pub fn roots(&self) -> Vec<&RouteDescriptor> {
        self.siblings(None)
    }

    /// Direct children of the descriptor at `route`, sorted. Empty for
    /// leaves and unknown routes.
    pub fn children(&self, route: &str) -> Vec<&RouteDescriptor> {
        match self.index.get(normalize(route)) {
            Some(&i) => self.siblings(Some(i)),
            None => Vec::new(),
        }
    }

    fn siblings(&self, parent: Option<usize>) -> Vec<&RouteDescriptor> {
        let mut items: Vec<&RouteDescriptor> = self
            .descriptors
            .iter()
            .zip(&self.parents)
            .filter(|(_, p)| **p == parent)
            .map(|(d, _)| d)
            .collect();
        sort_siblings(&mut items);
        items
    }

    // ── Client router view ─────────────────────────────────────────

    /// Resolve a navigated path to the view implementation to mount.
    /// Folders and tabs do not resolve.
    pub fn resolve(&self, path: &str) -> Option<&str> {
        let d = self.get(path)?;
        match d.kind {
            NodeType::View => d.file_path(),
            NodeType::Folder | NodeType::Tab => None,
        }
    }

    /// `(route, filePath)` for every view, in load order.
    pub fn views(&self) -> impl Iterator<Item = (&str, &str)> {
        self.descriptors.iter().filter_map(|d| match d.kind {
            NodeType::View => d.file_path().map(|f| (&*d.route, f)),
            _ => None,
        })
    }

    // ── Menu renderer view ─────────────────────────────────────────

    /// The navigation menu: the tree restricted to `inNav` entries. A hidden
    /// folder hides its whole subtree.
    pub fn menu(&self) -> Vec<MenuNode> {
        self.menu_level(None)
    }

    fn menu_level(&self, parent: Option<usize>) -> Vec<MenuNode> {
        self.siblings(parent)
            .into_iter()
            .filter(|d| d.in_nav)
            .map(|d| {
                let children = match (d.kind, self.index.get(normalize(&d.route))) {
                    (NodeType::Folder, Some(&i)) => self.menu_level(Some(i)),
                    _ => Vec::new(),
                };
                MenuNode::from_descriptor(d, children)
            })
            .collect()
    }

    /// Menu as JSON: `{"nav": [...]}`.
    pub fn menu_json(&self) -> Value {
        menu::menu_json(&self.menu())
    }
}

/// Strip query, fragment and trailing slashes. `/` stays `/`.
pub(crate) fn normalize(route: &str) -> &str {
    let end = route.find(['?', '#']).unwrap_or(route.len());
    let path = route[..end].trim_end_matches('/');
    if path.is_empty() && route.starts_with('/') {
        "/"
    } else {
        path
    }
}

fn find_parent(
    route: &str,
    descriptors: &[RouteDescriptor],
    index: &BTreeMap<String, usize>,
) -> Option<usize> {
    let mut current = normalize(route);
    while current != "/" {
        let cut = current.rfind('/')?;
        current = if cut == 0 { "/" } else { &current[..cut] };
        if let Some(&i) = index.get(current) {
            if descriptors[i].kind == NodeType::Folder {
                return Some(i);
            }
        }
    }
    None
}
