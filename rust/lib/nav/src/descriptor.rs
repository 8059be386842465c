//! Route descriptor — one navigable destination of the admin shell.
//!
//! Descriptors are declared statically (see [`crate::stage`]) or read from
//! descriptor files as [`RawDescriptor`]s. Neither form validates itself on
//! construction; the [`RegistryLoader`](crate::RegistryLoader) checks every
//! descriptor when it aggregates them.

use std::borrow::Cow;
use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::SchemaError;

/// Node kind in the navigation tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeType {
    /// Groups child entries. Not navigable on its own.
    Folder,
    /// Leaf entry rendered as a tab.
    Tab,
    /// Leaf entry that mounts a view implementation (`filePath`).
    View,
}

impl NodeType {
    pub fn as_str(self) -> &'static str {
        match self {
            NodeType::Folder => "folder",
            NodeType::Tab => "tab",
            NodeType::View => "view",
        }
    }

    /// Parse the wire name. Matching is exact: `"View"` is not a valid type.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "folder" => Some(NodeType::Folder),
            "tab" => Some(NodeType::Tab),
            "view" => Some(NodeType::View),
            _ => None,
        }
    }

    pub fn is_leaf(self) -> bool {
        !matches!(self, NodeType::Folder)
    }
}

impl fmt::Display for NodeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A navigable destination.
///
/// Text fields are `Cow<'static, str>` so descriptors can be written as
/// `const` items and still be produced from files at runtime.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RouteDescriptor {
    /// Unique URL-like path, e.g. "/ota/sign".
    pub route: Cow<'static, str>,
    /// Short display label.
    pub name: Cow<'static, str>,
    /// Long display label. May equal `name`.
    pub title: Cow<'static, str>,
    #[serde(rename = "type")]
    pub kind: NodeType,
    /// Icon class token, owned by the icon subsystem.
    pub icon: Cow<'static, str>,
    /// View implementation to mount. Required for views.
    pub file_path: Option<Cow<'static, str>>,
    /// Sort weight among siblings. `None` sorts after all ordered siblings.
    pub order: Option<i64>,
    /// Whether the entry appears in the navigation menu.
    pub in_nav: bool,
}

impl RouteDescriptor {
    /// A view entry whose title equals its name.
    pub const fn view(
        route: &'static str,
        name: &'static str,
        icon: &'static str,
        file_path: &'static str,
    ) -> Self {
        Self {
            route: Cow::Borrowed(route),
            name: Cow::Borrowed(name),
            title: Cow::Borrowed(name),
            kind: NodeType::View,
            icon: Cow::Borrowed(icon),
            file_path: Some(Cow::Borrowed(file_path)),
            order: None,
            in_nav: true,
        }
    }

    /// A folder entry whose title equals its name.
    pub const fn folder(route: &'static str, name: &'static str, icon: &'static str) -> Self {
        Self {
            route: Cow::Borrowed(route),
            name: Cow::Borrowed(name),
            title: Cow::Borrowed(name),
            kind: NodeType::Folder,
            icon: Cow::Borrowed(icon),
            file_path: None,
            order: None,
            in_nav: true,
        }
    }

    /// A tab entry whose title equals its name.
    pub const fn tab(route: &'static str, name: &'static str, icon: &'static str) -> Self {
        Self {
            route: Cow::Borrowed(route),
            name: Cow::Borrowed(name),
            title: Cow::Borrowed(name),
            kind: NodeType::Tab,
            icon: Cow::Borrowed(icon),
            file_path: None,
            order: None,
            in_nav: true,
        }
    }

    pub fn with_order(mut self, order: i64) -> Self {
        self.order = Some(order);
        self
    }

    /// Keep the entry routable but out of the navigation menu.
    pub fn hidden(mut self) -> Self {
        self.in_nav = false;
        self
    }

    pub fn with_title(mut self, title: impl Into<Cow<'static, str>>) -> Self {
        self.title = title.into();
        self
    }

    pub fn file_path(&self) -> Option<&str> {
        self.file_path.as_deref()
    }

    /// Check the per-descriptor schema rules. Uniqueness is a property of
    /// the loaded set and is checked by the loader.
    pub fn validate(&self) -> Result<(), SchemaError> {
        let route: &str = &self.route;
        if is_blank(route) {
            return Err(missing(route, "route"));
        }
        if !route.starts_with('/') || route.contains(['?', '#']) {
            return Err(SchemaError::InvalidRoute { route: route.to_string() });
        }
        if is_blank(&self.name) {
            return Err(missing(route, "name"));
        }
        if is_blank(&self.title) {
            return Err(missing(route, "title"));
        }
        if self.kind == NodeType::View && self.file_path().is_none_or(is_blank) {
            return Err(SchemaError::MissingFilePath { route: route.to_string() });
        }
        Ok(())
    }
}

/// Unvalidated descriptor as read from a descriptor file.
///
/// Every field is optional and `type` is kept as an untyped value so that a
/// malformed type (a number, a bool, an unknown name) surfaces as
/// [`SchemaError::InvalidType`] rather than a decode failure.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawDescriptor {
    pub route: Option<String>,
    pub name: Option<String>,
    pub title: Option<String>,
    #[serde(rename = "type")]
    pub kind: Option<Value>,
    pub icon: Option<String>,
    pub file_path: Option<String>,
    pub order: Option<i64>,
    pub in_nav: Option<bool>,
}

impl RawDescriptor {
    /// Convert into a typed descriptor, applying the schema rules.
    ///
    /// Absent `icon` becomes empty and absent `inNav` becomes `true`.
    pub fn into_descriptor(self) -> Result<RouteDescriptor, SchemaError> {
        let route = self.route.unwrap_or_default();
        let kind = match self.kind {
            None | Some(Value::Null) => return Err(missing(&route, "type")),
            Some(Value::String(s)) if is_blank(&s) => return Err(missing(&route, "type")),
            Some(Value::String(s)) => NodeType::parse(&s)
                .ok_or_else(|| SchemaError::InvalidType { route: route.clone(), value: s })?,
            Some(other) => {
                return Err(SchemaError::InvalidType {
                    route: route.clone(),
                    value: other.to_string(),
                });
            }
        };

        let descriptor = RouteDescriptor {
            route: Cow::Owned(route),
            name: Cow::Owned(self.name.unwrap_or_default()),
            title: Cow::Owned(self.title.unwrap_or_default()),
            kind,
            icon: Cow::Owned(self.icon.unwrap_or_default()),
            file_path: self.file_path.map(Cow::Owned),
            order: self.order,
            in_nav: self.in_nav.unwrap_or(true),
        };
        descriptor.validate()?;
        Ok(descriptor)
    }
}

fn is_blank(s: &str) -> bool {
    s.trim().is_empty()
}

fn missing(route: &str, field: &'static str) -> SchemaError {
    SchemaError::MissingField { route: route.to_string(), field }
}
