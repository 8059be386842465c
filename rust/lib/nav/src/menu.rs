//! Menu tree — the `inNav` view of the registry for the sidebar renderer.

use serde_json::{json, Value};

use crate::descriptor::{NodeType, RouteDescriptor};

/// A node in the navigation menu.
#[derive(Debug, Clone, PartialEq)]
pub struct MenuNode {
    pub route: String,
    /// Sidebar label.
    pub name: String,
    /// Page heading / tooltip.
    pub title: String,
    pub icon: String,
    pub kind: NodeType,
    /// Visible children, already sorted. Only folders have any.
    pub children: Vec<MenuNode>,
}

impl MenuNode {
    pub(crate) fn from_descriptor(d: &RouteDescriptor, children: Vec<MenuNode>) -> Self {
        Self {
            route: d.route.to_string(),
            name: d.name.to_string(),
            title: d.title.to_string(),
            icon: d.icon.to_string(),
            kind: d.kind,
            children,
        }
    }

    /// Depth-first search by route.
    pub fn find(&self, route: &str) -> Option<&MenuNode> {
        if self.route == route {
            return Some(self);
        }
        self.children.iter().find_map(|c| c.find(route))
    }

    /// Convert to JSON for schema output.
    pub fn to_json(&self) -> Value {
        json!({
            "route": self.route,
            "name": self.name,
            "title": self.title,
            "icon": self.icon,
            "type": self.kind.as_str(),
            "children": self.children.iter().map(|c| c.to_json()).collect::<Vec<_>>(),
        })
    }
}

/// Wrap a menu forest the way the admin schema expects it.
pub fn menu_json(nodes: &[MenuNode]) -> Value {
    json!({
        "nav": nodes.iter().map(|n| n.to_json()).collect::<Vec<_>>()
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn to_json_nests_children() {
        let sign = RouteDescriptor::view("/ota/sign", "OTA签名", "icon-sign", "view/ota/ota.vue");
        let ota = RouteDescriptor::folder("/ota", "OTA", "icon-ota");
        let node = MenuNode::from_descriptor(&ota, vec![MenuNode::from_descriptor(&sign, vec![])]);

        let v = menu_json(&[node.clone()]);
        assert_eq!(v["nav"][0]["route"], "/ota");
        assert_eq!(v["nav"][0]["type"], "folder");
        assert_eq!(v["nav"][0]["children"][0]["name"], "OTA签名");
        assert_eq!(v["nav"][0]["children"][0]["children"].as_array().unwrap().len(), 0);

        assert_eq!(node.find("/ota/sign").map(|n| n.icon.as_str()), Some("icon-sign"));
        assert!(node.find("/missing").is_none());
    }
}
