use std::borrow::Cow;

use crate::descriptor::{NodeType, RouteDescriptor};

/// OTA firmware signing view.
pub const DESCRIPTOR: RouteDescriptor = RouteDescriptor {
    route: Cow::Borrowed("/ota/sign"),
    name: Cow::Borrowed("OTA签名"),
    title: Cow::Borrowed("OTA签名"),
    kind: NodeType::View,
    icon: Cow::Borrowed("iconfont icon-tushuguanli"),
    file_path: Some(Cow::Borrowed("view/ota/ota.vue")),
    order: None,
    in_nav: true,
};

pub fn descriptor() -> RouteDescriptor {
    DESCRIPTOR
}
