//! Built-in descriptors, one module per navigable destination.
//!
//! Each module exposes a single `DESCRIPTOR`. Adding a destination means
//! adding a module here and listing it in [`builtin`].

pub mod ota;

use crate::descriptor::RouteDescriptor;

/// All built-in descriptors in declaration order.
pub fn builtin() -> Vec<RouteDescriptor> {
    vec![ota::descriptor()]
}
