//! OpenERP navigation registry.
//!
//! A [`RouteDescriptor`] declares one navigable destination of the admin
//! shell: a folder, a tab or a view. Descriptors are plain data. The
//! [`RegistryLoader`] aggregates them (static declarations and descriptor
//! files), enforces the schema rules and produces an immutable [`Registry`]
//! that the menu renderer and the client router read from.
//!
//! ```ignore
//! let mut loader = RegistryLoader::new().with_builtin();
//! loader.load_dir(Path::new("/etc/openerp/nav"))?;
//! let registry = loader.build()?;
//! assert_eq!(registry.resolve("/ota/sign"), Some("view/ota/ota.vue"));
//! ```

pub mod descriptor;
pub mod error;
pub mod loader;
pub mod menu;
pub mod order;
pub mod registry;
pub mod stage;

pub use descriptor::{NodeType, RawDescriptor, RouteDescriptor};
pub use error::{LoadError, SchemaError};
pub use loader::{Origin, RegistryLoader};
pub use menu::MenuNode;
pub use order::sort_siblings;
pub use registry::Registry;
