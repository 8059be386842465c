use std::collections::HashMap;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use serde_json::Value;
use tracing::{debug, info};

use crate::descriptor::{RawDescriptor, RouteDescriptor};
use crate::error::{LoadError, SchemaError};
use crate::registry::{self, Registry};
use crate::stage;

/// Where a descriptor came from. Reported with schema errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Origin {
    /// Declared in [`crate::stage`].
    Builtin,
    /// Added programmatically.
    Inline,
    /// Read from a descriptor file.
    File(PathBuf),
}

impl fmt::Display for Origin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Origin::Builtin => f.write_str("builtin"),
            Origin::Inline => f.write_str("inline"),
            Origin::File(path) => write!(f, "{}", path.display()),
        }
    }
}

enum Entry {
    Typed(RouteDescriptor),
    Raw(RawDescriptor),
}

/// Split a decoded descriptor file into its entries: one descriptor, a
/// list, or a `routes` table (the only way to write a list in TOML). Each
/// entry is decoded on its own so errors name the offending descriptor.
fn split_entries(body: Value) -> Result<Vec<RawDescriptor>, String> {
    let items = match body {
        Value::Array(items) => items,
        Value::Object(mut map) => match map.remove("routes") {
            Some(Value::Array(items)) => items,
            Some(_) => return Err("`routes` must be a list of descriptors".to_string()),
            None => vec![Value::Object(map)],
        },
        _ => {
            return Err(
                "expected a descriptor, a list of descriptors or a `routes` table".to_string(),
            );
        }
    };

    items
        .into_iter()
        .enumerate()
        .map(|(i, item)| {
            serde_json::from_value::<RawDescriptor>(item)
                .map_err(|e| format!("descriptor #{}: {}", i, e))
        })
        .collect()
}

/// RegistryLoader aggregates descriptors and turns them into a [`Registry`].
///
/// Sources are queued in load order; nothing is validated until
/// [`build`](Self::build), which fails on the first schema violation so that
/// a broken navigation tree aborts startup instead of rendering partially.
///
/// A descriptor directory is scanned recursively:
///
/// ```text
/// nav/
/// ├── ota.yaml               → one descriptor
/// ├── device/list.json       → one descriptor or a JSON array
/// └── admin.toml             → one descriptor or [[routes]] tables
/// ```
///
/// Files are visited in path order so the load order (and therefore the
/// position of unordered siblings) is deterministic.
#[derive(Default)]
pub struct RegistryLoader {
    pending: Vec<(Origin, Entry)>,
}

impl RegistryLoader {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue the built-in descriptors.
    pub fn with_builtin(mut self) -> Self {
        for d in stage::builtin() {
            self.pending.push((Origin::Builtin, Entry::Typed(d)));
        }
        self
    }

    /// Queue a typed descriptor.
    pub fn add(&mut self, descriptor: RouteDescriptor) -> &mut Self {
        self.pending.push((Origin::Inline, Entry::Typed(descriptor)));
        self
    }

    /// Queue an unvalidated descriptor.
    pub fn add_raw(&mut self, descriptor: RawDescriptor) -> &mut Self {
        self.pending.push((Origin::Inline, Entry::Raw(descriptor)));
        self
    }

    /// Number of queued descriptors.
    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    /// Queue every descriptor file under `dir`.
    /// Returns the number of descriptors read. A missing directory is not an
    /// error and yields 0.
    pub fn load_dir(&mut self, dir: &Path) -> Result<usize, LoadError> {
        if !dir.is_dir() {
            debug!("RegistryLoader: descriptor dir {:?} does not exist, skipping", dir);
            return Ok(0);
        }

        let mut files = Vec::new();
        Self::collect_files(dir, &mut files)?;
        files.sort();

        let mut count = 0;
        for path in files {
            count += self.load_file(&path)?;
        }

        debug!("RegistryLoader: loaded {} descriptors from {:?}", count, dir);
        Ok(count)
    }

    /// Queue the descriptors in a single file. The format is picked by
    /// extension: `.yaml`/`.yml`, `.json` or `.toml`.
    pub fn load_file(&mut self, path: &Path) -> Result<usize, LoadError> {
        let format = Format::of(path).ok_or_else(|| LoadError::Parse {
            path: path.to_path_buf(),
            message: "unsupported descriptor file extension".to_string(),
        })?;

        let data = fs::read(path).map_err(|source| LoadError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let descriptors = format
            .parse(&data)
            .and_then(split_entries)
            .map_err(|message| LoadError::Parse {
                path: path.to_path_buf(),
                message,
            })?;

        let count = descriptors.len();
        for d in descriptors {
            self.pending
                .push((Origin::File(path.to_path_buf()), Entry::Raw(d)));
        }

        debug!("RegistryLoader: {} descriptors from {:?}", count, path);
        Ok(count)
    }

    fn collect_files(dir: &Path, out: &mut Vec<PathBuf>) -> Result<(), LoadError> {
        let io_err = |source| LoadError::Io {
            path: dir.to_path_buf(),
            source,
        };

        for entry in fs::read_dir(dir).map_err(io_err)? {
            let path = entry.map_err(io_err)?.path();
            if path.is_dir() {
                Self::collect_files(&path, out)?;
            } else if path.is_file() && Format::of(&path).is_some() {
                out.push(path);
            } else {
                debug!("RegistryLoader: ignoring {:?}", path);
            }
        }
        Ok(())
    }

    /// Validate all queued descriptors in load order and build the registry.
    pub fn build(self) -> Result<Registry, LoadError> {
        let mut descriptors = Vec::with_capacity(self.pending.len());
        let mut seen: HashMap<String, Origin> = HashMap::new();

        for (origin, entry) in self.pending {
            let checked = match entry {
                Entry::Typed(d) => d.validate().map(|()| d),
                Entry::Raw(raw) => raw.into_descriptor(),
            };
            let d = checked.map_err(|source| LoadError::Schema {
                origin: origin.to_string(),
                source,
            })?;

            let key = registry::normalize(&d.route).to_string();
            if let Some(first) = seen.get(&key) {
                return Err(LoadError::Schema {
                    origin: format!("{} (first declared in {})", origin, first),
                    source: SchemaError::DuplicateRoute { route: d.route.to_string() },
                });
            }
            seen.insert(key, origin);
            descriptors.push(d);
        }

        let registry = Registry::from_validated(descriptors);
        info!(
            "Navigation registry built: {} routes, {} views",
            registry.len(),
            registry.views().count()
        );
        Ok(registry)
    }
}

#[derive(Debug, Clone, Copy)]
enum Format {
    Yaml,
    Json,
    Toml,
}

impl Format {
    fn of(path: &Path) -> Option<Self> {
        match path.extension().and_then(|e| e.to_str()) {
            Some("yaml") | Some("yml") => Some(Format::Yaml),
            Some("json") => Some(Format::Json),
            Some("toml") => Some(Format::Toml),
            _ => None,
        }
    }

    fn parse(self, data: &[u8]) -> Result<Value, String> {
        match self {
            Format::Yaml => serde_yaml::from_slice(data).map_err(|e| e.to_string()),
            Format::Json => serde_json::from_slice(data).map_err(|e| e.to_string()),
            Format::Toml => {
                let text = std::str::from_utf8(data).map_err(|e| e.to_string())?;
                toml::from_str(text).map_err(|e| e.to_string())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write(dir: &Path, name: &str, content: &str) {
        let path = dir.join(name);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(path, content).unwrap();
    }

    #[test]
    fn builtin_registry_builds() {
        let reg = RegistryLoader::new().with_builtin().build().unwrap();
        assert_eq!(reg.len(), 1);
        assert_eq!(reg.resolve("/ota/sign"), Some("view/ota/ota.vue"));
    }

    #[test]
    fn missing_dir_is_skipped() {
        let tmp = tempfile::tempdir().unwrap();
        let mut loader = RegistryLoader::new();
        assert_eq!(loader.load_dir(&tmp.path().join("nope")).unwrap(), 0);
        assert!(loader.is_empty());
    }

    #[test]
    fn loads_all_formats_in_path_order() {
        let tmp = tempfile::tempdir().unwrap();
        write(
            tmp.path(),
            "a_ota.yaml",
            "route: /ota\nname: OTA\ntitle: OTA\ntype: folder\nicon: iconfont icon-ota\n",
        );
        write(
            tmp.path(),
            "b_device/list.json",
            r#"[{"route":"/device","name":"设备","title":"设备","type":"view","filePath":"view/device.vue"}]"#,
        );
        write(
            tmp.path(),
            "c_admin.toml",
            "[[routes]]\nroute = \"/admin\"\nname = \"Admin\"\ntitle = \"Admin\"\ntype = \"tab\"\ninNav = false\n",
        );
        write(tmp.path(), "README.md", "not a descriptor");

        let mut loader = RegistryLoader::new();
        assert_eq!(loader.load_dir(tmp.path()).unwrap(), 3);
        let reg = loader.build().unwrap();

        let order: Vec<&str> = reg.iter().map(|d| &*d.route).collect();
        assert_eq!(order, ["/ota", "/device", "/admin"]);
        assert!(!reg.get("/admin").unwrap().in_nav);
        assert_eq!(reg.resolve("/device"), Some("view/device.vue"));
    }

    #[test]
    fn parse_error_names_file() {
        let tmp = tempfile::tempdir().unwrap();
        write(tmp.path(), "bad.json", "{ not json");

        let mut loader = RegistryLoader::new();
        let err = loader.load_dir(tmp.path()).unwrap_err();
        match err {
            LoadError::Parse { path, .. } => assert!(path.ends_with("bad.json")),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn schema_error_names_file() {
        let tmp = tempfile::tempdir().unwrap();
        write(
            tmp.path(),
            "sign.yaml",
            "route: /ota/sign\nname: OTA签名\ntitle: OTA签名\ntype: view\nfilePath: null\n",
        );

        let mut loader = RegistryLoader::new();
        loader.load_dir(tmp.path()).unwrap();
        let err = loader.build().unwrap_err();
        assert_eq!(
            err.schema(),
            Some(&SchemaError::MissingFilePath { route: "/ota/sign".into() })
        );
        assert!(err.to_string().contains("sign.yaml"));
    }

    #[test]
    fn duplicate_route_rejected() {
        let mut loader = RegistryLoader::new().with_builtin();
        loader.add(RouteDescriptor::view("/ota/sign/", "重复", "", "view/dup.vue"));
        let err = loader.build().unwrap_err();
        assert_eq!(
            err.schema(),
            Some(&SchemaError::DuplicateRoute { route: "/ota/sign/".into() })
        );
        assert!(err.to_string().contains("builtin"));
    }

    #[test]
    fn raw_invalid_type_rejected() {
        let mut loader = RegistryLoader::new();
        loader.add_raw(RawDescriptor {
            route: Some("/x".into()),
            name: Some("X".into()),
            title: Some("X".into()),
            kind: Some("page".into()),
            ..Default::default()
        });
        assert!(matches!(
            loader.build().unwrap_err().schema(),
            Some(SchemaError::InvalidType { .. })
        ));
    }

    #[test]
    fn numeric_type_in_file_is_invalid_type() {
        let tmp = tempfile::tempdir().unwrap();
        write(
            tmp.path(),
            "a.json",
            r#"{"route":"/a","name":"A","title":"A","type":1,"filePath":"view/a.vue"}"#,
        );
        write(
            tmp.path(),
            "b.yaml",
            "route: /b\nname: B\ntitle: B\ntype: 3\nfilePath: view/b.vue\n",
        );

        let mut loader = RegistryLoader::new();
        loader.load_file(&tmp.path().join("a.json")).unwrap();
        let err = loader.build().unwrap_err();
        assert_eq!(
            err.schema(),
            Some(&SchemaError::InvalidType { route: "/a".into(), value: "1".into() })
        );
        assert!(err.to_string().contains("a.json"));

        let mut loader = RegistryLoader::new();
        loader.load_file(&tmp.path().join("b.yaml")).unwrap();
        let err = loader.build().unwrap_err();
        assert_eq!(
            err.schema(),
            Some(&SchemaError::InvalidType { route: "/b".into(), value: "3".into() })
        );
    }

    #[test]
    fn bad_field_names_entry() {
        let tmp = tempfile::tempdir().unwrap();
        write(
            tmp.path(),
            "list.json",
            r#"[{"route":"/a","name":"A","title":"A","type":"tab"},{"route":"/b","name":"B","title":"B","type":"tab","order":"first"}]"#,
        );

        let mut loader = RegistryLoader::new();
        match loader.load_file(&tmp.path().join("list.json")).unwrap_err() {
            LoadError::Parse { message, .. } => assert!(message.starts_with("descriptor #1:")),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn scalar_file_rejected() {
        let tmp = tempfile::tempdir().unwrap();
        write(tmp.path(), "x.yaml", "just text\n");
        let mut loader = RegistryLoader::new();
        assert!(matches!(
            loader.load_file(&tmp.path().join("x.yaml")),
            Err(LoadError::Parse { .. })
        ));
    }

    #[test]
    fn unsupported_extension_rejected() {
        let tmp = tempfile::tempdir().unwrap();
        write(tmp.path(), "nav.ini", "route=/x");
        let mut loader = RegistryLoader::new();
        assert!(matches!(
            loader.load_file(&tmp.path().join("nav.ini")),
            Err(LoadError::Parse { .. })
        ));
    }
}
