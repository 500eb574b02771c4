use std::fmt;

use crate::base::spec::ShapeSpec;
use crate::inmem::MemFolder;
use crate::prelude::*;
use crate::shape::CompiledShape;
use crate::settings::Settings;

struct NamespaceInner {
    base_uri: Arc<str>,
    root: EntryRef,
}

/// Owns the root entry of one running instance.
///
/// Cheap to clone; clones share the same root. There is no process-wide
/// namespace: whoever needs one is handed it.
#[derive(Clone)]
pub struct Namespace {
    inner: Arc<NamespaceInner>,
}

impl Namespace {
    pub fn new(base_uri: impl Into<String>, root: EntryRef) -> Self {
        let base_uri: String = base_uri.into();
        Self {
            inner: Arc::new(NamespaceInner {
                base_uri: base_uri.into(),
                root,
            }),
        }
    }

    /// A namespace rooted at a writable folder holding the usual top-level
    /// folders: a frozen `rom` with the built-in shape library under
    /// `rom/shapes`, a writable `boot` for startup configuration, `n` where
    /// drivers get mounted, and `tmp` for scratch space.
    pub fn with_standard_root(base_uri: impl Into<String>) -> Self {
        let rom = MemFolder::new_of("rom", [Arc::new(standard_shapes()) as EntryRef]).frozen();
        let root = MemFolder::new_of(
            "/",
            [
                Arc::new(rom) as EntryRef,
                Arc::new(MemFolder::new("boot")) as EntryRef,
                Arc::new(MemFolder::new("n")) as EntryRef,
                Arc::new(MemFolder::new("tmp")) as EntryRef,
            ],
        );
        Self::new(base_uri, Arc::new(root))
    }

    pub fn from_settings(settings: &Settings) -> Self {
        info!("starting namespace at {}", settings.base_uri);
        Self::with_standard_root(settings.base_uri.clone())
    }

    pub fn base_uri(&self) -> &str {
        &self.inner.base_uri
    }

    pub(crate) fn base_uri_shared(&self) -> Arc<str> {
        self.inner.base_uri.clone()
    }

    pub fn root(&self) -> &EntryRef {
        &self.inner.root
    }

    /// A new cursor positioned at the root.
    pub fn new_handle(&self) -> Handle {
        Handle::new_root(self)
    }

    pub fn context(&self) -> Context {
        Context::new(self.clone())
    }
}

/// The compiled-in shape library, frozen.
fn standard_shapes() -> MemFolder {
    let tag = |t: &str| ShapeSpec::Tag(t.to_string());
    let aws_config = ShapeSpec::Full {
        type_tag: "Folder".to_string(),
        optional: false,
        props: IndexMap::from([
            ("access_key_id".to_string(), tag("String")),
            ("secret_access_key".to_string(), tag("String")),
            (
                "session_token".to_string(),
                ShapeSpec::Full {
                    type_tag: "String".to_string(),
                    optional: true,
                    props: IndexMap::new(),
                },
            ),
            ("region".to_string(), tag("String")),
        ]),
    };
    MemFolder::new_of(
        "shapes",
        [Arc::new(CompiledShape::from_spec("aws-config", &aws_config)) as EntryRef],
    )
    .frozen()
}

impl fmt::Debug for Namespace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Namespace")
            .field("base_uri", &self.base_uri())
            .field("root", &self.root().name())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn standard_root_layout() {
        let ns = Namespace::with_standard_root("test://");
        let mut children = ns.context().get_folder("/").expect("root").children();
        children.sort();
        assert_eq!(children, vec!["boot", "n", "rom", "tmp"]);
        assert_eq!(ns.base_uri(), "test://");
    }

    #[test]
    fn rom_is_frozen_and_boot_is_writable() {
        let ctx = Namespace::with_standard_root("test://").context();
        assert!(ctx.get_shape("/rom/shapes/aws-config").is_some());
        assert!(!ctx.put("/rom/extra", Some(Arc::new(MemFolder::new("extra")))));
        assert!(!ctx.put("/rom/shapes/aws-config", None));
        assert!(!ctx.put("/rom/shapes/aws-config/props/x", None));
        assert!(ctx.get_shape("/rom/shapes/aws-config").is_some());

        assert!(ctx.put("/boot/cfg", Some(Arc::new(MemFolder::new("cfg")))));
        assert!(ctx.get_folder("/boot/cfg").is_some());
    }

    #[test]
    fn clean_roots_are_independent() {
        let first = Namespace::with_standard_root("test://").context();
        let second = Namespace::with_standard_root("test://").context();
        assert!(first.put("/boot/x", Some(Arc::new(MemFolder::new("x")))));
        assert!(second.get("/boot/x").is_none());
    }

    #[test]
    fn clones_share_the_root() {
        let ns = Namespace::with_standard_root("test://");
        let other = ns.clone();
        assert!(Arc::ptr_eq(ns.root(), other.root()));
        let handle = other.new_handle();
        assert_eq!(handle.depth(), 0);
        assert_eq!(handle.uri(), "test:///");
    }

    #[test]
    fn from_settings_uses_base_uri() {
        let settings = Settings {
            base_uri: "dev://".to_string(),
            ..Default::default()
        };
        let ns = Namespace::from_settings(&settings);
        assert_eq!(ns.base_uri(), "dev://");
    }
}
