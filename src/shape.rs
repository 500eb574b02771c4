//! Structural contracts compiled from Folder configuration.
//!
//! A configuration Folder carries a `type` String, an optional `optional`
//! String (`"yes"` makes the shape optional) and an optional `props` Folder.
//! Each prop is either a String holding a bare type tag or a nested
//! configuration Folder:
//!
//! ```text
//! aws-config/
//!   type = "Folder"
//!   props/
//!     access_key_id = "String"
//!     session_token/
//!       type = "String"
//!       optional = "yes"
//! ```

use std::fmt;

use crate::base::spec::ShapeSpec;
use crate::inmem::{MemFolder, MemFunction, MemString};
use crate::prelude::*;
use crate::utils::folder::get_child_string;

const VALIDATE: &str = "validate";

/// The kinds of entry a shape can demand.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShapeType {
    String,
    Function,
    Shape,
    Folder,
    /// Kept verbatim so checks against it can report what was asked for.
    Unknown(String),
}

impl ShapeType {
    pub fn parse(tag: &str) -> Self {
        match tag {
            "String" => ShapeType::String,
            "Function" => ShapeType::Function,
            "Shape" => ShapeType::Shape,
            "Folder" => ShapeType::Folder,
            other => ShapeType::Unknown(other.to_string()),
        }
    }
}

impl fmt::Display for ShapeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ShapeType::String => f.write_str("String"),
            ShapeType::Function => f.write_str("Function"),
            ShapeType::Shape => f.write_str("Shape"),
            ShapeType::Folder => f.write_str("Folder"),
            ShapeType::Unknown(tag) => write!(f, "unknown type {tag:?}"),
        }
    }
}

struct ShapeInner {
    config: Arc<dyn Folder>,
    shape_type: ShapeType,
    optional: bool,
    props: Vec<CompiledShape>,
}

/// A shape compiled from its configuration Folder.
///
/// Besides checking candidates it presents itself as a read-only Folder: its
/// configuration children plus a `validate` Function, which answers a String
/// `"ok"` for conforming input and nothing otherwise.
#[derive(Clone)]
pub struct CompiledShape {
    inner: Arc<ShapeInner>,
}

impl CompiledShape {
    /// Compiles `config` into a shape. The configuration is copied into a
    /// frozen tree first, so later writes to the source never reach the shape
    /// and the shape's Folder view stays read-only all the way down.
    pub fn compile(config: Arc<dyn Folder>) -> Self {
        let snapshot = frozen_copy(config.name(), config.as_ref(), 0);
        Self::from_frozen(Arc::new(snapshot))
    }

    fn from_frozen(config: Arc<dyn Folder>) -> Self {
        let shape_type = match get_child_string(config.as_ref(), "type") {
            Some(tag) => ShapeType::parse(&tag),
            None => ShapeType::Unknown(String::new()),
        };
        let optional = get_child_string(config.as_ref(), "optional").as_deref() == Some("yes");

        let mut props = Vec::new();
        if let Some(props_entry) = config.fetch("props") {
            match props_entry.into_folder() {
                Some(props_folder) => {
                    for prop_name in props_folder.children() {
                        let Some(prop) = props_folder.fetch(&prop_name) else {
                            continue;
                        };
                        if let Some(prop_config) = Self::prop_config(&prop_name, prop) {
                            props.push(Self::from_frozen(prop_config));
                        }
                    }
                }
                None => warn!("props of shape {} is not a Folder, ignoring", config.name()),
            }
        }

        Self {
            inner: Arc::new(ShapeInner {
                config,
                shape_type,
                optional,
                props,
            }),
        }
    }

    /// Builds the configuration Folder for one prop, expanding the
    /// `prop = "Tag"` shorthand. Other kinds of entry are skipped.
    fn prop_config(prop_name: &str, prop: EntryRef) -> Option<Arc<dyn Folder>> {
        if let Some(tag) = prop.clone().into_string() {
            let config = MemFolder::new_of(
                prop_name,
                [Arc::new(MemString::new("type", tag.get()).frozen()) as EntryRef],
            )
            .frozen();
            return Some(Arc::new(config));
        }
        if let Some(folder) = prop.clone().into_folder() {
            return Some(folder);
        }
        warn!("got unknown prop {} for shape", Describe(Some(&prop)));
        None
    }

    /// Compiles a declarative spec by rendering it into configuration first.
    pub fn from_spec(name: &str, spec: &ShapeSpec) -> Self {
        Self::compile(Arc::new(spec.to_config(name)))
    }

    pub fn name(&self) -> &str {
        self.inner.config.name()
    }

    pub fn shape_type(&self) -> &ShapeType {
        &self.inner.shape_type
    }

    pub fn is_optional(&self) -> bool {
        self.inner.optional
    }

    pub fn props(&self) -> &[CompiledShape] {
        &self.inner.props
    }

    /// Checks `candidate` against this shape. Never fails loudly: every
    /// mismatch is logged and reported as `false`.
    pub fn check(&self, ctx: &Context, candidate: Option<&EntryRef>) -> bool {
        if self.inner.optional && candidate.is_none() {
            return true;
        }
        let ok = match candidate {
            None => false,
            Some(entry) => self.check_present(ctx, entry),
        };
        if !ok {
            warn!("validating failed: {} against {}", Describe(candidate), self);
        }
        ok
    }

    fn check_present(&self, ctx: &Context, entry: &EntryRef) -> bool {
        match &self.inner.shape_type {
            ShapeType::String => entry.clone().into_string().is_some(),
            // A Function shape only asserts invocability; its props are not
            // checked.
            ShapeType::Function => entry.clone().into_function().is_some(),
            ShapeType::Shape => entry.clone().into_shape().is_some(),
            ShapeType::Folder => match entry.clone().into_folder() {
                Some(folder) => self.check_props(ctx, folder.as_ref()),
                None => false,
            },
            ShapeType::Unknown(tag) => {
                warn!("can't validate unknown type {:?} for shape {}", tag, self.name());
                false
            }
        }
    }

    fn check_props(&self, ctx: &Context, folder: &dyn Folder) -> bool {
        let mut ok = true;
        for prop in self.props() {
            let mut actual = folder.fetch(prop.name());
            if let Some(link) = actual.clone().and_then(|e| e.into_link()) {
                let target = link.target();
                match ctx.get(&target) {
                    Some(resolved) => actual = Some(resolved),
                    None => {
                        warn!(
                            "following link {} -> {} for prop {} failed",
                            link.name(),
                            target,
                            prop.name()
                        );
                        ok = false;
                        continue;
                    }
                }
            }
            if !prop.check(ctx, actual.as_ref()) {
                ok = false;
            }
        }
        ok
    }
}

impl fmt::Display for CompiledShape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.name(), self.inner.shape_type)?;
        if self.inner.optional {
            f.write_str("?")?;
        }
        if !self.inner.props.is_empty() {
            f.write_str(" {")?;
            for (i, prop) in self.inner.props.iter().enumerate() {
                if i > 0 {
                    f.write_str(",")?;
                }
                write!(f, " {prop}")?;
            }
            f.write_str(" }")?;
        }
        Ok(())
    }
}

impl fmt::Debug for CompiledShape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "CompiledShape({self})")
    }
}

impl Entry for CompiledShape {
    fn name(&self) -> &str {
        CompiledShape::name(self)
    }

    fn into_shape(self: Arc<Self>) -> Option<Arc<dyn Shape>> {
        Some(self)
    }

    fn into_folder(self: Arc<Self>) -> Option<Arc<dyn Folder>> {
        Some(self)
    }
}

impl Shape for CompiledShape {
    fn check(&self, ctx: &Context, candidate: Option<&EntryRef>) -> bool {
        CompiledShape::check(self, ctx, candidate)
    }
}

impl Folder for CompiledShape {
    fn children(&self) -> Vec<String> {
        let mut names = self.inner.config.children();
        names.push(VALIDATE.to_string());
        names
    }

    fn fetch(&self, name: &str) -> Option<EntryRef> {
        if name == VALIDATE {
            let shape = self.clone();
            return Some(Arc::new(MemFunction::new(VALIDATE, move |ctx, input| {
                shape
                    .check(ctx, input.as_ref())
                    .then(|| Arc::new(MemString::new("result", "ok")) as EntryRef)
            })));
        }
        self.inner.config.fetch(name)
    }

    fn put(&self, _name: &str, _entry: Option<EntryRef>) -> bool {
        false
    }
}

const MAX_CONFIG_DEPTH: usize = 32;

/// Copies a configuration tree into frozen in-memory containers. Folders are
/// named after the key they're bound under, so a prop always carries its
/// prop name. Entries other than Folders and Strings are shared as-is.
fn frozen_copy(name: &str, folder: &dyn Folder, depth: usize) -> MemFolder {
    let copy = MemFolder::new(name);
    for child_name in folder.children() {
        let Some(child) = folder.fetch(&child_name) else {
            continue;
        };
        let child: EntryRef = if let Some(sub) = child.clone().into_folder() {
            if depth >= MAX_CONFIG_DEPTH {
                warn!("shape config {} nests too deeply, dropping {}", name, child_name);
                continue;
            }
            Arc::new(frozen_copy(&child_name, sub.as_ref(), depth + 1))
        } else if let Some(string) = child.clone().into_string() {
            Arc::new(MemString::new(child_name.as_str(), string.get()).frozen())
        } else {
            child
        };
        copy.put(&child_name, Some(child));
    }
    copy.frozen()
}
