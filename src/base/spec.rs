use crate::inmem::{MemFolder, MemString};
use crate::prelude::*;

/// Declarative form of a shape, for authoring shapes as JSON instead of
/// building configuration folders by hand.
///
/// A bare string is shorthand for a required shape of that type:
///
/// ```json
/// {"type": "Folder", "props": {"name": "String", "nickname": {"type": "String", "optional": true}}}
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ShapeSpec {
    Tag(String),
    Full {
        #[serde(rename = "type")]
        type_tag: String,
        #[serde(default, skip_serializing_if = "std::ops::Not::not")]
        optional: bool,
        #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
        props: IndexMap<String, ShapeSpec>,
    },
}

impl ShapeSpec {
    pub fn from_json(text: &str) -> Result<Self> {
        serde_json::from_str(text).context("parsing shape spec")
    }

    pub fn type_tag(&self) -> &str {
        match self {
            ShapeSpec::Tag(tag) => tag,
            ShapeSpec::Full { type_tag, .. } => type_tag,
        }
    }

    /// Renders the spec as a frozen configuration folder named `name`, the
    /// form [`crate::CompiledShape::compile`] consumes.
    pub fn to_config(&self, name: &str) -> MemFolder {
        let config = MemFolder::new(name);
        config.put("type", Some(Arc::new(MemString::new("type", self.type_tag()).frozen())));
        if let ShapeSpec::Full { optional, props, .. } = self {
            if *optional {
                config.put("optional", Some(Arc::new(MemString::new("optional", "yes").frozen())));
            }
            if !props.is_empty() {
                let props_folder = MemFolder::new("props");
                for (prop_name, prop) in props {
                    props_folder.put(prop_name, Some(Arc::new(prop.to_config(prop_name))));
                }
                config.put("props", Some(Arc::new(props_folder.frozen())));
            }
        }
        config.frozen()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shape::{CompiledShape, ShapeType};
    use crate::utils::folder::{get_child_folder, get_child_string};

    const PERSON: &str = r#"{
        "type": "Folder",
        "props": {
            "name": "String",
            "nickname": {"type": "String", "optional": true}
        }
    }"#;

    #[test]
    fn parses_shorthand_and_full_forms() {
        let spec = ShapeSpec::from_json(PERSON).expect("valid spec");
        let ShapeSpec::Full { type_tag, optional, props } = &spec else {
            panic!("expected full form, got {spec:?}");
        };
        assert_eq!(type_tag, "Folder");
        assert!(!optional);
        assert_eq!(props["name"], ShapeSpec::Tag("String".to_string()));
        assert_eq!(props["nickname"].type_tag(), "String");
        assert_eq!(
            props.keys().collect::<Vec<_>>(),
            vec!["name", "nickname"]
        );
    }

    #[test]
    fn rejects_malformed_json() {
        assert!(ShapeSpec::from_json("{\"optional\": true}").is_err());
        assert!(ShapeSpec::from_json("42").is_err());
    }

    #[test]
    fn renders_frozen_config() {
        let spec = ShapeSpec::from_json(PERSON).expect("valid spec");
        let config = spec.to_config("person");
        assert!(config.is_frozen());
        assert_eq!(get_child_string(&config, "type").as_deref(), Some("Folder"));
        assert_eq!(get_child_string(&config, "optional"), None);

        let props = get_child_folder(&config, "props").expect("props folder");
        let nickname = get_child_folder(props.as_ref(), "nickname").expect("nickname");
        assert_eq!(get_child_string(nickname.as_ref(), "optional").as_deref(), Some("yes"));
    }

    #[test]
    fn compiles_through_config() {
        let spec = ShapeSpec::from_json(PERSON).expect("valid spec");
        let shape = CompiledShape::from_spec("person", &spec);
        assert_eq!(shape.shape_type(), &ShapeType::Folder);
        assert_eq!(shape.props().len(), 2);
        assert!(shape.props()[1].is_optional());
    }

    #[test]
    fn serializes_compactly() {
        let spec = ShapeSpec::from_json(PERSON).expect("valid spec");
        let json = serde_json::to_string(&spec).expect("serializable");
        assert_eq!(
            json,
            r#"{"type":"Folder","props":{"name":"String","nickname":{"type":"String","optional":true}}}"#
        );
    }
}
