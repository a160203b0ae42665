//! YAML loader that builds `ConfigNode` trees.
//!
//! The loader drives `yaml-rust2`'s event parser directly so that tags stay
//! visible: a scalar tagged `!icon` becomes an [`IconGenerator`] template.
//!
//! Style trees only contain mappings and scalars. Sequences, aliases,
//! complex keys and unknown tags are rejected.

use tracing::debug;
use yaml_rust2::Yaml;
use yaml_rust2::parser::{Event, MarkedEventReceiver, Parser, Tag};
use yaml_rust2::scanner::{Marker, TScalarStyle};

use crate::types::{ConfigError, ConfigNode, IconGenerator};

/// Tag suffix for icon generator templates (`!icon`).
const ICON_TAG: &str = "icon";

/// Handle used by the YAML core schema for `!!str` and friends.
const CORE_SCHEMA_HANDLE: &str = "tag:yaml.org,2002:";

/// Parse a YAML document into a configuration tree.
///
/// An empty document yields an empty branch. Only the first document of a
/// multi-document stream is read.
///
/// # Example
///
/// ```rust
/// use forms_config::parse;
///
/// let tree = parse("checkbox:\n  checked:\n    iconColor: '#fff'").unwrap();
/// assert_eq!(
///     tree.get_path(&["checkbox", "checked", "iconColor"]).and_then(|n| n.as_str()),
///     Some("#fff")
/// );
/// ```
pub fn parse(content: &str) -> Result<ConfigNode, ConfigError> {
    parse_impl(content, None)
}

/// Parse a YAML document, naming the file in parse errors.
pub fn parse_file(content: &str, filename: &str) -> Result<ConfigNode, ConfigError> {
    parse_impl(content, Some(filename))
}

fn parse_impl(content: &str, filename: Option<&str>) -> Result<ConfigNode, ConfigError> {
    let mut parser = Parser::new_from_str(content);
    let mut builder = TreeBuilder::default();

    parser
        .load(&mut builder, false)
        .map_err(|err| ConfigError::Parse {
            message: match filename {
                Some(name) => format!("{}: {}", name, err),
                None => err.to_string(),
            },
        })?;

    let tree = builder.result()?;
    debug!(
        source = filename.unwrap_or("<string>"),
        keys = tree.as_branch().map_or(0, |map| map.len()),
        "parsed style tree"
    );
    Ok(tree)
}

/// A node being constructed during parsing.
enum Frame {
    Mapping {
        nodes: Vec<(String, ConfigNode)>,
        pending_key: Option<String>,
    },
    /// Sequences are rejected, but still consumed so the stack stays balanced.
    Sequence,
}

#[derive(Default)]
struct TreeBuilder {
    stack: Vec<Frame>,
    root: Option<ConfigNode>,
    error: Option<ConfigError>,
}

impl TreeBuilder {
    fn result(self) -> Result<ConfigNode, ConfigError> {
        if let Some(err) = self.error {
            return Err(err);
        }
        Ok(self.root.unwrap_or_else(ConfigNode::empty))
    }

    fn fail(&mut self, err: ConfigError) {
        if self.error.is_none() {
            self.error = Some(err);
        }
    }

    fn awaiting_key(&self) -> bool {
        matches!(
            self.stack.last(),
            Some(Frame::Mapping {
                pending_key: None,
                ..
            })
        )
    }

    fn push_complete(&mut self, node: ConfigNode) {
        match self.stack.last_mut() {
            None => self.root = Some(node),
            Some(Frame::Sequence) => {}
            Some(Frame::Mapping {
                nodes, pending_key, ..
            }) => {
                if let Some(key) = pending_key.take() {
                    nodes.push((key, node));
                }
            }
        }
    }

    fn on_scalar(&mut self, value: String, style: TScalarStyle, tag: Option<Tag>, marker: Marker) {
        if self.awaiting_key() {
            let inferred_non_string = tag.is_none()
                && matches!(style, TScalarStyle::Plain)
                && !matches!(parse_plain_scalar(&value), ConfigNode::Scalar(Yaml::String(_)));
            if inferred_non_string {
                self.fail(ConfigError::Unsupported {
                    construct: "non-string mapping key",
                    line: marker.line(),
                    col: marker.col() + 1,
                });
            }
            if let Some(Frame::Mapping { pending_key, .. }) = self.stack.last_mut() {
                *pending_key = Some(value);
            }
            return;
        }

        let node = match tag {
            Some(tag) if tag.handle == "!" && tag.suffix == ICON_TAG => {
                ConfigNode::Generator(IconGenerator::template(value))
            }
            Some(tag) if is_core_handle(&tag.handle) && tag.suffix == "str" => {
                ConfigNode::string(value)
            }
            Some(tag) => {
                self.fail(ConfigError::UnknownTag {
                    tag: format!("{}{}", tag.handle, tag.suffix),
                    line: marker.line(),
                    col: marker.col() + 1,
                });
                ConfigNode::Erased
            }
            None if matches!(style, TScalarStyle::Plain) => parse_plain_scalar(&value),
            None => ConfigNode::string(value),
        };
        self.push_complete(node);
    }
}

impl MarkedEventReceiver for TreeBuilder {
    fn on_event(&mut self, ev: Event, marker: Marker) {
        match ev {
            Event::Scalar(value, style, _anchor_id, tag) => {
                self.on_scalar(value, style, tag, marker);
            }

            Event::MappingStart(_anchor_id, tag) => {
                if self.awaiting_key() {
                    self.fail(ConfigError::Unsupported {
                        construct: "complex mapping key",
                        line: marker.line(),
                        col: marker.col() + 1,
                    });
                }
                if let Some(tag) = tag {
                    self.fail(ConfigError::UnknownTag {
                        tag: format!("{}{}", tag.handle, tag.suffix),
                        line: marker.line(),
                        col: marker.col() + 1,
                    });
                }
                self.stack.push(Frame::Mapping {
                    nodes: Vec::new(),
                    pending_key: None,
                });
            }

            Event::MappingEnd => {
                if let Some(Frame::Mapping { nodes, .. }) = self.stack.pop() {
                    // Duplicate keys: the later value wins, keeping the first position
                    let mut map = indexmap::IndexMap::with_capacity(nodes.len());
                    for (key, node) in nodes {
                        map.insert(key, node);
                    }
                    self.push_complete(ConfigNode::Branch(map));
                }
            }

            Event::SequenceStart(_anchor_id, _tag) => {
                self.fail(ConfigError::Unsupported {
                    construct: "sequence",
                    line: marker.line(),
                    col: marker.col() + 1,
                });
                self.stack.push(Frame::Sequence);
            }

            Event::SequenceEnd => {
                self.stack.pop();
                self.push_complete(ConfigNode::Erased);
            }

            Event::Alias(_anchor_id) => {
                self.fail(ConfigError::Unsupported {
                    construct: "alias",
                    line: marker.line(),
                    col: marker.col() + 1,
                });
                self.push_complete(ConfigNode::Erased);
            }

            _ => {}
        }
    }
}

fn is_core_handle(handle: &str) -> bool {
    handle == CORE_SCHEMA_HANDLE || handle == "!!"
}

/// Infer the type of an unquoted scalar.
///
/// Null spellings become [`ConfigNode::Erased`]: in a style tree a null
/// value means "present but undefined".
fn parse_plain_scalar(value: &str) -> ConfigNode {
    if let Ok(i) = value.parse::<i64>() {
        return ConfigNode::Scalar(Yaml::Integer(i));
    }

    if value.parse::<f64>().is_ok() {
        return ConfigNode::Scalar(Yaml::Real(value.to_string()));
    }

    match value {
        "true" | "True" | "TRUE" => ConfigNode::Scalar(Yaml::Boolean(true)),
        "false" | "False" | "FALSE" => ConfigNode::Scalar(Yaml::Boolean(false)),
        "null" | "Null" | "NULL" | "~" | "" => ConfigNode::Erased,
        _ => ConfigNode::string(value),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_nested_mapping() {
        let tree = parse(
            r##"
default:
  checkbox:
    backgroundColor: white
    checked:
      iconColor: "#fff"
"##,
        )
        .unwrap();

        assert_eq!(
            tree.get_path(&["default", "checkbox", "backgroundColor"])
                .and_then(|n| n.as_str()),
            Some("white")
        );
        assert_eq!(
            tree.get_path(&["default", "checkbox", "checked", "iconColor"])
                .and_then(|n| n.as_str()),
            Some("#fff")
        );
    }

    #[test]
    fn test_key_order_preserved() {
        let tree = parse("z: 1\na: 2\nm: 3").unwrap();
        let keys: Vec<&str> = tree
            .as_branch()
            .unwrap()
            .keys()
            .map(String::as_str)
            .collect();
        assert_eq!(keys, vec!["z", "a", "m"]);
    }

    #[test]
    fn test_group_keys_are_plain_keys() {
        let tree = parse("\"input, textarea\":\n  borderColor: red").unwrap();
        assert!(tree.get("input, textarea").is_some());
    }

    #[test]
    fn test_null_is_erasure() {
        let tree = parse("a: ~\nb: null\nc:\nd: 'null'").unwrap();
        assert!(tree.get("a").unwrap().is_erased());
        assert!(tree.get("b").unwrap().is_erased());
        assert!(tree.get("c").unwrap().is_erased());
        assert_eq!(tree.get("d").and_then(|n| n.as_str()), Some("null"));
    }

    #[test]
    fn test_scalar_types() {
        let tree = parse("flexShrink: 0\nlineHeight: 1.5\nenabled: true\nquoted: '0'").unwrap();
        assert_eq!(tree.get("flexShrink"), Some(&ConfigNode::Scalar(Yaml::Integer(0))));
        assert_eq!(
            tree.get("lineHeight"),
            Some(&ConfigNode::Scalar(Yaml::Real("1.5".into())))
        );
        assert_eq!(tree.get("enabled"), Some(&ConfigNode::Scalar(Yaml::Boolean(true))));
        assert_eq!(tree.get("quoted").and_then(|n| n.as_str()), Some("0"));
    }

    #[test]
    fn test_icon_tag_creates_generator() {
        let tree = parse("icon: !icon '<svg fill=\"{color}\"/>'").unwrap();
        let generator = tree.get("icon").and_then(|n| n.as_generator()).unwrap();
        assert_eq!(generator.generate("#fff").unwrap(), "<svg fill=\"#fff\"/>");
    }

    #[test]
    fn test_untagged_icon_is_literal() {
        let tree = parse("icon: '<svg/>'").unwrap();
        assert_eq!(tree.get("icon").and_then(|n| n.as_str()), Some("<svg/>"));
    }

    #[test]
    fn test_unknown_tag_rejected() {
        let err = parse("icon: !shape '<svg/>'").unwrap_err();
        assert!(matches!(err, ConfigError::UnknownTag { ref tag, .. } if tag == "!shape"));
    }

    #[test]
    fn test_sequence_rejected() {
        let err = parse("padding:\n  - 1px\n  - 2px").unwrap_err();
        assert!(matches!(
            err,
            ConfigError::Unsupported {
                construct: "sequence",
                ..
            }
        ));
    }

    #[test]
    fn test_non_string_keys_rejected() {
        for source in ["1: red", "1.5: red", "true: x", "~: y", "null: z"] {
            let err = parse(source).unwrap_err();
            assert!(
                matches!(
                    err,
                    ConfigError::Unsupported {
                        construct: "non-string mapping key",
                        ..
                    }
                ),
                "{} was accepted",
                source
            );
        }
    }

    #[test]
    fn test_quoted_keys_stay_strings() {
        let tree = parse("'1': red\n\"true\": x").unwrap();
        assert_eq!(tree.get("1").and_then(|n| n.as_str()), Some("red"));
        assert_eq!(tree.get("true").and_then(|n| n.as_str()), Some("x"));
    }

    #[test]
    fn test_empty_document() {
        assert_eq!(parse("").unwrap(), ConfigNode::empty());
    }

    #[test]
    fn test_invalid_yaml() {
        let err = parse_file("a: [unclosed", "theme.yml").unwrap_err();
        match err {
            ConfigError::Parse { message } => assert!(message.starts_with("theme.yml: ")),
            other => panic!("expected parse error, got {:?}", other),
        }
    }

    #[test]
    fn test_json_projection_of_parsed_theme() {
        let tree = parse(
            "checkbox:\n  checked:\n    backgroundColor: indigo\n    icon: !icon '<svg fill=\"{color}\"/>'\n  height: 1em\n  flexShrink: 0\n  borderColor: ~\n",
        )
        .unwrap();

        let json = serde_json::to_string_pretty(&tree.to_json()).unwrap();
        insta::assert_snapshot!(json, @r#"
        {
          "checkbox": {
            "checked": {
              "backgroundColor": "indigo",
              "icon": "<icon generator>"
            },
            "height": "1em",
            "flexShrink": 0,
            "borderColor": null
          }
        }
        "#);
    }
}
