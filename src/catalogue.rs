//! Node type catalogue.
//!
//! Node types are free-form strings looked up in a catalogue supplied at
//! configuration time, so hosts can introduce new types without touching
//! this crate. Lookups for an id that is not registered resolve to
//! [`NodeTypeConfig::fallback`].

use indexmap::IndexMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use slint::Color;

/// An entry of a context menu. Presentation is up to the host; the core only
/// carries these around so they can be attached to nodes of a given type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MenuItem {
    pub id: String,
    pub label: String,
}

/// Configuration for one node type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeTypeConfig {
    pub id: String,
    pub label: String,
    #[serde(with = "hex_color", default = "default_color")]
    pub color: Color,
    #[serde(default)]
    pub allow_multiple_inputs: bool,
    #[serde(default)]
    pub menu_items: Vec<MenuItem>,
}

fn default_color() -> Color {
    Color::from_rgb_u8(128, 128, 128)
}

impl NodeTypeConfig {
    pub fn new(id: impl Into<String>, label: impl Into<String>, color: Color) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            color,
            allow_multiple_inputs: false,
            menu_items: Vec::new(),
        }
    }

    /// Builder-style setter for the input capacity flag.
    pub fn with_multiple_inputs(mut self, allow: bool) -> Self {
        self.allow_multiple_inputs = allow;
        self
    }

    pub fn with_menu_items(mut self, items: Vec<MenuItem>) -> Self {
        self.menu_items = items;
        self
    }

    /// Configuration used for types missing from the catalogue: single input,
    /// neutral grey, no menu items, label equal to the type id.
    pub fn fallback(type_id: &str) -> Self {
        Self::new(type_id, type_id, default_color())
    }
}

/// Lookup table from node type id to its configuration.
#[derive(Debug, Clone, Default)]
pub struct NodeTypeCatalogue {
    types: IndexMap<String, NodeTypeConfig>,
}

impl NodeTypeCatalogue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register (or replace) a node type.
    pub fn register(&mut self, config: NodeTypeConfig) {
        self.types.insert(config.id.clone(), config);
    }

    pub fn get(&self, type_id: &str) -> Option<&NodeTypeConfig> {
        self.types.get(type_id)
    }

    pub fn contains(&self, type_id: &str) -> bool {
        self.types.contains_key(type_id)
    }

    /// Resolve a type id, falling back to [`NodeTypeConfig::fallback`] for unknown ids.
    pub fn resolve(&self, type_id: &str) -> NodeTypeConfig {
        self.get(type_id)
            .cloned()
            .unwrap_or_else(|| NodeTypeConfig::fallback(type_id))
    }

    /// Registered types in registration order.
    pub fn iter(&self) -> impl Iterator<Item = &NodeTypeConfig> {
        self.types.values()
    }

    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }
}

impl FromIterator<NodeTypeConfig> for NodeTypeCatalogue {
    fn from_iter<I: IntoIterator<Item = NodeTypeConfig>>(iter: I) -> Self {
        let mut catalogue = Self::new();
        for config in iter {
            catalogue.register(config);
        }
        catalogue
    }
}

/// `#rrggbb` / `#rrggbbaa` (de)serialization for [`slint::Color`].
pub(crate) mod hex_color {
    use super::*;

    pub fn serialize<S: Serializer>(color: &Color, serializer: S) -> Result<S::Ok, S::Error> {
        let s = if color.alpha() == 255 {
            format!("#{:02x}{:02x}{:02x}", color.red(), color.green(), color.blue())
        } else {
            format!(
                "#{:02x}{:02x}{:02x}{:02x}",
                color.red(),
                color.green(),
                color.blue(),
                color.alpha()
            )
        };
        serializer.serialize_str(&s)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Color, D::Error> {
        let s = String::deserialize(deserializer)?;
        parse(&s).ok_or_else(|| serde::de::Error::custom(format!("invalid color '{}'", s)))
    }

    pub fn parse(s: &str) -> Option<Color> {
        let hex = s.strip_prefix('#')?;
        if !hex.is_ascii() {
            return None;
        }
        let byte = |i: usize| u8::from_str_radix(hex.get(i..i + 2)?, 16).ok();
        match hex.len() {
            6 => Some(Color::from_rgb_u8(byte(0)?, byte(2)?, byte(4)?)),
            8 => Some(Color::from_argb_u8(byte(6)?, byte(0)?, byte(2)?, byte(4)?)),
            _ => None,
        }
    }
}
