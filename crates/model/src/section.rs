//! Render-time section and block values.
//!
//! A [`LiquidSection`] is the native input a theme template reads. It is
//! built fresh for every render by a section mapper and discarded
//! afterwards; nothing in this module is persisted.
//!
//! Themes disagree on how a section carries its blocks: some store an
//! ordered list, others a keyed map plus a separate order list. The
//! [`BlockCollection`] tagged union gives both shapes a single accessor
//! API so the dialect layer never branches on representation.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value, json};
use std::collections::BTreeMap;

/// A render-time section value: id, native type, settings, blocks.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct LiquidSection {
    pub id: String,
    pub section_type: String,
    pub settings: Map<String, Value>,
    pub blocks: BlockCollection,
}

impl LiquidSection {
    /// Creates an empty section of the given native type.
    pub fn empty(section_type: &str) -> Self {
        Self {
            id: section_type.to_string(),
            section_type: section_type.to_string(),
            settings: Map::new(),
            blocks: BlockCollection::default(),
        }
    }

    /// Projects the section into the JSON shape templates read.
    ///
    /// List-shaped collections appear as a `blocks` array; keyed
    /// collections appear as a `blocks` object plus a `block_order` array
    /// and a derived `block_count`. Either way `blocks | size` reports the
    /// item count.
    pub fn to_value(&self) -> Value {
        let mut out = Map::new();
        out.insert("id".into(), Value::String(self.id.clone()));
        out.insert("type".into(), Value::String(self.section_type.clone()));
        out.insert("settings".into(), Value::Object(self.settings.clone()));
        self.blocks.project_into(&mut out);
        Value::Object(out)
    }
}

/// A repeatable sub-unit of a section.
///
/// One level of nesting is supported: a block may itself carry a
/// collection of child blocks.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SectionBlock {
    pub id: String,
    #[serde(rename = "type")]
    pub block_type: String,
    #[serde(default)]
    pub settings: Map<String, Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub blocks: Option<BlockCollection>,
}

impl SectionBlock {
    pub fn new(id: &str, block_type: &str, settings: Map<String, Value>) -> Self {
        Self {
            id: id.to_string(),
            block_type: block_type.to_string(),
            settings,
            blocks: None,
        }
    }

    /// Projects the block into the JSON shape templates read, flattening
    /// the nested collection the same way sections do.
    pub fn to_value(&self) -> Value {
        let mut out = Map::new();
        out.insert("id".into(), Value::String(self.id.clone()));
        out.insert("type".into(), Value::String(self.block_type.clone()));
        out.insert("settings".into(), Value::Object(self.settings.clone()));
        if let Some(children) = &self.blocks {
            children.project_into(&mut out);
        }
        Value::Object(out)
    }
}

/// The two block-collection shapes used by the bundled themes.
///
/// Invariant: a dangling id in `block_order` resolves to nothing; it must
/// never panic and never abort iteration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum BlockCollection {
    /// An ordered list of blocks (the default theme's shape).
    List(Vec<SectionBlock>),
    /// An id-keyed map with an explicit order list.
    Keyed {
        blocks: BTreeMap<String, SectionBlock>,
        block_order: Vec<String>,
    },
}

impl Default for BlockCollection {
    fn default() -> Self {
        BlockCollection::List(Vec::new())
    }
}

impl BlockCollection {
    /// Number of blocks held, regardless of shape.
    pub fn len(&self) -> usize {
        match self {
            BlockCollection::List(items) => items.len(),
            BlockCollection::Keyed { blocks, .. } => blocks.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Looks a block up by id.
    pub fn get(&self, id: &str) -> Option<&SectionBlock> {
        match self {
            BlockCollection::List(items) => items.iter().find(|b| b.id == id),
            BlockCollection::Keyed { blocks, .. } => blocks.get(id),
        }
    }

    /// Iterates blocks in declared order. For the keyed shape the order
    /// list drives iteration and dangling ids are skipped.
    pub fn iter_ordered(&self) -> Box<dyn Iterator<Item = &SectionBlock> + '_> {
        match self {
            BlockCollection::List(items) => Box::new(items.iter()),
            BlockCollection::Keyed {
                blocks,
                block_order,
            } => Box::new(block_order.iter().filter_map(|id| blocks.get(id))),
        }
    }

    /// Writes this collection's template-facing projection into a parent
    /// object.
    pub(crate) fn project_into(&self, out: &mut Map<String, Value>) {
        match self {
            BlockCollection::List(items) => {
                let projected: Vec<Value> = items.iter().map(SectionBlock::to_value).collect();
                out.insert("blocks".into(), Value::Array(projected));
            }
            BlockCollection::Keyed {
                blocks,
                block_order,
            } => {
                let mut projected = Map::new();
                for (id, block) in blocks {
                    projected.insert(id.clone(), block.to_value());
                }
                out.insert("blocks".into(), Value::Object(projected));
                out.insert("block_order".into(), json!(block_order));
                out.insert("block_count".into(), json!(blocks.len()));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn block(id: &str) -> SectionBlock {
        let mut settings = Map::new();
        settings.insert("label".into(), Value::String(id.to_uppercase()));
        SectionBlock::new(id, "text", settings)
    }

    #[test]
    fn test_list_collection_accessors() {
        let coll = BlockCollection::List(vec![block("a"), block("b")]);
        assert_eq!(coll.len(), 2);
        assert_eq!(coll.get("b").unwrap().id, "b");
        assert!(coll.get("missing").is_none());
        let ids: Vec<&str> = coll.iter_ordered().map(|b| b.id.as_str()).collect();
        assert_eq!(ids, vec!["a", "b"]);
    }

    #[test]
    fn test_keyed_collection_iterates_in_declared_order() {
        let mut blocks = BTreeMap::new();
        blocks.insert("a".to_string(), block("a"));
        blocks.insert("b".to_string(), block("b"));
        let coll = BlockCollection::Keyed {
            blocks,
            block_order: vec!["b".to_string(), "a".to_string()],
        };
        let ids: Vec<&str> = coll.iter_ordered().map(|b| b.id.as_str()).collect();
        assert_eq!(ids, vec!["b", "a"]);
    }

    #[test]
    fn test_keyed_collection_skips_dangling_order_entries() {
        let mut blocks = BTreeMap::new();
        blocks.insert("a".to_string(), block("a"));
        let coll = BlockCollection::Keyed {
            blocks,
            block_order: vec!["ghost".to_string(), "a".to_string()],
        };
        let ids: Vec<&str> = coll.iter_ordered().map(|b| b.id.as_str()).collect();
        assert_eq!(ids, vec!["a"]);
        assert_eq!(coll.len(), 1);
    }

    #[test]
    fn test_section_projection_list_shape() {
        let section = LiquidSection {
            id: "s1".into(),
            section_type: "multicolumn".into(),
            settings: Map::new(),
            blocks: BlockCollection::List(vec![block("a")]),
        };
        let value = section.to_value();
        assert_eq!(value["type"], "multicolumn");
        assert!(value["blocks"].is_array());
        assert_eq!(value["blocks"].as_array().unwrap().len(), 1);
    }

    #[test]
    fn test_section_projection_keyed_shape() {
        let mut blocks = BTreeMap::new();
        blocks.insert("a".to_string(), block("a"));
        blocks.insert("b".to_string(), block("b"));
        let section = LiquidSection {
            id: "s1".into(),
            section_type: "feature-grid".into(),
            settings: Map::new(),
            blocks: BlockCollection::Keyed {
                blocks,
                block_order: vec!["a".into(), "b".into()],
            },
        };
        let value = section.to_value();
        assert!(value["blocks"].is_object());
        assert_eq!(value["block_count"], 2);
        assert_eq!(value["block_order"][0], "a");
    }

    #[test]
    fn test_nested_block_projection() {
        let mut parent = block("group");
        parent.blocks = Some(BlockCollection::List(vec![block("child")]));
        let value = parent.to_value();
        assert_eq!(value["blocks"][0]["id"], "child");
    }
}
