//! Node and Relation types for the technology graph.
//!
//! `node_type` and `relation_type` are closed enums: the backing
//! columns are plain text, but a value outside the defined variants is
//! rejected at the boundary, so adding a kind is a code change rather
//! than a silent free-text write.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Kind tag for a graph node. Single member today.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum NodeType {
    #[default]
    Technology,
}

impl fmt::Display for NodeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NodeType::Technology => write!(f, "technology"),
        }
    }
}

impl FromStr for NodeType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "technology" => Ok(NodeType::Technology),
            other => Err(format!("unknown node_type '{other}'")),
        }
    }
}

/// Kind of a directed edge between two nodes.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum RelationType {
    Prerequisite,
    UsedWith,
    Alternative,
    Related,
    BuiltOn,
}

impl RelationType {
    pub const ALL: [RelationType; 5] = [
        RelationType::Prerequisite,
        RelationType::UsedWith,
        RelationType::Alternative,
        RelationType::Related,
        RelationType::BuiltOn,
    ];
}

impl fmt::Display for RelationType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RelationType::Prerequisite => write!(f, "prerequisite"),
            RelationType::UsedWith => write!(f, "used_with"),
            RelationType::Alternative => write!(f, "alternative"),
            RelationType::Related => write!(f, "related"),
            RelationType::BuiltOn => write!(f, "built_on"),
        }
    }
}

impl FromStr for RelationType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "prerequisite" => Ok(RelationType::Prerequisite),
            "used_with" => Ok(RelationType::UsedWith),
            "alternative" => Ok(RelationType::Alternative),
            "related" => Ok(RelationType::Related),
            "built_on" => Ok(RelationType::BuiltOn),
            other => Err(format!("unknown relation_type '{other}'")),
        }
    }
}

/// Raw `nodes` row. Enum columns stay text at this level; parsing into
/// the closed enums happens in the conversion to [`Node`].
#[derive(Debug, Clone, FromRow)]
pub struct NodeRow {
    pub id: i64,
    pub name: String,
    pub node_type: String,
    pub category: String,
    pub description: String,
    pub tags: Vec<String>,
}

/// Wire representation of a node.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Node {
    pub id: i64,
    pub name: String,
    pub node_type: NodeType,
    pub category: String,
    pub description: String,
    pub tags: Vec<String>,
}

impl TryFrom<NodeRow> for Node {
    type Error = String;

    fn try_from(row: NodeRow) -> Result<Self, Self::Error> {
        Ok(Node {
            id: row.id,
            name: row.name,
            node_type: row.node_type.parse()?,
            category: row.category,
            description: row.description,
            tags: row.tags,
        })
    }
}

/// Create/replace payload for a node.
#[derive(Debug, Clone, Deserialize)]
pub struct NodeInput {
    pub name: String,
    #[serde(default)]
    pub node_type: NodeType,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub tags: Vec<String>,
}

/// Raw `relations` row.
#[derive(Debug, Clone, FromRow)]
pub struct RelationRow {
    pub id: i64,
    pub from_node_id: i64,
    pub to_node_id: i64,
    pub relation_type: String,
    pub strength: f64,
    pub context: Option<String>,
}

/// Wire representation of a directed typed edge.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Relation {
    pub id: i64,
    pub from_node_id: i64,
    pub to_node_id: i64,
    pub relation_type: RelationType,
    pub strength: f64,
    pub context: Option<String>,
}

impl TryFrom<RelationRow> for Relation {
    type Error = String;

    fn try_from(row: RelationRow) -> Result<Self, Self::Error> {
        Ok(Relation {
            id: row.id,
            from_node_id: row.from_node_id,
            to_node_id: row.to_node_id,
            relation_type: row.relation_type.parse()?,
            strength: row.strength,
            context: row.context,
        })
    }
}

fn default_strength() -> f64 {
    0.5
}

/// Create/replace payload for a relation.
#[derive(Debug, Clone, Deserialize)]
pub struct RelationInput {
    pub from_node_id: i64,
    pub to_node_id: i64,
    pub relation_type: RelationType,
    #[serde(default = "default_strength")]
    pub strength: f64,
    #[serde(default)]
    pub context: Option<String>,
}

/// Narrowing criteria for the relation list. Strength bounds are
/// inclusive; `None` means unconstrained.
#[derive(Debug, Clone, Default)]
pub struct RelationFilter {
    pub relation_type: Option<String>,
    pub context: Option<String>,
    pub min_strength: Option<f64>,
    pub max_strength: Option<f64>,
}
