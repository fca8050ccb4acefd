//! Entity and wire types for the techtree schema.

pub mod graph_models;
pub mod skill_models;
pub mod validation;

pub use graph_models::{
    Node, NodeInput, NodeRow, NodeType, Relation, RelationFilter, RelationInput, RelationRow,
    RelationType,
};
pub use skill_models::{Category, CategoryInput, SkillInput, SkillRecord, SkillView};
