//! Base records for graph documents.
//!
//! Embed these with `#[serde(flatten)]` to decode entity and relationship
//! rows through [`Many`](crate::types::Many) or [`Record`](crate::types::Record).

use serde::{Deserialize, Serialize};

/// Any stored document: a node row.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BaseEntity {
    pub id: String,
}

crate::entity!(BaseEntity {
    #[json = "id"] id,
});

/// An edge row created by `RELATE`, pointing from `in` to `out`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BaseRelationship {
    #[serde(flatten)]
    pub entity: BaseEntity,
    #[serde(rename = "in")]
    pub inbound: String,
    #[serde(rename = "out")]
    pub outbound: String,
}

impl BaseRelationship {
    pub fn id(&self) -> &str {
        &self.entity.id
    }
}
