//! Directed, typed links between entities.

use serde::{Deserialize, Serialize};

/// A directed relationship such as ownership, directorship or kinship.
///
/// Produced by the ingestion layer and immutable once created.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RelationshipEdge {
    /// Entity the edge starts from.
    pub source_id: String,
    /// Entity the edge points to.
    pub target_id: String,
    /// Relationship label, e.g. `owned_by`.
    pub relationship_type: String,
}

impl RelationshipEdge {
    /// Creates a relationship edge.
    #[must_use]
    pub fn new(
        source_id: impl Into<String>,
        target_id: impl Into<String>,
        relationship_type: impl Into<String>,
    ) -> Self {
        Self {
            source_id: source_id.into(),
            target_id: target_id.into(),
            relationship_type: relationship_type.into(),
        }
    }

    /// Builds an edge from a Follow-the-Money reference property.
    ///
    /// Returns `None` for properties that do not describe a relationship.
    #[must_use]
    pub fn from_property(
        source_id: impl Into<String>,
        property: &str,
        target_id: impl Into<String>,
    ) -> Option<Self> {
        relationship_type_for_property(property)
            .map(|rel| Self::new(source_id, target_id, rel))
    }
}

/// Relationship label for a Follow-the-Money reference property.
#[must_use]
pub fn relationship_type_for_property(property: &str) -> Option<&'static str> {
    match property {
        "ownershipOwner" => Some("owned_by"),
        "ownershipAsset" => Some("owns"),
        "directorshipDirector" => Some("directed_by"),
        "directorshipOrganization" => Some("directs"),
        "familyPerson" => Some("family_of"),
        "familyRelative" => Some("related_to"),
        "associateOf" => Some("associate_of"),
        "memberOf" => Some("member_of"),
        _ => None,
    }
}
