//! # sanctions-network - entity resolution and network risk scoring
//!
//! Cross-references sanctioned-entity records against corporate-registry
//! records, merges both sides into one directed identity graph and computes
//! structural risk metrics over it.
//!
//! ## Core Concepts
//!
//! - **Entity**: a sanctioned party or a registry party, as handed over by ingestion
//! - **MatchRecord**: one auditable link produced by identifier or fuzzy name matching
//! - **IdentityGraph**: a directed multigraph of entities, relationships and match edges
//! - **Exposure**: how close an unsanctioned node sits to the sanctioned set
//!
//! Everything is deterministic: identical inputs and configuration give
//! identical matches, graphs and metrics.
//!
//! ## Usage
//!
//! ```rust
//! use sanctions_network::{
//!     Entity, EntityKind, RelationshipEdge, ResolutionConfig, Screening, ScreeningInput,
//! };
//!
//! let input = ScreeningInput {
//!     sanctioned: vec![Entity::new("s-1", EntityKind::Company)
//!         .with_name("Gazprom PJSC")
//!         .sanctioned()],
//!     registry: vec![Entity::new("gb-1", EntityKind::Company).with_display_name("GAZPROM")],
//!     relationships: vec![RelationshipEdge::new("gb-2", "gb-1", "owned_by")],
//! };
//!
//! let screening = Screening::new(ResolutionConfig::default())?;
//! let outcome = screening.run(&input)?;
//! assert_eq!(outcome.high_risk.len(), 1);
//!
//! let exposure = outcome.graph.sanctions_exposure();
//! assert_eq!(exposure["gb-1"].min_distance, 1);
//! # Ok::<(), sanctions_network::SanctionsError>(())
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

// Records and tunables
pub mod config;
pub mod entity;
pub mod error;
pub mod jurisdiction;
pub mod relationship;

// Resolution
pub mod matching;
pub mod normalize;

// Network
pub mod graph;
pub mod screening;

// Re-export primary types at crate root for convenience
pub use config::ResolutionConfig;
pub use entity::{Entity, EntityKind, IdentifierKind};
pub use error::{ExecutionError, SanctionsError, SanctionsResult, ValidationError};
pub use jurisdiction::SecrecyList;
pub use relationship::RelationshipEdge;

pub use matching::{
    fuzzy_match, high_risk_matches, match_by_identifier, FuzzyMatcher, MatchRecord, MatchType,
};
pub use normalize::{normalize, transliterate};

pub use graph::{
    BridgeScore, BuildReport, EdgeKind, Exposure, GraphSummary, HubScore, IdentityGraph,
    NodeAttributes, NodeOrigin, SanctionPath, SanctionPaths,
};
pub use screening::{NetworkAnalysis, Screening, ScreeningInput, ScreeningOutcome};
