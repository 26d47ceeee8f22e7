//! End-to-end screening: matching, prioritizing and graph construction.
//!
//! [`Screening`] wires the components together in their required order:
//! identifier matching first, then fuzzy matching, then prioritization, and
//! finally the identity graph built from the raw entities, relationships and
//! prioritized match edges. [`Screening::analyze`] runs every graph metric
//! over the result.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::{info, info_span};

use crate::config::ResolutionConfig;
use crate::entity::Entity;
use crate::error::SanctionsResult;
use crate::graph::{
    BridgeScore, BuildReport, Exposure, GraphSummary, HubScore, IdentityGraph, SanctionPath,
};
use crate::jurisdiction::SecrecyList;
use crate::matching::{high_risk_matches, match_by_identifiers, FuzzyMatcher, MatchRecord};
use crate::relationship::RelationshipEdge;

/// In-memory records handed over by ingestion.
#[derive(Debug, Clone, Default)]
pub struct ScreeningInput {
    /// Sanctions-list records.
    pub sanctioned: Vec<Entity>,
    /// Corporate-registry records.
    pub registry: Vec<Entity>,
    /// Links between any of the above.
    pub relationships: Vec<RelationshipEdge>,
}

/// Everything produced by one screening run.
#[derive(Debug, Clone)]
pub struct ScreeningOutcome {
    /// Identifier matches followed by fuzzy matches, unfiltered.
    pub matches: Vec<MatchRecord>,
    /// The prioritized subset, highest confidence first.
    pub high_risk: Vec<MatchRecord>,
    /// The identity graph.
    pub graph: IdentityGraph,
    /// Combined diagnostics of every graph mutation.
    pub report: BuildReport,
}

/// Graph metrics for analyst review.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NetworkAnalysis {
    /// Overview statistics.
    pub summary: GraphSummary,
    /// Highest degree centrality first.
    pub hubs: Vec<HubScore>,
    /// Highest betweenness first.
    pub bridges: Vec<BridgeScore>,
    /// Community id per entity.
    pub communities: BTreeMap<String, usize>,
    /// Exposure per reachable unsanctioned entity.
    pub exposure: BTreeMap<String, Exposure>,
    /// Chains from sanctioned entities to clean companies.
    pub paths: Vec<SanctionPath>,
}

/// A validated screening pipeline.
#[derive(Debug, Clone)]
pub struct Screening {
    config: ResolutionConfig,
    secrecy: SecrecyList,
}

impl Screening {
    /// Validates `config` and prepares a pipeline.
    ///
    /// # Errors
    ///
    /// Returns a validation error for any out-of-range tunable.
    pub fn new(config: ResolutionConfig) -> SanctionsResult<Self> {
        config.validate()?;
        let secrecy = config.secrecy_list();
        Ok(Self { config, secrecy })
    }

    /// The active configuration.
    #[must_use]
    pub fn config(&self) -> &ResolutionConfig {
        &self.config
    }

    /// Matches, prioritizes and builds the identity graph.
    ///
    /// # Errors
    ///
    /// Fails only if a fuzzy-matching worker dies.
    pub fn run(&self, input: &ScreeningInput) -> SanctionsResult<ScreeningOutcome> {
        let span = info_span!(
            "screening",
            sanctioned = input.sanctioned.len(),
            registry = input.registry.len(),
            relationships = input.relationships.len()
        );
        let _guard = span.enter();

        let mut matches = match_by_identifiers(
            &input.sanctioned,
            &input.registry,
            &self.config.identifier_kinds,
        );
        let identifier_count = matches.len();

        let matcher = FuzzyMatcher::new(&input.registry, self.config.name_match_threshold)?;
        matches.extend(matcher.match_all_parallel(&input.sanctioned, self.config.fuzzy_workers)?);

        let high_risk = high_risk_matches(
            &matches,
            self.config.high_risk_confidence_threshold,
            &self.secrecy,
        )?;

        let mut graph = IdentityGraph::new();
        let mut report = graph.add_entities(&input.sanctioned);
        report.merge(graph.add_entities(&input.registry));
        report.merge(graph.add_relationships(&input.relationships));
        report.merge(graph.add_matches(&high_risk));

        info!(
            identifier_matches = identifier_count,
            fuzzy_matches = matches.len() - identifier_count,
            high_risk = high_risk.len(),
            nodes = graph.node_count(),
            edges = graph.edge_count(),
            dangling = report.dangling_references(),
            "screening complete"
        );

        Ok(ScreeningOutcome {
            matches,
            high_risk,
            graph,
            report,
        })
    }

    /// Runs every graph metric, keeping the `top_n` hubs and bridges.
    #[must_use]
    pub fn analyze(&self, graph: &IdentityGraph, top_n: usize) -> NetworkAnalysis {
        let _guard = info_span!("analysis", nodes = graph.node_count()).entered();
        NetworkAnalysis {
            summary: graph.summary(&self.secrecy),
            hubs: graph.hubs(top_n),
            bridges: graph.bridges(top_n),
            communities: graph.communities(self.config.community_seed),
            exposure: graph.sanctions_exposure(),
            paths: graph.sanction_paths(self.config.max_path_depth).collect(),
        }
    }
}
