use std::collections::BTreeMap;

use sanctions_network::{
    Entity, EntityKind, Exposure, IdentifierKind, IdentityGraph, MatchRecord, MatchType,
    NodeOrigin, RelationshipEdge, SecrecyList,
};

fn company(id: &str) -> Entity {
    Entity::new(id, EntityKind::Company)
}

fn owned_by(owned: &str, owner: &str) -> RelationshipEdge {
    RelationshipEdge::new(owned, owner, "owned_by")
}

/// A sanctioned oligarch behind a layered offshore structure.
///
/// ```text
/// holdco_vg -> oligarch        (owned_by)
/// opco_gb   -> holdco_vg       (owned_by)
/// trader_cy -> holdco_vg       (owned_by)
/// oligarch  -> yacht           (owns)
/// cousin    -> oligarch        (family_of)
/// bystander                    (isolated)
/// ```
fn layered_structure() -> IdentityGraph {
    let mut graph = IdentityGraph::new();
    graph.add_entities(&[
        Entity::new("oligarch", EntityKind::Person).sanctioned(),
        company("holdco_vg").with_jurisdiction("vg"),
        company("opco_gb").with_jurisdiction("gb"),
        company("trader_cy").with_jurisdiction("cy"),
        Entity::new("yacht", EntityKind::Vessel),
        Entity::new("cousin", EntityKind::Person),
        company("bystander"),
    ]);
    graph.add_relationships(&[
        owned_by("holdco_vg", "oligarch"),
        owned_by("opco_gb", "holdco_vg"),
        owned_by("trader_cy", "holdco_vg"),
        RelationshipEdge::new("oligarch", "yacht", "owns"),
        RelationshipEdge::new("cousin", "oligarch", "family_of"),
    ]);
    graph
}

#[test]
fn star_center_is_top_hub() {
    let mut graph = IdentityGraph::new();
    let leaves: Vec<String> = (0..10).map(|i| format!("leaf-{i}")).collect();
    graph.add_entities(&[company("center")]);
    graph.add_entities(&leaves.iter().map(|id| company(id)).collect::<Vec<_>>());
    graph.add_relationships(
        &leaves
            .iter()
            .map(|id| RelationshipEdge::new(id.as_str(), "center", "owned_by"))
            .collect::<Vec<_>>(),
    );

    let hubs = graph.hubs(3);
    assert_eq!(hubs[0].entity_id, "center");
    assert_eq!(hubs[0].in_degree, 10);
    assert!(hubs[1..]
        .iter()
        .all(|h| h.degree_centrality < hubs[0].degree_centrality));
}

#[test]
fn holding_company_and_owner_are_the_bridges() {
    let graph = layered_structure();
    let bridges = graph.bridges(3);
    // Both sit on four shortest paths; ties go to the smaller id.
    assert_eq!(bridges[0].entity_id, "holdco_vg");
    assert_eq!(bridges[1].entity_id, "oligarch");
    assert!((bridges[0].betweenness - bridges[1].betweenness).abs() < 1e-12);
    assert!((bridges[0].betweenness - 4.0 / 30.0).abs() < 1e-12);
    assert_eq!(bridges[2].betweenness, 0.0);
}

#[test]
fn exposure_matches_documented_example() {
    let mut graph = IdentityGraph::new();
    graph.add_entities(&[
        Entity::new("S", EntityKind::Person).sanctioned(),
        company("A"),
    ]);
    graph.add_relationships(&[owned_by("A", "S")]);

    let exposure = graph.sanctions_exposure();
    assert_eq!(
        exposure.get("A"),
        Some(&Exposure {
            min_distance: 1,
            direct_sanctioned_neighbor_count: 1,
            risk_score: 2.0,
        })
    );
}

#[test]
fn exposure_over_layered_structure() {
    let exposure = layered_structure().sanctions_exposure();

    assert_eq!(exposure["holdco_vg"].min_distance, 1);
    assert_eq!(exposure["yacht"].min_distance, 1);
    assert_eq!(exposure["cousin"].min_distance, 1);
    assert_eq!(exposure["opco_gb"].min_distance, 2);
    assert!((exposure["opco_gb"].risk_score - 0.5).abs() < 1e-12);
    assert!(!exposure.contains_key("oligarch"));
    assert!(!exposure.contains_key("bystander"));
}

#[test]
fn documented_path_example() {
    let mut graph = IdentityGraph::new();
    graph.add_entities(&[
        Entity::new("S", EntityKind::Person).sanctioned(),
        company("C1"),
        company("C2"),
    ]);
    graph.add_relationships(&[
        RelationshipEdge::new("S", "C1", "owns"),
        RelationshipEdge::new("C1", "C2", "owns"),
    ]);

    let deep: Vec<Vec<String>> = graph.sanction_paths(4).map(|p| p.nodes).collect();
    assert_eq!(deep, vec![vec!["S".to_string(), "C1".into(), "C2".into()]]);
    assert_eq!(graph.sanction_paths(1).count(), 0);
}

#[test]
fn paths_follow_edge_direction() {
    // Ownership edges point at the owner, so nothing leads away from the
    // oligarch to a company.
    assert_eq!(layered_structure().sanction_paths(4).count(), 0);
}

#[test]
fn adding_the_same_edge_twice_adds_two_edges() {
    let mut graph = layered_structure();
    let before = graph.edge_count();
    let edge = owned_by("opco_gb", "holdco_vg");
    graph.add_relationships(&[edge.clone(), edge]);
    assert_eq!(graph.edge_count(), before + 2);
    assert_eq!(graph.edges_between("opco_gb", "holdco_vg").len(), 3);
}

#[test]
fn dangling_reference_is_reported_not_fatal() {
    let mut graph = layered_structure();
    let report = graph.add_relationships(&[owned_by("opco_gb", "unknown_trust")]);
    assert_eq!(report.dangling_references(), 1);
    assert_eq!(
        graph.node("unknown_trust").map(|n| n.origin),
        Some(NodeOrigin::Placeholder)
    );
}

#[test]
fn communities_are_deterministic_and_cover_every_node() {
    let graph = layered_structure();
    let first = graph.communities(42);
    assert_eq!(first.len(), graph.node_count());
    assert_eq!(first, graph.communities(42));

    // The isolated node never shares a community.
    let bystander = first["bystander"];
    assert_eq!(first.values().filter(|c| **c == bystander).count(), 1);
    let singletons: BTreeMap<String, usize> = first
        .keys()
        .enumerate()
        .map(|(i, id)| (id.clone(), i))
        .collect();
    assert!(graph.modularity(&first) > graph.modularity(&singletons));
}

#[test]
fn summary_counts_secrecy_companies() {
    let summary = layered_structure().summary(&SecrecyList::new(["vg", "cy"]));
    assert_eq!(summary.node_count, 7);
    assert_eq!(summary.sanctioned_count, 1);
    assert_eq!(summary.nodes_by_kind[&EntityKind::Company], 4);
    assert_eq!(summary.edges_by_type["owned_by"], 3);
    let expected: BTreeMap<String, usize> =
        [("cy".to_string(), 1), ("vg".to_string(), 1)].into_iter().collect();
    assert_eq!(summary.secrecy_companies, expected);
}

#[test]
fn every_query_is_empty_on_an_empty_graph() {
    let graph = IdentityGraph::new();
    assert!(graph.hubs(10).is_empty());
    assert!(graph.bridges(10).is_empty());
    assert!(graph.communities(42).is_empty());
    assert!(graph.sanctions_exposure().is_empty());
    assert_eq!(graph.sanction_paths(4).count(), 0);
}

#[test]
fn sanctions_queries_are_empty_without_sanctioned_nodes() {
    let mut graph = IdentityGraph::new();
    graph.add_entities(&[company("a"), company("b"), company("c")]);
    graph.add_relationships(&[
        RelationshipEdge::new("a", "b", "owns"),
        RelationshipEdge::new("b", "c", "owns"),
    ]);
    assert!(graph.sanctions_exposure().is_empty());
    assert_eq!(graph.sanction_paths(4).count(), 0);
    assert_eq!(graph.hubs(1)[0].entity_id, "b");
}

#[test]
fn analytics_agree_whichever_side_is_loaded_first() {
    let sanctioned = Entity::new("ofac-1", EntityKind::Company).sanctioned();
    let registry = vec![
        company("vg-9")
            .with_jurisdiction("vg")
            .with_identifier(IdentifierKind::RegistrationNumber, "9"),
        company("gb-3").with_jurisdiction("gb"),
    ];
    let record = MatchRecord::new(&sanctioned, &registry[0], MatchType::FuzzyName, 92.0, "A -> A");
    let relationships = [owned_by("gb-3", "vg-9")];

    let mut matches_first = IdentityGraph::new();
    matches_first.add_entities(&[sanctioned.clone()]);
    matches_first.add_matches(&[record.clone()]);
    matches_first.add_entities(&registry);
    matches_first.add_relationships(&relationships);

    let mut entities_first = IdentityGraph::new();
    entities_first.add_entities(&[sanctioned]);
    entities_first.add_entities(&registry);
    entities_first.add_relationships(&relationships);
    entities_first.add_matches(&[record]);

    assert_eq!(matches_first.node_count(), 3);
    assert_eq!(entities_first.node_count(), 3);
    assert_eq!(matches_first.summary(&SecrecyList::default()).synthetic_count, 0);
    assert_eq!(
        matches_first.sanctions_exposure(),
        entities_first.sanctions_exposure()
    );
    assert_eq!(matches_first.sanctions_exposure()["gb-3"].min_distance, 2);
    assert_eq!(matches_first.hubs(3), entities_first.hubs(3));
}
