//! Persistence round-trip tests against a temporary directory.

use std::collections::BTreeMap;

use proptest::prelude::*;
use rand::SeedableRng;
use rand::rngs::StdRng;
use strata_core::Graph;
use strata_data::{
    CATALOG, GraphDocument, fingerprint, generate_all, load_document, random_digraph,
    save_document,
};
use tempfile::TempDir;

/// Edge multiset as `(from, to, weight bits) -> count`.
fn edge_multiset(graph: &Graph) -> BTreeMap<(usize, usize, u64), usize> {
    let mut counts = BTreeMap::new();
    for edge in graph.edges() {
        *counts
            .entry((edge.from, edge.to, edge.weight.to_bits()))
            .or_insert(0) += 1;
    }
    counts
}

fn assert_same_graph(a: &Graph, b: &Graph) {
    assert_eq!(a.vertex_count(), b.vertex_count());
    for v in 0..a.vertex_count() {
        assert_eq!(a.name_of(v), b.name_of(v));
        assert_eq!(a.has_name(v), b.has_name(v), "has_name({v})");
    }
    for (graph, other) in [(a, b), (b, a)] {
        for (_, name) in graph.named_vertices() {
            assert_eq!(graph.id_of(name), other.id_of(name), "id_of({name})");
        }
        for v in 0..graph.vertex_count() {
            let id_name = v.to_string();
            assert_eq!(graph.id_of(&id_name), other.id_of(&id_name), "id_of({id_name})");
        }
    }
    assert_eq!(edge_multiset(a), edge_multiset(b));
    assert_eq!(fingerprint(a), fingerprint(b));
}

#[test]
fn every_catalog_dataset_round_trips() {
    let dir = TempDir::new().expect("tempdir");
    let summaries = generate_all(dir.path()).expect("generate");
    assert_eq!(summaries.len(), CATALOG.len());

    for (dataset, summary) in CATALOG.iter().zip(&summaries) {
        assert!(summary.path.exists(), "{} missing", summary.path.display());
        let loaded = load_document(&summary.path).expect("load");
        let original = dataset.build().expect("build");

        assert_eq!(loaded.name, dataset.name);
        assert_same_graph(&original.graph, &loaded.graph);
        assert_eq!(summary.fingerprint, fingerprint(&loaded.graph));
        assert_eq!(summary.edges, loaded.graph.edge_count());
    }
}

#[test]
fn partially_named_graph_round_trips() {
    let dir = TempDir::new().expect("tempdir");

    let mut partial = Graph::new(3);
    partial.set_name(0, "a").expect("name");
    partial.add_edge(0, 1).expect("edge");
    let path = dir.path().join("partial.json");
    save_document(&GraphDocument::new("partial", partial.clone()), &path).expect("save");
    let loaded = load_document(&path).expect("load");
    assert_same_graph(&partial, &loaded.graph);
    assert!(!loaded.graph.has_name(1));
    assert_eq!(loaded.graph.id_of("1"), None);

    let mut numeric = Graph::new(2);
    numeric.set_name(0, "1").expect("name");
    let path = dir.path().join("numeric.json");
    save_document(&GraphDocument::new("numeric", numeric.clone()), &path).expect("save");
    let loaded = load_document(&path).expect("load");
    assert_same_graph(&numeric, &loaded.graph);
    assert_eq!(loaded.graph.id_of("1"), Some(0));
    assert!(!loaded.graph.has_name(1));
}

#[test]
fn save_creates_nested_directories() {
    let dir = TempDir::new().expect("tempdir");
    let path = dir.path().join("a/b/c/graph.json");
    let mut graph = Graph::new(2);
    graph.add_edge(0, 1).expect("edge");

    save_document(&GraphDocument::new("nested", graph), &path).expect("save");
    assert!(path.exists());
}

#[test]
fn loading_missing_file_names_the_path() {
    let dir = TempDir::new().expect("tempdir");
    let path = dir.path().join("absent.json");
    let err = load_document(&path).expect_err("must fail");
    assert!(format!("{err:#}").contains("absent.json"));
}

#[test]
fn loading_bad_edge_names_the_file_and_edge() {
    let dir = TempDir::new().expect("tempdir");
    let path = dir.path().join("bad.json");
    std::fs::write(&path, r#"{ "vertices": 2, "edges": [{ "from": 2, "to": 0 }] }"#)
        .expect("write");
    let message = format!("{:#}", load_document(&path).expect_err("must fail"));
    assert!(message.contains("bad.json"), "{message}");
    assert!(message.contains("edges[0]"), "{message}");
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn random_graphs_round_trip(vertices in 1usize..40, edges in 0usize..120, seed in any::<u64>()) {
        let graph = random_digraph(vertices, edges, &mut StdRng::seed_from_u64(seed))
            .expect("random digraph");
        let dir = TempDir::new().expect("tempdir");
        let path = dir.path().join("random.json");

        save_document(&GraphDocument::new("random", graph.clone()), &path).expect("save");
        let loaded = load_document(&path).expect("load");
        prop_assert_eq!(edge_multiset(&graph), edge_multiset(&loaded.graph));
        prop_assert_eq!(fingerprint(&graph), fingerprint(&loaded.graph));
    }
}
