//! Integration tests for graph construction and synthesis.

use std::collections::BTreeMap;
use std::sync::Arc;

use async_trait::async_trait;
use serde_json::json;

use nimbus_core::{
    CompositionGraph, CoreError, ProvisionedOutputs, Provisioner, Synthesizer, UnitSpec, UnitState,
    Value,
};

/// Deterministic in-memory provisioner that derives outputs from the unit id
/// and echoes selected inputs, so tests can assert on resolved values.
struct EchoProvisioner;

#[async_trait]
impl Provisioner for EchoProvisioner {
    async fn provision(
        &self,
        unit_id: &str,
        inputs: BTreeMap<String, serde_json::Value>,
    ) -> anyhow::Result<ProvisionedOutputs> {
        let mut outputs = ProvisionedOutputs::new();
        match unit_id {
            "auth" => {
                outputs.insert("user_pool_id".to_string(), json!("us-east-1_SamplesPool"));
            }
            "database" => {
                outputs.insert("table_name".to_string(), json!("samples-products"));
            }
            "api" => {
                // Embed an upstream value so resolution is observable end to end.
                let pool = inputs
                    .get("user_pool_id")
                    .and_then(|v| v.as_str())
                    .unwrap_or("unknown");
                outputs.insert(
                    "api_url".to_string(),
                    json!(format!("https://{pool}.example.com/graphql")),
                );
            }
            other => anyhow::bail!("unexpected unit: {other}"),
        }
        Ok(outputs)
    }
}

fn sample_graph() -> CompositionGraph {
    let mut graph = CompositionGraph::new();
    let auth = graph
        .declare(UnitSpec::new("auth").output("user_pool_id"))
        .unwrap();
    let database = graph
        .declare(UnitSpec::new("database").output("table_name"))
        .unwrap();
    graph
        .declare(
            UnitSpec::new("api")
                .input("user_pool_id", auth.output("user_pool_id").unwrap())
                .input("table_name", database.output("table_name").unwrap())
                .output("api_url"),
        )
        .unwrap();
    graph
}

#[tokio::test]
async fn test_sample_application_materializes_dependencies_first() {
    let graph = sample_graph();
    let synth = Synthesizer::new(Arc::new(EchoProvisioner));
    let report = synth.synthesize(&graph).await.unwrap();

    assert!(report.is_success());

    let order = report.materialized_order();
    assert_eq!(order.len(), 3);
    let api_pos = order.iter().position(|id| *id == "api").unwrap();
    assert!(order.iter().position(|id| *id == "auth").unwrap() < api_pos);
    assert!(order.iter().position(|id| *id == "database").unwrap() < api_pos);

    // Resolved inputs hold the literal upstream values, not references.
    let api = report.artifact("api").unwrap();
    assert_eq!(
        api.resolved_inputs["user_pool_id"],
        json!("us-east-1_SamplesPool")
    );
    assert_eq!(api.resolved_inputs["table_name"], json!("samples-products"));
    assert_eq!(
        api.outputs["api_url"],
        json!("https://us-east-1_SamplesPool.example.com/graphql")
    );
}

#[tokio::test]
async fn test_synthesis_visits_every_unit_exactly_once() {
    let graph = sample_graph();
    let synth = Synthesizer::new(Arc::new(EchoProvisioner));
    let report = synth.synthesize(&graph).await.unwrap();

    let mut visited: Vec<&str> = report.materialized_order();
    visited.sort();
    assert_eq!(visited, vec!["api", "auth", "database"]);
}

#[tokio::test]
async fn test_identical_graphs_produce_identical_artifact_ordering() {
    let synth = Synthesizer::new(Arc::new(EchoProvisioner));

    let first = synth.synthesize(&sample_graph()).await.unwrap();
    let second = synth.synthesize(&sample_graph()).await.unwrap();

    assert_eq!(first.materialized_order(), second.materialized_order());
    assert_eq!(
        first.artifact("api").unwrap().resolved_inputs,
        second.artifact("api").unwrap().resolved_inputs
    );
}

#[tokio::test]
async fn test_duplicate_declaration_does_not_partially_register() {
    let mut graph = sample_graph();
    let before = graph.len();

    let err = graph
        .declare(
            UnitSpec::new("auth")
                .input("extra", Value::literal(true))
                .output("other_output"),
        )
        .unwrap_err();

    assert!(matches!(err, CoreError::DuplicateUnit(id) if id == "auth"));
    assert_eq!(graph.len(), before);
    assert!(!graph.get("auth").unwrap().declares_output("other_output"));
}

#[tokio::test]
async fn test_cyclic_graph_never_reaches_the_provisioner() {
    struct PanicProvisioner;

    #[async_trait]
    impl Provisioner for PanicProvisioner {
        async fn provision(
            &self,
            unit_id: &str,
            _inputs: BTreeMap<String, serde_json::Value>,
        ) -> anyhow::Result<ProvisionedOutputs> {
            panic!("provisioner invoked for {unit_id} despite cycle");
        }
    }

    let mut graph = CompositionGraph::new();
    graph
        .declare(
            UnitSpec::new("a")
                .input("from_b", Value::reference("b", "out"))
                .output("out"),
        )
        .unwrap();
    graph
        .declare(
            UnitSpec::new("b")
                .input("from_a", Value::reference("a", "out"))
                .output("out"),
        )
        .unwrap();

    let synth = Synthesizer::new(Arc::new(PanicProvisioner));
    let err = synth.synthesize(&graph).await.unwrap_err();

    match err {
        CoreError::CyclicDependency(mut cycle) => {
            cycle.sort();
            assert_eq!(cycle, vec!["a", "b"]);
        }
        other => panic!("expected CyclicDependency, got {other:?}"),
    }
}

#[tokio::test]
async fn test_failure_report_collects_every_failing_branch() {
    struct FailSomeProvisioner;

    #[async_trait]
    impl Provisioner for FailSomeProvisioner {
        async fn provision(
            &self,
            unit_id: &str,
            _inputs: BTreeMap<String, serde_json::Value>,
        ) -> anyhow::Result<ProvisionedOutputs> {
            match unit_id {
                "left" | "right" => anyhow::bail!("unavailable in region"),
                _ => Ok(BTreeMap::from([("out".to_string(), json!(unit_id))])),
            }
        }
    }

    // Two independently failing branches and one healthy sibling.
    let mut graph = CompositionGraph::new();
    let left = graph.declare(UnitSpec::new("left").output("out")).unwrap();
    let right = graph.declare(UnitSpec::new("right").output("out")).unwrap();
    graph.declare(UnitSpec::new("healthy").output("out")).unwrap();
    graph
        .declare(
            UnitSpec::new("left_child")
                .input("x", left.output("out").unwrap())
                .output("out"),
        )
        .unwrap();
    graph
        .declare(
            UnitSpec::new("right_child")
                .input("x", right.output("out").unwrap())
                .output("out"),
        )
        .unwrap();

    let synth = Synthesizer::new(Arc::new(FailSomeProvisioner));
    let report = synth.synthesize(&graph).await.unwrap();

    assert!(!report.is_success());
    // Both failures are surfaced in one pass.
    let mut failed: Vec<&str> = report.failures.iter().map(|f| f.unit_id.as_str()).collect();
    failed.sort();
    assert_eq!(failed, vec!["left", "right"]);

    assert_eq!(report.state("left_child"), Some(&UnitState::Skipped));
    assert_eq!(report.state("right_child"), Some(&UnitState::Skipped));
    assert_eq!(report.state("healthy"), Some(&UnitState::Materialized));
}
