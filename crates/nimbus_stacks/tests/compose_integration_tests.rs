//! Integration tests for composing and synthesizing the application stacks.

use std::sync::Arc;

use nimbus_core::{Synthesizer, UnitState};
use nimbus_stacks::stacks::{api, auth, database, hosting, storage};
use nimbus_stacks::{
    compose, EnvironmentConfig, RepositoryConfig, SimulatedProvisioner, StackFeatures,
};

fn full_config() -> EnvironmentConfig {
    EnvironmentConfig::new("dev", "samples")
        .with_allowed_origin("http://localhost:3000")
        .with_repository(RepositoryConfig::new("acme", "samples-web"))
        .with_env_var("LOG_LEVEL", "debug")
        .with_features(StackFeatures::all())
}

#[tokio::test]
async fn test_full_application_synthesizes() {
    let graph = compose(&full_config()).unwrap();
    let synth = Synthesizer::new(Arc::new(SimulatedProvisioner::new("dev")));

    let report = synth.synthesize(&graph).await.unwrap();

    assert!(report.is_success());
    assert_eq!(report.artifacts.len(), 5);
    for unit in [
        auth::UNIT_ID,
        database::UNIT_ID,
        api::UNIT_ID,
        storage::UNIT_ID,
        hosting::UNIT_ID,
    ] {
        assert_eq!(report.state(unit), Some(&UnitState::Materialized), "{unit}");
    }
}

#[tokio::test]
async fn test_api_receives_concrete_upstream_values() {
    let graph = compose(&full_config()).unwrap();
    let synth = Synthesizer::new(Arc::new(SimulatedProvisioner::new("dev")));

    let report = synth.synthesize(&graph).await.unwrap();

    let auth_outputs = &report.artifact(auth::UNIT_ID).unwrap().outputs;
    let database_outputs = &report.artifact(database::UNIT_ID).unwrap().outputs;
    let api_artifact = report.artifact(api::UNIT_ID).unwrap();

    assert_eq!(
        api_artifact.resolved_inputs["user_pool_id"],
        auth_outputs[auth::USER_POOL_ID]
    );
    assert_eq!(
        api_artifact.resolved_inputs["table_name"],
        database_outputs[database::TABLE_NAME]
    );
}

#[tokio::test]
async fn test_hosting_environment_map_is_fully_resolved() {
    let graph = compose(&full_config()).unwrap();
    let synth = Synthesizer::new(Arc::new(SimulatedProvisioner::new("dev")));

    let report = synth.synthesize(&graph).await.unwrap();

    let api_outputs = &report.artifact(api::UNIT_ID).unwrap().outputs;
    let auth_outputs = &report.artifact(auth::UNIT_ID).unwrap().outputs;
    let environment = &report.artifact(hosting::UNIT_ID).unwrap().resolved_inputs["environment"];

    assert_eq!(environment["GRAPHQL_URL"], api_outputs[api::GRAPHQL_URL]);
    assert_eq!(environment["USER_POOL_ID"], auth_outputs[auth::USER_POOL_ID]);
    assert_eq!(
        environment["IDENTITY_POOL_ID"],
        auth_outputs[auth::IDENTITY_POOL_ID]
    );
    // Literal entries from the config survive alongside resolved references.
    assert_eq!(environment["LOG_LEVEL"], serde_json::json!("debug"));
}

#[tokio::test]
async fn test_failed_auth_cascades_to_dependents_only() {
    let graph = compose(&full_config()).unwrap();
    let provisioner = SimulatedProvisioner::new("dev").fail_unit(auth::UNIT_ID);
    let synth = Synthesizer::new(Arc::new(provisioner));

    let report = synth.synthesize(&graph).await.unwrap();

    assert!(!report.is_success());
    assert_eq!(report.state(auth::UNIT_ID), Some(&UnitState::Failed));
    // Everything referencing auth outputs is skipped.
    assert_eq!(report.state(api::UNIT_ID), Some(&UnitState::Skipped));
    assert_eq!(report.state(storage::UNIT_ID), Some(&UnitState::Skipped));
    assert_eq!(report.state(hosting::UNIT_ID), Some(&UnitState::Skipped));
    // The database has no dependency on auth and still materializes.
    assert_eq!(
        report.state(database::UNIT_ID),
        Some(&UnitState::Materialized)
    );
}

#[tokio::test]
async fn test_per_environment_compositions_are_independent() {
    let dev = compose(&full_config()).unwrap();
    let prod_config = EnvironmentConfig::new("prod", "samples")
        .with_repository(RepositoryConfig::new("acme", "samples-web").with_branch("release"))
        .with_features(StackFeatures {
            storage: false,
            hosting: true,
        });
    let prod = compose(&prod_config).unwrap();

    assert_eq!(dev.len(), 5);
    assert_eq!(prod.len(), 4);

    let report = Synthesizer::new(Arc::new(SimulatedProvisioner::new("prod")))
        .synthesize(&prod)
        .await
        .unwrap();
    assert!(report.is_success());

    let domain = &report.artifact(hosting::UNIT_ID).unwrap().outputs[hosting::DEFAULT_DOMAIN];
    assert_eq!(domain, &serde_json::json!("release.prod.apps.nimbus.dev"));
}

#[test]
fn test_config_yaml_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("dev.yaml");

    let config = full_config();
    config.to_yaml_file(&path).unwrap();

    let loaded = EnvironmentConfig::from_yaml_file(&path).unwrap();
    assert_eq!(loaded.name, "dev");
    assert_eq!(loaded.app_name, "samples");
    assert_eq!(loaded.repository, config.repository);
    assert!(loaded.features.hosting);

    let graph = compose(&loaded).unwrap();
    assert_eq!(graph.len(), 5);
}
