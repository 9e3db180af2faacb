//! End-to-end compilation of a representative role manifest.

use flightplan_core::model::manifest::RoleManifest;
use flightplan_core::{
    FlightplanError, MustacheScanner, PropertyCatalog, TransformOptions, Transformer,
};

const MANIFEST: &str = r#"
roles:
  - name: router
    jobs:
      - {name: gorouter, release_name: routing}
    run:
      scaling: {min: 2, max: 4}
      memory: 512
      virtual-cpus: 2
      flight-stage: flight
      exposed-ports:
        - {name: http, protocol: TCP, external: 80, internal: 8080, public: true}
        - {name: cluster, protocol: TCP, external: "4001-4003", internal: "4001-4003"}
      shared-volumes:
        - {tag: shared-data, size: 10, path: /var/shared}
  - name: database
    jobs:
      - {name: pg, release_name: postgres}
    run:
      scaling: {min: 1, max: 1}
      memory: 1024
      virtual-cpus: 2
      persistent-volumes:
        - {tag: pgdata, size: 20, path: /var/lib/pg}
      shared-volumes:
        - {tag: shared-data, size: 10, path: /var/shared}
    configuration:
      variables:
        - {name: PG_PASSWORD, secret: true, generator: {type: password}}
  - name: seeder
    type: bosh-task
    jobs:
      - {name: seed, release_name: postgres}
    run:
      scaling: {min: 1, max: 1}
      memory: 128
      virtual-cpus: 1
      flight-stage: post-flight
  - name: debug-console
    tags: [dev-only]
    run:
      scaling: {min: 1, max: 1}
      memory: 128
      virtual-cpus: 1
  - name: bench
    run:
      scaling: {min: 1, max: 1}
      memory: 128
      virtual-cpus: 1
      flight-stage: manual
configuration:
  variables:
    - {name: DOMAIN, default: example.com}
    - {name: ROUTER_USER, default: admin}
  templates:
    properties.router.status.user: '{{ROUTER_USER}}'
    properties.router.domain: '{{DOMAIN}}'
    properties.uaa.clients.shiny.secret: '"((SHINY_SECRET))"'
auth:
  authorities: [scim.read]
  clients:
    shiny:
      scope: [openid]
      autoapprove: true
"#;

fn manifest() -> RoleManifest {
    serde_yaml::from_str(MANIFEST).unwrap()
}

fn catalog() -> PropertyCatalog {
    let mut cat = PropertyCatalog::new();
    cat.insert(
        "routing",
        "gorouter",
        vec!["router.status.user".to_string(), "router.domain".to_string()],
    );
    cat.insert("postgres", "pg", vec!["pg.password".to_string()]);
    cat.insert("postgres", "seed", vec![]);
    cat
}

fn options() -> TransformOptions {
    TransformOptions {
        name: "demo".to_string(),
        version: "2.0.1+g deadbeef".to_string(),
        product_version: "2.0.1".to_string(),
        ..TransformOptions::default()
    }
}

#[test]
fn compiles_full_definition() {
    let outcome = Transformer::new(options())
        .transform(&manifest(), Some(&catalog()), &MustacheScanner)
        .unwrap();
    let def = outcome.definition;

    assert_eq!(def.name, "demo");
    assert_eq!(def.sdl_version, "2.0.1-g-deadbeef");
    assert_eq!(def.product_version, "2.0.1");

    // dev-only and manual roles never produce components.
    let all_names: Vec<&str> = def
        .components
        .iter()
        .chain(&def.preflight)
        .chain(&def.postflight)
        .map(|c| c.name.as_str())
        .collect();
    assert!(!all_names.contains(&"debug-console"));
    assert!(!all_names.contains(&"bench"));

    // Flight-stage routing.
    assert_eq!(
        def.components.iter().map(|c| c.name.as_str()).collect::<Vec<_>>(),
        vec!["router", "database"]
    );
    assert_eq!(def.postflight.len(), 1);
    assert_eq!(def.postflight[0].name, "seeder");
    assert_eq!(def.postflight[0].retry_count, Some(5));
    assert!(def.components.iter().all(|c| c.retry_count.is_none()));
}

#[test]
fn volumes_reconcile_across_roles() {
    let outcome = Transformer::new(options())
        .transform(&manifest(), Some(&catalog()), &MustacheScanner)
        .unwrap();
    let def = outcome.definition;

    // One shared entry despite two declarations, plus the private volume.
    let shared: Vec<_> = def.volumes.iter().filter(|v| v.shared).collect();
    assert_eq!(shared.len(), 1);
    assert_eq!(shared[0].name, "shared-data");
    assert_eq!(shared[0].size_gb, 10);

    let private: Vec<_> = def.volumes.iter().filter(|v| !v.shared).collect();
    assert_eq!(private.len(), 1);
    assert_eq!(private[0].name, "pgdata");

    // Both sharers mount it.
    for name in ["router", "database"] {
        let comp = def.components.iter().find(|c| c.name == name).unwrap();
        assert!(comp
            .volume_mounts
            .iter()
            .any(|m| m.volume_name == "shared-data"));
    }
}

#[test]
fn conflicting_shared_sizes_abort() {
    let conflicted = MANIFEST.replacen("size: 10, path: /var/shared", "size: 99, path: /var/shared", 1);
    let m: RoleManifest = serde_yaml::from_str(&conflicted).unwrap();
    let err = Transformer::new(options())
        .transform(&m, None, &MustacheScanner)
        .unwrap_err();
    assert!(matches!(err, FlightplanError::VolumeSizeConflict { .. }));
}

#[test]
fn port_ranges_expand() {
    let outcome = Transformer::new(options())
        .transform(&manifest(), Some(&catalog()), &MustacheScanner)
        .unwrap();
    let router = outcome
        .definition
        .components
        .iter()
        .find(|c| c.name == "router")
        .unwrap()
        .clone();

    let names: Vec<&str> = router.service_ports.iter().map(|p| p.name.as_str()).collect();
    assert_eq!(
        names,
        vec!["http", "cluster-4001", "cluster-4002", "cluster-4003"]
    );
}

#[test]
fn parameters_resolve_per_role() {
    let outcome = Transformer::new(options())
        .transform(&manifest(), Some(&catalog()), &MustacheScanner)
        .unwrap();
    let def = outcome.definition;

    let router = def.components.iter().find(|c| c.name == "router").unwrap();
    let names: Vec<&str> = router.parameters.iter().map(|p| p.name.as_str()).collect();
    assert_eq!(names, vec!["DOMAIN", "ROUTER_USER"]);

    // Sorted and duplicate-free.
    let mut sorted = names.clone();
    sorted.sort();
    sorted.dedup();
    assert_eq!(names, sorted);

    // The database role's templates reference nothing, so it only carries
    // its own variable.
    let database = def.components.iter().find(|c| c.name == "database").unwrap();
    let names: Vec<&str> = database.parameters.iter().map(|p| p.name.as_str()).collect();
    assert_eq!(names, vec!["PG_PASSWORD"]);
}

#[test]
fn fallback_references_every_global() {
    let outcome = Transformer::new(options())
        .transform(&manifest(), None, &MustacheScanner)
        .unwrap();
    let router = outcome
        .definition
        .components
        .iter()
        .find(|c| c.name == "router")
        .unwrap()
        .clone();
    let names: Vec<&str> = router.parameters.iter().map(|p| p.name.as_str()).collect();
    assert_eq!(names, vec!["DOMAIN", "ROUTER_USER"]);
}

#[test]
fn fallback_references_match_secret_definitions() {
    let m: RoleManifest = serde_yaml::from_str(
        r#"
roles:
  - name: router
    jobs:
      - {name: gorouter, release_name: routing}
    run:
      scaling: {min: 1, max: 1}
      memory: 128
      virtual-cpus: 1
configuration:
  variables:
    - {name: DOMAIN, default: example.com}
    - {name: GLOBAL_SECRET, secret: true, generator: {type: password}}
"#,
    )
    .unwrap();
    let outcome = Transformer::new(options())
        .transform(&m, None, &MustacheScanner)
        .unwrap();

    let defined: Vec<&str> = outcome
        .definition
        .parameters
        .iter()
        .map(|p| p.name.as_str())
        .collect();
    assert!(defined.contains(&"global-secret"));

    // Every parameter a component references must have a top-level
    // definition, secrets included.
    for component in &outcome.definition.components {
        for reference in &component.parameters {
            assert!(
                defined.contains(&reference.name.as_str()),
                "component {} references undefined parameter {}",
                component.name,
                reference.name
            );
        }
    }
}

#[test]
fn top_level_parameters_cover_global_and_role_variables() {
    let outcome = Transformer::new(options())
        .transform(&manifest(), Some(&catalog()), &MustacheScanner)
        .unwrap();
    let names: Vec<&str> = outcome
        .definition
        .parameters
        .iter()
        .map(|p| p.name.as_str())
        .collect();
    assert_eq!(names, vec!["DOMAIN", "ROUTER_USER", "pg-password"]);

    let pg = &outcome.definition.parameters[2];
    assert!(pg.secret);
    assert!(pg.default.is_none());
    assert_eq!(pg.generator.as_ref().unwrap().id, "pg-password");
}

#[test]
fn auth_feature_is_synthesized() {
    let outcome = Transformer::new(options())
        .transform(&manifest(), Some(&catalog()), &MustacheScanner)
        .unwrap();
    let auth = outcome.definition.features.auth.unwrap();
    assert_eq!(auth.len(), 1);
    assert_eq!(auth[0].auth_zone, "self");

    let shiny = &auth[0].clients[0];
    assert_eq!(shiny.id, "shiny");
    assert_eq!(shiny.autoapprove, vec!["openid"]);
    assert_eq!(shiny.parameters[0].name, "shiny-secret");
}

#[test]
fn transform_is_idempotent() {
    let transformer = Transformer::new(options());
    let m = manifest();
    let cat = catalog();

    let a = transformer.transform(&m, Some(&cat), &MustacheScanner).unwrap();
    let b = transformer.transform(&m, Some(&cat), &MustacheScanner).unwrap();

    let ja = serde_json::to_string_pretty(&a.definition).unwrap();
    let jb = serde_json::to_string_pretty(&b.definition).unwrap();
    assert_eq!(ja, jb);
}
