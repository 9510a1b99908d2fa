use std::collections::HashMap;

use geria_lambda::config::{AppConfig, StoreBackend};

fn config(vars: &[(&str, &str)]) -> eyre::Result<AppConfig> {
    let vars: HashMap<String, String> = vars
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    AppConfig::from_lookup(|name| vars.get(name).cloned())
}

#[test]
fn defaults_to_s3_bucket_geria_on_lambda() {
    let c = config(&[]).unwrap();
    assert_eq!(c.bucket, "geria");
    assert_eq!(c.store, StoreBackend::S3);
    assert_eq!(c.local_addr, None);
}

#[test]
fn reads_overrides() {
    let c = config(&[
        ("GERIA_BUCKET", "geria-staging"),
        ("GERIA_STORE", "memory"),
        ("GERIA_LOCAL_ADDR", "127.0.0.1:8080"),
    ])
    .unwrap();
    assert_eq!(c.bucket, "geria-staging");
    assert_eq!(c.store, StoreBackend::Memory);
    assert_eq!(c.local_addr.map(|a| a.port()), Some(8080));
}

#[test]
fn rejects_unknown_store_and_bad_address() {
    assert!(config(&[("GERIA_STORE", "dynamo")]).is_err());
    assert!(config(&[("GERIA_LOCAL_ADDR", "localhost")]).is_err());
}
