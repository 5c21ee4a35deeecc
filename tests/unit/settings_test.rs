use ctastreams::cta::config::{
    BOOTSTRAP_SERVERS_ENV, CtaSettings, DEFAULT_SCHEMA_REGISTRY_URL, SCHEMA_REGISTRY_URL_ENV,
};
use ctastreams::cta::kafka::{ConsumerConfig, ProducerConfig};
use std::collections::HashMap;

fn settings_from(vars: &[(&str, &str)]) -> CtaSettings {
    let vars: HashMap<String, String> = vars
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    CtaSettings::from_lookup(|key| vars.get(key).cloned())
}

#[test]
fn test_reference_defaults() {
    let settings = settings_from(&[]);
    assert_eq!(
        settings.bootstrap_servers(),
        "PLAINTEXT://localhost:9092,PLAINTEXT://localhost:9093,PLAINTEXT://localhost:9094"
    );
    assert_eq!(settings.schema_registry_url, DEFAULT_SCHEMA_REGISTRY_URL);
}

#[test]
fn test_environment_overrides() {
    let settings = settings_from(&[
        (BOOTSTRAP_SERVERS_ENV, "kafka-0:9092, kafka-1:9092"),
        (SCHEMA_REGISTRY_URL_ENV, "http://registry:8081/"),
    ]);
    assert_eq!(settings.brokers, vec!["kafka-0:9092", "kafka-1:9092"]);
    assert_eq!(settings.schema_registry_url, "http://registry:8081");

    let blank = settings_from(&[(BOOTSTRAP_SERVERS_ENV, " , ")]);
    assert_eq!(blank, CtaSettings::default());
}

#[test]
fn test_both_roles_share_connection_properties() {
    let settings = settings_from(&[(BOOTSTRAP_SERVERS_ENV, "kafka-0:9092")]);

    let consumer = ConsumerConfig::new(&settings, "^org.chicago.cta.station.arrivals.")
        .offset_earliest(true)
        .client_config();
    let producer = ProducerConfig::new(&settings, "org.chicago.cta.station.arrivals.clark")
        .client_config();

    for config in [&consumer, &producer] {
        assert_eq!(config.get("bootstrap.servers"), Some("kafka-0:9092"));
        assert_eq!(config.get("compression.type"), Some("lz4"));
    }
    assert_eq!(
        consumer.get("group.id"),
        Some("^org.chicago.cta.station.arrivals.")
    );
    assert_eq!(consumer.get("auto.offset.reset"), Some("earliest"));
    assert_eq!(producer.get("client.id"), Some("1"));
    assert_eq!(producer.get("group.id"), None);
}
