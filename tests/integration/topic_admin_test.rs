use crate::unit::test_utils::{KAFKA_BROKER, generate_topic, init};
use ctastreams::cta::kafka::{
    CommonKafkaConfig, KafkaAdminClient, TopicAdmin, TopicCreation, TopicProvision, TopicRegistry,
    TopicSpec,
};
use serial_test::serial;
use std::time::Duration;

#[tokio::test]
#[serial]
async fn test_ensure_topic_creates_once() {
    if !init() {
        return;
    }

    let admin = KafkaAdminClient::new(&CommonKafkaConfig::new(KAFKA_BROKER)).unwrap();
    let registry = TopicRegistry::new();
    let spec = TopicSpec::new(generate_topic("org.chicago.cta.weather"), 1, 1);

    assert_eq!(registry.ensure_topic(&admin, &spec).await, TopicProvision::Created);
    assert_eq!(
        registry.ensure_topic(&admin, &spec).await,
        TopicProvision::AlreadyKnown
    );
    assert!(admin.topic_exists(&spec.name, Duration::from_secs(5)).unwrap());

    // A fresh registry asks again and the broker reports the topic as existing
    let restarted = TopicRegistry::new();
    assert_eq!(restarted.ensure_topic(&admin, &spec).await, TopicProvision::Created);
    assert_eq!(
        admin.create_topic(&spec).await.unwrap(),
        TopicCreation::AlreadyExists
    );

    admin.delete_topic(&spec.name).await.unwrap();
}
