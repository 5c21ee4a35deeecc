use crate::unit::test_utils::{KAFKA_BROKER, generate_topic, init};
use apache_avro::Schema as AvroSchema;
use ctastreams::cta::config::CtaSettings;
use ctastreams::cta::kafka::{
    CommonKafkaConfig, ConsumerConfig, ConsumerState, DrainOutcome, KafkaAdminClient,
    KafkaConsumer, KafkaProducer, ProducerConfig,
};
use ctastreams::cta::models::Weather;
use ctastreams::cta::schema::MemorySchemaStore;
use ctastreams::AppContext;
use serde::Serialize;
use serial_test::serial;
use std::sync::Arc;
use std::time::Duration;

const WEATHER_KEY_SCHEMA: &str = r#"{
    "type": "record",
    "name": "weather.key",
    "namespace": "com.udacity",
    "fields": [{"name": "timestamp", "type": "long"}]
}"#;

const WEATHER_VALUE_SCHEMA: &str = r#"{
    "type": "record",
    "name": "weather.value",
    "namespace": "com.udacity",
    "fields": [
        {"name": "temperature", "type": "float"},
        {"name": "status", "type": "string"}
    ]
}"#;

#[derive(Serialize)]
struct WeatherKey {
    timestamp: i64,
}

#[derive(Serialize)]
struct WeatherValue {
    temperature: f32,
    status: String,
}

fn broker_context() -> AppContext {
    let settings = CtaSettings::new(KAFKA_BROKER, "http://localhost:8081");
    let admin = KafkaAdminClient::new(&CommonKafkaConfig::from_settings(&settings)).unwrap();
    AppContext::with_components(settings, Arc::new(admin), Arc::new(MemorySchemaStore::new()))
}

#[tokio::test]
#[serial]
async fn test_weather_roundtrip_through_avro() {
    if !init() {
        return;
    }

    let ctx = broker_context();
    let topic = generate_topic("org.chicago.cta.weather");

    let mut producer = KafkaProducer::with_schemas(
        ProducerConfig::new(ctx.settings(), &topic),
        AvroSchema::parse_str(WEATHER_KEY_SCHEMA).unwrap(),
        Some(AvroSchema::parse_str(WEATHER_VALUE_SCHEMA).unwrap()),
        &ctx,
    )
    .await
    .unwrap();

    producer
        .send_record(
            &WeatherKey {
                timestamp: KafkaProducer::time_millis(),
            },
            &WeatherValue {
                temperature: 19.5,
                status: "precipitation".to_string(),
            },
        )
        .await
        .unwrap();
    producer.close().unwrap();
    producer.close().unwrap();

    let config = ConsumerConfig::new(ctx.settings(), &topic)
        .offset_earliest(true)
        .consume_timeout(Duration::from_secs(1));
    let mut consumer = KafkaConsumer::new(config, Weather::default(), &ctx).unwrap();

    let mut processed = false;
    for _ in 0..30 {
        if consumer.drain_once().await == DrainOutcome::Processed {
            processed = true;
            break;
        }
    }

    assert!(processed, "no weather reading consumed from {}", topic);
    assert_eq!(consumer.handler().temperature, 19.5);
    assert_eq!(consumer.handler().status, "precipitation");

    consumer.close();
    assert_eq!(consumer.state(), ConsumerState::Closed);
    assert!(!consumer.drain_once().await.made_progress());
}
