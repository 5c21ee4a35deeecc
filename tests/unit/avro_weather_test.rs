use apache_avro::Schema as AvroSchema;
use apache_avro::types::Value as AvroValue;
use ctastreams::cta::kafka::{ConsumedRecord, Payload, RecordHandler};
use ctastreams::cta::models::Weather;
use ctastreams::cta::schema::{MemorySchemaStore, SchemaStore};
use ctastreams::cta::serialization::ConfluentAvroCodec;
use ctastreams::cta::serialization::avro::{MAGIC_BYTE, unframe};
use std::sync::Arc;

const WEATHER_VALUE_SCHEMA: &str = r#"{
    "type": "record",
    "name": "weather.value",
    "namespace": "com.udacity",
    "fields": [
        {"name": "temperature", "type": "float"},
        {"name": "status", "type": {"type": "enum", "name": "status",
            "symbols": ["sunny", "partly_cloudy", "cloudy", "windy", "precipitation"]}}
    ]
}"#;

fn reading(temperature: f32, index: u32, status: &str) -> AvroValue {
    AvroValue::Record(vec![
        ("temperature".to_string(), AvroValue::Float(temperature)),
        ("status".to_string(), AvroValue::Enum(index, status.to_string())),
    ])
}

#[tokio::test]
async fn test_framed_weather_reading_updates_model() {
    let store: Arc<dyn SchemaStore> = Arc::new(MemorySchemaStore::new());
    let codec = ConfluentAvroCodec::new(store.clone());
    let schema = AvroSchema::parse_str(WEATHER_VALUE_SCHEMA).unwrap();

    let bytes = codec
        .encode("org.chicago.cta.weather.v1-value", &schema, &reading(28.5, 3, "windy"))
        .await
        .unwrap();
    assert_eq!(bytes[0], MAGIC_BYTE);
    let (id, _) = unframe(&bytes).unwrap();
    assert_eq!(*store.schema_by_id(id).await.unwrap(), schema);

    let record = ConsumedRecord::new(
        "org.chicago.cta.weather.v1",
        0,
        0,
        Payload::Null,
        Payload::Avro(codec.decode(&bytes).await.unwrap()),
    );
    let mut weather = Weather::default();
    weather.handle(&record).await.unwrap();

    assert_eq!(weather.temperature, 28.5);
    assert_eq!(weather.status, "windy");
}

#[tokio::test]
async fn test_decode_rejects_unframed_payloads() {
    let codec = ConfluentAvroCodec::new(Arc::new(MemorySchemaStore::new()));

    assert!(codec.decode(&[]).await.is_err());
    assert!(codec.decode(&[0, 0, 0]).await.is_err());
    assert!(codec.decode(&[1, 0, 0, 0, 1, 2]).await.is_err());
    // well framed, unknown schema id
    assert!(codec.decode(&[0, 0, 0, 0, 99, 2]).await.is_err());
}
