use crate::unit::test_utils::{KAFKA_BROKER, generate_topic, init};
use ctastreams::cta::config::CtaSettings;
use ctastreams::cta::kafka::{
    CommonKafkaConfig, ConsumerConfig, KafkaAdminClient, KafkaConsumer, KafkaProducer,
    KafkaRecordSource, ProducerConfig, stop_channel,
};
use ctastreams::cta::schema::MemorySchemaStore;
use ctastreams::cta::serialization::to_json;
use ctastreams::cta::stream::{Line, Station, StationTable, StationsAgent};
use ctastreams::AppContext;
use serial_test::serial;
use std::sync::Arc;
use std::time::Duration;

fn broker_context() -> AppContext {
    let settings = CtaSettings::new(KAFKA_BROKER, "http://localhost:8081");
    let admin = KafkaAdminClient::new(&CommonKafkaConfig::from_settings(&settings)).unwrap();
    AppContext::with_components(settings, Arc::new(admin), Arc::new(MemorySchemaStore::new()))
}

fn station(station_id: i64, red: bool, green: bool, blue: bool) -> Station {
    Station {
        stop_id: station_id - 10000,
        direction_id: "N".to_string(),
        stop_name: format!("stop {}", station_id),
        station_name: format!("station {}", station_id),
        station_descriptive_name: format!("station {} (test)", station_id),
        station_id,
        order: 1,
        red,
        blue,
        green,
    }
}

#[tokio::test]
#[serial]
async fn test_stations_table_and_recovery() {
    if !init() {
        return;
    }

    let ctx = broker_context();
    let input_topic = generate_topic("org.cta.stations");
    let changelog_topic = generate_topic("org.cta.stations.table");

    let mut input = KafkaProducer::new(ProducerConfig::new(ctx.settings(), &input_topic), &ctx)
        .await
        .unwrap();
    for update in [station(40900, true, false, false), station(40380, false, true, true)] {
        let key = to_json(&update.station_id).unwrap();
        let value = to_json(&update).unwrap();
        input.send_raw(Some(&key), Some(&value)).await.unwrap();
    }
    input.close().unwrap();

    let changelog = KafkaProducer::new(ProducerConfig::new(ctx.settings(), &changelog_topic), &ctx)
        .await
        .unwrap();
    let agent = StationsAgent::new(StationTable::new(), changelog);
    let view = agent.table().clone();

    let config = ConsumerConfig::new(ctx.settings(), &input_topic)
        .avro(false)
        .offset_earliest(true)
        .consume_timeout(Duration::from_millis(500))
        .sleep_interval(Duration::from_millis(100));
    let mut consumer = KafkaConsumer::new(config, agent, &ctx).unwrap();

    let (stop, signal) = stop_channel();
    let watcher = view.clone();
    tokio::spawn(async move {
        for _ in 0..300 {
            if watcher.len() == 2 {
                break;
            }
            tokio::time::sleep(Duration::from_millis(100)).await;
        }
        stop.stop();
    });
    let stats = consumer.consume(signal).await;
    consumer.close();
    consumer.handler_mut().changelog_mut().close().unwrap();

    assert_eq!(stats.processed, 2);
    assert_eq!(view.get(40900).map(|s| s.line), Some(Line::Red));
    assert_eq!(view.get(40380).map(|s| s.line), Some(Line::Green));

    let replay = ConsumerConfig::new(ctx.settings(), &changelog_topic)
        .avro(false)
        .offset_earliest(true)
        .consume_timeout(Duration::from_secs(2));
    let mut source = KafkaRecordSource::subscribe(&replay, &ctx).unwrap();
    let restored_changelog =
        KafkaProducer::new(ProducerConfig::new(ctx.settings(), &changelog_topic), &ctx)
            .await
            .unwrap();
    let mut restored = StationsAgent::new(StationTable::new(), restored_changelog);

    let applied = restored.recover(&mut source, 15).await;
    source.close();

    assert_eq!(applied, 2);
    assert_eq!(restored.table().snapshot(), view.snapshot());
}
