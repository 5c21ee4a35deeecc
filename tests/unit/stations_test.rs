use async_trait::async_trait;
use ctastreams::cta::kafka::{ConsumedRecord, Payload, ProducerError, RecordHandler};
use ctastreams::cta::serialization::{from_json, to_json};
use ctastreams::cta::stream::{
    ChangelogSink, Line, Station, StationTable, StationsAgent, StreamAppConfig, TransformedStation,
    classify_line,
};
use std::sync::Mutex;

#[derive(Default)]
struct MemoryChangelog {
    entries: Mutex<Vec<(i64, TransformedStation)>>,
}

#[async_trait]
impl ChangelogSink for MemoryChangelog {
    async fn publish(&self, key: &[u8], value: &[u8]) -> Result<(), ProducerError> {
        let key: i64 = from_json(key)?;
        let value: TransformedStation = from_json(value)?;
        self.entries.lock().unwrap().push((key, value));
        Ok(())
    }
}

fn station(station_id: i64, name: &str, red: bool, green: bool, blue: bool) -> Station {
    Station {
        stop_id: station_id - 10000,
        direction_id: "S".to_string(),
        stop_name: format!("{} (Southbound)", name),
        station_name: name.to_string(),
        station_descriptive_name: format!("{} (descriptive)", name),
        station_id,
        order: 42,
        red,
        blue,
        green,
    }
}

fn stations_record(station: &Station) -> ConsumedRecord {
    ConsumedRecord::new(
        "org.cta.stations",
        0,
        0,
        Payload::Null,
        Payload::Raw(to_json(station).unwrap()),
    )
}

#[test]
fn test_line_classification_truth_table() {
    let cases = [
        ((false, false, false), Line::Undefined),
        ((true, false, false), Line::Red),
        ((false, true, false), Line::Green),
        ((false, false, true), Line::Blue),
        ((true, true, false), Line::Red),
        ((true, false, true), Line::Red),
        ((false, true, true), Line::Green),
        ((true, true, true), Line::Red),
    ];
    for ((red, green, blue), expected) in cases {
        assert_eq!(classify_line(red, green, blue), expected, "{red} {green} {blue}");
    }
}

#[test]
fn test_default_app_topics() {
    let app = StreamAppConfig::default();
    assert_eq!(app.app_id, "stations-stream");
    assert_eq!(app.input_topic, "org.cta.stations");
    assert_eq!(app.table_name, "cta.stations.table");
    assert_eq!(app.changelog_topic, "org.cta.stations.table");
    assert_eq!(app.table_partitions, 1);
}

#[tokio::test]
async fn test_agent_materializes_stream() {
    let mut agent = StationsAgent::new(StationTable::new(), MemoryChangelog::default());
    let updates = [
        station(40900, "Howard", true, false, false),
        station(40380, "Clark/Lake", false, true, true),
        station(41400, "Roosevelt", false, false, false),
        station(41400, "Roosevelt", false, false, true),
    ];

    for update in &updates {
        agent.handle(&stations_record(update)).await.unwrap();
    }

    let lines: Vec<(i64, Line)> = agent
        .table()
        .snapshot()
        .into_iter()
        .map(|s| (s.station_id, s.line))
        .collect();
    assert_eq!(
        lines,
        vec![(40380, Line::Green), (40900, Line::Red), (41400, Line::Blue)]
    );

    let changelog = agent.changelog().entries.lock().unwrap();
    assert_eq!(changelog.len(), 4);
    assert_eq!(changelog[2].1.line, Line::Undefined);
    assert_eq!(changelog[3].0, 41400);
}

#[tokio::test]
async fn test_table_view_follows_agent() {
    let table = StationTable::new();
    let view = table.clone();
    let agent = StationsAgent::new(table, MemoryChangelog::default());

    let transformed = agent
        .process(&station(40010, "Austin", false, false, true))
        .await
        .unwrap();

    assert_eq!(view.get(40010), Some(transformed));
    assert_eq!(view.len(), 1);
}
