use std::net::TcpStream;
use uuid::Uuid;

pub(crate) const KAFKA_BROKER: &str = "localhost:9092";

/// Helper functions
pub(crate) fn is_kafka_running() -> bool {
    match TcpStream::connect(KAFKA_BROKER) {
        Ok(_) => true,
        Err(_) => {
            println!("WARNING: Kafka is not running at {}", KAFKA_BROKER);
            println!("Tests requiring Kafka will be skipped.");
            false
        }
    }
}

pub(crate) fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

pub(crate) fn init() -> bool {
    init_logger();
    is_kafka_running()
}

pub(crate) fn generate_topic(prefix: &str) -> String {
    format!("{}-{}", prefix, Uuid::new_v4())
}

