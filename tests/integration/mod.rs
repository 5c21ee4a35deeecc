pub mod kafka_roundtrip_test;
pub mod stations_stream_test;
pub mod topic_admin_test;
