pub mod avro_weather_test;
pub mod poll_loop_test;
pub mod settings_test;
pub mod stations_test;
pub mod test_utils;
