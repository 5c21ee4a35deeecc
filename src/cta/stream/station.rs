use serde::{Deserialize, Serialize};
use std::fmt;

/// Station row as published on the stations topic
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Station {
    pub stop_id: i64,
    pub direction_id: String,
    pub stop_name: String,
    pub station_name: String,
    pub station_descriptive_name: String,
    pub station_id: i64,
    pub order: i64,
    pub red: bool,
    pub blue: bool,
    pub green: bool,
}

/// Line a station belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Line {
    #[serde(rename = "red")]
    Red,
    #[serde(rename = "green")]
    Green,
    #[serde(rename = "blue")]
    Blue,
    #[serde(rename = ":undefined")]
    Undefined,
}

impl Line {
    pub fn as_str(&self) -> &'static str {
        match self {
            Line::Red => "red",
            Line::Green => "green",
            Line::Blue => "blue",
            Line::Undefined => ":undefined",
        }
    }
}

impl fmt::Display for Line {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// First set flag in priority order red, green, blue
pub fn classify_line(red: bool, green: bool, blue: bool) -> Line {
    [(red, Line::Red), (green, Line::Green), (blue, Line::Blue)]
        .into_iter()
        .find_map(|(set, line)| set.then_some(line))
        .unwrap_or(Line::Undefined)
}

/// Table entry derived from a [`Station`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransformedStation {
    pub station_id: i64,
    pub station_name: String,
    pub order: i64,
    pub line: Line,
}

impl From<&Station> for TransformedStation {
    fn from(station: &Station) -> Self {
        Self {
            station_id: station.station_id,
            station_name: station.station_name.clone(),
            order: station.order,
            line: classify_line(station.red, station.green, station.blue),
        }
    }
}
