pub mod json;

// Re-export commonly used functions
pub use json::{from_json, read_json, to_json, to_json_records, write_json, JsonOrient};
