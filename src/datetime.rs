use time::{format_description::FormatItem, macros::format_description, PrimitiveDateTime};

/// Canonical SQL datetime shape used across the API: `YYYY-MM-DD HH:MM:SS`.
pub const SQL_DATETIME: &[FormatItem<'static>] =
    format_description!("[year]-[month]-[day] [hour]:[minute]:[second]");

/// Strict parse of a canonical datetime string. Zero padding is mandatory
/// and the calendar must agree, so impossible dates like `2025-02-30` fail.
pub fn parse_sql_datetime(value: &str) -> Option<PrimitiveDateTime> {
    PrimitiveDateTime::parse(value, SQL_DATETIME).ok()
}

pub fn format_sql_datetime(value: PrimitiveDateTime) -> String {
    // The format description only has infallible components.
    value
        .format(SQL_DATETIME)
        .unwrap_or_else(|_| value.to_string())
}

/// Build the stored datetime for a public booking from separate date and
/// time fields. Time is minute precision (`HH:MM`) and defaults to 09:00.
pub fn compose_appointment_datetime(date: &str, time: &str) -> String {
    if time.is_empty() {
        format!("{date} 09:00:00")
    } else {
        format!("{date} {time}:00")
    }
}

/// Admin forms send `YYYY-MM-DD HH:MM`; a 16-character input gets seconds
/// appended. Other lengths pass through untouched and stand or fall on the
/// strict parse.
pub fn normalize_admin_datetime(value: &str) -> String {
    let value = value.trim();
    if value.len() == 16 {
        format!("{value}:00")
    } else {
        value.to_string()
    }
}

/// Serde adapter so `PrimitiveDateTime` round-trips as the canonical
/// `YYYY-MM-DD HH:MM:SS` string in JSON payloads.
pub mod sql_datetime {
    use serde::{self, Deserialize, Deserializer, Serializer};
    use time::PrimitiveDateTime;

    use super::SQL_DATETIME;

    pub fn serialize<S>(value: &PrimitiveDateTime, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&super::format_sql_datetime(*value))
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<PrimitiveDateTime, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        PrimitiveDateTime::parse(&raw, SQL_DATETIME).map_err(serde::de::Error::custom)
    }
}
