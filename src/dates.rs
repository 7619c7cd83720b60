//! Wire formats for calendar dates (`YYYY-MM-DD`).

use time::{format_description::FormatItem, macros::format_description};

pub const ISO_DATE: &[FormatItem<'static>] = format_description!("[year]-[month]-[day]");

/// `#[serde(with = "crate::dates::date")]`
pub mod date {
    use serde::{Deserialize, Deserializer, Serializer};
    use time::Date;

    use super::ISO_DATE;

    pub fn serialize<S: Serializer>(value: &Date, s: S) -> Result<S::Ok, S::Error> {
        let out = value.format(ISO_DATE).map_err(serde::ser::Error::custom)?;
        s.serialize_str(&out)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Date, D::Error> {
        let raw = String::deserialize(d)?;
        Date::parse(raw.trim(), ISO_DATE).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use serde::{Deserialize, Serialize};
    use time::macros::date;

    #[derive(Debug, Serialize, Deserialize, PartialEq)]
    struct Wrapper {
        #[serde(with = "super::date")]
        day: time::Date,
    }

    #[test]
    fn dates_use_iso_calendar_format() {
        let json = serde_json::to_string(&Wrapper { day: date!(2024 - 03 - 09) }).unwrap();
        assert_eq!(json, r#"{"day":"2024-03-09"}"#);
        let back: Wrapper = serde_json::from_str(&json).unwrap();
        assert_eq!(back.day, date!(2024 - 03 - 09));
    }

    #[test]
    fn rejects_non_iso_dates() {
        assert!(serde_json::from_str::<Wrapper>(r#"{"day":"09/03/2024"}"#).is_err());
    }
}
