use std::str::FromStr;

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Light,
    Dark,
    System,
}

impl Theme {
    pub fn as_str(&self) -> &'static str {
        match self {
            Theme::Light => "light",
            Theme::Dark => "dark",
            Theme::System => "system",
        }
    }
}

impl FromStr for Theme {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "light" => Ok(Theme::Light),
            "dark" => Ok(Theme::Dark),
            "system" => Ok(Theme::System),
            other => Err(format!("unknown theme: {other}")),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum DateFormat {
    #[default]
    #[serde(rename = "dd/mm/yyyy")]
    DayMonthYear,
    #[serde(rename = "mm/dd/yyyy")]
    MonthDayYear,
    #[serde(rename = "yyyy-mm-dd")]
    Iso,
}

impl DateFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            DateFormat::DayMonthYear => "dd/mm/yyyy",
            DateFormat::MonthDayYear => "mm/dd/yyyy",
            DateFormat::Iso => "yyyy-mm-dd",
        }
    }
}

impl FromStr for DateFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "dd/mm/yyyy" => Ok(DateFormat::DayMonthYear),
            "mm/dd/yyyy" => Ok(DateFormat::MonthDayYear),
            "yyyy-mm-dd" => Ok(DateFormat::Iso),
            other => Err(format!("unknown date format: {other}")),
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Profile {
    pub id: Uuid,
    pub email: Option<String>,
    pub name: Option<String>,
    pub company: Option<String>,
    pub avatar_url: Option<String>,
    pub currency: String,
    pub theme: Theme,
    pub date_format: DateFormat,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

/// Partial update; absent fields keep their value.
#[derive(Debug, Default, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileUpdate {
    pub email: Option<String>,
    pub name: Option<String>,
    pub company: Option<String>,
    pub currency: Option<String>,
    pub theme: Option<Theme>,
    pub date_format: Option<DateFormat>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_preferences_parse_from_wire_values() {
        let upd: ProfileUpdate =
            serde_json::from_str(r#"{"theme":"system","dateFormat":"yyyy-mm-dd"}"#).unwrap();
        assert_eq!(upd.theme, Some(Theme::System));
        assert_eq!(upd.date_format, Some(DateFormat::Iso));
        assert!(upd.name.is_none());
    }

    #[test]
    fn as_str_and_from_str_agree() {
        for t in [Theme::Light, Theme::Dark, Theme::System] {
            assert_eq!(t.as_str().parse::<Theme>(), Ok(t));
        }
        for f in [DateFormat::DayMonthYear, DateFormat::MonthDayYear, DateFormat::Iso] {
            assert_eq!(f.as_str().parse::<DateFormat>(), Ok(f));
        }
        assert!("sepia".parse::<Theme>().is_err());
    }
}
