//! Front-matter parsing and validation

use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, TimeZone, Utc};
use lazy_static::lazy_static;
use regex::Regex;
use serde_yaml::{Mapping, Value};

use super::PostRecord;
use crate::error::{ContentError, ValidationError, ValidationErrorKind};

lazy_static! {
    static ref DATE_PATTERN: Regex = Regex::new(r"^[0-9]{4}-[0-9]{2}-[0-9]{2}$").unwrap();
    // YAML timestamp: a date, optionally followed by a time and a zone
    static ref TIMESTAMP_PATTERN: Regex = Regex::new(concat!(
        r"^(?P<date>[0-9]{4}-[0-9]{2}-[0-9]{2})",
        r"(?:(?:[Tt]|[ \t]+)(?P<time>[0-9]{1,2}:[0-9]{2}:[0-9]{2}(?:\.[0-9]+)?)",
        r"(?:[ \t]*(?P<zone>[Zz]|[-+][0-9]{1,2}(?::?[0-9]{2})?))?)?$",
    ))
    .unwrap();
}

const DELIMITER: &str = "---";

/// The raw key/value header of a post, before validation
#[derive(Debug, Clone, Default)]
pub struct FrontMatter {
    data: Mapping,
}

impl FrontMatter {
    /// Parse front-matter from a post's source text.
    /// Returns (front_matter, body)
    pub fn parse<'a>(file_name: &str, source: &'a str) -> Result<(Self, &'a str), ContentError> {
        let (header, body) = split(source);
        let Some(header) = header else {
            return Ok((Self::default(), body));
        };

        if header.trim().is_empty() {
            return Ok((Self::default(), body));
        }

        let value: Value =
            serde_yaml::from_str(header).map_err(|source| ContentError::FrontMatter {
                file: file_name.to_string(),
                source,
            })?;

        let data = match value {
            Value::Mapping(map) => map,
            other => {
                tracing::debug!("front matter in {} is not a mapping: {:?}", file_name, other);
                Mapping::new()
            }
        };

        Ok((Self { data }, body))
    }

    /// Look up a raw header value
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.data.get(key)
    }

    /// Check every required field and build the typed record
    pub fn validate(&self, file_name: &str) -> Result<PostRecord, ValidationError> {
        Ok(PostRecord {
            title: require_string(self.get("title"), "title", file_name)?,
            slug: require_string(self.get("slug"), "slug", file_name)?,
            date: require_date(self.get("date"), file_name)?,
            description: require_string(self.get("description"), "description", file_name)?,
            tags: require_tags(self.get("tags"), file_name)?,
            cover_image: require_string(self.get("coverImage"), "coverImage", file_name)?,
        })
    }
}

/// Split source text into the header between `---` lines and the body after it.
/// Without an opening `---` the whole text is body; without a closing one the
/// rest of the text is header and the body is empty.
pub fn split(source: &str) -> (Option<&str>, &str) {
    let source = source.strip_prefix('\u{feff}').unwrap_or(source);
    let mut lines = source.split_inclusive('\n');

    let Some(first) = lines.next() else {
        return (None, source);
    };
    if !is_delimiter(first) {
        return (None, source);
    }

    let header_start = first.len();
    let mut offset = header_start;
    for line in lines {
        if is_delimiter(line) {
            let header = &source[header_start..offset];
            let body = &source[offset + line.len()..];
            return (Some(header), body);
        }
        offset += line.len();
    }

    (Some(&source[header_start..]), "")
}

fn is_delimiter(line: &str) -> bool {
    line.trim_end() == DELIMITER
}

fn require_string(
    value: Option<&Value>,
    field: &'static str,
    file_name: &str,
) -> Result<String, ValidationError> {
    match value {
        Some(Value::String(s)) if !s.trim().is_empty() => Ok(s.trim().to_string()),
        _ => Err(ValidationError::new(
            ValidationErrorKind::MissingOrWrongTypeField,
            field,
            file_name,
        )),
    }
}

fn require_tags(value: Option<&Value>, file_name: &str) -> Result<Vec<String>, ValidationError> {
    let Some(Value::Sequence(items)) = value else {
        return Err(ValidationError::new(
            ValidationErrorKind::MissingOrWrongTypeField,
            "tags",
            file_name,
        ));
    };

    if items.is_empty() {
        return Err(ValidationError::new(
            ValidationErrorKind::EmptyTagList,
            "tags",
            file_name,
        ));
    }

    items
        .iter()
        .map(|item| match item {
            Value::String(tag) if !tag.trim().is_empty() => Ok(tag.trim().to_string()),
            _ => Err(ValidationError::new(
                ValidationErrorKind::InvalidTagValue,
                "tags",
                file_name,
            )),
        })
        .collect()
}

fn require_date(value: Option<&Value>, file_name: &str) -> Result<NaiveDate, ValidationError> {
    let fail = |kind| ValidationError::new(kind, "date", file_name);

    let text = value
        .and_then(normalize_date)
        .ok_or_else(|| fail(ValidationErrorKind::MissingOrWrongTypeField))?;

    if !DATE_PATTERN.is_match(&text) {
        return Err(fail(ValidationErrorKind::InvalidDateFormat));
    }

    NaiveDate::parse_from_str(&text, "%Y-%m-%d")
        .map_err(|_| fail(ValidationErrorKind::InvalidDateValue))
}

/// Bring a header date into `YYYY-MM-DD` text form.
///
/// Plain dates are only trimmed. A timestamp with a time part is what YAML
/// reads as a native date; serde_yaml hands it over as a string, with any
/// `!!timestamp` tag already resolved. It is read as an instant and reduced
/// to its UTC calendar date, so a local offset can move the day.
pub(crate) fn normalize_date(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => {
            let s = s.trim();
            match TIMESTAMP_PATTERN.captures(s) {
                Some(caps) if caps.name("time").is_some() => match parse_timestamp(s) {
                    Some(dt) => Some(dt.format("%Y-%m-%d").to_string()),
                    // No such day: keep it for the calendar check. A bad time
                    // on a real day leaves the text to fail the format check.
                    None if NaiveDate::parse_from_str(&caps["date"], "%Y-%m-%d").is_err() => {
                        Some(caps["date"].to_string())
                    }
                    None => Some(s.to_string()),
                },
                _ => Some(s.to_string()),
            }
        }
        Value::Tagged(tagged) if is_timestamp_tag(&tagged.tag.to_string()) => {
            let Value::String(raw) = &tagged.value else {
                return None;
            };
            parse_timestamp(raw.trim()).map(|dt| dt.format("%Y-%m-%d").to_string())
        }
        _ => None,
    }
}

fn is_timestamp_tag(tag: &str) -> bool {
    tag.trim_start_matches('!').rsplit(':').next() == Some("timestamp")
}

fn parse_timestamp(s: &str) -> Option<DateTime<Utc>> {
    let caps = TIMESTAMP_PATTERN.captures(s)?;
    let date = NaiveDate::parse_from_str(&caps["date"], "%Y-%m-%d").ok()?;

    let Some(time) = caps.name("time") else {
        return Some(date.and_hms_opt(0, 0, 0)?.and_utc());
    };
    let naive = NaiveDateTime::parse_from_str(
        &format!("{} {}", date, time.as_str()),
        "%Y-%m-%d %H:%M:%S%.f",
    )
    .ok()?;

    // Timestamps without an offset are UTC in YAML
    match caps.name("zone").map(|zone| zone.as_str()) {
        None | Some("Z") | Some("z") => Some(naive.and_utc()),
        Some(zone) => {
            let offset = parse_offset(zone)?;
            let local = offset.from_local_datetime(&naive).single()?;
            Some(local.with_timezone(&Utc))
        }
    }
}

/// `+hh`, `+hhmm` or `+hh:mm`
fn parse_offset(zone: &str) -> Option<FixedOffset> {
    let (sign, digits) = match zone.as_bytes().first()? {
        b'+' => (1, &zone[1..]),
        b'-' => (-1, &zone[1..]),
        _ => return None,
    };
    let (hours, minutes) = match digits.split_once(':') {
        Some(parts) => parts,
        None if digits.len() > 2 => digits.split_at(2),
        None => (digits, "0"),
    };
    let seconds = hours.parse::<i32>().ok()? * 3600 + minutes.parse::<i32>().ok()? * 60;
    FixedOffset::east_opt(sign * seconds)
}
