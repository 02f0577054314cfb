//! Raw leaderboard payload and the normalized [`Entry`] built from it.
//!
//! The payload shape follows the private-leaderboard JSON document:
//!
//! ```json
//! { "event": "2024", "owner_id": 1, "members": {
//!     "42": { "id": 42, "name": "ada", "local_score": 120, "stars": 9,
//!             "completion_day_level": { "1": { "1": {..}, "2": {..} } } } } }
//! ```
//!
//! `members` is decoded into a `Vec` in document order so that ties in the
//! ranking keep the order the source produced them in.

use std::collections::BTreeMap;
use std::fmt;

use serde::de::{self, MapAccess, Visitor};
use serde::{Deserialize, Deserializer};
use serde_json::Value;

// ---------------------------------------------------------------------------
// Error type
// ---------------------------------------------------------------------------

/// The payload could not be decoded into member records.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PayloadError {
    pub message: String,
}

impl fmt::Display for PayloadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "leaderboard payload decode failed: {}", self.message)
    }
}

impl std::error::Error for PayloadError {}

// ---------------------------------------------------------------------------
// Raw payload
// ---------------------------------------------------------------------------

/// Leaderboard document as returned by the source.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct LeaderboardPayload {
    #[serde(default)]
    pub event: Option<String>,
    #[serde(default, deserialize_with = "members_in_document_order")]
    pub members: Vec<RawMember>,
}

impl LeaderboardPayload {
    pub fn new(members: Vec<RawMember>) -> Self {
        Self {
            event: None,
            members,
        }
    }

    /// Decode a payload from JSON bytes.
    pub fn from_slice(bytes: &[u8]) -> Result<Self, PayloadError> {
        serde_json::from_slice(bytes).map_err(|e| PayloadError {
            message: e.to_string(),
        })
    }
}

/// One member record, verbatim from the source.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct RawMember {
    #[serde(deserialize_with = "id_from_number_or_string")]
    pub id: u64,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub local_score: i64,
    #[serde(default)]
    pub stars: u32,
    /// day-number string -> part-number string -> star record.
    #[serde(default)]
    pub completion_day_level: BTreeMap<String, BTreeMap<String, Value>>,
}

impl RawMember {
    pub fn new(id: u64, name: Option<&str>, local_score: i64, stars: u32) -> Self {
        Self {
            id,
            name: name.map(str::to_string),
            local_score,
            stars,
            completion_day_level: BTreeMap::new(),
        }
    }

    /// Builder used by fixtures: mark `day` with the given completion state.
    pub fn with_day(mut self, day: u32, state: DayState) -> Self {
        let parts: BTreeMap<String, Value> = match state {
            DayState::NotStarted => {
                self.completion_day_level.remove(&day.to_string());
                return self;
            }
            DayState::PartOne => [("1".to_string(), Value::Object(Default::default()))].into(),
            DayState::BothParts => [
                ("1".to_string(), Value::Object(Default::default())),
                ("2".to_string(), Value::Object(Default::default())),
            ]
            .into(),
        };
        self.completion_day_level.insert(day.to_string(), parts);
        self
    }
}

fn members_in_document_order<'de, D>(de: D) -> Result<Vec<RawMember>, D::Error>
where
    D: Deserializer<'de>,
{
    struct MembersVisitor;

    impl<'de> Visitor<'de> for MembersVisitor {
        type Value = Vec<RawMember>;

        fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str("a map of member id to member record")
        }

        fn visit_map<A>(self, mut map: A) -> Result<Self::Value, A::Error>
        where
            A: MapAccess<'de>,
        {
            let mut out = Vec::with_capacity(map.size_hint().unwrap_or(0));
            while let Some((_key, member)) = map.next_entry::<String, RawMember>()? {
                out.push(member);
            }
            Ok(out)
        }
    }

    de.deserialize_map(MembersVisitor)
}

fn id_from_number_or_string<'de, D>(de: D) -> Result<u64, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum NumOrString {
        Num(u64),
        Str(String),
    }

    match NumOrString::deserialize(de)? {
        NumOrString::Num(n) => Ok(n),
        NumOrString::Str(s) => s
            .trim()
            .parse::<u64>()
            .map_err(|_| de::Error::custom(format!("member id is not numeric: '{s}'"))),
    }
}

// ---------------------------------------------------------------------------
// Normalized entry
// ---------------------------------------------------------------------------

/// Completion state of one puzzle day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DayState {
    NotStarted,
    PartOne,
    BothParts,
}

/// One participant, normalized for a single cycle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    pub id: u64,
    /// `None` when the source had no name, a `null` name, or an empty name.
    pub name: Option<String>,
    pub score: i64,
    pub stars: u32,
    /// Days with at least one star. Days absent here are [`DayState::NotStarted`].
    pub days: BTreeMap<u32, DayState>,
}

impl Entry {
    pub fn day(&self, day: u32) -> DayState {
        self.days.get(&day).copied().unwrap_or(DayState::NotStarted)
    }

    /// Key used to order zero-star members.
    pub fn sort_name(&self) -> String {
        match self.name.as_deref() {
            Some(n) => n.to_string(),
            None => format!("Anonymous User #{}", self.id),
        }
    }

    /// Name shown in the rendered panel.
    pub fn display_name(&self) -> String {
        match self.name.as_deref() {
            Some(n) => n.to_string(),
            None => format!("(Anonymous User #{})", self.id),
        }
    }
}

impl From<&RawMember> for Entry {
    fn from(raw: &RawMember) -> Self {
        let days = raw
            .completion_day_level
            .iter()
            .filter_map(|(day, parts)| {
                let day = day.trim().parse::<u32>().ok()?;
                let state = if parts.contains_key("2") {
                    DayState::BothParts
                } else {
                    DayState::PartOne
                };
                Some((day, state))
            })
            .collect();

        Entry {
            id: raw.id,
            name: raw.name.clone().filter(|n| !n.is_empty()),
            score: raw.local_score,
            stars: raw.stars,
            days,
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    const DOC: &str = r#"{
        "event": "2024",
        "owner_id": 7,
        "members": {
            "900": {"id": 900, "name": "zed", "local_score": 10, "stars": 2,
                    "completion_day_level": {"1": {"1": {"get_star_ts": 1}, "2": {"get_star_ts": 2}}}},
            "12": {"id": "12", "name": null, "local_score": 0, "stars": 0,
                   "completion_day_level": {}},
            "450": {"id": 450, "name": "amy", "local_score": 5, "stars": 1,
                    "completion_day_level": {"3": {"1": {"get_star_ts": 9}}, "x": {}}}
        }
    }"#;

    #[test]
    fn members_keep_document_order() {
        let p = LeaderboardPayload::from_slice(DOC.as_bytes()).unwrap();
        let ids: Vec<u64> = p.members.iter().map(|m| m.id).collect();
        assert_eq!(ids, vec![900, 12, 450]);
        assert_eq!(p.event.as_deref(), Some("2024"));
    }

    #[test]
    fn string_ids_and_null_names_are_accepted() {
        let p = LeaderboardPayload::from_slice(DOC.as_bytes()).unwrap();
        let anon = Entry::from(&p.members[1]);
        assert_eq!(anon.id, 12);
        assert_eq!(anon.name, None);
        assert_eq!(anon.sort_name(), "Anonymous User #12");
        assert_eq!(anon.display_name(), "(Anonymous User #12)");
    }

    #[test]
    fn day_states_follow_part_two_marker() {
        let p = LeaderboardPayload::from_slice(DOC.as_bytes()).unwrap();
        let zed = Entry::from(&p.members[0]);
        assert_eq!(zed.day(1), DayState::BothParts);
        assert_eq!(zed.day(2), DayState::NotStarted);

        let amy = Entry::from(&p.members[2]);
        assert_eq!(amy.day(3), DayState::PartOne);
        // non-numeric day keys are ignored
        assert_eq!(amy.days.len(), 1);
    }

    #[test]
    fn empty_name_resolves_like_missing_name() {
        let e = Entry::from(&RawMember::new(5, Some(""), 0, 0));
        assert_eq!(e.name, None);
        assert_eq!(e.display_name(), "(Anonymous User #5)");
    }

    #[test]
    fn malformed_payload_is_a_payload_error() {
        let err = LeaderboardPayload::from_slice(br#"{"members": []}"#).unwrap_err();
        assert!(err.to_string().starts_with("leaderboard payload decode failed"));
    }

    #[test]
    fn with_day_builder_round_trips_through_entry() {
        let raw = RawMember::new(1, Some("a"), 3, 3)
            .with_day(1, DayState::BothParts)
            .with_day(2, DayState::PartOne)
            .with_day(3, DayState::PartOne)
            .with_day(3, DayState::NotStarted);
        let e = Entry::from(&raw);
        assert_eq!(e.day(1), DayState::BothParts);
        assert_eq!(e.day(2), DayState::PartOne);
        assert_eq!(e.day(3), DayState::NotStarted);
    }
}
