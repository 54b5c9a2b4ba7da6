use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use strum::{Display, EnumIter, EnumString, IntoEnumIterator, IntoStaticStr};
use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum EntryError {
    #[error("mood must be between 1 and 5, got {0}")]
    MoodOutOfRange(i64),
    #[error("unknown emotion '{0}'")]
    UnknownEmotion(String),
    #[error("entry content cannot be empty")]
    EmptyContent,
}

/// A mood on the 1 (very bad) to 5 (very good) scale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "u8")]
pub struct MoodLevel(u8);

impl MoodLevel {
    pub const MIN: u8 = 1;
    pub const MAX: u8 = 5;

    pub fn new(value: u8) -> Result<Self, EntryError> {
        Self::try_from(i64::from(value))
    }

    pub fn value(self) -> u8 {
        self.0
    }

    pub fn all() -> impl Iterator<Item = MoodLevel> {
        (Self::MIN..=Self::MAX).map(MoodLevel)
    }

    pub fn label(self) -> &'static str {
        match self.0 {
            1 => "Very Bad",
            2 => "Bad",
            3 => "Neutral",
            4 => "Good",
            _ => "Very Good",
        }
    }

    pub fn emoji(self) -> &'static str {
        match self.0 {
            1 => "😞",
            2 => "😕",
            3 => "😐",
            4 => "🙂",
            _ => "😄",
        }
    }

    /// One step up the scale, saturating at 5.
    pub fn raise(self) -> Self {
        MoodLevel((self.0 + 1).min(Self::MAX))
    }

    /// One step down the scale, saturating at 1.
    pub fn lower(self) -> Self {
        MoodLevel((self.0 - 1).max(Self::MIN))
    }
}

impl Default for MoodLevel {
    fn default() -> Self {
        MoodLevel(3)
    }
}

impl TryFrom<i64> for MoodLevel {
    type Error = EntryError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        if (i64::from(Self::MIN)..=i64::from(Self::MAX)).contains(&value) {
            Ok(MoodLevel(value as u8))
        } else {
            Err(EntryError::MoodOutOfRange(value))
        }
    }
}

impl From<MoodLevel> for u8 {
    fn from(mood: MoodLevel) -> Self {
        mood.0
    }
}

impl fmt::Display for MoodLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.emoji(), self.label())
    }
}

/// Label for an averaged mood value as plotted on the trend chart.
pub fn mood_label_for_value(value: f64) -> &'static str {
    if value >= 4.5 {
        "Very Good"
    } else if value >= 3.5 {
        "Good"
    } else if value >= 2.5 {
        "Neutral"
    } else if value >= 1.5 {
        "Bad"
    } else {
        "Very Bad"
    }
}

#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    EnumIter,
    IntoStaticStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum EmotionTag {
    Happy,
    Sad,
    Anxious,
    Calm,
    Angry,
    Excited,
    Tired,
    Motivated,
    Stressed,
    Relaxed,
    Grateful,
    Frustrated,
}

impl EmotionTag {
    pub fn label(self) -> &'static str {
        self.into()
    }

    pub fn emoji(self) -> &'static str {
        match self {
            EmotionTag::Happy => "😊",
            EmotionTag::Sad => "😢",
            EmotionTag::Anxious => "😰",
            EmotionTag::Calm => "😌",
            EmotionTag::Angry => "😠",
            EmotionTag::Excited => "🤩",
            EmotionTag::Tired => "😴",
            EmotionTag::Motivated => "💪",
            EmotionTag::Stressed => "😫",
            EmotionTag::Relaxed => "🧘",
            EmotionTag::Grateful => "🙏",
            EmotionTag::Frustrated => "😤",
        }
    }
}

pub type Emotions = BTreeSet<EmotionTag>;

/// Parses comma separated emotion labels, skipping blanks.
pub fn parse_emotions(input: &str) -> Result<Emotions, EntryError> {
    input
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| {
            s.parse::<EmotionTag>()
                .map_err(|_| EntryError::UnknownEmotion(s.to_string()))
        })
        .collect()
}

pub fn format_emotions(emotions: &Emotions) -> String {
    emotions
        .iter()
        .map(|e| e.label())
        .collect::<Vec<_>>()
        .join(", ")
}

/// Every label in vocabulary order, for prompts.
pub fn emotion_vocabulary() -> Vec<EmotionTag> {
    EmotionTag::iter().collect()
}

/// Rejects content that is blank once trimmed. The store accepts anything;
/// this is for input forms.
pub fn validate_content(content: &str) -> Result<(), EntryError> {
    if content.trim().is_empty() {
        Err(EntryError::EmptyContent)
    } else {
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JournalEntry {
    pub id: String,
    pub date: DateTime<Local>,
    pub content: String,
    pub mood: MoodLevel,
    #[serde(default)]
    pub emotions: Emotions,
}

impl JournalEntry {
    pub fn from_new(entry: NewEntry) -> Self {
        JournalEntry {
            id: Uuid::new_v4().to_string(),
            date: entry.date,
            content: entry.content,
            mood: entry.mood,
            emotions: entry.emotions,
        }
    }

    pub fn apply(&mut self, patch: EntryPatch) {
        if let Some(date) = patch.date {
            self.date = date;
        }
        if let Some(content) = patch.content {
            self.content = content;
        }
        if let Some(mood) = patch.mood {
            self.mood = mood;
        }
        if let Some(emotions) = patch.emotions {
            self.emotions = emotions;
        }
    }

    pub fn headline(&self) -> &str {
        self.content.lines().next().unwrap_or("")
    }
}

/// An entry as submitted for creation, before an id is minted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewEntry {
    pub date: DateTime<Local>,
    pub content: String,
    pub mood: MoodLevel,
    #[serde(default)]
    pub emotions: Emotions,
}

impl NewEntry {
    pub fn new(content: String, mood: MoodLevel, emotions: Emotions) -> Self {
        NewEntry {
            date: Local::now(),
            content,
            mood,
            emotions,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EntryPatch {
    pub date: Option<DateTime<Local>>,
    pub content: Option<String>,
    pub mood: Option<MoodLevel>,
    pub emotions: Option<Emotions>,
}

impl EntryPatch {
    pub fn mood(mood: MoodLevel) -> Self {
        EntryPatch {
            mood: Some(mood),
            ..Default::default()
        }
    }

    /// A full rewrite as done by the edit form, which also stamps the edit time.
    pub fn rewrite(content: String, mood: MoodLevel, emotions: Emotions) -> Self {
        EntryPatch {
            date: Some(Local::now()),
            content: Some(content),
            mood: Some(mood),
            emotions: Some(emotions),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mood_rejects_out_of_range() {
        assert_eq!(MoodLevel::new(0), Err(EntryError::MoodOutOfRange(0)));
        assert_eq!(MoodLevel::new(6), Err(EntryError::MoodOutOfRange(6)));
        assert_eq!(MoodLevel::new(5).map(MoodLevel::value), Ok(5));
        assert_eq!(MoodLevel::all().count(), 5);
    }

    #[test]
    fn mood_deserialization_is_range_checked() {
        assert!(serde_json::from_str::<MoodLevel>("4").is_ok());
        assert!(serde_json::from_str::<MoodLevel>("9").is_err());
        assert!(serde_json::from_str::<MoodLevel>("-1").is_err());
        assert_eq!(serde_json::to_string(&MoodLevel::default()).unwrap(), "3");
    }

    #[test]
    fn mood_steps_saturate() {
        let top = MoodLevel::new(5).unwrap();
        let bottom = MoodLevel::new(1).unwrap();
        assert_eq!(top.raise(), top);
        assert_eq!(bottom.lower(), bottom);
        assert_eq!(bottom.raise().value(), 2);
    }

    #[test]
    fn emotions_parse_case_insensitively_and_dedupe() {
        let emotions = parse_emotions("Happy, calm ,happy,,GRATEFUL").unwrap();
        assert_eq!(emotions.len(), 3);
        assert!(emotions.contains(&EmotionTag::Grateful));
        assert_eq!(format_emotions(&emotions), "happy, calm, grateful");
    }

    #[test]
    fn unknown_emotion_is_rejected() {
        assert_eq!(
            parse_emotions("happy, bored"),
            Err(EntryError::UnknownEmotion("bored".to_string()))
        );
    }

    #[test]
    fn vocabulary_has_twelve_labels() {
        assert_eq!(emotion_vocabulary().len(), 12);
        assert_eq!(
            serde_json::to_string(&EmotionTag::Frustrated).unwrap(),
            "\"frustrated\""
        );
    }

    #[test]
    fn blank_content_fails_validation() {
        assert_eq!(validate_content("  \n "), Err(EntryError::EmptyContent));
        assert!(validate_content("slept well").is_ok());
    }

    #[test]
    fn chart_labels_follow_thresholds() {
        assert_eq!(mood_label_for_value(4.5), "Very Good");
        assert_eq!(mood_label_for_value(3.5), "Good");
        assert_eq!(mood_label_for_value(3.0), "Neutral");
        assert_eq!(mood_label_for_value(1.5), "Bad");
        assert_eq!(mood_label_for_value(1.0), "Very Bad");
    }

    #[test]
    fn patch_only_touches_given_fields() {
        let mut entry = JournalEntry::from_new(NewEntry::new(
            "walk in the park".to_string(),
            MoodLevel::new(2).unwrap(),
            parse_emotions("calm").unwrap(),
        ));
        let before = entry.clone();
        entry.apply(EntryPatch::mood(MoodLevel::new(5).unwrap()));

        assert_eq!(entry.mood.value(), 5);
        assert_eq!(entry.id, before.id);
        assert_eq!(entry.date, before.date);
        assert_eq!(entry.content, before.content);
        assert_eq!(entry.emotions, before.emotions);
    }

    #[test]
    fn missing_emotions_default_to_empty() {
        let json = r#"{"id":"a","date":"2024-03-01T10:00:00Z","content":"x","mood":3}"#;
        let entry: JournalEntry = serde_json::from_str(json).unwrap();
        assert!(entry.emotions.is_empty());
    }
}
