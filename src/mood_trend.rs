//! Per-day mood series over a trailing window, as plotted by the trend chart.

use crate::journal_entry::{JournalEntry, MoodLevel};
use chrono::{DateTime, Days, Local, NaiveDate, TimeZone};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartBucket {
    pub date: NaiveDate,
    pub value: f64,
}

/// How several entries on the same day are combined.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Averaging {
    /// Running pairwise fold `(v + mood) / 2` in encounter order. Later
    /// entries weigh more; this matches how the chart has always behaved.
    #[default]
    Pairwise,
    /// Arithmetic mean of the day's moods.
    Mean,
}

/// The windows offered by the chart.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub enum TrendWindow {
    #[default]
    Week,
    Fortnight,
    Month,
}

impl TrendWindow {
    pub fn days(self) -> u32 {
        match self {
            TrendWindow::Week => 7,
            TrendWindow::Fortnight => 14,
            TrendWindow::Month => 30,
        }
    }

    /// Cycles 7 -> 14 -> 30 -> 7.
    pub fn next(self) -> Self {
        match self {
            TrendWindow::Week => TrendWindow::Fortnight,
            TrendWindow::Fortnight => TrendWindow::Month,
            TrendWindow::Month => TrendWindow::Week,
        }
    }
}

impl TryFrom<u32> for TrendWindow {
    type Error = String;

    fn try_from(days: u32) -> Result<Self, Self::Error> {
        match days {
            7 => Ok(TrendWindow::Week),
            14 => Ok(TrendWindow::Fortnight),
            30 => Ok(TrendWindow::Month),
            other => Err(format!("trend window must be 7, 14 or 30 days, got {other}")),
        }
    }
}

impl From<TrendWindow> for u32 {
    fn from(window: TrendWindow) -> Self {
        window.days()
    }
}

impl fmt::Display for TrendWindow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} Days", self.days())
    }
}

/// Average mood per local calendar day for entries dated within
/// `[now - window_days, now]`. Days without entries are left out and the
/// result is ordered by date.
pub fn mood_trend(
    entries: &[JournalEntry],
    window_days: u32,
    now: DateTime<Local>,
    averaging: Averaging,
) -> Vec<ChartBucket> {
    mood_trend_in(
        entries.iter().map(|e| (e.date, e.mood)),
        window_days,
        now,
        averaging,
    )
}

/// [`mood_trend`] over timestamped moods in any zone. The window start is
/// `window_days` calendar days before the wall-clock time of `now`, so a
/// 23 or 25 hour day counts as one day. A window reaching past the earliest
/// representable date has no lower bound.
pub fn mood_trend_in<Tz: TimeZone>(
    samples: impl IntoIterator<Item = (DateTime<Tz>, MoodLevel)>,
    window_days: u32,
    now: DateTime<Tz>,
    averaging: Averaging,
) -> Vec<ChartBucket> {
    let start = now
        .naive_local()
        .checked_sub_days(Days::new(u64::from(window_days)));

    let mut days: BTreeMap<NaiveDate, Vec<u8>> = BTreeMap::new();
    for (date, mood) in samples {
        let after_start = start.map_or(true, |start| date.naive_local() >= start);
        if after_start && date <= now {
            days.entry(date.date_naive())
                .or_default()
                .push(mood.value());
        }
    }

    days.into_iter()
        .filter_map(|(date, moods)| {
            combine(&moods, averaging).map(|value| ChartBucket { date, value })
        })
        .collect()
}

fn combine(moods: &[u8], averaging: Averaging) -> Option<f64> {
    let (first, rest) = moods.split_first()?;
    let value = match averaging {
        Averaging::Pairwise => rest
            .iter()
            .fold(f64::from(*first), |acc, &m| (acc + f64::from(m)) / 2.0),
        Averaging::Mean => {
            moods.iter().map(|&m| f64::from(m)).sum::<f64>() / moods.len() as f64
        }
    };
    Some(value)
}
