// Release Schedule Module
//
// Groups ongoing anime by their weekly release day. The catalog reports the
// day as an Indonesian day name ("Senin", "Selasa", ...); only exact names
// (after trimming) are accepted, everything else is left off the schedule.

use crate::gateway::AnimeSummary;

/// Canonical release days, in rendering order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Weekday {
    Minggu,
    Senin,
    Selasa,
    Rabu,
    Kamis,
    Jumat,
    Sabtu,
}

impl Weekday {
    pub const ALL: [Weekday; 7] = [
        Weekday::Minggu,
        Weekday::Senin,
        Weekday::Selasa,
        Weekday::Rabu,
        Weekday::Kamis,
        Weekday::Jumat,
        Weekday::Sabtu,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Weekday::Minggu => "Minggu",
            Weekday::Senin => "Senin",
            Weekday::Selasa => "Selasa",
            Weekday::Rabu => "Rabu",
            Weekday::Kamis => "Kamis",
            Weekday::Jumat => "Jumat",
            Weekday::Sabtu => "Sabtu",
        }
    }

    /// Exact, case-sensitive match on the day name. Callers trim first.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|day| day.as_str() == name)
    }

    /// Lowercase name, used for section anchors.
    pub fn slug(&self) -> String {
        self.as_str().to_lowercase()
    }
}

impl std::fmt::Display for Weekday {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// The fields a schedule card needs.
#[derive(Debug, Clone, PartialEq)]
pub struct ScheduleEntry {
    pub anime_id: String,
    pub title: String,
    pub poster: Option<String>,
    pub episodes: Option<String>,
    pub latest_release_date: Option<String>,
}

impl From<&AnimeSummary> for ScheduleEntry {
    fn from(anime: &AnimeSummary) -> Self {
        Self {
            anime_id: anime.anime_id.clone(),
            title: anime.title.clone(),
            poster: anime.poster.clone(),
            episodes: anime.episodes.clone(),
            latest_release_date: anime.latest_release_date.clone(),
        }
    }
}

impl From<&ScheduleEntry> for AnimeSummary {
    fn from(entry: &ScheduleEntry) -> Self {
        AnimeSummary {
            anime_id: entry.anime_id.clone(),
            title: entry.title.clone(),
            poster: entry.poster.clone(),
            episodes: entry.episodes.clone(),
            latest_release_date: entry.latest_release_date.clone(),
            ..AnimeSummary::default()
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ScheduleDay {
    pub day: Weekday,
    pub anime_list: Vec<ScheduleEntry>,
}

/// Bucket anime by release day, in canonical day order, dropping days that
/// end up empty. Anime with an absent, blank or unknown day are skipped.
pub fn group_by_release_day(anime_list: &[AnimeSummary]) -> Vec<ScheduleDay> {
    let mut buckets: Vec<ScheduleDay> = Weekday::ALL
        .into_iter()
        .map(|day| ScheduleDay {
            day,
            anime_list: Vec::new(),
        })
        .collect();

    for anime in anime_list {
        let Some(day) = anime
            .release_day
            .as_deref()
            .map(str::trim)
            .and_then(Weekday::from_name)
        else {
            continue;
        };

        if let Some(bucket) = buckets.iter_mut().find(|b| b.day == day) {
            bucket.anime_list.push(ScheduleEntry::from(anime));
        }
    }

    buckets.retain(|bucket| !bucket.anime_list.is_empty());
    buckets
}
