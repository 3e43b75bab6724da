//! crates/schedule_core/src/domain.rs
//!
//! Defines the pure, core data structures for the schedule and the rules that
//! derive their identifiers. These structs are independent of any storage or
//! serialization format.

use regex::Regex;
use std::sync::LazyLock;

static NON_ALPHANUMERIC: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"[^a-z0-9]+").expect("slug pattern is a valid regex")
});

/// One calendar day of the conference.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Day {
    /// The day's 1-based position in the schedule, as a string.
    pub id: String,
    pub day: String,
    pub date: String,
    pub events: Vec<Event>,
}

/// A single scheduled activity within a day.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Event {
    /// `{day_id}-{slug(name)}`, plus a numeric suffix on sibling collisions.
    pub id: String,
    pub time: String,
    pub name: String,
    pub link: Option<String>,
    pub has_outline: Option<bool>,
}

impl Day {
    pub fn new(position: usize, day: impl Into<String>, date: impl Into<String>) -> Self {
        Self {
            id: day_id(position),
            day: day.into(),
            date: date.into(),
            events: Vec::new(),
        }
    }

    pub fn find_event(&self, event_id: &str) -> Option<&Event> {
        self.events.iter().find(|e| e.id == event_id)
    }

    pub fn find_event_mut(&mut self, event_id: &str) -> Option<&mut Event> {
        self.events.iter_mut().find(|e| e.id == event_id)
    }

    /// Generates an event id for `name` that no sibling uses.
    ///
    /// `ignore` names an event whose current id should not count as taken,
    /// which is what a rename needs.
    pub fn next_event_id(&self, name: &str, ignore: Option<&str>) -> String {
        self.free_event_id(event_id(&self.id, name), ignore)
    }

    /// Gives every event whose id repeats an earlier sibling's the first free
    /// numeric suffix. Returns `true` if any id was rewritten.
    pub fn dedupe_event_ids(&mut self) -> bool {
        let mut changed = false;
        for index in 1..self.events.len() {
            let id = &self.events[index].id;
            if !self.events[..index].iter().any(|e| &e.id == id) {
                continue;
            }
            let fresh = self.free_event_id(id.clone(), None);
            self.events[index].id = fresh;
            changed = true;
        }
        changed
    }

    /// Returns `base` if no sibling holds it, otherwise `base-2`, `base-3`, ….
    fn free_event_id(&self, base: String, ignore: Option<&str>) -> String {
        let taken = |candidate: &str| {
            self.events
                .iter()
                .any(|e| e.id == candidate && Some(e.id.as_str()) != ignore)
        };

        if !taken(&base) {
            return base;
        }
        let mut suffix = 2;
        loop {
            let candidate = format!("{}-{}", base, suffix);
            if !taken(&candidate) {
                return candidate;
            }
            suffix += 1;
        }
    }

    /// Moves the day to a new position, rewriting the day-id prefix of every
    /// event. Returns `true` if anything changed.
    fn reposition(&mut self, position: usize) -> bool {
        let new_id = day_id(position);
        if self.id == new_id {
            return false;
        }

        let old_prefix = format!("{}-", self.id);
        for event in &mut self.events {
            let rest = match event.id.strip_prefix(&old_prefix) {
                Some(rest) => rest.to_string(),
                None => slug(&event.name),
            };
            event.id = format!("{}-{}", new_id, rest);
        }
        self.id = new_id;
        true
    }
}

impl Event {
    /// Builds an event, normalising an empty link and a `false` outline flag
    /// to "absent".
    pub fn new(
        id: String,
        time: impl Into<String>,
        name: impl Into<String>,
        link: Option<String>,
        has_outline: Option<bool>,
    ) -> Self {
        Self {
            id,
            time: time.into(),
            name: name.into(),
            link: normalize_link(link),
            has_outline: normalize_outline(has_outline),
        }
    }
}

/// Lowercases `name`, collapses every run of characters outside `[a-z0-9]`
/// into one hyphen and trims hyphens from both ends.
///
/// `"Symposium - ASPIRE"` becomes `"symposium-aspire"`.
pub fn slug(name: &str) -> String {
    let lowered = name.to_lowercase();
    NON_ALPHANUMERIC
        .replace_all(&lowered, "-")
        .trim_matches('-')
        .to_string()
}

pub fn day_id(position: usize) -> String {
    position.to_string()
}

pub fn event_id(day_id: &str, name: &str) -> String {
    format!("{}-{}", day_id, slug(name))
}

/// Re-derives every day id from its 1-based position. Returns `true` if any
/// day (and therefore any event prefix) was rewritten.
pub fn renumber(days: &mut [Day]) -> bool {
    let mut changed = false;
    for (index, day) in days.iter_mut().enumerate() {
        changed |= day.reposition(index + 1);
    }
    changed
}

/// Makes event ids unique within every day. Returns `true` if any id changed.
pub fn dedupe_event_ids(days: &mut [Day]) -> bool {
    let mut changed = false;
    for day in days.iter_mut() {
        changed |= day.dedupe_event_ids();
    }
    changed
}

pub(crate) fn normalize_link(link: Option<String>) -> Option<String> {
    link.filter(|l| !l.trim().is_empty())
}

pub(crate) fn normalize_outline(has_outline: Option<bool>) -> Option<bool> {
    has_outline.filter(|flag| *flag)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn event(id: &str, name: &str) -> Event {
        Event::new(id.to_string(), "9:00", name, None, None)
    }

    #[test]
    fn test_slug() {
        assert_eq!(slug("P.U.S.H"), "p-u-s-h");
        assert_eq!(slug("Bible Study"), "bible-study");
        assert_eq!(slug("Symposium - ASPIRE"), "symposium-aspire");
        assert_eq!(slug("Welcome programme / Movie Premiere"), "welcome-programme-movie-premiere");
        assert_eq!(slug("  --Trailing!!  "), "trailing");
        assert_eq!(slug("!!!"), "");
    }

    #[test]
    fn test_event_id_uses_day_prefix() {
        assert_eq!(event_id("2", "Bible Study"), "2-bible-study");
    }

    #[test]
    fn test_next_event_id_appends_suffix_on_collision() {
        let mut day = Day::new(1, "Day 1", "Monday");
        assert_eq!(day.next_event_id("Lunch", None), "1-lunch");

        day.events.push(event("1-lunch", "Lunch"));
        assert_eq!(day.next_event_id("LUNCH", None), "1-lunch-2");

        day.events.push(event("1-lunch-2", "Lunch"));
        assert_eq!(day.next_event_id("Lunch!", None), "1-lunch-3");

        // A rename onto its own id is not a collision.
        assert_eq!(day.next_event_id("lunch", Some("1-lunch")), "1-lunch");
    }

    #[test]
    fn test_renumber_rewrites_event_prefixes() {
        let mut first = Day::new(1, "Day 1", "Mon");
        first.events.push(event("1-opening", "Opening"));
        let mut third = Day::new(3, "Day 3", "Wed");
        third.events.push(event("3-p-u-s-h", "P.U.S.H"));
        third.events.push(event("3-p-u-s-h-2", "P.U.S.H"));

        let mut days = vec![first.clone(), third];
        assert!(renumber(&mut days));

        assert_eq!(days[0], first);
        assert_eq!(days[1].id, "2");
        let ids: Vec<_> = days[1].events.iter().map(|e| e.id.as_str()).collect();
        assert_eq!(ids, vec!["2-p-u-s-h", "2-p-u-s-h-2"]);

        assert!(!renumber(&mut days));
    }

    #[test]
    fn test_dedupe_event_ids_suffixes_repeats() {
        let mut day = Day::new(1, "Day 1", "Mon");
        day.events.push(event("1-lunch", "Lunch"));
        day.events.push(event("1-lunch", "Lunch!"));
        day.events.push(event("1-lunch-2", "Lunch 2"));
        day.events.push(event("1-lunch", "LUNCH"));

        assert!(day.dedupe_event_ids());

        let ids: Vec<_> = day.events.iter().map(|e| e.id.as_str()).collect();
        assert_eq!(ids, vec!["1-lunch", "1-lunch-3", "1-lunch-2", "1-lunch-4"]);
        assert!(!day.dedupe_event_ids());
    }

    #[test]
    fn test_event_new_normalises_optional_fields() {
        let e = Event::new("1-x".into(), "t", "X", Some("  ".into()), Some(false));
        assert_eq!(e.link, None);
        assert_eq!(e.has_outline, None);

        let e = Event::new("1-x".into(), "t", "X", Some("https://a".into()), Some(true));
        assert_eq!(e.link.as_deref(), Some("https://a"));
        assert_eq!(e.has_outline, Some(true));
    }
}
