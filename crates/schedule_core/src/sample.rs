//! crates/schedule_core/src/sample.rs
//!
//! The built-in three-day schedule that `initialize` installs.

use crate::domain::{Day, Event};

fn day(id: &str, label: &str, date: &str, events: Vec<Event>) -> Day {
    Day {
        id: id.to_string(),
        day: label.to_string(),
        date: date.to_string(),
        events,
    }
}

fn event(id: &str, time: &str, name: &str, link: Option<&str>, has_outline: bool) -> Event {
    Event::new(
        id.to_string(),
        time,
        name,
        link.map(str::to_string),
        Some(has_outline),
    )
}

/// Returns the fixed sample document. Every call yields identical content.
pub fn sample_schedule() -> Vec<Day> {
    vec![
        day(
            "1",
            "Day 1",
            "WEDNESDAY, 27TH DECEMBER 2023",
            vec![
                event(
                    "1-arrival-of-participants",
                    "12:00pm - 4:00pm (GMT +1)",
                    "Arrival of Participants",
                    None,
                    false,
                ),
                event(
                    "1-welcome-programme-movie-premiere",
                    "7:30pm - 10:30pm (GMT +1)",
                    "Welcome programme / Movie Premiere",
                    Some("https://www.youtube.com/live/kbTISnzSoeA?feature=shared"),
                    false,
                ),
            ],
        ),
        day(
            "2",
            "Day 2",
            "THURSDAY, 28TH DECEMBER 2023",
            vec![
                event(
                    "2-p-u-s-h",
                    "5:30am - 7:00am (GMT +1)",
                    "P.U.S.H",
                    Some("https://www.youtube.com/live/rnCSGMtxhSc?feature=shared"),
                    false,
                ),
                event(
                    "2-bible-study",
                    "9:30pm - 12:00pm (GMT +1)",
                    "Bible Study",
                    Some("https://www.youtube.com/live/dE3PmH2-JHg?feature=shared"),
                    true,
                ),
            ],
        ),
        day(
            "3",
            "Day 3",
            "FRIDAY, 29TH DECEMBER 2023",
            vec![
                event(
                    "3-p-u-s-h",
                    "5:30 - 7:00 (GMT +1)",
                    "P.U.S.H",
                    Some("https://www.youtube.com/live/Sr5SvTBszlI?feature=shared"),
                    false,
                ),
                event(
                    "3-symposium-aspire",
                    "09:30am - 12:00pm (GMT +1)",
                    "Symposium - ASPIRE",
                    Some("https://www.youtube.com/live/ZrHCG-1KUjo?feature=shared"),
                    true,
                ),
            ],
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::event_id;

    #[test]
    fn test_sample_ids_follow_generation_rules() {
        let days = sample_schedule();
        assert_eq!(days.len(), 3);
        for (index, day) in days.iter().enumerate() {
            assert_eq!(day.id, (index + 1).to_string());
            for event in &day.events {
                assert_eq!(event.id, event_id(&day.id, &event.name));
            }
        }
    }

    #[test]
    fn test_sample_outline_flags() {
        let days = sample_schedule();
        assert_eq!(days[0].events[0].has_outline, None);
        assert_eq!(days[0].events[0].link, None);
        assert_eq!(days[1].events[1].has_outline, Some(true));
    }
}
