//! Filtering and sorting of in-memory record sets.
//!
//! Stages run in a fixed order: tab, categorical facets, free-text search,
//! date range. Each stage only narrows the set, so the final result does not
//! depend on that order; the order is kept for parity with how views read.

use std::cmp::Ordering;

use chrono::{Datelike, Days, NaiveDate};

use super::page::{Page, paginate};
use super::state::{Facet, FilterState};
use super::Choice;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Asc,
    Desc,
}

impl SortDirection {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "asc" => Some(SortDirection::Asc),
            "desc" => Some(SortDirection::Desc),
            _ => None,
        }
    }
}

/// Calendar windows for views that filter on a date.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateRange {
    Today,
    ThisWeek,
    ThisMonth,
    Upcoming,
    Past,
}

impl DateRange {
    /// `None` for empty or unrecognised values, which leave the set unfiltered.
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim() {
            "today" => Some(DateRange::Today),
            "this_week" => Some(DateRange::ThisWeek),
            "this_month" => Some(DateRange::ThisMonth),
            "upcoming" => Some(DateRange::Upcoming),
            "past" => Some(DateRange::Past),
            _ => None,
        }
    }

    pub fn contains(self, date: NaiveDate, today: NaiveDate) -> bool {
        match self {
            DateRange::Today => date == today,
            DateRange::ThisWeek => {
                let (start, end) = week_bounds(today);
                date >= start && date <= end
            }
            DateRange::ThisMonth => date.year() == today.year() && date.month() == today.month(),
            DateRange::Upcoming => date >= today,
            DateRange::Past => date < today,
        }
    }
}

/// Monday through Sunday of the ISO week containing `day`.
pub fn week_bounds(day: NaiveDate) -> (NaiveDate, NaiveDate) {
    let offset = u64::from(day.weekday().num_days_from_monday());
    let start = day - Days::new(offset);
    (start, start + Days::new(6))
}

/// Binds a record type to the tabs, facets, search fields and sort keys a
/// list view offers.
pub trait ListView {
    type Record;
    type Tab: Choice;
    type SortKey: Choice;

    fn tab_contains(tab: Self::Tab, record: &Self::Record) -> bool;

    /// Wire value of a categorical field, or `None` when the view has no such facet.
    fn facet(record: &Self::Record, facet: Facet) -> Option<&str>;

    /// The one to three fields free-text search looks at.
    fn search_fields(record: &Self::Record) -> Vec<&str>;

    fn date_of(_record: &Self::Record) -> Option<NaiveDate> {
        None
    }

    fn natural_direction(key: Self::SortKey) -> SortDirection;

    /// Ascending comparison for `key`.
    fn compare(key: Self::SortKey, a: &Self::Record, b: &Self::Record) -> Ordering;
}

pub fn tab_matches<V: ListView>(record: &V::Record, state: &FilterState) -> bool {
    V::tab_contains(V::Tab::parse_or_default(&state.active_tab), record)
}

pub fn facets_match<V: ListView>(record: &V::Record, state: &FilterState) -> bool {
    [Facet::Status, Facet::Category, Facet::Level]
        .into_iter()
        .all(|facet| match state.facet(facet) {
            None => true,
            Some(wanted) => V::facet(record, facet).is_some_and(|v| v.eq_ignore_ascii_case(wanted)),
        })
}

pub fn search_matches<V: ListView>(record: &V::Record, state: &FilterState) -> bool {
    match state.search_term() {
        None => true,
        Some(term) => {
            let needle = term.to_lowercase();
            V::search_fields(record)
                .into_iter()
                .any(|field| field.to_lowercase().contains(&needle))
        }
    }
}

pub fn date_matches<V: ListView>(record: &V::Record, state: &FilterState, today: NaiveDate) -> bool {
    match DateRange::parse(&state.date_range) {
        None => true,
        Some(range) => V::date_of(record).is_some_and(|date| range.contains(date, today)),
    }
}

pub fn filter_records<V: ListView>(
    records: Vec<V::Record>,
    state: &FilterState,
    today: NaiveDate,
) -> Vec<V::Record> {
    records
        .into_iter()
        .filter(|r| tab_matches::<V>(r, state))
        .filter(|r| facets_match::<V>(r, state))
        .filter(|r| search_matches::<V>(r, state))
        .filter(|r| date_matches::<V>(r, state, today))
        .collect()
}

/// Stable sort; unknown keys use the view's default key.
pub fn sort_records<V: ListView>(records: &mut [V::Record], state: &FilterState) {
    let key = V::SortKey::parse_or_default(&state.sort_by);
    let direction =
        SortDirection::parse(&state.sort_direction).unwrap_or_else(|| V::natural_direction(key));

    records.sort_by(|a, b| {
        let ord = V::compare(key, a, b);
        match direction {
            SortDirection::Asc => ord,
            SortDirection::Desc => ord.reverse(),
        }
    });
}

/// Filter, sort and paginate in one go.
pub fn run<V: ListView>(
    records: Vec<V::Record>,
    state: &FilterState,
    today: NaiveDate,
    per_page: u32,
) -> Page<V::Record> {
    let mut matched = filter_records::<V>(records, state, today);
    sort_records::<V>(&mut matched, state);
    paginate(matched, state.page(), per_page)
}

pub fn compare_text(a: &str, b: &str) -> Ordering {
    a.to_lowercase().cmp(&b.to_lowercase())
}

pub fn compare_f64(a: f64, b: f64) -> Ordering {
    a.total_cmp(&b)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::listing::choice_enum;

    #[derive(Debug, Clone, PartialEq)]
    struct Item {
        name: &'static str,
        kind: &'static str,
        score: i32,
        on: NaiveDate,
    }

    choice_enum! {
        ItemTab { All => "all", Even => "even" }
    }

    choice_enum! {
        ItemSort { Score => "score", Name => "name" }
    }

    struct Items;

    impl ListView for Items {
        type Record = Item;
        type Tab = ItemTab;
        type SortKey = ItemSort;

        fn tab_contains(tab: ItemTab, record: &Item) -> bool {
            match tab {
                ItemTab::All => true,
                ItemTab::Even => record.score % 2 == 0,
            }
        }

        fn facet(record: &Item, facet: Facet) -> Option<&str> {
            match facet {
                Facet::Category => Some(record.kind),
                _ => None,
            }
        }

        fn search_fields(record: &Item) -> Vec<&str> {
            vec![record.name]
        }

        fn date_of(record: &Item) -> Option<NaiveDate> {
            Some(record.on)
        }

        fn natural_direction(key: ItemSort) -> SortDirection {
            match key {
                ItemSort::Score => SortDirection::Desc,
                ItemSort::Name => SortDirection::Asc,
            }
        }

        fn compare(key: ItemSort, a: &Item, b: &Item) -> Ordering {
            match key {
                ItemSort::Score => a.score.cmp(&b.score),
                ItemSort::Name => compare_text(a.name, b.name),
            }
        }
    }

    fn day(s: &str) -> NaiveDate {
        s.parse().unwrap()
    }

    fn items() -> Vec<Item> {
        vec![
            Item { name: "alpha", kind: "a", score: 2, on: day("2025-03-03") },
            Item { name: "Beta", kind: "b", score: 3, on: day("2025-03-09") },
            Item { name: "gamma", kind: "a", score: 2, on: day("2025-03-10") },
            Item { name: "delta", kind: "b", score: 4, on: day("2025-02-28") },
        ]
    }

    #[test]
    fn week_starts_on_monday() {
        // 2025-03-06 is a Thursday.
        assert_eq!(week_bounds(day("2025-03-06")), (day("2025-03-03"), day("2025-03-09")));
        assert_eq!(week_bounds(day("2025-03-03")), (day("2025-03-03"), day("2025-03-09")));
        assert_eq!(week_bounds(day("2025-03-09")), (day("2025-03-03"), day("2025-03-09")));
    }

    #[test]
    fn date_ranges_use_calendar_boundaries() {
        let mut state = FilterState::default();
        let today = day("2025-03-06");

        state.set_date_range("this_week");
        let names: Vec<_> = filter_records::<Items>(items(), &state, today)
            .into_iter()
            .map(|i| i.name)
            .collect();
        assert_eq!(names, vec!["alpha", "Beta"]);

        state.set_date_range("this_month");
        let names: Vec<_> = filter_records::<Items>(items(), &state, today)
            .into_iter()
            .map(|i| i.name)
            .collect();
        assert_eq!(names, vec!["alpha", "Beta", "gamma"]);
    }

    #[test]
    fn search_is_case_insensitive_substring() {
        let mut state = FilterState::default();
        state.set_search("ETA");
        let names: Vec<_> = filter_records::<Items>(items(), &state, day("2025-03-06"))
            .into_iter()
            .map(|i| i.name)
            .collect();
        assert_eq!(names, vec!["Beta"]);
    }

    #[test]
    fn facet_missing_on_view_excludes_everything() {
        let mut state = FilterState::default();
        state.set_filter(Facet::Level, "beginner");
        assert!(filter_records::<Items>(items(), &state, day("2025-03-06")).is_empty());
    }

    #[test]
    fn unknown_sort_key_uses_default_and_keeps_ties_in_order() {
        let mut state = FilterState::default();
        state.set_sort("nonsense", "");
        let mut records = items();
        sort_records::<Items>(&mut records, &state);
        let names: Vec<_> = records.iter().map(|i| i.name).collect();
        assert_eq!(names, vec!["delta", "Beta", "alpha", "gamma"]);
    }

    #[test]
    fn explicit_direction_overrides_natural_one() {
        let mut state = FilterState::default();
        state.set_sort("score", "asc");
        let mut records = items();
        sort_records::<Items>(&mut records, &state);
        let names: Vec<_> = records.iter().map(|i| i.name).collect();
        assert_eq!(names, vec!["alpha", "gamma", "Beta", "delta"]);
    }

    #[test]
    fn run_paginates_after_sorting() {
        let mut state = FilterState::default();
        state.set_tab("even");
        state.set_sort("name", "");
        let page = run::<Items>(items(), &state, day("2025-03-06"), 2);
        let names: Vec<_> = page.items.iter().map(|i| i.name).collect();
        assert_eq!(names, vec!["alpha", "delta"]);
        assert_eq!(page.total, 3);
        assert_eq!(page.last_page, 2);
    }
}
