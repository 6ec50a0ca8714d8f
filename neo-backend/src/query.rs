///! Query engine
///!
///! `query` walks the approach collection lazily; `limit` caps how many
///! results are pulled from any iterator.

use crate::database::{ApproachView, NeoDatabase};
use crate::filters::FilterSet;

impl NeoDatabase {
    /// Approaches matching every filter, in storage order.
    ///
    /// Nothing is evaluated until the iterator is polled, and each call
    /// starts a fresh scan.
    pub fn query<'a>(&'a self, filters: &'a FilterSet) -> impl Iterator<Item = ApproachView<'a>> + 'a {
        self.approaches().filter(move |approach| {
            filters.matches(approach.record(), approach.neo().map(|neo| neo.record()))
        })
    }
}

/// Yield at most `n` items; `None` or `Some(0)` means no limit.
///
/// Only the first `n` items are pulled from upstream.
pub fn limit<I>(items: I, n: Option<usize>) -> std::iter::Take<I::IntoIter>
where
    I: IntoIterator,
{
    let n = match n {
        Some(n) if n > 0 => n,
        _ => usize::MAX,
    };
    items.into_iter().take(n)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filters::{ApproachFilter, Comparison, FilterCriteria, create_filters};
    use neo_common::{CloseApproach, NearEarthObject};
    use std::cell::Cell;

    fn sample_db() -> NeoDatabase {
        let neos = vec![
            NearEarthObject::from_fields("433", "Eros", "16.84", "N"),
            NearEarthObject::from_fields("2020 AB", "", "", "Y"),
            NearEarthObject::from_fields("99942", "Apophis", "0.37", "Y"),
        ];
        let approaches = vec![
            CloseApproach::new("433", "1900-Dec-27 01:30", 0.3149, 5.9904).unwrap(),
            CloseApproach::new("2020 AB", "1969-Jul-29 22:56", 0.0921, 16.7523).unwrap(),
            CloseApproach::new("99942", "2029-Apr-13 21:46", 0.00025, 7.42).unwrap(),
            CloseApproach::new("2015 CL", "1969-Jul-29 03:10", 0.19, 9.1).unwrap(),
            CloseApproach::new("433", "1931-Jan-30 04:07", 0.1744, 5.9170).unwrap(),
        ];
        NeoDatabase::new(neos, approaches)
    }

    fn designations<'a>(results: impl Iterator<Item = ApproachView<'a>>) -> Vec<&'a str> {
        results.map(|a| a.record().designation()).collect()
    }

    #[test]
    fn test_empty_filter_set_returns_everything_in_order() {
        let db = sample_db();
        let filters = FilterSet::new();
        let all: Vec<_> = db.query(&filters).collect();
        let expected: Vec<_> = db.approaches().collect();
        assert_eq!(all, expected);
    }

    #[test]
    fn test_query_by_date() {
        let db = sample_db();
        let criteria = FilterCriteria {
            date: Some("1969-07-29".into()),
            ..Default::default()
        };
        let filters = create_filters(&criteria).unwrap();
        assert_eq!(designations(db.query(&filters)), vec!["2020 AB", "2015 CL"]);

        let criteria = FilterCriteria {
            date: Some("1969-07-28".into()),
            ..Default::default()
        };
        let filters = create_filters(&criteria).unwrap();
        assert_eq!(db.query(&filters).count(), 0);
    }

    #[test]
    fn test_query_date_and_range_are_anded() {
        let db = sample_db();
        let criteria = FilterCriteria {
            date: Some("1969-07-29".into()),
            start_date: Some("1970-01-01".into()),
            ..Default::default()
        };
        let filters = create_filters(&criteria).unwrap();
        assert_eq!(db.query(&filters).count(), 0);
    }

    #[test]
    fn test_query_by_date_range() {
        let db = sample_db();
        let criteria = FilterCriteria {
            start_date: Some("1920-01-01".into()),
            end_date: Some("1970-01-01".into()),
            ..Default::default()
        };
        let filters = create_filters(&criteria).unwrap();
        assert_eq!(designations(db.query(&filters)), vec!["2020 AB", "2015 CL", "433"]);
    }

    #[test]
    fn test_query_diameter_excludes_unknown_and_orphans() {
        let db = sample_db();
        let criteria = FilterCriteria {
            diameter_min: Some("1.0".into()),
            ..Default::default()
        };
        let filters = create_filters(&criteria).unwrap();
        assert_eq!(designations(db.query(&filters)), vec!["433", "433"]);
    }

    #[test]
    fn test_query_hazardous() {
        let db = sample_db();
        let hazardous = FilterSet::new().with(ApproachFilter::Hazardous(true));
        assert_eq!(designations(db.query(&hazardous)), vec!["2020 AB", "99942"]);

        let safe = FilterSet::new().with(ApproachFilter::Hazardous(false));
        assert_eq!(designations(db.query(&safe)), vec!["433", "433"]);
    }

    #[test]
    fn test_query_combined() {
        let db = sample_db();
        let filters = FilterSet::new()
            .with(ApproachFilter::Distance(Comparison::Le, 0.2))
            .with(ApproachFilter::Velocity(Comparison::Ge, 7.0));
        assert_eq!(designations(db.query(&filters)), vec!["2020 AB", "99942", "2015 CL"]);
    }

    #[test]
    fn test_query_is_restartable() {
        let db = sample_db();
        let filters = FilterSet::new().with(ApproachFilter::Distance(Comparison::Lt, 0.2));
        let first: Vec<_> = db.query(&filters).collect();
        let second: Vec<_> = db.query(&filters).collect();
        assert_eq!(first, second);
        assert_eq!(first.len(), 4);
    }

    #[test]
    fn test_limit_is_prefix() {
        let db = sample_db();
        let filters = FilterSet::new();
        let all: Vec<_> = db.query(&filters).collect();
        let limited: Vec<_> = limit(db.query(&filters), Some(3)).collect();
        assert_eq!(limited.len(), 3);
        assert_eq!(limited[..], all[..3]);
    }

    #[test]
    fn test_limit_zero_or_none_is_unlimited() {
        let db = sample_db();
        let filters = FilterSet::new();
        assert_eq!(limit(db.query(&filters), None).count(), 5);
        assert_eq!(limit(db.query(&filters), Some(0)).count(), 5);
        assert_eq!(limit(db.query(&filters), Some(50)).count(), 5);
    }

    #[test]
    fn test_limit_does_not_pull_past_n() {
        let pulled = Cell::new(0);
        let upstream = (0..).inspect(|_| pulled.set(pulled.get() + 1));
        let taken: Vec<u64> = limit(upstream, Some(3)).collect();
        assert_eq!(taken, vec![0, 1, 2]);
        assert_eq!(pulled.get(), 3);
    }
}
