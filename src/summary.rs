use crate::filter::FilteredView;
use crate::types::{Period, Record};
use crate::util::median;

#[derive(Debug, Clone, PartialEq)]
pub struct LatestSummary<'a> {
    pub period: Period,
    pub time_label: String,
    pub rows: Vec<&'a Record>,
    pub sector_count: usize,
    pub median: f64,
}

/// Headline numbers for the most recent period of a view.
#[derive(Debug, Clone, PartialEq)]
pub enum Summary<'a> {
    /// The filter combination matched no rows.
    NoData,
    Latest(LatestSummary<'a>),
}

pub fn summarize<'a>(view: &FilteredView<'a>) -> Summary<'a> {
    let Some(latest_year) = view.rows().iter().map(|r| r.year).max() else {
        return Summary::NoData;
    };
    let Some(latest_q) = view
        .rows()
        .iter()
        .filter(|r| r.year == latest_year)
        .map(|r| r.quarter_order)
        .max()
    else {
        return Summary::NoData;
    };
    let period = Period::new(latest_year, latest_q);
    let rows = view.rows_at(period);
    let Some(median) = median(rows.iter().map(|r| r.value).collect()) else {
        return Summary::NoData;
    };
    let time_label = rows
        .first()
        .map(|r| r.time_label.clone())
        .unwrap_or_else(|| period.to_string());

    Summary::Latest(LatestSummary {
        period,
        time_label,
        sector_count: rows.len(),
        rows,
        median,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filter::filter;
    use crate::types::test_support::rec;

    fn all(v: &[&str]) -> Vec<String> {
        v.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn empty_view_reports_no_data() {
        let records = vec![rec(2023, 1, "ADHB", "A", 1.0)];
        let view = filter(&records, "ADHB", &all(&["Z"]));
        assert_eq!(summarize(&view), Summary::NoData);
    }

    #[test]
    fn picks_lexicographically_latest_period() {
        let records = vec![
            rec(2022, 4, "ADHB", "A", 100.0),
            rec(2023, 1, "ADHB", "A", 10.0),
            rec(2023, 1, "ADHB", "B", 30.0),
            rec(2023, 1, "ADHB", "C", 20.0),
            rec(2022, 3, "ADHB", "B", 999.0),
        ];
        let view = filter(&records, "ADHB", &all(&["A", "B", "C"]));
        let Summary::Latest(s) = summarize(&view) else {
            panic!("expected a summary");
        };
        assert_eq!(s.period, Period::new(2023, 1));
        assert_eq!(s.time_label, "2023 Q1");
        assert_eq!(s.sector_count, 3);
        assert_eq!(s.median, 20.0);
        assert!(s.rows.iter().all(|r| r.period() == s.period));
    }

    #[test]
    fn higher_quarter_in_earlier_year_does_not_win() {
        let records = vec![
            rec(2022, 4, "ADHB", "A", 1.0),
            rec(2023, 2, "ADHB", "A", 2.0),
            rec(2023, 2, "ADHB", "B", 4.0),
        ];
        let view = filter(&records, "ADHB", &all(&["A", "B"]));
        let Summary::Latest(s) = summarize(&view) else {
            panic!("expected a summary");
        };
        assert_eq!(s.period, Period::new(2023, 2));
        assert_eq!(s.median, 3.0);
    }
}
