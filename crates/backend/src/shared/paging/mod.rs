//! Date-bucketed pagination over a remote query interface.
//!
//! Schedule tables page by *distinct schedule date*, not by raw row: one
//! page shows `page_size` dates' worth of rows, with every row sharing a
//! date kept together. The backing store only paginates by row range, so a
//! page is served in two phases — discover the candidate key set (key
//! column only), slice it to the requested window, then fetch full rows
//! restricted to the keys inside the window.

use anyhow::Result;
use async_trait::async_trait;
use chrono::NaiveDate;
use contracts::shared::table_query::{FilterSpec, GroupKey, PageWindow, SortSpec};

/// The slice of schedule-date buckets a row fetch is restricted to.
///
/// The undated bucket travels as an explicit flag rather than as a NULL in
/// `dated`: SQL `IN` cannot match a NULL member, so implementations emit
/// `date IN (..) OR date IS NULL` when `include_unscheduled` is set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyWindow {
    pub dated: Vec<NaiveDate>,
    pub include_unscheduled: bool,
}

impl KeyWindow {
    pub fn is_empty(&self) -> bool {
        self.dated.is_empty() && !self.include_unscheduled
    }
}

/// A register that can serve date-bucketed pages through two narrow queries.
///
/// Both methods receive the same `FilterSpec` from [`fetch_grouped_page`];
/// an implementation never sees different predicates in the two phases, so
/// bucket counts and fetched rows cannot drift apart — including when the
/// filter targets the group-key column itself.
#[async_trait]
pub trait GroupedQuery {
    type Row: Send;

    /// Phase one: the group-key column only, for every row matching
    /// `filters`. No pagination; duplicates are expected.
    async fn fetch_group_keys(&self, filters: &FilterSpec) -> Result<Vec<Option<NaiveDate>>>;

    /// Phase two: full rows matching `filters`, restricted to `window`.
    ///
    /// With `sort` absent the implementation must return rows in its
    /// default order: schedule date ascending with the undated bucket
    /// last, then a stable secondary key.
    async fn fetch_rows(
        &self,
        filters: &FilterSpec,
        window: &KeyWindow,
        sort: Option<&SortSpec>,
    ) -> Result<Vec<Self::Row>>;
}

/// One page of rows where the pagination unit is a distinct schedule date.
#[derive(Debug)]
pub struct GroupedPage<R> {
    pub rows: Vec<R>,
    /// Distinct group keys under the current filters; the undated bucket
    /// counts once. Page count is `ceil(total_groups / page_size)`.
    pub total_groups: u64,
}

/// Serve one date-bucketed page. A window past the last group yields an
/// empty page (with the true group count), never an error; a failure in
/// either phase aborts the whole call with no partial result.
pub async fn fetch_grouped_page<Q>(
    source: &Q,
    filters: &FilterSpec,
    sort: Option<&SortSpec>,
    page: PageWindow,
) -> Result<GroupedPage<Q::Row>>
where
    Q: GroupedQuery + Sync,
{
    let keys = source.fetch_group_keys(filters).await?;

    let mut unique: Vec<GroupKey> = keys.into_iter().map(GroupKey::from_date).collect();
    unique.sort();
    unique.dedup();

    let total_groups = unique.len() as u64;

    let start = page.offset();
    if start >= unique.len() {
        return Ok(GroupedPage {
            rows: Vec::new(),
            total_groups,
        });
    }
    let end = start
        .saturating_add(page.page_size as usize)
        .min(unique.len());
    let window_keys = &unique[start..end];

    let window = KeyWindow {
        dated: window_keys.iter().filter_map(GroupKey::date).collect(),
        include_unscheduled: window_keys.contains(&GroupKey::Unscheduled),
    };

    let rows = source.fetch_rows(filters, &window, sort).await?;
    Ok(GroupedPage { rows, total_groups })
}

#[cfg(test)]
mod tests {
    use super::*;
    use contracts::shared::table_query::Condition;

    #[derive(Debug, Clone, PartialEq)]
    struct MemRow {
        date: Option<NaiveDate>,
        dealer: &'static str,
        qty: f64,
    }

    /// In-memory stand-in for a register view: honors dealer equality and
    /// schedule-date range filters the way the remote interface would.
    struct MemRegister {
        rows: Vec<MemRow>,
    }

    impl MemRegister {
        fn matches(&self, row: &MemRow, filters: &FilterSpec) -> bool {
            filters.conditions().iter().all(|fc| {
                match (fc.field.as_str(), &fc.condition) {
                    ("dealer", Condition::Equals { value }) => row.dealer == value,
                    ("schedule_date", Condition::Range { from, to }) => {
                        let Some(date) = row.date else {
                            // A range predicate on the date column excludes
                            // undated rows, as SQL comparisons with NULL do.
                            return false;
                        };
                        let iso = date.format("%Y-%m-%d").to_string();
                        from.as_ref().map_or(true, |f| iso.as_str() >= f.as_str())
                            && to.as_ref().map_or(true, |t| iso.as_str() <= t.as_str())
                    }
                    _ => panic!("filter not supported by test register: {}", fc.field),
                }
            })
        }
    }

    #[async_trait]
    impl GroupedQuery for MemRegister {
        type Row = MemRow;

        async fn fetch_group_keys(&self, filters: &FilterSpec) -> Result<Vec<Option<NaiveDate>>> {
            Ok(self
                .rows
                .iter()
                .filter(|r| self.matches(r, filters))
                .map(|r| r.date)
                .collect())
        }

        async fn fetch_rows(
            &self,
            filters: &FilterSpec,
            window: &KeyWindow,
            _sort: Option<&SortSpec>,
        ) -> Result<Vec<MemRow>> {
            let mut rows: Vec<MemRow> = self
                .rows
                .iter()
                .filter(|r| self.matches(r, filters))
                .filter(|r| match r.date {
                    Some(d) => window.dated.contains(&d),
                    None => window.include_unscheduled,
                })
                .cloned()
                .collect();
            rows.sort_by_key(|r| GroupKey::from_date(r.date));
            Ok(rows)
        }
    }

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn register() -> MemRegister {
        MemRegister {
            rows: vec![
                MemRow {
                    date: Some(date("2024-01-10")),
                    dealer: "Maple & Co",
                    qty: 5.0,
                },
                MemRow {
                    date: Some(date("2024-01-10")),
                    dealer: "Heartwood",
                    qty: 3.0,
                },
                MemRow {
                    date: None,
                    dealer: "Maple & Co",
                    qty: 2.0,
                },
                MemRow {
                    date: Some(date("2024-01-05")),
                    dealer: "Heartwood",
                    qty: 1.0,
                },
            ],
        }
    }

    #[tokio::test]
    async fn total_groups_is_independent_of_page_size() {
        let source = register();
        let filters = FilterSpec::new();
        for page_size in [1, 2, 10] {
            let page = fetch_grouped_page(
                &source,
                &filters,
                None,
                PageWindow::new(0, page_size),
            )
            .await
            .unwrap();
            assert_eq!(page.total_groups, 3, "page_size={}", page_size);
        }
    }

    #[tokio::test]
    async fn adjacent_pages_partition_the_key_set() {
        let source = register();
        let filters = FilterSpec::new();
        let mut seen: Vec<Option<NaiveDate>> = Vec::new();

        for page_index in 0..3 {
            let page = fetch_grouped_page(
                &source,
                &filters,
                None,
                PageWindow::new(page_index, 1),
            )
            .await
            .unwrap();
            let mut page_keys: Vec<Option<NaiveDate>> =
                page.rows.iter().map(|r| r.date).collect();
            page_keys.dedup();
            for key in &page_keys {
                assert!(!seen.contains(key), "key leaked across pages: {:?}", key);
            }
            seen.extend(page_keys);
        }

        assert_eq!(
            seen,
            vec![Some(date("2024-01-05")), Some(date("2024-01-10")), None]
        );
    }

    #[tokio::test]
    async fn unscheduled_bucket_pages_last() {
        let source = register();
        let filters = FilterSpec::new();
        let last = fetch_grouped_page(&source, &filters, None, PageWindow::new(2, 1))
            .await
            .unwrap();
        assert_eq!(last.rows.len(), 1);
        assert_eq!(last.rows[0].date, None);
    }

    #[tokio::test]
    async fn page_past_the_end_is_empty_not_an_error() {
        let source = register();
        let filters = FilterSpec::new();
        let page = fetch_grouped_page(&source, &filters, None, PageWindow::new(9, 2))
            .await
            .unwrap();
        assert!(page.rows.is_empty());
        assert_eq!(page.total_groups, 3);
    }

    #[tokio::test]
    async fn filters_constrain_both_phases() {
        let source = register();
        let filters = FilterSpec::new().equals("dealer", "Heartwood");
        let page = fetch_grouped_page(&source, &filters, None, PageWindow::new(0, 10))
            .await
            .unwrap();
        // Heartwood has rows on two dates and none unscheduled.
        assert_eq!(page.total_groups, 2);
        assert!(page.rows.iter().all(|r| r.dealer == "Heartwood"));
    }

    #[tokio::test]
    async fn group_key_filter_applies_to_key_discovery_too() {
        let source = register();
        let filters = FilterSpec::new().range(
            "schedule_date",
            Some("2024-01-06".into()),
            Some("2024-01-31".into()),
        );
        let page = fetch_grouped_page(&source, &filters, None, PageWindow::new(0, 10))
            .await
            .unwrap();
        // Only 2024-01-10 survives: the range excludes 01-05 and, like any
        // SQL comparison, the undated rows.
        assert_eq!(page.total_groups, 1);
        assert_eq!(page.rows.len(), 2);
        assert!(page.rows.iter().all(|r| r.date == Some(date("2024-01-10"))));
    }

    /// The concrete end-to-end scenario: four rows over two dates plus an
    /// undated one, paged one date at a time.
    #[tokio::test]
    async fn one_date_per_page_scenario() {
        let source = register();
        let filters = FilterSpec::new();
        let first = fetch_grouped_page(&source, &filters, None, PageWindow::new(0, 1))
            .await
            .unwrap();
        assert_eq!(first.total_groups, 3);
        assert_eq!(first.rows.len(), 1);
        assert_eq!(first.rows[0].date, Some(date("2024-01-05")));
        assert_eq!(first.rows[0].qty, 1.0);
    }
}
