//! Print composition for register reports.
//!
//! Takes an already-fetched row list, groups it by schedule date, and
//! flattens the groups into fixed-capacity pages of typed blocks. Only row
//! blocks count against the page capacity; a page that continues a split
//! group reopens with the group header and column header so every physical
//! page is self-describing. A row block is never split across pages.

use std::collections::BTreeMap;

use contracts::shared::report::{ReportBlock, ReportDocument, ReportPage, ReportRow};
use contracts::shared::table_query::GroupKey;

/// Parse a quantity field leniently. Register loads carry box counts as
/// free text, and a malformed count must never block a report: anything
/// unparsable contributes zero.
fn parse_quantity(raw: Option<&str>) -> f64 {
    raw.and_then(|s| s.trim().parse::<f64>().ok()).unwrap_or(0.0)
}

/// Group, order and chunk `rows` into printable pages.
///
/// Groups are ordered by [`GroupKey`] (dates ascending, the undated bucket
/// last — the same rule the bucketed pagination layer applies), and row
/// order within a group is the input order. Zero input rows produce a
/// single page carrying only a no-data marker so the renderer always has
/// something to draw.
pub fn paginate_for_print(rows: &[ReportRow], items_per_page: usize) -> Vec<ReportPage> {
    let items_per_page = items_per_page.max(1);

    if rows.is_empty() {
        return vec![ReportPage {
            blocks: vec![ReportBlock::NoData],
        }];
    }

    // BTreeMap orders the groups; pushing preserves first-seen row order
    // within each group.
    let mut groups: BTreeMap<GroupKey, Vec<&ReportRow>> = BTreeMap::new();
    for row in rows {
        groups
            .entry(GroupKey::parse(row.group_date.as_deref()))
            .or_default()
            .push(row);
    }

    let mut pages: Vec<ReportPage> = Vec::new();
    let mut blocks: Vec<ReportBlock> = Vec::new();
    let mut rows_on_page = 0usize;

    for (key, bucket) in &groups {
        let label = key.label();

        // Never open a group on a page that has no room for its first row.
        if rows_on_page == items_per_page {
            pages.push(ReportPage {
                blocks: std::mem::take(&mut blocks),
            });
            rows_on_page = 0;
        }

        blocks.push(ReportBlock::GroupHeader {
            label: label.clone(),
        });
        blocks.push(ReportBlock::ColumnHeader);

        let mut total = 0.0;
        for row in bucket {
            if rows_on_page == items_per_page {
                pages.push(ReportPage {
                    blocks: std::mem::take(&mut blocks),
                });
                rows_on_page = 0;
                // Continuation page: the group reintroduces itself.
                blocks.push(ReportBlock::GroupHeader {
                    label: label.clone(),
                });
                blocks.push(ReportBlock::ColumnHeader);
            }
            blocks.push(ReportBlock::Row { row: (*row).clone() });
            rows_on_page += 1;
            total += parse_quantity(row.quantity.as_deref());
        }

        blocks.push(ReportBlock::GroupFooter {
            label: label.clone(),
            total,
        });
    }

    if !blocks.is_empty() {
        pages.push(ReportPage { blocks });
    }
    pages
}

/// Flatten a composed report into CSV for the spreadsheet surface.
pub fn report_to_csv(document: &ReportDocument) -> anyhow::Result<String> {
    let mut writer = csv::WriterBuilder::new()
        .flexible(true)
        .from_writer(Vec::new());

    for page in &document.pages {
        for block in &page.blocks {
            match block {
                ReportBlock::GroupHeader { label } => {
                    writer.write_record([label.as_str()])?;
                }
                ReportBlock::ColumnHeader => {
                    writer.write_record(&document.column_titles)?;
                }
                ReportBlock::Row { row } => {
                    let mut record: Vec<&str> =
                        row.columns.iter().map(String::as_str).collect();
                    let quantity = row.quantity.as_deref().unwrap_or("");
                    record.push(quantity);
                    writer.write_record(record)?;
                }
                ReportBlock::GroupFooter { label, total } => {
                    let footer = format!("Total {}", label);
                    let total = format!("{}", total);
                    writer.write_record([footer.as_str(), total.as_str()])?;
                }
                ReportBlock::NoData => {
                    writer.write_record(["No data for the selected filters"])?;
                }
            }
        }
    }

    let bytes = writer
        .into_inner()
        .map_err(|e| anyhow::anyhow!("csv flush failed: {}", e))?;
    Ok(String::from_utf8(bytes)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(group_date: Option<&str>, order_no: &str, qty: Option<&str>) -> ReportRow {
        ReportRow {
            group_date: group_date.map(str::to_string),
            columns: vec![order_no.to_string()],
            quantity: qty.map(str::to_string),
        }
    }

    fn row_blocks(pages: &[ReportPage]) -> Vec<&ReportRow> {
        pages
            .iter()
            .flat_map(|p| &p.blocks)
            .filter_map(|b| match b {
                ReportBlock::Row { row } => Some(row),
                _ => None,
            })
            .collect()
    }

    fn footer_totals(pages: &[ReportPage]) -> Vec<f64> {
        pages
            .iter()
            .flat_map(|p| &p.blocks)
            .filter_map(|b| match b {
                ReportBlock::GroupFooter { total, .. } => Some(*total),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn empty_input_yields_a_single_no_data_page() {
        let pages = paginate_for_print(&[], 24);
        assert_eq!(pages.len(), 1);
        assert_eq!(pages[0].blocks, vec![ReportBlock::NoData]);
    }

    #[test]
    fn groups_are_ordered_with_unscheduled_last() {
        let rows = vec![
            row(None, "SO-3", Some("2")),
            row(Some("2024-01-10"), "SO-1", Some("5")),
            row(Some("2024-01-05"), "SO-2", Some("1")),
        ];
        let pages = paginate_for_print(&rows, 24);
        let labels: Vec<&str> = pages
            .iter()
            .flat_map(|p| &p.blocks)
            .filter_map(|b| match b {
                ReportBlock::GroupHeader { label } => Some(label.as_str()),
                _ => None,
            })
            .collect();
        assert_eq!(labels, vec!["2024-01-05", "2024-01-10", "Unscheduled"]);
    }

    #[test]
    fn every_row_survives_chunking_in_group_order() {
        let rows = vec![
            row(Some("2024-02-01"), "SO-1", Some("1")),
            row(Some("2024-02-01"), "SO-2", Some("1")),
            row(Some("2024-02-01"), "SO-3", Some("1")),
            row(Some("2024-01-15"), "SO-4", Some("1")),
            row(None, "SO-5", Some("1")),
            row(Some("2024-01-15"), "SO-6", Some("1")),
            row(Some("2024-02-01"), "SO-7", Some("1")),
        ];
        let pages = paginate_for_print(&rows, 3);

        // No page carries more than three row blocks.
        for page in &pages {
            let count = page
                .blocks
                .iter()
                .filter(|b| matches!(b, ReportBlock::Row { .. }))
                .count();
            assert!(count <= 3);
        }

        // Reassembled order: groups sorted, insertion order within a group.
        let orders: Vec<&str> = row_blocks(&pages)
            .iter()
            .map(|r| r.columns[0].as_str())
            .collect();
        assert_eq!(
            orders,
            vec!["SO-4", "SO-6", "SO-1", "SO-2", "SO-3", "SO-7", "SO-5"]
        );
    }

    #[test]
    fn a_continued_group_reopens_with_both_headers() {
        let rows = vec![
            row(Some("2024-03-01"), "SO-1", Some("1")),
            row(Some("2024-03-01"), "SO-2", Some("1")),
            row(Some("2024-03-01"), "SO-3", Some("1")),
        ];
        let pages = paginate_for_print(&rows, 2);
        assert_eq!(pages.len(), 2);
        assert_eq!(
            pages[1].blocks[0],
            ReportBlock::GroupHeader {
                label: "2024-03-01".to_string()
            }
        );
        assert_eq!(pages[1].blocks[1], ReportBlock::ColumnHeader);
    }

    #[test]
    fn malformed_quantities_total_as_zero() {
        let good = vec![
            row(Some("2024-01-10"), "SO-1", Some("5")),
            row(Some("2024-01-10"), "SO-2", Some("0")),
        ];
        let bad = vec![
            row(Some("2024-01-10"), "SO-1", Some("5")),
            row(Some("2024-01-10"), "SO-2", Some("n/a")),
        ];
        assert_eq!(
            footer_totals(&paginate_for_print(&good, 24)),
            footer_totals(&paginate_for_print(&bad, 24))
        );
        assert_eq!(footer_totals(&paginate_for_print(&bad, 24)), vec![5.0]);
    }

    #[test]
    fn mixed_dated_and_undated_rows_compose_one_page() {
        let rows = vec![
            row(Some("2024-01-10"), "SO-1", Some("5")),
            row(Some("2024-01-10"), "SO-2", Some("3")),
            row(None, "SO-3", Some("2")),
            row(Some("2024-01-05"), "SO-4", Some("1")),
        ];
        let pages = paginate_for_print(&rows, 10);
        assert_eq!(pages.len(), 1);

        let orders: Vec<&str> = row_blocks(&pages)
            .iter()
            .map(|r| r.columns[0].as_str())
            .collect();
        assert_eq!(orders, vec!["SO-4", "SO-1", "SO-2", "SO-3"]);
        assert_eq!(footer_totals(&pages), vec![1.0, 8.0, 2.0]);
    }

    #[test]
    fn csv_flattens_blocks_in_page_order() {
        let rows = vec![
            row(Some("2024-01-05"), "SO-4", Some("1")),
            row(None, "SO-3", Some("bad")),
        ];
        let pages = paginate_for_print(&rows, 10);
        let document = ReportDocument {
            title: "Production Schedule".to_string(),
            column_titles: vec!["Order".to_string(), "Boxes".to_string()],
            total_rows: rows.len(),
            pages,
        };
        let csv = report_to_csv(&document).unwrap();
        let lines: Vec<&str> = csv.lines().collect();
        assert_eq!(
            lines,
            vec![
                "2024-01-05",
                "Order,Boxes",
                "SO-4,1",
                "Total 2024-01-05,1",
                "Unscheduled",
                "Order,Boxes",
                "SO-3,bad",
                "Total Unscheduled,0",
            ]
        );
    }
}
