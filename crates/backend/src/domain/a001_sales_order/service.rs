use anyhow::Result;
use chrono::NaiveDate;
use contracts::domain::a001_sales_order::{SalesOrder, SalesOrderStatus};

use super::repository;
use crate::projections::p900_production_schedule::repository as p900;
use crate::projections::p901_plant_service_orders::repository as p901;
use crate::projections::p902_backorders::repository as p902;

fn date(s: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").ok()
}

/// Seed a handful of demo orders with matching schedule, service and
/// backorder rows. Intentionally includes an unscheduled line and a
/// malformed box count so the grouped views and reports show their
/// edge-case handling straight away.
pub async fn insert_test_data() -> Result<usize> {
    let mut created = 0usize;

    let orders = [
        ("SO-1001", "Maple & Co", "Smith kitchen", 18_450.0),
        ("SO-1002", "Heartwood Kitchens", "Alder galley remodel", 9_320.0),
        ("SO-1003", "Maple & Co", "Nguyen remodel", 21_700.0),
        (
            "SO-1004",
            "Cascade Cabinet Supply",
            "Lakehouse butler pantry",
            6_150.0,
        ),
    ];

    for (code, dealer, job, amount) in orders {
        let mut order = SalesOrder::new_for_insert(
            code.to_string(),
            format!("{}, {}", dealer, job),
            dealer.to_string(),
            job.to_string(),
            None,
        );
        order.status = SalesOrderStatus::Released;
        order.total_amount = amount;
        order.promised_date = Some("2024-06-28".to_string());
        order.before_write();
        repository::upsert(&order).await?;
        created += 1;
    }

    let schedule_rows = [
        // (order_no, line_id, dealer, style, finish, boxes, schedule, ship, status)
        (
            "SO-1001",
            "1",
            "Maple & Co",
            "Shaker",
            Some("Natural maple"),
            Some("12"),
            date("2024-06-10"),
            date("2024-06-14"),
            "in_production",
        ),
        (
            "SO-1001",
            "2",
            "Maple & Co",
            "Shaker",
            Some("Natural maple"),
            Some("8"),
            date("2024-06-10"),
            date("2024-06-14"),
            "in_production",
        ),
        (
            "SO-1002",
            "1",
            "Heartwood Kitchens",
            "Slab",
            Some("Walnut veneer"),
            Some("n/a"),
            date("2024-06-12"),
            None,
            "released",
        ),
        (
            "SO-1003",
            "1",
            "Maple & Co",
            "Raised panel",
            Some("Cherry stain"),
            Some("15"),
            None,
            None,
            "entered",
        ),
        (
            "SO-1004",
            "1",
            "Cascade Cabinet Supply",
            "Shaker",
            None,
            Some("4"),
            date("2024-06-12"),
            date("2024-06-18"),
            "released",
        ),
    ];

    for (order_no, line_id, dealer, style, finish, boxes, schedule, ship, status) in schedule_rows {
        p900::upsert_row(&p900::ScheduleEntry {
            order_no: order_no.to_string(),
            line_id: line_id.to_string(),
            dealer: dealer.to_string(),
            style: style.to_string(),
            finish: finish.map(str::to_string),
            box_count: boxes.map(str::to_string),
            schedule_date: schedule,
            ship_date: ship,
            status: status.to_string(),
            sales_order_ref: None,
        })
        .await?;
        created += 1;
    }

    let service_rows = [
        (
            "SV-201",
            "SO-0987",
            "Heartwood Kitchens",
            "Freight damage",
            Some("2 door fronts, 1 end panel"),
            Some("3"),
            date("2024-06-11"),
            "scheduled",
        ),
        (
            "SV-202",
            "SO-1001",
            "Maple & Co",
            "Wrong hinge boring",
            Some("4 doors"),
            Some("1"),
            None,
            "awaiting_parts",
        ),
    ];

    for (service_no, order_no, dealer, reason, parts, boxes, service_date, status) in service_rows {
        p901::upsert_row(&p901::ServiceOrderEntry {
            service_no: service_no.to_string(),
            order_no: order_no.to_string(),
            dealer: dealer.to_string(),
            reason: reason.to_string(),
            parts_summary: parts.map(str::to_string),
            box_count: boxes.map(str::to_string),
            service_date,
            status: status.to_string(),
        })
        .await?;
        created += 1;
    }

    let backorder_rows = [
        (
            "SO-1002",
            "HNG-110",
            "Soft-close hinge, 110°",
            48.0,
            0.0,
            "Blum",
            date("2024-06-20"),
            "open",
        ),
        (
            "SO-1003",
            "DRW-18U",
            "18in undermount drawer slide",
            24.0,
            12.0,
            "Salice",
            date("2024-06-17"),
            "partial",
        ),
        (
            "SO-1004",
            "PNL-END",
            "Finished end panel, shaker",
            2.0,
            0.0,
            "In-house mill",
            None,
            "open",
        ),
    ];

    for (order_no, item_code, description, ordered, received, vendor, expected, status) in
        backorder_rows
    {
        p902::upsert_row(&p902::BackorderEntry {
            order_no: order_no.to_string(),
            item_code: item_code.to_string(),
            description: description.to_string(),
            qty_ordered: ordered,
            qty_received: received,
            vendor: vendor.to_string(),
            expected_date: expected,
            status: status.to_string(),
        })
        .await?;
        created += 1;
    }

    Ok(created)
}
