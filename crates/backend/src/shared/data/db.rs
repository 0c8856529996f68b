use once_cell::sync::OnceCell;
use sea_orm::{ConnectionTrait, Database, DatabaseBackend, DatabaseConnection, Statement};

static DB_CONN: OnceCell<DatabaseConnection> = OnceCell::new();

/// Minimal schema bootstrap: every table the backend serves, created only
/// when missing. Register tables are denormalized loads, so no migrations
/// beyond create-if-absent are needed.
const TABLES: &[(&str, &str)] = &[
    (
        "a001_sales_order",
        r#"
        CREATE TABLE a001_sales_order (
            id TEXT PRIMARY KEY NOT NULL,
            code TEXT NOT NULL DEFAULT '',
            description TEXT NOT NULL,
            comment TEXT,
            dealer TEXT NOT NULL,
            job_name TEXT NOT NULL,
            status TEXT NOT NULL DEFAULT 'entered',
            promised_date TEXT,
            total_amount REAL NOT NULL DEFAULT 0,
            is_deleted INTEGER NOT NULL DEFAULT 0,
            created_at TEXT,
            updated_at TEXT,
            version INTEGER NOT NULL DEFAULT 0
        );
    "#,
    ),
    (
        "p900_production_schedule",
        r#"
        CREATE TABLE p900_production_schedule (
            order_no TEXT NOT NULL,
            line_id TEXT NOT NULL,
            dealer TEXT NOT NULL,
            style TEXT NOT NULL,
            finish TEXT,
            box_count TEXT,
            schedule_date TEXT,
            ship_date TEXT,
            status TEXT NOT NULL,
            sales_order_ref TEXT,
            loaded_at_utc TEXT NOT NULL,
            PRIMARY KEY (order_no, line_id)
        );
    "#,
    ),
    (
        "p901_plant_service_orders",
        r#"
        CREATE TABLE p901_plant_service_orders (
            service_no TEXT PRIMARY KEY NOT NULL,
            order_no TEXT NOT NULL,
            dealer TEXT NOT NULL,
            reason TEXT NOT NULL,
            parts_summary TEXT,
            box_count TEXT,
            service_date TEXT,
            status TEXT NOT NULL,
            loaded_at_utc TEXT NOT NULL
        );
    "#,
    ),
    (
        "p902_backorders",
        r#"
        CREATE TABLE p902_backorders (
            order_no TEXT NOT NULL,
            item_code TEXT NOT NULL,
            description TEXT NOT NULL,
            qty_ordered REAL NOT NULL DEFAULT 0,
            qty_received REAL NOT NULL DEFAULT 0,
            vendor TEXT NOT NULL,
            expected_date TEXT,
            status TEXT NOT NULL,
            loaded_at_utc TEXT NOT NULL,
            PRIMARY KEY (order_no, item_code)
        );
    "#,
    ),
];

pub async fn initialize_database(db_path: Option<&str>) -> anyhow::Result<()> {
    let db_file = db_path.unwrap_or("target/db/cabinet_ops.db");
    if let Some(parent) = std::path::Path::new(db_file).parent() {
        std::fs::create_dir_all(parent)?;
    }
    let absolute_path = if std::path::Path::new(db_file).is_absolute() {
        std::path::PathBuf::from(db_file)
    } else {
        std::env::current_dir()?.join(db_file)
    };
    // Normalize path separators and ensure proper URL form on Windows
    let normalized = absolute_path.to_string_lossy().replace('\\', "/");
    let needs_leading_slash = !normalized.starts_with('/') && normalized.contains(':');
    let prefix = if needs_leading_slash { "/" } else { "" };
    let db_url = format!("sqlite://{}{}?mode=rwc", prefix, normalized);
    let conn = Database::connect(&db_url).await?;

    for (name, ddl) in TABLES {
        ensure_table(&conn, name, ddl).await?;
    }

    DB_CONN
        .set(conn)
        .map_err(|_| anyhow::anyhow!("Failed to set DB_CONN"))?;
    Ok(())
}

async fn ensure_table(conn: &DatabaseConnection, name: &str, ddl: &str) -> anyhow::Result<()> {
    let check = format!(
        "SELECT name FROM sqlite_master WHERE type='table' AND name='{}';",
        name
    );
    let existing = conn
        .query_all(Statement::from_string(DatabaseBackend::Sqlite, check))
        .await?;

    if existing.is_empty() {
        tracing::info!("Creating {} table", name);
        conn.execute(Statement::from_string(
            DatabaseBackend::Sqlite,
            ddl.to_string(),
        ))
        .await?;
    }
    Ok(())
}

pub fn get_connection() -> &'static DatabaseConnection {
    DB_CONN
        .get()
        .expect("Database connection has not been initialized")
}
