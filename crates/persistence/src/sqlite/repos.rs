//! Repository implementations cho SQLite
//!
//! Mọi repo nhận `&mut SqliteConnection`: cùng một call chạy được trên
//! connection lấy từ pool hoặc bên trong một transaction đang mở.

use crate::error::{PersistenceError, PersistenceResult};
use crate::sqlite::schema::*;
use chrono::Utc;
use fueleu_core::{
    BankEntry, ComplianceRecord, NewBankEntry, NewComplianceRecord, Pool, PoolMember, Route,
};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::{Connection, SqliteConnection, SqlitePool};
use std::str::FromStr;

// ============================================================================
// Route Repository
// ============================================================================

/// Repository cho routes table
pub struct RouteRepo;

impl RouteRepo {
    /// Lấy tất cả routes theo id
    pub async fn find_all(conn: &mut SqliteConnection) -> PersistenceResult<Vec<Route>> {
        let rows = sqlx::query_as::<_, RouteRow>("SELECT * FROM routes ORDER BY id")
            .fetch_all(&mut *conn)
            .await?;
        convert_all(rows)
    }

    /// Lấy route theo numeric id
    pub async fn find_by_id(conn: &mut SqliteConnection, id: i64) -> PersistenceResult<Option<Route>> {
        let row = sqlx::query_as::<_, RouteRow>("SELECT * FROM routes WHERE id = ?")
            .bind(id)
            .fetch_optional(&mut *conn)
            .await?;
        row.map(Route::try_from).transpose()
    }

    /// Lấy route theo route_id (e.g., R001)
    pub async fn find_by_route_id(
        conn: &mut SqliteConnection,
        route_id: &str,
    ) -> PersistenceResult<Option<Route>> {
        let row = sqlx::query_as::<_, RouteRow>("SELECT * FROM routes WHERE route_id = ?")
            .bind(route_id)
            .fetch_optional(&mut *conn)
            .await?;
        row.map(Route::try_from).transpose()
    }

    /// Lấy baseline route hiện tại
    pub async fn find_baseline(conn: &mut SqliteConnection) -> PersistenceResult<Option<Route>> {
        let row = sqlx::query_as::<_, RouteRow>("SELECT * FROM routes WHERE is_baseline = 1")
            .fetch_optional(&mut *conn)
            .await?;
        row.map(Route::try_from).transpose()
    }

    /// Chuyển baseline sang route `id`: clear baseline cũ và set mới trong
    /// cùng một transaction.
    pub async fn set_baseline(conn: &mut SqliteConnection, id: i64) -> PersistenceResult<Route> {
        let mut tx = conn.begin().await?;

        sqlx::query("UPDATE routes SET is_baseline = 0 WHERE is_baseline = 1")
            .execute(&mut *tx)
            .await?;

        let result = sqlx::query("UPDATE routes SET is_baseline = 1 WHERE id = ?")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        if result.rows_affected() == 0 {
            // tx drop -> rollback, baseline cũ giữ nguyên
            return Err(PersistenceError::not_found("Route", id));
        }

        let row = sqlx::query_as::<_, RouteRow>("SELECT * FROM routes WHERE id = ?")
            .bind(id)
            .fetch_one(&mut *tx)
            .await?;

        tx.commit().await?;
        Route::try_from(row)
    }

    /// Insert hoặc update theo route_id.
    ///
    /// `is_baseline` của input bị bỏ qua: route mới luôn insert với false,
    /// update không đụng tới cột này. Baseline chỉ đổi qua `set_baseline`.
    pub async fn save(conn: &mut SqliteConnection, route: &Route) -> PersistenceResult<Route> {
        sqlx::query(
            r#"
            INSERT INTO routes (route_id, vessel_type, fuel_type, year, ghg_intensity,
                                fuel_consumption, distance, total_emissions, is_baseline)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
            ON CONFLICT(route_id) DO UPDATE SET
                vessel_type = excluded.vessel_type,
                fuel_type = excluded.fuel_type,
                year = excluded.year,
                ghg_intensity = excluded.ghg_intensity,
                fuel_consumption = excluded.fuel_consumption,
                distance = excluded.distance,
                total_emissions = excluded.total_emissions
            "#,
        )
        .bind(&route.route_id)
        .bind(&route.vessel_type)
        .bind(&route.fuel_type)
        .bind(route.year)
        .bind(route.ghg_intensity.to_string())
        .bind(route.fuel_consumption.to_string())
        .bind(route.distance.to_string())
        .bind(route.total_emissions.to_string())
        .bind(false)
        .execute(&mut *conn)
        .await?;

        Self::find_by_route_id(conn, &route.route_id)
            .await?
            .ok_or_else(|| PersistenceError::not_found("Route", &route.route_id))
    }

    /// Đếm routes
    pub async fn count(conn: &mut SqliteConnection) -> PersistenceResult<i64> {
        let row: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM routes")
            .fetch_one(&mut *conn)
            .await?;
        Ok(row.0)
    }
}

// ============================================================================
// Compliance Repository
// ============================================================================

/// Repository cho ship_compliance table (append-only)
pub struct ComplianceRepo;

impl ComplianceRepo {
    /// Thêm record mới, không bao giờ update record cũ
    pub async fn create(
        conn: &mut SqliteConnection,
        record: &NewComplianceRecord,
    ) -> PersistenceResult<ComplianceRecord> {
        let created_at = Utc::now();
        let result = sqlx::query(
            "INSERT INTO ship_compliance (ship_id, year, cb_gco2eq, created_at) VALUES (?, ?, ?, ?)",
        )
        .bind(&record.ship_id)
        .bind(record.year)
        .bind(record.cb_gco2eq.to_string())
        .bind(created_at)
        .execute(&mut *conn)
        .await?;

        Ok(ComplianceRecord {
            id: result.last_insert_rowid(),
            ship_id: record.ship_id.clone(),
            year: record.year,
            cb_gco2eq: record.cb_gco2eq,
            created_at,
        })
    }

    /// Record mới nhất của ship/year
    pub async fn find_by_ship_and_year(
        conn: &mut SqliteConnection,
        ship_id: &str,
        year: i32,
    ) -> PersistenceResult<Option<ComplianceRecord>> {
        let row = sqlx::query_as::<_, ComplianceRow>(
            r#"
            SELECT * FROM ship_compliance
            WHERE ship_id = ? AND year = ?
            ORDER BY created_at DESC, id DESC
            LIMIT 1
            "#,
        )
        .bind(ship_id)
        .bind(year)
        .fetch_optional(&mut *conn)
        .await?;
        row.map(ComplianceRecord::try_from).transpose()
    }

    /// Toàn bộ history của ship/year, mới nhất trước
    pub async fn find_history(
        conn: &mut SqliteConnection,
        ship_id: &str,
        year: i32,
    ) -> PersistenceResult<Vec<ComplianceRecord>> {
        let rows = sqlx::query_as::<_, ComplianceRow>(
            r#"
            SELECT * FROM ship_compliance
            WHERE ship_id = ? AND year = ?
            ORDER BY created_at DESC, id DESC
            "#,
        )
        .bind(ship_id)
        .bind(year)
        .fetch_all(&mut *conn)
        .await?;
        convert_all(rows)
    }

    /// Lấy tất cả records
    pub async fn find_all(conn: &mut SqliteConnection) -> PersistenceResult<Vec<ComplianceRecord>> {
        let rows = sqlx::query_as::<_, ComplianceRow>(
            "SELECT * FROM ship_compliance ORDER BY created_at, id",
        )
        .fetch_all(&mut *conn)
        .await?;
        convert_all(rows)
    }

    /// Lấy tất cả records của một năm
    pub async fn find_by_year(
        conn: &mut SqliteConnection,
        year: i32,
    ) -> PersistenceResult<Vec<ComplianceRecord>> {
        let rows = sqlx::query_as::<_, ComplianceRow>(
            "SELECT * FROM ship_compliance WHERE year = ? ORDER BY created_at, id",
        )
        .bind(year)
        .fetch_all(&mut *conn)
        .await?;
        convert_all(rows)
    }
}

// ============================================================================
// Bank Repository
// ============================================================================

/// Repository cho bank_entries table
pub struct BankRepo;

impl BankRepo {
    /// Thêm entry mới (mỗi deposit một row)
    pub async fn create(
        conn: &mut SqliteConnection,
        entry: &NewBankEntry,
    ) -> PersistenceResult<BankEntry> {
        let created_at = Utc::now();
        let result = sqlx::query(
            "INSERT INTO bank_entries (ship_id, year, amount, created_at) VALUES (?, ?, ?, ?)",
        )
        .bind(&entry.ship_id)
        .bind(entry.year)
        .bind(entry.amount.to_string())
        .bind(created_at)
        .execute(&mut *conn)
        .await?;

        Ok(BankEntry {
            id: result.last_insert_rowid(),
            ship_id: entry.ship_id.clone(),
            year: entry.year,
            amount: entry.amount,
            created_at,
        })
    }

    /// Lấy entries của ship trong một năm
    pub async fn find_by_ship_and_year(
        conn: &mut SqliteConnection,
        ship_id: &str,
        year: i32,
    ) -> PersistenceResult<Vec<BankEntry>> {
        let rows = sqlx::query_as::<_, BankEntryRow>(
            "SELECT * FROM bank_entries WHERE ship_id = ? AND year = ? ORDER BY id",
        )
        .bind(ship_id)
        .bind(year)
        .fetch_all(&mut *conn)
        .await?;
        convert_all(rows)
    }

    /// Lấy toàn bộ ledger của ship, năm cũ nhất trước
    pub async fn find_by_ship(
        conn: &mut SqliteConnection,
        ship_id: &str,
    ) -> PersistenceResult<Vec<BankEntry>> {
        let rows = sqlx::query_as::<_, BankEntryRow>(
            "SELECT * FROM bank_entries WHERE ship_id = ? ORDER BY year, id",
        )
        .bind(ship_id)
        .fetch_all(&mut *conn)
        .await?;
        convert_all(rows)
    }

    /// Cập nhật amount theo row id
    pub async fn update(conn: &mut SqliteConnection, entry: &BankEntry) -> PersistenceResult<()> {
        let result = sqlx::query("UPDATE bank_entries SET amount = ? WHERE id = ?")
            .bind(entry.amount.to_string())
            .bind(entry.id)
            .execute(&mut *conn)
            .await?;

        if result.rows_affected() == 0 {
            return Err(PersistenceError::not_found("Bank entry", entry.id));
        }
        Ok(())
    }

    /// Lấy tất cả entries
    pub async fn find_all(conn: &mut SqliteConnection) -> PersistenceResult<Vec<BankEntry>> {
        let rows = sqlx::query_as::<_, BankEntryRow>(
            "SELECT * FROM bank_entries ORDER BY ship_id, year, id",
        )
        .fetch_all(&mut *conn)
        .await?;
        convert_all(rows)
    }
}

// ============================================================================
// Pool Repository
// ============================================================================

/// Repository cho pools + pool_members tables
pub struct PoolRepo;

impl PoolRepo {
    /// Ghi pool và tất cả members trong một transaction
    pub async fn create(conn: &mut SqliteConnection, pool: &Pool) -> PersistenceResult<Pool> {
        let created_at = Utc::now();
        let mut tx = conn.begin().await?;

        let result = sqlx::query("INSERT INTO pools (year, created_at) VALUES (?, ?)")
            .bind(pool.year)
            .bind(created_at)
            .execute(&mut *tx)
            .await?;
        let pool_id = result.last_insert_rowid();

        for (position, member) in pool.members.iter().enumerate() {
            sqlx::query(
                r#"
                INSERT INTO pool_members (pool_id, position, ship_id, cb_before, cb_after)
                VALUES (?, ?, ?, ?, ?)
                "#,
            )
            .bind(pool_id)
            .bind(position as i64)
            .bind(&member.ship_id)
            .bind(member.cb_before.to_string())
            .bind(member.cb_after.to_string())
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;

        Ok(Pool {
            id: Some(pool_id),
            year: pool.year,
            members: pool.members.clone(),
            created_at: Some(created_at),
        })
    }

    /// Lấy pool theo id
    pub async fn find_by_id(conn: &mut SqliteConnection, id: i64) -> PersistenceResult<Option<Pool>> {
        let row = sqlx::query_as::<_, PoolRow>("SELECT * FROM pools WHERE id = ?")
            .bind(id)
            .fetch_optional(&mut *conn)
            .await?;
        match row {
            Some(row) => Ok(Some(Self::with_members(conn, row).await?)),
            None => Ok(None),
        }
    }

    /// Lấy tất cả pools
    pub async fn find_all(conn: &mut SqliteConnection) -> PersistenceResult<Vec<Pool>> {
        let rows = sqlx::query_as::<_, PoolRow>("SELECT * FROM pools ORDER BY id")
            .fetch_all(&mut *conn)
            .await?;
        Self::load_all(conn, rows).await
    }

    /// Lấy pools của một năm
    pub async fn find_by_year(conn: &mut SqliteConnection, year: i32) -> PersistenceResult<Vec<Pool>> {
        let rows = sqlx::query_as::<_, PoolRow>("SELECT * FROM pools WHERE year = ? ORDER BY id")
            .bind(year)
            .fetch_all(&mut *conn)
            .await?;
        Self::load_all(conn, rows).await
    }

    async fn load_all(conn: &mut SqliteConnection, rows: Vec<PoolRow>) -> PersistenceResult<Vec<Pool>> {
        let mut pools = Vec::with_capacity(rows.len());
        for row in rows {
            pools.push(Self::with_members(conn, row).await?);
        }
        Ok(pools)
    }

    async fn with_members(conn: &mut SqliteConnection, row: PoolRow) -> PersistenceResult<Pool> {
        let member_rows = sqlx::query_as::<_, PoolMemberRow>(
            "SELECT * FROM pool_members WHERE pool_id = ? ORDER BY position",
        )
        .bind(row.id)
        .fetch_all(&mut *conn)
        .await?;
        let members: Vec<PoolMember> = convert_all(member_rows)?;

        Ok(Pool {
            id: Some(row.id),
            year: row.year,
            members,
            created_at: Some(row.created_at),
        })
    }
}

// ============================================================================
// Event Sequence
// ============================================================================

/// Sequence cấp event id cho audit log.
///
/// Số thứ tự do SQLite AUTOINCREMENT cấp, nên mọi process dùng chung một
/// database không bao giờ nhận trùng id.
pub struct EventSequenceRepo;

impl EventSequenceRepo {
    /// Cấp số thứ tự tiếp theo
    pub async fn next(conn: &mut SqliteConnection) -> PersistenceResult<i64> {
        let seq: i64 =
            sqlx::query_scalar("INSERT INTO event_sequence (issued_at) VALUES (?) RETURNING seq")
                .bind(Utc::now())
                .fetch_one(&mut *conn)
                .await?;
        Ok(seq)
    }

    /// Đảm bảo sequence không cấp lại số <= `last_issued`.
    ///
    /// Dùng khi event log có sẵn events mà database là mới (e.g. sau
    /// `init --force`).
    pub async fn advance_past(conn: &mut SqliteConnection, last_issued: i64) -> PersistenceResult<()> {
        sqlx::query(
            r#"
            INSERT INTO event_sequence (seq, issued_at)
            SELECT ?, ?
            WHERE NOT EXISTS (SELECT 1 FROM event_sequence WHERE seq >= ?)
            "#,
        )
        .bind(last_issued)
        .bind(Utc::now())
        .bind(last_issued)
        .execute(&mut *conn)
        .await?;
        Ok(())
    }
}

// ============================================================================
// Database initialization
// ============================================================================

/// Reference routes: (route_id, vessel, fuel, year, intensity, fuel t, distance km, emissions t, baseline)
const SEED_ROUTES: [(&str, &str, &str, i32, &str, &str, &str, &str, bool); 5] = [
    ("R001", "Container", "HFO", 2024, "91.0", "5000", "12000", "4500", true),
    ("R002", "BulkCarrier", "LNG", 2024, "88.0", "4800", "11500", "4200", false),
    ("R003", "Tanker", "MGO", 2024, "93.5", "5100", "12500", "4700", false),
    ("R004", "RoRo", "HFO", 2025, "89.2", "4900", "11800", "4300", false),
    ("R005", "Container", "LNG", 2025, "90.5", "4950", "11900", "4400", false),
];

/// Seed reference routes (bỏ qua route_id đã tồn tại). Trả về số route mới.
pub async fn seed_routes(conn: &mut SqliteConnection) -> PersistenceResult<u64> {
    let mut tx = conn.begin().await?;
    let has_baseline = RouteRepo::find_baseline(&mut tx).await?.is_some();

    let mut inserted = 0;
    for (route_id, vessel, fuel, year, intensity, consumption, distance, emissions, baseline) in
        SEED_ROUTES
    {
        let result = sqlx::query(
            r#"
            INSERT OR IGNORE INTO routes (route_id, vessel_type, fuel_type, year, ghg_intensity,
                                          fuel_consumption, distance, total_emissions, is_baseline)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(route_id)
        .bind(vessel)
        .bind(fuel)
        .bind(year)
        .bind(intensity)
        .bind(consumption)
        .bind(distance)
        .bind(emissions)
        .bind(baseline && !has_baseline)
        .execute(&mut *tx)
        .await?;
        inserted += result.rows_affected();
    }

    tx.commit().await?;
    Ok(inserted)
}

/// Chạy migrations
pub async fn run_migrations(pool: &SqlitePool) -> PersistenceResult<()> {
    sqlx::migrate!("../../migrations").run(pool).await?;
    Ok(())
}

/// Tạo database mới với schema
pub async fn init_database(database_url: &str) -> PersistenceResult<SqlitePool> {
    // Tạo file nếu chưa có
    let pool = SqlitePool::connect_with(
        SqliteConnectOptions::from_str(database_url)?.create_if_missing(true),
    )
    .await?;

    run_migrations(&pool).await?;

    Ok(pool)
}

/// In-memory database đã migrate, dùng cho tests.
///
/// Chỉ một connection: mọi connection khác sẽ thấy một database rỗng khác.
pub async fn connect_in_memory() -> PersistenceResult<SqlitePool> {
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .idle_timeout(None)
        .max_lifetime(None)
        .connect("sqlite::memory:")
        .await?;

    run_migrations(&pool).await?;

    Ok(pool)
}

#[cfg(test)]
mod tests {
    use super::*;
    use fueleu_core::{allocate_pool, PoolMemberInput, PoolingMode};
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;

    async fn seeded() -> SqlitePool {
        let pool = connect_in_memory().await.unwrap();
        let mut conn = pool.acquire().await.unwrap();
        seed_routes(&mut conn).await.unwrap();
        drop(conn);
        pool
    }

    #[tokio::test]
    async fn test_seed_routes_idempotent() {
        let pool = seeded().await;
        let mut conn = pool.acquire().await.unwrap();

        assert_eq!(RouteRepo::count(&mut conn).await.unwrap(), 5);
        assert_eq!(seed_routes(&mut conn).await.unwrap(), 0);

        let baseline = RouteRepo::find_baseline(&mut conn).await.unwrap().unwrap();
        assert_eq!(baseline.route_id, "R001");
        assert_eq!(baseline.ghg_intensity, dec!(91.0));
    }

    #[tokio::test]
    async fn test_set_baseline_transfers_flag() {
        let pool = seeded().await;
        let mut conn = pool.acquire().await.unwrap();

        let r003 = RouteRepo::find_by_route_id(&mut conn, "R003").await.unwrap().unwrap();
        let updated = RouteRepo::set_baseline(&mut conn, r003.id).await.unwrap();
        assert!(updated.is_baseline);

        let routes = RouteRepo::find_all(&mut conn).await.unwrap();
        let baselines: Vec<_> = routes.iter().filter(|r| r.is_baseline).collect();
        assert_eq!(baselines.len(), 1);
        assert_eq!(baselines[0].route_id, "R003");
    }

    #[tokio::test]
    async fn test_set_baseline_unknown_route_keeps_old_baseline() {
        let pool = seeded().await;
        let mut conn = pool.acquire().await.unwrap();

        let err = RouteRepo::set_baseline(&mut conn, 999).await.unwrap_err();
        assert!(err.is_not_found());

        let baseline = RouteRepo::find_baseline(&mut conn).await.unwrap().unwrap();
        assert_eq!(baseline.route_id, "R001");
    }

    #[tokio::test]
    async fn test_save_upserts_by_route_id() {
        let pool = seeded().await;
        let mut conn = pool.acquire().await.unwrap();

        let mut r002 = RouteRepo::find_by_route_id(&mut conn, "R002").await.unwrap().unwrap();
        r002.ghg_intensity = dec!(87.25);
        let saved = RouteRepo::save(&mut conn, &r002).await.unwrap();
        assert_eq!(saved.id, r002.id);
        assert_eq!(saved.ghg_intensity, dec!(87.25));

        let mut fresh = r002.clone();
        fresh.id = 0;
        fresh.route_id = "R006".to_string();
        let saved = RouteRepo::save(&mut conn, &fresh).await.unwrap();
        assert!(saved.id > 5);
        assert_eq!(RouteRepo::count(&mut conn).await.unwrap(), 6);
    }

    #[tokio::test]
    async fn test_save_never_inserts_a_second_baseline() {
        let pool = seeded().await;
        let mut conn = pool.acquire().await.unwrap();

        let mut flagged = RouteRepo::find_by_route_id(&mut conn, "R001").await.unwrap().unwrap();
        flagged.id = 0;
        flagged.route_id = "R007".to_string();
        assert!(flagged.is_baseline);

        let saved = RouteRepo::save(&mut conn, &flagged).await.unwrap();
        assert!(!saved.is_baseline);

        let baseline = RouteRepo::find_baseline(&mut conn).await.unwrap().unwrap();
        assert_eq!(baseline.route_id, "R001");
    }

    #[tokio::test]
    async fn test_event_sequence_advances_past_existing_log() {
        let pool = connect_in_memory().await.unwrap();
        let mut conn = pool.acquire().await.unwrap();

        assert_eq!(EventSequenceRepo::next(&mut conn).await.unwrap(), 1);

        EventSequenceRepo::advance_past(&mut conn, 41).await.unwrap();
        assert_eq!(EventSequenceRepo::next(&mut conn).await.unwrap(), 42);

        // đã vượt qua thì không lùi lại
        EventSequenceRepo::advance_past(&mut conn, 10).await.unwrap();
        assert_eq!(EventSequenceRepo::next(&mut conn).await.unwrap(), 43);
    }

    #[tokio::test]
    async fn test_compliance_latest_record_wins() {
        let pool = connect_in_memory().await.unwrap();
        let mut conn = pool.acquire().await.unwrap();

        for cb in [dec!(-50), dec!(70)] {
            let record = NewComplianceRecord {
                ship_id: "S1".to_string(),
                year: 2025,
                cb_gco2eq: cb,
            };
            ComplianceRepo::create(&mut conn, &record).await.unwrap();
        }

        let latest = ComplianceRepo::find_by_ship_and_year(&mut conn, "S1", 2025)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(latest.cb_gco2eq, dec!(70));

        let history = ComplianceRepo::find_history(&mut conn, "S1", 2025).await.unwrap();
        assert_eq!(history.len(), 2);
        assert!(ComplianceRepo::find_by_ship_and_year(&mut conn, "S1", 2024)
            .await
            .unwrap()
            .is_none());
        assert_eq!(ComplianceRepo::find_by_year(&mut conn, 2025).await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_bank_update_by_row_id() {
        let pool = connect_in_memory().await.unwrap();
        let mut conn = pool.acquire().await.unwrap();

        let deposit = NewBankEntry {
            ship_id: "S1".to_string(),
            year: 2024,
            amount: dec!(100),
        };
        let first = BankRepo::create(&mut conn, &deposit).await.unwrap();
        let second = BankRepo::create(&mut conn, &deposit).await.unwrap();
        assert_ne!(first.id, second.id);

        let drained = BankEntry {
            amount: Decimal::ZERO,
            ..first.clone()
        };
        BankRepo::update(&mut conn, &drained).await.unwrap();

        let entries = BankRepo::find_by_ship_and_year(&mut conn, "S1", 2024).await.unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].amount, Decimal::ZERO);
        assert_eq!(entries[1].amount, dec!(100));

        let missing = BankEntry { id: 999, ..first };
        assert!(BankRepo::update(&mut conn, &missing).await.unwrap_err().is_not_found());
    }

    #[tokio::test]
    async fn test_pool_roundtrip_keeps_member_order() {
        let pool = connect_in_memory().await.unwrap();
        let mut conn = pool.acquire().await.unwrap();

        let inputs = vec![
            PoolMemberInput::new("S2", dec!(-40)),
            PoolMemberInput::new("S1", dec!(100)),
            PoolMemberInput::new("S3", dec!(-60)),
        ];
        let allocation = allocate_pool(2025, &inputs, PoolingMode::Tolerant).unwrap();
        let created = PoolRepo::create(&mut conn, &allocation.into_pool()).await.unwrap();
        let pool_id = created.id.unwrap();

        let loaded = PoolRepo::find_by_id(&mut conn, pool_id).await.unwrap().unwrap();
        assert_eq!(loaded.members, created.members);
        assert_eq!(loaded.total_after().unwrap(), loaded.total_before().unwrap());

        assert_eq!(PoolRepo::find_by_year(&mut conn, 2025).await.unwrap().len(), 1);
        assert!(PoolRepo::find_by_year(&mut conn, 2024).await.unwrap().is_empty());
        assert_eq!(PoolRepo::find_all(&mut conn).await.unwrap().len(), 1);
    }
}
