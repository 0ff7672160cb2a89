use anyhow::Result;
use rusqlite::Connection;
use std::path::PathBuf;
use std::sync::Mutex;

use crate::models::holding::Holding;

pub struct Database {
    conn: Mutex<Connection>,
}

impl Database {
    pub fn new(data_dir: PathBuf) -> Result<Self> {
        std::fs::create_dir_all(&data_dir)?;
        let db_path = data_dir.join("fund_helper.db");
        let conn = Connection::open(db_path)?;
        let db = Self {
            conn: Mutex::new(conn),
        };
        db.migrate()?;
        Ok(db)
    }

    /// 测试用内存库
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        let db = Self {
            conn: Mutex::new(conn),
        };
        db.migrate()?;
        Ok(db)
    }

    fn migrate(&self) -> Result<()> {
        let conn = self.conn.lock().unwrap();
        conn.execute_batch(
            "
            CREATE TABLE IF NOT EXISTS holdings (
                id TEXT PRIMARY KEY DEFAULT 'default',
                data TEXT NOT NULL,
                updated_at TEXT NOT NULL DEFAULT (datetime('now'))
            );
            ",
        )?;
        Ok(())
    }

    /// 整单覆盖保存持仓列表，编辑成功才会走到这里
    pub fn save_holdings(&self, holdings: &[Holding]) -> Result<()> {
        let conn = self.conn.lock().unwrap();
        let data = serde_json::to_string(holdings)?;
        conn.execute(
            "INSERT OR REPLACE INTO holdings (id, data, updated_at) VALUES ('default', ?1, datetime('now'))",
            rusqlite::params![data],
        )?;
        Ok(())
    }

    pub fn load_holdings(&self) -> Result<Vec<Holding>> {
        let conn = self.conn.lock().unwrap();
        let result = conn.query_row(
            "SELECT data FROM holdings WHERE id = 'default'",
            [],
            |row| {
                let data: String = row.get(0)?;
                Ok(data)
            },
        );
        match result {
            Ok(data) => Ok(serde_json::from_str(&data)?),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(Vec::new()),
            Err(e) => Err(e.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn sample_holdings() -> Vec<Holding> {
        vec![
            Holding::new("000001".to_string(), 100.0, 1.05),
            Holding::new("110022".to_string(), 2500.5, 2.314),
        ]
    }

    #[test]
    fn test_load_empty_store() {
        let _ = env_logger::try_init();
        let db = Database::open_in_memory().unwrap();
        assert!(db.load_holdings().unwrap().is_empty(), "新库应没有持仓");
    }

    #[test]
    fn test_save_and_load_round_trip() {
        let _ = env_logger::try_init();
        let db = Database::open_in_memory().unwrap();
        let holdings = sample_holdings();
        db.save_holdings(&holdings).unwrap();
        let loaded = db.load_holdings().unwrap();
        assert_eq!(loaded, holdings, "持仓应逐字段一致");
    }

    #[test]
    fn test_save_replaces_wholesale() {
        let _ = env_logger::try_init();
        let db = Database::open_in_memory().unwrap();
        db.save_holdings(&sample_holdings()).unwrap();
        let replacement = vec![Holding::new("161725".to_string(), 10.0, 0.88)];
        db.save_holdings(&replacement).unwrap();
        let loaded = db.load_holdings().unwrap();
        assert_eq!(loaded.len(), 1);
        assert_eq!(loaded[0].code, "161725");
    }

    #[test]
    fn test_round_trip_keeps_fetched_fields() {
        let _ = env_logger::try_init();
        let temp_dir = TempDir::new().unwrap();
        let db = Database::new(temp_dir.path().to_path_buf()).unwrap();

        let mut holdings = sample_holdings();
        holdings[0].apply_quote(&crate::models::holding::FundQuote {
            name: "华夏成长混合".to_string(),
            now: 1.2345,
            rate: -0.67,
        });
        db.save_holdings(&holdings).unwrap();

        let loaded = db.load_holdings().unwrap();
        assert_eq!(loaded, holdings);
        assert_eq!(loaded[0].name, "华夏成长混合");
        assert_eq!(loaded[0].value, 1.2345 * 100.0);
    }
}
