use chrono::{Datelike, Local, Timelike, Weekday};

/// 基金估值只在 A 股交易时段内变动，watch 模式据此决定刷新节奏
pub struct TradingScheduler;

impl TradingScheduler {
    /// 当前是否处于交易时段（基金估值无集合竞价，只看两个连续交易段）
    pub fn is_trading_time() -> bool {
        if !Self::is_weekday() {
            return false;
        }
        let now = Local::now();
        let time_val = now.hour() * 100 + now.minute();

        // Morning session: 9:30 - 11:30
        // Afternoon session: 13:00 - 15:00
        (time_val >= 930 && time_val <= 1130) || (time_val >= 1300 && time_val <= 1500)
    }

    /// 当前市场状态描述
    pub fn market_status() -> String {
        if !Self::is_weekday() {
            return "休市(周末)".to_string();
        }
        let now = Local::now();
        let time_val = now.hour() * 100 + now.minute();

        if time_val < 930 {
            "盘前".to_string()
        } else if time_val <= 1130 {
            "交易中(上午)".to_string()
        } else if time_val < 1300 {
            "午间休市".to_string()
        } else if time_val <= 1500 {
            "交易中(下午)".to_string()
        } else {
            "已收盘".to_string()
        }
    }

    fn is_weekday() -> bool {
        let weekday = Local::now().weekday();
        weekday != Weekday::Sat && weekday != Weekday::Sun
    }
}
