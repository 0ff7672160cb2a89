use std::io::Read;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;

use fund_helper::db::database::Database;
use fund_helper::errors::FetchError;
use fund_helper::models::holding::{Holding, PortfolioSummary};
use fund_helper::services::fund_data::FundDataService;
use fund_helper::services::holding_parser::{format_holdings, parse_holdings};
use fund_helper::services::scheduler::TradingScheduler;
use fund_helper::services::valuation::{Presenter, ValuationAggregator};

/// 控制台渲染，输出格式沿用手机端持仓列表的行样式
struct ConsolePresenter;

fn signed(v: f64) -> String {
    if v >= 0.0 {
        format!("+{:.2}", v)
    } else {
        format!("{:.2}", v)
    }
}

#[async_trait]
impl Presenter for ConsolePresenter {
    async fn render_holding(&self, h: &Holding) {
        println!("{} {}  估值 {:.4}  {}%", h.code, h.name, h.now, signed(h.rate));
        println!("    市值：{:.2}元 | 份额：{}份 | 成本：{:.4}", h.value, h.share, h.cost);
        println!("    收益：{}元 ({}%)", signed(h.profit), signed(h.profit_rate()));
    }

    async fn render_holding_failed(&self, code: &str, _error: &FetchError) {
        println!("基金{}加载失败，请检查代码是否正确！", code);
    }

    async fn render_summary(&self, s: &PortfolioSummary) {
        println!("{}", "-".repeat(48));
        println!(
            "总市值：{:.2}元  总收益：{}元 ({}%)",
            s.total_value,
            signed(s.total_profit),
            signed(s.total_profit_rate)
        );
    }
}

fn data_dir() -> PathBuf {
    if let Ok(dir) = std::env::var("FUND_HELPER_DATA") {
        return PathBuf::from(dir);
    }
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("fund-helper")
}

async fn cmd_list(db: &Database) -> Result<()> {
    let mut holdings = db.load_holdings()?;
    if holdings.is_empty() {
        println!("暂无持仓，先用 `fund-helper edit <文件>` 录入");
        return Ok(());
    }

    let service = FundDataService::new()?;
    let aggregator = ValuationAggregator::new(Arc::new(service));
    if let Err(e) = aggregator.refresh(&mut holdings, &ConsolePresenter).await {
        log::info!("{}", e);
    }
    Ok(())
}

fn cmd_edit(db: &Database, path: &str) -> Result<()> {
    let text = if path == "-" {
        let mut buf = String::new();
        std::io::stdin()
            .read_to_string(&mut buf)
            .context("读取标准输入失败")?;
        buf
    } else {
        std::fs::read_to_string(path).with_context(|| format!("读取 {} 失败", path))?
    };

    // 解析失败不落库，原持仓保持不变
    let holdings = parse_holdings(&text)?;
    db.save_holdings(&holdings)?;
    println!("持仓保存成功，共{}只基金", holdings.len());
    Ok(())
}

fn cmd_template(db: &Database) -> Result<()> {
    let holdings = db.load_holdings()?;
    println!("{}", format_holdings(&holdings));
    Ok(())
}

async fn cmd_watch(db: &Database, interval_secs: u64) -> Result<()> {
    let mut holdings = db.load_holdings()?;
    if holdings.is_empty() {
        println!("暂无持仓，先用 `fund-helper edit <文件>` 录入");
        return Ok(());
    }

    let service = FundDataService::new()?;
    let aggregator = ValuationAggregator::new(Arc::new(service));
    let presenter = ConsolePresenter;

    println!("每{}秒刷新一次，Ctrl+C 退出", interval_secs);
    loop {
        if TradingScheduler::is_trading_time() {
            if let Err(e) = aggregator.refresh(&mut holdings, &presenter).await {
                log::info!("{}", e);
            }
        } else {
            log::info!("{}，暂停刷新", TradingScheduler::market_status());
        }

        tokio::select! {
            _ = tokio::time::sleep(Duration::from_secs(interval_secs)) => {}
            _ = tokio::signal::ctrl_c() => {
                println!("已退出");
                return Ok(());
            }
        }
    }
}

fn print_usage() {
    eprintln!("用法: fund-helper [list|edit <文件|-> |template|watch [间隔秒]]");
    eprintln!("  list      加载持仓并刷新一次实时估值（默认）");
    eprintln!("  edit      从文件或标准输入解析并保存持仓（首行表头，逐行 代码,份额,成本）");
    eprintln!("  template  输出当前持仓的可编辑文本");
    eprintln!("  watch     交易时段内周期刷新");
}

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args: Vec<String> = std::env::args().collect();
    let db = Database::new(data_dir())?;

    match args.get(1).map(|s| s.as_str()) {
        None | Some("list") => cmd_list(&db).await,
        Some("edit") => {
            let path = args
                .get(2)
                .ok_or_else(|| anyhow!("edit 需要文件路径参数（- 表示标准输入）"))?;
            cmd_edit(&db, path)
        }
        Some("template") => cmd_template(&db),
        Some("watch") => {
            let interval = args
                .get(2)
                .and_then(|s| s.parse().ok())
                .unwrap_or(60);
            cmd_watch(&db, interval).await
        }
        Some(other) => {
            print_usage();
            Err(anyhow!("未知命令: {}", other))
        }
    }
}
