use serde::{Deserialize, Serialize};

/// 单只基金持仓（字段与本地存储记录一一对应）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Holding {
    pub code: String,          // 6位基金代码
    pub share: f64,            // 持仓份额
    pub cost: f64,             // 持仓成本（每份）
    #[serde(default)]
    pub name: String,          // 基金名称，首次抓取成功前为空
    #[serde(default)]
    pub now: f64,              // 实时估值，未抓取时为 0
    #[serde(default)]
    pub rate: f64,             // 涨跌幅 %
    #[serde(default)]
    pub value: f64,            // 当前市值 = now * share
    #[serde(default)]
    pub profit: f64,           // 浮动盈亏 = (now - cost) * share
}

impl Holding {
    pub fn new(code: String, share: f64, cost: f64) -> Self {
        Self {
            code,
            share,
            cost,
            name: String::new(),
            now: 0.0,
            rate: 0.0,
            value: 0.0,
            profit: 0.0,
        }
    }

    /// 用一次成功抓取的估值更新持仓，派生字段一并重算
    pub fn apply_quote(&mut self, quote: &FundQuote) {
        self.name = quote.name.clone();
        self.now = quote.now;
        self.rate = quote.rate;
        self.value = self.now * self.share;
        self.profit = (self.now - self.cost) * self.share;
    }

    /// 收益率 %
    pub fn profit_rate(&self) -> f64 {
        if self.cost == 0.0 {
            return 0.0;
        }
        (self.now - self.cost) / self.cost * 100.0
    }

    /// 持仓总成本
    pub fn hold_cost(&self) -> f64 {
        self.cost * self.share
    }
}

/// 单只基金一次抓取到的估值信息
#[derive(Debug, Clone, PartialEq)]
pub struct FundQuote {
    pub name: String,
    pub now: f64,
    pub rate: f64,
}

/// 组合总览（每轮刷新重算，不持久化）
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PortfolioSummary {
    pub total_value: f64,
    pub total_cost: f64,
    pub total_profit: f64,
    pub total_profit_rate: f64,
}

impl PortfolioSummary {
    /// 由累计市值与累计成本构造，成本为 0 时收益率取 0
    pub fn from_totals(total_value: f64, total_cost: f64) -> Self {
        let total_profit = total_value - total_cost;
        let total_profit_rate = if total_cost == 0.0 {
            0.0
        } else {
            total_profit / total_cost * 100.0
        };
        Self {
            total_value,
            total_cost,
            total_profit,
            total_profit_rate,
        }
    }
}
