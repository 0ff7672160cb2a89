use regex::Regex;

use crate::errors::ParseError;
use crate::models::holding::Holding;

/// 解析持仓编辑文本。首行为表头，其后每行 "代码,份额,成本"。
///
/// 任一行非法立即整体失败并报出行号（表头计作第1行），已解析的行全部丢弃；
/// 空行跳过但参与行号计数，保证报错行号与编辑器一致。
pub fn parse_holdings(raw: &str) -> Result<Vec<Holding>, ParseError> {
    let code_re = Regex::new(r"^\d{6}$").expect("内置正则");

    let mut holdings = Vec::new();
    for (idx, line) in raw.lines().enumerate() {
        // 跳过表头行
        if idx == 0 {
            continue;
        }
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        let line_no = idx + 1;

        let fields: Vec<&str> = line.split(',').collect();
        if fields.len() != 3 {
            return Err(ParseError::InvalidLineFormat(line_no));
        }

        let code = fields[0].trim();
        if !code_re.is_match(code) {
            return Err(ParseError::InvalidLineFormat(line_no));
        }

        let share: f64 = match fields[1].trim().parse() {
            Ok(v) => v,
            Err(_) => return Err(ParseError::InvalidLineFormat(line_no)),
        };
        let cost: f64 = match fields[2].trim().parse() {
            Ok(v) => v,
            Err(_) => return Err(ParseError::InvalidLineFormat(line_no)),
        };
        if !share.is_finite() || !cost.is_finite() || share <= 0.0 || cost <= 0.0 {
            return Err(ParseError::InvalidLineFormat(line_no));
        }

        holdings.push(Holding::new(code.to_string(), share, cost));
    }

    if holdings.is_empty() {
        return Err(ParseError::NoValidHoldings);
    }
    Ok(holdings)
}

/// 生成可回填编辑框的持仓文本，与 parse_holdings 互逆
pub fn format_holdings(holdings: &[Holding]) -> String {
    let mut text = String::from("基金代码,持仓份额,持仓成本\n");
    for h in holdings {
        text.push_str(&format!("{},{},{}\n", h.code, h.share, h.cost));
    }
    text.trim_end().to_string()
}
