use async_trait::async_trait;

use crate::errors::FetchError;
use crate::models::holding::FundQuote;
use crate::utils::encoding::decode_body;
use crate::utils::http::build_fund_client;

const FUND_BASIC_URL: &str =
    "https://fundmobapi.eastmoney.com/FundMobiApi/JS/FundBasicInfoApi.ashx";
const FUND_ESTIMATE_URL: &str =
    "https://fundmobapi.eastmoney.com/FundMobiApi/JS/FundEstimateApi.ashx";

/// 单只基金行情数据源。聚合器只依赖这个 trait，测试可替换为桩实现。
#[async_trait]
pub trait QuoteSource: Send + Sync {
    async fn fetch_one(&self, code: &str) -> Result<FundQuote, FetchError>;
}

pub struct FundDataService {
    client: reqwest::Client,
}

impl FundDataService {
    pub fn new() -> anyhow::Result<Self> {
        let client = build_fund_client()?;
        Ok(Self { client })
    }

    async fn get_text(&self, base: &str, code: &str) -> Result<String, FetchError> {
        let url = format!("{}?fundcode={}", base, code);
        let resp = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| classify_request_error(code, e))?;
        if !resp.status().is_success() {
            return Err(FetchError::Network {
                code: code.to_string(),
                message: format!("HTTP {}", resp.status()),
            });
        }
        let bytes = resp
            .bytes()
            .await
            .map_err(|e| classify_request_error(code, e))?;
        Ok(decode_body(&bytes))
    }

    /// 基金基本信息（名称）。Name 缺失时以代码兜底，不视为失败。
    pub async fn fetch_basic_name(&self, code: &str) -> Result<String, FetchError> {
        let text = self.get_text(FUND_BASIC_URL, code).await?;
        let payload = strip_envelope(code, &text)?;
        parse_basic_name(code, payload)
    }

    /// 实时估值与涨跌幅
    pub async fn fetch_estimate(&self, code: &str) -> Result<(f64, f64), FetchError> {
        let text = self.get_text(FUND_ESTIMATE_URL, code).await?;
        let payload = strip_envelope(code, &text)?;
        parse_estimate(code, payload)
    }
}

#[async_trait]
impl QuoteSource for FundDataService {
    async fn fetch_one(&self, code: &str) -> Result<FundQuote, FetchError> {
        let name = self.fetch_basic_name(code).await?;
        let (now, rate) = self.fetch_estimate(code).await?;
        Ok(FundQuote { name, now, rate })
    }
}

fn classify_request_error(code: &str, err: reqwest::Error) -> FetchError {
    if err.is_timeout() {
        FetchError::Timeout {
            code: code.to_string(),
        }
    } else {
        FetchError::Network {
            code: code.to_string(),
            message: err.to_string(),
        }
    }
}

/// 剥掉 `callback(...)` 回调包装，返回内层载荷
pub fn strip_envelope<'a>(code: &str, body: &'a str) -> Result<&'a str, FetchError> {
    let body = body.trim().trim_end_matches(';').trim_end();
    let open = body.find('(').ok_or_else(|| FetchError::MalformedEnvelope {
        code: code.to_string(),
    })?;
    if !body.ends_with(')') {
        return Err(FetchError::MalformedEnvelope {
            code: code.to_string(),
        });
    }
    Ok(&body[open + 1..body.len() - 1])
}

/// 基本信息载荷是 JSON 对象，取 Name 字段；载荷不是合法 JSON 视为包装异常
pub fn parse_basic_name(code: &str, payload: &str) -> Result<String, FetchError> {
    let json: serde_json::Value =
        serde_json::from_str(payload).map_err(|_| FetchError::MalformedEnvelope {
            code: code.to_string(),
        })?;
    let name = json
        .get("Name")
        .and_then(|v| v.as_str())
        .unwrap_or("")
        .trim();
    if name.is_empty() {
        Ok(code.to_string())
    } else {
        Ok(name.to_string())
    }
}

/// 估值载荷是逗号分隔字段表：下标1=实时估值，下标2=涨跌幅（带%后缀）
pub fn parse_estimate(code: &str, payload: &str) -> Result<(f64, f64), FetchError> {
    let payload = payload.trim().trim_matches('"');
    let parts: Vec<&str> = payload.split(',').collect();
    if parts.len() < 3 {
        return Err(FetchError::MalformedValuation {
            code: code.to_string(),
        });
    }

    let now: f64 = parts[1]
        .trim()
        .parse()
        .map_err(|_| FetchError::NonNumericField {
            code: code.to_string(),
            field: "估值".to_string(),
        })?;
    let rate: f64 = parts[2]
        .trim()
        .trim_end_matches('%')
        .parse()
        .map_err(|_| FetchError::NonNumericField {
            code: code.to_string(),
            field: "涨跌幅".to_string(),
        })?;

    Ok((now, rate))
}
