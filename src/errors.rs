use thiserror::Error;

/// 持仓文本解析错误。任一行非法即整体失败，不产生部分结果。
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    /// 行号从 1 起算，表头行计作第 1 行
    #[error("第{0}行格式错误，请检查！")]
    InvalidLineFormat(usize),
    #[error("请填写有效持仓信息！")]
    NoValidHoldings,
}

/// 单只基金抓取错误，只影响自身，不跨持仓传播
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FetchError {
    #[error("基金{code}请求失败: {message}")]
    Network { code: String, message: String },
    #[error("基金{code}请求超时")]
    Timeout { code: String },
    #[error("基金{code}响应回调包装异常")]
    MalformedEnvelope { code: String },
    #[error("基金{code}估值数据异常")]
    MalformedValuation { code: String },
    #[error("基金{code}的{field}不是有效数字")]
    NonNumericField { code: String, field: String },
}

impl FetchError {
    /// 出错的基金代码
    pub fn code(&self) -> &str {
        match self {
            FetchError::Network { code, .. }
            | FetchError::Timeout { code }
            | FetchError::MalformedEnvelope { code }
            | FetchError::MalformedValuation { code }
            | FetchError::NonNumericField { code, .. } => code,
        }
    }
}

/// 整轮刷新级别的错误
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RefreshError {
    /// 本轮刷新期间有新一轮启动，剩余结果已丢弃
    #[error("第{0}轮刷新已被更新的刷新取代")]
    Superseded(u64),
}
