//! 证券代码解析

use crate::protocol::constants::Market;
use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};
use thiserror::Error;

/// 代码解析错误
#[derive(Debug, Error)]
pub enum SymbolError {
    #[error("无效的证券代码: {0}")]
    InvalidSymbol(String),
    #[error("无效的市场后缀: {0}")]
    InvalidMarket(String),
}

/// 带市场后缀的证券代码，如 `000001.SZ`、`600519.SH`
#[derive(Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Symbol {
    pub market: Market,
    pub code: String,
}

impl Symbol {
    pub fn new(market: Market, code: impl Into<String>) -> Self {
        Self {
            market,
            code: code.into(),
        }
    }

    /// 解析 `代码.市场` 格式
    pub fn parse(s: &str) -> Result<Self, SymbolError> {
        let (code, suffix) = s
            .split_once('.')
            .ok_or_else(|| SymbolError::InvalidSymbol(s.to_string()))?;

        if code.len() != 6 || !code.bytes().all(|b| b.is_ascii_digit()) {
            return Err(SymbolError::InvalidSymbol(s.to_string()));
        }

        let market = match suffix {
            "SZ" | "sz" => Market::SZ,
            "SH" | "sh" => Market::SH,
            "BJ" | "bj" => Market::BJ,
            other => return Err(SymbolError::InvalidMarket(other.to_string())),
        };

        Ok(Self::new(market, code))
    }

    /// 是否为指数代码
    ///
    /// 上海：000/880/999 开头；深圳：399 开头；北京：899 开头
    pub fn is_index(&self) -> bool {
        // new() 不强制6位代码，前缀不足3位时一律视为个股
        let prefix = match self.code.get(..3) {
            Some(prefix) => prefix,
            None => return false,
        };
        match self.market {
            Market::SH => matches!(prefix, "000" | "880" | "999"),
            Market::SZ => prefix == "399",
            Market::BJ => prefix == "899",
        }
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.code, self.market.as_str())
    }
}

impl fmt::Debug for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self)
    }
}

impl FromStr for Symbol {
    type Err = SymbolError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Symbol::parse(s)
    }
}
