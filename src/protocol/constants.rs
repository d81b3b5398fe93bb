//! 协议常量定义

use serde::{Deserialize, Serialize};

/// 请求帧固定前缀
pub const PREFIX: u8 = 0x0C;

/// 响应帧固定前缀（大端序读取：B1CB7400）
pub const PREFIX_RESP: u32 = 0xB1CB7400;

/// 行情网关默认端口
pub const DEFAULT_PORT: u16 = 7709;

/// 消息类型（命令号）
#[repr(u16)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageType {
    Setup = 0x000D,                  // 握手命令1/2（数据域区分）
    SetupVerify = 0x0FDB,            // 握手命令3
    ExRightInfo = 0x000F,            // 除权除息
    FinanceInfo = 0x0010,            // 财务信息
    SecurityCount = 0x044E,          // 证券数量（也用作心跳查询）
    SecurityList = 0x0450,           // 证券列表
    SecurityQuotes = 0x053E,         // 五档行情
    MinuteTimeData = 0x051D,         // 分时数据
    Bars = 0x052D,                   // K线（个股与指数共用命令号）
    CompanyInfoCategory = 0x02CF,    // 公司信息目录
    CompanyInfoContent = 0x02D0,     // 公司信息内容
    HistoryMinuteTimeData = 0x0FB4,  // 历史分时数据
    HistoryTransactionData = 0x0FB5, // 历史分时成交
    TransactionData = 0x0FC5,        // 分时成交
}

impl MessageType {
    pub fn as_u16(self) -> u16 {
        self as u16
    }

    pub fn from_u16(value: u16) -> Option<Self> {
        match value {
            0x000D => Some(MessageType::Setup),
            0x0FDB => Some(MessageType::SetupVerify),
            0x000F => Some(MessageType::ExRightInfo),
            0x0010 => Some(MessageType::FinanceInfo),
            0x044E => Some(MessageType::SecurityCount),
            0x0450 => Some(MessageType::SecurityList),
            0x053E => Some(MessageType::SecurityQuotes),
            0x051D => Some(MessageType::MinuteTimeData),
            0x052D => Some(MessageType::Bars),
            0x02CF => Some(MessageType::CompanyInfoCategory),
            0x02D0 => Some(MessageType::CompanyInfoContent),
            0x0FB4 => Some(MessageType::HistoryMinuteTimeData),
            0x0FB5 => Some(MessageType::HistoryTransactionData),
            0x0FC5 => Some(MessageType::TransactionData),
            _ => None,
        }
    }
}

/// 市场代码
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Market {
    SZ = 0, // 深圳交易所
    SH = 1, // 上海交易所
    BJ = 2, // 北京交易所
}

impl Market {
    pub fn as_u8(self) -> u8 {
        self as u8
    }

    pub fn from_u8(value: u8) -> Option<Self> {
        match value {
            0 => Some(Market::SZ),
            1 => Some(Market::SH),
            2 => Some(Market::BJ),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Market::SZ => "SZ",
            Market::SH => "SH",
            Market::BJ => "BJ",
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Market::SH => "上海",
            Market::SZ => "深圳",
            Market::BJ => "北京",
        }
    }
}

/// K线周期
///
/// 周期标记与协议周期号的对应关系：
/// 1m=8, 5m=0, 15m=1, 30m=2, H=3, D=4, W=5, M=6, Q=10, Y=11
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Period {
    Minute5 = 0,
    Minute15 = 1,
    Minute30 = 2,
    Hour = 3,
    Day = 4,
    Week = 5,
    Month = 6,
    Minute = 8,
    Quarter = 10,
    Year = 11,
}

impl Period {
    pub fn as_u8(self) -> u8 {
        self as u8
    }

    /// 从周期标记解析（1m, 5m, 15m, 30m, H, D, W, M, Q, Y）
    pub fn from_token(token: &str) -> Option<Self> {
        match token {
            "1m" => Some(Period::Minute),
            "5m" => Some(Period::Minute5),
            "15m" => Some(Period::Minute15),
            "30m" => Some(Period::Minute30),
            "H" => Some(Period::Hour),
            "D" => Some(Period::Day),
            "W" => Some(Period::Week),
            "M" => Some(Period::Month),
            "Q" => Some(Period::Quarter),
            "Y" => Some(Period::Year),
            _ => None,
        }
    }

    /// 分钟级周期的时间字段带 HH:MM，日线及以上只有日期
    pub fn has_time(self) -> bool {
        matches!(
            self,
            Period::Minute | Period::Minute5 | Period::Minute15 | Period::Minute30 | Period::Hour
        )
    }
}

/// 控制码
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Control {
    Control01 = 0x01, // 通常为 0x01
}

impl Control {
    pub fn as_u8(self) -> u8 {
        self as u8
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn market_serde_roundtrip() {
        for market in [Market::SZ, Market::SH, Market::BJ] {
            let json = serde_json::to_string(&market).unwrap();
            let parsed: Market = serde_json::from_str(&json).unwrap();
            assert_eq!(parsed, market);
        }
    }
}
