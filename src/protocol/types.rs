//! 协议数据类型定义

use crate::protocol::constants::Market;
use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use std::fmt;

/// 价格类型，单位为厘（1元 = 1000厘）
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Price(pub i64);

impl Price {
    pub fn to_yuan(self) -> f64 {
        self.0 as f64 / 1000.0
    }

    pub fn as_i64(self) -> i64 {
        self.0
    }
}

impl fmt::Debug for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.3}", self.to_yuan())
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.3}元", self.to_yuan())
    }
}

/// K线数据（网络与本地文件共用同一结构）
///
/// datetime 为 "YYYY-MM-DD" 或 "YYYY-MM-DD HH:MM"；返回给调用方的K线序列
/// 一律按 datetime 升序排列，重复时间戳不做去重。
#[derive(Clone, Serialize, Deserialize)]
pub struct Bar {
    pub datetime: String,
    pub year: i32,
    pub month: u32,
    pub day: u32,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub amount: f64,
    pub volume: i64,
}

impl Bar {
    /// datetime 对应的毫秒时间戳（统一按 UTC 解释，仅用于区间比较）
    pub fn timestamp_millis(&self) -> i64 {
        datetime_to_millis(&self.datetime).unwrap_or(0)
    }
}

impl fmt::Debug for Bar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} 开:{:.2} 高:{:.2} 低:{:.2} 收:{:.2} 额:{:.2} 量:{}手",
            self.datetime, self.open, self.high, self.low, self.close, self.amount, self.volume
        )
    }
}

/// 解析 datetime 字符串为毫秒时间戳
pub fn datetime_to_millis(s: &str) -> Option<i64> {
    if let Ok(dt) = NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M") {
        return Some(dt.and_utc().timestamp_millis());
    }
    if let Ok(dt) = NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S") {
        return Some(dt.and_utc().timestamp_millis());
    }
    let date = NaiveDate::parse_from_str(s, "%Y-%m-%d").ok()?;
    Some(date.and_hms_opt(0, 0, 0)?.and_utc().timestamp_millis())
}

/// 证券列表条目
#[derive(Clone, Serialize, Deserialize)]
pub struct Security {
    pub code: String,
    pub name: String,
    pub multiple: u16,   // 倍数，基本是100
    pub decimal: i8,     // 小数位，基本是2
    pub pre_close: f64,  // 昨收（个股无效，指数有效）
}

impl fmt::Debug for Security {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} 倍数:{} 小数:{}", self.code, self.name, self.multiple, self.decimal)?;
        if self.pre_close > 0.0 {
            write!(f, " 昨收:{:.2}", self.pre_close)?;
        }
        Ok(())
    }
}

/// 价格档位（5档买卖盘）
#[derive(Clone, Copy, Serialize, Deserialize)]
pub struct PriceLevel {
    pub buy: bool,
    pub price: Price,
    pub number: i32, // 数量（手）
}

impl fmt::Debug for PriceLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let side = if self.buy { "买" } else { "卖" };
        write!(f, "{}:{:.2}x{}", side, self.price.to_yuan(), self.number)
    }
}

/// 5档价格档位
pub type PriceLevels = [PriceLevel; 5];

/// 五档行情
#[derive(Clone, Serialize, Deserialize)]
pub struct Quote {
    pub market: Market,
    pub code: String,
    pub active1: u16,
    pub pre_close: Price,
    pub open: Price,
    pub high: Price,
    pub low: Price,
    pub price: Price, // 现价
    pub server_time: String,
    pub total_hand: i32,
    pub cur_hand: i32, // 现量
    pub amount: f64,
    pub inner_disc: i32, // 内盘
    pub outer_disc: i32, // 外盘
    pub bid_levels: PriceLevels,
    pub ask_levels: PriceLevels,
    pub rate: f64, // 涨速
    pub active2: u16,
}

impl fmt::Debug for Quote {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let change = self.price.to_yuan() - self.pre_close.to_yuan();
        let change_pct = if self.pre_close.0 != 0 {
            change / self.pre_close.to_yuan() * 100.0
        } else {
            0.0
        };
        write!(
            f,
            "{}{} 现价:{:.2} 涨跌:{:+.2}({:+.2}%) 开:{:.2} 高:{:.2} 低:{:.2} 昨收:{:.2} 量:{}手 额:{:.0}万",
            self.market.as_str(),
            self.code,
            self.price.to_yuan(),
            change,
            change_pct,
            self.open.to_yuan(),
            self.high.to_yuan(),
            self.low.to_yuan(),
            self.pre_close.to_yuan(),
            self.total_hand,
            self.amount / 10000.0
        )?;
        let bid1 = &self.bid_levels[0];
        let ask1 = &self.ask_levels[0];
        if bid1.number > 0 || ask1.number > 0 {
            write!(
                f,
                " 买1:{:.2}x{} 卖1:{:.2}x{}",
                bid1.price.to_yuan(),
                bid1.number,
                ask1.price.to_yuan(),
                ask1.number
            )?;
        }
        Ok(())
    }
}

/// 分时数据项
#[derive(Clone, Serialize, Deserialize)]
pub struct MinuteTime {
    pub time: String, // HH:MM
    pub price: Price,
    pub number: i32, // 成交量（手）
}

impl fmt::Debug for MinuteTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {:.2} {}手", self.time, self.price.to_yuan(), self.number)
    }
}

/// 成交方向
#[derive(Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TradeStatus {
    Buy = 0,
    Sell = 1,
    Neutral = 2,
}

impl fmt::Debug for TradeStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TradeStatus::Buy => write!(f, "买"),
            TradeStatus::Sell => write!(f, "卖"),
            TradeStatus::Neutral => write!(f, "中"),
        }
    }
}

/// 分时成交数据项
#[derive(Clone, Serialize, Deserialize)]
pub struct Transaction {
    pub datetime: String, // "YYYY-MM-DD HH:MM"
    pub price: Price,
    pub volume: i32, // 成交量（手）
    pub number: i32, // 单数（历史数据无效）
    pub status: TradeStatus,
}

impl fmt::Debug for Transaction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {:.2} {}手 {:?} 单数:{}",
            self.datetime,
            self.price.to_yuan(),
            self.volume,
            self.status,
            self.number
        )
    }
}

/// 除权除息数据项
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExRight {
    pub market: Market,
    pub code: String,
    pub date: String, // "YYYY-MM-DD"
    pub category: i32,
    /// 分红(10股n元) / 行权价 / 前流通
    pub c1: f64,
    /// 配股价 / 前总股本
    pub c2: f64,
    /// 送转股 / 缩股 / 后流通
    pub c3: f64,
    /// 配股 / 后总股本
    pub c4: f64,
}

impl ExRight {
    pub fn category_name(&self) -> &'static str {
        match self.category {
            1 => "除权除息",
            2 => "送配股上市",
            3 => "非流通股上市",
            4 => "未知股本变动",
            5 => "股本变化",
            6 => "增发新股",
            7 => "股份回购",
            8 => "增发新股上市",
            9 => "转配股上市",
            10 => "可转债上市",
            11 => "扩缩股",
            12 => "非流通股缩股",
            13 => "送认购权证",
            14 => "送认沽权证",
            _ => "未知",
        }
    }
}

/// 财务信息（字段为协议响应的主要子集）
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FinanceInfo {
    pub market: Market,
    pub code: String,
    pub liu_tong_gu_ben: f64, // 流通股本（万股）
    pub province: u16,
    pub industry: u16,
    pub updated_date: u32, // YYYYMMDD
    pub ipo_date: u32,     // YYYYMMDD
    pub zong_gu_ben: f64,  // 总股本（万股）
    pub mei_gu_jing_zi_chan: f64,
    pub mei_gu_shou_yi: f64,
}

/// 公司信息目录条目
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompanyCategory {
    pub name: String,
    pub filename: String,
    pub start: u32,
    pub length: u32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn datetime_parsing() {
        let day = datetime_to_millis("2023-11-22").unwrap();
        let minute = datetime_to_millis("2023-11-22 10:35").unwrap();
        assert!(minute > day);
        assert_eq!(minute - day, (10 * 60 + 35) * 60 * 1000);
        assert!(datetime_to_millis("not-a-date").is_none());
    }

    #[test]
    fn bar_timestamp_orders() {
        let mk = |d: &str| Bar {
            datetime: d.to_string(),
            year: 2023,
            month: 11,
            day: 22,
            open: 1.0,
            high: 1.0,
            low: 1.0,
            close: 1.0,
            amount: 0.0,
            volume: 0,
        };
        assert!(mk("2023-11-22").timestamp_millis() < mk("2023-11-23").timestamp_millis());
    }
}
