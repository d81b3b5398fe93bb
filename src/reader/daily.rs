//! 日线文件（`.day`）读取
//!
//! 记录布局 `<IIIIIfII`：日期 YYYYMMDD、开高低收（缩放后的整数价）、
//! 成交额 f32、成交量、保留字段。价格缩放系数随证券类别不同。

use crate::{
    protocol::{codec::round2, types::Bar},
    reader::{records::RecordFormat, ReaderError},
    window::BarWindow,
};
use std::{fs, path::Path};

/// 日线记录格式
const DAILY_PACK: &str = "<IIIIIfII";

/// 证券类别（由文件名的交易所前缀与代码前两位判定）
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SecurityType {
    ShAStock,
    ShBStock,
    ShIndex,
    ShFund,
    ShBond,
    SzAStock,
    SzBStock,
    SzIndex,
    SzFund,
    SzBond,
    BjAStock,
}

impl SecurityType {
    /// 价格缩放系数与成交量系数
    pub fn coefficient(self) -> (f64, f64) {
        match self {
            SecurityType::ShAStock => (0.01, 0.01),
            SecurityType::ShBStock => (0.001, 0.01),
            SecurityType::ShIndex => (0.01, 1.0),
            SecurityType::ShFund => (0.001, 1.0),
            SecurityType::ShBond => (0.001, 1.0),
            SecurityType::SzAStock => (0.01, 0.01),
            SecurityType::SzBStock => (0.01, 0.01),
            SecurityType::SzIndex => (0.01, 1.0),
            SecurityType::SzFund => (0.001, 0.01),
            SecurityType::SzBond => (0.001, 0.01),
            SecurityType::BjAStock => (0.01, 0.01),
        }
    }
}

/// 日线文件读取器
#[derive(Debug, Default)]
pub struct DailyBarReader;

impl DailyBarReader {
    pub fn new() -> Self {
        Self
    }

    /// 从文件路径判定证券类别
    ///
    /// 文件名末尾12个字符形如 `sh600519.day`：前2位是交易所，
    /// 随后2位是代码前缀。
    pub fn classify(path: &str) -> Result<SecurityType, ReaderError> {
        if path.len() < 12 || !path.is_char_boundary(path.len() - 12) {
            return Err(ReaderError::UnknownExchange(path.to_string()));
        }

        let tail = &path[path.len() - 12..];
        let exchange = &tail[0..2];
        let prefix = &tail[2..4];

        let security_type = match exchange {
            "sz" => match prefix {
                "00" | "30" => Some(SecurityType::SzAStock),
                "20" => Some(SecurityType::SzBStock),
                "39" => Some(SecurityType::SzIndex),
                "15" | "16" => Some(SecurityType::SzFund),
                "10" | "11" | "12" | "13" | "14" => Some(SecurityType::SzBond),
                _ => None,
            },
            "sh" => match prefix {
                "60" | "68" => Some(SecurityType::ShAStock),
                "90" => Some(SecurityType::ShBStock),
                "00" | "88" | "99" => Some(SecurityType::ShIndex),
                "50" | "51" => Some(SecurityType::ShFund),
                "01" | "10" | "11" | "12" | "13" | "14" => Some(SecurityType::ShBond),
                _ => None,
            },
            "bj" => match prefix {
                "83" | "87" | "43" => Some(SecurityType::BjAStock),
                _ => None,
            },
            _ => return Err(ReaderError::UnknownExchange(path.to_string())),
        };

        security_type.ok_or_else(|| ReaderError::UnknownSecurityType(path.to_string()))
    }

    /// 读出文件中的全部日线（升序）
    pub fn parse_data_from_file(&self, path: &str) -> Result<Vec<Bar>, ReaderError> {
        if !Path::new(path).exists() {
            return Err(ReaderError::FileNotFound(path.to_string()));
        }
        let security_type = Self::classify(path)?;
        let (price_scale, _) = security_type.coefficient();

        let content = fs::read(path)?;
        let format = RecordFormat::from_pack_str(DAILY_PACK)?;

        let bars = format
            .unpack_records(&content)?
            .map(|row| {
                let date = row[0].as_u32();
                let year = (date / 10000) as i32;
                let month = (date % 10000) / 100;
                let day = date % 100;

                Bar {
                    datetime: format!("{:04}-{:02}-{:02}", year, month, day),
                    year,
                    month,
                    day,
                    open: round2(row[1].as_f64() * price_scale),
                    high: round2(row[2].as_f64() * price_scale),
                    low: round2(row[3].as_f64() * price_scale),
                    close: round2(row[4].as_f64() * price_scale),
                    amount: round2(row[5].as_f64()),
                    volume: row[6].as_u32() as i64 / 100, // 手
                }
            })
            .collect();

        Ok(bars)
    }

    /// 按日期区间与数量筛选日线
    ///
    /// 边界为闭区间；给了起始日期取最早的 count 条，否则取最新的
    /// count 条；count 为 0 表示不限数量。
    pub fn find_security_bars(
        &self,
        path: &str,
        start: Option<&str>,
        end: Option<&str>,
        count: usize,
    ) -> Result<Vec<Bar>, ReaderError> {
        for bound in [start, end].into_iter().flatten() {
            if crate::window::calc_start_timestamp(bound).is_none() {
                return Err(ReaderError::BadDatetime(bound.to_string()));
            }
        }

        let bars = self.parse_data_from_file(path)?;
        let window = BarWindow::new(start, end, count);

        let filtered: Vec<Bar> = bars
            .into_iter()
            .filter(|bar| window.contains(bar.timestamp_millis()))
            .collect();

        Ok(window.select(filtered))
    }
}
