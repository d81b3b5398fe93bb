//! 分钟线文件（`.lc1`/`.lc5`）读取
//!
//! 记录布局 `<HHfffffII`：压缩年月日 u16、当日分钟数 u16、
//! 开高低收与成交额 f32（价格已是元）、成交量 u32、保留字段。

use crate::{
    protocol::{codec::round2, types::Bar},
    reader::{records::RecordFormat, ReaderError},
    window::BarWindow,
};
use std::{fs, path::Path};

/// 分钟线记录格式
const MINUTE_PACK: &str = "<HHfffffII";

/// 分钟线文件读取器
#[derive(Debug, Default)]
pub struct MinuteBarReader;

impl MinuteBarReader {
    pub fn new() -> Self {
        Self
    }

    /// 读出文件中的全部分钟线（升序）
    pub fn parse_data_from_file(&self, path: &str) -> Result<Vec<Bar>, ReaderError> {
        if !Path::new(path).exists() {
            return Err(ReaderError::FileNotFound(path.to_string()));
        }

        let content = fs::read(path)?;
        let format = RecordFormat::from_pack_str(MINUTE_PACK)?;

        let bars = format
            .unpack_records(&content)?
            .map(|row| {
                // 年月日压缩在 u16：高5位是相对2004年的年份，低11位是月*100+日
                let date = row[0].as_u32();
                let year = (date >> 11) as i32 + 2004;
                let month = (date % 2048) / 100;
                let day = (date % 2048) % 100;

                let minutes = row[1].as_u32();
                let (hour, minute) = (minutes / 60, minutes % 60);

                Bar {
                    datetime: format!(
                        "{:04}-{:02}-{:02} {:02}:{:02}",
                        year, month, day, hour, minute
                    ),
                    year,
                    month,
                    day,
                    open: round2(row[2].as_f64()),
                    high: round2(row[3].as_f64()),
                    low: round2(row[4].as_f64()),
                    close: round2(row[5].as_f64()),
                    amount: round2(row[6].as_f64()),
                    volume: row[7].as_u32() as i64, // 手
                }
            })
            .collect();

        Ok(bars)
    }

    /// 按时间区间与数量筛选分钟线（语义与日线一致）
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
