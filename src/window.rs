//! K线区间筛选与分页累积
//!
//! 网络端按页倒序拉取K线（每页最多700条，页内升序，第0页为最新数据），
//! 本地文件则一次性读出升序全量。两条路径共用同一套边界语义：
//! 区间为闭区间，起止日期缺省时分别取当日 00:00:00.000 与 23:59:59.999。

use crate::protocol::types::{datetime_to_millis, Bar};

/// 网络分页单页条数
pub const PAGE_SIZE: u16 = 700;

/// 起始边界时间戳（毫秒）。只给日期时取当日零点，给了时间则原样使用。
pub fn calc_start_timestamp(datetime: &str) -> Option<i64> {
    datetime_to_millis(datetime)
}

/// 结束边界时间戳（毫秒）。只给日期时取当日 23:59:59.999，给了时间则原样使用。
pub fn calc_end_timestamp(datetime: &str) -> Option<i64> {
    let millis = datetime_to_millis(datetime)?;
    if datetime.len() <= 10 {
        // 纯日期，推到当日最后一毫秒
        Some(millis + 24 * 3600 * 1000 - 1)
    } else {
        Some(millis)
    }
}

/// K线筛选窗口
///
/// `count` 为 0 表示不限数量。起止边界均为闭区间。
#[derive(Debug, Clone, Copy)]
pub struct BarWindow {
    pub start_ts: Option<i64>,
    pub end_ts: Option<i64>,
    pub count: usize,
}

impl BarWindow {
    pub fn new(start: Option<&str>, end: Option<&str>, count: usize) -> Self {
        Self {
            start_ts: start.and_then(calc_start_timestamp),
            end_ts: end.and_then(calc_end_timestamp),
            count,
        }
    }

    /// 时间戳是否落在窗口内
    pub fn contains(&self, ts: i64) -> bool {
        if let Some(start) = self.start_ts {
            if ts < start {
                return false;
            }
        }
        if let Some(end) = self.end_ts {
            if ts > end {
                return false;
            }
        }
        true
    }

    /// 对升序的区间内K线应用数量限制
    ///
    /// 给了起始边界时取最早的 count 条；只给结束边界、或两个边界都
    /// 缺省时取最新的 count 条。
    pub fn select(&self, mut bars: Vec<Bar>) -> Vec<Bar> {
        if self.count == 0 || bars.len() <= self.count {
            return bars;
        }
        if self.start_ts.is_some() {
            bars.truncate(self.count);
        } else {
            bars.drain(..bars.len() - self.count);
        }
        bars
    }
}

/// 分页处理结果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageStep {
    /// 继续拉取更早的一页
    Continue,
    /// 已到边界或数据尽头
    Stop,
}

/// 倒序分页的K线累积器
///
/// 每页按升序传入，页序从最新到最旧。累积完成后调用 [`finish`](Self::finish)
/// 得到升序的筛选结果。
pub struct WindowAccum {
    window: BarWindow,
    bars: Vec<Bar>,
}

impl WindowAccum {
    pub fn new(window: BarWindow) -> Self {
        Self {
            window,
            bars: Vec::new(),
        }
    }

    /// 处理一页数据，返回是否需要继续拉取
    pub fn push_page(&mut self, page: &[Bar]) -> PageStep {
        let (first, last) = match (page.first(), page.last()) {
            (Some(first), Some(last)) => (first, last),
            _ => return PageStep::Stop, // 空页，数据尽头
        };

        // 整页都不早于结束边界：丢弃并继续向更早的页推进
        if let Some(end) = self.window.end_ts {
            if first.timestamp_millis() >= end {
                return PageStep::Continue;
            }
        }

        let mut filtered: Vec<Bar> = page
            .iter()
            .filter(|bar| self.window.contains(bar.timestamp_millis()))
            .cloned()
            .collect();
        filtered.append(&mut self.bars);
        self.bars = filtered;

        // 页内最新一条已早于起始边界，更早的页不会再有数据
        if let Some(start) = self.window.start_ts {
            if start > last.timestamp_millis() {
                return PageStep::Stop;
            }
        } else if self.window.count > 0 && self.bars.len() >= self.window.count {
            // 无起始边界时结果取最新的 count 条，凑够即可提前结束
            return PageStep::Stop;
        }

        PageStep::Continue
    }

    /// 应用数量限制并返回升序结果
    pub fn finish(self) -> Vec<Bar> {
        let window = self.window;
        window.select(self.bars)
    }
}
