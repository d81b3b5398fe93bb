//! 本地K线文件读取
//!
//! 通达信客户端落盘的 vipdoc 目录下有两类二进制K线文件：
//! 日线 `.day` 与分钟线 `.lc1`/`.lc5`，记录均为定长32字节。
//! 文件名形如 `sh600519.day`，按固定位置切片识别交易所与证券类别。

pub mod daily;
pub mod minute;
pub mod records;

pub use daily::{DailyBarReader, SecurityType};
pub use minute::MinuteBarReader;

use std::io;
use thiserror::Error;

/// 文件读取错误
#[derive(Debug, Error)]
pub enum ReaderError {
    #[error("文件不存在: {0}")]
    FileNotFound(String),
    #[error("无法识别的交易所: {0}")]
    UnknownExchange(String),
    #[error("无法识别的证券类别: {0}")]
    UnknownSecurityType(String),
    #[error("记录长度错误: 数据{len}字节不是{width}的整数倍")]
    MalformedRecord { len: usize, width: usize },
    #[error("不支持的格式字符: {0}")]
    UnsupportedFormat(char),
    #[error("无效的日期时间: {0}")]
    BadDatetime(String),
    #[error("IO错误: {0}")]
    Io(#[from] io::Error),
}
