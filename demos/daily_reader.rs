//! 本地日线文件读取示例
//!
//! 用法: daily_reader <vipdoc下的.day文件路径>

use tdx_hq::{DailyBarReader, ReaderError};

fn main() -> Result<(), ReaderError> {
    env_logger::init();

    let path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "vipdoc/sh/lday/sh600519.day".to_string());

    let security_type = DailyBarReader::classify(&path)?;
    println!("文件: {} 类别: {:?}", path, security_type);

    let reader = DailyBarReader::new();
    let bars = reader.parse_data_from_file(&path)?;
    println!("共 {} 根日K线", bars.len());
    for bar in bars.iter().rev().take(5) {
        println!("  {:?}", bar);
    }

    // 区间筛选
    let bars = reader.find_security_bars(&path, Some("2023-01-01"), Some("2023-12-31"), 0)?;
    println!("\n2023年共 {} 根", bars.len());

    // 最新10根
    let bars = reader.find_security_bars(&path, None, None, 10)?;
    println!("\n最新 {} 根:", bars.len());
    for bar in &bars {
        println!("  {:?}", bar);
    }

    Ok(())
}
