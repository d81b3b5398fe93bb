//! 本地K线文件读取测试 - 使用临时目录构造 vipdoc 样例文件

use std::fs;
use std::path::PathBuf;
use tdx_hq::reader::{DailyBarReader, MinuteBarReader, ReaderError, SecurityType};

/// 每个测试用独立的临时目录
fn temp_dir(name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("tdx_hq_reader_{}_{}", std::process::id(), name));
    fs::create_dir_all(&dir).unwrap();
    dir
}

/// 日线记录：<IIIIIfII
fn daily_record(
    date: u32,
    open: u32,
    high: u32,
    low: u32,
    close: u32,
    amount: f32,
    volume: u32,
) -> Vec<u8> {
    let mut bytes = Vec::with_capacity(32);
    bytes.extend_from_slice(&date.to_le_bytes());
    bytes.extend_from_slice(&open.to_le_bytes());
    bytes.extend_from_slice(&high.to_le_bytes());
    bytes.extend_from_slice(&low.to_le_bytes());
    bytes.extend_from_slice(&close.to_le_bytes());
    bytes.extend_from_slice(&amount.to_le_bytes());
    bytes.extend_from_slice(&volume.to_le_bytes());
    bytes.extend_from_slice(&0u32.to_le_bytes());
    bytes
}

/// 分钟线记录：<HHfffffII
fn minute_record(
    year: u16,
    month: u16,
    day: u16,
    minutes: u16,
    open: f32,
    high: f32,
    low: f32,
    close: f32,
    amount: f32,
    volume: u32,
) -> Vec<u8> {
    let date = ((year - 2004) << 11) + month * 100 + day;
    let mut bytes = Vec::with_capacity(32);
    bytes.extend_from_slice(&date.to_le_bytes());
    bytes.extend_from_slice(&minutes.to_le_bytes());
    for v in [open, high, low, close, amount] {
        bytes.extend_from_slice(&v.to_le_bytes());
    }
    bytes.extend_from_slice(&volume.to_le_bytes());
    bytes.extend_from_slice(&0u32.to_le_bytes());
    bytes
}

#[test]
fn test_classify_by_filename() {
    let cases = [
        ("vipdoc/sh/lday/sh600519.day", SecurityType::ShAStock),
        ("sh688001.day", SecurityType::ShAStock),
        ("sh900901.day", SecurityType::ShBStock),
        ("sh000001.day", SecurityType::ShIndex),
        ("sh999999.day", SecurityType::ShIndex),
        ("sh510050.day", SecurityType::ShFund),
        ("sh019547.day", SecurityType::ShBond),
        ("sz000001.day", SecurityType::SzAStock),
        ("sz300750.day", SecurityType::SzAStock),
        ("sz200011.day", SecurityType::SzBStock),
        ("sz399001.day", SecurityType::SzIndex),
        ("sz159915.day", SecurityType::SzFund),
        ("sz101001.day", SecurityType::SzBond),
        ("bj830799.day", SecurityType::BjAStock),
        ("bj430047.day", SecurityType::BjAStock),
    ];
    for (path, expected) in cases {
        assert_eq!(DailyBarReader::classify(path).unwrap(), expected, "{}", path);
    }
}

#[test]
fn test_classify_errors() {
    assert!(matches!(
        DailyBarReader::classify("xx600519.day"),
        Err(ReaderError::UnknownExchange(_))
    ));
    assert!(matches!(
        DailyBarReader::classify("bj123456.day"),
        Err(ReaderError::UnknownSecurityType(_))
    ));
    assert!(matches!(
        DailyBarReader::classify("short"),
        Err(ReaderError::UnknownExchange(_))
    ));
}

#[test]
fn test_coefficients() {
    assert_eq!(SecurityType::ShAStock.coefficient(), (0.01, 0.01));
    assert_eq!(SecurityType::ShBStock.coefficient(), (0.001, 0.01));
    assert_eq!(SecurityType::ShIndex.coefficient(), (0.01, 1.0));
    assert_eq!(SecurityType::SzFund.coefficient(), (0.001, 0.01));
}

#[test]
fn test_parse_daily_file() {
    let dir = temp_dir("parse_daily");
    let path = dir.join("sh600519.day");
    let mut content = daily_record(20231122, 17500, 17800, 17300, 17600, 1234567.0, 50000);
    content.extend(daily_record(20231123, 17600, 17900, 17550, 17850, 2345678.0, 60000));
    fs::write(&path, &content).unwrap();

    let reader = DailyBarReader::new();
    let bars = reader.parse_data_from_file(path.to_str().unwrap()).unwrap();
    assert_eq!(bars.len(), 2);

    let bar = &bars[0];
    assert_eq!(bar.datetime, "2023-11-22");
    assert_eq!((bar.year, bar.month, bar.day), (2023, 11, 22));
    assert_eq!(bar.open, 175.0);
    assert_eq!(bar.high, 178.0);
    assert_eq!(bar.low, 173.0);
    assert_eq!(bar.close, 176.0);
    assert_eq!(bar.amount, 1234567.0);
    assert_eq!(bar.volume, 500);

    // 升序
    assert!(bars[0].timestamp_millis() < bars[1].timestamp_millis());

    fs::remove_dir_all(&dir).unwrap();
}

#[test]
fn test_parse_fund_price_scale() {
    let dir = temp_dir("fund_scale");
    let path = dir.join("sh510050.day");
    fs::write(
        &path,
        daily_record(20231122, 2500, 2520, 2480, 2510, 1000.0, 10000),
    )
    .unwrap();

    let bars = DailyBarReader::new()
        .parse_data_from_file(path.to_str().unwrap())
        .unwrap();
    // 基金价格系数0.001
    assert_eq!(bars[0].open, 2.5);
    assert_eq!(bars[0].close, 2.51);

    fs::remove_dir_all(&dir).unwrap();
}

#[test]
fn test_missing_file_and_malformed_record() {
    let dir = temp_dir("errors");
    let reader = DailyBarReader::new();

    let missing = dir.join("sh600519.day");
    assert!(matches!(
        reader.parse_data_from_file(missing.to_str().unwrap()),
        Err(ReaderError::FileNotFound(_))
    ));

    // 截断的记录
    let path = dir.join("sz000001.day");
    fs::write(&path, [0u8; 40]).unwrap();
    assert!(matches!(
        reader.parse_data_from_file(path.to_str().unwrap()),
        Err(ReaderError::MalformedRecord { len: 40, width: 32 })
    ));

    fs::remove_dir_all(&dir).unwrap();
}

#[test]
fn test_find_daily_bars_windowing() {
    let dir = temp_dir("find_daily");
    let path = dir.join("sz000001.day");
    let mut content = Vec::new();
    for (i, date) in [20231120u32, 20231121, 20231122, 20231123, 20231124]
        .iter()
        .enumerate()
    {
        let base = 1000 + i as u32 * 10;
        content.extend(daily_record(*date, base, base + 5, base - 5, base + 2, 100.0, 1000));
    }
    fs::write(&path, &content).unwrap();

    let reader = DailyBarReader::new();
    let path = path.to_str().unwrap();

    // 闭区间
    let bars = reader
        .find_security_bars(path, Some("2023-11-21"), Some("2023-11-23"), 0)
        .unwrap();
    assert_eq!(bars.len(), 3);
    assert_eq!(bars[0].datetime, "2023-11-21");
    assert_eq!(bars[2].datetime, "2023-11-23");

    // 有起始日期取最早的 count 条
    let bars = reader
        .find_security_bars(path, Some("2023-11-21"), None, 2)
        .unwrap();
    assert_eq!(bars.len(), 2);
    assert_eq!(bars[0].datetime, "2023-11-21");
    assert_eq!(bars[1].datetime, "2023-11-22");

    // 只有结束日期取最新的 count 条
    let bars = reader
        .find_security_bars(path, None, Some("2023-11-23"), 2)
        .unwrap();
    assert_eq!(bars.len(), 2);
    assert_eq!(bars[0].datetime, "2023-11-22");
    assert_eq!(bars[1].datetime, "2023-11-23");

    // 无日期只有 count，取最新的 count 条
    let bars = reader.find_security_bars(path, None, None, 3).unwrap();
    assert_eq!(bars.len(), 3);
    assert_eq!(bars[0].datetime, "2023-11-22");
    assert_eq!(bars[2].datetime, "2023-11-24");

    // 区间外
    let bars = reader
        .find_security_bars(path, Some("2024-01-01"), None, 0)
        .unwrap();
    assert!(bars.is_empty());

    // 无法解析的日期必须报错而不是当作无边界
    assert!(matches!(
        reader.find_security_bars(path, Some("not-a-date"), None, 0),
        Err(ReaderError::BadDatetime(_))
    ));

    fs::remove_dir_all(dir).unwrap();
}

#[test]
fn test_parse_minute_file() {
    let dir = temp_dir("parse_minute");
    let path = dir.join("sz000001.lc1");
    let mut content = minute_record(2023, 11, 22, 571, 17.5, 17.52, 17.49, 17.51, 35000.0, 200);
    content.extend(minute_record(2023, 11, 22, 572, 17.51, 17.55, 17.5, 17.54, 42000.0, 240));
    fs::write(&path, &content).unwrap();

    let bars = MinuteBarReader::new()
        .parse_data_from_file(path.to_str().unwrap())
        .unwrap();
    assert_eq!(bars.len(), 2);
    assert_eq!(bars[0].datetime, "2023-11-22 09:31");
    assert_eq!(bars[0].open, 17.5);
    assert_eq!(bars[0].close, 17.51);
    assert_eq!(bars[0].volume, 200);
    assert_eq!(bars[1].datetime, "2023-11-22 09:32");

    fs::remove_dir_all(dir).unwrap();
}

#[test]
fn test_find_minute_bars_with_time_bounds() {
    let dir = temp_dir("find_minute");
    let path = dir.join("sz000001.lc1");
    let mut content = Vec::new();
    for m in 571u16..=580 {
        content.extend(minute_record(2023, 11, 22, m, 17.5, 17.6, 17.4, 17.55, 1000.0, 100));
    }
    fs::write(&path, &content).unwrap();

    let bars = MinuteBarReader::new()
        .find_security_bars(
            path.to_str().unwrap(),
            Some("2023-11-22 09:33"),
            Some("2023-11-22 09:36"),
            0,
        )
        .unwrap();
    assert_eq!(bars.len(), 4);
    assert_eq!(bars[0].datetime, "2023-11-22 09:33");
    assert_eq!(bars[3].datetime, "2023-11-22 09:36");

    fs::remove_dir_all(dir).unwrap();
}
