//! 各命令的请求编码与响应解码

use crate::protocol::{
    codec::{
        bytes_to_f32_le, bytes_to_u16_le, bytes_to_u32_le, decode_price, decode_tdx_float,
        decode_varint, gbk_to_utf8, round2, u16_to_bytes_le, u32_to_bytes_le, utf8_to_gbk,
    },
    constants::{Market, MessageType, Period},
    frame::RequestFrame,
    types::{
        Bar, CompanyCategory, ExRight, FinanceInfo, MinuteTime, Price, PriceLevel, PriceLevels,
        Quote, Security, TradeStatus, Transaction,
    },
};
use thiserror::Error;

/// 单页K线的协议上限
pub const MAX_BAR_COUNT: u16 = 800;

/// 单次行情查询的证券数量上限
pub const MAX_QUOTE_COUNT: usize = 80;

/// 消息编解码错误
#[derive(Debug, Error)]
pub enum MessageError {
    #[error("数据长度不足")]
    InsufficientData,
    #[error("无效的证券代码: {0}")]
    InvalidCode(String),
    #[error("解析错误: {0}")]
    ParseError(String),
}

/// 从 offset 起的剩余数据，越界时返回空切片（截断的响应按零值处理）
fn tail(data: &[u8], offset: usize) -> &[u8] {
    data.get(offset..).unwrap_or(&[])
}

fn push_code(data: &mut Vec<u8>, code: &str) -> Result<(), MessageError> {
    if code.len() != 6 || !code.bytes().all(|b| b.is_ascii_alphanumeric()) {
        return Err(MessageError::InvalidCode(code.to_string()));
    }
    data.extend_from_slice(code.as_bytes());
    Ok(())
}

// ==================== 握手 ====================

/// 握手命令（连接建立后必须依次完成三个命令）
pub struct Setup;

impl Setup {
    /// 握手命令3的固定数据域
    const VERIFY_DATA: [u8; 30] = [
        0xD5, 0xD0, 0xC9, 0xCC, 0xD6, 0xA4, 0xA8, 0xAF, 0x00, 0x00, 0x00, 0x8F, 0xC2, 0x25, 0x40,
        0x13, 0x00, 0x00, 0xD5, 0x00, 0xC9, 0xCC, 0xBD, 0xF0, 0xD7, 0xEA, 0x00, 0x00, 0x00, 0x02,
    ];

    pub fn cmd1(msg_id: u32) -> RequestFrame {
        RequestFrame::new(msg_id, MessageType::Setup, vec![0x01])
    }

    pub fn cmd2(msg_id: u32) -> RequestFrame {
        RequestFrame::new(msg_id, MessageType::Setup, vec![0x02])
    }

    pub fn cmd3(msg_id: u32) -> RequestFrame {
        RequestFrame::new(msg_id, MessageType::SetupVerify, Self::VERIFY_DATA.to_vec())
    }
}

// ==================== 证券数量 ====================

/// 证券数量查询（心跳也使用该命令）
pub struct SecurityCount;

impl SecurityCount {
    pub fn request(msg_id: u32, market: Market) -> RequestFrame {
        let data = vec![market.as_u8(), 0x00, 0x75, 0xC7, 0x33, 0x01];
        RequestFrame::new(msg_id, MessageType::SecurityCount, data)
    }

    pub fn decode_response(data: &[u8]) -> Result<u16, MessageError> {
        if data.len() < 2 {
            return Err(MessageError::InsufficientData);
        }
        Ok(bytes_to_u16_le(data))
    }
}

// ==================== 证券列表 ====================

/// 证券列表查询（单次最多1000条）
pub struct SecurityList;

impl SecurityList {
    pub fn request(msg_id: u32, market: Market, start: u16) -> RequestFrame {
        let mut data = vec![market.as_u8(), 0x00];
        data.extend_from_slice(&u16_to_bytes_le(start));
        RequestFrame::new(msg_id, MessageType::SecurityList, data)
    }

    pub fn decode_response(data: &[u8]) -> Result<Vec<Security>, MessageError> {
        if data.len() < 2 {
            return Err(MessageError::InsufficientData);
        }

        let count = bytes_to_u16_le(&data[0..2]);
        let mut list = Vec::with_capacity(count as usize);
        let mut offset = 2;

        for _ in 0..count {
            if offset + 29 > data.len() {
                return Err(MessageError::InsufficientData);
            }

            let code = String::from_utf8_lossy(&data[offset..offset + 6]).to_string();
            let multiple = bytes_to_u16_le(&data[offset + 6..offset + 8]);
            let name = gbk_to_utf8(&data[offset + 8..offset + 16]);
            let decimal = data[offset + 20] as i8;
            let pre_close = decode_tdx_float(&data[offset + 21..offset + 25]);

            list.push(Security {
                code,
                name,
                multiple,
                decimal,
                pre_close,
            });

            offset += 29;
        }

        Ok(list)
    }
}

// ==================== 五档行情 ====================

/// 五档行情查询
pub struct SecurityQuotes;

impl SecurityQuotes {
    /// 每次最多查询 [`MAX_QUOTE_COUNT`] 只证券，超出部分由调用方截断
    pub fn request(msg_id: u32, codes: &[(Market, String)]) -> Result<RequestFrame, MessageError> {
        let mut data = vec![0x05, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00];
        data.extend_from_slice(&u16_to_bytes_le(codes.len() as u16));

        for (market, code) in codes {
            data.push(market.as_u8());
            push_code(&mut data, code)?;
        }

        Ok(RequestFrame::new(msg_id, MessageType::SecurityQuotes, data))
    }

    pub fn decode_response(data: &[u8]) -> Result<Vec<Quote>, MessageError> {
        if data.len() < 4 {
            return Err(MessageError::InsufficientData);
        }

        // 前2字节未知，第3-4字节是数量
        let mut offset = 2;
        let count = bytes_to_u16_le(&data[offset..offset + 2]);
        offset += 2;

        let mut quotes = Vec::with_capacity(count as usize);

        for _ in 0..count {
            if offset + 9 > data.len() {
                return Err(MessageError::InsufficientData);
            }

            let market_val = data[offset];
            let market = Market::from_u8(market_val)
                .ok_or_else(|| MessageError::ParseError(format!("无效的市场: {}", market_val)))?;
            offset += 1;

            let code = gbk_to_utf8(&data[offset..offset + 6]);
            offset += 6;

            let active1 = bytes_to_u16_le(&data[offset..offset + 2]);
            offset += 2;

            // 现价与其余价格均为相对现价的差值
            let (price_raw, consumed) = decode_price(tail(data, offset));
            offset += consumed;
            let (last_diff, consumed) = decode_price(tail(data, offset));
            offset += consumed;
            let (open_diff, consumed) = decode_price(tail(data, offset));
            offset += consumed;
            let (high_diff, consumed) = decode_price(tail(data, offset));
            offset += consumed;
            let (low_diff, consumed) = decode_price(tail(data, offset));
            offset += consumed;

            let price = Price(price_raw.0 * 10);
            let pre_close = Price(price.0 + last_diff.0 * 10);
            let open = Price(price.0 + open_diff.0 * 10);
            let high = Price(price.0 + high_diff.0 * 10);
            let low = Price(price.0 + low_diff.0 * 10);

            // 服务器时间
            let (server_time_raw, consumed) = decode_varint(tail(data, offset));
            offset += consumed;
            let server_time = format!("{}", server_time_raw);

            let (_reserved, consumed) = decode_varint(tail(data, offset));
            offset += consumed;

            let (total_hand, consumed) = decode_varint(tail(data, offset));
            offset += consumed;

            let (cur_hand, consumed) = decode_varint(tail(data, offset));
            offset += consumed;

            if offset + 4 > data.len() {
                return Err(MessageError::InsufficientData);
            }
            let amount = decode_tdx_float(&data[offset..offset + 4]);
            offset += 4;

            let (inner_disc, consumed) = decode_varint(tail(data, offset));
            offset += consumed;
            let (outer_disc, consumed) = decode_varint(tail(data, offset));
            offset += consumed;

            for _ in 0..2 {
                let (_reserved, consumed) = decode_varint(tail(data, offset));
                offset += consumed;
            }

            // 5档买卖盘，价格为相对现价的差值
            let empty = PriceLevel {
                buy: true,
                price: Price(0),
                number: 0,
            };
            let mut bid_levels: PriceLevels = [empty; 5];
            let mut ask_levels: PriceLevels = [PriceLevel { buy: false, ..empty }; 5];

            for i in 0..5 {
                let (bid_diff, consumed) = decode_price(tail(data, offset));
                offset += consumed;
                bid_levels[i].price = Price(bid_diff.0 * 10 + price.0);

                let (ask_diff, consumed) = decode_price(tail(data, offset));
                offset += consumed;
                ask_levels[i].price = Price(ask_diff.0 * 10 + price.0);

                let (bid_num, consumed) = decode_varint(tail(data, offset));
                offset += consumed;
                bid_levels[i].number = bid_num;

                let (ask_num, consumed) = decode_varint(tail(data, offset));
                offset += consumed;
                ask_levels[i].number = ask_num;
            }

            // 2字节保留 + 4个变长保留字段
            offset += 2;
            for _ in 0..4 {
                let (_reserved, consumed) = decode_varint(tail(data, offset));
                offset += consumed;
            }

            if offset + 4 > data.len() {
                return Err(MessageError::InsufficientData);
            }
            let rate = bytes_to_u16_le(&data[offset..offset + 2]) as f64 / 100.0;
            offset += 2;
            let active2 = bytes_to_u16_le(&data[offset..offset + 2]);
            offset += 2;

            quotes.push(Quote {
                market,
                code,
                active1,
                pre_close,
                open,
                high,
                low,
                price,
                server_time,
                total_hand,
                cur_hand,
                amount,
                inner_disc,
                outer_disc,
                bid_levels,
                ask_levels,
                rate,
                active2,
            });
        }

        Ok(quotes)
    }
}

// ==================== K线 ====================

/// K线查询（个股与指数共用命令号，解码时以 is_index 区分）
pub struct BarsMsg;

impl BarsMsg {
    pub fn request(
        msg_id: u32,
        period: Period,
        market: Market,
        code: &str,
        start: u16,
        count: u16,
    ) -> Result<RequestFrame, MessageError> {
        if count > MAX_BAR_COUNT {
            return Err(MessageError::ParseError(format!(
                "单次K线数量不能超过{}",
                MAX_BAR_COUNT
            )));
        }

        let mut data = vec![market.as_u8(), 0x00];
        push_code(&mut data, code)?;
        data.push(period.as_u8());
        data.push(0x00);
        data.extend_from_slice(&[0x01, 0x00]);
        data.extend_from_slice(&u16_to_bytes_le(start));
        data.extend_from_slice(&u16_to_bytes_le(count));
        data.extend_from_slice(&[0u8; 10]); // 保留字段

        Ok(RequestFrame::new(msg_id, MessageType::Bars, data))
    }

    pub fn decode_response(
        data: &[u8],
        period: Period,
        is_index: bool,
    ) -> Result<Vec<Bar>, MessageError> {
        if data.len() < 2 {
            return Err(MessageError::InsufficientData);
        }

        let count = bytes_to_u16_le(&data[0..2]);
        let mut offset = 2;
        let mut list = Vec::with_capacity(count as usize);
        let mut last_raw: i64 = 0;

        for _ in 0..count {
            if offset + 4 > data.len() {
                return Err(MessageError::InsufficientData);
            }

            let (datetime, year, month, day) = decode_bar_time(&data[offset..offset + 4], period)?;
            offset += 4;

            // 价格为变长差值编码，基于上一根K线的收盘价累加
            let (open_diff, consumed) = decode_price(tail(data, offset));
            offset += consumed;
            let (close_diff, consumed) = decode_price(tail(data, offset));
            offset += consumed;
            let (high_diff, consumed) = decode_price(tail(data, offset));
            offset += consumed;
            let (low_diff, consumed) = decode_price(tail(data, offset));
            offset += consumed;

            let open_raw = last_raw + open_diff.0;
            let close_raw = open_raw + close_diff.0;
            let high_raw = open_raw + high_diff.0;
            let low_raw = open_raw + low_diff.0;

            if offset + 8 > data.len() {
                return Err(MessageError::InsufficientData);
            }
            let mut volume = decode_tdx_float(&data[offset..offset + 4]) as i64;
            offset += 4;
            if period.has_time() {
                volume /= 100;
            }
            let amount = round2(decode_tdx_float(&data[offset..offset + 4]));
            offset += 4;

            // 指数K线多出4字节的上涨/下跌家数
            if is_index {
                if offset + 4 > data.len() {
                    return Err(MessageError::InsufficientData);
                }
                volume *= 100;
                offset += 4;
            }

            last_raw = close_raw;

            list.push(Bar {
                datetime,
                year,
                month,
                day,
                open: round2(open_raw as f64 / 1000.0),
                high: round2(high_raw as f64 / 1000.0),
                low: round2(low_raw as f64 / 1000.0),
                close: round2(close_raw as f64 / 1000.0),
                amount,
                volume,
            });
        }

        Ok(list)
    }
}

/// 解码K线时间字段（4字节，编码方式随周期变化）
fn decode_bar_time(
    data: &[u8],
    period: Period,
) -> Result<(String, i32, u32, u32), MessageError> {
    if period.has_time() {
        // 前2字节压缩年月日，后2字节为当日分钟数
        let ymd = bytes_to_u16_le(&data[0..2]);
        let hm = bytes_to_u16_le(&data[2..4]);

        let year = ((ymd >> 11) + 2004) as i32;
        let month = ((ymd % 2048) / 100) as u32;
        let day = ((ymd % 2048) % 100) as u32;
        let hour = (hm / 60) as u32;
        let minute = (hm % 60) as u32;

        Ok((
            format!("{:04}-{:02}-{:02} {:02}:{:02}", year, month, day, hour, minute),
            year,
            month,
            day,
        ))
    } else {
        // 4字节 YYYYMMDD
        let val = bytes_to_u32_le(data);
        let year = (val / 10000) as i32;
        let month = (val % 10000) / 100;
        let day = val % 100;

        Ok((format!("{:04}-{:02}-{:02}", year, month, day), year, month, day))
    }
}

// ==================== 分时数据 ====================

/// 分时数据查询
pub struct MinuteTimeMsg;

impl MinuteTimeMsg {
    pub fn request(msg_id: u32, market: Market, code: &str) -> Result<RequestFrame, MessageError> {
        let mut data = vec![market.as_u8(), 0x00];
        push_code(&mut data, code)?;
        data.extend_from_slice(&[0x00, 0x00, 0x00, 0x00]);
        Ok(RequestFrame::new(msg_id, MessageType::MinuteTimeData, data))
    }

    /// 前2字节数量，2-6字节未知；每条记录为价格差值 + 保留差值 + 成交量。
    /// 时间从 09:30 起逐分钟推进，第120条后跳过午间休市的90分钟。
    pub fn decode_response(data: &[u8]) -> Result<Vec<MinuteTime>, MessageError> {
        if data.len() < 6 {
            return Err(MessageError::InsufficientData);
        }

        let count = bytes_to_u16_le(&data[0..2]);
        let mut offset = 6;
        let mut list = Vec::with_capacity(count as usize);
        let mut last_raw: i64 = 0;

        for i in 0..count {
            let (price_diff, consumed) = decode_price(tail(data, offset));
            offset += consumed;
            let (_reserved, consumed) = decode_price(tail(data, offset));
            offset += consumed;
            last_raw += price_diff.0;

            let (number, consumed) = decode_varint(tail(data, offset));
            offset += consumed;

            let total_minutes = if i < 120 {
                9 * 60 + 30 + (i + 1) as u32
            } else {
                11 * 60 + (i + 1) as u32
            };
            let time = format!("{:02}:{:02}", total_minutes / 60, total_minutes % 60);

            list.push(MinuteTime {
                time,
                price: Price(last_raw * 10),
                number,
            });
        }

        Ok(list)
    }
}

/// 历史分时数据查询（date 格式 YYYYMMDD）
pub struct HistoryMinuteTimeMsg;

impl HistoryMinuteTimeMsg {
    pub fn request(
        msg_id: u32,
        date: &str,
        market: Market,
        code: &str,
    ) -> Result<RequestFrame, MessageError> {
        let date_num: u32 = date
            .parse()
            .map_err(|_| MessageError::ParseError(format!("无效的日期: {}", date)))?;

        let mut data = u32_to_bytes_le(date_num).to_vec();
        data.push(market.as_u8());
        push_code(&mut data, code)?;

        Ok(RequestFrame::new(
            msg_id,
            MessageType::HistoryMinuteTimeData,
            data,
        ))
    }

    /// 响应格式与当日分时相同
    pub fn decode_response(data: &[u8]) -> Result<Vec<MinuteTime>, MessageError> {
        MinuteTimeMsg::decode_response(data)
    }
}

// ==================== 分时成交 ====================

fn format_trade_datetime(date: &str, minutes: u16) -> String {
    let (hour, minute) = (minutes / 60, minutes % 60);
    if date.len() == 8 {
        format!(
            "{}-{}-{} {:02}:{:02}",
            &date[0..4],
            &date[4..6],
            &date[6..8],
            hour,
            minute
        )
    } else {
        format!("{} {:02}:{:02}", date, hour, minute)
    }
}

/// 分时成交查询（单次最多1800条）
pub struct TransactionMsg;

impl TransactionMsg {
    pub fn request(
        msg_id: u32,
        market: Market,
        code: &str,
        start: u16,
        count: u16,
    ) -> Result<RequestFrame, MessageError> {
        let mut data = vec![market.as_u8(), 0x00];
        push_code(&mut data, code)?;
        data.extend_from_slice(&u16_to_bytes_le(start));
        data.extend_from_slice(&u16_to_bytes_le(count));
        Ok(RequestFrame::new(msg_id, MessageType::TransactionData, data))
    }

    /// date 为当天日期（YYYYMMDD），仅用于拼接成交时间
    pub fn decode_response(data: &[u8], date: &str) -> Result<Vec<Transaction>, MessageError> {
        if data.len() < 2 {
            return Err(MessageError::InsufficientData);
        }

        let count = bytes_to_u16_le(&data[0..2]);
        let mut offset = 2;
        let mut list = Vec::with_capacity(count as usize);
        let mut last_raw: i64 = 0;

        for _ in 0..count {
            if offset + 2 > data.len() {
                return Err(MessageError::InsufficientData);
            }

            let minutes = bytes_to_u16_le(&data[offset..offset + 2]);
            offset += 2;

            let (price_diff, consumed) = decode_price(tail(data, offset));
            offset += consumed;
            last_raw += price_diff.0 * 10;

            let (volume, consumed) = decode_varint(tail(data, offset));
            offset += consumed;
            let (number, consumed) = decode_varint(tail(data, offset));
            offset += consumed;

            let (status_val, consumed) = decode_varint(tail(data, offset));
            offset += consumed;
            let status = match status_val {
                0 => TradeStatus::Buy,
                1 => TradeStatus::Sell,
                _ => TradeStatus::Neutral,
            };

            let (_reserved, consumed) = decode_varint(tail(data, offset));
            offset += consumed;

            list.push(Transaction {
                datetime: format_trade_datetime(date, minutes),
                price: Price(last_raw),
                volume,
                number,
                status,
            });
        }

        Ok(list)
    }
}

/// 历史分时成交查询（单次最多2000条，date 格式 YYYYMMDD）
pub struct HistoryTransactionMsg;

impl HistoryTransactionMsg {
    pub fn request(
        msg_id: u32,
        date: &str,
        market: Market,
        code: &str,
        start: u16,
        count: u16,
    ) -> Result<RequestFrame, MessageError> {
        let date_num: u32 = date
            .parse()
            .map_err(|_| MessageError::ParseError(format!("无效的日期: {}", date)))?;

        let mut data = u32_to_bytes_le(date_num).to_vec();
        data.push(market.as_u8());
        data.push(0x00);
        push_code(&mut data, code)?;
        data.extend_from_slice(&u16_to_bytes_le(start));
        data.extend_from_slice(&u16_to_bytes_le(count));

        Ok(RequestFrame::new(
            msg_id,
            MessageType::HistoryTransactionData,
            data,
        ))
    }

    pub fn decode_response(data: &[u8], date: &str) -> Result<Vec<Transaction>, MessageError> {
        if data.len() < 6 {
            return Err(MessageError::InsufficientData);
        }

        let count = bytes_to_u16_le(&data[0..2]);
        let mut offset = 6; // 前2字节数量，2-6字节未知
        let mut list = Vec::with_capacity(count as usize);
        let mut last_raw: i64 = 0;

        for _ in 0..count {
            if offset + 2 > data.len() {
                return Err(MessageError::InsufficientData);
            }

            let minutes = bytes_to_u16_le(&data[offset..offset + 2]);
            offset += 2;

            let (price_diff, consumed) = decode_price(tail(data, offset));
            offset += consumed;
            last_raw += price_diff.0 * 10;

            let (volume, consumed) = decode_varint(tail(data, offset));
            offset += consumed;

            let (status_val, consumed) = decode_varint(tail(data, offset));
            offset += consumed;
            let status = match status_val {
                0 => TradeStatus::Buy,
                1 => TradeStatus::Sell,
                _ => TradeStatus::Neutral,
            };

            let (_reserved, consumed) = decode_varint(tail(data, offset));
            offset += consumed;

            list.push(Transaction {
                datetime: format_trade_datetime(date, minutes),
                price: Price(last_raw),
                volume,
                number: 0, // 历史数据无单数
                status,
            });
        }

        Ok(list)
    }
}

// ==================== 除权除息 ====================

/// 除权除息查询
pub struct ExRightMsg;

impl ExRightMsg {
    pub fn request(msg_id: u32, market: Market, code: &str) -> Result<RequestFrame, MessageError> {
        let mut data = vec![0x01, 0x00];
        data.push(market.as_u8());
        push_code(&mut data, code)?;
        Ok(RequestFrame::new(msg_id, MessageType::ExRightInfo, data))
    }

    pub fn decode_response(data: &[u8]) -> Result<Vec<ExRight>, MessageError> {
        if data.len() < 11 {
            return Err(MessageError::InsufficientData);
        }

        let count = bytes_to_u16_le(&data[9..11]);
        let mut offset = 11;
        let mut list = Vec::with_capacity(count as usize);

        for _ in 0..count {
            if offset + 29 > data.len() {
                return Err(MessageError::InsufficientData);
            }

            let market = Market::from_u8(data[offset]).unwrap_or(Market::SZ);
            let code = String::from_utf8_lossy(&data[offset + 1..offset + 7]).to_string();

            let date_val = bytes_to_u32_le(&data[offset + 8..offset + 12]);
            let date = format!(
                "{:04}-{:02}-{:02}",
                date_val / 10000,
                (date_val % 10000) / 100,
                date_val % 100
            );

            let category = data[offset + 12] as i32;
            offset += 13;

            let f32_at = |i: usize| bytes_to_f32_le(&data[offset + i..offset + i + 4]) as f64;

            // 四个数值字段的含义与编码随类别变化
            let (c1, c2, c3, c4) = match category {
                1 => (f32_at(0), f32_at(4), f32_at(8), f32_at(12)),
                11 | 12 => (0.0, 0.0, f32_at(8), 0.0),
                13 | 14 => (f32_at(0), 0.0, f32_at(8), 0.0),
                _ => (
                    decode_tdx_float(&data[offset..offset + 4]) * 1e4,
                    decode_tdx_float(&data[offset + 4..offset + 8]) * 1e4,
                    decode_tdx_float(&data[offset + 8..offset + 12]) * 1e4,
                    decode_tdx_float(&data[offset + 12..offset + 16]) * 1e4,
                ),
            };
            offset += 16;

            list.push(ExRight {
                market,
                code,
                date,
                category,
                c1,
                c2,
                c3,
                c4,
            });
        }

        Ok(list)
    }
}

// ==================== 财务信息 ====================

/// 财务信息查询
pub struct FinanceInfoMsg;

impl FinanceInfoMsg {
    pub fn request(msg_id: u32, market: Market, code: &str) -> Result<RequestFrame, MessageError> {
        let mut data = vec![0x01, 0x00];
        data.push(market.as_u8());
        push_code(&mut data, code)?;
        Ok(RequestFrame::new(msg_id, MessageType::FinanceInfo, data))
    }

    pub fn decode_response(data: &[u8]) -> Result<FinanceInfo, MessageError> {
        if data.len() < 63 {
            return Err(MessageError::InsufficientData);
        }

        // 2字节数量（恒为1），随后是市场、代码与财务字段
        let market = Market::from_u8(data[2])
            .ok_or_else(|| MessageError::ParseError(format!("无效的市场: {}", data[2])))?;
        let code = String::from_utf8_lossy(&data[3..9]).to_string();

        Ok(FinanceInfo {
            market,
            code,
            liu_tong_gu_ben: decode_tdx_float(&data[11..15]),
            province: bytes_to_u16_le(&data[15..17]),
            industry: bytes_to_u16_le(&data[17..19]),
            updated_date: bytes_to_u32_le(&data[19..23]),
            ipo_date: bytes_to_u32_le(&data[23..27]),
            zong_gu_ben: decode_tdx_float(&data[27..31]),
            mei_gu_jing_zi_chan: round2(bytes_to_f32_le(&data[55..59]) as f64),
            mei_gu_shou_yi: round2(bytes_to_f32_le(&data[59..63]) as f64),
        })
    }
}

// ==================== 公司信息 ====================

/// 公司信息目录查询
pub struct CompanyCategoryMsg;

impl CompanyCategoryMsg {
    pub fn request(msg_id: u32, market: Market, code: &str) -> Result<RequestFrame, MessageError> {
        let mut data = vec![market.as_u8(), 0x00];
        push_code(&mut data, code)?;
        data.extend_from_slice(&[0x00, 0x00, 0x00, 0x00]);
        Ok(RequestFrame::new(
            msg_id,
            MessageType::CompanyInfoCategory,
            data,
        ))
    }

    pub fn decode_response(data: &[u8]) -> Result<Vec<CompanyCategory>, MessageError> {
        if data.len() < 2 {
            return Err(MessageError::InsufficientData);
        }

        let count = bytes_to_u16_le(&data[0..2]);
        let mut offset = 2;
        let mut list = Vec::with_capacity(count as usize);

        // 每条记录：名称64字节 + 文件名80字节 + 起始 u32 + 长度 u32
        for _ in 0..count {
            if offset + 152 > data.len() {
                return Err(MessageError::InsufficientData);
            }

            let name = gbk_to_utf8(&data[offset..offset + 64]);
            let filename = gbk_to_utf8(&data[offset + 64..offset + 144]);
            let start = bytes_to_u32_le(&data[offset + 144..offset + 148]);
            let length = bytes_to_u32_le(&data[offset + 148..offset + 152]);

            list.push(CompanyCategory {
                name,
                filename,
                start,
                length,
            });

            offset += 152;
        }

        Ok(list)
    }
}

/// 公司信息内容查询
pub struct CompanyContentMsg;

impl CompanyContentMsg {
    pub fn request(
        msg_id: u32,
        market: Market,
        code: &str,
        filename: &str,
        start: u32,
        length: u32,
    ) -> Result<RequestFrame, MessageError> {
        let mut data = vec![market.as_u8(), 0x00];
        push_code(&mut data, code)?;
        data.extend_from_slice(&[0x00, 0x00]);

        // 文件名填充到80字节
        let mut name_bytes = utf8_to_gbk(filename);
        name_bytes.resize(80, 0x00);
        data.extend_from_slice(&name_bytes);

        data.extend_from_slice(&u32_to_bytes_le(start));
        data.extend_from_slice(&u32_to_bytes_le(length));
        data.extend_from_slice(&[0x00, 0x00, 0x00, 0x00]);

        Ok(RequestFrame::new(
            msg_id,
            MessageType::CompanyInfoContent,
            data,
        ))
    }

    pub fn decode_response(data: &[u8]) -> Result<String, MessageError> {
        if data.len() < 11 {
            return Err(MessageError::InsufficientData);
        }

        let length = bytes_to_u16_le(&data[9..11]) as usize;
        if data.len() < 11 + length {
            return Err(MessageError::InsufficientData);
        }

        Ok(gbk_to_utf8(&data[11..11 + length]))
    }
}
