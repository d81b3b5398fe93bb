//! 协议测试 - 手工构造帧字节验证编解码

use flate2::{write::ZlibEncoder, Compression};
use std::io::Write;
use tdx_hq::protocol::codec::{encode_varint, u16_to_bytes_le};
use tdx_hq::protocol::constants::{Market, MessageType, Period, PREFIX};
use tdx_hq::protocol::frame::{RequestFrame, ResponseFrame};
use tdx_hq::protocol::messages::{
    BarsMsg, MinuteTimeMsg, SecurityCount, Setup, TransactionMsg,
};
use tdx_hq::protocol::types::TradeStatus;

#[test]
fn test_setup_cmd1_request() {
    let encoded = Setup::cmd1(1).encode();
    assert_eq!(hex::encode(&encoded), "0c0100000001030003000d0001");
    assert_eq!(encoded[0], PREFIX);
    assert_eq!(encoded.len(), 13);

    let frame = RequestFrame::decode(&encoded).unwrap();
    assert_eq!(frame.msg_id, 1);
    assert_eq!(frame.msg_type, MessageType::Setup);
    assert_eq!(frame.data, vec![0x01]);
}

#[test]
fn test_security_count_request() {
    let encoded = SecurityCount::request(2, Market::SH).encode();
    assert_eq!(hex::encode(&encoded), "0c0200000001080008004e04010075c73301");
}

#[test]
fn test_setup_cmd3_verify_data() {
    let frame = Setup::cmd3(3);
    assert_eq!(
        hex::encode(&frame.data),
        "d5d0c9ccd6a4a8af0000008fc22540130000d500c9ccbdf0d7ea00000002"
    );
}

/// 构造响应帧字节（zip=true 时压缩数据域）
fn build_response(msg_id: u32, msg_type: MessageType, body: &[u8], zip: bool) -> Vec<u8> {
    let payload = if zip {
        let mut encoder = ZlibEncoder::new(Vec::new(), Compression::default());
        encoder.write_all(body).unwrap();
        encoder.finish().unwrap()
    } else {
        body.to_vec()
    };

    let mut bytes = vec![0xB1, 0xCB, 0x74, 0x00, 0x1C];
    bytes.extend_from_slice(&msg_id.to_le_bytes());
    bytes.push(0x00);
    bytes.extend_from_slice(&u16_to_bytes_le(msg_type.as_u16()));
    bytes.extend_from_slice(&u16_to_bytes_le(payload.len() as u16));
    bytes.extend_from_slice(&u16_to_bytes_le(body.len() as u16));
    bytes.extend_from_slice(&payload);
    bytes
}

#[test]
fn test_compressed_response_roundtrip() {
    let body: Vec<u8> = (0..200u16).map(|i| (i % 251) as u8).collect();
    let bytes = build_response(9, MessageType::SecurityList, &body, true);

    let response = ResponseFrame::decode(&bytes).unwrap();
    assert!(response.is_success());
    assert_eq!(response.msg_id, 9);
    assert_ne!(response.zip_length, response.length);
    assert_eq!(response.data(), &body[..]);
}

#[test]
fn test_uncompressed_response() {
    let bytes = build_response(4, MessageType::SecurityCount, &[0xC8, 0x01], false);
    let response = ResponseFrame::decode(&bytes).unwrap();
    assert_eq!(SecurityCount::decode_response(response.data()).unwrap(), 456);
}

/// 构造两根日K线的响应数据域并解码
#[test]
fn test_bars_decode_accumulates_prices() {
    let mut body = Vec::new();
    body.extend_from_slice(&2u16.to_le_bytes());

    // 第一根：2023-11-21，开17.50 收17.60 高17.80 低17.30
    body.extend_from_slice(&20231121u32.to_le_bytes());
    body.extend_from_slice(&encode_varint(17500)); // 开（相对上一根收盘）
    body.extend_from_slice(&encode_varint(100)); // 收（相对开盘）
    body.extend_from_slice(&encode_varint(300)); // 高
    body.extend_from_slice(&encode_varint(-200)); // 低
    body.extend_from_slice(&[0u8; 8]); // 量、额（零值编码）

    // 第二根：2023-11-22，开17.50（17600-100）收17.65
    body.extend_from_slice(&20231122u32.to_le_bytes());
    body.extend_from_slice(&encode_varint(-100));
    body.extend_from_slice(&encode_varint(150));
    body.extend_from_slice(&encode_varint(200));
    body.extend_from_slice(&encode_varint(-50));
    body.extend_from_slice(&[0u8; 8]);

    let bars = BarsMsg::decode_response(&body, Period::Day, false).unwrap();
    assert_eq!(bars.len(), 2);

    assert_eq!(bars[0].datetime, "2023-11-21");
    assert_eq!(bars[0].open, 17.5);
    assert_eq!(bars[0].close, 17.6);
    assert_eq!(bars[0].high, 17.8);
    assert_eq!(bars[0].low, 17.3);

    assert_eq!(bars[1].datetime, "2023-11-22");
    assert_eq!(bars[1].open, 17.5);
    assert_eq!(bars[1].close, 17.65);
    assert_eq!(bars[1].high, 17.7);
    assert_eq!(bars[1].low, 17.45);
}

#[test]
fn test_index_bars_consume_extra_fields() {
    let mut body = Vec::new();
    body.extend_from_slice(&1u16.to_le_bytes());
    body.extend_from_slice(&20231122u32.to_le_bytes());
    body.extend_from_slice(&encode_varint(3000000)); // 3000.000
    body.extend_from_slice(&encode_varint(5000));
    body.extend_from_slice(&encode_varint(8000));
    body.extend_from_slice(&encode_varint(-2000));
    body.extend_from_slice(&[0u8; 8]); // 量、额
    body.extend_from_slice(&[0u8; 4]); // 上涨/下跌家数

    let bars = BarsMsg::decode_response(&body, Period::Day, true).unwrap();
    assert_eq!(bars.len(), 1);
    assert_eq!(bars[0].open, 3000.0);
    assert_eq!(bars[0].close, 3005.0);
}

#[test]
fn test_minute_time_decode() {
    let mut body = Vec::new();
    body.extend_from_slice(&2u16.to_le_bytes());
    body.extend_from_slice(&[0u8; 4]); // 未知头

    // 09:31 价17.50
    body.extend_from_slice(&encode_varint(1750));
    body.extend_from_slice(&encode_varint(0));
    body.extend_from_slice(&encode_varint(100));
    // 09:32 价17.52
    body.extend_from_slice(&encode_varint(2));
    body.extend_from_slice(&encode_varint(0));
    body.extend_from_slice(&encode_varint(50));

    let list = MinuteTimeMsg::decode_response(&body).unwrap();
    assert_eq!(list.len(), 2);
    assert_eq!(list[0].time, "09:31");
    assert_eq!(list[0].price.to_yuan(), 17.5);
    assert_eq!(list[0].number, 100);
    assert_eq!(list[1].time, "09:32");
    assert_eq!(list[1].price.to_yuan(), 17.52);
}

#[test]
fn test_transaction_decode() {
    let mut body = Vec::new();
    body.extend_from_slice(&1u16.to_le_bytes());

    body.extend_from_slice(&570u16.to_le_bytes()); // 09:30
    body.extend_from_slice(&encode_varint(1750)); // 17.50
    body.extend_from_slice(&encode_varint(200)); // 量
    body.extend_from_slice(&encode_varint(15)); // 单数
    body.extend_from_slice(&encode_varint(0)); // 买
    body.extend_from_slice(&encode_varint(0)); // 保留

    let list = TransactionMsg::decode_response(&body, "20231122").unwrap();
    assert_eq!(list.len(), 1);
    assert_eq!(list[0].datetime, "2023-11-22 09:30");
    assert_eq!(list[0].price.to_yuan(), 17.5);
    assert_eq!(list[0].volume, 200);
    assert_eq!(list[0].number, 15);
    assert_eq!(list[0].status, TradeStatus::Buy);
}

#[test]
fn test_bars_request_roundtrip() {
    let frame = BarsMsg::request(11, Period::Minute5, Market::SH, "600519", 700, 700).unwrap();
    let decoded = RequestFrame::decode(&frame.encode()).unwrap();
    assert_eq!(decoded.msg_id, 11);
    assert_eq!(decoded.msg_type, MessageType::Bars);
    assert_eq!(decoded.data, frame.data);
}
