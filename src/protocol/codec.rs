//! 字段级编解码工具函数

use crate::protocol::types::Price;
use encoding_rs::GBK;

/// 将字节数组转换为小端序的 u16
pub fn bytes_to_u16_le(bytes: &[u8]) -> u16 {
    if bytes.len() < 2 {
        return 0;
    }
    u16::from_le_bytes([bytes[0], bytes[1]])
}

/// 将字节数组转换为小端序的 u32
pub fn bytes_to_u32_le(bytes: &[u8]) -> u32 {
    if bytes.len() < 4 {
        return 0;
    }
    u32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]])
}

/// 将字节数组转换为小端序的 f32
pub fn bytes_to_f32_le(bytes: &[u8]) -> f32 {
    if bytes.len() < 4 {
        return 0.0;
    }
    f32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]])
}

/// 将 u16 转换为小端序字节数组
pub fn u16_to_bytes_le(value: u16) -> [u8; 2] {
    value.to_le_bytes()
}

/// 将 u32 转换为小端序字节数组
pub fn u32_to_bytes_le(value: u32) -> [u8; 4] {
    value.to_le_bytes()
}

/// 将 GBK 编码的字节数组转换为 UTF-8 字符串
pub fn gbk_to_utf8(bytes: &[u8]) -> String {
    let (cow, _, _) = GBK.decode(bytes);
    cow.trim_end_matches('\0').to_string()
}

/// 将 UTF-8 字符串转换为 GBK 编码的字节数组
pub fn utf8_to_gbk(s: &str) -> Vec<u8> {
    let (cow, _, _) = GBK.encode(s);
    cow.to_vec()
}

/// 解析变长整数编码
///
/// 第一字节：
/// - 第7位（最高位）：0x80，是否有后续字节
/// - 第6位：0x40，符号位（1=负）
/// - 低6位：有效数据位
///
/// 后续字节：
/// - 第7位：0x80，是否有后续字节
/// - 低7位：有效数据位
pub fn decode_varint(bytes: &[u8]) -> (i32, usize) {
    if bytes.is_empty() {
        return (0, 0);
    }

    let mut data: i64 = 0;
    let mut consumed = 0;

    // 5字节已覆盖 i32 全域，畸形数据的多余延续字节不再消费
    for (i, &byte) in bytes.iter().take(5).enumerate() {
        if i == 0 {
            data += (byte & 0x3F) as i64;
        } else {
            data += ((byte & 0x7F) as i64) << (6 + (i - 1) * 7);
        }

        consumed += 1;

        if byte & 0x80 == 0 {
            break;
        }
    }

    if bytes[0] & 0x40 > 0 {
        data = -data;
    }

    (data as i32, consumed)
}

/// 编码变长整数（与 decode_varint 互逆）
pub fn encode_varint(value: i32) -> Vec<u8> {
    let mut result = Vec::new();
    let mut val = value.abs();

    let mut first_byte = (val & 0x3F) as u8;
    val >>= 6;

    if value < 0 {
        first_byte |= 0x40;
    }
    if val > 0 {
        first_byte |= 0x80;
    }
    result.push(first_byte);

    while val > 0 {
        let mut byte = (val & 0x7F) as u8;
        val >>= 7;
        if val > 0 {
            byte |= 0x80;
        }
        result.push(byte);
    }

    result
}

/// 解析价格差值（变长编码，单位厘）
pub fn decode_price(bytes: &[u8]) -> (Price, usize) {
    let (value, consumed) = decode_varint(bytes);
    (Price(value as i64), consumed)
}

/// 解析金额/成交量（4字节指数编码浮点数）
pub fn decode_tdx_float(bytes: &[u8]) -> f64 {
    if bytes.len() < 4 {
        return 0.0;
    }

    let val = u32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]) as i32;
    let logpoint = val >> 24;
    let hleax = (val >> 16) & 0xff;
    let lheax = (val >> 8) & 0xff;
    let lleax = val & 0xff;

    let dw_ecx = logpoint * 2 - 0x7f;
    let dbl_xmm6 = 2_f64.powi(dw_ecx);

    let dbl_xmm4 = if hleax > 0x80 {
        dbl_xmm6 * (64.0 + (hleax & 0x7f) as f64) / 64.0
    } else {
        dbl_xmm6 * hleax as f64 / 128.0
    };

    let scale = if (hleax & 0x80) != 0 { 2.0 } else { 1.0 };

    let dbl_xmm3 = dbl_xmm6 * lheax as f64 / 32768.0 * scale;
    let dbl_xmm1 = dbl_xmm6 * lleax as f64 / 8388608.0 * scale;

    dbl_xmm6 + dbl_xmm4 + dbl_xmm3 + dbl_xmm1
}

/// 两位小数舍入
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn varint_roundtrip() {
        for v in [0, 1, -1, 63, 64, -64, 1000, -1000, 123456, -123456, i32::MAX / 2] {
            let encoded = encode_varint(v);
            let (decoded, consumed) = decode_varint(&encoded);
            assert_eq!(decoded, v, "v={}", v);
            assert_eq!(consumed, encoded.len());
        }
    }

    #[test]
    fn varint_caps_malformed_continuation() {
        // 全部置延续位的畸形输入，最多消费5字节且不会溢出
        let (_, consumed) = decode_varint(&[0xFF; 8]);
        assert_eq!(consumed, 5);

        // 5字节以内的正常编码不受上限影响
        let encoded = encode_varint(i32::MAX);
        assert!(encoded.len() <= 5);
        let (v, consumed) = decode_varint(&encoded);
        assert_eq!(v, i32::MAX);
        assert_eq!(consumed, encoded.len());
    }

    #[test]
    fn varint_sign_bit() {
        // 0x40 置位表示负数
        let (v, n) = decode_varint(&[0x43]);
        assert_eq!((v, n), (-3, 1));
        let (v, n) = decode_varint(&[0x83, 0x01]);
        assert_eq!((v, n), (67, 2));
    }

    #[test]
    fn le_helpers() {
        assert_eq!(bytes_to_u16_le(&[0x34, 0x12]), 0x1234);
        assert_eq!(bytes_to_u32_le(&[0x78, 0x56, 0x34, 0x12]), 0x12345678);
        assert_eq!(u16_to_bytes_le(0x1234), [0x34, 0x12]);
        assert_eq!(bytes_to_u16_le(&[0x01]), 0);
    }

    #[test]
    fn round2_idempotent() {
        let v = round2(175.004999);
        assert_eq!(v, 175.0);
        assert_eq!(round2(v), v);
        assert_eq!(round2(round2(12.345)), round2(12.345));
    }

    #[test]
    fn gbk_roundtrip() {
        let s = "平安银行";
        assert_eq!(gbk_to_utf8(&utf8_to_gbk(s)), s);
    }
}
