//! 协议帧格式定义和编解码

use crate::protocol::{
    codec::{bytes_to_u16_le, bytes_to_u32_le, u16_to_bytes_le, u32_to_bytes_le},
    constants::{Control, MessageType, PREFIX, PREFIX_RESP},
};
use flate2::read::ZlibDecoder;
use std::io::Read;
use thiserror::Error;

/// 帧错误类型
#[derive(Debug, Error)]
pub enum FrameError {
    #[error("数据长度不足")]
    InsufficientData,
    #[error("无效的帧头")]
    InvalidPrefix,
    #[error("长度不匹配")]
    LengthMismatch,
    #[error("未知的消息类型: 0x{0:04X}")]
    UnknownMessageType(u16),
    #[error("解压错误: {0}")]
    DecompressionError(String),
}

/// 请求帧
///
/// 布局：前缀 0x0C | MsgID u32 | 控制码 | 长度 u16 ×2 | 类型 u16 | 数据域
/// （长度字段包含类型字段的 2 字节，重复写两次）
#[derive(Debug, Clone)]
pub struct RequestFrame {
    pub msg_id: u32,
    pub control: Control,
    pub msg_type: MessageType,
    pub data: Vec<u8>,
}

impl RequestFrame {
    pub fn new(msg_id: u32, msg_type: MessageType, data: Vec<u8>) -> Self {
        Self {
            msg_id,
            control: Control::Control01,
            msg_type,
            data,
        }
    }

    /// 编码为字节数组
    pub fn encode(&self) -> Vec<u8> {
        let length = (self.data.len() + 2) as u16;
        let mut result = Vec::with_capacity(12 + self.data.len());

        result.push(PREFIX);
        result.extend_from_slice(&u32_to_bytes_le(self.msg_id));
        result.push(self.control.as_u8());
        result.extend_from_slice(&u16_to_bytes_le(length));
        result.extend_from_slice(&u16_to_bytes_le(length));
        result.extend_from_slice(&u16_to_bytes_le(self.msg_type.as_u16()));
        result.extend_from_slice(&self.data);

        result
    }

    /// 从字节数组解码
    pub fn decode(bytes: &[u8]) -> Result<Self, FrameError> {
        if bytes.len() < 12 {
            return Err(FrameError::InsufficientData);
        }
        if bytes[0] != PREFIX {
            return Err(FrameError::InvalidPrefix);
        }

        let msg_id = bytes_to_u32_le(&bytes[1..5]);
        let length1 = bytes_to_u16_le(&bytes[6..8]);
        let length2 = bytes_to_u16_le(&bytes[8..10]);
        let msg_type_val = bytes_to_u16_le(&bytes[10..12]);

        if length1 != length2 {
            return Err(FrameError::LengthMismatch);
        }

        // 长度字段包含类型字段的 2 字节
        let data_length = length1.saturating_sub(2) as usize;
        if bytes.len() < 12 + data_length {
            return Err(FrameError::InsufficientData);
        }

        let msg_type = MessageType::from_u16(msg_type_val)
            .ok_or(FrameError::UnknownMessageType(msg_type_val))?;

        Ok(Self {
            msg_id,
            control: Control::Control01,
            msg_type,
            data: bytes[12..12 + data_length].to_vec(),
        })
    }
}

/// 响应帧
///
/// 16字节头：前缀 B1CB7400 | 控制码 | MsgID u32 | 未知字节 | 类型 u16 |
/// 压缩长度 u16 | 长度 u16，随后是 zip_length 字节的数据域。
/// 压缩长度与长度不等时数据域为 zlib 压缩。
#[derive(Debug, Clone)]
pub struct ResponseFrame {
    pub control: u8,
    pub msg_id: u32,
    pub msg_type: MessageType,
    pub zip_length: u16,
    pub length: u16,
    data: Vec<u8>,
    decompressed: bool,
}

impl ResponseFrame {
    /// 由已读取的头字段与数据域构造（未解压）
    pub fn new(
        control: u8,
        msg_id: u32,
        msg_type: MessageType,
        zip_length: u16,
        length: u16,
        data: Vec<u8>,
    ) -> Self {
        Self {
            control,
            msg_id,
            msg_type,
            zip_length,
            length,
            data,
            decompressed: false,
        }
    }

    /// 从完整帧字节解码（含16字节头）
    pub fn decode(bytes: &[u8]) -> Result<Self, FrameError> {
        if bytes.len() < 16 {
            return Err(FrameError::InsufficientData);
        }

        let prefix = u32::from_be_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]);
        if prefix != PREFIX_RESP {
            return Err(FrameError::InvalidPrefix);
        }

        let control = bytes[4];
        let msg_id = bytes_to_u32_le(&bytes[5..9]);
        let msg_type_val = bytes_to_u16_le(&bytes[10..12]);
        let zip_length = bytes_to_u16_le(&bytes[12..14]);
        let length = bytes_to_u16_le(&bytes[14..16]);

        if bytes.len() < 16 + zip_length as usize {
            return Err(FrameError::InsufficientData);
        }

        let msg_type = MessageType::from_u16(msg_type_val)
            .ok_or(FrameError::UnknownMessageType(msg_type_val))?;

        let mut frame = Self::new(
            control,
            msg_id,
            msg_type,
            zip_length,
            length,
            bytes[16..16 + zip_length as usize].to_vec(),
        );
        frame.decompress()?;

        Ok(frame)
    }

    /// 解压数据域
    pub fn decompress(&mut self) -> Result<(), FrameError> {
        if self.decompressed {
            return Ok(());
        }

        if self.zip_length != self.length {
            let mut decoder = ZlibDecoder::new(self.data.as_slice());
            let mut decompressed = Vec::with_capacity(self.length as usize);
            decoder
                .read_to_end(&mut decompressed)
                .map_err(|e| FrameError::DecompressionError(e.to_string()))?;
            self.data = decompressed;
        }

        if self.data.len() != self.length as usize {
            return Err(FrameError::LengthMismatch);
        }

        self.decompressed = true;
        Ok(())
    }

    /// 获取解压后的数据域
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// 响应是否成功
    pub fn is_success(&self) -> bool {
        self.control & 0x10 == 0x10
    }
}
