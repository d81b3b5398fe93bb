//! 定长二进制记录的通用解包

use crate::reader::ReaderError;

/// 字段类型（小端序）
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    U16,
    U32,
    F32,
}

impl FieldKind {
    pub fn width(self) -> usize {
        match self {
            FieldKind::U16 => 2,
            FieldKind::U32 => 4,
            FieldKind::F32 => 4,
        }
    }
}

/// 解包出的字段值
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FieldValue {
    U16(u16),
    U32(u32),
    F32(f32),
}

impl FieldValue {
    pub fn as_u32(self) -> u32 {
        match self {
            FieldValue::U16(v) => v as u32,
            FieldValue::U32(v) => v,
            FieldValue::F32(v) => v as u32,
        }
    }

    pub fn as_f64(self) -> f64 {
        match self {
            FieldValue::U16(v) => v as f64,
            FieldValue::U32(v) => v as f64,
            FieldValue::F32(v) => v as f64,
        }
    }
}

/// 定长记录格式
#[derive(Debug, Clone)]
pub struct RecordFormat {
    fields: Vec<FieldKind>,
    width: usize,
}

impl RecordFormat {
    pub fn new(fields: Vec<FieldKind>) -> Self {
        let width = fields.iter().map(|f| f.width()).sum();
        Self { fields, width }
    }

    /// 从格式串构造，如 `<IIIIIfII`（仅支持小端序的 H/I/f）
    pub fn from_pack_str(pack: &str) -> Result<Self, ReaderError> {
        let mut fields = Vec::new();
        for c in pack.chars() {
            match c {
                '<' => {}
                'H' => fields.push(FieldKind::U16),
                'I' => fields.push(FieldKind::U32),
                'f' => fields.push(FieldKind::F32),
                other => return Err(ReaderError::UnsupportedFormat(other)),
            }
        }
        Ok(Self::new(fields))
    }

    /// 单条记录的字节宽度
    pub fn width(&self) -> usize {
        self.width
    }

    /// 解包单条记录
    pub fn unpack_one(&self, record: &[u8]) -> Result<Vec<FieldValue>, ReaderError> {
        if record.len() < self.width {
            return Err(ReaderError::MalformedRecord {
                len: record.len(),
                width: self.width,
            });
        }

        let mut values = Vec::with_capacity(self.fields.len());
        let mut offset = 0;

        for field in &self.fields {
            let value = match field {
                FieldKind::U16 => FieldValue::U16(u16::from_le_bytes([
                    record[offset],
                    record[offset + 1],
                ])),
                FieldKind::U32 => FieldValue::U32(u32::from_le_bytes([
                    record[offset],
                    record[offset + 1],
                    record[offset + 2],
                    record[offset + 3],
                ])),
                FieldKind::F32 => FieldValue::F32(f32::from_le_bytes([
                    record[offset],
                    record[offset + 1],
                    record[offset + 2],
                    record[offset + 3],
                ])),
            };
            offset += field.width();
            values.push(value);
        }

        Ok(values)
    }

    /// 按记录宽度切分数据并逐条解包；数据长度必须是宽度的整数倍
    pub fn unpack_records<'a>(&'a self, data: &'a [u8]) -> Result<RecordIter<'a>, ReaderError> {
        if data.len() % self.width != 0 {
            return Err(ReaderError::MalformedRecord {
                len: data.len(),
                width: self.width,
            });
        }
        Ok(RecordIter {
            format: self,
            data,
            offset: 0,
        })
    }
}

/// 记录迭代器，按需逐条解包
pub struct RecordIter<'a> {
    format: &'a RecordFormat,
    data: &'a [u8],
    offset: usize,
}

impl Iterator for RecordIter<'_> {
    type Item = Vec<FieldValue>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.offset >= self.data.len() {
            return None;
        }
        let record = &self.data[self.offset..self.offset + self.format.width()];
        self.offset += self.format.width();
        // 长度在 unpack_records 已校验
        self.format.unpack_one(record).ok()
    }
}
