//! TDX 行情协议实现
//!
//! - [`constants`]：命令号、市场、周期等协议常量
//! - [`codec`]：字段级编解码（变长整数、指数浮点、GBK）
//! - [`frame`]：请求帧与响应帧
//! - [`messages`]：各命令的请求编码与响应解码
//! - [`types`]：协议数据类型

pub mod codec;
pub mod constants;
pub mod frame;
pub mod messages;
pub mod types;
