//! IPv4 地址校验
//!
//! 只接受点分十进制四段格式，每段 1-3 位数字且不超过 255。
//! 前导零允许，规范化时去掉（"010.0.0.1" -> "10.0.0.1"）。

use std::net::Ipv4Addr;

/// 解析为 `Ipv4Addr`，输入会先去掉首尾空白
pub fn parse_ipv4(input: &str) -> Option<Ipv4Addr> {
    let input = input.trim();
    if input.is_empty() {
        return None;
    }

    let mut octets = [0u8; 4];
    let mut count = 0;

    for part in input.split('.') {
        if count == 4 {
            return None;
        }
        if part.is_empty() || part.len() > 3 || !part.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
        // 最多三位数字，不会溢出 u16
        let value: u16 = part.parse().ok()?;
        octets[count] = u8::try_from(value).ok()?;
        count += 1;
    }

    (count == 4).then(|| Ipv4Addr::from(octets))
}

/// Structural check only. No network or store access.
pub fn validate(input: &str) -> bool {
    parse_ipv4(input).is_some()
}

/// Canonical dotted-quad form used as the dedup key
pub fn canonicalize(input: &str) -> Option<String> {
    parse_ipv4(input).map(|ip| ip.to_string())
}
