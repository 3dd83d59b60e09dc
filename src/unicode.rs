//! Unicode 转义处理
//!
//! `.properties` 文件习惯用 `\uXXXX` 表示非 ASCII 字符。读取时解码为真实字符，
//! 输出时可选地重新转义。BMP 之外的字符按 UTF-16 代理对写成两个 `\uXXXX`。

use std::sync::OnceLock;

use regex::{Captures, Regex};

/// 代理对优先匹配，其余按单个码元处理
fn escape_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(
            r"\\u([dD][89abAB][0-9a-fA-F]{2})\\u([dD][c-fC-F][0-9a-fA-F]{2})|\\u([0-9a-fA-F]{4})",
        )
        .expect("静态正则表达式")
    })
}

/// 将 `\uXXXX` 转义序列还原为 UTF-8 字符
///
/// 孤立的代理码元无法表示为 `char`，保留原文不变；换行符也保持转义形式，
/// 以免改变文件的行结构。
pub fn unescape_unicode(text: &str) -> String {
    escape_regex()
        .replace_all(text, |caps: &Captures<'_>| {
            let original = caps[0].to_string();
            if let (Some(high), Some(low)) = (caps.get(1), caps.get(2)) {
                let pair = [high, low].map(|m| u16::from_str_radix(m.as_str(), 16).unwrap_or_default());
                return char::decode_utf16(pair)
                    .collect::<Result<String, _>>()
                    .unwrap_or(original);
            }
            caps.get(3)
                .and_then(|hex| u32::from_str_radix(hex.as_str(), 16).ok())
                .and_then(char::from_u32)
                .filter(|ch| *ch != '\n' && *ch != '\r')
                .map(String::from)
                .unwrap_or(original)
        })
        .into_owned()
}

/// 将码点大于 127 的字符转换为小写十六进制 `\uXXXX`
pub fn escape_non_ascii(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    let mut units = [0u16; 2];
    for ch in text.chars() {
        if ch.is_ascii() {
            escaped.push(ch);
            continue;
        }
        for unit in ch.encode_utf16(&mut units) {
            escaped.push_str(&format!("\\u{:04x}", unit));
        }
    }
    escaped
}
