//! 从生成式文本中提取第一段 JSON

use regex::Regex;
use serde_json::Value;

/// 贪婪匹配第一个 `[` 到最后一个 `]`，解析失败返回 None
pub fn extract_json_array(text: &str) -> Option<Vec<Value>> {
    let re = Regex::new(r"(?s)\[.*\]").ok()?;
    let m = re.find(text)?;
    match serde_json::from_str::<Value>(m.as_str()).ok()? {
        Value::Array(items) => Some(items),
        _ => None,
    }
}

pub fn extract_json_object(text: &str) -> Option<serde_json::Map<String, Value>> {
    let re = Regex::new(r"(?s)\{.*\}").ok()?;
    let m = re.find(text)?;
    match serde_json::from_str::<Value>(m.as_str()).ok()? {
        Value::Object(map) => Some(map),
        _ => None,
    }
}
