// ==========================================
// 题库导入引擎 - JSON 解析器
// ==========================================
// 职责: JSON 数组（或单个对象）→ RawFieldMap 列表
// 规则: 每个字段按别名顺序查找（键名大小写不敏感）
// 说明: 解析失败或结构不符（没有任何带题干键的对象）视为“不是 JSON”，
//       交给后续策略，不向上报错
// ==========================================

use crate::domain::import_report::DetectedFormat;
use crate::domain::question::RawFieldMap;
use crate::domain::types::FieldKey;
use crate::importer::extractor_trait::{Extractor, SourceText};
use serde_json::{Map, Value};
use tracing::debug;

// ===== 字段别名表（按优先级） =====
const TEXT_KEYS: &[&str] = &["question", "text", "q", "stem", "prompt", "content"];
const OPTIONS_KEYS: &[&str] = &["options", "choices", "answers"];
const ANSWER_KEYS: &[&str] = &[
    "correct",
    "answer",
    "key",
    "correctIndex",
    "answer_index",
    "correct_answer",
    "correctAnswer",
];
/// 这些答案键的取值一律是 0 起始下标（数字或纯数字字符串）
const INDEX_ANSWER_KEYS: &[&str] = &["correctIndex", "answer_index"];
const TYPE_KEYS: &[&str] = &["type", "question_type", "questionType"];
const DIFFICULTY_KEYS: &[&str] = &["difficulty", "level"];
const TOPIC_KEYS: &[&str] = &["topic", "category", "subject"];
const POINTS_KEYS: &[&str] = &["points", "score", "marks"];
const EXPLANATION_KEYS: &[&str] = &["explanation", "rationale"];

/// 对象形式选项的文本键
const OPTION_TEXT_KEYS: &[&str] = &["text", "label", "value", "content"];

/// 包装对象中题目数组的键（如 {"questions": [...]}）
const WRAPPER_KEYS: &[&str] = &["questions", "items", "data"];

// ==========================================
// JsonExtractor
// ==========================================
pub struct JsonExtractor;

impl Extractor for JsonExtractor {
    fn format(&self) -> DetectedFormat {
        DetectedFormat::Json
    }

    fn extract(&self, source: &SourceText<'_>) -> Option<Vec<RawFieldMap>> {
        let trimmed = source.trimmed();
        if !(trimmed.starts_with('[') || trimmed.starts_with('{')) {
            return None;
        }

        let value: Value = match serde_json::from_str(trimmed) {
            Ok(v) => v,
            Err(e) => {
                debug!(error = %e, "JSON 解析失败，按非 JSON 处理");
                return None;
            }
        };

        let elements = match value {
            Value::Array(items) => items,
            Value::Object(obj) => match unwrap_question_list(&obj) {
                Some(items) => items.clone(),
                None => vec![Value::Object(obj)],
            },
            _ => return None,
        };

        let has_question = elements
            .iter()
            .filter_map(Value::as_object)
            .any(|obj| lookup(obj, TEXT_KEYS).is_some());
        if !has_question {
            debug!(elements = elements.len(), "JSON 中没有带题干键的对象，按非 JSON 处理");
            return None;
        }

        Some(elements.iter().map(element_to_fields).collect())
    }

    fn claims_input(&self) -> bool {
        true
    }
}

/// 包装对象: {"questions": [...]} 之类
fn unwrap_question_list(obj: &Map<String, Value>) -> Option<&Vec<Value>> {
    WRAPPER_KEYS
        .iter()
        .find_map(|key| lookup(obj, &[*key]))
        .and_then(Value::as_array)
}

/// 单个元素 → RawFieldMap（非对象元素得到空表，由 Builder 丢弃）
fn element_to_fields(element: &Value) -> RawFieldMap {
    let mut fields = RawFieldMap::new();
    let obj = match element.as_object() {
        Some(obj) => obj,
        None => return fields,
    };

    if let Some(text) = lookup(obj, TEXT_KEYS).and_then(scalar_to_string) {
        fields.set(FieldKey::Text, text);
    }

    // 选项: 数组优先，其次离散键
    let listed = lookup(obj, OPTIONS_KEYS)
        .and_then(Value::as_array)
        .map(|items| items.iter().filter_map(option_to_string).collect::<Vec<_>>())
        .unwrap_or_default();

    if listed.is_empty() {
        for (slot, key) in FieldKey::OPTIONS.iter().enumerate() {
            let letter = (b'a' + slot as u8) as char;
            let aliases = [
                format!("option_{}", letter),
                format!("option{}", letter),
                format!("opt{}", letter),
                letter.to_string(),
            ];
            let alias_refs: Vec<&str> = aliases.iter().map(String::as_str).collect();
            if let Some(value) = lookup(obj, &alias_refs).and_then(option_to_string) {
                fields.set(*key, value);
            }
        }
    } else {
        // 超过 5 个选项时只保留前 5 个
        for (slot, value) in listed.into_iter().enumerate() {
            if let Some(key) = FieldKey::option_slot(slot) {
                fields.set(key, value);
            }
        }
    }

    if let Some((key, value)) = lookup_entry(obj, ANSWER_KEYS) {
        let index_key = INDEX_ANSWER_KEYS
            .iter()
            .any(|k| k.eq_ignore_ascii_case(key));
        if let Some(answer) = answer_token(value, index_key) {
            fields.set(FieldKey::Correct, answer);
        }
    }

    let scalar_fields = [
        (FieldKey::Type, TYPE_KEYS),
        (FieldKey::Difficulty, DIFFICULTY_KEYS),
        (FieldKey::Topic, TOPIC_KEYS),
        (FieldKey::Points, POINTS_KEYS),
        (FieldKey::Explanation, EXPLANATION_KEYS),
    ];
    for (key, aliases) in scalar_fields {
        if let Some(value) = lookup(obj, aliases).and_then(scalar_to_string) {
            fields.set(key, value);
        }
    }

    fields
}

/// 按别名顺序查找（键名大小写不敏感），跳过 null
fn lookup<'v>(obj: &'v Map<String, Value>, aliases: &[&str]) -> Option<&'v Value> {
    lookup_entry(obj, aliases).map(|(_, value)| value)
}

/// 同 lookup，并返回命中的别名
fn lookup_entry<'a, 'v>(
    obj: &'v Map<String, Value>,
    aliases: &[&'a str],
) -> Option<(&'a str, &'v Value)> {
    aliases.iter().find_map(|alias| {
        obj.get(*alias)
            .or_else(|| {
                obj.iter()
                    .find(|(k, _)| k.eq_ignore_ascii_case(alias))
                    .map(|(_, v)| v)
            })
            .filter(|v| !v.is_null())
            .map(|v| (*alias, v))
    })
}

/// 标量 → 字符串（数组/对象/null 视为缺失）
fn scalar_to_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

/// 选项: 字符串/数字，或带 text|label|value|content 的对象
fn option_to_string(value: &Value) -> Option<String> {
    match value {
        Value::Object(obj) => lookup(obj, OPTION_TEXT_KEYS).and_then(scalar_to_string),
        other => scalar_to_string(other),
    }
}

/// 答案记号
///
/// - 非负整数: 0 起始下标 → 改写为 1 起始数字记号
/// - 下标键（correctIndex / answer_index）下的纯数字字符串: 同上
/// - 布尔: "true"/"false"
/// - 数组: 取第一个元素
fn answer_token(value: &Value, index_key: bool) -> Option<String> {
    match value {
        Value::Number(n) => match n.as_u64() {
            Some(index) => Some(index_to_token(index)),
            None => Some(n.to_string()),
        },
        Value::String(s) if index_key => {
            let digits = s.trim();
            if !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit()) {
                if let Ok(index) = digits.parse::<u64>() {
                    return Some(index_to_token(index));
                }
            }
            Some(s.clone())
        }
        Value::Array(items) => items.first().and_then(|v| answer_token(v, index_key)),
        other => scalar_to_string(other),
    }
}

fn index_to_token(index: u64) -> String {
    index.saturating_add(1).to_string()
}
