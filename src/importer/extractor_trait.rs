// ==========================================
// 题库导入引擎 - 解析策略 Trait
// ==========================================
// 职责: 定义各格式解析器的公共接口（不包含实现）
// 约定: 解析器只产出 RawFieldMap，规范化统一交给 QuestionBuilder
// ==========================================

use crate::domain::import_report::DetectedFormat;
use crate::domain::question::RawFieldMap;

// ==========================================
// SourceText - 预处理后的输入
// ==========================================
// 用途: 各解析器共享的只读视图（只计算一次）
#[derive(Debug, Clone)]
pub struct SourceText<'a> {
    /// 原始输入（未裁剪）
    pub raw: &'a str,
    /// 首行含制表符 → '\t'，否则 ','
    pub delimiter: char,
    /// 非空白行（保留行内原文）
    pub lines: Vec<&'a str>,
}

impl<'a> SourceText<'a> {
    pub fn new(raw: &'a str) -> Self {
        let lines: Vec<&'a str> = raw.lines().filter(|l| !l.trim().is_empty()).collect();
        let delimiter = match lines.first() {
            Some(first) if first.contains('\t') => '\t',
            _ => ',',
        };
        Self {
            raw,
            delimiter,
            lines,
        }
    }

    pub fn trimmed(&self) -> &'a str {
        self.raw.trim()
    }

    pub fn first_line(&self) -> Option<&'a str> {
        self.lines.first().copied()
    }

    pub fn is_blank(&self) -> bool {
        self.lines.is_empty()
    }
}

// ==========================================
// Extractor Trait
// ==========================================
// 用途: 单一格式的解析策略
// 实现者: JsonExtractor, StructuredExtractor, UnstructuredExtractor, PlainTextExtractor
pub trait Extractor: Send + Sync {
    /// 该策略对应的输入格式
    fn format(&self) -> DetectedFormat;

    /// 解析为候选记录
    ///
    /// # 返回
    /// - Some(records): 输入适用于该策略（records 可能为空）
    /// - None: 输入不适用，交给下一个策略
    fn extract(&self, source: &SourceText<'_>) -> Option<Vec<RawFieldMap>>;

    /// 适用时是否独占输入（即使构建结果为空也不再尝试后续策略）
    fn claims_input(&self) -> bool {
        false
    }
}
