// ==========================================
// 题库导入引擎 - 分隔行切分器
// ==========================================
// 职责: 按单字符分隔符切分一行文本（识别双引号）
// 约束: 仅按行处理；引号内不支持转义，不支持跨行字段
// ==========================================

/// 将一行文本切分为去空白的字段序列
///
/// # 规则
/// - `"` 切换“引号内”状态，本身不保留
/// - 引号内的分隔符视为普通字符
/// - 每个字段 TRIM
///
/// # 返回
/// - 非空输入至少返回一个字段（可能为空字符串）
pub fn tokenize_line(line: &str, delimiter: char) -> Vec<String> {
    let mut fields = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;

    for ch in line.chars() {
        if ch == '"' {
            in_quotes = !in_quotes;
        } else if ch == delimiter && !in_quotes {
            fields.push(current.trim().to_string());
            current.clear();
        } else {
            current.push(ch);
        }
    }
    fields.push(current.trim().to_string());

    fields
}
