// ==========================================
// 题库导入引擎 - 答案解析
// ==========================================
// 职责: 原始“正确答案”记号 → 0 起始选项下标
// 说明: 不校验下标是否越界（由 Question Builder 处理）
// ==========================================

/// 解析正确答案下标
///
/// # 规则（按顺序）
/// 1. 缺失/空 → 0
/// 2. 单个字母 A-E（大小写不敏感）→ 字母序号
/// 3. 纯数字 → 视为 1 起始，max(0, n-1)；"0" 也得 0
/// 4. 其他 → 与选项做大小写不敏感的完全匹配，取第一个；无匹配 → 0
pub fn resolve_correct_index(token: Option<&str>, options: &[String]) -> usize {
    let token = match token.map(str::trim) {
        Some(t) if !t.is_empty() => t,
        _ => return 0,
    };

    let mut chars = token.chars();
    if let (Some(ch), None) = (chars.next(), chars.next()) {
        let upper = ch.to_ascii_uppercase();
        if ('A'..='E').contains(&upper) {
            return (upper as u8 - b'A') as usize;
        }
    }

    if token.chars().all(|c| c.is_ascii_digit()) {
        // 超出 usize 的数字串按普通文本继续匹配
        if let Ok(n) = token.parse::<usize>() {
            return n.saturating_sub(1);
        }
    }

    let needle = token.to_lowercase();
    options
        .iter()
        .position(|o| o.trim().to_lowercase() == needle)
        .unwrap_or(0)
}

/// 判断题答案: 小写后属于 {true, t, yes, 1}
pub fn resolve_true_false(token: Option<&str>) -> bool {
    matches!(
        token.map(|t| t.trim().to_lowercase()).as_deref(),
        Some("true" | "t" | "yes" | "1")
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn opts() -> Vec<String> {
        vec!["x".to_string(), "y".to_string(), "z".to_string()]
    }

    #[test]
    fn test_letter_token() {
        assert_eq!(resolve_correct_index(Some("B"), &opts()), 1);
        assert_eq!(resolve_correct_index(Some("e"), &opts()), 4); // 不校验越界
    }

    #[test]
    fn test_digit_token_is_one_based() {
        assert_eq!(resolve_correct_index(Some("2"), &opts()), 1);
        assert_eq!(resolve_correct_index(Some("0"), &opts()), 0);
        assert_eq!(resolve_correct_index(Some("1"), &opts()), 0);
    }

    #[test]
    fn test_literal_match() {
        assert_eq!(resolve_correct_index(Some("z"), &opts()), 2);
        assert_eq!(resolve_correct_index(Some("Paris"), &["london".into(), "PARIS".into()]), 1);
        assert_eq!(resolve_correct_index(Some("nowhere"), &opts()), 0);
    }

    #[test]
    fn test_absent_token() {
        assert_eq!(resolve_correct_index(None, &opts()), 0);
        assert_eq!(resolve_correct_index(Some("   "), &opts()), 0);
    }

    #[test]
    fn test_letter_precedes_literal_match() {
        // 单字母优先按字母解释，即使选项里有同名文本
        let options = vec!["a".to_string(), "b".to_string(), "c".to_string()];
        assert_eq!(resolve_correct_index(Some("c"), &options), 2);
        let options = vec!["c".to_string(), "a".to_string()];
        assert_eq!(resolve_correct_index(Some("c"), &options), 2);
    }

    #[test]
    fn test_true_false() {
        assert!(resolve_true_false(Some("TRUE")));
        assert!(resolve_true_false(Some("t")));
        assert!(resolve_true_false(Some(" yes ")));
        assert!(resolve_true_false(Some("1")));
        assert!(!resolve_true_false(Some("false")));
        assert!(!resolve_true_false(Some("Y")));
        assert!(!resolve_true_false(None));
    }
}
