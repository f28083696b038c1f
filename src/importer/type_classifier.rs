// ==========================================
// 题库导入引擎 - 题型识别
// ==========================================
// 职责: 显式题型提示解析 + 无提示时的启发式猜测
// 优先级: 显式提示 > 启发式（提示缺失或不可识别时才猜测）
// ==========================================

use crate::domain::types::QuestionType;
use crate::importer::header_resolver::normalize_label;

/// 解析题型提示（与表头相同的归一化方式）
///
/// # 返回
/// - Some(QuestionType): 可识别
/// - None: 缺失或不可识别
pub fn parse_type_hint(raw: Option<&str>) -> Option<QuestionType> {
    let normalized = normalize_label(raw?);
    let question_type = match normalized.as_str() {
        "mc" | "mcq" | "single" | "singlechoice" | "multiplechoice" | "choice" | "radio"
        | "mcqsingle" | "单选" | "单选题" => QuestionType::McqSingle,

        "multi" | "multiple" | "multiselect" | "multichoice" | "multipleanswer" | "checkbox"
        | "selectall" | "mcqmulti" | "mcm" | "多选" | "多选题" => QuestionType::McqMulti,

        "tf" | "truefalse" | "boolean" | "bool" | "yesno" | "判断" | "判断题" => {
            QuestionType::TrueFalse
        }

        "fill" | "fillblank" | "fillintheblank" | "fillin" | "blank" | "cloze" | "fib"
        | "填空" | "填空题" => QuestionType::FillBlank,

        "short" | "shortanswer" | "sa" | "text" | "简答" | "简答题" => QuestionType::Short,

        "essay" | "long" | "longanswer" | "论述" | "论述题" => QuestionType::Essay,

        "rating" | "scale" | "likert" | "评分" => QuestionType::Rating,

        "matching" | "match" | "pairs" | "连线" | "连线题" => QuestionType::Matching,

        "ordering" | "order" | "sequence" | "sort" | "ranking" | "排序" | "排序题" => {
            QuestionType::Ordering
        }

        "matrix" | "grid" | "矩阵" => QuestionType::Matrix,

        _ => return None,
    };
    Some(question_type)
}

/// 启发式猜测题型
///
/// # 规则（按顺序）
/// 1. 题干含 "true or false" / "true/false" → TrueFalse
/// 2. 题干含 "___" 或 "fill in" → FillBlank
/// 3. 至少一个非空选项 → McqSingle
/// 4. 其他 → Short
pub fn guess_type(text: &str, options: &[String]) -> QuestionType {
    let lower = text.to_lowercase();

    if lower.contains("true or false") || lower.contains("true/false") {
        QuestionType::TrueFalse
    } else if lower.contains("___") || lower.contains("fill in") {
        QuestionType::FillBlank
    } else if options.iter().any(|o| !o.trim().is_empty()) {
        QuestionType::McqSingle
    } else {
        QuestionType::Short
    }
}

/// 按优先级确定题型
pub fn classify(hint: Option<&str>, text: &str, options: &[String]) -> QuestionType {
    parse_type_hint(hint).unwrap_or_else(|| guess_type(text, options))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn opts(values: &[&str]) -> Vec<String> {
        values.iter().map(|v| v.to_string()).collect()
    }

    #[test]
    fn test_parse_type_hint_aliases() {
        assert_eq!(parse_type_hint(Some("MCQ")), Some(QuestionType::McqSingle));
        assert_eq!(parse_type_hint(Some("single")), Some(QuestionType::McqSingle));
        assert_eq!(parse_type_hint(Some("Multi-Select")), Some(QuestionType::McqMulti));
        assert_eq!(parse_type_hint(Some("True/False")), Some(QuestionType::TrueFalse));
        assert_eq!(parse_type_hint(Some("fill in the blank")), Some(QuestionType::FillBlank));
        assert_eq!(parse_type_hint(Some("Essay")), Some(QuestionType::Essay));
        assert_eq!(parse_type_hint(Some("MATCHING")), Some(QuestionType::Matching));
        assert_eq!(parse_type_hint(Some("mcq_single")), Some(QuestionType::McqSingle));
    }

    #[test]
    fn test_parse_type_hint_absent_or_unknown() {
        assert_eq!(parse_type_hint(None), None);
        assert_eq!(parse_type_hint(Some("")), None);
        assert_eq!(parse_type_hint(Some("riddle")), None);
    }

    #[test]
    fn test_guess_type_order() {
        assert_eq!(
            guess_type("True or False: the sky is green", &opts(&["a"])),
            QuestionType::TrueFalse
        );
        assert_eq!(guess_type("Water is ___ at 100C", &[]), QuestionType::FillBlank);
        assert_eq!(guess_type("Fill in: 2+2=?", &[]), QuestionType::FillBlank);
        assert_eq!(guess_type("Pick one", &opts(&["", "x"])), QuestionType::McqSingle);
        assert_eq!(guess_type("Describe gravity", &opts(&["", " "])), QuestionType::Short);
    }

    #[test]
    fn test_explicit_hint_beats_heuristic() {
        // 声明为 essay 的题目即使带选项也不会被猜成单选
        let options = opts(&["a", "b"]);
        assert_eq!(classify(Some("essay"), "Discuss", &options), QuestionType::Essay);
        assert_eq!(classify(Some("???"), "Discuss", &options), QuestionType::McqSingle);
        assert_eq!(classify(None, "Discuss", &[]), QuestionType::Short);
    }
}
