// ==========================================
// 题库导入引擎 - 表头解析器
// ==========================================
// 职责: 任意写法的列名 → 规范字段键
// 规则: 小写 + 去除所有非字母数字字符后查别名表
// ==========================================

use crate::domain::types::FieldKey;

/// 归一化：小写并去除非字母数字字符（保留中文等 Unicode 字母）
pub fn normalize_label(raw: &str) -> String {
    raw.chars()
        .filter(|c| c.is_alphanumeric())
        .flat_map(char::to_lowercase)
        .collect()
}

/// 解析表头单元格
///
/// # 返回
/// - Some(FieldKey): 可识别的列名
/// - None: 不识别（该列被忽略，不报错）
pub fn resolve_header(cell: &str) -> Option<FieldKey> {
    let key = match normalize_label(cell).as_str() {
        // 题干
        "question" | "questions" | "questiontext" | "text" | "q" | "stem" | "prompt"
        | "题目" | "题干" => FieldKey::Text,

        // 选项 A-E
        "a" | "opta" | "optiona" | "choicea" | "answera" | "option1" | "选项a" => FieldKey::OptA,
        "b" | "optb" | "optionb" | "choiceb" | "answerb" | "option2" | "选项b" => FieldKey::OptB,
        "c" | "optc" | "optionc" | "choicec" | "answerc" | "option3" | "选项c" => FieldKey::OptC,
        "d" | "optd" | "optiond" | "choiced" | "answerd" | "option4" | "选项d" => FieldKey::OptD,
        "e" | "opte" | "optione" | "choicee" | "answere" | "option5" | "选项e" => FieldKey::OptE,

        // 正确答案
        "correct" | "correctanswer" | "correctoption" | "answer" | "answerkey" | "key" | "ans"
        | "solution" | "答案" | "正确答案" => FieldKey::Correct,

        // 题型
        "type" | "questiontype" | "qtype" | "kind" | "format" | "题型" => FieldKey::Type,

        // 难度
        "difficulty" | "difficultylevel" | "level" | "难度" => FieldKey::Difficulty,

        // 分值
        "points" | "point" | "score" | "marks" | "mark" | "pts" | "分值" | "分数" => {
            FieldKey::Points
        }

        // 知识点
        "topic" | "category" | "subject" | "tag" | "知识点" | "主题" => FieldKey::Topic,

        // 解析
        "explanation" | "rationale" | "reason" | "feedback" | "解析" => FieldKey::Explanation,

        _ => return None,
    };
    Some(key)
}
