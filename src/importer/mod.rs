// ==========================================
// 题库导入引擎 - 导入层
// ==========================================
// 职责: 任意格式的题目文本 → 规范题目记录
// 支持: JSON / 带表头 CSV-TSV / 无表头 CSV-TSV / 自由文本
// ==========================================

// 模块声明
pub mod answer_resolver;
pub mod error;
pub mod extractor_trait;
pub mod format_detector;
pub mod header_resolver;
pub mod json_extractor;
pub mod plain_text_extractor;
pub mod question_builder;
pub mod source_reader;
pub mod structured_extractor;
pub mod template;
pub mod tokenizer;
pub mod type_classifier;
pub mod unstructured_extractor;

// 重导出核心类型
pub use error::{ImportError, ImportResult};
pub use format_detector::{detect_and_parse, detect_and_parse_with, DetectionReport, FormatDetector};
pub use json_extractor::JsonExtractor;
pub use plain_text_extractor::PlainTextExtractor;
pub use question_builder::QuestionBuilder;
pub use source_reader::{decode_text, read_text, read_text_file};
pub use structured_extractor::StructuredExtractor;
pub use unstructured_extractor::UnstructuredExtractor;

// 重导出 Trait 接口
pub use extractor_trait::{Extractor, SourceText};
