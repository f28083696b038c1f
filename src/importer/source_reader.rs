// ==========================================
// 题库导入引擎 - 输入读取
// ==========================================
// 职责: 字节/文件 → UTF-8 文本（去除 BOM）
// 说明: 解码失败是整个导入流程中唯一的硬错误
// ==========================================

use crate::importer::error::{ImportError, ImportResult};
use std::io::Read;
use std::path::Path;
use tracing::debug;

const UTF8_BOM: char = '\u{FEFF}';

/// 字节 → 文本（UTF-8，去除开头 BOM）
pub fn decode_text(bytes: Vec<u8>) -> ImportResult<String> {
    let text = String::from_utf8(bytes)?;
    Ok(match text.strip_prefix(UTF8_BOM) {
        Some(stripped) => stripped.to_string(),
        None => text,
    })
}

/// 读取文件为文本
pub fn read_text_file<P: AsRef<Path>>(path: P) -> ImportResult<String> {
    let path = path.as_ref();
    if !path.exists() {
        return Err(ImportError::FileNotFound(path.display().to_string()));
    }

    let bytes = std::fs::read(path)?;
    debug!(path = %path.display(), bytes = bytes.len(), "读取输入文件");
    decode_text(bytes)
}

/// 从任意 Reader 读取文本（CLI 使用 stdin）
pub fn read_text<R: Read>(mut reader: R) -> ImportResult<String> {
    let mut bytes = Vec::new();
    reader.read_to_end(&mut bytes)?;
    decode_text(bytes)
}
