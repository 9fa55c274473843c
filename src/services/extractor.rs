//! 证据提取服务 - 业务能力层
//!
//! 按文件名提示的扩展名，把附件字节解码成结构化 JSON。
//! 本服务对外承诺**永不失败**：任何内部错误都转换成携带
//! error 字段的 JSON 对象返回，编排层绝不会从这里收到异常。
//!
//! 附件字节只在解码期间落盘（NamedTempFile），离开作用域即删除，
//! 成功失败都一样。

use std::io::Write;
use std::path::Path;

use anyhow::Result;
use calamine::{open_workbook_auto, Data, Reader};
use serde_json::{json, Value as JsonValue};
use tracing::debug;

use crate::models::evidence::{AttachmentKind, ATTACHMENT_KINDS};
use crate::services::transcriber::Transcriber;

/// 证据提取服务
///
/// 职责：
/// - 大小上限检查（超限直接拒绝解码）
/// - 按扩展名分发到格式解码器
/// - 未知扩展名时尽力按 CSV 解析，再退到 binary 标记
pub struct EvidenceExtractor {
    max_bytes: u64,
    transcriber: Transcriber,
}

impl EvidenceExtractor {
    pub fn new(max_bytes: u64, transcriber: Transcriber) -> Self {
        Self {
            max_bytes,
            transcriber,
        }
    }

    /// 提取附件内容；任何失败都以 `{"error": ...}` 形式返回
    pub async fn extract(&self, bytes: &[u8], filename_hint: &str) -> JsonValue {
        if bytes.len() as u64 > self.max_bytes {
            return json!({"error": "File too large"});
        }

        let ext = extension_of(filename_hint);
        debug!("提取附件: {} (扩展名: {:?})", filename_hint, ext);

        match ATTACHMENT_KINDS.get(ext.as_str()) {
            // 图片不做像素级解码，只记录元信息
            Some(AttachmentKind::Image) => {
                json!({"type": "image", "format": ext, "size": bytes.len()})
            }
            // 音频走转写服务，转写失败降级为内嵌的错误串
            Some(AttachmentKind::Audio) => {
                match self.transcriber.transcribe(bytes.to_vec(), filename_hint).await {
                    Ok(transcript) => {
                        json!({"type": "audio", "size": bytes.len(), "transcript": transcript})
                    }
                    Err(e) => {
                        json!({"type": "audio", "size": bytes.len(), "error": e.to_string()})
                    }
                }
            }
            kind => self.decode_from_disk(bytes, &ext, kind.copied()),
        }
    }

    /// 需要文件句柄的格式：先落盘再解码
    fn decode_from_disk(&self, bytes: &[u8], ext: &str, kind: Option<AttachmentKind>) -> JsonValue {
        let tmp = match spill_to_tempfile(bytes, ext) {
            Ok(tmp) => tmp,
            Err(e) => return json!({"error": format!("临时文件写入失败: {}", e)}),
        };
        let path = tmp.path();

        match kind {
            Some(AttachmentKind::Csv) => {
                parse_csv(path).unwrap_or_else(|e| json!({"error": e.to_string()}))
            }
            Some(AttachmentKind::Xlsx) => {
                parse_xlsx(path).unwrap_or_else(|e| json!({"error": e.to_string()}))
            }
            Some(AttachmentKind::Pdf) => {
                parse_pdf(path).unwrap_or_else(|e| json!({"error": e.to_string()}))
            }
            // 未知扩展名：尽力按 CSV 解析，再退到 binary 标记
            _ => parse_csv(path).unwrap_or_else(|_| json!({"type": "binary", "size": bytes.len()})),
        }
        // tmp 在此离开作用域，临时文件被删除
    }
}

/// 文件名提示的扩展名（小写，不含点）
pub(crate) fn extension_of(filename_hint: &str) -> String {
    match filename_hint.rsplit_once('.') {
        Some((_, ext)) => ext.to_lowercase(),
        None => String::new(),
    }
}

/// 把字节写入带扩展名后缀的临时文件
fn spill_to_tempfile(bytes: &[u8], ext: &str) -> std::io::Result<tempfile::NamedTempFile> {
    let mut tmp = if ext.is_empty() {
        tempfile::NamedTempFile::new()?
    } else {
        tempfile::Builder::new()
            .suffix(&format!(".{}", ext))
            .tempfile()?
    };
    tmp.write_all(bytes)?;
    tmp.flush()?;
    Ok(tmp)
}

/// CSV → {type, columns, rows}，单元格尽量推断成数字
fn parse_csv(path: &Path) -> Result<JsonValue> {
    let mut reader = csv::ReaderBuilder::new().flexible(true).from_path(path)?;
    let columns: Vec<String> = reader.headers()?.iter().map(|h| h.to_string()).collect();
    if columns.is_empty() {
        anyhow::bail!("CSV 没有表头");
    }

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record?;
        let mut row = serde_json::Map::new();
        for (i, field) in record.iter().enumerate() {
            let key = columns
                .get(i)
                .cloned()
                .unwrap_or_else(|| format!("column_{}", i));
            row.insert(key, infer_scalar(field));
        }
        rows.push(JsonValue::Object(row));
    }

    Ok(json!({"type": "csv", "columns": columns, "rows": rows}))
}

/// XLSX/XLS → 第一个工作表的 {type, columns, rows}
///
/// open_workbook_auto 按文件内容识别格式，新旧两种工作簿都能打开。
fn parse_xlsx(path: &Path) -> Result<JsonValue> {
    let mut workbook = open_workbook_auto(path)?;
    let sheet_names = workbook.sheet_names().to_vec();
    let first = sheet_names
        .first()
        .cloned()
        .ok_or_else(|| anyhow::anyhow!("工作簿没有工作表"))?;
    let range = workbook.worksheet_range(&first)?;

    let mut rows_iter = range.rows();
    let columns: Vec<String> = rows_iter
        .next()
        .map(|row| row.iter().map(|cell| cell.to_string()).collect())
        .unwrap_or_default();

    let mut rows = Vec::new();
    for row in rows_iter {
        let mut obj = serde_json::Map::new();
        for (i, cell) in row.iter().enumerate() {
            let key = columns
                .get(i)
                .cloned()
                .unwrap_or_else(|| format!("column_{}", i));
            obj.insert(key, cell_to_json(cell));
        }
        rows.push(JsonValue::Object(obj));
    }

    Ok(json!({"type": "xlsx", "columns": columns, "rows": rows}))
}

/// PDF → 逐页文本（表格提取没有对应实现，只产出文本）
fn parse_pdf(path: &Path) -> Result<JsonValue> {
    let doc = lopdf::Document::load(path)?;
    let mut texts = Vec::new();
    for page_number in doc.get_pages().keys() {
        // 单页提取失败以空字符串占位，页数保持完整
        texts.push(doc.extract_text(&[*page_number]).unwrap_or_default());
    }
    Ok(json!({"type": "pdf", "pages": texts.len(), "texts": texts}))
}

/// 字符串单元格的数字推断
fn infer_scalar(field: &str) -> JsonValue {
    if let Ok(i) = field.parse::<i64>() {
        return json!(i);
    }
    if let Ok(f) = field.parse::<f64>() {
        if f.is_finite() {
            return json!(f);
        }
    }
    json!(field)
}

fn cell_to_json(cell: &Data) -> JsonValue {
    match cell {
        Data::Empty => JsonValue::Null,
        Data::Int(i) => json!(i),
        Data::Float(f) => json!(f),
        Data::Bool(b) => json!(b),
        Data::String(s) => json!(s),
        other => json!(other.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;

    fn test_extractor() -> EvidenceExtractor {
        let config = Config::default();
        EvidenceExtractor::new(config.max_attachment_bytes, Transcriber::new(&config))
    }

    #[tokio::test]
    async fn test_extract_csv() {
        let bytes = b"name,score\nalice,90\nbob,85.5\n";
        let record = test_extractor().extract(bytes, "grades.csv").await;
        assert_eq!(record["type"], "csv");
        assert_eq!(record["columns"], json!(["name", "score"]));
        assert_eq!(record["rows"][0]["score"], json!(90));
        assert_eq!(record["rows"][1]["score"], json!(85.5));
    }

    #[tokio::test]
    async fn test_extract_oversize_rejected() {
        let config = Config::default();
        let extractor = EvidenceExtractor::new(4, Transcriber::new(&config));
        let record = extractor.extract(b"12345", "data.csv").await;
        assert_eq!(record, json!({"error": "File too large"}));
    }

    #[tokio::test]
    async fn test_extract_unknown_extension_csv_fallback() {
        let bytes = b"a,b\n1,2\n";
        let record = test_extractor().extract(bytes, "data.unknown").await;
        assert_eq!(record["type"], "csv");
    }

    #[tokio::test]
    async fn test_extract_binary_fallback() {
        // 非 UTF-8 字节既解析不成 CSV，也没有已知扩展名
        let bytes = [0u8, 159, 146, 150, 0, 255];
        let record = test_extractor().extract(&bytes, "blob.bin").await;
        assert_eq!(record["type"], "binary");
        assert_eq!(record["size"], json!(bytes.len()));
    }

    #[tokio::test]
    async fn test_extract_image_metadata_only() {
        let record = test_extractor().extract(&[1, 2, 3], "chart.PNG").await;
        assert_eq!(record["type"], "image");
        assert_eq!(record["format"], "png");
        assert_eq!(record["size"], json!(3));
    }

    #[tokio::test]
    async fn test_extract_audio_without_credentials_embeds_error() {
        // 默认配置没有 API key，转写失败必须降级为内嵌错误串
        let record = test_extractor().extract(&[0u8; 8], "voice.mp3").await;
        assert_eq!(record["type"], "audio");
        assert!(record["error"].as_str().is_some());
    }

    #[test]
    fn test_tempfile_removed_on_drop() {
        // 附件字节只允许在解码期间落盘
        let tmp = spill_to_tempfile(b"a,b\n1,2\n", "csv").unwrap();
        let path = tmp.path().to_path_buf();
        assert!(path.exists());
        drop(tmp);
        assert!(!path.exists());
    }

    #[test]
    fn test_extension_of() {
        assert_eq!(extension_of("data.CSV"), "csv");
        assert_eq!(extension_of("archive.tar.gz"), "gz");
        assert_eq!(extension_of("noext"), "");
    }

    #[test]
    fn test_infer_scalar() {
        assert_eq!(infer_scalar("42"), json!(42));
        assert_eq!(infer_scalar("-1.5"), json!(-1.5));
        assert_eq!(infer_scalar("abc"), json!("abc"));
        // NaN 不能进 JSON，保持字符串
        assert_eq!(infer_scalar("NaN"), json!("NaN"));
    }
}
