//! 证据包模型
//!
//! 证据包是交给 LLM 的全部附件解析结果：附件 URL → 解析出的
//! 结构化 JSON（或携带 error 字段的失败标记）。

use phf::phf_map;
use serde::Serialize;
use serde_json::Value as JsonValue;
use std::collections::BTreeMap;

/// 附件类型（按文件扩展名识别）
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttachmentKind {
    Csv,
    Xlsx,
    Pdf,
    Image,
    Audio,
}

/// 扩展名（小写）→ 附件类型
pub static ATTACHMENT_KINDS: phf::Map<&'static str, AttachmentKind> = phf_map! {
    "csv" => AttachmentKind::Csv,
    "xlsx" => AttachmentKind::Xlsx,
    "xls" => AttachmentKind::Xlsx,
    "pdf" => AttachmentKind::Pdf,
    "png" => AttachmentKind::Image,
    "jpg" => AttachmentKind::Image,
    "jpeg" => AttachmentKind::Image,
    "gif" => AttachmentKind::Image,
    "webp" => AttachmentKind::Image,
    "mp3" => AttachmentKind::Audio,
    "wav" => AttachmentKind::Audio,
    "m4a" => AttachmentKind::Audio,
    "ogg" => AttachmentKind::Audio,
};

/// 页面上识别为附件下载链接的扩展名
pub const DOWNLOAD_EXTENSIONS: [&str; 4] = [".csv", ".xlsx", ".xls", ".pdf"];

/// 证据包
///
/// 不变式：每个进入处理的附件链接恰好出现一次（按 URL 去重）。
/// BTreeMap 保证序列化顺序稳定，方便测试与复现。
#[derive(Debug, Default, Serialize)]
pub struct EvidenceBundle {
    pub files: BTreeMap<String, JsonValue>,
}

impl EvidenceBundle {
    pub fn insert(&mut self, url: String, record: JsonValue) {
        self.files.insert(url, record);
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_attachment_kind_lookup() {
        assert_eq!(ATTACHMENT_KINDS.get("csv"), Some(&AttachmentKind::Csv));
        assert_eq!(ATTACHMENT_KINDS.get("xls"), Some(&AttachmentKind::Xlsx));
        assert_eq!(ATTACHMENT_KINDS.get("mp3"), Some(&AttachmentKind::Audio));
        assert_eq!(ATTACHMENT_KINDS.get("exe"), None);
    }

    #[test]
    fn test_bundle_deduplicates_by_url() {
        let mut bundle = EvidenceBundle::default();
        bundle.insert("https://x.test/a.csv".to_string(), json!({"type": "csv"}));
        bundle.insert(
            "https://x.test/a.csv".to_string(),
            json!({"error": "later"}),
        );
        assert_eq!(bundle.len(), 1);
    }
}
