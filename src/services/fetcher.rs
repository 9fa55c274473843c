//! 附件下载服务 - 业务能力层
//!
//! 只负责"把一个链接下载成字节"，不关心流程

use std::time::Duration;

use tracing::debug;

use crate::error::StageError;

/// 附件下载服务
///
/// 非 2xx 状态视为该链接的硬失败（错误信息中带状态码），
/// 由流程层把失败转换成证据包里的 error 记录。
pub struct AttachmentFetcher {
    client: reqwest::Client,
    timeout: Duration,
}

impl AttachmentFetcher {
    pub fn new(timeout: Duration) -> Self {
        Self {
            client: reqwest::Client::new(),
            timeout,
        }
    }

    /// 下载附件，返回字节与文件名提示
    ///
    /// 文件名提示取 URL 的最后一个路径段，只用于下游推断扩展名。
    pub async fn fetch(&self, url: &str) -> Result<(Vec<u8>, String), StageError> {
        debug!("下载附件: {}", url);

        let response = self
            .client
            .get(url)
            .timeout(self.timeout)
            .send()
            .await
            .map_err(|e| StageError::extraction(url, format!("下载失败: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            return Err(StageError::extraction(
                url,
                format!("下载失败: HTTP {}", status.as_u16()),
            ));
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| StageError::extraction(url, format!("读取响应体失败: {}", e)))?
            .to_vec();

        debug!("下载完成: {} ({} 字节)", url, bytes.len());
        Ok((bytes, filename_hint(url)))
    }
}

/// URL 的最后一个路径段
pub(crate) fn filename_hint(url: &str) -> String {
    url.rsplit('/').next().unwrap_or(url).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_filename_hint_last_segment() {
        assert_eq!(filename_hint("https://x.test/files/data.csv"), "data.csv");
        assert_eq!(filename_hint("https://x.test/a/b/c.pdf"), "c.pdf");
        assert_eq!(filename_hint("no-slash"), "no-slash");
    }
}
