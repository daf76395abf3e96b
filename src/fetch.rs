// fetch.rs - HTTP 请求模块
// 页面请求带桌面浏览器 User-Agent，图片下载使用客户端默认请求头

use async_trait::async_trait;

/// 页面请求使用的桌面浏览器标识
pub const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/86.0.4240.75 Safari/537.36";

/// 网络访问的抽象接口
///
/// 解析、下载逻辑只依赖这个 Trait，测试时可以换成内存实现。
#[async_trait]
pub trait Fetcher: Send + Sync {
    /// 获取 HTML 页面文本
    async fn fetch_page(&self, url: &str) -> Result<String, Box<dyn std::error::Error>>;

    /// 下载完整的响应体
    async fn fetch_bytes(&self, url: &str) -> Result<Vec<u8>, Box<dyn std::error::Error>>;
}

/// 基于 reqwest 的实现
pub struct HttpFetcher {
    /// HTTP 客户端（内部有连接池，应复用）
    client: reqwest::Client,
}

impl HttpFetcher {
    pub fn new() -> Self {
        Self {
            client: reqwest::Client::new(),
        }
    }
}

#[async_trait]
impl Fetcher for HttpFetcher {
    async fn fetch_page(&self, url: &str) -> Result<String, Box<dyn std::error::Error>> {
        tracing::debug!(url, "GET page");
        let body = self
            .client
            .get(url)
            .header(reqwest::header::USER_AGENT, USER_AGENT)
            .send()
            .await?
            .error_for_status()?
            .text()
            .await?;
        Ok(body)
    }

    async fn fetch_bytes(&self, url: &str) -> Result<Vec<u8>, Box<dyn std::error::Error>> {
        tracing::debug!(url, "GET image");
        let bytes = self
            .client
            .get(url)
            .send()
            .await?
            .error_for_status()?
            .bytes()
            .await?;
        tracing::debug!(len = bytes.len(), "image downloaded");
        Ok(bytes.to_vec())
    }
}
