// homepage.rs - 主页当日背景图
// 背景图地址藏在 #bgImgProgLoad 节点的 data-ultra-definition-src 属性里

use super::selector;
use crate::fetch::Fetcher;
use rust_i18n::t;
use scraper::{Html, Selector};
use std::sync::LazyLock;

static BACKGROUND: LazyLock<Selector> = LazyLock::new(|| selector("div#bgImgProgLoad"));

const BACKGROUND_ATTR: &str = "data-ultra-definition-src";

pub struct HomepageClient<'a> {
    fetcher: &'a dyn Fetcher,
    /// 主页地址（如 https://cn.bing.com）
    base_url: String,
}

impl<'a> HomepageClient<'a> {
    pub fn new(fetcher: &'a dyn Fetcher, base_url: impl Into<String>) -> Self {
        Self {
            fetcher,
            base_url: base_url.into(),
        }
    }

    /// 获取主页背景图的完整地址
    pub async fn background_url(&self) -> Result<String, Box<dyn std::error::Error>> {
        let html = self.fetcher.fetch_page(&self.base_url).await?;
        let src = parse_background(&html).ok_or(t!("error_no_background"))?;
        Ok(absolutize(&self.base_url, &src))
    }
}

/// 从主页 HTML 中取出背景图属性
pub fn parse_background(html: &str) -> Option<String> {
    let document = Html::parse_document(html);
    document
        .select(&BACKGROUND)
        .next()
        .and_then(|node| node.value().attr(BACKGROUND_ATTR))
        .map(str::trim)
        .filter(|src| !src.is_empty())
        .map(str::to_string)
}

/// 属性值通常是站内相对路径，拼上主页地址
fn absolutize(base_url: &str, src: &str) -> String {
    if src.starts_with("http://") || src.starts_with("https://") {
        src.to_string()
    } else {
        format!("{}{}", base_url.trim_end_matches('/'), src)
    }
}
