// archive.rs - 历史壁纸列表页抓取
// 列表页的每张卡片包含缩略图、标题和日期

use super::{WallpaperEntry, selector};
use crate::fetch::Fetcher;
use crate::resolve::{self, ImageSize};
use rust_i18n::t;
use scraper::{ElementRef, Html, Selector};
use std::collections::BTreeMap;
use std::sync::LazyLock;

static CARD: LazyLock<Selector> = LazyLock::new(|| selector(r#"div[class="card progressive"]"#));
static IMAGE: LazyLock<Selector> = LazyLock::new(|| selector("img"));
static TITLE: LazyLock<Selector> = LazyLock::new(|| selector("div.description h3"));
static DATE: LazyLock<Selector> = LazyLock::new(|| selector("div.description p.calendar em"));

/// 日期到壁纸记录的映射，同一日期后出现的记录覆盖先出现的
pub type WallpaperList = BTreeMap<String, WallpaperEntry>;

/// 历史壁纸列表客户端
pub struct ArchiveClient<'a> {
    fetcher: &'a dyn Fetcher,
    /// 第一页的地址（如 https://bing.ioliu.cn/?p=1）
    first_page_url: String,
    /// 列表缩略图的尺寸
    thumb_size: ImageSize,
    /// 要换成的大图尺寸
    target_size: ImageSize,
}

impl<'a> ArchiveClient<'a> {
    pub fn new(
        fetcher: &'a dyn Fetcher,
        first_page_url: impl Into<String>,
        thumb_size: ImageSize,
        target_size: ImageSize,
    ) -> Self {
        Self {
            fetcher,
            first_page_url: first_page_url.into(),
            thumb_size,
            target_size,
        }
    }

    /// 大图尺寸，用于生成缓存文件名
    pub fn target_size(&self) -> &ImageSize {
        &self.target_size
    }

    /// 第 `page` 页的地址：把第一页地址里的 `p=1` 换成 `p={page}`
    pub fn page_url(&self, page: u32) -> String {
        if page > 1 {
            self.first_page_url.replacen("p=1", &format!("p={}", page), 1)
        } else {
            self.first_page_url.clone()
        }
    }

    /// 获取并解析一页列表
    pub async fn list_page(&self, page: u32) -> Result<WallpaperList, Box<dyn std::error::Error>> {
        println!("{}", t!("listing_page", page => page));
        let html = self.fetcher.fetch_page(&self.page_url(page)).await?;
        let list = parse_listing(&html, &self.thumb_size, &self.target_size);
        tracing::debug!(page, entries = list.len(), "listing parsed");
        Ok(list)
    }
}

/// 解析列表页 HTML
///
/// 选择器都限定在卡片内部，缺失的节点按空串处理。
pub fn parse_listing(html: &str, thumb: &ImageSize, target: &ImageSize) -> WallpaperList {
    let document = Html::parse_document(html);
    let mut list = WallpaperList::new();

    for card in document.select(&CARD) {
        let src = card
            .select(&IMAGE)
            .next()
            .and_then(|img| img.value().attr("src"))
            .unwrap_or_default();

        let entry = WallpaperEntry {
            image_url: resolve::upscale_listing_url(src, thumb, target),
            title: first_text(card, &TITLE),
            date: first_text(card, &DATE),
        };

        list.insert(entry.date.replace('-', ""), entry);
    }

    list
}

/// 卡片内第一个匹配节点的文本
fn first_text(card: ElementRef<'_>, selector: &Selector) -> String {
    card.select(selector)
        .next()
        .map(|node| node.text().collect::<String>().trim().to_string())
        .unwrap_or_default()
}
