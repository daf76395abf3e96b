// source/mod.rs - 壁纸来源模块入口
// homepage: 搜索引擎主页上的当日背景图
// archive: 按页浏览的历史壁纸列表
pub mod archive;
pub mod homepage;

use scraper::Selector;

/// 解析写死在代码里的 CSS 选择器
pub(crate) fn selector(css: &str) -> Selector {
    Selector::parse(css).expect("hard-coded selector must be valid")
}

/// 列表页上的一条壁纸记录
/// 只在本次运行中临时使用，不做持久化
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WallpaperEntry {
    /// 已换成目标尺寸的图片地址，可能为空
    pub image_url: String,
    /// 壁纸标题
    pub title: String,
    /// 发布日期（YYYYMMDD，已去掉 `-`）
    pub date: String,
}
