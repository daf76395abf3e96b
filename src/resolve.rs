// resolve.rs - 图片地址与缓存路径解析模块
// 负责把低分辨率地址换成高清地址，并根据 日期 + 尺寸 + 地址哈希 生成固定的本地文件名

use regex::Regex;
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

/// 匹配主页背景图地址里的宽度参数（如 `w=1920`）
static WIDTH_PARAM: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"w=\d+").expect("width pattern"));

/// 匹配主页背景图地址里的高度参数（如 `h=1080`）
static HEIGHT_PARAM: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"h=\d+").expect("height pattern"));

/// 图片尺寸
///
/// 只作为值对象使用：`label` 参与文件命名，`width`/`height` 参与地址替换。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImageSize {
    /// 尺寸标签（如 "4k"），可以为空
    pub label: &'static str,
    pub width: u32,
    pub height: u32,
}

pub const SIZE_0K: ImageSize = ImageSize {
    label: "0k",
    width: 640,
    height: 480,
};
pub const SIZE_1K: ImageSize = ImageSize {
    label: "1k",
    width: 1920,
    height: 1080,
};
pub const SIZE_2K: ImageSize = ImageSize {
    label: "2k",
    width: 2560,
    height: 1440,
};
pub const SIZE_4K: ImageSize = ImageSize {
    label: "4k",
    width: 3840,
    height: 2160,
};

/// 全部预设尺寸，按从小到大排列
pub const PRESETS: [ImageSize; 4] = [SIZE_0K, SIZE_1K, SIZE_2K, SIZE_4K];

impl ImageSize {
    /// 解析尺寸字符串
    ///
    /// 支持预设标签（"0k" / "1k" / "2k" / "4k"）和 "WxH" 两种写法，
    /// "WxH" 写法得到的尺寸没有标签。
    pub fn parse(value: &str) -> Option<ImageSize> {
        let value = value.trim();
        for preset in PRESETS {
            if preset.label.eq_ignore_ascii_case(value) {
                return Some(preset);
            }
        }

        let (w, h) = value.split_once(['x', 'X'])?;
        let width = w.trim().parse::<u32>().ok()?;
        let height = h.trim().parse::<u32>().ok()?;
        Some(ImageSize {
            label: "",
            width,
            height,
        })
    }

    /// 文件名中使用的尺寸标签
    /// 没有标签时退化为宽高各补齐 4 位的数字串（如 "13660768"）
    pub fn label_or_dims(&self) -> String {
        if self.label.is_empty() {
            format!("{:04}{:04}", self.width, self.height)
        } else {
            self.label.to_string()
        }
    }

    /// "WxH" 形式的尺寸片段
    pub fn dims(&self) -> String {
        format!("{}x{}", self.width, self.height)
    }
}

impl fmt::Display for ImageSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.label.is_empty() {
            write!(f, "{}", self.dims())
        } else {
            write!(f, "{} ({})", self.label, self.dims())
        }
    }
}

/// 解析完成的图片：最终下载地址 + 本地缓存路径
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedImage {
    pub url: String,
    pub path: PathBuf,
}

/// 把列表页缩略图地址换成目标尺寸的大图地址
///
/// 去掉最后一个 `?` 之后的查询串，再把第一处 `{old}` 尺寸片段换成 `{new}`。
/// 地址里没有旧尺寸片段时原样返回；空地址返回空串，调用方据此跳过。
pub fn upscale_listing_url(raw: &str, old: &ImageSize, new: &ImageSize) -> String {
    let raw = raw.trim();
    if raw.is_empty() {
        return String::new();
    }

    let base = match raw.rfind('?') {
        Some(idx) => &raw[..idx],
        None => raw,
    };

    base.replacen(&old.dims(), &new.dims(), 1)
}

/// 改写主页背景图地址里的 `w=` / `h=` 参数
/// 两个参数各自只替换第一处，没有匹配时原样返回
pub fn rescale_query_dims(url: &str, size: &ImageSize) -> String {
    let width = format!("w={}", size.width);
    let height = format!("h={}", size.height);
    let url = WIDTH_PARAM.replace(url, width.as_str());
    let url = HEIGHT_PARAM.replace(&url, height.as_str());
    url.into_owned()
}

/// 地址 MD5 的最后 12 位十六进制字符
pub fn hash_suffix(url: &str) -> String {
    let digest = format!("{:x}", md5::compute(url));
    digest[digest.len() - 12..].to_string()
}

/// 缓存文件名：`{date}-{sizeLabel}-{hash12}.jpg`
pub fn cache_file_name(date: &str, url: &str, size: &ImageSize) -> String {
    format!("{}-{}-{}.jpg", date, size.label_or_dims(), hash_suffix(url))
}

/// 计算最终下载地址和缓存路径
///
/// - `replace` 为 true 时按主页模式改写 `w=` / `h=` 参数
/// - 哈希取自改写之后的地址
/// - 日期或地址为空时返回 `None`，表示跳过这一项
pub fn resolve_save_path(
    dir: &Path,
    date: &str,
    image_url: &str,
    size: &ImageSize,
    replace: bool,
) -> Option<ResolvedImage> {
    let url = if replace {
        rescale_query_dims(image_url, size)
    } else {
        image_url.to_string()
    };

    if date.is_empty() || url.trim().is_empty() {
        return None;
    }

    let path = dir.join(cache_file_name(date, &url, size));
    Some(ResolvedImage { url, path })
}
