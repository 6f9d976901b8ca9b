use std::{fmt::Write as _, path::Path, path::PathBuf};

use anyhow::Context;

use crate::{
    foundation::{core::png_data_url, error::CardforgeResult},
    render::text::xml_escape,
};

/// One captured card kept in the in-memory gallery.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GalleryEntry {
    /// Card title as mapped from the row.
    pub title: String,
    /// Encoded PNG.
    pub png: Vec<u8>,
}

impl GalleryEntry {
    /// `data:image/png;base64,` URL of the capture.
    pub fn data_url(&self) -> String {
        png_data_url(&self.png)
    }
}

/// Replace every character that is not an ASCII letter or digit with `_`.
///
/// `safe_filename("Goblin, King!") == "Goblin__King_"`.
pub fn safe_filename(name: &str) -> String {
    name.chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { '_' })
        .collect()
}

/// Remove `{…}` markup tags. An unclosed `{` and an empty `{}` are kept as text.
pub fn strip_tags(title: &str) -> String {
    let mut out = String::with_capacity(title.len());
    let mut rest = title;
    while let Some(open) = rest.find('{') {
        let Some(close) = rest[open..].find('}') else {
            break;
        };
        if close == 1 {
            // `{}` carries no tag name and is kept.
            out.push_str(&rest[..open + 2]);
        } else {
            out.push_str(&rest[..open]);
        }
        rest = &rest[open + close + 1..];
    }
    out.push_str(rest);
    out
}

/// Download filename for a card title: tags stripped, `card` when nothing is left.
///
/// Whitespace is not trimmed; it becomes `_` like any other unsafe character.
pub fn download_name(title: &str) -> String {
    let stripped = strip_tags(title);
    let stem = if stripped.is_empty() { "card" } else { stripped.as_str() };
    format!("{}.png", safe_filename(stem))
}

/// Write one capture into `dir`, creating it when missing. Returns the written path.
pub async fn write_download(dir: &Path, entry: &GalleryEntry) -> CardforgeResult<PathBuf> {
    tokio::fs::create_dir_all(dir)
        .await
        .with_context(|| format!("create download dir '{}'", dir.display()))?;
    let path = dir.join(download_name(&entry.title));
    tokio::fs::write(&path, &entry.png)
        .await
        .with_context(|| format!("write card '{}'", path.display()))?;
    Ok(path)
}

/// Self-contained HTML page showing every capture as an inline image.
pub fn gallery_html(entries: &[GalleryEntry]) -> String {
    let mut out = String::from(
        "<!DOCTYPE html>\n<html>\n<head>\n<meta charset=\"utf-8\">\n<title>cardforge gallery</title>\n\
         <style>body{display:flex;flex-wrap:wrap;gap:12px;background:#222}\
         figure{margin:0;color:#eee;font-family:sans-serif}img{width:300px}</style>\n\
         </head>\n<body>\n",
    );
    for entry in entries {
        let title = xml_escape(&entry.title);
        let _ = writeln!(
            out,
            "<figure><img src=\"{}\" alt=\"{title}\"><figcaption>{title}</figcaption></figure>",
            entry.data_url()
        );
    }
    out.push_str("</body>\n</html>\n");
    out
}

#[cfg(test)]
#[path = "../../tests/unit/batch/export.rs"]
mod tests;
