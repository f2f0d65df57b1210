//! ZIP出力
//!
//! 結果ごとにプロンプトのテキストファイルと、画像があれば画像ファイルを書き出す。
//! ファイル名は `poster_{番号}_{レイアウト}`。

use crate::error::Result;
use base64::{engine::general_purpose::STANDARD, Engine as _};
use poster_ai_common::{extract_base64_from_data_url, GeneratedItem};
use std::fs::File;
use std::io::{BufWriter, Seek, Write};
use std::path::{Path, PathBuf};
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

pub const EXPORT_FOLDER: &str = "hefenglou_posters";
pub const DEFAULT_ARCHIVE_NAME: &str = "hefenglou_export.zip";

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExportSummary {
    pub prompts: usize,
    pub images: usize,
    /// 画像データが壊れていて書き出せなかった件数
    pub skipped_images: usize,
}

fn file_prefix(index: usize, item: &GeneratedItem) -> String {
    format!("poster_{}_{}", index + 1, item.layout)
}

/// 出力先がディレクトリならデフォルト名を付ける
pub fn archive_path(output: &Path) -> PathBuf {
    if output.is_dir() || output.extension().is_none() {
        output.join(DEFAULT_ARCHIVE_NAME)
    } else {
        output.to_path_buf()
    }
}

/// 任意のWriterにZIPを書き出す
pub fn write_archive<W: Write + Seek>(items: &[GeneratedItem], writer: W) -> Result<ExportSummary> {
    let mut zip = ZipWriter::new(writer);
    let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);
    let mut summary = ExportSummary::default();

    zip.add_directory(format!("{}/", EXPORT_FOLDER), options)?;

    for (index, item) in items.iter().enumerate() {
        let prefix = file_prefix(index, item);

        zip.start_file(format!("{}/{}_prompt.txt", EXPORT_FOLDER, prefix), options)?;
        zip.write_all(item.full_prompt.as_bytes())?;
        summary.prompts += 1;

        let Some(image_url) = item.image_url.as_deref() else {
            continue;
        };
        let data = extract_base64_from_data_url(image_url).unwrap_or(image_url);
        match STANDARD.decode(data) {
            Ok(bytes) => {
                zip.start_file(format!("{}/{}.png", EXPORT_FOLDER, prefix), options)?;
                zip.write_all(&bytes)?;
                summary.images += 1;
            }
            Err(e) => {
                tracing::warn!(id = %item.id, error = %e, "画像データをデコードできません、スキップ");
                summary.skipped_images += 1;
            }
        }
    }

    zip.finish()?;
    Ok(summary)
}

/// ZIPファイルとして書き出す
pub fn export_zip(items: &[GeneratedItem], output: &Path) -> Result<(PathBuf, ExportSummary)> {
    let path = archive_path(output);
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }
    let file = File::create(&path)?;
    let summary = write_archive(items, BufWriter::new(file))?;
    Ok((path, summary))
}
