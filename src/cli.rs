use clap::{Args, Parser, Subcommand};
use poster_ai_common::{
    resize_for_layout, DishInput, DishPatch, LayoutType, Resolution, StyleSelection,
};
use std::path::PathBuf;

use crate::error::{PosterAiError, Result};

#[derive(Parser)]
#[command(name = "poster-ai")]
#[command(about = "菜单海报生成ツール（Midjourneyプロンプト / Gemini画像生成・編集）", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// 詳細ログを出力
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

/// ポスター構成（レイアウト・スタイル・料理）
#[derive(Args, Debug, Clone)]
pub struct PosterArgs {
    /// レイアウト (layout_1 .. layout_4)
    #[arg(short, long, default_value = "layout_1")]
    pub layout: LayoutType,

    /// スタイルID（`poster-ai styles` で一覧）
    #[arg(short, long, default_value = "modern_minimal")]
    pub style: String,

    /// カスタムスタイル（指定するとプリセットより優先）
    #[arg(long)]
    pub custom_style: Option<String>,

    /// 料理 "名前|キーワード|スローガン"（複数指定可）
    #[arg(short, long = "dish")]
    pub dishes: Vec<String>,

    /// 料理入力JSONファイル（翻訳結果を書き戻す）
    #[arg(long = "dishes")]
    pub dishes_file: Option<PathBuf>,
}

impl PosterArgs {
    pub fn style_selection(&self) -> StyleSelection {
        StyleSelection {
            preset_id: self.style.clone(),
            custom: self.custom_style.clone().unwrap_or_default(),
        }
    }

    /// 料理入力を組み立て、レイアウトのスロット数に合わせる
    ///
    /// `--dish` はファイルの内容を先頭から順に上書きする。
    pub fn load_dishes(&self) -> Result<Vec<DishInput>> {
        let mut dishes = match &self.dishes_file {
            Some(path) if path.exists() => {
                let content = std::fs::read_to_string(path)?;
                serde_json::from_str::<Vec<DishInput>>(&content)?
            }
            _ => Vec::new(),
        };
        for (slot, arg) in self.dishes.iter().enumerate() {
            let dish = parse_dish_arg(arg);
            match dishes.get_mut(slot) {
                Some(existing) => *existing = dish,
                None => dishes.push(dish),
            }
        }

        let slots = self.layout.slot_count();
        if dishes.len() > slots {
            tracing::warn!(
                layout = %self.layout,
                slots,
                dropped = dishes.len() - slots,
                "料理がスロット数を超えたため末尾を切り捨てます"
            );
        }
        resize_for_layout(&mut dishes, self.layout);
        Ok(dishes)
    }
}

#[derive(Subcommand)]
pub enum Commands {
    /// Midjourney用プロンプトを生成（文字なし）
    Prompt {
        #[command(flatten)]
        poster: PosterArgs,
    },

    /// Geminiでポスター画像を生成（文字入り）
    Generate {
        #[command(flatten)]
        poster: PosterArgs,

        /// 解像度 (standard/hd)
        #[arg(short, long)]
        resolution: Option<Resolution>,

        /// スタイル参照画像
        #[arg(long)]
        reference: Option<PathBuf>,
    },

    /// 既存画像を指示に従って編集
    Edit {
        /// 元画像
        #[arg(required = true)]
        image: PathBuf,

        /// 編集指示
        #[arg(short, long)]
        instruction: String,
    },

    /// 料理プロフィールをサジェスト
    Suggest {
        /// 料理名（省略時はお任せ）
        name: Option<String>,

        /// 料理入力JSONファイル（指定時は結果をマージして保存）
        #[arg(long = "dishes")]
        dishes_file: Option<PathBuf>,

        /// マージ先の料理番号（0始まり）
        #[arg(long, default_value = "0")]
        index: usize,
    },

    /// 保存済みプロンプトで再生成
    Regenerate {
        /// 結果ID（前方一致可）
        id: String,

        /// 編集結果の再生成に使う元画像
        #[arg(long)]
        source: Option<PathBuf>,

        /// 解像度 (standard/hd)
        #[arg(short, long)]
        resolution: Option<Resolution>,

        /// スタイル参照画像
        #[arg(long)]
        reference: Option<PathBuf>,
    },

    /// 生成結果の一覧
    List {
        /// プロンプト全文を表示
        #[arg(long)]
        full: bool,
    },

    /// 生成結果を削除
    Delete {
        /// 結果ID（前方一致可）
        id: String,
    },

    /// 生成結果をすべて削除
    Clear,

    /// 生成結果をZIPに出力
    Export {
        /// 出力ファイル/ディレクトリ
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// スタイル一覧
    Styles,

    /// レイアウト一覧
    Layouts,

    /// 設定を表示/編集
    Config {
        /// APIキーを設定
        #[arg(long)]
        set_api_key: Option<String>,

        /// 設定を表示
        #[arg(long)]
        show: bool,
    },
}

/// "名前|キーワード|スローガン" 形式の料理指定をパース
///
/// 区切りがなければ全体を料理名とみなす。
pub fn parse_dish_arg(arg: &str) -> DishInput {
    let mut fields = arg.splitn(3, '|').map(str::trim);
    let name = fields.next().unwrap_or_default();
    let keywords = fields.next().unwrap_or_default();
    let mut dish = DishInput::new(name, keywords);
    dish.slogan = fields
        .next()
        .filter(|s| !s.is_empty())
        .map(str::to_string);
    dish
}

/// サジェスト結果を料理リストの `index` 番目に反映
///
/// リストが短ければ空の料理で埋める。`index` はリスト長と
/// 最大スロット数のどちらかに収まっていなければならない。
pub fn merge_suggestion(
    dishes: &mut Vec<DishInput>,
    index: usize,
    patch: &DishPatch,
) -> Result<()> {
    let max_slots = LayoutType::ALL
        .iter()
        .map(LayoutType::slot_count)
        .max()
        .unwrap_or(1);
    let limit = dishes.len().max(max_slots);
    if index >= limit {
        return Err(PosterAiError::Validation(format!(
            "料理番号が範囲外です: {} (0〜{})",
            index,
            limit - 1
        )));
    }

    if index >= dishes.len() {
        dishes.resize_with(index + 1, DishInput::empty);
    }
    dishes[index].apply_patch(patch);
    Ok(())
}
