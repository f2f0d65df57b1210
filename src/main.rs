use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use poster_ai_common::{AppMode, DishInput, GeneratedItem, ItemStatus, LayoutType, STYLE_OPTIONS};
use poster_ai_rust::app::App;
use poster_ai_rust::cli::{merge_suggestion, Cli, Commands};
use poster_ai_rust::config::Config;
use poster_ai_rust::error::{PosterAiError, Result};
use poster_ai_rust::generator::SuggestionSource;
use poster_ai_rust::orchestrator::{
    RegenerateOptions, SubmitOutcome, SubmitRequest, SuggestOutcome,
};
use poster_ai_rust::store::PersistStatus;
use poster_ai_rust::{export, input};
use std::io::IsTerminal;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);
    let config = Config::load()?;

    match cli.command {
        Commands::Prompt { poster } => {
            println!("📝 poster-ai - Midjourneyプロンプト\n");
            let app = App::from_config(config)?;
            let request = SubmitRequest {
                mode: AppMode::Midjourney,
                layout: poster.layout,
                style: poster.style_selection(),
                dishes: poster.load_dishes()?,
                ..Default::default()
            };

            let pb = spinner("料理名を翻訳中...");
            let outcome = app.orchestrator.submit(&request).await;
            pb.finish_and_clear();

            report(&app, outcome?, poster.dishes_file.as_deref())?;
        }

        Commands::Generate { poster, resolution, reference } => {
            println!("🎨 poster-ai - ポスター画像生成\n");
            let app = App::from_config(config)?;
            let reference_image = match reference {
                Some(path) => Some(input::load_image(&path)?.data_url),
                None => None,
            };
            let mut request = SubmitRequest {
                mode: AppMode::NanoBanana,
                layout: poster.layout,
                style: poster.style_selection(),
                dishes: poster.load_dishes()?,
                reference_image,
                ..Default::default()
            };
            request.config.resolution = resolution.unwrap_or(app.config.default_resolution);

            let pb = spinner("生成中...");
            let outcome = app.orchestrator.submit(&request).await;
            pb.finish_and_clear();

            report(&app, outcome?, poster.dishes_file.as_deref())?;
        }

        Commands::Edit { image, instruction } => {
            println!("✏️  poster-ai - 画像編集\n");
            let app = App::from_config(config)?;
            let source = input::load_image(&image)?;
            println!(
                "✔ 元画像: {}x{} ({})",
                source.width, source.height, source.aspect_ratio
            );

            let request = SubmitRequest {
                mode: AppMode::ImageEdit,
                source_ratio: source.aspect_ratio,
                source_image: Some(source.data_url),
                edit_instruction: instruction,
                ..Default::default()
            };

            let pb = spinner("編集中...");
            let outcome = app.orchestrator.submit(&request).await;
            pb.finish_and_clear();

            report(&app, outcome?, None)?;
        }

        Commands::Suggest { name, dishes_file, index } => {
            println!("💡 poster-ai - 料理サジェスト\n");
            let app = App::from_config(config)?;
            let name = name.unwrap_or_default();

            let pb = spinner("サジェスト中...");
            let outcome = app.orchestrator.suggest(&name).await;
            pb.finish_and_clear();

            let suggestion = match outcome? {
                SuggestOutcome::Suggested(suggestion) => suggestion,
                SuggestOutcome::CredentialRequested { selected: true } => {
                    println!("✔ APIキーを選択しました。もう一度実行してください");
                    return Ok(());
                }
                SuggestOutcome::CredentialRequested { selected: false } => {
                    return Err(PosterAiError::MissingApiKey);
                }
            };

            if suggestion.source == SuggestionSource::Fallback {
                println!("⚠️ サジェストに失敗したため定型文を表示します");
            }
            let patch = &suggestion.patch;
            println!("  料理名: {}", patch.name.as_deref().unwrap_or("-"));
            println!("  タグ: {}", patch.tag.as_deref().unwrap_or("-"));
            println!("  キーワード: {}", patch.keywords.as_deref().unwrap_or("-"));
            println!("  スローガン: {}", patch.slogan.as_deref().unwrap_or("-"));

            if let Some(path) = dishes_file {
                let mut dishes = read_dishes(&path)?;
                merge_suggestion(&mut dishes, index, patch)?;
                write_dishes(&path, &dishes)?;
                println!("\n✔ 料理{}に反映: {}", index + 1, path.display());
            }
        }

        Commands::Regenerate { id, source, resolution, reference } => {
            println!("🔄 poster-ai - 再生成\n");
            let app = App::from_config(config)?;
            let id = app.store().resolve_id(&id)?;

            let mut options = RegenerateOptions::default();
            options.config.resolution = resolution.unwrap_or(app.config.default_resolution);
            if let Some(path) = reference {
                options.reference_image = Some(input::load_image(&path)?.data_url);
            }
            if let Some(path) = source {
                let image = input::load_image(&path)?;
                options.source_ratio = image.aspect_ratio;
                options.source_image = Some(image.data_url);
            }

            let pb = spinner("再生成中...");
            let outcome = app.orchestrator.regenerate(&id, &options).await;
            pb.finish_and_clear();

            report(&app, outcome?, None)?;
        }

        Commands::List { full } => {
            let app = App::from_config(config)?;
            let items = app.store().snapshot();
            if items.is_empty() {
                println!("生成結果はありません");
                return Ok(());
            }

            println!("生成結果 ({}件):", items.len());
            for item in &items {
                print_item(item, full);
            }
        }

        Commands::Delete { id } => {
            let app = App::from_config(config)?;
            let id = app.store().resolve_id(&id)?;
            if app.orchestrator.delete(&id) {
                println!("✔ 削除しました: {}", id);
            }
            warn_if_degraded(&app);
        }

        Commands::Clear => {
            let app = App::from_config(config)?;
            if std::io::stdin().is_terminal() {
                let confirmed = dialoguer::Confirm::new()
                    .with_prompt(format!("{}件の生成結果をすべて削除しますか？", app.store().len()))
                    .default(false)
                    .interact()
                    .map_err(|e| PosterAiError::Validation(format!("入力エラー: {}", e)))?;
                if !confirmed {
                    println!("キャンセルしました");
                    return Ok(());
                }
            }
            app.orchestrator.clear();
            println!("✔ すべて削除しました");
            warn_if_degraded(&app);
        }

        Commands::Export { output } => {
            println!("📦 poster-ai - ZIP出力\n");
            let app = App::from_config(config)?;
            let items = app.store().snapshot();
            if items.is_empty() {
                println!("出力する生成結果がありません");
                return Ok(());
            }

            let output = output.unwrap_or_else(|| PathBuf::from("."));
            let (path, summary) = export::export_zip(&items, &output)?;
            println!(
                "✔ プロンプト{}件 / 画像{}件",
                summary.prompts, summary.images
            );
            if summary.skipped_images > 0 {
                println!("⚠️ 画像{}件はデータ不正のためスキップ", summary.skipped_images);
            }
            println!("\n✅ 出力完了: {}", path.display());
        }

        Commands::Styles => {
            println!("スタイル一覧:");
            for style in STYLE_OPTIONS {
                println!("  {:<20} {}", style.id, style.name);
            }
        }

        Commands::Layouts => {
            println!("レイアウト一覧:");
            for layout in LayoutType::ALL {
                println!(
                    "  {} ({}品)  {}",
                    layout,
                    layout.slot_count(),
                    layout.description()
                );
            }
        }

        Commands::Config { set_api_key, show } => {
            let mut config = config;

            if let Some(key) = set_api_key {
                config.set_api_key(key)?;
                println!("✔ APIキーを設定しました");
            }

            if show {
                println!("設定:");
                println!("  テキストモデル: {}", config.text_model);
                println!("  画像モデル: {}", config.image_model);
                println!("  解像度: {}", config.default_resolution);
                println!("  保存先: {}", config.data_dir()?.display());
                match config.storage_quota_bytes {
                    Some(quota) => println!("  保存上限: {} bytes", quota),
                    None => println!("  保存上限: なし"),
                }
                println!(
                    "  APIキー: {}",
                    if config.get_api_key().is_some() { "設定済み" } else { "未設定" }
                );
            }
        }
    }

    Ok(())
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "poster_ai_rust=debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn spinner(message: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::with_template("{spinner:.cyan} {msg}") {
        pb.set_style(style);
    }
    pb.set_message(message.to_string());
    pb.enable_steady_tick(Duration::from_millis(100));
    pb
}

/// 生成結果を表示し、翻訳済みの料理入力をファイルに書き戻す
fn report(app: &App, outcome: SubmitOutcome, dishes_file: Option<&Path>) -> Result<()> {
    let settlement = match outcome {
        SubmitOutcome::CredentialRequested { selected: true } => {
            println!("✔ APIキーを選択しました。もう一度実行してください");
            return Ok(());
        }
        SubmitOutcome::CredentialRequested { selected: false } => {
            return Err(PosterAiError::MissingApiKey);
        }
        SubmitOutcome::Settled(settlement) => settlement,
    };

    if let Some(alert) = settlement.alert {
        println!("⚠️ {}", alert);
    }

    if let Some(path) = dishes_file {
        write_dishes(path, &settlement.dishes)?;
        println!("✔ 翻訳結果を保存: {}", path.display());
    }

    match &settlement.item {
        Some(item) => {
            print_item(item, true);
            match item.status {
                ItemStatus::Success => println!("\n✅ 完了"),
                ItemStatus::Failed => println!("\n❌ 生成に失敗しました"),
                ItemStatus::Pending => {}
            }
        }
        None => println!("結果は削除済みです: {}", settlement.item_id),
    }

    warn_if_degraded(app);
    Ok(())
}

fn print_item(item: &GeneratedItem, full: bool) {
    let time = chrono::DateTime::from_timestamp_millis(item.timestamp)
        .map(|t| t.with_timezone(&chrono::Local).format("%Y-%m-%d %H:%M").to_string())
        .unwrap_or_default();
    let status = match item.status {
        ItemStatus::Pending => "⏳",
        ItemStatus::Success => "✔",
        ItemStatus::Failed => "✘",
    };
    let image = if item.image_url.is_some() { " [画像]" } else { "" };

    println!(
        "{} {}  {}  {} / {} / {}{}",
        status,
        short_id(&item.id),
        time,
        item.mode,
        item.layout,
        item.style_name,
        image
    );
    if full {
        println!("  {}", item.full_prompt);
    }
}

fn short_id(id: &str) -> &str {
    id.get(..8).unwrap_or(id)
}

fn warn_if_degraded(app: &App) {
    if let PersistStatus::Degraded { reason } = app.store().persist_status() {
        println!("⚠️ 履歴を保存できませんでした（このセッションのみ保持）: {}", reason);
    }
}

fn read_dishes(path: &Path) -> Result<Vec<DishInput>> {
    if !path.exists() {
        return Ok(Vec::new());
    }
    let content = std::fs::read_to_string(path)?;
    Ok(serde_json::from_str(&content)?)
}

fn write_dishes(path: &Path, dishes: &[DishInput]) -> Result<()> {
    let json = serde_json::to_string_pretty(dishes)?;
    std::fs::write(path, json)?;
    Ok(())
}
