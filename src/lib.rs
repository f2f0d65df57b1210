//! 菜单海报（料理ポスター）生成ツール
//!
//! 料理入力とスタイル・レイアウトからプロンプトを組み立て、
//! Midjourney用テキストの出力、またはGeminiでの画像生成・編集を行う。

pub mod app;
pub mod cli;
pub mod config;
pub mod credentials;
pub mod error;
pub mod export;
pub mod gemini;
pub mod generator;
pub mod input;
pub mod orchestrator;
pub mod store;
