//! 博物館資料の目録テキスト一括生成
//!
//! スプレッドシートのメタデータと資料写真を組み合わせ、マルチモーダル生成APIで
//! 独英二言語の説明文とキャプションを作り、結果をExcelに書き出す。

pub mod batch;
pub mod cli;
pub mod config;
pub mod error;
pub mod export;
pub mod generator;
pub mod pacing;
pub mod scanner;
pub mod sheet;
