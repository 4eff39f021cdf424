//! i18n-sync
//!
//! JSON の i18n リソースを機械翻訳で差分同期するツール。
//! 翻訳結果はキャッシュ DB に保存し、ソース文言が変わったキーだけを再翻訳する。

pub mod config;
pub mod db;
pub mod error;
pub mod locale;
pub mod pipeline;
pub mod provider;
pub mod sheet;
pub mod sync;
pub mod types;

pub use error::SyncError;
pub use pipeline::{
    Project,
    RunSummary,
};
