//! エラーハンドリングシステム
//!
//! jpad 全体で使用される統一されたエラー型を定義。
//! 辞書のパースエラーは全体を中断し、変換テーブルの読み込み
//! エラーは回復可能（空のテーブルで動作を続行できる）。

use thiserror::Error;

/// アプリケーション全体のエラー型
#[derive(Error, Debug, Clone)]
pub enum JpadError {
    /// 辞書操作エラー
    #[error("Lexicon operation failed")]
    Lexicon(#[from] LexiconError),

    /// 変換テーブル操作エラー
    #[error("Chord table operation failed")]
    ChordTable(#[from] ChordTableError),
}

/// 辞書読み込み固有のエラー
#[derive(Error, Debug, Clone)]
pub enum LexiconError {
    #[error("Lexicon file not found: {path}")]
    NotFound { path: String },

    #[error("Lexicon file could not be opened: {path}: {message}")]
    Unreadable { path: String, message: String },

    #[error("Malformed lexicon stream: {message}")]
    MalformedInput { message: String },
}

/// 変換テーブル固有のエラー
///
/// 致命的ではない。呼び出し側は空のバインディング集合に
/// フォールバックしてよい。
#[derive(Error, Debug, Clone)]
pub enum ChordTableError {
    #[error("Chord table unavailable: {path}: {message}")]
    Unavailable { path: String, message: String },
}

/// プロジェクト標準のResult型
pub type Result<T> = std::result::Result<T, JpadError>;

/// 各モジュール固有のResult型
pub mod lexicon {
    pub type Result<T> = std::result::Result<T, super::LexiconError>;
}

pub mod chord {
    pub type Result<T> = std::result::Result<T, super::ChordTableError>;
}
