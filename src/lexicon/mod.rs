//! 辞書モジュール
//!
//! JMdict形式辞書の読み込みと読みによる検索を提供

pub mod entry;
pub mod parser;

// 公開API
pub use entry::{Entry, KanjiVariant, Lexicon, LoanwordSource, ReadingVariant, Sense};
pub use parser::{load, parse_str};
