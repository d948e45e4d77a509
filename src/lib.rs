//! jpad - Japanese text entry engines
//!
//! テキストエディタ向けの日本語入力サブシステム。
//! JMdict形式辞書の読み込み・検索と打鍵列→かな変換の2つの
//! エンジンを提供する。

// コアモジュール
pub mod error;

// 辞書層
pub mod lexicon;

// 入力層
pub mod input;

// 公開API
pub use error::{ChordTableError, JpadError, LexiconError, Result};
pub use input::{Chord, ChordBindingSet, ChordSequence, Emission, InputMode, KeyConversionEngine};
pub use lexicon::{Entry, KanjiVariant, Lexicon, LoanwordSource, ReadingVariant, Sense};
