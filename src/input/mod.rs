//! 入力処理モジュール
//!
//! 打鍵の表現、変換テーブルの読み込み、キー→かな変換を提供

pub mod chord;
pub mod chord_table;
pub mod converter;

// 公開API
pub use chord::{Chord, ChordSequence, MAX_RECORDED_CHORDS};
pub use chord_table::ChordBindingSet;
pub use converter::{Emission, InputMode, KeyConversionEngine};
