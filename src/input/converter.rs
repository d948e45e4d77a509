//! キー変換エンジン
//!
//! ホストから打鍵を1つずつ受け取り、検証・記録して変換テーブルと
//! 照合し、挿入可能なテキストを生成する状態機械。記録中の打鍵列は
//! 時間経過では消えず、一致・取り消し・モード切替・明示クリアで
//! のみリセットされる。

use crate::input::chord::{Chord, ChordSequence};
use crate::input::chord_table::ChordBindingSet;

/// 変換エンジンの入力モード
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InputMode {
    /// 打鍵の文字をそのまま出力する
    #[default]
    Passthrough,
    /// 打鍵列を変換テーブルと照合してかなを出力する
    Transliterate,
}

/// 打鍵を記録した結果
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Emission {
    /// 変換結果のテキストが確定した
    Produced(String),
    /// 打鍵列は有効だがまだ一致していない
    Pending,
    /// 受理できない打鍵。状態は変化せず、ホスト側の既定処理に任せる
    Rejected,
}

/// Transliterateモードで受理する文字キー
///
/// シフトの有無を問わず受理する22キー。変換テーブルの内容とは
/// 独立したエンジン定数。
const ACCEPTED_KEYS: [char; 22] = [
    'b', 'c', 'd', 'f', 'g', 'h', 'j', 'k', 'm', 'n', 'r', 'p', 's', 't', 'w', 'z', 'a', 'i',
    'e', 'u', 'o', 'y',
];

/// 句点キー。シフトなしのみ受理する。
const PERIOD_KEY: char = '.';

/// キー→かな変換エンジン
///
/// 可変状態（モードと記録中の打鍵列）は1つの入力セッションが
/// 排他的に所有する。
#[derive(Debug, Clone, Default)]
pub struct KeyConversionEngine {
    bindings: ChordBindingSet,
    mode: InputMode,
    recorded: ChordSequence,
}

impl KeyConversionEngine {
    pub fn new(bindings: ChordBindingSet) -> Self {
        Self {
            bindings,
            mode: InputMode::default(),
            recorded: ChordSequence::new(),
        }
    }

    /// モードを設定する。記録中の打鍵列は破棄される。
    pub fn set_mode(&mut self, mode: InputMode) {
        self.mode = mode;
        self.clear();
    }

    pub fn mode(&self) -> InputMode {
        self.mode
    }

    /// 打鍵が受理可能かどうか
    pub fn is_accepted_chord(&self, chord: Chord) -> bool {
        match self.mode {
            InputMode::Passthrough => true,
            InputMode::Transliterate => {
                ACCEPTED_KEYS.contains(&chord.key) || (chord.key == PERIOD_KEY && !chord.shift)
            }
        }
    }

    /// 打鍵を記録し、記録中の打鍵列全体を変換テーブルと照合する
    ///
    /// 一致したら打鍵列をクリアして出力テキストを返す。一致しない
    /// 間は `Pending` で続きの打鍵を待つ。
    pub fn record_chord(&mut self, chord: Chord) -> Emission {
        match self.mode {
            InputMode::Passthrough => Emission::Produced(chord.literal_char().to_string()),
            InputMode::Transliterate => {
                if !self.is_accepted_chord(chord) {
                    return Emission::Rejected;
                }

                self.recorded.push(chord);
                match self.bindings.find(self.recorded.chords()) {
                    Some(output) => {
                        let output = output.to_string();
                        self.recorded.clear();
                        Emission::Produced(output)
                    }
                    None => Emission::Pending,
                }
            }
        }
    }

    /// 最後に記録した打鍵を取り消す
    ///
    /// 記録が空のときはfalseを返し、呼び出し側は通常の削除処理へ
    /// フォールバックする。
    pub fn undo_last(&mut self) -> bool {
        self.recorded.pop_last()
    }

    /// 記録中の打鍵列を無条件に破棄する
    pub fn clear(&mut self) {
        self.recorded.clear();
    }

    /// 記録中の打鍵列の表示用ラベル。空のときは空文字列。
    pub fn current_sequence_label(&self) -> String {
        self.recorded.label()
    }
}
