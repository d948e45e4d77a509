//! 打鍵の内部表現
//!
//! 1回の物理キー押下（キー＋シフト修飾）と、変換待ちの打鍵列を定義

use crossterm::event::{KeyCode as CrosstermKeyCode, KeyEvent, KeyModifiers as CrosstermModifiers};

/// 記録できる打鍵数の上限
pub const MAX_RECORDED_CHORDS: usize = 4;

/// 1回の物理キー押下
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Chord {
    /// 基本キー（ASCII英字は小文字に正規化）
    pub key: char,
    /// シフト修飾
    pub shift: bool,
}

impl Chord {
    /// 修飾なしの打鍵を作成
    pub fn plain(key: char) -> Self {
        Self {
            key: key.to_ascii_lowercase(),
            shift: false,
        }
    }

    /// シフト付きの打鍵を作成
    pub fn shifted(key: char) -> Self {
        Self {
            key: key.to_ascii_lowercase(),
            shift: true,
        }
    }

    /// crosstermのキーイベントから変換
    ///
    /// 文字キー以外はホスト側の既定処理に任せるため `None` を返す
    pub fn from_key_event(event: &KeyEvent) -> Option<Self> {
        match event.code {
            CrosstermKeyCode::Char(c) => Some(Self {
                key: c.to_ascii_lowercase(),
                shift: event.modifiers.contains(CrosstermModifiers::SHIFT)
                    || c.is_ascii_uppercase(),
            }),
            _ => None,
        }
    }

    /// 打鍵の文字どおりの文字（Passthroughモードで挿入される）
    pub fn literal_char(&self) -> char {
        if self.shift {
            self.key.to_ascii_uppercase()
        } else {
            self.key
        }
    }

    /// 状態表示用のラベル
    pub fn label(&self) -> String {
        let key = self.key.to_ascii_uppercase();
        if self.shift {
            format!("Shift+{}", key)
        } else {
            key.to_string()
        }
    }
}

/// 変換待ちの打鍵列
///
/// 最大 `MAX_RECORDED_CHORDS` 打鍵のスライディングウィンドウ。
/// あふれた場合は最も古い打鍵から捨てる。
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChordSequence {
    chords: Vec<Chord>,
}

impl ChordSequence {
    pub fn new() -> Self {
        Self::default()
    }

    /// 打鍵を追加する。上限を超えたら先頭（最古）を捨てる。
    pub fn push(&mut self, chord: Chord) {
        self.chords.push(chord);
        if self.chords.len() > MAX_RECORDED_CHORDS {
            self.chords.remove(0);
        }
    }

    /// 最後の打鍵を取り消す。空のときは何もせずfalseを返す。
    pub fn pop_last(&mut self) -> bool {
        self.chords.pop().is_some()
    }

    pub fn clear(&mut self) {
        self.chords.clear();
    }

    pub fn len(&self) -> usize {
        self.chords.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chords.is_empty()
    }

    pub fn chords(&self) -> &[Chord] {
        &self.chords
    }

    /// 状態表示用のラベル。空のときは空文字列。
    pub fn label(&self) -> String {
        self.chords
            .iter()
            .map(Chord::label)
            .collect::<Vec<_>>()
            .join(", ")
    }
}
