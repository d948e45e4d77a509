//! 変換テーブルの読み込み
//!
//! 打鍵列→出力テキストの静的対応表を2つの行指向テーブル
//! （シフトなし＝ひらがな、シフトあり＝カタカナ）から構築する。
//! 行形式は `<キー文字列> <16進コードポイント,...>`。

use crate::error::chord::Result;
use crate::error::ChordTableError;
use crate::input::chord::Chord;
use std::collections::HashMap;
use std::path::Path;

/// コメント行の開始文字
const COMMENT_MARKER: char = ';';

// 同梱テーブル
const BUNDLED_HIRAGANA: &str = include_str!("../../resources/hiragana_keys.txt");
const BUNDLED_KATAKANA: &str = include_str!("../../resources/katakana_keys.txt");

/// 打鍵列→出力テキストの対応表
///
/// 起動時に一度構築され、以後は読み取り専用。
#[derive(Debug, Clone, Default)]
pub struct ChordBindingSet {
    bindings: HashMap<Vec<Chord>, String>,
}

impl ChordBindingSet {
    /// 2つのテーブルテキストから対応表を構築する
    ///
    /// シフト側テーブル由来の打鍵はすべてシフト修飾付きになる
    pub fn from_tables(unshifted: &str, shifted: &str) -> Self {
        let mut set = Self::default();
        set.insert_table(unshifted, false);
        set.insert_table(shifted, true);
        set
    }

    /// 打鍵列に完全一致する出力テキストを探す
    pub fn find(&self, chords: &[Chord]) -> Option<&str> {
        self.bindings.get(chords).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }

    fn insert_table(&mut self, text: &str, shift: bool) {
        for (chords, output) in parse_table(text, shift) {
            self.bindings.insert(chords, output);
        }
    }
}

/// 2つのテーブルファイルから対応表を構築する
///
/// どちらかが読めない場合は `Unavailable`。呼び出し側は空の
/// 対応表にフォールバックして動作を続行してよい。
pub fn load(unshifted: impl AsRef<Path>, shifted: impl AsRef<Path>) -> Result<ChordBindingSet> {
    let unshifted_text = read_table_file(unshifted.as_ref())?;
    let shifted_text = read_table_file(shifted.as_ref())?;

    let set = ChordBindingSet::from_tables(&unshifted_text, &shifted_text);
    log::debug!("chord tables loaded: {} bindings", set.len());
    Ok(set)
}

/// 同梱のひらがな・カタカナテーブルから対応表を構築する
pub fn load_bundled() -> ChordBindingSet {
    ChordBindingSet::from_tables(BUNDLED_HIRAGANA, BUNDLED_KATAKANA)
}

fn read_table_file(path: &Path) -> Result<String> {
    std::fs::read_to_string(path).map_err(|e| ChordTableError::Unavailable {
        path: path.display().to_string(),
        message: e.to_string(),
    })
}

/// 1テーブル分のテキストを解析する
///
/// 空行と`;`開始行は読み飛ばす。フィールド数が2以外の行は
/// 無効として捨てる。16進として解釈できないコードポイントは
/// 個別に捨てる。キー文字列の1文字が1打鍵になる。
fn parse_table(text: &str, shift: bool) -> Vec<(Vec<Chord>, String)> {
    let mut bindings = Vec::new();
    for line in text.lines() {
        let line = line.trim();
        if line.is_empty() || line.starts_with(COMMENT_MARKER) {
            continue;
        }

        let fields: Vec<&str> = line.split_whitespace().collect();
        if fields.len() != 2 {
            log::warn!("chord table line skipped (expected 2 fields): {:?}", line);
            continue;
        }

        let chords: Vec<Chord> = fields[0]
            .chars()
            .map(|c| {
                if shift {
                    Chord::shifted(c)
                } else {
                    Chord::plain(c)
                }
            })
            .collect();

        let output: String = fields[1]
            .split(',')
            .filter_map(|part| {
                let code = u32::from_str_radix(part.trim(), 16).ok()?;
                char::from_u32(code)
            })
            .collect();

        bindings.push((chords, output));
    }
    bindings
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_single_binding() {
        let set = ChordBindingSet::from_tables("ka 304B\n", "");
        assert_eq!(set.len(), 1);
        assert_eq!(
            set.find(&[Chord::plain('k'), Chord::plain('a')]),
            Some("か")
        );
    }

    #[test]
    fn test_multi_codepoint_output() {
        let set = ChordBindingSet::from_tables("kya 304D,3083\n", "");
        assert_eq!(
            set.find(&[Chord::plain('k'), Chord::plain('y'), Chord::plain('a')]),
            Some("きゃ")
        );
    }

    #[test]
    fn test_comments_and_blank_lines_skipped() {
        let text = "; comment\n\n   \nka 304B\n";
        let set = ChordBindingSet::from_tables(text, "");
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn test_wrong_field_count_skipped() {
        let text = "ka 304B extra\nonlyonefield\nki 304D\n";
        let set = ChordBindingSet::from_tables(text, "");
        assert_eq!(set.len(), 1);
        assert_eq!(set.find(&[Chord::plain('k'), Chord::plain('i')]), Some("き"));
    }

    #[test]
    fn test_invalid_hex_parts_dropped() {
        let set = ChordBindingSet::from_tables("ka zz,304B\n", "");
        assert_eq!(
            set.find(&[Chord::plain('k'), Chord::plain('a')]),
            Some("か")
        );
    }

    #[test]
    fn test_shifted_table_tags_chords() {
        let set = ChordBindingSet::from_tables("", "ka 30AB\n");
        assert_eq!(
            set.find(&[Chord::shifted('k'), Chord::shifted('a')]),
            Some("カ")
        );
        assert_eq!(set.find(&[Chord::plain('k'), Chord::plain('a')]), None);
    }

    #[test]
    fn test_load_missing_file_is_unavailable() {
        let result = load("/nonexistent/hiragana.txt", "/nonexistent/katakana.txt");
        assert!(matches!(result, Err(ChordTableError::Unavailable { .. })));
    }

    #[test]
    fn test_bundled_tables() {
        let set = load_bundled();
        assert!(!set.is_empty());

        assert_eq!(
            set.find(&[Chord::plain('k'), Chord::plain('a')]),
            Some("か")
        );
        assert_eq!(
            set.find(&[Chord::shifted('k'), Chord::shifted('a')]),
            Some("カ")
        );
        assert_eq!(set.find(&[Chord::plain('.')]), Some("。"));
        // んは n 単独ではなく nn（n 単独だとな行が打てなくなる）
        assert_eq!(set.find(&[Chord::plain('n')]), None);
        assert_eq!(
            set.find(&[Chord::plain('n'), Chord::plain('n')]),
            Some("ん")
        );
    }
}
