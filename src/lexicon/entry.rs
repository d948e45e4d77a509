//! 辞書エンティティモデル
//!
//! パーサが構築する辞書項目の型と、項目全体を所有するストアを定義。
//! 項目は構築後すべて不変で、利用側は借用参照のみを受け取る。

use std::cmp::Reverse;

/// 漢字表記のバリアント
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct KanjiVariant {
    /// 日本語の単語または短い句
    pub text: String,
    /// 表記に関する情報タグ
    pub info_tags: Vec<String>,
    /// 相対的な優先度タグ
    ///
    /// `news1/2`、`ichi1/2`、`spec1/2`、`gai1/2`、`nfNN` の形式。
    /// 内容は解釈せず、件数のみが検索順位に影響する。
    pub priority_tags: Vec<String>,
}

/// 読みのバリアント
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReadingVariant {
    /// かなで書かれた単語または句
    pub text: String,
    /// 漢字の真の読みとはみなせないことを示すフラグ
    pub no_kanji: Option<String>,
    /// 読みが適用される表記の制限
    pub restriction: Option<String>,
    /// この読みに関する情報
    pub info: Option<String>,
    /// 相対的な優先度タグ
    pub priority_tags: Vec<String>,
}

/// 外来語の原語情報
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoanwordSource {
    /// 原語の言語コード。省略時は "full"。
    pub source_language: String,
    /// 原語の単語・句の説明
    pub description: String,
    /// 和製語であることを示すフラグ
    pub wasei: Option<String>,
}

/// 語義（訳語と関連情報）
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Sense {
    /// 品詞
    pub parts_of_speech: Vec<String>,
    /// 訳語
    pub glosses: Vec<String>,
    /// 外来語の原語情報
    pub loanword_sources: Vec<LoanwordSource>,
    /// 応用分野
    pub fields_of_application: Vec<String>,
    /// その他の情報
    pub misc: Vec<String>,
    /// 方言
    pub dialect: Vec<String>,
    /// 語義に関する補足
    pub notes: Vec<String>,
}

/// 辞書の1項目
///
/// パーサが1つのタグブロックから丸ごと構築し、以後は不変。
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Entry {
    /// 項目の一意な識別子
    pub sequence_id: String,
    /// 漢字表記（収録順 = 表示優先順。空のこともある）
    pub kanji_variants: Vec<KanjiVariant>,
    /// 読み（実データでは常に1つ以上）
    pub reading_variants: Vec<ReadingVariant>,
    /// 語義
    pub senses: Vec<Sense>,
}

impl Entry {
    /// 検索結果で後方に並べるべき項目かどうか
    ///
    /// 漢字表記のない項目は後方へ。読みが1つもない項目は契約違反
    /// だが、落とさずに同じく後方扱いとする。
    fn sorts_to_back(&self) -> bool {
        self.kanji_variants.is_empty() || self.reading_variants.is_empty()
    }

    /// 先頭の読みに付いた優先度タグの件数
    fn first_reading_priority_count(&self) -> usize {
        self.reading_variants
            .first()
            .map(|reading| reading.priority_tags.len())
            .unwrap_or(0)
    }
}

/// 読み込み済み辞書のストア
///
/// 全項目を値で所有するアリーナ。構築後は読み取り専用で、
/// 検索は借用参照の列を返す。
#[derive(Debug, Clone, Default)]
pub struct Lexicon {
    entries: Vec<Entry>,
}

impl Lexicon {
    pub fn new(entries: Vec<Entry>) -> Self {
        Self { entries }
    }

    /// 全項目への参照
    pub fn entries(&self) -> &[Entry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// 読みの完全一致で項目を検索する
    ///
    /// いずれかの読みが `text` と完全一致する項目を返す。正規化や
    /// 部分一致は行わない。並び順は安定ソートで、漢字表記を持つ
    /// 項目が先、同条件では先頭読みの優先度タグが多い項目が先。
    /// 一致なしは空の列（エラーにはならない）。
    pub fn search_by_reading(&self, text: &str) -> Vec<&Entry> {
        let mut matches: Vec<&Entry> = self
            .entries
            .iter()
            .filter(|entry| {
                entry
                    .reading_variants
                    .iter()
                    .any(|reading| reading.text == text)
            })
            .collect();

        matches.sort_by_key(|entry| {
            (
                entry.sorts_to_back(),
                Reverse(entry.first_reading_priority_count()),
            )
        });

        matches
    }
}
