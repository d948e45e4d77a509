//! 辞書パーサ
//!
//! タグ付き階層ストリームを前方一方向のカーソルで深さ優先に走査し、
//! `Entry` の列を構築する。各読み取り関数は自分の要素の終了タグ
//! までを消費する再帰下降構成。未知のタグは読み飛ばす。
//! ストリームの整形式エラーはパース全体を中断する（部分的な
//! ストアは公開されない）。

use crate::error::lexicon::Result;
use crate::error::LexiconError;
use crate::lexicon::entry::{
    Entry, KanjiVariant, Lexicon, LoanwordSource, ReadingVariant, Sense,
};
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use std::io::BufRead;
use std::path::Path;

// XMLタグ名
const TAG_ENTRY: &[u8] = b"entry";
const TAG_SEQUENCE_ID: &[u8] = b"ent_seq";
const TAG_KANJI_ELEMENT: &[u8] = b"k_ele";
const TAG_KANJI_TEXT: &[u8] = b"keb";
const TAG_KANJI_INFO: &[u8] = b"ke_inf";
const TAG_KANJI_PRIORITY: &[u8] = b"ke_pri";
const TAG_READING_ELEMENT: &[u8] = b"r_ele";
const TAG_READING_TEXT: &[u8] = b"reb";
const TAG_READING_NO_KANJI: &[u8] = b"re_nokanji";
const TAG_READING_RESTRICTION: &[u8] = b"re_restr";
const TAG_READING_INFO: &[u8] = b"re_inf";
const TAG_READING_PRIORITY: &[u8] = b"re_pri";
const TAG_SENSE: &[u8] = b"sense";
const TAG_PART_OF_SPEECH: &[u8] = b"pos";
const TAG_GLOSS: &[u8] = b"gloss";
const TAG_LOANWORD_SOURCE: &[u8] = b"lsource";
const TAG_FIELD: &[u8] = b"field";
const TAG_MISC: &[u8] = b"misc";
const TAG_DIALECT: &[u8] = b"dial";
const TAG_SENSE_INFO: &[u8] = b"s_inf";

// XMLタグ属性
const ATTR_SOURCE_LANGUAGE: &[u8] = b"ls_type";
const ATTR_WASEI: &[u8] = b"ls_wasei";

/// 言語コード属性の既定値
const DEFAULT_SOURCE_LANGUAGE: &str = "full";

/// ファイルから辞書を読み込む
pub fn load(path: impl AsRef<Path>) -> Result<Lexicon> {
    let path = path.as_ref();

    // 存在チェック
    if !path.exists() {
        return Err(LexiconError::NotFound {
            path: path.display().to_string(),
        });
    }

    let file = std::fs::File::open(path).map_err(|e| LexiconError::Unreadable {
        path: path.display().to_string(),
        message: e.to_string(),
    })?;

    parse(Reader::from_reader(std::io::BufReader::new(file)))
}

/// 文字列から辞書を読み込む
pub fn parse_str(text: &str) -> Result<Lexicon> {
    parse(Reader::from_reader(text.as_bytes()))
}

/// ストリーム全体を走査してエントリ列を構築する
fn parse<R: BufRead>(mut reader: Reader<R>) -> Result<Lexicon> {
    reader.config_mut().trim_text(true);

    let mut entries = Vec::new();
    let mut buf = Vec::new();
    loop {
        match read_event(&mut reader, &mut buf)? {
            Event::Start(e) if e.name().as_ref() == TAG_ENTRY => {
                entries.push(read_entry(&mut reader)?);
            }
            Event::Eof => break,
            _ => {}
        }
        buf.clear();
    }

    log::debug!("lexicon parsed: {} entries", entries.len());
    Ok(Lexicon::new(entries))
}

/// 1項目を終了タグまで読む
fn read_entry<R: BufRead>(reader: &mut Reader<R>) -> Result<Entry> {
    let mut entry = Entry::default();
    let mut buf = Vec::new();
    loop {
        match read_event(reader, &mut buf)? {
            Event::Start(e) => match e.name().as_ref() {
                TAG_SEQUENCE_ID => entry.sequence_id = read_text(reader, TAG_SEQUENCE_ID)?,
                TAG_KANJI_ELEMENT => entry.kanji_variants.push(read_kanji_element(reader)?),
                TAG_READING_ELEMENT => {
                    entry.reading_variants.push(read_reading_element(reader)?)
                }
                TAG_SENSE => entry.senses.push(read_sense(reader)?),
                _ => {}
            },
            Event::End(e) if e.name().as_ref() == TAG_ENTRY => break,
            Event::Eof => return Err(unexpected_eof(TAG_ENTRY)),
            _ => {}
        }
        buf.clear();
    }
    Ok(entry)
}

/// 漢字表記ブロックを読む
fn read_kanji_element<R: BufRead>(reader: &mut Reader<R>) -> Result<KanjiVariant> {
    let mut kanji = KanjiVariant::default();
    let mut buf = Vec::new();
    loop {
        match read_event(reader, &mut buf)? {
            Event::Start(e) => match e.name().as_ref() {
                TAG_KANJI_TEXT => kanji.text = read_text(reader, TAG_KANJI_TEXT)?,
                TAG_KANJI_INFO => kanji.info_tags.push(read_text(reader, TAG_KANJI_INFO)?),
                TAG_KANJI_PRIORITY => {
                    kanji.priority_tags.push(read_text(reader, TAG_KANJI_PRIORITY)?)
                }
                _ => {}
            },
            Event::End(e) if e.name().as_ref() == TAG_KANJI_ELEMENT => break,
            Event::Eof => return Err(unexpected_eof(TAG_KANJI_ELEMENT)),
            _ => {}
        }
        buf.clear();
    }
    Ok(kanji)
}

/// 読みブロックを読む
fn read_reading_element<R: BufRead>(reader: &mut Reader<R>) -> Result<ReadingVariant> {
    let mut reading = ReadingVariant::default();
    let mut buf = Vec::new();
    loop {
        match read_event(reader, &mut buf)? {
            Event::Start(e) => match e.name().as_ref() {
                TAG_READING_TEXT => reading.text = read_text(reader, TAG_READING_TEXT)?,
                TAG_READING_NO_KANJI => {
                    reading.no_kanji = Some(read_text(reader, TAG_READING_NO_KANJI)?)
                }
                TAG_READING_RESTRICTION => {
                    reading.restriction = Some(read_text(reader, TAG_READING_RESTRICTION)?)
                }
                TAG_READING_INFO => {
                    reading.info = Some(read_text(reader, TAG_READING_INFO)?)
                }
                TAG_READING_PRIORITY => reading
                    .priority_tags
                    .push(read_text(reader, TAG_READING_PRIORITY)?),
                _ => {}
            },
            // re_nokanjiは内容を持たない空要素として現れることがある
            Event::Empty(e) if e.name().as_ref() == TAG_READING_NO_KANJI => {
                reading.no_kanji = Some(String::new());
            }
            Event::End(e) if e.name().as_ref() == TAG_READING_ELEMENT => break,
            Event::Eof => return Err(unexpected_eof(TAG_READING_ELEMENT)),
            _ => {}
        }
        buf.clear();
    }
    Ok(reading)
}

/// 語義ブロックを読む
fn read_sense<R: BufRead>(reader: &mut Reader<R>) -> Result<Sense> {
    let mut sense = Sense::default();
    let mut buf = Vec::new();
    loop {
        match read_event(reader, &mut buf)? {
            Event::Start(e) => match e.name().as_ref() {
                TAG_PART_OF_SPEECH => sense
                    .parts_of_speech
                    .push(read_text(reader, TAG_PART_OF_SPEECH)?),
                TAG_GLOSS => sense.glosses.push(read_text(reader, TAG_GLOSS)?),
                TAG_LOANWORD_SOURCE => sense
                    .loanword_sources
                    .push(read_loanword_source(reader, &e)?),
                TAG_FIELD => sense
                    .fields_of_application
                    .push(read_text(reader, TAG_FIELD)?),
                TAG_MISC => sense.misc.push(read_text(reader, TAG_MISC)?),
                TAG_DIALECT => sense.dialect.push(read_text(reader, TAG_DIALECT)?),
                TAG_SENSE_INFO => sense.notes.push(read_text(reader, TAG_SENSE_INFO)?),
                _ => {}
            },
            Event::Empty(e) if e.name().as_ref() == TAG_LOANWORD_SOURCE => {
                sense
                    .loanword_sources
                    .push(empty_loanword_source(&e)?);
            }
            Event::End(e) if e.name().as_ref() == TAG_SENSE => break,
            Event::Eof => return Err(unexpected_eof(TAG_SENSE)),
            _ => {}
        }
        buf.clear();
    }
    Ok(sense)
}

/// 原語情報要素を読む
///
/// 言語コードは属性の有無にかかわらず、最後に本文テキストで
/// 上書きされる。
fn read_loanword_source<R: BufRead>(
    reader: &mut Reader<R>,
    start: &BytesStart<'_>,
) -> Result<LoanwordSource> {
    let mut source = loanword_source_from_attributes(start)?;
    source.source_language = read_text(reader, TAG_LOANWORD_SOURCE)?;
    Ok(source)
}

/// 内容のない原語情報要素を読む。本文テキストは空文字列扱い。
fn empty_loanword_source(start: &BytesStart<'_>) -> Result<LoanwordSource> {
    let mut source = loanword_source_from_attributes(start)?;
    source.source_language = String::new();
    Ok(source)
}

/// 原語情報の属性部分を解釈する
fn loanword_source_from_attributes(start: &BytesStart<'_>) -> Result<LoanwordSource> {
    let mut source = LoanwordSource {
        source_language: DEFAULT_SOURCE_LANGUAGE.to_string(),
        ..LoanwordSource::default()
    };

    for attribute in start.attributes() {
        let attribute = attribute.map_err(|e| LexiconError::MalformedInput {
            message: e.to_string(),
        })?;
        let value = attribute
            .unescape_value()
            .map_err(|e| LexiconError::MalformedInput {
                message: e.to_string(),
            })?;

        match attribute.key.as_ref() {
            ATTR_SOURCE_LANGUAGE => source.source_language = value.into_owned(),
            ATTR_WASEI => source.wasei = Some(value.into_owned()),
            _ => {}
        }
    }

    Ok(source)
}

/// 現在の要素の終了タグまでのテキスト内容を読む
fn read_text<R: BufRead>(reader: &mut Reader<R>, tag: &[u8]) -> Result<String> {
    let mut out = String::new();
    let mut buf = Vec::new();
    loop {
        match read_event(reader, &mut buf)? {
            Event::Text(t) => {
                let text = t.unescape().map_err(|e| LexiconError::MalformedInput {
                    message: e.to_string(),
                })?;
                out.push_str(&text);
            }
            Event::End(e) if e.name().as_ref() == tag => break,
            Event::Eof => return Err(unexpected_eof(tag)),
            _ => {}
        }
        buf.clear();
    }
    Ok(out)
}

fn read_event<'b, R: BufRead>(
    reader: &mut Reader<R>,
    buf: &'b mut Vec<u8>,
) -> Result<Event<'b>> {
    reader
        .read_event_into(buf)
        .map_err(|e| LexiconError::MalformedInput {
            message: e.to_string(),
        })
}

fn unexpected_eof(tag: &[u8]) -> LexiconError {
    LexiconError::MalformedInput {
        message: format!(
            "unexpected end of stream inside <{}>",
            String::from_utf8_lossy(tag)
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SINGLE_ENTRY: &str = r#"
        <JMdict>
          <entry>
            <ent_seq>1171270</ent_seq>
            <k_ele>
              <keb>右目</keb>
              <ke_inf>word containing irregular kanji usage</ke_inf>
              <ke_pri>news2</ke_pri>
              <ke_pri>nf30</ke_pri>
            </k_ele>
            <r_ele>
              <reb>みぎめ</reb>
              <re_restr>右目</re_restr>
              <re_inf>gikun reading</re_inf>
              <re_pri>news2</re_pri>
            </r_ele>
            <sense>
              <pos>noun (common)</pos>
              <field>anatomy</field>
              <misc>colloquialism</misc>
              <dial>Kansai-ben</dial>
              <s_inf>usu. in compounds</s_inf>
              <gloss>right eye</gloss>
              <gloss>the right eye</gloss>
            </sense>
          </entry>
        </JMdict>
    "#;

    #[test]
    fn test_parse_single_entry_field_for_field() {
        let lexicon = parse_str(SINGLE_ENTRY).unwrap();
        assert_eq!(lexicon.len(), 1);

        let entry = &lexicon.entries()[0];
        assert_eq!(entry.sequence_id, "1171270");

        assert_eq!(entry.kanji_variants.len(), 1);
        let kanji = &entry.kanji_variants[0];
        assert_eq!(kanji.text, "右目");
        assert_eq!(kanji.info_tags, ["word containing irregular kanji usage"]);
        assert_eq!(kanji.priority_tags, ["news2", "nf30"]);

        assert_eq!(entry.reading_variants.len(), 1);
        let reading = &entry.reading_variants[0];
        assert_eq!(reading.text, "みぎめ");
        assert_eq!(reading.restriction.as_deref(), Some("右目"));
        assert_eq!(reading.info.as_deref(), Some("gikun reading"));
        assert_eq!(reading.no_kanji, None);
        assert_eq!(reading.priority_tags, ["news2"]);

        assert_eq!(entry.senses.len(), 1);
        let sense = &entry.senses[0];
        assert_eq!(sense.parts_of_speech, ["noun (common)"]);
        assert_eq!(sense.glosses, ["right eye", "the right eye"]);
        assert_eq!(sense.fields_of_application, ["anatomy"]);
        assert_eq!(sense.misc, ["colloquialism"]);
        assert_eq!(sense.dialect, ["Kansai-ben"]);
        assert_eq!(sense.notes, ["usu. in compounds"]);
    }

    #[test]
    fn test_parse_multiple_entries() {
        let text = r#"
            <JMdict>
              <entry><ent_seq>1</ent_seq></entry>
              <entry><ent_seq>2</ent_seq></entry>
              <entry><ent_seq>3</ent_seq></entry>
            </JMdict>
        "#;
        let lexicon = parse_str(text).unwrap();
        let ids: Vec<&str> = lexicon
            .entries()
            .iter()
            .map(|e| e.sequence_id.as_str())
            .collect();
        assert_eq!(ids, ["1", "2", "3"]);
    }

    #[test]
    fn test_loanword_source_text_overwrites_attribute() {
        // ls_type属性の値は本文テキストで常に上書きされる
        let text = r#"
            <JMdict>
              <entry>
                <ent_seq>1</ent_seq>
                <sense>
                  <lsource ls_type="part" ls_wasei="y">chanson</lsource>
                </sense>
              </entry>
            </JMdict>
        "#;
        let lexicon = parse_str(text).unwrap();
        let source = &lexicon.entries()[0].senses[0].loanword_sources[0];
        assert_eq!(source.source_language, "chanson");
        assert_eq!(source.wasei.as_deref(), Some("y"));
        assert_eq!(source.description, "");
    }

    #[test]
    fn test_loanword_source_without_attributes() {
        let text = r#"
            <JMdict>
              <entry>
                <ent_seq>1</ent_seq>
                <sense><lsource>pan</lsource></sense>
              </entry>
            </JMdict>
        "#;
        let lexicon = parse_str(text).unwrap();
        let source = &lexicon.entries()[0].senses[0].loanword_sources[0];
        assert_eq!(source.source_language, "pan");
        assert_eq!(source.wasei, None);
    }

    #[test]
    fn test_empty_reading_no_kanji_element() {
        let text = r#"
            <JMdict>
              <entry>
                <ent_seq>1</ent_seq>
                <r_ele>
                  <reb>イギリス</reb>
                  <re_nokanji/>
                </r_ele>
              </entry>
            </JMdict>
        "#;
        let lexicon = parse_str(text).unwrap();
        let reading = &lexicon.entries()[0].reading_variants[0];
        assert_eq!(reading.text, "イギリス");
        assert_eq!(reading.no_kanji.as_deref(), Some(""));
    }

    #[test]
    fn test_unknown_tags_are_skipped() {
        let text = r#"
            <JMdict>
              <entry>
                <ent_seq>1</ent_seq>
                <audit><upd_date>2020-01-01</upd_date></audit>
                <k_ele>
                  <keb>田</keb>
                  <ke_unknown>x</ke_unknown>
                </k_ele>
              </entry>
            </JMdict>
        "#;
        let lexicon = parse_str(text).unwrap();
        let entry = &lexicon.entries()[0];
        assert_eq!(entry.sequence_id, "1");
        assert_eq!(entry.kanji_variants.len(), 1);
        assert_eq!(entry.kanji_variants[0].text, "田");
    }

    #[test]
    fn test_unclosed_entry_is_malformed() {
        let result = parse_str("<JMdict><entry><ent_seq>1</ent_seq>");
        assert!(matches!(
            result,
            Err(LexiconError::MalformedInput { .. })
        ));
    }

    #[test]
    fn test_mismatched_end_tag_is_malformed() {
        let result = parse_str("<JMdict><entry></wrong></JMdict>");
        assert!(matches!(
            result,
            Err(LexiconError::MalformedInput { .. })
        ));
    }

    #[test]
    fn test_load_missing_file_is_not_found() {
        let result = load("/nonexistent/JMdict_e");
        assert!(matches!(result, Err(LexiconError::NotFound { .. })));
    }
}
