//! レコード分割などの補助関数を提供するモジュール
//!
//! マッピングファイルの1行を区切り文字でフィールドに分割する処理を
//! `csv-core`を用いて実装しています。引用符処理は無効化しているため、
//! フィールド内に区切り文字を埋め込むことはできません。

use csv_core::{ReadFieldResult, ReaderBuilder, Terminator};

pub(crate) const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

/// 1行分のバイト列を区切り文字でフィールドに分割する
///
/// 引用符やエスケープは解釈しません。改行文字は呼び出し側で取り除かれている
/// ことを前提とし、`\r`も通常の文字として扱います。
/// フィールド長に上限はなく、長いフィールドも切り詰めずに返します。
/// 行頭のU+FEFFも通常の文字として最初のフィールドに残します。
///
/// # 引数
///
/// * `row` - 分割する行（改行を含まない）
/// * `delimiter` - ASCIIの区切り文字
///
/// # 戻り値
///
/// 分割されたフィールドのベクター。空の行に対しては空のベクターを返します。
///
/// # エラー
///
/// フィールドがUTF-8として不正な場合、[`std::str::Utf8Error`]を返します。
///
/// # 例
///
/// ```
/// # use glyphmap::utils::split_record;
/// let fields = split_record("kha:ख".as_bytes(), b':').unwrap();
/// assert_eq!(fields, vec!["kha", "ख"]);
///
/// let fields = split_record(b"a:b:c", b':').unwrap();
/// assert_eq!(fields, vec!["a", "b", "c"]);
/// ```
pub fn split_record(row: &[u8], delimiter: u8) -> Result<Vec<String>, std::str::Utf8Error> {
    let mut rdr = ReaderBuilder::new()
        .delimiter(delimiter)
        .quoting(false)
        .terminator(Terminator::Any(b'\n'))
        .build();

    // csv-core drops a BOM at the start of a new reader's input.
    let mut bytes = row;
    while let Some(rest) = bytes.strip_prefix(UTF8_BOM) {
        bytes = rest;
    }

    let mut fields = vec![];
    let mut field = row[..row.len() - bytes.len()].to_vec();
    let mut output = [0; 4096];
    loop {
        let (result, nin, nout) = rdr.read_field(bytes, &mut output);
        field.extend_from_slice(&output[..nout]);
        bytes = &bytes[nin..];
        match result {
            // An empty slice is treated as EOF on the next call.
            ReadFieldResult::InputEmpty | ReadFieldResult::OutputFull => {}
            ReadFieldResult::Field { record_end } => {
                fields.push(std::str::from_utf8(&field)?.to_string());
                field.clear();
                if record_end {
                    break;
                }
            }
            ReadFieldResult::End => {
                if !field.is_empty() {
                    fields.push(std::str::from_utf8(&field)?.to_string());
                }
                break;
            }
        }
    }
    Ok(fields)
}
