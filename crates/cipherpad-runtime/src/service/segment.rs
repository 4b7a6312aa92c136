#![forbid(unsafe_code)]

//! Segmenting reference service.
//!
//! Encryption walks the plaintext once. Every character the [`CodeBook`]
//! knows becomes its own four-letter code part; every maximal run of other
//! characters becomes one literal part:
//!
//! ```text
//! "你好, world"  ──►  ["abcd", "efgh", ", world"]
//! ```
//!
//! Decryption first splits free-form cipher text with [`split_cipher`], then
//! decodes each four-letter lowercase part through the code book. Anything
//! the book does not know is passed through verbatim, unless the service was
//! built with [`SegmentingService::strict`].

use cipherpad_text::{CipherFormat, render};

use super::{CipherService, Encrypted, TransformError};

/// Length of a code part.
pub const CODE_LEN: usize = 4;

/// Bidirectional substitution table.
pub trait CodeBook {
    /// Code for `c`, or `None` if `c` is kept literally.
    fn encode(&self, c: char) -> Option<String>;

    /// Character for a four-letter lowercase `code`.
    fn decode(&self, code: &str) -> Option<char>;

    /// Convert text to its traditional variant. Identity by default.
    fn to_traditional(&self, text: &str) -> String {
        text.to_owned()
    }
}

/// Whether `part` has the shape of a code: four ASCII lowercase letters.
#[must_use]
pub fn is_code(part: &str) -> bool {
    part.len() == CODE_LEN && part.bytes().all(|b| b.is_ascii_lowercase())
}

/// CJK unified ideographs, extension A, and compatibility ideographs.
#[must_use]
pub fn is_cjk(c: char) -> bool {
    matches!(
        c,
        '\u{4E00}'..='\u{9FFF}' | '\u{3400}'..='\u{4DBF}' | '\u{F900}'..='\u{FAFF}'
    )
}

/// Split free-form cipher text into candidate parts.
///
/// The input is cut into alternating runs of ASCII letters and everything
/// else. A letter run whose length is a multiple of four is split into
/// lowercased four-letter chunks, which covers `space`, `4-letter`,
/// `first-upper`, `pascal` and `camel` output alike. Other runs are kept
/// as they are.
///
/// Only whitespace-only runs between two codes lose their separator
/// spaces on decrypt. In `space` format a literal next to a code keeps
/// them, so `你,好` renders as `abcd , efgh` and decrypts to `你 , 好`.
#[must_use]
pub fn split_cipher(input: &str) -> Vec<String> {
    let mut parts = Vec::new();
    let mut rest = input;
    while let Some(first) = rest.chars().next() {
        let alpha = first.is_ascii_alphabetic();
        let end = rest
            .char_indices()
            .find(|&(_, c)| c.is_ascii_alphabetic() != alpha)
            .map_or(rest.len(), |(i, _)| i);
        let (run, tail) = rest.split_at(end);
        if alpha && run.len() % CODE_LEN == 0 {
            // ASCII only, so byte chunks are char chunks.
            parts.extend(
                run.as_bytes()
                    .chunks(CODE_LEN)
                    .map(|chunk| String::from_utf8_lossy(chunk).to_ascii_lowercase()),
            );
        } else {
            parts.push(run.to_owned());
        }
        rest = tail;
    }
    parts
}

/// In-memory code book built from explicit pairs.
#[derive(Debug, Clone, Default)]
pub struct MapCodeBook {
    forward: std::collections::HashMap<char, String>,
    backward: std::collections::HashMap<String, char>,
    traditional: std::collections::HashMap<char, char>,
}

impl MapCodeBook {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Map `c` to `code` in both directions.
    #[must_use]
    pub fn with(mut self, c: char, code: impl Into<String>) -> Self {
        self.insert(c, code);
        self
    }

    /// Register `traditional` as the variant of `simplified`.
    #[must_use]
    pub fn with_variant(mut self, simplified: char, traditional: char) -> Self {
        self.traditional.insert(simplified, traditional);
        self
    }

    pub fn insert(&mut self, c: char, code: impl Into<String>) {
        let code = code.into();
        self.backward.insert(code.clone(), c);
        self.forward.insert(c, code);
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.forward.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.forward.is_empty()
    }
}

impl<S: Into<String>> FromIterator<(char, S)> for MapCodeBook {
    fn from_iter<I: IntoIterator<Item = (char, S)>>(iter: I) -> Self {
        let mut book = Self::new();
        for (c, code) in iter {
            book.insert(c, code);
        }
        book
    }
}

impl CodeBook for MapCodeBook {
    fn encode(&self, c: char) -> Option<String> {
        self.forward.get(&c).cloned()
    }

    fn decode(&self, code: &str) -> Option<char> {
        self.backward.get(code).copied()
    }

    fn to_traditional(&self, text: &str) -> String {
        text.chars()
            .map(|c| self.traditional.get(&c).copied().unwrap_or(c))
            .collect()
    }
}

/// Restricts a code book to CJK ideographs; everything else stays literal.
#[derive(Debug, Clone, Default)]
pub struct CjkCodeBook<B>(pub B);

impl<B: CodeBook> CodeBook for CjkCodeBook<B> {
    fn encode(&self, c: char) -> Option<String> {
        if is_cjk(c) { self.0.encode(c) } else { None }
    }

    fn decode(&self, code: &str) -> Option<char> {
        self.0.decode(code).filter(|&c| is_cjk(c))
    }

    fn to_traditional(&self, text: &str) -> String {
        self.0.to_traditional(text)
    }
}

/// [`CipherService`] that segments text around a [`CodeBook`].
#[derive(Debug, Clone)]
pub struct SegmentingService<B> {
    book: B,
    strict: bool,
}

enum Piece {
    Decoded(char),
    Literal(String),
}

impl<B: CodeBook> SegmentingService<B> {
    /// Lenient service: unknown codes decrypt to themselves.
    #[must_use]
    pub fn new(book: B) -> Self {
        Self { book, strict: false }
    }

    /// Strict service: a code-shaped part the book cannot decode is an error.
    #[must_use]
    pub fn strict(book: B) -> Self {
        Self { book, strict: true }
    }

    /// Cut `text` into code parts and literal runs.
    ///
    /// # Errors
    ///
    /// [`TransformError`] if the code book returns a code that is not four
    /// ASCII lowercase letters.
    pub fn segment(&self, text: &str) -> Result<Vec<String>, TransformError> {
        let mut parts = Vec::new();
        let mut literal = String::new();
        for c in text.chars() {
            let Some(code) = self.book.encode(c) else {
                literal.push(c);
                continue;
            };
            if !is_code(&code) {
                return Err(TransformError::new(format!(
                    "malformed code {code:?} for {c:?}"
                )));
            }
            if !literal.is_empty() {
                parts.push(std::mem::take(&mut literal));
            }
            parts.push(code);
        }
        if !literal.is_empty() {
            parts.push(literal);
        }
        Ok(parts)
    }

    fn decode_part(&self, part: String) -> Result<Piece, TransformError> {
        if !is_code(&part) {
            return Ok(Piece::Literal(part));
        }
        match self.book.decode(&part) {
            Some(c) => Ok(Piece::Decoded(c)),
            None if self.strict => Err(TransformError::new(format!("unknown code {part:?}"))),
            None => Ok(Piece::Literal(part)),
        }
    }
}

impl<B: CodeBook> CipherService for SegmentingService<B> {
    fn encrypt(
        &self,
        plain: &str,
        use_traditional: bool,
        format: CipherFormat,
    ) -> Result<Encrypted, TransformError> {
        let normalized_plain = if use_traditional {
            self.book.to_traditional(plain)
        } else {
            plain.to_owned()
        };
        let parts = self.segment(&normalized_plain)?;
        let cipher = render(&parts, format);
        tracing::trace!(
            target: "cipherpad.service",
            parts = parts.len(),
            format = %format,
            "encrypted"
        );
        Ok(Encrypted {
            cipher,
            parts,
            normalized_plain,
        })
    }

    fn decrypt(&self, cipher: &str) -> Result<String, TransformError> {
        let pieces = split_cipher(cipher)
            .into_iter()
            .map(|part| self.decode_part(part))
            .collect::<Result<Vec<_>, _>>()?;

        let mut plain = String::with_capacity(cipher.len());
        for (i, piece) in pieces.iter().enumerate() {
            match piece {
                Piece::Decoded(c) => plain.push(*c),
                Piece::Literal(text) => {
                    let between_decoded = i > 0
                        && matches!(pieces[i - 1], Piece::Decoded(_))
                        && matches!(pieces.get(i + 1), Some(Piece::Decoded(_)));
                    if between_decoded && text.chars().all(char::is_whitespace) {
                        plain.push_str(strip_separator(text));
                    } else {
                        plain.push_str(text);
                    }
                }
            }
        }
        Ok(plain)
    }
}

/// Drop the single spaces a spaced format put around a part.
fn strip_separator(text: &str) -> &str {
    let text = text.strip_prefix(' ').unwrap_or(text);
    text.strip_suffix(' ').unwrap_or(text)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn book() -> MapCodeBook {
        MapCodeBook::new()
            .with('你', "abcd")
            .with('好', "efgh")
            .with('汉', "ijkl")
            .with('漢', "mnop")
            .with_variant('汉', '漢')
    }

    #[test]
    fn code_shape() {
        assert!(is_code("abcd"));
        assert!(!is_code("abc"));
        assert!(!is_code("Abcd"));
        assert!(!is_code("abcde"));
        assert!(!is_code("ab1d"));
    }

    #[test]
    fn cjk_ranges() {
        assert!(is_cjk('你'));
        assert!(is_cjk('\u{3400}'));
        assert!(is_cjk('\u{F900}'));
        assert!(!is_cjk('a'));
        assert!(!is_cjk('，'));
        assert!(!is_cjk('ア'));
    }

    #[test]
    fn segment_groups_literal_runs() {
        let service = SegmentingService::new(book());
        let parts = service.segment("你好, world好").unwrap();
        assert_eq!(parts, vec!["abcd", "efgh", ", world", "efgh"]);
    }

    #[test]
    fn segment_empty() {
        let service = SegmentingService::new(book());
        assert!(service.segment("").unwrap().is_empty());
    }

    #[test]
    fn segment_rejects_malformed_codes() {
        let service = SegmentingService::new(MapCodeBook::new().with('x', "TOOLONG"));
        let err = service.segment("x").unwrap_err();
        assert!(err.message().contains("malformed code"));
    }

    #[test]
    fn encrypt_renders_requested_format() {
        let service = SegmentingService::new(book());
        let out = service.encrypt("你好", false, CipherFormat::Pascal).unwrap();
        assert_eq!(out.cipher, "AbcdEfgh");
        assert_eq!(out.parts, vec!["abcd", "efgh"]);
        assert_eq!(out.normalized_plain, "你好");
    }

    #[test]
    fn encrypt_applies_traditional_variant() {
        let service = SegmentingService::new(book());
        let out = service.encrypt("汉", true, CipherFormat::Space).unwrap();
        assert_eq!(out.normalized_plain, "漢");
        assert_eq!(out.parts, vec!["mnop"]);

        let out = service.encrypt("汉", false, CipherFormat::Space).unwrap();
        assert_eq!(out.normalized_plain, "汉");
        assert_eq!(out.parts, vec!["ijkl"]);
    }

    #[test]
    fn split_handles_every_format() {
        let expected = vec!["abcd", "efgh"];
        assert_eq!(split_cipher("AbcdEfgh"), expected);
        assert_eq!(split_cipher("abcdEfgh"), expected);
        assert_eq!(split_cipher("abcdefgh"), expected);
        assert_eq!(split_cipher("abcd efgh"), vec!["abcd", " ", "efgh"]);
    }

    #[test]
    fn split_keeps_odd_runs_literal() {
        assert_eq!(split_cipher("Hello, abcd"), vec!["Hello", ", ", "abcd"]);
        assert!(split_cipher("").is_empty());
    }

    #[test]
    fn split_keeps_non_ascii_in_literal_runs() {
        assert_eq!(split_cipher("abcd，efgh"), vec!["abcd", "，", "efgh"]);
    }

    #[test]
    fn decrypt_every_format_round_trips() {
        let service = SegmentingService::new(book());
        for format in CipherFormat::ALL {
            let out = service.encrypt("你好", false, format).unwrap();
            assert_eq!(service.decrypt(&out.cipher).unwrap(), "你好", "{format}");
        }
    }

    #[test]
    fn decrypt_keeps_literal_text() {
        let service = SegmentingService::new(book());
        let out = service.encrypt("你, 好", false, CipherFormat::Pascal).unwrap();
        assert_eq!(out.cipher, "Abcd, Efgh");
        assert_eq!(service.decrypt(&out.cipher).unwrap(), "你, 好");
    }

    #[test]
    fn decrypt_space_format_keeps_inner_spaces() {
        let service = SegmentingService::new(book());
        let out = service.encrypt("你 好", false, CipherFormat::Space).unwrap();
        assert_eq!(out.cipher, "abcd   efgh");
        assert_eq!(service.decrypt(&out.cipher).unwrap(), "你 好");
    }

    #[test]
    fn decrypt_space_format_keeps_separators_around_literals() {
        let service = SegmentingService::new(book());
        let out = service.encrypt("你,好", false, CipherFormat::Space).unwrap();
        assert_eq!(out.cipher, "abcd , efgh");
        assert_eq!(split_cipher(&out.cipher), vec!["abcd", " , ", "efgh"]);
        assert_eq!(service.decrypt(&out.cipher).unwrap(), "你 , 好");

        let out = service.encrypt("你,好", false, CipherFormat::Pascal).unwrap();
        assert_eq!(out.cipher, "Abcd,Efgh");
        assert_eq!(service.decrypt(&out.cipher).unwrap(), "你,好");
    }

    #[test]
    fn lenient_decrypt_passes_unknown_codes_through() {
        let service = SegmentingService::new(book());
        assert_eq!(service.decrypt("zzzzAbcd").unwrap(), "zzzz你");
    }

    #[test]
    fn strict_decrypt_rejects_unknown_codes() {
        let service = SegmentingService::strict(book());
        let err = service.decrypt("zzzz abcd").unwrap_err();
        assert!(err.message().contains("zzzz"));
    }

    #[test]
    fn cjk_book_ignores_non_cjk_entries() {
        let inner = MapCodeBook::new().with('a', "qqqq").with('你', "abcd");
        let service = SegmentingService::new(CjkCodeBook(inner));
        let out = service.encrypt("a你", false, CipherFormat::Space).unwrap();
        assert_eq!(out.parts, vec!["a", "abcd"]);
        assert_eq!(service.decrypt("qqqq").unwrap(), "qqqq");
    }

    #[test]
    fn map_book_from_iter() {
        let book: MapCodeBook = [('你', "abcd"), ('好', "efgh")].into_iter().collect();
        assert_eq!(book.len(), 2);
        assert_eq!(book.decode("efgh"), Some('好'));
        assert_eq!(book.encode('x'), None);
    }
}
