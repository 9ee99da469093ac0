use regex::Regex;
use smallvec::SmallVec;
use std::borrow::Cow;
use std::sync::LazyLock;

static COMMENT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\{[^}]*\}").expect("valid comment regex"));

static ANNOTATION_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\[%[^\]]*\]").expect("valid annotation regex"));

static GLYPH_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[?!]+").expect("valid glyph regex"));

pub(crate) type TokenList<'a> = SmallVec<[Token<'a>; 128]>;

pub(crate) const RESULT_MARKERS: [&str; 4] = ["1-0", "0-1", "1/2-1/2", "*"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Token<'a> {
    /// `12`, `12.` or `12...`
    MoveNumber,
    Result(&'a str),
    Move(&'a str),
}

/// Strip `{...}` comments, `[%...]` annotations and `?`/`!` glyphs, in that order.
///
/// Comments are removed first so that annotations nested inside them go with them.
pub fn clean_movetext(movetext: &str) -> Cow<'_, str> {
    let text = strip(&COMMENT_RE, Cow::Borrowed(movetext), " ");
    let text = strip(&ANNOTATION_RE, text, " ");
    strip(&GLYPH_RE, text, "")
}

fn strip<'a>(re: &Regex, text: Cow<'a, str>, with: &str) -> Cow<'a, str> {
    match text {
        Cow::Borrowed(s) => re.replace_all(s, with),
        Cow::Owned(s) => Cow::Owned(re.replace_all(&s, with).into_owned()),
    }
}

pub(crate) fn classify(token: &str) -> Token<'_> {
    if RESULT_MARKERS.contains(&token) {
        return Token::Result(token);
    }

    let digits = token.bytes().take_while(u8::is_ascii_digit).count();
    if digits == 0 {
        return Token::Move(token);
    }

    let rest = token[digits..].trim_start_matches('.');
    if rest.is_empty() {
        Token::MoveNumber
    } else if rest.len() < token.len() - digits {
        // `12.e4` glued to its number
        Token::Move(rest)
    } else {
        Token::Move(token)
    }
}

/// Split cleaned movetext into classified tokens.
pub(crate) fn tokenize(clean: &str) -> TokenList<'_> {
    clean.split_whitespace().map(classify).collect()
}
