//! Evaluation of `suv.config.js` modules.
//!
//! The default export is read as data. The module is tokenized as
//! JavaScript (comments skipped, string escapes decoded) and the exported
//! expression must be a literal built from objects, arrays, strings,
//! numbers, `true`, `false`, `null` and `undefined`. Every call evaluates
//! from scratch.

use std::fmt;
use std::iter::Peekable;
use std::str::CharIndices;

use serde_json::{Map, Number, Value};
use thiserror::Error;

/// Reasons a config module cannot be evaluated.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ModuleError {
    #[error("module has no default export")]
    NoDefaultExport,

    #[error("only a default export expression is supported, found `{0}`")]
    UnsupportedStatement(String),

    #[error("default export has no value")]
    EmptyExport,

    #[error("unterminated {0}")]
    Unterminated(&'static str),

    #[error("syntax error in default export at {at}: {message}")]
    Syntax { at: Position, message: String },
}

/// 1-based location in the module source.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Position {
    pub line: usize,
    pub column: usize,
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "line {}, column {}", self.line, self.column)
    }
}

/// Evaluate a config module and return its default export.
pub fn evaluate(source: &str) -> Result<Value, ModuleError> {
    let (tokens, end) = Lexer::new(source).tokenize()?;

    let start = tokens
        .windows(2)
        .position(|pair| pair[0].token.is_ident("export") && pair[1].token.is_ident("default"))
        .ok_or(ModuleError::NoDefaultExport)?;
    if start > 0 {
        let statement = source[tokens[0].offset..].lines().next().unwrap_or_default();
        return Err(ModuleError::UnsupportedStatement(statement.trim().to_string()));
    }

    Parser {
        tokens: &tokens[2..],
        pos: 0,
        end,
    }
    .default_export()
}

#[derive(Debug, Clone, PartialEq)]
enum Token {
    Punct(char),
    Ident(String),
    Str(String),
    Num(Number),
}

impl Token {
    fn is_ident(&self, name: &str) -> bool {
        matches!(self, Self::Ident(ident) if ident == name)
    }

    fn describe(&self) -> String {
        match self {
            Self::Punct(c) => format!("`{c}`"),
            Self::Ident(name) => format!("`{name}`"),
            Self::Str(_) => "a string".to_string(),
            Self::Num(n) => format!("number `{n}`"),
        }
    }
}

#[derive(Debug)]
struct Spanned {
    token: Token,
    at: Position,
    /// Byte offset of the token in the source
    offset: usize,
}

fn syntax(at: Position, message: impl Into<String>) -> ModuleError {
    ModuleError::Syntax {
        at,
        message: message.into(),
    }
}

struct Lexer<'a> {
    source: &'a str,
    chars: Peekable<CharIndices<'a>>,
    line: usize,
    column: usize,
}

impl<'a> Lexer<'a> {
    fn new(source: &'a str) -> Self {
        Self {
            source,
            chars: source.char_indices().peekable(),
            line: 1,
            column: 1,
        }
    }

    fn tokenize(mut self) -> Result<(Vec<Spanned>, Position), ModuleError> {
        let mut tokens = Vec::new();
        loop {
            self.skip_trivia()?;
            let at = self.position();
            let offset = self.offset();
            let Some(c) = self.peek() else {
                return Ok((tokens, at));
            };

            let token = match c {
                '"' | '\'' | '`' => self.string(c)?,
                '0'..='9' => self.number()?,
                '.' if self.peek_second().is_some_and(|next| next.is_ascii_digit()) => self.number()?,
                c if is_ident_start(c) => self.ident(),
                _ => {
                    self.bump();
                    Token::Punct(c)
                }
            };
            tokens.push(Spanned { token, at, offset });
        }
    }

    fn position(&self) -> Position {
        Position {
            line: self.line,
            column: self.column,
        }
    }

    fn offset(&mut self) -> usize {
        self.chars.peek().map_or(self.source.len(), |&(i, _)| i)
    }

    fn peek(&mut self) -> Option<char> {
        self.chars.peek().map(|&(_, c)| c)
    }

    fn peek_second(&self) -> Option<char> {
        let mut ahead = self.chars.clone();
        ahead.next();
        ahead.next().map(|(_, c)| c)
    }

    fn bump(&mut self) -> Option<char> {
        let (_, c) = self.chars.next()?;
        if c == '\n' {
            self.line += 1;
            self.column = 1;
        } else {
            self.column += 1;
        }
        Some(c)
    }

    /// Skip whitespace, `//` line comments and `/* */` block comments.
    fn skip_trivia(&mut self) -> Result<(), ModuleError> {
        while let Some(c) = self.peek() {
            match (c, self.peek_second()) {
                (c, _) if c.is_whitespace() => {
                    self.bump();
                }
                ('/', Some('/')) => {
                    while self.peek().is_some_and(|c| c != '\n') {
                        self.bump();
                    }
                }
                ('/', Some('*')) => {
                    self.bump();
                    self.bump();
                    loop {
                        match self.bump() {
                            Some('*') if self.peek() == Some('/') => {
                                self.bump();
                                break;
                            }
                            Some(_) => {}
                            None => return Err(ModuleError::Unterminated("block comment")),
                        }
                    }
                }
                _ => break,
            }
        }
        Ok(())
    }

    fn ident(&mut self) -> Token {
        let mut name = String::new();
        while let Some(c) = self.peek().filter(|&c| is_ident_continue(c)) {
            name.push(c);
            self.bump();
        }
        Token::Ident(name)
    }

    fn number(&mut self) -> Result<Token, ModuleError> {
        let at = self.position();
        let mut text = String::new();
        while let Some(c) = self.peek() {
            let exponent_sign = matches!(c, '+' | '-')
                && text.ends_with(|last: char| last == 'e' || last == 'E')
                && radix_of(&text).is_none();
            if !(c.is_ascii_alphanumeric() || c == '.' || c == '_' || exponent_sign) {
                break;
            }
            text.push(c);
            self.bump();
        }
        parse_number(&text)
            .map(Token::Num)
            .ok_or_else(|| syntax(at, format!("invalid number `{text}`")))
    }

    /// Quoted or backtick string with escapes decoded. Template literals
    /// may span lines but not interpolate.
    fn string(&mut self, quote: char) -> Result<Token, ModuleError> {
        let kind = if quote == '`' { "template literal" } else { "string literal" };
        self.bump();

        let mut value = String::new();
        loop {
            let at = self.position();
            match self.bump() {
                None => return Err(ModuleError::Unterminated(kind)),
                Some(c) if c == quote => return Ok(Token::Str(value)),
                Some('\\') => self.escape(&mut value, at)?,
                Some('\n' | '\r') if quote != '`' => return Err(ModuleError::Unterminated(kind)),
                Some('$') if quote == '`' && self.peek() == Some('{') => {
                    return Err(syntax(at, "template literal interpolation is not supported"));
                }
                Some(c) => value.push(c),
            }
        }
    }

    fn escape(&mut self, out: &mut String, at: Position) -> Result<(), ModuleError> {
        let Some(c) = self.bump() else {
            return Err(ModuleError::Unterminated("string literal"));
        };
        match c {
            'n' => out.push('\n'),
            't' => out.push('\t'),
            'r' => out.push('\r'),
            'b' => out.push('\u{8}'),
            'f' => out.push('\u{c}'),
            'v' => out.push('\u{b}'),
            '0' if !self.peek().is_some_and(|next| next.is_ascii_digit()) => out.push('\0'),
            '0'..='9' => return Err(syntax(at, "octal escape sequences are not supported")),
            'x' => {
                let code = self.hex_digits(2, at)?;
                out.push(to_char(code, at)?);
            }
            'u' => {
                let code = self.unicode_escape(at)?;
                out.push(self.resolve_surrogate(code, at)?);
            }
            // line continuation
            '\r' => {
                if self.peek() == Some('\n') {
                    self.bump();
                }
            }
            '\n' | '\u{2028}' | '\u{2029}' => {}
            other => out.push(other),
        }
        Ok(())
    }

    /// Code unit of `\uXXXX` or code point of `\u{X...}`, after the `u`.
    fn unicode_escape(&mut self, at: Position) -> Result<u32, ModuleError> {
        if self.peek() != Some('{') {
            return self.hex_digits(4, at);
        }
        self.bump();

        let mut code: u32 = 0;
        let mut digits = 0;
        loop {
            match self.bump() {
                Some('}') if digits > 0 => return Ok(code),
                Some(c) if digits < 6 => {
                    let digit = c.to_digit(16).ok_or_else(|| syntax(at, "invalid unicode escape"))?;
                    code = code * 16 + digit;
                    digits += 1;
                }
                _ => return Err(syntax(at, "invalid unicode escape")),
            }
        }
    }

    /// Combine a high surrogate with the `\uXXXX` low surrogate that must
    /// follow it.
    fn resolve_surrogate(&mut self, code: u32, at: Position) -> Result<char, ModuleError> {
        if !(0xD800..=0xDBFF).contains(&code) {
            return to_char(code, at);
        }
        if self.peek() != Some('\\') || self.peek_second() != Some('u') {
            return Err(syntax(at, "unpaired surrogate in unicode escape"));
        }
        self.bump();
        self.bump();

        let low = self.unicode_escape(at)?;
        if !(0xDC00..=0xDFFF).contains(&low) {
            return Err(syntax(at, "unpaired surrogate in unicode escape"));
        }
        to_char(0x10000 + ((code - 0xD800) << 10) + (low - 0xDC00), at)
    }

    fn hex_digits(&mut self, count: usize, at: Position) -> Result<u32, ModuleError> {
        let mut code = 0;
        for _ in 0..count {
            let digit = self
                .bump()
                .and_then(|c| c.to_digit(16))
                .ok_or_else(|| syntax(at, "invalid hexadecimal escape"))?;
            code = code * 16 + digit;
        }
        Ok(code)
    }
}

fn to_char(code: u32, at: Position) -> Result<char, ModuleError> {
    char::from_u32(code).ok_or_else(|| syntax(at, format!("invalid code point {code:#x} in escape")))
}

fn is_ident_start(c: char) -> bool {
    c.is_alphabetic() || c == '_' || c == '$'
}

fn is_ident_continue(c: char) -> bool {
    c.is_alphanumeric() || c == '_' || c == '$'
}

fn radix_of(text: &str) -> Option<u32> {
    match text.get(..2) {
        Some("0x" | "0X") => Some(16),
        Some("0o" | "0O") => Some(8),
        Some("0b" | "0B") => Some(2),
        _ => None,
    }
}

/// JS numeric literal: decimal, exponent, `0x`/`0o`/`0b` prefixes and `_`
/// separators. Plain digit sequences stay integers.
fn parse_number(text: &str) -> Option<Number> {
    if text.starts_with('_') || text.ends_with('_') || text.contains("__") {
        return None;
    }
    let digits = text.replace('_', "");

    if let Some(radix) = radix_of(&digits) {
        return u64::from_str_radix(&digits[2..], radix).ok().map(Number::from);
    }

    // legacy octal such as `010`
    if digits.len() > 1 && digits.starts_with('0') && digits.as_bytes()[1].is_ascii_digit() {
        return None;
    }

    if digits.bytes().all(|b| b.is_ascii_digit()) {
        if let Ok(n) = digits.parse::<u64>() {
            return Some(Number::from(n));
        }
    }

    if !digits
        .bytes()
        .all(|b| b.is_ascii_digit() || matches!(b, b'.' | b'e' | b'E' | b'+' | b'-'))
    {
        return None;
    }
    digits.parse::<f64>().ok().and_then(Number::from_f64)
}

fn negate(n: &Number) -> Option<Number> {
    if let Some(magnitude) = n.as_u64() {
        if let Ok(signed) = i64::try_from(magnitude) {
            return Some(Number::from(-signed));
        }
        if magnitude == i64::MIN.unsigned_abs() {
            return Some(Number::from(i64::MIN));
        }
    }
    n.as_f64().and_then(|f| Number::from_f64(-f))
}

struct Parser<'a> {
    tokens: &'a [Spanned],
    pos: usize,
    end: Position,
}

impl<'a> Parser<'a> {
    fn default_export(&mut self) -> Result<Value, ModuleError> {
        if matches!(self.tokens.get(self.pos), None | Some(Spanned { token: Token::Punct(';'), .. })) {
            return Err(ModuleError::EmptyExport);
        }

        let value = self.value()?;
        self.eat(';');
        match self.next() {
            None => Ok(value),
            Some(extra) => Err(syntax(
                extra.at,
                format!("unexpected {} after the default export", extra.token.describe()),
            )),
        }
    }

    fn next(&mut self) -> Option<&'a Spanned> {
        let spanned = self.tokens.get(self.pos)?;
        self.pos += 1;
        Some(spanned)
    }

    fn eat(&mut self, punct: char) -> bool {
        let found = matches!(self.tokens.get(self.pos), Some(Spanned { token: Token::Punct(c), .. }) if *c == punct);
        if found {
            self.pos += 1;
        }
        found
    }

    fn unexpected_end(&self, expected: &str) -> ModuleError {
        syntax(self.end, format!("unexpected end of input, expected {expected}"))
    }

    fn value(&mut self) -> Result<Value, ModuleError> {
        let Some(spanned) = self.next() else {
            return Err(self.unexpected_end("a value"));
        };

        match &spanned.token {
            Token::Punct('{') => self.object(),
            Token::Punct('[') => self.array(),
            Token::Punct(sign @ ('-' | '+')) => match self.next() {
                Some(Spanned { token: Token::Num(n), at, .. }) => {
                    let n = if *sign == '-' { negate(n) } else { Some(n.clone()) };
                    n.map(Value::Number)
                        .ok_or_else(|| syntax(*at, "number out of range"))
                }
                _ => Err(syntax(spanned.at, format!("expected a number after `{sign}`"))),
            },
            Token::Str(s) => Ok(Value::String(s.clone())),
            Token::Num(n) => Ok(Value::Number(n.clone())),
            Token::Ident(name) => match name.as_str() {
                "true" => Ok(Value::Bool(true)),
                "false" => Ok(Value::Bool(false)),
                "null" | "undefined" => Ok(Value::Null),
                _ => Err(syntax(
                    spanned.at,
                    format!("`{name}` is not a literal value; only literals can be exported"),
                )),
            },
            other => Err(syntax(spanned.at, format!("unexpected {}", other.describe()))),
        }
    }

    fn object(&mut self) -> Result<Value, ModuleError> {
        let mut map = Map::new();
        loop {
            let Some(spanned) = self.next() else {
                return Err(self.unexpected_end("`}`"));
            };
            let key = match &spanned.token {
                Token::Punct('}') => return Ok(Value::Object(map)),
                Token::Ident(name) | Token::Str(name) => name.clone(),
                Token::Num(n) => n.to_string(),
                Token::Punct('[') => return Err(syntax(spanned.at, "computed property keys are not supported")),
                other => {
                    return Err(syntax(
                        spanned.at,
                        format!("expected a property key, found {}", other.describe()),
                    ))
                }
            };

            match self.next() {
                Some(Spanned { token: Token::Punct(':'), .. }) => {}
                Some(Spanned { token: Token::Punct(',' | '}'), at, .. }) => {
                    return Err(syntax(*at, format!("shorthand property `{key}` is not supported")));
                }
                Some(other) => {
                    return Err(syntax(
                        other.at,
                        format!("expected `:` after `{key}`, found {}", other.token.describe()),
                    ));
                }
                None => return Err(self.unexpected_end("`:`")),
            }

            let value = self.value()?;
            map.insert(key, value);

            match self.next() {
                Some(Spanned { token: Token::Punct(','), .. }) => {}
                Some(Spanned { token: Token::Punct('}'), .. }) => return Ok(Value::Object(map)),
                Some(other) => {
                    return Err(syntax(
                        other.at,
                        format!("expected `,` or `}}`, found {}", other.token.describe()),
                    ));
                }
                None => return Err(self.unexpected_end("`}`")),
            }
        }
    }

    fn array(&mut self) -> Result<Value, ModuleError> {
        let mut items = Vec::new();
        loop {
            if self.eat(']') {
                return Ok(Value::Array(items));
            }
            if let Some(hole) = self.tokens.get(self.pos).filter(|s| s.token == Token::Punct(',')) {
                return Err(syntax(hole.at, "array holes are not supported"));
            }

            items.push(self.value()?);

            match self.next() {
                Some(Spanned { token: Token::Punct(','), .. }) => {}
                Some(Spanned { token: Token::Punct(']'), .. }) => return Ok(Value::Array(items)),
                Some(other) => {
                    return Err(syntax(
                        other.at,
                        format!("expected `,` or `]`, found {}", other.token.describe()),
                    ));
                }
                None => return Err(self.unexpected_end("`]`")),
            }
        }
    }
}
