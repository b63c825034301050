//! Lexer (tokenizer) for minic source code
//!
//! Converts raw source text into a flat [`Token`] sequence consumed by the
//! parser. Classification is driven by an ordered table of anchored regular
//! expressions: at every scan position the rules are tried in table order and
//! the first match wins. Ordering, not longest match, is what keeps `<=` from
//! lexing as `<` `=`. Words are matched whole and then looked up in the keyword
//! table, so `double` is a keyword while `doubled` and `str_len` are identifiers.
//!
//! Whitespace, newlines, `//` and `/* */` comments, and `#` preprocessor lines
//! are consumed without producing tokens. Newlines (including those inside
//! block comments) advance the line counter.

use super::ast::SourceLocation;
use once_cell::sync::Lazy;
use regex::Regex;
use rustc_hash::FxHashMap;
use serde::Serialize;
use std::fmt;
use std::ops::Range;

/// Classification of a token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum TokenKind {
    // Literals
    Number,
    String,

    // Identifiers
    Identifier,

    // Arithmetic
    Plus,     // +
    Minus,    // -
    Times,    // *
    Divide,   // /
    Modulus,  // %
    Exponent, // ^

    // Comparison
    Equal,        // ==
    NotEqual,     // !=
    LessThan,     // <
    LessEqual,    // <=
    GreaterThan,  // >
    GreaterEqual, // >=

    // Logical
    And,       // &&
    Or,        // ||
    Not,       // !
    AddressOf, // &

    // Assignment
    Assign,    // =
    AddAssign, // +=
    SubAssign, // -=
    MulAssign, // *=
    DivAssign, // /=

    // Increment/Decrement
    Increment, // ++
    Decrement, // --

    // Punctuation
    LParen,     // (
    RParen,     // )
    LBrace,     // {
    RBrace,     // }
    LBracket,   // [
    RBracket,   // ]
    Terminator, // ;
    Comma,      // ,

    // Keywords
    Int,
    Double,
    Const,
    Char,
    Str,
    Strtod,
    While,
    Break,
    If,
    Else,
    Function,
    Return,
    Printf,
    Pow,
    Fmod,
    Fgets,
    Strncmp,
    Exit,
}

impl TokenKind {
    /// The fixed spelling of this kind, or `None` for literals and identifiers.
    pub fn symbol(self) -> Option<&'static str> {
        let text = match self {
            TokenKind::Number | TokenKind::String | TokenKind::Identifier => return None,
            TokenKind::Plus => "+",
            TokenKind::Minus => "-",
            TokenKind::Times => "*",
            TokenKind::Divide => "/",
            TokenKind::Modulus => "%",
            TokenKind::Exponent => "^",
            TokenKind::Equal => "==",
            TokenKind::NotEqual => "!=",
            TokenKind::LessThan => "<",
            TokenKind::LessEqual => "<=",
            TokenKind::GreaterThan => ">",
            TokenKind::GreaterEqual => ">=",
            TokenKind::And => "&&",
            TokenKind::Or => "||",
            TokenKind::Not => "!",
            TokenKind::AddressOf => "&",
            TokenKind::Assign => "=",
            TokenKind::AddAssign => "+=",
            TokenKind::SubAssign => "-=",
            TokenKind::MulAssign => "*=",
            TokenKind::DivAssign => "/=",
            TokenKind::Increment => "++",
            TokenKind::Decrement => "--",
            TokenKind::LParen => "(",
            TokenKind::RParen => ")",
            TokenKind::LBrace => "{",
            TokenKind::RBrace => "}",
            TokenKind::LBracket => "[",
            TokenKind::RBracket => "]",
            TokenKind::Terminator => ";",
            TokenKind::Comma => ",",
            TokenKind::Int => "int",
            TokenKind::Double => "double",
            TokenKind::Const => "const",
            TokenKind::Char => "char",
            TokenKind::Str => "str",
            TokenKind::Strtod => "strtod",
            TokenKind::While => "while",
            TokenKind::Break => "break",
            TokenKind::If => "if",
            TokenKind::Else => "else",
            TokenKind::Function => "function",
            TokenKind::Return => "return",
            TokenKind::Printf => "printf",
            TokenKind::Pow => "pow",
            TokenKind::Fmod => "fmod",
            TokenKind::Fgets => "fgets",
            TokenKind::Strncmp => "strncmp",
            TokenKind::Exit => "exit",
        };
        Some(text)
    }

    /// Library routines the language reserves as keywords but which are
    /// called like ordinary functions.
    pub fn is_builtin(self) -> bool {
        matches!(
            self,
            TokenKind::Strtod
                | TokenKind::Printf
                | TokenKind::Pow
                | TokenKind::Fmod
                | TokenKind::Fgets
                | TokenKind::Strncmp
                | TokenKind::Exit
        )
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.symbol() {
            Some(text) => write!(f, "'{}'", text),
            None => match self {
                TokenKind::Number => write!(f, "number"),
                TokenKind::String => write!(f, "string literal"),
                _ => write!(f, "identifier"),
            },
        }
    }
}

/// Literal payload carried by a token.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum TokenValue {
    None,
    Number(f64),
    Ident(String),
    Str(String),
}

/// A classified, positioned lexical unit.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Token {
    pub kind: TokenKind,
    pub value: TokenValue,
    pub location: SourceLocation,
    /// Byte length of the lexeme in the source
    pub len: usize,
}

impl Token {
    pub fn new(kind: TokenKind, value: TokenValue, location: SourceLocation, len: usize) -> Self {
        Self {
            kind,
            value,
            location,
            len,
        }
    }

    pub fn line(&self) -> usize {
        self.location.line
    }

    pub fn offset(&self) -> usize {
        self.location.offset
    }

    /// Byte range of the lexeme in the source text.
    pub fn span(&self) -> Range<usize> {
        self.offset()..self.offset() + self.len
    }

    pub fn number(&self) -> Option<f64> {
        match self.value {
            TokenValue::Number(n) => Some(n),
            _ => None,
        }
    }

    pub fn identifier(&self) -> Option<&str> {
        match &self.value {
            TokenValue::Ident(name) => Some(name),
            _ => None,
        }
    }

    /// Human readable text of the token, used in diagnostics.
    pub fn text(&self) -> String {
        match &self.value {
            TokenValue::Number(n) => n.to_string(),
            TokenValue::Ident(name) => name.clone(),
            TokenValue::Str(s) => format!("{:?}", s),
            TokenValue::None => self.kind.symbol().unwrap_or_default().to_string(),
        }
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.value {
            TokenValue::Number(n) => write!(f, "number {}", n),
            TokenValue::Ident(name) => write!(f, "identifier '{}'", name),
            TokenValue::Str(s) => write!(f, "string literal {:?}", s),
            TokenValue::None => write!(f, "{}", self.kind),
        }
    }
}

/// Lexer error type
#[derive(Debug, Clone, PartialEq)]
pub struct LexError {
    pub message: String,
    /// First character of the input that no rule accepted
    pub character: char,
    pub location: SourceLocation,
}

impl fmt::Display for LexError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Lexer error at line {}, column {}: {}",
            self.location.line, self.location.column, self.message
        )
    }
}

impl std::error::Error for LexError {}

// ===== Rule table =====

#[derive(Debug, Clone, Copy)]
enum RuleAction {
    Newline,
    Skip,
    /// Skipped, but newlines inside still count
    BlockComment,
    /// `/*` with no closing `*/` anywhere after it
    UnterminatedComment,
    /// Identifier unless the whole word is a keyword
    Word,
    Emit(TokenKind),
}

struct Rule {
    action: RuleAction,
    pattern: Regex,
}

fn rule(action: RuleAction, pattern: &str) -> Rule {
    Rule {
        action,
        pattern: Regex::new(&format!("^(?:{})", pattern)).expect("invalid lexer rule pattern"),
    }
}

const KEYWORDS: [TokenKind; 18] = [
    TokenKind::Int,
    TokenKind::Double,
    TokenKind::Const,
    TokenKind::Char,
    TokenKind::Str,
    TokenKind::Strtod,
    TokenKind::While,
    TokenKind::Break,
    TokenKind::If,
    TokenKind::Else,
    TokenKind::Function,
    TokenKind::Return,
    TokenKind::Printf,
    TokenKind::Pow,
    TokenKind::Fmod,
    TokenKind::Fgets,
    TokenKind::Strncmp,
    TokenKind::Exit,
];

static KEYWORD_LOOKUP: Lazy<FxHashMap<&'static str, TokenKind>> = Lazy::new(|| {
    KEYWORDS
        .iter()
        .filter_map(|kind| kind.symbol().map(|word| (word, *kind)))
        .collect()
});

/// Multi-character operators precede the single-character operators that
/// are their prefixes.
const OPERATORS: [TokenKind; 31] = [
    TokenKind::LessEqual,
    TokenKind::GreaterEqual,
    TokenKind::Equal,
    TokenKind::NotEqual,
    TokenKind::And,
    TokenKind::Or,
    TokenKind::Increment,
    TokenKind::Decrement,
    TokenKind::AddAssign,
    TokenKind::SubAssign,
    TokenKind::MulAssign,
    TokenKind::DivAssign,
    TokenKind::Plus,
    TokenKind::Minus,
    TokenKind::Times,
    TokenKind::Divide,
    TokenKind::Modulus,
    TokenKind::Exponent,
    TokenKind::LParen,
    TokenKind::RParen,
    TokenKind::Assign,
    TokenKind::Terminator,
    TokenKind::Comma,
    TokenKind::LBrace,
    TokenKind::RBrace,
    TokenKind::LBracket,
    TokenKind::RBracket,
    TokenKind::LessThan,
    TokenKind::GreaterThan,
    TokenKind::Not,
    TokenKind::AddressOf,
];

static RULES: Lazy<Vec<Rule>> = Lazy::new(|| {
    let mut rules = vec![
        rule(RuleAction::Newline, r"\n"),
        rule(RuleAction::Skip, r"[ \t\r]+"),
        rule(RuleAction::Skip, r"#[^\n]*"),
        rule(RuleAction::BlockComment, r"/\*(?s:.*?)\*/"),
        rule(RuleAction::UnterminatedComment, r"/\*"),
        rule(RuleAction::Skip, r"//[^\n]*"),
        rule(RuleAction::Emit(TokenKind::Number), r"\d+(?:\.\d*)?"),
        rule(RuleAction::Emit(TokenKind::String), r#""(?:[^"\\\n]|\\.)*""#),
    ];

    for kind in OPERATORS {
        let symbol = kind.symbol().unwrap_or_default();
        rules.push(rule(RuleAction::Emit(kind), &regex::escape(symbol)));
    }

    rules.push(rule(RuleAction::Word, r"[A-Za-z_][A-Za-z0-9_]*"));
    rules
});

/// First rule in table order that matches at the start of `input`, with the
/// length of its match.
fn match_rule(input: &str) -> Option<(RuleAction, usize)> {
    RULES
        .iter()
        .find_map(|rule| rule.pattern.find(input).map(|m| (rule.action, m.end())))
}

/// Tokenize `source` in one call.
pub fn tokenize(source: &str) -> Result<Vec<Token>, LexError> {
    Lexer::new(source).tokenize()
}

/// Lexer for minic source code
pub struct Lexer<'a> {
    source: &'a str,
    position: usize,
    line: usize,
    line_start: usize,
}

impl<'a> Lexer<'a> {
    /// Create a new lexer for the given source string.
    pub fn new(source: &'a str) -> Self {
        Self {
            source,
            position: 0,
            line: 1,
            line_start: 0,
        }
    }

    /// Tokenize the entire input
    pub fn tokenize(&mut self) -> Result<Vec<Token>, LexError> {
        let mut tokens = Vec::new();
        while let Some(token) = self.next_token()? {
            tokens.push(token);
        }
        Ok(tokens)
    }

    /// Get next token, skipping anything that does not produce one
    fn next_token(&mut self) -> Result<Option<Token>, LexError> {
        let source = self.source;

        while !self.is_at_end() {
            let rest = &source[self.position..];
            let (action, len) = match match_rule(rest) {
                Some(found) => found,
                None => return Err(self.unrecognized(rest)),
            };

            let start = self.position;
            let location = self.current_location();
            let text = &rest[..len];
            self.position += len;

            match action {
                RuleAction::Newline => self.start_line(self.position),
                RuleAction::Skip => {}
                RuleAction::UnterminatedComment => {
                    return Err(LexError {
                        message: "Unterminated block comment".to_string(),
                        character: '/',
                        location,
                    });
                }
                RuleAction::BlockComment => {
                    for (i, _) in text.match_indices('\n') {
                        self.start_line(start + i + 1);
                    }
                }
                RuleAction::Word => {
                    let kind = KEYWORD_LOOKUP
                        .get(text)
                        .copied()
                        .unwrap_or(TokenKind::Identifier);
                    let value = self.literal_value(kind, text, location)?;
                    return Ok(Some(Token::new(kind, value, location, len)));
                }
                RuleAction::Emit(kind) => {
                    let value = self.literal_value(kind, text, location)?;
                    return Ok(Some(Token::new(kind, value, location, len)));
                }
            }
        }

        Ok(None)
    }

    fn literal_value(
        &self,
        kind: TokenKind,
        text: &str,
        location: SourceLocation,
    ) -> Result<TokenValue, LexError> {
        match kind {
            TokenKind::Number => {
                let value = text.parse::<f64>().map_err(|_| LexError {
                    message: format!("Invalid numeric literal: {}", text),
                    character: text.chars().next().unwrap_or('0'),
                    location,
                })?;
                Ok(TokenValue::Number(value))
            }
            TokenKind::String => unescape(&text[1..text.len() - 1], location).map(TokenValue::Str),
            TokenKind::Identifier => Ok(TokenValue::Ident(text.to_string())),
            _ => Ok(TokenValue::None),
        }
    }

    fn unrecognized(&self, rest: &str) -> LexError {
        let character = rest.chars().next().unwrap_or('\0');
        let message = if character == '"' {
            "Unterminated string literal".to_string()
        } else {
            format!("Unexpected character: '{}'", character)
        };

        LexError {
            message,
            character,
            location: self.current_location(),
        }
    }

    fn start_line(&mut self, line_start: usize) {
        self.line += 1;
        self.line_start = line_start;
    }

    /// Check if at end of input
    fn is_at_end(&self) -> bool {
        self.position >= self.source.len()
    }

    /// Get current source location
    fn current_location(&self) -> SourceLocation {
        SourceLocation::new(self.line, self.position - self.line_start + 1, self.position)
    }
}

fn unescape(body: &str, location: SourceLocation) -> Result<String, LexError> {
    let mut string = String::with_capacity(body.len());
    let mut chars = body.chars();

    while let Some(ch) = chars.next() {
        if ch != '\\' {
            string.push(ch);
            continue;
        }

        // The rule pattern guarantees a character follows every backslash
        let escaped = chars.next().unwrap_or('\\');
        let unescaped = match escaped {
            'n' => '\n',
            't' => '\t',
            'r' => '\r',
            '\\' => '\\',
            '"' => '"',
            '0' => '\0',
            _ => {
                return Err(LexError {
                    message: format!("Unknown escape sequence: \\{}", escaped),
                    character: escaped,
                    location,
                });
            }
        };
        string.push(unescaped);
    }

    Ok(string)
}
