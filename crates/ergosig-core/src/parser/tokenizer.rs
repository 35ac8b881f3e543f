//! Type-expression tokenizer
//!
//! Splits a type expression such as `dict[str, list[int]]` into words and
//! the three structural symbols `[`, `]` and `,`. Everything between symbols
//! is one word, trimmed, so `int | None` stays a single (unknown) word.
//!
//! Guarantees:
//! - Deterministic: same input always produces same token stream
//! - Total: tokenizing never fails; structure is checked by the parser

/// Token types for type expressions
#[derive(Debug, Clone, PartialEq)]
pub enum Token {
    Word(String),
    LBracket, // [
    RBracket, // ]
    Comma,    // ,
    Eof,
}

impl std::fmt::Display for Token {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            Token::Word(w) => write!(f, "'{}'", w),
            Token::LBracket => write!(f, "'['"),
            Token::RBracket => write!(f, "']'"),
            Token::Comma => write!(f, "','"),
            Token::Eof => write!(f, "end of input"),
        }
    }
}

/// Position in a type expression for error reporting
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Span {
    /// 1-based character column
    pub column: usize,
    /// Character offset from start of input
    pub offset: usize,
}

impl std::fmt::Display for Span {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "column {}", self.column)
    }
}

/// Token with source position
#[derive(Debug, Clone, PartialEq)]
pub struct SpannedToken {
    pub token: Token,
    pub span: Span,
}

/// Tokenizer for type-expression text
pub struct Tokenizer {
    input: Vec<char>,
    position: usize,
}

impl Tokenizer {
    pub fn new(text: &str) -> Self {
        Tokenizer {
            input: text.chars().collect(),
            position: 0,
        }
    }

    /// Tokenize the entire input; the stream always ends with `Eof`
    pub fn tokenize(&mut self) -> Vec<SpannedToken> {
        let mut tokens = Vec::new();

        loop {
            self.skip_whitespace();

            let span = self.current_span();
            let token = match self.peek() {
                None => {
                    tokens.push(SpannedToken {
                        token: Token::Eof,
                        span,
                    });
                    break;
                }
                Some('[') => {
                    self.position += 1;
                    Token::LBracket
                }
                Some(']') => {
                    self.position += 1;
                    Token::RBracket
                }
                Some(',') => {
                    self.position += 1;
                    Token::Comma
                }
                Some(_) => self.read_word(),
            };
            tokens.push(SpannedToken { token, span });
        }

        tokens
    }

    fn peek(&self) -> Option<char> {
        self.input.get(self.position).copied()
    }

    fn current_span(&self) -> Span {
        Span {
            column: self.position + 1,
            offset: self.position,
        }
    }

    fn skip_whitespace(&mut self) {
        while matches!(self.peek(), Some(c) if c.is_whitespace()) {
            self.position += 1;
        }
    }

    fn read_word(&mut self) -> Token {
        let start = self.position;
        while let Some(ch) = self.peek() {
            if is_symbol(ch) {
                break;
            }
            self.position += 1;
        }
        let text: String = self.input[start..self.position].iter().collect();
        Token::Word(text.trim_end().to_string())
    }
}

fn is_symbol(ch: char) -> bool {
    matches!(ch, '[' | ']' | ',')
}
