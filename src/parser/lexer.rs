use logos::Logos;
use crate::ast::Location;

/// Token types for the template surface language (a C#-flavoured subset).
///
/// Trivia (whitespace, newlines, comments) are real tokens: the parser needs
/// their text to reproduce untouched regions byte-for-byte.
#[derive(Logos, Debug, PartialEq, Clone)]
pub enum Token {
    // Keywords
    #[token("using")]
    Using,
    #[token("namespace")]
    Namespace,
    #[token("class")]
    Class,

    // Modifiers
    #[token("public")]
    Public,
    #[token("protected")]
    Protected,
    #[token("private")]
    Private,
    #[token("internal")]
    Internal,
    #[token("static")]
    Static,
    #[token("sealed")]
    Sealed,
    #[token("abstract")]
    Abstract,
    #[token("partial")]
    Partial,
    #[token("virtual")]
    Virtual,
    #[token("override")]
    Override,
    #[token("readonly")]
    Readonly,
    #[token("async")]
    Async,
    #[token("extern")]
    Extern,
    #[token("unsafe")]
    Unsafe,

    // Statement-continuation keywords (needed by the statement scanner)
    #[token("else")]
    Else,
    #[token("catch")]
    Catch,
    #[token("finally")]
    Finally,
    #[token("do")]
    Do,
    #[token("while")]
    While,

    // Identifiers and literals
    #[regex(r"[A-Za-z_][A-Za-z0-9_]*")]
    Identifier,
    #[regex(r"[0-9][0-9A-Za-z_]*")]
    Number,
    #[regex(r#""([^"\\\n]|\\.)*""#)]
    StringLiteral,
    #[regex(r#"@"([^"]|"")*""#)]
    VerbatimStringLiteral,
    #[regex(r"'([^'\\\n]|\\.)'")]
    CharLiteral,

    // Punctuation
    #[token("{")]
    LeftBrace,
    #[token("}")]
    RightBrace,
    #[token("(")]
    LeftParen,
    #[token(")")]
    RightParen,
    #[token("[")]
    LeftBracket,
    #[token("]")]
    RightBracket,
    #[token(";")]
    Semicolon,
    #[token(",")]
    Comma,
    #[token(".")]
    Dot,

    // Any other single operator character
    #[regex(r"[!#$%&*+\-/:<=>?@^|~`\\]")]
    Operator,

    // Trivia
    #[regex(r"[ \t]+")]
    Whitespace,
    #[regex(r"\r?\n|\r")]
    Newline,
    #[regex(r"//[^\n]*")]
    LineComment,
    #[regex(r"/\*[^*]*\*+([^*/][^*]*\*+)*/")]
    BlockComment,
    #[regex(r"\u{FEFF}")]
    Bom,
}

impl Token {
    /// Trivia tokens carry no syntax and are preserved as text
    pub fn is_trivia(&self) -> bool {
        matches!(
            self,
            Token::Whitespace | Token::Newline | Token::LineComment | Token::BlockComment | Token::Bom
        )
    }

    /// Modifier keywords that may precede a declaration
    pub fn is_modifier(&self) -> bool {
        matches!(
            self,
            Token::Public
                | Token::Protected
                | Token::Private
                | Token::Internal
                | Token::Static
                | Token::Sealed
                | Token::Abstract
                | Token::Partial
                | Token::Virtual
                | Token::Override
                | Token::Readonly
                | Token::Async
                | Token::Extern
                | Token::Unsafe
        )
    }
}

/// Lexical token with location information
#[derive(Debug, Clone)]
pub struct LexicalToken {
    pub token: Token,
    pub lexeme: String,
    pub location: Location,
}

impl LexicalToken {
    pub fn new(token: Token, lexeme: String, location: Location) -> Self {
        Self { token, lexeme, location }
    }

    /// Byte offset of the first character
    pub fn start(&self) -> usize {
        self.location.offset
    }

    /// Byte offset just past the last character
    pub fn end(&self) -> usize {
        self.location.offset + self.lexeme.len()
    }

    /// Check if this token matches the given token type
    pub fn is(&self, token_type: &Token) -> bool {
        std::mem::discriminant(&self.token) == std::mem::discriminant(token_type)
    }
}

/// Lexer for template source
pub struct Lexer<'a> {
    lexer: logos::Lexer<'a, Token>,
    current_line: usize,
    current_column: usize,
    current_offset: usize,
}

impl<'a> Lexer<'a> {
    pub fn new(source: &'a str) -> Self {
        Self {
            lexer: Token::lexer(source),
            current_line: 1,
            current_column: 1,
            current_offset: 0,
        }
    }

    /// Get the next token
    pub fn next_token(&mut self) -> Option<Result<LexicalToken, String>> {
        let token = self.lexer.next()?;

        match token {
            Ok(token) => {
                let lexeme = self.lexer.slice().to_string();
                let location = Location::new(
                    self.current_line,
                    self.current_column,
                    self.current_offset,
                );

                self.update_position(&lexeme);

                Some(Ok(LexicalToken::new(token, lexeme, location)))
            }
            Err(_) => Some(Err(format!(
                "unrecognized character at {}:{}",
                self.current_line, self.current_column
            ))),
        }
    }

    /// Update the current position based on the lexeme
    fn update_position(&mut self, lexeme: &str) {
        for ch in lexeme.chars() {
            match ch {
                '\n' => {
                    self.current_line += 1;
                    self.current_column = 1;
                }
                '\r' => {}
                _ => {
                    self.current_column += 1;
                }
            }
            self.current_offset += ch.len_utf8();
        }
    }

    /// Get all tokens from the source, trivia included
    pub fn tokenize(mut self) -> Result<Vec<LexicalToken>, String> {
        let mut tokens = Vec::new();

        while let Some(result) = self.next_token() {
            tokens.push(result?);
        }

        Ok(tokens)
    }
}

impl<'a> Iterator for Lexer<'a> {
    type Item = Result<LexicalToken, String>;

    fn next(&mut self) -> Option<Self::Item> {
        self.next_token()
    }
}
