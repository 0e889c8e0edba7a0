use std::fmt;

use crate::error::CompileError;
use crate::span::Span;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    // Type keywords
    Int, Float, Double, Str, Bool, Char,
    // Other keywords
    If, Else, Return, True, False, For, While, Func,
    // Identifiers and literals
    Identifier,
    Number,
    StringLiteral,
    // Operators
    Assign,        // =
    Equal,         // ==
    Plus,          // +
    Minus,         // -
    Star,          // *
    Slash,         // /
    Greater,       // >
    GreaterEqual,  // >=
    Less,          // <
    LessEqual,     // <=
    Not,           // !
    NotEqual,      // !=
    And,           // &&
    Or,            // ||
    // Punctuation
    LParen,        // (
    RParen,        // )
    LBrace,        // {
    RBrace,        // }
    LBracket,      // [
    RBracket,      // ]
    Semicolon,     // ;
    Comma,         // ,
    Eof,
}

impl TokenKind {
    /// Name used in token dumps and diagnostics.
    pub fn name(self) -> &'static str {
        match self {
            Self::Int => "INT",
            Self::Float => "FLOAT",
            Self::Double => "DOUBLE",
            Self::Str => "STRING",
            Self::Bool => "BOOL",
            Self::Char => "CHAR",
            Self::If => "IF",
            Self::Else => "ELSE",
            Self::Return => "RETURN",
            Self::True => "TRUE",
            Self::False => "FALSE",
            Self::For => "FOR",
            Self::While => "WHILE",
            Self::Func => "FUNC",
            Self::Identifier => "IDENTIFIER",
            Self::Number => "NUMBER",
            Self::StringLiteral => "STRING_LITERAL",
            Self::Assign => "ASSIGN",
            Self::Equal => "EQ",
            Self::Plus => "PLUS",
            Self::Minus => "MINUS",
            Self::Star => "MUL",
            Self::Slash => "DIV",
            Self::Greater => "GT",
            Self::GreaterEqual => "GTE",
            Self::Less => "LT",
            Self::LessEqual => "LTE",
            Self::Not => "NOT",
            Self::NotEqual => "NEQ",
            Self::And => "AND",
            Self::Or => "OR",
            Self::LParen => "LPAREN",
            Self::RParen => "RPAREN",
            Self::LBrace => "LBRACE",
            Self::RBrace => "RBRACE",
            Self::LBracket => "LBRACKET",
            Self::RBracket => "RBRACKET",
            Self::Semicolon => "SEMICOLON",
            Self::Comma => "COMMA",
            Self::Eof => "EOF",
        }
    }

    /// Base type tag for declaration keywords.
    pub fn type_name(self) -> Option<&'static str> {
        match self {
            Self::Int => Some("int"),
            Self::Float => Some("float"),
            Self::Double => Some("double"),
            Self::Str => Some("string"),
            Self::Bool => Some("bool"),
            Self::Char => Some("char"),
            _ => None,
        }
    }

    pub fn is_type_keyword(self) -> bool {
        self.type_name().is_some()
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    pub lexeme: String,
    pub span: Span,
}

impl Token {
    pub fn new(kind: TokenKind, lexeme: impl Into<String>, span: Span) -> Self {
        Self { kind, lexeme: lexeme.into(), span }
    }

    pub fn line(&self) -> usize {
        self.span.line
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}\t{}\t{}", self.lexeme, self.kind, self.span.line)
    }
}

fn keyword(word: &str) -> Option<TokenKind> {
    let kind = match word {
        "int" => TokenKind::Int,
        "float" => TokenKind::Float,
        "double" => TokenKind::Double,
        "string" => TokenKind::Str,
        "bool" => TokenKind::Bool,
        "char" => TokenKind::Char,
        "if" => TokenKind::If,
        "else" => TokenKind::Else,
        "return" => TokenKind::Return,
        "true" => TokenKind::True,
        "false" => TokenKind::False,
        "for" => TokenKind::For,
        "while" => TokenKind::While,
        "func" => TokenKind::Func,
        _ => return None,
    };
    Some(kind)
}

pub fn tokenize(source: &str) -> Result<Vec<Token>, CompileError> {
    Lexer::new(source).run()
}

struct Lexer<'a> {
    source: &'a str,
    pos: usize,
    line: usize,
    column: usize,
    tokens: Vec<Token>,
}

impl<'a> Lexer<'a> {
    fn new(source: &'a str) -> Self {
        Self {
            source,
            pos: 0,
            line: 1,
            column: 1,
            tokens: Vec::new(),
        }
    }

    fn run(mut self) -> Result<Vec<Token>, CompileError> {
        while let Some(ch) = self.peek() {
            match ch {
                c if c.is_whitespace() => {
                    self.bump();
                }
                '/' if self.peek_second() == Some('/') => {
                    // Комментарий до конца строки
                    while let Some(c) = self.peek() {
                        if c == '\n' { break; }
                        self.bump();
                    }
                }
                '"' => self.string_literal()?,
                '0'..='9' => {
                    let start = self.mark();
                    self.eat_while(|c| c.is_ascii_digit() || c == '.');
                    self.push_from(TokenKind::Number, start);
                }
                c if c.is_alphabetic() || c == '_' => {
                    let start = self.mark();
                    self.eat_while(|c| c.is_alphanumeric() || c == '_');
                    let word = &self.source[start.0..self.pos];
                    let kind = keyword(word).unwrap_or(TokenKind::Identifier);
                    self.push_from(kind, start);
                }
                _ => self.operator(ch)?,
            }
        }

        let eof = Span::point(self.line, self.column, self.pos);
        self.tokens.push(Token::new(TokenKind::Eof, "", eof));
        Ok(self.tokens)
    }

    fn operator(&mut self, ch: char) -> Result<(), CompileError> {
        let start = self.mark();
        self.bump();

        let kind = match ch {
            '=' => self.pick('=', TokenKind::Equal, TokenKind::Assign),
            '>' => self.pick('=', TokenKind::GreaterEqual, TokenKind::Greater),
            '<' => self.pick('=', TokenKind::LessEqual, TokenKind::Less),
            '!' => self.pick('=', TokenKind::NotEqual, TokenKind::Not),
            '&' | '|' => {
                if self.peek() != Some(ch) {
                    return Err(CompileError::Lexical {
                        line: start.1,
                        message: format!("Unexpected character '{}' (did you mean '{}{}'?)", ch, ch, ch),
                    });
                }
                self.bump();
                if ch == '&' { TokenKind::And } else { TokenKind::Or }
            }
            '+' => TokenKind::Plus,
            '-' => TokenKind::Minus,
            '*' => TokenKind::Star,
            '/' => TokenKind::Slash,
            '(' => TokenKind::LParen,
            ')' => TokenKind::RParen,
            '{' => TokenKind::LBrace,
            '}' => TokenKind::RBrace,
            '[' => TokenKind::LBracket,
            ']' => TokenKind::RBracket,
            ';' => TokenKind::Semicolon,
            ',' => TokenKind::Comma,
            _ => {
                return Err(CompileError::Lexical {
                    line: start.1,
                    message: format!("Unexpected character: '{}'", ch),
                });
            }
        };

        self.push_from(kind, start);
        Ok(())
    }

    fn string_literal(&mut self) -> Result<(), CompileError> {
        let start = self.mark();
        self.bump(); // открывающая кавычка
        let body_start = self.pos;

        loop {
            match self.peek() {
                Some('"') => break,
                Some(_) => {
                    self.bump();
                }
                None => {
                    return Err(CompileError::Lexical {
                        line: start.1,
                        message: "Unterminated string literal".to_string(),
                    });
                }
            }
        }

        let body = self.source[body_start..self.pos].to_string();
        self.bump(); // закрывающая кавычка
        let span = Span::new(start.1, start.2, start.0, self.pos);
        self.tokens.push(Token::new(TokenKind::StringLiteral, body, span));
        Ok(())
    }

    /// Picks the two-character form when the next character is `next`.
    fn pick(&mut self, next: char, double: TokenKind, single: TokenKind) -> TokenKind {
        if self.peek() == Some(next) {
            self.bump();
            double
        } else {
            single
        }
    }

    fn push_from(&mut self, kind: TokenKind, (offset, line, column): (usize, usize, usize)) {
        let lexeme = &self.source[offset..self.pos];
        let span = Span::new(line, column, offset, self.pos);
        self.tokens.push(Token::new(kind, lexeme, span));
    }

    /// Byte offset, line and column of the cursor.
    fn mark(&self) -> (usize, usize, usize) {
        (self.pos, self.line, self.column)
    }

    fn eat_while(&mut self, pred: impl Fn(char) -> bool) {
        while let Some(c) = self.peek() {
            if !pred(c) { break; }
            self.bump();
        }
    }

    fn peek(&self) -> Option<char> {
        self.source[self.pos..].chars().next()
    }

    fn peek_second(&self) -> Option<char> {
        let mut chars = self.source[self.pos..].chars();
        chars.next();
        chars.next()
    }

    fn bump(&mut self) -> Option<char> {
        let ch = self.peek()?;
        self.pos += ch.len_utf8();
        if ch == '\n' {
            self.line += 1;
            self.column = 1;
        } else {
            self.column += 1;
        }
        Some(ch)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(source: &str) -> Vec<TokenKind> {
        tokenize(source).expect("lex").iter().map(|t| t.kind).collect()
    }

    #[test]
    fn declaration_with_initializer() {
        let tokens = tokenize("int a = 5;").expect("lex");
        let kinds: Vec<_> = tokens.iter().map(|t| t.kind).collect();
        assert_eq!(
            kinds,
            vec![
                TokenKind::Int,
                TokenKind::Identifier,
                TokenKind::Assign,
                TokenKind::Number,
                TokenKind::Semicolon,
                TokenKind::Eof,
            ]
        );
        assert_eq!(tokens[1].lexeme, "a");
        assert_eq!(tokens[3].lexeme, "5");
    }

    #[test]
    fn empty_source_still_ends_with_eof() {
        assert_eq!(kinds(""), vec![TokenKind::Eof]);
        assert_eq!(kinds("  \n\t // nothing here\n"), vec![TokenKind::Eof]);
    }

    #[test]
    fn two_character_operators() {
        assert_eq!(
            kinds("== != >= <= && || = ! > <"),
            vec![
                TokenKind::Equal,
                TokenKind::NotEqual,
                TokenKind::GreaterEqual,
                TokenKind::LessEqual,
                TokenKind::And,
                TokenKind::Or,
                TokenKind::Assign,
                TokenKind::Not,
                TokenKind::Greater,
                TokenKind::Less,
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn print_is_an_identifier() {
        let tokens = tokenize("print(x);").expect("lex");
        assert_eq!(tokens[0].kind, TokenKind::Identifier);
        assert_eq!(tokens[0].lexeme, "print");
    }

    #[test]
    fn keywords_and_identifiers() {
        assert_eq!(
            kinds("func while_ _x float1 for"),
            vec![
                TokenKind::Func,
                TokenKind::Identifier,
                TokenKind::Identifier,
                TokenKind::Identifier,
                TokenKind::For,
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn numerals_accept_loose_dots() {
        let tokens = tokenize("3.14 1.2.3").expect("lex");
        assert_eq!(tokens[0].lexeme, "3.14");
        assert_eq!(tokens[1].lexeme, "1.2.3");
        assert_eq!(tokens[1].kind, TokenKind::Number);
    }

    #[test]
    fn line_numbers_and_comments() {
        let tokens = tokenize("int a; // first\n\nint b;").expect("lex");
        assert_eq!(tokens[0].line(), 1);
        assert_eq!(tokens[3].lexeme, "int");
        assert_eq!(tokens[3].line(), 3);
        assert_eq!(tokens[3].span.column, 1);
        assert_eq!(tokens.last().map(|t| t.kind), Some(TokenKind::Eof));
    }

    #[test]
    fn string_literal_keeps_raw_text() {
        let tokens = tokenize(r#"string s = "hi // there";"#).expect("lex");
        assert_eq!(tokens[3].kind, TokenKind::StringLiteral);
        assert_eq!(tokens[3].lexeme, "hi // there");
        assert_eq!(tokens[4].kind, TokenKind::Semicolon);
    }

    #[test]
    fn unterminated_string_is_fatal() {
        let err = tokenize("int a;\n\"abc").expect_err("must fail");
        assert!(matches!(err, CompileError::Lexical { line: 2, .. }));
        assert!(err.to_string().contains("Unterminated string literal"));
    }

    #[test]
    fn lone_ampersand_and_pipe_are_fatal() {
        let err = tokenize("a & b").expect_err("must fail");
        assert!(matches!(err, CompileError::Lexical { line: 1, .. }));
        let err = tokenize("a\n| b").expect_err("must fail");
        assert!(matches!(err, CompileError::Lexical { line: 2, .. }));
    }

    #[test]
    fn unexpected_character_is_fatal() {
        let err = tokenize("int a = 5 % 2;").expect_err("must fail");
        assert!(err.to_string().contains("'%'"));
    }

    #[test]
    fn token_dump_line() {
        let tokens = tokenize("x").expect("lex");
        assert_eq!(tokens[0].to_string(), "x\tIDENTIFIER\t1");
    }
}
