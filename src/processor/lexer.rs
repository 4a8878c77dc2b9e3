//! Very small hand-written lexer for one script line.
//!
//! The line is expected to be upper-cased already. We *only* break it into
//! `Token`s here; whether `2 X {` is a loop header or `5 A` an instruction is
//! decided by the line parser.
//
//  Lexical items:
//
//      Space     ::= whitespace+          (field separator, kept as a token)
//      Number    ::= [0-9]+               (ASCII digits, value not parsed)
//      Symbols   ::= '+' | '-' | ';' | '{' | '}'
//      Word      ::= any other run of non-whitespace, non-symbol chars
//
//  Nothing is ever rejected: every character ends up in exactly one token.

use std::iter::Peekable;
use std::ops::Range;
use std::str::CharIndices;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    Space,
    Number,
    Word,
    Plus,
    Minus,
    Semicolon,
    LBrace,
    RBrace,
}

/// A token and the byte range it covers in the source line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    pub span: Range<usize>,
}

#[derive(Clone)]
pub struct Lexer<'a> {
    src: &'a str,
    chars: Peekable<CharIndices<'a>>,
}

impl<'a> Lexer<'a> {
    pub fn new(src: &'a str) -> Self {
        Self {
            src,
            chars: src.char_indices().peekable(),
        }
    }

    /// Byte offset of the next unread char.
    fn offset(&mut self) -> usize {
        self.chars.peek().map(|(i, _)| *i).unwrap_or(self.src.len())
    }

    fn consume_while<F: Fn(char) -> bool>(&mut self, pred: F) -> usize {
        while let Some(&(_, c)) = self.chars.peek() {
            if !pred(c) {
                break;
            }
            self.chars.next();
        }
        self.offset()
    }
}

fn symbol(c: char) -> Option<TokenKind> {
    match c {
        '+' => Some(TokenKind::Plus),
        '-' => Some(TokenKind::Minus),
        ';' => Some(TokenKind::Semicolon),
        '{' => Some(TokenKind::LBrace),
        '}' => Some(TokenKind::RBrace),
        _ => None,
    }
}

fn is_word_char(c: char) -> bool {
    !c.is_whitespace() && !c.is_ascii_digit() && symbol(c).is_none()
}

impl<'a> Iterator for Lexer<'a> {
    type Item = Token;

    fn next(&mut self) -> Option<Self::Item> {
        let (start, ch) = self.chars.next()?;

        let (kind, end) = if ch.is_whitespace() {
            (TokenKind::Space, self.consume_while(char::is_whitespace))
        } else if ch.is_ascii_digit() {
            (TokenKind::Number, self.consume_while(|c| c.is_ascii_digit()))
        } else if let Some(kind) = symbol(ch) {
            (kind, start + ch.len_utf8())
        } else {
            (TokenKind::Word, self.consume_while(is_word_char))
        };

        Some(Token {
            kind,
            span: start..end,
        })
    }
}
