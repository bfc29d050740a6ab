use std::{iter::Peekable, str::Chars};

use crate::error;
use crate::utils::io;

#[derive(Debug, PartialEq)]
pub enum Tk {
    Id(String),
    Int(i32),
    Sep,
    Comment,
    Whitespace,
    EOF,
}

#[derive(Debug, PartialEq)]
pub struct Token {
    pub tk: Tk,
    pub pos: io::Pos,
}

pub struct Lexer<'a> {
    stream: Peekable<Chars<'a>>,
    cursor: io::Pos,
}

impl Token {
    pub fn new(tk: Tk, pos: io::Pos) -> Self {
        Self { tk, pos }
    }
}

impl<'a> Lexer<'a> {
    pub fn new(src: &'a io::Source) -> Self {
        Self {
            stream: src.char_stream().peekable(),
            cursor: io::Pos::start(src.id()),
        }
    }

    fn advance(&mut self) -> Option<char> {
        let c = self.stream.next()?;
        if c == '\n' {
            self.cursor.line += 1;
            self.cursor.column = 0;
        } else {
            self.cursor.column += 1;
        }
        Some(c)
    }

    fn lookahead_is(&mut self, pred: impl Fn(char) -> bool) -> bool {
        self.stream.peek().is_some_and(|c| pred(*c))
    }

    fn next_token(&mut self) -> Result<Token, error::Error> {
        let pos = self.cursor;
        let Some(c) = self.advance() else {
            return Ok(Token::new(Tk::EOF, pos));
        };

        let tk = match c {
            c if c.is_ascii_alphabetic() || c == '_' => self.extract_identifier(c),
            c if c.is_ascii_digit() => self.extract_number(c, pos)?,
            '-' if self.lookahead_is(|c| c.is_ascii_digit()) => self.extract_number(c, pos)?,
            '#' => self.extract_comment(),
            '\n' | ';' => Tk::Sep,
            '\t' | '\r' | ' ' => {
                while self.lookahead_is(|c| matches!(c, '\t' | '\r' | ' ')) {
                    self.advance();
                }
                Tk::Whitespace
            }
            c => return error::Error::invalid_token_char(c, pos).err(),
        };

        Ok(Token::new(tk, pos))
    }

    fn extract_identifier(&mut self, first: char) -> Tk {
        let mut buf = first.to_string();

        while self.lookahead_is(|c| c.is_ascii_alphanumeric() || c == '_') {
            buf.extend(self.advance());
        }

        Tk::Id(buf)
    }

    fn extract_number(&mut self, first: char, pos: io::Pos) -> Result<Tk, error::Error> {
        let mut buf = first.to_string();

        while self.lookahead_is(|c| c.is_ascii_digit()) {
            buf.extend(self.advance());
        }

        buf.parse::<i32>()
            .map(Tk::Int)
            .map_err(|_| error::Error::integer_out_of_range(&buf, pos))
    }

    fn extract_comment(&mut self) -> Tk {
        while self.lookahead_is(|c| c != '\n') {
            self.advance();
        }
        Tk::Comment
    }

    pub fn next_valid_token(&mut self) -> Result<Token, error::Error> {
        loop {
            let token = self.next_token()?;
            match token.tk {
                Tk::Comment | Tk::Whitespace => continue,
                _ => return Ok(token),
            }
        }
    }
}
