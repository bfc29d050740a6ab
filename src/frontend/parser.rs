use crate::{
    backend::opcodes::{Ins, Program},
    error,
    utils::io,
};

use super::lexer::{self, Tk};

pub struct Parser<'a> {
    lexer: &'a mut lexer::Lexer<'a>,
}

impl<'a> Parser<'a> {
    pub fn new(lexer: &'a mut lexer::Lexer<'a>) -> Self {
        Self { lexer }
    }

    pub fn parse(&mut self) -> Result<Program, error::Error> {
        let mut program = Program::default();

        loop {
            let token = self.lexer.next_valid_token()?;
            match token.tk {
                Tk::EOF => return Ok(program),
                Tk::Sep => continue,
                Tk::Id(word) => {
                    let ins = self.parse_instruction(&word, token.pos)?;
                    program.push(ins, token.pos);
                }
                Tk::Int(v) => {
                    return error::Error::unknown_instruction(&v.to_string(), token.pos).err()
                }
                Tk::Comment | Tk::Whitespace => unreachable!("filtered by the lexer"),
            }
        }
    }

    fn parse_instruction(&mut self, word: &str, pos: io::Pos) -> Result<Ins, error::Error> {
        let ins = match word {
            "int" | "push" => {
                let operand = self.lexer.next_valid_token()?;
                match operand.tk {
                    Tk::Int(v) => Ins::Int(v),
                    _ => return error::Error::operand_expected(word, operand.pos).err(),
                }
            }
            "pair" => Ins::Pair,
            "pop" => Ins::Pop,
            "dup" => Ins::Dup,
            "setfst" => Ins::SetFirst,
            "setsnd" => Ins::SetSecond,
            "clear" => Ins::Clear,
            "gc" => Ins::Gc,
            "print" => Ins::Print,
            "dump" => Ins::Dump,
            _ => return error::Error::unknown_instruction(word, pos).err(),
        };

        self.expect_end_of_statement(word)?;
        Ok(ins)
    }

    fn expect_end_of_statement(&mut self, word: &str) -> Result<(), error::Error> {
        let token = self.lexer.next_valid_token()?;
        match token.tk {
            Tk::Sep | Tk::EOF => Ok(()),
            _ => error::Error::unexpected_operand(word, token.pos).err(),
        }
    }
}
