use core::fmt;

use colored::Colorize;

use crate::utils::io;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Ins {
    Int(i32),
    Pair,
    Pop,
    Dup,
    SetFirst,
    SetSecond,
    Clear,
    Gc,
    Print,
    Dump,
}

impl Ins {
    pub fn mnemonic(&self) -> &'static str {
        match self {
            Ins::Int(_) => "int",
            Ins::Pair => "pair",
            Ins::Pop => "pop",
            Ins::Dup => "dup",
            Ins::SetFirst => "setfst",
            Ins::SetSecond => "setsnd",
            Ins::Clear => "clear",
            Ins::Gc => "gc",
            Ins::Print => "print",
            Ins::Dump => "dump",
        }
    }
}

#[derive(Default)]
pub struct Program {
    bytecode: Vec<Ins>,
    positions: Vec<io::Pos>,
}

impl Program {
    pub fn push(&mut self, ins: Ins, pos: io::Pos) {
        self.bytecode.push(ins);
        self.positions.push(pos);
    }

    pub fn ins(&self) -> &[Ins] {
        &self.bytecode
    }

    pub fn get_pos(&self, addr: usize) -> Option<&io::Pos> {
        self.positions.get(addr)
    }

    pub fn len(&self) -> usize {
        self.bytecode.len()
    }
}

impl fmt::Display for Program {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, ins) in self.bytecode.iter().enumerate() {
            match ins {
                Ins::Int(v) => writeln!(f, "{:02} {} {}", i, ins.mnemonic().green(), v)?,
                _ => writeln!(f, "{:02} {}", i, ins.mnemonic().green())?,
            }
        }
        Ok(())
    }
}
