use colored::Colorize;
use thiserror::Error;

use crate::{utils::io, vm::ObjRef};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ErrorType {
    #[error("STACK OVERFLOW")]
    StackOverflow(usize),
    #[error("STACK UNDERFLOW")]
    StackUnderflow,
    #[error("ALLOCATION ERROR")]
    AllocationFailure,
    #[error("TYPE ERROR")]
    TypeError(&'static str),
    #[error("REFERENCE ERROR")]
    ReferenceError,
    #[error("SYNTAX ERROR")]
    SyntaxError,
    #[error("IO ERROR")]
    IOError,
}

#[derive(Debug, Error)]
#[error("{err_type}: {msg}")]
pub struct Error {
    pub msg: String,
    pub err_type: ErrorType,
    pub pos: Option<io::Pos>,
}

impl Error {
    pub fn err<O>(self) -> Result<O, Self> {
        Err(self)
    }

    pub fn with_pos(self, pos: Option<&io::Pos>) -> Self {
        Self {
            pos: pos.cloned(),
            ..self
        }
    }

    pub fn stack_overflow(capacity: usize) -> Self {
        Self {
            msg: format!("Stack overflowed! Capacity of {} roots exceeded", capacity),
            err_type: ErrorType::StackOverflow(capacity),
            pos: None,
        }
    }

    pub fn stack_underflow() -> Self {
        Self {
            msg: "Stack underflow! No roots left to remove".to_string(),
            err_type: ErrorType::StackUnderflow,
            pos: None,
        }
    }

    pub fn allocation_failure(live: usize) -> Self {
        Self {
            msg: format!("Cannot allocate storage for object, {} objects live", live),
            err_type: ErrorType::AllocationFailure,
            pos: None,
        }
    }

    pub fn not_a_cell(ptr: ObjRef, type_name: &'static str) -> Self {
        Self {
            msg: format!("Expected Cell at {}, found {}", ptr, type_name),
            err_type: ErrorType::TypeError(type_name),
            pos: None,
        }
    }

    pub fn dangling_reference(ptr: ObjRef) -> Self {
        Self {
            msg: format!("Reference {} no longer points at a live object", ptr),
            err_type: ErrorType::ReferenceError,
            pos: None,
        }
    }

    pub fn unknown_instruction(word: &str, pos: io::Pos) -> Self {
        Self {
            msg: format!("Unknown instruction: '{}'", word),
            err_type: ErrorType::SyntaxError,
            pos: Some(pos),
        }
    }

    pub fn operand_expected(word: &str, pos: io::Pos) -> Self {
        Self {
            msg: format!("Instruction '{}' expects an integer operand", word),
            err_type: ErrorType::SyntaxError,
            pos: Some(pos),
        }
    }

    pub fn unexpected_operand(word: &str, pos: io::Pos) -> Self {
        Self {
            msg: format!("Instruction '{}' takes no operand", word),
            err_type: ErrorType::SyntaxError,
            pos: Some(pos),
        }
    }

    pub fn invalid_token_char(c: char, pos: io::Pos) -> Self {
        Self {
            msg: format!("Invalid token reached starting with {}", c),
            err_type: ErrorType::SyntaxError,
            pos: Some(pos),
        }
    }

    pub fn integer_out_of_range(literal: &str, pos: io::Pos) -> Self {
        Self {
            msg: format!("Integer literal out of range: '{}'", literal),
            err_type: ErrorType::SyntaxError,
            pos: Some(pos),
        }
    }

    pub fn file_read_error(file_path: &str) -> Self {
        Self {
            msg: format!("Cannot read file: '{}'", file_path),
            err_type: ErrorType::IOError,
            pos: None,
        }
    }

    pub fn dump_error(&self, sources: &io::SourceManager) {
        if let Some(pos) = self.pos {
            let origin = sources
                .get_source(pos.src_id)
                .map(|src| src.get_origin().as_str())
                .unwrap_or("<unknown>");

            eprintln!(
                "In {}, on line {}, column {}\n    {: >4} | {}\n         {}^",
                origin,
                pos.line + 1,
                pos.column + 1,
                pos.line + 1,
                sources.get_line(&pos).unwrap_or_default(),
                "-".repeat(pos.column as usize + 2)
            );
        }

        eprintln!("{}: {}", self.err_type.to_string().red(), self.msg);
    }
}
