use std::{
    io::{self, Write},
    time::Instant,
};

use colored::Colorize;

use crate::{
    backend::opcodes::{Ins, Program},
    error,
    frontend::{lexer::Lexer, parser::Parser},
    utils,
    vm::{CollectStats, Vm, VmConfig},
};

/// Builds `((1,2),(3,4))` plus two loose scalars, every object rooted, then
/// collects once.
pub const DEMO: &str = "\
int 1
int 2
pair
int 3
int 4
pair
pair
int 5
int 7
gc
";

pub struct Interpreter {
    vm: Vm,
    sources: utils::io::SourceManager,
    verbose: bool,
    debug: bool,
}

impl Interpreter {
    pub fn new(config: VmConfig, verbose: bool, debug: bool) -> Self {
        Self {
            vm: Vm::new(config),
            sources: utils::io::SourceManager::new(),
            verbose,
            debug,
        }
    }

    pub fn vm(&self) -> &Vm {
        &self.vm
    }

    pub fn vm_mut(&mut self) -> &mut Vm {
        &mut self.vm
    }

    pub fn sources(&self) -> &utils::io::SourceManager {
        &self.sources
    }

    fn run(&mut self, source_id: u32) -> Result<(), error::Error> {
        let mut start = Instant::now();

        let program = match self.sources.get_source(source_id) {
            Some(src) => Parser::new(&mut Lexer::new(src)).parse()?,
            None => unreachable!("source {} was loaded before running", source_id),
        };
        if self.verbose {
            println!(
                "[{}] Parsing took: {} microseconds, {} instructions",
                "verbose".purple(),
                start.elapsed().as_micros(),
                program.len()
            );
        }

        if self.debug {
            print!("[{}]\n{}", "debug".red(), program);
        }

        start = Instant::now();
        let result = self.execute(&program);
        if self.verbose {
            println!(
                "[{}] Execution took: {} microseconds, {} objects live, {} roots",
                "verbose".purple(),
                start.elapsed().as_micros(),
                self.vm.heap().count(),
                self.vm.stack().len()
            );
        }

        result
    }

    fn execute(&mut self, program: &Program) -> Result<(), error::Error> {
        for (addr, ins) in program.ins().iter().enumerate() {
            self.step(*ins)
                .map_err(|e| e.with_pos(program.get_pos(addr)))?;
        }
        Ok(())
    }

    fn step(&mut self, ins: Ins) -> Result<(), error::Error> {
        log::trace!("exec {:?}", ins);

        match ins {
            Ins::Int(v) => self.vm.push_int(v).map(drop),
            Ins::Pair => self.vm.push_pair().map(drop),
            Ins::Pop => self.vm.pop().map(drop),
            Ins::Dup => self.vm.dup().map(drop),
            Ins::SetFirst => self.vm.set_first(),
            Ins::SetSecond => self.vm.set_second(),
            Ins::Clear => {
                self.vm.clear_roots();
                Ok(())
            }
            Ins::Gc => {
                self.vm.collect();
                Ok(())
            }
            Ins::Print => self
                .vm
                .peek()
                .and_then(|top| self.vm.render(top))
                .map(|text| println!("{}", text)),
            Ins::Dump => {
                self.vm.heap().dump();
                Ok(())
            }
        }
    }

    pub fn execute_from_file(&mut self, file_path: &str) -> Result<(), error::Error> {
        self.sources
            .load_source_file(file_path)
            .map(|src| src.id())
            .and_then(|src_id| self.run(src_id))
    }

    pub fn execute_from_string(&mut self, source: &str) -> Result<(), error::Error> {
        self.sources
            .load_source_string(source)
            .map(|src| src.id())
            .and_then(|src_id| self.run(src_id))
    }

    pub fn run_demo(&mut self) -> Result<(), error::Error> {
        self.execute_from_string(DEMO)
    }

    pub fn repl(&mut self) {
        println!(
            "Welcome to the gcvm REPL. Enter instructions (int <n>, pair, pop, dup, setfst, \
             setsnd, clear, gc, print, dump) separated by ';' or newlines. Type 'exit' to \
             leave."
        );

        let mut input = String::new();
        loop {
            print!(">> ");
            let _ = io::stdout().flush();

            input.clear();
            match io::stdin().read_line(&mut input) {
                Ok(0) => break,
                Ok(_) => {}
                Err(e) => {
                    eprintln!("Failed to read from standard input: {}", e);
                    break;
                }
            }

            match input.trim() {
                "exit" => {
                    println!("Closing REPL session. Goodbye :)");
                    break;
                }
                line => {
                    if let Err(e) = self.execute_from_string(line) {
                        e.dump_error(&self.sources)
                    }
                }
            }
        }
    }

    pub fn shutdown(self) -> CollectStats {
        self.vm.shutdown()
    }
}
