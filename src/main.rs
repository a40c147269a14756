//! MIX Emulator - CLI Entry Point
//!
//! Commands:
//! - `mix-emu run <deck>` - Run a deck and print the machine state
//! - `mix-emu asm <text>...` - Encode mnemonic instructions as plain cells
//! - `mix-emu disasm <cell>...` - Render plain cells as mnemonic instructions

use clap::{Parser, Subcommand};
use log::LevelFilter;
use mix::{Cell, Deck, Machine, Registers};
use serde::Serialize;

#[derive(Parser)]
#[command(name = "mix-emu")]
#[command(version = "0.1.0")]
#[command(about = "An emulator of the load/store core of Knuth's MIX computer")]
struct Cli {
    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a deck and print the resulting registers
    Run {
        /// Path to the deck file
        deck: String,
        /// Print the report as JSON
        #[arg(long)]
        json: bool,
        /// Memory to include in the report, as START or START..END
        #[arg(short, long, value_parser = parse_range)]
        dump: Option<(usize, usize)>,
    },
    /// Encode mnemonic instructions, e.g. "STA 1200(2:3)"
    Asm {
        /// Instruction texts
        #[arg(required = true)]
        text: Vec<String>,
    },
    /// Render plain cells, e.g. "+ 18 48 00 19 24"
    Disasm {
        /// Cell texts
        #[arg(required = true)]
        cells: Vec<String>,
    },
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Commands::Run { deck, json, dump } => run_deck(&deck, json, dump),
        Commands::Asm { text } => assemble(&text),
        Commands::Disasm { cells } => disassemble(&cells),
    }
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        2 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    };
    // RUST_LOG still overrides the flag
    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .init();
}

/// Parse `START` or `START..END` (END exclusive).
fn parse_range(s: &str) -> Result<(usize, usize), String> {
    let parse = |t: &str| {
        t.trim()
            .parse::<usize>()
            .map_err(|_| format!("invalid address {:?}", t))
    };
    match s.split_once("..") {
        Some((start, end)) => {
            let (start, end) = (parse(start)?, parse(end)?);
            if end < start {
                return Err(format!("empty range {}..{}", start, end));
            }
            Ok((start, end - start))
        }
        None => Ok((parse(s)?, 1)),
    }
}

#[derive(Serialize)]
struct Report<'a> {
    executed: usize,
    registers: &'a Registers,
    memory: Vec<DumpedCell>,
}

#[derive(Serialize)]
struct DumpedCell {
    address: usize,
    cell: Cell,
    text: String,
}

fn run_deck(path: &str, json: bool, dump: Option<(usize, usize)>) {
    let source = match std::fs::read_to_string(path) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("❌ Failed to read {}: {}", path, e);
            std::process::exit(1);
        }
    };

    let deck = match Deck::parse(&source) {
        Ok(deck) => deck,
        Err(e) => {
            eprintln!("❌ {}: {}", path, e);
            std::process::exit(1);
        }
    };
    log::info!("loaded {} steps from {}", deck.len(), path);

    let mut machine = Machine::new();
    let executed = match deck.run(&mut machine) {
        Ok(n) => n,
        Err(e) => {
            eprintln!("❌ {}: {}", path, e);
            std::process::exit(1);
        }
    };

    let memory: Vec<DumpedCell> = dump
        .map(|(start, count)| machine.dump(start, count))
        .unwrap_or_default()
        .into_iter()
        .map(|(address, cell)| DumpedCell { address, cell, text: cell.to_string() })
        .collect();

    if json {
        let report = Report { executed, registers: machine.registers(), memory };
        match serde_json::to_string_pretty(&report) {
            Ok(text) => println!("{}", text),
            Err(e) => {
                eprintln!("❌ Failed to encode report: {}", e);
                std::process::exit(1);
            }
        }
        return;
    }

    let regs = machine.registers();
    println!("━━━ Result ━━━");
    println!("Executed: {}", executed);
    println!("A:  {}", regs.a);
    println!("X:  {}", regs.x);
    for (n, index) in regs.i.iter().enumerate() {
        println!("I{}: {}", n + 1, index);
    }
    println!("Overflow:   {}", regs.overflow);
    println!("Comparison: {:?}", regs.comparison);

    if !memory.is_empty() {
        println!();
        println!("━━━ Memory ━━━");
        for dumped in &memory {
            println!("{:04}: {}", dumped.address, dumped.text);
        }
    }
}

fn assemble(lines: &[String]) {
    let mut failed = false;
    for line in lines {
        match mix::parse_instruction(line) {
            Ok(cell) => println!("{}", cell),
            Err(e) => {
                eprintln!("❌ {:?}: {}", line, e);
                failed = true;
            }
        }
    }
    if failed {
        std::process::exit(1);
    }
}

fn disassemble(cells: &[String]) {
    let mut failed = false;
    for text in cells {
        match text.parse::<Cell>() {
            Ok(cell) => println!("{}", mix::render_instruction(&cell)),
            Err(e) => {
                eprintln!("❌ {:?}: {}", text, e);
                failed = true;
            }
        }
    }
    if failed {
        std::process::exit(1);
    }
}
