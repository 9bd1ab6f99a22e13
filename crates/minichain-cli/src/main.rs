//! Interactive driver for the minichain ledger.

use anyhow::Result;
use clap::Parser;
use minichain_core::{chain::Chain, Block};
use std::io::{self, BufRead, Lines, StdinLock, Write};
use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};

#[derive(Parser, Debug)]
#[command(name = "minichain")]
#[command(about = "Interactive two-party proof-of-work ledger")]
struct Cli {
    /// Opening amount for the ledger (non-negative)
    #[arg(value_parser = clap::value_parser!(i32).range(0..))]
    amount: i32,
}

fn prompt(label: &str) -> Result<()> {
    print!("{label}");
    io::stdout().flush()?;
    Ok(())
}

/// Prompts for a value and parses the next input line. Returns `None` on
/// end of input or when the line does not parse (reported, non-fatal).
fn read_value<T: std::str::FromStr>(
    lines: &mut Lines<StdinLock<'_>>,
    label: &str,
) -> Result<Option<T>> {
    prompt(label)?;
    let Some(line) = lines.next() else {
        return Ok(None);
    };
    match line?.trim().parse() {
        Ok(value) => Ok(Some(value)),
        Err(_) => {
            println!("That is not a number.");
            Ok(None)
        }
    }
}

/// Mines a candidate block for a requested amount and reports its nonce
/// without appending it.
fn mine_block(chain: &Chain, lines: &mut Lines<StdinLock<'_>>) -> Result<()> {
    let Some(amount) = read_value::<i32>(lines, "Amount transferred? ")? else {
        return Ok(());
    };
    let block = chain.mine(amount);
    println!("amount = {}, nonce = {}", amount, block.nonce());
    Ok(())
}

/// Builds a block from a requested amount and a previously discovered
/// nonce, then appends it to the chain.
fn append_block(chain: &mut Chain, lines: &mut Lines<StdinLock<'_>>) -> Result<()> {
    let Some(amount) = read_value::<i32>(lines, "Amount transferred? ")? else {
        return Ok(());
    };
    let Some(nonce) = read_value::<u64>(lines, "Nonce? ")? else {
        return Ok(());
    };
    let block = Block::with_nonce(chain.size() as u32, amount, Some(*chain.tip_hash()), nonce);
    match chain.append(block) {
        Ok(()) => info!("appended block {}", chain.size() - 1),
        Err(e) => println!("Cannot append: {e}"),
    }
    Ok(())
}

fn list_commands() {
    println!("Valid commands: ");
    println!("\tmine: discovers the nonce for a given transaction ");
    println!("\tappend: appends a new block onto the end of the chain ");
    println!("\tremove: removes the last block from the end of the chain ");
    println!("\tcheck: checks that the block chain is valid ");
    println!("\treport: reports the balances of Alice and Bob ");
    println!("\thelp: prints this list of commands ");
    println!("\tquit: quits the program ");
}

fn main() -> Result<()> {
    fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();
    let mut chain = Chain::new(cli.amount);

    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();
    loop {
        print!("{chain}");
        prompt("Command? ")?;
        let Some(line) = lines.next() else {
            break;
        };
        match line?.trim() {
            "mine" => mine_block(&chain, &mut lines)?,
            "append" => append_block(&mut chain, &mut lines)?,
            "remove" => {
                if !chain.remove_last() {
                    println!("The genesis block cannot be removed.");
                }
            }
            "check" => {
                if chain.is_valid() {
                    println!("Chain is valid!");
                } else {
                    println!("Chain is invalid!");
                }
            }
            "report" => {
                let (alice, bob) = chain.balances();
                println!("Alice: {alice}, Bob: {bob}");
            }
            "help" => list_commands(),
            "quit" => break,
            _ => println!("Invalid input. Please use the help command to find valid inputs."),
        }
        println!();
    }
    Ok(())
}
