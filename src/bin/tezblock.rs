#![forbid(unsafe_code)]
//! Inspect blocks of a Tezos node from the command line

use clap::{ArgGroup, Parser, Subcommand};
use colored::*;
use comfy_table::presets::UTF8_FULL;
use comfy_table::Color as TableColor;
use comfy_table::{Attribute, Cell, ContentArrangement, Table};
use tezblock::block::Block;
use tezblock::block_id::BlockId;
use tezblock::config::{load_config, DEFAULT_CONFIG_PATH};
use tezblock::operation::{Contents, OperationStatus};
use tezblock::{logging, Client};
use tracing::info;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Path to the configuration file
    #[arg(long, default_value = DEFAULT_CONFIG_PATH)]
    config: String,
    /// Node RPC URL, overrides node.url from the configuration
    #[arg(long)]
    node: Option<String>,
    /// Print the decoded response as JSON instead of tables
    #[arg(long)]
    json: bool,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Shows the current head block
    Head,
    /// Shows one block by level or hash
    #[command(group(ArgGroup::new("id").required(true).args(["level", "hash"])))]
    Block {
        #[arg(long)]
        level: Option<i64>,
        #[arg(long)]
        hash: Option<String>,
    },
    /// Lists the operation hashes of a block
    OperationHashes {
        /// Block hash
        hash: String,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let mut config = load_config(&cli.config)?;
    if let Some(node) = cli.node {
        config.node.url = node;
        config.validate()?;
    }

    logging::init(&config.logging.level);
    info!("Using node {}", config.node.url);

    let client = Client::from_config(&config.node)?;

    match cli.command {
        Commands::Head => {
            let block = client.head_block().await?;
            show_block(&block, cli.json)?;
        }
        Commands::Block { level, hash } => {
            let id = match (level, hash) {
                (Some(level), _) => BlockId::Level(level),
                (None, Some(hash)) => BlockId::Hash(hash),
                (None, None) => return Err("either --level or --hash is required".into()),
            };
            let block = client.block(id).await?;
            show_block(&block, cli.json)?;
        }
        Commands::OperationHashes { hash } => {
            let hashes = client.operation_hashes(&hash).await?;
            if cli.json {
                println!("{}", serde_json::to_string_pretty(&hashes)?);
            } else {
                println!("{}", format!("📜 {} operations in {}", hashes.len(), hash).bright_cyan());
                for (i, op) in hashes.iter().enumerate() {
                    println!("{:>5}  {}", i, op);
                }
            }
        }
    }

    Ok(())
}

fn show_block(block: &Block, json: bool) -> Result<(), Box<dyn std::error::Error>> {
    if json {
        println!("{}", serde_json::to_string_pretty(block)?);
        return Ok(());
    }

    println!(
        "{}",
        format!("🧱 Block {} ({})", block.header.level, block.hash)
            .bright_cyan()
            .bold()
    );
    println!();

    let metadata = &block.metadata;
    let mut header = Table::new();
    header
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic);
    let rows = [
        ("Level", block.header.level.to_string()),
        ("Hash", block.hash.clone()),
        ("Predecessor", block.header.predecessor.clone()),
        ("Timestamp", block.header.timestamp.to_rfc3339()),
        ("Protocol", block.protocol.clone()),
        ("Baker", metadata.baker.clone().unwrap_or_else(|| "-".into())),
        (
            "Cycle",
            metadata
                .level
                .as_ref()
                .map(|l| format!("{} (position {})", l.cycle, l.cycle_position))
                .unwrap_or_else(|| "-".into()),
        ),
        (
            "Priority",
            block
                .header
                .priority
                .map(|p| p.to_string())
                .unwrap_or_else(|| "-".into()),
        ),
        (
            "Consumed gas",
            metadata
                .consumed_gas
                .as_ref()
                .map(|g| g.to_string())
                .unwrap_or_else(|| "-".into()),
        ),
    ];
    for (name, value) in rows {
        header.add_row(vec![
            Cell::new(name).fg(TableColor::Cyan).add_attribute(Attribute::Bold),
            Cell::new(value).fg(TableColor::White),
        ]);
    }
    println!("{}", header);
    println!();

    let mut ops = Table::new();
    ops.load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(
            ["Pass", "Operation", "Kind", "Source", "Fee", "Detail", "Status"]
                .into_iter()
                .map(|h| Cell::new(h).fg(TableColor::Cyan).add_attribute(Attribute::Bold))
                .collect::<Vec<_>>(),
        );

    let mut count = 0usize;
    for (pass, groups) in block.operations.iter().enumerate() {
        for group in groups {
            for contents in &group.contents {
                count += 1;
                let (status, color) = match contents.operation_result().map(|r| r.status) {
                    Some(OperationStatus::Applied) => ("applied".to_string(), TableColor::Green),
                    Some(other) => (other.to_string(), TableColor::Red),
                    None => ("-".to_string(), TableColor::Grey),
                };
                ops.add_row(vec![
                    Cell::new(pass).fg(TableColor::White),
                    Cell::new(shorten(&group.hash)).fg(TableColor::White),
                    Cell::new(contents.kind()).fg(TableColor::Yellow),
                    Cell::new(contents.source().map(shorten).unwrap_or_default()),
                    Cell::new(contents.fee().map(|f| f.to_string()).unwrap_or_default()),
                    Cell::new(detail(contents)),
                    Cell::new(status).fg(color),
                ]);
            }
        }
    }

    if count == 0 {
        println!("{}", "📭 No operations in this block".yellow());
    } else {
        println!("{}", ops);
        println!("{}", format!("📝 {} operation contents", count).blue());
    }
    println!();

    Ok(())
}

fn detail(contents: &Contents) -> String {
    match contents {
        Contents::Transaction(tx) => format!("{} → {}", tx.amount, shorten(&tx.destination)),
        Contents::Origination(op) => format!("balance {}", op.balance),
        Contents::Delegation(op) => match &op.delegate {
            Some(delegate) => format!("to {}", shorten(delegate)),
            None => "withdraw".to_string(),
        },
        Contents::Reveal(op) => shorten(&op.public_key),
        Contents::Endorsement(op) => format!("level {}", op.level),
        Contents::EndorsementWithSlot(op) => format!("slot {}", op.slot),
        Contents::SeedNonceRevelation(op) => format!("level {}", op.level),
        Contents::ActivateAccount(op) => shorten(&op.pkh),
        Contents::Proposals(op) => format!("{} proposal(s), period {}", op.proposals.len(), op.period),
        Contents::Ballot(op) => format!("{:?} on {}", op.ballot, shorten(&op.proposal)),
        Contents::SetDepositsLimit(op) => op
            .limit
            .as_ref()
            .map(|l| format!("limit {}", l))
            .unwrap_or_else(|| "no limit".to_string()),
        Contents::DoubleEndorsementEvidence(_)
        | Contents::DoubleBakingEvidence(_)
        | Contents::FailingNoop(_)
        | Contents::RegisterGlobalConstant(_) => String::new(),
    }
}

fn shorten(text: &str) -> String {
    let count = text.chars().count();
    if count > 20 {
        let head: String = text.chars().take(8).collect();
        let tail: String = text.chars().skip(count - 8).collect();
        format!("{}...{}", head, tail)
    } else {
        text.to_string()
    }
}
