use std::path::PathBuf;

use clap::{Parser, ValueEnum};

use dhcp_reconcile::family::Family;

#[derive(Parser, Debug)]
#[command(name = "dhcp-reconcile")]
#[command(about = "Reconcile and apply DHCP service settings")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(clap::Subcommand, Debug)]
pub enum Command {
    /// Merge raw settings input into a configuration document.
    Reconcile(ReconcileArgs),
    /// Show which downstream configure operations an apply pass would run.
    Apply(ApplyArgs),
    /// List interfaces eligible and enabled for DHCP service.
    Subnets(SubnetsArgs),
    /// Classify HA peer health from a live status snapshot.
    Status(StatusArgs),
    /// List certificates eligible for the HA peer link.
    Certs(CertsArgs),
    /// Show the HA tuning defaults and local identity name.
    Defaults(DefaultsArgs),
}

#[derive(ValueEnum, Clone, Copy, Debug)]
pub enum FamilyArg {
    V4,
    V6,
}

impl From<FamilyArg> for Family {
    fn from(arg: FamilyArg) -> Self {
        match arg {
            FamilyArg::V4 => Family::V4,
            FamilyArg::V6 => Family::V6,
        }
    }
}

#[derive(ValueEnum, Clone, Copy, Debug)]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(Parser, Debug)]
pub struct ReconcileArgs {
    /// Configuration document to reconcile against.
    pub config: PathBuf,
    #[arg(long, value_enum)]
    pub family: FamilyArg,
    /// Raw settings input as JSON.
    #[arg(long)]
    pub input: PathBuf,
    /// Where to write the updated document; omit for a dry run.
    #[arg(long)]
    pub output: Option<PathBuf>,
}

#[derive(Parser, Debug)]
pub struct ApplyArgs {
    pub config: PathBuf,
    #[arg(long, value_enum)]
    pub family: FamilyArg,
}

#[derive(Parser, Debug)]
pub struct SubnetsArgs {
    pub config: PathBuf,
    #[arg(long, value_enum)]
    pub family: FamilyArg,
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,
}

#[derive(Parser, Debug)]
pub struct StatusArgs {
    pub config: PathBuf,
    #[arg(long, value_enum)]
    pub family: FamilyArg,
    /// Peer health snapshot as JSON, read fresh from the running subsystem.
    #[arg(long)]
    pub peer: PathBuf,
}

#[derive(Parser, Debug)]
pub struct CertsArgs {
    pub config: PathBuf,
}

#[derive(Parser, Debug)]
pub struct DefaultsArgs {
    pub config: PathBuf,
}
