use std::fs;

use anyhow::{Context, Result};
use clap::Parser;
use colored::Colorize;
use serde::Deserialize;

use conf_tree_core::{parse_file, ConfigStore, DocumentStore};
use dhcp_reconcile::age::format_age;
use dhcp_reconcile::apply::{apply_changes, PlanExecutor};
use dhcp_reconcile::certs::{eligible_client_certs, eligible_server_certs, DocumentCerts};
use dhcp_reconcile::defaults::{default_value, heartbeat_delay_ms, DefaultKey};
use dhcp_reconcile::family::Family;
use dhcp_reconcile::reconcile::reconcile;
use dhcp_reconcile::settings::{DhcpSettings, RawSettingsInput};
use dhcp_reconcile::status::{classify, HaHealth, HaScope, PeerHealth};
use dhcp_reconcile::subnets::service_interfaces;

mod cli;

use cli::{
    ApplyArgs, CertsArgs, Cli, Command, DefaultsArgs, OutputFormat, ReconcileArgs, StatusArgs,
    SubnetsArgs,
};

fn main() -> Result<()> {
    let cli = Cli::parse();

    let code = match cli.command {
        Command::Reconcile(args) => run_reconcile(args)?,
        Command::Apply(args) => run_apply(args)?,
        Command::Subnets(args) => run_subnets(args)?,
        Command::Status(args) => run_status(args)?,
        Command::Certs(args) => run_certs(args)?,
        Command::Defaults(args) => run_defaults(args)?,
    };
    if code != 0 {
        std::process::exit(code);
    }
    Ok(())
}

fn load_store(path: &std::path::Path) -> Result<DocumentStore> {
    let root =
        parse_file(path).with_context(|| format!("failed to parse {}", path.display()))?;
    Ok(DocumentStore::new(root))
}

fn run_reconcile(args: ReconcileArgs) -> Result<i32> {
    let mut store = load_store(&args.config)?;
    if let Some(output) = &args.output {
        store = store.with_backing(output);
    }
    let family: Family = args.family.into();

    let raw = fs::read_to_string(&args.input)
        .with_context(|| format!("failed to read {}", args.input.display()))?;
    let input: RawSettingsInput = serde_json::from_str(&raw)
        .with_context(|| format!("invalid settings input in {}", args.input.display()))?;

    let current_enabled = service_interfaces(&store, family).enabled;
    let outcome = reconcile(&mut store, family, &current_enabled, &input)?;

    if !outcome.issues.is_empty() {
        eprintln!("{}", "input did not validate:".red());
        for issue in &outcome.issues {
            eprintln!("  {}", issue.message.red());
        }
        return Ok(1);
    }

    println!(
        "reconcile family={family} changed={} need_sync={}",
        outcome.changed, outcome.need_sync
    );
    for subsystem in store.dirty_subsystems() {
        println!("dirty: {subsystem}");
    }
    if outcome.changed && args.output.is_none() {
        println!("{}", "dry run: no output file given, nothing written".yellow());
    }
    Ok(0)
}

fn run_apply(args: ApplyArgs) -> Result<i32> {
    let mut store = load_store(&args.config)?;
    let family: Family = args.family.into();

    let mut executor = PlanExecutor::default();
    let code = apply_changes(&mut store, &mut executor, family);
    for action in &executor.actions {
        println!("plan: {action}");
    }
    if code == 0 {
        println!("{}", "apply plan complete".green());
    } else {
        eprintln!("{}", "apply failed".red());
    }
    Ok(code)
}

fn run_subnets(args: SubnetsArgs) -> Result<i32> {
    let store = load_store(&args.config)?;
    let family: Family = args.family.into();
    let list = service_interfaces(&store, family);

    match args.format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&list)?),
        OutputFormat::Text => {
            for iface in &list.available {
                if list.enabled.contains(&iface.id) {
                    println!("{} {}", iface.label, "[enabled]".green());
                } else {
                    println!("{}", iface.label);
                }
            }
        }
    }
    Ok(0)
}

/// Liveness snapshot for both peers, read from a live HA status query.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct PeerReport {
    local: PeerHealth,
    remote: PeerHealth,
}

fn run_status(args: StatusArgs) -> Result<i32> {
    let store = load_store(&args.config)?;
    let family: Family = args.family.into();

    let raw = fs::read_to_string(&args.peer)
        .with_context(|| format!("failed to read {}", args.peer.display()))?;
    let report: PeerReport = serde_json::from_str(&raw)
        .with_context(|| format!("invalid peer snapshot in {}", args.peer.display()))?;

    let settings = DhcpSettings::decode(store.node(family.settings_path()));
    let heartbeat_ms = settings
        .ha
        .tuning
        .heartbeat_delay
        .as_deref()
        .and_then(|v| v.parse::<u64>().ok())
        .unwrap_or_else(heartbeat_delay_ms);

    for (scope, name, peer) in [
        (HaScope::Local, "local", &report.local),
        (HaScope::Remote, "remote", &report.remote),
    ] {
        let health = classify(scope, peer, heartbeat_ms);
        let label = match health {
            HaHealth::Online => health.label().green(),
            HaHealth::Interrupted => health.label().yellow(),
            HaHealth::Offline => health.label().red(),
        };
        println!("{name}: {label}, last heartbeat {}", format_age(peer.age));
    }
    Ok(0)
}

fn run_certs(args: CertsArgs) -> Result<i32> {
    let store = load_store(&args.config)?;
    let dir = DocumentCerts::new(&store);

    println!("server certificates:");
    for cert in eligible_server_certs(&dir) {
        println!("  {} ({})", cert.descr, cert.refid);
    }
    println!("client certificates:");
    for cert in eligible_client_certs(&dir) {
        println!("  {} ({})", cert.descr, cert.refid);
    }
    Ok(0)
}

fn run_defaults(args: DefaultsArgs) -> Result<i32> {
    let store = load_store(&args.config)?;
    for key in DefaultKey::all() {
        println!("{} = {}", key.as_str(), default_value(&store, key));
    }
    Ok(0)
}
