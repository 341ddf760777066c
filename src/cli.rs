use anyhow::{bail, Context, Result};

use crate::config::Settings;

#[derive(Debug, Default, PartialEq, Eq)]
pub struct CliArgs {
    pub help: bool,
    /// Destination space, as a 1-based menu number or a space name.
    pub to: Option<String>,
    pub yes: bool,
    pub dry_run: bool,
    pub keep_going: bool,
    pub no_journal: bool,
    pub page_size: Option<usize>,
    pub host: Option<String>,
}

impl CliArgs {
    /// Flags win over the environment and the config file.
    pub fn apply(&self, settings: &mut Settings) {
        if let Some(host) = &self.host {
            settings.host = host.clone();
        }
        if let Some(page_size) = self.page_size {
            settings.page_size = page_size;
        }
        if self.keep_going {
            settings.keep_going = true;
        }
        if self.no_journal {
            settings.journal = false;
        }
    }
}

/// Parse `kite-consolidate` arguments.
///
/// Supported forms:
///   kite-consolidate
///   kite-consolidate --to 2 --yes
///   kite-consolidate --to "Engineering" --dry-run
///   kite-consolidate --keep-going --page-size 100
pub fn parse_args(args: &[String]) -> Result<CliArgs> {
    let mut parsed = CliArgs::default();
    let mut i = 0;

    while i < args.len() {
        match args[i].as_str() {
            "-h" | "--help" => parsed.help = true,
            "-y" | "--yes" => parsed.yes = true,
            "--dry-run" => parsed.dry_run = true,
            "--keep-going" => parsed.keep_going = true,
            "--no-journal" => parsed.no_journal = true,
            "--to" => {
                parsed.to = Some(value_for(args, &mut i, "--to")?.to_string());
            }
            "--host" => {
                parsed.host = Some(value_for(args, &mut i, "--host")?.to_string());
            }
            "--page-size" => {
                let raw = value_for(args, &mut i, "--page-size")?;
                let size: usize = raw
                    .parse()
                    .with_context(|| format!("Invalid page size: {raw}"))?;
                if size == 0 {
                    bail!("Page size must be at least 1");
                }
                parsed.page_size = Some(size);
            }
            other => bail!("Unknown argument: {other}\n\nRun with --help for usage."),
        }
        i += 1;
    }

    Ok(parsed)
}

fn value_for<'a>(args: &'a [String], i: &mut usize, flag: &str) -> Result<&'a str> {
    *i += 1;
    match args.get(*i) {
        Some(value) => Ok(value.as_str()),
        None => bail!("Missing value for {flag} flag"),
    }
}

pub fn print_help() {
    println!("kite-consolidate — move every work item into a single Kitemaker space\n");
    println!("USAGE:");
    println!("  kite-consolidate [OPTIONS]");
    println!();
    println!("OPTIONS:");
    println!("  --to <n|name>      Destination space (skips the selection prompt)");
    println!("  -y, --yes          Do not ask for confirmation");
    println!("  --dry-run          Show what would be moved without changing anything");
    println!("  --keep-going       Record failed work items and continue");
    println!("  --page-size <n>    Work items requested per page (default 50)");
    println!("  --host <url>       Kitemaker host (default https://toil.kitemaker.co)");
    println!("  --no-journal       Do not write a run journal");
    println!("  -h, --help         Show this help");
    println!();
    println!("ENVIRONMENT:");
    println!("  KITEMAKER_TOKEN    API token (required unless set in config.toml)");
    println!("  KITEMAKER_HOST     Kitemaker host override");
    println!("  RUST_LOG           Log filter (default info)");
}
