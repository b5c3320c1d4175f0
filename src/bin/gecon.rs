use anyhow::Result;
use clap::{Args, Parser, Subcommand, ValueEnum};
use gecon::storage;
use gecon::{Client, ClientConfig, Frequency, Period, UriOptions};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "gecon",
    version,
    about = "Query, tabulate & store Global Economy indicators"
)]
struct Cli {
    /// Directory with credentials.yml, country-code.csv and the indicator tables
    #[arg(long, global = true, default_value = "cfg")]
    cfg: PathBuf,
    /// Export endpoint
    #[arg(long, global = true, default_value = gecon::config::DEFAULT_ROOT)]
    root: String,
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Fetch data (and optionally save it).
    Get(GetArgs),
    /// Print the request URI without sending it.
    Uri(QueryArgs),
    /// Regenerate the indicator lookup table by probing the API.
    Bootstrap(BootstrapArgs),
    /// List known indicators.
    Indicators(IndicatorArgs),
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum FrequencyArg {
    Annual,
    #[value(alias = "quarterly")]
    Monthly,
}

impl From<FrequencyArg> for Frequency {
    fn from(f: FrequencyArg) -> Self {
        match f {
            FrequencyArg::Annual => Frequency::Annual,
            FrequencyArg::Monthly => Frequency::SubAnnual,
        }
    }
}

#[derive(ValueEnum, Clone, Debug)]
enum OutFormat {
    Csv,
    Json,
}

#[derive(Args, Debug)]
struct QueryArgs {
    /// Country codes separated by comma or semicolon (e.g., IN,CHN)
    #[arg(short, long)]
    countries: String,
    /// Frequency class of the indicators
    #[arg(short, long, value_enum, default_value_t = FrequencyArg::Annual)]
    frequency: FrequencyArg,
    /// Indicator names separated by semicolon (names may contain commas)
    #[arg(short, long, conflicts_with = "indexes")]
    indicators: Option<String>,
    /// Vendor indicator indexes separated by comma or semicolon
    #[arg(long)]
    indexes: Option<String>,
    /// latest, YYYY or YYYY:YYYY (overrides --start/--end)
    #[arg(short, long, value_parser = parse_period)]
    period: Option<Period>,
    /// First year (default 1960)
    #[arg(long)]
    start: Option<i32>,
    /// Last year (default: current year)
    #[arg(long)]
    end: Option<i32>,
}

#[derive(Args, Debug)]
struct GetArgs {
    #[command(flatten)]
    query: QueryArgs,
    /// Save results to file (format inferred by --format or extension).
    #[arg(long)]
    out: Option<PathBuf>,
    /// Output format (csv or json). If omitted, inferred from --out extension.
    #[arg(long, value_enum)]
    format: Option<OutFormat>,
}

#[derive(Args, Debug)]
struct BootstrapArgs {
    #[arg(short, long, value_enum)]
    frequency: FrequencyArg,
    /// Exclusive upper bound of the probed indexes
    #[arg(long, default_value_t = 2000)]
    max_index: u32,
}

#[derive(Args, Debug)]
struct IndicatorArgs {
    #[arg(short, long, value_enum, default_value_t = FrequencyArg::Annual)]
    frequency: FrequencyArg,
    /// Case-insensitive substring filter on names
    #[arg(long)]
    filter: Option<String>,
}

fn parse_period(s: &str) -> Result<Period, String> {
    s.parse()
}

fn parse_list(s: &str, seps: &[char]) -> Vec<String> {
    s.split(seps)
        .map(|x| x.trim().to_string())
        .filter(|x| !x.is_empty())
        .collect()
}

fn fmt_opt(v: Option<f64>) -> String {
    match v {
        Some(x) if x.is_finite() => {
            // Format up to 4 decimals, then trim trailing zeros and trailing dot.
            let s = format!("{:.4}", x);
            s.trim_end_matches('0').trim_end_matches('.').to_string()
        }
        _ => "NA".to_string(),
    }
}

impl QueryArgs {
    fn options(&self) -> Result<UriOptions> {
        let mut opts = UriOptions {
            period: self.period,
            start_year: self.start,
            end_year: self.end,
            ..UriOptions::default()
        };
        if let Some(names) = &self.indicators {
            opts.indicator_names = Some(parse_list(names, &[';']));
        }
        if let Some(idx) = &self.indexes {
            let parsed = parse_list(idx, &[',', ';'])
                .iter()
                .map(|s| s.parse::<u32>())
                .collect::<Result<Vec<_>, _>>()
                .map_err(|e| anyhow::anyhow!("invalid --indexes: {e}"))?;
            opts.indicator_indexes = Some(parsed);
        }
        Ok(opts)
    }

    fn countries(&self) -> Vec<String> {
        parse_list(&self.countries, &[',', ';'])
    }
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    let config = ClientConfig {
        root: cli.root,
        ..ClientConfig::with_cfg_dir(cli.cfg)
    };
    // bootstrap builds the indicator tables itself; opening normally would
    // first probe every missing table over the full default range
    let client = match cli.cmd {
        Command::Bootstrap(_) => Client::open_without_indicators(config)?,
        _ => Client::open(config)?,
    };
    match cli.cmd {
        Command::Get(args) => cmd_get(&client, args),
        Command::Uri(args) => cmd_uri(&client, args),
        Command::Bootstrap(args) => cmd_bootstrap(&client, args),
        Command::Indicators(args) => cmd_indicators(&client, args),
    }
}

fn cmd_uri(client: &Client, args: QueryArgs) -> Result<()> {
    let uri = client.build_uri(&args.countries(), args.frequency.into(), &args.options()?)?;
    println!("{uri}");
    Ok(())
}

fn cmd_get(client: &Client, args: GetArgs) -> Result<()> {
    let opts = args.query.options()?;
    let Some(records) = client.query(&args.query.countries(), args.query.frequency.into(), &opts)
    else {
        anyhow::bail!("no data returned (see log for details)");
    };

    match args.out.as_ref() {
        Some(path) => {
            let fmt = match args.format {
                Some(OutFormat::Csv) => "csv",
                Some(OutFormat::Json) => "json",
                None => path.extension().and_then(|e| e.to_str()).unwrap_or("csv"),
            }
            .to_ascii_lowercase();
            match fmt.as_str() {
                "csv" => storage::save_csv(&records, path)?,
                "json" => storage::save_json(&records, path)?,
                other => anyhow::bail!("unsupported format: {}", other),
            }
            eprintln!("Saved {} rows to {}", records.len(), path.display());
        }
        None => {
            for r in &records {
                println!("{}\t{}\t{}\t{}", r.id, r.date, r.indicator, fmt_opt(r.value));
            }
        }
    }
    Ok(())
}

fn cmd_bootstrap(client: &Client, args: BootstrapArgs) -> Result<()> {
    let frequency: Frequency = args.frequency.into();
    let table = client.bootstrap(frequency, args.max_index)?;
    eprintln!(
        "Wrote {} {} indicators to {}",
        table.len(),
        frequency,
        client.config().indicator_table_path(frequency).display()
    );
    Ok(())
}

fn cmd_indicators(client: &Client, args: IndicatorArgs) -> Result<()> {
    let table = client.catalog().indicators(args.frequency.into());
    let needle = args.filter.unwrap_or_default();
    for e in table.search(&needle) {
        println!("{}\t{}", e.index, e.name);
    }
    Ok(())
}
