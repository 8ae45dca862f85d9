use anyhow::Context;
use docopt::Docopt;
use env_logger::Env;
use serde::Deserialize;
use vanet::report::CsvReport;
use vanet::{analyse_path, Config, Delimiter};

const USAGE: &str = "
Per-step neighbor distance statistics for VANET connectivity logs.

Usage:
    vanet steps [options] <infile>
    vanet info [options] <infile>
    vanet (-h | --help)

Options:
    -h --help            Show this screen.
    --from-ns3           Neighbors are MAC addresses, resolve them into vehicles.
    --csv=<outfile>      Also write per-step statistics as CSV.
    --delimiter=<delim>  Field delimiter, or \"ws\" for whitespace [default: ,].
    --lenient            Skip malformed lines and unresolvable neighbors.
";

#[derive(Debug, Deserialize)]
struct Args {
    cmd_steps: bool,
    cmd_info: bool,
    arg_infile: String,
    flag_from_ns3: bool,
    flag_csv: Option<String>,
    flag_delimiter: String,
    flag_lenient: bool,
}

fn main() -> anyhow::Result<()> {
    let args: Args = Docopt::new(USAGE)
        .and_then(|d| d.deserialize())
        .unwrap_or_else(|e| e.exit());

    env_logger::Builder::from_env(Env::default().default_filter_or("warn")).init();

    let config = Config {
        from_ns3: args.flag_from_ns3,
        lenient: args.flag_lenient,
        delimiter: args.flag_delimiter.parse::<Delimiter>()?,
    };
    let mut csv = match args.flag_csv {
        Some(ref path) => {
            Some(CsvReport::create(path).with_context(|| format!("creating {}", path))?)
        }
        None => None,
    };

    let summary = analyse_path(&args.arg_infile, config, |stats| {
        if let Some(ref mut csv) = csv {
            csv.write(&stats)?;
        }
        if args.cmd_steps {
            println!("{}", stats);
        }
        Ok(())
    }).with_context(|| format!("analysing {}", args.arg_infile))?;

    if let Some(csv) = csv {
        csv.finish()?;
    }
    if args.cmd_info {
        println!("{}", summary);
    }
    Ok(())
}
