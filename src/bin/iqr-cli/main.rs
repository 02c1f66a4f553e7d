mod cli;
mod session;

use std::io::Write;

use anyhow::Context;
use clap::Parser;
use colored::Colorize;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use iqr_calculator::{
    generate, input::{parse_numbers, ParsedInput}, table, Config, QuartileMethod, MIN_SAMPLES,
};
use rustyline_async::ReadlineError;

use cli::{parse_cli_command, Args, CliCommand, CliError, ExportKind};
use session::Session;

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "iqr_cli=info,iqr_calculator=info".into()),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .init();

    let args = Args::parse();

    let (config, config_file) = Config::load()?;
    tracing::debug!("Config {:?}:\n{}", config_file, config);

    let mut session = Session::new(&config);
    if let Some(method) = args.method {
        session.method = method;
    }
    if let Some(precision) = args.precision {
        session.precision = precision;
    }

    if args.is_one_shot() {
        run_once(&args, &mut session)
    } else {
        run_interactive(session).await
    }
}

fn collect_input(args: &Args, session: &Session) -> anyhow::Result<ParsedInput> {
    let mut parsed = parse_numbers(&args.values.join(" "));

    if let Some(file) = args.file.as_ref() {
        let from_file = table::load_path(file, args.column.as_ref())
            .with_context(|| format!("Failed to load {:?}", file))?;
        parsed.values.extend(from_file.values);
        parsed.rejected.extend(from_file.rejected);
    }

    if args.random.is_some() {
        let (count, distribution) = session.random_source(args.random, args.distribution);
        let values = match args.seed {
            Some(seed) => generate::generate_seeded(distribution, count, seed)?,
            None => generate::generate_random(distribution, count)?,
        };
        parsed.values.extend(values);
    }

    Ok(parsed)
}

fn run_once(args: &Args, session: &mut Session) -> anyhow::Result<()> {
    let mut stdout = std::io::stdout();

    let parsed = collect_input(args, session)?;
    print_rejected(&parsed.rejected, &mut stdout)?;

    let values = parsed.require(MIN_SAMPLES)?;
    session.analyse(values)?;
    if let Some(report) = session.report() {
        write!(stdout, "{}", report)?;
    }

    for (kind, path) in [
        (ExportKind::Csv, &args.export_csv),
        (ExportKind::Data, &args.export_data_csv),
        (ExportKind::Xlsx, &args.export_xlsx),
    ] {
        if let Some(path) = path {
            session.export(kind, path)?;
        }
    }

    Ok(())
}

async fn run_interactive(mut session: Session) -> anyhow::Result<()> {
    let (mut rl, mut stdout) = rustyline_async::Readline::new("> ".to_owned())
        .context("Failed to init interactive input!")?;

    writeln!(stdout, "{}", "Interquartile range (IQR) calculator".bold())?;
    writeln!(
        stdout,
        "Enter at least {} numbers separated by spaces or commas (e.g. 12 15 18 22 25).",
        MIN_SAMPLES
    )?;
    writeln!(stdout, "Method: {}. Type 'help' to see the list of commands!", session.method)?;

    let mut last_cmd = CliCommand::None;
    loop {
        match rl.readline().await {
            Ok(line) => match parse_cli_command(&line, &last_cmd) {
                Ok(cmd) => {
                    process_cli_command(&mut session, &cmd, &mut stdout)?;
                    if !line.trim().is_empty() {
                        rl.add_history_entry(line.trim().to_owned());
                    }
                    last_cmd = cmd;
                }
                Err(CliError::Parse(e)) => writeln!(stdout, "\n{}", e)?,
                Err(CliError::Exit) => {
                    writeln!(stdout, "Exiting...")?;
                    return Ok(());
                }
            },
            Err(ReadlineError::Eof) | Err(ReadlineError::Closed) => {
                writeln!(stdout, "Exiting...")?;
                return Ok(());
            }
            Err(ReadlineError::Interrupted) => {
                writeln!(stdout, "^C")?;
                return Ok(());
            }
            Err(ReadlineError::IO(err)) => {
                writeln!(stdout, "Received err: {:?}", err)?;
                return Err(err.into());
            }
        }
    }
}

fn process_cli_command(
    session: &mut Session,
    cmd: &CliCommand,
    stdout: &mut impl Write,
) -> Result<(), std::io::Error> {
    match cmd {
        CliCommand::None => {}
        CliCommand::Compute(text) => {
            let parsed = parse_numbers(text);
            print_rejected(&parsed.rejected, stdout)?;
            match parsed.require(MIN_SAMPLES) {
                Ok(values) => analyse_and_print(session, values, stdout)?,
                Err(e) => writeln!(stdout, "{} {}", "!".yellow().bold(), e)?,
            }
        }
        CliCommand::SetMethod(method) => match session.set_method(*method).map(|r| r.is_some()) {
            Ok(true) => print_report(session, stdout)?,
            Ok(false) => writeln!(stdout, "Method: {}", method)?,
            Err(e) => writeln!(stdout, "{} {}", "!".red().bold(), e)?,
        },
        CliCommand::ListMethods => {
            for m in QuartileMethod::ALL {
                let marker = if m == session.method { "*" } else { " " };
                writeln!(stdout, "{} {:<22} {}", marker, m.name(), m.description())?;
            }
        }
        CliCommand::Random {
            count,
            distribution,
        } => {
            let (count, distribution) = session.random_source(*count, *distribution);
            match generate::generate_random(distribution, count) {
                Ok(values) => analyse_and_print(session, values, stdout)?,
                Err(e) => writeln!(stdout, "{} {}", "!".red().bold(), e)?,
            }
        }
        CliCommand::Export(kind, path) => match session.export(*kind, path) {
            Ok(()) => writeln!(stdout, "Saved {}", path.display().to_string().green())?,
            Err(e) => writeln!(stdout, "{} {:#}", "!".red().bold(), e)?,
        },
    }
    Ok(())
}

fn analyse_and_print(
    session: &mut Session,
    values: Vec<f64>,
    stdout: &mut impl Write,
) -> Result<(), std::io::Error> {
    match session.analyse(values).map(|_| ()) {
        Ok(()) => print_report(session, stdout),
        Err(e) => writeln!(stdout, "{} {}", "!".red().bold(), e),
    }
}

fn print_report(session: &Session, stdout: &mut impl Write) -> Result<(), std::io::Error> {
    let Some(report) = session.report() else {
        return Ok(());
    };
    writeln!(stdout, "{}", "=".repeat(60))?;
    write!(stdout, "{}", report)?;
    if let Some(stats) = session.last() {
        if stats.outliers.is_empty() {
            writeln!(stdout, "{}", "No outliers".green())?;
        } else {
            writeln!(
                stdout,
                "{}",
                format!("{} outlier(s) outside the fences", stats.outlier_count()).red()
            )?;
        }
    }
    writeln!(stdout, "{}", "=".repeat(60))
}

fn print_rejected(rejected: &[String], stdout: &mut impl Write) -> Result<(), std::io::Error> {
    for token in rejected {
        writeln!(
            stdout,
            "{} '{}' is not a valid number and was ignored",
            "!".yellow().bold(),
            token
        )?;
    }
    Ok(())
}
