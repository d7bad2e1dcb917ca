use anyhow::{Context, Result};
use mfm_config::{Config, OutputFormat};
use mfm_syntax::{Node, ParseOptions, format_tree, parse_with};
use std::io::{self, Read};
use std::path::Path;
use std::{env, fs, process};

const USAGE: &str = "Usage: mfm [--json | --tree] [FILE...]\n\
                     \x20      mfm --init-config\n\
                     Reads standard input when no FILE is given or FILE is '-'.";

#[derive(Debug, PartialEq, Eq)]
struct Args {
    /// Overrides the configured output format.
    format: Option<OutputFormat>,
    inputs: Vec<String>,
}

#[derive(Debug, PartialEq, Eq)]
enum Command {
    Run(Args),
    InitConfig,
    Help,
}

fn parse_args<I: IntoIterator<Item = String>>(args: I) -> Result<Command, String> {
    let mut format = None;
    let mut inputs = Vec::new();

    for arg in args {
        match arg.as_str() {
            "--json" => format = Some(OutputFormat::Json),
            "--tree" => format = Some(OutputFormat::Tree),
            "-h" | "--help" => return Ok(Command::Help),
            "--init-config" => return Ok(Command::InitConfig),
            "-" => inputs.push(arg),
            flag if flag.starts_with('-') => return Err(format!("unknown option '{flag}'")),
            _ => inputs.push(arg),
        }
    }

    if inputs.is_empty() {
        inputs.push("-".to_string());
    }
    Ok(Command::Run(Args { format, inputs }))
}

fn read_input(name: &str) -> Result<String> {
    if name == "-" {
        let mut source = String::new();
        io::stdin()
            .read_to_string(&mut source)
            .context("Failed to read standard input")?;
        return Ok(source);
    }
    fs::read_to_string(name).with_context(|| format!("Failed to read '{name}'"))
}

fn render(nodes: &[Node], format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Json => {
            serde_json::to_string_pretty(nodes).context("Failed to serialize node tree")
        }
        OutputFormat::Tree => Ok(format_tree(nodes).trim_end().to_string()),
    }
}

/// Writes the default config to `path`, refusing to overwrite an existing file.
fn init_config(path: &Path) -> Result<()> {
    if path.exists() {
        anyhow::bail!("Config file already exists at {}", path.display());
    }
    Config::default()
        .save_to_path(path)
        .with_context(|| format!("Failed to write config file at {}", path.display()))?;
    log::info!("Wrote default config to {}", path.display());
    Ok(())
}

fn run(args: Args, config: &Config) -> Result<()> {
    let format = args.format.unwrap_or(config.output.format);
    let options: ParseOptions = config.parse_options();
    log::debug!("Output format {format:?}, nest limit {}", options.nest_limit);

    for name in &args.inputs {
        let source = read_input(name)?;
        let nodes = parse_with(&source, &options);
        log::info!("Parsed '{name}': {} bytes, {} top-level nodes", source.len(), nodes.len());
        println!("{}", render(&nodes, format)?);
    }
    Ok(())
}

fn main() {
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .parse_default_env()
        .init();

    let args = match parse_args(env::args().skip(1)) {
        Ok(Command::Run(args)) => args,
        Ok(Command::Help) => {
            println!("{USAGE}");
            return;
        }
        Ok(Command::InitConfig) => {
            let path = Config::config_path();
            if let Err(e) = init_config(&path) {
                eprintln!("Error: {e:#}");
                process::exit(1);
            }
            println!("{}", path.display());
            return;
        }
        Err(e) => {
            eprintln!("Error: {e}");
            eprintln!("{USAGE}");
            process::exit(1);
        }
    };

    let config = match Config::load() {
        Ok(Some(config)) => {
            log::info!("Loaded config from {}", Config::config_path().display());
            config
        }
        Ok(None) => {
            log::debug!("No config file at {}, using defaults", Config::config_path().display());
            Config::default()
        }
        Err(e) => {
            eprintln!("Error: Failed to load config file: {e}");
            process::exit(1);
        }
    };

    if let Err(e) = run(args, &config) {
        eprintln!("Error: {e:#}");
        process::exit(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    fn args(list: &[&str]) -> Result<Command, String> {
        parse_args(list.iter().map(|s| s.to_string()))
    }

    #[test]
    fn no_arguments_reads_stdin() {
        assert_eq!(
            args(&[]),
            Ok(Command::Run(Args {
                format: None,
                inputs: vec!["-".to_string()],
            }))
        );
    }

    #[test]
    fn format_flags_and_files() {
        assert_eq!(
            args(&["--tree", "a.mfm", "-", "b.mfm"]),
            Ok(Command::Run(Args {
                format: Some(OutputFormat::Tree),
                inputs: vec!["a.mfm".into(), "-".into(), "b.mfm".into()],
            }))
        );
        assert_eq!(
            args(&["--tree", "--json"]),
            Ok(Command::Run(Args {
                format: Some(OutputFormat::Json),
                inputs: vec!["-".into()],
            }))
        );
    }

    #[test]
    fn unknown_flag_is_an_error() {
        assert_eq!(args(&["--yaml"]), Err("unknown option '--yaml'".to_string()));
        assert_eq!(args(&["x", "--help"]), Ok(Command::Help));
    }

    #[test]
    fn init_config_flag() {
        assert_eq!(args(&["--init-config"]), Ok(Command::InitConfig));
        assert_eq!(args(&["--tree", "--init-config"]), Ok(Command::InitConfig));
    }

    #[test]
    fn init_config_writes_defaults_once() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("mfm").join("config.toml");

        init_config(&path).unwrap();
        let written = Config::load_from_path(&path).unwrap().unwrap();
        assert_eq!(written, Config::default());

        let err = init_config(&path).unwrap_err();
        assert!(format!("{err:#}").contains("already exists"));
    }

    #[test]
    fn render_tree_and_json() {
        let nodes = mfm_syntax::parse("**a**");

        assert_eq!(render(&nodes, OutputFormat::Tree).unwrap(), "bold\n  text \"a\"");

        let json = render(&nodes, OutputFormat::Json).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value[0]["type"], "bold");
        assert_eq!(value[0]["children"][0]["props"]["text"], "a");
    }

    #[test]
    fn missing_file_names_the_path() {
        let err = read_input("/nonexistent/post.mfm").unwrap_err();
        assert!(format!("{err:#}").contains("/nonexistent/post.mfm"));
    }
}
