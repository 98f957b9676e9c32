use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use mapscale_core::{ScaleConfiguration, parse_configuration};
use mapscale_protocol::REFERENCE_DPI;

pub const USAGE: &str = "\
Usage: mapscale [--dpi <dpi>] [--config <file.json>]
       mapscale report <width> <height> <dpi> [--config <file.json>]";

#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    /// Attach to the terminal and show the live scale.
    Interactive { dpi: f64 },
    /// Derive once from explicit metrics and print the result as JSON.
    Report { width: f64, height: f64, dpi: f64 },
}

#[derive(Debug, Clone, PartialEq)]
pub struct Args {
    pub command: Command,
    pub config_path: Option<PathBuf>,
}

impl Args {
    pub fn parse(args: impl IntoIterator<Item = String>) -> Result<Self> {
        let mut positional = Vec::new();
        let mut config_path = None;
        let mut dpi = None;

        let mut iter = args.into_iter();
        while let Some(arg) = iter.next() {
            match arg.as_str() {
                "--config" => {
                    let path = iter.next().context("--config needs a path")?;
                    config_path = Some(PathBuf::from(path));
                }
                "--dpi" => {
                    let value = iter.next().context("--dpi needs a value")?;
                    dpi = Some(parse_number("dpi", &value)?);
                }
                "-h" | "--help" => bail!("{USAGE}"),
                _ => positional.push(arg),
            }
        }

        let command = match positional.split_first() {
            None => Command::Interactive {
                dpi: dpi.unwrap_or(REFERENCE_DPI),
            },
            Some((first, rest)) if first == "report" => {
                let [width, height, report_dpi] = rest else {
                    bail!("report needs <width> <height> <dpi>\n{USAGE}");
                };
                Command::Report {
                    width: parse_number("width", width)?,
                    height: parse_number("height", height)?,
                    dpi: parse_number("dpi", report_dpi)?,
                }
            }
            Some((first, _)) => bail!("unknown argument `{first}`\n{USAGE}"),
        };

        Ok(Self {
            command,
            config_path,
        })
    }

    /// The configuration file's contents, or defaults when none was given.
    pub fn load_configuration(&self) -> Result<ScaleConfiguration> {
        let Some(path) = &self.config_path else {
            return Ok(ScaleConfiguration::default());
        };
        let data = std::fs::read(path)
            .with_context(|| format!("reading configuration {}", path.display()))?;
        parse_configuration(&data)
            .with_context(|| format!("parsing configuration {}", path.display()))
    }
}

fn parse_number(name: &str, value: &str) -> Result<f64> {
    value
        .parse()
        .with_context(|| format!("{name} must be a number, got `{value}`"))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Result<Args> {
        Args::parse(args.iter().map(|s| (*s).to_string()))
    }

    #[test]
    fn no_arguments_is_interactive_at_reference_dpi() {
        let args = parse(&[]).unwrap();
        assert_eq!(args.command, Command::Interactive { dpi: 96.0 });
        assert!(args.config_path.is_none());
    }

    #[test]
    fn interactive_with_options() {
        let args = parse(&["--dpi", "144", "--config", "scale.json"]).unwrap();
        assert_eq!(args.command, Command::Interactive { dpi: 144.0 });
        assert_eq!(args.config_path, Some(PathBuf::from("scale.json")));
    }

    #[test]
    fn report_command() {
        let args = parse(&["report", "2880", "1620", "144"]).unwrap();
        assert_eq!(
            args.command,
            Command::Report {
                width: 2880.0,
                height: 1620.0,
                dpi: 144.0
            }
        );
    }

    #[test]
    fn report_needs_three_numbers() {
        assert!(parse(&["report", "2880", "1620"]).is_err());
        assert!(parse(&["report", "wide", "1620", "96"]).is_err());
    }

    #[test]
    fn rejects_unknown_arguments() {
        assert!(parse(&["zoom"]).is_err());
        assert!(parse(&["--dpi"]).is_err());
    }

    #[test]
    fn missing_config_path_means_defaults() {
        let args = parse(&[]).unwrap();
        assert_eq!(args.load_configuration().unwrap(), ScaleConfiguration::default());
    }
}
