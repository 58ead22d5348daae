//! Minimal CLI parsing for run mode and port overrides.

use std::env;

use crate::app_mode::RunMode;

#[derive(Debug, Default, PartialEq, Eq)]
pub struct CliOptions {
    pub run_mode_override: Option<RunMode>,
    pub port_override: Option<u16>,
}

impl CliOptions {
    pub fn from_args() -> Self {
        Self::parse(env::args().skip(1))
    }

    pub fn parse<I>(args: I) -> Self
    where
        I: IntoIterator<Item = String>,
    {
        let mut options = CliOptions::default();
        let mut args = args.into_iter();
        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--production" => options.run_mode_override = Some(RunMode::Production),
                "--development" => options.run_mode_override = Some(RunMode::Development),
                "--run-mode" => {
                    if let Some(value) = args.next() {
                        options.run_mode_override = RunMode::from_arg(&value);
                    }
                }
                "--port" => {
                    if let Some(value) = args.next() {
                        options.port_override = value.parse().ok();
                    }
                }
                _ if arg.starts_with("--run-mode=") => {
                    if let Some(value) = arg.split_once('=').map(|(_, v)| v) {
                        options.run_mode_override = RunMode::from_arg(value);
                    }
                }
                _ if arg.starts_with("--port=") => {
                    if let Some(value) = arg.split_once('=').map(|(_, v)| v) {
                        options.port_override = value.parse().ok();
                    }
                }
                _ => {}
            }
        }
        options
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_flags() {
        let opts = CliOptions::parse(args(&["--production", "--port", "8080"]));
        assert_eq!(opts.run_mode_override, Some(RunMode::Production));
        assert_eq!(opts.port_override, Some(8080));
    }

    #[test]
    fn test_equals_forms_and_unknown_args() {
        let opts = CliOptions::parse(args(&["--verbose", "--run-mode=development", "--port=abc"]));
        assert_eq!(opts.run_mode_override, Some(RunMode::Development));
        assert_eq!(opts.port_override, None);
    }
}
