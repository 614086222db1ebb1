// Copyright 2025 Steven Dee.
//
// This project is made available under a BSD-compatible license. See the
// LICENSE file in the project root for details.

use std::{
    io::{self, Write},
    process::ExitCode,
};

use askpass::{Askpass, Config, Zeroize};
use clap::Parser;

/// Prompt for a password and print it on standard output.
#[derive(Debug, Parser)]
#[command(version, about)]
struct Args {
    /// Text to prompt with; ": " is appended.
    #[arg(default_value = "Password")]
    prompt: String,

    /// Ask a second time and require both entries to match.
    #[arg(short, long)]
    confirm: bool,

    /// Text for the confirmation prompt [default: "<PROMPT> again"].
    #[arg(long, value_name = "TEXT")]
    confirm_prompt: Option<String>,

    /// Never use a GUI askpass helper.
    #[arg(long)]
    no_helper: bool,
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("off")).init();
    let args = Args::parse();
    match run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("askpass: {e}");
            ExitCode::FAILURE
        }
    }
}

impl Args {
    /// Primary and confirmation prompt texts, each ending in ": ".
    fn prompts(&self) -> (String, String) {
        let confirm_prompt = match &self.confirm_prompt {
            Some(text) => format!("{text}: "),
            None => format!("{} again: ", self.prompt),
        };
        (format!("{}: ", self.prompt), confirm_prompt)
    }

    fn apply(&self, config: &mut Config) {
        config.use_helper = !self.no_helper;
    }
}

fn run(args: Args) -> Result<(), Box<dyn std::error::Error>> {
    let mut config = Config::from_env();
    if config.stdout_tty {
        return Err("refusing to print password to a terminal".into());
    }
    args.apply(&mut config);

    let (prompt, confirm_prompt) = args.prompts();
    let mut pass = Askpass::with_config(config).prompt(&prompt, args.confirm, &confirm_prompt)?;

    let mut stdout = io::stdout().lock();
    let res = writeln!(stdout, "{pass}").and_then(|()| stdout.flush());
    pass.zeroize();
    Ok(res?)
}
