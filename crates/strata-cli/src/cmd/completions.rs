use anyhow::Result;
use clap::Args;
use clap_complete::{Shell, generate};

/// Arguments for `strata completions`.
#[derive(Args, Debug)]
pub struct CompletionsArgs {
    /// Target shell for completion script generation.
    #[arg(value_enum)]
    pub shell: Shell,
}

/// Write the completion script for `shell` to `out`.
pub fn write_completions(shell: Shell, command: &mut clap::Command, out: &mut dyn std::io::Write) {
    generate(shell, command, "strata", out);
}

/// Generate shell completion script to stdout.
///
/// # Errors
///
/// Returns an error if writing to stdout fails.
pub fn run_completions(shell: Shell, command: &mut clap::Command) -> Result<()> {
    let mut out = std::io::stdout();
    write_completions(shell, command, &mut out);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::{CommandFactory, Parser};

    #[derive(Parser)]
    #[command(name = "strata")]
    struct Demo {
        #[command(flatten)]
        args: CompletionsArgs,
    }

    #[test]
    fn parses_shell_name() {
        let demo = Demo::parse_from(["strata", "zsh"]);
        assert_eq!(demo.args.shell, Shell::Zsh);
        assert!(Demo::try_parse_from(["strata", "tcsh"]).is_err());
    }

    #[test]
    fn bash_script_names_binary() {
        let mut out = Vec::new();
        write_completions(Shell::Bash, &mut Demo::command(), &mut out);
        let script = String::from_utf8(out).expect("utf8");
        assert!(script.contains("strata"));
    }
}
