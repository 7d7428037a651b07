// CLI argument definitions using Clap

use clap::Parser;
use console::style;

/// User-friendly 'go test' that extracts error messages.
///
/// Every argument is handed to `go test` unchanged, so hottest defines no
/// flags of its own; `-v`, `-h` and `--version` all reach go.
#[derive(Parser, Debug, Clone)]
#[command(name = "hottest")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(disable_help_flag = true, disable_version_flag = true)]
pub struct Cli {
    /// Arguments for 'go test'
    #[arg(trailing_var_arg = true, allow_hyphen_values = true, value_name = "ARGS")]
    pub go_test_args: Vec<String>,
}

impl Cli {
    /// Whether there is anything to hand to `go test`
    pub fn has_go_test_args(&self) -> bool {
        !self.go_test_args.is_empty()
    }
}

/// Usage text shown when hottest is started without arguments
pub fn usage() -> String {
    format!(
        "hottest {}\n\
         User-friendly 'go test' that extracts error messages.\n\
         \n\
         Usage:\n  \
         hottest [arguments]\n          \
         * The arguments are the same as 'go test'.\n\
         Example:\n  \
         hottest -cover ./... -coverprofile=cover.out\n",
        style(env!("CARGO_PKG_VERSION")).green()
    )
}
