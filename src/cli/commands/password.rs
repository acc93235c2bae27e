use clap::Subcommand;
use serde_json::json;

use crate::auth::password::password_strength_violations;
use crate::cli::utils::{print_failure, print_success};
use crate::cli::OutputFormat;
use crate::validation::FieldErrors;

#[derive(Subcommand)]
pub enum PasswordCommands {
    #[command(about = "Check a password against the registration strength rules")]
    Check {
        #[arg(help = "Password to check")]
        password: String,
    },
}

pub fn handle(cmd: PasswordCommands, output_format: OutputFormat) -> anyhow::Result<()> {
    match cmd {
        PasswordCommands::Check { password } => {
            let violations = password_strength_violations(&password);
            let mut errors = FieldErrors::new();
            if !violations.is_empty() {
                errors.add("password", format!("Password {}", violations.join(", ")));
            }
            match errors.into_result("Password does not meet the strength rules") {
                Ok(()) => print_success(
                    output_format,
                    "Password meets the strength rules",
                    &json!({ "violations": violations }),
                ),
                Err(err) => print_failure(output_format, err),
            }
        }
    }
}
