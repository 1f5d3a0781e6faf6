use clap::{Args, Parser, Subcommand};

use credvault_core::VERSION;

/// Credvault - a per-user encrypted credential store
#[derive(Parser)]
#[command(name = "credvault")]
#[command(author, version = VERSION, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Path to the vault database
    #[arg(long, global = true, env = "CREDVAULT_DB")]
    pub db: Option<String>,

    /// Principal established by the local login session
    #[arg(short, long, global = true, env = "CREDVAULT_USER")]
    pub user: Option<String>,

    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Quiet mode (minimal output)
    #[arg(short, long, global = true)]
    pub quiet: bool,
}

/// Arguments for the `init` command
#[derive(Args)]
pub struct InitArgs {
    /// Path where the vault database will be created
    #[arg(value_name = "PATH")]
    pub path: Option<String>,

    /// Default log level written to the config file
    #[arg(long, value_name = "LEVEL")]
    pub log_level: Option<String>,

    /// Overwrite an existing config file
    #[arg(long)]
    pub force: bool,
}

/// Arguments for the `add` command
#[derive(Args)]
pub struct AddArgs {
    /// Site name (need not be unique)
    #[arg(value_name = "SITE")]
    pub site: String,

    /// Secret value (prompted or read from stdin when omitted)
    #[arg(long)]
    pub secret: Option<String>,

    /// Account username
    #[arg(long)]
    pub username: Option<String>,

    /// Site URL
    #[arg(long)]
    pub url: Option<String>,

    /// Free-form notes
    #[arg(long)]
    pub notes: Option<String>,

    /// Disable interactive prompts
    #[arg(long)]
    pub no_input: bool,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

/// Arguments for the `get` command
#[derive(Args)]
pub struct GetArgs {
    /// Credential ID
    #[arg(value_name = "ID")]
    pub id: i64,

    /// Print only the secret
    #[arg(long, conflicts_with = "json")]
    pub secret_only: bool,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

/// Arguments for the `update` command
#[derive(Args)]
pub struct UpdateArgs {
    /// Credential ID
    #[arg(value_name = "ID")]
    pub id: i64,

    /// New site name
    #[arg(long)]
    pub site: Option<String>,

    /// New secret value
    #[arg(long, conflicts_with = "prompt_secret")]
    pub secret: Option<String>,

    /// Prompt for (or read from stdin) a new secret
    #[arg(long)]
    pub prompt_secret: bool,

    /// New username (empty string clears it)
    #[arg(long)]
    pub username: Option<String>,

    /// New URL (empty string clears it)
    #[arg(long)]
    pub url: Option<String>,

    /// New notes (empty string clears them)
    #[arg(long)]
    pub notes: Option<String>,

    /// Disable interactive prompts
    #[arg(long)]
    pub no_input: bool,
}

/// Arguments for the `delete` command
#[derive(Args)]
pub struct DeleteArgs {
    /// Credential ID
    #[arg(value_name = "ID")]
    pub id: i64,
}

/// Arguments for the `list` command
#[derive(Args)]
pub struct ListArgs {
    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

/// Arguments for the `profile` command
#[derive(Args)]
pub struct ProfileArgs {
    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

/// Arguments for the `unregister` command
#[derive(Args)]
pub struct UnregisterArgs {
    /// Skip the confirmation prompt
    #[arg(long)]
    pub yes: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Write the config file and create the vault database
    Init(InitArgs),

    /// Register the current user and generate their key
    Register,

    /// Add a credential
    Add(AddArgs),

    /// Show a credential with its decrypted secret
    Get(GetArgs),

    /// Change fields of a credential
    Update(UpdateArgs),

    /// Delete a credential
    Delete(DeleteArgs),

    /// List credentials (never shows secrets)
    List(ListArgs),

    /// Show the current user's profile
    Profile(ProfileArgs),

    /// Remove the current user, their key and all their credentials
    Unregister(UnregisterArgs),

    /// Check vault integrity
    Check,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_add_with_metadata() {
        let cli = Cli::try_parse_from([
            "credvault",
            "--user",
            "alice",
            "add",
            "github",
            "--secret",
            "p@ss1",
            "--username",
            "alice@example.com",
        ])
        .unwrap();

        assert_eq!(cli.user.as_deref(), Some("alice"));
        match cli.command {
            Some(Commands::Add(args)) => {
                assert_eq!(args.site, "github");
                assert_eq!(args.secret.as_deref(), Some("p@ss1"));
                assert_eq!(args.username.as_deref(), Some("alice@example.com"));
                assert!(args.url.is_none());
            }
            _ => panic!("expected add command"),
        }
    }

    #[test]
    fn test_update_rejects_secret_with_prompt() {
        let result = Cli::try_parse_from([
            "credvault",
            "update",
            "1",
            "--secret",
            "x",
            "--prompt-secret",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn test_get_requires_numeric_id() {
        assert!(Cli::try_parse_from(["credvault", "get", "abc"]).is_err());
        assert!(Cli::try_parse_from(["credvault", "get", "7", "--json"]).is_ok());
    }
}
