//! Command-line interface.
//!
//! Options are layered: `.matchbook.toml` in the current directory first,
//! then `MATCH_*` environment variables and flags on top.

pub mod completions;
pub mod crypt;
pub mod hint;
pub mod import;
pub mod init;
pub mod output;
pub mod passphrase;
pub mod prompt;
pub mod run;
pub mod summary;

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::core::config::Config;
use crate::core::domain::{Environment, Platform};
use crate::error::Result;

/// Matchbook - share code signing identities through an encrypted git repository.
#[derive(Parser)]
#[command(
    name = "matchbook",
    about = "Share code signing certificates and profiles through an encrypted git repository",
    version
)]
pub struct Cli {
    /// Print debug logs
    #[arg(short, long, global = true, env = "MATCH_VERBOSE")]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

/// Top-level commands.
#[derive(Subcommand)]
pub enum Command {
    /// Fetch, create and install certificates and profiles
    Run(RunArgs),

    /// Put existing certificates or profiles into the store
    Import {
        #[command(flatten)]
        store: StoreArgs,
        /// Certificate (.cer) to import, requires --p12
        #[arg(long)]
        cert: Option<PathBuf>,
        /// Private key bundle (.p12) belonging to --cert
        #[arg(long)]
        p12: Option<PathBuf>,
        /// Provisioning profile (.mobileprovision) to import
        #[arg(long)]
        profile: Option<PathBuf>,
    },

    /// Encrypt every credential file in a local checkout
    Encrypt {
        /// Checkout to encrypt
        path: PathBuf,
        /// Remote of the store, selects the cached passphrase
        #[arg(long, env = "MATCH_GIT_URL")]
        git_url: Option<String>,
    },

    /// Decrypt every credential file in a local checkout
    Decrypt {
        /// Checkout to decrypt
        path: PathBuf,
        /// Remote of the store, selects the cached passphrase
        #[arg(long, env = "MATCH_GIT_URL")]
        git_url: Option<String>,
    },

    /// Manage the store passphrase
    Passphrase {
        #[command(subcommand)]
        action: PassphraseAction,
    },

    /// Write a .matchbook.toml in the current directory
    Init {
        /// URL of the git repo containing all the certificates
        git_url: String,
        /// Default signing environment
        #[arg(long = "type", short = 't')]
        environment: Option<Environment>,
        /// Bundle identifier of the app
        #[arg(long, short = 'a')]
        app_identifier: Option<String>,
    },

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

/// Passphrase subcommands.
#[derive(Subcommand)]
pub enum PassphraseAction {
    /// Remove the cached passphrase of a store from this machine
    Forget {
        /// Remote of the store
        #[arg(long, env = "MATCH_GIT_URL")]
        git_url: Option<String>,
    },

    /// Re-encrypt the store with a new passphrase
    Change {
        #[command(flatten)]
        store: StoreArgs,
    },
}

/// Supported shells for completions.
#[derive(clap::ValueEnum, Clone, Debug)]
pub enum Shell {
    Bash,
    Zsh,
    Fish,
    PowerShell,
    Elvish,
}

/// Options shared by every command that clones the store.
#[derive(Args, Debug, Default)]
pub struct StoreArgs {
    /// URL of the git repo containing all the certificates
    #[arg(long, env = "MATCH_GIT_URL")]
    pub git_url: Option<String>,

    /// Branch of the store repo
    #[arg(long, env = "MATCH_GIT_BRANCH")]
    pub git_branch: Option<String>,

    /// appstore, adhoc, development, enterprise, release or debug
    #[arg(long = "type", short = 't', env = "MATCH_TYPE")]
    pub environment: Option<Environment>,

    /// Bundle identifier of the app
    #[arg(long, short = 'a', env = "MATCH_APP_IDENTIFIER")]
    pub app_identifier: Option<String>,

    /// Developer portal username
    #[arg(long, short = 'u', env = "MATCH_USERNAME")]
    pub username: Option<String>,

    /// Keychain certificates are imported into
    #[arg(long, env = "MATCH_KEYCHAIN_NAME")]
    pub keychain_name: Option<String>,

    /// Only fetch existing certificates and profiles, never create new ones
    #[arg(long, env = "MATCH_READONLY")]
    pub readonly: bool,

    /// Developer portal team ID
    #[arg(long, env = "FASTLANE_TEAM_ID")]
    pub team_id: Option<String>,

    /// Developer portal team name
    #[arg(long, env = "FASTLANE_TEAM_NAME")]
    pub team_name: Option<String>,

    /// ios, macos or tvos
    #[arg(long, env = "MATCH_PLATFORM")]
    pub platform: Option<Platform>,

    /// Clone with a depth of one
    #[arg(long, env = "MATCH_SHALLOW_CLONE")]
    pub shallow_clone: bool,

    /// Use enterprise certificates for enterprise runs
    #[arg(long, env = "MATCH_FORCE_ENTERPRISE")]
    pub force_enterprise: bool,
}

impl StoreArgs {
    /// Layer these options over `config`.
    pub fn apply(self, config: &mut Config) {
        if let Some(v) = self.git_url {
            config.git_url = v;
        }
        if let Some(v) = self.git_branch {
            config.git_branch = v;
        }
        if let Some(v) = self.environment {
            config.environment = v;
        }
        if self.app_identifier.is_some() {
            config.app_identifier = self.app_identifier;
        }
        if self.username.is_some() {
            config.username = self.username;
        }
        if let Some(v) = self.keychain_name {
            config.keychain_name = v;
        }
        if self.team_id.is_some() {
            config.team_id = self.team_id;
        }
        if self.team_name.is_some() {
            config.team_name = self.team_name;
        }
        if let Some(v) = self.platform {
            config.platform = v;
        }
        config.readonly |= self.readonly;
        config.shallow_clone |= self.shallow_clone;
        config.force_enterprise |= self.force_enterprise;
    }
}

/// Options of the `run` command.
#[derive(Args, Debug, Default)]
pub struct RunArgs {
    #[command(flatten)]
    pub store: StoreArgs,

    /// Renew the provisioning profile every time
    #[arg(long, env = "MATCH_FORCE")]
    pub force: bool,

    /// Renew the provisioning profile when the device count on the portal changed
    #[arg(long, env = "MATCH_FORCE_FOR_NEW_DEVICES")]
    pub force_for_new_devices: bool,

    /// Work with Android keystores instead of Apple certificates
    #[arg(long, env = "MATCH_ANDROID")]
    pub android: bool,

    /// Work with supply JSON keys (Android only)
    #[arg(long, env = "MATCH_SUPPLY")]
    pub supply: bool,

    /// Service account JSON key imported when a supply key has to be created
    #[arg(long, env = "MATCH_SUPPLY_JSON_IMPORT")]
    pub supply_json_import: Option<PathBuf>,

    /// Where the decrypted supply key is copied
    #[arg(long, env = "MATCH_SUPPLY_DESTINATION")]
    pub supply_destination: Option<PathBuf>,

    /// Password of new keystores
    #[arg(long, env = "MATCH_KEYSTORE_PASSWORD", hide_env_values = true)]
    pub keystore_password: Option<String>,

    /// Alias of new keystores
    #[arg(long, env = "MATCH_KEYSTORE_ALIAS")]
    pub keystore_alias: Option<String>,

    /// Owner name written into new keystores
    #[arg(long, env = "MATCH_KEYSTORE_FULLNAME")]
    pub keystore_fullname: Option<String>,

    /// City written into new keystores
    #[arg(long, env = "MATCH_KEYSTORE_CITY")]
    pub keystore_city: Option<String>,

    /// Where the decrypted keystore is copied
    #[arg(long, env = "MATCH_KEYSTORE_DESTINATION")]
    pub keystore_destination: Option<PathBuf>,
}

impl RunArgs {
    /// Layer these options over `config`.
    pub fn apply(self, config: &mut Config) {
        self.store.apply(config);
        config.force |= self.force;
        config.force_for_new_devices |= self.force_for_new_devices;
        config.android |= self.android;
        config.supply |= self.supply;
        if self.supply_json_import.is_some() {
            config.supply_json_import = self.supply_json_import;
        }
        if self.supply_destination.is_some() {
            config.supply_destination = self.supply_destination;
        }
        if self.keystore_password.is_some() {
            config.keystore.password = self.keystore_password;
        }
        if self.keystore_alias.is_some() {
            config.keystore.alias = self.keystore_alias;
        }
        if self.keystore_fullname.is_some() {
            config.keystore.fullname = self.keystore_fullname;
        }
        if self.keystore_city.is_some() {
            config.keystore.city = self.keystore_city;
        }
        if self.keystore_destination.is_some() {
            config.keystore.destination = self.keystore_destination;
        }
    }
}

/// `.matchbook.toml` from the current directory, or defaults.
pub(crate) fn load_config(verbose: bool) -> Result<Config> {
    let cwd = std::env::current_dir()?;
    let mut config = Config::load_or_default(&cwd)?;
    config.verbose |= verbose;
    Ok(config)
}

/// Execute a command.
pub fn execute(cli: Cli) -> Result<()> {
    let verbose = cli.verbose;

    match cli.command {
        Command::Run(args) => run::execute(args, verbose),
        Command::Import {
            store,
            cert,
            p12,
            profile,
        } => import::execute(store, cert, p12, profile, verbose),
        Command::Encrypt { path, git_url } => crypt::encrypt(&path, git_url, verbose),
        Command::Decrypt { path, git_url } => crypt::decrypt(&path, git_url, verbose),
        Command::Passphrase { action } => match action {
            PassphraseAction::Forget { git_url } => passphrase::forget(git_url, verbose),
            PassphraseAction::Change { store } => passphrase::change(store, verbose),
        },
        Command::Init {
            git_url,
            environment,
            app_identifier,
        } => init::execute(git_url, environment, app_identifier),
        Command::Completions { shell } => completions::execute(shell),
    }
}
