use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Where the generated site is deployed.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum Profile {
    /// Relative links, pages opened straight from the filesystem.
    FilesystemDirect,
    /// Root-relative links, pages served from a web server root.
    ServerRoot,
}

impl Profile {
    pub const ALL: [Profile; 2] = [Profile::FilesystemDirect, Profile::ServerRoot];

    pub fn name(self) -> &'static str {
        match self {
            Profile::FilesystemDirect => "filesystem-direct",
            Profile::ServerRoot => "server-root",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum Format {
    Json,
    Toml,
    /// An ES module exporting the configuration.
    Module,
}

impl Format {
    pub fn extension(self) -> &'static str {
        match self {
            Format::Json => "json",
            Format::Toml => "toml",
            Format::Module => "mjs",
        }
    }
}

#[derive(Debug, Parser)]
pub struct EmitCommand {
    #[arg(short, long, value_enum, default_value_t = Profile::FilesystemDirect)]
    pub profile: Profile,
    #[arg(short, long, value_enum, default_value_t = Format::Json)]
    pub format: Format,
    /// Write `config.<ext>` into this directory instead of printing it.
    #[arg(short, long)]
    pub out: Option<PathBuf>,
    /// Emit again whenever the site descriptor changes.
    #[arg(short, long, default_value = "false")]
    pub watch: bool,
    /// Site descriptor file, or a directory containing one. The built-in tutorial site is used
    /// when omitted.
    pub path: Option<PathBuf>,
}

#[derive(Debug, Parser)]
pub struct CheckCommand {
    #[arg(short, long, value_enum, default_value_t = Profile::FilesystemDirect)]
    pub profile: Profile,
    /// Check every deployment profile.
    #[arg(short, long, default_value = "false", conflicts_with = "profile")]
    pub all_profiles: bool,
    pub path: Option<PathBuf>,
}

#[derive(Debug, Parser)]
pub struct LinksCommand {
    #[arg(short, long, value_enum, default_value_t = Profile::FilesystemDirect)]
    pub profile: Profile,
    pub path: Option<PathBuf>,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Print or write the resolved site configuration.
    Emit(EmitCommand),
    /// Check the site configuration for structural problems.
    Check(CheckCommand),
    /// List navigation entries with the links they resolve to.
    Links(LinksCommand),
}

#[derive(Debug, Parser)]
#[command(version, about)]
pub struct Args {
    #[arg(short, long, global = true, default_value = "false")]
    pub verbose: bool,
    #[command(subcommand)]
    pub command: Commands,
}
