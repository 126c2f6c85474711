//! Root CLI structure for cod-rs

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "cod-rs")]
#[command(about = "Command-line tools for Call of Duty asset formats", long_about = None)]
#[command(version)]
#[command(author)]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,

    /// Verbosity level (can be repeated for more detail)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true)]
    pub quiet: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// IWi texture operations
    Iwi {
        #[command(subcommand)]
        command: crate::commands::iwi::IwiCommands,
    },

    /// Material operations
    Material {
        #[command(subcommand)]
        command: crate::commands::material::MaterialCommands,
    },

    /// IBSP level operations
    Ibsp {
        #[command(subcommand)]
        command: crate::commands::ibsp::IbspCommands,
    },

    /// xmodel, xmodelpart and xmodelsurf operations
    Xmodel {
        #[command(subcommand)]
        command: crate::commands::xmodel::XModelCommands,
    },

    /// Load a model or level together with everything it references
    Import {
        #[command(subcommand)]
        command: crate::commands::import::ImportCommands,
    },

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}
