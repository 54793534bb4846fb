use crate::commands::{scan::ScanArgs, vocab::VocabArgs};

pub mod scan;
pub mod vocab;

/// Subcommands for morsel-cli
#[derive(clap::Subcommand, Debug)]
pub enum Commands {
    /// Tokenize a source file against a persistent vocabulary.
    Scan(ScanArgs),

    /// Inspect a vocabulary registry file.
    Vocab(VocabArgs),
}

impl Commands {
    /// Run the subcommand.
    pub fn run(&self) -> Result<(), Box<dyn std::error::Error>> {
        match self {
            Commands::Scan(cmd) => cmd.run(),
            Commands::Vocab(cmd) => cmd.run(),
        }
    }
}
