use std::collections::BTreeMap;
use std::path::PathBuf;

use morsel::registry::read_registry_file;

/// Entries longer than this are worth a second look; the pipeline's
/// blob guard should have split them before they were registered.
const SUSPICIOUS_LEN: usize = 32;

/// Args for the vocab command.
#[derive(clap::Args, Debug)]
pub struct VocabArgs {
    /// Registry file to inspect.
    #[clap(default_value = "morsel_vocab.bin")]
    pub file: PathBuf,

    /// Print every entry, not just the summary.
    #[clap(long)]
    pub list: bool,

    /// Histogram buckets to print.
    #[clap(long, default_value_t = 10)]
    pub buckets: usize,
}

impl VocabArgs {
    /// Run the vocab command.
    pub fn run(&self) -> Result<(), Box<dyn std::error::Error>> {
        let entries = read_registry_file(&self.file)?;

        if self.list {
            for entry in &entries {
                println!(
                    "[{:08X}] {}",
                    entry.hash,
                    String::from_utf8_lossy(&entry.text),
                );
            }
        }

        let mut lengths: BTreeMap<usize, usize> = BTreeMap::new();
        let mut suspicious = 0;
        for entry in &entries {
            *lengths.entry(entry.text.len()).or_default() += 1;
            if entry.text.len() > SUSPICIOUS_LEN {
                suspicious += 1;
            }
        }

        println!("{}: {} entries", self.file.display(), entries.len());

        if !entries.is_empty() {
            println!("--- length distribution ---");
            for (length, count) in lengths.iter().take(self.buckets) {
                let bar = "#".repeat(count * 50 / entries.len());
                println!("{length:>3}: {bar} ({count})");
            }
            if lengths.len() > self.buckets {
                println!(
                    "... and {} more tail buckets",
                    lengths.len() - self.buckets
                );
            }
        }

        if suspicious > 0 {
            log::warn!(
                "{suspicious} entries longer than {SUSPICIOUS_LEN} bytes"
            );
        }

        Ok(())
    }
}
