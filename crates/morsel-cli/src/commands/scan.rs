use std::io::Write;
use std::path::PathBuf;

use morsel::pipeline::Pipeline;
use morsel::protected::ProtectedVocab;
use morsel::record::TokenRecord;
use morsel::registry::{RegistryConfig, VocabRegistry};
use morsel::splitter::SplitterConfig;

use crate::lexer::PlainLexer;

/// Args for the scan command.
#[derive(clap::Args, Debug)]
pub struct ScanArgs {
    /// Source file to tokenize.
    pub file: PathBuf,

    /// Vocabulary registry file; created when absent.
    #[clap(long, default_value = "morsel_vocab.bin")]
    pub registry: PathBuf,

    /// Use the stricter split threshold.
    #[clap(long)]
    pub strict: bool,

    /// Override the registry slot capacity.
    #[clap(long)]
    pub capacity: Option<usize>,

    /// Print at most this many records.
    #[clap(long)]
    pub limit: Option<usize>,
}

impl ScanArgs {
    /// Run the scan command.
    pub fn run(&self) -> Result<(), Box<dyn std::error::Error>> {
        let source = std::fs::read(&self.file)?;

        let mut registry_config = RegistryConfig::default();
        if let Some(capacity) = self.capacity {
            registry_config = registry_config.with_capacity(capacity);
        }
        let registry = VocabRegistry::open(&self.registry, registry_config)?;

        let config = if self.strict {
            SplitterConfig::strict()
        } else {
            SplitterConfig::default()
        };

        let mut pipeline = Pipeline::with_options(
            &source,
            registry,
            config,
            ProtectedVocab::default(),
        );
        pipeline.run(PlainLexer::new(&source))?;

        let (buffer, registry) = pipeline.finish();

        let stdout = std::io::stdout();
        let mut out = stdout.lock();
        let limit = self.limit.unwrap_or(usize::MAX);
        for record in buffer.records().iter().take(limit) {
            write_record(&mut out, record, &source)?;
        }

        log::info!(
            "{}: {} records, {} distinct vocabulary entries",
            self.file.display(),
            buffer.len(),
            registry.len(),
        );

        Ok(())
    }
}

fn write_record(
    out: &mut dyn Write,
    record: &TokenRecord,
    source: &[u8],
) -> std::io::Result<()> {
    write!(
        out,
        "[{:08X}] {}",
        record.hash,
        String::from_utf8_lossy(record.text(source)),
    )?;

    if record.has_joiner {
        write!(out, " (+_)")?;
    }
    if record.absorbed.semi {
        write!(out, " (+;)")?;
    }
    if record.absorbed.comma {
        write!(out, " (+,)")?;
    }
    if record.absorbed.open {
        write!(out, " (+()")?;
    }
    if record.absorbed.close {
        write!(out, " (+))")?;
    }
    if record.absorbed.star {
        write!(out, " (+*)")?;
    }

    writeln!(out)
}
