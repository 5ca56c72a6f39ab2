//! CLI command structure using clap

use clap::{Args, Parser, Subcommand};
use litescape::{Embedding, Escape, Patch};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "litescape")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Log debug output
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Embed an HTML file in a generated source file as an escaped literal
    Generate {
        input: PathBuf,
        output: PathBuf,

        /// Name of the exported constant
        #[arg(long, default_value = "tvHTML")]
        name: String,

        #[command(flatten)]
        syntax: SyntaxArgs,
    },

    /// Report unescaped delimiters and markers inside the literal
    Check {
        file: PathBuf,

        #[command(flatten)]
        syntax: SyntaxArgs,
    },

    /// Replace text on specific lines
    Patch {
        file: PathBuf,

        /// LINE:FIND=>REPLACE, LINE is 1-based
        #[arg(long = "patch", required = true)]
        patches: Vec<Patch>,
    },

    /// Escape every reported occurrence and restore the closing delimiter
    Fix {
        file: PathBuf,

        #[command(flatten)]
        syntax: SyntaxArgs,
    },

    /// Decode the payload of a generated file
    Extract {
        file: PathBuf,

        /// Write the payload here instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,

        #[command(flatten)]
        syntax: SyntaxArgs,
    },
}

#[derive(Args, Clone)]
pub struct SyntaxArgs {
    /// Character that opens and closes the literal
    #[arg(long, default_value_t = '`')]
    pub delimiter: char,

    /// Character that escapes the next one
    #[arg(long, default_value_t = '\\')]
    pub escape_char: char,

    /// Sequence that starts an interpolation
    #[arg(long, default_value = "${")]
    pub marker: String,

    /// Text after the closing delimiter
    #[arg(long, default_value = ";")]
    pub terminator: String,
}

impl SyntaxArgs {
    pub fn embedding(&self, declaration: &str) -> anyhow::Result<Embedding> {
        let escape = Escape::new(self.escape_char, self.delimiter, &self.marker)?;
        Embedding::new(escape, declaration, &self.terminator)
    }
}
