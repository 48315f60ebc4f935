//! `php2json` CLI — convert PHP serialized data to JSON from the command line.
//!
//! ## Usage
//!
//! ```sh
//! # Convert serialized data (stdin → stdout)
//! echo 'a:2:{i:0;i:1;i:1;i:2;}' | php2json convert
//!
//! # Convert from file to file, pretty-printed
//! php2json convert -i session.ser -o session.json --pretty
//!
//! # Drop the synthetic class-name key, or rename it
//! php2json convert --no-class-name -i user.ser
//! php2json convert --class-name-key @type -i user.ser
//!
//! # Validate only: exit 0 if the input parses, nonzero otherwise
//! php2json check -i session.ser
//! ```

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use php2json_core::ConvertOptions;
use std::io::{self, Read};

#[derive(Parser)]
#[command(
    name = "php2json",
    version,
    about = "Convert PHP serialized data to JSON",
    arg_required_else_help = true
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Convert PHP serialized data to JSON
    Convert {
        /// Input file (reads from stdin if omitted)
        #[arg(short, long)]
        input: Option<String>,
        /// Output file (writes to stdout if omitted)
        #[arg(short, long)]
        output: Option<String>,
        /// Pretty-print the JSON output
        #[arg(long)]
        pretty: bool,
        /// Do not emit the synthetic class-name key for objects
        #[arg(long)]
        no_class_name: bool,
        /// Key under which object class names are emitted
        #[arg(long, default_value = "__classname")]
        class_name_key: String,
    },
    /// Parse the input without rendering; reports the root value's type
    Check {
        /// Input file (reads from stdin if omitted)
        #[arg(short, long)]
        input: Option<String>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Convert {
            input,
            output,
            pretty,
            no_class_name,
            class_name_key,
        } => {
            let php = read_input(input.as_deref())?;
            let options = ConvertOptions {
                include_class_name: !no_class_name,
                class_name_key,
                pretty,
            };
            let json = php2json_core::convert_with(php.trim_end(), &options)
                .context("Failed to convert input")?;
            write_output(output.as_deref(), &json)?;
        }
        Commands::Check { input } => {
            let php = read_input(input.as_deref())?;
            let value =
                php2json_core::parse(php.trim_end()).context("Input is not valid PHP serialized data")?;
            println!("OK: root value is {}", value.type_name());
        }
    }

    Ok(())
}

fn read_input(path: Option<&str>) -> Result<String> {
    match path {
        Some(path) => {
            std::fs::read_to_string(path).with_context(|| format!("Failed to read file: {}", path))
        }
        None => {
            let mut buf = String::new();
            io::stdin()
                .read_to_string(&mut buf)
                .context("Failed to read from stdin")?;
            Ok(buf)
        }
    }
}

fn write_output(path: Option<&str>, content: &str) -> Result<()> {
    match path {
        Some(path) => {
            std::fs::write(path, content)
                .with_context(|| format!("Failed to write file: {}", path))?;
        }
        None => {
            println!("{}", content);
        }
    }
    Ok(())
}
