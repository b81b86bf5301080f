// fht: FAIR-bioHeaders metadata conversion, validation, and file binding.
//
// Copyright 2025 Tommi Mäklin [tommi@maklin.fi].
//
// Copyrights in this project are retained by contributors. No copyright assignment
// is required to contribute to this project.
//
// Except as otherwise noted (below and/or in individual files), this
// project is licensed under the Apache License, Version 2.0
// <LICENSE-APACHE> or <http://www.apache.org/licenses/LICENSE-2.0> or
// the MIT license, <LICENSE-MIT> or <http://opensource.org/licenses/MIT>,
// at your option.
//
use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(version)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    // Convert a header to another encoding
    Convert {
        // Input header, or a fasta or gfa file containing one
        #[arg(group = "input", required = true, help = "Input file")]
        input_file: PathBuf,

        // Input encoding, inferred from the extension if not given
        #[arg(long = "from", required = false)]
        from: Option<String>,

        // Output encoding
        #[arg(long = "to", required = true)]
        to: String,

        // Validate against this JSON Schema before converting
        #[arg(long = "schema", required = false)]
        schema_file: Option<PathBuf>,

        // Validate against the bundled FHT schema if --schema is not given
        #[arg(long = "validate", default_value_t = false)]
        validate: bool,

        // Output file path, defaults to stdout
        #[arg(short = 'o', long = "output", required = false)]
        out_file: Option<PathBuf>,

        // Verbosity
        #[arg(long = "verbose", default_value_t = false)]
        verbose: bool,
    },

    // Validate a header against a JSON Schema
    Validate {
        // Input header, or a fasta or gfa file containing one
        #[arg(group = "input", required = true, help = "Input file")]
        input_file: PathBuf,

        // Input encoding, inferred from the extension if not given
        #[arg(long = "from", required = false)]
        from: Option<String>,

        // Schema file, defaults to the bundled FHT schema
        #[arg(long = "schema", required = false)]
        schema_file: Option<PathBuf>,

        // Verbosity
        #[arg(long = "verbose", default_value_t = false)]
        verbose: bool,
    },

    // Split a fasta or gfa file into header and body
    Strip {
        // Input fasta or gfa file
        #[arg(group = "input", required = true, help = "Input file")]
        input_file: PathBuf,

        // Input format, inferred from the extension if not given
        #[arg(long = "format", required = false)]
        format: Option<String>,

        // Write the header text here, discarded if not given
        #[arg(long = "header", required = false)]
        header_file: Option<PathBuf>,

        // Output file path for the body, defaults to stdout
        #[arg(short = 'o', long = "output", required = false)]
        out_file: Option<PathBuf>,

        // Verbosity
        #[arg(long = "verbose", default_value_t = false)]
        verbose: bool,
    },

    // Attach a header to a fasta or gfa file
    Combine {
        // Input fasta or gfa file
        #[arg(group = "input", required = true, help = "Input file")]
        input_file: PathBuf,

        // Header, or a fasta or gfa file containing one
        #[arg(long = "header", required = true)]
        header_file: PathBuf,

        // Header encoding, inferred from the extension if not given
        #[arg(long = "from", required = false)]
        from: Option<String>,

        // Re-encode the header before attaching it
        #[arg(long = "to", required = false)]
        to: Option<String>,

        // Input format, inferred from the extension if not given
        #[arg(long = "format", required = false)]
        format: Option<String>,

        // Output file path, defaults to <input>.fht.<extension>
        #[arg(short = 'o', long = "output", required = false)]
        out_file: Option<PathBuf>,

        // Verbosity
        #[arg(long = "verbose", default_value_t = false)]
        verbose: bool,
    },
}
