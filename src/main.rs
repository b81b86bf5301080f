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
use std::fs::File;
use std::io::BufReader;
use std::io::BufWriter;
use std::io::Read;
use std::io::Write;
use std::path::Path;
use std::path::PathBuf;
use std::str::FromStr;

use clap::Parser;
use flate2::Compression;
use flate2::read::MultiGzDecoder;
use flate2::write::GzEncoder;

use fht::{BodyFormat, Encoding, FhtError};

mod cli;

/// Initializes the logger with verbosity given in `log_max_level`.
fn init_log(log_max_level: usize) {
    let res = stderrlog::new()
    .module(module_path!())
    .quiet(false)
    .verbosity(log_max_level)
    .timestamp(stderrlog::Timestamp::Off)
    .init();
    if let Err(err) = res {
        eprintln!("Could not initialize logging: {}", err);
    }
}

fn is_gzipped(path: &Path) -> bool {
    path.extension().is_some_and(|ext| ext == "gz")
}

/// Opens `path` for reading, decompressing `.gz` files.
fn open_input(
    path: &Path,
) -> Result<Box<dyn Read>, FhtError> {
    let file = BufReader::new(File::open(path)?);
    if is_gzipped(path) {
        Ok(Box::new(MultiGzDecoder::new(file)))
    } else {
        Ok(Box::new(file))
    }
}

/// Writes `bytes` to `path`, or to stdout if `path` is None.
///
/// `.gz` paths are compressed.
fn write_output(
    path: Option<&Path>,
    bytes: &[u8],
) -> Result<(), FhtError> {
    match path {
        Some(path) if is_gzipped(path) => {
            let mut conn_out = GzEncoder::new(BufWriter::new(File::create(path)?), Compression::default());
            conn_out.write_all(bytes)?;
            conn_out.finish()?.flush()?;
        },
        Some(path) => {
            let mut conn_out = BufWriter::new(File::create(path)?);
            conn_out.write_all(bytes)?;
            conn_out.flush()?;
        },
        None => {
            let mut conn_out = std::io::stdout().lock();
            conn_out.write_all(bytes)?;
            conn_out.flush()?;
        },
    }
    Ok(())
}

fn body_format(
    path: &Path,
    format: Option<&str>,
) -> Result<BodyFormat, FhtError> {
    let format = match format {
        Some(name) => BodyFormat::from_str(name).ok(),
        None => BodyFormat::from_extension(path),
    };
    format.ok_or_else(|| FhtError::Io(std::io::Error::new(
        std::io::ErrorKind::InvalidInput,
        format!("cannot tell whether {} is fasta or gfa, use --format", path.display()),
    )))
}

/// Reads header text from `path`, stripping it out first if `path` is a fasta or gfa file.
fn read_header_text(
    path: &Path,
    from: Option<&str>,
) -> Result<(String, Encoding), FhtError> {
    let from = from.map(Encoding::from_str).transpose()?;
    let mut conn_in = open_input(path)?;

    if let Some(format) = BodyFormat::from_extension(path) {
        let detached = fht::strip_from_read(format, &mut conn_in)?;
        let encoding = from.or(detached.encoding()).ok_or_else(|| FhtError::HeaderExtraction {
            start: 0,
            end: 0,
            reason: format!("{} does not contain a header", path.display()),
        })?;
        let (header, _) = detached.into_parts();
        return Ok((header, encoding))
    }

    let encoding = match from {
        Some(encoding) => encoding,
        None => Encoding::from_extension(path)
            .ok_or_else(|| FhtError::UnsupportedEncoding(path.display().to_string()))?,
    };
    let mut text = String::new();
    conn_in.read_to_string(&mut text)?;
    Ok((text, encoding))
}

fn read_schema(
    path: Option<&Path>,
) -> Result<serde_json::Value, FhtError> {
    match path {
        Some(path) => serde_json::from_reader(open_input(path)?)
            .map_err(|err| FhtError::InvalidSchema(format!("{}: {}", path.display(), err))),
        None => fht::schema::fht_schema(),
    }
}

/// Number of records in a body, or None if it cannot be parsed.
fn count_records(
    format: BodyFormat,
    body: &[u8],
) -> Option<usize> {
    match format {
        BodyFormat::Gfa => Some(body.split(|byte| *byte == b'\n').filter(|line| line.starts_with(b"S\t")).count()),
        BodyFormat::Fasta => {
            if body.is_empty() {
                return Some(0)
            }
            let mut reader = needletail::parse_fastx_reader(std::io::Cursor::new(body)).ok()?;
            let mut count = 0;
            while let Some(record) = reader.next() {
                record.ok()?;
                count += 1;
            }
            Some(count)
        },
        _ => None,
    }
}

/// Default combine output: `genome.fa` becomes `genome.fht.fa`.
fn combined_path(
    path: &Path,
) -> PathBuf {
    let gz = is_gzipped(path);
    let base = if gz { path.with_extension("") } else { path.to_path_buf() };
    let ext = base.extension().map(|ext| ext.to_string_lossy().to_string()).unwrap_or_default();
    let mut out = base.with_extension(format!("fht.{}", ext));
    if gz {
        out = PathBuf::from(out.to_string_lossy().to_string() + ".gz");
    }
    out
}

fn convert(
    input_file: &Path,
    from: Option<&str>,
    to: &str,
    schema_file: Option<&Path>,
    validate: bool,
    out_file: Option<&Path>,
) -> Result<(), FhtError> {
    let to = Encoding::from_str(to)?;
    let (text, from) = read_header_text(input_file, from)?;

    let schema = if validate || schema_file.is_some() {
        Some(read_schema(schema_file)?)
    } else {
        None
    };

    let target = fht::convert(&text, from, to, schema.as_ref())?;
    log::info!("Converted {} from {} to {}", input_file.display(), from, to);
    write_output(out_file, target.as_bytes())
}

fn validate(
    input_file: &Path,
    from: Option<&str>,
    schema_file: Option<&Path>,
) -> Result<(), FhtError> {
    let (text, encoding) = read_header_text(input_file, from)?;
    let schema = read_schema(schema_file)?;

    let result = fht::validate_only(&text, encoding, &schema)?;
    result.violations().iter().for_each(|violation| {
        log::error!("{}: {}", input_file.display(), violation);
    });
    result.into_result()?;

    write_output(None, format!("{}: valid\n", input_file.display()).as_bytes())
}

fn strip(
    input_file: &Path,
    format: Option<&str>,
    header_file: Option<&Path>,
    out_file: Option<&Path>,
) -> Result<(), FhtError> {
    let format = body_format(input_file, format)?;
    let mut conn_in = open_input(input_file)?;
    let detached = fht::strip_from_read(format, &mut conn_in)?;

    match detached.encoding() {
        Some(encoding) => log::info!("Found {} header in {}", encoding, input_file.display()),
        None => log::info!("No header in {}", input_file.display()),
    }
    if let Some(n_records) = count_records(format, detached.body()) {
        log::info!("Body contains {} records", n_records);
    }

    let (header, body) = detached.into_parts();
    if let Some(header_file) = header_file {
        write_output(Some(header_file), header.as_bytes())?;
    }
    write_output(out_file, &body)
}

fn combine(
    input_file: &Path,
    header_file: &Path,
    from: Option<&str>,
    to: Option<&str>,
    format: Option<&str>,
    out_file: Option<&Path>,
) -> Result<(), FhtError> {
    let format = body_format(input_file, format)?;
    let (mut header, encoding) = read_header_text(header_file, from)?;
    if let Some(to) = to {
        header = fht::convert(&header, encoding, Encoding::from_str(to)?, None)?;
    }
    if !header.is_empty() && !header.ends_with('\n') {
        header.push('\n');
    }

    let mut body: Vec<u8> = Vec::new();
    open_input(input_file)?.read_to_end(&mut body)?;
    let combined = format.combine(&header, &body)?;

    let out_path = out_file.map(|path| path.to_path_buf()).unwrap_or_else(|| combined_path(input_file));
    write_output(Some(&out_path), &combined)?;
    log::info!("Wrote {}", out_path.display());
    Ok(())
}

fn main() {
    let cli = cli::Cli::parse();

    // Subcommands:
    let res = match &cli.command {
        // Convert
        Some(cli::Commands::Convert {
            input_file,
            from,
            to,
            schema_file,
            validate,
            out_file,
            verbose,
        }) => {
            init_log(if *verbose { 2 } else { 1 });
            convert(input_file, from.as_deref(), to, schema_file.as_deref(), *validate, out_file.as_deref())
        },

        // Validate
        Some(cli::Commands::Validate {
            input_file,
            from,
            schema_file,
            verbose,
        }) => {
            init_log(if *verbose { 2 } else { 1 });
            validate(input_file, from.as_deref(), schema_file.as_deref())
        },

        // Strip
        Some(cli::Commands::Strip {
            input_file,
            format,
            header_file,
            out_file,
            verbose,
        }) => {
            init_log(if *verbose { 2 } else { 1 });
            strip(input_file, format.as_deref(), header_file.as_deref(), out_file.as_deref())
        },

        // Combine
        Some(cli::Commands::Combine {
            input_file,
            header_file,
            from,
            to,
            format,
            out_file,
            verbose,
        }) => {
            init_log(if *verbose { 2 } else { 1 });
            combine(input_file, header_file, from.as_deref(), to.as_deref(), format.as_deref(), out_file.as_deref())
        },

        None => {
            init_log(1);
            log::error!("No subcommand given, see `fht --help`");
            std::process::exit(1);
        },
    };

    if let Err(err) = res {
        log::error!("{}", err);
        std::process::exit(1);
    }
}

// Tests
#[cfg(test)]
mod tests {

    #[test]
    fn combined_path_inserts_fht() {
        use super::combined_path;
        use std::path::{Path, PathBuf};

        assert_eq!(combined_path(Path::new("genome.fa")), PathBuf::from("genome.fht.fa"));
        assert_eq!(combined_path(Path::new("graph.gfa.gz")), PathBuf::from("graph.fht.gfa.gz"));
    }

    #[test]
    fn count_records_fasta_and_gfa() {
        use super::count_records;
        use fht::BodyFormat;

        assert_eq!(count_records(BodyFormat::Fasta, b">seq1\nACGT\n>seq2\nGG\n"), Some(2));
        assert_eq!(count_records(BodyFormat::Fasta, b""), Some(0));
        assert_eq!(count_records(BodyFormat::Gfa, b"H\tVN:Z:1.0\nS\t1\tACGT\nS\t2\tGG\nL\t1\t+\t2\t+\t0M\n"), Some(2));
    }
}
