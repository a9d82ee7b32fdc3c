use std::{
    fs::{File, OpenOptions},
    io::{self, BufReader, BufWriter},
    process::ExitCode,
};

use reverse_lines::{LineStore, ReverseError, StorageIdentity};

const USAGE: &str = "usage: reverse <input> <output>";

fn main() -> ExitCode {
    let mut args = std::env::args();
    args.next();
    let run = match (args.next(), args.next(), args.next()) {
        (None, _, _) => reverse_stdin_stdout(),
        (Some(input), None, _) => reverse_file_stdout(&input),
        (Some(input), Some(output), None) => reverse_file_file(&input, &output),
        (Some(_), Some(_), Some(_)) => {
            eprintln!("{USAGE}");
            return ExitCode::FAILURE;
        }
    };

    match run {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            match err {
                // "malloc failed" carries no program prefix.
                ReverseError::OutOfMemory(_) => eprintln!("{err}"),
                _ => eprintln!("reverse: {err}"),
            }
            ExitCode::FAILURE
        }
    }
}

fn reverse_stdin_stdout() -> Result<(), ReverseError> {
    let stdin = io::stdin();
    let store = LineStore::fill(stdin.lock())?;
    let stdout = io::stdout();
    store.drain_reverse(&mut stdout.lock())
}

fn reverse_file_stdout(input_path: &str) -> Result<(), ReverseError> {
    let input = open_input(input_path)?;
    let store = LineStore::fill(input)?;
    let stdout = io::stdout();
    store.drain_reverse(&mut stdout.lock())
}

fn reverse_file_file(input_path: &str, output_path: &str) -> Result<(), ReverseError> {
    // Both identities must resolve before either file is opened, so an
    // output path that does not exist is rejected rather than created.
    let input_identity = identity_of(input_path)?;
    let output_identity = identity_of(output_path)?;
    if input_identity == output_identity {
        return Err(ReverseError::SameFile);
    }

    let input = open_input(input_path)?;
    let store = LineStore::fill(input)?;

    // The output is opened and truncated only after the whole input has
    // been read; a fill failure leaves its previous content intact.
    let output = OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(true)
        .open(output_path)
        .map_err(|_| ReverseError::CannotOpen(output_path.to_owned()))?;
    store.drain_reverse(&mut BufWriter::new(output))
}

fn open_input(path: &str) -> Result<BufReader<File>, ReverseError> {
    let file = OpenOptions::new()
        .read(true)
        .open(path)
        .map_err(|_| ReverseError::CannotOpen(path.to_owned()))?;
    Ok(BufReader::new(file))
}

fn identity_of(path: &str) -> Result<StorageIdentity, ReverseError> {
    StorageIdentity::of(path).map_err(|_| ReverseError::CannotOpen(path.to_owned()))
}
