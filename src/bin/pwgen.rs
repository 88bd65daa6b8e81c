use std::io::{self, BufRead, Write};
use std::process::ExitCode;

use clap::Parser;
use tankobon::password::{generate_password, parse_length};

/// Prints a random password of printable ASCII characters.
#[derive(Parser, Debug)]
#[clap(author, version, about)]
struct Args {
    /// Password length; prompted for when omitted (default 10)
    length: Option<String>,
}

fn main() -> ExitCode {
    if let Err(e) = try_main() {
        eprintln!("Error: {e}");
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}

fn try_main() -> io::Result<()> {
    let args = Args::parse();

    let requested = match args.length {
        Some(length) => length,
        None => {
            let mut stdout = io::stdout().lock();
            write!(stdout, "Length(default 10): ")?;
            stdout.flush()?;

            let mut line = String::new();
            io::stdin().lock().read_line(&mut line)?;
            line
        }
    };

    let password = generate_password(parse_length(&requested), &mut rand::thread_rng());
    println!("Take it:\n{password}");
    Ok(())
}
