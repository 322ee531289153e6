//! Print a binary or xml save as pretty json on stdout

use fsgsave::Format;
use std::{env, error, fs, io};

fn main() -> Result<(), Box<dyn error::Error>> {
    let args: Vec<String> = env::args().collect();
    let input = args.get(1).ok_or("usage: fsgsave-json <input>")?;

    let data = fs::read(input)?;
    let format = Format::detect(&data)
        .ok_or_else(|| format!("{} is neither a binary nor an xml save", input))?;
    let save = format.codec().deserialize(&mut data.as_slice())?;

    let stdout = io::stdout();
    serde_json::to_writer_pretty(stdout.lock(), &save)?;
    Ok(())
}
