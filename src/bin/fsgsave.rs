//! Convert a save between the binary and xml formats.
//!
//! ```text
//! fsgsave <input> [output]
//! ```
//!
//! The format of the input is sniffed and it is written out in the other
//! format. Without an output path, the output is written next to the input
//! with `.xml` or `.sav` appended. Set `RUST_LOG=debug` for more detail.

use fsgsave::Format;
use std::{
    env, error,
    fs::{self, File},
    io::BufWriter,
    path::PathBuf,
};

fn main() -> Result<(), Box<dyn error::Error>> {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let args: Vec<String> = env::args().collect();
    let input = args.get(1).ok_or("usage: fsgsave <input> [output]")?;

    let data = fs::read(input)?;
    let format = Format::detect(&data)
        .ok_or_else(|| format!("{} is neither a binary nor an xml save", input))?;
    let save = format.codec().deserialize(&mut data.as_slice())?;

    let target = format.opposite();
    let output = match args.get(2) {
        Some(path) => PathBuf::from(path),
        None => PathBuf::from(format!("{}.{}", input, target.extension())),
    };

    let mut writer = BufWriter::new(File::create(&output)?);
    target.codec().serialize(&mut writer, &save)?;

    tracing::info!(
        "converted {} ({:?}, {} sessions) to {} ({:?})",
        input,
        format,
        save.session_count(),
        output.display(),
        target
    );
    Ok(())
}
