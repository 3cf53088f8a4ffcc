use anyhow::{Context, Result, bail};
use recordmatch::{Catalogue, FieldKey, Genre, Kind, Record, TEXT_MODE_ENV, TextMode, Value};
use std::path::PathBuf;
use std::process::{Command, Output};

pub fn catalogue_find() -> PathBuf {
    PathBuf::from(env!("CARGO_BIN_EXE_catalogue-find"))
}

/// `catalogue-find` with the text-mode variable cleared so the caller's
/// environment cannot change the comparison mode.
pub fn catalogue_find_command() -> Command {
    let mut cmd = Command::new(catalogue_find());
    cmd.env_remove(TEXT_MODE_ENV);
    cmd
}

pub fn run_command(mut cmd: Command) -> Result<Output> {
    let output = cmd
        .output()
        .with_context(|| format!("failed to run command: {:?}", cmd))?;
    if output.status.success() {
        Ok(output)
    } else {
        bail!(
            "command {:?} failed: status {:?}\nstdout: {}\nstderr: {}",
            cmd,
            output.status.code(),
            String::from_utf8_lossy(&output.stdout),
            String::from_utf8_lossy(&output.stderr)
        )
    }
}

pub fn novel(title: &str, last: &str, first: &str, year: i64, genre: Genre) -> Vec<(FieldKey, Value)> {
    vec![
        (FieldKey::Title, Value::text(title)),
        (FieldKey::Last, Value::text(last)),
        (FieldKey::First, Value::text(first)),
        (FieldKey::Year, Value::Integer(year)),
        (FieldKey::Genre, Value::from(genre)),
    ]
}

/// "Life of Pi" followed by "Carrie", both fiction.
pub fn two_novels(mode: TextMode) -> Result<Catalogue> {
    let mut catalogue = Catalogue::with_text_mode(mode);
    catalogue.insert(
        Kind::Fiction,
        novel("Life of Pi", "Martel", "Yann", 2003, Genre::Adventure),
    )?;
    catalogue.insert(
        Kind::Fiction,
        novel("Carrie", "King", "Stephen", 1974, Genre::Horror),
    )?;
    Ok(catalogue)
}

pub fn titles(records: &[&Record]) -> Vec<String> {
    records
        .iter()
        .filter_map(|record| match record.get(FieldKey::Title) {
            Some(Value::Text(title)) => Some(title.clone()),
            _ => None,
        })
        .collect()
}
