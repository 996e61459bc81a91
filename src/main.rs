#![warn(clippy::pedantic)]

use std::env;
use std::fs;
use std::io::{self, BufRead, Write};

use anyhow::{bail, Context};
use mysql_uca::weights::BaseTable;
use mysql_uca::{catalog, Collation, WeightPadding};

const USAGE: &str = "\
usage: colldump --list
       colldump <collation>                 weight strings of stdin lines
       colldump --sort <collation>          stdin lines in collation order
       colldump --elements <collation>      table elements of each stdin character
       colldump --bake <allkeys> <path>     bake an allkeys-format table as bincode";

fn main() -> anyhow::Result<()> {
    let args: Vec<String> = env::args().skip(1).collect();
    let args: Vec<&str> = args.iter().map(String::as_str).collect();

    match args.as_slice() {
        ["--list"] => list(),
        ["--sort", name] => sort(lookup(name)?),
        ["--elements", name] => elements(lookup(name)?),
        ["--bake", source, path] => bake(source, path),
        [name] if !name.starts_with('-') => dump(lookup(name)?),
        _ => bail!("{USAGE}"),
    }
}

fn lookup(name: &str) -> anyhow::Result<&'static Collation> {
    let found = match name.parse::<u16>() {
        Ok(id) => catalog::from_id(id),
        Err(_) => catalog::from_name(name),
    };

    found.with_context(|| format!("unknown collation {name:?} (see --list)"))
}

fn list() -> anyhow::Result<()> {
    let mut out = io::stdout().lock();

    for collation in catalog::all() {
        let algorithm = match collation {
            Collation::Uca900(_) => "uca900",
            Collation::Legacy(_) => "uca400",
            Collation::Binary(_) => "binary",
        };

        writeln!(
            out,
            "{:>4}  {:<28}{:<9}{algorithm}",
            collation.id(),
            collation.name(),
            collation.charset().name()
        )?;
    }

    Ok(())
}

fn dump(collation: &Collation) -> anyhow::Result<()> {
    let mut out = io::stdout().lock();
    let mut key = Vec::new();

    for line in read_lines()? {
        key.clear();
        collation.weight_string(&mut key, line.as_bytes(), WeightPadding::None);

        let hex: String = key.iter().map(|b| format!("{b:02X}")).collect();
        writeln!(out, "{line}\t{hex}")?;
    }

    Ok(())
}

fn sort(collation: &Collation) -> anyhow::Result<()> {
    let mut lines = read_lines()?;
    lines.sort_by(|a, b| collation.collate(a.as_bytes(), b.as_bytes(), false));

    let mut out = io::stdout().lock();
    for line in lines {
        writeln!(out, "{line}")?;
    }

    Ok(())
}

fn elements(collation: &Collation) -> anyhow::Result<()> {
    let table = match collation.weights() {
        Some(table) => table,
        None => bail!("{} has no weight table", collation.name()),
    };

    let mut out = io::stdout().lock();

    for line in read_lines()? {
        for c in line.chars() {
            let cp = u32::from(c);
            let elements: String = match table.lookup(cp) {
                Some(weights) => weights
                    .iter()
                    .map(|w| format!("[{:04X}.{:04X}.{:04X}]", w.primary, w.secondary, w.tertiary))
                    .collect(),
                None => "implicit".to_owned(),
            };

            writeln!(out, "{cp:04X}\t{elements}")?;
        }
    }

    Ok(())
}

fn bake(source: &str, path: &str) -> anyhow::Result<()> {
    let text = fs::read_to_string(source).with_context(|| format!("reading {source}"))?;
    let table = BaseTable::from_allkeys(&text).with_context(|| format!("parsing {source}"))?;
    let bytes = table.to_bincode().context("serializing")?;

    fs::write(path, &bytes).with_context(|| format!("writing {path}"))?;

    eprintln!(
        "{source}: {} code points, {} contractions, {} bytes -> {path}",
        table.weights.len(),
        table.contractions.len(),
        bytes.len()
    );

    Ok(())
}

fn read_lines() -> anyhow::Result<Vec<String>> {
    io::stdin()
        .lock()
        .lines()
        .collect::<Result<_, _>>()
        .context("reading stdin")
}
