//! Reading and writing ship manifests.
//!
//! One line per cell: `[RR,CC], {WWWWW}, name`, 1-indexed with row 1 at deck
//! level. `NAN` marks a structurally unusable cell and `UNUSED` an empty one;
//! any other name is a container.

use std::fmt::Write as _;
use std::path::{Path, PathBuf};

use memchr::memchr;
use tracing::{debug, warn};

use crate::error::BalanceError;
use crate::grid::{ContainerId, Coord, Grid, Slot, COLS, ROWS};

const BLOCKED_TOKEN: &str = "NAN";
const EMPTY_TOKEN: &str = "UNUSED";

/// A parsed manifest: the grid plus the names its containers carry.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct Manifest {
    grid: Grid,
    names: Vec<String>,
}

impl Manifest {
    #[inline]
    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    /// Name of a container; ids come from grids derived from this manifest.
    pub fn name(&self, id: ContainerId) -> &str {
        self.names
            .get(id.0 as usize)
            .map_or("<unknown>", String::as_str)
    }

    /// Renders `grid` in manifest form using this manifest's container names.
    pub fn render(&self, grid: &Grid) -> String {
        let mut out = String::with_capacity(ROWS * COLS * 24);
        for (coord, slot) in grid.slots() {
            let (weight, token) = match slot {
                Slot::Blocked => (0, BLOCKED_TOKEN),
                Slot::Empty => (0, EMPTY_TOKEN),
                Slot::Occupied { weight, id } => (weight, self.name(id)),
            };
            // Writing to a String cannot fail.
            let _ = writeln!(out, "{coord}, {{{weight:05}}}, {token}");
        }
        out
    }
}

/// Parses manifest text. Lines that cannot be read are skipped.
pub fn parse_manifest(text: &str) -> Result<Manifest, BalanceError> {
    let mut cells = Vec::with_capacity(ROWS * COLS);
    let mut names: Vec<String> = Vec::new();

    for (number, raw) in text.lines().enumerate() {
        let line = raw.trim();
        if line.is_empty() {
            continue;
        }

        let Some((coord, weight, token)) = parse_line(line) else {
            warn!(line = number + 1, content = line, "skipping unreadable manifest line");
            continue;
        };

        let slot = match token {
            BLOCKED_TOKEN => Slot::Blocked,
            EMPTY_TOKEN => Slot::Empty,
            name => {
                let id = u16::try_from(names.len())
                    .map_err(|_| BalanceError::TooManyContainers {
                        max: u16::MAX as usize,
                    })?;
                names.push(name.to_owned());
                Slot::Occupied {
                    weight,
                    id: ContainerId(id),
                }
            }
        };
        cells.push((coord, slot));
    }

    if cells.is_empty() {
        return Err(BalanceError::EmptyManifest);
    }

    debug!(cells = cells.len(), containers = names.len(), "parsed manifest");
    Ok(Manifest {
        grid: Grid::from_slots(cells)?,
        names,
    })
}

/// Splits `[r,c], {w}, token` into its parts, rejecting out-of-grid cells.
fn parse_line(line: &str) -> Option<(Coord, u32, &str)> {
    let bytes = line.as_bytes();
    let first = memchr(b',', bytes)?;
    let second = first + 1 + memchr(b',', &bytes[first + 1..])?;
    let third = second + 1 + memchr(b',', &bytes[second + 1..])?;

    let row: usize = line[..first].trim().strip_prefix('[')?.trim().parse().ok()?;
    let col: usize = line[first + 1..second]
        .trim()
        .strip_suffix(']')?
        .trim()
        .parse()
        .ok()?;
    let weight: u32 = line[second + 1..third]
        .trim()
        .strip_prefix('{')?
        .strip_suffix('}')?
        .trim()
        .parse()
        .ok()?;
    let token = line[third + 1..].trim();

    if token.is_empty() || !(1..=ROWS).contains(&row) || !(1..=COLS).contains(&col) {
        return None;
    }
    Some((Coord::new((row - 1) as u8, (col - 1) as u8), weight, token))
}

pub fn load_manifest(path: impl AsRef<Path>) -> Result<Manifest, BalanceError> {
    let path = path.as_ref();
    let text = std::fs::read_to_string(path).map_err(|source| BalanceError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    parse_manifest(&text)
}

/// `ship.txt` becomes `shipOUTBOUND.txt` in the same directory.
pub fn outbound_path(path: &Path) -> PathBuf {
    let stem = path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    let name = match path.extension() {
        Some(ext) => format!("{stem}OUTBOUND.{}", ext.to_string_lossy()),
        None => format!("{stem}OUTBOUND"),
    };
    path.with_file_name(name)
}

pub fn write_manifest(path: &Path, contents: &str) -> Result<(), BalanceError> {
    std::fs::write(path, contents).map_err(|source| BalanceError::Write {
        path: path.to_path_buf(),
        source,
    })
}
