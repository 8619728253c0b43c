// src/table/mod.rs

use anyhow::{Context, Result};
use csv::{ReaderBuilder, Writer};
use std::fs::File;
use std::path::{Path, PathBuf};

use crate::resolve::ResolvedProfile;

pub const NAME_COLUMN: &str = "Informal Name";

/// Enrichment column headers, in output order. `Roster::load` guarantees all
/// of them exist so `apply` can write unconditionally.
pub const ENRICHMENT_COLUMNS: &[&str] = &[
    "Date of Lookup",
    "LinkedIn URL",
    "Current Employer Name",
    "Job Title",
    "Employment City",
    "Employment State",
    "Employment Country",
    "Currently Pursuing Education",
    "School Name",
    "Degree Name",
    "Field of Study",
    "Attended Target School",
];

/// In-memory copy of the roster CSV. Loaded once, mutated one row-update at
/// a time by the batch loop, written back once by `flush`.
pub struct Roster {
    path: PathBuf,
    headers: Vec<String>,
    rows: Vec<Vec<String>>,
    name_idx: usize,
}

impl Roster {
    /// Read the roster from `path`. The name column is required; missing
    /// enrichment columns are appended (rows padded with blanks) so a
    /// name-only roster can be enriched in place.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let file = File::open(&path).with_context(|| format!("opening roster {:?}", path))?;
        let mut rdr = ReaderBuilder::new().flexible(true).from_reader(file);

        let mut headers: Vec<String> = rdr
            .headers()
            .context("reading roster header row")?
            .iter()
            .map(str::to_string)
            .collect();
        let name_idx = headers
            .iter()
            .position(|h| h == NAME_COLUMN)
            .with_context(|| format!("roster has no {:?} column", NAME_COLUMN))?;

        for col in ENRICHMENT_COLUMNS {
            if !headers.iter().any(|h| h == col) {
                headers.push(col.to_string());
            }
        }

        let mut rows = Vec::new();
        for (idx, record) in rdr.records().enumerate() {
            let record =
                record.with_context(|| format!("CSV parse error at data row {}", idx + 1))?;
            let mut row: Vec<String> = record.iter().map(str::to_string).collect();
            row.resize(headers.len(), String::new());
            rows.push(row);
        }

        Ok(Self {
            path,
            headers,
            rows,
            name_idx,
        })
    }

    /// Names to process: the non-blank values of the name column, in file
    /// order.
    pub fn names(&self) -> Vec<String> {
        self.rows
            .iter()
            .map(|row| row[self.name_idx].trim())
            .filter(|name| !name.is_empty())
            .map(str::to_string)
            .collect()
    }

    /// Merge `profile` into every row whose name matches, writing the full
    /// enrichment field set atomically. Rows for other names are untouched.
    /// Returns the number of rows updated.
    pub fn apply(&mut self, profile: &ResolvedProfile) -> usize {
        let values: [(&str, &str); 12] = [
            ("Date of Lookup", &profile.date_of_lookup),
            (
                "LinkedIn URL",
                profile.linkedin_url.as_deref().unwrap_or_default(),
            ),
            ("Current Employer Name", &profile.current_employer_name),
            ("Job Title", &profile.job_title),
            ("Employment City", &profile.employment_city),
            ("Employment State", &profile.employment_state),
            ("Employment Country", &profile.employment_country),
            (
                "Currently Pursuing Education",
                &profile.currently_pursuing_education,
            ),
            ("School Name", &profile.school_name),
            ("Degree Name", &profile.degree_name),
            ("Field of Study", &profile.field_of_study),
            ("Attended Target School", &profile.attended_target_school),
        ];
        let indices: Vec<(usize, &str)> = values
            .iter()
            .filter_map(|(col, value)| {
                self.headers
                    .iter()
                    .position(|h| h == col)
                    .map(|idx| (idx, *value))
            })
            .collect();

        let mut updated = 0;
        for row in &mut self.rows {
            if row[self.name_idx].trim() != profile.informal_name {
                continue;
            }
            for &(idx, value) in &indices {
                row[idx] = value.to_string();
            }
            updated += 1;
        }
        updated
    }

    /// Rewrite the whole roster to its original path.
    pub fn flush(&self) -> Result<()> {
        let mut wtr = Writer::from_path(&self.path)
            .with_context(|| format!("opening roster {:?} for writing", self.path))?;
        wtr.write_record(&self.headers)
            .context("writing roster header row")?;
        for row in &self.rows {
            wtr.write_record(row).context("writing roster row")?;
        }
        wtr.flush().context("flushing roster")?;
        Ok(())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}
