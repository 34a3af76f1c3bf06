//! Roster import from CSV.

use crate::models::{Member, Session, SessionError, SkillLevel, Timestamp};
use std::collections::HashSet;
use std::io::Read;

/// Data rows required for an import to be accepted.
pub const MIN_IMPORT_ROWS: usize = 1;

/// Import roster members from CSV with a header row: a `name` column (required) and a
/// `level` column (optional; beginner, intermediate or advanced, blank means beginner).
///
/// All-or-nothing: a missing column, a blank name, an unknown level or fewer than
/// [`MIN_IMPORT_ROWS`] rows reject the whole file. Names already on the roster, or repeated
/// in the file, are skipped. Returns the number of members added.
pub fn import_members_csv<R: Read>(
    session: &mut Session,
    reader: R,
    now: Timestamp,
) -> Result<usize, SessionError> {
    let mut rdr = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .flexible(true)
        .from_reader(reader);

    let headers = rdr
        .headers()
        .map_err(|e| SessionError::MalformedImport(e.to_string()))?
        .clone();
    let column = |wanted: &str| {
        headers
            .iter()
            .position(|h| h.trim_start_matches('\u{feff}').eq_ignore_ascii_case(wanted))
    };
    let name_col = column("name")
        .ok_or_else(|| SessionError::MalformedImport("missing 'name' column".to_string()))?;
    let level_col = column("level");

    let mut rows: Vec<(String, SkillLevel)> = Vec::new();
    for (i, record) in rdr.records().enumerate() {
        let line = i + 2;
        let record = record.map_err(|e| SessionError::MalformedImport(e.to_string()))?;
        let name = record.get(name_col).unwrap_or("").to_string();
        if name.is_empty() {
            return Err(SessionError::MalformedImport(format!(
                "line {}: name is empty",
                line
            )));
        }
        let level = match level_col.and_then(|c| record.get(c)) {
            Some(raw) => raw
                .parse::<SkillLevel>()
                .map_err(|e| SessionError::MalformedImport(format!("line {}: {}", line, e)))?,
            None => SkillLevel::default(),
        };
        rows.push((name, level));
    }
    if rows.len() < MIN_IMPORT_ROWS {
        return Err(SessionError::MalformedImport(format!(
            "need at least {} row(s), found {}",
            MIN_IMPORT_ROWS,
            rows.len()
        )));
    }

    let mut known: HashSet<String> = session
        .members
        .iter()
        .map(|m| m.name.to_ascii_lowercase())
        .collect();
    let mut added = 0;
    for (name, level) in rows {
        if known.insert(name.to_ascii_lowercase()) {
            session.members.push(Member::new(name, level, now));
            added += 1;
        }
    }
    log::info!("Imported {} roster member(s)", added);
    Ok(added)
}
