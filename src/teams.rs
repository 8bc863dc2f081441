use crate::decode;
use crate::models::{Division, TeamRecord};
use anyhow::Result;
use std::path::Path;

pub fn read_teams(path: &Path) -> Result<Vec<TeamRecord>> {
    let text = decode::decode_file(path)?;
    Ok(parse_teams(&text))
}

/// One team per non-blank line. Blank lines consume neither a code nor a division slot.
/// `\n`, `\r\n` and bare `\r` all terminate a line.
pub fn parse_teams(text: &str) -> Vec<TeamRecord> {
    let mut teams: Vec<TeamRecord> = Vec::new();
    for line in text.split(['\n', '\r']) {
        let team_name = line.trim().trim_matches('"').trim();
        if team_name.is_empty() {
            continue;
        }
        let accepted = teams.len();
        teams.push(TeamRecord {
            team_code: format!("EMS-{:03}", accepted + 1),
            team_name: team_name.to_string(),
            division: Division::round_robin(accepted),
        });
    }
    teams
}
