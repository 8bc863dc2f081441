use crate::models::{CaseSeed, Division, HospitalRecord, TeamRecord};

/// DDL templates, in creation order. Drops run in the reverse of this order.
const CREATE_EMERGENCY_TEAMS: &str = r#"CREATE TABLE emergency_teams (
  id SERIAL PRIMARY KEY,
  team_code TEXT NOT NULL UNIQUE,
  team_name TEXT NOT NULL,
  division TEXT NOT NULL CHECK (division IN ('1部', '2部', '3部')),
  created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
);"#;

const CREATE_HOSPITALS: &str = r#"CREATE TABLE hospitals (
  id SERIAL PRIMARY KEY,
  source_no INTEGER NOT NULL UNIQUE,
  municipality TEXT NOT NULL,
  name TEXT NOT NULL,
  postal_code TEXT,
  address TEXT NOT NULL,
  phone TEXT,
  latitude DOUBLE PRECISION,
  longitude DOUBLE PRECISION,
  geocoded BOOLEAN NOT NULL DEFAULT FALSE,
  created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
);"#;

const CREATE_CASES: &str = r#"CREATE TABLE cases (
  id SERIAL PRIMARY KEY,
  case_id TEXT NOT NULL UNIQUE,
  division TEXT NOT NULL CHECK (division IN ('1部', '2部', '3部')),
  aware_date TEXT NOT NULL,
  aware_time TEXT NOT NULL,
  patient_name TEXT NOT NULL,
  age INTEGER NOT NULL,
  address TEXT NOT NULL,
  symptom TEXT,
  destination TEXT,
  note TEXT,
  team_id INTEGER REFERENCES emergency_teams(id),
  created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
);"#;

const DROP_TABLES: &[&str] = &["cases", "hospitals", "emergency_teams"];

const INSERT_TEAMS: &str = "INSERT INTO emergency_teams (team_code, team_name, division) VALUES";
const INSERT_HOSPITALS: &str = "INSERT INTO hospitals (source_no, municipality, name, postal_code, address, phone, latitude, longitude, geocoded) VALUES";
const INSERT_CASES: &str = "INSERT INTO cases (case_id, division, aware_date, aware_time, patient_name, age, address, symptom, destination, note, team_id) VALUES";

/// Demonstration cases seeded on every run. `team_id` assumes at least three teams.
pub const DEMO_CASES: [CaseSeed; 3] = [
    CaseSeed {
        case_id: "C-260225-001",
        division: Division::First,
        aware_date: "2/23",
        aware_time: "8:14",
        patient_name: "山田 太郎",
        age: 74,
        address: "世田谷区三軒茶屋2-5-1",
        symptom: "胸痛",
        destination: Some("都立広域医療センター"),
        note: "現場で酸素投与を開始。",
        team_id: 1,
    },
    CaseSeed {
        case_id: "C-260225-002",
        division: Division::Second,
        aware_date: "2/23",
        aware_time: "9:42",
        patient_name: "佐藤 花子",
        age: 63,
        address: "大田区蒲田4-10-6",
        symptom: "呼吸困難",
        destination: Some("蒲田総合病院"),
        note: "家族へ現場で説明済み。",
        team_id: 2,
    },
    CaseSeed {
        case_id: "C-260225-003",
        division: Division::Third,
        aware_date: "2/23",
        aware_time: "11:07",
        patient_name: "伊藤 健",
        age: 58,
        address: "品川区南大井6-18-3",
        symptom: "めまい",
        destination: None,
        note: "搬送中バイタル安定。",
        team_id: 3,
    },
];

/// Standard SQL literal escaping: embedded single quotes are doubled.
pub fn sql_escape(value: &str) -> String {
    value.replace('\'', "''")
}

fn quoted(value: &str) -> String {
    format!("'{}'", sql_escape(value))
}

fn nullable_quoted(value: Option<&str>) -> String {
    value.map_or_else(|| "NULL".to_string(), quoted)
}

/// Fixed 8-decimal rendering, or `NULL` when absent.
pub fn format_coordinate(value: Option<f64>) -> String {
    match value {
        Some(v) => format!("{v:.8}"),
        None => "NULL".to_string(),
    }
}

pub fn team_values(team: &TeamRecord) -> String {
    format!(
        "({}, {}, {})",
        quoted(&team.team_code),
        quoted(&team.team_name),
        quoted(team.division.label()),
    )
}

pub fn hospital_values(h: &HospitalRecord) -> String {
    format!(
        "({}, {}, {}, {}, {}, {}, {}, {}, {})",
        h.source_no,
        quoted(&h.municipality),
        quoted(&h.name),
        quoted(&h.postal_code),
        quoted(&h.address),
        quoted(&h.phone),
        format_coordinate(h.latitude()),
        format_coordinate(h.longitude()),
        if h.geocoded() { "TRUE" } else { "FALSE" },
    )
}

pub fn case_values(c: &CaseSeed) -> String {
    format!(
        "({}, {}, {}, {}, {}, {}, {}, {}, {}, {}, {})",
        quoted(c.case_id),
        quoted(c.division.label()),
        quoted(c.aware_date),
        quoted(c.aware_time),
        quoted(c.patient_name),
        c.age,
        quoted(c.address),
        quoted(c.symptom),
        nullable_quoted(c.destination),
        quoted(c.note),
        c.team_id,
    )
}

/// Appends one multi-row INSERT. Nothing is written for an empty row set,
/// since `VALUES;` is not valid SQL.
fn push_insert(lines: &mut Vec<String>, header: &str, rows: Vec<String>) {
    if rows.is_empty() {
        return;
    }
    lines.push(header.to_string());
    let body = rows
        .iter()
        .map(|row| format!("  {row}"))
        .collect::<Vec<_>>()
        .join(",\n");
    lines.push(format!("{body};"));
    lines.push(String::new());
}

/// Builds the full reset-and-seed script. Output depends only on the inputs.
pub fn build_script(hospitals: &[HospitalRecord], teams: &[TeamRecord]) -> String {
    let mut lines: Vec<String> = Vec::new();

    lines.push("-- Reset and rebuild tables".to_string());
    for table in DROP_TABLES {
        lines.push(format!("DROP TABLE IF EXISTS {table} CASCADE;"));
    }
    lines.push(String::new());

    for ddl in [CREATE_EMERGENCY_TEAMS, CREATE_HOSPITALS, CREATE_CASES] {
        lines.push(ddl.to_string());
        lines.push(String::new());
    }

    push_insert(&mut lines, INSERT_TEAMS, teams.iter().map(team_values).collect());
    push_insert(
        &mut lines,
        INSERT_HOSPITALS,
        hospitals.iter().map(hospital_values).collect(),
    );
    push_insert(&mut lines, INSERT_CASES, DEMO_CASES.iter().map(case_values).collect());

    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Coordinates;

    fn hospital(no: u32, coordinates: Option<Coordinates>) -> HospitalRecord {
        HospitalRecord {
            source_no: no,
            municipality: "渋谷区".into(),
            name: "渋谷病院".into(),
            postal_code: "150-0002".into(),
            address: "渋谷区渋谷1-1-1".into(),
            phone: "03-0000-0000".into(),
            coordinates,
        }
    }

    fn team(code: &str, name: &str, division: Division) -> TeamRecord {
        TeamRecord {
            team_code: code.into(),
            team_name: name.into(),
            division,
        }
    }

    #[test]
    fn escape_doubles_single_quotes() {
        assert_eq!(sql_escape("O'Brien's"), "O''Brien''s");
        assert_eq!(sql_escape("plain"), "plain");
    }

    #[test]
    fn coordinate_formatting() {
        assert_eq!(format_coordinate(Some(35.1)), "35.10000000");
        assert_eq!(format_coordinate(Some(-0.123456789)), "-0.12345679");
        assert_eq!(format_coordinate(None), "NULL");
    }

    #[test]
    fn geocoded_hospital_row() {
        let row = hospital_values(&hospital(1, Some(Coordinates::new(35.1, 139.2))));
        assert_eq!(
            row,
            "(1, '渋谷区', '渋谷病院', '150-0002', '渋谷区渋谷1-1-1', '03-0000-0000', 35.10000000, 139.20000000, TRUE)"
        );
    }

    #[test]
    fn ungeocoded_hospital_row() {
        let row = hospital_values(&hospital(2, None));
        assert!(row.ends_with("'03-0000-0000', NULL, NULL, FALSE)"));
    }

    #[test]
    fn case_with_null_destination() {
        let row = case_values(&DEMO_CASES[2]);
        assert_eq!(
            row,
            "('C-260225-003', '3部', '2/23', '11:07', '伊藤 健', 58, '品川区南大井6-18-3', 'めまい', NULL, '搬送中バイタル安定。', 3)"
        );
    }

    #[test]
    fn script_statement_order() {
        let script = build_script(
            &[hospital(1, None)],
            &[team("EMS-001", "Alpha", Division::First)],
        );
        let pos = |needle: &str| {
            script
                .find(needle)
                .unwrap_or_else(|| panic!("missing {needle}"))
        };

        assert!(pos("DROP TABLE IF EXISTS cases CASCADE;") < pos("DROP TABLE IF EXISTS hospitals CASCADE;"));
        assert!(pos("DROP TABLE IF EXISTS hospitals CASCADE;") < pos("DROP TABLE IF EXISTS emergency_teams CASCADE;"));
        assert!(pos("DROP TABLE IF EXISTS emergency_teams") < pos("CREATE TABLE emergency_teams"));
        assert!(pos("CREATE TABLE emergency_teams") < pos("CREATE TABLE hospitals"));
        assert!(pos("CREATE TABLE hospitals") < pos("CREATE TABLE cases"));
        assert!(pos("CREATE TABLE cases") < pos("INSERT INTO emergency_teams"));
        assert!(pos("INSERT INTO emergency_teams") < pos("INSERT INTO hospitals"));
        assert!(pos("INSERT INTO hospitals") < pos("INSERT INTO cases"));
        assert!(script.contains("team_id INTEGER REFERENCES emergency_teams(id)"));
    }

    #[test]
    fn rows_keep_input_order_and_escape_quotes() {
        let teams = [
            team("EMS-001", "O'Hare", Division::First),
            team("EMS-002", "Bravo", Division::Second),
        ];
        let script = build_script(&[], &teams);
        assert!(script.contains(
            "INSERT INTO emergency_teams (team_code, team_name, division) VALUES\n  ('EMS-001', 'O''Hare', '1部'),\n  ('EMS-002', 'Bravo', '2部');"
        ));
    }

    #[test]
    fn empty_hospitals_emit_no_insert() {
        let script = build_script(&[], &[team("EMS-001", "Alpha", Division::First)]);
        assert!(!script.contains("INSERT INTO hospitals"));
        assert!(!script.contains("VALUES;"));
        assert!(script.contains("INSERT INTO cases"));
    }

    #[test]
    fn build_is_deterministic() {
        let hospitals = [
            hospital(1, Some(Coordinates::new(35.1, 139.2))),
            hospital(2, None),
        ];
        let teams = [team("EMS-001", "Alpha", Division::First)];
        assert_eq!(build_script(&hospitals, &teams), build_script(&hospitals, &teams));
    }
}
