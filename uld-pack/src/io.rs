//! CSV ingestion/emission (§6): the Package/ULD CSV schemas and the
//! solution file format. A thin adapter — no invariant enforcement lives
//! here, only parsing and formatting.

use std::collections::HashMap;
use std::io::{Read, Write};

use serde::Deserialize;

use crate::entities::{PackageId, PlaceableOn, Package, Placement, Uld, UldId, MUST_PLACE_COST};
use crate::error::{SolverError, SolverResult};
use crate::validate::ReportedTotals;

/// A package row as parsed from the CSV, keeping the original label
/// alongside the constructed [`Package`] (whose `id` is the row's
/// position, not the label) so output can round-trip the original id.
#[derive(Clone, Debug)]
pub struct PackageRow {
    pub label: String,
    pub package: Package,
}

/// A ULD row as parsed from the CSV.
#[derive(Clone, Debug)]
pub struct UldRow {
    pub label: String,
    pub uld: Uld,
}

#[derive(Debug, Deserialize)]
struct RawPackageRow {
    id: String,
    length: i64,
    width: i64,
    height: i64,
    weight: i64,
    priority: String,
    cost: String,
}

#[derive(Debug, Deserialize)]
struct RawUldRow {
    id: String,
    length: i64,
    width: i64,
    height: i64,
    capacity: i64,
}

/// Parses the Package CSV (`id,length,width,height,weight,priority,cost`).
/// `priority` is `"Priority"`/`"Economy"`; `cost == "-"` is the "must be
/// placed" sentinel, encoded as [`MUST_PLACE_COST`].
pub fn read_packages(reader: impl Read) -> SolverResult<Vec<PackageRow>> {
    let mut rdr = csv::Reader::from_reader(reader);
    let mut rows = Vec::new();
    for (index, record) in rdr.deserialize::<RawPackageRow>().enumerate() {
        let raw = record.map_err(|e| SolverError::ParseError(format!("package row {index}: {e}")))?;
        let priority = parse_priority(&raw.priority)?;
        let cost = parse_cost(&raw.cost)?;
        let package = Package::new(
            index,
            raw.length,
            raw.width,
            raw.height,
            raw.weight,
            cost,
            priority,
            false,
            false,
            PlaceableOn::ALL,
        )?;
        rows.push(PackageRow { label: raw.id, package });
    }
    Ok(rows)
}

/// Serialises package rows back to the canonical CSV representation.
/// Round-trips `Priority`/`Economy` and `-` byte-for-byte.
pub fn write_packages(writer: impl Write, rows: &[PackageRow]) -> SolverResult<()> {
    let mut wtr = csv::Writer::from_writer(writer);
    wtr.write_record(["id", "length", "width", "height", "weight", "priority", "cost"])
        .map_err(csv_write_err)?;
    for row in rows {
        let p = &row.package;
        wtr.write_record([
            row.label.clone(),
            p.lx.to_string(),
            p.ly.to_string(),
            p.lz.to_string(),
            p.weight.to_string(),
            priority_label(p.priority).to_string(),
            cost_label(p.cost),
        ])
        .map_err(csv_write_err)?;
    }
    wtr.flush().map_err(|e| SolverError::IoError(e.to_string()))
}

/// Parses the ULD CSV (`id,length,width,height,capacity`).
pub fn read_ulds(reader: impl Read) -> SolverResult<Vec<UldRow>> {
    let mut rdr = csv::Reader::from_reader(reader);
    let mut rows = Vec::new();
    for (index, record) in rdr.deserialize::<RawUldRow>().enumerate() {
        let raw = record.map_err(|e| SolverError::ParseError(format!("uld row {index}: {e}")))?;
        let uld = Uld::new(index, raw.length, raw.width, raw.height, raw.capacity)?;
        rows.push(UldRow { label: raw.id, uld });
    }
    Ok(rows)
}

fn parse_priority(raw: &str) -> SolverResult<bool> {
    match raw {
        "Priority" => Ok(true),
        "Economy" => Ok(false),
        other => Err(SolverError::ParseError(format!(
            "priority must be \"Priority\" or \"Economy\", got {other:?}"
        ))),
    }
}

fn priority_label(priority: bool) -> &'static str {
    if priority {
        "Priority"
    } else {
        "Economy"
    }
}

fn parse_cost(raw: &str) -> SolverResult<i64> {
    if raw == "-" {
        Ok(MUST_PLACE_COST)
    } else {
        raw.parse()
            .map_err(|_| SolverError::ParseError(format!("cost must be an integer or \"-\", got {raw:?}")))
    }
}

fn cost_label(cost: i64) -> String {
    if cost == MUST_PLACE_COST {
        "-".to_string()
    } else {
        cost.to_string()
    }
}

fn csv_write_err(e: csv::Error) -> SolverError {
    SolverError::IoError(e.to_string())
}

/// Writes the solution file (§6): a header line of
/// `total_cost number_packed number_priority_ulds`, followed by one CSV
/// row per package. Unplaced packages use `uld_id = "NONE"` and all six
/// coordinates `-1`.
pub fn write_solution(
    mut writer: impl Write,
    totals: &ReportedTotals,
    placements: &[Placement],
    packages: &[PackageRow],
    ulds: &[UldRow],
) -> SolverResult<()> {
    writeln!(writer, "{} {} {}", totals.total_cost, totals.number_packed, totals.number_priority_ulds)
        .map_err(|e| SolverError::IoError(e.to_string()))?;

    let by_pack_id: HashMap<PackageId, &Placement> = placements.iter().map(|p| (p.pack_id, p)).collect();
    let uld_label: HashMap<UldId, &str> = ulds.iter().map(|r| (r.uld.id, r.label.as_str())).collect();

    let mut wtr = csv::WriterBuilder::new().has_headers(false).from_writer(writer);
    for (idx, row) in packages.iter().enumerate() {
        match by_pack_id.get(&idx) {
            Some(placement) => {
                let p1 = placement.p1();
                let p2 = placement.p2();
                wtr.write_record([
                    row.label.clone(),
                    uld_label.get(&placement.uld_id).copied().unwrap_or("NONE").to_string(),
                    p1.x.to_string(),
                    p1.y.to_string(),
                    p1.z.to_string(),
                    p2.x.to_string(),
                    p2.y.to_string(),
                    p2.z.to_string(),
                ])
                .map_err(csv_write_err)?;
            }
            None => {
                wtr.write_record([row.label.clone(), "NONE".to_string(), "-1", "-1", "-1", "-1", "-1", "-1"])
                    .map_err(csv_write_err)?;
            }
        }
    }
    wtr.flush().map_err(|e| SolverError::IoError(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn package_csv_round_trips_byte_identical() {
        let csv = "id,length,width,height,weight,priority,cost\nP1,10,10,10,50,Priority,-\nP2,5,5,5,3,Economy,42\n";
        let rows = read_packages(csv.as_bytes()).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].package.cost, MUST_PLACE_COST);
        assert!(rows[0].package.priority);
        assert!(!rows[1].package.priority);

        let mut out = Vec::new();
        write_packages(&mut out, &rows).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), csv);
    }

    #[test]
    fn uld_csv_parses_fields() {
        let csv = "id,length,width,height,capacity\nU1,100,100,100,500\n";
        let rows = read_ulds(csv.as_bytes()).unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].uld.capacity, 500);
    }

    #[test]
    fn unknown_priority_value_is_a_parse_error() {
        let csv = "id,length,width,height,weight,priority,cost\nP1,1,1,1,1,Maybe,1\n";
        let err = read_packages(csv.as_bytes()).unwrap_err();
        assert!(matches!(err, SolverError::ParseError(_)));
    }
}
