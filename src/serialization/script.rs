use log::debug;
use serde::Deserialize;

use crate::balance::{fix_overload_train, order_train};
use crate::station::{OpStatus, PlatformIdx, Station};

/// One kind of shunting operation.
#[derive(Debug, Clone, Copy, Deserialize, PartialEq, Eq)]
pub enum OpKind {
    #[serde(rename = "arrive")]
    Arrive,
    #[serde(rename = "depart")]
    Depart,
    #[serde(rename = "add")]
    Add,
    #[serde(rename = "remove")]
    Remove,
    #[serde(rename = "move")]
    Move,
    #[serde(rename = "order")]
    Order,
    #[serde(rename = "fix")]
    Fix,
}

/// One row of a shunting script. Columns that an op does not use stay empty.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct OpRecord {
    #[serde(rename = "# op")]
    pub op: OpKind,
    pub platform: Option<u32>,
    pub value: Option<i64>,
    pub pos: Option<usize>,
    pub cars_no: Option<usize>,
    pub to_platform: Option<u32>,
    pub to_pos: Option<usize>,
}

#[derive(Debug)]
pub enum ApplyError {
    MissingColumn { row: usize, column: &'static str },
}

/// Counters over one script application. Ignored ops are the ones the engine
/// refused as a no-op.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct ApplyStats {
    pub applied: usize,
    pub ignored: usize,
}

fn reader() -> csv::ReaderBuilder {
    let mut builder = csv::ReaderBuilder::new();
    builder.trim(csv::Trim::All).delimiter(b';');

    builder
}

pub fn parse_script(stream: impl std::io::Read) -> Result<Box<[OpRecord]>, csv::Error> {
    reader().from_reader(stream).deserialize().collect()
}

/// Applies the script row by row. Ops the engine refuses are counted and
/// logged, not errors; a row missing a column its op needs is an error.
pub fn apply_script(station: &mut Station, ops: &[OpRecord]) -> Result<ApplyStats, ApplyError> {
    let mut stats = ApplyStats::default();
    for (row, record) in ops.iter().enumerate() {
        match apply_op(station, row, record)? {
            OpStatus::Applied => stats.applied += 1,
            status => {
                debug!("Row {}: {:?} ignored ({:?})", row, record.op, status);
                stats.ignored += 1;
            }
        }
    }
    Ok(stats)
}

fn require<T>(row: usize, column: &'static str, value: Option<T>) -> Result<T, ApplyError> {
    value.ok_or(ApplyError::MissingColumn { row, column })
}

fn apply_op(station: &mut Station, row: usize, record: &OpRecord) -> Result<OpStatus, ApplyError> {
    let status = match record.op {
        OpKind::Arrive => {
            let platform = require(row, "platform", record.platform)?;
            let power = require(row, "value", record.value)?;
            station.arrive(PlatformIdx(platform), power)
        }
        OpKind::Depart => {
            let platform = require(row, "platform", record.platform)?;
            station.depart(PlatformIdx(platform))
        }
        OpKind::Add => {
            let platform = require(row, "platform", record.platform)?;
            let weight = require(row, "value", record.value)?;
            station.add_car(PlatformIdx(platform), weight)
        }
        OpKind::Remove => {
            let platform = require(row, "platform", record.platform)?;
            let weight = require(row, "value", record.value)?;
            station.remove_cars(PlatformIdx(platform), weight)
        }
        OpKind::Move => {
            let platform = require(row, "platform", record.platform)?;
            let pos = require(row, "pos", record.pos)?;
            let cars_no = require(row, "cars_no", record.cars_no)?;
            let to_platform = require(row, "to_platform", record.to_platform)?;
            let to_pos = require(row, "to_pos", record.to_pos)?;
            station.move_cars(
                PlatformIdx(platform),
                pos,
                cars_no,
                PlatformIdx(to_platform),
                to_pos,
            )
        }
        OpKind::Order => {
            let platform = require(row, "platform", record.platform)?;
            order_train(station, PlatformIdx(platform))
        }
        OpKind::Fix => match fix_overload_train(station) {
            Some(fix) => {
                debug!(
                    "Row {}: removed car |{}| from {:?}",
                    row, fix.weight, fix.platform
                );
                OpStatus::Applied
            }
            None => OpStatus::NoOverload,
        },
    };
    Ok(status)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SCRIPT: &[u8] = b"# op;platform;value;pos;cars_no;to_platform;to_pos
arrive;0;100;;;;
add;0;20;;;;
add;0;50;;;;
add;0;20;;;;
arrive;1;60;;;;
move;0;;1;2;1;1
remove;1;20;;;;
";

    #[test]
    fn parse_script_reads_every_row() {
        let ops = parse_script(SCRIPT).unwrap();
        assert_eq!(ops.len(), 7);
        assert_eq!(ops[0].op, OpKind::Arrive);
        assert_eq!(ops[0].platform, Some(0));
        assert_eq!(ops[0].value, Some(100));
        assert_eq!(ops[0].pos, None);
        assert_eq!(ops[5].op, OpKind::Move);
        assert_eq!(ops[5].value, None);
        assert_eq!(ops[5].pos, Some(1));
        assert_eq!(ops[5].cars_no, Some(2));
    }

    #[test]
    fn parse_script_rejects_unknown_ops() {
        assert!(parse_script(
            b"# op;platform;value;pos;cars_no;to_platform;to_pos\nshunt;0;1;;;;\n".as_slice()
        )
        .is_err());
    }

    #[test]
    fn apply_script_drives_the_station() {
        let script = b"# op;platform;value;pos;cars_no;to_platform;to_pos
arrive;0;100;;;;
add;0;20;;;;
add;0;50;;;;
add;0;20;;;;
arrive;1;60;;;;
move;0;;2;2;1;1
remove;0;20;;;;
order;1;;;;;
";
        let ops = parse_script(script.as_slice()).unwrap();
        let mut station = Station::open(2);
        let stats = apply_script(&mut station, &ops).unwrap();
        assert_eq!(
            stats,
            ApplyStats {
                applied: 8,
                ignored: 0
            }
        );
        assert_eq!(station.describe(), "0: (100)\n1: (60)-|50|-|20|\n");
    }

    #[test]
    fn apply_script_counts_refused_ops() {
        let script = b"# op;platform;value;pos;cars_no;to_platform;to_pos
arrive;0;100;;;;
arrive;0;50;;;;
add;1;20;;;;
fix;;;;;;
";
        let ops = parse_script(script.as_slice()).unwrap();
        let mut station = Station::open(1);
        let stats = apply_script(&mut station, &ops).unwrap();
        assert_eq!(stats.applied, 1);
        assert_eq!(stats.ignored, 3);
        assert_eq!(station.describe(), "0: (100)\n");
    }

    #[test]
    fn a_row_missing_a_needed_column_is_an_error() {
        let script = b"# op;platform;value;pos;cars_no;to_platform;to_pos
arrive;0;;;;;
";
        let ops = parse_script(script.as_slice()).unwrap();
        let mut station = Station::open(1);
        assert!(matches!(
            apply_script(&mut station, &ops),
            Err(ApplyError::MissingColumn {
                row: 0,
                column: "value"
            })
        ));
    }
}
