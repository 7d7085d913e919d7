use std::io::Write;

use serde::Serialize;

use crate::errors::IpcBenchError;
use crate::types::MethodOutcome;

#[derive(Serialize)]
struct CsvRow {
    method: &'static str,
    message_size: u64,
    message_count: u64,
    test_count: u64,
    avg_throughput_msgs: f64,
    avg_throughput_mbs: f64,
}

/// Write one CSV row per successful method. Failed methods are left out.
pub fn write_csv<W: Write>(outcomes: &[MethodOutcome], writer: W) -> Result<(), IpcBenchError> {
    let mut csv_writer = csv::Writer::from_writer(writer);

    for outcome in outcomes {
        let Ok(result) = &outcome.result else {
            continue;
        };
        csv_writer.serialize(CsvRow {
            method: outcome.method.name(),
            message_size: result.message_size,
            message_count: result.message_count,
            test_count: result.test_count,
            avg_throughput_msgs: result.avg_throughput_msgs,
            avg_throughput_mbs: result.avg_throughput_mbs,
        })?;
    }

    csv_writer.flush().map_err(csv::Error::from)?;
    Ok(())
}
