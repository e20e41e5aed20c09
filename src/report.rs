use std::collections::BTreeMap;
use std::time::Duration;

use crate::probe::RequestRecord;

const P95: f64 = 0.95;

/// Aggregated view of a full probe run.
///
/// Latency statistics cover error-free records only; the status-code table
/// covers every record that carries a nonzero status. `error_rate` divides
/// by the number of records aggregated, which under fail-fast can be fewer
/// than the number of requests originally asked for.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Summary {
    pub avg_connect_time: Duration,
    pub avg_first_byte_time: Duration,
    pub avg_total_time: Duration,

    pub p95_connect_time: Duration,
    pub p95_first_byte_time: Duration,
    pub p95_total_time: Duration,

    pub status_codes: BTreeMap<u16, usize>,

    pub error_count: usize,
    pub error_rate: f64,
}

/// Reduce a run's records to a `Summary`.
///
/// Errored records count toward the error rate and (if they somehow carry a
/// status) the status table, but never toward the latency series. Aggregation
/// cannot fail; an empty input yields a zeroed summary with an error rate of
/// 0, not NaN.
pub fn aggregate(records: &[RequestRecord]) -> Summary {
    let mut summary = Summary::default();

    let mut connect_times = Vec::new();
    let mut first_byte_times = Vec::new();
    let mut total_times = Vec::new();

    for record in records {
        // The status table is filled unconditionally: any record that got a
        // status out of the server belongs in it, errored or not.
        if record.status_code != 0 {
            *summary.status_codes.entry(record.status_code).or_insert(0) += 1;
        }

        if record.error.is_some() {
            summary.error_count += 1;
            continue;
        }

        connect_times.push(record.connect_time);
        first_byte_times.push(record.first_byte_time);
        total_times.push(record.total_time);
    }

    summary.avg_connect_time = mean(&connect_times);
    summary.avg_first_byte_time = mean(&first_byte_times);
    summary.avg_total_time = mean(&total_times);

    summary.p95_connect_time = percentile(&connect_times, P95);
    summary.p95_first_byte_time = percentile(&first_byte_times, P95);
    summary.p95_total_time = percentile(&total_times, P95);

    if !records.is_empty() {
        summary.error_rate = summary.error_count as f64 / records.len() as f64;
    }

    summary
}

/// Arithmetic mean of the series; zero for an empty series.
fn mean(series: &[Duration]) -> Duration {
    if series.is_empty() {
        return Duration::ZERO;
    }
    series.iter().sum::<Duration>() / series.len() as u32
}

/// Return the element at index `floor(p * n)` of `series` in its given
/// order, clamped to the last element. Returns zero for an empty series.
///
/// The series is taken in arrival order, not sorted: the figure is
/// positional, not a statistical percentile.
fn percentile(series: &[Duration], p: f64) -> Duration {
    if series.is_empty() {
        return Duration::ZERO;
    }
    let index = (series.len() as f64 * p).floor() as usize;
    series[index.min(series.len() - 1)]
}
