use crate::migration::{MigrationReport, PreparerOutcome};
use once_cell::sync::Lazy;
use opentelemetry::{
    global,
    metrics::{Counter, Histogram},
    KeyValue,
};

pub static METRICS: Lazy<MigrationMetrics> = Lazy::new(MigrationMetrics::init);

pub struct MigrationMetrics {
    pub runs_total: Counter<u64>,
    pub preparers_total: Counter<u64>,
    pub preparer_duration: Histogram<f64>,
    pub run_errors_total: Counter<u64>,
}

impl MigrationMetrics {
    pub fn init() -> Self {
        let meter = global::meter("docshift");

        let runs_total = meter.u64_counter("docshift_migration_runs_total")
            .with_description("Total data migration runs").build();

        let preparers_total = meter.u64_counter("docshift_preparers_total")
            .with_description("Preparers processed, by outcome").build();

        let preparer_duration = meter.f64_histogram("docshift_preparer_duration_seconds")
            .with_description("Time spent in preparer phases").build();

        let run_errors_total = meter.u64_counter("docshift_migration_run_errors_total")
            .with_description("Run-level migration errors (configuration, version recording)").build();

        Self {
            runs_total,
            preparers_total,
            preparer_duration,
            run_errors_total,
        }
    }

    pub fn record_preparer(&self, outcome: &PreparerOutcome, elapsed: std::time::Duration) {
        let attrs = [KeyValue::new("outcome", outcome.label())];
        self.preparers_total.add(1, &attrs);
        self.preparer_duration.record(elapsed.as_secs_f64(), &attrs);
    }

    pub fn record_run(&self, report: &MigrationReport) {
        self.runs_total.add(1, &[]);
        if !report.errors.is_empty() {
            self.run_errors_total.add(report.errors.len() as u64, &[]);
        }
    }
}
