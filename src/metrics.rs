//! Performance dataset behind the swarm charts.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Reasons a dataset cannot be charted
#[derive(Debug, Error)]
pub enum DataError {
    #[error("dataset has no task types")]
    Empty,

    #[error("series '{series}' has {actual} values, expected {expected} (one per task type)")]
    LengthMismatch {
        series: &'static str,
        expected: usize,
        actual: usize,
    },

    #[error("{series} value {value} for '{task}' is out of range")]
    OutOfRange {
        series: &'static str,
        task: String,
        value: f64,
    },

    #[error("summary {field} value {value} is out of range")]
    SummaryOutOfRange { field: &'static str, value: f64 },

    #[error("summary reports {failed} failed tasks out of only {total}")]
    FailedExceedsTotal { failed: u32, total: u32 },

    #[error("failed to read dataset {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("dataset {path} is not valid JSON: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Aggregate figures shown in the summary panel
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunSummary {
    pub total_tasks: u32,
    pub workers_active: u32,
    pub avg_processing_ms: f64,
    pub uptime_percent: f64,
    pub failed_tasks: u32,
}

impl RunSummary {
    pub fn validate(&self) -> Result<(), DataError> {
        for (field, value, max) in [
            ("avg_processing_ms", self.avg_processing_ms, f64::INFINITY),
            ("uptime_percent", self.uptime_percent, 100.0),
        ] {
            if !value.is_finite() || !(0.0..=max).contains(&value) {
                return Err(DataError::SummaryOutOfRange { field, value });
            }
        }

        if self.failed_tasks > self.total_tasks {
            return Err(DataError::FailedExceedsTotal {
                failed: self.failed_tasks,
                total: self.total_tasks,
            });
        }

        Ok(())
    }

    /// Share of failed tasks, in percent
    pub fn error_rate_percent(&self) -> f64 {
        if self.total_tasks == 0 {
            return 0.0;
        }
        f64::from(self.failed_tasks) * 100.0 / f64::from(self.total_tasks)
    }
}

/// Per task type performance samples
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PerformanceData {
    pub task_types: Vec<String>,
    /// Average processing time (ms)
    pub processing_times_ms: Vec<f64>,
    /// Success rate (%)
    pub success_rates: Vec<f64>,
    /// Tasks per second
    pub throughput: Vec<f64>,
    pub summary: RunSummary,
}

impl Default for PerformanceData {
    /// The sample run: two workers, five tasks, one deliberate failure.
    fn default() -> Self {
        Self {
            task_types: vec!["Echo".into(), "Compute".into(), "Error".into()],
            processing_times_ms: vec![102.0, 200.0, 50.0],
            success_rates: vec![100.0, 100.0, 0.0],
            throughput: vec![9.8, 5.0, 20.0],
            summary: RunSummary {
                total_tasks: 5,
                workers_active: 2,
                avg_processing_ms: 118.0,
                uptime_percent: 100.0,
                failed_tasks: 1,
            },
        }
    }
}

impl PerformanceData {
    /// Load a dataset from a JSON file and validate it
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, DataError> {
        let path = path.as_ref();
        let raw = fs::read_to_string(path).map_err(|source| DataError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let data: Self = serde_json::from_str(&raw).map_err(|source| DataError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        data.validate()?;
        Ok(data)
    }

    pub fn validate(&self) -> Result<(), DataError> {
        let expected = self.task_types.len();
        if expected == 0 {
            return Err(DataError::Empty);
        }

        for (series, values) in [
            ("processing_times_ms", &self.processing_times_ms),
            ("success_rates", &self.success_rates),
            ("throughput", &self.throughput),
        ] {
            if values.len() != expected {
                return Err(DataError::LengthMismatch {
                    series,
                    expected,
                    actual: values.len(),
                });
            }
            for (task, &value) in self.task_types.iter().zip(values.iter()) {
                if !value.is_finite() || value < 0.0 {
                    return Err(DataError::OutOfRange {
                        series,
                        task: task.clone(),
                        value,
                    });
                }
            }
        }

        if let Some((task, &value)) = self
            .task_types
            .iter()
            .zip(self.success_rates.iter())
            .find(|&(_, &rate)| rate > 100.0)
        {
            return Err(DataError::OutOfRange {
                series: "success_rates",
                task: task.clone(),
                value,
            });
        }

        self.summary.validate()
    }

    pub fn task_count(&self) -> usize {
        self.task_types.len()
    }
}

/// Format a measurement without a trailing `.0` for whole numbers
pub fn format_value(value: f64) -> String {
    if value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{}", value as i64)
    } else {
        format!("{:.1}", value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn default_dataset_is_the_sample_run() {
        let data = PerformanceData::default();
        assert_eq!(data.processing_times_ms, vec![102.0, 200.0, 50.0]);
        assert_eq!(data.success_rates, vec![100.0, 100.0, 0.0]);
        assert_eq!(data.throughput, vec![9.8, 5.0, 20.0]);
        assert!(data.validate().is_ok());
        assert_eq!(data.summary.error_rate_percent(), 20.0);
    }

    #[test]
    fn rejects_mismatched_series() {
        let mut data = PerformanceData::default();
        data.throughput.pop();
        match data.validate() {
            Err(DataError::LengthMismatch { series, expected, actual }) => {
                assert_eq!(series, "throughput");
                assert_eq!(expected, 3);
                assert_eq!(actual, 2);
            }
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn rejects_success_rate_above_hundred() {
        let mut data = PerformanceData::default();
        data.success_rates[1] = 120.0;
        assert!(matches!(
            data.validate(),
            Err(DataError::OutOfRange { series: "success_rates", .. })
        ));
    }

    #[test]
    fn rejects_negative_and_nan_values() {
        let mut data = PerformanceData::default();
        data.processing_times_ms[0] = -1.0;
        assert!(data.validate().is_err());

        let mut data = PerformanceData::default();
        data.throughput[2] = f64::NAN;
        assert!(data.validate().is_err());
    }

    #[test]
    fn rejects_inconsistent_summary() {
        let mut data = PerformanceData::default();
        data.summary.avg_processing_ms = -5.0;
        assert!(matches!(
            data.validate(),
            Err(DataError::SummaryOutOfRange { field: "avg_processing_ms", .. })
        ));

        let mut data = PerformanceData::default();
        data.summary.uptime_percent = 250.0;
        assert!(matches!(
            data.validate(),
            Err(DataError::SummaryOutOfRange { field: "uptime_percent", .. })
        ));

        let mut data = PerformanceData::default();
        data.summary.avg_processing_ms = f64::INFINITY;
        assert!(data.validate().is_err());

        let mut data = PerformanceData::default();
        data.summary.failed_tasks = 10;
        match data.validate() {
            Err(DataError::FailedExceedsTotal { failed, total }) => {
                assert_eq!(failed, 10);
                assert_eq!(total, 5);
            }
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn load_rejects_inconsistent_summary() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("run.json");
        let mut data = PerformanceData::default();
        data.summary.uptime_percent = 250.0;
        std::fs::write(&path, serde_json::to_string(&data).unwrap()).unwrap();

        let err = PerformanceData::load(&path).unwrap_err();
        assert!(err.to_string().contains("uptime_percent"));
    }

    #[test]
    fn rejects_empty_dataset() {
        let data = PerformanceData {
            task_types: vec![],
            processing_times_ms: vec![],
            success_rates: vec![],
            throughput: vec![],
            ..PerformanceData::default()
        };
        assert!(matches!(data.validate(), Err(DataError::Empty)));
    }

    #[test]
    fn loads_dataset_from_json() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("run.json");
        let json = serde_json::json!({
            "task_types": ["Echo", "Compute"],
            "processing_times_ms": [98.5, 210.0],
            "success_rates": [100.0, 50.0],
            "throughput": [10.2, 4.8],
            "summary": {
                "total_tasks": 4,
                "workers_active": 3,
                "avg_processing_ms": 154.0,
                "uptime_percent": 99.5,
                "failed_tasks": 1
            }
        });
        let mut file = std::fs::File::create(&path).unwrap();
        write!(file, "{}", json).unwrap();

        let data = PerformanceData::load(&path).unwrap();
        assert_eq!(data.task_count(), 2);
        assert_eq!(data.summary.workers_active, 3);
        assert_eq!(data.summary.error_rate_percent(), 25.0);
    }

    #[test]
    fn load_reports_parse_errors_with_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.json");
        std::fs::write(&path, "{ not json").unwrap();

        let err = PerformanceData::load(&path).unwrap_err();
        assert!(matches!(err, DataError::Parse { .. }));
        assert!(err.to_string().contains("broken.json"));
    }

    #[test]
    fn load_reports_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = PerformanceData::load(dir.path().join("missing.json")).unwrap_err();
        assert!(matches!(err, DataError::Read { .. }));
    }

    #[test]
    fn formats_whole_and_fractional_values() {
        assert_eq!(format_value(102.0), "102");
        assert_eq!(format_value(9.8), "9.8");
        assert_eq!(format_value(0.0), "0");
    }
}
