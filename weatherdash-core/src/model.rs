use serde::{Deserialize, Serialize};

/// Health-check reply from `/etl/health`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthReport {
    pub status: String,
    pub message: String,
}

/// Acknowledgement from `/etl/run`. The backend kicks the run off in the
/// background and answers immediately.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunAck {
    pub message: String,
}

/// Tail of the ETL log from `/etl/status`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EtlStatus {
    /// Most recent log lines, oldest first. Lines keep their trailing
    /// newline, so trim before printing.
    pub status: Vec<String>,
}

/// One row of the cleaned-data sample from `/etl/cleaned_data`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CleanedRecord {
    pub city: String,
    pub date: String,
    pub avg_temperature: f64,
    pub weather: String,
}
