//! Health scoring.
//!
//! Maps a snapshot to a single 0-100 score plus a short explanation by
//! applying weighted penalties in a fixed order.

use serde::{Deserialize, Serialize};

use super::metrics::MetricsSnapshot;

const CPU_CRITICAL: f64 = 90.0;
const CPU_WARNING: f64 = 70.0;
const MEMORY_CRITICAL: f64 = 90.0;
const MEMORY_WARNING: f64 = 80.0;
const DISK_CRITICAL: f64 = 95.0;
const DISK_WARNING: f64 = 85.0;
const SWAP_CRITICAL: f64 = 80.0;

/// Result of scoring one snapshot
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthReport {
    pub score: u8,
    pub message: String,
    pub issues: Vec<HealthIssue>,
}

/// A penalty that fired while scoring
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthIssue {
    pub category: IssueCategory,
    pub severity: IssueSeverity,
    pub penalty: u8,
    pub label: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum IssueCategory {
    Cpu,
    Memory,
    Disk(String), // Device
    Swap,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum IssueSeverity {
    Warning,
    Critical,
}

/// Overall condition bucket of a score
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum HealthStatus {
    Excellent,
    Good,
    Fair,
    Poor,
}

impl HealthStatus {
    pub fn from_score(score: u8) -> Self {
        match score {
            90.. => HealthStatus::Excellent,
            70..=89 => HealthStatus::Good,
            50..=69 => HealthStatus::Fair,
            _ => HealthStatus::Poor,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            HealthStatus::Excellent => "Excellent",
            HealthStatus::Good => "Good",
            HealthStatus::Fair => "Fair",
            HealthStatus::Poor => "Poor",
        }
    }
}

impl HealthIssue {
    fn new(category: IssueCategory, severity: IssueSeverity, penalty: u8, label: String) -> Self {
        Self {
            category,
            severity,
            penalty,
            label,
        }
    }
}

/// Score a snapshot.
///
/// Deterministic: the same snapshot always yields the same report.
pub fn score(snapshot: &MetricsSnapshot) -> HealthReport {
    let mut issues = Vec::new();

    if snapshot.cpu_percent > CPU_CRITICAL {
        issues.push(HealthIssue::new(
            IssueCategory::Cpu,
            IssueSeverity::Critical,
            30,
            "High CPU".to_string(),
        ));
    } else if snapshot.cpu_percent > CPU_WARNING {
        issues.push(HealthIssue::new(
            IssueCategory::Cpu,
            IssueSeverity::Warning,
            15,
            "Elevated CPU".to_string(),
        ));
    }

    if snapshot.mem_percent > MEMORY_CRITICAL {
        issues.push(HealthIssue::new(
            IssueCategory::Memory,
            IssueSeverity::Critical,
            25,
            "High Memory".to_string(),
        ));
    } else if snapshot.mem_percent > MEMORY_WARNING {
        issues.push(HealthIssue::new(
            IssueCategory::Memory,
            IssueSeverity::Warning,
            12,
            "Elevated Memory".to_string(),
        ));
    }

    // Only the first disk over a threshold is penalized
    for disk in &snapshot.disks {
        if disk.used_percent > DISK_CRITICAL {
            issues.push(HealthIssue::new(
                IssueCategory::Disk(disk.device.clone()),
                IssueSeverity::Critical,
                20,
                format!("Disk {} Critical", disk.device),
            ));
            break;
        } else if disk.used_percent > DISK_WARNING {
            issues.push(HealthIssue::new(
                IssueCategory::Disk(disk.device.clone()),
                IssueSeverity::Warning,
                10,
                format!("Disk {} Low", disk.device),
            ));
            break;
        }
    }

    if snapshot.swap_percent > SWAP_CRITICAL {
        issues.push(HealthIssue::new(
            IssueCategory::Swap,
            IssueSeverity::Critical,
            10,
            "High Swap".to_string(),
        ));
    }

    let penalty: u32 = issues.iter().map(|i| i.penalty as u32).sum();
    let score = 100u32.saturating_sub(penalty) as u8;

    let message = if issues.is_empty() {
        HealthStatus::from_score(score).label().to_string()
    } else {
        issues
            .iter()
            .map(|i| i.label.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    };

    HealthReport {
        score,
        message,
        issues,
    }
}
