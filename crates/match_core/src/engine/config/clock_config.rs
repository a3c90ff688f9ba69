use serde::{Deserialize, Serialize};

/// Match clock tuning (all values in seconds)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ClockConfig {
    /// Scheduled length of each regulation half
    pub half_seconds: i32,
    /// Remaining time at which the stoppage allowance is announced
    pub stoppage_trigger_seconds: i32,
    /// Inclusive bounds of the random stoppage draw
    pub stoppage_min_seconds: i32,
    pub stoppage_max_seconds: i32,
    /// Fixed overtime budget (no stoppage)
    pub overtime_seconds: i32,
    /// Progress signal cadence during regulation and overtime
    pub progress_interval_seconds: i32,
    /// Progress signal cadence during stoppage
    pub stoppage_progress_interval_seconds: i32,
}

impl Default for ClockConfig {
    fn default() -> Self {
        Self {
            half_seconds: 300,
            stoppage_trigger_seconds: 60,
            stoppage_min_seconds: 15,
            stoppage_max_seconds: 59,
            overtime_seconds: 120,
            progress_interval_seconds: 30,
            stoppage_progress_interval_seconds: 10,
        }
    }
}

impl ClockConfig {
    pub fn validate(&self) -> Result<(), String> {
        if self.half_seconds <= 0 {
            return Err(format!("half_seconds must be positive, got {}", self.half_seconds));
        }
        if self.stoppage_trigger_seconds <= 0 {
            return Err(format!(
                "stoppage_trigger_seconds must be positive, got {}",
                self.stoppage_trigger_seconds
            ));
        }
        if self.stoppage_min_seconds < 0 || self.stoppage_min_seconds > self.stoppage_max_seconds {
            return Err(format!(
                "stoppage range must satisfy 0 <= min <= max, got {}..={}",
                self.stoppage_min_seconds, self.stoppage_max_seconds
            ));
        }
        if self.overtime_seconds <= 0 {
            return Err(format!(
                "overtime_seconds must be positive, got {}",
                self.overtime_seconds
            ));
        }
        if self.progress_interval_seconds <= 0 || self.stoppage_progress_interval_seconds <= 0 {
            return Err("progress intervals must be positive".to_string());
        }
        Ok(())
    }
}
