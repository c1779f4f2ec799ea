#[cfg(feature = "cli")]
use std::sync::Mutex;
use std::time::{Duration, Instant};
#[cfg(feature = "cli")]
use sysinfo::{Pid, ProcessRefreshKind, ProcessesToUpdate, System};

#[derive(Debug, Clone)]
pub struct RunStats {
    pub identifiers_done: usize,
    pub records_collected: usize,
    pub memory_usage_mb: Option<u64>,
    pub peak_memory_mb: Option<u64>,
    pub elapsed_time: Duration,
}

/// 記錄整個 roster 執行的進度與資源使用量。
///
/// 關閉時所有方法皆為 no-op；沒有 `cli` feature 時不讀取行程記憶體。
pub struct RunMonitor {
    enabled: bool,
    start_time: Instant,
    counters: std::sync::Mutex<(usize, usize)>,
    #[cfg(feature = "cli")]
    system: Mutex<System>,
    #[cfg(feature = "cli")]
    pid: Option<Pid>,
    #[cfg(feature = "cli")]
    peak_memory: Mutex<u64>,
}

impl RunMonitor {
    pub fn new(enabled: bool) -> Self {
        Self {
            enabled,
            start_time: Instant::now(),
            counters: std::sync::Mutex::new((0, 0)),
            #[cfg(feature = "cli")]
            system: Mutex::new(System::new()),
            #[cfg(feature = "cli")]
            pid: sysinfo::get_current_pid().ok(),
            #[cfg(feature = "cli")]
            peak_memory: Mutex::new(0),
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn record_identifier(&self, records: usize) {
        if let Ok(mut counters) = self.counters.lock() {
            counters.0 += 1;
            counters.1 += records;
        }
    }

    #[cfg(feature = "cli")]
    fn sample_memory(&self) -> (Option<u64>, Option<u64>) {
        let Some(pid) = self.pid else {
            return (None, None);
        };
        let Ok(mut system) = self.system.lock() else {
            return (None, None);
        };
        system.refresh_processes_specifics(
            ProcessesToUpdate::Some(&[pid]),
            true,
            ProcessRefreshKind::nothing().with_memory(),
        );
        let Some(memory_mb) = system.process(pid).map(|p| p.memory() / 1024 / 1024) else {
            return (None, None);
        };

        let peak = match self.peak_memory.lock() {
            Ok(mut peak) => {
                if memory_mb > *peak {
                    *peak = memory_mb;
                }
                *peak
            }
            Err(_) => memory_mb,
        };
        (Some(memory_mb), Some(peak))
    }

    #[cfg(not(feature = "cli"))]
    fn sample_memory(&self) -> (Option<u64>, Option<u64>) {
        (None, None)
    }

    pub fn get_stats(&self) -> Option<RunStats> {
        if !self.enabled {
            return None;
        }

        let (identifiers_done, records_collected) =
            self.counters.lock().map(|c| *c).unwrap_or((0, 0));
        let (memory_usage_mb, peak_memory_mb) = self.sample_memory();

        Some(RunStats {
            identifiers_done,
            records_collected,
            memory_usage_mb,
            peak_memory_mb,
            elapsed_time: self.start_time.elapsed(),
        })
    }

    pub fn log_stats(&self, phase: &str) {
        if let Some(stats) = self.get_stats() {
            tracing::info!(
                "📊 {} - identifiers: {}, records: {}, memory: {:?}MB, time: {:?}",
                phase,
                stats.identifiers_done,
                stats.records_collected,
                stats.memory_usage_mb,
                stats.elapsed_time
            );
        }
    }

    pub fn log_final_stats(&self) {
        if let Some(stats) = self.get_stats() {
            tracing::info!(
                "📊 Final Stats - Total Time: {:?}, Identifiers: {}, Records: {}, Peak Memory: {:?}MB",
                stats.elapsed_time,
                stats.identifiers_done,
                stats.records_collected,
                stats.peak_memory_mb
            );
        }
    }
}

impl Default for RunMonitor {
    fn default() -> Self {
        Self::new(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_disabled_monitor_reports_nothing() {
        let monitor = RunMonitor::new(false);
        monitor.record_identifier(10);
        assert!(monitor.get_stats().is_none());
    }

    #[test]
    fn test_enabled_monitor_counts_identifiers() {
        let monitor = RunMonitor::new(true);
        monitor.record_identifier(365);
        monitor.record_identifier(366);

        let stats = monitor.get_stats().unwrap();
        assert_eq!(stats.identifiers_done, 2);
        assert_eq!(stats.records_collected, 731);
    }
}
