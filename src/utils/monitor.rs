#[cfg(feature = "cli")]
use std::sync::Mutex;
#[cfg(feature = "cli")]
use std::time::{Duration, Instant};
#[cfg(feature = "cli")]
use sysinfo::{Pid, ProcessRefreshKind, ProcessesToUpdate, System};

#[cfg(feature = "cli")]
#[derive(Debug, Clone)]
pub struct ProcessSnapshot {
    pub cpu_usage: f32,
    pub memory_mb: u64,
    pub peak_memory_mb: u64,
    pub elapsed: Duration,
}

/// Samples the current process between replay phases.
#[cfg(feature = "cli")]
pub struct SystemMonitor {
    inner: Option<MonitorState>,
}

#[cfg(feature = "cli")]
struct MonitorState {
    system: Mutex<System>,
    pid: Pid,
    started: Instant,
    peak_memory_mb: Mutex<u64>,
}

#[cfg(feature = "cli")]
impl SystemMonitor {
    pub fn new(enabled: bool) -> Self {
        if !enabled {
            return Self { inner: None };
        }

        let inner = match sysinfo::get_current_pid() {
            Ok(pid) => {
                let mut system = System::new();
                system.refresh_processes_specifics(
                    ProcessesToUpdate::Some(&[pid]),
                    true,
                    ProcessRefreshKind::everything(),
                );
                Some(MonitorState {
                    system: Mutex::new(system),
                    pid,
                    started: Instant::now(),
                    peak_memory_mb: Mutex::new(0),
                })
            }
            Err(e) => {
                tracing::warn!("System monitoring unavailable: {}", e);
                None
            }
        };

        Self { inner }
    }

    pub fn snapshot(&self) -> Option<ProcessSnapshot> {
        let state = self.inner.as_ref()?;

        let mut system = state.system.lock().ok()?;
        system.refresh_processes_specifics(
            ProcessesToUpdate::Some(&[state.pid]),
            true,
            ProcessRefreshKind::everything(),
        );
        let process = system.process(state.pid)?;
        let memory_mb = process.memory() / 1024 / 1024;

        let mut peak = state.peak_memory_mb.lock().ok()?;
        *peak = (*peak).max(memory_mb);

        Some(ProcessSnapshot {
            cpu_usage: process.cpu_usage(),
            memory_mb,
            peak_memory_mb: *peak,
            elapsed: state.started.elapsed(),
        })
    }

    pub fn log_phase(&self, phase: &str) {
        if let Some(snapshot) = self.snapshot() {
            tracing::info!(
                "📊 {} - CPU: {:.1}%, Memory: {}MB, Peak: {}MB, Time: {:?}",
                phase,
                snapshot.cpu_usage,
                snapshot.memory_mb,
                snapshot.peak_memory_mb,
                snapshot.elapsed
            );
        }
    }

    pub fn log_throughput(&self, records: usize) {
        if let Some(snapshot) = self.snapshot() {
            let seconds = snapshot.elapsed.as_secs_f64();
            let rate = if seconds > 0.0 {
                records as f64 / seconds
            } else {
                records as f64
            };
            tracing::info!(
                "📊 Throughput - {} records in {:?} ({:.0} records/s), Peak: {}MB",
                records,
                snapshot.elapsed,
                rate,
                snapshot.peak_memory_mb
            );
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.inner.is_some()
    }
}

#[cfg(feature = "cli")]
impl Default for SystemMonitor {
    fn default() -> Self {
        Self::new(false)
    }
}

// Without the cli feature monitoring compiles down to nothing
#[cfg(not(feature = "cli"))]
#[derive(Default)]
pub struct SystemMonitor;

#[cfg(not(feature = "cli"))]
impl SystemMonitor {
    pub fn new(_enabled: bool) -> Self {
        Self
    }

    pub fn log_phase(&self, _phase: &str) {}

    pub fn log_throughput(&self, _records: usize) {}

    pub fn is_enabled(&self) -> bool {
        false
    }
}
