//! Resource probes for memory and CPU figures

use crate::monitoring::types::MemorySnapshot;
use crate::utils::error::{MonitorError, Result};
use parking_lot::Mutex;
use std::fmt::Debug;
use std::time::{Duration, Instant};
use sysinfo::{MINIMUM_CPU_UPDATE_INTERVAL, Pid, ProcessesToUpdate, System};

/// Cumulative host CPU time since the probe started
///
/// `busy_secs` integrates utilisation (0.0 to 1.0 across all cores) over
/// `elapsed_secs`, so two snapshots bound the utilisation of the interval
/// between them.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct CpuSnapshot {
    pub busy_secs: f64,
    pub elapsed_secs: f64,
}

impl CpuSnapshot {
    /// Utilisation between `earlier` and `self`, as a percentage
    pub fn percent_since(&self, earlier: &CpuSnapshot) -> f64 {
        let elapsed = self.elapsed_secs - earlier.elapsed_secs;
        if elapsed <= 0.0 {
            return 0.0;
        }
        ((self.busy_secs - earlier.busy_secs) / elapsed * 100.0).clamp(0.0, 100.0)
    }
}

/// Source of process and host resource figures
pub trait ResourceProbe: Send + Sync + Debug {
    /// Current memory figures
    fn memory(&self) -> Result<MemorySnapshot>;

    /// Cumulative host-wide CPU time
    fn cpu(&self) -> Result<CpuSnapshot>;
}

#[derive(Debug)]
struct CpuIntegral {
    started: Instant,
    last_refresh: Instant,
    busy_secs: f64,
    last_fraction: f64,
}

struct SysinfoState {
    system: System,
    cpu: CpuIntegral,
}

/// Probe backed by `sysinfo`
///
/// sysinfo reports CPU usage averaged since its previous refresh and needs
/// at least [`MINIMUM_CPU_UPDATE_INTERVAL`] between refreshes. Readings are
/// folded into a running integral; between refreshes the latest rate is
/// extrapolated.
pub struct SysinfoProbe {
    state: Mutex<SysinfoState>,
    pid: Option<Pid>,
}

impl SysinfoProbe {
    pub fn new() -> Self {
        let mut system = System::new();
        system.refresh_memory();
        system.refresh_cpu_usage();

        let now = Instant::now();
        Self {
            state: Mutex::new(SysinfoState {
                system,
                cpu: CpuIntegral {
                    started: now,
                    last_refresh: now,
                    busy_secs: 0.0,
                    last_fraction: 0.0,
                },
            }),
            pid: sysinfo::get_current_pid().ok(),
        }
    }
}

impl Default for SysinfoProbe {
    fn default() -> Self {
        Self::new()
    }
}

impl Debug for SysinfoProbe {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SysinfoProbe")
            .field("pid", &self.pid)
            .finish_non_exhaustive()
    }
}

impl ResourceProbe for SysinfoProbe {
    fn memory(&self) -> Result<MemorySnapshot> {
        let pid = self
            .pid
            .ok_or_else(|| MonitorError::monitoring("current process id is unavailable"))?;

        let mut state = self.state.lock();
        let system = &mut state.system;
        system.refresh_memory();
        system.refresh_processes(ProcessesToUpdate::Some(&[pid]), false);

        let process = system
            .process(pid)
            .ok_or_else(|| MonitorError::monitoring(format!("process {} is not visible", pid)))?;

        Ok(MemorySnapshot {
            rss: process.memory(),
            virtual_memory: process.virtual_memory(),
            system_used: system.used_memory(),
            system_total: system.total_memory(),
        })
    }

    fn cpu(&self) -> Result<CpuSnapshot> {
        let now = Instant::now();
        let mut state = self.state.lock();
        let SysinfoState { system, cpu } = &mut *state;

        let since_refresh = now.saturating_duration_since(cpu.last_refresh);
        if since_refresh >= MINIMUM_CPU_UPDATE_INTERVAL {
            system.refresh_cpu_usage();
            let usage = f64::from(system.global_cpu_usage());
            if !usage.is_finite() {
                return Err(MonitorError::monitoring("CPU usage reading is not a number"));
            }
            cpu.last_fraction = (usage / 100.0).clamp(0.0, 1.0);
            cpu.busy_secs += cpu.last_fraction * since_refresh.as_secs_f64();
            cpu.last_refresh = now;
        }

        let pending = now.saturating_duration_since(cpu.last_refresh);
        Ok(CpuSnapshot {
            busy_secs: cpu.busy_secs + cpu.last_fraction * pending.as_secs_f64(),
            elapsed_secs: now.saturating_duration_since(cpu.started).as_secs_f64(),
        })
    }
}

#[derive(Debug, Default)]
struct StaticState {
    memory: MemorySnapshot,
    cpu_percent: f64,
    cpu: CpuSnapshot,
    failing: bool,
}

/// Probe that reports values set by the caller
///
/// Every CPU reading advances a virtual clock by one second at the current
/// percentage, so a span reports the percentages in force while it was open.
#[derive(Debug, Default)]
pub struct StaticProbe {
    state: Mutex<StaticState>,
}

const STATIC_STEP: Duration = Duration::from_secs(1);

impl StaticProbe {
    pub fn new(memory: MemorySnapshot, cpu_percent: f64) -> Self {
        Self {
            state: Mutex::new(StaticState {
                memory,
                cpu_percent,
                ..StaticState::default()
            }),
        }
    }

    pub fn set_memory(&self, memory: MemorySnapshot) {
        self.state.lock().memory = memory;
    }

    pub fn set_cpu_percent(&self, percent: f64) {
        self.state.lock().cpu_percent = percent;
    }

    /// Make every subsequent reading fail
    pub fn set_failing(&self, failing: bool) {
        self.state.lock().failing = failing;
    }
}

impl ResourceProbe for StaticProbe {
    fn memory(&self) -> Result<MemorySnapshot> {
        let state = self.state.lock();
        if state.failing {
            return Err(MonitorError::monitoring("memory probe unavailable"));
        }
        Ok(state.memory)
    }

    fn cpu(&self) -> Result<CpuSnapshot> {
        let mut state = self.state.lock();
        if state.failing {
            return Err(MonitorError::monitoring("CPU probe unavailable"));
        }
        let step = STATIC_STEP.as_secs_f64();
        state.cpu.busy_secs += state.cpu_percent / 100.0 * step;
        state.cpu.elapsed_secs += step;
        Ok(state.cpu)
    }
}
