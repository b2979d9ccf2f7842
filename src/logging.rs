// Call-level summary logging for a token instance.
//
// Counters are collected per thread between `init_call_stats` and
// `take_call_stats`: calls dispatched, calls reverted, calls answered by the
// fallback, events released and a per-method breakdown.

use satforge_support::{error::Op20Result, response::CallResponse};
use std::cell::RefCell;
use std::collections::BTreeMap;

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct MethodStats {
    pub calls: u32,
    pub reverted: u32,
}

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct CallStats {
    /// Every call that reached dispatch, committed or not
    pub calls_dispatched: u32,
    pub calls_reverted: u32,
    /// Calls whose selector was not in the table
    pub fallback_calls: u32,
    pub events_emitted: u32,
    pub per_method: BTreeMap<String, MethodStats>,
}

thread_local! {
    static CALL_STATS: RefCell<Option<CallStats>> = const { RefCell::new(None) };
}

/// Start collecting. Replaces anything collected so far.
pub fn init_call_stats() {
    CALL_STATS.with(|stats| {
        *stats.borrow_mut() = Some(CallStats::default());
    });
}

/// No-op unless collection was started with [`init_call_stats`].
pub fn record_call(method: Option<&str>, result: &Op20Result<CallResponse>) {
    CALL_STATS.with(|stats| {
        if let Some(s) = stats.borrow_mut().as_mut() {
            s.calls_dispatched += 1;
            let reverted = result.is_err();
            if reverted {
                s.calls_reverted += 1;
            }
            if let Ok(response) = result {
                s.events_emitted += response.events.len() as u32;
            }
            match method {
                Some(name) => {
                    let entry = s.per_method.entry(name.to_string()).or_default();
                    entry.calls += 1;
                    if reverted {
                        entry.reverted += 1;
                    }
                }
                None => s.fallback_calls += 1,
            }
        }
    });
}

pub fn get_call_stats() -> Option<CallStats> {
    CALL_STATS.with(|stats| stats.borrow().clone())
}

/// Stops collection and hands back what was gathered.
pub fn take_call_stats() -> Option<CallStats> {
    CALL_STATS.with(|stats| stats.borrow_mut().take())
}

pub fn log_call_summary(stats: &CallStats) {
    log::info!(
        "=== CALL SUMMARY ===\ncalls: {} ({} reverted, {} to fallback)\nevents released: {}",
        stats.calls_dispatched,
        stats.calls_reverted,
        stats.fallback_calls,
        stats.events_emitted
    );
    for (method, m) in &stats.per_method {
        log::info!("  {}: {} calls, {} reverted", method, m.calls, m.reverted);
    }
}
