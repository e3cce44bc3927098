use serde::Serialize;

use crate::types::AnnotatedFix;

/// A retained fix where the vessel dwelt for at least the idle threshold.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IdleStop {
    pub latitude: f64,
    pub longitude: f64,
    pub local_time: String,
    pub duration_secs: f64,
    pub duration_display: String,
}

pub fn idle_stops(fixes: &[AnnotatedFix], idle_min_secs: f64) -> Vec<IdleStop> {
    fixes
        .iter()
        .filter(|fix| fix.duration_secs >= idle_min_secs)
        .map(|fix| IdleStop {
            latitude: fix.latitude,
            longitude: fix.longitude,
            local_time: fix.local_time.clone(),
            duration_secs: fix.duration_secs,
            duration_display: format_duration(fix.duration_secs),
        })
        .collect()
}

/// `HH:MM:SS`; hours keep counting past 24.
pub fn format_duration(secs: f64) -> String {
    let total = secs.max(0.0).floor() as u64;
    format!(
        "{:02}:{:02}:{:02}",
        total / 3600,
        (total % 3600) / 60,
        total % 60
    )
}
