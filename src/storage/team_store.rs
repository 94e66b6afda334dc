use std::collections::btree_map::Entry;
use std::collections::BTreeMap;
use std::sync::Arc;

use serde::Serialize;
use serde_json::Number;
use tokio::sync::RwLock;

use crate::codec::Report;
use crate::storage::TeamId;

/// Latest known reading for one team.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TeamReading {
    pub team_id: TeamId,
    pub temperature: Option<Number>,
    pub humidity: Option<Number>,
    pub timestamp: Option<String>,
    pub report_count: u64,
}

impl TeamReading {
    fn first(report: Report) -> Self {
        Self {
            team_id: report.team_id,
            temperature: report.temperature,
            humidity: report.humidity,
            timestamp: report.timestamp,
            report_count: 1,
        }
    }

    // Every value field is overwritten, absent ones included.
    fn apply(&mut self, report: Report) {
        self.temperature = report.temperature;
        self.humidity = report.humidity;
        self.timestamp = report.timestamp;
        self.report_count += 1;
    }
}

/// In-memory latest-reading-per-team table.
///
/// Cloning yields another handle to the same table. All reads and writes go
/// through one `RwLock`, so an entry is never observed half-updated and
/// per-team updates apply in the order they acquire the lock.
#[derive(Debug, Clone, Default)]
pub struct TeamStore {
    teams: Arc<RwLock<BTreeMap<TeamId, TeamReading>>>,
}

impl TeamStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert the first reading for a team or overwrite its latest one,
    /// returning the entry as stored.
    pub async fn upsert(&self, report: Report) -> TeamReading {
        let mut teams = self.teams.write().await;
        let reading = match teams.entry(report.team_id.clone()) {
            Entry::Vacant(slot) => slot.insert(TeamReading::first(report)),
            Entry::Occupied(slot) => {
                let reading = slot.into_mut();
                reading.apply(report);
                reading
            }
        };
        reading.clone()
    }

    /// All teams, numeric ids ascending, then textual ids.
    pub async fn snapshot(&self) -> Vec<TeamReading> {
        self.teams.read().await.values().cloned().collect()
    }

    pub async fn get(&self, team_id: &TeamId) -> Option<TeamReading> {
        self.teams.read().await.get(team_id).cloned()
    }

    pub async fn len(&self) -> usize {
        self.teams.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.teams.read().await.is_empty()
    }
}
