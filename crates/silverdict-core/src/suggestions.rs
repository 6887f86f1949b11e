use std::time::{SystemTime, UNIX_EPOCH};

use silverdict_api::{ApiError, LookupApi};
use silverdict_config::ui::SuggestionLayout;
use silverdict_types::SuggestionResponse;

use crate::encoding::encode_component;

/// Wall-clock milliseconds, nudged forward so two stamps are never equal
#[derive(Debug, Default)]
pub struct RequestClock {
    last: u64,
}

impl RequestClock {
    pub fn next(&mut self) -> u64 {
        let now = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_millis() as u64)
            .unwrap_or_default();
        self.last = now.max(self.last + 1);
        self.last
    }
}

/// What an empty term shows in place of suggestions
pub fn placeholder(layout: SuggestionLayout, rows: usize) -> Vec<String> {
    match layout {
        SuggestionLayout::Compact => vec![String::new()],
        SuggestionLayout::FixedRows => vec![String::new(); rows.max(1)],
    }
}

/// One stamped autocomplete request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SuggestionRequest {
    pub group: String,
    pub term: String,
    pub timestamp: u64,
}

#[derive(Debug)]
pub struct SuggestionOutcome {
    pub request: SuggestionRequest,
    pub result: Result<SuggestionResponse, ApiError>,
}

impl SuggestionRequest {
    pub async fn send<A>(self, api: &A) -> SuggestionOutcome
    where
        A: LookupApi + ?Sized,
    {
        tracing::debug!("Requesting suggestions for {:?} at {}", self.term, self.timestamp);
        let result = api
            .suggestions(&self.group, &encode_component(&self.term), self.timestamp)
            .await;

        SuggestionOutcome {
            request: self,
            result,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clock_is_strictly_increasing() {
        let mut clock = RequestClock::default();
        let stamps: Vec<u64> = (0..50).map(|_| clock.next()).collect();
        assert!(stamps.windows(2).all(|pair| pair[0] < pair[1]));
    }

    #[test]
    fn placeholder_shapes() {
        assert_eq!(placeholder(SuggestionLayout::Compact, 10), vec![""]);
        assert_eq!(placeholder(SuggestionLayout::FixedRows, 3), vec!["", "", ""]);
    }
}
