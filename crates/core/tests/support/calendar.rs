//! Scriptable in-memory `CalendarGateway`.

use std::sync::Mutex;

use async_trait::async_trait;
use slotbook_core::{BusyQuery, CalendarGateway};
use slotbook_domain::{
    BusyInterval, CalendarProviderKind, EventDraft, EventPatch, ProviderProfile,
    Result as DomainResult, SlotbookError,
};

/// Gateway mock: serves a fixed busy list and records event operations.
/// Each operation can be scripted to fail.
#[derive(Default)]
pub struct MockCalendarGateway {
    pub busy: Vec<BusyInterval>,
    pub fail_busy: bool,
    pub fail_events: bool,
    pub queries: Mutex<Vec<BusyQuery>>,
    pub created: Mutex<Vec<EventDraft>>,
    pub updated: Mutex<Vec<(String, EventPatch)>>,
    pub deleted: Mutex<Vec<String>>,
}

impl MockCalendarGateway {
    pub fn with_busy(busy: Vec<BusyInterval>) -> Self {
        Self {
            busy,
            ..Self::default()
        }
    }

    pub fn unreachable() -> Self {
        Self {
            fail_busy: true,
            fail_events: true,
            ..Self::default()
        }
    }

    fn provider_down<T>(&self) -> DomainResult<T> {
        Err(SlotbookError::Provider("calendar api unreachable".into()))
    }
}

#[async_trait]
impl CalendarGateway for MockCalendarGateway {
    async fn fetch_busy_intervals(
        &self,
        _tenant_id: &str,
        _provider: CalendarProviderKind,
        query: &BusyQuery,
    ) -> DomainResult<Vec<BusyInterval>> {
        if self.fail_busy {
            return self.provider_down();
        }
        self.queries.lock().unwrap().push(query.clone());
        Ok(self.busy.clone())
    }

    async fn create_event(
        &self,
        _tenant_id: &str,
        _provider: CalendarProviderKind,
        draft: &EventDraft,
    ) -> DomainResult<Option<String>> {
        if self.fail_events {
            return self.provider_down();
        }
        let mut created = self.created.lock().unwrap();
        created.push(draft.clone());
        Ok(Some(format!("evt-{}", created.len())))
    }

    async fn update_event(
        &self,
        _tenant_id: &str,
        _provider: CalendarProviderKind,
        event_id: &str,
        patch: &EventPatch,
    ) -> DomainResult<bool> {
        if self.fail_events {
            return self.provider_down();
        }
        self.updated
            .lock()
            .unwrap()
            .push((event_id.to_string(), patch.clone()));
        Ok(true)
    }

    async fn delete_event(
        &self,
        _tenant_id: &str,
        _provider: CalendarProviderKind,
        event_id: &str,
    ) -> DomainResult<bool> {
        if self.fail_events {
            return self.provider_down();
        }
        self.deleted.lock().unwrap().push(event_id.to_string());
        Ok(true)
    }

    async fn fetch_profile(
        &self,
        _tenant_id: &str,
        _provider: CalendarProviderKind,
    ) -> DomainResult<Option<ProviderProfile>> {
        Ok(Some(ProviderProfile {
            email: "calendar@acme.test".into(),
            name: Some("Acme Calendar".into()),
        }))
    }

    async fn is_connected(
        &self,
        _tenant_id: &str,
        _provider: CalendarProviderKind,
    ) -> DomainResult<bool> {
        Ok(true)
    }
}
