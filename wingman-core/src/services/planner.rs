//! Planner service - the user's calendar of dates

use std::cmp::Reverse;
use std::sync::Arc;

use chrono::NaiveDateTime;
use uuid::Uuid;

use crate::domain::planned_date::{parse_date_time, DATE_TIME_FORMAT};
use crate::domain::result::{Error, Result};
use crate::domain::{namespace_for, DateDraft, DateOption, EntityKind, PlannedDate, Session};
use crate::ports::{KeyValueStore, KeyValueStoreExt};

/// Manages planned dates in the session's namespace
pub struct PlannerService {
    store: Arc<dyn KeyValueStore>,
}

impl PlannerService {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    /// All dates in insertion order
    pub fn list(&self, session: Option<&Session>) -> Result<Vec<PlannedDate>> {
        let key = namespace_for(session, EntityKind::Dates);
        Ok(self.store.load_json(key.as_str())?.unwrap_or_default())
    }

    pub fn add(&self, session: Option<&Session>, draft: DateDraft) -> Result<PlannedDate> {
        if draft.title.trim().is_empty() {
            return Err(Error::validation("Date title is required"));
        }
        if draft.date.trim().is_empty() {
            return Err(Error::validation("Date and time are required"));
        }
        if parse_date_time(&draft.date).is_none() {
            return Err(Error::validation(format!(
                "Invalid date '{}', expected YYYY-MM-DDTHH:MM",
                draft.date.trim()
            )));
        }

        let date = draft.into_date(Uuid::new_v4().to_string());
        let mut dates = self.list(session)?;
        dates.push(date.clone());
        self.save(session, &dates)?;
        Ok(date)
    }

    pub fn remove(&self, session: Option<&Session>, id: &str) -> Result<PlannedDate> {
        let mut dates = self.list(session)?;
        let index = dates
            .iter()
            .position(|d| d.id == id)
            .ok_or_else(|| Error::not_found(format!("Date '{}'", id)))?;
        let removed = dates.remove(index);
        self.save(session, &dates)?;
        Ok(removed)
    }

    /// Dates at or after `now`, soonest first
    pub fn upcoming(
        &self,
        session: Option<&Session>,
        now: NaiveDateTime,
    ) -> Result<Vec<PlannedDate>> {
        let mut dates: Vec<_> = self
            .list(session)?
            .into_iter()
            .filter(|d| d.starts_at().is_some_and(|t| t >= now))
            .collect();
        dates.sort_by_key(|d| d.starts_at());
        Ok(dates)
    }

    /// Dates before `now`, most recent first; unreadable dates sort last
    pub fn past(&self, session: Option<&Session>, now: NaiveDateTime) -> Result<Vec<PlannedDate>> {
        let mut dates: Vec<_> = self
            .list(session)?
            .into_iter()
            .filter(|d| d.starts_at().map_or(true, |t| t < now))
            .collect();
        dates.sort_by_key(|d| Reverse(d.starts_at()));
        Ok(dates)
    }

    /// Turn a generated suggestion into a date ready to save
    pub fn draft_from_option(
        option: &DateOption,
        date_time: NaiveDateTime,
        person_id: &str,
    ) -> DateDraft {
        DateDraft {
            title: option.title.clone(),
            person_id: person_id.to_string(),
            date: date_time.format(DATE_TIME_FORMAT).to_string(),
            location: option.location.clone(),
            notes: format!("{}\n\nWhy: {}", option.description, option.reasoning),
        }
    }

    fn save(&self, session: Option<&Session>, dates: &[PlannedDate]) -> Result<()> {
        let key = namespace_for(session, EntityKind::Dates);
        self.store.save_json(key.as_str(), dates)
    }
}
