//! Decision log service.

use super::{assign_id, position_of, ServiceResult};
use crate::model::decision::{Decision, DecisionPatch, DecisionStatus, NewDecision};
use crate::model::normalize::matches_search;
use crate::model::{now_epoch_ms, require_id, Record};
use crate::repo::record_store::RecordStore;
use log::info;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DecisionListQuery {
    pub status: Option<DecisionStatus>,
    /// Case-insensitive match over title and notes.
    pub search: Option<String>,
}

pub struct DecisionService<S: RecordStore> {
    store: S,
}

impl<S: RecordStore> DecisionService<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Lists decisions by date descending.
    pub fn list_decisions(&self, query: &DecisionListQuery) -> ServiceResult<Vec<Decision>> {
        self.store.pause();
        let mut decisions: Vec<Decision> = self
            .store
            .load::<Decision>()?
            .into_iter()
            .filter(|decision| query.status.map_or(true, |status| decision.status == status))
            .filter(|decision| {
                query.search.as_deref().map_or(true, |needle| {
                    matches_search(needle, &[Some(decision.title.as_str()), decision.notes.as_deref()])
                })
            })
            .collect();
        decisions.sort_by(|a, b| b.date.cmp(&a.date));
        Ok(decisions)
    }

    pub fn create_decision(&self, new: NewDecision) -> ServiceResult<Decision> {
        self.store.pause();
        let mut decisions = self.store.load::<Decision>()?;
        let now = now_epoch_ms();
        let decision = Decision {
            id: assign_id::<Decision>(new.id),
            title: new.title.trim().to_string(),
            date: new.date,
            status: new.status,
            notes: new.notes,
            created_at: Some(now),
            updated_at: Some(now),
        };
        decision.validate()?;

        decisions.insert(0, decision.clone());
        self.store.save(&decisions)?;
        info!(
            "event=decision_create module=service status=ok id={} rows={}",
            decision.id,
            decisions.len()
        );
        Ok(decision)
    }

    pub fn update_decision(&self, id: &str, patch: DecisionPatch) -> ServiceResult<Decision> {
        self.store.pause();
        let id = require_id(Decision::ENTITY, id)?;
        let mut decisions = self.store.load::<Decision>()?;
        let index = position_of(&decisions, id)?;

        let mut updated = decisions[index].clone();
        updated.apply(patch);
        updated.updated_at = Some(now_epoch_ms());
        updated.validate()?;

        decisions[index] = updated.clone();
        self.store.save(&decisions)?;
        info!(
            "event=decision_update module=service status=ok id={} status_value={:?}",
            id, updated.status
        );
        Ok(updated)
    }

    pub fn set_decision_status(&self, id: &str, status: DecisionStatus) -> ServiceResult<Decision> {
        self.update_decision(
            id,
            DecisionPatch {
                status: Some(status),
                ..DecisionPatch::default()
            },
        )
    }

    pub fn remove_decision(&self, id: &str) -> ServiceResult<String> {
        self.store.pause();
        let id = require_id(Decision::ENTITY, id)?;
        let mut decisions = self.store.load::<Decision>()?;
        let index = position_of(&decisions, id)?;

        decisions.remove(index);
        self.store.save(&decisions)?;
        info!(
            "event=decision_remove module=service status=ok id={} rows={}",
            id,
            decisions.len()
        );
        Ok(id.to_string())
    }
}
