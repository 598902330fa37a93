//! Funnel sessions and state-change notification.
//!
//! A session owns one `FunnelState` and replaces it only when the engine
//! accepts an intent. Observers (rendering layers) are notified after every
//! accepted intent and never after a rejected one.

use crate::engine::transition;
use crate::{
    Catalog, FunnelContent, FunnelState, Intent, MedicationRecord, QuizQuestion, QuizSequence,
    Result,
};
use chrono::{DateTime, Utc};
use std::sync::Arc;
use uuid::Uuid;

/// Notification emitted after a successful dispatch
#[derive(Clone, Debug)]
pub struct StateChange {
    pub session_id: Uuid,
    pub intent: Intent,
    pub previous: FunnelState,
    pub current: FunnelState,
    pub at: DateTime<Utc>,
}

/// Subscriber to a session's state changes
pub trait StateObserver: Send {
    fn on_transition(&mut self, change: &StateChange);
}

impl<F> StateObserver for F
where
    F: FnMut(&StateChange) + Send,
{
    fn on_transition(&mut self, change: &StateChange) {
        self(change)
    }
}

/// One user's pass through the funnel
pub struct FunnelSession {
    id: Uuid,
    content: Arc<FunnelContent>,
    state: FunnelState,
    observers: Vec<Box<dyn StateObserver>>,
    transitions: usize,
}

impl std::fmt::Debug for FunnelSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FunnelSession")
            .field("id", &self.id)
            .field("state", &self.state)
            .field("observers", &self.observers.len())
            .field("transitions", &self.transitions)
            .finish()
    }
}

impl FunnelSession {
    /// Start a fresh session on the Decision screen
    pub fn new(content: Arc<FunnelContent>) -> Self {
        Self::with_id(Uuid::new_v4(), content)
    }

    pub fn with_id(id: Uuid, content: Arc<FunnelContent>) -> Self {
        tracing::debug!("Starting funnel session {}", id);
        Self {
            id,
            content,
            state: FunnelState::new(),
            observers: Vec::new(),
            transitions: 0,
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn state(&self) -> &FunnelState {
        &self.state
    }

    pub fn content(&self) -> &FunnelContent {
        &self.content
    }

    pub fn catalog(&self) -> &Catalog {
        &self.content.catalog
    }

    pub fn quiz(&self) -> &QuizSequence {
        &self.content.quiz
    }

    /// Number of intents accepted so far
    pub fn transitions(&self) -> usize {
        self.transitions
    }

    /// Register an observer for all future state changes
    pub fn subscribe(&mut self, observer: impl StateObserver + 'static) {
        self.observers.push(Box::new(observer));
    }

    /// Apply an intent, adopting the new state only if the engine accepts it
    pub fn dispatch(&mut self, intent: Intent) -> Result<&FunnelState> {
        let next = match transition(&self.content, &self.state, &intent) {
            Ok(next) => next,
            Err(e) => {
                tracing::warn!(
                    "Session {}: rejected '{}' on {}: {}",
                    self.id,
                    intent,
                    self.state.screen,
                    e
                );
                return Err(e);
            }
        };

        let previous = std::mem::replace(&mut self.state, next);
        self.transitions += 1;

        if !self.observers.is_empty() {
            let change = StateChange {
                session_id: self.id,
                intent,
                previous,
                current: self.state.clone(),
                at: Utc::now(),
            };
            for observer in &mut self.observers {
                observer.on_transition(&change);
            }
        }

        Ok(&self.state)
    }

    /// The selected medication's record, if any
    pub fn selected_medication(&self) -> Option<&MedicationRecord> {
        self.state
            .selected_medication_id
            .as_deref()
            .and_then(|id| self.content.catalog.find(id))
    }

    /// The question being asked, while on the Quiz screen
    pub fn current_question(&self) -> Option<&QuizQuestion> {
        if self.state.screen != crate::Screen::Quiz {
            return None;
        }
        self.content.quiz.question(self.state.quiz_index)
    }

    /// 1-based position of the current question and the quiz length
    pub fn quiz_progress(&self) -> Option<(usize, usize)> {
        self.current_question()
            .map(|_| (self.state.quiz_index + 1, self.content.quiz.len()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{get_default_content, Error, Screen};
    use std::sync::Mutex;

    fn session() -> FunnelSession {
        FunnelSession::new(get_default_content())
    }

    #[test]
    fn test_new_session_starts_at_decision() {
        let s = session();
        assert_eq!(s.state(), &FunnelState::new());
        assert_eq!(s.transitions(), 0);
        assert!(s.selected_medication().is_none());
    }

    #[test]
    fn test_dispatch_replaces_state() {
        let mut s = session();
        let state = s.dispatch(Intent::ChooseKnown).unwrap();
        assert_eq!(state.screen, Screen::Catalog);
        assert_eq!(s.transitions(), 1);
    }

    #[test]
    fn test_rejected_dispatch_keeps_state() {
        crate::logging::init_test();
        let mut s = session();
        s.dispatch(Intent::ChooseKnown).unwrap();
        let before = s.state().clone();

        let err = s.dispatch(Intent::ConfirmSelection).unwrap_err();
        assert!(matches!(err, Error::GuardRejected));
        assert!(err.is_rejection());
        assert_eq!(s.state(), &before);
        assert_eq!(s.transitions(), 1);
    }

    #[test]
    fn test_observers_see_accepted_intents_only() {
        let seen: Arc<Mutex<Vec<StateChange>>> = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);

        let mut s = session();
        s.subscribe(move |change: &StateChange| sink.lock().unwrap().push(change.clone()));

        s.dispatch(Intent::ChooseKnown).unwrap();
        let _ = s.dispatch(Intent::ConfirmSelection);
        s.dispatch(Intent::SelectMedication("nad_inj".into())).unwrap();

        let seen = seen.lock().unwrap();
        assert_eq!(seen.len(), 2);
        assert_eq!(seen[0].previous.screen, Screen::Decision);
        assert_eq!(seen[0].current.screen, Screen::Catalog);
        assert_eq!(seen[1].intent, Intent::SelectMedication("nad_inj".into()));
        assert_eq!(seen[1].current.selected_medication_id.as_deref(), Some("nad_inj"));
        assert!(seen.iter().all(|c| c.session_id == s.id()));
    }

    #[test]
    fn test_multiple_observers_all_notified() {
        let count = Arc::new(Mutex::new(0usize));
        let mut s = session();
        for _ in 0..3 {
            let count = Arc::clone(&count);
            s.subscribe(move |_: &StateChange| *count.lock().unwrap() += 1);
        }
        s.dispatch(Intent::ChooseUnknown).unwrap();
        assert_eq!(*count.lock().unwrap(), 3);
    }

    #[test]
    fn test_quiz_progress_and_recommendation() {
        let mut s = session();
        assert_eq!(s.quiz_progress(), None);

        s.dispatch(Intent::ChooseUnknown).unwrap();
        assert_eq!(s.quiz_progress(), Some((1, 3)));
        assert_eq!(s.current_question().unwrap().id, "lifestyle");

        s.dispatch(Intent::Answer("physical".into())).unwrap();
        s.dispatch(Intent::Answer("strength".into())).unwrap();
        assert_eq!(s.quiz_progress(), Some((3, 3)));

        s.dispatch(Intent::Answer("heavy".into())).unwrap();
        assert_eq!(s.current_question(), None);
        assert_eq!(s.selected_medication().unwrap().name, "Injectable TRT");
    }

    #[test]
    fn test_full_catalog_path_to_intake() {
        let mut s = session();
        s.dispatch(Intent::ChooseKnown).unwrap();
        s.dispatch(Intent::SelectMedication("nad_inj".into())).unwrap();
        s.dispatch(Intent::ConfirmSelection).unwrap();
        assert!(s.state().is_terminal());

        let err = s.dispatch(Intent::SelectMedication("prog".into())).unwrap_err();
        assert!(matches!(err, Error::IntentNotAllowed { .. }));
        assert_eq!(s.state().selected_medication_id.as_deref(), Some("nad_inj"));
    }
}
