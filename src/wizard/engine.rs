//! Generic wizard engine
//!
//! Holds the current step and the accumulated answers. Transitions merge a
//! patch into the answers and then ask a pure function for the next step.
//! Concrete wizards own the step graph; the engine only guarantees that it
//! never lands on a step whose prerequisites are missing.

use std::fmt::Debug;

/// A closed set of named steps
pub trait WizardStep<A>: Copy + Eq + Debug + 'static {
    /// Every step in the enumeration
    const ALL: &'static [Self];

    /// Whether the answers collected so far satisfy this step's prerequisites
    fn is_reachable(&self, answers: &A) -> bool;
}

/// Accumulating answer record
pub trait WizardAnswers: Default + Clone {
    /// Partial answers produced by one step
    type Patch;

    /// Merge a patch. Fields absent from the patch are left untouched.
    fn merge(&mut self, patch: Self::Patch);
}

#[derive(Debug, Clone)]
pub struct WizardEngine<S, A> {
    current: S,
    answers: A,
    transitions: u64,
}

impl<S, A> WizardEngine<S, A>
where
    S: WizardStep<A>,
    A: WizardAnswers,
{
    /// Create an engine positioned on `initial` with empty answers
    pub fn new(initial: S) -> Self {
        let mut engine = Self {
            current: initial,
            answers: A::default(),
            transitions: 0,
        };
        engine.start(initial);
        engine
    }

    /// Reset to `initial` and discard all answers
    pub fn start(&mut self, initial: S) {
        self.answers = A::default();
        self.transitions = 0;
        self.enter(initial);
        log::debug!("Wizard started at {:?}", initial);
    }

    pub fn current(&self) -> S {
        self.current
    }

    pub fn answers(&self) -> &A {
        &self.answers
    }

    /// Number of step changes since `start`
    pub fn transitions(&self) -> u64 {
        self.transitions
    }

    /// Merge `patch`, then move to whatever `compute_next` picks
    pub fn advance<F>(&mut self, patch: A::Patch, compute_next: F) -> S
    where
        F: FnOnce(&A) -> S,
    {
        self.answers.merge(patch);
        let next = compute_next(&self.answers);
        self.enter(next);
        next
    }

    /// Move backward. Answers are never discarded.
    pub fn retreat<F>(&mut self, compute_back: F) -> S
    where
        F: FnOnce(&A) -> S,
    {
        let back = compute_back(&self.answers);
        self.enter(back);
        back
    }

    /// Merge working values without changing step
    pub fn update(&mut self, patch: A::Patch) {
        self.answers.merge(patch);
    }

    /// Hand out the accumulated answers, leaving none behind. The engine
    /// stays on its current step, which should be terminal by now.
    pub fn take_answers(&mut self) -> A {
        log::debug!(
            "Wizard finalized at {:?} after {} transitions",
            self.current,
            self.transitions
        );
        std::mem::take(&mut self.answers)
    }

    fn enter(&mut self, target: S) {
        assert!(
            S::ALL.contains(&target),
            "wizard step {:?} is not part of the step enumeration",
            target
        );
        assert!(
            target.is_reachable(&self.answers),
            "wizard step {:?} is not reachable with the current answers",
            target
        );
        if target != self.current {
            log::debug!("Wizard step {:?} -> {:?}", self.current, target);
            self.transitions += 1;
        }
        self.current = target;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    enum Step {
        Pick,
        Detail,
        Done,
    }

    #[derive(Debug, Clone, Default)]
    struct Answers {
        choice: Option<u32>,
        note: Option<String>,
    }

    #[derive(Default)]
    struct Patch {
        choice: Option<u32>,
        note: Option<String>,
    }

    impl WizardAnswers for Answers {
        type Patch = Patch;

        fn merge(&mut self, patch: Patch) {
            if patch.choice.is_some() {
                self.choice = patch.choice;
            }
            if patch.note.is_some() {
                self.note = patch.note;
            }
        }
    }

    impl WizardStep<Answers> for Step {
        const ALL: &'static [Step] = &[Step::Pick, Step::Detail, Step::Done];

        fn is_reachable(&self, answers: &Answers) -> bool {
            match self {
                Step::Pick => true,
                Step::Detail => answers.choice.is_some(),
                Step::Done => answers.choice.is_some() && answers.note.is_some(),
            }
        }
    }

    #[test]
    fn test_advance_merges_then_moves() {
        let mut engine: WizardEngine<Step, Answers> = WizardEngine::new(Step::Pick);
        let next = engine.advance(
            Patch {
                choice: Some(7),
                ..Default::default()
            },
            |_| Step::Detail,
        );

        assert_eq!(next, Step::Detail);
        assert_eq!(engine.current(), Step::Detail);
        assert_eq!(engine.answers().choice, Some(7));
        assert_eq!(engine.transitions(), 1);
    }

    #[test]
    fn test_retreat_keeps_answers() {
        let mut engine: WizardEngine<Step, Answers> = WizardEngine::new(Step::Pick);
        engine.advance(
            Patch {
                choice: Some(1),
                ..Default::default()
            },
            |_| Step::Detail,
        );
        engine.retreat(|_| Step::Pick);

        assert_eq!(engine.current(), Step::Pick);
        assert_eq!(engine.answers().choice, Some(1));
        assert_eq!(engine.transitions(), 2);
    }

    #[test]
    fn test_update_stays_on_step() {
        let mut engine: WizardEngine<Step, Answers> = WizardEngine::new(Step::Pick);
        engine.update(Patch {
            note: Some("draft".into()),
            ..Default::default()
        });
        assert_eq!(engine.current(), Step::Pick);
        assert_eq!(engine.transitions(), 0);
        assert_eq!(engine.answers().note.as_deref(), Some("draft"));
    }

    #[test]
    fn test_start_discards_answers() {
        let mut engine: WizardEngine<Step, Answers> = WizardEngine::new(Step::Pick);
        engine.advance(
            Patch {
                choice: Some(3),
                ..Default::default()
            },
            |_| Step::Detail,
        );
        engine.start(Step::Pick);
        assert!(engine.answers().choice.is_none());
        assert_eq!(engine.transitions(), 0);
    }

    #[test]
    #[should_panic(expected = "not reachable")]
    fn test_unreachable_target_panics() {
        let mut engine: WizardEngine<Step, Answers> = WizardEngine::new(Step::Pick);
        engine.advance(Patch::default(), |_| Step::Done);
    }

    #[test]
    fn test_take_answers_empties_engine() {
        let mut engine: WizardEngine<Step, Answers> = WizardEngine::new(Step::Pick);
        engine.advance(
            Patch {
                choice: Some(2),
                note: Some("ok".into()),
            },
            |_| Step::Done,
        );
        let answers = engine.take_answers();
        assert_eq!(answers.choice, Some(2));
        assert_eq!(answers.note.as_deref(), Some("ok"));

        assert_eq!(engine.current(), Step::Done);
        assert!(engine.answers().choice.is_none());
        assert!(engine.answers().note.is_none());
    }
}
