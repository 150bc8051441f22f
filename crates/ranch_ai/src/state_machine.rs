//! Finite state machine with terminal states

use std::collections::HashMap;
use std::fmt;
use std::hash::Hash;

/// A state in the state machine
pub trait State: Copy + Eq + Hash + fmt::Debug {
    /// Terminal states are never left once entered
    fn is_terminal(&self) -> bool {
        false
    }
}

/// Transition condition
pub type TransitionCondition<C> = Box<dyn Fn(&C) -> bool>;

/// A state transition
pub struct Transition<S, C> {
    /// Target state
    pub to: S,
    pub condition: TransitionCondition<C>,
    /// Higher is checked first
    pub priority: i32,
}

impl<S, C> Transition<S, C> {
    pub fn new<F>(to: S, condition: F) -> Self
    where
        F: Fn(&C) -> bool + 'static,
    {
        Self {
            to,
            condition: Box::new(condition),
            priority: 0,
        }
    }

    pub fn with_priority(mut self, priority: i32) -> Self {
        self.priority = priority;
        self
    }

    pub fn should_transition(&self, context: &C) -> bool {
        (self.condition)(context)
    }
}

/// A state change reported by [`StateMachine::update`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StateChange<S> {
    pub from: S,
    pub to: S,
}

/// Finite state machine
///
/// Time is accumulated per state in milliseconds; entering a state resets it.
pub struct StateMachine<S: State, C> {
    current: S,
    previous: Option<S>,
    time_in_state_ms: f32,
    transitions: HashMap<S, Vec<Transition<S, C>>>,
    /// Checked from any non-terminal state, before per-state transitions
    global_transitions: Vec<Transition<S, C>>,
}

impl<S: State, C> StateMachine<S, C> {
    pub fn new(initial: S) -> Self {
        Self {
            current: initial,
            previous: None,
            time_in_state_ms: 0.0,
            transitions: HashMap::new(),
            global_transitions: Vec::new(),
        }
    }

    pub fn add_transition<F>(&mut self, from: S, to: S, condition: F)
    where
        F: Fn(&C) -> bool + 'static,
    {
        self.add_transition_priority(from, to, condition, 0);
    }

    pub fn add_transition_priority<F>(&mut self, from: S, to: S, condition: F, priority: i32)
    where
        F: Fn(&C) -> bool + 'static,
    {
        let list = self.transitions.entry(from).or_default();
        list.push(Transition::new(to, condition).with_priority(priority));
        // Stable: equal priorities keep insertion order
        list.sort_by(|a, b| b.priority.cmp(&a.priority));
    }

    pub fn add_global_transition<F>(&mut self, to: S, condition: F)
    where
        F: Fn(&C) -> bool + 'static,
    {
        self.global_transitions.push(Transition::new(to, condition));
    }

    pub fn current(&self) -> S {
        self.current
    }

    pub fn previous(&self) -> Option<S> {
        self.previous
    }

    pub fn is_in(&self, state: S) -> bool {
        self.current == state
    }

    pub fn time_in_state_ms(&self) -> f32 {
        self.time_in_state_ms
    }

    /// Jump to `to`. Refused when the current state is terminal.
    ///
    /// Returns true if the state changed.
    pub fn force_transition(&mut self, to: S) -> bool {
        if self.current == to || self.current.is_terminal() {
            return false;
        }
        self.previous = Some(self.current);
        self.current = to;
        self.time_in_state_ms = 0.0;
        true
    }

    /// Advance the state timer and take the first transition whose condition holds
    pub fn update(&mut self, context: &C, delta_ms: f32) -> Option<StateChange<S>> {
        self.time_in_state_ms += delta_ms;
        if self.current.is_terminal() {
            return None;
        }

        let from = self.current;
        let target = self
            .global_transitions
            .iter()
            .filter(|t| t.to != from)
            .chain(self.transitions.get(&from).into_iter().flatten())
            .find(|t| t.should_transition(context))
            .map(|t| t.to)?;

        self.force_transition(target).then_some(StateChange { from, to: target })
    }
}

impl<S: State, C> fmt::Debug for StateMachine<S, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StateMachine")
            .field("current", &self.current)
            .field("previous", &self.previous)
            .field("time_in_state_ms", &self.time_in_state_ms)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    enum TestState {
        Idle,
        Walking,
        Running,
        Gone,
    }

    impl State for TestState {
        fn is_terminal(&self) -> bool {
            matches!(self, Self::Gone)
        }
    }

    struct TestContext {
        speed: f32,
        alive: bool,
    }

    fn machine() -> StateMachine<TestState, TestContext> {
        let mut fsm: StateMachine<TestState, TestContext> = StateMachine::new(TestState::Idle);
        fsm.add_transition(TestState::Idle, TestState::Walking, |ctx| ctx.speed > 0.0);
        fsm.add_transition(TestState::Walking, TestState::Running, |ctx| ctx.speed > 5.0);
        fsm.add_transition_priority(TestState::Walking, TestState::Idle, |ctx| ctx.speed <= 0.0, 1);
        fsm.add_global_transition(TestState::Gone, |ctx| !ctx.alive);
        fsm
    }

    #[test]
    fn test_transitions() {
        let mut fsm = machine();
        let mut ctx = TestContext { speed: 0.0, alive: true };

        assert_eq!(fsm.update(&ctx, 16.0), None);
        assert_eq!(fsm.time_in_state_ms(), 16.0);

        ctx.speed = 2.0;
        assert_eq!(
            fsm.update(&ctx, 16.0),
            Some(StateChange {
                from: TestState::Idle,
                to: TestState::Walking
            })
        );
        assert_eq!(fsm.time_in_state_ms(), 0.0);

        ctx.speed = 10.0;
        fsm.update(&ctx, 16.0);
        assert!(fsm.is_in(TestState::Running));
        assert_eq!(fsm.previous(), Some(TestState::Walking));
    }

    #[test]
    fn test_priority_order() {
        let mut fsm = machine();
        fsm.force_transition(TestState::Walking);
        fsm.add_transition_priority(TestState::Walking, TestState::Running, |_| true, 5);

        let ctx = TestContext { speed: 0.0, alive: true };
        fsm.update(&ctx, 16.0);
        assert!(fsm.is_in(TestState::Running));
    }

    #[test]
    fn test_terminal_state_is_final() {
        let mut fsm = machine();
        let ctx = TestContext { speed: 3.0, alive: false };

        fsm.update(&ctx, 16.0);
        assert!(fsm.is_in(TestState::Gone));

        assert!(!fsm.force_transition(TestState::Idle));
        assert_eq!(fsm.update(&ctx, 100.0), None);
        assert!(fsm.is_in(TestState::Gone));
        assert_eq!(fsm.time_in_state_ms(), 100.0);
    }
}
