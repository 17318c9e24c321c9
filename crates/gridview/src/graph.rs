//! Revision-based memoization for the derived-view pipeline.
//!
//! Every piece of feature state lives in a [`Tracked`] cell stamped with a
//! revision from a shared [`Clock`]. A derived stage is a [`Memo`]: it records
//! the revisions of its inputs when it last ran and only recomputes when one
//! of them moved. Each recomputation mints a fresh output revision, which
//! downstream stages list as one of their inputs.

use std::cell::{Cell, RefCell};
use std::ops::Deref;
use std::rc::Rc;

/// A point in a table's mutation history.
pub type Revision = u64;

/// Source of monotonically increasing revisions.
#[derive(Debug, Default)]
pub struct Clock {
    now: Cell<Revision>,
}

impl Clock {
    pub fn new() -> Self {
        Clock::default()
    }

    /// Advances the clock and returns the new revision.
    pub fn tick(&self) -> Revision {
        let next = self.now.get() + 1;
        self.now.set(next);
        next
    }

    pub fn now(&self) -> Revision {
        self.now.get()
    }
}

/// State whose changes are visible to memoized stages.
#[derive(Debug)]
pub struct Tracked<S> {
    value: S,
    revision: Revision,
}

impl<S> Tracked<S> {
    pub fn new(value: S, clock: &Clock) -> Self {
        Tracked {
            value,
            revision: clock.tick(),
        }
    }

    pub fn value(&self) -> &S {
        &self.value
    }

    pub fn revision(&self) -> Revision {
        self.revision
    }

    /// Mutates the state and marks it changed.
    pub fn update<R>(&mut self, clock: &Clock, f: impl FnOnce(&mut S) -> R) -> R {
        let result = f(&mut self.value);
        self.revision = clock.tick();
        result
    }

    /// Mutates the state, marking it changed only if `f` reports a change.
    pub fn update_if(&mut self, clock: &Clock, f: impl FnOnce(&mut S) -> bool) -> bool {
        let changed = f(&mut self.value);
        if changed {
            self.revision = clock.tick();
        }
        changed
    }

    /// Replaces the value, bumping the revision only if it differs.
    pub fn assign(&mut self, clock: &Clock, value: S) -> bool
    where
        S: PartialEq,
    {
        self.update_if(clock, |current| {
            if *current == value {
                return false;
            }
            *current = value;
            true
        })
    }
}

impl<S> Deref for Tracked<S> {
    type Target = S;

    fn deref(&self) -> &S {
        &self.value
    }
}

#[derive(Debug)]
struct Slot<V> {
    inputs: Vec<Revision>,
    revision: Revision,
    value: Rc<V>,
}

/// A cached derived value keyed by its input revisions.
#[derive(Debug)]
pub struct Memo<V> {
    name: &'static str,
    slot: RefCell<Option<Slot<V>>>,
    runs: Cell<u64>,
}

impl<V> Memo<V> {
    pub fn new(name: &'static str) -> Self {
        Memo {
            name,
            slot: RefCell::new(None),
            runs: Cell::new(0),
        }
    }

    /// Returns the cached value if `inputs` match the last run, otherwise
    /// runs `compute` and caches its result.
    ///
    /// The returned revision changes exactly when the value was recomputed.
    /// `compute` may read other memos.
    pub fn get(
        &self,
        clock: &Clock,
        inputs: &[Revision],
        compute: impl FnOnce() -> V,
    ) -> (Rc<V>, Revision) {
        if let Some(slot) = self.slot.borrow().as_ref() {
            if slot.inputs == inputs {
                return (Rc::clone(&slot.value), slot.revision);
            }
        }
        log::trace!("recomputing {}", self.name);
        let value = Rc::new(compute());
        let revision = clock.tick();
        self.runs.set(self.runs.get() + 1);
        *self.slot.borrow_mut() = Some(Slot {
            inputs: inputs.to_vec(),
            revision,
            value: Rc::clone(&value),
        });
        (value, revision)
    }

    /// Number of times this stage has recomputed.
    pub fn runs(&self) -> u64 {
        self.runs.get()
    }

    /// Drops the cached value so the next read recomputes.
    pub fn invalidate(&self) {
        self.slot.borrow_mut().take();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clock_is_monotonic() {
        let clock = Clock::new();
        let a = clock.tick();
        let b = clock.tick();
        assert!(b > a);
        assert_eq!(clock.now(), b);
    }

    #[test]
    fn update_if_only_bumps_on_change() {
        let clock = Clock::new();
        let mut state = Tracked::new(1, &clock);
        let before = state.revision();
        assert!(!state.update_if(&clock, |_| false));
        assert_eq!(state.revision(), before);
        assert!(state.update_if(&clock, |v| {
            *v = 2;
            true
        }));
        assert!(state.revision() > before);
        assert_eq!(*state, 2);
    }

    #[test]
    fn assign_ignores_equal_values() {
        let clock = Clock::new();
        let mut state = Tracked::new("a", &clock);
        let before = state.revision();
        assert!(!state.assign(&clock, "a"));
        assert_eq!(state.revision(), before);
        assert!(state.assign(&clock, "b"));
        assert!(state.revision() > before);
    }

    #[test]
    fn memo_reuses_until_inputs_move() {
        let clock = Clock::new();
        let mut source = Tracked::new(vec![3, 1, 2], &clock);
        let sorted: Memo<Vec<i32>> = Memo::new("sorted");
        let read = |source: &Tracked<Vec<i32>>| {
            sorted.get(&clock, &[source.revision()], || {
                let mut v = source.value().clone();
                v.sort();
                v
            })
        };

        let (first, r1) = read(&source);
        let (again, r2) = read(&source);
        assert_eq!(*first, vec![1, 2, 3]);
        assert!(Rc::ptr_eq(&first, &again));
        assert_eq!(r1, r2);
        assert_eq!(sorted.runs(), 1);

        source.update(&clock, |v| v.push(0));
        let (third, r3) = read(&source);
        assert_eq!(*third, vec![0, 1, 2, 3]);
        assert!(r3 > r2);
        assert_eq!(sorted.runs(), 2);
    }

    #[test]
    fn chained_memos_recompute_downstream_only() {
        let clock = Clock::new();
        let base = Tracked::new(10, &clock);
        let mut knob = Tracked::new(1, &clock);
        let upstream: Memo<i32> = Memo::new("upstream");
        let downstream: Memo<i32> = Memo::new("downstream");

        let run = |knob: &Tracked<i32>| {
            let (up, up_rev) = upstream.get(&clock, &[base.revision()], || *base.value() * 2);
            downstream.get(&clock, &[up_rev, knob.revision()], || *up + *knob.value())
        };

        assert_eq!(*run(&knob).0, 21);
        knob.update(&clock, |k| *k = 5);
        assert_eq!(*run(&knob).0, 25);
        assert_eq!(upstream.runs(), 1);
        assert_eq!(downstream.runs(), 2);
    }

    #[test]
    fn invalidate_forces_recompute() {
        let clock = Clock::new();
        let memo: Memo<u8> = Memo::new("m");
        memo.get(&clock, &[1], || 1);
        memo.invalidate();
        memo.get(&clock, &[1], || 1);
        assert_eq!(memo.runs(), 2);
    }
}
