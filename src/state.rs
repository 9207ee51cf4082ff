//! Render-state model and the diffing engine that moves the GL context
//! between two state configurations with the minimal set of driver calls.
//!
//! A `StateSet` maps a state category to a value; a category absent from a
//! set means "use the default for that category". Switching between two sets
//! walks both in category order and emits one transition per category either
//! side mentions, resolving the missing side to the canonical default. A
//! transition whose endpoints are equal never reaches the driver.

use std::collections::BTreeMap;
use std::mem;

use once_cell::sync::Lazy;

use gl;
use gl::types::*;
use glutil;

/// Ordering key for the diff walk. One state kind per category, by
/// construction: the map key is always derived from the value.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub enum Category {
    Blend,
    Depth,
    Lighting,
    Texture,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BlendState {
    pub enable: bool,
    pub src: GLenum,
    pub dst: GLenum,
}

impl Default for BlendState {
    fn default() -> BlendState {
        BlendState {
            enable: false,
            src: gl::ONE,
            dst: gl::ZERO,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DepthState {
    pub test: bool,
    pub write: bool,
    pub func: GLenum,
}

impl Default for DepthState {
    fn default() -> DepthState {
        DepthState {
            test: false,
            write: true,
            func: gl::LESS,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LightingState {
    pub enable: bool,
    pub light_count: u8,
    pub ambient: [f32; 4],
}

impl Default for LightingState {
    fn default() -> LightingState {
        LightingState {
            enable: false,
            light_count: 0,
            ambient: [0.0, 0.0, 0.0, 1.0],
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TextureState {
    pub enable: bool,
}

impl Default for TextureState {
    fn default() -> TextureState {
        TextureState { enable: false }
    }
}

/// One orthogonal slice of global graphics state.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum State {
    Blend(BlendState),
    Depth(DepthState),
    Lighting(LightingState),
    Texture(TextureState),
}

impl State {
    pub fn category(&self) -> Category {
        match *self {
            State::Blend(_) => Category::Blend,
            State::Depth(_) => Category::Depth,
            State::Lighting(_) => Category::Lighting,
            State::Texture(_) => Category::Texture,
        }
    }

    /// Issues the driver calls that take the context from `self` to `to`.
    /// Only the fields that actually differ reach the driver.
    fn switch_to(&self, to: &State) {
        match (self, to) {
            (&State::Blend(ref from), &State::Blend(ref to)) => from.switch_to(to),
            (&State::Depth(ref from), &State::Depth(ref to)) => from.switch_to(to),
            (&State::Lighting(ref from), &State::Lighting(ref to)) => from.switch_to(to),
            (&State::Texture(ref from), &State::Texture(ref to)) => from.switch_to(to),
            _ => unreachable!("state categories do not match"),
        }
    }
}

impl BlendState {
    fn switch_to(&self, to: &BlendState) {
        unsafe {
            if self.enable != to.enable {
                glutil::set_enabled(gl::BLEND, to.enable);
            }
            if (self.src, self.dst) != (to.src, to.dst) {
                gl::BlendFunc(to.src, to.dst);
            }
        }
    }
}

impl DepthState {
    fn switch_to(&self, to: &DepthState) {
        unsafe {
            if self.test != to.test {
                glutil::set_enabled(gl::DEPTH_TEST, to.test);
            }
            if self.write != to.write {
                gl::DepthMask(if to.write { gl::TRUE } else { gl::FALSE });
            }
            if self.func != to.func {
                gl::DepthFunc(to.func);
            }
        }
    }
}

impl LightingState {
    fn switch_to(&self, to: &LightingState) {
        unsafe {
            if self.enable != to.enable {
                glutil::set_enabled(gl::LIGHTING, to.enable);
            }
            for i in 0..8u8 {
                let was_on = i < self.light_count;
                let on = i < to.light_count;
                if was_on != on {
                    glutil::set_enabled(gl::LIGHT0 + GLenum::from(i), on);
                }
                if on && (!was_on || self.ambient != to.ambient) {
                    gl::Lightfv(gl::LIGHT0 + GLenum::from(i), gl::AMBIENT, to.ambient.as_ptr());
                }
            }
        }
    }
}

impl TextureState {
    fn switch_to(&self, to: &TextureState) {
        unsafe {
            if self.enable != to.enable {
                glutil::set_enabled(gl::TEXTURE_2D, to.enable);
            }
        }
    }
}

static DEFAULTS: Lazy<BTreeMap<Category, State>> = Lazy::new(|| {
    let mut map = BTreeMap::new();
    let defaults = [
        State::Blend(BlendState::default()),
        State::Depth(DepthState::default()),
        State::Lighting(LightingState::default()),
        State::Texture(TextureState::default()),
    ];
    for state in &defaults {
        map.insert(state.category(), *state);
    }
    map
});

/// The canonical default value for a category, shared by every diff.
pub fn default_state(category: Category) -> &'static State {
    &DEFAULTS[&category]
}

/// A single resolved state change. Equal endpoints mean no driver call.
#[derive(Clone, Debug, PartialEq)]
pub struct Transition {
    pub from: State,
    pub to: State,
}

impl Transition {
    pub fn is_noop(&self) -> bool {
        self.from == self.to
    }

    pub fn apply(&self) {
        if !self.is_noop() {
            self.from.switch_to(&self.to);
        }
    }
}

/// An ordered mapping from category to state value. Absence of a category
/// means "use the default", not "no requirement".
#[derive(Clone, Debug, Default, PartialEq)]
pub struct StateSet {
    states: BTreeMap<Category, State>,
}

impl StateSet {
    pub fn new() -> StateSet {
        StateSet { states: BTreeMap::new() }
    }

    /// Inserts a state, replacing any previous value of the same category.
    pub fn set(&mut self, state: State) {
        self.states.insert(state.category(), state);
    }

    pub fn get(&self, category: Category) -> Option<&State> {
        self.states.get(&category)
    }

    pub fn len(&self) -> usize {
        self.states.len()
    }

    /// Merge-walks both sets in ascending category order and resolves each
    /// one-sided entry against the category default. Yields exactly one
    /// transition per category present in either set.
    pub fn transitions(&self, to: &StateSet) -> Vec<Transition> {
        let mut out = Vec::new();
        let mut from_iter = self.states.values().peekable();
        let mut to_iter = to.states.values().peekable();

        loop {
            let next = match (from_iter.peek(), to_iter.peek()) {
                (None, None) => break,
                (Some(&from), None) => {
                    from_iter.next();
                    Transition {
                        from: *from,
                        to: *default_state(from.category()),
                    }
                }
                (None, Some(&to)) => {
                    to_iter.next();
                    Transition {
                        from: *default_state(to.category()),
                        to: *to,
                    }
                }
                (Some(&from), Some(&to)) => {
                    if from.category() < to.category() {
                        from_iter.next();
                        Transition {
                            from: *from,
                            to: *default_state(from.category()),
                        }
                    } else if to.category() < from.category() {
                        to_iter.next();
                        Transition {
                            from: *default_state(to.category()),
                            to: *to,
                        }
                    } else {
                        from_iter.next();
                        to_iter.next();
                        Transition { from: *from, to: *to }
                    }
                }
            };
            out.push(next);
        }
        out
    }

    /// Applies the minimal set of driver calls moving the context from this
    /// configuration to `to`.
    pub fn switch_to(&self, to: &StateSet) {
        for transition in self.transitions(to) {
            transition.apply();
        }
    }
}

/// Tracks which `StateSet` is currently applied to the context. Owned by the
/// sweep driver; `None` means everything sits at its default.
pub struct StateContext {
    current: Option<StateSet>,
}

impl StateContext {
    pub fn new() -> StateContext {
        StateContext { current: None }
    }

    pub fn current(&self) -> Option<&StateSet> {
        self.current.as_ref()
    }

    /// Diffs the currently applied configuration against `next`, applies the
    /// transitions, records `next` as current, and returns the previous
    /// value so the caller can restore it later through the same path.
    pub fn apply(&mut self, next: Option<&StateSet>) -> Option<StateSet> {
        let empty = StateSet::new();
        {
            let from = self.current.as_ref().unwrap_or(&empty);
            let to = next.unwrap_or(&empty);
            from.switch_to(to);
        }
        mem::replace(&mut self.current, next.cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    fn depth(test: bool) -> State {
        State::Depth(DepthState { test: test, ..DepthState::default() })
    }

    fn blend(enable: bool) -> State {
        State::Blend(BlendState { enable: enable, ..BlendState::default() })
    }

    fn lighting(count: u8) -> State {
        State::Lighting(LightingState {
            enable: count > 0,
            light_count: count,
            ..LightingState::default()
        })
    }

    fn set_of(states: &[State]) -> StateSet {
        let mut set = StateSet::new();
        for state in states {
            set.set(*state);
        }
        set
    }

    /// The effective configuration after applying `transitions` on top of
    /// all-defaults.
    fn effective_after(transitions: &[Transition]) -> BTreeMap<Category, State> {
        let mut map = BTreeMap::new();
        for t in transitions {
            map.insert(t.to.category(), t.to);
        }
        map
    }

    /// The configuration a set denotes once defaults are filled in.
    fn effective_of(set: &StateSet) -> BTreeMap<Category, State> {
        let mut map = BTreeMap::new();
        for category in [Category::Blend, Category::Depth, Category::Lighting, Category::Texture].iter() {
            let state = set.get(*category).cloned().unwrap_or(*default_state(*category));
            map.insert(*category, state);
        }
        map
    }

    #[test]
    fn one_transition_per_mentioned_category() {
        let a = set_of(&[depth(true), blend(true)]);
        let b = set_of(&[depth(false), lighting(2)]);
        // union of {Blend, Depth} and {Depth, Lighting}
        assert_eq!(a.transitions(&b).len(), 3);
    }

    #[test]
    fn untouched_categories_stay_untouched() {
        let a = set_of(&[depth(true)]);
        let b = set_of(&[depth(false)]);
        let transitions = a.transitions(&b);
        assert_eq!(transitions.len(), 1);
        assert_eq!(transitions[0].from.category(), Category::Depth);
    }

    #[test]
    fn transitions_come_out_in_category_order() {
        let a = set_of(&[lighting(1)]);
        let b = set_of(&[depth(true), blend(true)]);
        let categories: Vec<Category> =
            a.transitions(&b).iter().map(|t| t.to.category()).collect();
        let mut sorted = categories.clone();
        sorted.sort();
        assert_eq!(categories, sorted);
    }

    #[test]
    fn one_sided_entries_resolve_to_defaults() {
        let a = set_of(&[depth(true)]);
        let b = StateSet::new();
        let transitions = a.transitions(&b);
        assert_eq!(transitions.len(), 1);
        assert_eq!(transitions[0].to, *default_state(Category::Depth));

        let transitions = b.transitions(&a);
        assert_eq!(transitions.len(), 1);
        assert_eq!(transitions[0].from, *default_state(Category::Depth));
    }

    #[test]
    fn self_transition_is_all_noops() {
        let a = set_of(&[depth(true), blend(true), lighting(3)]);
        for transition in a.transitions(&a) {
            assert!(transition.is_noop());
        }
    }

    #[test]
    fn round_trip_restores_effective_configuration() {
        let a = set_of(&[depth(true), lighting(2)]);
        let b = set_of(&[blend(true), depth(false)]);

        let mut effective = effective_of(&a);
        for t in a.transitions(&b).iter().chain(b.transitions(&a).iter()) {
            effective.insert(t.to.category(), t.to);
        }
        assert_eq!(effective, effective_of(&a));
    }

    #[test]
    fn forward_diff_reaches_target_configuration() {
        let a = set_of(&[depth(true)]);
        let b = set_of(&[blend(true), lighting(1)]);
        let reached = effective_after(&a.transitions(&b));
        for (category, state) in &reached {
            assert_eq!(
                state,
                b.get(*category).unwrap_or(default_state(*category))
            );
        }
    }

    #[test]
    fn later_set_replaces_same_category() {
        let mut set = StateSet::new();
        set.set(depth(true));
        set.set(depth(false));
        assert_eq!(set.len(), 1);
        assert_eq!(set.get(Category::Depth), Some(&depth(false)));
    }

    #[test]
    fn context_tracks_current_set() {
        // Default-valued payloads keep every transition a no-op, so nothing
        // reaches the driver while the bookkeeping is exercised.
        let benign = set_of(&[State::Depth(DepthState::default())]);

        let mut ctx = StateContext::new();
        assert!(ctx.current().is_none());

        let prev = ctx.apply(Some(&benign));
        assert!(prev.is_none());
        assert_eq!(ctx.current(), Some(&benign));

        let prev = ctx.apply(None);
        assert_eq!(prev, Some(benign));
        assert!(ctx.current().is_none());
    }
}
