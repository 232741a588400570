//! Platform-agnostic input actions: named channels carrying 2D stick values
use std::cell::RefCell;
use std::collections::{HashSet, VecDeque};
use std::rc::{Rc, Weak};

use glam::Vec2;
use tracing::{debug, trace};

use crate::model::ActionNames;
use crate::utils::clamp_to_unit_circle;

/// Platform-independent input events, already normalized by the input layer
#[derive(Debug, Clone, PartialEq)]
pub enum InputEvent {
    /// The named action reported a new value
    Performed { action: String, value: Vec2 },
    /// The named action was released or canceled
    Canceled { action: String },
    /// Window lost focus; every action is canceled
    FocusLost,
}

impl InputEvent {
    pub fn performed(action: &str, value: Vec2) -> Self {
        InputEvent::Performed { action: action.to_string(), value }
    }

    pub fn canceled(action: &str) -> Self {
        InputEvent::Canceled { action: action.to_string() }
    }
}

/// What a subscriber sees for one event on its action
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputPhase {
    Performed(Vec2),
    Canceled,
}

type Queue = RefCell<VecDeque<InputPhase>>;

/// Receiving end of one action. Dropping it unsubscribes.
pub struct ActionSubscription {
    action: String,
    queue: Rc<Queue>,
}

impl ActionSubscription {
    pub fn action(&self) -> &str {
        &self.action
    }

    /// Take every phase delivered since the last drain, oldest first
    pub fn drain(&self) -> Vec<InputPhase> {
        self.queue.borrow_mut().drain(..).collect()
    }

    pub fn pending(&self) -> usize {
        self.queue.borrow().len()
    }
}

struct Action {
    name: String,
    subscribers: Vec<Weak<Queue>>,
}

impl Action {
    fn deliver(&mut self, phase: InputPhase) {
        self.subscribers.retain(|sub| match sub.upgrade() {
            Some(queue) => {
                queue.borrow_mut().push_back(phase);
                true
            }
            None => false,
        });
    }
}

/// A named group of actions that can be enabled or disabled as a whole
pub struct ActionMap {
    name: String,
    enabled: bool,
    actions: Vec<Action>,
}

impl ActionMap {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            enabled: false,
            actions: Vec::new(),
        }
    }

    pub fn with_action(mut self, name: &str) -> Self {
        self.add_action(name);
        self
    }

    pub fn add_action(&mut self, name: &str) {
        if !self.has_action(name) {
            self.actions.push(Action { name: name.to_string(), subscribers: Vec::new() });
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn has_action(&self, name: &str) -> bool {
        self.actions.iter().any(|a| a.name == name)
    }

    pub fn enable(&mut self) {
        self.enabled = true;
    }

    pub fn disable(&mut self) {
        self.enabled = false;
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Subscribe to an action by name. `None` if the map has no such action.
    pub fn subscribe(&mut self, name: &str) -> Option<ActionSubscription> {
        let action = self.actions.iter_mut().find(|a| a.name == name)?;
        let queue = Rc::new(RefCell::new(VecDeque::new()));
        action.subscribers.push(Rc::downgrade(&queue));
        Some(ActionSubscription { action: name.to_string(), queue })
    }

    /// Number of subscriptions still alive for an action
    pub fn subscriber_count(&self, name: &str) -> usize {
        self.actions
            .iter()
            .find(|a| a.name == name)
            .map(|a| a.subscribers.iter().filter(|s| s.strong_count() > 0).count())
            .unwrap_or(0)
    }

    /// Route an event to the subscribers of its action. Ignored while disabled.
    pub fn dispatch(&mut self, event: &InputEvent) {
        if !self.enabled {
            trace!(map = %self.name, ?event, "action map disabled, dropping event");
            return;
        }

        match event {
            InputEvent::Performed { action, value } => {
                if let Some(a) = self.actions.iter_mut().find(|a| &a.name == action) {
                    a.deliver(InputPhase::Performed(*value));
                }
            }
            InputEvent::Canceled { action } => {
                if let Some(a) = self.actions.iter_mut().find(|a| &a.name == action) {
                    a.deliver(InputPhase::Canceled);
                }
            }
            InputEvent::FocusLost => {
                debug!(map = %self.name, "focus lost, canceling all actions");
                for a in self.actions.iter_mut() {
                    a.deliver(InputPhase::Canceled);
                }
            }
        }
    }
}

/// Collection of action maps handed to the controller at initialization
#[derive(Default)]
pub struct ActionAsset {
    maps: Vec<ActionMap>,
}

impl ActionAsset {
    pub fn new() -> Self {
        Self::default()
    }

    /// The layout the controller expects by default: one map with both channels
    pub fn with_default_layout(names: &ActionNames) -> Self {
        let mut asset = Self::new();
        asset.add_map(
            ActionMap::new(&names.map)
                .with_action(&names.move_action)
                .with_action(&names.vertical_action),
        );
        asset
    }

    pub fn with_map(mut self, map: ActionMap) -> Self {
        self.add_map(map);
        self
    }

    pub fn add_map(&mut self, map: ActionMap) {
        self.maps.retain(|m| m.name != map.name);
        self.maps.push(map);
    }

    pub fn find_map(&self, name: &str) -> Option<&ActionMap> {
        self.maps.iter().find(|m| m.name == name)
    }

    pub fn find_map_mut(&mut self, name: &str) -> Option<&mut ActionMap> {
        self.maps.iter_mut().find(|m| m.name == name)
    }

    /// Dispatch an event to every map
    pub fn dispatch(&mut self, event: &InputEvent) {
        for map in self.maps.iter_mut() {
            map.dispatch(event);
        }
    }
}

/// The two stick channels the controller reads
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Channel {
    Move,
    Vertical,
}

/// Latest stick values seen by the controller
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct InputState {
    /// Left stick (horizontal movement)
    pub move_axis: Vec2,
    /// Right stick, only `y` is used (vertical movement)
    pub vertical_axis: Vec2,
}

impl InputState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Last value wins; a cancel zeroes the axis
    pub fn apply(&mut self, channel: Channel, phase: InputPhase) {
        let axis = match channel {
            Channel::Move => &mut self.move_axis,
            Channel::Vertical => &mut self.vertical_axis,
        };
        *axis = match phase {
            InputPhase::Performed(value) => value,
            InputPhase::Canceled => Vec2::ZERO,
        };
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }
}

/// Key mapping for driving the stick channels from a keyboard
#[derive(Debug, Clone)]
pub struct KeyBindings {
    pub forward: Vec<String>,
    pub backward: Vec<String>,
    pub left: Vec<String>,
    pub right: Vec<String>,
    pub ascend: Vec<String>,
    pub descend: Vec<String>,
}

impl Default for KeyBindings {
    fn default() -> Self {
        let keys = |ks: &[&str]| ks.iter().map(|k| k.to_string()).collect::<Vec<_>>();
        Self {
            forward: keys(&["w", "ArrowUp"]),
            backward: keys(&["s", "ArrowDown"]),
            left: keys(&["a", "ArrowLeft"]),
            right: keys(&["d", "ArrowRight"]),
            ascend: keys(&[" ", "Space"]),
            descend: keys(&["Shift"]),
        }
    }
}

/// Digital composite: turns held keys into `Move` / `VerticalMove` events
pub struct KeyboardStick {
    bindings: KeyBindings,
    names: ActionNames,
    pressed_keys: HashSet<String>,
    move_value: Vec2,
    vertical_value: Vec2,
}

impl KeyboardStick {
    pub fn new(bindings: KeyBindings, names: ActionNames) -> Self {
        Self {
            bindings,
            names,
            pressed_keys: HashSet::new(),
            move_value: Vec2::ZERO,
            vertical_value: Vec2::ZERO,
        }
    }

    /// Feed a key transition; returns the action events it caused
    pub fn handle_key(&mut self, key: &str, is_down: bool) -> Vec<InputEvent> {
        let key = normalize_key(key);
        if is_down {
            self.pressed_keys.insert(key);
        } else {
            self.pressed_keys.remove(&key);
        }
        self.refresh()
    }

    /// Release everything (focus loss); returns cancels for active channels
    pub fn clear_keys(&mut self) -> Vec<InputEvent> {
        self.pressed_keys.clear();
        self.refresh()
    }

    fn is_held(&self, keys: &[String]) -> bool {
        keys.iter().any(|k| self.pressed_keys.contains(&normalize_key(k)))
    }

    fn axis(&self, negative: &[String], positive: &[String]) -> f32 {
        let mut v = 0.0;
        if self.is_held(positive) {
            v += 1.0;
        }
        if self.is_held(negative) {
            v -= 1.0;
        }
        v
    }

    fn refresh(&mut self) -> Vec<InputEvent> {
        let b = &self.bindings;
        let move_value = clamp_to_unit_circle(Vec2::new(
            self.axis(&b.left, &b.right),
            self.axis(&b.backward, &b.forward),
        ));
        let vertical_value = Vec2::new(0.0, self.axis(&b.descend, &b.ascend));

        let mut events = Vec::new();
        if move_value != self.move_value {
            self.move_value = move_value;
            events.push(stick_event(&self.names.move_action, move_value));
        }
        if vertical_value != self.vertical_value {
            self.vertical_value = vertical_value;
            events.push(stick_event(&self.names.vertical_action, vertical_value));
        }
        events
    }
}

fn stick_event(action: &str, value: Vec2) -> InputEvent {
    if value == Vec2::ZERO {
        InputEvent::canceled(action)
    } else {
        InputEvent::performed(action, value)
    }
}

// Single letters are matched case-insensitively so Shift+W still counts as "w"
fn normalize_key(key: &str) -> String {
    if key.chars().count() == 1 {
        key.to_lowercase()
    } else {
        key.to_string()
    }
}

#[cfg(target_arch = "wasm32")]
pub mod wasm {
    use super::*;
    use web_sys::KeyboardEvent;

    pub fn keyboard_event_to_input(stick: &mut KeyboardStick, e: &KeyboardEvent, is_down: bool) -> Vec<InputEvent> {
        if e.repeat() {
            return Vec::new();
        }
        stick.handle_key(&e.key(), is_down)
    }
}
